//! # Cola de Requests
//! src/queue/mod.rs
//!
//! Núcleo concurrente del servidor: un buffer acotado compartido entre el
//! thread que acepta conexiones (productor) y el pool de workers
//! (consumidores), con política de planificación seleccionable.
//!
//! - `item`: el request validado que viaja por la cola
//! - `ring`: buffer circular con remoción que preserva el orden
//! - `policy`: FIFO, SFF y RANDOM
//! - `buffer`: el monitor (`Mutex` + dos `Condvar`)

pub mod buffer;
pub mod item;
pub mod policy;
pub mod ring;

pub use buffer::{BoundedQueue, QueueStats, Rejected};
pub use item::RequestItem;
pub use policy::SchedPolicy;
