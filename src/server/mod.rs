//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `dispatcher`: valida cada request y lo encola (o responde el error)
//! - `tcp`: bind, creación de cola y pool, loop de accept

pub mod dispatcher;
pub mod tcp;

pub use dispatcher::{Dispatcher, Rejection, Resolved};
pub use tcp::Server;
