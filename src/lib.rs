//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 de contenido estático construido alrededor de un pool
//! fijo de threads que consume de una cola acotada compartida.
//!
//! ## Arquitectura
//!
//! - `queue`: cola acotada (monitor) con política FIFO / SFF / RANDOM
//! - `pool`: workers que toman de la cola y ejecutan el serve
//! - `serve`: envío de archivos estáticos
//! - `server`: dispatcher y loop de accept
//! - `http`: parsing de la request line y construcción de respuestas
//! - `metrics`: contadores y latencias
//! - `config`: configuración CLI / entorno
//! - `error`: tipos de error
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::Config;
//! use static_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de accept");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod queue;
pub mod serve;
pub mod server;
