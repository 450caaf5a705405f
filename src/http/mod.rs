//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Lo mínimo de HTTP/1.0 (RFC 1945) para servir archivos estáticos:
//!
//! - Lectura de la request line (los headers se descartan)
//! - Construcción de cabeceras de respuesta y páginas de error
//! - Códigos de estado
//!
//! No hay conexiones persistentes: cada respuesta cierra la conexión.

pub mod request;
pub mod response;
pub mod status;

pub use crate::error::ParseError;
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
