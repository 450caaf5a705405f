//! # Tipos de Error
//! src/error.rs
//!
//! Errores estructurados con `thiserror`. La cola no tiene errores propios
//! para "llena" o "vacía" (son estados de planificación, no fallas); solo
//! rechaza items mal formados o envíos después del cierre.
//!
//! ```text
//! ServerError (top-level)
//! ├── ConfigError  - Valores inválidos de configuración
//! ├── PoolError    - Creación del pool de workers
//! └── io::Error    - Bind / accept del socket
//!
//! ParseError       - Request line ilegible (400 / 501)
//! SubmitError      - Rechazo en el borde de `submit`
//! ServeError       - Falla local a una iteración de un worker
//! ```

use thiserror::Error;

/// Errores de validación de la configuración
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Thread count must be >= 1")]
    NoThreads,

    #[error("Buffer capacity must be >= 1")]
    NoBuffers,

    #[error("Max path length must be >= 1")]
    NoPathLength,

    #[error("Document root does not exist or is not a directory: {0}")]
    InvalidRoot(String),
}

/// Errores al leer la request line
#[derive(Error, Debug)]
pub enum ParseError {
    /// El peer cerró sin mandar nada
    #[error("Empty request")]
    EmptyRequest,

    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Versión HTTP distinta de 1.0 / 1.1
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Una línea superó `MAX_LINE` bytes
    #[error("Request line too long")]
    LineTooLong,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rechazos de `BoundedQueue::submit`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// El path del recurso está vacío
    #[error("resource path is empty")]
    EmptyPath,

    /// El path excede el máximo configurado
    #[error("resource path is {len} bytes (max {max})")]
    PathTooLong { len: usize, max: usize },

    /// La cola ya fue cerrada
    #[error("queue is closed")]
    Closed,
}

/// Fallas dentro del paso de serve
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("I/O error serving {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// El archivo tiene menos bytes que los anunciados en `Content-Length`
    #[error("short read on {path}: expected {expected} bytes, sent {sent}")]
    ShortRead {
        path: String,
        expected: u64,
        sent: u64,
    },

    #[error("serve step panicked: {0}")]
    Panicked(String),
}

/// Errores al crear el pool de workers
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("worker pool needs at least one thread")]
    NoThreads,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Error de alto nivel del servidor
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("worker pool: {0}")]
    Pool(#[from] PoolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
