//! # Configuración del Servidor
//! src/config.rs
//!
//! Se lee una sola vez al inicio (CLI o variables de entorno) y queda
//! inmutable: no hay reconfiguración en caliente.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server --port 8080 --root ./www \
//!   --threads 8 --buffers 32 --schedalg sff
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 THREADS=8 SCHEDALG=random SCHED_SEED=42 ./static_server
//! ```

use crate::error::ConfigError;
use crate::queue::item::DEFAULT_MAX_PATH_LEN;
use crate::queue::SchedPolicy;
use clap::Parser;
use std::path::Path;

/// Configuración del servidor de contenido estático
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.0 de contenido estático con cola planificable")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz de los archivos servidos
    #[arg(short = 'd', long = "root", default_value = ".", env = "DOC_ROOT")]
    pub root_dir: String,

    // === Pool y cola ===

    /// Número de threads del pool de workers
    #[arg(short, long, default_value = "4", env = "THREADS")]
    pub threads: usize,

    /// Capacidad de la cola de requests
    #[arg(short, long, default_value = "16", env = "BUFFERS")]
    pub buffers: usize,

    /// Política de planificación de la cola
    #[arg(short = 's', long = "schedalg", value_enum, default_value_t = SchedPolicy::Fifo, env = "SCHEDALG")]
    pub policy: SchedPolicy,

    /// Semilla fija para la política RANDOM (por defecto, entropía del sistema)
    #[arg(long, env = "SCHED_SEED")]
    pub seed: Option<u64>,

    /// Largo máximo en bytes del path de un recurso
    #[arg(long = "max-path-len", default_value_t = DEFAULT_MAX_PATH_LEN, env = "MAX_PATH_LEN")]
    pub max_path_len: usize,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.buffers == 0 {
            return Err(ConfigError::NoBuffers);
        }
        if self.max_path_len == 0 {
            return Err(ConfigError::NoPathLength);
        }
        if !Path::new(&self.root_dir).is_dir() {
            return Err(ConfigError::InvalidRoot(self.root_dir.clone()));
        }
        Ok(())
    }

    /// Loguea un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!(
            address = %self.address(),
            root = %self.root_dir,
            "network"
        );
        tracing::info!(
            threads = self.threads,
            buffers = self.buffers,
            policy = %self.policy,
            seed = ?self.seed,
            max_path_len = self.max_path_len,
            "worker pool & queue"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            root_dir: ".".to_string(),
            threads: 4,
            buffers: 16,
            policy: SchedPolicy::Fifo,
            seed: None,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}
