//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Arma las piezas a partir de la configuración y corre el loop de accept:
//!
//! ```text
//! accept ─▶ Dispatcher ─submit─▶ BoundedQueue ◀─take─ WorkerPool ─▶ FileServer
//! ```
//!
//! El thread que acepta también valida cada request; solo los archivos
//! servibles pasan a la cola.

use crate::config::Config;
use crate::error::ServerError;
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::pool::WorkerPool;
use crate::queue::{BoundedQueue, QueueStats};
use crate::serve::FileServer;
use crate::server::Dispatcher;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tiempo máximo esperando la request line de un cliente
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Cada cuánto el loop de accept loguea métricas y estado de la cola
const REPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Servidor HTTP/1.0 de archivos estáticos
pub struct Server {
    listener: TcpListener,
    queue: Arc<BoundedQueue<TcpStream>>,
    pool: WorkerPool<TcpStream>,
    dispatcher: Dispatcher<TcpStream>,
    metrics: MetricsCollector,
}

impl Server {
    /// Valida la configuración, hace bind e inicia el pool de workers.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        config.validate()?;

        let listener = TcpListener::bind(config.address())?;

        let queue = match config.seed {
            Some(seed) => BoundedQueue::with_seed(config.buffers, config.policy, seed),
            None => BoundedQueue::new(config.buffers, config.policy),
        };
        let queue = Arc::new(queue.with_max_path_len(config.max_path_len));

        let metrics = MetricsCollector::new();
        let pool = WorkerPool::spawn(
            config.threads,
            Arc::clone(&queue),
            Arc::new(FileServer::new()),
            metrics.clone(),
        )?;

        let dispatcher = Dispatcher::new(
            &config.root_dir,
            config.max_path_len,
            Arc::clone(&queue),
            metrics.clone(),
        );

        tracing::info!(address = %listener.local_addr()?, "listening");

        Ok(Self {
            listener,
            queue,
            pool,
            dispatcher,
            metrics,
        })
    }

    /// Dirección efectiva (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.get_snapshot()
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Loguea un resumen de métricas y de la cola a nivel `info`
    pub fn log_report(&self) {
        report(&self.metrics, &self.queue);
    }

    /// Acepta conexiones para siempre.
    ///
    /// Los errores de accept se loguean y el loop continúa. Como mucho una
    /// vez por `REPORT_INTERVAL` se loguea el resumen.
    pub fn run(self) -> Result<(), ServerError> {
        let mut last_report = Instant::now();
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
                        tracing::warn!(error = %e, "could not set read timeout");
                    }
                    if let Ok(peer) = stream.peer_addr() {
                        tracing::debug!(%peer, "connection accepted");
                    }
                    self.dispatcher.handle(stream);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                }
            }

            if last_report.elapsed() >= REPORT_INTERVAL {
                self.log_report();
                last_report = Instant::now();
            }
        }

        self.pool.shutdown();
        report(&self.metrics, &self.queue);
        Ok(())
    }
}

fn report(metrics: &MetricsCollector, queue: &BoundedQueue<TcpStream>) {
    let m = metrics.get_snapshot();
    let q = queue.stats();
    tracing::info!(
        served = m.served,
        failed = m.failed,
        rejected = m.rejected,
        bytes_sent = m.bytes_sent,
        busy_workers = m.busy_workers,
        uptime_secs = m.uptime_secs,
        p50_us = m.latency_p50_us,
        p95_us = m.latency_p95_us,
        p99_us = m.latency_p99_us,
        avg_us = m.latency_avg_us,
        "metrics"
    );
    tracing::info!(
        policy = %q.policy,
        pending = q.len,
        capacity = q.capacity,
        submitted = q.submitted,
        taken = q.taken,
        "queue"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::SchedPolicy;
    use std::fs;
    use std::io::{Read, Write};

    fn doc_root(name: &str) -> std::path::PathBuf {
        let root = std::env::temp_dir().join(format!(
            "static_server_tcp_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("index.html"), "<p>tcp</p>").unwrap();
        root
    }

    fn config(root: &std::path::Path) -> Config {
        Config {
            port: 0,
            root_dir: root.to_string_lossy().into_owned(),
            threads: 1,
            buffers: 2,
            policy: SchedPolicy::Sff,
            ..Config::default()
        }
    }

    #[test]
    fn test_bind_builds_queue_from_config() {
        let root = doc_root("bind");
        let server = Server::bind(&config(&root)).unwrap();

        assert_ne!(server.local_addr().unwrap().port(), 0);
        let stats = server.queue_stats();
        assert_eq!(stats.capacity, 2);
        assert_eq!(stats.policy, SchedPolicy::Sff);
        assert_eq!(stats.submitted, 0);
        assert_eq!(server.metrics().served, 0);
        server.log_report();
    }

    #[test]
    fn test_served_request_shows_in_report_data() {
        let root = doc_root("report");
        let server = Server::bind(&config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /index.html HTTP/1.0\r\n\r\n").unwrap();
        let (stream, _) = server.listener.accept().unwrap();
        server.dispatcher.handle(stream);

        let mut response = String::new();
        client.read_to_string(&mut response).unwrap();
        assert!(response.ends_with("<p>tcp</p>"));

        // El worker registra la métrica después de soltar la conexión
        let deadline = Instant::now() + Duration::from_secs(5);
        while server.metrics().served == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(server.metrics().served, 1);
        assert_eq!(server.metrics().bytes_sent, 10);
        assert_eq!(server.queue_stats().taken, 1);
    }
}
