//! # Pool de Workers
//! src/pool/mod.rs
//!
//! N threads de larga vida creados al inicio. Cada uno repite:
//!
//! ```text
//! loop {
//!     item = queue.take()      // puede dormir indefinidamente
//!     serve(item)              // errores y panics quedan en esta iteración
//! }
//! ```
//!
//! Los workers son simétricos e intercambiables: no se comunican entre sí
//! y el pool no expone su identidad a los callers.

use crate::error::{PoolError, ServeError};
use crate::metrics::MetricsCollector;
use crate::queue::{BoundedQueue, RequestItem};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// El trabajo que se hace con un item una vez desencolado.
///
/// La implementación es dueña del handle: debe cerrarlo (soltarlo) en
/// todos los caminos de salida, y no debe volver a usar la cola.
/// Retorna la cantidad de bytes enviados.
pub trait Serve<H>: Send + Sync {
    fn serve(&self, item: RequestItem<H>) -> Result<u64, ServeError>;
}

impl<H, F> Serve<H> for F
where
    F: Fn(RequestItem<H>) -> Result<u64, ServeError> + Send + Sync,
{
    fn serve(&self, item: RequestItem<H>) -> Result<u64, ServeError> {
        self(item)
    }
}

struct Worker {
    id: usize,
    thread: JoinHandle<()>,
}

/// Pool de tamaño fijo que consume de una `BoundedQueue`
pub struct WorkerPool<H> {
    workers: Vec<Worker>,
    queue: Arc<BoundedQueue<H>>,
}

impl<H: Send + 'static> WorkerPool<H> {
    /// Inicia `threads` workers sobre `queue`.
    pub fn spawn<S>(
        threads: usize,
        queue: Arc<BoundedQueue<H>>,
        serve: Arc<S>,
        metrics: MetricsCollector,
    ) -> Result<Self, PoolError>
    where
        S: Serve<H> + ?Sized + 'static,
    {
        if threads == 0 {
            return Err(PoolError::NoThreads);
        }

        let mut workers = Vec::with_capacity(threads);
        for id in 0..threads {
            let queue = Arc::clone(&queue);
            let serve = Arc::clone(&serve);
            let metrics = metrics.clone();

            let thread = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, &queue, serve.as_ref(), &metrics))?;
            workers.push(Worker { id, thread });
        }

        tracing::info!(threads, policy = %queue.policy(), "worker pool started");
        Ok(Self { workers, queue })
    }

    /// Número de workers del pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cierra la cola, deja que los workers drenen lo pendiente y los espera.
    pub fn shutdown(self) {
        self.queue.close();
        for worker in self.workers {
            if worker.thread.join().is_err() {
                tracing::error!(worker = worker.id, "worker thread panicked outside serve");
            }
        }
        tracing::info!("worker pool stopped");
    }
}

/// Loop principal del worker
fn worker_loop<H, S>(id: usize, queue: &BoundedQueue<H>, serve: &S, metrics: &MetricsCollector)
where
    S: Serve<H> + ?Sized,
{
    tracing::debug!(worker = id, "worker started");

    while let Some(item) = queue.take() {
        let path = item.resource_path().to_string();
        let start = Instant::now();
        metrics.worker_started();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| serve.serve(item)))
            .unwrap_or_else(|payload| Err(ServeError::Panicked(panic_message(payload.as_ref()))));

        metrics.worker_finished();
        let latency = start.elapsed();

        match outcome {
            Ok(bytes) => {
                tracing::debug!(worker = id, path = %path, bytes, ?latency, "served");
                metrics.record_served(bytes, latency);
            }
            Err(e) => {
                tracing::warn!(worker = id, path = %path, error = %e, "serve failed");
                metrics.record_failed(latency);
            }
        }
    }

    tracing::debug!(worker = id, "worker exiting, queue closed");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
