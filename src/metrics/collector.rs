//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Cuenta lo que pasa alrededor de la cola: requests servidos, fallas en
//! el paso de serve, rechazos del dispatcher y latencia de cada serve.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar (para calcular percentiles)
const MAX_LATENCIES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Requests servidos completos
    served: u64,

    /// Requests cuyo serve falló
    failed: u64,

    /// Requests respondidos con error sin pasar por la cola
    rejected: u64,

    /// Bytes de archivo enviados
    bytes_sent: u64,

    /// Latencias de serve (en microsegundos), ventana de las últimas
    latencies: VecDeque<u64>,

    /// Workers ejecutando un serve en este momento
    busy_workers: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                latencies: VecDeque::with_capacity(MAX_LATENCIES),
                ..MetricsData::default()
            })),
            start_time: Instant::now(),
        }
    }

    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registra un serve exitoso
    pub fn record_served(&self, bytes: u64, latency: Duration) {
        let mut data = self.data();
        data.served += 1;
        data.bytes_sent += bytes;
        Self::push_latency(&mut data, latency);
    }

    /// Registra un serve que terminó en error
    pub fn record_failed(&self, latency: Duration) {
        let mut data = self.data();
        data.failed += 1;
        Self::push_latency(&mut data, latency);
    }

    /// Registra un request que el dispatcher respondió con error
    pub fn record_rejected(&self) {
        self.data().rejected += 1;
    }

    fn push_latency(data: &mut MetricsData, latency: Duration) {
        // Si tenemos demasiadas latencias, eliminar las más antiguas
        if data.latencies.len() >= MAX_LATENCIES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);
    }

    pub fn worker_started(&self) {
        self.data().busy_workers += 1;
    }

    pub fn worker_finished(&self) {
        let mut data = self.data();
        data.busy_workers = data.busy_workers.saturating_sub(1);
    }

    /// Calcula percentiles de latencia: (p50, p95, p99, promedio)
    fn calculate_percentiles(latencies: &VecDeque<u64>) -> (u64, u64, u64, u64) {
        if latencies.is_empty() {
            return (0, 0, 0, 0);
        }

        let mut sorted: Vec<u64> = latencies.iter().copied().collect();
        sorted.sort_unstable();

        let len = sorted.len();
        let p50 = sorted[len * 50 / 100];
        let p95 = sorted[len * 95 / 100];
        let p99 = sorted[len * 99 / 100];

        let sum: u64 = sorted.iter().sum();
        (p50, p95, p99, sum / len as u64)
    }

    /// Obtiene un snapshot de las métricas
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        let (p50, p95, p99, avg) = Self::calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            served: data.served,
            failed: data.failed,
            rejected: data.rejected,
            bytes_sent: data.bytes_sent,
            busy_workers: data.busy_workers,
            uptime_secs: self.start_time.elapsed().as_secs(),
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
            latency_avg_us: avg,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub served: u64,
    pub failed: u64,
    pub rejected: u64,
    pub bytes_sent: u64,
    pub busy_workers: u64,
    pub uptime_secs: u64,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_p99_us: u64,
    pub latency_avg_us: u64,
}
