//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores de requests servidos, fallidos y rechazados, bytes enviados
//! y latencias (p50, p95, p99) del paso de serve.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
