//! # Políticas de Planificación
//! src/queue/policy.rs
//!
//! Decide qué item pendiente recibe el próximo worker libre:
//!
//! - **FIFO**: orden de llegada
//! - **SFF**: Smallest File First, el de menor `size_hint` (empates por llegada)
//! - **RANDOM**: posición uniforme en `[0, len)`
//!
//! SFF y RANDOM pueden dejar con hambre a items grandes o con mala suerte
//! bajo carga sostenida.

use super::item::RequestItem;
use super::ring::Ring;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::Rng;

/// Política de selección de la víctima en `take`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchedPolicy {
    /// First-In-First-Out
    #[default]
    Fifo,

    /// Smallest File First
    Sff,

    /// Selección uniforme al azar
    Random,
}

impl SchedPolicy {
    /// Nombre en minúsculas, igual al aceptado por la CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedPolicy::Fifo => "fifo",
            SchedPolicy::Sff => "sff",
            SchedPolicy::Random => "random",
        }
    }

    /// Retorna la posición lógica de la víctima.
    ///
    /// El caller garantiza que `ring` no está vacío y que tiene el lock
    /// de la cola (el `rng` no es thread-safe por sí solo).
    pub fn select<H>(&self, ring: &Ring<RequestItem<H>>, rng: &mut StdRng) -> usize {
        debug_assert!(!ring.is_empty());
        match self {
            SchedPolicy::Fifo => 0,
            SchedPolicy::Sff => ring
                .iter()
                .enumerate()
                // min_by_key se queda con el primero entre los empatados
                .min_by_key(|(_, item)| item.size_hint())
                .map(|(idx, _)| idx)
                .unwrap_or(0),
            SchedPolicy::Random => rng.gen_range(0..ring.len()),
        }
    }
}

impl std::fmt::Display for SchedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
