//! # Cola de Trabajo Acotada
//! src/queue/buffer.rs
//!
//! Monitor clásico: un `Mutex` protege el buffer circular, el contador de
//! llegadas y el generador aleatorio; dos `Condvar` esperan por "hay
//! espacio" y "hay items".
//!
//! ```text
//! Dispatcher ──submit──▶ [ BoundedQueue ] ◀──take── Workers
//!                          (lock + not_full + not_empty)
//! ```
//!
//! `submit` bloquea mientras la cola está llena; `take` bloquea mientras
//! está vacía. La selección de la víctima y su remoción ocurren completas
//! bajo el lock, así dos `take` concurrentes nunca reciben el mismo item.

use super::item::{RequestItem, DEFAULT_MAX_PATH_LEN};
use super::policy::SchedPolicy;
use super::ring::Ring;
use crate::error::SubmitError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Estado protegido por el lock
struct QueueState<H> {
    ring: Ring<RequestItem<H>>,
    rng: StdRng,
    closed: bool,
    submitted: u64,
    taken: u64,
}

/// Cola acotada compartida entre el dispatcher y el pool de workers
pub struct BoundedQueue<H> {
    state: Mutex<QueueState<H>>,
    not_empty: Condvar,
    not_full: Condvar,
    policy: SchedPolicy,
    max_path_len: usize,
}

impl<H> BoundedQueue<H> {
    /// Crea una cola con la semilla aleatoria tomada del sistema
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0.
    pub fn new(capacity: usize, policy: SchedPolicy) -> Self {
        Self::with_rng(capacity, policy, StdRng::from_entropy())
    }

    /// Crea una cola con semilla fija (planificación RANDOM reproducible)
    pub fn with_seed(capacity: usize, policy: SchedPolicy, seed: u64) -> Self {
        Self::with_rng(capacity, policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, policy: SchedPolicy, rng: StdRng) -> Self {
        Self {
            state: Mutex::new(QueueState {
                ring: Ring::with_capacity(capacity),
                rng,
                closed: false,
                submitted: 0,
                taken: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            policy,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }

    /// Cambia el largo máximo aceptado para `resource_path`
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    // Ninguna sección crítica deja el ring a medio actualizar si hay panic,
    // así que un lock envenenado se puede seguir usando.
    fn lock(&self) -> MutexGuard<'_, QueueState<H>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un item, bloqueando mientras la cola esté llena.
    ///
    /// Items mal formados se rechazan antes de tomar el lock. Después de
    /// `close()` falla con `SubmitError::Closed`. En ambos casos el item
    /// vuelve al caller dentro de `Rejected`, así el handle puede recibir
    /// una respuesta.
    pub fn submit(&self, mut item: RequestItem<H>) -> Result<(), Rejected<H>> {
        if let Err(error) = item.validate(self.max_path_len) {
            return Err(Rejected { error, item });
        }

        let mut state = self.lock();
        while state.ring.is_full() && !state.closed {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            return Err(Rejected {
                error: SubmitError::Closed,
                item,
            });
        }

        state.submitted += 1;
        item.stamp(state.submitted);
        tracing::debug!(
            arrival = item.arrival(),
            path = item.resource_path(),
            size = item.size_hint(),
            "queued request"
        );
        if state.ring.push_back(item).is_err() {
            unreachable!("ring has room after waiting on not_full");
        }

        self.not_empty.notify_one();
        Ok(())
    }

    /// Desencola según la política, bloqueando mientras esté vacía.
    ///
    /// Retorna `None` solo cuando la cola fue cerrada y ya no quedan items.
    pub fn take(&self) -> Option<RequestItem<H>> {
        let mut state = self.lock();
        while state.ring.is_empty() && !state.closed {
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.extract(&mut state)
    }

    /// Como `take`, pero se rinde después de `timeout` sin item.
    ///
    /// Un `timeout` que no se puede representar como `Instant` equivale
    /// a esperar sin límite.
    pub fn take_timeout(&self, timeout: Duration) -> Option<RequestItem<H>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.take();
        };
        let mut state = self.lock();
        while state.ring.is_empty() && !state.closed {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        self.extract(&mut state)
    }

    fn extract(&self, state: &mut QueueState<H>) -> Option<RequestItem<H>> {
        if state.ring.is_empty() {
            return None;
        }

        let victim = self.policy.select(&state.ring, &mut state.rng);
        let item = state.ring.remove_at(victim)?;
        state.taken += 1;

        tracing::debug!(
            policy = %self.policy,
            index = victim,
            arrival = item.arrival(),
            remaining = state.ring.len(),
            "dequeued request"
        );

        self.not_full.notify_one();
        Some(item)
    }

    /// Cierra la cola y despierta a todos los threads bloqueados.
    ///
    /// Los `submit` pendientes fallan con `Closed`; los `take` siguen
    /// drenando lo que quede y luego retornan `None`.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Cantidad de items pendientes
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }

    pub fn policy(&self) -> SchedPolicy {
        self.policy
    }

    /// Obtiene estadísticas de la cola
    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            len: state.ring.len(),
            capacity: state.ring.capacity(),
            policy: self.policy,
            submitted: state.submitted,
            taken: state.taken,
        }
    }
}

/// Un `submit` rechazado: el motivo y el item intacto
#[derive(Debug)]
pub struct Rejected<H> {
    pub error: SubmitError,
    pub item: RequestItem<H>,
}

/// Estadísticas de una cola
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    pub len: usize,
    pub capacity: usize,
    pub policy: SchedPolicy,
    pub submitted: u64,
    pub taken: u64,
}
