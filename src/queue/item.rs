//! # Item de la Cola
//! src/queue/item.rs
//!
//! Una unidad de trabajo diferido: la conexión, el recurso a servir y su
//! tamaño en bytes. El item es inmutable y se mueve (no se comparte) al
//! entrar y salir de la cola.

use crate::error::SubmitError;

/// Longitud máxima por defecto del path de un recurso (bytes)
pub const DEFAULT_MAX_PATH_LEN: usize = 8192;

/// Request validado esperando a un worker
///
/// `H` es el handle opaco de la conexión (`TcpStream` en el servidor,
/// cualquier valor en los tests).
#[derive(Debug)]
pub struct RequestItem<H> {
    handle: H,
    resource_path: String,
    size_hint: u64,
    /// Número de secuencia asignado por `submit`
    arrival: u64,
}

impl<H> RequestItem<H> {
    /// Crea un item nuevo. La secuencia de llegada la asigna la cola.
    pub fn new(handle: H, resource_path: impl Into<String>, size_hint: u64) -> Self {
        Self {
            handle,
            resource_path: resource_path.into(),
            size_hint,
            arrival: 0,
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Tamaño del recurso en bytes, conocido al momento del submit
    pub fn size_hint(&self) -> u64 {
        self.size_hint
    }

    /// Orden de llegada dentro de la cola (0 hasta que se encola)
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    /// Consume el item y entrega el handle
    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Consume el item y entrega todas sus partes
    pub fn into_parts(self) -> (H, String, u64) {
        (self.handle, self.resource_path, self.size_hint)
    }

    pub(crate) fn stamp(&mut self, arrival: u64) {
        self.arrival = arrival;
    }

    /// Verifica el contrato del dispatcher antes de encolar
    pub(crate) fn validate(&self, max_path_len: usize) -> Result<(), SubmitError> {
        if self.resource_path.is_empty() {
            return Err(SubmitError::EmptyPath);
        }
        if self.resource_path.len() > max_path_len {
            return Err(SubmitError::PathTooLong {
                len: self.resource_path.len(),
                max: max_path_len,
            });
        }
        Ok(())
    }
}
