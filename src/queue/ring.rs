//! # Buffer Circular
//! src/queue/ring.rs
//!
//! Arreglo de tamaño fijo indexado con `head` + `len` módulo la capacidad.
//! Nunca realoca. Soporta extraer un elemento en cualquier posición lógica
//! compactando a los sobrevivientes sin alterar su orden relativo.
//!
//! ```text
//! capacidad = 5, head = 3, len = 4
//!
//!  físico:  [ c ][ d ][   ][ a ][ b ]
//!  lógico:    2    3         0    1
//! ```

/// Buffer circular de capacidad fija
#[derive(Debug)]
pub struct Ring<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> Ring<T> {
    /// # Panics
    ///
    /// Si `capacity` es 0.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, head: 0, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Traduce una posición lógica a un slot físico
    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.slots.len()
    }

    /// Agrega al final. Si está lleno devuelve el valor al caller.
    pub fn push_back(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        let tail = self.physical(self.len);
        self.slots[tail] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Itera en orden lógico (de head a tail)
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.slots[self.physical(i)].as_ref())
    }

    /// Extrae el elemento en la posición lógica `logical`.
    ///
    /// Los elementos posteriores se corren un slot hacia `head`, así el
    /// orden de los que quedan no cambia. Sacar la posición 0 solo avanza
    /// `head`.
    pub fn remove_at(&mut self, logical: usize) -> Option<T> {
        if logical >= self.len {
            return None;
        }

        let victim_slot = self.physical(logical);
        let victim = self.slots[victim_slot].take();

        if logical == 0 {
            self.head = self.physical(1);
        } else {
            for i in logical..self.len - 1 {
                let from = self.physical(i + 1);
                let to = self.physical(i);
                self.slots[to] = self.slots[from].take();
            }
        }

        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        victim
    }
}
