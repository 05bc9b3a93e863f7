/*!
 * Ring Buffer
 * Fixed-capacity history that overwrites its oldest entry once full
 *
 * Not synchronized: exactly one task owns an instance (see `manager`).
 */

/// Circular store of the most recent `capacity` entries
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Slot holding the most recent entry; `None` until the first push
    tail: Option<usize>,
}

impl<T: Clone> RingBuffer<T> {
    /// Create an empty buffer
    ///
    /// # Panics
    /// If `capacity` is zero. Configs are validated before a session starts.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            tail: None,
        }
    }

    /// Append an entry, overwriting the oldest one if full
    pub fn push(&mut self, value: T) {
        let next = match self.tail {
            Some(tail) if tail + 1 < self.capacity => tail + 1,
            _ => 0,
        };

        if self.slots.len() < self.capacity {
            // Still filling: slots grow in index order, so `next` is the end
            debug_assert_eq!(next, self.slots.len());
            self.slots.push(value);
        } else {
            self.slots[next] = value;
        }
        self.tail = Some(next);
    }

    /// Copy of all held entries, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        let Some(tail) = self.tail else {
            return Vec::new();
        };

        let mut ordered = Vec::with_capacity(self.slots.len());
        if self.is_full() {
            // Wrapped: everything after the tail is older than everything up to it
            ordered.extend_from_slice(&self.slots[tail + 1..]);
        }
        ordered.extend_from_slice(&self.slots[..=tail]);
        ordered
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed entry
    pub fn latest(&self) -> Option<&T> {
        self.tail.map(|tail| &self.slots[tail])
    }
}
