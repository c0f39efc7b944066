//! Growable ring buffer of integers backing every input event stream.
//!
//! The queue never grows on its own. Producers push a complete record and then
//! call [`RingEventQueue::grow_if_full`], so a record is never split across a
//! resize and a consumer never sees half of one.

/// Circular `i32` buffer with one sentry slot and on-demand doubling.
#[derive(Debug, Clone)]
pub struct RingEventQueue {
    elements: Vec<i32>,
    read: usize,
    write: usize,
}

impl RingEventQueue {
    /// Create a queue holding up to `capacity` values before it must grow.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring queue capacity must be positive");
        Self {
            elements: vec![0; capacity + 1],
            read: 0,
            write: 0,
        }
    }

    /// Values the queue can hold without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.elements.len() - 1
    }

    /// Values currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.write >= self.read {
            self.write - self.read
        } else {
            self.elements.len() - self.read + self.write
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_next()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.read != self.write
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.read == self.incremented(self.write)
    }

    /// Append a value. The queue must not be full.
    pub fn push(&mut self, value: i32) {
        debug_assert!(!self.is_full(), "push onto a full ring queue");
        self.elements[self.write] = value;
        self.write = self.incremented(self.write);
    }

    /// Remove the oldest value. The queue must not be empty.
    pub fn pop(&mut self) -> i32 {
        debug_assert!(self.has_next(), "pop from an empty ring queue");
        let value = self.elements[self.read];
        self.read = self.incremented(self.read);
        value
    }

    /// Double the usable capacity if the queue is full, keeping FIFO order.
    pub fn grow_if_full(&mut self) {
        if !self.is_full() {
            return;
        }
        let mut grown = vec![0; (self.elements.len() - 1) * 2 + 1];
        let mut count = 0;
        while self.has_next() {
            grown[count] = self.pop();
            count += 1;
        }
        self.elements = grown;
        self.read = 0;
        self.write = count;
    }

    /// Push every field of one record, then grow if that filled the queue.
    ///
    /// The caller must keep the capacity a multiple of the record length.
    pub fn push_record(&mut self, record: &[i32]) {
        for &field in record {
            self.push(field);
        }
        self.grow_if_full();
    }

    /// Pop one record into `record`. Returns `false`, leaving `record`
    /// untouched, if the queue is empty.
    pub fn pop_record(&mut self, record: &mut [i32]) -> bool {
        if !self.has_next() {
            return false;
        }
        for field in record.iter_mut() {
            *field = self.pop();
        }
        true
    }

    fn incremented(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.elements.len() {
            0
        } else {
            next
        }
    }
}
