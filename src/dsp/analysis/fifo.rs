//! Lock-free single-producer, single-consumer FIFO of pre-allocated blocks.
//!
//! The slots circulate between two `rtrb` ring buffers: free slots travel
//! from the consumer to the producer, filled slots the other way. A slot is
//! moved, never cloned, so its allocation is reused for the life of the FIFO.

use crate::settings::FIFO_CAPACITY;
use rtrb::RingBuffer;

/// Creates a FIFO with [`FIFO_CAPACITY`] slots, each initialised as a clone
/// of `prototype`.
///
/// Pushing and pulling copy into and out of the slots with
/// [`Clone::clone_from()`], so slot allocations are reused. Give the
/// prototype the length of the largest item that will be pushed (a clone
/// only keeps the length, not spare capacity) and neither side will
/// allocate.
pub fn block_fifo<T: Clone + Send>(prototype: &T) -> (FifoProducer<T>, FifoConsumer<T>) {
    block_fifo_with_capacity(prototype, FIFO_CAPACITY)
}

/// [`block_fifo()`] with an explicit slot count.
///
/// # Panics
///
/// Panics if `capacity` is `0`.
pub fn block_fifo_with_capacity<T: Clone + Send>(
    prototype: &T,
    capacity: usize,
) -> (FifoProducer<T>, FifoConsumer<T>) {
    assert!(capacity > 0, "a FIFO needs at least one slot");

    let (filled_tx, filled_rx) = RingBuffer::new(capacity);
    let (mut free_tx, free_rx) = RingBuffer::new(capacity);

    for _ in 0..capacity {
        // both queues hold every slot, so this never fails
        _ = free_tx.push(prototype.clone());
    }

    (
        FifoProducer { filled: filled_tx, free: free_rx },
        FifoConsumer { filled: filled_rx, free: free_tx },
    )
}

/// The writing end of a block FIFO.
pub struct FifoProducer<T> {
    filled: rtrb::Producer<T>,
    free: rtrb::Consumer<T>,
}

impl<T: Clone> FifoProducer<T> {
    /// Copies `item` into the next free slot. Returns `false`, leaving the
    /// FIFO untouched, if every slot is full.
    pub fn push(&mut self, item: &T) -> bool {
        let Ok(mut slot) = self.free.pop() else {
            return false;
        };

        slot.clone_from(item);
        self.filled.push(slot).is_ok()
    }

    /// The number of filled slots.
    pub fn num_available_for_reading(&self) -> usize {
        self.capacity() - self.filled.slots()
    }

    pub fn capacity(&self) -> usize {
        self.filled.buffer().capacity()
    }
}

/// The reading end of a block FIFO.
pub struct FifoConsumer<T> {
    filled: rtrb::Consumer<T>,
    free: rtrb::Producer<T>,
}

impl<T: Clone> FifoConsumer<T> {
    /// Copies the oldest unread slot into `item`. Returns `false`, leaving
    /// both `item` and the FIFO untouched, if no slot is filled.
    pub fn pull(&mut self, item: &mut T) -> bool {
        let Ok(slot) = self.filled.pop() else {
            return false;
        };

        item.clone_from(&slot);
        self.recycle(slot);
        true
    }

    /// The number of filled slots.
    pub fn num_available_for_reading(&self) -> usize {
        self.filled.slots()
    }

    pub fn capacity(&self) -> usize {
        self.filled.buffer().capacity()
    }

    /// Discards every filled slot.
    pub fn clear(&mut self) {
        while let Ok(slot) = self.filled.pop() {
            self.recycle(slot);
        }
    }

    fn recycle(&mut self, slot: T) {
        // the free queue has room for every slot
        _ = self.free.push(slot);
    }
}

impl<T> std::fmt::Debug for FifoProducer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoProducer")
            .field("capacity", &self.filled.buffer().capacity())
            .field("free", &self.free.slots())
            .finish()
    }
}

impl<T> std::fmt::Debug for FifoConsumer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoConsumer")
            .field("capacity", &self.filled.buffer().capacity())
            .field("available", &self.filled.slots())
            .finish()
    }
}
