//! Pooled-buffer streaming: a producer fills fixed-capacity buffers from a
//! free-list and ships them over a bounded channel; the consumer drains and
//! recycles them. The pool bounds allocation churn, not correctness — with
//! zero slots every `get` allocates fresh.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread;

pub struct BufferPool {
    capacity: usize,
    slots: (Sender<Vec<u64>>, Receiver<Vec<u64>>),
}

impl BufferPool {
    /// `capacity` is the buffer capacity, `slots` how many idle buffers the
    /// pool retains.
    pub fn new(capacity: usize, slots: usize) -> Self {
        Self {
            capacity,
            slots: bounded(slots),
        }
    }

    /// A pooled buffer if one is idle, otherwise a fresh allocation.
    pub fn get(&self) -> Vec<u64> {
        self.slots
            .1
            .try_recv()
            .unwrap_or_else(|_| Vec::with_capacity(self.capacity))
    }

    /// Returns a buffer to the pool; dropped on the floor if the pool is full.
    pub fn put(&self, mut buffer: Vec<u64>) {
        buffer.clear();
        let _ = self.slots.0.try_send(buffer);
    }

    pub fn idle(&self) -> usize {
        self.slots.1.len()
    }
}

const CHANNEL_DEPTH: usize = 64;

/// Streams `0..total` through `chunk`-sized pooled buffers and reassembles
/// the sequence on the consumer side.
pub fn stream_sequence(total: u64, chunk: usize, slots: usize) -> Vec<u64> {
    let pool = Arc::new(BufferPool::new(chunk, slots));
    let (tx, rx) = bounded::<Vec<u64>>(CHANNEL_DEPTH);

    let producer_pool = Arc::clone(&pool);
    let producer = thread::spawn(move || {
        let mut buffer = producer_pool.get();
        for i in 0..total {
            if buffer.len() == chunk {
                if tx.send(buffer).is_err() {
                    return;
                }
                buffer = producer_pool.get();
            }
            buffer.push(i);
        }
        let _ = tx.send(buffer);
        // Dropping the sender ends the consumer's iteration.
    });

    let mut data = Vec::with_capacity(total as usize);
    for buffer in rx {
        data.extend_from_slice(&buffer);
        pool.put(buffer);
    }
    let _ = producer.join();
    data
}
