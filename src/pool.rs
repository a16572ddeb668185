//! Optional caller-supplied buffer pooling. The codec itself is happy with
//! plain `Vec<u8>` scratch buffers; this module exists so a caller decoding
//! or encoding at high rates can reuse allocations across calls instead of
//! letting every `DataBlock::encode`/`Decoder::stream_decode` allocate
//! fresh. Mirrors the teacher's fixed-capacity `PgnBytes` discipline,
//! generalized to a caller-owned pool instead of a process-wide static.
use std::sync::Mutex;

/// Checkout/return contract for a byte-buffer pool. Implementations decide
/// their own sizing and eviction policy; the codec only ever calls
/// `acquire` once per buffer and `release` exactly once per acquired
/// buffer, including on every error exit path (enforced here via
/// [`PooledBuffer`]'s `Drop`).
pub trait BufferPool: Send + Sync {
    /// Hand back a buffer with at least `min_capacity` bytes of capacity.
    /// Implementations may return a larger, reused buffer.
    fn acquire(&self, min_capacity: usize) -> Vec<u8>;

    /// Return a buffer for reuse. Implementations typically `clear()` it
    /// and push it back onto a free list.
    fn release(&self, buffer: Vec<u8>);
}

/// RAII guard around a pooled buffer: releases it back to the pool on
/// every exit path, including early returns from `?`, so a caller can
/// never leak a checkout by forgetting to call `release` explicitly.
pub struct PooledBuffer<'a> {
    pool: &'a dyn BufferPool,
    buffer: Option<Vec<u8>>,
}

impl<'a> PooledBuffer<'a> {
    /// Check out a buffer with at least `min_capacity` bytes of capacity.
    pub fn acquire(pool: &'a dyn BufferPool, min_capacity: usize) -> Self {
        Self {
            pool,
            buffer: Some(pool.acquire(min_capacity)),
        }
    }

    pub fn as_vec(&mut self) -> &mut Vec<u8> {
        self.buffer.as_mut().expect("buffer taken before drop")
    }

    /// Detach the buffer without returning it to the pool. Used when
    /// ownership passes to a caller who may hold onto it indefinitely
    /// (e.g. the `Vec<u8>` returned from `DataBlock::encode`), so the
    /// pool should not expect it back.
    pub fn into_inner(mut self) -> Vec<u8> {
        self.buffer.take().expect("buffer taken before drop")
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}

/// A simple `Vec<Vec<u8>>` free-list pool guarded by a mutex. Good enough
/// for a caller that wants pooling without writing their own; production
/// users with stricter latency budgets may supply a lock-free pool instead
/// by implementing [`BufferPool`] directly.
#[derive(Default)]
pub struct VecPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl VecPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferPool for VecPool {
    fn acquire(&self, min_capacity: usize) -> Vec<u8> {
        let mut free = self.free.lock().expect("VecPool mutex poisoned");
        match free.pop() {
            Some(mut buf) => {
                buf.clear();
                if buf.capacity() < min_capacity {
                    buf.reserve(min_capacity - buf.capacity());
                }
                buf
            }
            None => Vec::with_capacity(min_capacity),
        }
    }

    fn release(&self, buffer: Vec<u8>) {
        let mut free = self.free.lock().expect("VecPool mutex poisoned");
        free.push(buffer);
    }
}
