//! A reusable `Hasher` pool, mirroring a `sync.Pool` of scratch hashers so repeated
//! merkleisation calls don't re-allocate the accumulator buffer on every field. Only
//! available with the `std` feature — the pool's locking needs a real mutex.

#![cfg(feature = "std")]

use alloc::vec::Vec;
use std::sync::Mutex;

use super::{Digest, Hasher, Sha256Digest};

/// A pool of reusable [`Hasher`] accumulators. `acquire` hands out a cleared hasher (fresh or
/// recycled); `release` returns it to the pool for the next caller.
pub struct HasherPool<D: Digest = Sha256Digest> {
    hashers: Mutex<Vec<Hasher<D>>>,
}

impl<D: Digest> HasherPool<D> {
    pub fn new() -> Self {
        Self { hashers: Mutex::new(Vec::new()) }
    }

    /// Hands out a cleared `Hasher`, reusing a pooled one if available.
    pub fn acquire(&self) -> Hasher<D> {
        let mut pooled = self.hashers.lock().expect("hasher pool mutex poisoned");
        match pooled.pop() {
            Some(mut h) => {
                h.reset();
                h
            }
            None => Hasher::new(),
        }
    }

    /// Returns a `Hasher` to the pool for reuse.
    pub fn release(&self, hasher: Hasher<D>) {
        let mut pooled = self.hashers.lock().expect("hasher pool mutex poisoned");
        pooled.push(hasher);
    }
}

impl<D: Digest> Default for HasherPool<D> {
    fn default() -> Self {
        Self::new()
    }
}
