//! Reusable pixmap storage.
//!
//! Layers allocate a scratch pixmap on push and release it on pop. The pool
//! keeps released buffers grouped by size so a push/pop loop at a steady
//! size does not hit the allocator.
//!
//! The pool is `Sync`: one pool may back several layer stacks on different
//! threads.
//!
//! # Example
//!
//! ```rust
//! use blit_core::PixmapPool;
//!
//! let pool = PixmapPool::new();
//! let pm = pool.get(64, 64).unwrap();
//! pool.put(pm);
//! assert_eq!(pool.retained(), 1);
//!
//! // Same size comes back from the pool, cleared.
//! let again = pool.get(64, 64).unwrap();
//! assert!(again.data().iter().all(|&b| b == 0));
//! assert_eq!(pool.retained(), 0);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::{Error, Pixmap, Result};

/// Default number of buffers kept per size.
pub const DEFAULT_MAX_PER_SIZE: usize = 4;

/// Size-bucketed pool of pixmap storage.
#[derive(Debug)]
pub struct PixmapPool {
    buckets: Mutex<HashMap<(i32, i32), Vec<Vec<u8>>>>,
    max_per_size: usize,
}

impl Default for PixmapPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PixmapPool {
    /// Creates a pool retaining [`DEFAULT_MAX_PER_SIZE`] buffers per size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_PER_SIZE)
    }

    /// Creates a pool retaining at most `max_per_size` buffers per size.
    ///
    /// `0` disables retention: every `put` drops the buffer.
    pub fn with_capacity(max_per_size: usize) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_per_size,
        }
    }

    /// Returns a transparent pixmap of the requested size.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] when width or height is not positive.
    pub fn get(&self, width: i32, height: i32) -> Result<Pixmap> {
        if width <= 0 || height <= 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                "width and height must be > 0",
            ));
        }

        let reused = self
            .lock()
            .get_mut(&(width, height))
            .and_then(|bucket| bucket.pop());

        match reused {
            Some(mut data) => {
                debug!(width, height, "pixmap pool: reuse");
                data.fill(0);
                Pixmap::from_vec(width, height, data)
            }
            None => {
                debug!(width, height, "pixmap pool: allocate");
                Pixmap::new(width, height)
            }
        }
    }

    /// Returns a pixmap's storage to the pool.
    pub fn put(&self, pixmap: Pixmap) {
        if self.max_per_size == 0 {
            return;
        }
        let key = pixmap.bounds();
        let mut buckets = self.lock();
        let bucket = buckets.entry(key).or_default();
        if bucket.len() < self.max_per_size {
            bucket.push(pixmap.into_vec());
        }
    }

    /// Total number of buffers currently held.
    pub fn retained(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Drops every retained buffer.
    pub fn purge(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(i32, i32), Vec<Vec<u8>>>> {
        // A poisoned pool only ever holds plain byte vectors, still valid.
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_rejects_bad_sizes() {
        let pool = PixmapPool::new();
        assert!(pool.get(0, 5).unwrap_err().is_dimension_error());
        assert!(pool.get(5, -2).unwrap_err().is_dimension_error());
    }

    #[test]
    fn test_reuse_clears() {
        let pool = PixmapPool::new();
        let mut pm = pool.get(8, 8).unwrap();
        pm.fill(255, 255, 255, 255);
        pool.put(pm);

        let pm = pool.get(8, 8).unwrap();
        assert!(pm.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_buckets_are_per_size() {
        let pool = PixmapPool::new();
        pool.put(Pixmap::new(4, 4).unwrap());
        let other = pool.get(2, 2).unwrap();
        assert_eq!(other.bounds(), (2, 2));
        assert_eq!(pool.retained(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let pool = PixmapPool::with_capacity(2);
        for _ in 0..5 {
            pool.put(Pixmap::new(3, 3).unwrap());
        }
        assert_eq!(pool.retained(), 2);

        pool.purge();
        assert_eq!(pool.retained(), 0);

        let none = PixmapPool::with_capacity(0);
        none.put(Pixmap::new(3, 3).unwrap());
        assert_eq!(none.retained(), 0);
    }

    #[test]
    fn test_pool_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<PixmapPool>();
    }
}
