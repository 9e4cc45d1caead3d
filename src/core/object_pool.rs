//! Pool of pre-initialized, reusable objects.
//!
//! Objects that are expensive to create (loaded models, connections) are
//! added once and then checked out for short periods. A checked-out object
//! is returned automatically when its [`Pooled`] guard drops, after
//! [`Reset::reset`] has cleared any per-use state.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tracing::trace;

/// Clears per-use state before an object goes back to the pool.
pub trait Reset {
    /// Restore the object to its freshly-added state.
    fn reset(&mut self);
}

struct Slots<T> {
    free: Vec<T>,
    in_use: usize,
}

/// Thread-safe pool of reusable objects.
pub struct ObjectPool<T> {
    slots: Mutex<Slots<T>>,
}

impl<T: Reset> ObjectPool<T> {
    /// Create an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                free: Vec::new(),
                in_use: 0,
            }),
        }
    }

    /// Add a ready-to-use object.
    pub fn add(&self, object: T) {
        self.slots.lock().free.push(object);
    }

    /// Take a free object, or `None` if every object is in use.
    pub fn checkout(&self) -> Option<Pooled<'_, T>> {
        let mut slots = self.slots.lock();
        let object = slots.free.pop()?;
        slots.in_use += 1;
        trace!(in_use = slots.in_use, "Object checked out");
        Some(Pooled {
            pool: self,
            object: Some(object),
        })
    }

    /// Objects available for checkout.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.lock().free.len()
    }

    /// Objects currently checked out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.slots.lock().in_use
    }

    fn release(&self, mut object: T) {
        object.reset();
        let mut slots = self.slots.lock();
        slots.in_use -= 1;
        slots.free.push(object);
        trace!(in_use = slots.in_use, "Object released");
    }
}

impl<T: Reset> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reset> FromIterator<T> for ObjectPool<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self {
            slots: Mutex::new(Slots {
                free: iter.into_iter().collect(),
                in_use: 0,
            }),
        }
    }
}

/// Checked-out object; returns to its pool on drop.
pub struct Pooled<'a, T: Reset> {
    pool: &'a ObjectPool<T>,
    object: Option<T>,
}

impl<T: Reset> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.object
            .as_ref()
            .unwrap_or_else(|| unreachable!("object present until drop"))
    }
}

impl<T: Reset> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.object
            .as_mut()
            .unwrap_or_else(|| unreachable!("object present until drop"))
    }
}

impl<T: Reset> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(object) = self.object.take() {
            self.pool.release(object);
        }
    }
}
