// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object pools for menu items and panels to avoid per-open allocations.
//!
//! A pool owns every instance it ever created. Instances are addressed by a
//! typed [slotmap] key which stays valid for the lifetime of the pool, so a
//! key held after [ObjectPool::return_to_pool] still resolves; the pool only
//! refuses to hand it back twice.

use crate::error::PoolError;
use slotmap::{Key, SecondaryMap, SlotMap};

/// Creates a new pool instance.
pub type AddInstance<T, C> = Box<dyn FnMut(&mut C) -> T>;

/// Resets an instance when it is returned.
pub type ResetInstance<T, C> = Box<dyn FnMut(&mut T, &mut C)>;

/// A generic object pool with stack reuse.
///
/// `C` is a context handed to the factory and reset callbacks, e.g. the
/// host tree the pooled elements live in. Use `()` when none is needed.
pub struct ObjectPool<K: Key, T, C: ?Sized = ()> {
    /// Every instance the pool owns
    instances: SlotMap<K, T>,
    /// Returned instances, most recently returned last
    available: Vec<K>,
    /// Instances currently checked out
    in_use: SecondaryMap<K, ()>,
    /// Whether an empty pool synthesizes a new instance
    auto_expand: bool,
    add_instance: AddInstance<T, C>,
    reset_instance: Option<ResetInstance<T, C>>,
}

impl<K: Key, T, C: ?Sized> ObjectPool<K, T, C> {
    /// Create an empty pool.
    pub fn new<F>(auto_expand: bool, add_instance: F) -> Self
    where
        F: FnMut(&mut C) -> T + 'static,
    {
        Self {
            instances: SlotMap::with_key(),
            available: Vec::new(),
            in_use: SecondaryMap::new(),
            auto_expand,
            add_instance: Box::new(add_instance),
            reset_instance: None,
        }
    }

    /// Set the callback invoked every time an instance is returned.
    pub fn with_reset<F>(mut self, reset_instance: F) -> Self
    where
        F: FnMut(&mut T, &mut C) + 'static,
    {
        self.reset_instance = Some(Box::new(reset_instance));
        self
    }

    /// The number of instances the pool owns.
    pub fn pool_size(&self) -> usize {
        self.instances.len()
    }

    /// The number of instances ready to be handed out.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// The number of instances currently checked out.
    pub fn in_use(&self) -> usize {
        self.in_use.len()
    }

    /// Check whether an instance is currently checked out.
    pub fn is_in_use(&self, key: K) -> bool {
        self.in_use.contains_key(key)
    }

    /// If true the pool adds a new instance when it runs out.
    pub fn auto_expand(&self) -> bool {
        self.auto_expand
    }

    /// Get an instance by key, whether checked out or not.
    pub fn get(&self, key: K) -> Option<&T> {
        self.instances.get(key)
    }

    /// Get a mutable instance by key, whether checked out or not.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.instances.get_mut(key)
    }

    fn add_pool_instance(&mut self, cx: &mut C) {
        let instance = (self.add_instance)(cx);
        let key = self.instances.insert(instance);
        self.available.push(key);
    }

    /// Ensure there are at least `min_size` instances in the pool.
    pub fn ensure_minimum_size(&mut self, min_size: usize, cx: &mut C) {
        while self.instances.len() < min_size {
            self.add_pool_instance(cx);
        }
    }

    /// Check out the most recently returned instance.
    pub fn get_pooled(&mut self, cx: &mut C) -> Result<K, PoolError> {
        if self.available.is_empty() {
            if !self.auto_expand {
                return Err(PoolError::Exhausted {
                    size: self.instances.len(),
                });
            }
            self.add_pool_instance(cx);
            log::debug!("Pool expanded to {} instances", self.instances.len());
        }

        let key = self.available.pop().ok_or(PoolError::Exhausted {
            size: self.instances.len(),
        })?;
        self.in_use.insert(key, ());
        Ok(key)
    }

    /// Return a checked out instance to the pool.
    pub fn return_to_pool(&mut self, key: K, cx: &mut C) -> Result<(), PoolError> {
        if self.in_use.remove(key).is_none() {
            return Err(PoolError::InvalidReturn);
        }

        if let (Some(reset), Some(instance)) =
            (self.reset_instance.as_mut(), self.instances.get_mut(key))
        {
            reset(instance, cx);
        }
        self.available.push(key);
        Ok(())
    }
}
