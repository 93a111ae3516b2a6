//! Lock-free cells shared between the control thread and device callbacks.

use atomic_float::AtomicF64;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }

    /// Add `delta` and return the new value.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        self.value.fetch_add(delta, Ordering::AcqRel) + delta
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// One-shot latch: armed once, fired at most once.
///
/// Voices use it for their completion signal. `disarm` and `fire` race
/// safely: whichever swaps first wins, so a detached voice can never fire.
#[derive(Debug)]
#[repr(align(64))]
pub struct OneShot {
    armed: AtomicBool,
}

impl OneShot {
    pub fn armed() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Returns true only for the single caller that consumed the latch.
    #[inline]
    pub fn fire(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }
}
