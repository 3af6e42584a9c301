//! Lock-free `f32` storage for control → render parameter handoff.
//!
//! The control context writes, the render context reads at block
//! boundaries. Each value is bit-cast into an [`AtomicU32`], so a read
//! always observes a whole value written by some earlier store.

use core::sync::atomic::{AtomicU32, Ordering};

/// An `f32` that can be shared between threads without locks.
///
/// # Example
///
/// ```rust
/// use lustre_core::AtomicF32;
///
/// let cell = AtomicF32::new(0.5);
/// cell.store(0.75);
/// assert_eq!(cell.load(), 0.75);
/// ```
#[derive(Debug, Default)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Create a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Read the current value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Replace the current value.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Relaxed read, for bulk buffers where ordering between cells does
    /// not matter (analyser publication).
    #[inline]
    pub fn load_relaxed(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Relaxed write, counterpart of [`load_relaxed`](Self::load_relaxed).
    #[inline]
    pub fn store_relaxed(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Clone for AtomicF32 {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}
