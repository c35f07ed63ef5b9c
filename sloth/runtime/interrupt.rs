use std::sync::{
   Arc,
   atomic,
};

/// A cooperative cancellation flag.
///
/// Clones share the flag, so a handle can be given to another thread (or a
/// signal handler) while evaluation runs. Forcing polls it once per call on
/// a deferred value.
#[derive(Debug, Default, Clone)]
pub struct Interrupt(Arc<atomic::AtomicBool>);

impl Interrupt {
   #[must_use]
   pub fn new() -> Self {
      Self::default()
   }

   pub fn trigger(&self) {
      self.0.store(true, atomic::Ordering::Relaxed);
   }

   pub fn reset(&self) {
      self.0.store(false, atomic::Ordering::Relaxed);
   }

   #[must_use]
   pub fn is_triggered(&self) -> bool {
      self.0.load(atomic::Ordering::Relaxed)
   }
}
