use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

/// Cooperative cancellation flag for long matching runs.
///
/// Clones share the same flag. Runs check it between left rows and bail out
/// with [`LinkageError::Cancelled`](crate::LinkageError::Cancelled).
#[derive(Clone, Debug, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }

  /// Returns a guard cancelling the flag when dropped.
  pub fn drop_guard(&self) -> CancelOnDrop {
    CancelOnDrop(self.clone())
  }
}

pub struct CancelOnDrop(Cancellation);

impl Drop for CancelOnDrop {
  fn drop(&mut self) {
    self.0.cancel();
  }
}
