/// Result of an operation that may have been skipped by cooperative
/// cancellation.
///
/// Cancellation is not an error in this crate: a call dropped by
/// `Queued::clear`, superseded in a `Cancelable`, or suppressed after
/// `Queued::cancel` resolves with `Outcome::Canceled` instead of rejecting.
/// A real failure of the wrapped body belongs in the body's own output type
/// (typically a `Result` inside the `Value` variant).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
  Value(T),
  Canceled,
}

impl<T> Outcome<T> {
  /// The carried value, or `None` if the call was canceled.
  pub fn value(self) -> Option<T> {
    match self {
      Outcome::Value(v) => Some(v),
      Outcome::Canceled => None,
    }
  }

  #[inline]
  pub fn is_canceled(&self) -> bool { matches!(self, Outcome::Canceled) }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Outcome::Value(v) => Outcome::Value(f(v)),
      Outcome::Canceled => Outcome::Canceled,
    }
  }
}
