use crate::observer::Observer;

/// Emit sliding windows of length `size`, advancing by `step`, over each
/// array-shaped emission. Windows never cross emission boundaries; a tail
/// shorter than `size` is dropped.
pub fn stride_tricks<U: Clone + 'static>(
  size: usize,
  step: usize,
) -> impl FnOnce(Observer<Vec<U>>) -> Observer<Vec<U>> {
  move |source| {
    source.lift(move |value: Vec<U>, out| {
      let windows: Vec<Vec<U>> = value
        .windows(size)
        .step_by(step.max(1))
        .map(|w| w.to_vec())
        .collect();
      Box::pin(async move {
        for window in windows {
          out.emit(window).await;
        }
      })
    })
  }
}
