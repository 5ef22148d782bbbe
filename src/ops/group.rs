use crate::observer::Observer;

/// Batch emissions into arrays of length `by`. A trailing partial group is
/// held until filled; there is no flush.
pub fn group<T: Clone + 'static>(
  by: usize,
) -> impl FnOnce(Observer<T>) -> Observer<Vec<T>> {
  move |source| {
    let mut buffer: Vec<T> = Vec::new();
    source.lift(move |value, out| {
      buffer.push(value);
      let full = (buffer.len() >= by).then(|| std::mem::take(&mut buffer));
      Box::pin(async move {
        if let Some(batch) = full {
          out.emit(batch).await;
        }
      })
    })
  }
}
