use crate::observer::Observer;

/// Suppress an emission whose derived key equals the immediately preceding
/// one.
pub fn distinct_by<T, K>(
  mut key_fn: impl FnMut(&T) -> K + 'static,
) -> impl FnOnce(Observer<T>) -> Observer<T>
where
  T: Clone + 'static,
  K: PartialEq + 'static,
{
  move |source| {
    let mut last: Option<K> = None;
    source.lift(move |value, out| {
      let key = key_fn(&value);
      let changed = last.as_ref() != Some(&key);
      if changed {
        last = Some(key);
      }
      Box::pin(async move {
        if changed {
          out.emit(value).await;
        }
      })
    })
  }
}

/// `distinct_by` with the identity key.
pub fn distinct<T>() -> impl FnOnce(Observer<T>) -> Observer<T>
where
  T: Clone + PartialEq + 'static,
{
  distinct_by(|value: &T| value.clone())
}
