use std::{future::Future, rc::Rc};

use futures::future::LocalBoxFuture;

/// Error policy for [`try_catch`].
///
/// Errors matched by `allowed` propagate to the caller untouched; every
/// other error is reported to `fallback` (if any) and swallowed, the call
/// resolving with `default_value` (or `T::default()`).
pub struct TryCatchOptions<T, E> {
  allowed: Option<Box<dyn Fn(&E) -> bool>>,
  fallback: Option<Box<dyn FnMut(&E)>>,
  default_value: Option<T>,
}

impl<T, E> Default for TryCatchOptions<T, E> {
  fn default() -> Self {
    Self { allowed: None, fallback: None, default_value: None }
  }
}

impl<T, E> TryCatchOptions<T, E> {
  pub fn new() -> Self { Self::default() }

  /// Errors for which `pred` returns true keep propagating.
  pub fn allowed(mut self, pred: impl Fn(&E) -> bool + 'static) -> Self {
    self.allowed = Some(Box::new(pred));
    self
  }

  /// Observer for swallowed errors.
  pub fn fallback(mut self, cb: impl FnMut(&E) + 'static) -> Self {
    self.fallback = Some(Box::new(cb));
    self
  }

  /// Value returned in place of a swallowed error.
  pub fn default_value(mut self, value: T) -> Self {
    self.default_value = Some(value);
    self
  }
}

type WrappedFn<A, T, E> =
  Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, E>>>;

pub struct TryCatch<A, T: Clone + Default, E> {
  f: WrappedFn<A, T, E>,
  options: crate::rc::MutRc<TryCatchOptions<T, E>>,
}

impl<A, T: Clone + Default, E> Clone for TryCatch<A, T, E> {
  fn clone(&self) -> Self {
    Self { f: self.f.clone(), options: self.options.clone() }
  }
}

/// Wrap a fallible operation with an allow-list error policy.
pub fn try_catch<A, T, E, F, Fut>(
  f: F,
  options: TryCatchOptions<T, E>,
) -> TryCatch<A, T, E>
where
  A: 'static,
  T: Clone + Default + 'static,
  E: 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = Result<T, E>> + 'static,
{
  TryCatch {
    f: Rc::new(move |args| Box::pin(f(args))),
    options: crate::rc::MutRc::own(options),
  }
}

impl<A: 'static, T: Clone + Default + 'static, E: 'static>
  TryCatch<A, T, E>
{
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Result<T, E>> {
    let f = self.f.clone();
    let options = self.options.clone();
    Box::pin(async move {
      match f(args).await {
        Ok(value) => Ok(value),
        Err(err) => {
          let mut options = options.rc_deref_mut();
          let rethrow =
            options.allowed.as_ref().map(|pred| pred(&err)).unwrap_or(false);
          if rethrow {
            return Err(err);
          }
          if let Some(fallback) = options.fallback.as_mut() {
            fallback(&err);
          }
          Ok(options.default_value.clone().unwrap_or_default())
        }
      }
    })
  }
}
