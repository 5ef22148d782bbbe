use crate::{observer::Observer, subject::Subject, subscription::Subscription};

/// Build a custom combinator: `emitter` receives a fresh subject to push
/// results into and the source observer to read from, and returns the
/// teardown for whatever wiring it sets up. The result is the subject's
/// observer view, connected lazily like any derived observer.
pub fn pipe<T, U>(
  target: &Observer<T>,
  emitter: impl FnOnce(Subject<U>, Observer<T>) -> Subscription + 'static,
) -> Observer<U>
where
  T: Clone + 'static,
  U: Clone + 'static,
{
  let target = target.clone();
  Observer::with_connector(move |child| {
    let subject = Subject::new();
    let forward = subject.subscribe_async(move |value| {
      let child = child.clone();
      Box::pin(async move { child.emit(value).await })
    });
    let teardown = emitter(subject, target);
    Subscription::join([forward, teardown])
  })
}
