use std::rc::Rc;

use crate::{observer::Observer, rc::MutRc, subscription::Subscription};

/// A tagged factory: every [`observer`](Unicast::observer) call yields an
/// independent underlying observer, so each subscription site gets its own
/// producer run.
pub struct Unicast<T> {
  factory: Rc<dyn Fn() -> Observer<T>>,
}

impl<T> Clone for Unicast<T> {
  fn clone(&self) -> Self { Self { factory: self.factory.clone() } }
}

impl<T: Clone + 'static> Unicast<T> {
  pub fn new(factory: impl Fn() -> Observer<T> + 'static) -> Self {
    Self { factory: Rc::new(factory) }
  }

  /// A fresh, independent observer from the wrapped factory.
  pub fn observer(&self) -> Observer<T> { (self.factory)() }
}

struct MulticastState<T> {
  current: Option<Observer<T>>,
  refs: usize,
}

/// A factory wrapper guaranteeing exactly one underlying observer and one
/// producer run shared across all views: created lazily on the first
/// subscribe, torn down when the last view unsubscribes.
pub struct Multicast<T> {
  factory: Rc<dyn Fn() -> Observer<T>>,
  state: MutRc<MulticastState<T>>,
}

impl<T> Clone for Multicast<T> {
  fn clone(&self) -> Self {
    Self { factory: self.factory.clone(), state: self.state.clone() }
  }
}

impl<T: Clone + 'static> Multicast<T> {
  pub fn new(factory: impl Fn() -> Observer<T> + 'static) -> Self {
    Self {
      factory: Rc::new(factory),
      state: MutRc::own(MulticastState { current: None, refs: 0 }),
    }
  }

  /// The live shared observer, if any subscription currently holds it.
  pub fn get_ref(&self) -> Option<Observer<T>> {
    self.state.rc_deref().current.clone()
  }

  /// A view over the shared underlying observer. Subscribing to the view
  /// acquires (and lazily creates) the shared instance; disposing the view
  /// releases it.
  pub fn observer(&self) -> Observer<T> {
    let factory = self.factory.clone();
    let state = self.state.clone();
    Observer::with_connector(move |child| {
      let underlying = {
        let mut s = state.rc_deref_mut();
        if s.current.is_none() {
          s.current = Some(factory());
        }
        s.refs += 1;
        s.current.clone().unwrap()
      };
      let sub = underlying.connect_async(move |value| {
        let child = child.clone();
        Box::pin(async move { child.emit(value).await })
      });
      let release = Subscription::new(move || {
        let mut s = state.rc_deref_mut();
        s.refs -= 1;
        if s.refs == 0 {
          s.current = None;
        }
      });
      Subscription::join([sub, release])
    })
  }
}
