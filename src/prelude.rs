//! Re-exports of the commonly used surface.

pub use crate::emitter::EventEmitter;
pub use crate::flow::{
  cancelable, debounced, lock, memoize, queued, singlerun, singleshot,
  try_catch, Cancelable, Debounced, Lock, Memoized, Queued, RunStatus,
  Singlerun, Singleshot, TryCatch, TryCatchOptions,
};
pub use crate::observer::{Iterate, IteratorContext, NextValue, Observer};
pub use crate::ops;
pub use crate::outcome::Outcome;
pub use crate::source::{
  create, create_cold, create_hot, from_future, from_future_or,
  from_interval, from_iter, from_subject, join, merge, pipe, Feed,
  JoinOptions, Multicast, Unicast,
};
pub use crate::subject::{BehaviorSubject, Subject};
pub use crate::subscription::{Subscription, SubscriptionLike};
