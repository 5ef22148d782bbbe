//! Factory surface: building observers from producer callbacks, wrapping
//! factories unicast/multicast, fan-in combinators, and conversions.

mod cast;
mod create;
mod from_future;
mod from_iter;
mod interval;
mod join;
mod merge;
mod pipe;

pub use cast::{Multicast, Unicast};
pub use create::{create, create_cold, create_hot, Feed};
pub use from_future::{from_future, from_future_or};
pub use from_iter::from_iter;
pub use interval::from_interval;
pub use join::{join, JoinOptions};
pub use merge::merge;
pub use pipe::pipe;

use crate::{observer::Observer, subject::Subject};

/// An observer view over an existing subject.
pub fn from_subject<T: Clone + 'static>(subject: &Subject<T>) -> Observer<T> {
  subject.to_observer()
}
