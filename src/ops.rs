//! Reusable stream transforms, plugged in through
//! [`Observer::operator`](crate::observer::Observer::operator).
//!
//! Each operator is a function returning a closure from the source observer
//! to a derived one:
//!
//! ```rust,no_run
//! use flowkit::{ops, subject::Subject};
//!
//! let subject = Subject::<i32>::new();
//! let first_two = subject.to_observer().operator(ops::take(2));
//! first_two.connect(|v| println!("{v}"));
//! ```

mod count;
mod distinct;
mod group;
mod liveness;
mod pair;
mod skip;
mod stride_tricks;
mod take;

pub use count::{count, Counted};
pub use distinct::{distinct, distinct_by};
pub use group::group;
pub use liveness::liveness;
pub use pair::pair;
pub use skip::skip;
pub use stride_tricks::stride_tricks;
pub use take::take;
