//! Asynchronous control-flow wrappers: the serialized queue, the reentrant
//! lock built on it, and the smaller cancellation/memoization wrappers
//! sharing the [`Outcome`](crate::outcome::Outcome) cancellation idiom.

mod cancelable;
mod debounce;
mod lock;
mod memoize;
mod queued;
mod singlerun;
mod singleshot;
mod trycatch;

pub use cancelable::{cancelable, Cancelable};
pub use debounce::{debounced, Debounced};
pub use lock::{lock, Lock};
pub use memoize::{memoize, Memoized};
pub use queued::{queued, Queued};
pub use singlerun::{singlerun, RunStatus, Singlerun};
pub use singleshot::{singleshot, Singleshot};
pub use trycatch::{try_catch, TryCatch, TryCatchOptions};
