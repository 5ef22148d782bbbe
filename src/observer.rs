//! The subscribable, disposable reactive handle and its operators.

mod base;
mod iterate;
mod timing;
mod transform;

pub use base::Observer;
pub use iterate::{Iterate, IteratorContext, NextValue};
