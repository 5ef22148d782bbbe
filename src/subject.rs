//! Multicast push sources.

mod behavior_subject;
mod publish_subject;

pub use behavior_subject::BehaviorSubject;
pub use publish_subject::Subject;
