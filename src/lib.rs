//! # flowkit: push-based streams and async control flow
//!
//! A single-threaded reactive toolkit: subscribable [`Observer`] handles
//! with auto-disposal and transformation operators, multicast
//! [`Subject`]s, a factory [`source`] surface, and a family of
//! control-flow wrappers ([`flow`]) for serializing, gating, debouncing,
//! and memoizing asynchronous operations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowkit::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let subject = Subject::<i32>::new();
//! subject
//!   .to_observer()
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .connect(|v| println!("value: {v}"));
//! subject.next(4).await;
//! # });
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Subscribable, disposable stream handle with operators |
//! | [`Subject`] / [`BehaviorSubject`] | Multicast push sources |
//! | [`Subscription`] | Handle to detach a listener |
//! | [`Outcome`] | Value-or-canceled result of flow wrappers |
//! | [`Queued`] / [`Lock`] | FIFO serialization and a reentrant gate over it |
//!
//! Everything is `!Send` by design: handles are `Rc`-based and meant for a
//! cooperatively scheduled single thread. Timing operators and cold
//! sources spawn their work with `tokio::task::spawn_local`, so they must
//! run inside a `tokio::task::LocalSet`.
//!
//! [`Observer`]: observer::Observer
//! [`Subject`]: subject::Subject
//! [`BehaviorSubject`]: subject::BehaviorSubject
//! [`Subscription`]: subscription::Subscription
//! [`Outcome`]: outcome::Outcome
//! [`Queued`]: flow::Queued
//! [`Lock`]: flow::Lock

pub mod emitter;
pub mod flow;
pub mod observer;
pub mod ops;
pub mod outcome;
pub mod prelude;
pub mod rc;
pub mod source;
pub mod subject;
pub mod subscription;
