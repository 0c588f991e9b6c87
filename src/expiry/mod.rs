//! Expiry Module
//!
//! One-shot delayed actions used to remove entries once their TTL elapses.
//!
//! # Components
//! - Scheduler: runs actions after a delay on a tokio runtime
//! - Handle: owned, cancellable reference to one scheduled action

mod scheduler;

pub use scheduler::{ExpiryHandle, ExpiryScheduler};
