//! Bounded retry with a fixed delay between attempts
//!
//! Used to tolerate eventual-consistency lag in externally observed state,
//! such as waiting for a search index to reflect a write that just happened.
//!
//! # Features
//!
//! - Fixed attempt count and fixed linear delay (no backoff, no jitter)
//! - The error from the final attempt is surfaced on exhaustion
//! - Optional `RetryPredicate` to stop early on permanent errors
//! - Observable attempts via the `RetryObserver` trait
//! - Built-in `TracingObserver` for logging
//!
//! # Example
//!
//! ```rust,no_run
//! use loadgate_core::retry::{retry_with_policy, RetryError};
//! use loadgate_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::new(3, 50).expect("valid policy");
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("indexed".to_string())
//!     }).await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod predicate;

pub use error::RetryError;
pub use executor::{retry_call, retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use predicate::{AlwaysRetry, ClosurePredicate, NeverRetry, RetryPredicate};
