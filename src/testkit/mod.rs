//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`] — [`MemoryStore`](store::MemoryStore), an in-memory
//!   [`StateStore`](crate::store::StateStore) with save accounting and
//!   scriptable failures.
//! - [`notify`] — [`RecordingNotifier`](notify::RecordingNotifier).
//! - [`source`] — [`ScriptedSource`](source::ScriptedSource), a
//!   [`PriceSource`](crate::market::PriceSource) with a fixed outcome.

pub mod notify;
pub mod source;
pub mod store;
