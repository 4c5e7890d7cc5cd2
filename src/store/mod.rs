//! Durable alert-state storage.
//!
//! One logical run owns the state at a time: load at run start, mutate in
//! memory, save at run end if anything changed. There is no locking or
//! versioning protocol; the scheduler guarantees at most one active run.

mod file;
mod gist;
mod state;

pub use file::FileStore;
pub use gist::GistStore;
pub use state::{AlertEntry, AlertState};

use async_trait::async_trait;

use crate::error::StoreError;

/// Remote or local key-value document holding the [`AlertState`].
///
/// Implementations degrade rather than fail the run: the orchestrator maps
/// a load error to an empty state (best-effort notify-always semantics) and
/// logs-and-swallows save errors.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    async fn load(&self) -> Result<AlertState, StoreError>;

    async fn save(&self, state: &AlertState) -> Result<(), StoreError>;
}
