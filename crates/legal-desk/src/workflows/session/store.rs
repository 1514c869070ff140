use tokio::time::Instant;

use super::domain::{SessionId, VisitorSession};

/// Storage abstraction for visitor sessions.
///
/// Sessions are read and written as whole records. The analysis desk inside a session
/// is shared, so a fetched copy still observes a run started through another copy.
pub trait SessionStore: Send + Sync {
    fn create(&self, session: VisitorSession) -> Result<VisitorSession, StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError>;
    fn update(&self, session: VisitorSession) -> Result<(), StoreError>;
    fn remove(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError>;
    /// Removes and returns every session last seen at or before `idle_since`.
    fn remove_idle(&self, idle_since: Instant) -> Result<Vec<VisitorSession>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
