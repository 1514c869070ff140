//! Visitor sessions: everything a single browsing visitor has touched (open panels,
//! the FAQ, the chat transcript, the document analysis, and the last form results),
//! plus the service and HTTP routes that operate on them.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{SessionId, SessionView, VisitorSession};
pub use router::desk_router;
pub use service::{AnalysisStarted, DeskError, DeskService, Rendered};
pub use store::{SessionStore, StoreError};
