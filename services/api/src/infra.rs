use legal_desk::workflows::session::{SessionId, SessionStore, StoreError, VisitorSession};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage. Sessions disappear when they expire or the service stops.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, VisitorSession>>>,
}

impl InMemorySessionStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, VisitorSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: VisitorSession) -> Result<VisitorSession, StoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn update(&self, session: VisitorSession) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.lock()?.remove(id))
    }

    fn remove_idle(&self, idle_since: Instant) -> Result<Vec<VisitorSession>, StoreError> {
        let mut guard = self.lock()?;
        let idle: Vec<SessionId> = guard
            .values()
            .filter(|session| session.last_seen <= idle_since)
            .map(|session| session.id.clone())
            .collect();
        Ok(idle.iter().filter_map(|id| guard.remove(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn session(id: &str) -> VisitorSession {
        VisitorSession::new(SessionId(id.to_string()), Utc::now())
    }

    #[test]
    fn duplicate_ids_conflict() {
        let store = InMemorySessionStore::default();
        store.create(session("visit-1")).expect("first insert");

        assert!(matches!(
            store.create(session("visit-1")),
            Err(StoreError::Conflict)
        ));
    }

    #[test]
    fn updates_require_an_existing_session() {
        let store = InMemorySessionStore::default();

        assert!(matches!(
            store.update(session("visit-2")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn removed_sessions_are_gone() {
        let store = InMemorySessionStore::default();
        let id = SessionId("visit-3".to_string());
        store.create(session("visit-3")).expect("insert");

        assert!(store.remove(&id).expect("remove").is_some());
        assert!(store.fetch(&id).expect("fetch").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn remove_idle_keeps_recently_seen_sessions() {
        let store = InMemorySessionStore::default();
        store.create(session("visit-stale")).expect("insert");
        tokio::time::advance(Duration::from_secs(120)).await;
        let cutoff = Instant::now() - Duration::from_secs(60);
        store.create(session("visit-fresh")).expect("insert");

        let removed = store.remove_idle(cutoff).expect("sweep");

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, SessionId("visit-stale".to_string()));
        assert!(store
            .fetch(&SessionId("visit-fresh".to_string()))
            .expect("fetch")
            .is_some());
    }
}
