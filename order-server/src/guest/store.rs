//! redb-based guest session store
//!
//! Sessions are keyed by their bearer token (the value the client sends in
//! `X-Guest-Token`). Expired sessions are rejected on lookup and swept by
//! a periodic background task.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::GuestSession;
use shared::util::now_millis;
use std::sync::Arc;

use crate::db::StorageResult;

const GUEST_SESSIONS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("guest_sessions");

/// Guest session store backed by redb
#[derive(Clone)]
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    /// Create the store, initializing its table
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(GUEST_SESSIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Open a new session for a table
    pub fn create(
        &self,
        tenant_id: &str,
        table_id: &str,
        ttl_ms: i64,
    ) -> StorageResult<GuestSession> {
        let now = now_millis();
        let session = GuestSession {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            table_id: table_id.to_string(),
            token: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            expires_at: now + ttl_ms,
        };

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(GUEST_SESSIONS_TABLE)?;
            let value = serde_json::to_vec(&session)?;
            table.insert(session.token.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(session)
    }

    /// Look up a session by its bearer token
    ///
    /// Returns `None` for unknown tokens; expired sessions are returned
    /// as-is so the caller can distinguish "expired" from "unknown".
    pub fn get_by_token(&self, token: &str) -> StorageResult<Option<GuestSession>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GUEST_SESSIONS_TABLE)?;
        match table.get(token)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove all sessions past their expiry. Returns the number removed.
    pub fn sweep_expired(&self) -> StorageResult<usize> {
        let now = now_millis();
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(GUEST_SESSIONS_TABLE)?;

            let mut stale: Vec<String> = Vec::new();
            for result in table.iter()? {
                let (key, value) = result?;
                let session: GuestSession = serde_json::from_slice(value.value())?;
                if session.is_expired(now) {
                    stale.push(key.value().to_string());
                }
            }

            for token in &stale {
                table.remove(token.as_str())?;
            }
            stale.len()
        };
        txn.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn store() -> SessionStore {
        SessionStore::new(db::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_create_and_lookup() {
        let store = store();
        let session = store.create("tenant-1", "table-1", 3_600_000).unwrap();

        let found = store.get_by_token(&session.token).unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.tenant_id, "tenant-1");
        assert!(!found.is_expired(now_millis()));

        assert!(store.get_by_token("no-such-token").unwrap().is_none());
    }

    #[test]
    fn test_expired_session_still_returned() {
        let store = store();
        let session = store.create("tenant-1", "table-1", -1).unwrap();

        let found = store.get_by_token(&session.token).unwrap().unwrap();
        assert!(found.is_expired(now_millis()));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let store = store();
        let dead = store.create("tenant-1", "table-1", -1).unwrap();
        let live = store.create("tenant-1", "table-2", 3_600_000).unwrap();

        let removed = store.sweep_expired().unwrap();
        assert_eq!(removed, 1);

        assert!(store.get_by_token(&dead.token).unwrap().is_none());
        assert!(store.get_by_token(&live.token).unwrap().is_some());

        // Nothing left to sweep
        assert_eq!(store.sweep_expired().unwrap(), 0);
    }
}
