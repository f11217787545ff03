//! Tenant directory and guest session models

use serde::{Deserialize, Serialize};

/// A restaurant on the platform. All tables, menu items, sessions and
/// orders hang off a tenant; lookups are always tenant-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    /// URL-friendly identifier, unique across the platform
    pub slug: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// A physical dining table within one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub tenant_id: String,
    /// Label printed on the physical table ("T1", "Patio 3")
    pub name: String,
    /// Opaque token embedded in the table's QR code (created lazily)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_token: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// One menu item of one tenant. `price` is the current menu price; orders
/// snapshot it at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub is_available: bool,
    pub created_at: i64,
}

/// An anonymous guest's seat at a table, opened by scanning the table QR.
///
/// The `token` is the bearer credential the guest client sends on every
/// request. Sessions expire after a fixed TTL and are swept periodically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestSession {
    pub id: String,
    pub tenant_id: String,
    pub table_id: String,
    pub token: String,
    /// Unix milliseconds
    pub created_at: i64,
    pub expires_at: i64,
}

impl GuestSession {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_boundary() {
        let session = GuestSession {
            id: "s1".into(),
            tenant_id: "t1".into(),
            table_id: "tb1".into(),
            token: "tok".into(),
            created_at: 0,
            expires_at: 1_000,
        };
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1_000));
        assert!(session.is_expired(1_001));
    }
}
