//! redb-based tenant directory
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tenants` | `tenant_id` | `Tenant` | Tenant records |
//! | `tenant_slugs` | `slug` | `tenant_id` | Slug uniqueness index |
//! | `tables` | `(tenant_id, table_id)` | `DiningTable` | Dining tables per tenant |
//! | `table_qr` | `qr_token` | `(tenant_id, table_id)` | QR token lookup |
//! | `menu_items` | `(tenant_id, item_id)` | `MenuItem` | Menu per tenant |
//!
//! All lookups beyond the QR resolution are keyed by tenant, so one
//! tenant can never read another tenant's tables or menu.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{DiningTable, MenuItem, Tenant};
use shared::util::{now_millis, short_token};
use std::sync::Arc;
use thiserror::Error;

use crate::db::{StorageError, StorageResult};
use crate::orders::token::QR_TOKEN_LEN;

const TENANTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tenants");
const TENANT_SLUGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("tenant_slugs");
const TABLES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("tables");
const TABLE_QR_TABLE: TableDefinition<&str, (&str, &str)> = TableDefinition::new("table_qr");
const MENU_ITEMS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("menu_items");

/// QR token allocation retries before giving up
const MAX_TOKEN_ATTEMPTS: usize = 20;

/// Directory errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Tenant slug already taken: {0}")]
    SlugTaken(String),

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("QR token space exhausted")]
    TokenExhausted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<redb::TransactionError> for DirectoryError {
    fn from(e: redb::TransactionError) -> Self {
        DirectoryError::Storage(e.into())
    }
}

impl From<redb::TableError> for DirectoryError {
    fn from(e: redb::TableError) -> Self {
        DirectoryError::Storage(e.into())
    }
}

impl From<redb::StorageError> for DirectoryError {
    fn from(e: redb::StorageError) -> Self {
        DirectoryError::Storage(e.into())
    }
}

impl From<redb::CommitError> for DirectoryError {
    fn from(e: redb::CommitError) -> Self {
        DirectoryError::Storage(e.into())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(e: serde_json::Error) -> Self {
        DirectoryError::Storage(e.into())
    }
}

/// Tenant directory backed by redb
#[derive(Clone)]
pub struct DirectoryStore {
    db: Arc<Database>,
}

impl DirectoryStore {
    /// Create the store, initializing its tables
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TENANTS_TABLE)?;
            let _ = write_txn.open_table(TENANT_SLUGS_TABLE)?;
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(TABLE_QR_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    // ========== Tenants ==========

    /// Create a tenant. The slug must be unique across the platform.
    pub fn create_tenant(&self, name: &str, slug: &str) -> Result<Tenant, DirectoryError> {
        let tenant = Tenant {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            is_active: true,
            created_at: now_millis(),
        };

        let txn = self.db.begin_write()?;
        {
            let mut slugs = txn.open_table(TENANT_SLUGS_TABLE)?;
            if slugs.get(slug)?.is_some() {
                return Err(DirectoryError::SlugTaken(slug.to_string()));
            }
            slugs.insert(slug, tenant.id.as_str())?;
        }
        {
            let mut tenants = txn.open_table(TENANTS_TABLE)?;
            let value = serde_json::to_vec(&tenant)?;
            tenants.insert(tenant.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(tenant)
    }

    pub fn get_tenant(&self, tenant_id: &str) -> StorageResult<Option<Tenant>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TENANTS_TABLE)?;
        match table.get(tenant_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve a tenant by its public slug
    pub fn get_tenant_by_slug(&self, slug: &str) -> StorageResult<Option<Tenant>> {
        let read_txn = self.db.begin_read()?;
        let slugs = read_txn.open_table(TENANT_SLUGS_TABLE)?;
        let tenant_id = match slugs.get(slug)? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };
        let tenants = read_txn.open_table(TENANTS_TABLE)?;
        match tenants.get(tenant_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Dining tables ==========

    /// Create a dining table under a tenant. The QR token is allocated
    /// lazily on first listing, not here.
    pub fn create_table(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> Result<DiningTable, DirectoryError> {
        let table_row = DiningTable {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            qr_token: None,
            is_active: true,
            created_at: now_millis(),
        };

        let txn = self.db.begin_write()?;
        {
            let tenants = txn.open_table(TENANTS_TABLE)?;
            if tenants.get(tenant_id)?.is_none() {
                return Err(DirectoryError::TenantNotFound(tenant_id.to_string()));
            }
        }
        {
            let mut tables = txn.open_table(TABLES_TABLE)?;
            let value = serde_json::to_vec(&table_row)?;
            tables.insert((tenant_id, table_row.id.as_str()), value.as_slice())?;
        }
        txn.commit()?;
        Ok(table_row)
    }

    pub fn get_table(&self, tenant_id: &str, table_id: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get((tenant_id, table_id))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_tables(&self, tenant_id: &str) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;

        let mut rows = Vec::new();
        let range_start = (tenant_id, "");
        let range_end = (tenant_id, "\u{10ffff}");
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            rows.push(serde_json::from_slice(value.value())?);
        }
        Ok(rows)
    }

    /// Resolve a scanned QR token to its `(tenant_id, table_id)` pair
    pub fn resolve_qr(&self, qr_token: &str) -> StorageResult<Option<(String, String)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_QR_TABLE)?;
        match table.get(qr_token)? {
            Some(value) => {
                let (tenant_id, table_id) = value.value();
                Ok(Some((tenant_id.to_string(), table_id.to_string())))
            }
            None => Ok(None),
        }
    }

    /// List a tenant's tables, allocating a QR token for any table that
    /// does not have one yet.
    ///
    /// The check runs against rows re-read inside the write transaction,
    /// never against an earlier snapshot. A token, once allocated, is
    /// permanent; a concurrent listing either sees it or is serialized
    /// behind the transaction that wrote it.
    pub fn ensure_qr_tokens(&self, tenant_id: &str) -> Result<Vec<DiningTable>, DirectoryError> {
        let rows = self.list_tables(tenant_id)?;
        if rows.iter().all(|t| t.qr_token.is_some()) {
            return Ok(rows);
        }

        let txn = self.db.begin_write()?;
        let mut rows;
        {
            let mut tables = txn.open_table(TABLES_TABLE)?;
            let mut qr = txn.open_table(TABLE_QR_TABLE)?;

            // Re-read under the write lock; the pre-check snapshot is stale
            // the moment another writer commits.
            rows = Vec::new();
            let range_start = (tenant_id, "");
            let range_end = (tenant_id, "\u{10ffff}");
            for result in tables.range(range_start..=range_end)? {
                let (_key, value) = result?;
                let row: DiningTable = serde_json::from_slice(value.value())?;
                rows.push(row);
            }

            for row in rows.iter_mut().filter(|t| t.qr_token.is_none()) {
                let token = allocate_qr_token(&qr)?;
                qr.insert(token.as_str(), (tenant_id, row.id.as_str()))?;
                row.qr_token = Some(token);
                let value = serde_json::to_vec(&row)?;
                tables.insert((tenant_id, row.id.as_str()), value.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(rows)
    }

    // ========== Menu items ==========

    pub fn create_menu_item(
        &self,
        tenant_id: &str,
        name: &str,
        description: Option<String>,
        price: f64,
        is_available: bool,
    ) -> Result<MenuItem, DirectoryError> {
        let item = MenuItem {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            description,
            price,
            is_available,
            created_at: now_millis(),
        };

        let txn = self.db.begin_write()?;
        {
            let tenants = txn.open_table(TENANTS_TABLE)?;
            if tenants.get(tenant_id)?.is_none() {
                return Err(DirectoryError::TenantNotFound(tenant_id.to_string()));
            }
        }
        {
            let mut items = txn.open_table(MENU_ITEMS_TABLE)?;
            let value = serde_json::to_vec(&item)?;
            items.insert((tenant_id, item.id.as_str()), value.as_slice())?;
        }
        txn.commit()?;
        Ok(item)
    }

    pub fn get_menu_item(&self, tenant_id: &str, item_id: &str) -> StorageResult<Option<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        match table.get((tenant_id, item_id))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_menu_items(&self, tenant_id: &str) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;

        let mut items = Vec::new();
        let range_start = (tenant_id, "");
        let range_end = (tenant_id, "\u{10ffff}");
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }
}

fn allocate_qr_token(
    qr: &redb::Table<'_, &str, (&str, &str)>,
) -> Result<String, DirectoryError> {
    for _ in 0..MAX_TOKEN_ATTEMPTS {
        let candidate = short_token(QR_TOKEN_LEN);
        if qr.get(candidate.as_str())?.is_none() {
            return Ok(candidate);
        }
    }
    Err(DirectoryError::TokenExhausted)
}
