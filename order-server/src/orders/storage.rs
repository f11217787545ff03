//! redb-based storage layer for orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order aggregates |
//! | `open_orders` | `(tenant_id, order_id)` | `()` | Kitchen board index |
//! | `payments` | `(order_id, seq)` | `Payment` | Payment attempts (append-only) |
//! | `order_events` | `(order_id, sequence)` | `OrderEvent` | Audit log (append-only) |
//! | `pickup_tokens` | `token` | `order_id` | Pickup token lookup |
//! | `counters` | `"seq"` | `u64` | Global event sequence |
//!
//! The sequence counter is global, not per-order: event sequence numbers
//! give a total order over the whole audit log. Pickup tokens are keyed
//! globally for the same reason - the counter verifies a bare token with
//! no tenant context.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::{Order, OrderEvent, Payment};
use std::sync::Arc;

use crate::db::StorageResult;

const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const OPEN_ORDERS_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("open_orders");
const PAYMENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("payments");
const ORDER_EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> =
    TableDefinition::new("order_events");
const PICKUP_TOKENS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("pickup_tokens");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const SEQUENCE_KEY: &str = "seq";

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Create the store, initializing its tables
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(ORDER_EVENTS_TABLE)?;
            let _ = write_txn.open_table(PICKUP_TOKENS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(SEQUENCE_KEY)?.is_none() {
                counters.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Begin a write transaction
    ///
    /// redb allows a single writer at a time; every mutating operation in
    /// the manager does all its reads and writes inside one transaction.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Increment and return the global sequence number
    pub fn increment_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(SEQUENCE_KEY, next)?;
        Ok(next)
    }

    /// Get current sequence (read-only)
    pub fn current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    // ========== Orders ==========

    /// Insert or overwrite an order aggregate
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order by ID (read-only)
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Kitchen board index ==========

    /// Add an order to its tenant's open-orders index
    pub fn mark_open(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.insert((tenant_id, order_id), ())?;
        Ok(())
    }

    /// Remove an order from its tenant's open-orders index
    pub fn mark_closed(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.remove((tenant_id, order_id))?;
        Ok(())
    }

    /// All open orders for one tenant
    pub fn list_open_orders(&self, tenant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        let range_start = (tenant_id, "");
        let range_end = (tenant_id, "\u{10ffff}");
        for result in index.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, order_id) = key.value();
            if let Some(value) = orders_table.get(order_id)? {
                orders.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(orders)
    }

    // ========== Payments ==========

    /// Append a payment row at the given sequence slot
    pub fn put_payment(
        &self,
        txn: &WriteTransaction,
        seq: u64,
        payment: &Payment,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENTS_TABLE)?;
        let value = serde_json::to_vec(payment)?;
        table.insert((payment.order_id.as_str(), seq), value.as_slice())?;
        Ok(())
    }

    /// All payment rows for an order, oldest first, with their slot keys
    pub fn list_payments_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Vec<(u64, Payment)>> {
        let table = txn.open_table(PAYMENTS_TABLE)?;
        let mut payments = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);
        for result in table.range(range_start..=range_end)? {
            let (key, value) = result?;
            let (_, seq) = key.value();
            payments.push((seq, serde_json::from_slice(value.value())?));
        }
        Ok(payments)
    }

    /// All payment rows for an order (read-only)
    pub fn list_payments(&self, order_id: &str) -> StorageResult<Vec<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        let mut payments = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            payments.push(serde_json::from_slice(value.value())?);
        }
        Ok(payments)
    }

    // ========== Audit events ==========

    /// Append an audit event
    pub fn append_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_EVENTS_TABLE)?;
        let value = serde_json::to_vec(event)?;
        table.insert((event.order_id.as_str(), event.sequence), value.as_slice())?;
        Ok(())
    }

    /// All events for an order, in sequence order
    pub fn events_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_EVENTS_TABLE)?;

        let mut events = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    // ========== Pickup tokens ==========

    /// Check whether a pickup token is taken (within transaction)
    pub fn pickup_token_exists_txn(
        &self,
        txn: &WriteTransaction,
        token: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PICKUP_TOKENS_TABLE)?;
        Ok(table.get(token)?.is_some())
    }

    /// Bind a pickup token to an order
    pub fn insert_pickup_token(
        &self,
        txn: &WriteTransaction,
        token: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PICKUP_TOKENS_TABLE)?;
        table.insert(token, order_id)?;
        Ok(())
    }

    /// Resolve a pickup token to its order ID (read-only)
    pub fn resolve_pickup_token(&self, token: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PICKUP_TOKENS_TABLE)?;
        Ok(table.get(token)?.map(|guard| guard.value().to_string()))
    }

    /// Resolve a pickup token to its order ID (within transaction)
    pub fn resolve_pickup_token_txn(
        &self,
        txn: &WriteTransaction,
        token: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(PICKUP_TOKENS_TABLE)?;
        Ok(table.get(token)?.map(|guard| guard.value().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use shared::order::{OrderStatus, PaymentStatus};
    use shared::util::now_millis;

    fn storage() -> OrderStorage {
        OrderStorage::new(db::open_in_memory().unwrap()).unwrap()
    }

    fn test_order(id: &str, tenant_id: &str) -> Order {
        Order {
            id: id.to_string(),
            tenant_id: tenant_id.to_string(),
            table_id: "table-1".to_string(),
            guest_session_id: "session-1".to_string(),
            order_code: "ORD-TEST01".to_string(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            subtotal: 10.0,
            tax: 0.0,
            total: 10.0,
            pickup_token: None,
            notes: None,
            lines: vec![],
            created_at: now_millis(),
            updated_at: now_millis(),
        }
    }

    #[test]
    fn test_sequence_increment() {
        let storage = storage();
        assert_eq!(storage.current_sequence().unwrap(), 0);

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.increment_sequence(&txn).unwrap(), 1);
        assert_eq!(storage.increment_sequence(&txn).unwrap(), 2);
        txn.commit().unwrap();

        assert_eq!(storage.current_sequence().unwrap(), 2);
    }

    #[test]
    fn test_order_roundtrip() {
        let storage = storage();
        let order = test_order("o1", "t1");

        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let found = storage.get_order("o1").unwrap().unwrap();
        assert_eq!(found.order_code, "ORD-TEST01");
        assert!(storage.get_order("o2").unwrap().is_none());
    }

    #[test]
    fn test_open_orders_index_is_tenant_scoped() {
        let storage = storage();

        let txn = storage.begin_write().unwrap();
        for (id, tenant) in [("o1", "t1"), ("o2", "t1"), ("o3", "t2")] {
            storage.put_order(&txn, &test_order(id, tenant)).unwrap();
            storage.mark_open(&txn, tenant, id).unwrap();
        }
        txn.commit().unwrap();

        assert_eq!(storage.list_open_orders("t1").unwrap().len(), 2);
        assert_eq!(storage.list_open_orders("t2").unwrap().len(), 1);

        let txn = storage.begin_write().unwrap();
        storage.mark_closed(&txn, "t1", "o1").unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.list_open_orders("t1").unwrap().len(), 1);
    }

    #[test]
    fn test_event_ordering() {
        let storage = storage();

        let txn = storage.begin_write().unwrap();
        for _ in 0..3 {
            let seq = storage.increment_sequence(&txn).unwrap();
            let event = OrderEvent::status_changed(seq, "o1", OrderStatus::Pending);
            storage.append_event(&txn, &event).unwrap();
        }
        txn.commit().unwrap();

        let events = storage.events_for_order("o1").unwrap();
        assert_eq!(events.len(), 3);
        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_pickup_token_binding() {
        let storage = storage();

        let txn = storage.begin_write().unwrap();
        assert!(!storage.pickup_token_exists_txn(&txn, "AAAAAA").unwrap());
        storage.insert_pickup_token(&txn, "AAAAAA", "o1").unwrap();
        assert!(storage.pickup_token_exists_txn(&txn, "AAAAAA").unwrap());
        txn.commit().unwrap();

        assert_eq!(
            storage.resolve_pickup_token("AAAAAA").unwrap().as_deref(),
            Some("o1")
        );
        assert!(storage.resolve_pickup_token("ZZZZZZ").unwrap().is_none());
    }
}
