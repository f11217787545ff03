//! Orders manager - the single entry point for order mutations
//!
//! Every mutating operation runs inside one redb write transaction:
//! read the aggregate, validate, apply, append the audit event, commit.
//! redb's single-writer model serializes these transactions, so two
//! concurrent requests can never both act on the same stale read.

use redb::WriteTransaction;
use shared::models::GuestSession;
use shared::order::{
    Order, OrderEvent, OrderStatus, Payment, PaymentMethod, PaymentRecordStatus, PaymentStatus,
};
use shared::request::{CreateOrderRequest, OrderLineRequest};
use shared::util::now_millis;
use std::str::FromStr;

use crate::directory::DirectoryStore;
use crate::orders::storage::OrderStorage;
use crate::orders::{OrderError, lifecycle, money, token};
use shared::order::OrderLine;

/// Pickup token allocation retries before giving up
const MAX_TOKEN_ATTEMPTS: usize = 20;

/// Maximum length of the free-text order note
const MAX_NOTE_LEN: usize = 500;

/// Result of a pickup collection attempt
#[derive(Debug)]
pub struct CollectOutcome {
    pub order: Order,
    /// False when the order had already been handed over earlier
    pub collected_now: bool,
}

/// Order lifecycle manager
#[derive(Clone)]
pub struct OrdersManager {
    storage: OrderStorage,
    directory: DirectoryStore,
}

impl OrdersManager {
    pub fn new(storage: OrderStorage, directory: DirectoryStore) -> Self {
        Self { storage, directory }
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    // ========== Order creation ==========

    /// Create an order within a guest session.
    ///
    /// Prices are snapshotted from the menu at this moment; the totals are
    /// fixed for the order's lifetime.
    pub fn create_order(
        &self,
        session: &GuestSession,
        req: &CreateOrderRequest,
    ) -> Result<Order, OrderError> {
        validate_request(req)?;

        let mut lines = Vec::with_capacity(req.items.len());
        for item_req in &req.items {
            let item = self
                .directory
                .get_menu_item(&session.tenant_id, &item_req.menu_item_id)?
                .ok_or_else(|| {
                    OrderError::Validation(format!(
                        "Unknown menu item: {}",
                        item_req.menu_item_id
                    ))
                })?;
            if !item.is_available {
                return Err(OrderError::Validation(format!(
                    "Menu item not available: {}",
                    item.name
                )));
            }
            lines.push(OrderLine {
                menu_item_id: item.id,
                item_name: item.name,
                quantity: item_req.quantity,
                unit_price: item.price,
                line_total: money::line_total(item.price, item_req.quantity),
            });
        }

        let (subtotal, tax, total) = money::order_totals(&lines);
        let now = now_millis();
        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: session.tenant_id.clone(),
            table_id: session.table_id.clone(),
            guest_session_id: session.id.clone(),
            order_code: token::new_order_code(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            subtotal,
            tax,
            total,
            pickup_token: None,
            notes: req.notes.clone(),
            lines,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        self.storage.put_order(&txn, &order)?;
        self.storage.mark_open(&txn, &order.tenant_id, &order.id)?;
        let seq = self.storage.increment_sequence(&txn)?;
        let event = OrderEvent::status_changed(seq, order.id.clone(), OrderStatus::Pending);
        self.storage.append_event(&txn, &event)?;
        txn.commit()?;

        tracing::info!(
            order_id = %order.id,
            order_code = %order.order_code,
            total = order.total,
            "Order created"
        );
        Ok(order)
    }

    /// Fetch an order on behalf of the guest session that placed it.
    ///
    /// Orders from other sessions or tenants read as not-found; existence
    /// is never leaked across session boundaries.
    pub fn get_order_for_guest(
        &self,
        session: &GuestSession,
        order_id: &str,
    ) -> Result<Order, OrderError> {
        let order = self
            .storage
            .get_order(order_id)?
            .filter(|o| o.tenant_id == session.tenant_id && o.guest_session_id == session.id)
            .ok_or_else(|| OrderError::NotFound(format!("Order not found: {}", order_id)))?;
        Ok(order)
    }

    // ========== Payments ==========

    /// Record a payment attempt for an order.
    ///
    /// A cash attempt is stored as `initiated` and the order stays
    /// `unpaid` until a cashier confirms the money changed hands; every
    /// other method is captured immediately. The order's payment status
    /// only ever moves forward, and settlement issues the pickup token in
    /// the same transaction.
    pub fn record_payment(
        &self,
        session: &GuestSession,
        order_id: &str,
        method: PaymentMethod,
        amount: f64,
    ) -> Result<(Payment, Order), OrderError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(OrderError::Validation(
                "Payment amount must be a non-negative number".to_string(),
            ));
        }
        let amount = money::round(amount);

        let txn = self.storage.begin_write()?;

        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .filter(|o| o.tenant_id == session.tenant_id && o.guest_session_id == session.id)
            .ok_or_else(|| OrderError::NotFound(format!("Order not found: {}", order_id)))?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::Conflict("Order is cancelled".to_string()));
        }
        if order.payment_status == PaymentStatus::Paid {
            return Err(OrderError::Conflict("Order is already paid".to_string()));
        }
        if amount < order.total {
            return Err(OrderError::Validation(format!(
                "Payment amount {} does not cover order total {}",
                amount, order.total
            )));
        }

        let record_status = if method.is_instant_capture() {
            PaymentRecordStatus::Captured
        } else {
            PaymentRecordStatus::Initiated
        };
        let payment = Payment {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            method,
            amount,
            status: record_status,
            created_at: now_millis(),
        };
        let slot = self.storage.increment_sequence(&txn)?;
        self.storage.put_payment(&txn, slot, &payment)?;

        // A cash attempt leaves the order unpaid until the cashier
        // confirms it; settlement is forward-only either way.
        if record_status == PaymentRecordStatus::Captured
            && PaymentStatus::Paid.rank() > order.payment_status.rank()
        {
            order.payment_status = PaymentStatus::Paid;
        }
        order.updated_at = now_millis();

        if order.payment_status == PaymentStatus::Paid {
            self.ensure_pickup_token(&txn, &mut order)?;
        }
        self.storage.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id = %order.id,
            method = %payment.method,
            payment_status = %order.payment_status,
            "Payment recorded"
        );
        Ok((payment, order))
    }

    /// Cashier confirmation of a pending cash payment.
    pub fn confirm_cash_payment(&self, order_id: &str) -> Result<(Payment, Order), OrderError> {
        let txn = self.storage.begin_write()?;

        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound(format!("Order not found: {}", order_id)))?;

        if order.payment_status == PaymentStatus::Paid {
            return Err(OrderError::Conflict("Order is already paid".to_string()));
        }

        let pending = self
            .storage
            .list_payments_txn(&txn, order_id)?
            .into_iter()
            .rev()
            .find(|(_, p)| {
                p.method == PaymentMethod::Cash && p.status == PaymentRecordStatus::Initiated
            });
        let (slot, mut payment) = pending
            .ok_or_else(|| OrderError::Conflict("No pending cash payment".to_string()))?;

        payment.status = PaymentRecordStatus::Captured;
        self.storage.put_payment(&txn, slot, &payment)?;

        order.payment_status = PaymentStatus::Paid;
        order.updated_at = now_millis();
        self.ensure_pickup_token(&txn, &mut order)?;
        self.storage.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(order_id = %order.id, "Cash payment confirmed");
        Ok((payment, order))
    }

    /// Payment history for an order, oldest first
    pub fn list_payments(&self, order_id: &str) -> Result<Vec<Payment>, OrderError> {
        if self.storage.get_order(order_id)?.is_none() {
            return Err(OrderError::NotFound(format!("Order not found: {}", order_id)));
        }
        Ok(self.storage.list_payments(order_id)?)
    }

    // ========== Status transitions ==========

    /// Staff-requested status transition. The requested status arrives as
    /// a raw string so unknown values surface as a domain error.
    pub fn update_status(&self, order_id: &str, requested: &str) -> Result<Order, OrderError> {
        let requested =
            OrderStatus::from_str(requested).map_err(OrderError::InvalidStatus)?;

        let txn = self.storage.begin_write()?;

        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound(format!("Order not found: {}", order_id)))?;

        lifecycle::check_transition(order.status, requested, order.payment_status)?;

        order.status = requested;
        order.updated_at = now_millis();

        let seq = self.storage.increment_sequence(&txn)?;
        let event = OrderEvent::status_changed(seq, order.id.clone(), requested);
        self.storage.append_event(&txn, &event)?;

        if lifecycle::is_terminal(requested) {
            self.storage.mark_closed(&txn, &order.tenant_id, &order.id)?;
        }
        self.storage.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
        Ok(order)
    }

    /// Open orders for one tenant, optionally filtered by status
    pub fn list_open_orders(
        &self,
        tenant_id: &str,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.storage.list_open_orders(tenant_id)?;
        if let Some(status) = status {
            orders.retain(|o| o.status == status);
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    // ========== Pickup ==========

    /// Resolve a pickup token without changing anything
    pub fn lookup_pickup(&self, pickup_token: &str) -> Result<Order, OrderError> {
        let order_id = self
            .storage
            .resolve_pickup_token(pickup_token)?
            .ok_or_else(|| OrderError::NotFound("Unknown pickup token".to_string()))?;
        self.storage
            .get_order(&order_id)?
            .ok_or_else(|| OrderError::NotFound("Unknown pickup token".to_string()))
    }

    /// Hand the order over against its pickup token.
    ///
    /// Collecting twice is not an error: the second attempt reports
    /// `collected_now = false` and changes nothing. A double scan at the
    /// counter must never produce two transitions or two audit events.
    pub fn collect_pickup(&self, pickup_token: &str) -> Result<CollectOutcome, OrderError> {
        let txn = self.storage.begin_write()?;

        let order_id = self
            .storage
            .resolve_pickup_token_txn(&txn, pickup_token)?
            .ok_or_else(|| OrderError::NotFound("Unknown pickup token".to_string()))?;
        let mut order = self
            .storage
            .get_order_txn(&txn, &order_id)?
            .ok_or_else(|| OrderError::NotFound("Unknown pickup token".to_string()))?;

        if order.status == OrderStatus::Collected {
            return Ok(CollectOutcome {
                order,
                collected_now: false,
            });
        }

        lifecycle::check_transition(order.status, OrderStatus::Collected, order.payment_status)?;

        order.status = OrderStatus::Collected;
        order.updated_at = now_millis();

        let seq = self.storage.increment_sequence(&txn)?;
        let event = OrderEvent::status_changed(seq, order.id.clone(), OrderStatus::Collected);
        self.storage.append_event(&txn, &event)?;
        self.storage.mark_closed(&txn, &order.tenant_id, &order.id)?;
        self.storage.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(order_id = %order.id, "Order collected");
        Ok(CollectOutcome {
            order,
            collected_now: true,
        })
    }

    /// Issue the order's pickup token if it does not have one yet.
    ///
    /// Tokens are allocated against the global token table and never
    /// reassigned; a collision simply retries with a fresh candidate.
    fn ensure_pickup_token(
        &self,
        txn: &WriteTransaction,
        order: &mut Order,
    ) -> Result<String, OrderError> {
        if let Some(existing) = &order.pickup_token {
            return Ok(existing.clone());
        }

        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let candidate = token::new_pickup_token();
            if self.storage.pickup_token_exists_txn(txn, &candidate)? {
                continue;
            }
            self.storage.insert_pickup_token(txn, &candidate, &order.id)?;
            order.pickup_token = Some(candidate.clone());

            let seq = self.storage.increment_sequence(txn)?;
            let event = OrderEvent::pickup_token_issued(seq, order.id.clone(), &candidate);
            self.storage.append_event(txn, &event)?;

            tracing::info!(order_id = %order.id, token = %candidate, "Pickup token issued");
            return Ok(candidate);
        }
        Err(OrderError::TokenExhausted)
    }
}

fn validate_request(req: &CreateOrderRequest) -> Result<(), OrderError> {
    if req.items.is_empty() {
        return Err(OrderError::Validation(
            "Order must contain at least one item".to_string(),
        ));
    }
    for OrderLineRequest { quantity, .. } in &req.items {
        if *quantity < 1 {
            return Err(OrderError::Validation(format!(
                "Quantity must be positive, got {}",
                quantity
            )));
        }
        if *quantity > money::MAX_QUANTITY {
            return Err(OrderError::Validation(format!(
                "Quantity exceeds maximum allowed ({}), got {}",
                money::MAX_QUANTITY,
                quantity
            )));
        }
    }
    if let Some(notes) = &req.notes
        && notes.len() > MAX_NOTE_LEN
    {
        return Err(OrderError::Validation(format!(
            "Note exceeds {} characters",
            MAX_NOTE_LEN
        )));
    }
    Ok(())
}
