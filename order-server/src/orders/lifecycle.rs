//! Status transition engine
//!
//! Pure functions over `(current, requested, payment_status)` - no storage
//! access, no clock. Every status mutation in the system goes through
//! [`check_transition`]; handlers and the manager never compare statuses
//! by hand.
//!
//! # Transition table
//!
//! | From | Allowed next |
//! |------|--------------|
//! | pending | preparing, cancelled |
//! | preparing | ready, cancelled |
//! | ready | collected, cancelled |
//! | collected | (terminal) |
//! | cancelled | (terminal) |
//!
//! Guard: `collected` additionally requires the order to be fully paid.
//! The payment guard is evaluated first, so collecting an unpaid order
//! reports the payment problem even when the move itself would also be
//! rejected by the table.

use shared::order::{OrderStatus, PaymentStatus};

use crate::orders::OrderError;

/// Allowed next statuses for a given current status
pub fn allowed_next(current: OrderStatus) -> &'static [OrderStatus] {
    match current {
        OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
        OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
        OrderStatus::Ready => &[OrderStatus::Collected, OrderStatus::Cancelled],
        OrderStatus::Collected => &[],
        OrderStatus::Cancelled => &[],
    }
}

/// Validate a requested transition
pub fn check_transition(
    current: OrderStatus,
    requested: OrderStatus,
    payment_status: PaymentStatus,
) -> Result<(), OrderError> {
    // Payment guard comes before the table lookup
    if requested == OrderStatus::Collected && payment_status != PaymentStatus::Paid {
        return Err(OrderError::PaymentRequired);
    }

    if !allowed_next(current).contains(&requested) {
        return Err(OrderError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    Ok(())
}

/// Whether a status ends the order's time on the kitchen board
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Collected | OrderStatus::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderStatus::*;
    use shared::order::PaymentStatus;

    #[test]
    fn test_happy_path() {
        assert!(check_transition(Pending, Preparing, PaymentStatus::Unpaid).is_ok());
        assert!(check_transition(Preparing, Ready, PaymentStatus::Unpaid).is_ok());
        assert!(check_transition(Ready, Collected, PaymentStatus::Paid).is_ok());
    }

    #[test]
    fn test_cancellation_windows() {
        // Cancellation stays open all the way up to collection
        assert!(check_transition(Pending, Cancelled, PaymentStatus::Unpaid).is_ok());
        assert!(check_transition(Preparing, Cancelled, PaymentStatus::Unpaid).is_ok());
        assert!(check_transition(Ready, Cancelled, PaymentStatus::Paid).is_ok());
        // Collected orders are gone; nothing left to cancel
        assert!(matches!(
            check_transition(Collected, Cancelled, PaymentStatus::Paid),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_skipping_stages_rejected() {
        assert!(matches!(
            check_transition(Pending, Ready, PaymentStatus::Paid),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(matches!(
            check_transition(Pending, Collected, PaymentStatus::Paid),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_terminal_states_stay_terminal() {
        for requested in [Pending, Preparing, Ready, Cancelled] {
            assert!(check_transition(Collected, requested, PaymentStatus::Paid).is_err());
        }
        for requested in [Pending, Preparing, Ready] {
            assert!(check_transition(Cancelled, requested, PaymentStatus::Paid).is_err());
        }
        assert!(is_terminal(Collected));
        assert!(is_terminal(Cancelled));
        assert!(!is_terminal(Ready));
    }

    #[test]
    fn test_same_status_is_not_a_transition() {
        assert!(matches!(
            check_transition(Preparing, Preparing, PaymentStatus::Paid),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_payment_guard_wins_over_table() {
        // Unpaid + not ready: the payment problem is reported, not the move
        assert!(matches!(
            check_transition(Pending, Collected, PaymentStatus::Unpaid),
            Err(OrderError::PaymentRequired)
        ));
        assert!(matches!(
            check_transition(Ready, Collected, PaymentStatus::Initiated),
            Err(OrderError::PaymentRequired)
        ));
    }
}
