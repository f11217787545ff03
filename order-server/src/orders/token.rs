//! Short token generation for pickup codes, order codes and table QR codes

use shared::util::short_token;

/// Pickup token length (shown on the guest's screen, typed at the counter)
pub const PICKUP_TOKEN_LEN: usize = 6;

/// Table QR token length (embedded in the printed QR code)
pub const QR_TOKEN_LEN: usize = 12;

/// Random part of the human-readable order code
pub const ORDER_CODE_LEN: usize = 6;

/// Generate a human-readable order code, e.g. `ORD-7FQG9K`
pub fn new_order_code() -> String {
    format!("ORD-{}", short_token(ORDER_CODE_LEN))
}

/// Generate a pickup token candidate. Uniqueness is enforced by the
/// caller against the pickup token table.
pub fn new_pickup_token() -> String {
    short_token(PICKUP_TOKEN_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_code_format() {
        let code = new_order_code();
        assert!(code.starts_with("ORD-"));
        assert_eq!(code.len(), 4 + ORDER_CODE_LEN);
        assert!(code[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_pickup_token_length() {
        assert_eq!(new_pickup_token().len(), PICKUP_TOKEN_LEN);
    }
}
