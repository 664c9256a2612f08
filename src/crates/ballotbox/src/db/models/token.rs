//! Voting credential model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A voting credential handed out as a QR code
///
/// Tokens carry no used-flag: whether a token has voted on a ballot item is
/// answered by the presence of a matching row in `votes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Token {
    /// Opaque credential (UUID v4)
    pub token: String,

    /// Sequential label printed next to the QR code
    pub serial_number: i64,

    /// Creation timestamp
    pub created_at: String,
}

impl Token {
    /// Create a fresh token with the given serial
    pub fn generate(serial_number: i64) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            serial_number,
            created_at: super::timestamp_now(),
        }
    }

    /// Serial formatted the way it is printed on credentials (zero-padded to 3)
    pub fn label(&self) -> String {
        format!("{:03}", self.serial_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = Token::generate(1);
        let b = Token::generate(2);
        assert_ne!(a.token, b.token);
        assert!(Uuid::parse_str(&a.token).is_ok());
    }

    #[test]
    fn test_label_padding() {
        assert_eq!(Token::generate(7).label(), "007");
        assert_eq!(Token::generate(1234).label(), "1234");
    }
}
