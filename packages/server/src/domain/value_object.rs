//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;
use uuid::Uuid;

/// Connection identifier value object.
///
/// Unique per accepted connection, independent of the remote address
/// (several peers may share one address behind a NAT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random ConnectionId (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque message payload.
///
/// The relay never inspects the content; text frames stay text and binary
/// frames stay binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            Payload::Text(text) => text.len(),
            Payload::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Binary(_) => "binary",
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_generate_uniqueness() {
        // テスト項目: ConnectionId::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = ConnectionId::generate();
        let id2 = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }

    #[test]
    fn test_payload_len_and_kind() {
        // テスト項目: Payload のサイズと種別が取得できる
        // given (前提条件):
        let text = Payload::from("hello");
        let binary = Payload::from(vec![0u8, 1, 2]);
        let empty = Payload::from(String::new());

        // then (期待する結果):
        assert_eq!(text.len(), 5);
        assert_eq!(text.kind(), "text");
        assert_eq!(binary.len(), 3);
        assert_eq!(binary.kind(), "binary");
        assert!(empty.is_empty());
    }
}
