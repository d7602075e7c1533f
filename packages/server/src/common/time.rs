use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::Timestamp;

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as a domain Timestamp
pub fn now_timestamp() -> Timestamp {
    Timestamp::new(get_utc_timestamp())
}

/// Format Unix milliseconds as RFC 3339 (UTC, millisecond precision)
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        // テスト項目: Unix ミリ秒を RFC 3339 形式に変換できる
        // given (前提条件):
        let millis = 1_672_531_200_123; // 2023-01-01T00:00:00.123Z

        // when (操作):
        let formatted = timestamp_to_rfc3339(millis);

        // then (期待する結果):
        assert_eq!(formatted, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_now_timestamp_is_positive() {
        // テスト項目: 現在時刻は正の値
        assert!(now_timestamp().value() > 0);
    }
}
