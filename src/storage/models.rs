use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Referrer recorded when the request carries none.
pub const DEFAULT_REFERRER: &str = "direct";
/// Coarse geo placeholder; no lookup is performed.
pub const DEFAULT_GEO: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub time: DateTime<Utc>,
    pub referrer: String,
    pub geo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl UrlRecord {
    /// 到期时刻本身即视为过期
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[inline]
    pub fn total_clicks(&self) -> usize {
        self.clicks.len()
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// One row of the full listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    pub record: UrlRecord,
    pub total_clicks: usize,
    pub expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(created_at: DateTime<Utc>, minutes: i64) -> UrlRecord {
        UrlRecord {
            code: "abcd12".to_string(),
            target: "https://example.com".to_string(),
            created_at,
            expires_at: created_at + Duration::minutes(minutes),
            clicks: Vec::new(),
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let rec = record(now, 30);
        assert!(!rec.is_expired_at(now));
        assert!(!rec.is_expired_at(now + Duration::minutes(30) - Duration::milliseconds(1)));
        assert!(rec.is_expired_at(now + Duration::minutes(30)));
        assert!(rec.is_expired_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_total_clicks() {
        let now = Utc::now();
        let mut rec = record(now, 30);
        assert_eq!(rec.total_clicks(), 0);
        rec.clicks.push(ClickEvent {
            time: now,
            referrer: DEFAULT_REFERRER.to_string(),
            geo: DEFAULT_GEO.to_string(),
        });
        assert_eq!(rec.total_clicks(), 1);
    }
}
