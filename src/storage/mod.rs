//! In-memory record store
//!
//! Maps short codes to [`UrlRecord`]s and their click logs. The store lives
//! exactly as long as the process; nothing is persisted and nothing is ever
//! deleted. Expiry is evaluated lazily against the injected [`Clock`].

pub mod clock;
pub mod models;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use parking_lot::RwLock;
use tracing::{debug, error, trace};

use crate::config::LinksConfig;
use crate::errors::{LinkstatError, Result};
use crate::utils::{
    DEFAULT_CODE_LENGTH, generate_random_code, is_valid_short_code, validate_url,
    validation_error_message,
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{ClickEvent, CreatedLink, DEFAULT_GEO, DEFAULT_REFERRER, LinkSummary, UrlRecord};

/// Store tuning knobs, usually derived from `[links]` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub default_validity_minutes: i64,
    pub code_length: usize,
    pub max_code_attempts: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_validity_minutes: 30,
            code_length: DEFAULT_CODE_LENGTH,
            max_code_attempts: 32,
        }
    }
}

impl From<&LinksConfig> for StoreSettings {
    fn from(links: &LinksConfig) -> Self {
        Self {
            default_validity_minutes: links.default_validity_minutes,
            code_length: links.code_length,
            max_code_attempts: links.max_code_attempts,
        }
    }
}

#[derive(Default)]
struct Records {
    by_code: HashMap<String, UrlRecord>,
    /// 插入顺序，用于 list_all
    order: Vec<String>,
}

pub struct RecordStore {
    records: RwLock<Records>,
    clock: Arc<dyn Clock>,
    settings: StoreSettings,
    generator: fn(usize) -> String,
}

impl RecordStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: StoreSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Records::default()),
            clock,
            settings,
            generator: generate_random_code,
        }
    }

    /// Replace the random code source.
    pub fn with_code_generator(mut self, generator: fn(usize) -> String) -> Self {
        self.generator = generator;
        self
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Create a record for `target`.
    ///
    /// `validity_minutes` falls back to the configured default; an empty
    /// `requested_code` is treated as absent. Every check runs before the
    /// map is touched, so a failed call never leaves a partial record behind.
    pub fn create(
        &self,
        target: &str,
        validity_minutes: Option<i64>,
        requested_code: Option<&str>,
    ) -> Result<CreatedLink> {
        validate_url(target).map_err(|e| {
            debug!("Rejected target {:?}: {}", target, e);
            LinkstatError::invalid_url(validation_error_message(&e))
        })?;

        let minutes = validity_minutes.unwrap_or(self.settings.default_validity_minutes);
        if minutes <= 0 {
            return Err(LinkstatError::invalid_validity(
                "Validity must be a positive integer (minutes)",
            ));
        }

        let requested_code = requested_code.filter(|c| !c.is_empty());
        if let Some(code) = requested_code
            && !is_valid_short_code(code)
        {
            return Err(LinkstatError::invalid_shortcode(
                "Invalid shortcode format. Must be alphanumeric and 4-10 chars.",
            ));
        }

        let created_at = self.clock.now();
        let expires_at = Duration::try_minutes(minutes)
            .and_then(|validity| created_at.checked_add_signed(validity))
            .ok_or_else(|| LinkstatError::invalid_validity("Validity is too large"))?;

        let mut records = self.records.write();

        let code = match requested_code {
            Some(code) if records.by_code.contains_key(code) => {
                return Err(LinkstatError::shortcode_in_use("Shortcode already in use"));
            }
            Some(code) => code.to_string(),
            None => self.generate_unique_code(&records)?,
        };

        let record = UrlRecord {
            code: code.clone(),
            target: target.to_string(),
            created_at,
            expires_at,
            clicks: Vec::new(),
        };
        records.by_code.insert(code.clone(), record);
        records.order.push(code.clone());

        debug!("Created short code {} -> {} (expires {})", code, target, expires_at);

        Ok(CreatedLink {
            code,
            created_at,
            expires_at,
        })
    }

    /// 每次尝试都检查当前 key 集合，超过上限直接失败
    fn generate_unique_code(&self, records: &Records) -> Result<String> {
        for attempt in 1..=self.settings.max_code_attempts {
            let candidate = (self.generator)(self.settings.code_length);
            if !records.by_code.contains_key(&candidate) {
                return Ok(candidate);
            }
            trace!("Short code collision on attempt {}: {}", attempt, candidate);
        }

        error!(
            "Failed to generate a free short code after {} attempts ({} records)",
            self.settings.max_code_attempts,
            records.by_code.len()
        );
        Err(LinkstatError::internal(format!(
            "short code space exhausted after {} attempts",
            self.settings.max_code_attempts
        )))
    }

    pub fn get(&self, code: &str) -> Option<UrlRecord> {
        self.records.read().by_code.get(code).cloned()
    }

    /// Unknown codes count as expired.
    pub fn is_expired(&self, code: &str) -> bool {
        let now = self.clock.now();
        self.records
            .read()
            .by_code
            .get(code)
            .is_none_or(|record| record.is_expired_at(now))
    }

    /// Append a click if `code` exists and has not expired.
    ///
    /// Returns whether the click was recorded. Unknown and expired codes are
    /// ignored silently.
    pub fn record_click(&self, code: &str, referrer: &str, geo: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.records.write();
        match records.by_code.get_mut(code) {
            Some(record) if !record.is_expired_at(now) => {
                record.clicks.push(ClickEvent {
                    time: now,
                    referrer: referrer.to_string(),
                    geo: geo.to_string(),
                });
                true
            }
            _ => false,
        }
    }

    /// Resolve `code` for a redirect and record the click under one lock.
    pub fn visit(&self, code: &str, referrer: &str, geo: &str) -> Result<String> {
        let now = self.clock.now();
        let mut records = self.records.write();
        let Some(record) = records.by_code.get_mut(code) else {
            return Err(LinkstatError::not_found("Shortcode not found"));
        };
        if record.is_expired_at(now) {
            return Err(LinkstatError::expired("Short link has expired"));
        }

        record.clicks.push(ClickEvent {
            time: now,
            referrer: referrer.to_string(),
            geo: geo.to_string(),
        });
        Ok(record.target.clone())
    }

    /// Every record in insertion order, expired ones included.
    pub fn list_all(&self) -> Vec<LinkSummary> {
        let now = self.clock.now();
        let records = self.records.read();
        records
            .order
            .iter()
            .filter_map(|code| records.by_code.get(code))
            .map(|record| LinkSummary {
                total_clicks: record.total_clicks(),
                expired: record.is_expired_at(now),
                record: record.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_code(_len: usize) -> String {
        "fixed1".to_string()
    }

    #[test]
    fn test_generated_code_uses_configured_length() {
        let store = RecordStore::new(StoreSettings {
            code_length: 8,
            ..StoreSettings::default()
        });
        let created = store.create("https://example.com", None, None).unwrap();
        assert_eq!(created.code.len(), 8);
    }

    #[test]
    fn test_generation_gives_up_after_attempt_cap() {
        let store = RecordStore::default().with_code_generator(constant_code);
        assert_eq!(
            store.create("https://a.example", None, None).unwrap().code,
            "fixed1"
        );

        let err = store.create("https://b.example", None, None).unwrap_err();
        assert!(matches!(err, LinkstatError::Internal(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_requested_code_is_generated() {
        let store = RecordStore::default();
        let created = store.create("https://example.com", None, Some("")).unwrap();
        assert_eq!(created.code.len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_overflowing_validity_is_rejected() {
        let store = RecordStore::default();
        let err = store
            .create("https://example.com", Some(i64::MAX), None)
            .unwrap_err();
        assert!(matches!(err, LinkstatError::InvalidValidity(_)));
        assert!(store.is_empty());
    }
}
