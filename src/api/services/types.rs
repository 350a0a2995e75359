//! Request/response bodies of the public API

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{ClickEvent, LinkSummary, UrlRecord};

/// ISO-8601 in UTC with millisecond precision, e.g. `2026-10-19T08:30:00.000Z`
pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of `POST /shorturls`.
///
/// `validity` stays a raw JSON number so fractional values can be rejected
/// with a readable message instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateShortUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub validity: Option<serde_json::Number>,
    #[serde(default)]
    pub shortcode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateShortUrlResponse {
    pub shortlink: String,
    pub expiry: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClickView {
    pub time: String,
    pub referrer: String,
    pub geo: String,
}

impl From<&ClickEvent> for ClickView {
    fn from(click: &ClickEvent) -> Self {
        Self {
            time: iso_timestamp(click.time),
            referrer: click.referrer.clone(),
            geo: click.geo.clone(),
        }
    }
}

/// Body of `GET /shorturls/{shortcode}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsResponse {
    pub original_url: String,
    pub created_at: String,
    pub expiry: String,
    pub expired: bool,
    pub total_clicks: usize,
    pub clicks: Vec<ClickView>,
}

impl LinkStatsResponse {
    pub fn from_record(record: &UrlRecord, expired: bool) -> Self {
        Self {
            original_url: record.target.clone(),
            created_at: iso_timestamp(record.created_at),
            expiry: iso_timestamp(record.expires_at),
            expired,
            total_clicks: record.total_clicks(),
            clicks: record.clicks.iter().map(ClickView::from).collect(),
        }
    }
}

/// One element of `GET /shorturls`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkListItem {
    pub shortcode: String,
    pub url: String,
    pub created_at: String,
    pub expiry: String,
    pub expired: bool,
    pub total_clicks: usize,
    pub clicks: Vec<ClickView>,
    pub shortlink: String,
}

impl LinkListItem {
    pub fn new(summary: &LinkSummary, shortlink: String) -> Self {
        let record = &summary.record;
        Self {
            shortcode: record.code.clone(),
            url: record.target.clone(),
            created_at: iso_timestamp(record.created_at),
            expiry: iso_timestamp(record.expires_at),
            expired: summary.expired,
            total_clicks: summary.total_clicks,
            clicks: record.clicks.iter().map(ClickView::from).collect(),
            shortlink,
        }
    }
}
