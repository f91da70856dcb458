//! Shared presentation helpers for resource views

use chrono::{DateTime, Duration, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;

use super::StringMap;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata common to every namespaced or cluster-scoped resource view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "StringMap::is_empty")]
    pub labels: StringMap,
    #[serde(skip_serializing_if = "StringMap::is_empty")]
    pub annotations: StringMap,
    pub creation_timestamp: String,
    pub resource_version: String,
}

impl From<ObjectMeta> for ResourceMeta {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            name: meta.name.unwrap_or_default(),
            namespace: meta.namespace.unwrap_or_default(),
            labels: meta.labels.unwrap_or_default(),
            annotations: meta.annotations.unwrap_or_default(),
            creation_timestamp: meta
                .creation_timestamp
                .map(|time| format_timestamp(time.0))
                .unwrap_or_default(),
            resource_version: meta.resource_version.unwrap_or_default(),
        }
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Coarse human age: `< 1m`, `5m`, `3h`, `2d`, `1w`, `4mon`, `2y`.
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created);

    if age < Duration::minutes(1) {
        return "< 1m".to_string();
    }
    if age < Duration::hours(1) {
        return format!("{}m", age.num_minutes());
    }
    if age < Duration::hours(24) {
        return format!("{}h", age.num_hours());
    }
    if age < Duration::days(7) {
        return format!("{}d", age.num_days());
    }
    if age < Duration::days(30) {
        return format!("{}w", age.num_weeks());
    }
    if age < Duration::days(365) {
        return format!("{}mon", age.num_days() / 30);
    }
    format!("{}y", age.num_days() / 365)
}
