//! Persisted document shapes and the stable storage keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version stamped into the catalog sidecar; compared lexicographically by
/// the migration pass.
pub const CONFIG_VERSION: &str = "1.0";

/// Storage key for the exported catalog document.
pub const OPTIONS_KEY: &str = "limn.options";
/// Storage key for the catalog's version/timestamp sidecar.
pub const OPTIONS_META_KEY: &str = "limn.options.meta";
/// Storage key for the saved-character roster.
pub const ROSTER_KEY: &str = "limn.characters";

/// Sidecar stored next to the catalog document. Unused beyond storage today;
/// the version feeds future migrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl CatalogMeta {
    /// Sidecar for a write happening at `now`.
    #[must_use]
    pub fn current(now: DateTime<Utc>) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn meta_round_trips_with_rfc3339_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let meta = CatalogMeta::current(now);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"version\":\"1.0\""));
        assert!(json.contains("2024-01-15T10:30:00Z"));
        let back: CatalogMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
