use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Timestamp shape used by most v2 endpoints, e.g. `2011/03/23 05:14:20 -0700`.
const SLASHED_FORMAT: &str = "%Y/%m/%d %H:%M:%S %z";

/// The commit endpoints use RFC 3339 (`2011-03-23T05:14:20-07:00`) instead of
/// the slashed form; both are attempted in order.
pub fn parse_api_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_str(raw, SLASHED_FORMAT) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    None
}

/// Serde adapter for optional date fields. A value matching neither accepted
/// format decodes as `None` with a warning rather than failing the record.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = parse_api_date(&value);
        if parsed.is_none() {
            warn!(value = %value, "unparseable date in api payload");
        }
        parsed
    }))
}
