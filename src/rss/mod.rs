pub mod normalize;
pub mod render;
pub mod signature;

pub use normalize::{normalize, MAX_FEED_ITEMS};
pub use render::render_feed;
pub use signature::{build_signature, FeedSignature};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// HTTP-date of the Unix epoch, used when a feed has no dateable content.
pub const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Parse an upstream `uploaded_at` value (RFC 3339).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Render a timestamp as an RFC 1123 HTTP-date, e.g.
/// `Wed, 01 May 2024 12:00:00 GMT`.
pub fn http_date<Tz: TimeZone>(dt: DateTime<Tz>) -> String {
    dt.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_http_dates() {
        let dt = parse_timestamp("2024-05-01T12:00:00Z").unwrap();
        assert_eq!(http_date(dt), "Wed, 01 May 2024 12:00:00 GMT");

        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(http_date(epoch), EPOCH_HTTP_DATE);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
