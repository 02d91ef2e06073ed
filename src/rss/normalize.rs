use crate::models::follow::{Follow, DROPPED_FOLLOW_TYPE};

use super::parse_timestamp;

/// Cap on the number of items in a generated feed.
pub const MAX_FEED_ITEMS: usize = 50;

/// Reduce a raw follow list to the canonical sequence used for both the
/// feed signature and the rendered feed: drop follows without a comic and
/// dropped titles, order by upload time (newest first), cap at
/// [`MAX_FEED_ITEMS`]. The sort is stable, so follows sharing an upload
/// time keep their original order.
pub fn normalize(follows: Vec<Follow>) -> Vec<Follow> {
    let mut kept: Vec<Follow> = follows
        .into_iter()
        .filter(|f| f.comic().is_some())
        .filter(|f| f.follow_type != DROPPED_FOLLOW_TYPE)
        .collect();

    kept.sort_by_key(|f| std::cmp::Reverse(upload_millis(f)));
    kept.truncate(MAX_FEED_ITEMS);
    kept
}

/// Upload time in Unix milliseconds; unparsable or missing timestamps sort
/// as the epoch.
fn upload_millis(follow: &Follow) -> i64 {
    follow
        .comic()
        .and_then(|c| c.uploaded_at.as_deref())
        .and_then(parse_timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}
