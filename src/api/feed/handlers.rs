use actix_web::{get, http::header, web, HttpRequest, HttpResponse};
use askama::Template;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{FeedQuery, RqUserId};
use crate::{
    comick::ComickClient,
    errors::{AppError, AppResult},
    rss::{build_signature, normalize, render_feed, FeedSignature},
};

/// Comick user IDs are UUID-shaped; anything outside this class is rejected
/// before any upstream call is made.
static USER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-f0-9-]+$").unwrap());

/// Five-minute shared/private freshness window with stale-serving tolerance.
const CACHE_POLICY: &str =
    "public, s-maxage=300, max-age=300, stale-while-revalidate=60, stale-if-error=3600";

#[derive(Template)]
#[template(path = "preview.html")]
struct PreviewTemplate<'a> {
    xml: &'a str,
}

#[get("/{user_id}")]
pub async fn get_feed(
    req: HttpRequest,
    client: web::Data<ComickClient>,
    path: RqUserId,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let user_id = &path.user_id;
    if !USER_ID_RE.is_match(user_id) {
        return Err(AppError::InvalidUserId);
    }

    let follows = client.fetch_follows(user_id).await?;
    if follows.is_empty() {
        return Err(AppError::NoFollows);
    }

    let canonical = normalize(follows);
    let signature = build_signature(&canonical);

    if !query.is_preview() && not_modified(&req, &signature) {
        log::debug!("Feed unchanged for user {}, returning 304", user_id);
        return Ok(HttpResponse::NotModified()
            .insert_header((header::ETAG, signature.etag))
            .insert_header((header::LAST_MODIFIED, signature.last_modified))
            .insert_header((header::CACHE_CONTROL, CACHE_POLICY))
            .finish());
    }

    let conn = req.connection_info();
    let base_url = format!("{}://{}", conn.scheme(), conn.host());
    let xml = render_feed(
        &canonical,
        user_id,
        &base_url,
        Some(&signature.last_modified),
        Utc::now(),
    );

    if query.is_preview() {
        let page = PreviewTemplate { xml: &xml }
            .render()
            .map_err(|e| AppError::Render(e.to_string()))?;
        return Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page));
    }

    Ok(HttpResponse::Ok()
        .content_type("application/rss+xml; charset=utf-8")
        .insert_header((header::ETAG, signature.etag))
        .insert_header((header::LAST_MODIFIED, signature.last_modified))
        .insert_header((header::CACHE_CONTROL, CACHE_POLICY))
        .insert_header((header::VARY, "Accept-Encoding"))
        .body(xml))
}

/// Conditional-GET check. `If-None-Match` is authoritative when present;
/// otherwise `If-Modified-Since` is compared against the signature's
/// Last-Modified.
fn not_modified(req: &HttpRequest, signature: &FeedSignature) -> bool {
    if let Some(if_none_match) = header_str(req, header::IF_NONE_MATCH) {
        return if_none_match == signature.etag;
    }

    if let Some(if_modified_since) = header_str(req, header::IF_MODIFIED_SINCE) {
        if let (Ok(since), Ok(current)) = (
            DateTime::parse_from_rfc2822(if_modified_since),
            DateTime::parse_from_rfc2822(&signature.last_modified),
        ) {
            return current <= since;
        }
    }

    false
}

fn header_str(req: &HttpRequest, name: header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn signature() -> FeedSignature {
        FeedSignature {
            etag: "W/\"abc123\"".to_string(),
            last_modified: "Wed, 01 May 2024 12:00:00 GMT".to_string(),
        }
    }

    #[test]
    fn matching_etag_is_not_modified() {
        let req = TestRequest::default()
            .insert_header((header::IF_NONE_MATCH, "W/\"abc123\""))
            .to_http_request();
        assert!(not_modified(&req, &signature()));
    }

    #[test]
    fn mismatched_etag_wins_over_if_modified_since() {
        let req = TestRequest::default()
            .insert_header((header::IF_NONE_MATCH, "W/\"other\""))
            .insert_header((header::IF_MODIFIED_SINCE, "Wed, 01 May 2024 12:00:00 GMT"))
            .to_http_request();
        assert!(!not_modified(&req, &signature()));
    }

    #[test]
    fn if_modified_since_uses_not_after_comparison() {
        let same = TestRequest::default()
            .insert_header((header::IF_MODIFIED_SINCE, "Wed, 01 May 2024 12:00:00 GMT"))
            .to_http_request();
        assert!(not_modified(&same, &signature()));

        let later = TestRequest::default()
            .insert_header((header::IF_MODIFIED_SINCE, "Thu, 02 May 2024 12:00:00 GMT"))
            .to_http_request();
        assert!(not_modified(&later, &signature()));

        let earlier = TestRequest::default()
            .insert_header((header::IF_MODIFIED_SINCE, "Tue, 30 Apr 2024 12:00:00 GMT"))
            .to_http_request();
        assert!(!not_modified(&earlier, &signature()));
    }

    #[test]
    fn garbage_if_modified_since_is_ignored() {
        let req = TestRequest::default()
            .insert_header((header::IF_MODIFIED_SINCE, "yesterday-ish"))
            .to_http_request();
        assert!(!not_modified(&req, &signature()));
    }

    #[test]
    fn user_id_character_class() {
        assert!(USER_ID_RE.is_match("0a1b2c3d-4e5f-6789-abcd-ef0123456789"));
        assert!(USER_ID_RE.is_match("ABCDEF-123"));
        assert!(!USER_ID_RE.is_match("not-a-valid-id!"));
        assert!(!USER_ID_RE.is_match("../etc/passwd"));
        assert!(!USER_ID_RE.is_match(""));
    }
}
