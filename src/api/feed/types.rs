use actix_web::web;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

pub type RqUserId = web::Path<UserIdPath>;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// `?preview=true` wraps the XML in an HTML viewer page.
    #[serde(default)]
    pub preview: Option<String>,
}

impl FeedQuery {
    pub fn is_preview(&self) -> bool {
        self.preview.as_deref() == Some("true")
    }
}
