pub mod api;
pub mod comick;
pub mod errors;
pub mod models;
pub mod observability;
pub mod rss;
pub mod security;
