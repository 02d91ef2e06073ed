pub mod client;

pub use client::ComickClient;
