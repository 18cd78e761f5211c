//! Read-only access to the `YouTube` Data API v3 for comment like counts and
//! video titles.
//!
//! [`YoutubeLookup`] is the capability the enrichment stage depends on;
//! [`YoutubeClient`] is the HTTP implementation of it.

pub mod client;
pub mod error;
pub mod lookup;
pub mod types;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use lookup::YoutubeLookup;
