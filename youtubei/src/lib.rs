//! Typed entities for YouTube's internal web API.
//!
//! YouTube's web client talks to an undocumented JSON API whose responses describe the same
//! thing in several historically-accumulated shapes. This crate turns fragments of those
//! responses into stable, typed entities: [`PlaylistCompact`], [`Playlist`], [`VideoCompact`],
//! [`Channel`] and [`Thumbnails`].
//!
//! Fetching the responses is not this crate's job. Callers hand each entity a raw fragment
//! they already have, along with a [`ClientHandle`] to the [`Client`] that continuation
//! methods should use to fetch more.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use youtubei::{ClientHandle, Entity, PlaylistCompact};
//!
//! let raw = json!({
//!     "playlistId": "PLabc",
//!     "title": {"runs": [{"text": "My Mix"}]},
//!     "thumbnail": {"thumbnails": [{"url": "https://i.ytimg.com/a.jpg", "width": 120, "height": 90}]},
//!     "videoCount": "1,234",
//!     "shortBylineText": {"simpleText": "YouTube"}
//! });
//!
//! let playlist = PlaylistCompact::from_raw(&raw, ClientHandle::detached())?;
//! assert_eq!(playlist.id(), "PLabc");
//! assert_eq!(playlist.title(), "My Mix");
//! assert_eq!(playlist.video_count(), 1234);
//! assert!(playlist.channel().is_none());
//! # Ok::<(), youtubei::HydrateError>(())
//! ```

pub mod client;
pub mod entities;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod raw;

pub use client::{BoxFuture, Client, DirClient};
pub use entities::{
    Channel, ClientHandle, Entity, Playlist, PlaylistCompact, Thumbnail, Thumbnails, VideoCompact,
};
pub use error::HydrateError;
pub use raw::SITE_ORIGIN;
