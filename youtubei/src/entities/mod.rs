//! Typed entities hydrated from raw fragments.
//!
//! Every entity offers the same two ways in:
//!
//! - `from_raw(raw, client)` builds a fresh entity from a raw fragment, and
//! - `load(raw)` re-hydrates an existing one in place, replacing every field.
//!
//! Hydration never performs I/O. Entities that can lead to richer ones expose async
//! continuation methods (such as [`PlaylistCompact::get_playlist`]) that go through the
//! [`Client`](crate::Client) the entity was hydrated for.

pub mod base;
pub mod channel;
pub mod playlist;
pub mod playlist_compact;
pub mod thumbnails;
pub mod video_compact;

pub use base::{ClientHandle, Entity};
pub use channel::Channel;
pub use playlist::Playlist;
pub use playlist_compact::PlaylistCompact;
pub use thumbnails::{Thumbnail, Thumbnails};
pub use video_compact::VideoCompact;
