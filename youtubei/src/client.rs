//! The client context entities call back into.
//!
//! Entities never talk to YouTube themselves. Anything that needs more data than a raw
//! fragment carries (such as turning a [`PlaylistCompact`](crate::PlaylistCompact) into a full
//! [`Playlist`]) goes through a [`Client`], which the caller supplies when hydrating.

use crate::entities::base::ClientHandle;
use crate::entities::playlist::Playlist;
use eyre::Context;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use tracing::instrument;

/// A boxed, sendable future, as returned by [`Client`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability to fetch full entities by id.
///
/// Implementations own transport, retries, and timeouts; entities only ever forward the id
/// they hold. Entities hydrated by an implementation should be given a [`ClientHandle`]
/// pointing back at it so that their own continuations work.
pub trait Client: Send + Sync {
    /// Fetches the playlist with the given id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(playlist))` - the playlist exists
    /// * `Ok(None)` - there is no playlist with this id
    /// * `Err(_)` - fetching or hydrating failed
    fn get_playlist<'a>(&'a self, id: &'a str) -> BoxFuture<'a, eyre::Result<Option<Playlist>>>;
}

/// A [`Client`] that serves playlists from saved browse responses on disk.
///
/// The playlist with id `PLx` is read from `<root>/PLx.json`. A missing file means the
/// playlist does not exist.
#[derive(Debug)]
pub struct DirClient {
    root: PathBuf,
    this: Weak<DirClient>,
}

impl DirClient {
    pub fn new(root: impl Into<PathBuf>) -> Arc<Self> {
        let root = root.into();
        Arc::new_cyclic(|this| Self {
            root,
            this: this.clone(),
        })
    }

    /// A handle to this client, for hydrating entities that belong to it.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle::from_weak(self.this.clone())
    }

    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn read_playlist(&self, id: &str) -> eyre::Result<Option<Playlist>> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            eyre::bail!("refusing to look up playlist with unsafe id {id:?}");
        }

        let path = self.root.join(format!("{id}.json"));
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved browse response for playlist");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", path.display()));
            }
        };

        let raw: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("parse {} as JSON", path.display()))?;
        let playlist = Playlist::from_raw(&raw, self.handle())
            .with_context(|| format!("hydrate playlist from {}", path.display()))?;

        Ok(Some(playlist))
    }
}

impl Client for DirClient {
    fn get_playlist<'a>(&'a self, id: &'a str) -> BoxFuture<'a, eyre::Result<Option<Playlist>>> {
        Box::pin(self.read_playlist(id))
    }
}
