//! In-memory [`Client`] for testing code that uses entity continuations.
//!
//! Available in this crate's tests and, for downstream crates, behind the `mock` feature.

use crate::client::{BoxFuture, Client};
use crate::entities::base::Entity;
use crate::entities::playlist::Playlist;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A client that answers lookups from a fixed set of playlists.
#[derive(Debug, Default)]
pub struct MockClient {
    playlists: HashMap<String, Playlist>,
    failure: Option<String>,
    lookups: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `playlist` for lookups of its id.
    pub fn with_playlist(mut self, playlist: Playlist) -> Self {
        self.playlists.insert(playlist.id().to_string(), playlist);
        self
    }

    /// Fails every lookup with `message`, as a client with a broken transport would.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// How many lookups have been made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Client for MockClient {
    fn get_playlist<'a>(&'a self, id: &'a str) -> BoxFuture<'a, eyre::Result<Option<Playlist>>> {
        Box::pin(async move {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            tracing::trace!(playlist_id = id, "mock playlist lookup");
            if let Some(message) = &self.failure {
                eyre::bail!("{message}");
            }
            Ok(self.playlists.get(id).cloned())
        })
    }
}
