//! Full playlists, as returned by a playlist's browse page.

use crate::entities::base::{ClientHandle, Entity};
use crate::entities::channel::Channel;
use crate::entities::video_compact::VideoCompact;
use crate::error::HydrateError;
use crate::raw::{self, Fragment, RawRun, RawText, TextSource};
use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;

const ENTITY: &str = "Playlist";

const METADATA_TITLE: &str = "/metadata/playlistMetadataRenderer/title";
const SIDEBAR_ITEMS: &str = "/sidebar/playlistSidebarRenderer/items";
const VIDEO_LIST: &str = "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/itemSectionRenderer/contents/0/playlistVideoListRenderer/contents";

/// A playlist with its metadata and the videos of its first page.
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
pub struct Playlist {
    /// Playlist id.
    #[builder(setter(into))]
    id: String,

    /// Display title.
    #[builder(setter(into))]
    title: String,

    /// Number of videos in the playlist, or 0 if YouTube's count could not be read.
    #[builder(default)]
    video_count: u64,

    /// Number of views, or 0 if YouTube's count could not be read.
    #[builder(default)]
    view_count: u64,

    /// When the playlist was last updated, as displayed (e.g. `Last updated on Jan 5, 2024`).
    #[builder(setter(into, strip_option), default)]
    last_updated_at: Option<String>,

    /// The channel that owns the playlist, if the page shows one.
    #[builder(setter(into, strip_option), default)]
    channel: Option<Channel>,

    /// The videos listed on the playlist's first page.
    #[builder(default)]
    videos: Vec<VideoCompact>,

    #[builder(default)]
    #[serde(skip)]
    client: ClientHandle,
}

impl Playlist {
    pub fn builder() -> PlaylistBuilder {
        PlaylistBuilder::default()
    }

    /// Hydrates a playlist from a raw browse response.
    ///
    /// Only the first page of videos is read; continuation items are skipped.
    pub fn from_raw(raw: &Value, client: ClientHandle) -> Result<Self, HydrateError> {
        let fragment = Fragment::new(ENTITY, raw)?;

        let sidebar = fragment.array_at(SIDEBAR_ITEMS)?;
        let primary = sidebar_item(&fragment, sidebar, "playlistSidebarPrimaryInfoRenderer")?;
        let secondary = sidebar_item(&fragment, sidebar, "playlistSidebarSecondaryInfoRenderer")?;

        let primary_title = match primary {
            Some(primary) => primary.optional::<RawText>("title")?,
            None => None,
        };
        let primary_title = primary_title.as_ref().and_then(RawText::source);

        let id = match primary_title {
            Some(TextSource::Runs(runs)) => runs.first().and_then(watch_playlist_id),
            _ => None,
        };
        let id = match id {
            Some(id) => id,
            None => fragment
                .optional_at::<String>("/header/playlistHeaderRenderer/playlistId")?
                .ok_or_else(|| fragment.missing("playlistId"))?,
        };

        let title = match fragment.optional_at::<String>(METADATA_TITLE)? {
            Some(title) => title,
            None => primary_title
                .map(|title| title.first().to_string())
                .ok_or_else(|| fragment.missing("title"))?,
        };

        let stats: Vec<RawText> = match primary {
            Some(primary) => primary.optional("stats")?.unwrap_or_default(),
            None => Vec::new(),
        };
        let stats: Vec<String> = stats
            .iter()
            .map(|stat| stat.source().map(TextSource::joined).unwrap_or_default())
            .collect();
        let (video_count, view_count, last_updated_at) = match stats.as_slice() {
            [videos, views, updated] => (
                raw::parse_count(videos),
                raw::parse_count(views),
                Some(updated.clone()),
            ),
            [videos, updated] => (raw::parse_count(videos), None, Some(updated.clone())),
            [videos] => (raw::parse_count(videos), None, None),
            _ => (None, None, None),
        };

        let channel = match secondary {
            Some(secondary) => match secondary.nested("/videoOwner/videoOwnerRenderer")? {
                Some(owner) => Some(Channel::from_owner(&owner, &client)?),
                None => None,
            },
            None => None,
        };

        let videos = fragment
            .array_at(VIDEO_LIST)?
            .iter()
            .filter_map(|entry| entry.get("playlistVideoRenderer"))
            .map(|video| VideoCompact::from_raw(video, client.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(
            playlist_id = %id,
            videos = videos.len(),
            "hydrated playlist"
        );
        Ok(Self {
            id,
            title,
            video_count: video_count.unwrap_or(0),
            view_count: view_count.unwrap_or(0),
            last_updated_at,
            channel,
            videos,
            client,
        })
    }

    /// Re-hydrates this playlist in place, keeping its client.
    pub fn load(&mut self, raw: &Value) -> Result<&mut Self, HydrateError> {
        *self = Self::from_raw(raw, self.client.clone())?;
        Ok(self)
    }

    /// The playlist's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of videos, or 0 when unknown.
    pub fn video_count(&self) -> u64 {
        self.video_count
    }

    /// Number of views, or 0 when unknown.
    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    pub fn last_updated_at(&self) -> Option<&str> {
        self.last_updated_at.as_deref()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn videos(&self) -> &[VideoCompact] {
        &self.videos
    }
}

impl Entity for Playlist {
    fn id(&self) -> &str {
        &self.id
    }

    fn client(&self) -> &ClientHandle {
        &self.client
    }
}

/// Finds the sidebar entry wrapped in `renderer`.
fn sidebar_item<'a>(
    fragment: &Fragment<'a>,
    items: &'a [Value],
    renderer: &'static str,
) -> Result<Option<Fragment<'a>>, HydrateError> {
    items
        .iter()
        .find_map(|item| item.get(renderer))
        .map(|value| {
            Fragment::new(fragment.entity(), value)
                .map_err(|_| fragment.mismatch(renderer, "expected an object"))
        })
        .transpose()
}

fn watch_playlist_id(run: &RawRun) -> Option<String> {
    run.navigation_endpoint
        .as_ref()?
        .watch_endpoint
        .as_ref()?
        .playlist_id
        .clone()
}
