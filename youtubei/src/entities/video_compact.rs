//! Compact videos, as listed in playlists and search results.

use crate::entities::base::{ClientHandle, Entity};
use crate::entities::channel::Channel;
use crate::entities::thumbnails::Thumbnails;
use crate::error::HydrateError;
use crate::raw::{self, Fragment, RawText, TextSource, ThumbnailSource};
use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;

const ENTITY: &str = "VideoCompact";

/// A video as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
pub struct VideoCompact {
    /// Video id, the `v=` parameter of a watch URL.
    #[builder(setter(into))]
    id: String,

    /// Display title.
    #[builder(setter(into), default)]
    title: String,

    /// Length in seconds. `None` for live streams, which have no length yet.
    #[builder(setter(strip_option), default)]
    duration: Option<u32>,

    /// Video thumbnails, smallest first.
    #[builder(default)]
    thumbnails: Thumbnails,

    #[builder(setter(into, strip_option), default)]
    channel: Option<Channel>,

    /// View count, if the listing shows one.
    #[builder(setter(strip_option), default)]
    view_count: Option<u64>,

    #[builder(default)]
    #[serde(skip)]
    client: ClientHandle,
}

impl VideoCompact {
    pub fn builder() -> VideoCompactBuilder {
        VideoCompactBuilder::default()
    }

    /// Hydrates a video from a raw `videoRenderer` or `playlistVideoRenderer` fragment.
    pub fn from_raw(raw: &Value, client: ClientHandle) -> Result<Self, HydrateError> {
        let fragment = Fragment::new(ENTITY, raw)?;

        let id: String = fragment.required("videoId")?;
        let title = raw::required_text(&fragment, "title")?;

        let duration = match fragment.value("lengthSeconds") {
            Some(seconds) => raw::count_of(seconds).and_then(|s| u32::try_from(s).ok()),
            None => fragment
                .optional::<RawText>("lengthText")?
                .as_ref()
                .and_then(RawText::source)
                .and_then(|text| raw::parse_clock(&text.joined())),
        };

        let thumbnails = Thumbnails::from_source(&ThumbnailSource::resolve(&fragment)?);

        // playlist entries carry a short byline, search results only the owner text
        let channel = match Channel::from_byline(&fragment, "shortBylineText", &client)? {
            Some(channel) => Some(channel),
            None if fragment.value("shortBylineText").is_none() => {
                Channel::from_byline(&fragment, "ownerText", &client)?
            }
            None => None,
        };

        let view_count = fragment
            .optional::<RawText>("viewCountText")?
            .as_ref()
            .and_then(RawText::source)
            .map(TextSource::joined)
            .and_then(|text| raw::parse_count(&text));

        Ok(Self {
            id,
            title,
            duration,
            thumbnails,
            channel,
            view_count,
            client,
        })
    }

    /// Re-hydrates this video in place, keeping its client.
    pub fn load(&mut self, raw: &Value) -> Result<&mut Self, HydrateError> {
        *self = Self::from_raw(raw, self.client.clone())?;
        Ok(self)
    }

    /// The video's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    /// Whether this is a live stream (it has no duration).
    pub fn is_live(&self) -> bool {
        self.duration.is_none()
    }

    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn view_count(&self) -> Option<u64> {
        self.view_count
    }
}

impl Entity for VideoCompact {
    fn id(&self) -> &str {
        &self.id
    }

    fn client(&self) -> &ClientHandle {
        &self.client
    }
}
