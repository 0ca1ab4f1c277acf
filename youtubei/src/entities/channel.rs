//! Channels.

use crate::entities::base::{ClientHandle, Entity};
use crate::entities::thumbnails::Thumbnails;
use crate::error::HydrateError;
use crate::raw::{Byline, Fragment, RawRun, RawText, SITE_ORIGIN, TextSource, ThumbnailSource};
use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;

const ENTITY: &str = "Channel";

const CHANNEL_URL: &str = "/navigationEndpoint/commandMetadata/webCommandMetadata/url";

/// A YouTube channel.
///
/// Usually found attached to the playlist or video that links to it, in which case only the
/// fields present in a byline (`id`, `name` and `url`) are populated.
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
pub struct Channel {
    /// Channel id, e.g. `UCxxxx`.
    #[builder(setter(into))]
    id: String,

    /// Display name.
    #[builder(setter(into))]
    name: String,

    /// Canonical URL, e.g. `https://www.youtube.com/@handle`.
    #[builder(setter(into))]
    url: String,

    /// Channel avatars. Empty when the channel came from a byline.
    #[builder(default)]
    thumbnails: Thumbnails,

    /// Subscriber count as displayed by YouTube, abbreviated and localized
    /// (e.g. `1.2M subscribers`).
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    subscriber_count: Option<String>,

    #[builder(default)]
    #[serde(skip)]
    client: ClientHandle,
}

impl Channel {
    pub fn builder() -> ChannelBuilder {
        ChannelBuilder::default()
    }

    /// Hydrates a channel from a raw `channelRenderer` fragment (as found in search results).
    pub fn from_raw(raw: &Value, client: ClientHandle) -> Result<Self, HydrateError> {
        let fragment = Fragment::new(ENTITY, raw)?;

        let id: String = fragment.required("channelId")?;
        let name = crate::raw::required_text(&fragment, "title")?;
        let url = match fragment.optional_at::<String>(CHANNEL_URL)? {
            Some(path) => format!("{SITE_ORIGIN}{path}"),
            None => format!("{SITE_ORIGIN}/channel/{id}"),
        };
        let thumbnails = match fragment.optional("thumbnail")? {
            Some(list) => Thumbnails::from_source(&ThumbnailSource::Direct(list)),
            None => Thumbnails::default(),
        };
        let subscriber_count = fragment
            .optional::<RawText>("subscriberCountText")?
            .as_ref()
            .and_then(RawText::source)
            .map(TextSource::joined);

        tracing::trace!(channel_id = %id, "hydrated channel");
        Ok(Self {
            id,
            name,
            url,
            thumbnails,
            subscriber_count,
            client,
        })
    }

    /// Re-hydrates this channel in place from a raw `channelRenderer` fragment.
    ///
    /// Every field is replaced; on error the channel is left untouched.
    pub fn load(&mut self, raw: &Value) -> Result<&mut Self, HydrateError> {
        *self = Self::from_raw(raw, self.client.clone())?;
        Ok(self)
    }

    /// Hydrates a channel from the first run of a non-system byline.
    pub(crate) fn from_byline_run(
        run: &RawRun,
        client: ClientHandle,
    ) -> Result<Self, HydrateError> {
        let mismatch = |field: &'static str| HydrateError::ShapeMismatch {
            entity: ENTITY,
            field,
            detail: "byline run has no navigation endpoint for its channel".into(),
        };

        let endpoint = run
            .navigation_endpoint
            .as_ref()
            .ok_or_else(|| mismatch("navigationEndpoint"))?;
        let id = endpoint
            .browse_endpoint
            .as_ref()
            .and_then(|browse| browse.browse_id.clone())
            .ok_or_else(|| mismatch("navigationEndpoint.browseEndpoint.browseId"))?;
        let path = endpoint
            .command_metadata
            .as_ref()
            .and_then(|metadata| metadata.web_command_metadata.as_ref())
            .and_then(|web| web.url.as_deref())
            .ok_or_else(|| mismatch("navigationEndpoint.commandMetadata.webCommandMetadata.url"))?;

        Ok(Self {
            id,
            name: run.text.clone(),
            url: format!("{SITE_ORIGIN}{path}"),
            thumbnails: Thumbnails::default(),
            subscriber_count: None,
            client,
        })
    }

    /// Resolves an optional byline field of `fragment` into the channel it names.
    ///
    /// Returns `None` when the field is absent or is YouTube's own byline.
    pub(crate) fn from_byline(
        fragment: &Fragment<'_>,
        field: &'static str,
        client: &ClientHandle,
    ) -> Result<Option<Self>, HydrateError> {
        let Some(text) = fragment.optional::<RawText>(field)? else {
            return Ok(None);
        };
        match text.byline() {
            Some(Byline::System) => Ok(None),
            Some(Byline::Channel(run)) => Self::from_byline_run(run, client.clone()).map(Some),
            None => Err(fragment.mismatch(
                field,
                "byline has neither the system text nor any runs",
            )),
        }
    }

    /// Hydrates a channel from a `videoOwnerRenderer` fragment, which carries the owner's avatar.
    pub(crate) fn from_owner(
        fragment: &Fragment<'_>,
        client: &ClientHandle,
    ) -> Result<Self, HydrateError> {
        let title: RawText = fragment.required("title")?;
        let run = match title.byline() {
            Some(Byline::Channel(run)) => run,
            _ => return Err(fragment.mismatch("title", "owner title has no runs")),
        };
        let mut channel = Self::from_byline_run(run, client.clone())?;
        if let Some(list) = fragment.optional("thumbnail")? {
            channel.thumbnails = Thumbnails::from_source(&ThumbnailSource::Direct(list));
        }
        Ok(channel)
    }

    /// The channel's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute URL of the channel page.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }

    pub fn subscriber_count(&self) -> Option<&str> {
        self.subscriber_count.as_deref()
    }
}

impl Entity for Channel {
    fn id(&self) -> &str {
        &self.id
    }

    fn client(&self) -> &ClientHandle {
        &self.client
    }
}
