//! Compact playlists, as listed in search results and next to videos.

use crate::entities::base::{ClientHandle, Entity};
use crate::entities::channel::Channel;
use crate::entities::playlist::Playlist;
use crate::entities::thumbnails::Thumbnails;
use crate::error::HydrateError;
use crate::raw::{self, Fragment, ThumbnailSource};
use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

const ENTITY: &str = "PlaylistCompact";

/// A playlist as it appears in a listing: enough to display it, and a way to get the rest.
///
/// Use [`PlaylistCompact::get_playlist`] to fetch the full [`Playlist`].
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
pub struct PlaylistCompact {
    /// Playlist id, e.g. `PLxxxx`, or `RDxxxx` for mixes.
    #[builder(setter(into))]
    id: String,

    /// Display title.
    #[builder(setter(into), default)]
    title: String,

    /// Cover images of the playlist, smallest first.
    #[builder(default)]
    thumbnails: Thumbnails,

    /// The channel that made this playlist. `None` for playlists YouTube generated itself.
    #[builder(setter(into, strip_option), default)]
    channel: Option<Channel>,

    /// Number of videos in the playlist, or 0 if YouTube's count could not be read.
    #[builder(default)]
    video_count: u64,

    #[builder(default)]
    #[serde(skip)]
    client: ClientHandle,
}

impl PlaylistCompact {
    pub fn builder() -> PlaylistCompactBuilder {
        PlaylistCompactBuilder::default()
    }

    /// Hydrates a compact playlist from a raw `playlistRenderer`-like fragment.
    ///
    /// # Errors
    ///
    /// * [`HydrateError::MissingField`] if `playlistId`, `title` or the thumbnails are absent.
    /// * [`HydrateError::ShapeMismatch`] if the title, thumbnails or byline are in a shape
    ///   this crate does not recognize.
    ///
    /// The video count never fails: anything that does not parse becomes 0.
    pub fn from_raw(raw: &Value, client: ClientHandle) -> Result<Self, HydrateError> {
        let fragment = Fragment::new(ENTITY, raw)?;

        let id: String = fragment.required("playlistId")?;
        let title = raw::required_text(&fragment, "title")?;

        // only fall back to the short text if the explicit count is missing altogether
        let video_count = match fragment.value("videoCount") {
            Some(count) => raw::count_of(count),
            None => fragment
                .value_at("/videoCountShortText/simpleText")
                .and_then(raw::count_of),
        }
        .unwrap_or(0);

        let thumbnails = Thumbnails::from_source(&ThumbnailSource::resolve(&fragment)?);
        let channel = Channel::from_byline(&fragment, "shortBylineText", &client)?;

        tracing::trace!(
            playlist_id = %id,
            video_count,
            has_channel = channel.is_some(),
            "hydrated compact playlist"
        );
        Ok(Self {
            id,
            title,
            thumbnails,
            channel,
            video_count,
            client,
        })
    }

    /// Re-hydrates this playlist in place, keeping its client.
    ///
    /// Every field is replaced by what `raw` holds; nothing from the previous hydration is
    /// merged in. On error the playlist is left untouched.
    pub fn load(&mut self, raw: &Value) -> Result<&mut Self, HydrateError> {
        *self = Self::from_raw(raw, self.client.clone())?;
        Ok(self)
    }

    /// The playlist's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn thumbnails(&self) -> &Thumbnails {
        &self.thumbnails
    }

    /// The owning channel, unless YouTube made the playlist itself.
    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// Number of videos, or 0 when unknown.
    pub fn video_count(&self) -> u64 {
        self.video_count
    }

    /// Fetches the full [`Playlist`] this entry refers to.
    ///
    /// Equivalent to calling [`Client::get_playlist`](crate::Client::get_playlist) with this
    /// playlist's id on the client it was hydrated for.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(playlist))` - the playlist was found
    /// * `Ok(None)` - the client reports no playlist with this id
    /// * `Err(_)` - the client has been dropped, or the client's fetch failed
    #[instrument(skip(self), fields(playlist_id = %self.id))]
    pub async fn get_playlist(&self) -> eyre::Result<Option<Playlist>> {
        let Some(client) = self.client.upgrade() else {
            eyre::bail!("playlist {} is not attached to a live client", self.id);
        };
        let playlist = client.get_playlist(&self.id).await?;
        tracing::debug!(found = playlist.is_some(), "resolved compact playlist");
        Ok(playlist)
    }
}

impl Entity for PlaylistCompact {
    fn id(&self) -> &str {
        &self.id
    }

    fn client(&self) -> &ClientHandle {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use insta::assert_json_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn thumbnail_list(n: u32) -> Value {
        let thumbnails: Vec<_> = (1..=n)
            .map(|i| {
                json!({
                    "url": format!("https://i.ytimg.com/{i}.jpg"),
                    "width": i * 100,
                    "height": i * 50
                })
            })
            .collect();
        json!({ "thumbnails": thumbnails })
    }

    fn fragment() -> Value {
        json!({
            "playlistId": "PLabc",
            "title": {"simpleText": "Road Trip"},
            "thumbnail": thumbnail_list(2),
            "videoCount": "1,234",
            "shortBylineText": {"runs": [{
                "text": "Acme",
                "navigationEndpoint": {
                    "browseEndpoint": {"browseId": "UC1"},
                    "commandMetadata": {"webCommandMetadata": {"url": "/channel/UC1"}}
                }
            }]}
        })
    }

    fn hydrate(raw: &Value) -> Result<PlaylistCompact, HydrateError> {
        PlaylistCompact::from_raw(raw, ClientHandle::detached())
    }

    #[test]
    fn hydrates_every_field() {
        let playlist = hydrate(&fragment()).unwrap();

        assert_eq!(playlist.id(), "PLabc");
        assert_eq!(playlist.title(), "Road Trip");
        assert_eq!(playlist.video_count(), 1234);
        assert_eq!(playlist.thumbnails().len(), 2);

        let channel = playlist.channel().expect("byline names a channel");
        assert_eq!(channel.id(), "UC1");
        assert_eq!(channel.name(), "Acme");
        assert_eq!(channel.url(), "https://www.youtube.com/channel/UC1");
    }

    #[test]
    fn serializes_without_client() {
        let mut raw = fragment();
        raw["thumbnail"] = thumbnail_list(1);
        let playlist = hydrate(&raw).unwrap();
        assert_json_snapshot!(playlist, @r#"
        {
          "id": "PLabc",
          "title": "Road Trip",
          "thumbnails": [
            {
              "url": "https://i.ytimg.com/1.jpg",
              "width": 100,
              "height": 50
            }
          ],
          "channel": {
            "id": "UC1",
            "name": "Acme",
            "url": "https://www.youtube.com/channel/UC1",
            "thumbnails": []
          },
          "video_count": 1234
        }
        "#);
    }

    #[test]
    fn thumbnail_count_and_order_are_preserved() {
        for n in [0, 1, 5] {
            let mut raw = fragment();
            raw["thumbnail"] = thumbnail_list(n);
            let playlist = hydrate(&raw).unwrap();

            let widths: Vec<u32> = playlist.thumbnails().iter().map(|t| t.width).collect();
            let expected: Vec<u32> = (1..=n).map(|i| i * 100).collect();
            assert_eq!(widths, expected);
        }
    }

    #[test]
    fn wrapped_thumbnails_use_the_first_wrapper() {
        let mut raw = fragment();
        raw.as_object_mut().unwrap().remove("thumbnail");
        raw["thumbnails"] = json!([thumbnail_list(3), thumbnail_list(1)]);

        let playlist = hydrate(&raw).unwrap();
        assert_eq!(playlist.thumbnails().len(), 3);
    }

    #[test]
    fn thumbnails_are_required() {
        let mut raw = fragment();
        raw.as_object_mut().unwrap().remove("thumbnail");
        assert_eq!(
            hydrate(&raw).unwrap_err(),
            HydrateError::MissingField {
                entity: "PlaylistCompact",
                field: "thumbnail"
            }
        );

        raw["thumbnails"] = json!([]);
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch {
                field: "thumbnails",
                ..
            }
        ));
    }

    #[test]
    fn video_count_falls_back_to_short_text() {
        let mut raw = fragment();
        raw.as_object_mut().unwrap().remove("videoCount");
        raw["videoCountShortText"] = json!({"simpleText": "50+"});
        assert_eq!(hydrate(&raw).unwrap().video_count(), 50);
    }

    #[test]
    fn video_count_accepts_whole_floats_and_saturates() {
        let mut raw = fragment();
        raw["videoCount"] = json!(12.0);
        assert_eq!(hydrate(&raw).unwrap().video_count(), 12);

        raw["videoCount"] = json!("99999999999999999999999");
        assert_eq!(hydrate(&raw).unwrap().video_count(), u64::MAX);
    }

    #[test]
    fn unreadable_video_count_is_zero() {
        let mut raw = fragment();
        raw.as_object_mut().unwrap().remove("videoCount");
        assert_eq!(hydrate(&raw).unwrap().video_count(), 0);

        raw["videoCountShortText"] = json!({"simpleText": "many"});
        assert_eq!(hydrate(&raw).unwrap().video_count(), 0);

        raw["videoCountShortText"] = json!(["not", "text"]);
        assert_eq!(hydrate(&raw).unwrap().video_count(), 0);

        // a present but unparsable explicit count does not fall back
        raw["videoCountShortText"] = json!({"simpleText": "7"});
        raw["videoCount"] = json!("N/A");
        assert_eq!(hydrate(&raw).unwrap().video_count(), 0);
    }

    #[test]
    fn system_byline_has_no_channel() {
        let mut raw = fragment();
        raw["shortBylineText"] = json!({"simpleText": "YouTube"});
        assert_eq!(hydrate(&raw).unwrap().channel(), None);

        raw.as_object_mut().unwrap().remove("shortBylineText");
        assert_eq!(hydrate(&raw).unwrap().channel(), None);
    }

    #[test]
    fn malformed_byline_is_a_shape_mismatch() {
        let mut raw = fragment();
        raw["shortBylineText"] = json!({"simpleText": "Someone Else"});
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch {
                entity: "PlaylistCompact",
                field: "shortBylineText",
                ..
            }
        ));

        raw["shortBylineText"] = json!({"runs": [{"text": "Acme"}]});
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch {
                entity: "Channel",
                ..
            }
        ));
    }

    #[test]
    fn title_falls_back_to_runs() {
        let mut raw = fragment();
        raw["title"] = json!({"simpleText": null, "runs": [{"text": "My Mix"}]});
        assert_eq!(hydrate(&raw).unwrap().title(), "My Mix");
    }

    #[test]
    fn title_runs_may_link_anywhere() {
        let mut raw = fragment();
        raw["title"] = json!({"runs": [{
            "text": "My Mix",
            "navigationEndpoint": {
                "commandMetadata": {"webCommandMetadata": {"webPageType": "WEB_PAGE_TYPE_WATCH"}},
                "watchEndpoint": {"videoId": "x"}
            }
        }]});
        assert_eq!(hydrate(&raw).unwrap().title(), "My Mix");
    }

    #[test]
    fn byline_link_without_url_is_a_shape_mismatch() {
        let mut raw = fragment();
        raw["shortBylineText"]["runs"][0]["navigationEndpoint"]["commandMetadata"] =
            json!({"webCommandMetadata": {"webPageType": "WEB_PAGE_TYPE_CHANNEL"}});
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch {
                entity: "Channel",
                ..
            }
        ));
    }

    #[test]
    fn title_errors() {
        let mut raw = fragment();
        raw["title"] = json!({"runs": []});
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch { field: "title", .. }
        ));

        raw["title"] = json!("just a string");
        assert!(matches!(
            hydrate(&raw).unwrap_err(),
            HydrateError::ShapeMismatch { field: "title", .. }
        ));

        raw.as_object_mut().unwrap().remove("title");
        assert_eq!(
            hydrate(&raw).unwrap_err(),
            HydrateError::MissingField {
                entity: "PlaylistCompact",
                field: "title"
            }
        );
    }

    #[test]
    fn id_is_required() {
        let mut raw = fragment();
        raw.as_object_mut().unwrap().remove("playlistId");
        assert_eq!(
            hydrate(&raw).unwrap_err(),
            HydrateError::MissingField {
                entity: "PlaylistCompact",
                field: "playlistId"
            }
        );
    }

    #[test]
    fn load_replaces_previous_state() {
        let client = Arc::new(MockClient::new());
        let mut playlist =
            PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();

        let second = json!({
            "playlistId": "PLsecond",
            "title": {"runs": [{"text": "Second"}]},
            "thumbnails": [thumbnail_list(1)],
            "shortBylineText": {"simpleText": "YouTube"}
        });
        playlist.load(&second).unwrap();

        assert_eq!(playlist.id(), "PLsecond");
        assert_eq!(playlist.title(), "Second");
        assert_eq!(playlist.video_count(), 0);
        assert_eq!(playlist.thumbnails().len(), 1);
        assert_eq!(playlist.channel(), None);
        assert_eq!(playlist.client(), &ClientHandle::new(&client));
    }

    #[test]
    fn failed_load_leaves_playlist_untouched() {
        let mut playlist = hydrate(&fragment()).unwrap();
        let before = playlist.clone();
        assert!(playlist.load(&json!({"title": {"simpleText": "x"}})).is_err());
        assert_eq!(playlist, before);
    }

    #[test]
    fn channel_shares_the_playlist_client() {
        let client = Arc::new(MockClient::new());
        let playlist = PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();
        assert_eq!(playlist.channel().unwrap().client(), playlist.client());
    }

    #[test]
    fn builder_accepts_partial_attributes() {
        let playlist = PlaylistCompact::builder()
            .id("PL1")
            .title("Manual")
            .video_count(3u64)
            .build()
            .unwrap();
        assert_eq!(playlist.id(), "PL1");
        assert_eq!(playlist.title(), "Manual");
        assert_eq!(playlist.video_count(), 3);
        assert!(playlist.thumbnails().is_empty());
        assert_eq!(playlist.channel(), None);

        assert!(PlaylistCompact::builder().title("no id").build().is_err());
    }

    #[tokio::test]
    async fn get_playlist_resolves_through_the_client() {
        let full = Playlist::builder().id("PLabc").title("Road Trip").build().unwrap();
        let client = Arc::new(MockClient::new().with_playlist(full.clone()));
        let compact = PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();

        let resolved = compact.get_playlist().await.unwrap();
        assert_eq!(resolved, Some(full));
        assert_eq!(client.lookups(), 1);
    }

    #[tokio::test]
    async fn get_playlist_reports_not_found_as_none() {
        let client = Arc::new(MockClient::new());
        let compact = PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();
        assert_eq!(compact.get_playlist().await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_playlist_passes_client_errors_through() {
        let client = Arc::new(MockClient::new().failing("upstream returned 503"));
        let compact = PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();
        let err = compact.get_playlist().await.unwrap_err();
        assert_eq!(err.to_string(), "upstream returned 503");
    }

    #[tokio::test]
    async fn get_playlist_fails_once_the_client_is_gone() {
        let client = Arc::new(MockClient::new());
        let compact = PlaylistCompact::from_raw(&fragment(), ClientHandle::new(&client)).unwrap();
        drop(client);
        let err = compact.get_playlist().await.unwrap_err();
        assert!(err.to_string().contains("not attached"), "{err}");

        let detached = hydrate(&fragment()).unwrap();
        assert!(detached.get_playlist().await.is_err());
    }

    #[tokio::test]
    async fn continuations_run_concurrently() {
        let client = Arc::new(
            MockClient::new()
                .with_playlist(Playlist::builder().id("PLa").title("A").build().unwrap())
                .with_playlist(Playlist::builder().id("PLb").title("B").build().unwrap()),
        );
        let handle = ClientHandle::new(&client);
        let mut a = fragment();
        a["playlistId"] = json!("PLa");
        let mut b = fragment();
        b["playlistId"] = json!("PLb");
        let a = PlaylistCompact::from_raw(&a, handle.clone()).unwrap();
        let b = PlaylistCompact::from_raw(&b, handle).unwrap();

        let (a, b) = tokio::join!(a.get_playlist(), b.get_playlist());
        assert_eq!(a.unwrap().unwrap().title(), "A");
        assert_eq!(b.unwrap().unwrap().title(), "B");
        assert_eq!(client.lookups(), 2);
    }
}
