//! Thumbnail lists.

use crate::error::HydrateError;
use crate::raw::{RawThumbnail, ThumbnailSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::ops::Deref;

/// A single thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    /// The image URL, as given by YouTube. May be protocol-relative (`//i.ytimg.com/...`).
    pub url: String,
    /// Width in pixels, 0 if YouTube did not say.
    pub width: u32,
    /// Height in pixels, 0 if YouTube did not say.
    pub height: u32,
}

impl Thumbnail {
    /// The URL with protocol-relative references resolved to `https:`.
    pub fn absolute_url(&self) -> Cow<'_, str> {
        if self.url.starts_with("//") {
            Cow::Owned(format!("https:{}", self.url))
        } else {
            Cow::Borrowed(&self.url)
        }
    }
}

/// The thumbnails of an entity, in the order YouTube listed them (conventionally smallest first).
///
/// Dereferences to a slice of [`Thumbnail`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Thumbnails(Vec<Thumbnail>);

impl Thumbnails {
    /// Normalizes a raw JSON array of `{url, width, height}` records.
    ///
    /// Every record is kept, in order. An empty array gives an empty list.
    pub fn from_raw(raw: &Value) -> Result<Self, HydrateError> {
        let records = Vec::<RawThumbnail>::deserialize(raw).map_err(|e| {
            HydrateError::ShapeMismatch {
                entity: "Thumbnails",
                field: "thumbnails",
                detail: e.to_string(),
            }
        })?;
        Ok(Self::from_records(&records))
    }

    pub(crate) fn from_records(records: &[RawThumbnail]) -> Self {
        records
            .iter()
            .map(|record| Thumbnail {
                url: record.url.clone(),
                width: record.width,
                height: record.height,
            })
            .collect()
    }

    pub(crate) fn from_source(source: &ThumbnailSource) -> Self {
        Self::from_records(source.records())
    }

    /// URL of the smallest thumbnail.
    pub fn min(&self) -> Option<Cow<'_, str>> {
        self.0.first().map(Thumbnail::absolute_url)
    }

    /// URL of the largest thumbnail.
    pub fn best(&self) -> Option<Cow<'_, str>> {
        self.0.last().map(Thumbnail::absolute_url)
    }

    pub fn into_vec(self) -> Vec<Thumbnail> {
        self.0
    }
}

impl Deref for Thumbnails {
    type Target = [Thumbnail];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Thumbnail> for Thumbnails {
    fn from_iter<I: IntoIterator<Item = Thumbnail>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Thumbnails {
    type Item = &'a Thumbnail;
    type IntoIter = std::slice::Iter<'a, Thumbnail>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn keeps_every_record_in_order() {
        let raw = json!([
            {"url": "https://i.ytimg.com/a.jpg", "width": 120, "height": 90},
            {"url": "https://i.ytimg.com/c.jpg", "width": 480, "height": 360},
            {"url": "https://i.ytimg.com/b.jpg", "width": 320, "height": 180},
        ]);
        let thumbnails = Thumbnails::from_raw(&raw).unwrap();

        let urls: Vec<_> = thumbnails.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://i.ytimg.com/a.jpg",
                "https://i.ytimg.com/c.jpg",
                "https://i.ytimg.com/b.jpg"
            ]
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        let thumbnails = Thumbnails::from_raw(&json!([])).unwrap();
        assert!(thumbnails.is_empty());
        assert_eq!(thumbnails.min(), None);
        assert_eq!(thumbnails.best(), None);
    }

    #[test]
    fn null_records_are_rejected() {
        let err = Thumbnails::from_raw(&json!([null])).unwrap_err();
        assert!(matches!(
            err,
            HydrateError::ShapeMismatch {
                entity: "Thumbnails",
                ..
            }
        ));
    }

    #[test]
    fn min_and_best_resolve_protocol_relative_urls() {
        let raw = json!([
            {"url": "//i.ytimg.com/small.jpg", "width": 88, "height": 88},
            {"url": "https://i.ytimg.com/large.jpg", "width": 800, "height": 800},
        ]);
        let thumbnails = Thumbnails::from_raw(&raw).unwrap();
        assert_eq!(
            thumbnails.min().as_deref(),
            Some("https://i.ytimg.com/small.jpg")
        );
        assert_eq!(
            thumbnails.best().as_deref(),
            Some("https://i.ytimg.com/large.jpg")
        );
        // the stored URL is left as YouTube sent it
        assert_eq!(thumbnails[0].url, "//i.ytimg.com/small.jpg");
    }

    #[test]
    fn missing_dimensions_default_to_zero() {
        let thumbnails = Thumbnails::from_raw(&json!([{"url": "x"}])).unwrap();
        assert_json_snapshot!(thumbnails, @r#"
        [
          {
            "url": "x",
            "width": 0,
            "height": 0
          }
        ]
        "#);
    }
}
