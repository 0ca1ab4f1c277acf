//! Raw fragment shapes and their resolution into explicit variants.
//!
//! YouTube's web API has accumulated several alternate encodings for the same piece of
//! information (a title is either `{simpleText}` or `{runs: [...]}`, thumbnails are either a
//! direct list or a list of wrappers, and so on). Every such alternative is deserialized into
//! a raw serde struct here and resolved exactly once into an explicit enum, so the entity
//! hydrators never inspect JSON fields ad hoc.

use crate::error::HydrateError;
use serde::Deserialize;
use serde_json::Value;

/// Display name YouTube uses on bylines of content it generated itself (mixes, auto playlists).
pub(crate) const SYSTEM_BYLINE: &str = "YouTube";

/// Origin prepended to the relative URLs found in navigation endpoints.
pub const SITE_ORIGIN: &str = "https://www.youtube.com";

/// A borrowed view over one raw JSON object handed to a hydrator.
///
/// Knows which entity it is being read for, so every error it produces names both the entity
/// and the offending field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment<'a> {
    entity: &'static str,
    value: &'a Value,
}

impl<'a> Fragment<'a> {
    pub(crate) fn new(entity: &'static str, value: &'a Value) -> Result<Self, HydrateError> {
        if !value.is_object() {
            return Err(HydrateError::ShapeMismatch {
                entity,
                field: "<root>",
                detail: format!("expected an object, found {}", json_kind(value)),
            });
        }
        Ok(Self { entity, value })
    }

    pub(crate) fn entity(&self) -> &'static str {
        self.entity
    }

    /// The raw value of `name`, treating `null` like an absent field.
    pub(crate) fn value(&self, name: &str) -> Option<&'a Value> {
        self.value.get(name).filter(|v| !v.is_null())
    }

    /// The raw value at a JSON pointer below this fragment, treating `null` as absent.
    pub(crate) fn value_at(&self, pointer: &str) -> Option<&'a Value> {
        self.value.pointer(pointer).filter(|v| !v.is_null())
    }

    /// Deserializes `name` if present.
    pub(crate) fn optional<T: Deserialize<'a>>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, HydrateError> {
        self.value(name)
            .map(|value| self.decode(name, value))
            .transpose()
    }

    /// Deserializes `name`, failing with [`HydrateError::MissingField`] if it is absent.
    pub(crate) fn required<T: Deserialize<'a>>(
        &self,
        name: &'static str,
    ) -> Result<T, HydrateError> {
        self.optional(name)?.ok_or_else(|| self.missing(name))
    }

    /// Deserializes the value at `pointer` if present. Errors are reported against `pointer`.
    pub(crate) fn optional_at<T: Deserialize<'a>>(
        &self,
        pointer: &'static str,
    ) -> Result<Option<T>, HydrateError> {
        self.value_at(pointer)
            .map(|value| self.decode(pointer, value))
            .transpose()
    }

    /// The array at `pointer`; an absent array reads as empty.
    pub(crate) fn array_at(&self, pointer: &'static str) -> Result<&'a [Value], HydrateError> {
        match self.value_at(pointer) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.mismatch(
                pointer,
                format!("expected an array, found {}", json_kind(other)),
            )),
        }
    }

    /// A nested object fragment at `pointer`, if present.
    pub(crate) fn nested(&self, pointer: &'static str) -> Result<Option<Self>, HydrateError> {
        self.value_at(pointer)
            .map(|value| {
                Self::new(self.entity, value).map_err(|_| {
                    self.mismatch(
                        pointer,
                        format!("expected an object, found {}", json_kind(value)),
                    )
                })
            })
            .transpose()
    }

    pub(crate) fn missing(&self, field: &'static str) -> HydrateError {
        HydrateError::MissingField {
            entity: self.entity,
            field,
        }
    }

    pub(crate) fn mismatch(&self, field: &'static str, detail: impl Into<String>) -> HydrateError {
        HydrateError::ShapeMismatch {
            entity: self.entity,
            field,
            detail: detail.into(),
        }
    }

    fn decode<T: Deserialize<'a>>(
        &self,
        field: &'static str,
        value: &'a Value,
    ) -> Result<T, HydrateError> {
        T::deserialize(value).map_err(|e| self.mismatch(field, e.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ==============================================================================
// Text
// ==============================================================================

/// A piece of display text, either as a single string or as formatted runs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawText {
    simple_text: Option<String>,
    runs: Option<Vec<RawRun>>,
}

/// The representation a [`RawText`] resolved to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TextSource<'a> {
    Simple(&'a str),
    Runs(&'a [RawRun]),
}

impl<'a> TextSource<'a> {
    /// The leading text: the simple text, or the first run.
    pub(crate) fn first(self) -> &'a str {
        match self {
            Self::Simple(text) => text,
            Self::Runs(runs) => &runs[0].text,
        }
    }

    /// All runs concatenated.
    pub(crate) fn joined(self) -> String {
        match self {
            Self::Simple(text) => text.to_string(),
            Self::Runs(runs) => runs.iter().map(|run| run.text.as_str()).collect(),
        }
    }
}

impl RawText {
    /// Non-empty `simpleText` wins; otherwise the runs, if there is at least one.
    pub(crate) fn source(&self) -> Option<TextSource<'_>> {
        match (self.simple_text.as_deref(), self.runs.as_deref()) {
            (Some(text), _) if !text.is_empty() => Some(TextSource::Simple(text)),
            (_, Some(runs)) if !runs.is_empty() => Some(TextSource::Runs(runs)),
            _ => None,
        }
    }

    /// Resolves this text as a byline.
    pub(crate) fn byline(&self) -> Option<Byline<'_>> {
        if self.simple_text.as_deref() == Some(SYSTEM_BYLINE) {
            return Some(Byline::System);
        }
        self.runs
            .as_deref()
            .and_then(<[RawRun]>::first)
            .map(Byline::Channel)
    }
}

/// Reads the text field `name` and resolves it to its leading text.
pub(crate) fn required_text(
    fragment: &Fragment<'_>,
    name: &'static str,
) -> Result<String, HydrateError> {
    let text: RawText = fragment.required(name)?;
    text.source()
        .map(|source| source.first().to_string())
        .ok_or_else(|| {
            fragment.mismatch(name, "neither `simpleText` nor `runs[0].text` is present")
        })
}

/// One formatted segment of a [`RawText`].
///
/// Every part of the navigation endpoint is optional here: a run only needs its `text` to
/// render, and only channel bylines require a complete link.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRun {
    pub(crate) text: String,
    pub(crate) navigation_endpoint: Option<RawNavigationEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNavigationEndpoint {
    pub(crate) browse_endpoint: Option<RawBrowseEndpoint>,
    pub(crate) watch_endpoint: Option<RawWatchEndpoint>,
    pub(crate) command_metadata: Option<RawCommandMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBrowseEndpoint {
    pub(crate) browse_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawWatchEndpoint {
    pub(crate) playlist_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCommandMetadata {
    pub(crate) web_command_metadata: Option<RawWebCommandMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWebCommandMetadata {
    pub(crate) url: Option<String>,
}

/// Who a byline attributes a piece of content to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Byline<'a> {
    /// Generated by YouTube itself; there is no owning channel.
    System,
    /// A channel, described by its first run.
    Channel(&'a RawRun),
}

// ==============================================================================
// Thumbnails
// ==============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RawThumbnail {
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) width: u32,
    #[serde(default)]
    pub(crate) height: u32,
}

/// An object holding a `thumbnails` list, as found under `thumbnail` or inside wrappers.
#[derive(Debug, Deserialize)]
pub(crate) struct RawThumbnailList {
    pub(crate) thumbnails: Vec<RawThumbnail>,
}

/// Where a fragment keeps its thumbnail list.
#[derive(Debug)]
pub(crate) enum ThumbnailSource {
    /// `thumbnail.thumbnails`
    Direct(RawThumbnailList),
    /// `thumbnails[0].thumbnails`
    Wrapped(Vec<RawThumbnailList>),
}

impl ThumbnailSource {
    /// Prefers the direct form, falling back to the wrapper array.
    pub(crate) fn resolve(fragment: &Fragment<'_>) -> Result<Self, HydrateError> {
        if let Some(direct) = fragment.optional("thumbnail")? {
            return Ok(Self::Direct(direct));
        }
        match fragment.optional::<Vec<RawThumbnailList>>("thumbnails")? {
            Some(wrappers) if wrappers.is_empty() => {
                Err(fragment.mismatch("thumbnails", "wrapper array is empty"))
            }
            Some(wrappers) => Ok(Self::Wrapped(wrappers)),
            None => Err(fragment.missing("thumbnail")),
        }
    }

    pub(crate) fn records(&self) -> &[RawThumbnail] {
        match self {
            Self::Direct(list) => &list.thumbnails,
            Self::Wrapped(wrappers) => &wrappers[0].thumbnails,
        }
    }
}

// ==============================================================================
// Counts
// ==============================================================================

/// Strips every non-digit and parses what is left.
///
/// Returns `None` when no digits remain. Counts too large for a `u64` saturate.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Best-effort count from a raw value that is either a number, a string, or a text object.
pub(crate) fn count_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => parse_count(s),
        Value::Object(_) => RawText::deserialize(value)
            .ok()
            .and_then(|text| text.source().map(TextSource::joined))
            .and_then(|text| parse_count(&text)),
        _ => None,
    }
}

/// Parses a `h:mm:ss` / `m:ss` clock duration into seconds.
pub(crate) fn parse_clock(text: &str) -> Option<u32> {
    text.trim().split(':').try_fold(0u32, |total, part| {
        let part: u32 = part.parse().ok()?;
        total.checked_mul(60)?.checked_add(part)
    })
}
