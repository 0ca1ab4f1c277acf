//! Errors raised while hydrating entities from raw fragments.

/// The raw fragment handed to a hydrator did not honor the upstream shape contract.
///
/// Both variants are fatal for the hydration call that produced them. Nothing is
/// retried and no partially-hydrated entity is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HydrateError {
    /// A field the entity cannot exist without is absent (or `null`).
    #[error("{entity} fragment is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field is present but matches none of the shapes the entity knows about.
    #[error("{entity} field `{field}` has an unrecognized shape: {detail}")]
    ShapeMismatch {
        entity: &'static str,
        field: &'static str,
        detail: String,
    },
}

impl HydrateError {
    /// The raw field this error is about.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. } | Self::ShapeMismatch { field, .. } => field,
        }
    }
}
