//! View-level filter state

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Filter criteria passed by value into the filter engine.
///
/// Both fields are owned by the caller; empty strings disable the
/// corresponding predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterState {
    /// Case-insensitive substring match against title or author display name.
    #[serde(default, rename = "search")]
    pub search_term: String,
    /// Case-insensitive exact genre match; empty means no genre filter.
    #[serde(default, rename = "genre")]
    pub genre_filter: String,
}
