//! Placeholder-state derivation for resource list screens.

/// The four-way classification driving which placeholder a list screen
/// shows.
///
/// Never mutated independently; always recomputed from the fetch flag,
/// the visible result list, and the last error via [`derive_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// First load in progress, nothing to show yet.
    Loading,
    /// Results are available.
    Content,
    /// Load finished with no results and no error.
    Empty,
    /// Load failed; carries the display message. Always recoverable by
    /// re-fetching.
    Error(String),
}

/// Derives the [`ViewState`] from the three underlying inputs.
///
/// | fetching | empty | error | state |
/// |---|---|---|---|
/// | yes | yes | any  | `Loading` |
/// | no  | yes | none | `Empty` |
/// | no  | yes | some | `Error` |
/// | any | no  | any  | `Content` |
///
/// Non-empty results always win: a refresh over existing content keeps
/// showing that content rather than regressing to a spinner.
#[inline]
#[must_use]
pub fn derive_state(is_fetching: bool, is_empty: bool, error: Option<&str>) -> ViewState {
    if !is_empty {
        return ViewState::Content;
    }
    if is_fetching {
        return ViewState::Loading;
    }
    match error {
        Some(message) => ViewState::Error(message.to_owned()),
        None => ViewState::Empty,
    }
}
