//! Side effects requested from the presentation layer.

/// Something the front end should do after an operation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Show a blocking notice with the server-provided text.
    Alert(String),
    /// Empty the query input.
    ClearInput,
    /// Bring the newest turn into view.
    ScrollToLatest,
}
