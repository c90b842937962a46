//! Error types used by the crate.

use thiserror::Error;

/// Error type of the viewer.
///
/// None of these errors is fatal to a viewer session: handlers log them and drop the
/// triggering interaction.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Layer id is not present in the loaded style.
    #[error("layer '{0}' does not exist in the map style")]
    UnknownLayer(String),
    /// Engine could not answer a rendered features query.
    #[error("failed to query rendered features: {0}")]
    QueryFailure(String),
    /// Engine was queried before its style finished loading.
    #[error("style is not loaded yet")]
    StyleNotLoaded,
    /// Toggle declaration does not name any layer.
    #[error("layer declaration '{0}' does not contain any layer id")]
    EmptyLayerDeclaration(String),
    /// Viewer configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Camera hash could not be parsed.
    #[error("invalid camera hash '{0}'")]
    InvalidHash(String),
    /// Error decoding a JSON document.
    #[error("failed to decode json: {0}")]
    Json(#[from] serde_json::Error),
    /// Error reading a file.
    #[error("failed to read file")]
    Io(#[from] std::io::Error),
    /// Error loading data over the network.
    #[cfg(not(target_arch = "wasm32"))]
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
