use thiserror::Error;

/// Failure taxonomy of the client core.
///
/// `SearchTransportFailed` never escapes the search orchestrator — it is
/// recovered internally by falling back to local filtering.  It exists in
/// the taxonomy so that logs and diagnostics can name the condition.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The startup catalog fetch failed.  The core does not retry; the
    /// caller may.
    #[error("catalog fetch failed: {0}")]
    CatalogFetchFailed(String),

    /// A server-side search request failed at the transport level.
    #[error("search transport failed: {0}")]
    SearchTransportFailed(String),

    /// Acquiring or starting a stream failed.  The session has already
    /// been reset to idle; playback is not retried automatically.
    #[error("playback failed for \"{station}\": {reason}")]
    PlaybackFailed { station: String, reason: String },
}
