//! Menu error types.

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors that can occur while resolving the menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// No tier produced a menu: the remote store was unusable, the cache was
    /// empty and the bundled menu is disabled.
    #[error("no menu data available")]
    Unavailable,

    /// Remote store error on an operation without a fallback.
    #[error("remote store error: {0}")]
    Remote(#[from] RemoteError),
}
