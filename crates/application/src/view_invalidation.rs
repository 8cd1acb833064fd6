use tracing::warn;

use rentline_domain::ViewPath;

use crate::ViewInvalidator;

/// Signals stale pages after a committed mutation. Failures are logged only.
pub(crate) async fn invalidate_views(invalidator: &dyn ViewInvalidator, paths: &[ViewPath]) {
    if let Err(error) = invalidator.invalidate(paths).await {
        let paths = paths
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        warn!(error = %error, paths = %paths, "failed to invalidate cached views");
    }
}
