use async_trait::async_trait;
use rentline_application::ViewInvalidator;
use rentline_core::AppResult;
use rentline_domain::ViewPath;
use tracing::info;

/// View invalidator that only logs the stale paths. Used when no Redis is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingViewInvalidator;

#[async_trait]
impl ViewInvalidator for TracingViewInvalidator {
    async fn invalidate(&self, paths: &[ViewPath]) -> AppResult<()> {
        for path in paths {
            info!(path = %path, "view invalidated");
        }

        Ok(())
    }
}
