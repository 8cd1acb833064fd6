//! Redis-backed view invalidation.

use async_trait::async_trait;
use rentline_application::ViewInvalidator;
use rentline_core::{AppError, AppResult};
use rentline_domain::ViewPath;
use redis::AsyncCommands;
use tracing::debug;

/// Publishes stale view paths on a Redis channel for frontends to revalidate.
#[derive(Clone)]
pub struct RedisViewInvalidator {
    client: redis::Client,
    channel: String,
}

impl RedisViewInvalidator {
    /// Creates an invalidator publishing on `channel`.
    #[must_use]
    pub fn new(client: redis::Client, channel: impl Into<String>) -> Self {
        Self {
            client,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl ViewInvalidator for RedisViewInvalidator {
    async fn invalidate(&self, paths: &[ViewPath]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Remote(format!("failed to connect to redis: {error}")))?;

        for path in paths {
            let receivers: i64 = connection
                .publish(self.channel.as_str(), path.to_string())
                .await
                .map_err(|error| {
                    AppError::Remote(format!("failed to publish view invalidation: {error}"))
                })?;
            debug!(path = %path, receivers, "view invalidation published");
        }

        Ok(())
    }
}
