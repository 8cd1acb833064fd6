use std::sync::Arc;

use tracing::info;

use rentline_core::{AppError, AppResult};
use rentline_domain::schemas::PROFILE;
use rentline_domain::{Profile, ProfileUpdate};

use crate::{ActionInput, ProfileRepository, RequestContext, validate_action_input};

/// Application service for the caller's own profile.
#[derive(Clone)]
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    /// Creates a new profile service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Returns the caller's profile.
    pub async fn get_profile(&self, context: &RequestContext) -> AppResult<Profile> {
        let caller = context.require_auth("view your profile")?;
        self.repository
            .find_by_id(caller.user_id())
            .await?
            .ok_or_else(profile_not_found)
    }

    /// Updates the caller's display name and avatar. The role is never written.
    pub async fn update_profile(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<Profile> {
        let caller = context.require_auth("update your profile")?;
        let update: ProfileUpdate = validate_action_input(&PROFILE, input)?;

        let profile = self
            .repository
            .update(caller.user_id(), update)
            .await?
            .ok_or_else(profile_not_found)?;

        info!(user_id = %caller.user_id(), "profile updated");
        Ok(profile)
    }
}

fn profile_not_found() -> AppError {
    AppError::NotFound("Profile not found".to_owned())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;

    use rentline_core::AppError;
    use rentline_domain::{Profile, Role};

    use crate::test_support::{FakeProfileRepository, context_for};

    use super::ProfileService;

    #[tokio::test]
    async fn role_in_update_input_is_ignored() {
        let repository = Arc::new(FakeProfileRepository::default());
        let (user, user_id) = context_for(Role::User);
        repository
            .profiles
            .lock()
            .await
            .insert(user_id, Profile::new_user(user_id, None, Utc::now()));
        let service = ProfileService::new(repository);

        let updated = service
            .update_profile(
                &user,
                json!({
                    "full_name": "Dana Reyes",
                    "avatar_url": "https://images.example.co/dana.png",
                    "role": "admin",
                })
                .into(),
            )
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(updated.role, Role::User);
        assert_eq!(updated.full_name.as_deref(), Some("Dana Reyes"));
    }

    #[tokio::test]
    async fn invalid_profile_fields_are_reported() {
        let service = ProfileService::new(Arc::new(FakeProfileRepository::default()));
        let (user, _) = context_for(Role::User);

        let result = service
            .update_profile(
                &user,
                json!({"full_name": "", "avatar_url": "not a url", "role": "owner"}).into(),
            )
            .await;

        let Err(AppError::InvalidFields(errors)) = result else {
            unreachable!("expected field errors");
        };
        assert_eq!(
            errors.get("full_name"),
            Some(["Full name is required".to_owned()].as_slice())
        );
        assert!(errors.contains("avatar_url"));
        assert!(errors.contains("role"));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let service = ProfileService::new(Arc::new(FakeProfileRepository::default()));
        let (user, _) = context_for(Role::User);

        assert!(matches!(
            service.get_profile(&user).await,
            Err(AppError::NotFound(_))
        ));
    }
}
