//! Caller resolution and role checks.
//!
//! The host resolves a [`RequestContext`] once per inbound request and passes
//! it explicitly into every action; nothing about the caller is cached beyond
//! that request.

use std::sync::Arc;

use tracing::{info, warn};

use rentline_core::{AppError, AppResult, UserId, UserIdentity};
use rentline_domain::Role;

use crate::{AuthProvider, AuthSession, ProfileRepository};

/// Authenticated caller with the role read from their profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    identity: UserIdentity,
    role: Role,
}

impl Caller {
    /// Creates a caller from a resolved identity and role.
    #[must_use]
    pub fn new(identity: UserIdentity, role: Role) -> Self {
        Self { identity, role }
    }

    /// Returns the caller's user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.identity.user_id()
    }

    /// Returns the caller's identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the caller's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the caller is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Per-request caller context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    caller: Option<Caller>,
}

impl RequestContext {
    /// Context of a request without a session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    /// Context of a request made by a resolved caller.
    #[must_use]
    pub fn authenticated(caller: Caller) -> Self {
        Self {
            caller: Some(caller),
        }
    }

    /// Returns the caller, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    /// Returns whether the caller holds exactly this role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.caller.as_ref().is_some_and(|caller| caller.role == role)
    }

    /// Returns the caller or fails with `You must be logged in to {action}`.
    pub fn require_auth(&self, action: &str) -> AppResult<&Caller> {
        self.caller.as_ref().ok_or_else(|| {
            AppError::Unauthenticated(format!("You must be logged in to {action}"))
        })
    }

    /// Returns the caller when they hold one of the allowed roles.
    pub fn require_role(
        &self,
        action: &str,
        allowed: &[Role],
        denied_message: &str,
    ) -> AppResult<&Caller> {
        let caller = self.require_auth(action)?;
        if allowed.contains(&caller.role) {
            Ok(caller)
        } else {
            Err(AppError::Forbidden(denied_message.to_owned()))
        }
    }
}

/// Resolves request contexts from provider access tokens.
#[derive(Clone)]
pub struct AuthGateway {
    auth_provider: Arc<dyn AuthProvider>,
    profile_repository: Arc<dyn ProfileRepository>,
}

impl AuthGateway {
    /// Creates a new gateway.
    #[must_use]
    pub fn new(
        auth_provider: Arc<dyn AuthProvider>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            auth_provider,
            profile_repository,
        }
    }

    /// Resolves the caller behind an access token.
    ///
    /// A missing or rejected token yields an anonymous context, as does a
    /// provider outage. A user without a profile row is treated as a plain user.
    pub async fn resolve(&self, access_token: Option<&str>) -> AppResult<RequestContext> {
        let Some(access_token) = access_token else {
            return Ok(RequestContext::anonymous());
        };

        match self.lookup_user(access_token).await {
            Some(identity) => self.context_for(identity).await,
            None => Ok(RequestContext::anonymous()),
        }
    }

    /// Resolves a stored provider session, renewing it when the access token
    /// is no longer accepted.
    ///
    /// The renewed session, if any, must replace the stored tokens since the
    /// provider rotates refresh tokens.
    pub async fn resolve_session(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> AppResult<ResolvedSession> {
        match self.auth_provider.get_user(access_token).await {
            Ok(Some(identity)) => {
                return Ok(ResolvedSession {
                    context: self.context_for(identity).await?,
                    renewed: None,
                });
            }
            Ok(None) => {}
            Err(error) => {
                warn!(error = %error, "failed to resolve session user");
                return Ok(ResolvedSession::anonymous());
            }
        }

        let Some(refresh_token) = refresh_token else {
            return Ok(ResolvedSession::anonymous());
        };
        let renewed = match self.auth_provider.refresh_session(refresh_token).await {
            Ok(renewed) => renewed,
            Err(error) => {
                warn!(error = %error, "failed to refresh provider session");
                return Ok(ResolvedSession::anonymous());
            }
        };

        info!(user_id = %renewed.user.user_id(), "provider session refreshed");
        Ok(ResolvedSession {
            context: self.context_for(renewed.user.clone()).await?,
            renewed: Some(renewed),
        })
    }

    async fn lookup_user(&self, access_token: &str) -> Option<UserIdentity> {
        self.auth_provider
            .get_user(access_token)
            .await
            .unwrap_or_else(|error| {
                warn!(error = %error, "failed to resolve session user");
                None
            })
    }

    async fn context_for(&self, identity: UserIdentity) -> AppResult<RequestContext> {
        let role = self
            .profile_repository
            .find_by_id(identity.user_id())
            .await?
            .map(|profile| profile.role)
            .unwrap_or_default();

        Ok(RequestContext::authenticated(Caller::new(identity, role)))
    }
}

/// Outcome of resolving a stored provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// Context for the current request.
    pub context: RequestContext,
    /// Session issued by a refresh, to be stored in place of the old tokens.
    pub renewed: Option<AuthSession>,
}

impl ResolvedSession {
    fn anonymous() -> Self {
        Self {
            context: RequestContext::anonymous(),
            renewed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use rentline_core::{AppError, AppResult, UserId, UserIdentity};
    use rentline_domain::{Profile, ProfileUpdate, Role};

    use super::{AuthGateway, Caller, RequestContext};
    use crate::{AuthProvider, AuthSession, ProfileRepository};

    struct TokenAuthProvider {
        tokens: HashMap<String, UserIdentity>,
        refresh_tokens: HashMap<String, UserIdentity>,
    }

    #[async_trait]
    impl AuthProvider for TokenAuthProvider {
        async fn sign_up(&self, _: &str, _: &str, _: &str, _: &str) -> AppResult<UserIdentity> {
            Err(AppError::Internal("not used".to_owned()))
        }

        async fn sign_in_with_password(&self, _: &str, _: &str) -> AppResult<AuthSession> {
            Err(AppError::Internal("not used".to_owned()))
        }

        async fn reset_password_for_email(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }

        async fn update_user_password(&self, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }

        async fn sign_out(&self, _: &str) -> AppResult<()> {
            Ok(())
        }

        async fn get_user(&self, access_token: &str) -> AppResult<Option<UserIdentity>> {
            if access_token == "outage" {
                return Err(AppError::Remote("provider unavailable".to_owned()));
            }
            Ok(self.tokens.get(access_token).cloned())
        }

        async fn exchange_code_for_session(&self, _: &str, _: &str) -> AppResult<AuthSession> {
            Err(AppError::Internal("not used".to_owned()))
        }

        async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
            let user = self
                .refresh_tokens
                .get(refresh_token)
                .cloned()
                .ok_or_else(|| AppError::Remote("Invalid Refresh Token".to_owned()))?;

            Ok(AuthSession {
                access_token: "renewed".to_owned(),
                refresh_token: Some("rotated".to_owned()),
                user,
            })
        }
    }

    #[derive(Default)]
    struct FakeProfileRepository {
        profiles: Mutex<HashMap<UserId, Profile>>,
    }

    #[async_trait]
    impl ProfileRepository for FakeProfileRepository {
        async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<Profile>> {
            Ok(self.profiles.lock().await.get(&user_id).cloned())
        }

        async fn insert_if_missing(&self, profile: Profile) -> AppResult<Profile> {
            Ok(self
                .profiles
                .lock()
                .await
                .entry(profile.id)
                .or_insert(profile)
                .clone())
        }

        async fn update(
            &self,
            _user_id: UserId,
            _update: ProfileUpdate,
        ) -> AppResult<Option<Profile>> {
            Ok(None)
        }
    }

    async fn gateway_with(role: Option<Role>) -> (AuthGateway, UserId) {
        let user_id = UserId::new();
        let identity = UserIdentity::new(user_id, Some("agent@example.com".to_owned()));
        let provider = TokenAuthProvider {
            tokens: HashMap::from([("valid".to_owned(), identity.clone())]),
            refresh_tokens: HashMap::from([("refresh".to_owned(), identity)]),
        };
        let profiles = FakeProfileRepository::default();
        if let Some(role) = role {
            let mut profile = Profile::new_user(user_id, None, Utc::now());
            profile.role = role;
            profiles.profiles.lock().await.insert(user_id, profile);
        }

        (
            AuthGateway::new(Arc::new(provider), Arc::new(profiles)),
            user_id,
        )
    }

    #[tokio::test]
    async fn resolves_caller_role_from_profile() {
        let (gateway, user_id) = gateway_with(Some(Role::Agent)).await;

        let context = gateway
            .resolve(Some("valid"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let caller = context.current_user();
        assert_eq!(caller.map(Caller::user_id), Some(user_id));
        assert!(context.has_role(Role::Agent));
        assert!(!context.has_role(Role::Admin));
    }

    #[tokio::test]
    async fn missing_profile_means_plain_user() {
        let (gateway, _) = gateway_with(None).await;

        let context = gateway
            .resolve(Some("valid"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(context.has_role(Role::User));
    }

    #[tokio::test]
    async fn unknown_token_and_outage_are_anonymous() {
        let (gateway, _) = gateway_with(Some(Role::Admin)).await;

        for token in [None, Some("expired"), Some("outage")] {
            let context = gateway
                .resolve(token)
                .await
                .unwrap_or_else(|_| unreachable!());
            assert_eq!(context, RequestContext::anonymous());
        }
    }

    #[tokio::test]
    async fn expired_access_token_is_renewed_with_refresh_token() {
        let (gateway, user_id) = gateway_with(Some(Role::Agent)).await;

        let resolved = gateway
            .resolve_session("expired", Some("refresh"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            resolved.context.current_user().map(Caller::user_id),
            Some(user_id)
        );
        assert!(resolved.context.has_role(Role::Agent));
        let renewed = resolved
            .renewed
            .unwrap_or_else(|| panic!("expired session should be renewed"));
        assert_eq!(renewed.access_token, "renewed");
        assert_eq!(renewed.refresh_token.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn live_token_is_not_renewed_and_bad_refresh_is_anonymous() {
        let (gateway, _) = gateway_with(None).await;

        let live = gateway
            .resolve_session("valid", Some("refresh"))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(live.renewed.is_none());
        assert!(live.context.current_user().is_some());

        for refresh_token in [None, Some("revoked")] {
            let resolved = gateway
                .resolve_session("expired", refresh_token)
                .await
                .unwrap_or_else(|_| unreachable!());
            assert_eq!(resolved.context, RequestContext::anonymous());
            assert!(resolved.renewed.is_none());
        }
    }

    #[test]
    fn require_helpers_fail_with_descriptive_errors() {
        let anonymous = RequestContext::anonymous();
        assert!(matches!(
            anonymous.require_auth("save a listing"),
            Err(AppError::Unauthenticated(message))
                if message == "You must be logged in to save a listing"
        ));

        let user = RequestContext::authenticated(Caller::new(
            UserIdentity::new(UserId::new(), None),
            Role::User,
        ));
        assert!(matches!(
            user.require_role(
                "create a listing",
                &[Role::Agent, Role::Admin],
                "Only agents and admins can create listings"
            ),
            Err(AppError::Forbidden(_))
        ));
    }
}
