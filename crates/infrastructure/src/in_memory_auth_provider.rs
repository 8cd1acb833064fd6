use std::collections::HashMap;

use async_trait::async_trait;
use rentline_application::{AuthProvider, AuthSession, PkcePair};
use rentline_core::{AppError, AppResult, UserId, UserIdentity};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    /// Challenge of the latest emailed link.
    pending_challenge: Option<String>,
}

#[derive(Debug, Clone)]
struct IssuedCode {
    user: UserIdentity,
    challenge: Option<String>,
}

#[derive(Debug, Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, UserIdentity>,
    refresh_tokens: HashMap<String, UserIdentity>,
    codes: HashMap<String, IssuedCode>,
    reset_requests: Vec<(String, String)>,
}

/// In-memory auth provider for local runs and tests.
///
/// Accounts are confirmed immediately and tokens are random strings.
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    state: RwLock<AuthState>,
}

impl InMemoryAuthProvider {
    /// Creates a provider without accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the one-time code the latest emailed link for `email` carries.
    pub async fn issue_code(&self, email: &str) -> AppResult<String> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get(email)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("account '{email}' not found")))?;

        let code = Uuid::new_v4().simple().to_string();
        state.codes.insert(
            code.clone(),
            IssuedCode {
                user: UserIdentity::new(account.user_id, Some(email.to_owned())),
                challenge: account.pending_challenge,
            },
        );
        Ok(code)
    }

    /// Returns the (email, redirect) pairs of requested password resets.
    pub async fn reset_requests(&self) -> Vec<(String, String)> {
        self.state.read().await.reset_requests.clone()
    }

    /// Stops accepting every issued access token. Refresh tokens stay valid.
    pub async fn expire_access_tokens(&self) {
        self.state.write().await.sessions.clear();
    }

    fn open_session(state: &mut AuthState, user: UserIdentity) -> AuthSession {
        let access_token = Uuid::new_v4().simple().to_string();
        let refresh_token = Uuid::new_v4().simple().to_string();
        state.sessions.insert(access_token.clone(), user.clone());
        state.refresh_tokens.insert(refresh_token.clone(), user.clone());

        AuthSession {
            access_token,
            refresh_token: Some(refresh_token),
            user,
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _email_redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<UserIdentity> {
        let mut state = self.state.write().await;
        if state.accounts.contains_key(email) {
            return Err(AppError::Remote("User already registered".to_owned()));
        }

        let user_id = UserId::new();
        state.accounts.insert(
            email.to_owned(),
            Account {
                user_id,
                password: password.to_owned(),
                pending_challenge: Some(code_challenge.to_owned()),
            },
        );
        Ok(UserIdentity::new(user_id, Some(email.to_owned())))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get(email)
            .filter(|account| account.password == password)
            .cloned()
            .ok_or_else(|| AppError::Remote("Invalid login credentials".to_owned()))?;

        Ok(Self::open_session(
            &mut state,
            UserIdentity::new(account.user_id, Some(email.to_owned())),
        ))
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(account) = state.accounts.get_mut(email) {
            account.pending_challenge = Some(code_challenge.to_owned());
        }
        state
            .reset_requests
            .push((email.to_owned(), redirect_to.to_owned()));
        Ok(())
    }

    async fn update_user_password(&self, access_token: &str, password: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let email = state
            .sessions
            .get(access_token)
            .and_then(|user| user.email().map(str::to_owned))
            .ok_or_else(|| AppError::Unauthenticated("invalid session".to_owned()))?;

        if let Some(account) = state.accounts.get_mut(email.as_str()) {
            account.password = password.to_owned();
        }
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.state.write().await.sessions.remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<Option<UserIdentity>> {
        Ok(self.state.read().await.sessions.get(access_token).cloned())
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> AppResult<AuthSession> {
        let mut state = self.state.write().await;
        let issued = state
            .codes
            .remove(code)
            .ok_or_else(|| AppError::Remote("invalid or expired auth code".to_owned()))?;

        let expected = PkcePair::from_verifier(code_verifier.to_owned());
        if issued.challenge.as_deref() != Some(expected.challenge()) {
            return Err(AppError::Remote(
                "code challenge does not match previously saved code verifier".to_owned(),
            ));
        }

        Ok(Self::open_session(&mut state, issued.user))
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let mut state = self.state.write().await;
        let user = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::Remote("Invalid Refresh Token".to_owned()))?;

        Ok(Self::open_session(&mut state, user))
    }
}
