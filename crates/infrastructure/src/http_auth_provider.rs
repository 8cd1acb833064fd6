use async_trait::async_trait;
use rentline_application::{AuthProvider, AuthSession, PKCE_CHALLENGE_METHOD};
use rentline_core::{AppError, AppResult, UserId, UserIdentity};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

/// Auth provider backed by a hosted GoTrue-compatible REST API.
#[derive(Clone)]
pub struct HttpAuthProvider {
    http_client: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    refresh_token: Option<String>,
    user: UserPayload,
}

/// Sign-up answers with a bare user when confirmation is pending, or a session otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpPayload {
    Session(SessionPayload),
    User(UserPayload),
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorPayload {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

impl From<UserPayload> for UserIdentity {
    fn from(payload: UserPayload) -> Self {
        Self::new(UserId::from_uuid(payload.id), payload.email)
    }
}

impl From<SessionPayload> for AuthSession {
    fn from(payload: SessionPayload) -> Self {
        Self {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            user: payload.user.into(),
        }
    }
}

impl HttpAuthProvider {
    /// Creates a provider for the project at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        anon_key: impl Into<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid auth provider URL '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("invalid auth endpoint '{path}': {error}"))
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = builder.send().await.map_err(|error| {
            AppError::Remote(format!("auth provider request failed: {error}"))
        })?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = response
            .json::<ErrorPayload>()
            .await
            .ok()
            .and_then(ErrorPayload::into_message)
            .unwrap_or_else(|| format!("auth provider responded with status {status}"));

        Err(AppError::Remote(message))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> AppResult<AuthSession> {
        let url = self.endpoint("auth/v1/token", &[("grant_type", grant_type)])?;
        let response = self
            .send(self.request(reqwest::Method::POST, url).json(&body))
            .await?;

        Self::decode::<SessionPayload>(response)
            .await
            .map(AuthSession::from)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|error| {
            AppError::Remote(format!("invalid auth provider response: {error}"))
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<UserIdentity> {
        let url = self.endpoint("auth/v1/signup", &[("redirect_to", email_redirect_to)])?;
        let response = self
            .send(self.request(reqwest::Method::POST, url).json(&json!({
                "email": email,
                "password": password,
                "code_challenge": code_challenge,
                "code_challenge_method": PKCE_CHALLENGE_METHOD,
            })))
            .await?;

        Ok(match Self::decode::<SignUpPayload>(response).await? {
            SignUpPayload::Session(session) => session.user.into(),
            SignUpPayload::User(user) => user.into(),
        })
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        self.token_grant("password", json!({"email": email, "password": password}))
            .await
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<()> {
        let url = self.endpoint("auth/v1/recover", &[("redirect_to", redirect_to)])?;
        self.send(self.request(reqwest::Method::POST, url).json(&json!({
            "email": email,
            "code_challenge": code_challenge,
            "code_challenge_method": PKCE_CHALLENGE_METHOD,
        })))
        .await?;

        Ok(())
    }

    async fn update_user_password(&self, access_token: &str, password: &str) -> AppResult<()> {
        let url = self.endpoint("auth/v1/user", &[])?;
        self.send(
            self.request(reqwest::Method::PUT, url)
                .bearer_auth(access_token)
                .json(&json!({"password": password})),
        )
        .await?;

        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let url = self.endpoint("auth/v1/logout", &[])?;
        self.send(self.request(reqwest::Method::POST, url).bearer_auth(access_token))
            .await?;

        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<Option<UserIdentity>> {
        let url = self.endpoint("auth/v1/user", &[])?;
        let response = self
            .request(reqwest::Method::GET, url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|error| AppError::Remote(format!("auth provider request failed: {error}")))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => Self::decode::<UserPayload>(response)
                .await
                .map(|user| Some(user.into())),
            status => Err(AppError::Remote(format!(
                "auth provider responded with status {status}"
            ))),
        }
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> AppResult<AuthSession> {
        self.token_grant(
            "pkce",
            json!({"auth_code": code, "code_verifier": code_verifier}),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        self.token_grant("refresh_token", json!({"refresh_token": refresh_token}))
            .await
    }
}
