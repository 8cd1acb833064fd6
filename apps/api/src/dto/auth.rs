use rentline_application::Caller;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email/password registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sign-up-request.ts"
)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Incoming payload for email/password sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sign-in-request.ts"
)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Incoming payload for requesting a password reset email.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/forgot-password-request.ts"
)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Incoming payload for setting a new password from the reset page.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/reset-password-request.ts"
)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Query string of the email and OAuth callback.
#[derive(Debug, Default, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub redirect_to: Option<String>,
}

/// API representation of the signed-in user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-user-response.ts"
)]
pub struct SessionUserResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub role: String,
}

impl From<&Caller> for SessionUserResponse {
    fn from(caller: &Caller) -> Self {
        Self {
            user_id: caller.user_id().to_string(),
            email: caller.identity().email().map(str::to_owned),
            role: caller.role().as_str().to_owned(),
        }
    }
}
