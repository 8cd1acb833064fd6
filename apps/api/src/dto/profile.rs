use rentline_domain::Profile;
use serde::Serialize;
use ts_rs::TS;

/// API representation of the caller's profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            role: profile.role.as_str().to_owned(),
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}
