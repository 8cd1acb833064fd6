use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rentline_application::{RequestContext, ResolvedSession};
use rentline_core::{AppError, AppResult};
use tower_sessions::Session;
use url::{Origin, Url};

use crate::auth::{SessionTokens, replace_tokens, stored_tokens};
use crate::error::{ApiError, ApiResult, action_response};
use crate::state::AppState;

/// Resolves the caller behind the session's provider tokens for every request.
///
/// An expired access token is renewed with the stored refresh token and the
/// rotated tokens replace the old ones.
pub async fn resolve_request_context(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_context(&state, &session).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(error) => reject(&request, error),
    }
}

async fn resolve_context(state: &AppState, session: &Session) -> AppResult<RequestContext> {
    let Some(tokens) = stored_tokens(session).await? else {
        return Ok(RequestContext::anonymous());
    };

    let ResolvedSession { context, renewed } = state
        .auth_gateway
        .resolve_session(&tokens.access_token, tokens.refresh_token.as_deref())
        .await?;
    if let Some(renewed) = renewed {
        replace_tokens(session, SessionTokens::from(renewed)).await?;
    }

    Ok(context)
}

pub async fn require_auth(request: Request, next: Next) -> ApiResult<Response> {
    let signed_in = request
        .extensions()
        .get::<RequestContext>()
        .is_some_and(|context| context.current_user().is_some());
    if !signed_in {
        return Err(AppError::Unauthenticated("authentication required".to_owned()).into());
    }

    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_state_changing_method(request.method())
        && let Err(error) = check_same_origin(request.headers(), &state.frontend_url)
    {
        return reject(&request, error);
    }

    next.run(request).await
}

fn check_same_origin(headers: &HeaderMap, frontend_url: &str) -> AppResult<()> {
    if headers
        .get("sec-fetch-site")
        .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
    {
        return Err(AppError::Forbidden("cross-site request blocked".to_owned()));
    }

    let allowed_origin = origin_of(frontend_url)
        .ok_or_else(|| AppError::Internal(format!("invalid frontend URL '{frontend_url}'")))?;
    let matches_allowed = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(origin_of)
            .is_some_and(|origin| origin == allowed_origin)
    };

    if !matches_allowed(header::ORIGIN) && !matches_allowed(header::REFERER) {
        return Err(AppError::Forbidden("origin validation failed".to_owned()));
    }

    Ok(())
}

fn origin_of(value: &str) -> Option<Origin> {
    Url::parse(value)
        .ok()
        .map(|url| url.origin())
        .filter(Origin::is_tuple)
}

/// Mutations under `/api/` answer with the uniform action body.
fn reject(request: &Request, error: AppError) -> Response {
    let is_action =
        is_state_changing_method(request.method()) && request.uri().path().starts_with("/api/");
    if is_action {
        action_response::<()>("authorize request", Err(error))
    } else {
        ApiError(error).into_response()
    }
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
