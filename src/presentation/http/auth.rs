use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::auth::verify_email::VerifyEmail;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::presentation::http::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = validate_name))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = validate_password))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = validate_password))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    /// Token kind; a refresh token is never a bearer credential and an
    /// access token never mints new tokens.
    pub typ: String,
}

const TOKEN_KIND_ACCESS: &str = "access";
const TOKEN_KIND_REFRESH: &str = "refresh";

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/verify/:token", get(verify_email))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/user/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 200, body = RegisterResponse)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(first_validation_message(&e)))?;

    let repo = ctx.user_repo();
    let mailer = ctx.mailer();
    let base_url = ctx.cfg.verification_base_url();
    let uc = RegisterUc {
        repo: repo.as_ref(),
        mailer: mailer.as_ref(),
        verification_base_url: &base_url,
    };
    let user_id = uc
        .execute(&RegisterDto {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok(Json(RegisterResponse {
        user: user_id,
        message: "Verification email sent, please check your inbox".into(),
    }))
}

#[utoipa::path(get, path = "/api/user/verify/{token}", tag = "Auth", security(()),
    params(("token" = String, Path, description = "Emailed verification token")),
    responses((status = 200, body = MessageResponse)))]
pub async fn verify_email(
    State(ctx): State<AppContext>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = VerifyEmail {
        repo: repo.as_ref(),
    };
    if !uc.execute(&token).await? {
        return Err(ApiError::InvalidVerificationToken);
    }
    Ok(Json(MessageResponse {
        message: "Email successfully verified".into(),
    }))
}

#[utoipa::path(post, path = "/api/user/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = TokenResponse)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(first_validation_message(&e)))?;

    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(&LoginDto {
            email: req.email,
            password: req.password,
        })
        .await?;

    let access = sign_token(
        &ctx.cfg,
        user.id,
        ctx.cfg.access_token_ttl_secs,
        TOKEN_KIND_ACCESS,
    )?;
    let refresh = sign_token(
        &ctx.cfg,
        user.id,
        ctx.cfg.refresh_token_ttl_secs,
        TOKEN_KIND_REFRESH,
    )?;

    let mut headers = HeaderMap::new();
    set_refresh_cookie(&mut headers, &ctx.cfg, &refresh);
    Ok((headers, Json(TokenResponse { token: access })))
}

/// Mints a new access token from the refresh cookie and rotates the cookie.
/// There is no server-side revocation list; a leaked refresh token stays
/// valid until it expires.
#[utoipa::path(post, path = "/api/user/refresh-token", tag = "Auth", security(()), responses(
    (status = 200, body = TokenResponse)
))]
pub async fn refresh_token(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let cookie_hdr = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::AccessDenied)?;
    let token = get_cookie(cookie_hdr, REFRESH_COOKIE).ok_or(ApiError::AccessDenied)?;

    let sub =
        decode_sub(&ctx.cfg, &token, TOKEN_KIND_REFRESH).map_err(|_| ApiError::InvalidAuthToken)?;
    let user_id = Uuid::parse_str(&sub).map_err(|_| ApiError::InvalidAuthToken)?;

    let access = sign_token(
        &ctx.cfg,
        user_id,
        ctx.cfg.access_token_ttl_secs,
        TOKEN_KIND_ACCESS,
    )?;
    let refresh = sign_token(
        &ctx.cfg,
        user_id,
        ctx.cfg.refresh_token_ttl_secs,
        TOKEN_KIND_REFRESH,
    )?;

    let mut out = HeaderMap::new();
    set_refresh_cookie(&mut out, &ctx.cfg, &refresh);
    Ok((out, Json(TokenResponse { token: access })))
}

#[utoipa::path(post, path = "/api/user/logout", tag = "Auth", security(()), responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    // Clear the cookie by setting it expired
    let mut headers = HeaderMap::new();
    let cookie = build_refresh_cookie("", 0, is_secure(&ctx.cfg));
    if let Ok(v) = axum::http::HeaderValue::from_str(&cookie) {
        headers.insert(axum::http::header::SET_COOKIE, v);
    }
    (headers, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/user/me", tag = "Auth", responses((status = 200, body = UserResponse)))]
pub async fn me(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let row = uc.execute(user.0).await?.ok_or(ApiError::AccessDenied)?;
    Ok(Json(UserResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        is_verified: row.is_verified,
        created_at: row.created_at,
    }))
}

// --- Authenticated-subject extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Verified caller, attached to the request by the extractor below.
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(ApiError::AccessDenied)?;
        let sub = decode_sub(&ctx.cfg, &token, TOKEN_KIND_ACCESS)
            .map_err(|_| ApiError::InvalidAuthToken)?;
        let id = Uuid::parse_str(&sub).map_err(|_| ApiError::InvalidAuthToken)?;
        Ok(AuthUser(id))
    }
}

/// Bearer credential from the Authorization header, with a fallback to the
/// legacy bare `token` header older clients still send.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(t) = auth.strip_prefix("Bearer ") {
            return Some(t.to_string());
        }
    }
    headers
        .get("token")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

pub(crate) fn sign_token(
    cfg: &Config,
    sub: Uuid,
    ttl_secs: i64,
    kind: &str,
) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + ttl_secs.max(0) as usize,
        typ: kind.to_string(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

pub(crate) fn decode_sub(
    cfg: &Config,
    token: &str,
    kind: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.typ != kind {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(data.claims.sub)
}

// --- Cookie helpers ---

const REFRESH_COOKIE: &str = "refresh_token";

fn is_secure(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_refresh_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        REFRESH_COOKIE,
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

fn set_refresh_cookie(headers: &mut HeaderMap, cfg: &Config, token: &str) {
    let cookie = build_refresh_cookie(token, cfg.refresh_token_ttl_secs, is_secure(cfg));
    if let Ok(v) = axum::http::HeaderValue::from_str(&cookie) {
        headers.insert(axum::http::header::SET_COOKIE, v);
    }
}

fn length_error(message: &'static str) -> validator::ValidationError {
    let mut err = validator::ValidationError::new("length");
    err.message = Some(message.into());
    err
}

fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    let len = name.chars().count();
    if len < 3 {
        return Err(length_error(
            "\"name\" length must be at least 3 characters long",
        ));
    }
    if len > 255 {
        return Err(length_error(
            "\"name\" length must be less than or equal to 255 characters long",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), validator::ValidationError> {
    let len = password.chars().count();
    if len < 6 {
        return Err(length_error(
            "\"password\" length must be at least 6 characters long",
        ));
    }
    if len > 1024 {
        return Err(length_error(
            "\"password\" length must be less than or equal to 1024 characters long",
        ));
    }
    Ok(())
}

/// Reports fields in schema declaration order; the error map itself is
/// unordered.
pub(crate) fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let fields = errors.field_errors();
    for field in ["name", "email", "password"] {
        if let Some(message) = fields
            .get(field)
            .into_iter()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref())
            .next()
        {
            return message.to_string();
        }
    }
    fields
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}
