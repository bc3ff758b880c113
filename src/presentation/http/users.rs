use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::application::use_cases::users::get_user::GetUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{AuthUser, UserResponse};
use crate::presentation::http::error::ApiError;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users", tag = "Users",
    responses((status = 200, body = [UserResponse])))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    _user: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let rows = uc.execute().await?;
    Ok(Json(
        rows.into_iter()
            .map(|r| UserResponse {
                id: r.id,
                name: r.name,
                email: r.email,
                is_verified: r.is_verified,
                created_at: r.created_at,
            })
            .collect(),
    ))
}

#[utoipa::path(get, path = "/api/users/{user_id}", tag = "Users", security(()),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = UserResponse)))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        is_verified: row.is_verified,
        created_at: row.created_at,
    }))
}
