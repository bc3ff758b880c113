use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::images::upload_images::{ImageUpload, UploadImages};
use crate::application::use_cases::posts::create_post::{CreatePost, CreatePostInput};
use crate::application::use_cases::posts::get_post::GetPost;
use crate::application::use_cases::posts::list_posts::ListPosts;
use crate::bootstrap::app_context::AppContext;
use crate::domain::marketplace::Post;
use crate::presentation::http::auth::AuthUser;
use crate::presentation::http::discs::DiscResponse;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub disc: DiscResponse,
    pub price: f64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            disc: p.disc.into(),
            price: p.price,
            description: p.description,
            images: p.images,
            user_id: p.user_id,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePostResponse {
    pub message: String,
    pub post: PostResponse,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreatePostMultipart {
    pub title: String,
    #[schema(value_type = String, format = Uuid)]
    pub disc_id: String,
    pub price: String,
    pub description: Option<String>,
    /// Up to 5 image files
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/create", post(create_post))
        .route("/posts/me", get(list_my_posts))
        .route("/posts/users/:user_id", get(list_user_posts))
        .route("/posts/:post_id", get(get_post))
        .with_state(ctx)
}

/// POST /api/posts/create (multipart/form-data)
/// Fields: title, discId, price, description (optional), images (repeated)
#[utoipa::path(
    post,
    path = "/api/posts/create",
    tag = "Posts",
    request_body(content = CreatePostMultipart, content_type = "multipart/form-data"),
    responses((status = 201, description = "Post created", body = CreatePostResponse))
)]
pub async fn create_post(
    State(ctx): State<AppContext>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let mut title: Option<String> = None;
    let mut disc_id: Option<String> = None;
    let mut price: Option<String> = None;
    let mut description: Option<String> = None;
    let mut images: Vec<ImageUpload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".into()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => title = Some(read_text(field).await?),
            Some("discId") => disc_id = Some(read_text(field).await?),
            Some("price") => price = Some(read_text(field).await?),
            Some("description") => description = Some(read_text(field).await?),
            Some("images") | Some("images[]") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "image.bin".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .or_else(|| guess_content_type(&filename));
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| image_read_error(err.status()))?
                    .to_vec();
                images.push(ImageUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => { /* ignore additional fields */ }
        }
    }

    let title = non_empty(title).ok_or_else(missing_fields)?;
    let disc_id = non_empty(disc_id).ok_or_else(missing_fields)?;
    let price = non_empty(price).ok_or_else(missing_fields)?;
    let disc_id =
        Uuid::parse_str(disc_id.trim()).map_err(|_| ApiError::Validation("Invalid discId".into()))?;
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid price".into()))?;

    // Images go to object storage before the listing is written; a failed
    // write later does not remove objects already uploaded.
    let store = ctx.image_store();
    let uploader = UploadImages {
        store: store.as_ref(),
        max_files: ctx.cfg.upload_max_files,
        max_bytes: ctx.cfg.upload_max_bytes,
    };
    let image_urls = uploader.execute(images).await?;

    let posts = ctx.post_repo();
    let discs = ctx.disc_repo();
    let uc = CreatePost {
        posts: posts.as_ref(),
        discs: discs.as_ref(),
    };
    let post = uc
        .execute(CreatePostInput {
            title,
            disc_id,
            price,
            description: description.filter(|d| !d.is_empty()),
            images: image_urls,
            user_id: user.0,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post created successfully!".into(),
            post: post.into(),
        }),
    ))
}

#[utoipa::path(get, path = "/api/posts", tag = "Posts",
    responses((status = 200, body = [PostResponse])))]
pub async fn list_posts(
    State(ctx): State<AppContext>,
    _user: AuthUser,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = ctx.post_repo();
    let uc = ListPosts {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(None).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/posts/me", tag = "Posts",
    responses((status = 200, body = [PostResponse])))]
pub async fn list_my_posts(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = ctx.post_repo();
    let uc = ListPosts {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(Some(user.0)).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/posts/users/{user_id}", tag = "Posts",
    params(("user_id" = Uuid, Path, description = "Listing owner")),
    responses((status = 200, body = [PostResponse])))]
pub async fn list_user_posts(
    State(ctx): State<AppContext>,
    _user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = ctx.post_repo();
    let uc = ListPosts {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(Some(user_id)).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/posts/{post_id}", tag = "Posts",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses((status = 200, body = PostResponse)))]
pub async fn get_post(
    State(ctx): State<AppContext>,
    _user: AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let repo = ctx.post_repo();
    let uc = GetPost {
        repo: repo.as_ref(),
    };
    let post = uc
        .execute(post_id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;
    Ok(Json(post.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".into()))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn missing_fields() -> ApiError {
    ApiError::Validation("Missing required fields".into())
}

fn guess_content_type(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Only a body-limit overrun is a payload error; anything else while reading
/// an image field is a malformed request, same as the text fields.
fn image_read_error(status: StatusCode) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::Validation("Malformed multipart body".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_oversize_image_reads_map_to_payload_errors() {
        assert!(matches!(
            image_read_error(StatusCode::PAYLOAD_TOO_LARGE),
            ApiError::PayloadTooLarge
        ));
        assert!(matches!(
            image_read_error(StatusCode::BAD_REQUEST),
            ApiError::Validation(_)
        ));
    }
}
