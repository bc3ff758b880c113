use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use discmarket::bootstrap::app_context::{AppContext, AppServices};
use discmarket::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            discmarket::presentation::http::auth::register,
            discmarket::presentation::http::auth::verify_email,
            discmarket::presentation::http::auth::login,
            discmarket::presentation::http::auth::refresh_token,
            discmarket::presentation::http::auth::logout,
            discmarket::presentation::http::auth::me,
            discmarket::presentation::http::users::list_users,
            discmarket::presentation::http::users::get_user,
            discmarket::presentation::http::posts::create_post,
            discmarket::presentation::http::posts::list_posts,
            discmarket::presentation::http::posts::list_my_posts,
            discmarket::presentation::http::posts::list_user_posts,
            discmarket::presentation::http::posts::get_post,
            discmarket::presentation::http::discs::list_discs,
            discmarket::presentation::http::health::health,
        ),
        components(schemas(
            discmarket::presentation::http::auth::RegisterRequest,
            discmarket::presentation::http::auth::RegisterResponse,
            discmarket::presentation::http::auth::LoginRequest,
            discmarket::presentation::http::auth::TokenResponse,
            discmarket::presentation::http::auth::MessageResponse,
            discmarket::presentation::http::auth::UserResponse,
            discmarket::presentation::http::posts::PostResponse,
            discmarket::presentation::http::posts::CreatePostResponse,
            discmarket::presentation::http::posts::CreatePostMultipart,
            discmarket::presentation::http::discs::DiscResponse,
            discmarket::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Registration, verification and tokens"),
            (name = "Users", description = "User profiles"),
            (name = "Discs", description = "Disc catalog"),
            (name = "Posts", description = "Marketplace listings"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "discmarket=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.api_port, "Starting disc marketplace backend");

    // Database
    let pool = discmarket::infrastructure::db::connect_pool(&cfg.database_url).await?;
    discmarket::infrastructure::db::migrate(&pool).await?;

    // External collaborators
    let image_store = Arc::new(discmarket::infrastructure::storage::S3ImageStore::new(&cfg).await?);
    let mailer = Arc::new(discmarket::infrastructure::mail::HttpMailer::new(&cfg));

    // Repositories
    let user_repo = Arc::new(
        discmarket::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );
    let disc_repo = Arc::new(
        discmarket::infrastructure::db::repositories::disc_repository_sqlx::SqlxDiscRepository::new(
            pool.clone(),
        ),
    );
    let post_repo = Arc::new(
        discmarket::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository::new(
            pool.clone(),
        ),
    );

    let services = AppServices::new(user_repo, disc_repo, post_repo, mailer, image_store);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => cors_layer(AllowOrigin::exact(v)),
            Err(_) => cors_layer(AllowOrigin::mirror_request()),
        }
    } else if cfg.is_production {
        // FRONTEND_URL is mandatory in production (enforced earlier); deny all as fallback
        cors_layer(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
    } else {
        // Development convenience
        cors_layer(AllowOrigin::mirror_request())
    };

    // Multipart bodies carry up to max_files images plus the text fields.
    let body_limit = cfg.upload_max_bytes * cfg.upload_max_files + 64 * 1024;

    let app = Router::new()
        .nest(
            "/api",
            discmarket::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/user",
            discmarket::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            discmarket::presentation::http::users::routes(ctx.clone()),
        )
        .nest(
            "/api",
            discmarket::presentation::http::posts::routes(ctx.clone()),
        )
        .nest(
            "/api",
            discmarket::presentation::http::discs::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origin: AllowOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::header::AUTHORIZATION,
            http::header::HeaderName::from_static("token"),
        ])
        .allow_credentials(true)
}
