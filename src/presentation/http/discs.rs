use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::discs::list_discs::ListDiscs;
use crate::bootstrap::app_context::AppContext;
use crate::domain::marketplace::Disc;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscResponse {
    pub id: Uuid,
    pub manufacturer: String,
    pub name: String,
    pub speed: i32,
    pub glide: i32,
    pub turn: i32,
    pub fade: i32,
}

impl From<Disc> for DiscResponse {
    fn from(d: Disc) -> Self {
        Self {
            id: d.id,
            manufacturer: d.manufacturer,
            name: d.name,
            speed: d.flight.speed,
            glide: d.flight.glide,
            turn: d.flight.turn,
            fade: d.flight.fade,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/discs", get(list_discs)).with_state(ctx)
}

#[utoipa::path(get, path = "/api/discs", tag = "Discs", security(()),
    responses((status = 200, body = [DiscResponse])))]
pub async fn list_discs(State(ctx): State<AppContext>) -> Result<Json<Vec<DiscResponse>>, ApiError> {
    let repo = ctx.disc_repo();
    let uc = ListDiscs {
        repo: repo.as_ref(),
    };
    let discs = uc.execute().await?;
    Ok(Json(discs.into_iter().map(Into::into).collect()))
}
