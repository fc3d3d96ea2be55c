use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use humor_app::application::VotingPage;
use humor_app::domain::{Category, GalleryPage, PageNumber, VoteDirection};
use humor_app::AppContext;
use humor_errors::AppError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/votes", post(record_vote).delete(retract_vote))
        .route("/voting", get(voting_page))
        .route("/gallery", get(gallery_page))
        .route("/categories", get(list_categories))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(ctx)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordVoteBody {
    #[serde(alias = "caption_id")]
    caption_id: Option<String>,
    #[serde(alias = "rating")]
    direction: Option<serde_json::Value>,
}

impl RecordVoteBody {
    /// Only JSON integers get through; `1.0` or `"1"` are rejected.
    fn direction(&self) -> Result<Option<i64>, AppError> {
        match &self.direction {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| AppError::InvalidArgument(format!("direction must be 1 or -1, got {value}"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetractVoteBody {
    #[serde(alias = "caption_id")]
    caption_id: Option<String>,
}

#[derive(Serialize)]
struct RecordVoteResponse {
    direction: VoteDirection,
}

#[derive(Serialize)]
struct RetractVoteResponse {
    ok: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<String>,
    category: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// An empty body reads as `{}` so missing fields surface as invalid input.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::InvalidArgument(format!("malformed JSON body: {}", e)))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn record_vote(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecordVoteResponse>, AppError> {
    let viewer = ctx
        .authenticate(bearer_token(&headers))
        .await?
        .ok_or_else(|| AppError::Unauthenticated("missing bearer token".to_string()))?;

    let body: RecordVoteBody = parse_body(&body)?;
    let direction = ctx
        .vote_recorder
        .record(Some(&viewer), body.caption_id.as_deref(), body.direction()?)
        .await?;

    Ok(Json(RecordVoteResponse { direction }))
}

async fn retract_vote(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RetractVoteResponse>, AppError> {
    let viewer = ctx
        .authenticate(bearer_token(&headers))
        .await?
        .ok_or_else(|| AppError::Unauthenticated("missing bearer token".to_string()))?;

    let body: RetractVoteBody = parse_body(&body)?;
    ctx.vote_recorder
        .retract(Some(&viewer), body.caption_id.as_deref())
        .await?;

    Ok(Json(RetractVoteResponse { ok: true }))
}

async fn voting_page(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<VotingPage>, AppError> {
    let viewer = ctx.authenticate(bearer_token(&headers)).await?;
    let page = PageNumber::from_query(query.page.as_deref());
    Ok(Json(ctx.voting_feed.page(viewer.as_ref(), page).await?))
}

async fn gallery_page(
    State(ctx): State<AppContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<GalleryPage>, AppError> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| Uuid::parse_str(c).map_err(|_| AppError::InvalidArgument(format!("malformed category id: {c}"))))
        .transpose()?;
    let page = PageNumber::from_query(query.page.as_deref());
    Ok(Json(ctx.gallery.page(page, category).await?))
}

async fn list_categories(State(ctx): State<AppContext>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(ctx.gallery.categories().await?))
}
