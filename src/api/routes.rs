//! API Routes
//!
//! HTTP endpoint definitions. Array routes are registered once; child routes
//! are registered per `ChildKind` with the kind carried as a request extension.

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::domain::{ArrayId, ChildKind, OperationContext, VolumeId};
use crate::error::{AppError, AppResult};
use crate::handlers::{PageQuery, Pagination};
use crate::projection::{ArrayView, Envelope, ViewMode, VolumeView};

use super::state::AppState;

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    let arrays = Router::new()
        .route("/arrays", get(list_arrays).post(create_array))
        .route("/arrays/detail", get(list_arrays_detail))
        .route("/arrays/:array_id", get(show_array).delete(delete_array));

    ChildKind::ALL
        .into_iter()
        .fold(arrays, |router, kind| router.merge(child_router(kind)))
}

/// Routes for one kind of child resource under `/arrays/:array_id`
fn child_router(kind: ChildKind) -> Router<AppState> {
    let collection = format!("/arrays/:array_id/{}", kind.collection_name());

    Router::new()
        .route(&collection, get(list_children).post(create_child))
        .route(&format!("{}/detail", collection), get(list_children_detail))
        .route(
            &format!("{}/:child_id", collection),
            get(show_child).put(update_child).delete(delete_child),
        )
        .layer(Extension(kind))
}

// =========================================================================
// Path ids
// =========================================================================

// Ids that do not parse cannot name an existing resource.

fn parse_array_id(raw: &str) -> AppResult<ArrayId> {
    raw.parse().map_err(|_| AppError::array_not_found(raw))
}

fn parse_child_id(kind: ChildKind, raw: &str) -> AppResult<VolumeId> {
    raw.parse()
        .map_err(|_| AppError::child_not_found(kind, raw))
}

fn page(state: &AppState, query: &PageQuery) -> AppResult<Pagination> {
    Pagination::from_query(query, state.settings.max_limit)
}

// =========================================================================
// Arrays
// =========================================================================

/// GET /arrays
async fn list_arrays(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Envelope<Vec<ArrayView>>>> {
    let page = page(&state, &query)?;
    let views = state.array_handler().list(ViewMode::Summary, page).await?;
    Ok(Json(views))
}

/// GET /arrays/detail
async fn list_arrays_detail(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Envelope<Vec<ArrayView>>>> {
    let page = page(&state, &query)?;
    let views = state.array_handler().list(ViewMode::Detail, page).await?;
    Ok(Json(views))
}

/// GET /arrays/:array_id
async fn show_array(
    State(state): State<AppState>,
    Path(array_id): Path<String>,
) -> AppResult<Json<Envelope<ArrayView>>> {
    let array_id = parse_array_id(&array_id)?;
    Ok(Json(state.array_handler().show(array_id).await?))
}

/// POST /arrays
async fn create_array(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    body: Bytes,
) -> AppResult<Json<Envelope<ArrayView>>> {
    Ok(Json(state.array_handler().create(&body, &context).await?))
}

/// DELETE /arrays/:array_id
async fn delete_array(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(array_id): Path<String>,
) -> AppResult<StatusCode> {
    let array_id = parse_array_id(&array_id)?;
    state.array_handler().delete(array_id, &context).await?;
    Ok(StatusCode::ACCEPTED)
}

// =========================================================================
// Volumes and drives
// =========================================================================

/// GET /arrays/:array_id/{volumes,drives}
async fn list_children(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Path(array_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Envelope<Vec<VolumeView>>>> {
    let array_id = parse_array_id(&array_id)?;
    let page = page(&state, &query)?;
    let views = state
        .child_handler(kind)
        .list(array_id, ViewMode::Summary, page)
        .await?;
    Ok(Json(views))
}

/// GET /arrays/:array_id/{volumes,drives}/detail
async fn list_children_detail(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Path(array_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Envelope<Vec<VolumeView>>>> {
    let array_id = parse_array_id(&array_id)?;
    let page = page(&state, &query)?;
    let views = state
        .child_handler(kind)
        .list(array_id, ViewMode::Detail, page)
        .await?;
    Ok(Json(views))
}

/// GET /arrays/:array_id/{volumes,drives}/:child_id
async fn show_child(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Path((array_id, child_id)): Path<(String, String)>,
) -> AppResult<Json<Envelope<VolumeView>>> {
    let array_id = parse_array_id(&array_id)?;
    let child_id = parse_child_id(kind, &child_id)?;
    Ok(Json(state.child_handler(kind).show(array_id, child_id).await?))
}

/// POST /arrays/:array_id/{volumes,drives}
async fn create_child(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Extension(context): Extension<OperationContext>,
    Path(array_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Envelope<VolumeView>>> {
    // Refused before the path or body is looked at
    let handler = state.child_handler(kind);
    handler.ensure_create_allowed()?;

    let array_id = parse_array_id(&array_id)?;
    Ok(Json(handler.create(array_id, &body, &context).await?))
}

/// PUT /arrays/:array_id/{volumes,drives}/:child_id
async fn update_child(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Extension(context): Extension<OperationContext>,
    Path((array_id, child_id)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let handler = state.child_handler(kind);
    handler.ensure_update_allowed()?;

    let array_id = parse_array_id(&array_id)?;
    let child_id = parse_child_id(kind, &child_id)?;
    handler.update(array_id, child_id, &body, &context).await?;
    Ok(StatusCode::ACCEPTED)
}

/// DELETE /arrays/:array_id/{volumes,drives}/:child_id
async fn delete_child(
    State(state): State<AppState>,
    Extension(kind): Extension<ChildKind>,
    Extension(context): Extension<OperationContext>,
    Path((array_id, child_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let array_id = parse_array_id(&array_id)?;
    let child_id = parse_child_id(kind, &child_id)?;
    state
        .child_handler(kind)
        .delete(array_id, child_id, &context)
        .await?;
    Ok(StatusCode::ACCEPTED)
}
