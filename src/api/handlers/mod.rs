use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::artwork::{self, ArtworkPageProps, ArtworkPageResponse};
use crate::db::Database;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
///
/// Some errors are validation errors that should be exposed to the client
/// (e.g., "Collection not found"). These are returned as-is with a
/// BAD_REQUEST status.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg.contains("not found") {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(
    State(db): State<Database>,
) -> Result<Json<Vec<Project>>, (StatusCode, String)> {
    db.get_all_projects().map(Json).map_err(internal_error)
}

pub async fn get_project(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, (StatusCode, String)> {
    db.get_project(id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Project not found".to_string()))
}

pub async fn create_project(
    State(db): State<Database>,
    Json(input): Json<CreateProjectInput>,
) -> Result<(StatusCode, Json<Project>), (StatusCode, String)> {
    db.create_project(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(internal_error)
}

// ============================================================
// Collections
// ============================================================

pub async fn list_collections(
    State(db): State<Database>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Collection>>, (StatusCode, String)> {
    db.get_collections_by_project(project_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_collection(
    State(db): State<Database>,
    Path((project_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Collection>, (StatusCode, String)> {
    db.get_collection(project_id, id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Collection not found".to_string()))
}

pub async fn create_collection(
    State(db): State<Database>,
    Path(project_id): Path<Uuid>,
    Json(input): Json<CreateCollectionInput>,
) -> Result<(StatusCode, Json<Collection>), (StatusCode, String)> {
    db.create_collection(project_id, input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(internal_error)
}

// ============================================================
// Artwork page
// ============================================================

/// The full server-rendered snapshot for the artwork page.
///
/// Path ids arrive as raw strings: an unusable id renders the empty data
/// set (the not-found state) instead of a routing error, and a failed load
/// inside does the same. This endpoint never fails.
pub async fn artwork_page(
    State(db): State<Database>,
    Path((project_id, collection_id)): Path<(String, String)>,
) -> Json<ArtworkPageResponse> {
    let props = match (
        Uuid::parse_str(&project_id),
        Uuid::parse_str(&collection_id),
    ) {
        (Ok(project_id), Ok(collection_id)) => {
            artwork::load_page_props(&db, project_id, collection_id)
        }
        _ => ArtworkPageProps::empty(),
    };

    Json(props.into())
}

// ============================================================
// Image layers
// ============================================================

pub async fn list_image_layers(
    State(db): State<Database>,
    Path((project_id, collection_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<ImageLayer>>, (StatusCode, String)> {
    db.get_image_layers(project_id, collection_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_image_layer(
    State(db): State<Database>,
    Path((project_id, collection_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CreateImageLayerInput>,
) -> Result<(StatusCode, Json<ImageLayer>), (StatusCode, String)> {
    db.create_image_layer(project_id, collection_id, input)
        .map(|l| (StatusCode::CREATED, Json(l)))
        .map_err(internal_error)
}

/// Field-level tag update: fields omitted from the body are left unchanged
/// in the store. The store accepts a trait value foreign to the stored
/// trait unchecked; only the page's cascade path guarantees a consistent
/// pair.
pub async fn update_image_layer(
    State(db): State<Database>,
    Path((project_id, collection_id, id)): Path<(Uuid, Uuid, Uuid)>,
    Json(input): Json<UpdateImageLayerInput>,
) -> Result<Json<ImageLayer>, (StatusCode, String)> {
    db.get_image_layer(project_id, collection_id, id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Image layer not found".to_string()))?;

    db.update_image_layer(project_id, collection_id, id, input)
        .map_err(internal_error)?;

    db.get_image_layer(project_id, collection_id, id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Image layer not found".to_string()))
}

pub async fn delete_image_layer(
    State(db): State<Database>,
    Path((project_id, collection_id, id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db
        .delete_image_layer(project_id, collection_id, id)
        .map_err(internal_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Image layer not found".to_string()))
    }
}

// ============================================================
// Trait catalog
// ============================================================

pub async fn list_traits(
    State(db): State<Database>,
    Path((project_id, collection_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Trait>>, (StatusCode, String)> {
    db.get_traits(project_id, collection_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_trait(
    State(db): State<Database>,
    Path((project_id, collection_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CreateTraitInput>,
) -> Result<(StatusCode, Json<Trait>), (StatusCode, String)> {
    db.create_trait(project_id, collection_id, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(internal_error)
}

pub async fn list_trait_values(
    State(db): State<Database>,
    Path((project_id, collection_id, trait_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<Vec<TraitValue>>, (StatusCode, String)> {
    db.get_trait_values(project_id, collection_id, trait_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_trait_value(
    State(db): State<Database>,
    Path((project_id, collection_id, trait_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(input): Json<CreateTraitValueInput>,
) -> Result<(StatusCode, Json<TraitValue>), (StatusCode, String)> {
    db.create_trait_value(project_id, collection_id, trait_id, input)
        .map(|v| (StatusCode::CREATED, Json(v)))
        .map_err(internal_error)
}
