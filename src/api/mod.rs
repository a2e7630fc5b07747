mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/{id}", get(handlers::get_project))
        // Collections
        .route("/projects/{project_id}/collections", get(handlers::list_collections))
        .route("/projects/{project_id}/collections", post(handlers::create_collection))
        .route("/projects/{project_id}/collections/{id}", get(handlers::get_collection))
        // The artwork page snapshot
        .route(
            "/projects/{project_id}/collections/{collection_id}/artwork",
            get(handlers::artwork_page),
        )
        // Image layers
        .route(
            "/projects/{project_id}/collections/{collection_id}/image-layers",
            get(handlers::list_image_layers),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/image-layers",
            post(handlers::create_image_layer),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/image-layers/{id}",
            put(handlers::update_image_layer),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/image-layers/{id}",
            delete(handlers::delete_image_layer),
        )
        // Trait catalog
        .route(
            "/projects/{project_id}/collections/{collection_id}/traits",
            get(handlers::list_traits),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/traits",
            post(handlers::create_trait),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/traits/{trait_id}/values",
            get(handlers::list_trait_values),
        )
        .route(
            "/projects/{project_id}/collections/{collection_id}/traits/{trait_id}/values",
            post(handlers::create_trait_value),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
