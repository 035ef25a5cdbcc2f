//! HTTP surface of the API.
//!
//! Paths and response shapes are part of the public contract:
//! creates answer `{"id": ...}`, lists answer `{"items": [...]}`.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use culinary_core::{document::Entity, query::Expr};

use crate::{
    error::ApiError,
    extract::ValidJson,
    filters::{self, AdParams, RecipeParams, SearchParams},
    models::{Ad, Contact, Lesson, Recipe, Video},
    state::AppState,
    validation::Validate,
};

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Items {
    pub items: Vec<Value>,
}

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(diagnostics))
        .route("/api/recipes", get(list_recipes).post(create::<Recipe>))
        .route("/api/lessons", get(list_lessons).post(create::<Lesson>))
        .route("/api/ads", get(list_ads).post(create::<Ad>))
        .route("/api/videos", get(list_videos).post(create::<Video>))
        .route("/api/contact", get(get_contact).post(set_contact))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Culinary Educational Backend Running" }))
}

/// Reports store connectivity. Never fails; problems are described in the body.
async fn diagnostics(State(state): State<AppState>) -> Json<Value> {
    let mut report = json!({
        "backend": "✅ Running",
        "database": "❌ Not Available",
        "database_url": null,
        "database_name": null,
        "connection_status": "Not Connected",
        "collections": [],
    });

    if state.gateway.is_connected() {
        report["database"] = json!("✅ Connected & Working");
        report["database_url"] = json!(if state.database_url_set { "✅ Set" } else { "❌ Not Set" });
        report["database_name"] = json!(
            state
                .database_name
                .as_deref()
                .or(state.gateway.backend_name())
                .unwrap_or("Unknown")
        );
        report["connection_status"] = json!("Connected");

        match state.gateway.collections().await {
            Ok(mut names) => {
                names.sort();
                names.truncate(10);
                report["collections"] = json!(names);
            }
            Err(e) => {
                let detail: String = e.to_string().chars().take(50).collect();
                report["database"] = json!(format!("⚠️ Connected but Error: {detail}"));
            }
        }
    }

    Json(report)
}

async fn create<E>(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<E>,
) -> Result<Json<Created>, ApiError>
where
    E: Entity + Validate,
{
    let id = state.gateway.insert_entity(&payload).await?;
    info!(collection = E::collection_name(), %id, "created");

    Ok(Json(Created { id }))
}

async fn list(state: &AppState, collection: &str, filter: Option<Expr>) -> Result<Json<Items>, ApiError> {
    let items = state.gateway.find(collection, filter).await?;

    Ok(Json(Items { items }))
}

async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<RecipeParams>,
) -> Result<Json<Items>, ApiError> {
    let filter = filters::recipe_filter(params.q.as_deref(), params.tag.as_deref());
    list(&state, Recipe::collection_name(), filter).await
}

async fn list_lessons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Items>, ApiError> {
    list(&state, Lesson::collection_name(), filters::lesson_filter(params.q.as_deref())).await
}

async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Items>, ApiError> {
    list(&state, Video::collection_name(), filters::video_filter(params.q.as_deref())).await
}

async fn list_ads(
    State(state): State<AppState>,
    Query(params): Query<AdParams>,
) -> Result<Json<Items>, ApiError> {
    let active = filters::parse_active(params.active.as_deref())?;
    list(&state, Ad::collection_name(), filters::ad_filter(active)).await
}

async fn set_contact(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<Contact>,
) -> Result<Json<Created>, ApiError> {
    let id = state.gateway.replace_singleton_entity(&payload).await?;
    info!(%id, "contact updated");

    Ok(Json(Created { id }))
}

/// The stored contact, or `{}` when none has been set.
async fn get_contact(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let contact = state
        .gateway
        .find_singleton(Contact::collection_name())
        .await?
        .unwrap_or_else(|| json!({}));

    Ok(Json(contact))
}
