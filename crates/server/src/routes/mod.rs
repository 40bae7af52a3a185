use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::storage::{Storage, StorageError};
use crate::AppState;
use shared::{ApiError, SaveResponse, SpriteList, SystemFile, SystemList};

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Storage error: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(ApiError { error: self.to_string() })).into_response()
    }
}

/// Run blocking file I/O off the async workers
async fn blocking<T, F>(state: AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&Storage) -> Result<T, StorageError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.storage))
        .await
        .map_err(|e| {
            tracing::error!("Storage task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?
        .map_err(IntoResponse::into_response)
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// List stored systems
pub async fn list_systems(State(state): State<AppState>) -> Result<Json<SystemList>, Response> {
    let systems = blocking(state, |s| s.list_systems()).await?;
    Ok(Json(SystemList { systems }))
}

/// Validate and store a system document
pub async fn save_system(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SaveResponse>, Response> {
    let filename = blocking(state, move |s| s.save_system(body)).await?;
    Ok(Json(SaveResponse {
        success: true,
        filename,
    }))
}

pub async fn get_system(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<SystemFile>, Response> {
    let file = blocking(state, move |s| s.read_system(&filename)).await?;
    Ok(Json(file))
}

pub async fn delete_system(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, Response> {
    blocking(state, move |s| s.delete_system(&filename)).await?;
    Ok(Json(json!({ "success": true })))
}

/// List sprite images
pub async fn list_sprites(State(state): State<AppState>) -> Result<Json<SpriteList>, Response> {
    let sprites = blocking(state, |s| s.list_sprites()).await?;
    Ok(Json(SpriteList { sprites }))
}

/// Sprite image bytes
pub async fn get_sprite(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, Response> {
    let bytes = blocking(state, move |s| s.read_sprite(&filename)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        Body::from(bytes),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::app;

    fn setup() -> (tempfile::TempDir, axum::Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sprites")).unwrap();
        let storage = Storage::new(dir.path().join("systems"), dir.path().join("sprites"));
        (dir, app(storage))
    }

    fn sol() -> Value {
        json!({
            "formatVersion": "1.0",
            "system": { "id": "alpha", "name": "Alpha Centauri" },
            "rootBodies": [{
                "id": "Alpha Centauri",
                "name": "Alpha Centauri",
                "type": "star",
                "luminosity": 1.5,
                "children": []
            }]
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = setup();
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_save_then_list_get_delete() {
        let (_dir, app) = setup();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/systems")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(sol().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = body_json(response).await;
        assert_eq!(saved["success"], true);
        assert_eq!(saved["filename"], "alpha-centauri.json");

        let response = app
            .clone()
            .oneshot(Request::get("/api/systems").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let list = body_json(response).await;
        assert_eq!(list["systems"][0]["filename"], "alpha-centauri.json");
        assert_eq!(list["systems"][0]["name"], "alpha-centauri");

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/systems/alpha-centauri.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let file = body_json(response).await;
        assert_eq!(file["system"]["name"], "Alpha Centauri");
        assert_eq!(file["rootBodies"][0]["luminosity"], 1.5);

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/systems/alpha-centauri.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/systems/alpha-centauri.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "System not found");
    }

    #[tokio::test]
    async fn test_invalid_document_rejected() {
        let (_dir, app) = setup();
        let mut doc = sol();
        doc["rootBodies"][0]["luminosity"] = json!(0.0);
        let response = app
            .oneshot(
                Request::post("/api/systems")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(doc.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_extension_rejected() {
        let (_dir, app) = setup();
        let response = app
            .clone()
            .oneshot(Request::get("/api/systems/notes.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Only json files are allowed"
        );

        let response = app
            .oneshot(Request::get("/api/sprites/sun.jpg").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sprites() {
        let (dir, app) = setup();
        std::fs::write(dir.path().join("sprites/sun.png"), [137u8, 80, 78, 71]).unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/api/sprites").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["sprites"], json!(["sun.png"]));

        let response = app
            .clone()
            .oneshot(Request::get("/api/sprites/sun.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), &[137u8, 80, 78, 71]);

        let response = app
            .oneshot(Request::get("/api/sprites/moon.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
