use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Records what the client asked the backend to do.
#[derive(Clone, Default)]
pub struct BackendLog {
    pub uploads: Arc<Mutex<Vec<String>>>,
    pub conversions: Arc<Mutex<Vec<(String, String)>>>,
    pub zipped: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct MockState {
    log: BackendLog,
    ffmpeg_installed: bool,
}

fn type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().unwrap_or_default() {
        "jpg" | "jpeg" | "png" => "image",
        "mp3" | "wav" => "audio",
        "mp4" | "mov" => "video",
        "zip" | "7z" => "archive",
        "csv" | "xlsx" => "data",
        "pdf" => "pdf",
        _ => "other",
    }
}

async fn upload(State(state): State<MockState>, mut multipart: Multipart) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let data = field.bytes().await.unwrap_or_default();
        if name.starts_with("reject") {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "nope"})));
        }
        state.log.uploads.lock().unwrap().push(name.clone());
        let extension = name.rsplit('.').next().unwrap_or_default().to_string();
        return (
            StatusCode::OK,
            Json(json!({
                "type": type_for(&name),
                "original_name": name,
                "filename": format!("up_{name}"),
                "size": data.len(),
                "extension": extension,
            })),
        );
    }
    (StatusCode::BAD_REQUEST, Json(json!({"detail": "missing file"})))
}

async fn convert(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let file_path = body["file_path"].as_str().unwrap_or_default().to_string();
    let target = body["target_format"].as_str().unwrap_or_default().to_string();
    state
        .log
        .conversions
        .lock()
        .unwrap()
        .push((file_path.clone(), target.clone()));

    if file_path.contains("crash") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }
    if file_path.contains("broken") {
        return Json(json!({"success": false, "error": "Unsupported source format"})).into_response();
    }
    let stem = file_path.rsplit_once('.').map(|(s, _)| s).unwrap_or(&file_path);
    Json(json!({"success": true, "filename": format!("{stem}.{target}")})).into_response()
}

async fn download(Path(filename): Path<String>) -> impl IntoResponse {
    if filename.starts_with("missing") {
        return (StatusCode::NOT_FOUND, Bytes::new());
    }
    (StatusCode::OK, Bytes::from(format!("converted:{filename}")))
}

async fn download_all(State(state): State<MockState>, Json(body): Json<Value>) -> impl IntoResponse {
    let names: Vec<String> = body["filenames"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();
    if names.is_empty() {
        return (StatusCode::BAD_REQUEST, Bytes::new());
    }
    state.log.zipped.lock().unwrap().extend(names.iter().cloned());
    (StatusCode::OK, Bytes::from(format!("PK{}", names.join(","))))
}

async fn check_ffmpeg(State(state): State<MockState>) -> Json<Value> {
    Json(json!({"installed": state.ffmpeg_installed}))
}

async fn languages() -> Json<Value> {
    Json(json!({"languages": ["en", "tr", "de"]}))
}

async fn locale(Path(file): Path<String>) -> impl IntoResponse {
    match file.as_str() {
        "de.json" => (
            StatusCode::OK,
            Json(json!({"buttons": {"convert": "Konvertieren"}})),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Starts the mock on an ephemeral port and returns its base URL.
pub async fn serve(ffmpeg_installed: bool) -> (String, BackendLog) {
    let log = BackendLog::default();
    let state = MockState {
        log: log.clone(),
        ffmpeg_installed,
    };
    let router = Router::new()
        .route("/api/upload", post(upload))
        .route("/api/convert", post(convert))
        .route("/api/download/:filename", get(download))
        .route("/api/download-all", post(download_all))
        .route("/api/check-ffmpeg", get(check_ffmpeg))
        .route("/api/languages", get(languages))
        .route("/static/locales/:file", get(locale))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), log)
}
