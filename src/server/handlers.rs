use super::AppContext;
use axum::extract::multipart::Multipart;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use skv_compare_common::controller::{SKV_FIELD, TENDER_FIELD};
use skv_compare_common::{build_comparison_request, fetch_with_retry, UploadedFile, DOWNLOAD_FILE_NAME, XLSX_MIME};

const MSG_BOTH_REQUIRED: &str = "Both files are required";
const MSG_PROCESS_FAILED: &str = "Failed to process files";

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

/// GET /health
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// POST /api/compare
///
/// 失敗時は原因を問わず500と固定メッセージ（原因はログのみ）
pub async fn compare(State(ctx): State<AppContext>, multipart: Multipart) -> Response {
    match forward(&ctx, multipart).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "API Error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_PROCESS_FAILED)
        }
    }
}

async fn forward(ctx: &AppContext, mut multipart: Multipart) -> Result<Response, String> {
    let mut skv_file = None;
    let mut tender_file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().unwrap_or(&name).to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| e.to_string())?;

        let file = UploadedFile::new(file_name, content_type, data.to_vec());
        match name.as_str() {
            SKV_FIELD => skv_file = Some(file),
            TENDER_FIELD => tender_file = Some(file),
            _ => {}
        }
    }

    let (Some(skv), Some(tender)) = (skv_file, tender_file) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, MSG_BOTH_REQUIRED));
    };

    tracing::info!(
        skv = %skv.name,
        skv_size = skv.size,
        tender = %tender.name,
        tender_size = tender.size,
        "forwarding comparison request"
    );

    let request = build_comparison_request(&ctx.backend_url, skv, tender);
    let response = fetch_with_retry(&ctx.transport, &request, ctx.retry)
        .await
        .map_err(|e| e.to_string())?;

    if !response.is_success() {
        return Err(format!("backend error: {}", response.status));
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", DOWNLOAD_FILE_NAME),
            ),
        ],
        response.body,
    )
        .into_response())
}
