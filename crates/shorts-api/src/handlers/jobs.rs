//! Job submission, status polling and deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use shorts_models::{JobRecord, SubmitJobRequest};
use shorts_queue::QueueError;

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// Response to an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

/// Response to a deletion.
#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: String,
}

/// POST /jobs
///
/// Numeric fields are checked here; the content itself is parsed by the
/// worker, so a bad scenario surfaces as a `failed` record rather than 400.
///
/// Returns:
/// - 202: Job queued
/// - 400: Invalid durations
/// - 503: Queue full or shutting down
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> ApiResult<(StatusCode, Json<SubmitJobResponse>)> {
    request.validate()?;
    let mode = request.mode;

    let record = match state.tracker.submit(request).await {
        Ok(record) => record,
        Err(e) => {
            if let QueueError::QueueFull(_) = e {
                metrics::record_job_rejected("queue_full");
            } else if e.is_backpressure() {
                metrics::record_job_rejected("closed");
            }
            return Err(e.into());
        }
    };

    metrics::record_job_submitted(mode.as_str());

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitJobResponse {
            job_id: record.job_id,
            status: record.status.as_str().to_string(),
            message: "Shorts generation job started".to_string(),
        }),
    ))
}

/// GET /jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobRecord>> {
    let record = state.tracker.get_status(&job_id).await?;
    Ok(Json(record))
}

/// DELETE /jobs/:job_id
///
/// Forgets the record. A job already running is not interrupted.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<DeleteJobResponse>> {
    let removed = state.tracker.delete(&job_id).await?;
    info!(job_id = %job_id, status = %removed.status, "Deleted via API");

    Ok(Json(DeleteJobResponse {
        message: "Job deleted".to_string(),
    }))
}
