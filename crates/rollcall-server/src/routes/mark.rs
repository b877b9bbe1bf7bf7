use axum::extract::{Query, State};
use rollcall_core::lookup::{LookupEngine, Resolution};
use rollcall_core::recorder::AttendanceRecorder;
use rollcall_core::request::MarkRequest;
use rollcall_core::RollcallError;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MarkParams {
    pub data: Option<String>,
}

/// GET /mark?data=<name>%20<identifier>%20<course> — resolve today's date
/// column and the student's row, then mark the cell present.
pub async fn mark_attendance(
    State(app): State<AppState>,
    Query(params): Query<MarkParams>,
) -> Result<String, AppError> {
    let data = params.data.ok_or(RollcallError::MissingData)?;
    let request = MarkRequest::parse(&data)?;
    let today = app.config.today_label()?;

    let store = app.store.clone();
    let config = app.config.clone();
    let identifier = request.identifier.clone();
    let label = today.clone();
    let resolution = tokio::task::spawn_blocking(move || {
        LookupEngine::new(store.as_ref(), &config).resolve(&label, &identifier)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let cell = match resolution {
        Resolution::Found(cell) => cell,
        Resolution::DateNotFound => {
            tracing::debug!(label = %today, "no header column for today");
            return Err(RollcallError::DateNotFound(today).into());
        }
        Resolution::StudentNotFound => {
            return Err(RollcallError::StudentNotFound(request.identifier).into());
        }
    };

    // Hold the per-cell lock across the write sequence so two submissions
    // racing for the same student/date cell serialize.
    let lock = app.cell_lock(cell.row, cell.col).await;
    let _guard = lock.lock().await;

    let store = app.store.clone();
    let config = app.config.clone();
    let recorded = request.clone();
    tokio::task::spawn_blocking(move || {
        AttendanceRecorder::new(store.as_ref(), &config).mark_present(cell, &recorded)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(format!(
        "Attendance marked for ID {} on {}",
        request.identifier, today
    ))
}
