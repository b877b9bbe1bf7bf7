use axum::extract::State;
use rollcall_core::recorder::AttendanceRecorder;
use rollcall_core::request::LogSubmission;

use crate::error::AppError;
use crate::state::AppState;

/// POST /log — append one raw audit row. Pure audit sink: no lookup, no cell
/// mutation, regardless of whether the student or date exists in the grid.
///
/// The body is taken as raw text and parsed here rather than through the
/// `Json` extractor so malformed JSON reports "Error: <message>" in the
/// plain-text protocol instead of an extractor rejection.
pub async fn append_log(State(app): State<AppState>, body: String) -> Result<String, AppError> {
    let submission: LogSubmission =
        serde_json::from_str(&body).map_err(rollcall_core::RollcallError::from)?;

    let store = app.store.clone();
    let config = app.config.clone();
    tokio::task::spawn_blocking(move || {
        AttendanceRecorder::new(store.as_ref(), &config).append_submission(&submission)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok("OK".to_string())
}
