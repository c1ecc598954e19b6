use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResult {
    pub records: usize,
}

pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResult>> {
    let records = state.reload().await?;
    tracing::info!(records, "Reloaded subscription data");
    Ok(Json(ReloadResult { records }))
}
