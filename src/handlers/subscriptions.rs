use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::export::{rows_to_csv, SubscriptionRow};
use crate::services::grouping::{summarize_groups, VendorSummary};
use crate::services::pagination;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub shown: usize,
    pub page_size: Option<usize>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionPage {
    pub rows: Vec<SubscriptionRow>,
    pub total: usize,
    pub shown: usize,
    /// Pass back as `shown` for the next "Show More".
    pub next_shown: usize,
    pub has_more: bool,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<SubscriptionPage>> {
    let page_size = params.page_size.unwrap_or(state.config.page_size);
    if page_size == 0 {
        return Err(AppError::Validation("page_size must be positive".into()));
    }

    let records = state.table_rows();
    let rows: Vec<SubscriptionRow> = records
        .iter()
        .filter(|r| !params.active_only || r.is_active())
        .map(SubscriptionRow::from)
        .collect();

    let page = pagination::window(&rows, params.shown, page_size);
    Ok(Json(SubscriptionPage {
        rows: page.visible.to_vec(),
        total: rows.len(),
        shown: params.shown,
        next_shown: params.shown.saturating_add(page_size),
        has_more: page.has_more,
    }))
}

pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows: Vec<SubscriptionRow> = state
        .table_rows()
        .iter()
        .map(SubscriptionRow::from)
        .collect();
    let csv = rows_to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"subscriptions.csv\"",
            ),
        ],
        csv,
    ))
}

pub async fn vendors(State(state): State<AppState>) -> Json<Vec<VendorSummary>> {
    Json(summarize_groups(&state.working_set()))
}
