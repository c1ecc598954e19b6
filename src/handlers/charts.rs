use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::date_utils::WindowFilterable;
use crate::error::{AppError, AppResult};
use crate::services::aggregate::AmountRange;
use crate::services::pipeline::{run_view, ChartView, ViewKind, ViewOptions};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub nav: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

impl WindowFilterable for ChartParams {
    fn from_date(&self) -> Option<&String> {
        self.from_date.as_ref()
    }

    fn to_date(&self) -> Option<&String> {
        self.to_date.as_ref()
    }

    fn nav(&self) -> Option<&String> {
        self.nav.as_ref()
    }
}

impl ChartParams {
    fn amount_range(&self) -> AppResult<AmountRange> {
        let range = AmountRange {
            min: parse_amount("min_amount", self.min_amount.as_deref())?,
            max: parse_amount("max_amount", self.max_amount.as_deref())?,
        };
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(AppError::Validation(format!(
                    "min_amount {} is greater than max_amount {}",
                    min, max
                )));
            }
        }
        Ok(range)
    }
}

fn parse_amount(name: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("invalid {}: {}", name, s))),
    }
}

#[derive(Debug, Serialize)]
pub struct ViewDescriptor {
    pub slug: &'static str,
    pub title: &'static str,
}

pub async fn index() -> Json<Vec<ViewDescriptor>> {
    Json(
        ViewKind::all()
            .iter()
            .map(|v| ViewDescriptor {
                slug: v.as_str(),
                title: v.title(),
            })
            .collect(),
    )
}

pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<ChartView>> {
    let view: ViewKind = slug
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown chart view: {}", slug)))?;

    let today = Local::now().date_naive();
    let window = params.resolve_window(view.default_window(today))?;
    let options = ViewOptions {
        amount_range: params.amount_range()?,
    };

    let groups = state.working_set();
    Ok(Json(run_view(&groups, view, window, &options)))
}
