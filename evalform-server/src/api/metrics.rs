//! Category view of one evaluation

use axum::{
    extract::{Path, State},
    Json,
};
use evalform_common::metrics::{self, MetricsView};

use crate::api::evaluations::fetch_record;
use crate::error::ApiResult;
use crate::AppState;

/// GET /evaluation-metrics/:id
pub async fn get_evaluation_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MetricsView>> {
    let record = fetch_record(&state, &id).await?;
    Ok(Json(metrics::organize(&record)))
}
