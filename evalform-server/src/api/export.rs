//! CSV export of all evaluations

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use evalform_common::export::{self, EXPORT_FILE_NAME};
use tracing::info;

use crate::error::ApiResult;
use crate::AppState;

/// GET /export-csv
///
/// Same record order as `GET /evaluations`. An empty store answers 404.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let records = state.store.list_all().await?;
    let csv = export::to_csv(&records)?;

    info!("Exported {} evaluation(s) as CSV", records.len());

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
