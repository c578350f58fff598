//! Submission, listing and lookup of evaluations

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::header,
    Form, Json,
};
use std::collections::HashMap;
use evalform_common::record::EvaluationRecord;
use evalform_common::submission::{self, RawSubmission};
use evalform_common::Error;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Response body of a successful submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

/// POST /submit-evaluation
///
/// Accepts a JSON object or an HTML form post. Validates required identity
/// fields, coerces every schema field and stores the result. Nothing is
/// stored when validation fails.
pub async fn submit_evaluation(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<SubmitResponse>> {
    let raw = read_submission(request).await?;

    debug!(
        "Received submission with {} key(s): {}",
        raw.len(),
        raw.keys().collect::<Vec<_>>().join(", ")
    );

    submission::validate(&raw)?;
    let fields = submission::coerce(&raw);
    let id = state.store.insert(&fields).await?;

    info!("Stored evaluation {}", id);

    Ok(Json(SubmitResponse {
        success: true,
        id,
        message: "Evaluation submitted successfully".to_string(),
    }))
}

/// Decode the body by content type; form values arrive as strings
async fn read_submission(request: Request) -> ApiResult<RawSubmission> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        let Form(pairs) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(pairs.into_iter().collect())
    } else {
        let Json(raw) = Json::<RawSubmission>::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(raw)
    }
}

/// GET /evaluations
pub async fn list_evaluations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EvaluationRecord>>> {
    let records = state.store.list_all().await?;
    Ok(Json(records))
}

/// GET /evaluations/:id
pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EvaluationRecord>> {
    let record = fetch_record(&state, &id).await?;
    Ok(Json(record))
}

/// Look up a record by its path segment
///
/// A segment that is not an integer cannot name a stored record and is
/// answered the same as an unknown id.
pub(crate) async fn fetch_record(state: &AppState, id: &str) -> Result<EvaluationRecord, Error> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| Error::NotFound(format!("evaluation {}", id)))?;
    state.store.get_by_id(id).await
}
