use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::dtos::UploadEvidenceResponse;
use crate::error::AppError;
use crate::handlers::parse_payment_id;
use crate::models::{Evidence, PaymentStatus};
use crate::startup::AppState;

/// Attach an evidence file to a payment. The upload replaces any earlier
/// file for the same payment and marks the payment completed.
pub async fn upload_evidence(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadEvidenceResponse>), AppError> {
    let payment_id = parse_payment_id(&payment_id)?;

    state
        .repository
        .find_payment(payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let file_name = field.file_name().unwrap_or("unnamed").to_string();
    let file_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
        .to_vec();

    tracing::info!(
        payment_id = %payment_id,
        filename = %file_name,
        size = data.len(),
        "Evidence upload started"
    );

    let evidence = Evidence::new(payment_id, file_name, data, file_type);
    state.repository.replace_evidence(&evidence).await?;

    state
        .repository
        .set_payment_status(payment_id, PaymentStatus::Completed)
        .await?;

    tracing::info!(payment_id = %payment_id, "Evidence upload completed");

    Ok((
        StatusCode::CREATED,
        Json(UploadEvidenceResponse {
            file_id: payment_id.to_string(),
        }),
    ))
}

/// Serve the stored evidence file for a payment straight from the store.
pub async fn download_evidence(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let payment_id = parse_payment_id(&payment_id)?;

    let evidence = state
        .repository
        .find_evidence(payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No evidence found for this payment")))?;

    if evidence.file_data.bytes.is_empty() {
        return Err(AppError::NoContent(anyhow::anyhow!(
            "Evidence file is empty"
        )));
    }

    tracing::info!(
        payment_id = %payment_id,
        filename = %evidence.file_name,
        size = evidence.file_data.bytes.len(),
        "Evidence download completed"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, evidence.file_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", evidence.file_name),
            ),
        ],
        evidence.file_data.bytes,
    ))
}
