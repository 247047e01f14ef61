use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{
    EvidenceStatus, MessageResponse, PaymentCreateRequest, PaymentCreateResponse,
    PaymentListParams, PaymentListResponse, PaymentResponse, PaymentUpdateRequest,
};
use crate::error::AppError;
use crate::handlers::parse_payment_id;
use crate::models::start_of_day;
use crate::services::repository::search_filter;
use crate::startup::AppState;

/// Create a payment record from a validated JSON payload.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCreateRequest>,
) -> Result<(StatusCode, Json<PaymentCreateResponse>), AppError> {
    payload.validate()?;

    let payment = payload.into_payment(Uuid::new_v4());

    tracing::info!(payment_id = %payment.id, "Creating payment");

    state.repository.insert_payment(&payment).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentCreateResponse {
            payment_id: payment.id.to_string(),
        }),
    ))
}

/// Full-field update. An id that matches no record is still a success:
/// callers get the same message either way.
pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(payload): Json<PaymentUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let payment_id = parse_payment_id(&payment_id)?;
    payload.validate()?;

    let matched = state
        .repository
        .update_payment(payment_id, payload.to_update_document())
        .await?;

    tracing::info!(payment_id = %payment_id, matched, "Payment update applied");

    Ok(Json(MessageResponse {
        message: "Payment updated successfully".to_string(),
    }))
}

/// Delete a payment and whatever evidence rows point at it. The two deletes
/// are sequential; a crash in between leaves no dangling evidence, only a
/// payment without its cascade.
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let payment_id = parse_payment_id(&payment_id)?;

    let evidence_removed = state.repository.delete_evidence_for(payment_id).await?;
    let deleted = state.repository.delete_payment(payment_id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Payment not found")));
    }

    tracing::info!(payment_id = %payment_id, evidence_removed, "Payment deleted");

    Ok(Json(MessageResponse {
        message: "Payment and related evidence deleted successfully".to_string(),
    }))
}

/// List payments. Every call first refreshes due/overdue statuses against
/// today's UTC midnight and recomputes stored totals, then answers the
/// filtered, paginated query newest-due-first.
pub async fn get_payments(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<PaymentListResponse>, AppError> {
    let today = start_of_day(Utc::now().date_naive());
    let (due_now, overdue) = state.repository.refresh_due_statuses(today).await?;
    let recomputed = state.repository.recompute_totals().await?;

    tracing::debug!(due_now, overdue, recomputed, "Refreshed statuses and totals");

    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);

    let filter = search_filter(&params);
    let (payments, total_count) = state
        .repository
        .search_payments(filter, skip, limit)
        .await?;

    let mut rows = Vec::with_capacity(payments.len());
    for payment in payments {
        let evidence = match state.repository.find_evidence_meta(payment.id).await? {
            Some(meta) => EvidenceStatus::found(meta.file_name),
            None => EvidenceStatus::missing(),
        };
        rows.push(PaymentResponse::new(payment, evidence));
    }

    Ok(Json(PaymentListResponse {
        payments: rows,
        total_count,
    }))
}
