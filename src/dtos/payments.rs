use crate::models::payment::start_of_day;
use crate::models::{Payment, ADDED_DATE_FORMAT};
use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body for `POST /payments/create`. The timestamp and calendar-date fields
/// are normalized into their stored shapes here, at the boundary: the added
/// timestamp becomes a display string, the due date a midnight-UTC instant.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentCreateRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub payee_first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub payee_last_name: String,
    pub payee_payment_status: String,
    pub payee_added_date_utc: DateTime<Utc>,
    pub payee_due_date: NaiveDate,
    pub payee_address_line_1: String,
    pub payee_address_line_2: Option<String>,
    pub payee_city: String,
    pub payee_country: String,
    pub payee_province_or_state: Option<String>,
    pub payee_postal_code: String,
    pub payee_phone_number: String,
    #[validate(email(message = "Invalid email address"))]
    pub payee_email: String,
    pub currency: String,
    pub discount_percent: Option<f64>,
    pub tax_percent: Option<f64>,
    pub due_amount: f64,
}

/// `PUT /payments/update/{id}` carries the same full field set.
pub type PaymentUpdateRequest = PaymentCreateRequest;

impl PaymentCreateRequest {
    fn added_date_display(&self) -> String {
        self.payee_added_date_utc.format(ADDED_DATE_FORMAT).to_string()
    }

    fn due_date_instant(&self) -> mongodb::bson::DateTime {
        start_of_day(self.payee_due_date)
    }

    /// Stored shape for the create path. `total_due` stays unset: it is
    /// derived on the next listing, never taken from the caller.
    pub fn into_payment(self, id: Uuid) -> Payment {
        let payee_added_date_utc = self.added_date_display();
        let payee_due_date = Some(self.due_date_instant());
        Payment {
            id,
            payee_first_name: self.payee_first_name,
            payee_last_name: self.payee_last_name,
            payee_payment_status: self.payee_payment_status,
            payee_added_date_utc,
            payee_due_date,
            payee_address_line_1: self.payee_address_line_1,
            payee_address_line_2: self.payee_address_line_2.unwrap_or_default(),
            payee_city: self.payee_city,
            payee_country: self.payee_country,
            payee_province_or_state: self.payee_province_or_state.unwrap_or_default(),
            payee_postal_code: self.payee_postal_code,
            payee_phone_number: self.payee_phone_number,
            payee_email: self.payee_email,
            currency: self.currency,
            discount_percent: self.discount_percent.unwrap_or(0.0),
            tax_percent: self.tax_percent.unwrap_or(0.0),
            due_amount: self.due_amount,
            total_due: None,
        }
    }

    /// `$set` payload for the update path: every request field, normalized the
    /// same way as create, without `_id` and without `total_due` (the stored
    /// total keeps its stale value until the next listing recomputes it).
    pub fn to_update_document(&self) -> Document {
        doc! {
            "payee_first_name": &self.payee_first_name,
            "payee_last_name": &self.payee_last_name,
            "payee_payment_status": &self.payee_payment_status,
            "payee_added_date_utc": self.added_date_display(),
            "payee_due_date": self.due_date_instant(),
            "payee_address_line_1": &self.payee_address_line_1,
            "payee_address_line_2": self.payee_address_line_2.clone().unwrap_or_default(),
            "payee_city": &self.payee_city,
            "payee_country": &self.payee_country,
            "payee_province_or_state": self.payee_province_or_state.clone().unwrap_or_default(),
            "payee_postal_code": &self.payee_postal_code,
            "payee_phone_number": &self.payee_phone_number,
            "payee_email": &self.payee_email,
            "currency": &self.currency,
            "discount_percent": self.discount_percent.unwrap_or(0.0),
            "tax_percent": self.tax_percent.unwrap_or(0.0),
            "due_amount": self.due_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentCreateResponse {
    pub payment_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UploadEvidenceResponse {
    pub file_id: String,
}

/// Attachment status reported per listing row.
#[derive(Debug, Serialize)]
pub struct EvidenceStatus {
    pub file_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EvidenceStatus {
    pub fn found(file_name: String) -> Self {
        Self {
            file_found: true,
            file_name: Some(file_name),
            message: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            file_found: false,
            file_name: None,
            message: Some("No evidence found for this payment".to_string()),
        }
    }
}

/// Listing row: every stored field, the id as an opaque string and the due
/// date as an ISO calendar date (date portion only).
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment_id: String,
    pub payee_first_name: String,
    pub payee_last_name: String,
    pub payee_payment_status: String,
    pub payee_added_date_utc: String,
    pub payee_due_date: Option<String>,
    pub payee_address_line_1: String,
    pub payee_address_line_2: String,
    pub payee_city: String,
    pub payee_country: String,
    pub payee_province_or_state: String,
    pub payee_postal_code: String,
    pub payee_phone_number: String,
    pub payee_email: String,
    pub currency: String,
    pub discount_percent: f64,
    pub tax_percent: f64,
    pub due_amount: f64,
    pub total_due: Option<f64>,
    pub evidence: EvidenceStatus,
}

impl PaymentResponse {
    pub fn new(payment: Payment, evidence: EvidenceStatus) -> Self {
        Self {
            payment_id: payment.id.to_string(),
            payee_first_name: payment.payee_first_name,
            payee_last_name: payment.payee_last_name,
            payee_payment_status: payment.payee_payment_status,
            payee_added_date_utc: payment.payee_added_date_utc,
            payee_due_date: payment
                .payee_due_date
                .map(|d| d.to_chrono().date_naive().to_string()),
            payee_address_line_1: payment.payee_address_line_1,
            payee_address_line_2: payment.payee_address_line_2,
            payee_city: payment.payee_city,
            payee_country: payment.payee_country,
            payee_province_or_state: payment.payee_province_or_state,
            payee_postal_code: payment.payee_postal_code,
            payee_phone_number: payment.payee_phone_number,
            payee_email: payment.payee_email,
            currency: payment.currency,
            discount_percent: payment.discount_percent,
            tax_percent: payment.tax_percent,
            due_amount: payment.due_amount,
            total_due: payment.total_due,
            evidence,
        }
    }
}

/// Query parameters for `GET /payments/get_payments`: independent per-field
/// substring filters, AND-combined across whatever is supplied, plus
/// zero-based skip/limit pagination.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentListParams {
    pub payee_first_name: Option<String>,
    pub payee_last_name: Option<String>,
    pub payee_payment_status: Option<String>,
    pub payee_address_line_1: Option<String>,
    pub payee_address_line_2: Option<String>,
    pub payee_city: Option<String>,
    pub payee_country: Option<String>,
    pub payee_province_or_state: Option<String>,
    pub payee_postal_code: Option<String>,
    pub payee_phone_number: Option<String>,
    pub payee_email: Option<String>,
    pub currency: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentResponse>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}
