use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display format for `payee_added_date_utc`, e.g. `Nov 14, 2023, 10:13 PM`.
pub const ADDED_DATE_FORMAT: &str = "%b %d, %Y, %I:%M %p";

/// Calendar-date format used for due dates in CSV input and API responses.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Midnight-UTC instant of a calendar day, the stored shape of every due
/// date. The aging pass compares against this by exact equality, so all due
/// date writers must go through here.
pub fn start_of_day(date: NaiveDate) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_chrono(date.and_time(NaiveTime::MIN).and_utc())
}

/// Well-known payment status labels. The stored field stays free-text: CSV
/// rows may carry anything, and the aging pass overwrites it with these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    DueNow,
    Overdue,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::DueNow => "due_now",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Completed => "completed",
        }
    }
}

/// Payment document as stored in the `payments` collection.
///
/// `payee_added_date_utc` is a display string, `payee_due_date` a
/// midnight-UTC instant (null when a CSV row's date was unparseable).
/// `total_due` is derived: it is recomputed and persisted for the whole
/// collection on every listing, so it can be stale between a write and the
/// next list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", with = "uuid::serde::hyphenated")]
    pub id: Uuid,
    pub payee_first_name: String,
    pub payee_last_name: String,
    pub payee_payment_status: String,
    pub payee_added_date_utc: String,
    pub payee_due_date: Option<mongodb::bson::DateTime>,
    pub payee_address_line_1: String,
    #[serde(default)]
    pub payee_address_line_2: String,
    pub payee_city: String,
    pub payee_country: String,
    #[serde(default)]
    pub payee_province_or_state: String,
    pub payee_postal_code: String,
    pub payee_phone_number: String,
    pub payee_email: String,
    pub currency: String,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub tax_percent: f64,
    pub due_amount: f64,
    pub total_due: Option<f64>,
}

impl Payment {
    /// Derived total: due amount minus discount plus tax, in cents precision.
    pub fn compute_total_due(&self) -> f64 {
        total_due(self.due_amount, self.discount_percent, self.tax_percent)
    }
}

pub fn total_due(due_amount: f64, discount_percent: f64, tax_percent: f64) -> f64 {
    round_to_cents(
        due_amount - due_amount * discount_percent / 100.0 + due_amount * tax_percent / 100.0,
    )
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
