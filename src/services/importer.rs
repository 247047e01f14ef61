use crate::models::{start_of_day, Payment, ADDED_DATE_FORMAT, DUE_DATE_FORMAT};
use crate::services::repository::PaymentRepository;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Raw CSV row. Dates and percentages arrive as loose text and get
/// normalized during conversion; `due_amount` is the one field that must
/// parse cleanly.
#[derive(Debug, Deserialize)]
struct CsvPaymentRow {
    payee_first_name: String,
    payee_last_name: String,
    payee_payment_status: String,
    payee_added_date_utc: i64,
    payee_due_date: String,
    payee_address_line_1: String,
    #[serde(default)]
    payee_address_line_2: Option<String>,
    payee_city: String,
    payee_country: String,
    #[serde(default)]
    payee_province_or_state: Option<String>,
    payee_postal_code: String,
    payee_phone_number: String,
    payee_email: String,
    currency: String,
    #[serde(default)]
    discount_percent: Option<String>,
    #[serde(default)]
    tax_percent: Option<String>,
    due_amount: String,
}

impl CsvPaymentRow {
    fn into_payment(self, line: usize) -> anyhow::Result<Payment> {
        let due_amount: f64 = self.due_amount.trim().parse().with_context(|| {
            format!("line {line}: due_amount {:?} is not numeric", self.due_amount)
        })?;
        let payee_added_date_utc = display_added_date(self.payee_added_date_utc)
            .with_context(|| format!("line {line}"))?;

        let mut payment = Payment {
            id: Uuid::new_v4(),
            payee_first_name: self.payee_first_name,
            payee_last_name: self.payee_last_name,
            payee_payment_status: self.payee_payment_status,
            payee_added_date_utc,
            payee_due_date: parse_due_date(&self.payee_due_date),
            payee_address_line_1: self.payee_address_line_1,
            payee_address_line_2: self.payee_address_line_2.unwrap_or_default(),
            payee_city: self.payee_city,
            payee_country: self.payee_country,
            payee_province_or_state: self.payee_province_or_state.unwrap_or_default(),
            payee_postal_code: self.payee_postal_code,
            payee_phone_number: self.payee_phone_number,
            payee_email: self.payee_email,
            currency: self.currency,
            discount_percent: parse_percent(self.discount_percent.as_deref()),
            tax_percent: parse_percent(self.tax_percent.as_deref()),
            due_amount,
            total_due: None,
        };
        payment.total_due = Some(payment.compute_total_due());
        Ok(payment)
    }
}

fn display_added_date(epoch_secs: i64) -> anyhow::Result<String> {
    let instant = DateTime::<Utc>::from_timestamp(epoch_secs, 0)
        .context("payee_added_date_utc is out of range")?;
    Ok(instant.format(ADDED_DATE_FORMAT).to_string())
}

/// Lenient calendar-date parse: anything that is not `%Y-%m-%d` imports as
/// a null due date rather than failing the row.
fn parse_due_date(raw: &str) -> Option<mongodb::bson::DateTime> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .ok()
        .map(start_of_day)
}

/// Lenient percentage parse: blank or non-numeric collapses to zero.
fn parse_percent(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Bulk-loads the startup CSV: the whole file is parsed up front, then rows
/// insert one by one. A row that fails conversion aborts the remainder of
/// the import; rows already inserted stay in place.
pub async fn import_payments(
    repository: &PaymentRepository,
    path: &str,
) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open payments CSV at {path}"))?;

    let rows: Vec<CsvPaymentRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .context("failed to parse payments CSV")?;

    let mut imported = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        // Header occupies line 1.
        let payment = row.into_payment(index + 2)?;
        repository.insert_payment(&payment).await?;
        imported += 1;
    }

    tracing::info!(rows = imported, "Imported payment records from CSV");
    Ok(imported)
}
