use crate::dtos::PaymentListParams;
use crate::error::AppError;
use crate::models::{Evidence, EvidenceMeta, Payment, PaymentStatus};
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::{FindOneOptions, FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use uuid::Uuid;

/// Data access for the `payments` and `evidence` collections.
///
/// The store enforces no referential integrity between the two: cascade
/// delete and the one-evidence-per-payment rule live here, as sequential
/// best-effort writes (no multi-document transactions).
#[derive(Clone)]
pub struct PaymentRepository {
    payments: Collection<Payment>,
    evidence: Collection<Evidence>,
    evidence_meta: Collection<EvidenceMeta>,
}

impl PaymentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            payments: db.collection("payments"),
            evidence: db.collection("evidence"),
            evidence_meta: db.collection("evidence"),
        }
    }

    /// Indexes for the listing sort key and the evidence lookup/cascade key.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let due_date_index = IndexModel::builder()
            .keys(doc! { "payee_due_date": -1 })
            .options(
                IndexOptions::builder()
                    .name("due_date_sort".to_string())
                    .build(),
            )
            .build();

        self.payments.create_index(due_date_index, None).await?;

        let payment_lookup_index = IndexModel::builder()
            .keys(doc! { "payment_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("evidence_payment_lookup".to_string())
                    .build(),
            )
            .build();

        self.evidence.create_index(payment_lookup_index, None).await?;

        tracing::info!("Payment service indexes initialized");
        Ok(())
    }

    pub async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError> {
        self.payments.insert_one(payment, None).await?;
        Ok(())
    }

    pub async fn find_payment(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = self
            .payments
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?;
        Ok(payment)
    }

    /// `$set` the given fields on one payment. Zero matched documents is not
    /// an error: update is a silent success for unknown ids.
    pub async fn update_payment(&self, id: Uuid, fields: Document) -> Result<u64, AppError> {
        let result = self
            .payments
            .update_one(doc! { "_id": id.to_string() }, doc! { "$set": fields }, None)
            .await?;
        Ok(result.matched_count)
    }

    pub async fn delete_payment(&self, id: Uuid) -> Result<u64, AppError> {
        let result = self
            .payments
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<(), AppError> {
        self.payments
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "payee_payment_status": status.as_str() } },
                None,
            )
            .await?;
        Ok(())
    }

    /// Bulk status refresh over the whole collection: records due exactly at
    /// `today` (midnight UTC) become `due_now`, records due strictly earlier
    /// become `overdue`. Null due dates match neither condition.
    pub async fn refresh_due_statuses(&self, today: DateTime) -> Result<(u64, u64), AppError> {
        let due_now = self
            .payments
            .update_many(
                doc! { "payee_due_date": { "$eq": today } },
                doc! { "$set": { "payee_payment_status": PaymentStatus::DueNow.as_str() } },
                None,
            )
            .await?;

        let overdue = self
            .payments
            .update_many(
                doc! { "payee_due_date": { "$lt": today } },
                doc! { "$set": { "payee_payment_status": PaymentStatus::Overdue.as_str() } },
                None,
            )
            .await?;

        Ok((due_now.modified_count, overdue.modified_count))
    }

    /// Recompute and persist `total_due` for every payment document, not
    /// just the current page. O(collection size); acceptable at this scale,
    /// revisit before the collection grows past a few thousand records.
    pub async fn recompute_totals(&self) -> Result<u64, AppError> {
        let mut cursor = self.payments.find(None, None).await?;
        let mut updated = 0u64;
        while let Some(payment) = cursor.try_next().await? {
            let total = payment.compute_total_due();
            self.payments
                .update_one(
                    doc! { "_id": payment.id.to_string() },
                    doc! { "$set": { "total_due": total } },
                    None,
                )
                .await?;
            updated += 1;
        }
        Ok(updated)
    }

    /// One page of matches plus the total count ignoring pagination, sorted
    /// by due date descending.
    pub async fn search_payments(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<Payment>, u64), AppError> {
        let total = self.payments.count_documents(filter.clone(), None).await?;

        let options = FindOptions::builder()
            .sort(doc! { "payee_due_date": -1 })
            .skip(skip)
            .limit(limit)
            .build();

        let cursor = self.payments.find(filter, options).await?;
        let payments: Vec<Payment> = cursor.try_collect().await?;

        Ok((payments, total))
    }

    /// Replace-on-upload: a payment keeps at most one evidence row, so any
    /// prior rows go away before the new one lands.
    pub async fn replace_evidence(&self, evidence: &Evidence) -> Result<(), AppError> {
        self.evidence
            .delete_many(doc! { "payment_id": evidence.payment_id.to_string() }, None)
            .await?;
        self.evidence.insert_one(evidence, None).await?;
        Ok(())
    }

    pub async fn find_evidence(&self, payment_id: Uuid) -> Result<Option<Evidence>, AppError> {
        let evidence = self
            .evidence
            .find_one(doc! { "payment_id": payment_id.to_string() }, None)
            .await?;
        Ok(evidence)
    }

    /// Metadata-only lookup for listing rows: projects the file name and
    /// leaves the bytes in the store.
    pub async fn find_evidence_meta(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<EvidenceMeta>, AppError> {
        let options = FindOneOptions::builder()
            .projection(doc! { "file_name": 1 })
            .build();
        let meta = self
            .evidence_meta
            .find_one(doc! { "payment_id": payment_id.to_string() }, options)
            .await?;
        Ok(meta)
    }

    pub async fn delete_evidence_for(&self, payment_id: Uuid) -> Result<u64, AppError> {
        let result = self
            .evidence
            .delete_many(doc! { "payment_id": payment_id.to_string() }, None)
            .await?;
        Ok(result.deleted_count)
    }
}

/// Filter document for the per-field search: each supplied, non-empty
/// parameter becomes a case-insensitive literal substring match on its
/// field, AND-combined. Absent fields impose no constraint. User input is
/// regex-escaped so metacharacters match themselves.
pub fn search_filter(params: &PaymentListParams) -> Document {
    let fields = [
        ("payee_first_name", params.payee_first_name.as_deref()),
        ("payee_last_name", params.payee_last_name.as_deref()),
        ("payee_payment_status", params.payee_payment_status.as_deref()),
        ("payee_address_line_1", params.payee_address_line_1.as_deref()),
        ("payee_address_line_2", params.payee_address_line_2.as_deref()),
        ("payee_city", params.payee_city.as_deref()),
        ("payee_country", params.payee_country.as_deref()),
        (
            "payee_province_or_state",
            params.payee_province_or_state.as_deref(),
        ),
        ("payee_postal_code", params.payee_postal_code.as_deref()),
        ("payee_phone_number", params.payee_phone_number.as_deref()),
        ("payee_email", params.payee_email.as_deref()),
        ("currency", params.currency.as_deref()),
    ];

    let mut filter = Document::new();
    for (field, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            filter.insert(
                field,
                doc! { "$regex": regex::escape(value), "$options": "i" },
            );
        }
    }
    filter
}
