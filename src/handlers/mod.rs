pub mod evidence;
pub mod health;
pub mod payments;

pub use evidence::{download_evidence, upload_evidence};
pub use health::health_check;
pub use payments::{create_payment, delete_payment, get_payments, update_payment};

use crate::error::AppError;
use uuid::Uuid;

/// Path ids are opaque strings at the route layer; anything that is not a
/// UUID is a 400, never a 404.
pub(crate) fn parse_payment_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidIdentifier(anyhow::anyhow!("Invalid payment ID")))
}
