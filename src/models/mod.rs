pub mod evidence;
pub mod payment;

pub use evidence::{Evidence, EvidenceMeta};
pub use payment::{start_of_day, Payment, PaymentStatus, ADDED_DATE_FORMAT, DUE_DATE_FORMAT};
