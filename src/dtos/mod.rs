pub mod payments;

pub use payments::{
    EvidenceStatus, MessageResponse, PaymentCreateRequest, PaymentCreateResponse,
    PaymentListParams, PaymentListResponse, PaymentResponse, PaymentUpdateRequest,
    UploadEvidenceResponse,
};
