use serde::{Deserialize, Serialize};

/// Cache-resident verification record, addressed by the opaque key handed
/// to the client at issuance. The bound phone number comes from here, not
/// from the binding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub phone: String,
    pub code: String,
}
