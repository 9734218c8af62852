use super::domain::{FeePayment, ReceiptId};
use crate::workflows::storage::RepositoryError;

/// Storage seam for fee records, keyed by receipt serial.
pub trait FeeLedger: Send + Sync {
    fn insert(&self, payment: FeePayment) -> Result<FeePayment, RepositoryError>;
    fn update(&self, payment: FeePayment) -> Result<(), RepositoryError>;
    fn fetch(&self, receipt: &ReceiptId) -> Result<Option<FeePayment>, RepositoryError>;
}
