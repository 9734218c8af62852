//! Fee charges and receipts. Shares the serial counter seam with admissions;
//! receipt numbers are month-scoped.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{FeeCharge, FeeKind, FeePayment, FeeStatus, ReceiptId};
pub use repository::FeeLedger;
pub use router::fee_router;
pub use service::{FeeService, FeeServiceError};
