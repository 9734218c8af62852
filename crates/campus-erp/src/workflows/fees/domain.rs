use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::admissions::EnrollmentId;

/// Receipt serial assigned at first persistence, e.g. `FEE-2608-0001`.
/// Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Tuition,
    Examination,
    Hostel,
    Library,
    Other,
}

/// Settlement status derived from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
    Waived,
}

impl FeeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FeeStatus::Pending => "pending",
            FeeStatus::Partial => "partial",
            FeeStatus::Paid => "paid",
            FeeStatus::Overdue => "overdue",
            FeeStatus::Waived => "waived",
        }
    }
}

/// Payload accepted when a charge is raised against a student.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeeCharge {
    pub student: EnrollmentId,
    pub fee_type: FeeKind,
    pub amount: u32,
    #[serde(default)]
    pub paid_amount: u32,
    pub academic_year: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// The stored fee record. `remaining_amount` and `status` are derived from
/// the amounts every time a payment lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePayment {
    pub receipt: ReceiptId,
    pub student: EnrollmentId,
    pub fee_type: FeeKind,
    pub amount: u32,
    pub paid_amount: u32,
    pub remaining_amount: u32,
    pub status: FeeStatus,
    pub academic_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub recorded_on: NaiveDate,
}

impl FeePayment {
    /// Recompute the balance and settlement status from the amounts.
    pub fn settle(&mut self) {
        self.remaining_amount = self.amount.saturating_sub(self.paid_amount);
        self.status = if self.paid_amount == 0 {
            FeeStatus::Pending
        } else if self.remaining_amount == 0 {
            FeeStatus::Paid
        } else {
            FeeStatus::Partial
        };
    }
}
