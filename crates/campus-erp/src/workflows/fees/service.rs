use std::sync::Arc;

use chrono::Local;
use tracing::info;

use super::domain::{FeeCharge, FeePayment, ReceiptId};
use super::repository::FeeLedger;
use crate::config::SerialsConfig;
use crate::workflows::storage::{monthly_serial, RepositoryError, SerialCounter};

/// Service recording fee charges and payments. Receipt serials follow the
/// same counter seam as admission serials, scoped per month.
pub struct FeeService {
    ledger: Arc<dyn FeeLedger>,
    serials: Arc<dyn SerialCounter>,
    receipt_prefix: String,
}

impl FeeService {
    pub fn new(
        ledger: Arc<dyn FeeLedger>,
        serials: Arc<dyn SerialCounter>,
        config: &SerialsConfig,
    ) -> Self {
        Self {
            ledger,
            serials,
            receipt_prefix: config.receipt_prefix.clone(),
        }
    }

    /// Raise a charge: assign the receipt serial and persist with the balance
    /// and status derived from the amounts.
    pub fn record(&self, charge: FeeCharge) -> Result<FeePayment, FeeServiceError> {
        if charge.paid_amount > charge.amount {
            return Err(FeeServiceError::Overpayment {
                charged: charge.amount,
                offered: charge.paid_amount,
            });
        }

        let today = Local::now().date_naive();
        let serial = monthly_serial(self.serials.as_ref(), &self.receipt_prefix, today)?;

        let mut payment = FeePayment {
            receipt: ReceiptId(serial),
            student: charge.student,
            fee_type: charge.fee_type,
            amount: charge.amount,
            paid_amount: charge.paid_amount,
            remaining_amount: 0,
            status: super::domain::FeeStatus::Pending,
            academic_year: charge.academic_year,
            semester: charge.semester,
            payment_method: charge.payment_method,
            transaction_id: charge.transaction_id,
            remarks: charge.remarks,
            recorded_on: today,
        };
        payment.settle();

        let stored = self.ledger.insert(payment)?;
        info!(receipt = %stored.receipt, student = %stored.student, "fee charge recorded");
        Ok(stored)
    }

    pub fn get(&self, receipt: &ReceiptId) -> Result<FeePayment, FeeServiceError> {
        let payment = self
            .ledger
            .fetch(receipt)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(payment)
    }

    /// Add a payment against an existing receipt. The serial never changes;
    /// only the paid amount, balance, and status are re-derived.
    pub fn register_payment(
        &self,
        receipt: &ReceiptId,
        amount: u32,
    ) -> Result<FeePayment, FeeServiceError> {
        let mut payment = self
            .ledger
            .fetch(receipt)?
            .ok_or(RepositoryError::NotFound)?;

        let paid = payment.paid_amount.saturating_add(amount);
        if paid > payment.amount {
            return Err(FeeServiceError::Overpayment {
                charged: payment.amount,
                offered: paid,
            });
        }

        payment.paid_amount = paid;
        payment.settle();
        self.ledger.update(payment.clone())?;
        Ok(payment)
    }
}

/// Error raised by the fee service.
#[derive(Debug, thiserror::Error)]
pub enum FeeServiceError {
    #[error("payment of {offered} exceeds the charged amount {charged}")]
    Overpayment { charged: u32, offered: u32 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
