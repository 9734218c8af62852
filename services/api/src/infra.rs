use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use campus_erp::workflows::admissions::{
    Account, AccountDirectory, AccountId, AdmissionApplication, AdmissionFilter, AdmissionId,
    AdmissionRepository, ClaimOutcome, Course, CourseCatalog, CourseId, Enrollment, EnrollmentId,
    EnrollmentRegistry, NewAccount,
};
use campus_erp::workflows::fees::{FeeLedger, FeePayment, ReceiptId};
use campus_erp::workflows::storage::{RepositoryError, SerialCounter};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAdmissionRepository {
    records: Arc<Mutex<HashMap<AdmissionId, AdmissionApplication>>>,
}

impl AdmissionRepository for InMemoryAdmissionRepository {
    fn insert(
        &self,
        application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: AdmissionApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AdmissionId) -> Result<Option<AdmissionApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &AdmissionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn search(
        &self,
        filter: &AdmissionFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matches: Vec<AdmissionApplication> = guard
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(matches)
    }

    fn count(&self, filter: &AdmissionFilter) -> Result<u64, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| filter.matches(application))
            .count() as u64)
    }

    fn claim_conversion(
        &self,
        id: &AdmissionId,
        enrollment: &EnrollmentId,
    ) -> Result<ClaimOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let application = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        match &application.student {
            Some(existing) => Ok(ClaimOutcome::AlreadyLinked(existing.clone())),
            None => {
                application.student = Some(enrollment.clone());
                Ok(ClaimOutcome::Claimed)
            }
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountDirectory {
    records: Arc<Mutex<Vec<Account>>>,
    next_id: Arc<AtomicU64>,
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let guard = self.records.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(RepositoryError::Conflict);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Account {
            id: AccountId(format!("acct-{id:04}")),
            name: account.name,
            email: account.email,
            role: account.role,
            contact_number: account.contact_number,
            must_reset_password: account.must_reset_password,
        };
        guard.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEnrollmentRegistry {
    records: Arc<Mutex<HashMap<EnrollmentId, Enrollment>>>,
}

impl EnrollmentRegistry for InMemoryEnrollmentRegistry {
    fn insert(&self, enrollment: Enrollment) -> Result<Enrollment, RepositoryError> {
        let mut guard = self.records.lock().expect("registry mutex poisoned");
        if guard.contains_key(&enrollment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, RepositoryError> {
        let guard = self.records.lock().expect("registry mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Catalog pre-seeded with a small demo roster. A persistent backend would
/// replace this behind the same trait.
#[derive(Clone)]
pub(crate) struct InMemoryCourseCatalog {
    courses: Arc<HashMap<CourseId, Course>>,
}

impl Default for InMemoryCourseCatalog {
    fn default() -> Self {
        let seeded = [
            ("CS101", "Computer Science"),
            ("ME202", "Mechanical Engineering"),
            ("BBA301", "Business Administration"),
        ];
        let courses = seeded
            .into_iter()
            .map(|(code, name)| {
                let course = Course {
                    id: CourseId(code.to_string()),
                    name: name.to_string(),
                    code: code.to_string(),
                };
                (course.id.clone(), course)
            })
            .collect();
        Self {
            courses: Arc::new(courses),
        }
    }
}

impl CourseCatalog for InMemoryCourseCatalog {
    fn fetch(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        Ok(self.courses.get(id).cloned())
    }
}

/// Counter backed by per-series atomics. Increment-and-read is a single
/// atomic operation, so concurrent submitters never observe the same serial.
#[derive(Default, Clone)]
pub(crate) struct AtomicSerialCounter {
    series: Arc<Mutex<HashMap<String, Arc<AtomicU64>>>>,
}

impl SerialCounter for AtomicSerialCounter {
    fn next(&self, series: &str) -> Result<u64, RepositoryError> {
        let counter = {
            let mut guard = self.series.lock().expect("counter mutex poisoned");
            guard
                .entry(series.to_string())
                .or_insert_with(|| Arc::new(AtomicU64::new(0)))
                .clone()
        };
        Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFeeLedger {
    records: Arc<Mutex<HashMap<ReceiptId, FeePayment>>>,
}

impl FeeLedger for InMemoryFeeLedger {
    fn insert(&self, payment: FeePayment) -> Result<FeePayment, RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&payment.receipt) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.receipt.clone(), payment.clone());
        Ok(payment)
    }

    fn update(&self, payment: FeePayment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&payment.receipt) {
            guard.insert(payment.receipt.clone(), payment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, receipt: &ReceiptId) -> Result<Option<FeePayment>, RepositoryError> {
        let guard = self.records.lock().expect("ledger mutex poisoned");
        Ok(guard.get(receipt).cloned())
    }
}
