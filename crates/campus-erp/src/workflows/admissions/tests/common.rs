use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::config::SerialsConfig;
use crate::workflows::admissions::domain::{
    Account, AccountId, Address, AdmissionApplication, AdmissionId, AdmissionSubmission,
    ApplicantDetails, ContactDetails, Course, CourseId, Enrollment, EnrollmentId, Gender,
    GuardianDetails, NewAccount,
};
use crate::workflows::admissions::repository::{
    AccountDirectory, AdmissionFilter, AdmissionRepository, ClaimOutcome, CourseCatalog,
    EnrollmentRegistry,
};
use crate::workflows::admissions::service::AdmissionService;
use crate::workflows::storage::{RepositoryError, SerialCounter};

#[derive(Default)]
pub(super) struct MemoryAdmissions {
    records: Mutex<HashMap<AdmissionId, AdmissionApplication>>,
}

impl MemoryAdmissions {
    pub(super) fn get(&self, id: &AdmissionId) -> Option<AdmissionApplication> {
        self.records
            .lock()
            .expect("admissions mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("admissions mutex poisoned").len()
    }
}

impl AdmissionRepository for MemoryAdmissions {
    fn insert(
        &self,
        application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("admissions mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: AdmissionApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("admissions mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AdmissionId) -> Result<Option<AdmissionApplication>, RepositoryError> {
        let guard = self.records.lock().expect("admissions mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &AdmissionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("admissions mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn search(
        &self,
        filter: &AdmissionFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        let guard = self.records.lock().expect("admissions mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect())
    }

    fn count(&self, filter: &AdmissionFilter) -> Result<u64, RepositoryError> {
        self.search(filter).map(|matches| matches.len() as u64)
    }

    fn claim_conversion(
        &self,
        id: &AdmissionId,
        enrollment: &EnrollmentId,
    ) -> Result<ClaimOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("admissions mutex poisoned");
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

#[derive(Default)]
pub(super) struct MemoryAccounts {
    records: Mutex<Vec<Account>>,
    next_id: AtomicU64,
    pub(super) lookups: AtomicUsize,
    pub(super) creates: AtomicUsize,
}

impl MemoryAccounts {
    pub(super) fn all(&self) -> Vec<Account> {
        self.records.lock().expect("accounts mutex poisoned").clone()
    }

    pub(super) fn seed(&self, account: Account) {
        self.records
            .lock()
            .expect("accounts mutex poisoned")
            .push(account);
    }
}

impl AccountDirectory for MemoryAccounts {
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let guard = self.records.lock().expect("accounts mutex poisoned");
        Ok(guard
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        self.creates.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.records.lock().expect("accounts mutex poisoned");
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

#[derive(Default)]
pub(super) struct MemoryEnrollments {
    records: Mutex<HashMap<EnrollmentId, Enrollment>>,
}

impl MemoryEnrollments {
    pub(super) fn all(&self) -> Vec<Enrollment> {
        self.records
            .lock()
            .expect("enrollments mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl EnrollmentRegistry for MemoryEnrollments {
    fn insert(&self, enrollment: Enrollment) -> Result<Enrollment, RepositoryError> {
        let mut guard = self.records.lock().expect("enrollments mutex poisoned");
        if guard.contains_key(&enrollment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, RepositoryError> {
        let guard = self.records.lock().expect("enrollments mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct MemoryCatalog {
    courses: HashMap<CourseId, Course>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        let courses = [
            Course {
                id: CourseId("CS101".to_string()),
                name: "Computer Science".to_string(),
                code: "CS101".to_string(),
            },
            Course {
                id: CourseId("ME202".to_string()),
                name: "Mechanical Engineering".to_string(),
                code: "ME202".to_string(),
            },
        ];
        Self {
            courses: courses
                .into_iter()
                .map(|course| (course.id.clone(), course))
                .collect(),
        }
    }
}

impl CourseCatalog for MemoryCatalog {
    fn fetch(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        Ok(self.courses.get(id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MapCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl SerialCounter for MapCounter {
    fn next(&self, series: &str) -> Result<u64, RepositoryError> {
        let mut guard = self.counts.lock().expect("counter mutex poisoned");
        let slot = guard.entry(series.to_string()).or_insert(0);
        *slot += 1;
        Ok(*slot)
    }
}

pub(super) struct Fixture {
    pub(super) service: AdmissionService,
    pub(super) admissions: Arc<MemoryAdmissions>,
    pub(super) accounts: Arc<MemoryAccounts>,
    pub(super) enrollments: Arc<MemoryEnrollments>,
}

pub(super) fn fixture() -> Fixture {
    let admissions = Arc::new(MemoryAdmissions::default());
    let accounts = Arc::new(MemoryAccounts::default());
    let enrollments = Arc::new(MemoryEnrollments::default());
    let service = AdmissionService::new(
        admissions.clone(),
        accounts.clone(),
        enrollments.clone(),
        Arc::new(MemoryCatalog::default()),
        Arc::new(MapCounter::default()),
        &SerialsConfig::default(),
    );
    Fixture {
        service,
        admissions,
        accounts,
        enrollments,
    }
}

pub(super) fn submission() -> AdmissionSubmission {
    AdmissionSubmission {
        applicant: ApplicantDetails {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2004, 6, 12).expect("valid date"),
            gender: Gender::Female,
            blood_group: Some("O+".to_string()),
        },
        contact: ContactDetails {
            email: Some("a@x.com".to_string()),
            phone_number: "555-0101".to_string(),
            alternate_phone: None,
        },
        address: Address {
            street: Some("12 College Road".to_string()),
            city: Some("Springfield".to_string()),
            state: None,
            postal_code: Some("62704".to_string()),
            country: Some("US".to_string()),
        },
        guardian: Some(GuardianDetails {
            name: "John Doe".to_string(),
            relationship: "Father".to_string(),
            contact_number: "555-0102".to_string(),
            email: None,
        }),
        previous_education: Vec::new(),
        documents: Vec::new(),
        applied_course: CourseId("CS101".to_string()),
        academic_year: "2025".to_string(),
    }
}

pub(super) fn submission_without_email() -> AdmissionSubmission {
    let mut submission = submission();
    submission.contact.email = None;
    submission
}
