use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Account, AdmissionApplication, AdmissionId, AdmissionStatus, Course, CourseId, Enrollment,
    EnrollmentId, NewAccount,
};
use crate::workflows::storage::RepositoryError;

/// Filter predicates supported by the application store: exact match on the
/// structured fields, case-insensitive substring match for `search` over the
/// serial, applicant names, and email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionFilter {
    #[serde(default)]
    pub status: Option<AdmissionStatus>,
    #[serde(default)]
    pub course: Option<CourseId>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl AdmissionFilter {
    pub fn matches(&self, application: &AdmissionApplication) -> bool {
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }
        if let Some(course) = &self.course {
            if &application.applied_course != course {
                return false;
            }
        }
        if let Some(year) = &self.academic_year {
            if &application.academic_year != year {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let haystacks = [
                Some(application.id.0.as_str()),
                Some(application.applicant.first_name.as_str()),
                Some(application.applicant.last_name.as_str()),
                application.contact.email.as_deref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

/// Outcome of the conditional conversion-link update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The link was unset and has now been set to the supplied enrollment.
    Claimed,
    /// Another caller converted first; the stored link is returned untouched.
    AlreadyLinked(EnrollmentId),
}

/// Storage seam for application records.
pub trait AdmissionRepository: Send + Sync {
    fn insert(
        &self,
        application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError>;
    fn update(&self, application: AdmissionApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AdmissionId) -> Result<Option<AdmissionApplication>, RepositoryError>;
    fn delete(&self, id: &AdmissionId) -> Result<(), RepositoryError>;
    fn search(
        &self,
        filter: &AdmissionFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError>;
    fn count(&self, filter: &AdmissionFilter) -> Result<u64, RepositoryError>;

    /// Set the application's enrollment link, but only while it is unset.
    /// This is the single atomic step that makes conversion exactly-once:
    /// two callers may both build an enrollment, but only one claim succeeds.
    fn claim_conversion(
        &self,
        id: &AdmissionId,
        enrollment: &EnrollmentId,
    ) -> Result<ClaimOutcome, RepositoryError>;
}

/// Seam over the auth subsystem's account collection. Implementations hash
/// the plaintext credential internally and enforce email uniqueness.
pub trait AccountDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
    fn create(&self, account: NewAccount) -> Result<Account, RepositoryError>;
}

/// Storage seam for enrollment records.
pub trait EnrollmentRegistry: Send + Sync {
    fn insert(&self, enrollment: Enrollment) -> Result<Enrollment, RepositoryError>;
    fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, RepositoryError>;
}

/// Program registry consulted before an application may reference a course.
pub trait CourseCatalog: Send + Sync {
    fn fetch(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError>;
}

/// Per-year intake totals broken down by status.
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionStats {
    pub academic_year: String,
    pub total: u64,
    pub by_status: BTreeMap<&'static str, u64>,
}
