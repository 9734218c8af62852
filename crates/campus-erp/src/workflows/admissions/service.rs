use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use tracing::info;

use super::domain::{
    Account, AccountRole, AdmissionApplication, AdmissionDecision, AdmissionId, AdmissionStatus,
    AdmissionSubmission, AdmissionUpdate, CourseId, DecisionStatus, Enrollment, EnrollmentId,
    EnrollmentStatus, NewAccount,
};
use super::repository::{
    AccountDirectory, AdmissionFilter, AdmissionRepository, AdmissionStats, ClaimOutcome,
    CourseCatalog, EnrollmentRegistry,
};
use crate::config::SerialsConfig;
use crate::workflows::storage::{yearly_serial, RepositoryError, SerialCounter};

/// Placeholder credential assigned to auto-created accounts. Such accounts
/// are flagged `must_reset_password`; the directory is expected to refuse
/// login until the credential is replaced.
const PROVISIONAL_PASSWORD: &str = "changeme";

/// Service composing the application store, account directory, enrollment
/// registry, and course catalog.
///
/// Account creation, enrollment creation, and the application update are
/// separate store operations with no cross-store transaction; a failure
/// mid-sequence surfaces as an error without compensating rollback. The
/// conditional [`AdmissionRepository::claim_conversion`] keeps the
/// application-to-enrollment link exactly-once regardless.
pub struct AdmissionService {
    repository: Arc<dyn AdmissionRepository>,
    accounts: Arc<dyn AccountDirectory>,
    enrollments: Arc<dyn EnrollmentRegistry>,
    courses: Arc<dyn CourseCatalog>,
    serials: Arc<dyn SerialCounter>,
    admission_prefix: String,
    enrollment_prefix: String,
}

impl AdmissionService {
    pub fn new(
        repository: Arc<dyn AdmissionRepository>,
        accounts: Arc<dyn AccountDirectory>,
        enrollments: Arc<dyn EnrollmentRegistry>,
        courses: Arc<dyn CourseCatalog>,
        serials: Arc<dyn SerialCounter>,
        config: &SerialsConfig,
    ) -> Self {
        Self {
            repository,
            accounts,
            enrollments,
            courses,
            serials,
            admission_prefix: config.admission_prefix.clone(),
            enrollment_prefix: config.enrollment_prefix.clone(),
        }
    }

    /// Accept a new application: validate the course reference, assign the
    /// serial, and persist with status `pending`.
    pub fn submit(
        &self,
        submission: AdmissionSubmission,
    ) -> Result<AdmissionApplication, AdmissionServiceError> {
        self.require_course(&submission.applied_course)?;

        let today = Local::now().date_naive();
        let serial = yearly_serial(self.serials.as_ref(), &self.admission_prefix, today)?;

        let application = AdmissionApplication {
            id: AdmissionId(serial),
            applicant: submission.applicant,
            contact: submission.contact,
            address: submission.address,
            guardian: submission.guardian,
            previous_education: submission.previous_education,
            documents: submission.documents,
            applied_course: submission.applied_course,
            academic_year: submission.academic_year,
            status: AdmissionStatus::Pending,
            remarks: None,
            interview: None,
            admission_fee: None,
            student: None,
            submitted_on: today,
        };

        let stored = self.repository.insert(application)?;
        info!(id = %stored.id, course = %stored.applied_course, "admission application received");
        Ok(stored)
    }

    pub fn get(&self, id: &AdmissionId) -> Result<AdmissionApplication, AdmissionServiceError> {
        let application = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn list(
        &self,
        filter: AdmissionFilter,
    ) -> Result<Vec<AdmissionApplication>, AdmissionServiceError> {
        let applications = self.repository.search(&filter)?;
        Ok(applications)
    }

    /// General update path. Any stored status value may be set here; only the
    /// decision endpoint triggers conversion.
    pub fn update(
        &self,
        id: &AdmissionId,
        update: AdmissionUpdate,
    ) -> Result<AdmissionApplication, AdmissionServiceError> {
        let mut application = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        if let Some(course) = update.applied_course {
            self.require_course(&course)?;
            application.applied_course = course;
        }
        if let Some(applicant) = update.applicant {
            application.applicant = applicant;
        }
        if let Some(contact) = update.contact {
            application.contact = contact;
        }
        if let Some(address) = update.address {
            application.address = address;
        }
        if let Some(guardian) = update.guardian {
            application.guardian = Some(guardian);
        }
        if let Some(year) = update.academic_year {
            application.academic_year = year;
        }
        if let Some(status) = update.status {
            application.status = status;
        }
        if let Some(remarks) = update.remarks {
            application.remarks = Some(remarks);
        }

        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Remove an application. Refused once the application has been converted:
    /// the enrollment record is authoritative and must not lose its source.
    pub fn delete(&self, id: &AdmissionId) -> Result<(), AdmissionServiceError> {
        let application = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        if application.status == AdmissionStatus::Approved && application.student.is_some() {
            return Err(AdmissionServiceError::AlreadyConverted(application.id));
        }

        self.repository.delete(id)?;
        Ok(())
    }

    /// Apply a reviewer decision. Transitioning into `approved` while the
    /// enrollment link is unset runs the conversion; re-approving an already
    /// converted application only re-asserts the status.
    pub fn decide(
        &self,
        id: &AdmissionId,
        decision: AdmissionDecision,
    ) -> Result<AdmissionApplication, AdmissionServiceError> {
        let mut application = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        application.status = decision.status.into();
        if let Some(remarks) = decision.remarks {
            application.remarks = Some(remarks);
        }
        if let Some(interview) = decision.interview {
            application.interview = Some(interview);
        }
        if let Some(fee) = decision.admission_fee {
            application.admission_fee = Some(fee);
        }

        if decision.status == DecisionStatus::Approved && application.student.is_none() {
            let enrollment = self.convert(&application)?;
            application.student = Some(enrollment);
        }

        self.repository.update(application.clone())?;
        Ok(application)
    }

    /// Intake totals for one academic year, grouped by status.
    pub fn stats(&self, academic_year: &str) -> Result<AdmissionStats, AdmissionServiceError> {
        let mut by_status = BTreeMap::new();
        let mut total = 0;

        for status in AdmissionStatus::ALL {
            let filter = AdmissionFilter {
                status: Some(status),
                academic_year: Some(academic_year.to_string()),
                ..AdmissionFilter::default()
            };
            let count = self.repository.count(&filter)?;
            if count > 0 {
                by_status.insert(status.label(), count);
            }
            total += count;
        }

        Ok(AdmissionStats {
            academic_year: academic_year.to_string(),
            total,
            by_status,
        })
    }

    /// Materialize the account and enrollment for an approved application and
    /// claim the one-time link on the application.
    fn convert(
        &self,
        application: &AdmissionApplication,
    ) -> Result<EnrollmentId, AdmissionServiceError> {
        let account = match application.contact.email.as_deref() {
            Some(email) => Some(self.account_for(email, application)?),
            None => None,
        };

        let today = Local::now().date_naive();
        let serial = yearly_serial(self.serials.as_ref(), &self.enrollment_prefix, today)?;
        let enrollment = Enrollment {
            id: EnrollmentId(serial),
            personal: application.applicant.clone(),
            contact: application.contact.clone(),
            address: application.address.clone(),
            guardian: application.guardian.clone(),
            course: application.applied_course.clone(),
            batch: application.academic_year.clone(),
            previous_education: application.previous_education.clone(),
            documents: application.documents.clone(),
            account: account.map(|account| account.id),
            status: EnrollmentStatus::Active,
            enrolled_on: today,
        };

        let stored = self.enrollments.insert(enrollment)?;

        match self
            .repository
            .claim_conversion(&application.id, &stored.id)?
        {
            ClaimOutcome::Claimed => {
                info!(application = %application.id, enrollment = %stored.id, "admission converted");
                Ok(stored.id)
            }
            // A concurrent approval won the claim. Its enrollment is the one
            // linked on the application; ours is surplus.
            ClaimOutcome::AlreadyLinked(existing) => Ok(existing),
        }
    }

    /// Reuse the account matching the applicant's email, or create one with a
    /// provisional credential. A create losing an email-uniqueness race falls
    /// back to the lookup.
    fn account_for(
        &self,
        email: &str,
        application: &AdmissionApplication,
    ) -> Result<Account, AdmissionServiceError> {
        if let Some(existing) = self.accounts.find_by_email(email)? {
            return Ok(existing);
        }

        let new_account = NewAccount {
            name: application.applicant.full_name(),
            email: email.to_string(),
            password: PROVISIONAL_PASSWORD.to_string(),
            role: AccountRole::Student,
            contact_number: Some(application.contact.phone_number.clone()),
            must_reset_password: true,
        };

        match self.accounts.create(new_account) {
            Ok(account) => Ok(account),
            Err(RepositoryError::Conflict) => self
                .accounts
                .find_by_email(email)?
                .ok_or_else(|| {
                    RepositoryError::Unavailable(
                        "account directory reported a duplicate email but returned no record"
                            .to_string(),
                    )
                    .into()
                }),
            Err(other) => Err(other.into()),
        }
    }

    fn require_course(&self, course: &CourseId) -> Result<(), AdmissionServiceError> {
        self.courses
            .fetch(course)?
            .map(|_| ())
            .ok_or_else(|| AdmissionServiceError::UnknownCourse(course.clone()))
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error("unknown course: {0}")]
    UnknownCourse(CourseId),
    #[error("application {0} has been converted to an enrollment and cannot be deleted")]
    AlreadyConverted(AdmissionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
