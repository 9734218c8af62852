//! Admission intake, decision handling, and the one-time conversion of an
//! approved application into an account and enrollment record.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Account, AccountId, AccountRole, Address, AdmissionApplication, AdmissionDecision,
    AdmissionFee, AdmissionId, AdmissionStatus, AdmissionSubmission, AdmissionUpdate,
    ApplicantDetails, ContactDetails, Course, CourseId, DecisionStatus, DocumentRef, Enrollment,
    EnrollmentId, EnrollmentStatus, FeeTransaction, Gender, GuardianDetails, InterviewDetails,
    NewAccount, PriorEducation,
};
pub use repository::{
    AccountDirectory, AdmissionFilter, AdmissionRepository, AdmissionStats, ClaimOutcome,
    CourseCatalog, EnrollmentRegistry,
};
pub use router::admission_router;
pub use service::{AdmissionService, AdmissionServiceError};
