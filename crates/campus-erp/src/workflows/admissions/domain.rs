use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Serial assigned to an application at first persistence, e.g. `ADM-26-0001`.
/// Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdmissionId(pub String);

/// Registration serial of an enrollment record, e.g. `STU-26-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

/// Identifier of a login account in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Identifier of a course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl fmt::Display for AdmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Identity fields collected on the application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
}

impl ApplicantDetails {
    /// First and last name joined by a single space, as used for account names.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianDetails {
    pub name: String,
    pub relationship: String,
    pub contact_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One prior-education entry carried over from the application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorEducation {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub year_of_completion: u16,
    pub percentage: f32,
}

/// Reference to an uploaded supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub document_type: String,
    pub file_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTransaction {
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionFee {
    pub amount: u32,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<FeeTransaction>,
}

/// Canonical lifecycle of a stored application.
///
/// This is the single authoritative status set. The decision endpoint only
/// accepts the [`DecisionStatus`] subset; the remaining values are reachable
/// through the general update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Pending,
    UnderReview,
    InterviewScheduled,
    Approved,
    Rejected,
    Waitlisted,
    Enrolled,
}

impl AdmissionStatus {
    pub const ALL: [AdmissionStatus; 7] = [
        AdmissionStatus::Pending,
        AdmissionStatus::UnderReview,
        AdmissionStatus::InterviewScheduled,
        AdmissionStatus::Approved,
        AdmissionStatus::Rejected,
        AdmissionStatus::Waitlisted,
        AdmissionStatus::Enrolled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            AdmissionStatus::Pending => "pending",
            AdmissionStatus::UnderReview => "under_review",
            AdmissionStatus::InterviewScheduled => "interview_scheduled",
            AdmissionStatus::Approved => "approved",
            AdmissionStatus::Rejected => "rejected",
            AdmissionStatus::Waitlisted => "waitlisted",
            AdmissionStatus::Enrolled => "enrolled",
        }
    }
}

/// Statuses a reviewer may set through the decision endpoint. Anything else
/// fails request deserialization before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Pending,
    InterviewScheduled,
    Approved,
    Rejected,
}

impl From<DecisionStatus> for AdmissionStatus {
    fn from(value: DecisionStatus) -> Self {
        match value {
            DecisionStatus::Pending => AdmissionStatus::Pending,
            DecisionStatus::InterviewScheduled => AdmissionStatus::InterviewScheduled,
            DecisionStatus::Approved => AdmissionStatus::Approved,
            DecisionStatus::Rejected => AdmissionStatus::Rejected,
        }
    }
}

/// Payload accepted by the intake endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionSubmission {
    pub applicant: ApplicantDetails,
    pub contact: ContactDetails,
    #[serde(default)]
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<GuardianDetails>,
    #[serde(default)]
    pub previous_education: Vec<PriorEducation>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    pub applied_course: CourseId,
    pub academic_year: String,
}

/// The stored application record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionApplication {
    pub id: AdmissionId,
    pub applicant: ApplicantDetails,
    pub contact: ContactDetails,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<GuardianDetails>,
    #[serde(default)]
    pub previous_education: Vec<PriorEducation>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    pub applied_course: CourseId,
    pub academic_year: String,
    pub status: AdmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview: Option<InterviewDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_fee: Option<AdmissionFee>,
    /// Forward link to the enrollment created by conversion. Set exactly once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<EnrollmentId>,
    pub submitted_on: NaiveDate,
}

/// Partial update applied through the general update path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionUpdate {
    #[serde(default)]
    pub applicant: Option<ApplicantDetails>,
    #[serde(default)]
    pub contact: Option<ContactDetails>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub guardian: Option<GuardianDetails>,
    #[serde(default)]
    pub applied_course: Option<CourseId>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub status: Option<AdmissionStatus>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Reviewer decision applied through the decision endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionDecision {
    pub status: DecisionStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub interview: Option<InterviewDetails>,
    #[serde(default)]
    pub admission_fee: Option<AdmissionFee>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Student,
    Staff,
    Admin,
}

impl AccountRole {
    pub const fn label(self) -> &'static str {
        match self {
            AccountRole::Student => "student",
            AccountRole::Staff => "staff",
            AccountRole::Admin => "admin",
        }
    }
}

/// Request handed to the account directory. The directory hashes the
/// credential internally; this core never stores it.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    pub contact_number: Option<String>,
    pub must_reset_password: bool,
}

/// Directory view of an account. The credential hash never leaves the
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub must_reset_password: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Inactive,
    Graduated,
    Suspended,
    Withdrawn,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Inactive => "inactive",
            EnrollmentStatus::Graduated => "graduated",
            EnrollmentStatus::Suspended => "suspended",
            EnrollmentStatus::Withdrawn => "withdrawn",
        }
    }
}

/// The authoritative record of a person studying in a program. Created once
/// per application by conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub personal: ApplicantDetails,
    pub contact: ContactDetails,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<GuardianDetails>,
    pub course: CourseId,
    pub batch: String,
    #[serde(default)]
    pub previous_education: Vec<PriorEducation>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    /// Back-reference to the login account; `None` when the application
    /// carried no email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,
    pub status: EnrollmentStatus,
    pub enrolled_on: NaiveDate,
}

/// Catalog entry validated before an application or enrollment may reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
}
