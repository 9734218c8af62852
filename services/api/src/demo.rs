use std::sync::Arc;

use campus_erp::config::SerialsConfig;
use campus_erp::error::AppError;
use campus_erp::workflows::admissions::{
    AdmissionDecision, AdmissionService, AdmissionServiceError, AdmissionSubmission,
    ApplicantDetails, ContactDetails, CourseId, DecisionStatus, EnrollmentRegistry, Gender,
    GuardianDetails,
};
use campus_erp::workflows::fees::{FeeCharge, FeeKind, FeeService};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use crate::infra::{
    AtomicSerialCounter, InMemoryAccountDirectory, InMemoryAdmissionRepository,
    InMemoryCourseCatalog, InMemoryEnrollmentRegistry, InMemoryFeeLedger,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Academic year stamped onto the demo application. Defaults to the
    /// current calendar year.
    #[arg(long)]
    pub(crate) academic_year: Option<String>,
    /// Course code to apply for (must exist in the seeded catalog).
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Skip the fee receipt portion of the demo.
    #[arg(long)]
    pub(crate) skip_fees: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        academic_year,
        course,
        skip_fees,
    } = args;

    let academic_year =
        academic_year.unwrap_or_else(|| Local::now().date_naive().year().to_string());
    let course = CourseId(course.unwrap_or_else(|| "CS101".to_string()));

    let serials = Arc::new(AtomicSerialCounter::default());
    let enrollments = Arc::new(InMemoryEnrollmentRegistry::default());
    let admissions = AdmissionService::new(
        Arc::new(InMemoryAdmissionRepository::default()),
        Arc::new(InMemoryAccountDirectory::default()),
        enrollments.clone(),
        Arc::new(InMemoryCourseCatalog::default()),
        serials.clone(),
        &SerialsConfig::default(),
    );
    let fees = FeeService::new(
        Arc::new(InMemoryFeeLedger::default()),
        serials,
        &SerialsConfig::default(),
    );

    println!("Admission workflow demo");
    let submission = demo_submission(course, academic_year.clone());
    let application = admissions.submit(submission)?;
    println!(
        "- Received application {} for {} ({}) -> status {}",
        application.id,
        application.applicant.full_name(),
        application.applied_course,
        application.status.label()
    );

    let approved = admissions.decide(
        &application.id,
        AdmissionDecision {
            status: DecisionStatus::Approved,
            remarks: Some("All documents verified".to_string()),
            interview: None,
            admission_fee: None,
        },
    )?;
    println!("- Decision recorded: {}", approved.status.label());

    let enrollment_id = match &approved.student {
        Some(id) => id.clone(),
        None => {
            println!("  Conversion did not produce an enrollment record");
            return Ok(());
        }
    };
    println!("- Converted into enrollment {enrollment_id}");

    match enrollments
        .fetch(&enrollment_id)
        .map_err(AdmissionServiceError::from)?
    {
        Some(enrollment) => match serde_json::to_string_pretty(&enrollment) {
            Ok(json) => println!("  Enrollment record:\n{json}"),
            Err(err) => println!("  Enrollment record unavailable: {err}"),
        },
        None => println!("  Registry lookup returned no record"),
    }

    let stats = admissions.stats(&academic_year)?;
    println!(
        "- {} application(s) on file for {academic_year}",
        stats.total
    );
    for (status, count) in &stats.by_status {
        println!("  - {status}: {count}");
    }

    if skip_fees {
        return Ok(());
    }

    println!("\nFee receipt demo");
    let charge = fees.record(FeeCharge {
        student: enrollment_id.clone(),
        fee_type: FeeKind::Tuition,
        amount: 50_000,
        paid_amount: 20_000,
        academic_year,
        semester: Some("1".to_string()),
        payment_method: Some("card".to_string()),
        transaction_id: None,
        remarks: Some("Admission installment".to_string()),
    })?;
    println!(
        "- Raised charge {} for {} -> {} outstanding ({})",
        charge.receipt,
        charge.student,
        charge.remaining_amount,
        charge.status.label()
    );

    let settled = fees.register_payment(&charge.receipt, charge.remaining_amount)?;
    println!(
        "- Payment of {} recorded against {} -> {}",
        charge.remaining_amount,
        settled.receipt,
        settled.status.label()
    );
    match serde_json::to_string_pretty(&settled) {
        Ok(json) => println!("  Receipt payload:\n{json}"),
        Err(err) => println!("  Receipt payload unavailable: {err}"),
    }

    Ok(())
}

fn demo_submission(course: CourseId, academic_year: String) -> AdmissionSubmission {
    AdmissionSubmission {
        applicant: ApplicantDetails {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2006, 3, 18)
                .unwrap_or_else(|| Local::now().date_naive()),
            gender: Gender::Female,
            blood_group: Some("B+".to_string()),
        },
        contact: ContactDetails {
            email: Some("asha.verma@example.edu".to_string()),
            phone_number: "555-0199".to_string(),
            alternate_phone: None,
        },
        address: Default::default(),
        guardian: Some(GuardianDetails {
            name: "Rohit Verma".to_string(),
            relationship: "Father".to_string(),
            contact_number: "555-0198".to_string(),
            email: None,
        }),
        previous_education: Vec::new(),
        documents: Vec::new(),
        applied_course: course,
        academic_year,
    }
}
