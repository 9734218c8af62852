//! End-to-end scenarios for admission intake, decision handling, and the
//! conversion of approved applications into enrollment records, driven
//! through the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use campus_erp::config::SerialsConfig;
    use campus_erp::workflows::admissions::{
        Account, AccountDirectory, AccountId, Address, AdmissionApplication, AdmissionFilter,
        AdmissionId, AdmissionRepository, AdmissionService, AdmissionSubmission, ApplicantDetails,
        ClaimOutcome, ContactDetails, Course, CourseCatalog, CourseId, Enrollment,
        EnrollmentId, EnrollmentRegistry, Gender, NewAccount,
    };
    use campus_erp::workflows::storage::{RepositoryError, SerialCounter};

    #[derive(Default)]
    pub(super) struct MemoryAdmissions {
        records: Mutex<HashMap<AdmissionId, AdmissionApplication>>,
    }

    impl AdmissionRepository for MemoryAdmissions {
        fn insert(
            &self,
            application: AdmissionApplication,
        ) -> Result<AdmissionApplication, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&application.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(application.id.clone(), application.clone());
            Ok(application)
        }

        fn update(&self, application: AdmissionApplication) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(application.id.clone(), application);
            Ok(())
        }

        fn fetch(
            &self,
            id: &AdmissionId,
        ) -> Result<Option<AdmissionApplication>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn delete(&self, id: &AdmissionId) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
        }

        fn search(
            &self,
            filter: &AdmissionFilter,
        ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
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
            let mut guard = self.records.lock().expect("lock");
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
    }

    impl MemoryAccounts {
        pub(super) fn all(&self) -> Vec<Account> {
            self.records.lock().expect("lock").clone()
        }
    }

    impl AccountDirectory for MemoryAccounts {
        fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard
                .iter()
                .find(|account| account.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
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
            self.records.lock().expect("lock").values().cloned().collect()
        }
    }

    impl EnrollmentRegistry for MemoryEnrollments {
        fn insert(&self, enrollment: Enrollment) -> Result<Enrollment, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&enrollment.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(enrollment.id.clone(), enrollment.clone());
            Ok(enrollment)
        }

        fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }
    }

    pub(super) struct MemoryCatalog {
        courses: HashMap<CourseId, Course>,
    }

    impl Default for MemoryCatalog {
        fn default() -> Self {
            let course = Course {
                id: CourseId("CS101".to_string()),
                name: "Computer Science".to_string(),
                code: "CS101".to_string(),
            };
            Self {
                courses: HashMap::from([(course.id.clone(), course)]),
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
            let mut guard = self.counts.lock().expect("lock");
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
                blood_group: None,
            },
            contact: ContactDetails {
                email: Some("a@x.com".to_string()),
                phone_number: "555-0101".to_string(),
                alternate_phone: None,
            },
            address: Address::default(),
            guardian: None,
            previous_education: Vec::new(),
            documents: Vec::new(),
            applied_course: CourseId("CS101".to_string()),
            academic_year: "2025".to_string(),
        }
    }
}

mod conversion {
    use super::common::*;
    use campus_erp::workflows::admissions::{
        AdmissionDecision, AdmissionStatus, DecisionStatus, EnrollmentStatus,
    };

    fn approve() -> AdmissionDecision {
        AdmissionDecision {
            status: DecisionStatus::Approved,
            remarks: None,
            interview: None,
            admission_fee: None,
        }
    }

    #[test]
    fn approved_application_yields_linked_enrollment_and_account() {
        let fixture = fixture();
        let stored = fixture.service.submit(submission()).expect("stored");

        let approved = fixture
            .service
            .decide(&stored.id, approve())
            .expect("approval succeeds");

        assert_eq!(approved.status, AdmissionStatus::Approved);
        let enrollment_id = approved.student.expect("enrollment linked");

        let enrollments = fixture.enrollments.all();
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].id, enrollment_id);
        assert_eq!(enrollments[0].personal.full_name(), "Jane Doe");
        assert_eq!(enrollments[0].course.0, "CS101");
        assert_eq!(enrollments[0].batch, "2025");
        assert_eq!(enrollments[0].status, EnrollmentStatus::Active);

        let accounts = fixture.accounts.all();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "a@x.com");
        assert_eq!(accounts[0].role.label(), "student");
    }

    #[test]
    fn repeating_the_approval_changes_nothing_but_status() {
        let fixture = fixture();
        let stored = fixture.service.submit(submission()).expect("stored");

        let first = fixture
            .service
            .decide(&stored.id, approve())
            .expect("first approval");
        let second = fixture
            .service
            .decide(&stored.id, approve())
            .expect("second approval");

        assert_eq!(first.student, second.student);
        assert_eq!(fixture.enrollments.all().len(), 1);
        assert_eq!(fixture.accounts.all().len(), 1);
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use campus_erp::workflows::admissions::{admission_router, AdmissionStatus};

    #[tokio::test]
    async fn full_intake_and_decision_round_trip() {
        let Fixture { service, .. } = fixture();
        let router = admission_router(Arc::new(service));

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/admissions")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&submission()).expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let id = payload.get("id").and_then(Value::as_str).expect("serial");

        let response = router
            .clone()
            .oneshot(
                Request::put(format!("/api/v1/admissions/{id}/decision"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "status": "approved" })).expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get(format!("/api/v1/admissions/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("status"), Some(&json!("approved")));
        assert!(payload.get("student").and_then(Value::as_str).is_some());
    }

    #[tokio::test]
    async fn unknown_status_never_reaches_the_store() {
        let Fixture {
            service,
            admissions,
            ..
        } = fixture();
        let stored = service.submit(submission()).expect("stored");
        let router = admission_router(Arc::new(service));

        let response = router
            .oneshot(
                Request::put(format!("/api/v1/admissions/{}/decision", stored.id.0))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "status": "waitlisted" })).expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert!(response.status().is_client_error());
        use campus_erp::workflows::admissions::AdmissionRepository;
        let persisted = admissions
            .fetch(&stored.id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(persisted.status, AdmissionStatus::Pending);
    }
}
