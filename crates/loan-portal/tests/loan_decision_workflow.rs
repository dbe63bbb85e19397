//! Integration scenarios for the loan decision pipeline, exercised
//! through the public service facade and HTTP router: intake, encoding,
//! classification, presentation, and the audit side effect.

mod common {
    use std::sync::{Arc, Mutex};

    use loan_portal::applications::{
        AuditError, AuditRecord, AuditSink, Classifier, EncodingStrategy, FeatureVector,
        HomeOwnership, LoanApplicationForm, LoanDecisionService, LoanPurpose, VerificationStatus,
    };

    /// Deterministic classifier that records every row it scores.
    #[derive(Default)]
    pub(super) struct RecordingClassifier {
        pub(super) label: u8,
        pub(super) probability: f64,
        pub(super) seen: Mutex<Vec<FeatureVector>>,
    }

    impl Classifier for RecordingClassifier {
        fn predict(&self, features: &FeatureVector) -> u8 {
            self.seen.lock().expect("classifier lock").push(*features);
            self.label
        }

        fn predict_probability(&self, _features: &FeatureVector) -> f64 {
            self.probability
        }
    }

    #[derive(Default)]
    pub(super) struct MemorySink {
        pub(super) records: Mutex<Vec<AuditRecord>>,
    }

    impl MemorySink {
        pub(super) fn rendered(&self) -> Vec<String> {
            self.records
                .lock()
                .expect("sink lock")
                .iter()
                .map(AuditRecord::render)
                .collect()
        }
    }

    impl AuditSink for MemorySink {
        fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
            self.records.lock().expect("sink lock").push(record.clone());
            Ok(())
        }
    }

    /// The walkthrough submission used across scenarios.
    pub(super) fn submission() -> LoanApplicationForm {
        LoanApplicationForm {
            loan_amnt: 10000.0,
            int_rate: 12.5,
            installment: 300.0,
            grade: 2,
            emp_length: 5,
            home_ownership: HomeOwnership::Rent,
            annual_inc: 60000.0,
            verification_status: VerificationStatus::Verified,
            purpose: LoanPurpose::Car,
            dti: 15.0,
        }
    }

    pub(super) fn build_service(
        label: u8,
        probability: f64,
        encoding: EncodingStrategy,
    ) -> (
        LoanDecisionService<RecordingClassifier, MemorySink>,
        Arc<RecordingClassifier>,
        Arc<MemorySink>,
    ) {
        let classifier = Arc::new(RecordingClassifier {
            label,
            probability,
            ..RecordingClassifier::default()
        });
        let sink = Arc::new(MemorySink::default());
        let service = LoanDecisionService::new(encoding, classifier.clone(), sink.clone());
        (service, classifier, sink)
    }
}

mod pipeline {
    use super::common::*;
    use loan_portal::applications::EncodingStrategy;

    #[test]
    fn batch_rank_submission_reaches_the_classifier_with_zero_codes() {
        let (service, classifier, sink) = build_service(1, 0.87, EncodingStrategy::BatchRank);
        let outcome = service.submit(submission()).expect("submission succeeds");

        let seen = classifier.seen.lock().expect("classifier lock");
        assert_eq!(seen.len(), 1);
        // One-row batch: every categorical code degenerates to 0.
        assert_eq!(
            seen[0].as_slice(),
            &[10000.0, 12.5, 300.0, 2.0, 5.0, 0.0, 60000.0, 0.0, 0.0, 15.0]
        );

        // Classifier output passes through unchanged to view and sink.
        assert_eq!(outcome.view.decision, "Approved");
        assert_eq!(outcome.result.probability, 0.87);
        let records = sink.records.lock().expect("sink lock");
        assert_eq!(records[0].approval_probability, 0.87);
        assert_eq!(records[0].decision, "Approved");
    }

    #[test]
    fn fixed_vocabulary_submission_keeps_stable_codes() {
        let (service, classifier, _) = build_service(1, 0.87, EncodingStrategy::FixedVocabulary);
        service.submit(submission()).expect("submission succeeds");

        let seen = classifier.seen.lock().expect("classifier lock");
        // RENT ranks 3 of {MORTGAGE, OTHER, OWN, RENT}; Verified ranks
        // 2 of the verification labels; car ranks 0 of the purposes.
        assert_eq!(seen[0].0[5], 3.0);
        assert_eq!(seen[0].0[7], 2.0);
        assert_eq!(seen[0].0[8], 0.0);
    }

    #[test]
    fn rejection_renders_the_complement_confidence() {
        let (service, _, _) = build_service(0, 0.2, EncodingStrategy::BatchRank);
        let outcome = service.submit(submission()).expect("submission succeeds");
        assert_eq!(outcome.view.decision, "Rejected");
        assert_eq!(outcome.view.confidence_display, "80.00%");
        assert_eq!(outcome.view.approval_probability, 0.2);
    }

    #[test]
    fn repeated_submissions_yield_identical_decisions() {
        let (service, _, sink) = build_service(1, 0.6543, EncodingStrategy::BatchRank);
        let first = service.submit(submission()).expect("first");
        let second = service.submit(submission()).expect("second");

        assert_eq!(first.result, second.result);
        assert_eq!(first.view.decision, second.view.decision);
        assert_eq!(first.view.confidence_display, second.view.confidence_display);

        let rendered = sink.rendered();
        // Identical apart from the timestamp line.
        let strip_header = |text: &str| {
            text.lines().skip(1).collect::<Vec<_>>().join("\n")
        };
        assert_eq!(strip_header(&rendered[0]), strip_header(&rendered[1]));
    }
}

mod audit_log {
    use super::common::*;
    use loan_portal::applications::{EncodingStrategy, FileAuditSink, LoanDecisionService};
    use std::sync::Arc;

    fn scratch_log(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "loan-portal-workflow-{tag}-{}-{}.log",
            std::process::id(),
            chrono::Local::now()
                .timestamp_nanos_opt()
                .unwrap_or_default()
        ))
    }

    #[test]
    fn first_submission_creates_the_log_and_later_ones_append() {
        let path = scratch_log("create-append");
        let classifier = Arc::new(RecordingClassifier {
            label: 1,
            probability: 0.87,
            ..RecordingClassifier::default()
        });
        let service = LoanDecisionService::new(
            EncodingStrategy::BatchRank,
            classifier,
            Arc::new(FileAuditSink::new(&path)),
        );

        assert!(!path.exists());
        service.submit(submission()).expect("first submission");
        let after_first = std::fs::read_to_string(&path).expect("log created");
        assert_eq!(after_first.matches("LOAN PREDICTION").count(), 1);

        service.submit(submission()).expect("second submission");
        let after_second = std::fs::read_to_string(&path).expect("log still readable");
        assert!(after_second.starts_with(&after_first), "first record kept");
        assert_eq!(after_second.matches("LOAN PREDICTION").count(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn record_carries_the_rendered_decision_verbatim() {
        let path = scratch_log("verbatim");
        let classifier = Arc::new(RecordingClassifier {
            label: 0,
            probability: 0.2,
            ..RecordingClassifier::default()
        });
        let service = LoanDecisionService::new(
            EncodingStrategy::BatchRank,
            classifier,
            Arc::new(FileAuditSink::new(&path)),
        );

        let outcome = service.submit(submission()).expect("submission succeeds");
        assert!(outcome.audit.recorded());

        let contents = std::fs::read_to_string(&path).expect("log readable");
        assert!(contents.contains("  Decision: Rejected"));
        assert!(contents.contains("  Approval Probability: 20.00%"));
        assert!(contents.contains("  loan_amnt: 10000"));
        assert!(contents.contains("  purpose: car"));

        std::fs::remove_file(&path).ok();
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use loan_portal::applications::{portal_router, EncodingStrategy};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router(label: u8, probability: f64) -> axum::Router {
        let (service, _, _) = build_service(label, probability, EncodingStrategy::BatchRank);
        portal_router(Arc::new(service))
    }

    #[tokio::test]
    async fn portal_root_serves_the_form() {
        let router = build_router(1, 0.9);
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(html.contains("Loan Approval Application"));
        assert!(html.contains("name=\"loan_amnt\""));
        assert!(html.contains("Submit for Review"));
    }

    #[tokio::test]
    async fn form_submission_renders_the_decision_page() {
        let router = build_router(0, 0.2);
        let body = "loan_amnt=10000&int_rate=12.5&installment=300&grade=2&emp_length=5\
&home_ownership=RENT&annual_inc=60000&verification_status=Verified&purpose=car&dti=15";

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/submit")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(html.contains("<strong>rejected</strong>"));
        assert!(html.contains("80.00%"));
    }

    #[tokio::test]
    async fn out_of_range_form_submission_is_unprocessable() {
        let router = build_router(1, 0.9);
        let body = "loan_amnt=10&int_rate=12.5&installment=300&grade=2&emp_length=5\
&home_ownership=RENT&annual_inc=60000&verification_status=Verified&purpose=car&dti=15";

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/submit")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn decision_api_returns_the_rendered_payload() {
        let router = build_router(1, 0.8735);
        let request_body = serde_json::to_vec(&submission()).expect("serialize submission");

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/loans/decisions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request_body))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("decision"), Some(&Value::from("Approved")));
        assert_eq!(
            payload.get("confidence_display"),
            Some(&Value::from("87.35%"))
        );
        assert_eq!(
            payload
                .get("audit")
                .and_then(|audit| audit.get("status"))
                .and_then(Value::as_str),
            Some("recorded")
        );
        let inputs = payload
            .get("inputs")
            .and_then(Value::as_array)
            .expect("inputs echoed");
        assert_eq!(inputs.len(), 10);
    }

    #[tokio::test]
    async fn decision_api_rejects_out_of_range_fields() {
        let router = build_router(1, 0.9);
        let mut form = submission();
        form.int_rate = 45.0;
        let request_body = serde_json::to_vec(&form).expect("serialize submission");

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/loans/decisions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request_body))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("interest rate"));
    }
}
