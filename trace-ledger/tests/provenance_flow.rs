//! End-to-end provenance flows over the in-memory ledger
//!
//! These tests exercise the full submit -> resolve -> verify pipeline
//! the way producers and consumers drive it.

use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use trace_core::bundle::Verdict;
use trace_core::error::LedgerError;
use trace_core::types::*;
use trace_ledger::{IngestionService, MemoryLedger, ResolverService};

fn services() -> (IngestionService, ResolverService) {
    let store = Arc::new(MemoryLedger::new());
    (
        IngestionService::new(store.clone()),
        ResolverService::new(store),
    )
}

fn collector() -> Principal {
    Principal {
        id: "COL-001".into(),
        name: "Ravi Kumar".into(),
        role: Role::Collector,
        organization: "Telangana Medicinal Plants Cooperative".into(),
    }
}

fn lab() -> Principal {
    Principal {
        id: "LAB-001".into(),
        name: "NIA Testing Lab".into(),
        role: Role::Lab,
        organization: "National Institute of Ayurveda".into(),
    }
}

fn processor() -> Principal {
    Principal {
        id: "PRC-001".into(),
        name: "AyurTech".into(),
        role: Role::Processor,
        organization: "AyurTech Processing Pvt Ltd".into(),
    }
}

fn manufacturer() -> Principal {
    Principal {
        id: "MFG-001".into(),
        name: "AyurChain".into(),
        role: Role::Manufacturer,
        organization: "AyurChain Products".into(),
    }
}

fn collection_draft(record_id: &str) -> DraftRecord {
    DraftRecord {
        record_id: RecordId(record_id.into()),
        recorded_at: Utc::now(),
        payload: RecordPayload::Collection(CollectionEvent {
            species: Species {
                scientific_name: "Withania somnifera".into(),
                common_name: "Ashwagandha".into(),
                local_name: "Asgandh".into(),
            },
            quantity: Quantity {
                amount: 50.0,
                unit: "kg".into(),
            },
            location: Geolocation {
                latitude: 17.385,
                longitude: 78.4867,
                address: "Medak District, Telangana".into(),
                region: "Deccan Plateau".into(),
            },
            initial_quality: QualitySnapshot {
                moisture: 8.5,
                appearance: AppearanceGrade::Excellent,
                notes: format!("harvest lot {record_id}"),
            },
            photos: vec!["/api/photos/collection-001.jpg".into()],
            collector: CollectorInfo {
                id: "COL-001".into(),
                name: "Ravi Kumar".into(),
                cooperative: "Telangana Medicinal Plants Cooperative".into(),
                certification: "Certified Organic Collector".into(),
            },
        }),
    }
}

fn quality_test_draft(record_id: &str, event_id: &str) -> DraftRecord {
    DraftRecord {
        record_id: RecordId(record_id.into()),
        recorded_at: Utc::now(),
        payload: RecordPayload::QualityTest(QualityTest {
            event_id: RecordId(event_id.into()),
            laboratory: Laboratory {
                name: "National Institute of Ayurveda Testing Lab".into(),
                accreditation: "NABL Accredited (Certificate: TC-001)".into(),
                location: "Hyderabad, Telangana".into(),
            },
            results: TestResults {
                moisture: 7.2,
                pesticides: ScreenResult::Passed,
                heavy_metals: ScreenResult::Passed,
                dna_barcode: DnaBarcode {
                    verified: true,
                    confidence: 98.5,
                },
                active_compounds: BTreeMap::from([("withanolides".to_string(), 3.2)]),
            },
            certificate_url: "/api/certificates/QT-001.pdf".into(),
        }),
    }
}

fn processing_draft(record_id: &str, event_id: &str, batch_id: &str) -> DraftRecord {
    DraftRecord {
        record_id: RecordId(record_id.into()),
        recorded_at: Utc::now(),
        payload: RecordPayload::Processing(ProcessingStep {
            event_id: RecordId(event_id.into()),
            batch_id: BatchId(batch_id.into()),
            step_type: StepType::Drying,
            conditions: ProcessingConditions {
                temperature: Some(45.0),
                humidity: Some(15.0),
                duration_hours: Some(72.0),
            },
            processor: ProcessorInfo {
                name: "AyurTech Processing Pvt Ltd".into(),
                location: "Bangalore, Karnataka".into(),
                license: "AYUSH-MFG-2023-001".into(),
            },
        }),
    }
}

fn attestation_draft(record_id: &str, batch_id: &str) -> DraftRecord {
    DraftRecord {
        record_id: RecordId(record_id.into()),
        recorded_at: Utc::now(),
        payload: RecordPayload::Attestation(BatchAttestation {
            batch_id: BatchId(batch_id.into()),
            product: ProductInfo {
                name: "Premium Ashwagandha Root Powder".into(),
                scientific_name: "Withania somnifera".into(),
                formulation: "Fine Root Powder".into(),
                net_weight: "100g".into(),
                manufacturing_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                expiry_date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
            },
            sustainability: Sustainability {
                fair_trade: true,
                organic: true,
                biodiversity_impact: "30% plant population retention".into(),
                carbon_footprint: 2.1,
            },
            compliance: Compliance {
                regulatory_approval: true,
                export_certification: true,
                gmp_compliant: true,
            },
        }),
    }
}

fn sub(id: &str) -> SubmissionId {
    SubmissionId(id.into())
}

/// Spec scenario: collection -> drying step -> resolve -> verified.
#[tokio::test]
async fn test_collection_to_batch_journey() {
    let (ingestion, resolver) = services();

    let t1 = ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s1"))
        .await
        .unwrap();
    let t2 = ingestion
        .submit(
            processing_draft("PS-001", "CE-001", "ASH-2024-001-KR"),
            processor(),
            sub("s2"),
        )
        .await
        .unwrap();

    let resolved = resolver.resolve_verified("ASH-2024-001-KR").await.unwrap();
    assert_eq!(resolved.verdict, Verdict::Verified);

    let bundle = resolved.bundle;
    assert_eq!(bundle.batch_id, Some(BatchId("ASH-2024-001-KR".into())));
    assert_eq!(bundle.collection_events.len(), 1);
    assert_eq!(bundle.processing_steps.len(), 1);
    assert_eq!(bundle.quality_tests.len(), 0);
    assert_eq!(bundle.collection_events[0].tx_ref, t1.tx_ref);
    assert_eq!(bundle.processing_steps[0].tx_ref, t2.tx_ref);
}

/// A lone collection event resolves through the lineage fallback.
#[tokio::test]
async fn test_resolve_lone_collection_event() {
    let (ingestion, resolver) = services();

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s1"))
        .await
        .unwrap();

    let bundle = resolver.resolve("CE-001").await.unwrap();
    assert_eq!(bundle.batch_id, None);
    assert_eq!(bundle.collection_events.len(), 1);
    assert!(bundle.quality_tests.is_empty());
    assert!(bundle.processing_steps.is_empty());
}

#[tokio::test]
async fn test_resolve_unknown_identifier_not_found() {
    let (_, resolver) = services();
    assert!(matches!(
        resolver.resolve("NO-SUCH-BATCH").await,
        Err(LedgerError::NotFound(_))
    ));
}

/// Dangling test reference fails before the event commits, works after.
#[tokio::test]
async fn test_dangling_then_valid_reference() {
    let (ingestion, _) = services();

    let err = ingestion
        .submit(quality_test_draft("QT-001", "CE-001"), lab(), sub("s1"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DanglingReference { .. }));

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s2"))
        .await
        .unwrap();
    assert!(ingestion
        .submit(quality_test_draft("QT-001", "CE-001"), lab(), sub("s3"))
        .await
        .is_ok());
}

/// Same submission id and content: same receipt, one stored record.
#[tokio::test]
async fn test_submit_idempotence() {
    let (ingestion, resolver) = services();

    let draft = collection_draft("CE-001");
    let first = ingestion
        .submit(draft.clone(), collector(), sub("s1"))
        .await
        .unwrap();
    let replayed = ingestion
        .submit(draft.clone(), collector(), sub("s1"))
        .await
        .unwrap();
    assert_eq!(first, replayed);

    // Identical content under a fresh submission id also folds into
    // the original commit.
    let content_retry = ingestion
        .submit(draft, collector(), sub("s2"))
        .await
        .unwrap();
    assert_eq!(first, content_retry);

    let bundle = resolver.resolve("CE-001").await.unwrap();
    assert_eq!(bundle.len(), 1);
}

#[tokio::test]
async fn test_conflicting_batch_declaration_rejected() {
    let (ingestion, _) = services();

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s1"))
        .await
        .unwrap();
    ingestion
        .submit(
            processing_draft("PS-001", "CE-001", "ASH-2024-001-KR"),
            processor(),
            sub("s2"),
        )
        .await
        .unwrap();

    let err = ingestion
        .submit(
            processing_draft("PS-002", "CE-001", "ASH-2024-002-KR"),
            processor(),
            sub("s3"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BatchIdentityConflict { .. }));
}

/// Commit order wins over producer-supplied timestamps.
#[tokio::test]
async fn test_ordering_ignores_producer_timestamps() {
    let (ingestion, resolver) = services();

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s1"))
        .await
        .unwrap();
    ingestion
        .submit(quality_test_draft("QT-001", "CE-001"), lab(), sub("s2"))
        .await
        .unwrap();

    // Backdated a year before the collection event.
    let mut step = processing_draft("PS-001", "CE-001", "ASH-2024-001-KR");
    step.recorded_at = Utc::now() - Duration::days(365);
    ingestion.submit(step, processor(), sub("s3")).await.unwrap();

    let bundle = resolver.resolve("ASH-2024-001-KR").await.unwrap();
    let sequences: Vec<u64> = bundle.records().iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(bundle.collection_events[0].sequence, 1);
    assert_eq!(bundle.quality_tests[0].sequence, 2);
    assert_eq!(bundle.processing_steps[0].sequence, 3);
}

/// Unauthorized role is rejected before any write.
#[tokio::test]
async fn test_role_gate_rejects_wrong_producer() {
    let (ingestion, resolver) = services();

    let err = ingestion
        .submit(collection_draft("CE-001"), processor(), sub("s1"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnauthorizedRole { .. }));
    assert!(matches!(
        resolver.resolve("CE-001").await,
        Err(LedgerError::NotFound(_))
    ));
}

/// Manufacturer attestation needs a bound batch, then surfaces product
/// metadata in the resolved bundle.
#[tokio::test]
async fn test_attestation_flow() {
    let (ingestion, resolver) = services();

    let err = ingestion
        .submit(
            attestation_draft("BA-001", "ASH-2024-001-KR"),
            manufacturer(),
            sub("s1"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DanglingReference { .. }));

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s2"))
        .await
        .unwrap();
    ingestion
        .submit(
            processing_draft("PS-001", "CE-001", "ASH-2024-001-KR"),
            processor(),
            sub("s3"),
        )
        .await
        .unwrap();
    ingestion
        .submit(
            attestation_draft("BA-001", "ASH-2024-001-KR"),
            manufacturer(),
            sub("s4"),
        )
        .await
        .unwrap();

    let resolved = resolver.resolve_verified("ASH-2024-001-KR").await.unwrap();
    assert_eq!(resolved.verdict, Verdict::Verified);
    let product = resolved.bundle.product().expect("product metadata");
    assert_eq!(product.name, "Premium Ashwagandha Root Powder");
    assert!(resolved.bundle.sustainability().unwrap().organic);
    assert!(resolved.bundle.compliance().unwrap().gmp_compliant);
}

/// QR payloads resolve identically to the bare batch id.
#[tokio::test]
async fn test_scan_payload_resolution() {
    let (ingestion, resolver) = services();

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("s1"))
        .await
        .unwrap();
    ingestion
        .submit(
            processing_draft("PS-001", "CE-001", "ASH-2024-001-KR"),
            processor(),
            sub("s2"),
        )
        .await
        .unwrap();

    let by_id = resolver.resolve_verified("ASH-2024-001-KR").await.unwrap();
    let by_scan = resolver
        .resolve_scan("https://trace.ayurchain.example/batch/ASH-2024-001-KR")
        .await
        .unwrap();
    assert_eq!(by_id.bundle, by_scan.bundle);
}

/// Concurrent producers on the same lineage all land with distinct
/// strictly increasing sequences.
#[tokio::test]
async fn test_concurrent_submissions_on_shared_lineage() {
    let store = Arc::new(MemoryLedger::new());
    let ingestion = Arc::new(IngestionService::new(store.clone()));
    let resolver = ResolverService::new(store);

    ingestion
        .submit(collection_draft("CE-001"), collector(), sub("root"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let ingestion = ingestion.clone();
        handles.push(tokio::spawn(async move {
            ingestion
                .submit(
                    quality_test_draft(&format!("QT-{i:03}"), "CE-001"),
                    lab(),
                    sub(&format!("qt-{i}")),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let bundle = resolver.resolve("CE-001").await.unwrap();
    assert_eq!(bundle.quality_tests.len(), 8);
    let sequences: Vec<u64> = bundle.quality_tests.iter().map(|r| r.sequence).collect();
    let mut sorted = sequences.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 8);
    assert_eq!(sequences, sorted, "bundle lists follow commit order");
}
