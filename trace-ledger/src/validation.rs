//! Field validation for incoming drafts
//!
//! One rule per function; every rejection is a typed
//! `LedgerError::Validation` naming the offending field. Runs before
//! any write — a draft that fails here never reaches the store.

use trace_core::error::{LedgerError, LedgerResult};
use trace_core::types::{
    BatchAttestation, CollectionEvent, DraftRecord, ProcessingStep, QualityTest, RecordPayload,
};

/// Validate a draft's field constraints (ranges, finiteness, required
/// identifiers). Cross-record references are checked at commit time.
pub fn validate_draft(draft: &DraftRecord) -> LedgerResult<()> {
    if draft.record_id.0.trim().is_empty() {
        return Err(invalid("record_id", "must not be empty"));
    }
    match &draft.payload {
        RecordPayload::Collection(event) => validate_collection(event),
        RecordPayload::QualityTest(test) => validate_quality_test(test),
        RecordPayload::Processing(step) => validate_processing(step),
        RecordPayload::Attestation(attestation) => validate_attestation(attestation),
    }
}

fn validate_collection(event: &CollectionEvent) -> LedgerResult<()> {
    if event.species.scientific_name.trim().is_empty() {
        return Err(invalid("species.scientific_name", "must not be empty"));
    }
    require_finite("quantity.amount", event.quantity.amount)?;
    if event.quantity.amount < 0.0 {
        return Err(invalid("quantity.amount", "must be >= 0"));
    }
    if event.quantity.unit.trim().is_empty() {
        return Err(invalid("quantity.unit", "must not be empty"));
    }
    require_range("location.latitude", event.location.latitude, -90.0, 90.0)?;
    require_range(
        "location.longitude",
        event.location.longitude,
        -180.0,
        180.0,
    )?;
    require_range(
        "initial_quality.moisture",
        event.initial_quality.moisture,
        0.0,
        100.0,
    )?;
    Ok(())
}

fn validate_quality_test(test: &QualityTest) -> LedgerResult<()> {
    if test.event_id.0.trim().is_empty() {
        return Err(invalid("event_id", "must not be empty"));
    }
    require_range("results.moisture", test.results.moisture, 0.0, 100.0)?;
    require_range(
        "results.dna_barcode.confidence",
        test.results.dna_barcode.confidence,
        0.0,
        100.0,
    )?;
    for (compound, concentration) in &test.results.active_compounds {
        require_finite("results.active_compounds", *concentration)?;
        if *concentration < 0.0 {
            return Err(invalid(
                "results.active_compounds",
                format!("{compound}: concentration must be >= 0"),
            ));
        }
    }
    Ok(())
}

fn validate_processing(step: &ProcessingStep) -> LedgerResult<()> {
    if step.event_id.0.trim().is_empty() {
        return Err(invalid("event_id", "must not be empty"));
    }
    if step.batch_id.0.trim().is_empty() {
        return Err(invalid("batch_id", "must not be empty"));
    }
    require_non_negative_opt("conditions.temperature", step.conditions.temperature)?;
    require_non_negative_opt("conditions.humidity", step.conditions.humidity)?;
    require_non_negative_opt("conditions.duration_hours", step.conditions.duration_hours)?;
    Ok(())
}

fn validate_attestation(attestation: &BatchAttestation) -> LedgerResult<()> {
    if attestation.batch_id.0.trim().is_empty() {
        return Err(invalid("batch_id", "must not be empty"));
    }
    if attestation.product.name.trim().is_empty() {
        return Err(invalid("product.name", "must not be empty"));
    }
    if attestation.product.expiry_date <= attestation.product.manufacturing_date {
        return Err(invalid(
            "product.expiry_date",
            "must be after the manufacturing date",
        ));
    }
    require_finite(
        "sustainability.carbon_footprint",
        attestation.sustainability.carbon_footprint,
    )?;
    if attestation.sustainability.carbon_footprint < 0.0 {
        return Err(invalid("sustainability.carbon_footprint", "must be >= 0"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> LedgerError {
    LedgerError::Validation {
        field,
        reason: reason.into(),
    }
}

fn require_finite(field: &'static str, value: f64) -> LedgerResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number"))
    }
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> LedgerResult<()> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(invalid(field, format!("must be within [{min}, {max}]")));
    }
    Ok(())
}

fn require_non_negative_opt(field: &'static str, value: Option<f64>) -> LedgerResult<()> {
    if let Some(v) = value {
        require_finite(field, v)?;
        if v < 0.0 {
            return Err(invalid(field, "must be >= 0"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;
    use trace_core::types::*;

    fn collection_event() -> CollectionEvent {
        CollectionEvent {
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
                latitude: 17.4,
                longitude: 78.5,
                address: "Medak".into(),
                region: "Deccan".into(),
            },
            initial_quality: QualitySnapshot {
                moisture: 8.5,
                appearance: AppearanceGrade::Good,
                notes: String::new(),
            },
            photos: vec![],
            collector: CollectorInfo {
                id: "COL-001".into(),
                name: "Ravi".into(),
                cooperative: "Coop".into(),
                certification: "Organic".into(),
            },
        }
    }

    fn draft(payload: RecordPayload) -> DraftRecord {
        DraftRecord {
            record_id: RecordId("R-001".into()),
            recorded_at: Utc::now(),
            payload,
        }
    }

    #[test]
    fn test_valid_collection_passes() {
        assert!(validate_draft(&draft(RecordPayload::Collection(collection_event()))).is_ok());
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let mut event = collection_event();
        event.location.latitude = 91.0;
        let err = validate_draft(&draft(RecordPayload::Collection(event))).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation {
                field: "location.latitude",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut event = collection_event();
        event.quantity.amount = -1.0;
        assert!(validate_draft(&draft(RecordPayload::Collection(event))).is_err());
    }

    #[test]
    fn test_nan_moisture_rejected() {
        let mut event = collection_event();
        event.initial_quality.moisture = f64::NAN;
        assert!(validate_draft(&draft(RecordPayload::Collection(event))).is_err());
    }

    #[test]
    fn test_quality_test_confidence_range() {
        let test = QualityTest {
            event_id: RecordId("CE-001".into()),
            laboratory: Laboratory {
                name: "NIA Testing Lab".into(),
                accreditation: "NABL TC-001".into(),
                location: "Hyderabad".into(),
            },
            results: TestResults {
                moisture: 7.2,
                pesticides: ScreenResult::Passed,
                heavy_metals: ScreenResult::Passed,
                dna_barcode: DnaBarcode {
                    verified: true,
                    confidence: 101.0,
                },
                active_compounds: BTreeMap::new(),
            },
            certificate_url: "/api/certificates/QT-001.pdf".into(),
        };
        let err = validate_draft(&draft(RecordPayload::QualityTest(test))).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation {
                field: "results.dna_barcode.confidence",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_processing_condition_rejected() {
        let step = ProcessingStep {
            event_id: RecordId("CE-001".into()),
            batch_id: BatchId("B-1".into()),
            step_type: StepType::Drying,
            conditions: ProcessingConditions {
                temperature: Some(-5.0),
                humidity: None,
                duration_hours: None,
            },
            processor: ProcessorInfo {
                name: "AyurTech".into(),
                location: "Bangalore".into(),
                license: "MFG-001".into(),
            },
        };
        assert!(validate_draft(&draft(RecordPayload::Processing(step))).is_err());
    }

    #[test]
    fn test_attestation_date_ordering() {
        let mut attestation = BatchAttestation {
            batch_id: BatchId("B-1".into()),
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
                biodiversity_impact: "Sustainable wild collection".into(),
                carbon_footprint: 2.1,
            },
            compliance: Compliance {
                regulatory_approval: true,
                export_certification: true,
                gmp_compliant: true,
            },
        };
        assert!(
            validate_draft(&draft(RecordPayload::Attestation(attestation.clone()))).is_ok()
        );

        attestation.product.expiry_date = attestation.product.manufacturing_date;
        assert!(validate_draft(&draft(RecordPayload::Attestation(attestation))).is_err());
    }
}
