//! Pre-assessment validation
//!
//! Checks a caller-supplied asset context before a methodology assessment,
//! and the ordering prerequisites between pipeline stages.

use types::assessment::AssetContext;
use types::classification::ClassificationResult;
use types::errors::EngineError;

fn check(field: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidContext {
            field: field.to_string(),
            value,
        })
    }
}

/// Validate the ratings of an asset context.
///
/// Checks performed (in order):
/// 1. Confidentiality, integrity and availability in [0, 1]
/// 2. Classification value in [0, 1]
pub fn validate_context(ctx: &AssetContext) -> Result<(), EngineError> {
    check("confidentiality", ctx.cia.confidentiality)?;
    check("integrity", ctx.cia.integrity)?;
    check("availability", ctx.cia.availability)?;
    check("classification_value", ctx.classification_value)?;
    Ok(())
}

/// Risk identification needs the classification of the same asset
pub fn require_classification(
    classification: Option<&ClassificationResult>,
) -> Result<&ClassificationResult, EngineError> {
    classification.ok_or_else(|| {
        EngineError::MissingPrerequisite("risk identification requires a classification".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::attributes::CiaTriad;
    use types::ids::AssetId;

    fn make_context(c: f64, classification_value: f64) -> AssetContext {
        AssetContext::new(AssetId::new(), CiaTriad::new(c, 0.5, 0.5), classification_value)
    }

    #[test]
    fn test_valid_context_passes() {
        assert!(validate_context(&make_context(0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let err = validate_context(&make_context(1.2, 0.5)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidContext {
                field: "confidentiality".to_string(),
                value: 1.2
            }
        );
    }

    #[test]
    fn test_non_finite_classification_rejected() {
        let err = validate_context(&make_context(0.5, f64::NAN)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidContext { ref field, .. } if field == "classification_value"));
    }

    #[test]
    fn test_missing_classification() {
        assert!(matches!(
            require_classification(None),
            Err(EngineError::MissingPrerequisite(_))
        ));
    }
}
