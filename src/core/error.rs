use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            EngineError::InvalidInput { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid(field, "must be a finite number"))
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if require_finite(field, value)? < 0.0 {
        return Err(EngineError::invalid(field, "must be >= 0"));
    }
    Ok(value)
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64> {
    if require_finite(field, value)? <= 0.0 {
        return Err(EngineError::invalid(field, "must be > 0"));
    }
    Ok(value)
}

pub(crate) fn require_percent(field: &'static str, value: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&require_finite(field, value)?) {
        return Err(EngineError::invalid(field, "must be between 0 and 100"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_names_the_field() {
        let err = EngineError::invalid("termYears", "must be > 0");
        assert_eq!(err.to_string(), "invalid termYears: must be > 0");
        assert_eq!(err.field(), "termYears");
    }

    #[test]
    fn guards_reject_nan_and_out_of_range_values() {
        assert!(require_finite("x", f64::NAN).is_err());
        assert!(require_non_negative("x", -0.01).is_err());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_percent("x", 100.5).is_err());
        assert_eq!(require_percent("x", 100.0), Ok(100.0));
        assert_eq!(require_non_negative("x", 0.0), Ok(0.0));
    }
}
