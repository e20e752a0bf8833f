use serde::Serialize;

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation".to_string(),
        }
    }
}

/// Container for validation errors, used as the payload of `HttpError::Validation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

impl ValidationErrorResponse {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// The first field message, or a generic one when the list is empty.
    pub fn summary(&self) -> String {
        self.errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Validation failed".to_string())
    }

    pub fn from_report(report: &garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| {
                let field = {
                    let s = path.to_string();
                    if s.is_empty() {
                        "value".to_string()
                    } else {
                        s
                    }
                };
                FieldError::new(field, error.message().to_string())
            })
            .collect();
        Self { errors }
    }
}

/// Run garde validation on a value, mapping the report to field errors.
pub fn validate<T>(value: &T) -> Result<(), ValidationErrorResponse>
where
    T: garde::Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| ValidationErrorResponse::from_report(&report))
}

// Re-export garde::Validate for convenience.
pub use garde::Validate;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(garde::Validate)]
    struct Signup {
        #[garde(length(min = 1))]
        name: String,
        #[garde(range(min = 1))]
        quantity: u32,
    }

    #[test]
    fn valid_value_passes() {
        let signup = Signup {
            name: "mug".into(),
            quantity: 2,
        };
        assert!(validate(&signup).is_ok());
    }

    #[test]
    fn report_becomes_field_errors() {
        let signup = Signup {
            name: String::new(),
            quantity: 0,
        };
        let resp = validate(&signup).unwrap_err();
        assert_eq!(resp.errors.len(), 2);
        assert!(resp.errors.iter().any(|e| e.field == "name"));
        assert!(resp.errors.iter().any(|e| e.field == "quantity"));
    }

    #[test]
    fn summary_falls_back_when_empty() {
        let resp = ValidationErrorResponse { errors: vec![] };
        assert_eq!(resp.summary(), "Validation failed");
    }
}
