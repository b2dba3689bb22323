//! Structural request validation
//!
//! Checks run in the order they are chained and every broken rule adds one
//! violation, so the resulting list mirrors field declaration order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::ClosedSet;
use crate::domain::DomainError;

pub const REQUIRED_MESSAGE: &str = "não deve estar em branco";
pub const UUID_MESSAGE: &str = "não é um formato válido de UUID";

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .unwrap()
});

/// One broken rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    pub field: String,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Returns true for the canonical 8-4-4-4-12 hex form, any case
pub fn is_uuid_shaped(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Explicit validation pipeline over named request fields
#[derive(Debug, Default)]
pub struct RequestValidator {
    violations: Vec<ValidationViolation>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field must be present and not blank
    pub fn required(mut self, field: &str, value: Option<&str>) -> Self {
        if is_blank(value) {
            self.violations
                .push(ValidationViolation::new(field, REQUIRED_MESSAGE));
        }
        self
    }

    /// The field must look like a UUID; blank values are left to `required`
    pub fn uuid(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|_| !is_blank(value)) {
            if !is_uuid_shaped(v) {
                self.violations
                    .push(ValidationViolation::new(field, UUID_MESSAGE));
            }
        }
        self
    }

    /// The field must name a variant of `T`; blank values are left to `required`
    pub fn member_of<T: ClosedSet>(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|_| !is_blank(value)) {
            if T::from_name(v).is_none() {
                self.violations.push(ValidationViolation::new(
                    field,
                    format!("Valores válidos: {}", T::valid_names()),
                ));
            }
        }
        self
    }

    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    /// Short-circuit with `ValidationFailed` when any rule was broken
    pub fn finish(self) -> Result<(), DomainError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation_failed(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pix::{AccountType, KeyType};

    const VALID_UUID: &str = "5260263c-a3c1-4727-ae32-3bdb2538841b";

    #[test]
    fn test_uuid_shape() {
        assert!(is_uuid_shaped(VALID_UUID));
        assert!(is_uuid_shaped("5260263C-A3C1-4727-AE32-3BDB2538841B"));
        assert!(!is_uuid_shaped("5260263ca3c14727ae323bdb2538841b"));
        assert!(!is_uuid_shaped("{5260263c-a3c1-4727-ae32-3bdb2538841b}"));
        assert!(!is_uuid_shaped("5260263c-a3c1-4727-ae32-3bdb2538841"));
        assert!(!is_uuid_shaped("5260263g-a3c1-4727-ae32-3bdb2538841b"));
    }

    #[test]
    fn test_malformed_uuid_reports_exactly_one_violation() {
        let malformed = [
            "123",
            "b2538841b",
            "5260263c-a3c1-4727-ae32",
            "5260263c_a3c1_4727_ae32_3bdb2538841b",
            "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz",
            " 5260263c-a3c1-4727-ae32-3bdb2538841b",
        ];

        for value in malformed {
            let validator = RequestValidator::new()
                .required("clientId", Some(value))
                .uuid("clientId", Some(value));

            assert_eq!(
                validator.violations(),
                &[ValidationViolation::new("clientId", UUID_MESSAGE)],
                "input {:?}",
                value
            );
        }
    }

    #[test]
    fn test_blank_identifier_reports_required_once() {
        for value in [None, Some(""), Some("   ")] {
            let validator = RequestValidator::new()
                .required("pixId", value)
                .uuid("pixId", value);

            assert_eq!(
                validator.violations(),
                &[ValidationViolation::new("pixId", REQUIRED_MESSAGE)]
            );
        }
    }

    #[test]
    fn test_membership_checks() {
        let validator = RequestValidator::new()
            .member_of::<KeyType>("keyType", Some("INVALIDO"))
            .member_of::<AccountType>("accountType", Some("CHECKING"))
            .member_of::<AccountType>("accountType", Some(""));

        assert_eq!(
            validator.violations(),
            &[ValidationViolation::new(
                "keyType",
                "Valores válidos: [CPF, EMAIL, PHONE, RANDOM]"
            )]
        );
    }

    #[test]
    fn test_violations_keep_insertion_order() {
        let result = RequestValidator::new()
            .required("pixId", Some("123"))
            .uuid("pixId", Some("123"))
            .required("clientId", None)
            .uuid("clientId", None)
            .finish();

        match result {
            Err(DomainError::ValidationFailed { violations }) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].field, "pixId");
                assert_eq!(violations[1].field, "clientId");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_ok_without_violations() {
        let result = RequestValidator::new()
            .required("clientId", Some(VALID_UUID))
            .uuid("clientId", Some(VALID_UUID))
            .finish();

        assert!(result.is_ok());
    }
}
