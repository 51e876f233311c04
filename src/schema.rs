//! Validation of candidate student field sets.
//!
//! `validate` is pure: it never touches the store, and it reports every failing
//! field rather than stopping at the first one. A record only reaches the store
//! after it has passed here, so a failing candidate is never partially written.

use crate::types::{FieldInput, Major, NewStudent, Scholarship, StudentForm};
use serde::Serialize;
use std::fmt;

pub const NAME_MIN_LENGTH: usize = 2;
pub const DEFAULT_AGE: i64 = 18;
pub const MIN_AGE: i64 = 0;
pub const MAX_MERIT: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    MinLength,
    Min,
    Max,
    Enum,
    Cast,
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub path: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    fn push(&mut self, path: &'static str, kind: ViolationKind, message: String) {
        self.violations.push(FieldViolation {
            path,
            kind,
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, path: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.path == path && v.kind == kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", violation.path, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks a candidate field set and applies defaults.
pub fn validate(form: &StudentForm) -> Result<NewStudent, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = validate_name(text_field(form.name.as_ref()).as_deref(), &mut errors);
    let age = validate_age(form.age.as_ref(), &mut errors);
    let major = validate_major(text_field(form.major.as_ref()).as_deref(), &mut errors);
    let merit = number_field("scholarship.merit", form.merit.as_ref(), 0.0, &mut errors)
        .and_then(|merit| {
            if merit < 0.0 {
                errors.push(
                    "scholarship.merit",
                    ViolationKind::Min,
                    "merit scholarship cannot be negative".to_string(),
                );
                None
            } else if merit > MAX_MERIT {
                errors.push(
                    "scholarship.merit",
                    ViolationKind::Max,
                    format!("merit scholarship cannot exceed {}", MAX_MERIT),
                );
                None
            } else {
                Some(merit)
            }
        });
    let other = number_field("scholarship.other", form.other.as_ref(), 0.0, &mut errors)
        .and_then(|other| {
            if other < 0.0 {
                errors.push(
                    "scholarship.other",
                    ViolationKind::Min,
                    "other scholarship cannot be negative".to_string(),
                );
                None
            } else {
                Some(other)
            }
        });

    match (name, age, major, merit, other) {
        (Some(name), Some(age), Some(major), Some(merit), Some(other)) if errors.is_empty() => {
            Ok(NewStudent {
                name,
                age,
                major,
                scholarship: Scholarship { merit, other },
            })
        }
        _ => Err(errors),
    }
}

fn validate_name(name: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    match name {
        None | Some("") => {
            errors.push(
                "name",
                ViolationKind::Required,
                "Path `name` is required.".to_string(),
            );
            None
        }
        Some(name) if name.chars().count() < NAME_MIN_LENGTH => {
            errors.push(
                "name",
                ViolationKind::MinLength,
                format!(
                    "Path `name` (`{}`) is shorter than the minimum allowed length ({}).",
                    name, NAME_MIN_LENGTH
                ),
            );
            None
        }
        Some(name) => Some(name.to_string()),
    }
}

fn validate_age(age: Option<&FieldInput>, errors: &mut ValidationErrors) -> Option<i64> {
    let value = number_field("age", age, DEFAULT_AGE as f64, errors)?;

    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        errors.push(
            "age",
            ViolationKind::Cast,
            format!("Cast to integer failed for value \"{}\" at path `age`", value),
        );
        return None;
    }

    let age = value as i64;
    if age < MIN_AGE {
        errors.push(
            "age",
            ViolationKind::Min,
            format!("age cannot be less than {}", MIN_AGE),
        );
        return None;
    }
    Some(age)
}

fn validate_major(major: Option<&str>, errors: &mut ValidationErrors) -> Option<Major> {
    match major {
        None | Some("") => {
            errors.push(
                "major",
                ViolationKind::Required,
                "Path `major` is required.".to_string(),
            );
            None
        }
        Some(value) => match Major::parse(value) {
            Some(major) => Some(major),
            None => {
                errors.push(
                    "major",
                    ViolationKind::Enum,
                    format!("`{}` is not a valid enum value for path `major`.", value),
                );
                None
            }
        },
    }
}

/// Text inputs submitted as JSON numbers keep their decimal form.
fn text_field(input: Option<&FieldInput>) -> Option<String> {
    match input? {
        FieldInput::Text(text) => Some(text.clone()),
        FieldInput::Number(n) => Some(n.to_string()),
    }
}

/// Casts an optional numeric input. Absent and blank values take `default`.
fn number_field(
    path: &'static str,
    input: Option<&FieldInput>,
    default: f64,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let parsed = match input {
        None => Some(default),
        Some(FieldInput::Number(n)) => Some(*n),
        Some(FieldInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(default)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
    };

    match parsed {
        Some(n) if n.is_finite() => Some(n),
        _ => {
            let raw = match input {
                Some(FieldInput::Text(text)) => text.clone(),
                Some(FieldInput::Number(n)) => n.to_string(),
                None => String::new(),
            };
            errors.push(
                path,
                ViolationKind::Cast,
                format!("Cast to Number failed for value \"{}\" at path `{}`", raw, path),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, major: &str) -> StudentForm {
        StudentForm {
            name: Some(name.into()),
            major: Some(major.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_keeps_values() {
        let candidate = StudentForm {
            name: Some("Al".into()),
            age: Some(20.0.into()),
            major: Some("Math".into()),
            merit: Some(100.0.into()),
            other: Some(0.0.into()),
        };

        let student = validate(&candidate).unwrap();
        assert_eq!(student.name, "Al");
        assert_eq!(student.age, 20);
        assert_eq!(student.major, Major::Math);
        assert_eq!(student.scholarship.merit, 100.0);
        assert_eq!(student.scholarship.other, 0.0);
    }

    #[test]
    fn test_defaults_applied_when_omitted() {
        let student = validate(&form("Grace", "Computer Science")).unwrap();
        assert_eq!(student.age, DEFAULT_AGE);
        assert_eq!(student.scholarship, Scholarship::default());
    }

    #[test]
    fn test_blank_text_takes_default() {
        let mut candidate = form("Grace", "Finance");
        candidate.age = Some("".into());
        candidate.merit = Some("  ".into());

        let student = validate(&candidate).unwrap();
        assert_eq!(student.age, DEFAULT_AGE);
        assert_eq!(student.scholarship.merit, 0.0);
    }

    #[test]
    fn test_text_numbers_are_cast() {
        let mut candidate = form("Grace", "English");
        candidate.age = Some("21".into());
        candidate.merit = Some("5000".into());
        candidate.other = Some("12.5".into());

        let student = validate(&candidate).unwrap();
        assert_eq!(student.age, 21);
        assert_eq!(student.scholarship.merit, 5000.0);
        assert_eq!(student.scholarship.other, 12.5);
    }

    #[test]
    fn test_short_name_rejected() {
        let errors = validate(&form("A", "Math")).unwrap_err();
        assert!(errors.has("name", ViolationKind::MinLength));
        assert_eq!(errors.violations.len(), 1);
        assert!(errors.violations[0].message.contains("(`A`)"));
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert!(validate(&form("李四", "Math")).is_ok());
        assert!(validate(&form("李", "Math")).is_err());
    }

    #[test]
    fn test_numeric_name_is_cast_to_text() {
        let candidate = StudentForm {
            name: Some(12345.0.into()),
            major: Some("Math".into()),
            ..Default::default()
        };
        assert_eq!(validate(&candidate).unwrap().name, "12345");

        let candidate = StudentForm {
            name: Some(7.0.into()),
            major: Some(3.0.into()),
            ..Default::default()
        };
        let errors = validate(&candidate).unwrap_err();
        assert!(errors.has("name", ViolationKind::MinLength));
        assert!(errors.has("major", ViolationKind::Enum));
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = validate(&StudentForm::default()).unwrap_err();
        assert!(errors.has("name", ViolationKind::Required));
        assert!(errors.has("major", ViolationKind::Required));
    }

    #[test]
    fn test_major_outside_set_rejected() {
        let errors = validate(&form("Marie", "Physics")).unwrap_err();
        assert!(errors.has("major", ViolationKind::Enum));
        assert_eq!(
            errors.violations[0].message,
            "`Physics` is not a valid enum value for path `major`."
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let mut candidate = form("Marie", "Chemistry");
        candidate.age = Some((-1.0).into());
        candidate.merit = Some(5000.5.into());
        candidate.other = Some((-0.01).into());

        let errors = validate(&candidate).unwrap_err();
        assert!(errors.has("age", ViolationKind::Min));
        assert!(errors.has("scholarship.merit", ViolationKind::Max));
        assert!(errors.has("scholarship.other", ViolationKind::Min));
        assert_eq!(errors.violations.len(), 3);
    }

    #[test]
    fn test_negative_merit_rejected() {
        let mut candidate = form("Marie", "Chemistry");
        candidate.merit = Some((-5.0).into());
        assert!(validate(&candidate)
            .unwrap_err()
            .has("scholarship.merit", ViolationKind::Min));
    }

    #[test]
    fn test_age_zero_allowed() {
        let mut candidate = form("Baby", "undecided");
        candidate.age = Some(0.0.into());
        assert_eq!(validate(&candidate).unwrap().age, 0);
    }

    #[test]
    fn test_cast_failures() {
        let mut candidate = form("Marie", "Chemistry");
        candidate.age = Some("twenty".into());
        candidate.other = Some("lots".into());

        let errors = validate(&candidate).unwrap_err();
        assert!(errors.has("age", ViolationKind::Cast));
        assert!(errors.has("scholarship.other", ViolationKind::Cast));
        assert!(errors.to_string().contains("\"twenty\""));
    }

    #[test]
    fn test_fractional_age_rejected() {
        let mut candidate = form("Marie", "Chemistry");
        candidate.age = Some(20.5.into());

        let errors = validate(&candidate).unwrap_err();
        assert!(errors.has("age", ViolationKind::Cast));
        assert_eq!(
            errors.violations[0].message,
            "Cast to integer failed for value \"20.5\" at path `age`"
        );
    }
}
