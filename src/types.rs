use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Store-generated key of a student record, written as 24 hex characters.
pub type StudentId = ObjectId;

/// Field of study; only these values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Major {
    Chemistry,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Finance,
    English,
    Math,
    #[serde(rename = "undecided")]
    Undecided,
}

impl Major {
    pub const ALL: [Major; 6] = [
        Major::Chemistry,
        Major::ComputerScience,
        Major::Finance,
        Major::English,
        Major::Math,
        Major::Undecided,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Major::Chemistry => "Chemistry",
            Major::ComputerScience => "Computer Science",
            Major::Finance => "Finance",
            Major::English => "English",
            Major::Math => "Math",
            Major::Undecided => "undecided",
        }
    }

    /// Exact, case-sensitive match against the display names.
    pub fn parse(value: &str) -> Option<Major> {
        Major::ALL.into_iter().find(|major| major.as_str() == value)
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    /// Merit scholarship, 0 to 5000
    pub merit: f64,
    /// Scholarships from other sources, non-negative
    pub other: f64,
}

/// A validated student, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub age: i64,
    pub major: Major,
    pub scholarship: Scholarship,
}

impl NewStudent {
    pub fn into_record(self, id: StudentId) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            age: self.age,
            major: self.major,
            scholarship: self.scholarship,
        }
    }
}

/// One persisted student document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: StudentId,
    pub name: String,
    pub age: i64,
    pub major: Major,
    pub scholarship: Scholarship,
}

/// A submitted form value. Form-encoded bodies always produce text, JSON bodies
/// may carry numbers directly, even for text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Text(value.to_string())
    }
}

impl From<f64> for FieldInput {
    fn from(value: f64) -> Self {
        FieldInput::Number(value)
    }
}

/// Candidate field set for create and full update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct StudentForm {
    /// At least 2 characters
    #[schema(value_type = Option<String>)]
    pub name: Option<FieldInput>,
    /// Whole number, defaults to 18
    #[schema(value_type = Option<f64>)]
    pub age: Option<FieldInput>,
    /// One of Chemistry, Computer Science, Finance, English, Math, undecided
    #[schema(value_type = Option<String>)]
    pub major: Option<FieldInput>,
    /// Merit scholarship between 0 and 5000, defaults to 0
    #[schema(value_type = Option<f64>)]
    pub merit: Option<FieldInput>,
    /// Other scholarship, non-negative, defaults to 0
    #[schema(value_type = Option<f64>)]
    pub other: Option<FieldInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_parse_is_exact() {
        assert_eq!(Major::parse("Computer Science"), Some(Major::ComputerScience));
        assert_eq!(Major::parse("undecided"), Some(Major::Undecided));
        assert_eq!(Major::parse("math"), None);
        assert_eq!(Major::parse("Undecided"), None);
    }

    #[test]
    fn test_form_accepts_numbers_and_text() {
        let form: StudentForm = serde_json::from_str(
            r#"{"name":"Al","age":20,"major":"Math","merit":"100"}"#,
        )
        .unwrap();

        assert_eq!(form.age, Some(FieldInput::Number(20.0)));
        assert_eq!(form.merit, Some(FieldInput::Text("100".to_string())));
        assert_eq!(form.other, None);
    }

    #[test]
    fn test_form_accepts_numeric_name() {
        let form: StudentForm =
            serde_json::from_str(r#"{"name":12345,"major":"Math"}"#).unwrap();
        assert_eq!(form.name, Some(FieldInput::Number(12345.0)));
    }
}
