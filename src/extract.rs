//! Request extractors that reject with a rendered `AppError` page instead of
//! axum's plain-text rejections.

use crate::error::{AppError, AppResult};
use crate::types::{StudentForm, StudentId};
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderValue},
    Form, Json,
};

/// Parses a path segment as a student id. Anything other than 24 hex
/// characters is malformed, which is a different outcome from "not found".
pub fn parse_student_id(raw: &str) -> AppResult<StudentId> {
    StudentId::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

/// The `{id}` path segment, parsed.
#[derive(Debug, Clone)]
pub struct StudentPath {
    /// Exactly as the client sent it
    pub raw: String,
    pub id: StudentId,
}

impl<S> FromRequestParts<S> for StudentPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let id = parse_student_id(&raw)?;
        Ok(Self { raw, id })
    }
}

/// Candidate field set from either a JSON or a form-encoded body. Bodies not
/// declared as JSON are read as form-encoded whatever their content type.
#[derive(Debug, Clone)]
pub struct StudentInput(pub StudentForm);

impl<S> FromRequest<S> for StudentInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        let form = if is_json {
            let Json(form) = Json::<StudentForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form
        } else {
            req.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            let Form(form) = Form::<StudentForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form
        };

        Ok(StudentInput(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldInput;
    use axum::body::Body;

    #[test]
    fn test_parse_student_id() {
        let id = StudentId::new();
        assert_eq!(parse_student_id(&id.to_hex()).unwrap(), id);

        for raw in ["abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "65a1b2c3d4e5f60718293a4", ""] {
            assert!(matches!(
                parse_student_id(raw),
                Err(AppError::MalformedId(ref r)) if r == raw
            ));
        }
    }

    #[tokio::test]
    async fn test_form_encoded_body() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("name=Al&age=20&major=Computer+Science&merit=&other=5"))
            .unwrap();

        let StudentInput(form) = StudentInput::from_request(req, &()).await.unwrap();
        assert_eq!(form.name, Some(FieldInput::Text("Al".to_string())));
        assert_eq!(form.major, Some(FieldInput::Text("Computer Science".to_string())));
        assert_eq!(form.age, Some(FieldInput::Text("20".to_string())));
        assert_eq!(form.merit, Some(FieldInput::Text(String::new())));
    }

    #[tokio::test]
    async fn test_undeclared_body_is_read_as_form() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "text/plain")
            .body(Body::from("name=Al&major=Math"))
            .unwrap();
        let StudentInput(form) = StudentInput::from_request(req, &()).await.unwrap();
        assert_eq!(form.name, Some(FieldInput::Text("Al".to_string())));

        let req = Request::builder()
            .method("POST")
            .body(Body::from("hello"))
            .unwrap();
        let StudentInput(form) = StudentInput::from_request(req, &()).await.unwrap();
        assert_eq!(form.name, None);
        assert_eq!(form.major, None);
    }

    #[tokio::test]
    async fn test_json_body() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Al","age":20,"major":"Math"}"#))
            .unwrap();

        let StudentInput(form) = StudentInput::from_request(req, &()).await.unwrap();
        assert_eq!(form.age, Some(FieldInput::Number(20.0)));
        assert_eq!(form.merit, None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("invalid json"))
            .unwrap();

        let result = StudentInput::from_request(req, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
