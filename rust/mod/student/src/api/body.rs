//! Request body extractor for create/update.
//!
//! HTML forms post `application/x-www-form-urlencoded`; API clients may send
//! JSON. Both decode into a [`StudentDraft`]. In JSON, `age` may be a number
//! or a string.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use roster_core::ServiceError;
use serde_json::{Map, Value};

use crate::model::StudentDraft;

pub struct StudentBody(pub StudentDraft);

impl<S: Send + Sync> FromRequest<S> for StudentBody {
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::Validation(e.body_text()))?;
            return draft_from_json(&object).map(Self);
        }

        let Form(draft) = Form::<StudentDraft>::from_request(req, state)
            .await
            .map_err(|e| ServiceError::Validation(e.body_text()))?;
        Ok(Self(draft))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn draft_from_json(object: &Map<String, Value>) -> Result<StudentDraft, ServiceError> {
    Ok(StudentDraft {
        name: json_text(object, "name")?,
        age: json_text(object, "age")?,
        course: json_text(object, "course")?,
        photo: json_text(object, "photo")?,
    })
}

fn json_text(object: &Map<String, Value>, key: &str) -> Result<Option<String>, ServiceError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ServiceError::Validation(format!(
            "field '{key}' must be a string or number, got {other}"
        ))),
    }
}
