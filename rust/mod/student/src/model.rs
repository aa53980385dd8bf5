use chrono::{DateTime, Utc};
use roster_core::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Student — the stored document.
/// Primary key is `id`, assigned by the repository on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// 32 lowercase hex characters. Never reassigned.
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    /// Photo URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Set once on creation.
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Overwrite the editable fields. `id` and `created_at` are untouched.
    pub fn apply(&mut self, fields: StudentFields) {
        self.name = fields.name;
        self.age = fields.age;
        self.course = fields.course;
        self.photo = fields.photo;
    }
}

/// A structurally valid student identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentId(String);

impl StudentId {
    /// Parse a raw path segment. Accepts any UUID spelling and normalises it
    /// to the simple (no dashes, lowercase) form used as the storage key.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        Uuid::try_parse(raw)
            .map(|uuid| Self(uuid.simple().to_string()))
            .map_err(|_| ServiceError::InvalidId(format!("'{raw}' is not a student id")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Loosely typed request body. Every field is optional text; nothing is
/// validated until [`StudentDraft::into_fields`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Typed, validated student fields: what create and update write.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub name: String,
    pub age: Option<u32>,
    pub course: Option<String>,
    pub photo: Option<String>,
}

impl StudentDraft {
    /// Coerce the draft into typed fields.
    ///
    /// Blank text fields become absent. `age` must be a non-negative integer
    /// when present.
    pub fn into_fields(self) -> Result<StudentFields, ServiceError> {
        let name = present(self.name)
            .ok_or_else(|| ServiceError::Validation("name is required".into()))?;

        let age = match present(self.age) {
            None => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                ServiceError::Validation(format!(
                    "age must be a non-negative integer, got '{raw}'"
                ))
            })?),
        };

        Ok(StudentFields {
            name,
            age,
            course: present(self.course),
            photo: present(self.photo),
        })
    }
}

impl StudentFields {
    /// Document-level validation, applied by the repository before any write.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::Validation("name is required".into()));
        }
        Ok(())
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
