//! StudentRepository — typed access to `student:{id}` documents.
//!
//! Every operation is a single store call; update is one read-modify-write
//! transaction. No state is kept between calls; the store handle is shared.

use std::sync::Arc;

use roster_core::{ServiceError, new_id, now};
use roster_kv::{KVError, KVStore};
use tracing::debug;

use crate::model::{Student, StudentFields, StudentId};

const PREFIX: &str = "student:";

pub struct StudentRepository {
    kv: Arc<dyn KVStore>,
}

impl StudentRepository {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn make_key(id: &str) -> String {
        format!("{PREFIX}{id}")
    }

    fn decode(bytes: &[u8]) -> Result<Student, KVError> {
        serde_json::from_slice(bytes)
            .map_err(|e| KVError::Serialization(format!("deserialize student: {e}")))
    }

    fn encode(student: &Student) -> Result<Vec<u8>, KVError> {
        serde_json::to_vec(student)
            .map_err(|e| KVError::Serialization(format!("serialize student: {e}")))
    }

    fn put(&self, student: &Student) -> Result<(), ServiceError> {
        self.kv.set(&Self::make_key(&student.id), &Self::encode(student)?)?;
        Ok(())
    }

    fn load(&self, id: &StudentId) -> Result<Option<Student>, ServiceError> {
        self.kv
            .get(&Self::make_key(id.as_str()))?
            .map(|bytes| Self::decode(&bytes))
            .transpose()
            .map_err(ServiceError::from)
    }

    /// All students, newest `createdAt` first. Ties fall back to id, which is
    /// time-ordered as well.
    pub fn list_all_newest_first(&self) -> Result<Vec<Student>, ServiceError> {
        let entries = self.kv.scan(PREFIX)?;
        let mut students = entries
            .iter()
            .map(|(_key, bytes)| Self::decode(bytes))
            .collect::<Result<Vec<_>, KVError>>()?;
        students.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(students)
    }

    /// Ok(None) when the id is well-formed but unknown.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Student>, ServiceError> {
        let id = StudentId::parse(id)?;
        self.load(&id)
    }

    pub fn create(&self, fields: StudentFields) -> Result<Student, ServiceError> {
        fields.validate()?;

        let now = now();
        let student = Student {
            id: new_id(),
            name: fields.name,
            age: fields.age,
            course: fields.course,
            photo: fields.photo,
            created_at: now,
            updated_at: now,
        };
        self.put(&student)?;

        debug!("created student {}", student.id);
        Ok(student)
    }

    /// Overwrite name/age/course/photo in one store transaction. Ok(None) when
    /// the id is unknown; an invalid `fields` leaves the stored record
    /// unchanged.
    pub fn update_by_id(
        &self,
        id: &str,
        fields: StudentFields,
    ) -> Result<Option<Student>, ServiceError> {
        let id = StudentId::parse(id)?;
        fields.validate()?;

        let mut updated = None;
        self.kv.update(
            &Self::make_key(id.as_str()),
            Box::new(|current| {
                let Some(bytes) = current else {
                    return Ok(None);
                };
                let mut student = Self::decode(bytes)?;
                student.apply(fields);
                student.updated_at = now();
                let bytes = Self::encode(&student)?;
                updated = Some(student);
                Ok(Some(bytes))
            }),
        )?;

        if updated.is_some() {
            debug!("updated student {}", id.as_str());
        }
        Ok(updated)
    }

    /// Remove a student. Removing an unknown id succeeds.
    pub fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        let id = StudentId::parse(id)?;
        self.kv.delete(&Self::make_key(id.as_str()))?;
        debug!("deleted student {}", id.as_str());
        Ok(())
    }
}
