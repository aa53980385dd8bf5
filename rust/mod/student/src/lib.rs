//! Student module — CRUD over student records with server-rendered pages.
//!
//! Routes:
//! - `GET /` list, newest first
//! - `GET /students/new` empty form
//! - `POST /students` create, redirect to `/`
//! - `GET /students/{id}` detail
//! - `GET /students/{id}/edit` edit form
//! - `PUT|PATCH /students/{id}` update, redirect to the detail page
//! - `DELETE /students/{id}` delete, redirect to `/`

pub mod api;
pub mod model;
pub mod repository;
pub mod view;

use std::sync::Arc;

use axum::Router;
use roster_core::{Module, ServiceError};
use roster_kv::KVStore;

use api::{AppState, StudentState};
use repository::StudentRepository;
use view::Views;

pub use model::{Student, StudentDraft, StudentFields, StudentId};

pub struct StudentModule {
    state: AppState,
}

impl StudentModule {
    pub fn new(kv: Arc<dyn KVStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            state: Arc::new(StudentState {
                repo: StudentRepository::new(kv),
                views: Views::new()?,
            }),
        })
    }
}

impl Module for StudentModule {
    fn routes(&self) -> Router {
        api::router(self.state.clone())
    }
}
