pub mod body;
pub mod student;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use roster_core::ServiceError;
use tracing::{error, warn};

use crate::repository::StudentRepository;
use crate::view::Views;

/// Everything a handler needs: the repository and the compiled views.
pub struct StudentState {
    pub repo: StudentRepository,
    pub views: Views,
}

/// Shared application state.
pub type AppState = Arc<StudentState>;

/// Build the student router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(student::index))
        .route("/students", post(student::create))
        .route("/students/new", get(student::new_form))
        .route(
            "/students/{id}",
            get(student::show)
                .put(student::update)
                .patch(student::update)
                .delete(student::destroy),
        )
        .route("/students/{id}/edit", get(student::edit_form))
        .with_state(state)
}

/// The operation a request performs. Decides how a failure is reported.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    List,
    NewForm,
    Create,
    Show,
    Edit,
    Update,
    Delete,
}

impl Action {
    fn failure(self) -> (StatusCode, &'static str) {
        match self {
            Action::Create => (StatusCode::BAD_REQUEST, "Failed to create student"),
            Action::Update => (StatusCode::BAD_REQUEST, "Failed to update student"),
            Action::Delete => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete student"),
            Action::List | Action::NewForm | Action::Show | Action::Edit => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }

    /// Log one line and turn the error into the page shown to the user.
    pub(crate) fn fail(self, err: ServiceError) -> PageError {
        if let ServiceError::NotFound(_) = err {
            warn!(action = ?self, "{err}");
            return PageError {
                status: StatusCode::NOT_FOUND,
                message: "Student not found",
            };
        }

        error!(action = ?self, "{err}");
        let (status, message) = self.failure();
        PageError { status, message }
    }
}

/// Plain-text error page. No structured payload.
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Wrap a rendered page into an HTML response.
pub(crate) fn html(
    action: Action,
    result: Result<String, ServiceError>,
) -> Result<Html<String>, PageError> {
    result.map(Html).map_err(|e| action.fail(e))
}

/// Wrap a redirect target into a `303 See Other`.
pub(crate) fn see_other(
    action: Action,
    result: Result<String, ServiceError>,
) -> Result<Redirect, PageError> {
    result.map(|to| Redirect::to(&to)).map_err(|e| action.fail(e))
}
