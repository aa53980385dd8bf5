use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use roster_core::ServiceError;

use super::body::StudentBody;
use super::{Action, AppState, PageError, html, see_other};
use crate::model::{Student, StudentFields};

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("student '{id}' not found"))
}

fn fields(body: Result<StudentBody, ServiceError>) -> Result<StudentFields, ServiceError> {
    body.and_then(|StudentBody(draft)| draft.into_fields())
}

fn find(state: &AppState, id: &str) -> Result<Student, ServiceError> {
    state.repo.get_by_id(id)?.ok_or_else(|| not_found(id))
}

/// GET / — every student, newest first.
pub(crate) async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    html(
        Action::List,
        state
            .repo
            .list_all_newest_first()
            .and_then(|students| state.views.list(&students)),
    )
}

/// GET /students/new
pub(crate) async fn new_form(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    html(Action::NewForm, state.views.new_form())
}

/// POST /students
pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<StudentBody, ServiceError>,
) -> Result<Redirect, PageError> {
    see_other(
        Action::Create,
        fields(body)
            .and_then(|fields| state.repo.create(fields))
            .map(|_| "/".to_string()),
    )
}

/// GET /students/{id}
pub(crate) async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    html(
        Action::Show,
        find(&state, &id).and_then(|student| state.views.show(&student)),
    )
}

/// GET /students/{id}/edit
pub(crate) async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    html(
        Action::Edit,
        find(&state, &id).and_then(|student| state.views.edit_form(&student)),
    )
}

/// PUT|PATCH /students/{id} — full overwrite of the editable fields. An
/// unknown id still redirects to its detail page, which then answers 404.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<StudentBody, ServiceError>,
) -> Result<Redirect, PageError> {
    see_other(
        Action::Update,
        fields(body)
            .and_then(|fields| state.repo.update_by_id(&id, fields))
            .map(|updated| match updated {
                Some(student) => format!("/students/{}", student.id),
                None => format!("/students/{id}"),
            }),
    )
}

/// DELETE /students/{id}
pub(crate) async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    see_other(
        Action::Delete,
        state.repo.delete_by_id(&id).map(|()| "/".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use roster_core::Module;
    use roster_kv::{KVError, KVStore, RedbStore, UpdateFn};
    use tower::ServiceExt;

    use crate::StudentModule;

    const MISSING_ID: &str = "0192d3a45b6c7d8e9f00112233445566";

    fn setup() -> (Router, Arc<dyn KVStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let kv: Arc<dyn KVStore> =
            Arc::new(RedbStore::open(&dir.path().join("test.redb")).unwrap());
        let module = StudentModule::new(Arc::clone(&kv)).unwrap();
        (module.routes(), kv, dir)
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Option<String>, String) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn stored(kv: &Arc<dyn KVStore>) -> Vec<serde_json::Value> {
        kv.scan("student:")
            .unwrap()
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn create_redirects_and_list_shows_student() {
        let (router, _kv, _dir) = setup();

        let (status, location, _) =
            send(&router, form("POST", "/students", "name=Jo&course=CS")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (status, _, page) = send(&router, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Jo"));
        assert!(page.contains("CS"));
    }

    #[tokio::test]
    async fn create_accepts_json_with_numeric_age() {
        let (router, kv, _dir) = setup();

        let (status, _, _) = send(
            &router,
            json("POST", "/students", serde_json::json!({"name": "Ann", "age": 19})),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let docs = stored(&kv);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["age"], serde_json::json!(19));
    }

    #[tokio::test]
    async fn create_with_empty_age_stores_no_age() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Bo&age=&course=")).await;

        let docs = stored(&kv);
        assert!(docs[0].get("age").is_none());
        assert!(docs[0].get("course").is_none());
        assert!(docs[0].get("createdAt").is_some());
    }

    #[tokio::test]
    async fn create_failures_are_bad_request() {
        let (router, kv, _dir) = setup();

        for body in ["course=CS", "name=", "name=Jo&age=abc"] {
            let (status, _, text) = send(&router, form("POST", "/students", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(text, "Failed to create student");
        }

        let (status, _, _) = send(
            &router,
            Request::builder()
                .method("POST")
                .uri("/students")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(stored(&kv).is_empty());
    }

    #[tokio::test]
    async fn new_form_renders() {
        let (router, _kv, _dir) = setup();
        let (status, _, page) = send(&router, get("/students/new")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(r#"action="/students""#));
    }

    #[tokio::test]
    async fn show_and_edit_render_existing_student() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Jo&age=21")).await;
        let id = stored(&kv)[0]["id"].as_str().unwrap().to_string();

        let (status, _, page) = send(&router, get(&format!("/students/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Jo"));
        assert!(page.contains("21"));

        let (status, _, page) = send(&router, get(&format!("/students/{id}/edit"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(r#"name="name" value="Jo""#));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (router, _kv, _dir) = setup();

        for uri in [format!("/students/{MISSING_ID}"), format!("/students/{MISSING_ID}/edit")] {
            let (status, _, text) = send(&router, get(&uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(text, "Student not found");
        }
    }

    #[tokio::test]
    async fn malformed_id_on_show_is_server_error() {
        let (router, _kv, _dir) = setup();
        let (status, _, text) = send(&router, get("/students/not-a-valid-id")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text, "Server error");
    }

    #[tokio::test]
    async fn update_redirects_to_show() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Jo&age=21&course=CS")).await;
        let before = stored(&kv).remove(0);
        let id = before["id"].as_str().unwrap().to_string();

        let (status, location, _) = send(
            &router,
            form("PUT", &format!("/students/{id}"), "name=Joanne&age=&course=Math"),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, Some(format!("/students/{id}")));

        let after = stored(&kv).remove(0);
        assert_eq!(after["name"], "Joanne");
        assert!(after.get("age").is_none());
        assert_eq!(after["course"], "Math");
        assert_eq!(after["createdAt"], before["createdAt"]);
    }

    #[tokio::test]
    async fn patch_is_an_update() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Jo")).await;
        let id = stored(&kv)[0]["id"].as_str().unwrap().to_string();

        let (status, _, _) =
            send(&router, json("PATCH", &format!("/students/{id}"), serde_json::json!({"name": "Jay"}))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(stored(&kv)[0]["name"], "Jay");
    }

    #[tokio::test]
    async fn invalid_update_is_bad_request_and_keeps_record() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Jo")).await;
        let id = stored(&kv)[0]["id"].as_str().unwrap().to_string();

        let (status, _, text) =
            send(&router, form("PUT", &format!("/students/{id}"), "name=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Failed to update student");
        assert_eq!(stored(&kv)[0]["name"], "Jo");

        let (status, _, _) = send(&router, form("PUT", "/students/bogus", "name=X")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_unknown_id_redirects_to_show() {
        let (router, kv, _dir) = setup();
        let uri = format!("/students/{MISSING_ID}");

        let (status, location, _) = send(&router, form("PUT", &uri, "name=X")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, Some(uri.clone()));
        assert!(stored(&kv).is_empty());

        let (status, _, text) = send(&router, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "Student not found");
    }

    #[tokio::test]
    async fn delete_redirects_home() {
        let (router, kv, _dir) = setup();
        send(&router, form("POST", "/students", "name=Jo")).await;
        let id = stored(&kv)[0]["id"].as_str().unwrap().to_string();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/students/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, location, _) = send(&router, req).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
        assert!(stored(&kv).is_empty());

        let (status, _, _) = send(&router, get(&format!("/students/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_malformed_id_is_server_error() {
        let (router, _kv, _dir) = setup();
        let req = Request::builder()
            .method("DELETE")
            .uri("/students/xyz")
            .body(Body::empty())
            .unwrap();
        let (status, _, text) = send(&router, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text, "Failed to delete student");
    }

    struct OfflineStore;

    impl KVStore for OfflineStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KVError> {
            Err(KVError::Storage("connection refused".into()))
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), KVError> {
            Err(KVError::Storage("connection refused".into()))
        }
        fn update(&self, _key: &str, _apply: UpdateFn<'_>) -> Result<Option<Vec<u8>>, KVError> {
            Err(KVError::Storage("connection refused".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), KVError> {
            Err(KVError::Storage("connection refused".into()))
        }
        fn scan(&self, _prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
            Err(KVError::Storage("connection refused".into()))
        }
    }

    fn offline() -> Router {
        StudentModule::new(Arc::new(OfflineStore)).unwrap().routes()
    }

    #[tokio::test]
    async fn store_outage_on_reads_is_server_error() {
        let router = offline();

        for uri in [
            "/".to_string(),
            format!("/students/{MISSING_ID}"),
            format!("/students/{MISSING_ID}/edit"),
        ] {
            let (status, _, text) = send(&router, get(&uri)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "uri {uri}");
            assert_eq!(text, "Server error");
        }

        // The empty form never touches the store.
        let (status, _, _) = send(&router, get("/students/new")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn store_outage_on_writes_uses_route_messages() {
        let router = offline();
        let uri = format!("/students/{MISSING_ID}");

        let (status, _, text) = send(&router, form("POST", "/students", "name=Jo")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Failed to create student");

        let (status, _, text) = send(&router, form("PUT", &uri, "name=Jo")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Failed to update student");

        let req = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _, text) = send(&router, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text, "Failed to delete student");
    }
}
