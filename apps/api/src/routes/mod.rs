pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::editor::handlers as editor;
use crate::export::handlers as export;
use crate::state::AppState;
use crate::store::handlers as resumes;

pub fn build_router(state: AppState) -> Router {
    let export_limit = state.config.export_max_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Editor
        .route("/api/v1/session", get(editor::handle_open_session))
        .route("/api/v1/session/save", post(editor::handle_save_session))
        .route("/api/v1/editor/apply", post(editor::handle_apply))
        .route("/api/v1/preview", post(editor::handle_preview))
        // Persistence
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_save_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Export
        .route(
            "/api/v1/export",
            post(export::handle_export).layer(DefaultBodyLimit::max(export_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::{USER_EMAIL_HEADER, USER_ID_HEADER};
    use crate::config::Config;
    use crate::export::capture::tests::png_bytes;
    use crate::store::{InMemoryResumeStore, ResumeGateway};

    const BOUNDARY: &str = "resume-test-boundary";

    fn app() -> Router {
        let store = Arc::new(InMemoryResumeStore::new());
        build_router(AppState {
            gateway: ResumeGateway::new(store),
            config: Config::for_tests(),
        })
    }

    fn request(method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder
                .header(USER_ID_HEADER, id.to_string())
                .header(USER_EMAIL_HEADER, "ada@example.com");
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn multipart_request(user: Uuid, fields: &[(&str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/export")
            .header(USER_ID_HEADER, user.to_string())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_auth_is_unauthorized() {
        let response = app()
            .oneshot(request(Method::GET, "/api/v1/resumes", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let uri = format!("/api/v1/resumes/{}", Uuid::new_v4());
        let response = app()
            .oneshot(request(Method::GET, &uri, Some(Uuid::new_v4()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let app = app();
        let user = Uuid::new_v4();
        let sections = json!({
            "personalInfo": { "fullName": "Ada Lovelace", "email": "ada@example.com" },
            "experience": [{ "title": "Analyst", "company": "Engine Co", "duration": "1842", "description": "" }],
            "education": [{ "degree": "", "institution": "", "year": "" }],
            "skills": ["Mathematics"]
        });

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/resumes",
                Some(user),
                Some(json!({ "title": "CV", "sections": sections })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(request(
                Method::GET,
                &format!("/api/v1/resumes/{id}"),
                Some(user),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let loaded = json_body(response).await;
        assert_eq!(loaded["title"], "CV");
        assert_eq!(loaded["sections"]["personalInfo"]["fullName"], "Ada Lovelace");
        assert_eq!(loaded["sections"]["skills"], json!(["Mathematics"]));

        // Another user cannot see it.
        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/v1/resumes/{id}"),
                Some(Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_list_and_delete() {
        let app = app();
        let user = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/resumes",
                Some(user),
                Some(json!({ "title": "Draft" })),
            ))
            .await
            .unwrap();
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/resumes/{id}");

        let response = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &uri,
                Some(user),
                Some(json!({ "title": "Final", "sections": { "skills": ["Rust"] } })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["title"], "Final");
        assert_eq!(updated["sections"]["experience"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/v1/resumes", Some(user), None))
            .await
            .unwrap();
        let listed = json_body(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "Final");

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &uri, Some(user), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request(Method::GET, &uri, Some(user), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_open_blank_session_in_header_mode() {
        let response = app()
            .oneshot(request(
                Method::GET,
                "/api/v1/session?type=header",
                Some(Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["sections"], json!(["personal_info", "customization"]));
        assert_eq!(view["session"]["mode"], "header");
        assert_eq!(view["session"]["id"], Value::Null);
        assert_eq!(view["user_email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_apply_batch_returns_new_snapshot() {
        let app = app();
        let user = Uuid::new_v4();
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/v1/session", Some(user), None))
            .await
            .unwrap();
        let session = json_body(response).await["session"].clone();

        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/editor/apply",
                Some(user),
                Some(json!({
                    "session": session,
                    "actions": [
                        { "action": "add_skill", "skill": "Rust" },
                        { "action": "set_color_scheme", "name": "green" },
                        { "action": "set_font_size", "size": 40 }
                    ]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["session"]["document"]["skills"], json!(["Rust"]));
        assert_eq!(view["session"]["customization"]["fontSize"], 18);
        assert_eq!(view["style"]["accent_color"], "#10b981");
    }

    #[tokio::test]
    async fn test_save_session_adopts_id_then_reopens() {
        let app = app();
        let user = Uuid::new_v4();
        let snapshot = json!({
            "title": "CV",
            "document": { "personalInfo": { "fullName": "Ada" } },
            "customization": { "colorScheme": "orange", "fontFamily": "georgia", "fontSize": 14, "spacing": 1.5, "accentColor": "#f97316" }
        });

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/session/save",
                Some(user),
                Some(snapshot),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        let id = view["session"]["id"].as_str().unwrap().to_string();
        assert_eq!(view["session"]["customization"]["colorScheme"], "orange");

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/v1/session?id={id}"),
                Some(user),
                None,
            ))
            .await
            .unwrap();
        let reopened = json_body(response).await;
        assert_eq!(reopened["session"]["document"]["personalInfo"]["fullName"], "Ada");
        assert_eq!(reopened["session"]["mode"], "full");
    }

    #[tokio::test]
    async fn test_apply_out_of_range_is_validation_error() {
        let response = app()
            .oneshot(request(
                Method::POST,
                "/api/v1/editor/apply",
                Some(Uuid::new_v4()),
                Some(json!({
                    "session": {},
                    "actions": [{ "action": "remove_skill", "index": 3 }]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_bad_action_field_uses_error_envelope() {
        let response = app()
            .oneshot(request(
                Method::POST,
                "/api/v1/editor/apply",
                Some(Uuid::new_v4()),
                Some(json!({
                    "session": {},
                    "actions": [{ "action": "update_skill", "idx": 0, "value": "Rust" }]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("index"));
    }

    #[tokio::test]
    async fn test_malformed_ids_use_error_envelope() {
        let app = app();
        let user = Uuid::new_v4();
        for uri in ["/api/v1/session?id=not-a-uuid", "/api/v1/resumes/not-a-uuid"] {
            let response = app
                .clone()
                .oneshot(request(Method::GET, uri, Some(user), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_non_json_body_uses_error_envelope() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes")
            .header(USER_ID_HEADER, Uuid::new_v4().to_string())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_preview_endpoint() {
        let response = app()
            .oneshot(request(
                Method::POST,
                "/api/v1/preview",
                Some(Uuid::new_v4()),
                Some(json!({ "mode": "header" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["preview"]["mode"], "header");
        assert_eq!(body["style"]["accent_color"], "#3b82f6");
        assert_eq!(body["style"]["scheme_label"], "Professional Blue");
    }

    #[tokio::test]
    async fn test_export_without_capture_is_unprocessable() {
        let response = app()
            .oneshot(multipart_request(Uuid::new_v4(), &[("title", &b"CV"[..])]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"]["code"], "EXPORT_FAILED");
    }

    #[tokio::test]
    async fn test_export_with_out_of_range_scale_is_unprocessable() {
        let png = png_bytes(40, 40, [255, 255, 255, 255]);
        let response = app()
            .oneshot(multipart_request(
                Uuid::new_v4(),
                &[("capture", &png[..]), ("scale", &b"0.004"[..])],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"]["code"], "EXPORT_FAILED");
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let png = png_bytes(60, 120, [255, 255, 255, 255]);
        let response = app()
            .oneshot(multipart_request(
                Uuid::new_v4(),
                &[
                    ("capture", &png[..]),
                    ("title", &b"Ada CV"[..]),
                    ("scale", &b"2"[..]),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Ada CV.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
