use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, App};
use issue_tracker::api;
use issue_tracker::configuration::DatabaseSettings;
use issue_tracker::db::init_db;
use issue_tracker::migration::{Migrator, MigratorTrait};
use issue_tracker::service::IssueService;
use issue_tracker::store::SeaOrmIssueStore;
use serde_json::{json, Value};

async fn issues() -> Data<api::Issues> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        name: None,
        max_connections: 1,
        min_connections: 1,
    };
    let db = init_db(&settings).await.expect("sqlite 연결 실패");
    Migrator::up(&db, None).await.expect("마이그레이션 실패");

    Data::new(IssueService::new(
        SeaOrmIssueStore::new(db),
        Some("testProject".to_string()),
    ))
}

macro_rules! spawn_app {
    () => {
        test::init_service(App::new().app_data(issues().await).configure(api::configure)).await
    };
}

macro_rules! create_issue {
    ($app:expr, $project:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/api/issues/{}", $project))
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        test::read_body_json::<Value, _>(resp).await
    }};
}

#[actix_web::test]
async fn health_check_returns_ok() {
    let app = spawn_app!();

    let req = test::TestRequest::get().uri("/health-check").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&test::read_body(resp).await[..], b"OK");
}

#[actix_web::test]
async fn create_with_every_field_returns_the_stored_issue() {
    let app = spawn_app!();

    let issue = create_issue!(
        app,
        "apitest",
        json!({
            "issue_title": "Bug",
            "issue_text": "desc",
            "created_by": "alice",
            "assigned_to": "bob",
            "status_text": "triage"
        })
    );

    assert_eq!(issue["project_name"], "apitest");
    assert_eq!(issue["issue_title"], "Bug");
    assert_eq!(issue["assigned_to"], "bob");
    assert_eq!(issue["status_text"], "triage");
    assert_eq!(issue["open"], true);
    assert_eq!(issue["created_on"], issue["updated_on"]);
    assert!(issue["_id"].is_string());
    assert!(issue.get("expire_marker").is_none());
}

#[actix_web::test]
async fn create_accepts_form_bodies_and_defaults_optional_fields() {
    let app = spawn_app!();

    let req = test::TestRequest::post()
        .uri("/api/issues/apitest")
        .set_form([
            ("issue_title", "Bug"),
            ("issue_text", "desc"),
            ("created_by", "alice"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let issue = test::read_body_json::<Value, _>(resp).await;
    assert_eq!(issue["assigned_to"], "");
    assert_eq!(issue["status_text"], "");
    assert_eq!(issue["open"], true);
}

#[actix_web::test]
async fn create_with_missing_fields_is_a_bad_request() {
    let app = spawn_app!();

    let req = test::TestRequest::post()
        .uri("/api/issues/apitest")
        .set_json(json!({ "issue_title": "Bug", "created_by": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        test::read_body_json::<Value, _>(resp).await,
        json!({
            "error": "required field(s) missing",
            "missingFields": ["issue_text", "created_by"]
        })
    );
}

#[actix_web::test]
async fn list_filters_by_open_and_rejects_bad_values() {
    let app = spawn_app!();
    let first = create_issue!(app, "apitest", json!({ "issue_title": "A", "issue_text": "t", "created_by": "alice" }));
    create_issue!(app, "apitest", json!({ "issue_title": "B", "issue_text": "t", "created_by": "alice" }));

    let req = test::TestRequest::put()
        .uri("/api/issues/apitest")
        .set_json(json!({ "_id": first["_id"], "open": "false" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/issues/apitest?open=true").to_request();
    let open: Value = test::call_and_read_body_json(&app, req).await;
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["issue_title"], "B");

    let req = test::TestRequest::get().uri("/api/issues/apitest?open=false&created_by=alice").to_request();
    let closed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(closed.as_array().unwrap().len(), 1);
    assert_eq!(closed[0]["_id"], first["_id"]);

    let req = test::TestRequest::get().uri("/api/issues/apitest?open=invalidvalue").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body_json::<Value, _>(resp).await, json!({ "error": "Invalid open filter" }));
}

#[actix_web::test]
async fn list_ignores_unknown_query_keys_and_accepts_id_alias() {
    let app = spawn_app!();
    let issue = create_issue!(app, "apitest", json!({ "issue_title": "A", "issue_text": "t", "created_by": "alice" }));
    create_issue!(app, "apitest", json!({ "issue_title": "B", "issue_text": "t", "created_by": "alice" }));

    let uri = format!("/api/issues/apitest?id={}&project_name=other&$where=1", issue["_id"].as_str().unwrap());
    let req = test::TestRequest::get().uri(&uri).to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(found, json!([issue]));
}

#[actix_web::test]
async fn list_with_malformed_id_reports_invalid_filter() {
    let app = spawn_app!();

    let req = test::TestRequest::get().uri("/api/issues/apitest?_id=nope").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "error": "Invalid _id parameter" }));
}

#[actix_web::test]
async fn update_returns_the_full_issue_with_result() {
    let app = spawn_app!();
    let issue = create_issue!(app, "apitest", json!({ "issue_title": "Bug", "issue_text": "desc", "created_by": "alice" }));

    let req = test::TestRequest::put()
        .uri("/api/issues/apitest")
        .set_json(json!({ "_id": issue["_id"], "status_text": "in progress", "assigned_to": "" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated["result"], "successfully updated");
    assert_eq!(updated["_id"], issue["_id"]);
    assert_eq!(updated["status_text"], "in progress");
    assert_eq!(updated["assigned_to"], "");
    assert_eq!(updated["open"], true);
    assert_eq!(updated["created_on"], issue["created_on"]);
}

#[actix_web::test]
async fn update_error_payloads_echo_the_id() {
    let app = spawn_app!();
    let issue = create_issue!(app, "apitest", json!({ "issue_title": "Bug", "issue_text": "desc", "created_by": "alice" }));
    let id = issue["_id"].clone();

    let cases = [
        (json!({ "issue_title": "x" }), json!({ "error": "missing _id" })),
        (json!({ "_id": id }), json!({ "error": "no update field(s) sent", "_id": id })),
        (
            json!({ "_id": "5f665eb46e296f6b9b6a504d", "issue_text": "x" }),
            json!({ "error": "could not update", "_id": "5f665eb46e296f6b9b6a504d" }),
        ),
    ];

    for (body, expected) in cases {
        let req = test::TestRequest::put().uri("/api/issues/apitest").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body_json::<Value, _>(resp).await, expected);
    }

    let req = test::TestRequest::put()
        .uri("/api/issues/someone-else")
        .set_json(json!({ "_id": id, "issue_title": "hijacked" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "error": "could not update", "_id": id }));
}

#[actix_web::test]
async fn delete_then_list_no_longer_includes_the_issue() {
    let app = spawn_app!();
    let issue = create_issue!(app, "apitest", json!({ "issue_title": "Bug", "issue_text": "desc", "created_by": "alice" }));
    let id = issue["_id"].clone();

    let req = test::TestRequest::delete()
        .uri("/api/issues/other")
        .set_json(json!({ "_id": id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "error": "could not delete", "_id": id }));

    let req = test::TestRequest::delete()
        .uri("/api/issues/apitest")
        .set_json(json!({ "_id": id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "result": "successfully deleted", "_id": id }));

    let req = test::TestRequest::get().uri("/api/issues/apitest").to_request();
    let remaining: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(remaining, json!([]));

    let req = test::TestRequest::delete()
        .uri("/api/issues/apitest")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "error": "missing _id" }));
}

#[actix_web::test]
async fn fixture_project_starts_clean_on_every_create() {
    let app = spawn_app!();
    create_issue!(app, "testProject", json!({ "issue_title": "old", "issue_text": "t", "created_by": "ci" }));
    let fresh = create_issue!(app, "testProject", json!({ "issue_title": "new", "issue_text": "t", "created_by": "ci" }));

    let req = test::TestRequest::get().uri("/api/issues/testProject").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed, json!([fresh]));
}

#[actix_web::test]
async fn bodiless_requests_get_the_usual_error_payloads() {
    let app = spawn_app!();

    let req = test::TestRequest::post().uri("/api/issues/apitest").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        test::read_body_json::<Value, _>(resp).await,
        json!({
            "error": "required field(s) missing",
            "missingFields": ["issue_title", "issue_text", "created_by"]
        })
    );

    for req in [
        test::TestRequest::put().uri("/api/issues/apitest").to_request(),
        test::TestRequest::delete().uri("/api/issues/apitest").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body_json::<Value, _>(resp).await, json!({ "error": "missing _id" }));
    }
}

#[actix_web::test]
async fn form_encoded_update_and_delete_work() {
    let app = spawn_app!();
    let issue = create_issue!(app, "apitest", json!({ "issue_title": "Bug", "issue_text": "desc", "created_by": "alice" }));
    let id = issue["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/issues/apitest")
        .set_form([("_id", id.as_str()), ("open", "false")])
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["open"], false);

    let req = test::TestRequest::delete()
        .uri("/api/issues/apitest")
        .set_form([("_id", id.as_str())])
        .to_request();
    let deleted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deleted, json!({ "result": "successfully deleted", "_id": id }));
}

#[actix_web::test]
async fn malformed_bodies_are_reported_as_json_errors() {
    let app = spawn_app!();

    let req = test::TestRequest::put()
        .uri("/api/issues/apitest")
        .set_json(json!({ "_id": 123, "issue_title": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body_json::<Value, _>(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let req = test::TestRequest::post()
        .uri("/api/issues/apitest")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body_json::<Value, _>(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn rejected_query_strings_are_invalid_filters() {
    let app = spawn_app!();

    for uri in [
        "/api/issues/apitest?open=true&open=false",
        "/api/issues/apitest?id=a&_id=b",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            test::read_body_json::<Value, _>(resp).await,
            json!({ "error": "Invalid query parameters" })
        );
    }
}
