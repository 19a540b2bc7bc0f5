//! Hosted backend: request shapes and error mapping, against a fake server.

mod common;

use common::fake_rest::{FakeRest, row};
use common::{session_for, test_log};
use issuetrack::error::{StoreError, TrackError};
use issuetrack::gateway::{IssueGateway, RestConfig, RestGateway};
use issuetrack::model::{IssuePatch, NewIssue, Status};
use issuetrack::session::{IdentityProvider, RemoteIdentityProvider, SessionContext, SignUp};
use issuetrack::view::IssueBoard;
use serde_json::{Value, json};

fn gateway(server: &FakeRest, token: Option<&str>) -> RestGateway {
    RestGateway::new(
        RestConfig::new(&server.base_url, "anon-key"),
        token.map(str::to_string),
    )
    .unwrap()
}

#[test]
fn list_filters_by_owner_and_sends_token() {
    let _log = test_log("list_filters_by_owner_and_sends_token");
    let body = json!([row("11", "Newer", "In Progress", "u1"), row("10", "Older", "Open", "u1")]);
    let server = FakeRest::serve(vec![(200, body.to_string())]);

    let issues = gateway(&server, Some("jwt")).list("u1").unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].id, "11");
    assert_eq!(issues[0].status, Status::InProgress);
    assert_eq!(issues[0].owner_id, "u1");

    let requests = server.requests();
    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(
        req.url,
        "/rest/v1/issues?select=*&user_id=eq.u1&order=created_at.desc"
    );
    assert_eq!(req.header("apikey"), Some("anon-key"));
    assert_eq!(req.header("Authorization"), Some("Bearer jwt"));
}

#[test]
fn create_posts_one_row_with_owner() {
    let _log = test_log("create_posts_one_row_with_owner");
    let body = json!([row("42", "Bug A", "Open", "u1")]);
    let server = FakeRest::serve(vec![(201, body.to_string())]);

    let issue = gateway(&server, None)
        .create("u1", &NewIssue::new("Bug A", "Bug A description", Status::Open))
        .unwrap();
    assert_eq!(issue.id, "42");
    assert_eq!(issue.title, "Bug A");

    let requests = server.requests();
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.url, "/rest/v1/issues");
    assert_eq!(req.header("Prefer"), Some("return=representation"));
    assert_eq!(req.header("Authorization"), Some("Bearer anon-key"));

    let sent: Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(
        sent,
        json!([{
            "title": "Bug A",
            "description": "Bug A description",
            "status": "Open",
            "user_id": "u1",
        }])
    );
}

#[test]
fn update_is_scoped_and_empty_result_is_not_found() {
    let _log = test_log("update_is_scoped_and_empty_result_is_not_found");
    let server = FakeRest::serve(vec![
        (200, json!([row("7", "T", "Closed", "u1")]).to_string()),
        (200, "[]".to_string()),
    ]);
    let mut gw = gateway(&server, Some("jwt"));

    let updated = gw.update("u1", "7", &IssuePatch::status(Status::Closed)).unwrap();
    assert_eq!(updated.status, Status::Closed);

    let err = gw.update("u2", "7", &IssuePatch::status(Status::Open)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref id } if id == "7"));

    let requests = server.requests();
    assert_eq!(requests[0].method, "PATCH");
    assert_eq!(requests[0].url, "/rest/v1/issues?id=eq.7&user_id=eq.u1");
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, json!({"status": "Closed"}));
    assert_eq!(requests[1].url, "/rest/v1/issues?id=eq.7&user_id=eq.u2");
}

#[test]
fn empty_patch_reads_the_scoped_row() {
    let server = FakeRest::serve(vec![(200, json!([row("7", "T", "Open", "u1")]).to_string())]);
    let issue = gateway(&server, None)
        .update("u1", "7", &IssuePatch::default())
        .unwrap();
    assert_eq!(issue.id, "7");

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].url, "/rest/v1/issues?select=*&id=eq.7&user_id=eq.u1");
}

#[test]
fn delete_is_scoped() {
    let server = FakeRest::serve(vec![
        (200, json!([row("7", "T", "Open", "u1")]).to_string()),
        (200, "[]".to_string()),
    ]);
    let mut gw = gateway(&server, None);

    gw.delete("u1", "7").unwrap();
    assert!(matches!(gw.delete("u1", "7"), Err(StoreError::NotFound { .. })));

    let requests = server.requests();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].url, "/rest/v1/issues?id=eq.7&user_id=eq.u1");
}

#[test]
fn error_statuses_are_mapped() {
    let _log = test_log("error_statuses_are_mapped");
    let server = FakeRest::serve(vec![
        (401, json!({"message": "JWT expired"}).to_string()),
        (500, json!({"message": "boom"}).to_string()),
        (200, "not json".to_string()),
    ]);
    let gw = gateway(&server, Some("old"));

    assert!(matches!(
        gw.list("u1"),
        Err(StoreError::Unauthorized { ref message }) if message == "JWT expired"
    ));
    assert!(matches!(
        gw.list("u1"),
        Err(StoreError::Api { status: 500, ref message }) if message == "boom"
    ));
    assert!(matches!(gw.list("u1"), Err(StoreError::Decode(_))));
    server.requests();
}

#[test]
fn board_over_rest_reconciles_create() {
    let _log = test_log("board_over_rest_reconciles_create");
    let server = FakeRest::serve(vec![
        (200, json!([row("1", "Existing", "Open", "u1")]).to_string()),
        (201, json!([row("2", "Bug A", "Open", "u1")]).to_string()),
    ]);
    let session = session_for("u1");
    let mut board = IssueBoard::mount(gateway(&server, Some("jwt")), Some(&session)).unwrap();

    let form = board.form_mut();
    form.open();
    form.title = "Bug A".to_string();
    form.description = "Bug A description".to_string();
    board.create().unwrap();

    let ids: Vec<_> = board.issues().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert_eq!(server.requests().len(), 2);
}

#[test]
fn remote_sign_in_and_out() {
    let _log = test_log("remote_sign_in_and_out");
    let token = json!({
        "access_token": "jwt-123",
        "token_type": "bearer",
        "user": {"id": "5d2f", "email": "ada@example.com", "created_at": "2026-01-01T00:00:00Z"}
    });
    let server = FakeRest::serve(vec![(200, token.to_string()), (204, String::new())]);
    let mut provider = RemoteIdentityProvider::new(RestConfig::new(&server.base_url, "anon-key")).unwrap();
    let mut ctx = SessionContext::ephemeral(None);

    let session = ctx.sign_in(&mut provider, "Ada@Example.com", "hunter22").unwrap();
    assert_eq!(session.owner_id(), "5d2f");
    assert_eq!(session.access_token.as_deref(), Some("jwt-123"));
    assert_eq!(session.provider, "remote");

    assert!(ctx.sign_out(&mut provider).unwrap());
    assert!(ctx.current().is_none());

    let requests = server.requests();
    assert_eq!(requests[0].url, "/auth/v1/token?grant_type=password");
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["email"], "ada@example.com");
    assert_eq!(requests[1].url, "/auth/v1/logout");
    assert_eq!(requests[1].header("Authorization"), Some("Bearer jwt-123"));
}

#[test]
fn remote_auth_failures() {
    let _log = test_log("remote_auth_failures");
    let server = FakeRest::serve(vec![
        (400, json!({"error_description": "Invalid login credentials"}).to_string()),
        (422, json!({"msg": "User already registered"}).to_string()),
        (
            200,
            json!({"id": "9", "email": "new@example.com", "created_at": "2026-01-01T00:00:00Z"})
                .to_string(),
        ),
    ]);
    let mut provider = RemoteIdentityProvider::new(RestConfig::new(&server.base_url, "anon-key")).unwrap();

    assert!(matches!(
        provider.sign_in("ada@example.com", "wrong-pass"),
        Err(TrackError::InvalidCredentials)
    ));
    assert!(matches!(
        provider.sign_up("ada@example.com", "hunter22"),
        Err(TrackError::AccountExists { .. })
    ));
    match provider.sign_up("new@example.com", "hunter22").unwrap() {
        SignUp::ConfirmationRequired(identity) => assert_eq!(identity.id, "9"),
        SignUp::SignedIn(_) => panic!("no token in the response"),
    }
    assert_eq!(server.requests().len(), 3);
}
