mod common;

use common::cli::{ItWorkspace, create_issue, run_it, sign_up};

#[test]
fn e2e_commands_require_session() {
    let _log = common::test_log("e2e_commands_require_session");
    let workspace = ItWorkspace::new();
    workspace.init_project();

    for (label, args) in [
        ("list", vec!["list"]),
        ("create", vec!["create", "Bug", "--description", "desc"]),
        ("update", vec!["update", "it-abc", "--status", "closed"]),
        ("delete", vec!["delete", "it-abc"]),
        ("profile", vec!["profile"]),
    ] {
        let run = run_it(&workspace, &args, &format!("no_session_{label}"));
        assert_eq!(run.code(), Some(5), "{label}: {}", run.stderr);
        assert_eq!(run.error_json()["error"]["code"], "NOT_AUTHENTICATED", "{label}");
    }
}

#[test]
fn e2e_blank_title_is_a_validation_error() {
    let _log = common::test_log("e2e_blank_title_is_a_validation_error");
    let workspace = ItWorkspace::new();
    workspace.init_project();
    sign_up(&workspace, "ada@example.com");

    let run = run_it(
        &workspace,
        ["--json", "create", "   ", "--description", "desc"],
        "create_blank_title",
    );
    assert_eq!(run.code(), Some(4));
    assert_eq!(run.error_json()["error"]["code"], "VALIDATION_FAILED");

    let list = run_it(&workspace, ["--json", "list"], "list_after_reject");
    assert_eq!(list.json()["count"], 0);
}

#[test]
fn e2e_invalid_status_is_rejected() {
    let _log = common::test_log("e2e_invalid_status_is_rejected");
    let workspace = ItWorkspace::new();
    workspace.init_project();
    sign_up(&workspace, "ada@example.com");
    let id = create_issue(&workspace, "Bug", "desc");

    let run = run_it(&workspace, ["update", &id, "--status", "done"], "update_bad_status");
    assert_eq!(run.code(), Some(4));
    assert_eq!(run.error_json()["error"]["code"], "INVALID_STATUS");

    let run = run_it(&workspace, ["list", "--status", "someday"], "list_bad_status");
    assert_eq!(run.code(), Some(4));
}

#[test]
fn e2e_unknown_id_suggests_close_match() {
    let _log = common::test_log("e2e_unknown_id_suggests_close_match");
    let workspace = ItWorkspace::new();
    workspace.init_project();
    sign_up(&workspace, "ada@example.com");
    let id = create_issue(&workspace, "Bug", "desc");
    let typo = format!("{id}x");

    let run = run_it(
        &workspace,
        ["update", &typo, "--status", "closed"],
        "update_unknown_id",
    );
    assert_eq!(run.code(), Some(3));
    let error = run.error_json();
    assert_eq!(error["error"]["code"], "ISSUE_NOT_FOUND");
    assert_eq!(error["error"]["hint"], format!("Did you mean '{id}'?"));

    let run = run_it(&workspace, ["delete", "it-zzzzzzzz"], "delete_unknown_id");
    assert_eq!(run.code(), Some(3));
    assert_eq!(
        run.error_json()["error"]["hint"],
        "Run 'it list' to see your issues."
    );
}

#[test]
fn e2e_rest_backend_without_url_is_config_error() {
    let _log = common::test_log("e2e_rest_backend_without_url_is_config_error");
    let workspace = ItWorkspace::new();
    workspace.init_project();

    let run = run_it(
        &workspace,
        ["--backend", "rest", "auth", "login", "--email", "a@example.com", "--password", "hunter22"],
        "rest_without_url",
    );
    assert_eq!(run.code(), Some(7));
    assert_eq!(run.error_json()["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn e2e_usage_errors_come_from_clap() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    let workspace = ItWorkspace::new();
    Command::new(assert_cmd::cargo::cargo_bin!("it"))
        .current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .args(["create", "Bug"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--description"));

    Command::new(assert_cmd::cargo::cargo_bin!("it"))
        .current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile").and(predicate::str::contains("auth")));
}
