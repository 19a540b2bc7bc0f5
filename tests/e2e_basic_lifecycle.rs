mod common;

use common::cli::{ItWorkspace, create_issue, run_it, sign_up};

#[test]
fn e2e_basic_lifecycle() {
    let _log = common::test_log("e2e_basic_lifecycle");
    let workspace = ItWorkspace::new();
    workspace.init_project();

    let signup = sign_up(&workspace, "ada@example.com");
    assert!(signup.stdout.contains("Signed in as ada@example.com"));
    assert!(workspace.session_file().exists());

    let empty = run_it(&workspace, ["list"], "list_empty");
    assert!(empty.status.success(), "list failed: {}", empty.stderr);
    assert!(empty.stdout.contains("No issues found"));
    assert!(empty.stdout.contains("Create your first issue to get started"));

    let first = create_issue(&workspace, "First bug", "Crashes on start");
    let second = create_issue(&workspace, "Second bug", "Wrong colour");

    let list = run_it(&workspace, ["--json", "list"], "list_two");
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let payload = list.json();
    assert_eq!(payload["count"], 2);
    let ids: Vec<_> = payload["issues"]
        .as_array()
        .expect("issues array")
        .iter()
        .map(|i| i["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids, vec![second.clone(), first.clone()], "newest first");
    assert_eq!(payload["issues"][0]["status"], "Open");

    let update = run_it(
        &workspace,
        ["update", &first, "--status", "in_progress"],
        "update_status",
    );
    assert!(update.status.success(), "update failed: {}", update.stderr);
    assert!(update.stdout.contains("[In Progress] First bug"));
    assert!(update.stdout.contains("Mark as In Progress (current)"));
    assert!(update.stdout.contains("Success: Issue updated successfully"));

    let in_progress = run_it(
        &workspace,
        ["--json", "list", "--status", "in-progress"],
        "list_filtered",
    );
    let payload = in_progress.json();
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["issues"][0]["id"], first.as_str());

    let delete = run_it(&workspace, ["delete", &second], "delete");
    assert!(delete.status.success(), "delete failed: {}", delete.stderr);
    assert!(delete.stdout.contains("Success: Issue deleted successfully"));

    let profile = run_it(&workspace, ["profile"], "profile");
    assert!(profile.status.success(), "profile failed: {}", profile.stderr);
    assert!(profile.stdout.contains("ada@example.com"));
    assert!(profile.stdout.contains("Member since"));
    assert!(profile.stdout.contains("Your issues (1)"));
    assert!(profile.stdout.contains("First bug"));
    assert!(!profile.stdout.contains("Second bug"));
}

#[test]
fn e2e_create_text_output_shows_card() {
    let _log = common::test_log("e2e_create_text_output_shows_card");
    let workspace = ItWorkspace::new();
    workspace.init_project();
    sign_up(&workspace, "ada@example.com");

    let run = run_it(
        &workspace,
        [
            "create",
            "Login fails",
            "--description",
            "Line one\nLine two",
            "--status",
            "closed",
        ],
        "create_text",
    );
    assert!(run.status.success(), "create failed: {}", run.stderr);
    assert!(run.stdout.contains("✓"));
    assert!(run.stdout.contains("[Closed] Login fails"));
    assert!(run.stdout.contains("    Line one\n    Line two"));
    assert!(run.stdout.contains("Created on "));
    assert!(run.stdout.contains("Success: Issue created successfully"));
}

#[test]
fn e2e_owners_do_not_see_each_other() {
    let _log = common::test_log("e2e_owners_do_not_see_each_other");
    let workspace = ItWorkspace::new();
    workspace.init_project();

    sign_up(&workspace, "ada@example.com");
    let ada_issue = create_issue(&workspace, "Ada's bug", "private");
    run_it(&workspace, ["auth", "logout"], "logout_ada");

    sign_up(&workspace, "bob@example.com");
    let list = run_it(&workspace, ["--json", "list"], "list_bob");
    assert_eq!(list.json()["count"], 0);

    let delete = run_it(&workspace, ["delete", &ada_issue], "bob_deletes_ada");
    assert_eq!(delete.code(), Some(3));
    assert_eq!(delete.error_json()["error"]["code"], "ISSUE_NOT_FOUND");

    run_it(&workspace, ["auth", "logout"], "logout_bob");
    let login = run_it(
        &workspace,
        ["auth", "login", "--email", "ada@example.com", "--password", "hunter22"],
        "login_ada",
    );
    assert!(login.status.success(), "login failed: {}", login.stderr);
    let list = run_it(&workspace, ["--json", "list"], "list_ada");
    assert_eq!(list.json()["issues"][0]["id"], ada_issue.as_str());
}
