mod common;
use common::cli::{WeftWorkspace, created_id, run_weft, weft_ok};
use predicates::prelude::*;

#[test]
fn test_init_creates_data_branch_and_leaves_main_alone() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");

    let branches = std::process::Command::new("git")
        .args(["branch", "--list", "weft/data"])
        .current_dir(workspace.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&branches.stdout).contains("weft/data"));

    // The project checkout itself stays clean.
    let status = std::process::Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(workspace.path())
        .output()
        .unwrap();
    assert!(status.stdout.is_empty());
}

#[test]
fn test_init_twice_requires_force() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");

    let again = run_weft(&workspace, ["init"], "reinit");
    assert!(!again.success);
    assert!(again.stderr.contains("already initialized"));

    weft_ok(&workspace, ["init", "--force"], "force reinit");
}

#[test]
fn test_commands_refuse_outside_initialized_repo() {
    let workspace = WeftWorkspace::new();
    let output = run_weft(&workspace, ["create", "Too early"], "create");
    assert!(!output.success);
    assert!(output.stderr.contains("not initialized"));
}

#[test]
fn test_create_show_roundtrip() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");

    let stdout = weft_ok(
        &workspace,
        [
            "create",
            "Fix login flow",
            "-d",
            "Session cookie expires early",
            "-p",
            "1",
            "-t",
            "bug",
            "-l",
            "auth",
        ],
        "create",
    );
    let id = created_id(&stdout);
    assert!(id.starts_with("wf-"));

    let shown = weft_ok(&workspace, ["show", &id], "show");
    assert!(shown.contains("Fix login flow"));
    assert!(shown.contains("[P1]"));
    assert!(shown.contains("[bug]"));
    assert!(shown.contains("Session cookie expires early"));
    assert!(shown.contains("Labels: auth"));
}

#[test]
fn test_create_with_explicit_id_and_collision() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    weft_ok(&workspace, ["create", "First", "--id", "wf-abc"], "create");

    let dup = run_weft(
        &workspace,
        ["create", "Second", "--id", "wf-abc"],
        "duplicate",
    );
    assert!(!dup.success);
    assert!(dup.stderr.contains("already exists"));
}

#[test]
fn test_lifecycle_start_close_reopen() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Ship it"], "create"));

    weft_ok(&workspace, ["start", &id, "-a", "alice"], "start");
    let shown = weft_ok(&workspace, ["show", &id], "show started");
    assert!(shown.contains("◐"));
    assert!(shown.contains("Assignee: alice"));

    weft_ok(&workspace, ["close", &id, "-r", "done"], "close");
    let shown = weft_ok(&workspace, ["show", &id], "show closed");
    assert!(shown.contains("✓"));
    assert!(shown.contains("Close reason: done"));

    let again = run_weft(&workspace, ["close", &id], "double close");
    assert!(!again.success);

    weft_ok(&workspace, ["reopen", &id], "reopen");
    let shown = weft_ok(&workspace, ["show", &id], "show reopened");
    assert!(shown.contains("○"));
    assert!(!shown.contains("Close reason"));
}

#[test]
fn test_defer_and_undefer() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Later"], "create"));

    weft_ok(&workspace, ["defer", &id, "2031-01-15"], "defer");
    let shown = weft_ok(&workspace, ["show", &id], "show deferred");
    assert!(shown.contains("❄"));
    assert!(shown.contains("Deferred until: 2031-01-15"));

    // Deferred issues drop out of the default list.
    let list = weft_ok(&workspace, ["list"], "list");
    assert!(!list.contains(&id));
    let list = weft_ok(&workspace, ["list", "--deferred"], "list deferred");
    assert!(list.contains(&id));

    weft_ok(&workspace, ["undefer", &id], "undefer");
    let shown = weft_ok(&workspace, ["show", &id], "show undeferred");
    assert!(shown.contains("○"));
}

#[test]
fn test_defer_in_progress_is_rejected() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Busy"], "create"));
    weft_ok(&workspace, ["start", &id], "start");

    let deferred = run_weft(&workspace, ["defer", &id, "2031-01-15"], "defer");
    assert!(!deferred.success);
    assert!(deferred.stderr.contains("transition"));
}

#[test]
fn test_list_filters_and_sort() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    weft_ok(&workspace, ["create", "Low prio", "-p", "3"], "create");
    weft_ok(&workspace, ["create", "Urgent", "-p", "P0"], "create");
    weft_ok(
        &workspace,
        ["create", "Tagged", "-l", "backend", "-a", "bob"],
        "create",
    );

    let list = weft_ok(&workspace, ["list"], "list");
    let urgent = list.find("Urgent").unwrap();
    let low = list.find("Low prio").unwrap();
    assert!(urgent < low, "best priority first:\n{list}");

    let by_label = weft_ok(&workspace, ["list", "-l", "backend"], "list label");
    assert!(by_label.contains("Tagged"));
    assert!(!by_label.contains("Urgent"));

    let by_assignee = weft_ok(&workspace, ["list", "-a", "bob"], "list assignee");
    assert!(by_assignee.contains("Tagged"));

    let unassigned = weft_ok(&workspace, ["list", "--unassigned"], "list unassigned");
    assert!(!unassigned.contains("Tagged"));

    let searched = weft_ok(&workspace, ["list", "--search", "urg"], "search");
    assert!(searched.contains("Urgent"));
    assert!(!searched.contains("Tagged"));
}

#[test]
fn test_update_edits_and_clears_fields() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(
        &workspace,
        ["create", "Original", "-a", "alice"],
        "create",
    ));

    weft_ok(
        &workspace,
        ["update", &id, "--title", "Renamed", "-p", "0", "-a", ""],
        "update",
    );
    let shown = weft_ok(&workspace, ["show", &id], "show");
    assert!(shown.contains("Renamed"));
    assert!(shown.contains("[P0]"));
    assert!(!shown.contains("Assignee"));
}

#[test]
fn test_json_output_is_machine_parseable() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Parse me"], "create"));

    let json = weft_ok(&workspace, ["--json", "show", &id], "show json");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["id"], id.as_str());
    assert_eq!(value["status"], "open");

    let json = weft_ok(&workspace, ["--json", "list"], "list json");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn test_comments_and_labels() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Discuss"], "create"));

    weft_ok(
        &workspace,
        ["comment", "add", &id, "first note", "--author", "alice"],
        "comment",
    );
    let comments = weft_ok(&workspace, ["comments", "list", &id], "comments");
    assert!(comments.contains("alice: first note"));

    weft_ok(&workspace, ["label", "add", &id, "urgent", "auth"], "label");
    weft_ok(&workspace, ["label", "remove", &id, "urgent"], "unlabel");
    let labels = weft_ok(&workspace, ["label", "list", &id], "labels");
    assert!(predicate::str::contains("auth").eval(&labels));
    assert!(!labels.contains("urgent"));
}

#[test]
fn test_config_get_set_list() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init", "--prefix", "proj"], "init");

    assert_eq!(
        weft_ok(&workspace, ["config", "get", "prefix"], "get").trim(),
        "proj"
    );

    weft_ok(
        &workspace,
        ["config", "set", "workflow.auto_close", "true"],
        "set",
    );
    let listed = weft_ok(&workspace, ["config", "list"], "list");
    assert!(listed.contains("workflow.auto_close=true"));
    assert!(listed.contains("prefix=proj"));

    let missing = run_weft(&workspace, ["config", "get", "nope"], "get missing");
    assert!(!missing.success);
}

#[test]
fn test_every_mutation_is_one_commit_on_the_data_branch() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let id = created_id(&weft_ok(&workspace, ["create", "Tracked"], "create"));
    weft_ok(&workspace, ["close", &id], "close");

    let log = std::process::Command::new("git")
        .args(["log", "--format=%s", "weft/data"])
        .current_dir(workspace.path())
        .output()
        .unwrap();
    let subjects: Vec<String> = String::from_utf8_lossy(&log.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    assert!(subjects[0].starts_with(&format!("close {id}")), "{subjects:?}");
    assert!(subjects[1].starts_with(&format!("create {id}")), "{subjects:?}");
}
