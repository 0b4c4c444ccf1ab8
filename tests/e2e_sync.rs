mod common;
use common::cli::{WeftWorkspace, created_id, run_weft, weft_ok};

#[test]
fn test_sync_without_remote() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let output = weft_ok(&workspace, ["sync"], "sync");
    assert!(output.contains("no remote configured"));
}

#[test]
fn test_first_sync_pushes_then_up_to_date() {
    let remote = WeftWorkspace::new_bare();
    let workspace = WeftWorkspace::new();
    workspace.add_remote(remote.path());
    weft_ok(&workspace, ["init"], "init");
    weft_ok(&workspace, ["create", "Shared"], "create");

    let first = weft_ok(&workspace, ["sync"], "first sync");
    assert!(first.contains("pushed"));

    let second = weft_ok(&workspace, ["sync"], "second sync");
    assert!(second.contains("up to date"));
}

#[test]
fn test_fresh_clone_attaches_to_existing_data_branch() {
    let remote = WeftWorkspace::new_bare();
    let origin = WeftWorkspace::new();
    origin.add_remote(remote.path());
    weft_ok(&origin, ["init"], "init origin");
    let id = created_id(&weft_ok(&origin, ["create", "Travels with clones"], "create"));
    weft_ok(&origin, ["sync"], "sync origin");

    let clone = WeftWorkspace::clone_from(remote.path());
    weft_ok(&clone, ["init"], "init clone");
    let shown = weft_ok(&clone, ["show", &id], "show in clone");
    assert!(shown.contains("Travels with clones"));
}

#[test]
fn test_sync_pulls_new_issues_from_remote() {
    let remote = WeftWorkspace::new_bare();
    let origin = WeftWorkspace::new();
    origin.add_remote(remote.path());
    weft_ok(&origin, ["init"], "init origin");
    weft_ok(&origin, ["sync"], "seed remote");

    let clone = WeftWorkspace::clone_from(remote.path());
    weft_ok(&clone, ["init"], "init clone");

    let id = created_id(&weft_ok(&origin, ["create", "From origin"], "create"));
    weft_ok(&origin, ["sync"], "push from origin");

    weft_ok(&clone, ["sync"], "pull in clone");
    let shown = weft_ok(&clone, ["show", &id], "show pulled");
    assert!(shown.contains("From origin"));
}

#[test]
fn test_diverged_clones_converge_via_rebase_or_replay() {
    let remote = WeftWorkspace::new_bare();
    let origin = WeftWorkspace::new();
    origin.add_remote(remote.path());
    weft_ok(&origin, ["init"], "init origin");
    let id = created_id(&weft_ok(&origin, ["create", "Contested"], "create"));
    weft_ok(&origin, ["sync"], "seed remote");

    let clone = WeftWorkspace::clone_from(remote.path());
    weft_ok(&clone, ["init"], "init clone");

    // Both sides edit the same issue's title from the same base.
    weft_ok(
        &origin,
        ["update", &id, "--title", "Origin wording"],
        "origin edit",
    );
    weft_ok(&origin, ["sync"], "origin push");

    weft_ok(
        &clone,
        ["update", &id, "--title", "Clone wording"],
        "clone edit",
    );
    let synced = weft_ok(&clone, ["sync"], "clone sync");
    assert!(
        synced.contains("rebased and pushed") || synced.contains("replayed and pushed"),
        "unexpected sync outcome: {synced}"
    );

    // The clone's edit lands last either way.
    let shown = weft_ok(&clone, ["show", &id], "show in clone");
    assert!(shown.contains("Clone wording"));

    // And the origin converges to the same state on its next sync.
    weft_ok(&origin, ["sync"], "origin pull");
    let shown = weft_ok(&origin, ["show", &id], "show in origin");
    assert!(shown.contains("Clone wording"));
}

#[test]
fn test_replayed_intents_survive_as_commits() {
    let remote = WeftWorkspace::new_bare();
    let origin = WeftWorkspace::new();
    origin.add_remote(remote.path());
    weft_ok(&origin, ["init"], "init origin");
    let id = created_id(&weft_ok(&origin, ["create", "Logged"], "create"));
    weft_ok(&origin, ["sync"], "seed remote");

    let clone = WeftWorkspace::clone_from(remote.path());
    weft_ok(&clone, ["init"], "init clone");

    weft_ok(&origin, ["update", &id, "--title", "Origin title"], "origin edit");
    weft_ok(&origin, ["sync"], "origin push");
    weft_ok(&clone, ["close", &id, "-r", "fixed"], "clone close");
    weft_ok(&clone, ["sync"], "clone sync");

    // The close survives as a commit subject on the branch, whether it
    // landed via rebase or replay.
    let log = std::process::Command::new("git")
        .args(["log", "--format=%s", "weft/data"])
        .current_dir(clone.path())
        .output()
        .unwrap();
    let subjects = String::from_utf8_lossy(&log.stdout).into_owned();
    assert!(subjects.contains(&format!("close {id}")), "{subjects}");

    // The converged issue carries both sides: the fetched title edit and
    // the clone's close.
    let shown = weft_ok(&clone, ["show", &id], "show");
    assert!(shown.contains("✓"));
    assert!(shown.contains("Origin title"), "{shown}");
    assert!(shown.contains("fixed"), "{shown}");
}

#[test]
fn test_upgrade_is_idempotent() {
    let workspace = WeftWorkspace::new();
    weft_ok(&workspace, ["init"], "init");
    let output = weft_ok(&workspace, ["upgrade"], "upgrade");
    assert!(output.contains("Already at schema"));
}

#[test]
fn test_version_command() {
    let workspace = WeftWorkspace::new();
    let output = run_weft(&workspace, ["version"], "version");
    assert!(output.success);
    assert!(output.stdout.starts_with("weft "));
}
