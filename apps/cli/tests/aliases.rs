use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn init_writes_tree_and_default_settings() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised alias workspace"));

    let state = workspace.path().join(".aliasdesk");
    let settings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(state.join("settings.json"))?)?;
    assert_eq!(settings["alias_root"], "/sitecore/system/Aliases");
    assert!(fs::read_to_string(state.join("content.json"))?.contains("\"Aliases\""));

    cli(workspace.path())?
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    Ok(())
}

#[test]
fn add_list_and_remove_alias() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?.arg("init").assert().success();
    cli(workspace.path())?
        .args(["content", "add", "Home/News"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/sitecore/content/Home/News"));

    let added = cli(workspace.path())?
        .args(["alias", "add", "--target", "Home/News", "/news/2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("news/2024"))
        .stdout(predicate::str::contains("clear input"));
    let stdout = String::from_utf8(added.get_output().stdout.clone())?;
    let list_id = stdout
        .lines()
        .find_map(|line| line.strip_prefix("+ "))
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or("missing appended alias")?
        .to_string();
    assert!(list_id.starts_with('I'));

    cli(workspace.path())?
        .args(["--scripts", "alias", "list", "--target", "/sitecore/content/Home/News"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "scCreateAlias(\"{list_id}\", \"news/2024\""
        )));

    cli(workspace.path())?
        .args(["alias", "remove", "--target", "Home/News", &list_id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("- {list_id}")));

    cli(workspace.path())?
        .args(["alias", "list", "--target", "Home/News"])
        .assert()
        .success()
        .stdout(predicate::str::contains("news/2024").not());
    Ok(())
}

#[test]
fn rejected_alias_reports_alert_text() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?.arg("init").assert().success();
    cli(workspace.path())?
        .args(["content", "add", "Home"])
        .assert()
        .success();

    cli(workspace.path())?
        .args(["alias", "add", "--target", "Home", "promo"])
        .assert()
        .success();
    cli(workspace.path())?
        .args(["alias", "add", "--target", "Home", "promo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "An alias with this name already exists.",
        ));
    cli(workspace.path())?
        .args(["alias", "add", "--target", "Home", "what?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The name contains invalid characters.",
        ));
    cli(workspace.path())?
        .args(["alias", "remove", "--target", "Home", "Inope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select an alias from the list."));
    Ok(())
}

#[test]
fn missing_target_is_an_error() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?.arg("init").assert().success();
    cli(workspace.path())?
        .args(["alias", "list", "--target", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn relocated_alias_root_is_reported_on_load() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?.arg("init").assert().success();
    let settings_path = workspace.path().join(".aliasdesk").join("settings.json");
    let mut settings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&settings_path)?)?;
    settings["alias_root"] = "/sitecore/system/Shortcuts".into();
    fs::write(&settings_path, serde_json::to_string_pretty(&settings)?)?;

    cli(workspace.path())?
        .args(["alias", "list", "--target", "Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "has no alias root at /sitecore/system/Shortcuts",
        ));
    Ok(())
}

#[test]
fn commands_require_init() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .args(["alias", "list", "--target", "Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("aliasdesk-cli init"));
    Ok(())
}

fn cli(workspace: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("aliasdesk-cli")?;
    cmd.arg("--workspace").arg(workspace);
    Ok(cmd)
}
