use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const SIGNUP: &str = r#"
name_prefix: signup
fields:
  - kind: text
    label: Email
    required: true
  - kind: checkbox
    label: Newsletter
  - kind: submit
    value: Join
"#;

#[test]
fn render_prints_blank_form() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("form.yml"), SIGNUP)?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("formlets")?
        .current_dir(dir.path())
        .arg("render")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert_eq!(
        stdout.trim_end(),
        concat!(
            r#"<label for="signup0">Email</label><input type="text" name="signup0" id="signup0"/>"#,
            r#"<label for="signup1">Newsletter</label><input type="checkbox" name="signup1" id="signup1"/>"#,
            r#"<input value="Join" type="submit" name="signup2"/>"#,
        )
    );

    Ok(())
}

#[test]
fn render_reports_missing_form_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("formlets")?
        .current_dir(dir.path())
        .args(["--form", "nowhere.yml", "render"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load form definition"));

    Ok(())
}

#[test]
fn render_rejects_mismatched_default() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("form.yml"),
        "fields:\n  - kind: text\n    default: true\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("formlets")?
        .current_dir(dir.path())
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("text fields take a string default"));

    Ok(())
}
