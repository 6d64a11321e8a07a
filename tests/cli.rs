use std::path::Path;
use std::process::{Command, Output};

use miette::{IntoDiagnostic, Result};
use tempfile::tempdir;

static BIN: &str = env!("CARGO_BIN_EXE_bunfig-auth");

fn run(dir: &Path, extra: &[&str]) -> Result<Output> {
    let npmrc = dir.join(".npmrc");
    let bunfig = dir.join("bunfig.toml");
    Command::new(BIN)
        .arg("--token")
        .arg("abcd")
        .arg("--repo-config")
        .arg(&npmrc)
        .arg("--from")
        .arg(&bunfig)
        .arg("--bunfig")
        .arg(&bunfig)
        .arg("--config")
        .arg(dir.join("bunfig-auth.toml"))
        .args(extra)
        .output()
        .into_diagnostic()
}

#[test]
fn generates_bunfig() -> Result<()> {
    let dir = tempdir().into_diagnostic()?;
    std::fs::write(
        dir.path().join(".npmrc"),
        "@myscope:registry=https://us-west1-npm.pkg.dev/myproj/myrepo/\n",
    )
    .into_diagnostic()?;

    let output = run(dir.path(), &[])?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Success!"));

    let bunfig = std::fs::read_to_string(dir.path().join("bunfig.toml")).into_diagnostic()?;
    assert!(bunfig.contains(
        r#""@myscope" = { url = "https://us-west1-npm.pkg.dev/myproj/myrepo/", token = "abcd" }"#
    ));
    Ok(())
}

#[test]
fn quiet_prints_nothing() -> Result<()> {
    let dir = tempdir().into_diagnostic()?;
    std::fs::write(dir.path().join(".npmrc"), "registry=https://registry.npmjs.org/\n")
        .into_diagnostic()?;

    let output = run(dir.path(), &["--quiet"])?;
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    Ok(())
}

#[test]
fn failure_exits_nonzero() -> Result<()> {
    let dir = tempdir().into_diagnostic()?;
    std::fs::write(dir.path().join(".npmrc"), "_authToken=orphan\n").into_diagnostic()?;

    let output = run(dir.path(), &[])?;
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Success!"));
    assert!(!dir.path().join("bunfig.toml").exists());
    Ok(())
}
