use anyhow::Result;
use assert_cmd::Command;
use bazel_deps::test_utils::{DependencySpec, PomBuilder};
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_help_describes_the_tool() {
    Command::cargo_bin("bazel-deps")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKSPACE"))
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--repository"));
}

#[test]
fn test_no_artifacts_is_a_usage_error() {
    Command::cargo_bin("bazel-deps")
        .unwrap()
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("at least one artifact is required"))
        .stderr(predicate::str::contains("bazel-deps com.fasterxml.jackson.core:jackson-databind:2.5.0"));
}

#[tokio::test]
async fn test_invalid_coordinate() -> Result<()> {
    let project = TestProject::new()?;
    let output = project.run_bazel_deps(&["org.example:app"])?;
    output.assert_failure().assert_stderr_contains("Invalid artifact coordinate 'org.example:app'");
    Ok(())
}

#[tokio::test]
async fn test_missing_root_fails_without_output() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;

    let output = project.run_bazel_deps(&["-r", &format!("local@{}", repo.url()), "org.example:missing:1.0"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Unable to resolve org.example:missing:")
        .assert_stderr_contains("local");
    Ok(())
}

#[tokio::test]
async fn test_one_failing_root_suppresses_all_output() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:good:1.0"))?;
    repo.publish(&PomBuilder::new("org.example:bad:1.0").dependency(DependencySpec::new("org.example:jarless:1.0")))?;
    repo.publish_pom(&PomBuilder::new("org.example:jarless:1.0"))?;

    let output = project.run_bazel_deps(&[
        "-r",
        &format!("local@{}", repo.url()),
        "org.example:good:1.0",
        "org.example:bad:1.0",
    ])?;
    output.assert_failure().assert_stderr_contains("org.example:jarless:jar:1.0");
    Ok(())
}

#[tokio::test]
async fn test_name_collision_between_versions() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:x:1.0").dependency(DependencySpec::new("org.example:shared:1.0")))?;
    repo.publish(&PomBuilder::new("org.example:y:1.0").dependency(DependencySpec::new("org.example:shared:2.0")))?;
    repo.publish(&PomBuilder::new("org.example:shared:1.0"))?;
    repo.publish(&PomBuilder::new("org.example:shared:2.0"))?;

    let output = project.run_bazel_deps(&[
        "-r",
        &format!("local@{}", repo.url()),
        "org.example:x:1.0",
        "org.example:y:1.0",
    ])?;
    output
        .assert_failure()
        .assert_stderr_contains("Target name 'org.example_shared'")
        .assert_stderr_contains("org.example:shared:jar:1.0")
        .assert_stderr_contains("org.example:shared:jar:2.0");
    Ok(())
}

#[tokio::test]
async fn test_malformed_config_is_reported() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("repositories = \"not-a-list\"")?;

    let output = project.run_bazel_deps(&["org.example:app:1.0"])?;
    output.assert_failure().assert_stderr_contains("Failed to parse global config");
    Ok(())
}
