use anyhow::Result;
use bazel_deps::test_utils::{DependencySpec, PomBuilder};

use crate::common::TestProject;

#[tokio::test]
async fn test_provenance_names_supplying_repository() -> Result<()> {
    let project = TestProject::new()?;
    let first = project.repository("first")?;
    let second = project.repository("second")?;

    first.publish(
        &PomBuilder::new("org.example:app:1.0")
            .dependency(DependencySpec::new("org.example:everywhere:1.0"))
            .dependency(DependencySpec::new("org.example:elsewhere:1.0")),
    )?;
    first.publish(&PomBuilder::new("org.example:everywhere:1.0"))?;
    second.publish(&PomBuilder::new("org.example:everywhere:1.0"))?;
    second.publish(&PomBuilder::new("org.example:elsewhere:1.0"))?;

    let output = project.run_bazel_deps(&[
        "-r",
        &format!("first@{}", first.url()),
        "-r",
        &format!("second@{}", second.url()),
        "org.example:app:1.0",
    ])?;
    output.assert_success();

    let jars = output.jar_lines();
    assert_eq!(jars.len(), 2);
    assert!(jars[0].contains("org.example:elsewhere:jar:1.0") && jars[0].ends_with("server = \"second\")"));
    assert!(jars[1].contains("org.example:everywhere:jar:1.0") && jars[1].ends_with("server = \"first\")"));
    Ok(())
}

#[tokio::test]
async fn test_jar_found_after_pom_elsewhere() -> Result<()> {
    let project = TestProject::new()?;
    let poms = project.repository("poms")?;
    let jars = project.repository("jars")?;

    poms.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:1.0")))?;
    poms.publish_pom(&PomBuilder::new("org.example:lib:1.0"))?;
    jars.publish_jar("org.example:lib:1.0")?;

    let output = project.run_bazel_deps(&[
        "-r",
        &format!("poms@{}", poms.url()),
        "-r",
        &format!("jars@{}", jars.url()),
        "org.example:app:1.0",
    ])?;
    output.assert_success();

    let jar_lines = output.jar_lines();
    assert_eq!(jar_lines.len(), 1);
    assert!(jar_lines[0].ends_with("server = \"jars\")"));
    Ok(())
}

#[tokio::test]
async fn test_bare_location_gets_positional_identifier() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:1.0")))?;
    repo.publish(&PomBuilder::new("org.example:lib:1.0"))?;

    let output = project.run_bazel_deps(&["-r", &repo.url(), "org.example:app:1.0"])?;
    output.assert_success();

    let servers = output.server_lines();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0], format!("maven_server(name=\"uri0\", url=\"{}\")", repo.url()));
    assert!(output.jar_lines()[0].ends_with("server = \"uri0\")"));
    Ok(())
}

#[tokio::test]
async fn test_command_line_repositories_come_before_configured_ones() -> Result<()> {
    let project = TestProject::new()?;
    let cli_repo = project.repository("cli")?;
    let config_repo = project.repository("configured")?;
    cli_repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:1.0")))?;
    config_repo.publish(&PomBuilder::new("org.example:lib:1.0"))?;

    project.write_config(&format!("repositories = [\"configured@{}\"]", config_repo.url()))?;

    let output = project.run_bazel_deps(&["-r", &format!("cli@{}", cli_repo.url()), "org.example:app:1.0"])?;
    output.assert_success();

    let servers = output.server_lines();
    assert_eq!(servers.len(), 3);
    assert!(servers[0].starts_with("maven_server(name=\"cli\""));
    assert!(servers[1].starts_with("maven_server(name=\"configured\""));
    assert!(servers[2].starts_with("maven_server(name=\"central\""));
    assert!(output.jar_lines()[0].ends_with("server = \"configured\")"));
    Ok(())
}

#[tokio::test]
async fn test_configured_exclusions_are_merged() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(
        &PomBuilder::new("org.example:app:1.0")
            .dependency(DependencySpec::new("org.example:one:1.0"))
            .dependency(DependencySpec::new("org.example:two:1.0"))
            .dependency(DependencySpec::new("org.example:three:1.0")),
    )?;
    for name in ["one", "two", "three"] {
        repo.publish(&PomBuilder::new(&format!("org.example:{name}:1.0")))?;
    }
    project.write_config(&format!(
        "repositories = [\"local@{}\"]\nexclude = [\"org.example:one:1.0\"]",
        repo.url()
    ))?;

    let output = project.run_bazel_deps(&["-x", "org.example:two:jar:1.0", "org.example:app:1.0"])?;
    output.assert_success();

    assert_eq!(output.jar_lines().len(), 1);
    output
        .assert_stdout_contains("org.example:three:jar:1.0")
        .assert_stdout_not_contains("org.example:one:")
        .assert_stdout_not_contains("org.example:two:");
    Ok(())
}

#[tokio::test]
async fn test_conflicting_identifier_is_rejected() -> Result<()> {
    let project = TestProject::new()?;
    let first = project.repository("first")?;
    let second = project.repository("second")?;

    let output = project.run_bazel_deps(&[
        "-r",
        &format!("corp@{}", first.url()),
        "-r",
        &format!("corp@{}", second.url()),
        "org.example:app:1.0",
    ])?;
    output.assert_failure().assert_stderr_contains("repository identifier 'corp'");
    Ok(())
}
