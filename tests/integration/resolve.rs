use anyhow::Result;
use bazel_deps::test_utils::{DependencySpec, PomBuilder, TestRepository};

use crate::common::TestProject;

const JACKSON: &str = "com.fasterxml.jackson.core";

/// jackson-databind 2.5.0 with its two compile dependencies and a test-scoped one.
fn publish_jackson(repo: &TestRepository) -> Result<()> {
    repo.publish(
        &PomBuilder::new(&format!("{JACKSON}:jackson-databind:2.5.0"))
            .dependency(DependencySpec::new(&format!("{JACKSON}:jackson-annotations:2.5.0")))
            .dependency(DependencySpec::new(&format!("{JACKSON}:jackson-core:2.5.0")))
            .dependency(DependencySpec::new("junit:junit:4.12").scope("test")),
    )?;
    repo.publish(&PomBuilder::new(&format!("{JACKSON}:jackson-annotations:2.5.0")))?;
    repo.publish(
        &PomBuilder::new(&format!("{JACKSON}:jackson-core:2.5.0"))
            .dependency(DependencySpec::new("org.example:core-helper:1.0")),
    )?;
    repo.publish(&PomBuilder::new("org.example:core-helper:1.0"))
}

#[tokio::test]
async fn test_jackson_databind_output() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    publish_jackson(&repo)?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, &format!("{JACKSON}:jackson-databind:2.5.0")])?;
    output.assert_success();

    let expected = format!(
        "\n\n--------- Add these lines to your WORKSPACE file ---------\n\n\
         maven_server(name=\"local\", url=\"{url}\")\n\
         maven_server(name=\"central\", url=\"https://repo1.maven.org/maven2/\")\n\
         maven_jar(name = \"org.example_core-helper\", artifact = \"org.example:core-helper:jar:1.0\", server = \"local\")\n\
         maven_jar(name = \"{JACKSON}_jackson-annotations\", artifact = \"{JACKSON}:jackson-annotations:jar:2.5.0\", server = \"local\")\n\
         maven_jar(name = \"{JACKSON}_jackson-core\", artifact = \"{JACKSON}:jackson-core:jar:2.5.0\", server = \"local\")\n\
         \n\n--------- Add these lines to your BUILD file ---------\n\n\
         java_library(\n\
         \x20 name=\"jackson-databind\",\n\
         \x20 visibility = [\"//visibility:public\"],\n\
         \x20 exports = [\n\
         \x20   \"@{JACKSON}_jackson-annotations//jar\",\n\
         \x20   \"@{JACKSON}_jackson-core//jar\",\n\
         \x20   \"@org.example_core-helper//jar\",\n\
         \x20 ],\n\
         )\n\n",
        url = repo.url()
    );
    assert_eq!(output.stdout, expected);
    assert!(!output.stdout.contains("junit"));
    Ok(())
}

#[tokio::test]
async fn test_exclusion_removes_subtree() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    publish_jackson(&repo)?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&[
        "-r",
        &repository,
        "-x",
        &format!("{JACKSON}:jackson-core:2.5.0"),
        &format!("{JACKSON}:jackson-databind:2.5.0"),
    ])?;
    output.assert_success();

    assert_eq!(output.jar_lines().len(), 1);
    output
        .assert_stdout_contains("jackson-annotations:jar:2.5.0")
        .assert_stdout_not_contains("jackson-core")
        .assert_stdout_not_contains("core-helper");
    Ok(())
}

#[tokio::test]
async fn test_optional_dependencies_are_omitted() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(
        &PomBuilder::new("org.example:app:1.0")
            .dependency(DependencySpec::new("org.example:required:1.0"))
            .dependency(DependencySpec::new("org.example:extra:1.0").optional()),
    )?;
    repo.publish(&PomBuilder::new("org.example:required:1.0"))?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    output.assert_success();

    output.assert_stdout_contains("org.example:required:jar:1.0").assert_stdout_not_contains("extra");
    Ok(())
}

#[tokio::test]
async fn test_nearest_version_wins() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(
        &PomBuilder::new("org.example:app:1.0")
            .dependency(DependencySpec::new("org.example:a:1.0"))
            .dependency(DependencySpec::new("org.example:b:1.0")),
    )?;
    repo.publish(&PomBuilder::new("org.example:a:1.0").dependency(DependencySpec::new("org.example:c:1.0")))?;
    repo.publish(&PomBuilder::new("org.example:b:1.0").dependency(DependencySpec::new("org.example:d:1.0")))?;
    repo.publish(&PomBuilder::new("org.example:d:1.0").dependency(DependencySpec::new("org.example:c:2.0")))?;
    repo.publish(&PomBuilder::new("org.example:c:1.0"))?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    output.assert_success();

    assert_eq!(output.jar_lines().len(), 4);
    output.assert_stdout_contains("org.example:c:jar:1.0").assert_stdout_not_contains("org.example:c:jar:2.0");
    Ok(())
}

#[tokio::test]
async fn test_multiple_roots_share_the_manifest() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:zeta:1.0").dependency(DependencySpec::new("org.example:shared:1.0")))?;
    repo.publish(
        &PomBuilder::new("org.example:alpha:1.0")
            .dependency(DependencySpec::new("org.example:shared:1.0"))
            .dependency(DependencySpec::new("org.example:only-alpha:1.0")),
    )?;
    repo.publish(&PomBuilder::new("org.example:shared:1.0"))?;
    repo.publish(&PomBuilder::new("org.example:only-alpha:1.0"))?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, "org.example:zeta:1.0", "org.example:alpha:1.0"])?;
    output.assert_success();

    // Shared artifacts are registered once
    let jars = output.jar_lines();
    assert_eq!(jars.len(), 2);
    assert!(jars[0].contains("org.example_only-alpha"));
    assert!(jars[1].contains("org.example_shared"));

    // Libraries sorted by name
    let alpha = output.stdout.find("name=\"alpha\"").unwrap();
    let zeta = output.stdout.find("name=\"zeta\"").unwrap();
    assert!(alpha < zeta);
    assert!(output.stdout.ends_with(
        "java_library(\n  name=\"zeta\",\n  visibility = [\"//visibility:public\"],\n  exports = [\n    \"@org.example_shared//jar\",\n  ],\n)\n\n"
    ));
    Ok(())
}

#[tokio::test]
async fn test_version_range_picks_highest_listed_match() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:[1.0,2.0)")))?;
    for version in ["1.0", "1.5", "2.0"] {
        repo.publish(&PomBuilder::new(&format!("org.example:lib:{version}")))?;
    }
    repo.publish_versions("org.example", "lib", &["1.0", "1.5", "2.0"])?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    output.assert_success();

    output.assert_stdout_contains("org.example:lib:jar:1.5");
    assert_eq!(output.jar_lines().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_parent_properties_and_management() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish_pom(
        &PomBuilder::new("org.example:parent:3")
            .packaging("pom")
            .property("lib.version", "4.2")
            .managed(DependencySpec::new("org.example:lib:${lib.version}")),
    )?;
    repo.publish(
        &PomBuilder::new("org.example:app:1.0")
            .parent("org.example:parent:3")
            .dependency(DependencySpec::new("org.example:lib")),
    )?;
    repo.publish(&PomBuilder::new("org.example:lib:4.2"))?;

    let repository = format!("local@{}", repo.url());
    let output = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    output.assert_success();

    output.assert_stdout_contains("org.example:lib:jar:4.2").assert_stdout_not_contains("parent");
    Ok(())
}

#[tokio::test]
async fn test_progress_is_logged_to_stderr() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:1.0")))?;
    repo.publish(&PomBuilder::new("org.example:lib:1.0"))?;
    let repository = format!("local@{}", repo.url());

    let output = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    output
        .assert_success()
        .assert_stderr_contains("Collecting artifacts for org.example:app:jar:1.0")
        .assert_stderr_contains("org.example:lib:jar:1.0 as dependency");
    assert!(!output.stdout.contains("Collecting"));

    let quiet = project.run_bazel_deps(&["-q", "-r", &repository, "org.example:app:1.0"])?;
    quiet.assert_success();
    assert!(quiet.stderr.is_empty(), "quiet run logged: {}", quiet.stderr);
    assert_eq!(quiet.stdout, output.stdout);
    Ok(())
}
