use anyhow::Result;
use bazel_deps::test_utils::{DependencySpec, PomBuilder};

use crate::common::TestProject;

#[tokio::test]
async fn test_second_run_is_served_from_cache() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:2.0")))?;
    repo.publish(&PomBuilder::new("org.example:lib:2.0"))?;
    let repository = format!("local@{}", repo.url());

    let first = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    first.assert_success();

    // Remove the repository contents; everything needed is cached
    std::fs::remove_dir_all(repo.path().join("org"))?;

    let second = project.run_bazel_deps(&["-r", &repository, "org.example:app:1.0"])?;
    second.assert_success();
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[tokio::test]
async fn test_cache_keeps_repository_layout() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.repository("local")?;
    repo.publish(&PomBuilder::new("org.example:app:1.0").dependency(DependencySpec::new("org.example:lib:2.0")))?;
    repo.publish(&PomBuilder::new("org.example:lib:2.0"))?;

    project.run_bazel_deps(&["-r", &format!("local@{}", repo.url()), "org.example:app:1.0"])?.assert_success();

    let files = project.cached_files();
    assert!(files.iter().any(|f| f.starts_with("local-") && f.ends_with("org/example/app/1.0/app-1.0.pom")));
    assert!(files.iter().any(|f| f.ends_with("org/example/lib/2.0/lib-2.0.pom")));
    assert!(files.iter().any(|f| f.ends_with("org/example/lib/2.0/lib-2.0.jar")));
    // The root's jar is never needed
    assert!(!files.iter().any(|f| f.ends_with("app-1.0.jar")));
    Ok(())
}
