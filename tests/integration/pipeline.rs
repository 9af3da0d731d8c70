//! Pipeline behaviour through the public library API with a recording runner.

use rbuild::builder::{Builder, PrepareOutcome};
use rbuild::config::OptionLayer;
use rbuild::core::RbuildError;
use rbuild::deps::compute_hash;
use rbuild::test_utils::{ProjectFixture, RecordingRunner, init_test_logging};
use rbuild::tools::{Cget, Cmake};

fn builder(project: &ProjectFixture, runner: RecordingRunner) -> Builder<RecordingRunner> {
    Builder::new(project.path(), "try:main", OptionLayer::default(), runner)
        .unwrap()
        .with_tools(Cget::with_program("cget", project.path().join("deps")), Cmake::with_program("cmake"))
}

#[tokio::test]
async fn test_end_to_end_requirement_change() {
    init_test_logging(None);
    let project = ProjectFixture::new()
        .unwrap()
        .with_config("[main]\ndeps = -f requirements.txt\n")
        .unwrap()
        .with_requirements(&["acme/lib@1.0"])
        .unwrap();
    let deps = project.path().join("deps");

    let b = builder(&project, RecordingRunner::new());
    assert_eq!(b.prepare(true).await.unwrap(), PrepareOutcome::Installed(1));
    assert!(deps.is_dir());
    assert_eq!(b.runner().operations(), vec!["clean", "init", "install"]);
    assert_eq!(b.runner().lines()[2], format!("cget -p {} install acme/lib@1.0", deps.display()));
    assert_eq!(project.stored_hash(), Some(compute_hash(["acme/lib@1.0"])));

    b.runner().clear();
    assert_eq!(b.prepare(true).await.unwrap(), PrepareOutcome::UpToDate);
    assert!(b.runner().calls().is_empty());

    project.write_requirements(&["acme/lib@2.0"]).unwrap();
    assert_eq!(b.prepare(true).await.unwrap(), PrepareOutcome::Installed(1));
    assert_eq!(b.runner().operations(), vec!["clean", "init", "install"]);
    assert!(b.runner().lines()[2].ends_with("install acme/lib@2.0"));
    assert_eq!(project.stored_hash(), Some(compute_hash(["acme/lib@2.0"])));
}

#[tokio::test]
async fn test_ignored_requirement_does_not_affect_fingerprint() {
    let with_widget = ProjectFixture::new()
        .unwrap()
        .with_config("[default]\nignore = acme/widget\ndeps = -f requirements.txt\n")
        .unwrap()
        .with_requirements(&["acme/widget@v1", "acme/widgets@v1"])
        .unwrap();
    let without_widget = ProjectFixture::new()
        .unwrap()
        .with_config("[default]\nignore = acme/widget\ndeps = -f requirements.txt\n")
        .unwrap()
        .with_requirements(&["acme/widgets@v1"])
        .unwrap();

    let a = builder(&with_widget, RecordingRunner::new());
    let b = builder(&without_widget, RecordingRunner::new());
    assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
    assert_eq!(a.compute_hash().unwrap(), compute_hash(["acme/widgets@v1"]));

    a.prepare(true).await.unwrap();
    let lines = a.runner().lines();
    assert!(lines.iter().any(|l| l.ends_with("ignore acme/widget")));
    assert!(lines.iter().any(|l| l.ends_with("install acme/widgets@v1")));
    assert!(!lines.iter().any(|l| l.ends_with("install acme/widget@v1")));
}

#[tokio::test]
async fn test_nested_includes_installed_in_order() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_config("[main]\ndeps =\n    first/dep@1\n    -f reqs/all.txt\n    last/dep@1\n")
        .unwrap();
    project.write("reqs/all.txt", "-f extra/more.txt\nmiddle/dep@1\n").unwrap();
    project.write("reqs/extra/more.txt", "nested/dep@1 -DFOO=1\n").unwrap();

    let b = builder(&project, RecordingRunner::new());
    let rendered: Vec<String> = b.requirements().unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["first/dep@1", "nested/dep@1 -DFOO=1", "middle/dep@1", "last/dep@1"]);

    b.prepare(true).await.unwrap();
    let installs: Vec<Vec<String>> = b
        .runner()
        .calls()
        .iter()
        .filter(|c| c.operation() == "install")
        .map(|c| c.arguments()[3..].to_vec())
        .collect();
    assert_eq!(installs[1], vec!["nested/dep@1".to_string(), "-DFOO=1".to_string()]);
    assert_eq!(installs.len(), 4);
}

#[tokio::test]
async fn test_failed_prepare_retries_everything() {
    let project = ProjectFixture::new().unwrap().with_requirements(&["a/one@1", "b/two@2"]).unwrap();
    let b = builder(&project, RecordingRunner::new().fail_on_arg("install", "b/two@2"));

    let err = b.prepare(true).await.unwrap_err();
    match err.downcast_ref::<RbuildError>() {
        Some(RbuildError::ToolFailed { tool, operation, .. }) => {
            assert_eq!(tool, "cget");
            assert_eq!(operation, "install");
        }
        other => panic!("expected tool failure, got {other:?}"),
    }
    assert_eq!(project.stored_hash(), None);

    b.runner().succeed_always();
    b.runner().clear();
    b.prepare(true).await.unwrap();
    let installs = b.runner().operations().iter().filter(|op| *op == "install").count();
    assert_eq!(installs, 2);
    assert!(project.stored_hash().is_some());
}

#[tokio::test]
async fn test_full_pipeline_order() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_config("[main]\ndefine = MIOPEN_BACKEND=HIP\n")
        .unwrap();
    let b = builder(&project, RecordingRunner::new());

    b.prepare(true).await.unwrap();
    b.configure(true).await.unwrap();
    b.build_targets(&["package".to_string()]).await.unwrap();

    assert_eq!(b.runner().operations(), vec!["clean", "init", "configure", "build"]);
    let init = &b.runner().calls()[1];
    assert_eq!(init.arguments()[3..], ["--define".to_string(), "MIOPEN_BACKEND=HIP".to_string()]);
}
