//! The `rbuild` binary end to end.

use predicates::prelude::*;
use rbuild::deps::compute_hash;
use rbuild::test_utils::ProjectFixture;

use crate::common::rbuild_cmd;

#[test]
fn test_help_lists_commands() {
    let project = ProjectFixture::new().unwrap();
    rbuild_cmd(project.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("develop"))
        .stdout(predicate::str::contains("hash"));
}

#[test]
fn test_version_flag() {
    let project = ProjectFixture::new().unwrap();
    rbuild_cmd(project.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_hash_prints_fingerprint() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_config("[main]\ndeps = -f requirements.txt\n")
        .unwrap()
        .with_requirements(&["acme/lib@1.0", "# comment", "pfultz2/half@1.12.0   -X header"])
        .unwrap();

    let expected = compute_hash(["acme/lib@1.0", "pfultz2/half@1.12.0 -X header"]);
    rbuild_cmd(project.path())
        .arg("hash")
        .assert()
        .success()
        .stdout(format!("{expected}\n"));
}

#[test]
fn test_hash_with_default_configuration_skips_ignored() {
    let project = ProjectFixture::new()
        .unwrap()
        .with_requirements(&["RadeonOpenCompute/rocm-cmake@master", "acme/lib@1.0"])
        .unwrap();

    rbuild_cmd(project.path())
        .arg("hash")
        .assert()
        .success()
        .stdout(format!("{}\n", compute_hash(["acme/lib@1.0"])));
}

#[test]
fn test_unknown_session_fails() {
    let project = ProjectFixture::new().unwrap().with_config("[main]\ncc = gcc\n").unwrap();
    rbuild_cmd(project.path())
        .args(["hash", "--session", "nightly"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown session: nightly"));
}

#[test]
fn test_malformed_requirement_fails() {
    let project = ProjectFixture::new().unwrap().with_requirements(&["acme/lib \"unterminated"]).unwrap();
    rbuild_cmd(project.path())
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unbalanced quotes"));
}

#[test]
fn test_missing_tool_reported() {
    let project = ProjectFixture::new().unwrap().with_requirements(&["acme/lib@1.0"]).unwrap();
    rbuild_cmd(project.path())
        .env("RBUILD_CGET", "rbuild-no-such-cget")
        .arg("prepare")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rbuild-no-such-cget is not installed"));
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use crate::common::FakeTool;

    fn setup() -> (ProjectFixture, FakeTool, FakeTool) {
        let project = ProjectFixture::new()
            .unwrap()
            .with_config("[main]\ndeps = -f requirements.txt\n\n[develop]\ndefine = BUILD_DEV=On\n")
            .unwrap()
            .with_requirements(&["acme/lib@1.0"])
            .unwrap();
        let bin = project.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let cget = FakeTool::create(&bin, "cget").unwrap();
        let cmake = FakeTool::create(&bin, "cmake").unwrap();
        (project, cget, cmake)
    }

    fn run(project: &ProjectFixture, cget: &FakeTool, cmake: &FakeTool, args: &[&str]) -> assert_cmd::assert::Assert {
        rbuild_cmd(project.path())
            .env("RBUILD_CGET", &cget.script)
            .env("RBUILD_CMAKE", &cmake.script)
            .args(args)
            .assert()
    }

    #[test]
    fn test_prepare_is_memoized() {
        let (project, cget, cmake) = setup();
        let deps = project.path().join("deps");

        run(&project, &cget, &cmake, &["prepare"])
            .success()
            .stdout(predicate::str::contains("install acme/lib@1.0"));
        assert_eq!(
            cget.calls(),
            vec![
                format!("-p {} clean -y", deps.display()),
                format!("-p {} init", deps.display()),
                format!("-p {} install acme/lib@1.0", deps.display()),
            ]
        );
        assert_eq!(project.stored_hash(), Some(compute_hash(["acme/lib@1.0"])));

        cget.clear();
        run(&project, &cget, &cmake, &["prepare"]).success();
        assert!(cget.calls().is_empty());

        project.write_requirements(&["acme/lib@2.0"]).unwrap();
        run(&project, &cget, &cmake, &["prepare"]).success();
        assert_eq!(cget.calls().len(), 3);
        assert!(cget.calls()[2].ends_with("install acme/lib@2.0"));
    }

    #[test]
    fn test_build_runs_targets_in_order() {
        let (project, cget, cmake) = setup();
        run(&project, &cget, &cmake, &["build", "-t", "lib", "-t", "tests"]).success();

        let calls = cmake.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("-DCMAKE_TOOLCHAIN_FILE="));
        assert!(calls[1].ends_with("--config Release --target lib"));
        assert!(calls[2].ends_with("--config Release --target tests"));
        assert!(project.path().join("build").is_dir());
    }

    #[test]
    fn test_develop_uses_develop_session_without_clean() {
        let (project, cget, cmake) = setup();
        let marker = project.write("build/keep.txt", "").unwrap();

        run(&project, &cget, &cmake, &["develop"]).success();
        assert!(marker.exists());
        assert!(cmake.calls()[0].ends_with("-DBUILD_DEV=On"));
        assert!(cget.calls()[1].ends_with(" init"));
    }

    #[test]
    fn test_tool_failure_exits_nonzero_without_cache() {
        let (project, cget, cmake) = setup();
        cget.fail_with(3).unwrap();

        run(&project, &cget, &cmake, &["prepare"])
            .failure()
            .code(1)
            .stderr(predicate::str::contains("clean failed (exit code 3)"));
        assert_eq!(project.stored_hash(), None);
        assert!(cmake.calls().is_empty());
    }
}
