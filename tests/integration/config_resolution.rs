//! Configuration resolution against real `rbuild.ini` files.

use rbuild::config::{OptionLayer, resolve_options};
use rbuild::core::RbuildError;
use rbuild::test_utils::ProjectFixture;
use serial_test::serial;
use std::path::PathBuf;

const INI: &str = "\
# project build configuration
[default]
deps_dir = ${rocm_path}/deps
ignore =
    danmar/cppcheck
deps = -f requirements.txt

[develop]
define =
    BUILD_DEV=On
    DEPS_CACHE=${deps_dir}/cache
cxx = ${rocm_path}/llvm/bin/clang++

[ci]
build_dir = out/ci
toolchain = ${develop:cxx}.cmake
";

fn project() -> ProjectFixture {
    ProjectFixture::new().unwrap().with_config(INI).unwrap()
}

#[test]
#[serial]
fn test_try_session_falls_back_to_default() {
    let project = project();
    let tried = resolve_options(project.path(), "try:missing", OptionLayer::default()).unwrap();
    let default = resolve_options(project.path(), "default", OptionLayer::default()).unwrap();
    assert_eq!(tried, default);
}

#[test]
#[serial]
fn test_named_missing_session_fails() {
    let project = project();
    let err = resolve_options(project.path(), "missing", OptionLayer::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RbuildError>(),
        Some(RbuildError::UnknownSession { session }) if session == "missing"
    ));
}

#[test]
#[serial]
fn test_rocm_path_from_environment() {
    let project = project();
    // SAFETY: serialized with the other tests that read ROCM_PATH
    unsafe { std::env::set_var("ROCM_PATH", "/tmp/rocm-test") };
    let opts = resolve_options(project.path(), "try:develop", OptionLayer::default());
    unsafe { std::env::remove_var("ROCM_PATH") };
    let opts = opts.unwrap();

    assert_eq!(opts.deps_dir(), PathBuf::from("/tmp/rocm-test/deps"));
    assert_eq!(opts.cxx(), Some("/tmp/rocm-test/llvm/bin/clang++"));
    assert_eq!(opts.define()[1], "DEPS_CACHE=/tmp/rocm-test/deps/cache");
    assert_eq!(opts.ignore(), ["danmar/cppcheck".to_string()].as_slice());
}

#[test]
#[serial]
fn test_rocm_path_default_and_cross_section_reference() {
    let project = project();
    // SAFETY: serialized with the other tests that read ROCM_PATH
    unsafe { std::env::remove_var("ROCM_PATH") };
    let opts = resolve_options(project.path(), "ci", OptionLayer::default()).unwrap();

    assert_eq!(opts.build_dir(), project.path().join("out/ci"));
    assert_eq!(opts.toolchain(), Some("/opt/rocm/llvm/bin/clang++.cmake"));
    assert!(opts.cxx().is_none());
}

#[test]
#[serial]
fn test_overrides_win_but_empty_never_clobbers() {
    let project = project();
    let overrides = OptionLayer {
        define: Some(vec!["ONLY=1".to_string()]),
        cxx: Some(String::new()),
        ..OptionLayer::default()
    };
    let opts = resolve_options(project.path(), "try:develop", overrides).unwrap();
    assert_eq!(opts.define(), ["ONLY=1".to_string()].as_slice());
    assert!(opts.cxx().unwrap().ends_with("/llvm/bin/clang++"));
}

#[test]
#[serial]
fn test_malformed_configuration_is_rejected() {
    let project = ProjectFixture::new().unwrap().with_config("deps = a/b@1\n[main]\n").unwrap();
    let err = resolve_options(project.path(), "try:main", OptionLayer::default()).unwrap_err();
    let typed = err.downcast_ref::<RbuildError>().unwrap();
    assert!(typed.is_configuration_error());
}
