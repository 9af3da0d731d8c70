//! Global constants used throughout the rbuild codebase.
//!
//! File names, tool names and the canonical dependency ignore list live here
//! so that the configuration resolver, the pipeline and the CLI agree on them.

/// Name of the per-project configuration file.
pub const CONFIG_FILE_NAME: &str = "rbuild.ini";

/// Requirements file used by the default configuration.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Development requirements file, preferred over [`REQUIREMENTS_FILE`] when present.
pub const DEV_REQUIREMENTS_FILE: &str = "dev-requirements.txt";

/// Name of the cache record inside the dependency prefix directory.
pub const HASH_FILE_NAME: &str = "hash";

/// Name of the fallback section in the configuration source.
pub const DEFAULT_SECTION: &str = "default";

/// Prefix marking a session request that may fall back to [`DEFAULT_SECTION`].
pub const TRY_PREFIX: &str = "try:";

/// Session used by `prepare`, `build`, `package` and `hash` unless `--session` is given.
pub const MAIN_SESSION: &str = "try:main";

/// Session used by `develop` unless `--session` is given.
pub const DEVELOP_SESSION: &str = "try:develop";

/// Dependencies that are provided by the ROCm installation and must never be
/// installed into the dependency prefix.
///
/// This is the one canonical copy: the default configuration template is
/// generated from it.
pub const DEFAULT_IGNORE: &[&str] = &[
    "danmar/cppcheck",
    "RadeonOpenCompute/clang-ocl",
    "RadeonOpenCompute/rocm-cmake",
    "ROCm-Developer-Tools/HIP",
    "ROCmSoftwarePlatform/MIOpen",
    "ROCmSoftwarePlatform/MIOpenGEMM",
    "ROCmSoftwarePlatform/rocBLAS",
];

/// Interpolation variable seeded from `ROCM_PATH`.
pub const ROCM_PATH_VAR: &str = "rocm_path";

/// Value of [`ROCM_PATH_VAR`] when `ROCM_PATH` is unset.
pub const DEFAULT_ROCM_PATH: &str = "/opt/rocm";

/// Maximum nesting of `${...}` references before interpolation gives up.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Dependency tool executable, overridable with `RBUILD_CGET`.
pub const CGET: &str = "cget";

/// Build tool executable, overridable with `RBUILD_CMAKE`.
pub const CMAKE: &str = "cmake";

/// Build configuration passed to `cmake --build`.
pub const BUILD_CONFIG: &str = "Release";

/// Target that is built when no target is requested.
pub const DEFAULT_TARGET: &str = "all";

/// Marker file written by generators that produce a direct build script.
pub const MAKEFILE_MARKER: &str = "Makefile";

/// Default CPU core count when detection fails.
///
/// Used as a fallback when `std::thread::available_parallelism()` returns an error.
pub const FALLBACK_CORE_COUNT: usize = 4;
