use std::path::PathBuf;
use std::time::Duration;

pub const BUILD_HEADER_FILE: &str = "build.h";
pub const BUILD_JSON_FILE: &str = "build.json";
pub const UNKNOWN: &str = "unknown";
pub const VERSION_PLACEHOLDER: &str = "v0.0.0";

/// Everything the generator treats as fixed. `Config::default()` is what the
/// binary runs with; tests swap out directories and the git program.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    /// Prefix of every `#define` in the header.
    pub define_prefix: String,
    pub output_dir: PathBuf,
    pub header_file: String,
    pub json_file: String,
    pub git_program: PathBuf,
    /// `None` inherits the process working directory.
    pub repo_dir: Option<PathBuf>,
    pub version_placeholder: String,
    pub unknown_placeholder: String,
    pub lookup_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: "NCL".to_string(),
            define_prefix: "NCL".to_string(),
            output_dir: PathBuf::from("."),
            header_file: BUILD_HEADER_FILE.to_string(),
            json_file: BUILD_JSON_FILE.to_string(),
            git_program: PathBuf::from("git"),
            repo_dir: None,
            version_placeholder: VERSION_PLACEHOLDER.to_string(),
            unknown_placeholder: UNKNOWN.to_string(),
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn header_path(&self) -> PathBuf {
        self.output_dir.join(&self.header_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_file)
    }
}
