//! Configuration for a validation run.
//!
//! Everything here has a default matching the conventional layout of a Vite +
//! React Router + Playwright project, so a project without `.testalign.toml`
//! validates out of the box.

mod loader;

pub use loader::{directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `content.base_url`.
pub const BASE_URL_ENV: &str = "PLAYWRIGHT_BASE_URL";

/// Root configuration structure for testalign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestalignConfig {
    /// Locations of the project inputs
    #[serde(default)]
    pub paths: PathsConfig,

    /// Content validator settings
    #[serde(default)]
    pub content: ContentConfig,

    /// CI validator settings
    #[serde(default)]
    pub ci: CiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_routes_file")]
    pub routes_file: PathBuf,
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,
    #[serde(default = "default_test_suffix")]
    pub test_suffix: String,
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            routes_file: default_routes_file(),
            tests_dir: default_tests_dir(),
            test_suffix: default_test_suffix(),
            manifest: default_manifest(),
        }
    }
}

fn default_routes_file() -> PathBuf {
    PathBuf::from("src/App.tsx")
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests/e2e")
}

fn default_test_suffix() -> String {
    ".spec.ts".to_string()
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

/// Maps a keyword in a test file name to the route that file exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHint {
    pub keyword: String,
    pub route: String,
}

impl RouteHint {
    pub fn new(keyword: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            route: route.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-navigation budget, waiting for network idle
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    /// Selectors sampled on every route
    #[serde(default = "default_selectors")]
    pub selectors: Vec<String>,
    /// Checked in order; the first keyword contained in the file name wins
    #[serde(default = "default_route_hints")]
    pub route_hints: Vec<RouteHint>,
    #[serde(default = "default_route")]
    pub default_route: String,
    /// Node executable used to host the headless browser
    #[serde(default = "default_node")]
    pub node: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            selectors: default_selectors(),
            route_hints: default_route_hints(),
            default_route: default_route(),
            node: default_node(),
        }
    }
}

impl ContentConfig {
    /// Applies an environment-provided base URL, if any.
    pub fn with_base_url_override(mut self, env_value: Option<String>) -> Self {
        if let Some(url) = env_value.filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_navigation_timeout_ms() -> u64 {
    10_000
}

fn default_selectors() -> Vec<String> {
    [
        "h1",
        "h2",
        "h3",
        r#"[data-testid="hero-section"]"#,
        r#"[data-testid="stats-section"]"#,
        r#"[data-testid="model-grid"]"#,
        r#"[data-testid="article-card"]"#,
        r#"[data-testid="nav-logo"]"#,
        r#"[data-testid="nav-model-advisor"]"#,
        r#"[data-testid="nav-blog"]"#,
        r#"[data-testid="nav-about"]"#,
        r#"[data-testid="nav-contact"]"#,
        "footer",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_route_hints() -> Vec<RouteHint> {
    vec![
        RouteHint::new("homepage", "/"),
        RouteHint::new("model-advisor", "/modeladvisor"),
        RouteHint::new("blog", "/blog"),
        RouteHint::new("about", "/about"),
        RouteHint::new("contact", "/contact"),
    ]
}

fn default_route() -> String {
    "/".to_string()
}

fn default_node() -> String {
    "node".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiConfig {
    /// Checked in order; the first existing file is inspected
    #[serde(default = "default_config_candidates")]
    pub config_candidates: Vec<PathBuf>,
    /// Program and leading arguments; the probe file is appended
    #[serde(default = "default_e2e_command")]
    pub e2e_command: Vec<String>,
    #[serde(default = "default_probe_file")]
    pub probe_file: PathBuf,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Run the intentionally failing test to check that failures block
    #[serde(default = "default_failure_probe")]
    pub failure_probe: bool,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            config_candidates: default_config_candidates(),
            e2e_command: default_e2e_command(),
            probe_file: default_probe_file(),
            probe_timeout_secs: default_probe_timeout_secs(),
            failure_probe: default_failure_probe(),
        }
    }
}

fn default_config_candidates() -> Vec<PathBuf> {
    [
        ".github/workflows/test.yml",
        ".github/workflows/tests.yml",
        ".github/workflows/ci.yml",
        ".github/workflows/main.yml",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn default_e2e_command() -> Vec<String> {
    ["npm", "run", "test:e2e", "--"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_probe_file() -> PathBuf {
    PathBuf::from("temp-validation-test.js")
}

fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_failure_probe() -> bool {
    true
}

/// Project input locations resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub routes_file: PathBuf,
    pub tests_dir: PathBuf,
    pub test_suffix: String,
    pub manifest: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: &Path, paths: &PathsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            routes_file: root.join(&paths.routes_file),
            tests_dir: root.join(&paths.tests_dir),
            test_suffix: paths.test_suffix.clone(),
            manifest: root.join(&paths.manifest),
        }
    }

    /// Tests directory relative to the project root, for action items.
    pub fn tests_dir_display(&self) -> String {
        self.tests_dir
            .strip_prefix(&self.root)
            .unwrap_or(&self.tests_dir)
            .to_string_lossy()
            .into_owned()
    }
}
