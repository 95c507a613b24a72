//! CI configuration validator.
//!
//! Checks three things: the project manifest declares test scripts, a CI
//! workflow exists and is wired for e2e/pull-request/push, and a failing test
//! actually makes the e2e runner fail. The last check runs a real subprocess
//! (see [`probe`]) and typically takes several seconds.

pub mod probe;

pub use probe::{
    probe_failure_blocking, CommandRunner, ProbeCommand, RunOutput, ShellRunner, TempTestFile,
};

use crate::config::{CiConfig, ProjectLayout};
use crate::core::{CiFinding, CiFindingKind, CiValidationResult, Severity};
use crate::errors::{Error, Result};
use crate::io;
use std::path::Path;

/// Marker-based summary of a CI workflow file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiConfigDetails {
    pub path: String,
    pub has_e2e_tests: bool,
    pub has_unit_tests: bool,
    pub runs_on_pr: bool,
    pub runs_on_push: bool,
}

/// Result of the failure-blocking probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureProbe {
    Blocking,
    NotBlocking,
    /// Disabled by configuration
    Skipped,
}

impl FailureProbe {
    pub fn from_blocking(blocking: bool) -> Self {
        if blocking {
            Self::Blocking
        } else {
            Self::NotBlocking
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocking)
    }
}

pub fn is_test_command(name: &str) -> bool {
    name.starts_with("test")
        || name.contains("lint")
        || name.contains("typecheck")
        || name.contains("validate")
}

/// Script names in the manifest that run tests or checks.
pub fn extract_test_commands(manifest: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(manifest)?;
    Ok(value
        .get("scripts")
        .and_then(serde_json::Value::as_object)
        .map(|scripts| {
            scripts
                .keys()
                .filter(|name| is_test_command(name))
                .cloned()
                .collect()
        })
        .unwrap_or_default())
}

pub fn inspect_ci_config(path: &str, content: &str) -> CiConfigDetails {
    CiConfigDetails {
        path: path.to_string(),
        has_e2e_tests: content.contains("test:e2e") || content.contains("playwright"),
        has_unit_tests: content.contains("test") && !content.contains("test:e2e"),
        runs_on_pr: content.contains("pull_request"),
        runs_on_push: content.contains("push"),
    }
}

/// Inspect the first candidate that exists.
pub fn find_ci_config(root: &Path, candidates: &[impl AsRef<Path>]) -> Result<Option<CiConfigDetails>> {
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let full_path = root.join(candidate);
        if io::file_exists(&full_path) {
            let content = io::read_file(&full_path)?;
            log::debug!("Inspecting CI configuration {}", full_path.display());
            return Ok(Some(inspect_ci_config(
                &candidate.to_string_lossy(),
                &content,
            )));
        }
    }
    Ok(None)
}

/// Turn the collected facts into findings and recommendations.
pub fn synthesize_findings(
    test_commands: &[String],
    ci_config: Option<&CiConfigDetails>,
    probe: FailureProbe,
) -> (Vec<CiFinding>, Vec<String>) {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if test_commands.is_empty() {
        issues.push(CiFinding {
            kind: CiFindingKind::MissingTestCommand,
            severity: Severity::Critical,
            description: "No test commands found in package.json".to_string(),
            fix: r#"Add test scripts to package.json (e.g., "test:e2e": "playwright test")"#
                .to_string(),
        });
    }

    match ci_config {
        None => issues.push(CiFinding {
            kind: CiFindingKind::MissingCiConfig,
            severity: Severity::Critical,
            description: "No CI configuration found".to_string(),
            fix: "Add GitHub Actions workflow file (e.g., .github/workflows/test.yml)".to_string(),
        }),
        Some(details) => {
            if !details.has_e2e_tests {
                recommendations.push("Consider adding e2e tests to CI pipeline".to_string());
            }
            if !details.runs_on_pr {
                recommendations.push("Consider running tests on pull requests".to_string());
            }
            if !details.runs_on_push {
                recommendations.push("Consider running tests on push to main branch".to_string());
            }
        }
    }

    match probe {
        FailureProbe::NotBlocking => issues.push(CiFinding {
            kind: CiFindingKind::CiNotBlocking,
            severity: Severity::Critical,
            description: "Test failures do not appear to block deployment".to_string(),
            fix: "Ensure CI configuration properly fails when tests fail, and that failing CI blocks deployment".to_string(),
        }),
        FailureProbe::Skipped => recommendations.push(
            "Failure-blocking probe skipped; run without --skip-failure-probe to verify that failing tests block the pipeline"
                .to_string(),
        ),
        FailureProbe::Blocking => {}
    }

    if !test_commands.is_empty() && ci_config.is_some() && probe.is_blocking() {
        recommendations.push("CI configuration appears to be working correctly!".to_string());
    }

    let has = |name: &str| test_commands.iter().any(|c| c == name);
    if has("test:e2e") && has("test:coverage") {
        recommendations.push("Good test coverage setup detected".to_string());
    }

    (issues, recommendations)
}

/// Validate the CI setup of the project at `layout.root`.
///
/// A missing or malformed manifest is fatal. The failure probe never is.
pub async fn validate_ci<R: CommandRunner>(
    layout: &ProjectLayout,
    config: &CiConfig,
    runner: &R,
) -> Result<CiValidationResult> {
    if !io::file_exists(&layout.manifest) {
        return Err(Error::MissingManifest {
            path: layout.manifest.clone(),
        });
    }
    let manifest = io::read_file(&layout.manifest)?;
    let test_commands =
        extract_test_commands(&manifest).map_err(|source| Error::InvalidManifest {
            path: layout.manifest.clone(),
            source,
        })?;
    log::debug!("Found test commands: {:?}", test_commands);

    let ci_config = find_ci_config(&layout.root, &config.config_candidates)?;

    let probe = if config.failure_probe {
        log::info!("Testing failure blocking behavior");
        FailureProbe::from_blocking(probe_failure_blocking(runner, config, &layout.root).await)
    } else {
        log::info!("Failure-blocking probe disabled");
        FailureProbe::Skipped
    };

    let (issues, recommendations) = synthesize_findings(&test_commands, ci_config.as_ref(), probe);

    Ok(CiValidationResult {
        test_commands_found: test_commands,
        ci_configuration_found: ci_config.is_some(),
        ci_config_path: ci_config.map(|details| details.path),
        test_failure_blocking: probe.is_blocking(),
        recommendations,
        issues,
    })
}
