use crate::ci::{self, CommandRunner, ShellRunner};
use crate::cli::{Cli, Selection};
use crate::config::{self, ProjectLayout, TestalignConfig, BASE_URL_ENV};
use crate::content::{self, BrowserDriver, PlaywrightDriver};
use crate::core::ValidationReport;
use crate::formatting::{FormattingConfig, Palette};
use crate::io::{self, JsonWriter, OutputWriter, TerminalWriter};
use crate::report::{self, ReportOptions};
use crate::routes;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub selection: Selection,
    pub silent: bool,
    pub output: Option<PathBuf>,
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub skip_failure_probe: bool,
    pub plain: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            selection: Selection::ALL,
            silent: false,
            output: None,
            root: PathBuf::from("."),
            config: None,
            base_url: None,
            skip_failure_probe: false,
            plain: false,
        }
    }
}

impl From<&Cli> for ValidationOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            selection: cli.selection(),
            silent: cli.silent,
            output: cli.output.clone(),
            root: cli.root.clone(),
            config: cli.config.clone(),
            base_url: cli.base_url.clone(),
            skip_failure_probe: cli.skip_failure_probe,
            plain: cli.plain,
        }
    }
}

/// Project layout plus the effective configuration after overrides.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub layout: ProjectLayout,
    pub config: TestalignConfig,
}

/// Load configuration and apply overrides: environment, then flags.
pub fn resolve_context(options: &ValidationOptions) -> Result<ValidationContext> {
    let root = std::fs::canonicalize(&options.root).unwrap_or_else(|_| options.root.clone());

    let mut config = match &options.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(&root)?,
    };

    config.content = config
        .content
        .with_base_url_override(std::env::var(BASE_URL_ENV).ok())
        .with_base_url_override(options.base_url.clone());
    if options.skip_failure_probe {
        config.ci.failure_probe = false;
    }

    let layout = ProjectLayout::new(&root, &config.paths);
    log::debug!("Validating project at {}", layout.root.display());
    Ok(ValidationContext { layout, config })
}

/// Console narration, muted by `--silent`.
struct Narrator {
    silent: bool,
    palette: Palette,
}

impl Narrator {
    fn say(&self, line: impl AsRef<str>) {
        if !self.silent {
            println!("{}", line.as_ref());
        }
    }

    fn step(&self, emoji: &str, title: &str) {
        self.say(format!("{} {}", self.palette.emoji(emoji), title));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Run the selected validators in sequence and build the report.
///
/// Validators that are not selected contribute an empty result. Any
/// validator error aborts the run.
pub async fn run_pipeline<D: BrowserDriver, R: CommandRunner>(
    selection: Selection,
    context: &ValidationContext,
    driver: &D,
    runner: &R,
    silent: bool,
) -> Result<ValidationReport> {
    let palette = if silent {
        Palette::plain()
    } else {
        Palette::new(FormattingConfig::from_env())
    };
    run_pipeline_narrated(
        selection,
        context,
        driver,
        runner,
        &Narrator { silent, palette },
    )
    .await
}

async fn run_pipeline_narrated<D: BrowserDriver, R: CommandRunner>(
    selection: Selection,
    context: &ValidationContext,
    driver: &D,
    runner: &R,
    narrator: &Narrator,
) -> Result<ValidationReport> {
    let layout = &context.layout;

    let route_result = if selection.routes {
        narrator.step("🛣️", "Validating routes...");
        let result = routes::validate_routes(layout)?;
        narrator.say(format!("   Found {} app routes", result.app_routes.len()));
        narrator.say(format!(
            "   Found {} test route expectations",
            result.test_expectations.len()
        ));
        narrator.say(format!("   Identified {} mismatches\n", result.mismatches.len()));
        result
    } else {
        Default::default()
    };

    let content_result = if selection.content {
        narrator.step("📝", "Validating content...");
        let result = content::validate_content(layout, &context.config.content, driver).await?;
        narrator.say(format!("   Found {} content assertions", result.assertions.len()));
        narrator.say(format!(
            "   Extracted content from {} routes",
            result.routes_sampled()
        ));
        narrator.say(format!("   Identified {} mismatches\n", result.mismatches.len()));
        result
    } else {
        Default::default()
    };

    let ci_result = if selection.ci {
        narrator.step("⚙️", "Validating CI configuration...");
        let result = ci::validate_ci(layout, &context.config.ci, runner).await?;
        narrator.say(format!(
            "   Found {} test commands",
            result.test_commands_found.len()
        ));
        narrator.say(format!(
            "   CI configuration found: {}",
            yes_no(result.ci_configuration_found)
        ));
        narrator.say(format!(
            "   Test failure blocking: {}",
            yes_no(result.test_failure_blocking)
        ));
        narrator.say(format!("   Identified {} issues\n", result.issues.len()));
        result
    } else {
        Default::default()
    };

    Ok(report::generate_report_with(
        route_result,
        content_result,
        ci_result,
        &ReportOptions {
            tests_dir: layout.tests_dir_display(),
        },
    ))
}

fn save_report(report: &ValidationReport, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        io::ensure_dir(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    JsonWriter::new(file).write_report(report)
}

/// Full validation run: resolve configuration, run the pipeline with the
/// real browser and shell, print and optionally save the report.
///
/// The caller maps the returned report to the process exit code.
pub async fn run_validation(options: &ValidationOptions) -> Result<ValidationReport> {
    let start = Instant::now();
    let formatting = FormattingConfig::resolve(options.plain);
    let narrator = Narrator {
        silent: options.silent,
        palette: Palette::install(formatting),
    };

    narrator.step("🔍", "Starting Test-Implementation Validation...\n");

    let context = resolve_context(options)?;
    let driver = PlaywrightDriver::new(context.config.content.node.clone(), &context.layout.root);
    let report = run_pipeline_narrated(
        options.selection,
        &context,
        &driver,
        &ShellRunner,
        &narrator,
    )
    .await?;

    if !options.silent {
        TerminalWriter::stdout(formatting).write_report(&report)?;
    }

    if let Some(path) = &options.output {
        save_report(&report, path)?;
        narrator.step("📄", &format!("Report saved to: {}", path.display()));
    }

    narrator.step(
        "⏱️",
        &format!("Validation completed in {}ms", start.elapsed().as_millis()),
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::{ProbeCommand, RunOutput};
    use crate::content::browser::fake::FakeBrowser;
    use crate::content::ElementProbe;
    use crate::core::OverallStatus;
    use indoc::indoc;
    use tempfile::TempDir;

    struct ExitingRunner(bool);

    impl CommandRunner for ExitingRunner {
        async fn run(&self, _command: &ProbeCommand) -> crate::errors::Result<RunOutput> {
            Ok(RunOutput {
                exit_code: Some(if self.0 { 0 } else { 1 }),
                success: self.0,
                duration_ms: 1,
            })
        }
    }

    fn write(root: &std::path::Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/App.tsx",
            indoc! {r#"
                <Route path="/" element={<HomePage />} />
                <Route path="/about" element={<AboutPage />} />
            "#},
        );
        write(
            dir.path(),
            "tests/e2e/homepage.spec.ts",
            indoc! {r#"
                test('hero', async ({ page }) => {
                  await page.goto('/');
                  await expect(page.locator('h1')).toContainText('Consulting');
                  await page.goto('/about');
                });
            "#},
        );
        write(
            dir.path(),
            "package.json",
            r#"{"scripts":{"test:e2e":"playwright test"}}"#,
        );
        write(
            dir.path(),
            ".github/workflows/test.yml",
            "on: [push, pull_request]\nrun: npm run test:e2e\n",
        );
        dir
    }

    fn context(dir: &TempDir) -> ValidationContext {
        resolve_context(&ValidationOptions {
            root: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_skip_failure_probe_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let context = resolve_context(&ValidationOptions {
            root: dir.path().to_path_buf(),
            skip_failure_probe: true,
            base_url: Some("http://localhost:4173".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(!context.config.ci.failure_probe);
        assert_eq!(context.config.content.base_url, "http://localhost:4173");
    }

    #[tokio::test]
    async fn test_pipeline_healthy_project_passes() {
        let dir = project();
        let browser = FakeBrowser::default().with_element(
            "/",
            "h1",
            ElementProbe {
                exists: true,
                visible: true,
                text: "AI Consulting".to_string(),
            },
        );

        let report = run_pipeline(
            Selection::ALL,
            &context(&dir),
            &browser,
            &ExitingRunner(false),
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.summary.overall_status, OverallStatus::Pass);
        assert_eq!(report.content.passed_assertions.len(), 1);
        assert!(report.ci.test_failure_blocking);
        assert_eq!(browser.closes(), 1);
        assert!(!dir.path().join("temp-validation-test.js").exists());
    }

    #[tokio::test]
    async fn test_pipeline_skipped_validators_use_empty_results() {
        let dir = project();
        let browser = FakeBrowser::default();
        let report = run_pipeline(
            Selection::from_flags(true, false, false),
            &context(&dir),
            &browser,
            &ExitingRunner(true),
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.summary.routes_validated, 2);
        assert!(report.content.assertions.is_empty());
        assert!(report.ci.test_commands_found.is_empty());
        assert_eq!(browser.launches(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_not_blocking_ci_fails() {
        let dir = project();
        let report = run_pipeline(
            Selection::from_flags(false, false, true),
            &context(&dir),
            &FakeBrowser::default(),
            &ExitingRunner(true),
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.summary.overall_status, OverallStatus::Fail);
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_content_action_items_use_project_relative_tests_dir() {
        let dir = project();
        let report = run_pipeline(
            Selection::from_flags(false, true, false),
            &context(&dir),
            &FakeBrowser::default(),
            &ExitingRunner(false),
            true,
        )
        .await
        .unwrap();

        assert_eq!(report.action_items.len(), 1);
        assert_eq!(report.action_items[0].files, vec!["tests/e2e/homepage.spec.ts"]);
    }

    #[tokio::test]
    async fn test_pipeline_missing_routes_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = run_pipeline(
            Selection::ALL,
            &context(&dir),
            &FakeBrowser::default(),
            &ExitingRunner(false),
            true,
        )
        .await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Routes file not found"));
    }

    #[test]
    fn test_save_report_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/nested/alignment.json");
        let report = report::generate_report(
            Default::default(),
            Default::default(),
            Default::default(),
        );
        save_report(&report, &path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["summary"]["overallStatus"], "PASS");
    }
}
