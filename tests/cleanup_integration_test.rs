//! Resource release on every exit path: the browser session is always
//! closed and the temporary failing test never remains on disk.

mod common;

use common::drifted_site;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use testalign::ci::{ProbeCommand, RunOutput};
use testalign::config::{CiConfig, ContentConfig};
use testalign::content::ElementProbe;
use testalign::{
    validate_ci, validate_content, BrowserDriver, BrowserSession, CommandRunner, ContentIssue,
    Error, Result,
};

/// Browser whose navigations either all fail or all serve one heading.
#[derive(Clone, Default)]
struct CountingBrowser {
    fail_navigation: bool,
    heading: String,
    closes: Arc<AtomicUsize>,
}

struct CountingSession {
    browser: CountingBrowser,
    route: String,
}

impl BrowserDriver for CountingBrowser {
    type Session = CountingSession;

    async fn launch(&self) -> Result<CountingSession> {
        Ok(CountingSession {
            browser: self.clone(),
            route: String::new(),
        })
    }
}

impl BrowserSession for CountingSession {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        if self.browser.fail_navigation {
            return Err(Error::browser(format!("Timeout 10000ms exceeded at {url}")));
        }
        self.route = url.to_string();
        Ok(())
    }

    async fn probe(&mut self, selector: &str) -> Result<ElementProbe> {
        if selector == "h1" && self.route.ends_with('/') {
            Ok(ElementProbe {
                exists: true,
                visible: true,
                text: self.browser.heading.clone(),
            })
        } else {
            Ok(ElementProbe::default())
        }
    }

    async fn close(self) -> Result<()> {
        self.browser.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_browser_closed_when_every_navigation_fails() {
    let project = drifted_site();
    let browser = CountingBrowser {
        fail_navigation: true,
        ..Default::default()
    };

    let result = validate_content(&project.layout(), &ContentConfig::default(), &browser)
        .await
        .unwrap();

    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
    assert!(result.actual_content.is_empty());
    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].issue, ContentIssue::ElementNotFound);
}

#[tokio::test]
async fn test_contains_text_passes_against_rendered_heading() {
    let project = drifted_site();
    let browser = CountingBrowser {
        heading: "  AI Consulting\n  That Pays ".to_string(),
        ..Default::default()
    };

    let result = validate_content(&project.layout(), &ContentConfig::default(), &browser)
        .await
        .unwrap();

    assert_eq!(browser.closes.load(Ordering::SeqCst), 1);
    assert_eq!(result.passed_assertions.len(), 1);
    assert!(result.mismatches.is_empty());
}

#[tokio::test]
async fn test_text_mismatch_quotes_actual_text() {
    let project = drifted_site();
    let browser = CountingBrowser {
        heading: "Welcome to the Lab".to_string(),
        ..Default::default()
    };

    let result = validate_content(&project.layout(), &ContentConfig::default(), &browser)
        .await
        .unwrap();

    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].issue, ContentIssue::TextMismatch);
    assert!(result.mismatches[0].suggestion.contains("Welcome to the Lab"));
}

/// Runner that fails in the harness itself rather than in the test.
struct BrokenRunner {
    calls: AtomicUsize,
}

impl CommandRunner for BrokenRunner {
    async fn run(&self, command: &ProbeCommand) -> Result<RunOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let probe = command.working_dir.join(command.args.last().unwrap());
        assert!(probe.exists(), "probe file must exist while the runner runs");
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "npm: command not found",
        )))
    }
}

#[tokio::test]
async fn test_probe_file_removed_when_runner_errors() {
    let project = drifted_site();
    let runner = BrokenRunner {
        calls: AtomicUsize::new(0),
    };

    let result = validate_ci(&project.layout(), &CiConfig::default(), &runner)
        .await
        .unwrap();

    assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    assert!(!project.path("temp-validation-test.js").exists());
    assert!(!result.test_failure_blocking);
    assert_eq!(result.test_commands_found, vec!["test:e2e"]);
    assert!(!result.ci_configuration_found);
}

#[tokio::test]
async fn test_disabled_probe_never_runs() {
    let project = drifted_site();
    let runner = BrokenRunner {
        calls: AtomicUsize::new(0),
    };
    let config = CiConfig {
        failure_probe: false,
        ..CiConfig::default()
    };

    let result = validate_ci(&project.layout(), &config, &runner).await.unwrap();

    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    assert!(!result.test_failure_blocking);
    assert!(result
        .issues
        .iter()
        .all(|issue| issue.kind != testalign::CiFindingKind::CiNotBlocking));
}
