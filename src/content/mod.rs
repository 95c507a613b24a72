//! Content alignment between e2e text/visibility assertions and the DOM the
//! running application actually renders.
//!
//! Every assertion in a test file is attributed to a single route: the first
//! `page.goto(...)` in that file, or a route inferred from the file name.
//! A file that exercises several routes therefore has all of its assertions
//! checked against one of them. This keeps attribution predictable and is
//! intentional.

pub mod browser;
pub mod playwright;

pub use browser::{
    capture_actual_content, normalize_text, BrowserDriver, BrowserSession, CaptureOptions,
    ElementProbe,
};
pub use playwright::{PlaywrightDriver, PlaywrightSession};

use crate::config::{ContentConfig, ProjectLayout, RouteHint};
use crate::core::{
    ActualContentSample, AssertionKind, ContentAssertion, ContentIssue, ContentMismatch,
    ContentValidationResult, Severity,
};
use crate::errors::Result;
use crate::extraction;
use crate::io::find_test_files;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Longest excerpt of actual text quoted in a suggestion.
pub const EXCERPT_CHARS: usize = 100;

/// Extract content assertions from one test file.
pub fn extract_content_assertions(file: &str, content: &str) -> Vec<ContentAssertion> {
    let mut assertions = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let mut push = |selector: String, expected_text: String, kind: AssertionKind| {
            assertions.push(ContentAssertion {
                file: file.to_string(),
                line: index + 1,
                selector,
                expected_text,
                kind,
                context: line.trim().to_string(),
            });
        };

        if let Some(found) = extraction::match_contains_text(line) {
            push(found.selector, found.text, AssertionKind::ContainsText);
        }
        if let Some(found) = extraction::match_exact_text(line) {
            push(found.selector, found.text, AssertionKind::ExactText);
        }
        if let Some(selector) = extraction::match_visible(line) {
            push(selector, String::new(), AssertionKind::Visible);
        }
    }

    assertions
}

/// Route a test file exercises: its first navigation, else the first hint
/// whose keyword appears in the file name, else `default_route`.
pub fn attribute_route(
    file_name: &str,
    content: &str,
    hints: &[RouteHint],
    default_route: &str,
) -> String {
    if let Some(route) = extraction::first_navigation(content) {
        return route;
    }

    hints
        .iter()
        .find(|hint| file_name.contains(hint.keyword.as_str()))
        .map(|hint| hint.route.clone())
        .unwrap_or_else(|| default_route.to_string())
}

/// Prefix of `text` holding at most `max_chars` characters.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Outcome of checking a single assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionOutcome {
    Passed,
    Mismatch(ContentMismatch),
}

/// Check one assertion against the sample captured for its route and
/// selector.
pub fn check_assertion(
    assertion: &ContentAssertion,
    route: &str,
    sample: Option<&ActualContentSample>,
) -> AssertionOutcome {
    let mismatch = |issue: ContentIssue, suggestion: String| {
        AssertionOutcome::Mismatch(ContentMismatch {
            assertion: assertion.clone(),
            route: route.to_string(),
            actual_content: sample.cloned(),
            issue,
            severity: Severity::Critical,
            suggestion,
        })
    };

    let sample = match sample {
        Some(sample) if sample.exists => sample,
        _ => {
            return mismatch(
                ContentIssue::ElementNotFound,
                format!(
                    "Element with selector '{}' not found on route '{}'",
                    assertion.selector, route
                ),
            )
        }
    };

    let expected = assertion.expected_text.as_str();
    match assertion.kind {
        AssertionKind::Visible if !sample.visible => mismatch(
            ContentIssue::NotVisible,
            format!(
                "Element '{}' exists but is not visible on route '{}'",
                assertion.selector, route
            ),
        ),
        AssertionKind::ContainsText if !expected.is_empty() && !sample.text.contains(expected) => {
            mismatch(
                ContentIssue::TextMismatch,
                format!(
                    "Expected text '{}' not found in '{}...'",
                    expected,
                    excerpt(&sample.text, EXCERPT_CHARS)
                ),
            )
        }
        AssertionKind::ExactText if !expected.is_empty() && sample.text != expected => mismatch(
            ContentIssue::TextMismatch,
            format!(
                "Expected exact text '{}' but found '{}'",
                expected, sample.text
            ),
        ),
        _ => AssertionOutcome::Passed,
    }
}

/// Compare every assertion against the captured samples. `routes_by_file`
/// maps a test file name to its attributed route.
pub fn compare_content(
    assertions: Vec<ContentAssertion>,
    routes_by_file: &HashMap<String, String>,
    actual_content: Vec<ActualContentSample>,
    default_route: &str,
) -> ContentValidationResult {
    let mut index: HashMap<(&str, &str), &ActualContentSample> = HashMap::new();
    for sample in &actual_content {
        index
            .entry((sample.route.as_str(), sample.selector.as_str()))
            .or_insert(sample);
    }

    let mut mismatches = Vec::new();
    let mut passed_assertions = Vec::new();

    for assertion in &assertions {
        let route = routes_by_file
            .get(&assertion.file)
            .map(String::as_str)
            .unwrap_or(default_route);
        let sample = index.get(&(route, assertion.selector.as_str())).copied();

        match check_assertion(assertion, route, sample) {
            AssertionOutcome::Passed => passed_assertions.push(assertion.clone()),
            AssertionOutcome::Mismatch(mismatch) => mismatches.push(mismatch),
        }
    }

    ContentValidationResult {
        assertions,
        actual_content,
        mismatches,
        passed_assertions,
    }
}

/// Distinct attributed routes, in order of first assertion.
pub fn routes_to_sample(
    assertions: &[ContentAssertion],
    routes_by_file: &HashMap<String, String>,
    default_route: &str,
) -> Vec<String> {
    let mut seen = HashSet::new();
    assertions
        .iter()
        .map(|a| {
            routes_by_file
                .get(&a.file)
                .map(String::as_str)
                .unwrap_or(default_route)
        })
        .filter(|route| seen.insert(*route))
        .map(str::to_string)
        .collect()
}

/// Extract assertions, capture the rendered content of every attributed
/// route with one browser session, and compare.
///
/// A missing test directory or a browser that cannot be launched is fatal.
/// When no assertions exist the browser is never started.
pub async fn validate_content<D: BrowserDriver>(
    layout: &ProjectLayout,
    config: &ContentConfig,
    driver: &D,
) -> Result<ContentValidationResult> {
    let mut assertions = Vec::new();
    let mut routes_by_file = HashMap::new();

    for test_file in find_test_files(&layout.tests_dir, &layout.test_suffix)? {
        let content = test_file.read()?;
        let found = extract_content_assertions(&test_file.name, &content);
        if found.is_empty() {
            continue;
        }
        let route = attribute_route(
            &test_file.name,
            &content,
            &config.route_hints,
            &config.default_route,
        );
        log::debug!(
            "{}: {} assertions attributed to {}",
            test_file.name,
            found.len(),
            route
        );
        routes_by_file.insert(test_file.name.clone(), route);
        assertions.extend(found);
    }

    let routes = routes_to_sample(&assertions, &routes_by_file, &config.default_route);
    let actual_content = if routes.is_empty() {
        Vec::new()
    } else {
        log::info!("Extracting content from {} routes", routes.len());
        let options = CaptureOptions {
            base_url: &config.base_url,
            selectors: &config.selectors,
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
        };
        capture_actual_content(driver, &routes, &options).await?
    };

    Ok(compare_content(
        assertions,
        &routes_by_file,
        actual_content,
        &config.default_route,
    ))
}
