//! Data model shared by the validators and the report generator.
//!
//! Every value here is created within a single validation run and owned by
//! it. Nothing is persisted between runs; equality is structural. Field names
//! serialize in camelCase so a report written with `--output` keeps the same
//! JSON shape the e2e tooling already consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How confident the validator is that a discrepancy has a known fix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Actionable: a likely-correct fix was identified
    Critical,
    /// Noted, but no confident remediation could be inferred
    Warning,
}

impl Severity {
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One statically declared route-to-component binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoute {
    pub path: String,
    pub component: String,
    pub line: usize,
}

/// Syntactic form a route expectation was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectationKind {
    /// `page.goto('/path')`
    #[serde(rename = "goto")]
    Navigation,
    /// `expect(page).toHaveURL(...)`
    #[serde(rename = "expectURL")]
    UrlAssertion,
}

/// One occurrence of test code that navigates to or asserts on a path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRouteExpectation {
    pub file: String,
    pub line: usize,
    pub expected_route: String,
    #[serde(rename = "type")]
    pub kind: ExpectationKind,
    pub context: String,
}

impl TestRouteExpectation {
    /// `file:line` location used in reports.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// A route tests expect that the application does not declare verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMismatch {
    pub expected_route: String,
    /// Fuzzy-matched candidates, or every declared route when none matched
    pub actual_routes: Vec<String>,
    /// `file:line` of every expectation referencing the route
    pub test_files: Vec<String>,
    pub severity: Severity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteValidationResult {
    pub app_routes: Vec<AppRoute>,
    pub test_expectations: Vec<TestRouteExpectation>,
    pub mismatches: Vec<RouteMismatch>,
    pub unused_routes: Vec<String>,
    pub undocumented_expectations: Vec<String>,
}

/// Shape of a content assertion against `page.locator(selector)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionKind {
    #[serde(rename = "toContainText")]
    ContainsText,
    #[serde(rename = "toHaveText")]
    ExactText,
    #[serde(rename = "toBeVisible")]
    Visible,
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ContainsText => "toContainText",
            Self::ExactText => "toHaveText",
            Self::Visible => "toBeVisible",
        };
        f.write_str(name)
    }
}

/// One text or visibility expectation extracted from test source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAssertion {
    pub file: String,
    pub line: usize,
    pub selector: String,
    /// Empty for visibility checks
    pub expected_text: String,
    #[serde(rename = "assertionType")]
    pub kind: AssertionKind,
    pub context: String,
}

/// One observed DOM fact for a `(route, selector)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualContentSample {
    pub route: String,
    pub selector: String,
    /// Whitespace-collapsed text; empty unless the element exists and is visible
    #[serde(rename = "actualText")]
    pub text: String,
    #[serde(rename = "isVisible")]
    pub visible: bool,
    pub exists: bool,
}

impl ActualContentSample {
    /// Sample recorded when an element lookup errored.
    pub fn missing(route: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            selector: selector.into(),
            text: String::new(),
            visible: false,
            exists: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentIssue {
    ElementNotFound,
    #[serde(rename = "element_not_visible")]
    NotVisible,
    TextMismatch,
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ElementNotFound => "element_not_found",
            Self::NotVisible => "element_not_visible",
            Self::TextMismatch => "text_mismatch",
        };
        f.write_str(name)
    }
}

/// A content assertion that the running application does not satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMismatch {
    pub assertion: ContentAssertion,
    /// Route the assertion was attributed to
    pub route: String,
    pub actual_content: Option<ActualContentSample>,
    pub issue: ContentIssue,
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentValidationResult {
    pub assertions: Vec<ContentAssertion>,
    pub actual_content: Vec<ActualContentSample>,
    pub mismatches: Vec<ContentMismatch>,
    pub passed_assertions: Vec<ContentAssertion>,
}

impl ContentValidationResult {
    /// Number of distinct routes content was captured from.
    pub fn routes_sampled(&self) -> usize {
        let mut routes: Vec<&str> = self.actual_content.iter().map(|s| s.route.as_str()).collect();
        routes.sort_unstable();
        routes.dedup();
        routes.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiFindingKind {
    MissingTestCommand,
    CiNotBlocking,
    MissingCiConfig,
}

/// A judgment about the CI pipeline's configuration or behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiFinding {
    #[serde(rename = "type")]
    pub kind: CiFindingKind,
    pub severity: Severity,
    pub description: String,
    pub fix: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiValidationResult {
    pub test_commands_found: Vec<String>,
    pub ci_configuration_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_config_path: Option<String>,
    pub test_failure_blocking: bool,
    pub recommendations: Vec<String>,
    pub issues: Vec<CiFinding>,
}

/// Action item urgency. Declaration order is sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Self::High,
            Severity::Warning => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        static DISPLAY_STRINGS: &[(Priority, &str)] = &[
            (Priority::High, "HIGH"),
            (Priority::Medium, "MEDIUM"),
            (Priority::Low, "LOW"),
        ];
        let label = DISPLAY_STRINGS
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or("UNKNOWN");
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Routes,
    Content,
    Ci,
    Process,
}

/// One file-scoped remediation instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub category: ActionCategory,
    pub description: String,
    pub fix: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Warning,
    Fail,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warning => write!(f, "WARNING"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub tests_validated: usize,
    pub routes_validated: usize,
    pub content_assertions_validated: usize,
    pub overall_status: OverallStatus,
}

/// Root aggregate of a validation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub routes: RouteValidationResult,
    pub content: ContentValidationResult,
    pub ci: CiValidationResult,
    pub recommendations: Vec<String>,
    pub action_items: Vec<ActionItem>,
}

impl ValidationReport {
    /// Process exit code for CI gating.
    pub fn exit_code(&self) -> i32 {
        if self.summary.critical_issues > 0 {
            1
        } else {
            0
        }
    }
}
