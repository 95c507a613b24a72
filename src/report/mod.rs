//! Report generator.
//!
//! Aggregates the three validator results into a [`ValidationReport`]:
//! summary counters, a pass/warning/fail verdict, priority-sorted action
//! items and free-form recommendations. Pure and synchronous.

use crate::core::{
    ActionCategory, ActionItem, CiValidationResult, ContentValidationResult, OverallStatus,
    Priority, ReportSummary, RouteValidationResult, Severity, ValidationReport,
};

/// Route expectation count above which documentation is suggested.
const EXPECTATION_DOCS_THRESHOLD: usize = 10;

/// Presentation details that are not part of the validator results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Tests directory relative to the project root, used in content action items
    pub tests_dir: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tests_dir: "tests/e2e".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IssueCounts {
    total: usize,
    critical: usize,
}

impl IssueCounts {
    fn add<'a>(&mut self, severities: impl Iterator<Item = &'a Severity>) {
        for severity in severities {
            self.total += 1;
            if severity.is_critical() {
                self.critical += 1;
            }
        }
    }

    fn warnings(&self) -> usize {
        self.total - self.critical
    }
}

/// Critical dominates; only the absence of any issue passes.
pub fn overall_status(critical_issues: usize, warning_issues: usize) -> OverallStatus {
    if critical_issues > 0 {
        OverallStatus::Fail
    } else if warning_issues > 0 {
        OverallStatus::Warning
    } else {
        OverallStatus::Pass
    }
}

pub fn generate_report(
    routes: RouteValidationResult,
    content: ContentValidationResult,
    ci: CiValidationResult,
) -> ValidationReport {
    generate_report_with(routes, content, ci, &ReportOptions::default())
}

pub fn generate_report_with(
    routes: RouteValidationResult,
    content: ContentValidationResult,
    ci: CiValidationResult,
    options: &ReportOptions,
) -> ValidationReport {
    let mut counts = IssueCounts::default();
    counts.add(routes.mismatches.iter().map(|m| &m.severity));
    counts.add(content.mismatches.iter().map(|m| &m.severity));
    counts.add(ci.issues.iter().map(|i| &i.severity));

    let summary = ReportSummary {
        total_issues: counts.total,
        critical_issues: counts.critical,
        warning_issues: counts.warnings(),
        tests_validated: routes.test_expectations.len() + content.assertions.len(),
        routes_validated: routes.app_routes.len(),
        content_assertions_validated: content.assertions.len(),
        overall_status: overall_status(counts.critical, counts.warnings()),
    };

    let action_items = build_action_items(&routes, &content, &ci, options);
    let recommendations = build_recommendations(&routes, &content, &ci);

    ValidationReport {
        summary,
        routes,
        content,
        ci,
        recommendations,
        action_items,
    }
}

fn route_fix(expected: &str, candidates: &[String]) -> String {
    match candidates {
        [only] => format!("Update test files to use '{}' instead of '{}'", only, expected),
        _ => format!(
            "Choose correct route from: {} and update tests",
            candidates.join(", ")
        ),
    }
}

fn build_action_items(
    routes: &RouteValidationResult,
    content: &ContentValidationResult,
    ci: &CiValidationResult,
    options: &ReportOptions,
) -> Vec<ActionItem> {
    let route_items = routes.mismatches.iter().map(|mismatch| ActionItem {
        priority: Priority::for_severity(mismatch.severity),
        category: ActionCategory::Routes,
        description: format!(
            "Route mismatch: Tests expect '{}' but app defines {}",
            mismatch.expected_route,
            mismatch.actual_routes.join(", ")
        ),
        fix: route_fix(&mismatch.expected_route, &mismatch.actual_routes),
        files: mismatch.test_files.clone(),
    });

    let content_items = content.mismatches.iter().map(|mismatch| ActionItem {
        priority: Priority::for_severity(mismatch.severity),
        category: ActionCategory::Content,
        description: format!(
            "Content assertion failure in {}:{}",
            mismatch.assertion.file, mismatch.assertion.line
        ),
        fix: if mismatch.suggestion.is_empty() {
            "Review and update test assertion".to_string()
        } else {
            mismatch.suggestion.clone()
        },
        files: vec![format!(
            "{}/{}",
            options.tests_dir.trim_end_matches('/'),
            mismatch.assertion.file
        )],
    });

    let ci_items = ci.issues.iter().map(|issue| ActionItem {
        priority: Priority::for_severity(issue.severity),
        category: ActionCategory::Ci,
        description: issue.description.clone(),
        fix: issue.fix.clone(),
        files: Vec::new(),
    });

    let mut items: Vec<ActionItem> = route_items.chain(content_items).chain(ci_items).collect();
    // stable: items of equal priority keep route, content, ci order
    items.sort_by_key(|item| item.priority);
    items
}

fn build_recommendations(
    routes: &RouteValidationResult,
    content: &ContentValidationResult,
    ci: &CiValidationResult,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !routes.unused_routes.is_empty() {
        recommendations.push(format!(
            "Consider adding tests for unused routes: {}",
            routes.unused_routes.join(", ")
        ));
    }
    if routes.mismatches.is_empty() {
        recommendations.push("All route tests are correctly aligned with app routes".to_string());
    }

    if !content.passed_assertions.is_empty() {
        recommendations.push(format!(
            "{} content assertions are passing correctly",
            content.passed_assertions.len()
        ));
    }
    if content.mismatches.is_empty() {
        recommendations
            .push("All content assertions are correctly aligned with app content".to_string());
    }

    recommendations.extend(ci.recommendations.iter().cloned());

    if routes.mismatches.is_empty() && content.mismatches.is_empty() {
        recommendations.push(
            "Consider integrating this validation script into CI to prevent future drift"
                .to_string(),
        );
    }
    if routes.test_expectations.len() > EXPECTATION_DOCS_THRESHOLD {
        recommendations.push(
            "Consider organizing test expectations documentation for better maintainability"
                .to_string(),
        );
    }

    recommendations
}
