//! Route alignment between declared application routes and e2e tests.
//!
//! The declared side comes from the route-declaration source (one
//! `<Route path=... element={<X />} />` per line). The expected side comes
//! from `page.goto(...)` and `expect(page).toHaveURL(...)` calls in the test
//! files. Any expected route that is not declared verbatim becomes a
//! [`RouteMismatch`]: `Critical` when a declared route is equal after
//! normalization (a likely typo), `Warning` otherwise.

use crate::config::ProjectLayout;
use crate::core::{
    AppRoute, ExpectationKind, RouteMismatch, RouteValidationResult, Severity,
    TestRouteExpectation,
};
use crate::errors::{Error, Result};
use crate::extraction;
use crate::io::{self, find_test_files};
use std::collections::HashSet;

/// The catch-all route; never reported as untested.
pub const WILDCARD_ROUTE: &str = "*";

/// Extract every route declaration in source order.
pub fn extract_app_routes(source: &str) -> Vec<AppRoute> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            extraction::match_route_declaration(line).map(|decl| AppRoute {
                path: decl.path,
                component: decl.component,
                line: index + 1,
            })
        })
        .collect()
}

/// Extract route expectations from one test file.
///
/// A single line can yield more than one expectation, e.g. a navigation
/// followed by a URL assertion.
pub fn extract_test_route_expectations(file: &str, content: &str) -> Vec<TestRouteExpectation> {
    let mut expectations = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let found = [
            (extraction::match_navigation(line), ExpectationKind::Navigation),
            (extraction::match_url_pattern(line), ExpectationKind::UrlAssertion),
            (extraction::match_url_literal(line), ExpectationKind::UrlAssertion),
        ];

        for (route, kind) in found {
            if let Some(expected_route) = route {
                expectations.push(TestRouteExpectation {
                    file: file.to_string(),
                    line: index + 1,
                    expected_route,
                    kind,
                    context: line.trim().to_string(),
                });
            }
        }
    }

    expectations
}

/// Lower-case and drop `-`/`_`, so `/model-advisor` and `/modeladvisor`
/// compare equal.
pub fn normalize_route(path: &str) -> String {
    path.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn unique_in_order<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    paths.filter(|p| seen.insert(*p)).collect()
}

/// Build a mismatch for an expected route that is not declared verbatim.
pub fn classify_mismatch(
    expected_route: &str,
    app_route_paths: &[&str],
    expectations: &[TestRouteExpectation],
) -> RouteMismatch {
    let normalized = normalize_route(expected_route);
    let similar: Vec<String> = app_route_paths
        .iter()
        .filter(|path| normalize_route(path) == normalized)
        .map(|path| path.to_string())
        .collect();

    let test_files = expectations
        .iter()
        .filter(|e| e.expected_route == expected_route)
        .map(TestRouteExpectation::location)
        .collect();

    let (actual_routes, severity) = if similar.is_empty() {
        (
            app_route_paths.iter().map(|p| p.to_string()).collect(),
            Severity::Warning,
        )
    } else {
        (similar, Severity::Critical)
    };

    RouteMismatch {
        expected_route: expected_route.to_string(),
        actual_routes,
        test_files,
        severity,
    }
}

/// Compare declared routes against test expectations. Pure; the output
/// depends only on the inputs and their order.
pub fn compare_routes(
    app_routes: Vec<AppRoute>,
    test_expectations: Vec<TestRouteExpectation>,
) -> RouteValidationResult {
    let app_route_paths = unique_in_order(app_routes.iter().map(|r| r.path.as_str()));
    let test_route_paths =
        unique_in_order(test_expectations.iter().map(|e| e.expected_route.as_str()));

    let declared: HashSet<&str> = app_route_paths.iter().copied().collect();
    let referenced: HashSet<&str> = test_route_paths.iter().copied().collect();

    let undocumented_expectations: Vec<String> = test_route_paths
        .iter()
        .filter(|route| !declared.contains(*route))
        .map(|route| route.to_string())
        .collect();

    let mismatches: Vec<RouteMismatch> = undocumented_expectations
        .iter()
        .map(|route| classify_mismatch(route, &app_route_paths, &test_expectations))
        .collect();

    let unused_routes: Vec<String> = app_route_paths
        .iter()
        .filter(|route| **route != WILDCARD_ROUTE && !referenced.contains(*route))
        .map(|route| route.to_string())
        .collect();

    RouteValidationResult {
        app_routes,
        test_expectations,
        mismatches,
        unused_routes,
        undocumented_expectations,
    }
}

/// Read the routes file and the test corpus, then compare them.
///
/// A missing routes file or test directory is fatal: no partial result is
/// returned.
pub fn validate_routes(layout: &ProjectLayout) -> Result<RouteValidationResult> {
    if !io::file_exists(&layout.routes_file) {
        return Err(Error::MissingRoutesFile {
            path: layout.routes_file.clone(),
        });
    }

    let source = io::read_file(&layout.routes_file)?;
    let app_routes = extract_app_routes(&source);
    log::debug!(
        "Extracted {} routes from {}",
        app_routes.len(),
        layout.routes_file.display()
    );

    let mut expectations = Vec::new();
    for test_file in find_test_files(&layout.tests_dir, &layout.test_suffix)? {
        let content = test_file.read()?;
        expectations.extend(extract_test_route_expectations(&test_file.name, &content));
    }
    log::debug!("Extracted {} route expectations", expectations.len());

    let result = compare_routes(app_routes, expectations);
    for mismatch in &result.mismatches {
        log::info!(
            "Route mismatch ({}): '{}' -> {:?}",
            mismatch.severity,
            mismatch.expected_route,
            mismatch.actual_routes
        );
    }
    Ok(result)
}
