mod common;

use common::{drifted_site, FixtureProject, APP_ROUTES};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use testalign::routes::{classify_mismatch, extract_app_routes};
use testalign::{
    generate_report, normalize_route, validate_routes, CiValidationResult,
    ContentValidationResult, Error, OverallStatus, Severity,
};

#[test]
fn test_drifted_site_reports_one_critical_typo() {
    let project = drifted_site();
    let result = validate_routes(&project.layout()).unwrap();

    let paths: Vec<&str> = result.app_routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/about", "/contact", "/modeladvisor", "*"]);

    assert_eq!(result.mismatches.len(), 1);
    let mismatch = &result.mismatches[0];
    assert_eq!(mismatch.expected_route, "/model-advisor");
    assert_eq!(mismatch.actual_routes, vec!["/modeladvisor"]);
    assert_eq!(mismatch.severity, Severity::Critical);
    assert_eq!(mismatch.test_files, vec!["navigation.spec.ts:8"]);

    assert!(result.unused_routes.is_empty());
    assert_eq!(result.undocumented_expectations, vec!["/model-advisor"]);

    let report = generate_report(
        result,
        ContentValidationResult::default(),
        CiValidationResult::default(),
    );
    assert_eq!(report.summary.overall_status, OverallStatus::Fail);
    assert_eq!(report.summary.critical_issues, 1);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(
        report.action_items[0].fix,
        "Update test files to use '/modeladvisor' instead of '/model-advisor'"
    );
}

#[test]
fn test_route_validation_is_deterministic() {
    let project = drifted_site();
    let first = validate_routes(&project.layout()).unwrap();
    let second = validate_routes(&project.layout()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_route_is_a_warning_with_all_routes() {
    let project = FixtureProject::new()
        .with_file("src/App.tsx", APP_ROUTES)
        .with_file(
            "tests/e2e/pricing.spec.ts",
            "test('pricing', async ({ page }) => {\n  await page.goto('/pricing');\n});\n",
        );
    let result = validate_routes(&project.layout()).unwrap();

    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].severity, Severity::Warning);
    assert_eq!(
        result.mismatches[0].actual_routes,
        vec!["/", "/about", "/contact", "/modeladvisor", "*"]
    );
    assert_eq!(
        result.unused_routes,
        vec!["/", "/about", "/contact", "/modeladvisor"]
    );
}

#[test]
fn test_missing_inputs_are_fatal() {
    let project = FixtureProject::new().with_file("tests/e2e/a.spec.ts", "");
    let err = validate_routes(&project.layout()).unwrap_err();
    assert!(matches!(err, Error::MissingRoutesFile { .. }));

    let project = FixtureProject::new().with_file("src/App.tsx", APP_ROUTES);
    let err = validate_routes(&project.layout()).unwrap_err();
    assert!(matches!(err, Error::MissingTestsDir { .. }));
    assert!(err.is_missing_input());
}

#[test]
fn test_non_utf8_test_file_is_read_lossily() {
    let project = FixtureProject::new()
        .with_file("src/App.tsx", APP_ROUTES)
        .with_file(
            "tests/e2e/legacy.spec.ts",
            b"// caf\xe9 menu\nawait page.goto('/contact');\n".as_slice(),
        )
        .with_file("tests/e2e/site.spec.ts", "await page.goto('/about');\n");

    let result = validate_routes(&project.layout()).unwrap();

    let expected: Vec<(&str, &str)> = result
        .test_expectations
        .iter()
        .map(|e| (e.file.as_str(), e.expected_route.as_str()))
        .collect();
    assert_eq!(
        expected,
        vec![("legacy.spec.ts", "/contact"), ("site.spec.ts", "/about")]
    );
    assert!(result.mismatches.is_empty());
}

fn route_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z_-]{1,12}"
}

proptest! {
    #[test]
    fn prop_normalization_ignores_case_and_separators(segment in route_segment()) {
        let route = format!("/{}", segment);
        let squashed: String = route
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        prop_assert_eq!(normalize_route(&route), squashed.clone());
        prop_assert_eq!(normalize_route(&route.to_uppercase()), squashed);
    }

    #[test]
    fn prop_severity_critical_iff_fuzzy_candidate(segment in route_segment()) {
        let app_routes = extract_app_routes(APP_ROUTES);
        let paths: Vec<&str> = app_routes.iter().map(|r| r.path.as_str()).collect();
        let expected = format!("/{}", segment);
        prop_assume!(!paths.contains(&expected.as_str()));

        let mismatch = classify_mismatch(&expected, &paths, &[]);
        let has_candidate = paths
            .iter()
            .any(|p| normalize_route(p) == normalize_route(&expected));

        if has_candidate {
            prop_assert_eq!(mismatch.severity, Severity::Critical);
            prop_assert!(mismatch
                .actual_routes
                .iter()
                .all(|r| normalize_route(r) == normalize_route(&expected)));
        } else {
            prop_assert_eq!(mismatch.severity, Severity::Warning);
            prop_assert_eq!(mismatch.actual_routes.len(), paths.len());
        }
    }
}
