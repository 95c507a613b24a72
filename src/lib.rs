// Export modules for library usage
pub mod ci;
pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod formatting;
pub mod io;
pub mod report;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    ActionCategory, ActionItem, ActualContentSample, AppRoute, AssertionKind, CiFinding,
    CiFindingKind, CiValidationResult, ContentAssertion, ContentIssue, ContentMismatch,
    ContentValidationResult, ExpectationKind, OverallStatus, Priority, ReportSummary,
    RouteMismatch, RouteValidationResult, Severity, TestRouteExpectation, ValidationReport,
};

pub use crate::errors::{Error, Result};

pub use crate::config::{load_config, ProjectLayout, TestalignConfig};

pub use crate::routes::{compare_routes, normalize_route, validate_routes};

pub use crate::content::{
    compare_content, validate_content, BrowserDriver, BrowserSession, PlaywrightDriver,
};

pub use crate::ci::{validate_ci, CommandRunner, ShellRunner};

pub use crate::report::{generate_report, generate_report_with, ReportOptions};

pub use crate::io::output::{JsonWriter, OutputWriter, TerminalWriter};
