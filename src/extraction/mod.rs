//! Line-level pattern recognizers for route declarations and e2e test source.
//!
//! Each syntactic form the validators understand has exactly one named
//! recognizer here. When the test or routing source format changes, only the
//! matching recognizer needs to change.

pub mod patterns;

pub use patterns::{
    first_navigation, match_contains_text, match_exact_text, match_navigation,
    match_route_declaration, match_url_literal, match_url_pattern, match_visible,
    LocatorText, RouteDeclaration,
};
