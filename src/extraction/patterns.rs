use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A string literal in any of the three JS quote styles. Occupies three
/// capture groups, exactly one of which participates in a match.
const QUOTED: &str = r#"(?:'([^'\n]+)'|"([^"\n]+)"|`([^`\n]+)`)"#;

static ROUTE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<Route\s+path=(?:"([^"]+)"|'([^']+)')\s+element=\{\s*<(\w+)"#).unwrap()
});

static NAVIGATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"page\.goto\({QUOTED}\)")).unwrap());

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"expect\(page\)\.toHaveURL\(/((?:\\/|[^/\n])+)/[dgimsuy]*\)").unwrap()
});

static URL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"expect\(page\)\.toHaveURL\({QUOTED}\)")).unwrap());

static CONTAINS_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"expect\(page\.locator\({QUOTED}\)\)\.toContainText\({QUOTED}\)"
    ))
    .unwrap()
});

static EXACT_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"expect\(page\.locator\({QUOTED}\)\)\.toHaveText\({QUOTED}\)"
    ))
    .unwrap()
});

static VISIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"expect\(page\.locator\({QUOTED}\)\)\.toBeVisible\(\)")).unwrap()
});

/// `(path, component)` captured from a `<Route path=... element={<X />} />` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    pub path: String,
    pub component: String,
}

/// `(selector, text)` captured from a locator text assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorText {
    pub selector: String,
    pub text: String,
}

fn quoted_at(caps: &Captures<'_>, first_group: usize) -> Option<String> {
    (first_group..first_group + 3)
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

pub fn match_route_declaration(line: &str) -> Option<RouteDeclaration> {
    let caps = ROUTE_DECLARATION.captures(line)?;
    let path = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
    let component = caps.get(3)?.as_str().to_string();
    Some(RouteDeclaration { path, component })
}

/// Path passed to `page.goto(...)`.
pub fn match_navigation(line: &str) -> Option<String> {
    let caps = NAVIGATION.captures(line)?;
    quoted_at(&caps, 1)
}

/// Route implied by a regex-literal URL assertion such as
/// `expect(page).toHaveURL(/\/modeladvisor/)`.
pub fn match_url_pattern(line: &str) -> Option<String> {
    let caps = URL_PATTERN.captures(line)?;
    Some(regex_body_to_route(caps.get(1)?.as_str()))
}

/// Path passed to `expect(page).toHaveURL('...')`.
pub fn match_url_literal(line: &str) -> Option<String> {
    let caps = URL_LITERAL.captures(line)?;
    quoted_at(&caps, 1)
}

pub fn match_contains_text(line: &str) -> Option<LocatorText> {
    let caps = CONTAINS_TEXT.captures(line)?;
    Some(LocatorText {
        selector: quoted_at(&caps, 1)?,
        text: quoted_at(&caps, 4)?,
    })
}

pub fn match_exact_text(line: &str) -> Option<LocatorText> {
    let caps = EXACT_TEXT.captures(line)?;
    Some(LocatorText {
        selector: quoted_at(&caps, 1)?,
        text: quoted_at(&caps, 4)?,
    })
}

/// Selector of an `expect(page.locator(...)).toBeVisible()` assertion.
pub fn match_visible(line: &str) -> Option<String> {
    let caps = VISIBLE.captures(line)?;
    quoted_at(&caps, 1)
}

/// First `page.goto(...)` target anywhere in a file.
pub fn first_navigation(content: &str) -> Option<String> {
    content.lines().find_map(match_navigation)
}

// Drops anchors and escapes; the result always starts with '/'.
fn regex_body_to_route(body: &str) -> String {
    let trimmed = body.trim_start_matches('^').trim_end_matches('$');
    let mut route = String::with_capacity(trimmed.len() + 1);
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                route.push(escaped);
            }
        } else {
            route.push(c);
        }
    }
    if route.starts_with('/') {
        route
    } else {
        format!("/{route}")
    }
}
