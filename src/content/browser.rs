//! Browser seam for capturing rendered content.
//!
//! [`capture_actual_content`] owns the one browser session of a run. Routes
//! are visited sequentially on a single page, and the session is closed on
//! every path out of the function, including navigation failures.

use crate::core::ActualContentSample;
use crate::errors::Result;
use std::time::Duration;

/// What a single selector lookup observed on the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementProbe {
    pub exists: bool,
    pub visible: bool,
    /// Raw text content; only meaningful when the element exists and is visible
    pub text: String,
}

/// Launches browser sessions.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session>;
}

/// One browser with one page.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Navigate and wait for network idle.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Look up the first element matching `selector`.
    async fn probe(&mut self, selector: &str) -> Result<ElementProbe>;

    /// Release the browser process.
    async fn close(self) -> Result<()>;
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join a base URL and an absolute route without doubling the slash.
pub fn route_url(base_url: &str, route: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), route)
}

/// Settings for one capture pass.
#[derive(Debug, Clone)]
pub struct CaptureOptions<'a> {
    pub base_url: &'a str,
    pub selectors: &'a [String],
    pub navigation_timeout: Duration,
}

/// Sample every selector on every route with one browser session.
///
/// Only a launch failure is returned as an error. A route that fails to load
/// contributes no samples; a selector lookup that fails is recorded as a
/// missing element.
pub async fn capture_actual_content<D: BrowserDriver>(
    driver: &D,
    routes: &[String],
    options: &CaptureOptions<'_>,
) -> Result<Vec<ActualContentSample>> {
    let mut session = driver.launch().await?;
    let samples = sample_routes(&mut session, routes, options).await;

    if let Err(e) = session.close().await {
        log::warn!("Failed to close browser session cleanly: {}", e);
    }

    Ok(samples)
}

async fn sample_routes<S: BrowserSession>(
    session: &mut S,
    routes: &[String],
    options: &CaptureOptions<'_>,
) -> Vec<ActualContentSample> {
    let mut samples = Vec::new();

    for route in routes {
        log::info!("Analyzing content for route: {}", route);
        let url = route_url(options.base_url, route);

        if let Err(e) = session.goto(&url, options.navigation_timeout).await {
            log::warn!("Could not load route {}: {}", route, e);
            continue;
        }

        for selector in options.selectors {
            let sample = match session.probe(selector).await {
                Ok(probe) => {
                    let text = if probe.exists && probe.visible {
                        normalize_text(&probe.text)
                    } else {
                        String::new()
                    };
                    ActualContentSample {
                        route: route.clone(),
                        selector: selector.clone(),
                        text,
                        visible: probe.visible,
                        exists: probe.exists,
                    }
                }
                Err(e) => {
                    log::debug!("Probe for '{}' on {} failed: {}", selector, route, e);
                    ActualContentSample::missing(route.as_str(), selector.as_str())
                }
            };
            samples.push(sample);
        }
    }

    samples
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory browser used by content validator tests.

    use super::*;
    use crate::errors::Error;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeBrowser {
        /// route -> selector -> probe
        pub pages: HashMap<String, HashMap<String, ElementProbe>>,
        pub failing_routes: Vec<String>,
        pub fail_launch: bool,
        pub launches: Arc<AtomicUsize>,
        pub closes: Arc<AtomicUsize>,
        pub visited: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl FakeBrowser {
        pub fn with_element(mut self, route: &str, selector: &str, probe: ElementProbe) -> Self {
            self.pages
                .entry(route.to_string())
                .or_default()
                .insert(selector.to_string(), probe);
            self
        }

        pub fn launches(&self) -> usize {
            self.launches.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    pub struct FakeSession {
        browser: FakeBrowser,
        current: Option<String>,
    }

    impl BrowserDriver for FakeBrowser {
        type Session = FakeSession;

        async fn launch(&self) -> Result<FakeSession> {
            if self.fail_launch {
                return Err(Error::browser("chromium failed to start"));
            }
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                browser: self.clone(),
                current: None,
            })
        }
    }

    impl BrowserSession for FakeSession {
        async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<()> {
            self.browser.visited.lock().unwrap().push(url.to_string());
            let route = self
                .browser
                .pages
                .keys()
                .chain(self.browser.failing_routes.iter())
                .find(|r| url.ends_with(r.as_str()) && url.len() > r.len())
                .cloned();
            match route {
                Some(r) if self.browser.failing_routes.contains(&r) => {
                    Err(Error::browser(format!("Timeout 10000ms exceeded navigating to {url}")))
                }
                other => {
                    self.current = other;
                    Ok(())
                }
            }
        }

        async fn probe(&mut self, selector: &str) -> Result<ElementProbe> {
            if selector == "[data-broken]" {
                return Err(Error::browser("selector engine crashed"));
            }
            Ok(self
                .current
                .as_ref()
                .and_then(|route| self.browser.pages.get(route))
                .and_then(|page| page.get(selector))
                .cloned()
                .unwrap_or_default())
        }

        async fn close(self) -> Result<()> {
            self.browser.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
