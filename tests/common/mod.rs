// Test utility module for testalign integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use testalign::config::{PathsConfig, ProjectLayout};

/// Routing source with the routes of the reference site.
pub const APP_ROUTES: &str = r#"
import { Routes, Route } from 'react-router-dom';

export default function App() {
  return (
    <Routes>
      <Route path="/" element={<HomePage />} />
      <Route path="/about" element={<AboutPage />} />
      <Route path="/contact" element={<ContactPage />} />
      <Route path="/modeladvisor" element={<ModelAdvisorPage />} />
      <Route path="*" element={<NotFound />} />
    </Routes>
  );
}
"#;

/// A throwaway project directory laid out like a Vite + Playwright app.
pub struct FixtureProject {
    dir: TempDir,
}

impl FixtureProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn with_file(self, relative: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
        std::fs::write(path, contents).expect("write fixture file");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(self.root(), &PathsConfig::default())
    }
}

/// The reference project: routes plus tests referencing every route, one of
/// them through a hyphenated typo.
pub fn drifted_site() -> FixtureProject {
    FixtureProject::new()
        .with_file("src/App.tsx", APP_ROUTES)
        .with_file(
            "tests/e2e/homepage.spec.ts",
            r#"
import { test, expect } from '@playwright/test';

test('homepage hero', async ({ page }) => {
  await page.goto('/');
  await expect(page.locator('h1')).toContainText('AI Consulting');
  await page.click('[data-testid="nav-model-advisor"]');
  await expect(page).toHaveURL(/modeladvisor/);
});
"#,
        )
        .with_file(
            "tests/e2e/navigation.spec.ts",
            r#"
import { test, expect } from '@playwright/test';

test('main navigation', async ({ page }) => {
  await page.goto('/about');
  await expect(page).toHaveURL('/about');
  await page.goto('/contact');
  await page.goto('/model-advisor');
});
"#,
        )
        .with_file("tests/e2e/README.md", "not a test file")
        .with_file(
            "package.json",
            r#"{"name":"site","scripts":{"dev":"vite","test:e2e":"playwright test"}}"#,
        )
}
