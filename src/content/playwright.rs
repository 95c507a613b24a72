//! Headless Chromium through a Node helper process.
//!
//! The helper imports `@playwright/test` from the project's own
//! `node_modules`, launches one browser with one page, and then answers
//! line-delimited JSON requests on stdin. Each request carries an id; a
//! response whose id does not match the pending request (left over from a
//! request that timed out on this side) is skipped.

use super::browser::{BrowserDriver, BrowserSession, ElementProbe};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

const HELPER_SCRIPT: &str = r#"
import { chromium } from '@playwright/test';
import readline from 'node:readline';

const send = (msg) => process.stdout.write(JSON.stringify(msg) + '\n');
const browser = await chromium.launch({ headless: true });
try {
  const page = await browser.newPage();
  send({ id: 0, ok: true });
  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    const req = JSON.parse(line);
    try {
      if (req.op === 'goto') {
        await page.goto(req.url, { waitUntil: 'networkidle', timeout: req.timeoutMs });
        send({ id: req.id, ok: true });
      } else if (req.op === 'probe') {
        const el = page.locator(req.selector).first();
        const visible = await el.isVisible().catch(() => false);
        const exists = await el.count().then((n) => n > 0).catch(() => false);
        const text = exists && visible ? (await el.textContent().catch(() => '')) || '' : '';
        send({ id: req.id, ok: true, exists, visible, text });
      } else if (req.op === 'close') {
        send({ id: req.id, ok: true });
        break;
      } else {
        send({ id: req.id, ok: false, error: `unknown op ${req.op}` });
      }
    } catch (err) {
      send({ id: req.id, ok: false, error: String((err && err.message) || err) });
    }
  }
} finally {
  await browser.close();
}
"#;

/// Time allowed for Chromium to start.
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);
/// Slack on top of the page-level timeout before giving up on a response.
const RESPONSE_GRACE: Duration = Duration::from_secs(5);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum HelperRequest<'a> {
    Goto {
        url: &'a str,
        #[serde(rename = "timeoutMs")]
        timeout_ms: u64,
    },
    Probe {
        selector: &'a str,
    },
    Close,
}

#[derive(Debug, Deserialize)]
struct HelperResponse {
    id: u64,
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    visible: bool,
    #[serde(default)]
    text: String,
}

fn encode_request(id: u64, request: &HelperRequest<'_>) -> Result<String> {
    let mut value = serde_json::to_value(request)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), id.into());
    }
    Ok(serde_json::to_string(&value)?)
}

/// Launches Chromium via `node` in the project directory.
#[derive(Debug, Clone)]
pub struct PlaywrightDriver {
    node: String,
    working_dir: PathBuf,
}

impl PlaywrightDriver {
    pub fn new(node: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl BrowserDriver for PlaywrightDriver {
    type Session = PlaywrightSession;

    async fn launch(&self) -> Result<PlaywrightSession> {
        log::debug!(
            "Launching headless chromium via {} in {}",
            self.node,
            self.working_dir.display()
        );
        let mut child = Command::new(&self.node)
            .current_dir(&self.working_dir)
            .arg("--input-type=module")
            .arg("-e")
            .arg(HELPER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::browser(format!("failed to start {}: {}", self.node, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::browser("helper stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::browser("helper stdout unavailable"))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    log::debug!("[browser] {}", line);
                }
            });
        }

        let mut session = PlaywrightSession {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
        };

        match tokio::time::timeout(LAUNCH_TIMEOUT, session.read_response(0)).await {
            Ok(Ok(_)) => Ok(session),
            Ok(Err(e)) => {
                session.kill().await;
                Err(Error::browser(format!(
                    "headless browser failed to launch ({}); is @playwright/test installed and `npx playwright install chromium` done?",
                    e
                )))
            }
            Err(_) => {
                session.kill().await;
                Err(Error::browser(format!(
                    "headless browser did not start within {:?}",
                    LAUNCH_TIMEOUT
                )))
            }
        }
    }
}

pub struct PlaywrightSession {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl PlaywrightSession {
    async fn request(&mut self, request: HelperRequest<'_>, wait: Duration) -> Result<HelperResponse> {
        let id = self.next_id;
        self.next_id += 1;

        let mut line = encode_request(id, &request)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let response = tokio::time::timeout(wait, self.read_response(id))
            .await
            .map_err(|_| Error::browser(format!("no response from browser within {:?}", wait)))??;

        if response.ok {
            Ok(response)
        } else {
            Err(Error::browser(
                response.error.unwrap_or_else(|| "unknown browser error".to_string()),
            ))
        }
    }

    async fn read_response(&mut self, id: u64) -> Result<HelperResponse> {
        loop {
            let line = self
                .stdout
                .next_line()
                .await?
                .ok_or_else(|| Error::browser("browser helper exited"))?;

            match serde_json::from_str::<HelperResponse>(&line) {
                Ok(response) if response.id == id => return Ok(response),
                Ok(response) => log::debug!("Skipping stale browser response {}", response.id),
                Err(_) => log::debug!("[browser] {}", line),
            }
        }
    }

    async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            log::debug!("Browser helper already gone: {}", e);
        }
    }
}

impl BrowserSession for PlaywrightSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.request(HelperRequest::Goto { url, timeout_ms }, timeout + RESPONSE_GRACE)
            .await
            .map(|_| ())
    }

    async fn probe(&mut self, selector: &str) -> Result<ElementProbe> {
        let response = self
            .request(HelperRequest::Probe { selector }, PROBE_TIMEOUT)
            .await?;
        Ok(ElementProbe {
            exists: response.exists,
            visible: response.visible,
            text: response.text,
        })
    }

    async fn close(mut self) -> Result<()> {
        let acknowledged = self.request(HelperRequest::Close, CLOSE_TIMEOUT).await;

        let exited = tokio::time::timeout(CLOSE_TIMEOUT, self.child.wait()).await;
        if !matches!(exited, Ok(Ok(_))) {
            self.kill().await;
        }

        acknowledged.map(|_| ())
    }
}
