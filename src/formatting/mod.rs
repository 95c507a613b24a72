use crate::core::{OverallStatus, Priority};
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiMode {
    Auto,
    Always,
    Never,
}

impl EmojiMode {
    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Resolve color settings from `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // no-color.org: presence alone disables color
        if lookup("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }
        if lookup("CLICOLOR").as_deref() == Some("0") {
            config.color = ColorMode::Never;
        }
        if lookup("CLICOLOR_FORCE").as_deref() == Some("1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// ASCII-only output: no colors, no emoji
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }

    /// `--plain` wins over the environment.
    pub fn resolve(plain: bool) -> Self {
        if plain {
            Self::plain()
        } else {
            Self::from_env()
        }
    }
}

/// Applies a resolved [`FormattingConfig`] to report text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
    emoji: bool,
}

impl Palette {
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            color: config.color.should_use_color(),
            emoji: config.emoji.should_use_emoji(),
        }
    }

    /// Like [`Palette::new`], but also forces `colored` on or off for the
    /// whole process. Call once from the binary entrypoint.
    pub fn install(config: FormattingConfig) -> Self {
        let palette = Self::new(config);
        colored::control::set_override(palette.color);
        palette
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            emoji: false,
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    pub fn emoji(&self, emoji: &str) -> String {
        let (symbol, fallback) = emoji_or_fallback(emoji);
        if self.emoji {
            symbol.to_string()
        } else {
            fallback.to_string()
        }
    }

    pub fn status(&self, status: OverallStatus) -> String {
        let marker = match status {
            OverallStatus::Pass => "✅",
            OverallStatus::Warning => "⚠️",
            OverallStatus::Fail => "❌",
        };
        let label = format!("{} {}", self.emoji(marker), status);
        match status {
            OverallStatus::Pass => self.success(&label),
            OverallStatus::Warning => self.warning(&label),
            OverallStatus::Fail => self.error(&label),
        }
    }

    pub fn priority(&self, priority: Priority) -> String {
        let marker = match priority {
            Priority::High => "🔥",
            Priority::Medium => "⚠️",
            Priority::Low => "ℹ️",
        };
        let label = format!("{} [{}]", self.emoji(marker), priority);
        match priority {
            Priority::High => self.error(&label),
            Priority::Medium => self.warning(&label),
            Priority::Low => label,
        }
    }
}

fn detect_terminal() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn emoji_or_fallback(emoji: &str) -> (&str, &str) {
    match emoji {
        "✅" => ("✅", "[OK]"),
        "❌" => ("❌", "[FAIL]"),
        "⚠️" => ("⚠️", "[WARN]"),
        "ℹ️" => ("ℹ️", "[INFO]"),
        "🔥" => ("🔥", "[!]"),
        "🔍" => ("🔍", "[SEARCH]"),
        "📊" => ("📊", "[STATS]"),
        "🛣️" => ("🛣️", "[ROUTES]"),
        "📝" => ("📝", "[CONTENT]"),
        "⚙️" => ("⚙️", "[CI]"),
        "🎯" => ("🎯", "[TARGET]"),
        "💡" => ("💡", "[IDEA]"),
        "📄" => ("📄", "[FILE]"),
        "⏱️" => ("⏱️", "[TIME]"),
        _ => (emoji, ""),
    }
}
