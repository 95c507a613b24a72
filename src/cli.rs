use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "testalign")]
#[command(
    about = "Detect drift between app routes, rendered content, CI setup and the e2e tests that assert on them",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Only validate route alignment
    #[arg(long)]
    pub routes_only: bool,

    /// Only validate content alignment (needs the app running at the base URL)
    #[arg(long)]
    pub content_only: bool,

    /// Only validate CI configuration
    #[arg(long)]
    pub ci_only: bool,

    /// Suppress console narration and the printed report
    #[arg(long)]
    pub silent: bool,

    /// Also write the report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Project root containing the app source, tests and package.json
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to the nearest .testalign.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the running application
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Do not run the intentionally failing test in the CI validator
    #[arg(long)]
    pub skip_failure_probe: bool,

    /// Plain output (ASCII only, no colors, no emoji)
    #[arg(long)]
    pub plain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Which validators run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub routes: bool,
    pub content: bool,
    pub ci: bool,
}

impl Selection {
    pub const ALL: Self = Self {
        routes: true,
        content: true,
        ci: true,
    };

    /// Each validator runs unless another validator's `-only` flag is set.
    pub fn from_flags(routes_only: bool, content_only: bool, ci_only: bool) -> Self {
        Self {
            routes: !content_only && !ci_only,
            content: !routes_only && !ci_only,
            ci: !routes_only && !content_only,
        }
    }
}

impl Cli {
    pub fn selection(&self) -> Selection {
        Selection::from_flags(self.routes_only, self.content_only, self.ci_only)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runs_everything() {
        let cli = Cli::parse_from(["testalign"]);
        assert_eq!(cli.selection(), Selection::ALL);
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_only_flags_narrow_selection() {
        let cli = Cli::parse_from(["testalign", "--routes-only"]);
        assert_eq!(
            cli.selection(),
            Selection {
                routes: true,
                content: false,
                ci: false
            }
        );

        let cli = Cli::parse_from(["testalign", "--ci-only"]);
        assert!(cli.selection().ci);
        assert!(!cli.selection().routes);

        // two -only flags exclude each other's validators
        let cli = Cli::parse_from(["testalign", "--routes-only", "--content-only"]);
        assert_eq!(
            cli.selection(),
            Selection {
                routes: false,
                content: false,
                ci: false
            }
        );
    }

    #[test]
    fn test_output_accepts_equals_form() {
        let cli = Cli::parse_from(["testalign", "--output=reports/alignment.json", "-vv"]);
        assert_eq!(cli.output, Some(PathBuf::from("reports/alignment.json")));
        assert_eq!(cli.log_filter(), "debug");
    }
}
