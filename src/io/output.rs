use crate::core::{OverallStatus, ValidationReport};
use crate::formatting::{FormattingConfig, Palette};
use std::io::Write;

const RULE_WIDTH: usize = 80;

pub trait OutputWriter {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Human-readable report for the console.
pub struct TerminalWriter<W: Write> {
    writer: W,
    palette: Palette,
}

impl TerminalWriter<std::io::Stdout> {
    pub fn stdout(config: FormattingConfig) -> Self {
        Self::new(std::io::stdout(), Palette::new(config))
    }
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, palette: Palette) -> Self {
        Self { writer, palette }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        self.write_header()?;
        self.write_summary(report)?;
        self.write_routes(report)?;
        self.write_content(report)?;
        self.write_ci(report)?;
        self.write_action_items(report)?;
        self.write_recommendations(report)?;
        self.write_footer(report.summary.overall_status)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn rule(&self) -> String {
        "=".repeat(RULE_WIDTH)
    }

    fn section(&mut self, emoji: &str, title: &str) -> anyhow::Result<()> {
        let heading = format!("{} {}:", self.palette.emoji(emoji), title);
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.palette.header(&heading))?;
        Ok(())
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        let rule = self.rule();
        let title = format!(
            "{} TEST-IMPLEMENTATION VALIDATION REPORT",
            self.palette.emoji("🔍")
        );
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", rule)?;
        writeln!(self.writer, "{}", self.palette.bold(&title))?;
        writeln!(self.writer, "{}", rule)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        self.section("📊", "SUMMARY")?;
        writeln!(
            self.writer,
            "   Status: {}",
            self.palette.status(summary.overall_status)
        )?;
        writeln!(
            self.writer,
            "   Total Issues: {} ({} critical, {} warnings)",
            summary.total_issues, summary.critical_issues, summary.warning_issues
        )?;
        writeln!(self.writer, "   Tests Validated: {}", summary.tests_validated)?;
        writeln!(self.writer, "   Routes Validated: {}", summary.routes_validated)?;
        writeln!(
            self.writer,
            "   Content Assertions: {}",
            summary.content_assertions_validated
        )?;
        Ok(())
    }

    fn write_routes(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let routes = &report.routes;
        self.section("🛣️", "ROUTE VALIDATION")?;
        if routes.mismatches.is_empty() {
            let line = format!(
                "{} All {} routes correctly aligned",
                self.palette.emoji("✅"),
                routes.app_routes.len()
            );
            writeln!(self.writer, "   {}", self.palette.success(&line))?;
            return Ok(());
        }

        let line = format!(
            "{} {} route mismatches found:",
            self.palette.emoji("❌"),
            routes.mismatches.len()
        );
        writeln!(self.writer, "   {}", self.palette.error(&line))?;
        for mismatch in &routes.mismatches {
            writeln!(
                self.writer,
                "      • Expected: '{}' -> Actual: {}",
                mismatch.expected_route,
                mismatch.actual_routes.join(", ")
            )?;
            writeln!(
                self.writer,
                "        {}",
                self.palette
                    .dim(&format!("Files: {}", mismatch.test_files.join(", ")))
            )?;
        }
        Ok(())
    }

    fn write_content(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let content = &report.content;
        self.section("📝", "CONTENT VALIDATION")?;
        if content.mismatches.is_empty() {
            let line = format!(
                "{} All {} content assertions aligned",
                self.palette.emoji("✅"),
                content.assertions.len()
            );
            writeln!(self.writer, "   {}", self.palette.success(&line))?;
            return Ok(());
        }

        let line = format!(
            "{} {} content mismatches found:",
            self.palette.emoji("❌"),
            content.mismatches.len()
        );
        writeln!(self.writer, "   {}", self.palette.error(&line))?;
        for mismatch in &content.mismatches {
            writeln!(
                self.writer,
                "      • {}:{} - {}",
                mismatch.assertion.file, mismatch.assertion.line, mismatch.issue
            )?;
            if !mismatch.suggestion.is_empty() {
                writeln!(self.writer, "        Fix: {}", mismatch.suggestion)?;
            }
        }
        Ok(())
    }

    fn write_ci(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let ci = &report.ci;
        self.section("⚙️", "CI VALIDATION")?;
        if ci.issues.is_empty() {
            let line = format!("{} CI configuration appears healthy", self.palette.emoji("✅"));
            writeln!(self.writer, "   {}", self.palette.success(&line))?;
            return Ok(());
        }

        let line = format!(
            "{} {} CI issues found:",
            self.palette.emoji("❌"),
            ci.issues.len()
        );
        writeln!(self.writer, "   {}", self.palette.error(&line))?;
        for issue in &ci.issues {
            writeln!(self.writer, "      • {}", issue.description)?;
            writeln!(self.writer, "        Fix: {}", issue.fix)?;
        }
        Ok(())
    }

    fn write_action_items(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        if report.action_items.is_empty() {
            return Ok(());
        }
        let title = format!("ACTION ITEMS ({})", report.action_items.len());
        self.section("🎯", &title)?;
        for (index, item) in report.action_items.iter().enumerate() {
            writeln!(
                self.writer,
                "   {}. {} {}",
                index + 1,
                self.palette.priority(item.priority),
                item.description
            )?;
            writeln!(self.writer, "      Fix: {}", item.fix)?;
            if !item.files.is_empty() {
                writeln!(
                    self.writer,
                    "      {}",
                    self.palette.dim(&format!("Files: {}", item.files.join(", ")))
                )?;
            }
        }
        Ok(())
    }

    fn write_recommendations(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        if report.recommendations.is_empty() {
            return Ok(());
        }
        self.section("💡", "RECOMMENDATIONS")?;
        for recommendation in &report.recommendations {
            writeln!(self.writer, "   • {}", recommendation)?;
        }
        Ok(())
    }

    fn write_footer(&mut self, status: OverallStatus) -> anyhow::Result<()> {
        let rule = self.rule();
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", rule)?;
        writeln!(
            self.writer,
            "Validation completed. Status: {}",
            self.palette.status(status)
        )?;
        writeln!(self.writer, "{}", rule)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
