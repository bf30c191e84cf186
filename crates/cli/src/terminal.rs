use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

use ruleport_rules::validation::CategoryCheck;
use ruleport_rules::{ImportPreview, ImportReport, PreparedBatch};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const OK: Color = Color::Green;
    const FIELD: Color = Color::Cyan;
    const WARN: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

/// Renders previews and import reports.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    fn line(&self, color: Color, text: impl std::fmt::Display) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{}\n", text)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_preview(&self, preview: &ImportPreview) -> Result<()> {
        self.line(Colors::HEADER, format!("{} rule(s)", preview.records))?;

        match &preview.categories {
            CategoryCheck::Inferred(category) => {
                self.line(Colors::OK, format!("category: {}", category))?
            }
            CategoryCheck::Unresolved => self.line(
                Colors::WARN,
                "category: none inferred, pass --category to import",
            )?,
            CategoryCheck::Conflict(categories) => {
                let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
                self.line(
                    Colors::ERROR,
                    format!("category: conflict between {}, cannot import", names.join(", ")),
                )?
            }
        }

        if preview.fields.is_empty() {
            self.line(Colors::DIM, "no overridable parameters")?;
        }
        for field in &preview.fields {
            self.line(
                Colors::FIELD,
                format!(
                    "  [{}] {} = {:?}  (query #{})",
                    field.ids_label, field.names, field.initial, field.index
                ),
            )?;
        }

        for error in &preview.validation.errors {
            self.line(Colors::ERROR, format!("error {}: {}", error.path, error.message))?;
        }
        for warning in &preview.validation.warnings {
            self.line(Colors::WARN, format!("warning {}: {}", warning.path, warning.message))?;
        }
        Ok(())
    }

    pub fn print_prepared(&self, prepared: &PreparedBatch) -> Result<()> {
        let category = prepared
            .category
            .as_ref()
            .map(|c| c.as_str())
            .unwrap_or("host");
        self.line(
            Colors::DIM,
            format!(
                "submitting {} rule(s) to group {} as '{}' ({} parameter(s) overridden, {} cleared)",
                prepared.submissions.len(),
                prepared.group_id,
                category,
                prepared.merge.matched,
                prepared.merge.cleared
            ),
        )?;
        for warning in &prepared.warnings {
            self.line(Colors::WARN, format!("warning {}: {}", warning.path, warning.message))?;
        }
        Ok(())
    }

    pub fn print_report(&self, report: &ImportReport) -> Result<()> {
        if report.is_success() {
            return self.line(Colors::OK, format!("imported {} rule(s)", report.succeeded));
        }

        self.line(
            Colors::ERROR,
            format!(
                "{} rule(s) imported, {} failed",
                report.succeeded,
                report.failures.len()
            ),
        )?;
        for failure in &report.failures {
            self.line(Colors::ERROR, format!("  {}: {}", failure.key, failure.message))?;
        }
        Ok(())
    }

    pub fn print_error(&self, message: impl std::fmt::Display) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("error: {}\n", message)),
            ResetColor,
        )?;
        stderr.flush()?;
        Ok(())
    }
}
