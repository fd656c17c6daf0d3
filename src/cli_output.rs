// Mode-aware CLI output: colored for terminals, plain for pipes, JSON for tools
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::io::{self, IsTerminal};

use codelens::{
    AnalysisReport, FeatureVector, PatternPrediction, PatternSignature, VisualizationTemplate,
};

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Colors and symbols
    Human,
    /// Machine-readable JSON
    Json,
    /// Plain text without colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// JSON when CODELENS_JSON is set, plain when stdout is piped, human otherwise
    pub fn auto() -> Self {
        if std::env::var("CODELENS_JSON").is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }
}

/// Structured status line for JSON consumers
#[derive(Debug, Clone, Serialize)]
struct StatusLine<'a> {
    status: &'a str,
    message: &'a str,
}

/// CLI output writer with mode awareness
pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}", title.cyan().bold());
                println!("{}", "═".repeat(title.chars().count()).cyan());
            }
            OutputMode::Plain => {
                println!();
                println!("{}", title);
                println!("{}", "=".repeat(title.chars().count()));
            }
            OutputMode::Json => {}
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "✓".green(), message),
            OutputMode::Plain => println!("  [OK] {}", message),
            OutputMode::Json => self.emit_status("ok", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => eprintln!("  {} {}", "✗".red(), message),
            OutputMode::Plain => eprintln!("  [ERROR] {}", message),
            OutputMode::Json => self.emit_status("error", message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "⚠".yellow(), message),
            OutputMode::Plain => println!("  [WARN] {}", message),
            OutputMode::Json => self.emit_status("warning", message),
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("  {}", message),
            OutputMode::Json => {}
        }
    }

    pub fn metric(&self, label: &str, value: &str) {
        match self.mode {
            OutputMode::Human => println!("    • {}: {}", label, value.green()),
            OutputMode::Plain => println!("    - {}: {}", label, value),
            OutputMode::Json => {}
        }
    }

    // Status lines go to stderr so stdout stays a single JSON document
    fn emit_status(&self, status: &str, message: &str) {
        if let Ok(json) = serde_json::to_string(&StatusLine { status, message }) {
            eprintln!("{}", json);
        }
    }

    /// Pretty-print any serializable value (JSON mode)
    pub fn emit_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a key-value table
    pub fn table(&self, rows: &[(&str, String)]) {
        let max_key_len = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        match self.mode {
            OutputMode::Human => {
                for (key, value) in rows {
                    println!("  {:width$} │ {}", key.yellow(), value, width = max_key_len);
                }
            }
            OutputMode::Plain => {
                for (key, value) in rows {
                    println!("  {:width$} : {}", key, value, width = max_key_len);
                }
            }
            OutputMode::Json => {}
        }
    }

    /// Horizontal confidence bar, `confidence` in [0, 1]
    pub fn confidence_bar(&self, label: &str, confidence: f64, width: usize) {
        let filled = ((confidence * width as f64).round() as usize).min(width);
        let bar = match self.mode {
            OutputMode::Human => {
                let fill = "█".repeat(filled);
                let fill = if confidence >= 0.7 {
                    fill.green()
                } else if confidence >= 0.4 {
                    fill.yellow()
                } else {
                    fill.red()
                };
                format!("{}{}", fill, "░".repeat(width - filled))
            }
            OutputMode::Plain => format!("{}{}", "#".repeat(filled), "-".repeat(width - filled)),
            OutputMode::Json => return,
        };

        println!("  {:<24} │{} {}", label, bar, format_confidence(confidence));
    }

    /// Full analysis report for one input
    pub fn report(&self, source: &str, report: &AnalysisReport) {
        self.section(&format!("🔍 {} ({})", source, report.language));

        match &report.main_pattern {
            Some(main) => self.success(&format!(
                "Main pattern: {} ({})",
                main.name,
                format_confidence(main.confidence)
            )),
            None => self.warning("No known pattern recognized"),
        }

        for prediction in &report.patterns {
            self.confidence_bar(prediction.name, prediction.confidence, 30);
        }

        self.section("Structure");
        let structure = &report.code_structure;
        self.table(&[
            ("Functions", structure.functions.to_string()),
            ("Loops", structure.loops.to_string()),
            ("Conditionals", structure.conditionals.to_string()),
            ("Recursion", if structure.recursion { "yes" } else { "no" }.to_string()),
            ("Time", report.estimated_complexity.time.to_string()),
            ("Space", report.estimated_complexity.space.to_string()),
        ]);

        if !report.suggestions.is_empty() {
            self.section("Suggestions");
            for suggestion in &report.suggestions {
                self.info(&format!("→ {}", suggestion));
            }
        }
    }

    /// Ranked predictions with their reasoning lines
    pub fn predictions(&self, source: &str, predictions: &[PatternPrediction]) {
        self.section(&format!("🧠 Predictions for {}", source));
        if predictions.is_empty() {
            self.warning("No pattern cleared the threshold");
            return;
        }

        for (rank, prediction) in predictions.iter().enumerate() {
            self.confidence_bar(
                &format!("{}. {}", rank + 1, prediction.name),
                prediction.confidence,
                30,
            );
            self.metric(
                "Complexity",
                &format!(
                    "{} time, {} space",
                    prediction.complexity.time, prediction.complexity.space
                ),
            );
            for line in &prediction.reasoning {
                self.info(&format!("    {}", line));
            }
        }
    }

    pub fn features(&self, source: &str, features: &FeatureVector) {
        self.section(&format!("📐 Features of {}", source));
        self.table(&[
            ("Tokens", features.token_count.to_string()),
            ("Avg line length", format!("{:.1}", features.avg_line_length)),
            ("Indentation", format!("{:.2}", features.indentation_complexity)),
            ("Structural", format!("{:.1}", features.structural_complexity)),
            ("Cyclomatic", features.cyclomatic_complexity.to_string()),
        ]);

        let mut present: Vec<(&String, &f64)> = features
            .keyword_density
            .iter()
            .filter(|(_, density)| **density > 0.0)
            .collect();
        if present.is_empty() {
            return;
        }
        present.sort_by(|a, b| b.1.total_cmp(a.1));

        self.section("Keyword density");
        for (keyword, density) in present {
            self.metric(keyword, &format!("{:.3}", density));
        }
    }

    /// Catalogue listing as a table
    pub fn pattern_table<'a>(&self, signatures: impl Iterator<Item = &'a PatternSignature>) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Name", "Category", "Time", "Space"]);

        for sig in signatures {
            table.add_row(vec![
                sig.id.to_string(),
                sig.name.to_string(),
                sig.category.to_string(),
                sig.complexity.time.to_string(),
                sig.complexity.space.to_string(),
            ]);
        }

        println!("{table}");
    }

    pub fn explanation(&self, signature: &PatternSignature, text: &str) {
        self.section(&format!("📖 {}", signature.name));
        self.metric(
            "Complexity",
            &format!(
                "{} time, {} space",
                signature.complexity.time, signature.complexity.space
            ),
        );
        println!();
        for line in wrap(text, 76) {
            println!("  {}", line);
        }
    }

    /// Template listing as a table
    pub fn template_table<'a>(&self, templates: impl Iterator<Item = &'a VisualizationTemplate>) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Kind", "Title", "Steps"]);

        for template in templates {
            table.add_row(vec![
                template.id.to_string(),
                template.kind.name().to_string(),
                template.title.to_string(),
                template.steps.len().to_string(),
            ]);
        }

        println!("{table}");
    }

    pub fn template(&self, template: &VisualizationTemplate) {
        self.section(&format!("🎞  {}", template.title));
        self.metric("Kind", template.kind.name());
        for (idx, step) in template.steps.iter().enumerate() {
            self.info(&format!("{}. {}", idx + 1, step));
        }
    }
}

/// Confidence as a whole percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// Greedy word wrap; words longer than `width` get their own line
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mode() {
        let mode = OutputMode::auto();
        // no TTY under cargo test
        assert!(matches!(mode, OutputMode::Plain | OutputMode::Human | OutputMode::Json));
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(1.0), "100%");
        assert_eq!(format_confidence(0.726), "73%");
        assert_eq!(format_confidence(0.0), "0%");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic x", 5), vec!["supercalifragilistic", "x"]);
    }
}
