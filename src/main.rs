use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use walkdir::{DirEntry, WalkDir};

mod cli_output;

use cli_output::{format_size, OutputMode, OutputWriter};
use codelens::{
    extract_features_for, AnalysisReport, CodelensError, EngineConfig, ExplanationLevel,
    Language, PatternCategory, PatternEngine, PatternLibrary, PatternRecognizer, PatternSignature,
};

/// Language assumed for stdin when `--language` is not given
const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Parser)]
#[command(name = "codelens")]
#[command(about = "Recognize algorithms, data structures and design patterns in source code", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config file (default: <config dir>/codelens/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (default: auto-detect)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputMode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis: patterns, structure, complexity and suggestions
    Analyze {
        /// Files or directories to analyze, `-` for stdin
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Language tag (default: from file extension)
        #[arg(short, long)]
        language: Option<String>,

        /// Show at most this many patterns per input
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Ranked predictions with reasoning (lower inclusion threshold)
    Predict {
        /// File to read, `-` for stdin
        path: PathBuf,

        #[arg(short, long)]
        language: Option<String>,

        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Print the feature vector of a snippet
    Features {
        /// File to read, `-` for stdin
        path: PathBuf,

        #[arg(short, long)]
        language: Option<String>,
    },

    /// Explain a pattern
    Explain {
        /// Pattern id (see `codelens patterns`)
        id: String,

        /// simplified or technical
        #[arg(long, default_value = "simplified")]
        level: String,
    },

    /// Show the visualization template of a pattern, or list all templates
    Template {
        /// Pattern id (omit to list every template)
        id: Option<String>,
    },

    /// List the pattern catalogue
    Patterns {
        /// Only this category (algorithm, data-structure, design-pattern, anti-pattern)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the effective engine configuration
    Config {
        /// Write the defaults to the config file
        #[arg(long)]
        init: bool,
    },
}

/// One input to analyze
struct Source {
    label: String,
    language: Language,
    code: String,
}

#[derive(Serialize)]
struct AnalyzedSource<'a> {
    source: &'a str,
    bytes: usize,
    report: &'a AnalysisReport,
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.') || s == "node_modules" || s == "target")
            .unwrap_or(false)
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .context("Failed to read stdin")?;
        return Ok(code);
    }

    fs::read_to_string(path).map_err(|source| {
        CodelensError::Io {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn resolve_language(path: &Path, explicit: Option<&str>) -> Language {
    match explicit {
        Some(tag) => Language::from_tag(tag),
        None if is_stdin(path) => Language::from_tag(DEFAULT_LANGUAGE),
        None => Language::from_path(path).unwrap_or_else(|| {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("text");
            Language::Other(ext.to_string())
        }),
    }
}

/// Expand directories into the supported source files below them
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let before = files.len();
        for entry in WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && Language::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
        debug!("{}: {} source files", path.display(), files.len() - before);
    }
    files
}

fn load_source(path: &Path, language: Option<&str>) -> Result<Source> {
    let code = read_input(path)?;
    Ok(Source {
        label: if is_stdin(path) {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        },
        language: resolve_language(path, language),
        code,
    })
}

fn load_config(path: Option<&Path>, top: Option<usize>) -> Result<EngineConfig> {
    let mut config = EngineConfig::load_or_default(path)?.sanitized();
    if top.is_some() {
        config.max_results = top;
    }
    debug!("Engine config: {:?}", config);
    Ok(config)
}

fn find_pattern<'a>(library: &'a PatternLibrary, id: &str) -> Result<&'a PatternSignature> {
    library
        .get(id)
        .ok_or_else(|| CodelensError::UnknownPattern(id.to_string()).into())
}

/// Save the default config and describe what was written
fn write_default_config(path: &Path) -> Result<serde_json::Value> {
    let config = EngineConfig::default();
    config.save(path)?;
    Ok(serde_json::json!({ "path": path, "config": config }))
}

fn run_analyze(
    out: &OutputWriter,
    config: &EngineConfig,
    paths: &[PathBuf],
    language: Option<&str>,
) -> Result<()> {
    let files = expand_paths(paths);
    if files.is_empty() {
        anyhow::bail!("No supported source files found");
    }
    info!("🔍 Analyzing {} input(s)...", files.len());

    let recognizer = PatternRecognizer::new(PatternLibrary::builtin(), config);
    let results: Vec<(PathBuf, Result<(Source, AnalysisReport)>)> = files
        .par_iter()
        .map(|path| {
            let analyzed = load_source(path, language).map(|source| {
                let report = recognizer.analyze_as(&source.code, &source.language);
                (source, report)
            });
            (path.clone(), analyzed)
        })
        .collect();

    let mut analyzed = Vec::new();
    for (path, result) in results {
        match result {
            Ok(pair) => analyzed.push(pair),
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                out.error(&format!("{:#}", e));
            }
        }
    }
    if analyzed.is_empty() {
        anyhow::bail!("None of the inputs could be read");
    }

    if out.is_json() {
        let payload: Vec<AnalyzedSource> = analyzed
            .iter()
            .map(|(source, report)| AnalyzedSource {
                source: &source.label,
                bytes: source.code.len(),
                report,
            })
            .collect();
        return out.emit_json(&payload);
    }

    for (source, report) in &analyzed {
        let label = format!("{} [{}]", source.label, format_size(source.code.len() as u64));
        out.report(&label, report);
    }
    if analyzed.len() > 1 {
        let recognized = analyzed
            .iter()
            .filter(|(_, report)| report.main_pattern.is_some())
            .count();
        out.section("Summary");
        out.success(&format!(
            "{} of {} inputs matched a known pattern",
            recognized,
            analyzed.len()
        ));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let out = OutputWriter::new(cli.format.unwrap_or_else(OutputMode::auto));
    if let Err(e) = run(cli, &out) {
        out.error(&format!("error: {:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli, out: &OutputWriter) -> Result<()> {
    let config_path = cli.config.as_deref();
    let library = PatternLibrary::builtin();

    match cli.command {
        Commands::Analyze {
            paths,
            language,
            top,
        } => {
            let config = load_config(config_path, top)?;
            run_analyze(out, &config, &paths, language.as_deref())
        }

        Commands::Predict {
            path,
            language,
            top,
        } => {
            let config = load_config(config_path, top)?;
            let source = load_source(&path, language.as_deref())?;
            info!("🧠 Predicting patterns for {}", source.label);

            let engine = PatternEngine::new(library, &config);
            let features = extract_features_for(&source.code, &source.language);
            let predictions = engine.predict_with_features(&source.code, &features);

            if out.is_json() {
                return out.emit_json(&predictions);
            }
            out.predictions(&source.label, &predictions);
            Ok(())
        }

        Commands::Features { path, language } => {
            let source = load_source(&path, language.as_deref())?;
            let features = extract_features_for(&source.code, &source.language);
            if !source.language.is_supported() {
                out.warning(&format!(
                    "No keyword list for '{}'; keyword density is empty",
                    source.language
                ));
            }

            if out.is_json() {
                return out.emit_json(&features);
            }
            out.features(&source.label, &features);
            Ok(())
        }

        Commands::Explain { id, level } => {
            let level: ExplanationLevel = level.parse()?;
            let signature = find_pattern(library, &id)?;
            let text = library.explanation(&id, level);

            if out.is_json() {
                return out.emit_json(&serde_json::json!({
                    "id": signature.id,
                    "name": signature.name,
                    "level": level,
                    "complexity": signature.complexity,
                    "explanation": text,
                }));
            }
            out.explanation(signature, text);
            Ok(())
        }

        Commands::Template { id: None } => {
            let templates: Vec<_> = library.templates().collect();
            if out.is_json() {
                return out.emit_json(&templates);
            }
            out.template_table(templates.into_iter());
            Ok(())
        }

        Commands::Template { id: Some(id) } => {
            find_pattern(library, &id)?;
            let template = library
                .visualization_template(&id)
                .with_context(|| format!("Pattern {} has no visualization template", id))?;

            if out.is_json() {
                return out.emit_json(template);
            }
            out.template(template);
            Ok(())
        }

        Commands::Patterns { category } => {
            let category = category
                .as_deref()
                .map(str::parse::<PatternCategory>)
                .transpose()?;
            let signatures: Vec<_> = match category {
                Some(c) => library.by_category(c).collect(),
                None => library.iter().collect(),
            };

            if out.is_json() {
                return out.emit_json(&signatures);
            }
            out.section(&format!("📚 {} patterns", signatures.len()));
            out.pattern_table(signatures.into_iter());
            Ok(())
        }

        Commands::Config { init } => {
            let path = match config_path {
                Some(p) => Some(p.to_path_buf()),
                None => EngineConfig::config_file_path(),
            };

            if init {
                let path = path.context("Could not determine a config directory")?;
                let written = write_default_config(&path)?;
                if out.is_json() {
                    return out.emit_json(&written);
                }
                out.success(&format!("Wrote defaults to {}", path.display()));
                return Ok(());
            }

            let config = load_config(config_path, None)?;
            if out.is_json() {
                return out.emit_json(&config);
            }
            out.section("⚙️  Engine configuration");
            out.table(&[
                (
                    "File",
                    path.map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(none)".to_string()),
                ),
                ("Engine threshold", format!("{:.2}", config.engine_threshold)),
                ("Recognizer threshold", format!("{:.2}", config.recognizer_threshold)),
                ("Keyword weight", format!("{:.2}", config.keyword_weight)),
                ("Density cap", format!("{:.2}", config.density_cap)),
                ("Structural weight", format!("{:.2}", config.structural_weight)),
                ("Indicator weight", format!("{:.2}", config.indicator_weight)),
                (
                    "Max results",
                    config
                        .max_results
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "unlimited".to_string()),
                ),
            ]);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_default_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codelens").join("config.json");

        let written = write_default_config(&path).unwrap();
        assert_eq!(written["path"], path.display().to_string());
        assert_eq!(written["config"]["recognizer_threshold"], 0.3);
        assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(Path::new("-"), None), Language::JavaScript);
        assert_eq!(resolve_language(Path::new("a.py"), None), Language::Python);
        assert_eq!(resolve_language(Path::new("a.py"), Some("go")), Language::Go);
        assert_eq!(
            resolve_language(Path::new("notes.txt"), None),
            Language::Other("txt".to_string())
        );
    }
}
