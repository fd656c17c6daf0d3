//! Rule-based recognition of common algorithms, data structures and design patterns in
//! source snippets.
//!
//! ```no_run
//! use codelens::PatternRecognizer;
//!
//! let report = PatternRecognizer::default().analyze("def f(n): return f(n - 1)", "python");
//! println!("{:?}", report.main_pattern.map(|p| p.pattern_id));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod language;
pub mod library;
pub mod models;
pub mod reasoning;
pub mod recognizer;
pub mod scorer;
pub mod structure;
pub mod suggestions;

pub use config::EngineConfig;
pub use engine::PatternEngine;
pub use error::{CodelensError, Result};
pub use features::{extract_features, extract_features_for};
pub use language::Language;
pub use library::PatternLibrary;
pub use models::{
    AnalysisReport, CodeStructure, Complexity, ExplanationLevel, FeatureVector, PatternCategory,
    PatternPrediction, PatternSignature, VisualizationTemplate,
};
pub use recognizer::PatternRecognizer;
pub use scorer::ConfidenceScorer;
