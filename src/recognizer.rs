// Pattern recognizer - full analysis report for one snippet
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::{rank_patterns, truncate_to};
use crate::features::extract_features_for;
use crate::language::Language;
use crate::library::PatternLibrary;
use crate::models::AnalysisReport;
use crate::scorer::ConfidenceScorer;
use crate::structure::{estimate_complexity, summarize};
use crate::suggestions::suggestions;

/// Produces an [`AnalysisReport`]: ranked patterns above the recognizer threshold (0.3 by
/// default), the main pattern, a structure summary, a complexity estimate and suggestions.
#[derive(Debug, Clone)]
pub struct PatternRecognizer<'a> {
    library: &'a PatternLibrary,
    scorer: ConfidenceScorer,
    threshold: f64,
    max_results: Option<usize>,
}

impl<'a> PatternRecognizer<'a> {
    pub fn new(library: &'a PatternLibrary, config: &EngineConfig) -> Self {
        Self {
            library,
            scorer: ConfidenceScorer::new(config),
            threshold: config.recognizer_threshold,
            max_results: config.max_results,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn analyze(&self, code: &str, language: &str) -> AnalysisReport {
        self.analyze_as(code, &Language::from_tag(language))
    }

    pub fn analyze_as(&self, code: &str, language: &Language) -> AnalysisReport {
        let features = extract_features_for(code, language);
        debug!(
            "Features: {} tokens, cyclomatic {}, structural {:.1}",
            features.token_count, features.cyclomatic_complexity, features.structural_complexity
        );

        let mut patterns = rank_patterns(self.library, &self.scorer, code, &features, self.threshold);
        // main pattern comes from the uncapped ranking
        let main_pattern = patterns.first().cloned();
        truncate_to(&mut patterns, self.max_results);
        match &main_pattern {
            Some(p) => debug!("Main pattern: {} ({:.0}%)", p.name, p.confidence * 100.0),
            None => debug!("No pattern above {:.2}", self.threshold),
        }

        let code_structure = summarize(code);
        let estimated_complexity = estimate_complexity(code, &code_structure);
        let suggestions = suggestions(
            code,
            language,
            &features,
            &code_structure,
            main_pattern.as_ref(),
        );

        AnalysisReport {
            language: language.name().to_string(),
            patterns,
            main_pattern,
            code_structure,
            estimated_complexity,
            suggestions,
        }
    }
}

impl Default for PatternRecognizer<'static> {
    fn default() -> Self {
        Self::new(PatternLibrary::builtin(), &EngineConfig::default())
    }
}
