// Pattern engine - ranked predictions over the whole signature table
use tracing::debug;

use crate::config::EngineConfig;
use crate::features::extract_features;
use crate::library::PatternLibrary;
use crate::models::{FeatureVector, PatternPrediction};
use crate::reasoning::generate_reasoning;
use crate::scorer::ConfidenceScorer;

/// Score every signature, keep those strictly above `threshold`, and sort descending.
/// Equal confidences keep table order. Callers apply their own result cap.
pub(crate) fn rank_patterns(
    library: &PatternLibrary,
    scorer: &ConfidenceScorer,
    code: &str,
    features: &FeatureVector,
    threshold: f64,
) -> Vec<PatternPrediction> {
    let mut predictions: Vec<PatternPrediction> = library
        .iter()
        .filter_map(|signature| {
            let confidence = scorer.score(code, features, signature);
            if confidence <= threshold {
                return None;
            }
            debug!("Pattern {} scored {:.2}", signature.id, confidence);

            Some(PatternPrediction {
                pattern_id: signature.id,
                name: signature.name,
                category: signature.category,
                complexity: signature.complexity,
                confidence,
                features: features.clone(),
                reasoning: generate_reasoning(code, features, signature),
            })
        })
        .collect();

    // stable sort keeps table order for ties
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
}

pub(crate) fn truncate_to(predictions: &mut Vec<PatternPrediction>, max_results: Option<usize>) {
    if let Some(max) = max_results {
        predictions.truncate(max);
    }
}

/// General-purpose predictor ("ML insights" view). Rule-based; inclusion threshold 0.2 by default.
#[derive(Debug, Clone)]
pub struct PatternEngine<'a> {
    library: &'a PatternLibrary,
    scorer: ConfidenceScorer,
    threshold: f64,
    max_results: Option<usize>,
}

impl<'a> PatternEngine<'a> {
    pub fn new(library: &'a PatternLibrary, config: &EngineConfig) -> Self {
        Self {
            library,
            scorer: ConfidenceScorer::new(config),
            threshold: config.engine_threshold,
            max_results: config.max_results,
        }
    }

    /// Ranked predictions for a snippet; empty when nothing clears the threshold
    pub fn predict(&self, code: &str, language: &str) -> Vec<PatternPrediction> {
        let features = extract_features(code, language);
        self.predict_with_features(code, &features)
    }

    pub fn predict_with_features(&self, code: &str, features: &FeatureVector) -> Vec<PatternPrediction> {
        let mut predictions = rank_patterns(self.library, &self.scorer, code, features, self.threshold);
        truncate_to(&mut predictions, self.max_results);
        predictions
    }

    /// Highest ranked prediction, if any. Ignores `max_results`.
    pub fn top(&self, code: &str, language: &str) -> Option<PatternPrediction> {
        let features = extract_features(code, language);
        rank_patterns(self.library, &self.scorer, code, &features, self.threshold)
            .into_iter()
            .next()
    }
}

impl Default for PatternEngine<'static> {
    fn default() -> Self {
        Self::new(PatternLibrary::builtin(), &EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIBONACCI: &str =
        "function fibonacci(n) { if (n <= 1) return n; return fibonacci(n - 1) + fibonacci(n - 2); }";

    const MEMOIZED_FIBONACCI: &str = r#"
function fibonacci(n, memo = {}) {
  if (n in memo) return memo[n];
  if (n <= 1) return n;
  memo[n] = fibonacci(n - 1, memo) + fibonacci(n - 2, memo);
  return memo[n];
}
"#;

    const BUBBLE_SORT: &str = r#"
function bubbleSort(arr) {
  for (let i = 0; i < arr.length; i++) {
    for (let j = 0; j < arr.length - i - 1; j++) {
      if (arr[j] > arr[j + 1]) {
        let temp = arr[j];
        arr[j] = arr[j + 1];
        arr[j + 1] = temp;
      }
    }
  }
  return arr;
}
"#;

    const BINARY_SEARCH: &str = r#"
function binarySearch(arr, target) {
  let left = 0;
  let right = arr.length - 1;
  while (left <= right) {
    const mid = Math.floor((left + right) / 2);
    if (arr[mid] === target) return mid;
    if (arr[mid] < target) left = mid + 1;
    else right = mid - 1;
  }
  return -1;
}
"#;

    const PYTHON_BUBBLE_SORT: &str = r#"
def bubble_sort(items):
    n = len(items)
    for i in range(n):
        for j in range(0, n - i - 1):
            if items[j] > items[j + 1]:
                items[j], items[j + 1] = items[j + 1], items[j]
    return items
"#;

    fn assert_well_formed(predictions: &[PatternPrediction], threshold: f64) {
        for window in predictions.windows(2) {
            assert!(window[0].confidence >= window[1].confidence);
        }
        for p in predictions {
            assert!((0.0..=1.0).contains(&p.confidence));
            assert!(p.confidence > threshold);
        }
    }

    #[test]
    fn test_fibonacci_is_top_prediction() {
        let engine = PatternEngine::default();
        let predictions = engine.predict(FIBONACCI, "javascript");
        assert_well_formed(&predictions, 0.2);

        let top = &predictions[0];
        assert_eq!(top.pattern_id, "fibonacci-recursive");
        assert!(top.confidence >= 0.8);
        assert_eq!(top.complexity.time, "O(2^n)");
        assert_eq!(top.complexity.space, "O(n)");
        assert_eq!(top.features.token_count, 18);
    }

    #[test]
    fn test_bubble_sort_is_top_prediction() {
        let engine = PatternEngine::default();
        let top = engine.top(BUBBLE_SORT, "javascript").unwrap();
        assert_eq!(top.pattern_id, "bubble-sort");
        assert!(top.confidence >= 0.7);
    }

    #[test]
    fn test_python_bubble_sort_is_top_prediction() {
        let engine = PatternEngine::default();
        let top = engine.top(PYTHON_BUBBLE_SORT, "python").unwrap();
        assert_eq!(top.pattern_id, "bubble-sort");
    }

    #[test]
    fn test_binary_search_is_top_prediction() {
        let engine = PatternEngine::default();
        let predictions = engine.predict(BINARY_SEARCH, "javascript");
        assert_well_formed(&predictions, 0.2);
        assert_eq!(predictions[0].pattern_id, "binary-search");
    }

    #[test]
    fn test_empty_code_predicts_nothing() {
        let engine = PatternEngine::default();
        assert!(engine.predict("", "javascript").is_empty());
        assert!(engine.top("", "javascript").is_none());
    }

    #[test]
    fn test_unsupported_language_degrades_gracefully() {
        let engine = PatternEngine::default();
        let top = engine.top(FIBONACCI, "whitespace-lang").unwrap();
        assert_eq!(top.pattern_id, "fibonacci-recursive");
        assert!(top.features.keyword_density.is_empty());
    }

    #[test]
    fn test_predictions_are_deterministic() {
        let engine = PatternEngine::default();
        for code in [FIBONACCI, BUBBLE_SORT, BINARY_SEARCH] {
            assert_eq!(engine.predict(code, "javascript"), engine.predict(code, "javascript"));
        }
    }

    #[test]
    fn test_max_results_truncates() {
        let config = EngineConfig {
            max_results: Some(1),
            ..EngineConfig::default()
        };
        let engine = PatternEngine::new(PatternLibrary::builtin(), &config);
        assert_eq!(engine.predict(FIBONACCI, "javascript").len(), 1);
    }

    #[test]
    fn test_zero_max_results_keeps_top() {
        let config = EngineConfig {
            max_results: Some(0),
            ..EngineConfig::default()
        };
        let engine = PatternEngine::new(PatternLibrary::builtin(), &config);
        assert!(engine.predict(FIBONACCI, "javascript").is_empty());
        assert_eq!(
            engine.top(FIBONACCI, "javascript").unwrap().pattern_id,
            "fibonacci-recursive"
        );
    }

    #[test]
    fn test_memoized_fibonacci_is_top_prediction() {
        let engine = PatternEngine::default();
        let predictions = engine.predict(MEMOIZED_FIBONACCI, "javascript");
        assert_well_formed(&predictions, 0.2);
        assert_eq!(predictions[0].pattern_id, "fibonacci-memoized");
        assert_eq!(predictions[0].complexity.time, "O(n)");

        // the naive version still belongs to the plain recursive entry
        let naive = engine.predict(FIBONACCI, "javascript");
        assert_eq!(naive[0].pattern_id, "fibonacci-recursive");
        let memo = naive.iter().find(|p| p.pattern_id == "fibonacci-memoized").unwrap();
        assert!(memo.confidence < naive[0].confidence);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let library = PatternLibrary::builtin();
        let config = EngineConfig {
            engine_threshold: 0.0,
            ..EngineConfig::default()
        };
        let engine = PatternEngine::new(library, &config);
        let predictions = engine.predict(FIBONACCI, "javascript");

        let position = |id: &str| library.iter().position(|sig| sig.id == id).unwrap();
        for window in predictions.windows(2) {
            if window[0].confidence == window[1].confidence {
                assert!(position(window[0].pattern_id) < position(window[1].pattern_id));
            }
        }
    }
}
