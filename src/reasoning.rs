// Reasoning generator - human-readable justification for a pattern score
use crate::features;
use crate::models::{ComplexityIndicator, FeatureVector, PatternSignature};
use crate::scorer::{evaluate_indicator, matched_keywords};

fn indicator_label(indicator: ComplexityIndicator) -> &'static str {
    match indicator {
        ComplexityIndicator::ExponentialGrowth => "Branching recursion suggests exponential growth",
        ComplexityIndicator::QuadraticGrowth => "Control-structure density suggests quadratic growth",
        ComplexityIndicator::LinearGrowth => "Single pass structure suggests linear growth",
        ComplexityIndicator::LogarithmicGrowth => "Small decision set fits a halving search",
        ComplexityIndicator::HighBranching => "Many decision points",
        ComplexityIndicator::DeepNesting => "Deeply nested blocks",
        ComplexityIndicator::CompactCode => "Compact, self-contained snippet",
    }
}

/// Explain why `signature` scored the way it did.
///
/// Order: complexity observations, matched keywords, recursive shape, brevity.
pub fn generate_reasoning(
    code: &str,
    features: &FeatureVector,
    signature: &PatternSignature,
) -> Vec<String> {
    let mut reasoning = Vec::new();

    if features.cyclomatic_complexity > 5 {
        reasoning.push(format!(
            "High cyclomatic complexity ({}) indicates many decision branches",
            features.cyclomatic_complexity
        ));
    }
    if features.structural_complexity >= 3.0 {
        reasoning.push(format!(
            "Structural complexity of {:.1} points to nested control flow",
            features.structural_complexity
        ));
    }
    if features.indentation_complexity >= 8.0 {
        reasoning.push(format!(
            "Indentation complexity of {:.1} shows deeply nested blocks",
            features.indentation_complexity
        ));
    }
    for &indicator in signature.indicators {
        if evaluate_indicator(indicator, features) >= 1.0 {
            reasoning.push(format!("{} ({})", indicator_label(indicator), indicator.name()));
        }
    }

    let keywords = matched_keywords(code, signature);
    if !keywords.is_empty() {
        reasoning.push(format!(
            "Matched {} of {} keywords: {}",
            keywords.len(),
            signature.keywords.len(),
            keywords.join(", ")
        ));
    }

    if let Some(name) = features::recursive_function(code) {
        reasoning.push(format!("Recursive structure detected: `{}` calls itself", name));
    }

    if features.token_count < 50 {
        reasoning.push(format!(
            "Short snippet ({} tokens), typical of a textbook implementation",
            features.token_count
        ));
    }

    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
    use crate::library::PatternLibrary;

    #[test]
    fn test_fibonacci_reasoning_order() {
        let code =
            "function fibonacci(n) { if (n <= 1) return n; return fibonacci(n - 1) + fibonacci(n - 2); }";
        let features = extract_features(code, "javascript");
        let sig = PatternLibrary::builtin().get("fibonacci-recursive").unwrap();

        let reasoning = generate_reasoning(code, &features, sig);
        assert_eq!(reasoning.len(), 3);
        assert!(reasoning[0].starts_with("Matched 4 of 4 keywords"));
        assert_eq!(reasoning[1], "Recursive structure detected: `fibonacci` calls itself");
        assert!(reasoning[2].contains("18 tokens"));
    }

    #[test]
    fn test_complexity_observations_come_first() {
        let code = "function f(a) {\n  if (a && b || c) { if (d) { if (e) { for (;;) {} } } }\n}";
        let features = extract_features(code, "javascript");
        let sig = PatternLibrary::builtin().get("deep-nesting").unwrap();

        let reasoning = generate_reasoning(code, &features, sig);
        assert!(reasoning[0].starts_with("High cyclomatic complexity"));
        assert!(reasoning.last().unwrap().starts_with("Short snippet"));
    }

    #[test]
    fn test_empty_code_only_mentions_brevity() {
        let features = extract_features("", "javascript");
        let sig = PatternLibrary::builtin().get("binary-search").unwrap();
        let reasoning = generate_reasoning("", &features, sig);
        assert_eq!(reasoning, vec!["Short snippet (0 tokens), typical of a textbook implementation"]);
    }
}
