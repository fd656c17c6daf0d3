// Confidence scoring - keyword hits, structural predicates and complexity indicators
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::EngineConfig;
use crate::features::{self, FOR_RE};
use crate::models::{ComplexityIndicator, FeatureVector, PatternSignature, StructuralPredicate};

lazy_static! {
    static ref BASE_CASE_RE: Regex =
        Regex::new(r"(?i)\bif\s*\(?\s*\w+\s*(?:<=|<|===|==)\s*[012]\b\s*\)?").unwrap();
    static ref SUM_OF_TWO_CALLS_RE: Regex = Regex::new(
        r"\w+\s*\(\s*\w+\s*-\s*1\s*(?:,[^()]*)?\)\s*\+\s*\w+\s*\(\s*\w+\s*-\s*2\s*(?:,[^()]*)?\)"
    )
    .unwrap();
    static ref PRODUCT_RECURSION_RE: Regex =
        Regex::new(r"\w+\s*\*\s*\w+\s*\(\s*\w+\s*-\s*1\s*\)").unwrap();
    static ref MEMO_RE: Regex = Regex::new(
        r"(?i)\b(?:memo|cache|dp)\w*\s*(?:\[|\.(?:get|has|set|contains_key|insert)\s*\()|@(?:functools\.)?(?:lru_)?cache\b"
    )
    .unwrap();
    static ref PY_FOR_RE: Regex = Regex::new(r"(?m)^\s*for\s+\w[\w,\s]*?\s+in\b").unwrap();
    static ref WHILE_WORD_RE: Regex = Regex::new(r"\bwhile\b").unwrap();
    static ref ADJACENT_CMP_RE: Regex =
        Regex::new(r"\[\s*\w+\s*\]\s*>=?\s*\w+\s*\[\s*\w+\s*\+\s*1\s*\]").unwrap();
    static ref SWAP_RE: Regex = Regex::new(
        r"(?i)\b(?:temp|tmp)\s*=\s*\w+\s*\[|\bswap\s*\(|\[\s*\w+\s*\[[^\]]+\]\s*,\s*\w+\s*\[[^\]]+\]\s*\]\s*=\s*\[|\w+\s*\[[^\]]+\]\s*,\s*\w+\s*\[[^\]]+\]\s*=\s*\w+\s*\["
    )
    .unwrap();
    static ref MIN_TRACKING_RE: Regex = Regex::new(r"(?i)\b(?:min\w*|smallest)\s*=\s*\w+").unwrap();
    static ref SHIFT_RE: Regex =
        Regex::new(r"\w+\s*\[\s*\w+\s*\+\s*1\s*\]\s*=\s*\w+\s*\[\s*\w+\s*\]").unwrap();
    static ref MIDPOINT_RE: Regex = Regex::new(r"(?i)\bmid\w*\s*=[^;\n]*(?:/\s*2|>>\s*1)").unwrap();
    static ref NARROW_LOW_RE: Regex =
        Regex::new(r"(?i)\b(?:left|low|lo|start|l)\s*=\s*mid\w*\s*\+\s*1").unwrap();
    static ref NARROW_HIGH_RE: Regex =
        Regex::new(r"(?i)\b(?:right|high|hi|end|r)\s*=\s*mid\w*\b").unwrap();
    static ref EARLY_RETURN_RE: Regex =
        Regex::new(r"\bif\b\s*\(?[^)\n]*(?:===?|!=)[^)\n]*\)?\s*:?\s*\{?\s*return\b").unwrap();
    static ref POINTER_INC_RE: Regex =
        Regex::new(r"(?i)\b(?:left|lo|low|start|i|l)\s*(?:\+\+|\+=\s*1\b)").unwrap();
    static ref POINTER_DEC_RE: Regex =
        Regex::new(r"(?i)\b(?:right|hi|high|end|j|r)\s*(?:--|-=\s*1\b)").unwrap();
    static ref WINDOW_ADD_RE: Regex =
        Regex::new(r"(?i)\b(?:window\w*|sum|current\w*)\s*\+=\s*\w+\s*\[").unwrap();
    static ref WINDOW_SUB_RE: Regex =
        Regex::new(r"(?i)\b(?:window\w*|sum|current\w*)\s*-=\s*\w+\s*\[").unwrap();
    static ref MERGE_CALL_RE: Regex = Regex::new(r"(?i)\bmerge\w*\s*\(").unwrap();
    static ref DIVIDE_RE: Regex =
        Regex::new(r"\.slice\s*\(|\[\s*:\s*\w+\s*\]|\[\s*\w+\s*:\s*\]|\bmid\b").unwrap();
    static ref PIVOT_RE: Regex = Regex::new(r"(?i)\bpivot\b").unwrap();
    static ref PARTITION_RE: Regex = Regex::new(r"(?i)\bpartition\w*\s*\(").unwrap();
    static ref VISITED_RE: Regex = Regex::new(r"(?i)\b(?:visited|seen)\b").unwrap();
    static ref QUEUE_OPS_RE: Regex = Regex::new(
        r"\.shift\s*\(\s*\)|\.popleft\s*\(|\.dequeue\s*\(|\.enqueue\s*\(|\.poll\s*\(|\.offer\s*\(|\.push_back\s*\(|\.pop_front\s*\(|\bdeque\b"
    )
    .unwrap();
    static ref PUSH_RE: Regex = Regex::new(r"\.(?:push|append)\s*\(").unwrap();
    static ref POP_RE: Regex = Regex::new(r"\.pop\s*\(\s*\)").unwrap();
    static ref NODE_TYPE_RE: Regex =
        Regex::new(r"(?i)\b(?:class|struct)\s+\w*node\b|\bnew\s+\w*node\s*\(").unwrap();
    static ref NODE_WORD_RE: Regex = Regex::new(r"(?i)\bnode\b").unwrap();
    static ref NEXT_RE: Regex = Regex::new(r"\.next\b").unwrap();
    static ref CHILD_RE: Regex = Regex::new(r"\.(?:left|right)\b").unwrap();
    static ref KEY_VALUE_RE: Regex = Regex::new(
        r"\bnew\s+Map\s*\(|\bHashMap\b|\bdict\s*\(|\.get\s*\(|\.set\s*\(|\[\s*key\s*\]|\bMap<|\bunordered_map\b|\bmap\["
    )
    .unwrap();
    static ref ADJACENCY_RE: Regex =
        Regex::new(r"(?i)\b(?:adj\w*|neighbou?rs?|edges|graph)\s*(?:\[|\.)").unwrap();
    static ref SINGLETON_RE: Regex = Regex::new(
        r"(?i)\bgetinstance\b|\bprivate\s+constructor\b|\bstatic\s+\w*\s*instance\b|\bif\s*\(\s*!\s*[\w.]*instance\b|\binstance\s+is\s+none\b|\b_instance\b"
    )
    .unwrap();
    static ref SUBSCRIBER_RES: Vec<Regex> = [
        r"(?i)\bsubscribe\s*\(",
        r"(?i)\bunsubscribe\s*\(",
        r"(?i)\bnotify\w*\s*\(",
        r"\baddEventListener\s*\(",
        r"\bemit\s*\(",
        r"\.on\s*\(",
        r"(?i)\b(?:observers|listeners|subscribers)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
    static ref CREATE_RE: Regex = Regex::new(r"(?i)\bcreate\w*\s*\(").unwrap();
    static ref DISPATCH_RE: Regex =
        Regex::new(r#"\bswitch\s*\(|\bcase\b|\bnew\s+\w+|\bif\s*\(\s*\w+\s*===?\s*['"]"#).unwrap();
    static ref CALLBACK_CLOSE_RE: Regex = Regex::new(r"\}\s*\)").unwrap();
}

/// Leading-whitespace width (tabs count as four columns) of the most indented line
pub(crate) fn max_indent_width(code: &str) -> usize {
    code.lines()
        .map(|line| {
            line.chars()
                .take_while(|c| c.is_whitespace())
                .map(|c| if c == '\t' { 4 } else { 1 })
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0)
}

fn both_or_half(first: bool, second: bool) -> f64 {
    match (first, second) {
        (true, true) => 1.0,
        (false, false) => 0.0,
        _ => 0.5,
    }
}

fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

/// Evaluate a structural predicate against raw source text. Returns 0.0, 0.5 or 1.0.
pub fn evaluate_predicate(predicate: StructuralPredicate, code: &str) -> f64 {
    use StructuralPredicate::*;

    match predicate {
        RecursiveCall => flag(features::recursive_function(code).is_some()),
        BaseCase => flag(BASE_CASE_RE.is_match(code)),
        SumOfTwoCalls => flag(SUM_OF_TWO_CALLS_RE.is_match(code)),
        ProductRecursion => flag(PRODUCT_RECURSION_RE.is_match(code)),
        Memoization => flag(MEMO_RE.is_match(code)),
        NestedLoops => {
            let for_loops = FOR_RE.find_iter(code).count() + PY_FOR_RE.find_iter(code).count();
            if for_loops >= 2 {
                1.0
            } else {
                0.5
            }
        }
        SingleLoop => match features::count_loops(code) {
            0 => 0.0,
            1 => 1.0,
            _ => 0.5,
        },
        WhileLoop => flag(WHILE_WORD_RE.is_match(code)),
        AdjacentComparison => flag(ADJACENT_CMP_RE.is_match(code)),
        SwapOperation => flag(SWAP_RE.is_match(code)),
        MinTracking => flag(MIN_TRACKING_RE.is_match(code)),
        ShiftElements => flag(SHIFT_RE.is_match(code)),
        MidpointCalculation => flag(MIDPOINT_RE.is_match(code)),
        RangeNarrowing => both_or_half(NARROW_LOW_RE.is_match(code), NARROW_HIGH_RE.is_match(code)),
        EarlyReturn => flag(EARLY_RETURN_RE.is_match(code)),
        TwoPointerMovement => {
            both_or_half(POINTER_INC_RE.is_match(code), POINTER_DEC_RE.is_match(code))
        }
        WindowAdjustment => both_or_half(WINDOW_ADD_RE.is_match(code), WINDOW_SUB_RE.is_match(code)),
        DivideAndMerge => {
            if MERGE_CALL_RE.is_match(code) {
                if DIVIDE_RE.is_match(code) {
                    1.0
                } else {
                    0.5
                }
            } else {
                0.0
            }
        }
        PivotPartition => both_or_half(PIVOT_RE.is_match(code), PARTITION_RE.is_match(code)),
        VisitedSet => flag(VISITED_RE.is_match(code)),
        QueueOperations => flag(QUEUE_OPS_RE.is_match(code)),
        StackOperations => both_or_half(PUSH_RE.is_match(code), POP_RE.is_match(code)),
        NodeStructure => {
            if NODE_TYPE_RE.is_match(code) {
                1.0
            } else if NODE_WORD_RE.is_match(code) {
                0.5
            } else {
                0.0
            }
        }
        NextPointer => flag(NEXT_RE.is_match(code)),
        ChildPointers => flag(CHILD_RE.is_match(code)),
        KeyValueAccess => flag(KEY_VALUE_RE.is_match(code)),
        AdjacencyList => flag(ADJACENCY_RE.is_match(code)),
        PrivateConstructor => flag(SINGLETON_RE.is_match(code)),
        SubscriberList => match SUBSCRIBER_RES.iter().filter(|re| re.is_match(code)).count() {
            0 => 0.0,
            1 => 0.5,
            _ => 1.0,
        },
        ObjectCreation => {
            if CREATE_RE.is_match(code) {
                if DISPATCH_RE.is_match(code) {
                    1.0
                } else {
                    0.5
                }
            } else {
                0.0
            }
        }
        NestedCallbacks => match CALLBACK_CLOSE_RE.find_iter(code).count() {
            0 | 1 => 0.0,
            2 => 0.5,
            _ => 1.0,
        },
        DeepIndentation => match max_indent_width(code) {
            w if w >= 16 => 1.0,
            w if w >= 12 => 0.5,
            _ => 0.0,
        },
    }
}

/// Evaluate a complexity indicator over the feature vector. Returns a value in [0, 1].
pub fn evaluate_indicator(indicator: ComplexityIndicator, features: &FeatureVector) -> f64 {
    use ComplexityIndicator::*;

    let cyclomatic = features.cyclomatic_complexity as f64;
    let structural = features.structural_complexity;

    let value = match indicator {
        ExponentialGrowth => {
            if cyclomatic > 5.0 {
                1.0
            } else {
                cyclomatic / 5.0
            }
        }
        QuadraticGrowth => {
            if structural >= 3.0 {
                1.0
            } else {
                structural / 3.0
            }
        }
        LinearGrowth => {
            if (1.0..3.0).contains(&structural) {
                1.0
            } else {
                0.5
            }
        }
        LogarithmicGrowth => {
            if (3.0..=5.0).contains(&cyclomatic) {
                1.0
            } else {
                0.3
            }
        }
        HighBranching => {
            if cyclomatic >= 4.0 {
                1.0
            } else {
                (cyclomatic - 1.0) / 3.0
            }
        }
        DeepNesting => {
            if features.indentation_complexity >= 8.0 {
                1.0
            } else {
                features.indentation_complexity / 8.0
            }
        }
        CompactCode => match features.token_count {
            n if n < 50 => 1.0,
            n if n < 150 => 0.5,
            _ => 0.0,
        },
    };

    value.clamp(0.0, 1.0)
}

/// Signature keywords present in the code (case-insensitive substring match), in table order
pub fn matched_keywords(code: &str, signature: &PatternSignature) -> Vec<&'static str> {
    let lower = code.to_lowercase();
    signature
        .keywords
        .iter()
        .copied()
        .filter(|kw| lower.contains(&kw.to_lowercase()))
        .collect()
}

/// Weighted combination of keyword, structural and indicator evidence
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScorer {
    keyword_weight: f64,
    density_cap: f64,
    structural_weight: f64,
    indicator_weight: f64,
}

impl ConfidenceScorer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            keyword_weight: config.keyword_weight,
            density_cap: config.density_cap,
            structural_weight: config.structural_weight,
            indicator_weight: config.indicator_weight,
        }
    }

    /// Confidence in [0, 1] that `code` implements `signature`
    pub fn score(&self, code: &str, features: &FeatureVector, signature: &PatternSignature) -> f64 {
        let keyword_score: f64 = matched_keywords(code, signature)
            .into_iter()
            .map(|kw| self.keyword_weight + (2.0 * features.density(kw)).min(self.density_cap))
            .sum();

        let structural_score: f64 = signature
            .structural
            .iter()
            .map(|&predicate| self.structural_weight * evaluate_predicate(predicate, code))
            .sum();

        let indicator_score: f64 = signature
            .indicators
            .iter()
            .map(|&indicator| self.indicator_weight * evaluate_indicator(indicator, features))
            .sum();

        (keyword_score + structural_score + indicator_score).clamp(0.0, 1.0)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
    use crate::library::PatternLibrary;

    const FIBONACCI: &str =
        "function fibonacci(n) { if (n <= 1) return n; return fibonacci(n - 1) + fibonacci(n - 2); }";

    #[test]
    fn test_nested_loops_partial_credit() {
        let two = "for (let i = 0; i < n; i++) { for (let j = 0; j < n; j++) {} }";
        let one = "for (let i = 0; i < n; i++) {}";
        assert_eq!(evaluate_predicate(StructuralPredicate::NestedLoops, two), 1.0);
        assert_eq!(evaluate_predicate(StructuralPredicate::NestedLoops, one), 0.5);
        assert_eq!(evaluate_predicate(StructuralPredicate::NestedLoops, ""), 0.5);
    }

    #[test]
    fn test_fibonacci_predicates() {
        assert_eq!(evaluate_predicate(StructuralPredicate::RecursiveCall, FIBONACCI), 1.0);
        assert_eq!(evaluate_predicate(StructuralPredicate::BaseCase, FIBONACCI), 1.0);
        assert_eq!(evaluate_predicate(StructuralPredicate::SumOfTwoCalls, FIBONACCI), 1.0);
        assert_eq!(evaluate_predicate(StructuralPredicate::ProductRecursion, FIBONACCI), 0.0);

        // extra arguments such as a memo table still count
        let memoized = "memo[n] = fib(n - 1, memo) + fib(n - 2, memo);";
        assert_eq!(evaluate_predicate(StructuralPredicate::SumOfTwoCalls, memoized), 1.0);
    }

    #[test]
    fn test_range_narrowing_partial() {
        assert_eq!(
            evaluate_predicate(StructuralPredicate::RangeNarrowing, "left = mid + 1; right = mid - 1;"),
            1.0
        );
        assert_eq!(
            evaluate_predicate(StructuralPredicate::RangeNarrowing, "lo = mid + 1;"),
            0.5
        );
    }

    #[test]
    fn test_exponential_indicator_scales_linearly() {
        let mut features = extract_features("", "javascript");
        features.cyclomatic_complexity = 2;
        assert!((evaluate_indicator(ComplexityIndicator::ExponentialGrowth, &features) - 0.4).abs() < 1e-9);
        features.cyclomatic_complexity = 6;
        assert_eq!(evaluate_indicator(ComplexityIndicator::ExponentialGrowth, &features), 1.0);
    }

    #[test]
    fn test_indicators_stay_in_unit_interval() {
        let mut features = extract_features("", "javascript");
        features.indentation_complexity = 100.0;
        features.structural_complexity = 40.0;
        features.cyclomatic_complexity = 90;
        for indicator in [
            ComplexityIndicator::ExponentialGrowth,
            ComplexityIndicator::QuadraticGrowth,
            ComplexityIndicator::LinearGrowth,
            ComplexityIndicator::LogarithmicGrowth,
            ComplexityIndicator::HighBranching,
            ComplexityIndicator::DeepNesting,
            ComplexityIndicator::CompactCode,
        ] {
            let value = evaluate_indicator(indicator, &features);
            assert!((0.0..=1.0).contains(&value), "{:?} = {}", indicator, value);
        }
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive_substring() {
        let sig = PatternLibrary::builtin().get("bubble-sort").unwrap();
        assert_eq!(matched_keywords("function BubbleSort(arr) {}", sig), vec!["bubble", "sort"]);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = ConfidenceScorer::default();
        let sig = PatternLibrary::builtin().get("fibonacci-recursive").unwrap();
        let features = extract_features(FIBONACCI, "javascript");
        assert_eq!(scorer.score(FIBONACCI, &features, sig), 1.0);
    }

    #[test]
    fn test_density_bonus_only_for_language_keywords() {
        // "return" is a JavaScript keyword, so it earns a density bonus there and nowhere else
        let sig = PatternSignature {
            keywords: &["return"],
            structural: &[],
            indicators: &[],
            ..PatternLibrary::builtin().get("stack").unwrap().clone()
        };
        let code = "return x";
        let scorer = ConfidenceScorer::default();

        let js = scorer.score(code, &extract_features(code, "javascript"), &sig);
        let unknown = scorer.score(code, &extract_features(code, "klingon"), &sig);

        // density 1/2, doubled and capped at 0.10
        assert!((js - 0.25).abs() < 1e-9);
        assert!((unknown - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_empty_code_scores_low_everywhere() {
        let scorer = ConfidenceScorer::default();
        let features = extract_features("", "javascript");
        for sig in PatternLibrary::builtin().iter() {
            let score = scorer.score("", &features, sig);
            assert!(score < 0.2, "{} scored {}", sig.id, score);
        }
    }
}
