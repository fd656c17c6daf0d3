// Feature extraction - shallow lexical statistics over raw source text
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

use crate::language::Language;
use crate::models::FeatureVector;

lazy_static! {
    pub(crate) static ref IF_RE: Regex = Regex::new(r"\bif\s*\(").unwrap();
    pub(crate) static ref ELSE_IF_RE: Regex = Regex::new(r"\belse\s+if\s*\(").unwrap();
    pub(crate) static ref WHILE_RE: Regex = Regex::new(r"\bwhile\s*\(").unwrap();
    pub(crate) static ref FOR_RE: Regex = Regex::new(r"\bfor\s*\(").unwrap();
    pub(crate) static ref SWITCH_RE: Regex = Regex::new(r"\bswitch\s*\(").unwrap();
    static ref TRY_RE: Regex = Regex::new(r"\btry\s*\{").unwrap();
    static ref CATCH_RE: Regex = Regex::new(r"\bcatch\s*\(").unwrap();
    static ref CASE_RE: Regex = Regex::new(r"\bcase\b").unwrap();
    static ref AND_RE: Regex = Regex::new(r"&&").unwrap();
    static ref OR_RE: Regex = Regex::new(r"\|\|").unwrap();
    pub(crate) static ref TERNARY_RE: Regex = Regex::new(r"\?[^?:;\n]+:").unwrap();
    static ref LOOP_RE: Regex = Regex::new(
        r"(?m)\bfor\s*\(|\bwhile\s*\(|^[ \t]*for\s+\w[\w,\s]*?\s+in\b|^[ \t]*while\s+[^(\s]|\bloop\s*\{|\.forEach\s*\("
    )
    .unwrap();

    // function/method definitions, one alternative per syntax family
    static ref KEYWORD_DEF_RE: Regex = Regex::new(
        r"\bfunction\b\s*\*?\s*\w*\s*\(|\bdef\s+\w+\s*\(|\bfn\s+\w+|\bfunc\s+(?:\([^)]*\)\s*)?\w+\s*\("
    )
    .unwrap();
    static ref ARROW_DEF_RE: Regex = Regex::new(r"\([^()]*\)\s*=>|\b\w+\s*=>").unwrap();
    static ref C_STYLE_DEF_RE: Regex = Regex::new(
        r"(?m)^[ \t]*(?:[\w:<>\*&\[\]]+[ \t]+)*([\w:<>\*&\[\]]+)[ \t]+(\w+)[ \t]*\([^;{}()]*\)\s*(?:const\s*)?(?:throws\s+[\w,\s]+)?\{"
    )
    .unwrap();
    static ref NAMED_DEF_RE: Regex = Regex::new(
        r"\bfunction\s*\*?\s*(\w+)|\bdef\s+(\w+)|\bfn\s+(\w+)|\bfunc\s+(?:\([^)]*\)\s*)?(\w+)|\b(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s*)?(?:function\b|\([^()]*\)\s*=>|\w+\s*=>)"
    )
    .unwrap();

    static ref KEYWORD_PATTERNS: HashMap<&'static str, Regex> = Language::all_keywords()
        .map(|kw| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(kw));
            (kw, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Words that look like a C-style definition but are control flow or expressions
const NOT_A_DEFINITION: &[&str] = &[
    "if", "while", "for", "switch", "catch", "return", "else", "new", "sizeof", "function", "fn",
    "def", "func", "await", "throw", "typeof", "delete",
];

/// Derive the feature vector for a snippet tagged with a free-form language name.
/// Never fails; empty input yields the base values.
pub fn extract_features(code: &str, language: &str) -> FeatureVector {
    extract_features_for(code, &Language::from_tag(language))
}

pub fn extract_features_for(code: &str, language: &Language) -> FeatureVector {
    let token_count = code.split_whitespace().count();
    let lines: Vec<&str> = code.split('\n').collect();

    let features = FeatureVector {
        token_count,
        avg_line_length: average_line_length(&lines),
        indentation_complexity: indentation_complexity(&lines),
        keyword_density: keyword_density(code, language, token_count),
        structural_complexity: structural_complexity(code),
        cyclomatic_complexity: cyclomatic_complexity(code),
    };

    trace!(
        "Extracted features: {} tokens, cyclomatic {}, structural {:.1}",
        features.token_count,
        features.cyclomatic_complexity,
        features.structural_complexity
    );

    features
}

fn average_line_length(lines: &[&str]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: usize = lines.iter().map(|line| line.chars().count()).sum();
    total as f64 / lines.len() as f64
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn indentation_complexity(lines: &[&str]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let indents: Vec<usize> = lines.iter().map(|line| leading_whitespace(line)).collect();
    let total: usize = indents.iter().sum();
    let max = indents.iter().copied().max().unwrap_or(0);

    total as f64 / lines.len() as f64 + 0.1 * max as f64
}

fn keyword_density(code: &str, language: &Language, token_count: usize) -> BTreeMap<String, f64> {
    language
        .keywords()
        .iter()
        .map(|kw| {
            let density = if token_count == 0 {
                0.0
            } else {
                let hits = KEYWORD_PATTERNS
                    .get(kw)
                    .map(|re| re.find_iter(code).count())
                    .unwrap_or(0);
                hits as f64 / token_count as f64
            };
            (kw.to_string(), density)
        })
        .collect()
}

fn structural_complexity(code: &str) -> f64 {
    let control = [
        &*IF_RE,
        &*ELSE_IF_RE,
        &*WHILE_RE,
        &*FOR_RE,
        &*SWITCH_RE,
        &*TRY_RE,
        &*CATCH_RE,
    ]
    .iter()
    .map(|re| re.find_iter(code).count())
    .sum::<usize>();

    control as f64 + 0.5 * count_function_definitions(code) as f64
}

fn cyclomatic_complexity(code: &str) -> u32 {
    let decisions = [
        &*IF_RE,
        &*ELSE_IF_RE,
        &*WHILE_RE,
        &*FOR_RE,
        &*CASE_RE,
        &*CATCH_RE,
        &*AND_RE,
        &*OR_RE,
        &*TERNARY_RE,
    ]
    .iter()
    .map(|re| re.find_iter(code).count())
    .sum::<usize>();

    1 + decisions as u32
}

/// Number of function or method definitions across the supported syntaxes
pub(crate) fn count_function_definitions(code: &str) -> usize {
    let keyword_defs = KEYWORD_DEF_RE.find_iter(code).count();
    let arrow_defs = ARROW_DEF_RE.find_iter(code).count();
    let c_style_defs = C_STYLE_DEF_RE
        .captures_iter(code)
        .filter(|caps| {
            is_c_style_definition(caps.get(1).map(|m| m.as_str()), caps.get(2).map(|m| m.as_str()))
        })
        .count();

    keyword_defs + arrow_defs + c_style_defs
}

fn is_c_style_definition(prefix: Option<&str>, name: Option<&str>) -> bool {
    match (prefix, name) {
        (Some(prefix), Some(name)) => {
            !NOT_A_DEFINITION.contains(&prefix) && !NOT_A_DEFINITION.contains(&name)
        }
        _ => false,
    }
}

/// Loop constructs: C-style `for(`/`while(`, `for x in`, bare `while cond`, `loop {` and `.forEach(`
pub(crate) fn count_loops(code: &str) -> usize {
    LOOP_RE.find_iter(code).count()
}

/// Names of defined functions, in order of appearance, without duplicates
pub(crate) fn function_names(code: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    let named = NAMED_DEF_RE.captures_iter(code).filter_map(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
    });
    let c_style = C_STYLE_DEF_RE.captures_iter(code).filter_map(|caps| {
        let prefix = caps.get(1).map(|m| m.as_str());
        let name = caps.get(2).map(|m| m.as_str());
        if is_c_style_definition(prefix, name) {
            name.map(str::to_string)
        } else {
            None
        }
    });

    for name in named.chain(c_style) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// First defined function that calls itself (its name appears as a call at least twice)
pub(crate) fn recursive_function(code: &str) -> Option<String> {
    function_names(code).into_iter().find(|name| {
        let call = format!(r"\b{}\s*\(", regex::escape(name));
        Regex::new(&call)
            .map(|re| re.find_iter(code).count() >= 2)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIBONACCI: &str =
        "function fibonacci(n) { if (n <= 1) return n; return fibonacci(n - 1) + fibonacci(n - 2); }";

    #[test]
    fn test_empty_code_yields_base_values() {
        let features = extract_features("", "javascript");
        assert_eq!(features.token_count, 0);
        assert_eq!(features.cyclomatic_complexity, 1);
        assert_eq!(features.structural_complexity, 0.0);
        assert_eq!(features.avg_line_length, 0.0);
        assert_eq!(features.indentation_complexity, 0.0);
        assert!(features.keyword_density.values().all(|d| *d == 0.0));
        assert!(features.keyword_density.values().all(|d| !d.is_nan()));
    }

    #[test]
    fn test_fibonacci_features() {
        let features = extract_features(FIBONACCI, "javascript");
        assert_eq!(features.token_count, 18);
        // one `if(`
        assert_eq!(features.cyclomatic_complexity, 2);
        // one `if(` plus one function definition
        assert_eq!(features.structural_complexity, 1.5);
        assert!((features.density("return") - 2.0 / 18.0).abs() < 1e-9);
        assert!((features.density("function") - 1.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_statistics_count_blank_lines() {
        let code = "ab\n\n    cd";
        let features = extract_features(code, "javascript");
        // lengths 2, 0, 6
        assert!((features.avg_line_length - 8.0 / 3.0).abs() < 1e-9);
        // (0 + 0 + 4) / 3 + 0.1 * 4
        assert!((features.indentation_complexity - (4.0 / 3.0 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_decisions_all_count() {
        let code = "if (a && b) { x(); } else if (c || d) { y(); }";
        let features = extract_features(code, "javascript");
        // if( twice (the else-if also matches if), else-if once, && once, || once
        assert_eq!(features.cyclomatic_complexity, 1 + 2 + 1 + 1 + 1);
    }

    #[test]
    fn test_ternary_and_case_count() {
        let code = "switch (k) { case 1: return a ? b : c; case 2: break; }";
        let features = extract_features(code, "javascript");
        assert_eq!(features.cyclomatic_complexity, 1 + 2 + 1);
        assert_eq!(features.structural_complexity, 1.0);
    }

    #[test]
    fn test_unsupported_language_has_empty_density() {
        let features = extract_features(FIBONACCI, "klingon");
        assert!(features.keyword_density.is_empty());
        assert_eq!(features.token_count, 18);
    }

    #[test]
    fn test_density_is_whole_word_and_case_insensitive() {
        let code = "Return returned return";
        let features = extract_features(code, "javascript");
        assert!((features.density("return") - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_function_definitions_across_syntaxes() {
        assert_eq!(count_function_definitions("def fib(n):\n    return n"), 1);
        assert_eq!(count_function_definitions("fn fib(n: u64) -> u64 { n }"), 1);
        assert_eq!(count_function_definitions("const sq = (x) => x * x;"), 1);
        assert_eq!(count_function_definitions("public static int fib(int n) {\n return n;\n}"), 1);
        assert_eq!(count_function_definitions("} else if (x) {\n}"), 0);
    }

    #[test]
    fn test_loop_counting() {
        assert_eq!(count_loops("for (let i = 0; i < n; i++) { while (x) {} }"), 2);
        assert_eq!(count_loops("for x in items:\n    while x > 0:\n        x -= 1"), 2);
        assert_eq!(count_loops("items.forEach(i => log(i));"), 1);
        assert_eq!(count_loops("const format = 1;"), 0);
    }

    #[test]
    fn test_recursive_function_detection() {
        assert_eq!(recursive_function(FIBONACCI), Some("fibonacci".to_string()));
        assert_eq!(recursive_function("def fact(n):\n    return 1 if n < 2 else n * fact(n - 1)"), Some("fact".to_string()));
        assert_eq!(recursive_function("function add(a, b) { return a + b; }"), None);
    }

    #[test]
    fn test_function_names_deduplicated() {
        let code = "function a() {}\nfunction b() { a(); }\nconst c = () => b();";
        assert_eq!(function_names(code), vec!["a", "b", "c"]);
    }
}
