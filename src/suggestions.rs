// Improvement suggestions derived from the structure summary and the detected pattern
use lazy_static::lazy_static;
use regex::Regex;

use crate::features;
use crate::language::Language;
use crate::models::{CodeStructure, FeatureVector, PatternPrediction, StructuralPredicate};
use crate::scorer::evaluate_predicate;
use crate::structure::max_loop_depth;

lazy_static! {
    static ref DECLARATION_RE: Regex =
        Regex::new(r"\b(?:let(?:\s+mut)?|const|var)\s+([A-Za-z_$][\w$]*)").unwrap();
    static ref VAR_RE: Regex = Regex::new(r"\bvar\s+[A-Za-z_$]").unwrap();
    static ref CONSOLE_LOG_RE: Regex = Regex::new(r"\bconsole\.log\s*\(").unwrap();
    static ref LOOSE_EQUALITY_RE: Regex = Regex::new(r"[^=!<>]\s*[=!]=[^=]").unwrap();
}

const MAX_CYCLOMATIC: u32 = 10;
const MAX_LINE_LENGTH: f64 = 100.0;

/// Declared names that never appear again after their declaration
fn unused_variables(code: &str) -> Vec<String> {
    let mut unused: Vec<String> = Vec::new();
    for caps in DECLARATION_RE.captures_iter(code) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if name.starts_with('_') || unused.iter().any(|n| n == name) {
            continue;
        }
        let uses = Regex::new(&format!(r"(?:^|[^\w$]){}(?:[^\w$]|$)", regex::escape(name)))
            .map(|re| re.find_iter(code).count())
            .unwrap_or(0);
        if uses <= 1 {
            unused.push(name.to_string());
        }
    }
    unused
}

fn self_call_count(code: &str, name: &str) -> usize {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name)))
        .map(|re| re.find_iter(code).count())
        .unwrap_or(0)
}

/// Suggestions in a fixed order: recursion, loops, branching, declarations, style, fallback
pub fn suggestions(
    code: &str,
    language: &Language,
    features: &FeatureVector,
    structure: &CodeStructure,
    main_pattern: Option<&PatternPrediction>,
) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(name) = features::recursive_function(code) {
        let overlapping = evaluate_predicate(StructuralPredicate::SumOfTwoCalls, code) > 0.0
            || self_call_count(code, &name) >= 3;
        let memoized = evaluate_predicate(StructuralPredicate::Memoization, code) > 0.0;
        if overlapping && !memoized {
            out.push(format!(
                "`{}` recomputes overlapping subproblems; memoize results to drop from exponential to linear time",
                name
            ));
        }
        if evaluate_predicate(StructuralPredicate::BaseCase, code) == 0.0 {
            out.push(format!(
                "`{}` is recursive but no base case was found; make sure the recursion terminates",
                name
            ));
        }
    }

    let depth = max_loop_depth(code);
    if depth >= 2 {
        out.push(format!(
            "{} levels of nested loops give O(n^{}) time; consider a hash map or sorting first",
            depth, depth
        ));
    }

    if features.cyclomatic_complexity > MAX_CYCLOMATIC {
        out.push(format!(
            "Cyclomatic complexity of {} is high; split this into smaller functions",
            features.cyclomatic_complexity
        ));
    } else if structure.functions == 0 && structure.conditionals > 3 {
        out.push("Several top-level conditionals; wrapping them in a function would make them testable".to_string());
    }

    for name in unused_variables(code) {
        out.push(format!("Variable `{}` is declared but never used", name));
    }

    if matches!(language, Language::JavaScript | Language::TypeScript) {
        if VAR_RE.is_match(code) {
            out.push("Prefer `let` or `const` over `var`".to_string());
        }
        if CONSOLE_LOG_RE.is_match(code) {
            out.push("Remove `console.log` debugging output".to_string());
        }
        if LOOSE_EQUALITY_RE.is_match(code) {
            out.push("Use strict equality (`===` / `!==`) instead of `==` / `!=`".to_string());
        }
    }

    if features.avg_line_length > MAX_LINE_LENGTH {
        out.push(format!(
            "Average line length is {:.0} characters; wrap long lines",
            features.avg_line_length
        ));
    }

    if main_pattern.is_none() && features.token_count > 0 {
        out.push("No known pattern was recognized; the code may be custom logic".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
    use crate::structure::summarize;

    fn suggest(code: &str, language: &str) -> Vec<String> {
        let features = extract_features(code, language);
        let structure = summarize(code);
        suggestions(code, &Language::from_tag(language), &features, &structure, None)
    }

    #[test]
    fn test_naive_fibonacci_suggests_memoization() {
        let code =
            "function fib(n) { if (n <= 1) return n; return fib(n - 1) + fib(n - 2); }";
        let out = suggest(code, "javascript");
        assert!(out[0].contains("memoize"));
        assert!(!out.iter().any(|s| s.contains("base case")));
        assert!(!out.iter().any(|s| s.contains("strict equality")));
    }

    #[test]
    fn test_memoized_recursion_has_no_memo_suggestion() {
        let code = r#"
function fib(n, memo = {}) {
  if (n <= 1) return n;
  if (memo[n]) return memo[n];
  memo[n] = fib(n - 1, memo) + fib(n - 2, memo);
  return memo[n];
}
"#;
        assert!(!suggest(code, "javascript").iter().any(|s| s.contains("memoize")));
    }

    #[test]
    fn test_missing_base_case_is_flagged() {
        let code = "function forever(n) { return forever(n + 1); }";
        assert!(suggest(code, "javascript").iter().any(|s| s.contains("no base case")));
    }

    #[test]
    fn test_nested_loops_are_flagged() {
        let code = "for (let i = 0; i < n; i++) {\n  for (let j = 0; j < n; j++) {\n    total += i * j;\n  }\n}";
        let out = suggest(code, "javascript");
        assert!(out.iter().any(|s| s.contains("O(n^2)")));
    }

    #[test]
    fn test_unused_variables() {
        assert_eq!(unused_variables("let unused = 5;\nlet used = 1;\nreturn used;"), vec!["unused"]);
        assert_eq!(unused_variables("let mut count = 0;\ncount += 1;"), Vec::<String>::new());
        assert!(unused_variables("const _ignored = f();").is_empty());
    }

    #[test]
    fn test_javascript_style_checks() {
        let out = suggest("var x = 1;\nif (x == 2) console.log(x);", "javascript");
        assert!(out.iter().any(|s| s.contains("`var`")));
        assert!(out.iter().any(|s| s.contains("console.log")));
        assert!(out.iter().any(|s| s.contains("strict equality")));

        // style checks are JavaScript-only
        let python = suggest("if x == 2:\n    print(x)", "python");
        assert!(!python.iter().any(|s| s.contains("strict equality")));
    }

    #[test]
    fn test_strict_equality_is_not_flagged() {
        let out = suggest("if (a === b && c !== d && e <= f && g >= h) { run(); }", "javascript");
        assert!(!out.iter().any(|s| s.contains("strict equality")));
    }

    #[test]
    fn test_no_pattern_fallback() {
        let out = suggest("print(42)", "python");
        assert_eq!(out.last().unwrap(), "No known pattern was recognized; the code may be custom logic");
        assert!(suggest("", "python").is_empty());
    }
}
