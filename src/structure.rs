// Code structure summary and a rough Big-O estimate
use lazy_static::lazy_static;
use regex::Regex;

use crate::features::{self, TERNARY_RE};
use crate::models::{CodeStructure, Complexity};

lazy_static! {
    static ref CONDITIONAL_RE: Regex = Regex::new(r"\b(?:if|elif|switch)\b").unwrap();
    static ref LOOP_HEADER_RE: Regex =
        Regex::new(r"\b(?:for|while)\b|\bloop\s*\{|\.forEach\s*\(").unwrap();
    static ref HALVING_RE: Regex =
        Regex::new(r"(?i)\bmid\w*\s*=[^;\n]*(?:/\s*2|>>\s*1)|/=\s*2|>>=\s*1").unwrap();
    static ref ALLOCATION_RE: Regex = Regex::new(
        r"\bnew\s+(?:Array|Map|Set)\b|=\s*\[\s*\]|=\s*\{\s*\}|\bvec!|Vec::new\(|\bdict\(|\blist\(|\bmake\(|\.slice\s*\("
    )
    .unwrap();
}

/// Count functions, loops and conditionals and detect self-recursion
pub fn summarize(code: &str) -> CodeStructure {
    CodeStructure {
        functions: features::count_function_definitions(code),
        loops: features::count_loops(code),
        conditionals: CONDITIONAL_RE.find_iter(code).count() + TERNARY_RE.find_iter(code).count(),
        recursion: features::recursive_function(code).is_some(),
    }
}

/// Deepest loop nesting. Brace-delimited code is tracked by braces, everything else by indentation.
pub fn max_loop_depth(code: &str) -> usize {
    if code.contains('{') {
        brace_loop_depth(code)
    } else {
        indent_loop_depth(code)
    }
}

fn brace_loop_depth(code: &str) -> usize {
    let loop_starts: Vec<usize> = LOOP_HEADER_RE.find_iter(code).map(|m| m.start()).collect();
    let mut next_loop = loop_starts.iter().peekable();

    // one entry per open brace: whether it opened a loop body
    let mut scopes: Vec<bool> = Vec::new();
    let mut pending_loops = 0usize;
    let mut parens = 0usize;
    let mut depth = 0usize;
    let mut max_depth = 0usize;

    for (idx, ch) in code.char_indices() {
        while next_loop.peek().is_some_and(|&&start| start <= idx) {
            next_loop.next();
            pending_loops += 1;
        }
        match ch {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '{' => {
                let opens_loop = pending_loops > 0;
                if opens_loop {
                    pending_loops -= 1;
                    depth += 1;
                    max_depth = max_depth.max(depth);
                }
                scopes.push(opens_loop);
            }
            '}' => {
                if scopes.pop() == Some(true) {
                    depth = depth.saturating_sub(1);
                }
            }
            ';' if pending_loops > 0 && parens == 0 => {
                // brace-less loop body: `for (...) x++;`
                max_depth = max_depth.max(depth + 1);
                pending_loops = 0;
            }
            _ => {}
        }
    }

    max_depth
}

fn indent_loop_depth(code: &str) -> usize {
    // indentation of each enclosing loop header
    let mut open: Vec<usize> = Vec::new();
    let mut max_depth = 0usize;

    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();
        while open.last().is_some_and(|&top| top >= indent) {
            open.pop();
        }
        if trimmed.starts_with("for ") || trimmed.starts_with("while ") {
            open.push(indent);
            max_depth = max_depth.max(open.len());
        }
    }

    max_depth
}

/// Estimate time and space complexity from loop depth, halving and recursion shape
pub fn estimate_complexity(code: &str, structure: &CodeStructure) -> Complexity {
    let depth = max_loop_depth(code);
    let allocates = ALLOCATION_RE.is_match(code);

    if structure.recursion {
        let branching = features::recursive_function(code)
            .map(|name| {
                let call = format!(r"\b{}\s*\(", regex::escape(&name));
                Regex::new(&call)
                    .map(|re| re.find_iter(code).count())
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        // definition plus two or more self-calls
        let time = if branching >= 3 && !code.to_lowercase().contains("memo") {
            "O(2^n)"
        } else if HALVING_RE.is_match(code) && depth == 0 {
            "O(log n)"
        } else {
            "O(n)"
        };
        return Complexity::new(time, "O(n)");
    }

    let time = match depth {
        0 => "O(1)",
        1 if HALVING_RE.is_match(code) => "O(log n)",
        1 => "O(n)",
        2 => "O(n^2)",
        _ => "O(n^3)",
    };
    let space = if allocates { "O(n)" } else { "O(1)" };
    Complexity::new(time, space)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts() {
        let code = r#"
function total(items) {
  let sum = 0;
  for (const item of items) {
    if (item > 0) sum += item;
  }
  return sum > 100 ? 100 : sum;
}
"#;
        let structure = summarize(code);
        assert_eq!(structure.functions, 1);
        assert_eq!(structure.loops, 1);
        assert_eq!(structure.conditionals, 2);
        assert!(!structure.recursion);
    }

    #[test]
    fn test_brace_loop_depth() {
        let code = "for (a) { for (b) { x(); } }\nwhile (c) { y(); }";
        assert_eq!(max_loop_depth(code), 2);
        let c_style = "for (let i = 0; i < n; i++) {\n  for (let j = 0; j < n; j++) {\n    for (;;) {}\n  }\n}";
        assert_eq!(max_loop_depth(c_style), 3);
        assert_eq!(max_loop_depth("for (i = 0; i < n; i++) total++;"), 1);
        assert_eq!(max_loop_depth("if (a) { b(); }"), 0);
    }

    #[test]
    fn test_indent_loop_depth() {
        let code = "for i in range(n):\n    for j in range(n):\n        pass\nwhile x:\n    x -= 1";
        assert_eq!(max_loop_depth(code), 2);
    }

    #[test]
    fn test_estimates() {
        let fib = "function fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }";
        assert_eq!(estimate_complexity(fib, &summarize(fib)), Complexity::new("O(2^n)", "O(n)"));

        let nested = "for (a) { for (b) { x(); } }";
        assert_eq!(estimate_complexity(nested, &summarize(nested)).time, "O(n^2)");

        let halving = "while (lo <= hi) { const mid = (lo + hi) >> 1; }";
        assert_eq!(estimate_complexity(halving, &summarize(halving)).time, "O(log n)");

        assert_eq!(estimate_complexity("", &summarize("")), Complexity::new("O(1)", "O(1)"));
    }
}
