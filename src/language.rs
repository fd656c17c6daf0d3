// Language tags and their keyword lists
use std::fmt;
use std::path::Path;

/// A declared language tag. Unknown tags are kept verbatim and simply have no keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Cpp,
    Rust,
    Go,
    Other(String),
}

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "function", "return", "if", "else", "for", "while", "const", "let", "var", "class", "new",
    "this", "switch", "case", "break", "continue", "try", "catch", "async", "await",
];

const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "function", "return", "if", "else", "for", "while", "const", "let", "class", "new", "this",
    "interface", "type", "implements", "extends", "public", "private", "readonly", "async", "await",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "return", "if", "elif", "else", "for", "while", "in", "class", "self", "import",
    "from", "lambda", "yield", "try", "except", "with", "and", "or", "not",
];

const JAVA_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "static", "void", "int", "return", "if", "else", "for",
    "while", "class", "new", "this", "switch", "case", "try", "catch", "final", "extends",
];

const CPP_KEYWORDS: &[&str] = &[
    "int", "void", "return", "if", "else", "for", "while", "class", "struct", "new", "delete",
    "template", "typename", "const", "auto", "std", "vector", "nullptr", "switch", "case",
];

const RUST_KEYWORDS: &[&str] = &[
    "fn", "let", "mut", "return", "if", "else", "for", "while", "loop", "match", "struct",
    "enum", "impl", "trait", "pub", "self", "use", "mod", "where", "ref",
];

const GO_KEYWORDS: &[&str] = &[
    "func", "return", "if", "else", "for", "range", "var", "type", "struct", "interface",
    "package", "import", "go", "chan", "defer", "select", "switch", "case", "map", "make",
];

impl Language {
    /// Normalize a free-form tag (`"JS"`, `"c++"`, `"py"`...) to a language
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "javascript" | "js" | "jsx" | "node" | "mjs" => Language::JavaScript,
            "typescript" | "ts" | "tsx" => Language::TypeScript,
            "python" | "py" | "python3" => Language::Python,
            "java" => Language::Java,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Language::Cpp,
            "rust" | "rs" => Language::Rust,
            "go" | "golang" => Language::Go,
            other => Language::Other(other.to_string()),
        }
    }

    /// Guess a language tag from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match Self::from_tag(ext) {
            Language::Other(_) => None,
            lang => Some(lang),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Other(tag) => tag,
        }
    }

    /// Keyword list used for density features; empty for unsupported tags
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => JAVASCRIPT_KEYWORDS,
            Language::TypeScript => TYPESCRIPT_KEYWORDS,
            Language::Python => PYTHON_KEYWORDS,
            Language::Java => JAVA_KEYWORDS,
            Language::Cpp => CPP_KEYWORDS,
            Language::Rust => RUST_KEYWORDS,
            Language::Go => GO_KEYWORDS,
            Language::Other(_) => &[],
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Language::Other(_))
    }

    /// Every keyword across all supported languages
    pub fn all_keywords() -> impl Iterator<Item = &'static str> {
        [
            JAVASCRIPT_KEYWORDS,
            TYPESCRIPT_KEYWORDS,
            PYTHON_KEYWORDS,
            JAVA_KEYWORDS,
            CPP_KEYWORDS,
            RUST_KEYWORDS,
            GO_KEYWORDS,
        ]
        .into_iter()
        .flatten()
        .copied()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Language::from_tag("JS"), Language::JavaScript);
        assert_eq!(Language::from_tag(" c++ "), Language::Cpp);
        assert_eq!(Language::from_tag("golang"), Language::Go);
        assert_eq!(Language::from_tag("COBOL"), Language::Other("cobol".to_string()));
    }

    #[test]
    fn test_unsupported_language_has_no_keywords() {
        let lang = Language::from_tag("brainfuck");
        assert!(!lang.is_supported());
        assert!(lang.keywords().is_empty());
        assert_eq!(lang.name(), "brainfuck");
    }

    #[test]
    fn test_every_supported_language_has_keywords() {
        for tag in ["javascript", "typescript", "python", "java", "cpp", "rust", "go"] {
            assert!(!Language::from_tag(tag).keywords().is_empty(), "{}", tag);
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path(Path::new("src/sort.py")), Some(Language::Python));
        assert_eq!(Language::from_path(Path::new("main.rs")), Some(Language::Rust));
        assert_eq!(Language::from_path(Path::new("notes.txt")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }
}
