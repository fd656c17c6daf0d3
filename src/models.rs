// Shared data model: features, signatures, predictions and reports
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CodelensError;

/// Lexical summary of a snippet. Built once per analysis call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub token_count: usize,
    pub avg_line_length: f64,
    pub indentation_complexity: f64,
    /// keyword -> fraction of tokens matching it; empty for languages without a keyword list
    pub keyword_density: BTreeMap<String, f64>,
    pub structural_complexity: f64,
    pub cyclomatic_complexity: u32,
}

impl FeatureVector {
    pub fn density(&self, keyword: &str) -> f64 {
        self.keyword_density
            .get(&keyword.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternCategory {
    Algorithm,
    DataStructure,
    DesignPattern,
    AntiPattern,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 4] = [
        PatternCategory::Algorithm,
        PatternCategory::DataStructure,
        PatternCategory::DesignPattern,
        PatternCategory::AntiPattern,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternCategory::Algorithm => "algorithm",
            PatternCategory::DataStructure => "data-structure",
            PatternCategory::DesignPattern => "design-pattern",
            PatternCategory::AntiPattern => "anti-pattern",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternCategory {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "algorithm" | "algorithms" => Ok(PatternCategory::Algorithm),
            "data-structure" | "data-structures" | "datastructure" => {
                Ok(PatternCategory::DataStructure)
            }
            "design-pattern" | "design-patterns" | "pattern" => Ok(PatternCategory::DesignPattern),
            "anti-pattern" | "anti-patterns" | "antipattern" => Ok(PatternCategory::AntiPattern),
            _ => Err(CodelensError::UnknownCategory(s.to_string())),
        }
    }
}

/// Big-O annotation pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub time: &'static str,
    pub space: &'static str,
}

impl Complexity {
    pub const fn new(time: &'static str, space: &'static str) -> Self {
        Self { time, space }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time {}, space {}", self.time, self.space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationLevel {
    Simplified,
    Technical,
}

impl FromStr for ExplanationLevel {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simplified" | "simple" => Ok(ExplanationLevel::Simplified),
            "technical" | "tech" => Ok(ExplanationLevel::Technical),
            _ => Err(CodelensError::UnknownLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub simplified: &'static str,
    pub technical: &'static str,
}

impl Explanation {
    pub fn at(&self, level: ExplanationLevel) -> &'static str {
        match level {
            ExplanationLevel::Simplified => self.simplified,
            ExplanationLevel::Technical => self.technical,
        }
    }
}

/// Named code-shape tests evaluated against the raw source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralPredicate {
    RecursiveCall,
    BaseCase,
    SumOfTwoCalls,
    ProductRecursion,
    Memoization,
    NestedLoops,
    SingleLoop,
    WhileLoop,
    AdjacentComparison,
    SwapOperation,
    MinTracking,
    ShiftElements,
    MidpointCalculation,
    RangeNarrowing,
    EarlyReturn,
    TwoPointerMovement,
    WindowAdjustment,
    DivideAndMerge,
    PivotPartition,
    VisitedSet,
    QueueOperations,
    StackOperations,
    NodeStructure,
    NextPointer,
    ChildPointers,
    KeyValueAccess,
    AdjacencyList,
    PrivateConstructor,
    SubscriberList,
    ObjectCreation,
    NestedCallbacks,
    DeepIndentation,
}

impl StructuralPredicate {
    pub fn name(&self) -> &'static str {
        match self {
            StructuralPredicate::RecursiveCall => "recursive_call",
            StructuralPredicate::BaseCase => "base_case",
            StructuralPredicate::SumOfTwoCalls => "sum_of_two_calls",
            StructuralPredicate::ProductRecursion => "product_recursion",
            StructuralPredicate::Memoization => "memoization",
            StructuralPredicate::NestedLoops => "nested_loops",
            StructuralPredicate::SingleLoop => "single_loop",
            StructuralPredicate::WhileLoop => "while_loop",
            StructuralPredicate::AdjacentComparison => "adjacent_comparison",
            StructuralPredicate::SwapOperation => "swap_operation",
            StructuralPredicate::MinTracking => "min_tracking",
            StructuralPredicate::ShiftElements => "shift_elements",
            StructuralPredicate::MidpointCalculation => "midpoint_calculation",
            StructuralPredicate::RangeNarrowing => "range_narrowing",
            StructuralPredicate::EarlyReturn => "early_return",
            StructuralPredicate::TwoPointerMovement => "two_pointer_movement",
            StructuralPredicate::WindowAdjustment => "window_adjustment",
            StructuralPredicate::DivideAndMerge => "divide_and_merge",
            StructuralPredicate::PivotPartition => "pivot_partition",
            StructuralPredicate::VisitedSet => "visited_set",
            StructuralPredicate::QueueOperations => "queue_operations",
            StructuralPredicate::StackOperations => "stack_operations",
            StructuralPredicate::NodeStructure => "node_structure",
            StructuralPredicate::NextPointer => "next_pointer",
            StructuralPredicate::ChildPointers => "child_pointers",
            StructuralPredicate::KeyValueAccess => "key_value_access",
            StructuralPredicate::AdjacencyList => "adjacency_list",
            StructuralPredicate::PrivateConstructor => "private_constructor",
            StructuralPredicate::SubscriberList => "subscriber_list",
            StructuralPredicate::ObjectCreation => "object_creation",
            StructuralPredicate::NestedCallbacks => "nested_callbacks",
            StructuralPredicate::DeepIndentation => "deep_indentation",
        }
    }
}

/// Named threshold tests over feature-vector fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityIndicator {
    ExponentialGrowth,
    QuadraticGrowth,
    LinearGrowth,
    LogarithmicGrowth,
    HighBranching,
    DeepNesting,
    CompactCode,
}

impl ComplexityIndicator {
    pub fn name(&self) -> &'static str {
        match self {
            ComplexityIndicator::ExponentialGrowth => "exponential_growth",
            ComplexityIndicator::QuadraticGrowth => "quadratic_growth",
            ComplexityIndicator::LinearGrowth => "linear_growth",
            ComplexityIndicator::LogarithmicGrowth => "logarithmic_growth",
            ComplexityIndicator::HighBranching => "high_branching",
            ComplexityIndicator::DeepNesting => "deep_nesting",
            ComplexityIndicator::CompactCode => "compact_code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationKind {
    CallTree,
    ArrayBars,
    ArrayPointers,
    LinkedNodes,
    Stack,
    Queue,
    Tree,
    Graph,
    Table,
    Flow,
}

impl VisualizationKind {
    pub fn name(&self) -> &'static str {
        match self {
            VisualizationKind::CallTree => "call-tree",
            VisualizationKind::ArrayBars => "array-bars",
            VisualizationKind::ArrayPointers => "array-pointers",
            VisualizationKind::LinkedNodes => "linked-nodes",
            VisualizationKind::Stack => "stack",
            VisualizationKind::Queue => "queue",
            VisualizationKind::Tree => "tree",
            VisualizationKind::Graph => "graph",
            VisualizationKind::Table => "table",
            VisualizationKind::Flow => "flow",
        }
    }
}

/// Animation recipe a front end can replay for a recognized pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualizationTemplate {
    pub id: &'static str,
    pub kind: VisualizationKind,
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

/// Hand-authored description of one recognizable pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSignature {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PatternCategory,
    pub keywords: &'static [&'static str],
    pub structural: &'static [StructuralPredicate],
    pub indicators: &'static [ComplexityIndicator],
    pub complexity: Complexity,
    pub explanation: Explanation,
    pub visualization: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPrediction {
    pub pattern_id: &'static str,
    pub name: &'static str,
    pub category: PatternCategory,
    pub complexity: Complexity,
    pub confidence: f64,
    pub features: FeatureVector,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CodeStructure {
    pub functions: usize,
    pub loops: usize,
    pub conditionals: usize,
    pub recursion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub language: String,
    pub patterns: Vec<PatternPrediction>,
    pub main_pattern: Option<PatternPrediction>,
    pub code_structure: CodeStructure,
    pub estimated_complexity: Complexity,
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in PatternCategory::ALL {
            assert_eq!(category.name().parse::<PatternCategory>().unwrap(), category);
        }
        assert!("widget".parse::<PatternCategory>().is_err());
    }

    #[test]
    fn test_explanation_level_parsing() {
        assert_eq!("Technical".parse::<ExplanationLevel>().unwrap(), ExplanationLevel::Technical);
        assert_eq!("simplified".parse::<ExplanationLevel>().unwrap(), ExplanationLevel::Simplified);
        assert!(matches!(
            "expert".parse::<ExplanationLevel>(),
            Err(CodelensError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_missing_density_is_zero() {
        let features = FeatureVector {
            token_count: 0,
            avg_line_length: 0.0,
            indentation_complexity: 0.0,
            keyword_density: BTreeMap::new(),
            structural_complexity: 0.0,
            cyclomatic_complexity: 1,
        };
        assert_eq!(features.density("return"), 0.0);
    }
}
