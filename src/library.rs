// Static pattern library - the signature table every engine scores against
use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::{
    Complexity, ComplexityIndicator as I, Explanation, ExplanationLevel, PatternCategory,
    PatternSignature, StructuralPredicate as S, VisualizationKind, VisualizationTemplate,
};

lazy_static! {
    static ref BUILTIN: PatternLibrary = PatternLibrary::new(builtin_signatures(), builtin_templates());
}

/// Read-only registry of pattern signatures and visualization templates.
///
/// Iteration order is table order, which is also the tie-break order for equal confidences.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    signatures: Vec<PatternSignature>,
    templates: Vec<VisualizationTemplate>,
    by_id: HashMap<&'static str, usize>,
    templates_by_id: HashMap<&'static str, usize>,
}

impl PatternLibrary {
    pub fn new(signatures: Vec<PatternSignature>, templates: Vec<VisualizationTemplate>) -> Self {
        let by_id = signatures
            .iter()
            .enumerate()
            .map(|(idx, sig)| (sig.id, idx))
            .collect();
        let templates_by_id = templates
            .iter()
            .enumerate()
            .map(|(idx, tpl)| (tpl.id, idx))
            .collect();

        Self {
            signatures,
            templates,
            by_id,
            templates_by_id,
        }
    }

    /// The process-wide built-in library, built on first use
    pub fn builtin() -> &'static PatternLibrary {
        &*BUILTIN
    }

    pub fn get(&self, id: &str) -> Option<&PatternSignature> {
        self.by_id.get(id).map(|&idx| &self.signatures[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternSignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn by_category(&self, category: PatternCategory) -> impl Iterator<Item = &PatternSignature> {
        self.signatures
            .iter()
            .filter(move |sig| sig.category == category)
    }

    /// Explanation text for a pattern; empty for unknown ids
    pub fn explanation(&self, id: &str, level: ExplanationLevel) -> &'static str {
        self.get(id)
            .map(|sig| sig.explanation.at(level))
            .unwrap_or("")
    }

    /// Visualization template referenced by a pattern
    pub fn visualization_template(&self, id: &str) -> Option<&VisualizationTemplate> {
        let sig = self.get(id)?;
        self.templates_by_id
            .get(sig.visualization)
            .map(|&idx| &self.templates[idx])
    }

    pub fn templates(&self) -> impl Iterator<Item = &VisualizationTemplate> {
        self.templates.iter()
    }
}

fn builtin_signatures() -> Vec<PatternSignature> {
    vec![
        // Algorithms
        PatternSignature {
            id: "fibonacci-memoized",
            name: "Memoized Fibonacci",
            category: PatternCategory::Algorithm,
            keywords: &["fibonacci", "memo", "cache", "dp"],
            structural: &[S::Memoization, S::RecursiveCall, S::BaseCase, S::SumOfTwoCalls],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(n)"),
            explanation: Explanation {
                simplified: "Like recursive Fibonacci, but every answer is written down the first time it is computed, so nothing is calculated twice.",
                technical: "Top-down dynamic programming: results of F(k) are stored in a lookup table keyed by k. Each subproblem is solved once, giving O(n) time and O(n) space for the table and call stack.",
            },
            visualization: "memo-table",
        },
        PatternSignature {
            id: "fibonacci-recursive",
            name: "Recursive Fibonacci",
            category: PatternCategory::Algorithm,
            keywords: &["fibonacci", "fib", "n - 1", "n - 2"],
            structural: &[S::RecursiveCall, S::BaseCase, S::SumOfTwoCalls],
            indicators: &[I::ExponentialGrowth],
            complexity: Complexity::new("O(2^n)", "O(n)"),
            explanation: Explanation {
                simplified: "Each Fibonacci number is the sum of the two before it. The function asks itself for those two numbers, which asks again, and so on until it reaches 0 or 1.",
                technical: "Naive tree recursion F(n) = F(n-1) + F(n-2) with base cases F(0)=0, F(1)=1. The call tree has O(phi^n) nodes, bounded by O(2^n) time, and the recursion depth gives O(n) stack space. Overlapping subproblems make it a textbook candidate for memoization.",
            },
            visualization: "recursion-tree",
        },
        PatternSignature {
            id: "factorial-recursive",
            name: "Recursive Factorial",
            category: PatternCategory::Algorithm,
            keywords: &["factorial", "fact", "n * "],
            structural: &[S::RecursiveCall, S::BaseCase, S::ProductRecursion],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(n)"),
            explanation: Explanation {
                simplified: "To get n!, multiply n by the factorial of the number just below it, stopping when you reach 1.",
                technical: "Linear recursion n! = n * (n-1)! with base case 0! = 1! = 1. One call per level yields O(n) time and O(n) stack depth; the tail-recursive or iterative form reduces space to O(1).",
            },
            visualization: "call-stack",
        },
        PatternSignature {
            id: "binary-search",
            name: "Binary Search",
            category: PatternCategory::Algorithm,
            keywords: &["binary", "search", "left", "right", "mid", "target"],
            structural: &[S::MidpointCalculation, S::RangeNarrowing, S::WhileLoop],
            indicators: &[I::LogarithmicGrowth],
            complexity: Complexity::new("O(log n)", "O(1)"),
            explanation: Explanation {
                simplified: "Look at the middle of a sorted list. If the value you want is smaller, throw away the right half; if larger, throw away the left half. Repeat until found.",
                technical: "Maintains an inclusive search interval [left, right] over a sorted sequence and compares the midpoint against the target, discarding half of the interval per iteration. Terminates in at most floor(log2 n) + 1 comparisons with O(1) auxiliary space.",
            },
            visualization: "array-pointers",
        },
        PatternSignature {
            id: "linear-search",
            name: "Linear Search",
            category: PatternCategory::Algorithm,
            keywords: &["search", "find", "target", "indexof"],
            structural: &[S::SingleLoop, S::EarlyReturn],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(1)"),
            explanation: Explanation {
                simplified: "Check every item one by one until you find the one you are looking for.",
                technical: "Sequential scan comparing each element with the target and returning on the first match. Worst and average case O(n) comparisons, O(1) space, no ordering precondition.",
            },
            visualization: "array-scan",
        },
        PatternSignature {
            id: "two-pointers",
            name: "Two Pointers",
            category: PatternCategory::Algorithm,
            keywords: &["left", "right", "pointer", "start", "end"],
            structural: &[S::TwoPointerMovement, S::WhileLoop],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(1)"),
            explanation: Explanation {
                simplified: "Two markers start at different places in the list and walk toward each other, skipping work a double loop would repeat.",
                technical: "Two indices traverse the sequence monotonically (typically from both ends toward the middle), exploiting ordering to discard candidate pairs. Each index moves at most n times, so the scan is O(n) with O(1) space.",
            },
            visualization: "array-pointers",
        },
        PatternSignature {
            id: "sliding-window",
            name: "Sliding Window",
            category: PatternCategory::Algorithm,
            keywords: &["window", "sliding", "subarray", "maxsum"],
            structural: &[S::WindowAdjustment, S::SingleLoop],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(1)"),
            explanation: Explanation {
                simplified: "Keep a running total over a fixed-size slice of the list. Moving the slice one step means adding the new item and removing the old one.",
                technical: "Maintains an aggregate over a contiguous window, updating it incrementally as the window advances instead of recomputing it. Reduces O(n*k) naive evaluation to O(n) time with O(1) extra state.",
            },
            visualization: "array-window",
        },
        PatternSignature {
            id: "bubble-sort",
            name: "Bubble Sort",
            category: PatternCategory::Algorithm,
            keywords: &["bubble", "sort", "swap", "temp"],
            structural: &[S::NestedLoops, S::AdjacentComparison, S::SwapOperation],
            indicators: &[I::QuadraticGrowth],
            complexity: Complexity::new("O(n^2)", "O(1)"),
            explanation: Explanation {
                simplified: "Walk through the list comparing neighbours and swapping them when they are in the wrong order. After each pass the biggest item has bubbled to the end.",
                technical: "In-place comparison sort performing repeated passes of adjacent compare-and-swap. Pass i fixes the i-th largest element, giving O(n^2) comparisons and swaps in the worst case, O(1) auxiliary space, and stability.",
            },
            visualization: "array-bars",
        },
        PatternSignature {
            id: "selection-sort",
            name: "Selection Sort",
            category: PatternCategory::Algorithm,
            keywords: &["selection", "sort", "min", "swap"],
            structural: &[S::NestedLoops, S::MinTracking, S::SwapOperation],
            indicators: &[I::QuadraticGrowth],
            complexity: Complexity::new("O(n^2)", "O(1)"),
            explanation: Explanation {
                simplified: "Find the smallest item and put it first, then find the next smallest and put it second, and so on.",
                technical: "In-place sort that repeatedly selects the minimum of the unsorted suffix and swaps it into position. Always performs n(n-1)/2 comparisons but at most n-1 swaps; not stable in its usual form.",
            },
            visualization: "array-bars",
        },
        PatternSignature {
            id: "insertion-sort",
            name: "Insertion Sort",
            category: PatternCategory::Algorithm,
            keywords: &["insertion", "sort", "key", "shift"],
            structural: &[S::NestedLoops, S::ShiftElements, S::WhileLoop],
            indicators: &[I::QuadraticGrowth],
            complexity: Complexity::new("O(n^2)", "O(1)"),
            explanation: Explanation {
                simplified: "Take items one at a time and slide each one left until it sits in the right place among the items already sorted.",
                technical: "Grows a sorted prefix by shifting larger elements right and inserting the current key. O(n^2) worst case, O(n) on nearly sorted input, stable, in place and online.",
            },
            visualization: "array-bars",
        },
        PatternSignature {
            id: "merge-sort",
            name: "Merge Sort",
            category: PatternCategory::Algorithm,
            keywords: &["merge", "sort", "mid", "left", "right"],
            structural: &[S::RecursiveCall, S::DivideAndMerge, S::MidpointCalculation],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n log n)", "O(n)"),
            explanation: Explanation {
                simplified: "Split the list in half, sort each half, then zip the two sorted halves back together.",
                technical: "Divide-and-conquer sort with recurrence T(n) = 2T(n/2) + O(n), solved as O(n log n) in all cases. The merge step needs an O(n) auxiliary buffer; the algorithm is stable.",
            },
            visualization: "recursion-tree",
        },
        PatternSignature {
            id: "quick-sort",
            name: "Quick Sort",
            category: PatternCategory::Algorithm,
            keywords: &["quick", "sort", "pivot", "partition"],
            structural: &[S::RecursiveCall, S::PivotPartition],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n log n)", "O(log n)"),
            explanation: Explanation {
                simplified: "Pick one item as a pivot, move smaller items to its left and bigger ones to its right, then sort both sides the same way.",
                technical: "Partition-based divide and conquer. Expected O(n log n) time with random or median pivots, O(n^2) worst case on adversarial input, O(log n) expected stack space; in place but not stable.",
            },
            visualization: "array-bars",
        },
        PatternSignature {
            id: "depth-first-search",
            name: "Depth-First Search",
            category: PatternCategory::Algorithm,
            keywords: &["dfs", "depth", "visited", "neighbor"],
            structural: &[S::VisitedSet, S::RecursiveCall, S::StackOperations],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(V + E)", "O(V)"),
            explanation: Explanation {
                simplified: "Explore a maze by following one path as far as it goes, then back up and try the next turn you skipped.",
                technical: "Graph traversal using recursion or an explicit stack, marking vertices visited to avoid cycles. Visits each vertex and edge once: O(V + E) time, O(V) space for the visited set and stack.",
            },
            visualization: "graph-traversal",
        },
        PatternSignature {
            id: "breadth-first-search",
            name: "Breadth-First Search",
            category: PatternCategory::Algorithm,
            keywords: &["bfs", "breadth", "queue", "visited", "level"],
            structural: &[S::VisitedSet, S::QueueOperations, S::WhileLoop],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(V + E)", "O(V)"),
            explanation: Explanation {
                simplified: "Explore everything one step away first, then everything two steps away, like ripples spreading in a pond.",
                technical: "Level-order graph traversal driven by a FIFO queue with a visited set. O(V + E) time and O(V) space; yields shortest paths in unweighted graphs.",
            },
            visualization: "graph-traversal",
        },
        // Data structures
        PatternSignature {
            id: "linked-list",
            name: "Linked List",
            category: PatternCategory::DataStructure,
            keywords: &["node", "next", "head", "tail", "linked"],
            structural: &[S::NodeStructure, S::NextPointer],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(n)", "O(n)"),
            explanation: Explanation {
                simplified: "A chain of boxes where each box holds a value and an arrow pointing to the next box.",
                technical: "Sequence of heap-allocated nodes linked by next references. O(1) insertion and removal at a known node, O(n) indexed access and search, no contiguous storage.",
            },
            visualization: "linked-nodes",
        },
        PatternSignature {
            id: "stack",
            name: "Stack",
            category: PatternCategory::DataStructure,
            keywords: &["stack", "push", "pop", "peek", "top"],
            structural: &[S::StackOperations],
            indicators: &[I::CompactCode],
            complexity: Complexity::new("O(1)", "O(n)"),
            explanation: Explanation {
                simplified: "A pile of plates: you always add to and take from the top.",
                technical: "LIFO container supporting push, pop and peek in O(1) (amortized for array-backed implementations). Models call stacks, undo history and expression evaluation.",
            },
            visualization: "stack",
        },
        PatternSignature {
            id: "queue",
            name: "Queue",
            category: PatternCategory::DataStructure,
            keywords: &["queue", "enqueue", "dequeue", "front", "rear"],
            structural: &[S::QueueOperations],
            indicators: &[I::CompactCode],
            complexity: Complexity::new("O(1)", "O(n)"),
            explanation: Explanation {
                simplified: "A line at a shop: people join at the back and are served from the front.",
                technical: "FIFO container with enqueue at the rear and dequeue at the front, O(1) with a ring buffer or linked list. Array shift-based dequeues degrade to O(n).",
            },
            visualization: "queue",
        },
        PatternSignature {
            id: "binary-tree",
            name: "Binary Tree",
            category: PatternCategory::DataStructure,
            keywords: &["tree", "node", "left", "right", "root", "insert"],
            structural: &[S::NodeStructure, S::ChildPointers, S::RecursiveCall],
            indicators: &[I::LinearGrowth],
            complexity: Complexity::new("O(log n)", "O(n)"),
            explanation: Explanation {
                simplified: "Each item can have up to two children, one on the left and one on the right, forming a family tree.",
                technical: "Hierarchical structure of nodes with left and right child references. Balanced search trees give O(log n) search, insert and delete; degenerate trees fall back to O(n).",
            },
            visualization: "tree",
        },
        PatternSignature {
            id: "hash-table",
            name: "Hash Table",
            category: PatternCategory::DataStructure,
            keywords: &["hash", "map", "key", "bucket", "dict"],
            structural: &[S::KeyValueAccess],
            indicators: &[I::CompactCode],
            complexity: Complexity::new("O(1)", "O(n)"),
            explanation: Explanation {
                simplified: "A set of labelled drawers: the label tells you exactly which drawer holds the value, so you never search.",
                technical: "Associative array mapping keys to buckets via a hash function. Expected O(1) insert, lookup and delete with a good hash and load factor; O(n) worst case under collisions.",
            },
            visualization: "hash-buckets",
        },
        PatternSignature {
            id: "graph",
            name: "Graph",
            category: PatternCategory::DataStructure,
            keywords: &["graph", "edge", "vertex", "vertices", "adjacency", "neighbor"],
            structural: &[S::AdjacencyList, S::VisitedSet],
            indicators: &[I::HighBranching],
            complexity: Complexity::new("O(V + E)", "O(V + E)"),
            explanation: Explanation {
                simplified: "Dots connected by lines, like cities joined by roads.",
                technical: "Set of vertices and edges, stored here as adjacency lists for O(V + E) space and O(deg(v)) neighbour iteration. Underlies traversal, shortest-path and connectivity algorithms.",
            },
            visualization: "graph-traversal",
        },
        // Design patterns
        PatternSignature {
            id: "singleton",
            name: "Singleton",
            category: PatternCategory::DesignPattern,
            keywords: &["instance", "singleton", "getinstance"],
            structural: &[S::PrivateConstructor],
            indicators: &[I::CompactCode],
            complexity: Complexity::new("O(1)", "O(1)"),
            explanation: Explanation {
                simplified: "Makes sure there is only ever one copy of something, and everyone shares it.",
                technical: "Creational pattern restricting instantiation to a single lazily created instance exposed through a static accessor. Introduces global state, which complicates testing and concurrency.",
            },
            visualization: "object-flow",
        },
        PatternSignature {
            id: "observer",
            name: "Observer",
            category: PatternCategory::DesignPattern,
            keywords: &["subscribe", "notify", "observer", "listener", "emit"],
            structural: &[S::SubscriberList],
            indicators: &[I::CompactCode],
            complexity: Complexity::new("O(n)", "O(n)"),
            explanation: Explanation {
                simplified: "Like a newsletter: people sign up, and whenever something happens everyone on the list gets told.",
                technical: "Behavioural pattern where a subject keeps a list of subscribers and notifies each on state change. Notification is O(n) in subscribers; decouples producers from consumers.",
            },
            visualization: "object-flow",
        },
        PatternSignature {
            id: "factory",
            name: "Factory",
            category: PatternCategory::DesignPattern,
            keywords: &["factory", "create", "type"],
            structural: &[S::ObjectCreation],
            indicators: &[I::HighBranching],
            complexity: Complexity::new("O(1)", "O(1)"),
            explanation: Explanation {
                simplified: "A single place you ask for an object by name, and it builds the right kind for you.",
                technical: "Creational pattern centralizing construction behind a function that selects a concrete type from a discriminator, hiding constructors from callers.",
            },
            visualization: "object-flow",
        },
        // Anti-patterns
        PatternSignature {
            id: "callback-hell",
            name: "Callback Hell",
            category: PatternCategory::AntiPattern,
            keywords: &["callback", "cb", "err"],
            structural: &[S::NestedCallbacks, S::DeepIndentation],
            indicators: &[I::DeepNesting],
            complexity: Complexity::new("O(n)", "O(n)"),
            explanation: Explanation {
                simplified: "Functions tucked inside functions inside functions, drifting further right until the code is hard to follow.",
                technical: "Deeply nested continuation-passing callbacks that scatter error handling and control flow. Flatten with promises, async/await or named functions.",
            },
            visualization: "flow-chart",
        },
        PatternSignature {
            id: "deep-nesting",
            name: "Deep Nesting",
            category: PatternCategory::AntiPattern,
            keywords: &[],
            structural: &[S::DeepIndentation, S::NestedLoops],
            indicators: &[I::DeepNesting, I::HighBranching],
            complexity: Complexity::new("O(n^k)", "O(1)"),
            explanation: Explanation {
                simplified: "Too many blocks inside blocks; each level makes the code harder to read and test.",
                technical: "Excessive nesting of conditionals and loops raises cognitive and cyclomatic complexity. Refactor with guard clauses, early returns and extracted helpers.",
            },
            visualization: "flow-chart",
        },
    ]
}

fn builtin_templates() -> Vec<VisualizationTemplate> {
    vec![
        VisualizationTemplate {
            id: "recursion-tree",
            kind: VisualizationKind::CallTree,
            title: "Recursion tree",
            steps: &[
                "Draw the initial call as the root",
                "Expand each call into its recursive sub-calls",
                "Mark base cases as leaves",
                "Return values flow back up to the root",
            ],
        },
        VisualizationTemplate {
            id: "memo-table",
            kind: VisualizationKind::Table,
            title: "Memoization table",
            steps: &[
                "Start with an empty table",
                "Fill an entry the first time a subproblem is solved",
                "Highlight cache hits on repeated subproblems",
            ],
        },
        VisualizationTemplate {
            id: "call-stack",
            kind: VisualizationKind::Stack,
            title: "Call stack",
            steps: &[
                "Push a frame for each recursive call",
                "Reach the base case at the top of the stack",
                "Pop frames while combining results",
            ],
        },
        VisualizationTemplate {
            id: "array-pointers",
            kind: VisualizationKind::ArrayPointers,
            title: "Array with moving pointers",
            steps: &[
                "Place the pointers on the array",
                "Compare the elements under the pointers",
                "Move one pointer and shrink the range",
                "Stop when the pointers meet or the target is found",
            ],
        },
        VisualizationTemplate {
            id: "array-scan",
            kind: VisualizationKind::ArrayPointers,
            title: "Sequential scan",
            steps: &[
                "Highlight the first element",
                "Compare it with the target",
                "Advance to the next element until a match",
            ],
        },
        VisualizationTemplate {
            id: "array-window",
            kind: VisualizationKind::ArrayPointers,
            title: "Sliding window",
            steps: &[
                "Shade the first window",
                "Slide right: add the entering element",
                "Remove the leaving element and update the best result",
            ],
        },
        VisualizationTemplate {
            id: "array-bars",
            kind: VisualizationKind::ArrayBars,
            title: "Sorting bars",
            steps: &[
                "Render each element as a bar",
                "Highlight the bars being compared",
                "Animate swaps or shifts",
                "Color bars once they reach their final position",
            ],
        },
        VisualizationTemplate {
            id: "graph-traversal",
            kind: VisualizationKind::Graph,
            title: "Graph traversal",
            steps: &[
                "Draw vertices and edges",
                "Mark the start vertex as visited",
                "Expand the frontier one vertex at a time",
                "Color each vertex when it is finished",
            ],
        },
        VisualizationTemplate {
            id: "linked-nodes",
            kind: VisualizationKind::LinkedNodes,
            title: "Linked nodes",
            steps: &[
                "Draw each node as a box with a next arrow",
                "Walk the arrows from the head",
                "Re-point arrows on insert and delete",
            ],
        },
        VisualizationTemplate {
            id: "stack",
            kind: VisualizationKind::Stack,
            title: "Stack",
            steps: &["Push items onto the top", "Pop items from the top"],
        },
        VisualizationTemplate {
            id: "queue",
            kind: VisualizationKind::Queue,
            title: "Queue",
            steps: &["Enqueue items at the rear", "Dequeue items from the front"],
        },
        VisualizationTemplate {
            id: "tree",
            kind: VisualizationKind::Tree,
            title: "Binary tree",
            steps: &[
                "Draw the root",
                "Attach left and right children",
                "Highlight the path taken by a search or insert",
            ],
        },
        VisualizationTemplate {
            id: "hash-buckets",
            kind: VisualizationKind::Table,
            title: "Hash buckets",
            steps: &[
                "Hash the key",
                "Jump to its bucket",
                "Store or read the value, chaining on collision",
            ],
        },
        VisualizationTemplate {
            id: "object-flow",
            kind: VisualizationKind::Flow,
            title: "Object interaction",
            steps: &[
                "Show the participating objects",
                "Animate messages between them",
            ],
        },
        VisualizationTemplate {
            id: "flow-chart",
            kind: VisualizationKind::Flow,
            title: "Control flow",
            steps: &[
                "Draw each block as a node",
                "Indent nested blocks to show depth",
                "Highlight the deepest path",
            ],
        },
    ]
}
