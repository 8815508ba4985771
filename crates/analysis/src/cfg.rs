use std::collections::BTreeSet;
use std::fmt;

use fnv::FnvHashMap;
use ownir_core::{Label, Program};

use crate::AnalysisError;

/// The lines `begin..end` covered by one block or function, `begin` being its marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub begin: usize,
    pub end: usize,
}

impl Interval {
    /// The first executable line after the marker.
    #[must_use]
    pub const fn body(self) -> usize {
        self.begin + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOfContents {
    intervals: FnvHashMap<Label, Interval>,
}

impl TableOfContents {
    #[must_use]
    pub fn lookup(&self, label: &Label) -> Option<Interval> {
        self.intervals.get(label).copied()
    }

    #[must_use]
    pub fn entry_pc(&self, label: &Label) -> Option<usize> {
        self.lookup(label).map(Interval::body)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, Interval)> {
        self.intervals.iter().map(|(label, interval)| (label, *interval))
    }

    fn insert(&mut self, label: &Label, interval: Interval) -> Result<(), AnalysisError> {
        match self.intervals.insert(label.clone(), interval) {
            None => Ok(()),
            Some(_) => Err(AnalysisError::DuplicateLabel { label: label.clone(), line: interval.begin }),
        }
    }
}

/// Builds the line interval of every block and function.
///
/// The program must open with `Block(@entry)`. An interval is closed whenever the next marker
/// appears, and the last one is closed at the end of the program.
pub fn table_of_contents(program: &Program) -> Result<TableOfContents, AnalysisError> {
    if !program.starts_with_entry() {
        return Err(AnalysisError::MissingEntry);
    }

    let mut toc = TableOfContents::default();
    let mut current = Label::entry();
    let mut begin = 0;

    for (line, instruction) in program.iter().enumerate().skip(1) {
        if let Some(label) = instruction.marker_label() {
            toc.insert(&current, Interval { begin, end: line })?;
            current = label.clone();
            begin = line;
        }
    }

    toc.insert(&current, Interval { begin, end: program.len() })?;

    Ok(toc)
}

/// Every block and function label, in textual order.
pub fn node_list(program: &Program) -> Result<Vec<Label>, AnalysisError> {
    let mut seen = FnvHashMap::default();
    let mut nodes = Vec::new();

    for (line, instruction) in program.iter().enumerate() {
        let Some(label) = instruction.marker_label() else {
            continue;
        };

        if seen.insert(label, line).is_some() {
            return Err(AnalysisError::DuplicateLabel { label: label.clone(), line });
        }

        nodes.push(label.clone());
    }

    Ok(nodes)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: Label,
    pub to: Label,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One edge per `Jump`, two per `Branch`, attributed to the enclosing block.
///
/// `Call` and `Return` don't contribute edges.
#[must_use]
pub fn adjacency_list(program: &Program) -> Vec<Edge> {
    let mut current = Label::entry();
    let mut edges = Vec::new();

    for instruction in program {
        if let Some(label) = instruction.marker_label() {
            current = label.clone();
            continue;
        }

        instruction.visit_targets(|target| {
            edges.push(Edge { from: current.clone(), to: target.clone() });
        });
    }

    edges
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgNode {
    pub label: Label,
    pub predecessors: BTreeSet<Label>,
    pub successors: BTreeSet<Label>,
}

impl CfgNode {
    fn new(label: Label) -> Self {
        Self { label, predecessors: BTreeSet::new(), successors: BTreeSet::new() }
    }
}

fn index_nodes(nodes: &[Label]) -> FnvHashMap<&Label, usize> {
    nodes.iter().enumerate().map(|(idx, label)| (label, idx)).collect()
}

fn endpoints(index: &FnvHashMap<&Label, usize>, edge: &Edge) -> Result<(usize, usize), AnalysisError> {
    let lookup = |label: &Label| {
        index
            .get(label)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownLabel { label: label.clone(), edge: edge.clone() })
    };

    Ok((lookup(&edge.from)?, lookup(&edge.to)?))
}

/// Threads every edge into the successor set of its source and the predecessor set of its target.
pub fn control_flow_graph(nodes: &[Label], edges: &[Edge]) -> Result<Vec<CfgNode>, AnalysisError> {
    if nodes.is_empty() {
        return Err(AnalysisError::EmptyGraph);
    }

    let index = index_nodes(nodes);
    let mut graph: Vec<_> = nodes.iter().cloned().map(CfgNode::new).collect();

    for edge in edges {
        let (from, to) = endpoints(&index, edge)?;
        graph[from].successors.insert(edge.to.clone());
        graph[to].predecessors.insert(edge.from.clone());
    }

    Ok(graph)
}

/// The transitive closure of the edge relation.
///
/// A node is only reachable from itself if it sits on a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reachability {
    reachable: FnvHashMap<Label, BTreeSet<Label>>,
}

impl Reachability {
    #[must_use]
    pub fn reachable_from(&self, label: &Label) -> Option<&BTreeSet<Label>> {
        self.reachable.get(label)
    }

    #[must_use]
    pub fn is_reachable(&self, from: &Label, to: &Label) -> bool {
        self.reachable.get(from).is_some_and(|it| it.contains(to))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &BTreeSet<Label>)> {
        self.reachable.iter()
    }
}

pub fn reachability(nodes: &[Label], edges: &[Edge]) -> Result<Reachability, AnalysisError> {
    let index = index_nodes(nodes);
    let mut successors = vec![Vec::new(); nodes.len()];

    for edge in edges {
        let (from, to) = endpoints(&index, edge)?;
        successors[from].push(to);
    }

    let mut closures: Vec<Option<BTreeSet<usize>>> = vec![None; nodes.len()];

    for root in 0..nodes.len() {
        let mut seen = BTreeSet::new();
        let mut stack = successors[root].clone();

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }

            // an already finished node contributes its whole closure at once.
            match &closures[node] {
                Some(done) => seen.extend(done.iter().copied()),
                None => stack.extend(successors[node].iter().copied()),
            }
        }

        closures[root] = Some(seen);
    }

    let reachable: FnvHashMap<_, _> = nodes
        .iter()
        .zip(closures)
        .map(|(label, closure)| {
            let closure = closure.unwrap_or_default().into_iter().map(|it| nodes[it].clone());
            (label.clone(), closure.collect::<BTreeSet<_>>())
        })
        .collect();

    Ok(Reachability { reachable })
}

/// Every static artifact derived from one program.
///
/// Immutable once built, so it can be shared by any number of evaluations of the same program.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub table: TableOfContents,
    pub nodes: Vec<Label>,
    pub edges: Vec<Edge>,
    pub graph: Vec<CfgNode>,
    pub reachability: Reachability,
}

impl Analysis {
    #[must_use]
    pub fn node(&self, label: &Label) -> Option<&CfgNode> {
        self.graph.iter().find(|it| it.label == *label)
    }
}

pub fn analyze(program: &Program) -> Result<Analysis, AnalysisError> {
    let _span = tracing::debug_span!("analyze", lines = program.len()).entered();

    let table = table_of_contents(program)?;
    let nodes = node_list(program)?;
    let edges = adjacency_list(program);
    let graph = control_flow_graph(&nodes, &edges)?;
    let reachability = reachability(&nodes, &edges)?;

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "built control-flow graph");

    Ok(Analysis { table, nodes, edges, graph, reachability })
}
