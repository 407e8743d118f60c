use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::f64::consts::SQRT_2;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathvizError;
use crate::grid::{Grid, Position};
use crate::recorder::OperationKind;

/// Receives every node-status change a finder makes, in traversal order
pub trait NodeObserver {
    fn on_node(&mut self, x: i32, y: i32, kind: OperationKind, value: bool);
}

/// Observer that drops everything
pub struct NullObserver;

impl NodeObserver for NullObserver {
    fn on_node(&mut self, _x: i32, _y: i32, _kind: OperationKind, _value: bool) {}
}

/// A grid search algorithm.
///
/// Returns the waypoints from `start` to `end` inclusive, or an empty path
/// when `end` is unreachable. The grid is a private snapshot the finder may
/// scribble on.
pub trait Finder {
    fn name(&self) -> &'static str;

    fn find_path(
        &self,
        start: Position,
        end: Position,
        grid: &mut Grid,
        observer: &mut dyn NodeObserver,
    ) -> Vec<Position>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(self, from: Position, to: Position) -> f64 {
        let dx = (from.x - to.x).abs() as f64;
        let dy = (from.y - to.y).abs() as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Octile => {
                let f = SQRT_2 - 1.0;
                if dx < dy {
                    f * dx + dy
                } else {
                    f * dy + dx
                }
            }
            Heuristic::Chebyshev => dx.max(dy),
        }
    }
}

impl FromStr for Heuristic {
    type Err = PathvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "euclidean" => Ok(Heuristic::Euclidean),
            "octile" => Ok(Heuristic::Octile),
            "chebyshev" => Ok(Heuristic::Chebyshev),
            _ => Err(PathvizError::UnknownHeuristic { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for Heuristic {
    type Error = PathvizError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// The finders the visualizer can run
/// Config names are matched loosely: case, `-`, `_` and spaces are ignored,
/// and `bfs` is accepted for breadth-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FinderKind {
    #[default]
    AStar,
    BestFirst,
    BreadthFirst,
    Dijkstra,
}

impl FinderKind {
    pub const ALL: [FinderKind; 4] = [
        FinderKind::AStar,
        FinderKind::BestFirst,
        FinderKind::BreadthFirst,
        FinderKind::Dijkstra,
    ];

    pub fn build(self, heuristic: Heuristic, allow_diagonal: bool) -> Box<dyn Finder> {
        match self {
            FinderKind::AStar => Box::new(AStarFinder::new(heuristic, allow_diagonal)),
            FinderKind::BestFirst => Box::new(AStarFinder::best_first(heuristic, allow_diagonal)),
            FinderKind::BreadthFirst => Box::new(BreadthFirstFinder { allow_diagonal }),
            FinderKind::Dijkstra => Box::new(AStarFinder::dijkstra(allow_diagonal)),
        }
    }
}

impl FromStr for FinderKind {
    type Err = PathvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "astar" => Ok(FinderKind::AStar),
            "bestfirst" => Ok(FinderKind::BestFirst),
            "breadthfirst" | "bfs" => Ok(FinderKind::BreadthFirst),
            "dijkstra" => Ok(FinderKind::Dijkstra),
            _ => Err(PathvizError::UnknownFinder { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for FinderKind {
    type Error = PathvizError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// A node in the open list
#[derive(Debug, Clone)]
struct OpenNode {
    position: Position,
    f: f64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            // Tie-breaker: use position for deterministic ordering
            .then_with(|| other.position.x.cmp(&self.position.x))
            .then_with(|| other.position.y.cmp(&self.position.y))
    }
}

fn step_cost(from: Position, to: Position) -> f64 {
    if from.x != to.x && from.y != to.y {
        SQRT_2
    } else {
        1.0
    }
}

fn backtrace(parents: &HashMap<Position, Position>, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

fn endpoints_usable(grid: &Grid, start: Position, end: Position) -> bool {
    grid.is_walkable_at(start.x, start.y) && grid.is_walkable_at(end.x, end.y)
}

/// Best-first search on `g + weight * h`.
///
/// Plain A* uses weight 1, greedy best-first a very large weight, and
/// Dijkstra ignores the heuristic.
#[derive(Debug, Clone)]
pub struct AStarFinder {
    pub heuristic: Heuristic,
    pub weight: f64,
    pub allow_diagonal: bool,
    name: &'static str,
}

impl AStarFinder {
    pub fn new(heuristic: Heuristic, allow_diagonal: bool) -> Self {
        AStarFinder {
            heuristic,
            weight: 1.0,
            allow_diagonal,
            name: "A*",
        }
    }

    pub fn best_first(heuristic: Heuristic, allow_diagonal: bool) -> Self {
        AStarFinder {
            heuristic,
            weight: 1_000_000.0,
            allow_diagonal,
            name: "Best-First",
        }
    }

    pub fn dijkstra(allow_diagonal: bool) -> Self {
        AStarFinder {
            heuristic: Heuristic::Manhattan,
            weight: 0.0,
            allow_diagonal,
            name: "Dijkstra",
        }
    }
}

impl Finder for AStarFinder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn find_path(
        &self,
        start: Position,
        end: Position,
        grid: &mut Grid,
        observer: &mut dyn NodeObserver,
    ) -> Vec<Position> {
        if !endpoints_usable(grid, start, end) {
            return Vec::new();
        }

        let mut open: BinaryHeap<OpenNode> = BinaryHeap::new();
        let mut g_scores: HashMap<Position, f64> = HashMap::new();
        let mut parents: HashMap<Position, Position> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();

        g_scores.insert(start, 0.0);
        open.push(OpenNode { position: start, f: 0.0 });
        observer.on_node(start.x, start.y, OperationKind::Opened, true);

        while let Some(node) = open.pop() {
            let pos = node.position;
            // Stale entry left behind by a cheaper re-open
            if !closed.insert(pos) {
                continue;
            }
            observer.on_node(pos.x, pos.y, OperationKind::Closed, true);

            if pos == end {
                return backtrace(&parents, end);
            }

            let g = g_scores[&pos];
            for next in grid.neighbors(pos, self.allow_diagonal) {
                if closed.contains(&next) {
                    continue;
                }

                let tentative = g + step_cost(pos, next);
                let known = g_scores.get(&next).copied();
                if known.is_some_and(|best| tentative >= best) {
                    continue;
                }

                g_scores.insert(next, tentative);
                parents.insert(next, pos);
                observer.on_node(next.x, next.y, OperationKind::Parent, true);

                let f = tentative + self.weight * self.heuristic.estimate(next, end);
                open.push(OpenNode { position: next, f });
                if known.is_none() {
                    observer.on_node(next.x, next.y, OperationKind::Opened, true);
                }
            }
        }

        Vec::new()
    }
}

/// Unweighted breadth-first search
#[derive(Debug, Clone, Default)]
pub struct BreadthFirstFinder {
    pub allow_diagonal: bool,
}

impl Finder for BreadthFirstFinder {
    fn name(&self) -> &'static str {
        "Breadth-First"
    }

    fn find_path(
        &self,
        start: Position,
        end: Position,
        grid: &mut Grid,
        observer: &mut dyn NodeObserver,
    ) -> Vec<Position> {
        if !endpoints_usable(grid, start, end) {
            return Vec::new();
        }

        let mut queue = VecDeque::from([start]);
        let mut opened: HashSet<Position> = HashSet::from([start]);
        let mut parents: HashMap<Position, Position> = HashMap::new();
        observer.on_node(start.x, start.y, OperationKind::Opened, true);

        while let Some(pos) = queue.pop_front() {
            observer.on_node(pos.x, pos.y, OperationKind::Closed, true);

            if pos == end {
                return backtrace(&parents, end);
            }

            for next in grid.neighbors(pos, self.allow_diagonal) {
                if !opened.insert(next) {
                    continue;
                }
                parents.insert(next, pos);
                observer.on_node(next.x, next.y, OperationKind::Parent, true);
                observer.on_node(next.x, next.y, OperationKind::Opened, true);
                queue.push_back(next);
            }
        }

        Vec::new()
    }
}

/// Total Euclidean length of a path; zero for empty or single-point paths
pub fn path_length(path: &[Position]) -> f64 {
    // `sum` of an empty f64 iterator is -0.0
    path.windows(2)
        .fold(0.0, |total, pair| total + pair[0].distance(&pair[1]))
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|pos| format!("({},{})", pos.x, pos.y))
        .collect::<Vec<_>>()
        .join(" -> ")
}
