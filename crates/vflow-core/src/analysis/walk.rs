use crate::graph::{FlowGraph, NodeId};
use std::collections::{HashSet, VecDeque};

/// Transitive ancestors of `start` (including `start`): every node from
/// which it is reachable along directed edges. An absent start node yields
/// the empty set. The resulting set is deterministic; traversal order is not.
pub fn reachable_ancestors(graph: &FlowGraph, start: Option<NodeId>) -> HashSet<NodeId> {
    walk(graph, start, Direction::Backward)
}

/// Forward twin of [`reachable_ancestors`], following outgoing edges.
pub fn reachable_successors(graph: &FlowGraph, start: Option<NodeId>) -> HashSet<NodeId> {
    walk(graph, start, Direction::Forward)
}

enum Direction {
    Backward,
    Forward,
}

fn walk(graph: &FlowGraph, start: Option<NodeId>, direction: Direction) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let start = match start {
        Some(node) => node,
        None => return visited,
    };

    let mut worklist = VecDeque::new();
    offer(&mut visited, &mut worklist, start);

    while let Some(node) = worklist.pop_front() {
        match direction {
            Direction::Backward => {
                for edge in graph.in_edges(node) {
                    offer(&mut visited, &mut worklist, edge.src);
                }
            }
            Direction::Forward => {
                for edge in graph.out_edges(node) {
                    offer(&mut visited, &mut worklist, edge.dst);
                }
            }
        }
    }

    visited
}

// Membership is recorded at offer time, not at dequeue time, so a node
// reachable through many edges is enqueued once and cycles terminate.
fn offer(visited: &mut HashSet<NodeId>, worklist: &mut VecDeque<NodeId>, node: NodeId) {
    if visited.insert(node) {
        worklist.push_back(node);
    }
}
