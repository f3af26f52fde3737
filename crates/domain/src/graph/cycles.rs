//! Cycle detection over a directed edge list.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::ids::NodeId;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done,
}

/// Find cycles with an iterative depth-first search.
///
/// Every node with an edge is used as a root (in id order), so disconnected
/// components are all covered. Each back edge to a node still on the
/// recursion stack yields one cycle: the stack slice from that node to the
/// current one. Cycles are rotated to start at their smallest id and
/// deduplicated, so `X->Y->Z->X` is reported once however it was entered.
pub fn find_cycles(edges: &[(NodeId, NodeId)]) -> Vec<Vec<NodeId>> {
    let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for (from, to) in edges {
        adjacency.entry(*from).or_default().push(*to);
        adjacency.entry(*to).or_default();
    }
    for targets in adjacency.values_mut() {
        targets.sort();
        targets.dedup();
    }

    let mut state: HashMap<NodeId, Visit> = HashMap::new();
    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
    let mut cycles = Vec::new();

    for &root in adjacency.keys() {
        if state.contains_key(&root) {
            continue;
        }
        state.insert(root, Visit::OnStack);
        // (node, index of the next child to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let children = adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]);

            let Some(&child) = children.get(top.1) else {
                state.insert(node, Visit::Done);
                stack.pop();
                continue;
            };
            top.1 += 1;

            match state.get(&child) {
                None => {
                    state.insert(child, Visit::OnStack);
                    stack.push((child, 0));
                }
                Some(Visit::OnStack) => {
                    if let Some(start) = stack.iter().position(|(n, _)| *n == child) {
                        let cycle: Vec<NodeId> = stack[start..].iter().map(|(n, _)| *n).collect();
                        let cycle = rotate_to_min(cycle);
                        if seen.insert(cycle.clone()) {
                            cycles.push(cycle);
                        }
                    }
                }
                Some(Visit::Done) => {}
            }
        }
    }

    cycles
}

fn rotate_to_min(mut cycle: Vec<NodeId>) -> Vec<NodeId> {
    if let Some(min_at) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(i, _)| i)
    {
        cycle.rotate_left(min_at);
    }
    cycle
}
