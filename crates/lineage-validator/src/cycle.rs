//! Cycle detection over the parent graph
//!
//! The graph has an edge `parent -> child` for every active `parent_of` claim that
//! names its child. Walks start from each unvisited node in ascending id order; the
//! first back edge found during a walk ends it and is reported against the walk's
//! start node.

use lineage_domain::{Claim, PersonId, Predicate};
use std::collections::{BTreeMap, BTreeSet};

/// A cycle found during one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleHit {
    /// Node the walk started from
    pub root: PersonId,

    /// Persons on the cycle, in edge order, starting at the node the back edge hit
    pub cycle: Vec<PersonId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    OnStack,
    Finished,
}

/// Directed parent -> child graph
#[derive(Debug, Clone, Default)]
pub struct ParentGraph {
    nodes: Vec<PersonId>,
    edges: Vec<Vec<usize>>,
}

impl ParentGraph {
    /// Build the graph from claims; anything but an active `parent_of` with an
    /// object reference is ignored
    pub fn from_claims<'a>(claims: impl IntoIterator<Item = &'a Claim>) -> Self {
        let pairs: BTreeSet<(PersonId, PersonId)> = claims
            .into_iter()
            .filter(|c| c.active && c.predicate == Predicate::ParentOf)
            .filter_map(|c| c.object_ref.map(|child| (c.subject, child)))
            .collect();

        let nodes: Vec<PersonId> = pairs
            .iter()
            .flat_map(|&(parent, child)| [parent, child])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<PersonId, usize> =
            nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut edges = vec![Vec::new(); nodes.len()];
        // pairs iterate sorted, so each adjacency list is ascending
        for (parent, child) in &pairs {
            edges[index[parent]].push(index[child]);
        }

        Self { nodes, edges }
    }

    /// Number of persons appearing in any edge
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct parent -> child edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Find at most one cycle per walk
    pub fn find_cycles(&self) -> Vec<CycleHit> {
        let mut color = vec![Color::Unvisited; self.nodes.len()];
        let mut hits = Vec::new();

        for root in 0..self.nodes.len() {
            if color[root] != Color::Unvisited {
                continue;
            }

            // (node, next edge position)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            color[root] = Color::OnStack;

            while let Some(frame) = stack.last_mut() {
                let (node, pos) = *frame;
                let Some(&next) = self.edges[node].get(pos) else {
                    color[node] = Color::Finished;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match color[next] {
                    Color::Unvisited => {
                        color[next] = Color::OnStack;
                        stack.push((next, 0));
                    }
                    Color::OnStack => {
                        let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                        let cycle = stack[start..].iter().map(|&(n, _)| self.nodes[n]).collect();
                        hits.push(CycleHit {
                            root: self.nodes[root],
                            cycle,
                        });
                        for &(n, _) in &stack {
                            color[n] = Color::Finished;
                        }
                        break;
                    }
                    Color::Finished => {}
                }
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_domain::SourceId;

    fn id(n: u128) -> PersonId {
        PersonId::from_value(n)
    }

    fn graph(edges: &[(u128, u128)]) -> ParentGraph {
        let source = SourceId::new();
        let claims: Vec<Claim> = edges
            .iter()
            .map(|&(p, c)| Claim::relation(id(p), Predicate::ParentOf, id(c), source, 0.9))
            .collect();
        ParentGraph::from_claims(&claims)
    }

    #[test]
    fn test_acyclic_tree_has_no_hits() {
        let g = graph(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(g.find_cycles().is_empty());
    }

    #[test]
    fn test_three_cycle_reported_once() {
        let hits = graph(&[(1, 2), (2, 3), (3, 1)]).find_cycles();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].root, id(1));
        assert_eq!(hits[0].cycle, vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_root_outside_cycle() {
        // 1 leads into the 2 <-> 3 loop
        let hits = graph(&[(1, 2), (2, 3), (3, 2)]).find_cycles();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].root, id(1));
        assert_eq!(hits[0].cycle, vec![id(2), id(3)]);
    }

    #[test]
    fn test_self_loop() {
        let hits = graph(&[(5, 5)]).find_cycles();
        assert_eq!(hits, vec![CycleHit { root: id(5), cycle: vec![id(5)] }]);
    }

    #[test]
    fn test_disjoint_cycles_each_reported() {
        let hits = graph(&[(1, 2), (2, 1), (10, 11), (11, 10)]).find_cycles();
        let roots: Vec<PersonId> = hits.iter().map(|h| h.root).collect();
        assert_eq!(roots, vec![id(1), id(10)]);
    }

    #[test]
    fn test_inactive_and_other_predicates_ignored() {
        let source = SourceId::new();
        let mut back = Claim::relation(id(2), Predicate::ParentOf, id(1), source, 0.9);
        back.active = false;
        let claims = vec![
            Claim::relation(id(1), Predicate::ParentOf, id(2), source, 0.9),
            back,
            Claim::relation(id(2), Predicate::ChildOf, id(1), source, 0.9),
        ];
        assert!(ParentGraph::from_claims(&claims).find_cycles().is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn edges_from_low_to_high_ids_never_cycle(
                edges in prop::collection::vec((0u128..30, 0u128..30), 0..60)
            ) {
                let forward: Vec<(u128, u128)> = edges
                    .into_iter()
                    .filter(|(a, b)| a < b)
                    .collect();
                prop_assert!(graph(&forward).find_cycles().is_empty());
            }

            #[test]
            fn every_reported_cycle_is_closed(
                edges in prop::collection::vec((0u128..12, 0u128..12), 0..40)
            ) {
                let g = graph(&edges);
                let set: BTreeSet<(u128, u128)> = edges.into_iter().collect();
                for hit in g.find_cycles() {
                    prop_assert!(!hit.cycle.is_empty());
                    for (i, from) in hit.cycle.iter().enumerate() {
                        let to = hit.cycle[(i + 1) % hit.cycle.len()];
                        prop_assert!(set.contains(&(from.value(), to.value())));
                    }
                }
            }
        }
    }
}
