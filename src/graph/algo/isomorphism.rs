//! VF2 matching, by way of `petgraph`. It's been modified to only work for undirected
//! [`CompactGraph`]s, to accept a seed mapping, and to search for monomorphisms as well as
//! isomorphisms.
//!
//! Graph 0 is always the pattern and graph 1 the host. Mappings are returned indexed by pattern
//! node, holding the host node each one maps to.

use crate::graph::compact::CompactGraph;
use tracing::instrument;

use self::state::Vf2State;

pub use self::matching::GraphMatcher;
pub use self::semantic::{EdgeMatcher, NoSemanticMatch, NodeMatcher};

/// The kind of correspondence to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Bijection that preserves adjacency in both directions
    Isomorphism,
    /// Injection from the pattern that preserves every pattern edge. The host may have extra
    /// edges between mapped nodes.
    Monomorphism,
}

mod state {
    use super::*;

    #[derive(Debug)]
    pub struct Vf2State<'a, N> {
        /// A reference to the graph this state was built from.
        pub graph: &'a CompactGraph<N>,
        /// The current mapping M(s) of nodes from this graph to the other one,
        /// `usize::MAX` for no mapping.
        pub mapping: Vec<usize>,
        /// out[i] is non-zero if i is in either M(s) or Tout(s)
        /// These are all the next vertices that are not mapped yet, but
        /// have an edge from the mapping.
        out: Vec<usize>,
        pub out_size: usize,
        generation: usize,
    }

    impl<'a, N> Vf2State<'a, N> {
        pub fn new(g: &'a CompactGraph<N>) -> Self {
            let c0 = g.node_count();
            Vf2State {
                graph: g,
                mapping: vec![usize::MAX; c0],
                out: vec![0; c0],
                out_size: 0,
                generation: 0,
            }
        }

        /// Return **true** if we have a complete mapping
        pub fn is_complete(&self) -> bool {
            self.generation == self.mapping.len()
        }

        pub fn is_mapped(&self, ix: usize) -> bool {
            self.mapping[ix] != usize::MAX
        }

        /// Add mapping **from** <-> **to** to the state.
        pub fn push_mapping(&mut self, from: usize, to: usize) {
            self.generation += 1;
            self.mapping[from] = to;
            // Tout: node not in M but adjacent to a node in M.
            // out: node either in M or adjacent to M
            for &ix in self.graph.neighbors(from) {
                if self.out[ix] == 0 {
                    self.out[ix] = self.generation;
                    self.out_size += 1;
                }
            }
        }

        /// Restore the state to before the last added mapping
        pub fn pop_mapping(&mut self, from: usize) {
            self.mapping[from] = usize::MAX;

            for &ix in self.graph.neighbors(from) {
                if self.out[ix] == self.generation {
                    self.out[ix] = 0;
                    self.out_size -= 1;
                }
            }

            self.generation -= 1;
        }

        /// Find the next (least) node in the Tout set.
        pub fn next_out_index(&self, from_index: usize) -> Option<usize> {
            self.out[from_index..]
                .iter()
                .enumerate()
                .find(move |&(index, &elt)| {
                    elt > 0 && self.mapping[from_index + index] == usize::MAX
                })
                .map(|(index, _)| index)
        }

        /// Find the next (least) node in the N - M set.
        pub fn next_rest_index(&self, from_index: usize) -> Option<usize> {
            self.mapping[from_index..]
                .iter()
                .enumerate()
                .find(|&(_, &elt)| elt == usize::MAX)
                .map(|(index, _)| index)
        }
    }
}

mod semantic {
    /// Matcher that accepts everything.
    pub struct NoSemanticMatch;

    pub trait NodeMatcher {
        fn enabled() -> bool;
        fn eq(&mut self, n0: usize, n1: usize) -> bool;
    }

    impl NodeMatcher for NoSemanticMatch {
        #[inline]
        fn enabled() -> bool {
            false
        }
        #[inline]
        fn eq(&mut self, _n0: usize, _n1: usize) -> bool {
            true
        }
    }

    impl<F: FnMut(usize, usize) -> bool> NodeMatcher for F {
        #[inline]
        fn enabled() -> bool {
            true
        }
        #[inline]
        fn eq(&mut self, n0: usize, n1: usize) -> bool {
            self(n0, n1)
        }
    }

    pub trait EdgeMatcher {
        fn enabled() -> bool;
        fn eq(&mut self, e0: (usize, usize), e1: (usize, usize)) -> bool;
    }

    impl EdgeMatcher for NoSemanticMatch {
        #[inline]
        fn enabled() -> bool {
            false
        }
        #[inline]
        fn eq(&mut self, _e0: (usize, usize), _e1: (usize, usize)) -> bool {
            true
        }
    }

    impl<F: FnMut((usize, usize), (usize, usize)) -> bool> EdgeMatcher for F {
        #[inline]
        fn enabled() -> bool {
            true
        }
        #[inline]
        fn eq(&mut self, e0: (usize, usize), e1: (usize, usize)) -> bool {
            self(e0, e1)
        }
    }
}

mod matching {
    use super::*;

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum OpenList {
        Out,
        Other,
    }

    #[derive(Clone, PartialEq, Debug)]
    enum Frame {
        Outer,
        Inner {
            nodes: (usize, usize),
            open_list: OpenList,
        },
        Unwind {
            nodes: (usize, usize),
            open_list: OpenList,
        },
    }

    type States<'a, 'b, N0, N1> = (Vf2State<'a, N0>, Vf2State<'b, N1>);

    fn is_feasible<N0, N1, NM: NodeMatcher, EM: EdgeMatcher>(
        st: &States<'_, '_, N0, N1>,
        nodes: (usize, usize),
        node_match: &mut NM,
        edge_match: &mut EM,
        mode: MatchMode,
    ) -> bool {
        // Every mapped neighbor of the pattern node has to map to a neighbor of the host node.
        for &n_neigh in st.0.graph.neighbors(nodes.0) {
            let m_neigh = st.0.mapping[n_neigh];
            if m_neigh == usize::MAX {
                continue;
            }
            if !st.1.graph.is_adjacent(nodes.1, m_neigh) {
                return false;
            }
        }
        let d0 = st.0.graph.degree(nodes.0);
        let d1 = st.1.graph.degree(nodes.1);
        match mode {
            MatchMode::Isomorphism => {
                if d0 != d1 {
                    return false;
                }
                for &m_neigh in st.1.graph.neighbors(nodes.1) {
                    let n_neigh = st.1.mapping[m_neigh];
                    if n_neigh == usize::MAX {
                        continue;
                    }
                    if !st.0.graph.is_adjacent(nodes.0, n_neigh) {
                        return false;
                    }
                }
            }
            MatchMode::Monomorphism => {
                if d0 > d1 {
                    return false;
                }
            }
        }

        // semantic feasibility: compare associated data for nodes
        if NM::enabled() && !node_match.eq(nodes.0, nodes.1) {
            return false;
        }
        // semantic feasibility: compare associated data for edges. Checking from the pattern
        // side covers every edge in both modes.
        if EM::enabled() {
            for &n_neigh in st.0.graph.neighbors(nodes.0) {
                let m_neigh = st.0.mapping[n_neigh];
                if m_neigh == usize::MAX {
                    continue;
                }
                if !edge_match.eq((nodes.0, n_neigh), (nodes.1, m_neigh)) {
                    return false;
                }
            }
        }
        true
    }

    fn next_candidate<N0, N1>(st: &States<'_, '_, N0, N1>) -> Option<(usize, usize, OpenList)> {
        let mut from_index = None;
        let mut open_list = OpenList::Out;
        let mut to_index = st.1.next_out_index(0);

        // Try the out list
        if to_index.is_some() {
            from_index = st.0.next_out_index(0);
            open_list = OpenList::Out;
        }

        // Try the other list -- disconnected graph
        if to_index.is_none() || from_index.is_none() {
            to_index = st.1.next_rest_index(0);
            if to_index.is_some() {
                from_index = st.0.next_rest_index(0);
                open_list = OpenList::Other;
            }
        }
        match (from_index, to_index) {
            (Some(n), Some(m)) => Some((n, m, open_list)),
            // No more candidates
            _ => None,
        }
    }

    fn next_from_ix<N0, N1>(
        st: &States<'_, '_, N0, N1>,
        nx: usize,
        open_list: OpenList,
    ) -> Option<usize> {
        // Find the next node index to try on the `to` side of the mapping
        let start = nx + 1;
        match open_list {
            OpenList::Out => st.1.next_out_index(start),
            OpenList::Other => st.1.next_rest_index(start),
        }
        .map(|c| c + start) // compensate for start offset.
    }

    fn pop_state<N0, N1>(st: &mut States<'_, '_, N0, N1>, nodes: (usize, usize)) {
        st.0.pop_mapping(nodes.0);
        st.1.pop_mapping(nodes.1);
    }

    fn push_state<N0, N1>(st: &mut States<'_, '_, N0, N1>, nodes: (usize, usize)) {
        st.0.push_mapping(nodes.0, nodes.1);
        st.1.push_mapping(nodes.1, nodes.0);
    }

    fn cardinality_ok<N0, N1>(st: &States<'_, '_, N0, N1>, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Isomorphism => st.0.out_size == st.1.out_size,
            MatchMode::Monomorphism => st.0.out_size <= st.1.out_size,
        }
    }

    #[instrument(level = "trace", skip_all)]
    fn isomorphisms<N0, N1, NM: NodeMatcher, EM: EdgeMatcher>(
        st: &mut States<'_, '_, N0, N1>,
        node_match: &mut NM,
        edge_match: &mut EM,
        mode: MatchMode,
        stack: &mut Vec<Frame>,
        steps: &mut usize,
    ) -> Option<Vec<usize>> {
        // A "depth first" search of a valid mapping from graph 0 to graph 1
        // F(s, n, m) -- evaluate state s and add mapping n <-> m
        // Find least T1out node (in st.out[1] but not in M[1])
        let mut result = None;
        while let Some(frame) = stack.pop() {
            *steps += 1;
            match frame {
                Frame::Unwind { nodes, open_list } => {
                    pop_state(st, nodes);

                    match next_from_ix(st, nodes.1, open_list) {
                        None => continue,
                        Some(nx) => {
                            let f = Frame::Inner {
                                nodes: (nodes.0, nx),
                                open_list,
                            };
                            stack.push(f);
                        }
                    }
                }
                Frame::Outer => match next_candidate(st) {
                    None => continue,
                    Some((nx, mx, open_list)) => {
                        let f = Frame::Inner {
                            nodes: (nx, mx),
                            open_list,
                        };
                        stack.push(f);
                    }
                },
                Frame::Inner { nodes, open_list } => {
                    if is_feasible(st, nodes, node_match, edge_match, mode) {
                        push_state(st, nodes);
                        if st.0.is_complete() {
                            result = Some(st.0.mapping.clone());
                        }
                        if cardinality_ok(st, mode) {
                            let f0 = Frame::Unwind { nodes, open_list };
                            stack.push(f0);
                            stack.push(Frame::Outer);
                            continue;
                        }
                        pop_state(st, nodes);
                    }
                    match next_from_ix(st, nodes.1, open_list) {
                        None => continue,
                        Some(nx) => {
                            let f = Frame::Inner {
                                nodes: (nodes.0, nx),
                                open_list,
                            };
                            stack.push(f);
                        }
                    }
                }
            }
            if result.is_some() {
                return result;
            }
        }
        result
    }

    /// Iterator over every mapping of the pattern into the host.
    pub struct GraphMatcher<'a, 'b, N0, N1, NM, EM> {
        st: States<'a, 'b, N0, N1>,
        node_match: NM,
        edge_match: EM,
        mode: MatchMode,
        stack: Vec<Frame>,
        /// Set when the seed alone already covers the pattern
        seeded: Option<Vec<usize>>,
        steps: usize,
    }

    impl<'a, 'b, N0, N1, NM: NodeMatcher, EM: EdgeMatcher> GraphMatcher<'a, 'b, N0, N1, NM, EM> {
        /// Create a matcher whose search starts from the pairs in `seed`.
        ///
        /// Pairs are checked in order as if the search had chosen them. If any of them is out of
        /// range, repeats a node, or is infeasible, the matcher yields nothing.
        pub fn new(
            g0: &'a CompactGraph<N0>,
            g1: &'b CompactGraph<N1>,
            mut node_match: NM,
            mut edge_match: EM,
            mode: MatchMode,
            seed: &[(usize, usize)],
        ) -> Self {
            let mut st = (Vf2State::new(g0), Vf2State::new(g1));
            let mut stack = vec![Frame::Outer];
            let too_big = match mode {
                MatchMode::Isomorphism => {
                    g0.node_count() != g1.node_count() || g0.edge_count() != g1.edge_count()
                }
                MatchMode::Monomorphism => {
                    g0.node_count() > g1.node_count() || g0.edge_count() > g1.edge_count()
                }
            };
            let mut viable = !too_big;
            for &nodes in seed {
                if !viable {
                    break;
                }
                viable = nodes.0 < g0.node_count()
                    && nodes.1 < g1.node_count()
                    && !st.0.is_mapped(nodes.0)
                    && !st.1.is_mapped(nodes.1)
                    && is_feasible(&st, nodes, &mut node_match, &mut edge_match, mode);
                if viable {
                    push_state(&mut st, nodes);
                }
            }
            let mut seeded = None;
            if !viable {
                stack.clear();
            } else if st.0.is_complete() {
                stack.clear();
                seeded = Some(st.0.mapping.clone());
            }
            Self {
                st,
                node_match,
                edge_match,
                mode,
                stack,
                seeded,
                steps: 0,
            }
        }

        /// Number of search frames processed so far.
        pub fn steps(&self) -> usize {
            self.steps
        }
    }

    impl<N0, N1, NM: NodeMatcher, EM: EdgeMatcher> Iterator for GraphMatcher<'_, '_, N0, N1, NM, EM> {
        type Item = Vec<usize>;

        #[instrument(level = "trace", skip_all, name = "ism_next")]
        fn next(&mut self) -> Option<Self::Item> {
            if let Some(found) = self.seeded.take() {
                return Some(found);
            }
            isomorphisms(
                &mut self.st,
                &mut self.node_match,
                &mut self.edge_match,
                self.mode,
                &mut self.stack,
                &mut self.steps,
            )
        }
    }
}

/// Using the VF2 algorithm, examine both syntactic and semantic graph structure and iterate over
/// every way to map `pattern` onto `host`, starting from the pairs in `seed`.
pub fn matches_iter<'a, 'b, N0, N1, NM, EM>(
    pattern: &'a CompactGraph<N0>,
    host: &'b CompactGraph<N1>,
    node_match: NM,
    edge_match: EM,
    mode: MatchMode,
    seed: &[(usize, usize)],
) -> GraphMatcher<'a, 'b, N0, N1, NM, EM>
where
    NM: FnMut(usize, usize) -> bool,
    EM: FnMut((usize, usize), (usize, usize)) -> bool,
{
    GraphMatcher::new(pattern, host, node_match, edge_match, mode, seed)
}
