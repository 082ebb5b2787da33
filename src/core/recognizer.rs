//! Byte-driven symbol recognizer.
//!
//! A deterministic automaton over raw input bytes that resolves
//! variable-width UTF-8 symbols to 6-bit values without decoding UTF-8
//! first. Nodes live in an arena and refer to each other by index, so the
//! cycles (newline loops, symbol ends returning to the root) need no shared
//! ownership.

use super::alphabet::{ALPHABET_SIZE, Alphabet};

/// Index of a node in the recognizer arena.
pub(crate) type StateId = u16;

const REJECT: StateId = StateId::MAX;

type Table = [StateId; 256];

/// What a node means once the automaton has landed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Match {
    /// At a symbol boundary with nothing pending
    Root,
    /// Inside a multi-byte symbol
    Partial,
    /// A complete alphabet symbol
    Value(u8),
    /// A complete padding symbol
    Padding,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    kind: Match,
    table: u16,
}

/// Transition graph built from an alphabet and an optional padding character.
#[derive(Debug, Clone)]
pub(crate) struct Recognizer {
    nodes: Vec<Node>,
    tables: Vec<Table>,
}

impl Recognizer {
    /// The start state. Also reached after any newline between symbols.
    pub(crate) const ROOT: StateId = 0;

    pub(crate) fn build(alphabet: &Alphabet, padding: Option<char>) -> Self {
        let mut graph = Recognizer {
            nodes: Vec::with_capacity(ALPHABET_SIZE * 2 + 8),
            tables: Vec::with_capacity(ALPHABET_SIZE),
        };
        let root_table = graph.new_table();
        graph.nodes.push(Node {
            kind: Match::Root,
            table: root_table,
        });

        for value in 0..ALPHABET_SIZE as u8 {
            let bytes = alphabet.symbol_bytes(value);
            let Some((last, prefix)) = bytes.split_last() else {
                continue;
            };
            let tail = graph.walk_prefix(Self::ROOT, prefix);
            // A finished symbol reuses the root's transitions.
            let leaf = graph.push_node(Match::Value(value), root_table);
            graph.link(tail, *last, leaf);
        }

        if let Some(pad) = padding {
            let pad_table = graph.new_table();
            let pad_node = graph.push_node(Match::Padding, pad_table);
            // Newlines between paddings land on a boundary that still only
            // accepts more padding.
            let pad_gap = graph.push_node(Match::Root, pad_table);
            graph.link(pad_node, b'\n', pad_gap);
            graph.link(pad_node, b'\r', pad_gap);

            let mut buf = [0u8; 4];
            let bytes = pad.encode_utf8(&mut buf).as_bytes();
            if let Some((last, prefix)) = bytes.split_last() {
                // Padding may start a run from the root or continue one.
                for start in [Self::ROOT, pad_node] {
                    let tail = graph.walk_prefix(start, prefix);
                    graph.link(tail, *last, pad_node);
                }
            }
        }

        graph.link(Self::ROOT, b'\n', Self::ROOT);
        graph.link(Self::ROOT, b'\r', Self::ROOT);
        graph
    }

    /// Follows `byte` out of `state`; `None` means the byte is rejected.
    #[inline]
    pub(crate) fn step(&self, state: StateId, byte: u8) -> Option<StateId> {
        let node = self.nodes[state as usize];
        match self.tables[node.table as usize][byte as usize] {
            REJECT => None,
            next => Some(next),
        }
    }

    #[inline]
    pub(crate) fn kind(&self, state: StateId) -> Match {
        self.nodes[state as usize].kind
    }

    fn new_table(&mut self) -> u16 {
        self.tables.push([REJECT; 256]);
        (self.tables.len() - 1) as u16
    }

    fn push_node(&mut self, kind: Match, table: u16) -> StateId {
        self.nodes.push(Node { kind, table });
        (self.nodes.len() - 1) as StateId
    }

    fn link(&mut self, from: StateId, byte: u8, to: StateId) {
        let table = self.nodes[from as usize].table;
        self.tables[table as usize][byte as usize] = to;
    }

    /// Walks `prefix` from `start`, creating partial nodes as needed, and
    /// returns the node reached.
    fn walk_prefix(&mut self, start: StateId, prefix: &[u8]) -> StateId {
        let mut state = start;
        for &b in prefix {
            state = match self.step(state, b) {
                Some(next) => next,
                None => {
                    let table = self.new_table();
                    let next = self.push_node(Match::Partial, table);
                    self.link(state, b, next);
                    next
                }
            };
        }
        state
    }
}
