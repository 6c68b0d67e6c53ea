//! Language parsing with derivatives (lang_dp) is a library to recognize context-free
//! grammars and build parse trees by taking Brzozowski derivatives of the grammar,
//! one input token at a time.
//!
//! # Overview
//! Classic parser generators compile a grammar ahead of time and reject grammar classes
//! their algorithm cannot handle. Derivative based parsing instead works directly on the
//! grammar as a value: the [derivative](Derivation::derive) of a grammar with respect to
//! a token `c` is another grammar which recognizes exactly the rest of the strings that
//! started with `c`. Folding the input over the derivative operation and then
//! [collecting the parse trees of the empty string](Grammar::parse_null) yields every
//! parse tree the grammar assigns to the input, ambiguity included. Left recursion,
//! mutual recursion and ambiguous alternatives all work without grammar surgery.
//!
//! # Design
//!
//! A grammar is a graph of seven node shapes ([GrammarKind]): the empty language, the
//! empty string, a single token, repetition, alternation, concatenation, and tree
//! reduction. The graph may be cyclic. A node is allocated with [Grammar::declare] and
//! its shape assigned once with one of the `define_*` methods, so a rule can refer to
//! itself or to rules defined later. Every analysis that recurses into the graph is
//! evaluated either through the [FixedPoint] combinator (for [Grammar::is_empty],
//! [Grammar::is_nullable] and [Grammar::parse_null]) or through the memo tables of a
//! [Derivation] session (for [derive](Derivation::derive) and
//! [compact](Derivation::compact)), never by plain structural recursion.
//!
//! The library also includes a [bnf] front-end which reads a textual grammar
//! description with `[rules]`, `[tokens]` and `[start]` sections and translates it onto
//! the grammar algebra, and an [examples] module with complete demo grammars.
//!
//! # Example
//!
//! ```
//! use lang_dp::{Grammar, Parser};
//!
//! // s ::= s s | 'a'
//! let s = Grammar::declare();
//! s.define_alt(&Grammar::seq(&s, &s), &Grammar::tok('a')).unwrap();
//!
//! let parser = Parser::new(&s).unwrap();
//!
//! // An ambiguous grammar returns every parse tree.
//! let trees = parser.parse(&['a', 'a', 'a']);
//! assert_eq!(trees.len(), 2);
//! for tree in &trees {
//!     tree.print().unwrap();
//! }
//!
//! // A token sequence outside the language returns no trees.
//! assert!(parser.parse(&['a', 'b']).is_empty());
//! ```
//!
//! # License
//! [lang_dp](crate) is provided under the MIT or Apache-2.0 license.

mod analysis;
pub mod bnf;
mod derivation;
mod error;
pub mod examples;
mod fixed_point;
mod grammar;
mod parsing;
mod tree;
pub mod util;

use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use util::Log;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A parse tree built while deriving the input.
///
/// The engine itself only ever constructs these three shapes. [Reducer]s attached with
/// [Grammar::red] rewrite subtrees after matching, which is how user facing tree shapes
/// are produced.
pub enum Tree<TToken = char> {
    /// Witness of a zero length match, produced by repetition nodes.
    Empty,
    /// A single matched input token.
    Leaf(TToken),
    /// An ordered pair of subtrees, produced by concatenation nodes.
    Branch(Rc<Tree<TToken>>, Rc<Tree<TToken>>),
}

/// A tree rewriting function attached to a grammar node with [Grammar::red].
///
/// Reducers are applied to each parse tree the wrapped grammar produces. Compaction
/// composes reducers when it collapses nested nodes, so a reducer must be a pure
/// function of its input tree.
pub struct Reducer<TToken = char>(Rc<dyn Fn(&Rc<Tree<TToken>>) -> Rc<Tree<TToken>>>);

#[derive(Clone)]
/// The shape of a grammar node: one of the seven term variants.
pub enum GrammarKind<TToken = char> {
    /// The empty language; recognizes no strings at all.
    Nil,
    /// The empty string, together with the parse trees returned for matching it.
    Eps(Vec<Rc<Tree<TToken>>>),
    /// Exactly one input token, matched by equality.
    Tok(TToken),
    /// Zero or more repetitions of the inner grammar.
    Rep(Rc<Grammar<TToken>>),
    /// Either of two grammars.
    Alt(Rc<Grammar<TToken>>, Rc<Grammar<TToken>>),
    /// One grammar followed by another.
    Seq(Rc<Grammar<TToken>>, Rc<Grammar<TToken>>),
    /// The inner grammar with a tree reduction applied to its parse results.
    Red(Rc<Grammar<TToken>>, Reducer<TToken>),
}

/// A node in a grammar graph.
///
/// Nodes are created through the smart constructors ([Grammar::nil], [Grammar::eps],
/// [Grammar::tok], [Grammar::rep], [Grammar::alt], [Grammar::seq], [Grammar::red]), or
/// through [Grammar::declare] followed by one `define_*` call for nodes that take part
/// in reference cycles. Two nodes are the same grammar exactly when they are the same
/// allocation; all memoization is keyed on that identity.
pub struct Grammar<TToken = char> {
    kind: OnceCell<GrammarKind<TToken>>,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// The identity of a grammar node, stable for the lifetime of the node.
pub struct GrammarId(usize);

/// A hashable memoization key which owns the grammar node it identifies, so a cached
/// entry can never outlive its node and identities are never reused while cached.
pub struct GrammarKey<TToken = char>(Rc<Grammar<TToken>>);

/// A recursive analysis over the grammar graph, evaluated by [FixedPoint].
///
/// An implementation supplies the two equality notions the combinator needs: node
/// identity is the visit-table key, while [converged](Analysis::converged) compares
/// successive approximation values. [bottom](Analysis::bottom) seeds every node and is
/// the value returned when a cycle re-enters a node still being computed.
pub trait Analysis<TToken>: Sized {
    type Value: Clone;

    /// Seed approximation for newly visited nodes and for cyclic re-entries.
    fn bottom(&self) -> Self::Value;

    /// Whether two successive approximations are equal, ending the iteration.
    fn converged(&self, previous: &Self::Value, next: &Self::Value) -> bool;

    /// Whether an approximation has grown past the safety bound of the analysis.
    fn overflowed(&self, _value: &Self::Value) -> bool {
        false
    }

    /// One structural step. Recursion into child grammars must go through
    /// [FixedPoint::evaluate] on `fix`, never through direct recursion.
    fn analyze(
        &self,
        fix: &FixedPoint<TToken, Self>,
        grammar: &Rc<Grammar<TToken>>,
    ) -> Self::Value;
}

/// Evaluates an [Analysis] over a possibly cyclic grammar graph by iterative
/// refinement from the bottom value until the result stabilizes.
pub struct FixedPoint<TToken, TAnalysis: Analysis<TToken>> {
    analysis: TAnalysis,
    table: RefCell<HashMap<GrammarKey<TToken>, TAnalysis::Value>>,
}

/// A derivation session: owns the memo tables for [derive](Derivation::derive) and
/// [compact](Derivation::compact) and implements parsing on top of them.
///
/// The derivative of a cyclic grammar is itself cyclic and shares nodes with the
/// original, so both tables pre-insert a declared placeholder node before recursing.
/// Within one session, deriving the same node by the same token twice returns the same
/// node; a fresh session starts with empty tables.
pub struct Derivation<TToken = char> {
    derivative_cache: HashMap<(GrammarKey<TToken>, TToken), Rc<Grammar<TToken>>>,
    compaction_cache: HashMap<GrammarKey<TToken>, Rc<Grammar<TToken>>>,
    debugger: OnceCell<Log<&'static str>>,
}

/// A validating parser façade over a grammar graph.
///
/// Construction walks the graph and rejects nodes that were declared but never
/// defined. Each parse call runs in a fresh [Derivation] session.
pub struct Parser<TToken = char> {
    root: Rc<Grammar<TToken>>,
}

#[derive(Debug)]
/// An error returned for a malformed grammar: a node defined twice or never defined, a
/// reference to an unknown rule or token matcher, or an invalid translation input.
pub struct GrammarError {
    what: String,
    message: String,
}

#[derive(Debug)]
/// An error returned when a textual grammar description is not well formed.
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}
