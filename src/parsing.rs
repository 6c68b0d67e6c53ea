use crate::{Derivation, Grammar, GrammarError, Parser, Tree};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

impl<TToken: Copy + Debug + Eq + Hash + 'static> Parser<TToken> {
    /// Create a parser for the grammar rooted at `root`.
    ///
    /// Fails when a reachable node was declared with [Grammar::declare] but never
    /// defined.
    pub fn new(root: &Rc<Grammar<TToken>>) -> Result<Self, GrammarError> {
        let parser = Self { root: root.clone() };
        parser.validate()?;
        Ok(parser)
    }

    /// Re-check that every reachable node of the grammar is defined.
    pub fn validate(&self) -> Result<(), GrammarError> {
        self.root.validate()
    }

    /// The root grammar node.
    pub fn root(&self) -> &Rc<Grammar<TToken>> {
        &self.root
    }

    /// Render the grammar as numbered productions.
    pub fn grammar(&self) -> Result<String, std::fmt::Error> {
        self.root.build_grammar()
    }

    /// Parse trees the grammar assigns to the token sequence. An input outside the
    /// language returns no trees; it is not an error.
    pub fn parse(&self, tokens: &[TToken]) -> Vec<Rc<Tree<TToken>>> {
        let mut derivation = Derivation::new();
        derivation.parse(tokens, &self.root)
    }

    /// Same as [parse](Parser::parse), compacting the working grammar after every
    /// token.
    pub fn parse_compact(&self, tokens: &[TToken]) -> Vec<Rc<Tree<TToken>>> {
        let mut derivation = Derivation::new();
        derivation.parse_compact(tokens, &self.root)
    }
}
