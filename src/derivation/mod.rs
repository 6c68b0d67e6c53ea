//! The derivation engine: memoized token derivatives, compaction rewriting, and the
//! top level parse loop built on them.

#[cfg(test)]
mod __tests__;

use crate::util::Log;
use crate::{Derivation, Grammar, GrammarKey, GrammarKind, Reducer, Tree};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

impl<TToken> Derivation<TToken> {
    /// Create a session with empty memo tables.
    pub fn new() -> Self {
        Self {
            derivative_cache: HashMap::new(),
            compaction_cache: HashMap::new(),
            debugger: OnceCell::new(),
        }
    }

    /// Set a log label to debug the session based on the level of [Log].
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger
            .set(debugger)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }
}

impl<TToken> Default for Derivation<TToken> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TToken: Copy + Debug + Eq + Hash + 'static> Derivation<TToken> {
    /// The grammar recognizing the rest of the strings of `grammar` that begin with
    /// `token`, sharing structure with `grammar`.
    ///
    /// Memoized on node identity and token value. The result node is registered in the
    /// memo table before its shape is computed, so the derivative of a cyclic grammar
    /// (which references its own derivative) terminates and comes out cyclic as well.
    pub fn derive(&mut self, grammar: &Rc<Grammar<TToken>>, token: TToken) -> Rc<Grammar<TToken>> {
        let key = (GrammarKey::of(grammar), token);
        if let Some(derivative) = self.derivative_cache.get(&key) {
            return derivative.clone();
        }
        let derivative = Grammar::declare();
        self.derivative_cache.insert(key, derivative.clone());

        let kind = match grammar.kind() {
            GrammarKind::Nil | GrammarKind::Eps(_) => GrammarKind::Nil,
            GrammarKind::Tok(expected) => {
                if *expected == token {
                    GrammarKind::Eps(vec![Tree::leaf(token)])
                } else {
                    GrammarKind::Nil
                }
            }
            // The tail of the repetition is the repetition node itself.
            GrammarKind::Rep(inner) => GrammarKind::Seq(self.derive(inner, token), grammar.clone()),
            GrammarKind::Alt(left, right) => {
                GrammarKind::Alt(self.derive(left, token), self.derive(right, token))
            }
            GrammarKind::Seq(left, right) => {
                let left_derivative = self.derive(left, token);
                if left.is_nullable() {
                    // The token may be consumed inside the left grammar, or the left
                    // grammar may match the empty string and pass the token on.
                    GrammarKind::Alt(
                        Grammar::seq(&left_derivative, right),
                        Grammar::seq(
                            &Grammar::eps(left.parse_null()),
                            &self.derive(right, token),
                        ),
                    )
                } else {
                    GrammarKind::Seq(left_derivative, right.clone())
                }
            }
            GrammarKind::Red(inner, reduce) => {
                GrammarKind::Red(self.derive(inner, token), reduce.clone())
            }
        };
        derivative.define_kind(kind);
        self.log_derivative(&token, &derivative);
        derivative
    }

    /// A semantically equivalent but smaller grammar, memoized on node identity.
    ///
    /// The parse trees of the compacted grammar are the same multiset the original
    /// produces; reductions introduced by the rewrite rules reattach the trees that
    /// collapsed nodes would have contributed.
    pub fn compact(&mut self, grammar: &Rc<Grammar<TToken>>) -> Rc<Grammar<TToken>> {
        let key = GrammarKey::of(grammar);
        if let Some(compacted) = self.compaction_cache.get(&key) {
            return compacted.clone();
        }

        // Leaf rewrites neither recurse nor need a placeholder.
        match grammar.kind() {
            GrammarKind::Nil | GrammarKind::Eps(_) => {
                self.compaction_cache.insert(key, grammar.clone());
                return grammar.clone();
            }
            GrammarKind::Tok(_) => {
                let compacted = if grammar.is_empty() {
                    Grammar::nil()
                } else {
                    grammar.clone()
                };
                self.compaction_cache.insert(key, compacted.clone());
                return compacted;
            }
            _ => {}
        }

        let compacted = Grammar::declare();
        self.compaction_cache.insert(key, compacted.clone());

        let kind = match grammar.kind() {
            GrammarKind::Rep(inner) => {
                if inner.is_empty() {
                    GrammarKind::Eps(vec![Tree::empty()])
                } else {
                    GrammarKind::Rep(self.compact(inner))
                }
            }
            GrammarKind::Alt(left, right) => {
                if left.is_empty() {
                    aliased_kind(&self.compact(right))
                } else if right.is_empty() {
                    aliased_kind(&self.compact(left))
                } else {
                    GrammarKind::Alt(self.compact(left), self.compact(right))
                }
            }
            GrammarKind::Seq(left, right) => {
                // A collapsed operand must recognize exactly the empty string.
                if left.is_empty() || right.is_empty() {
                    GrammarKind::Nil
                } else if let Some(witness) = epsilon_singleton(left) {
                    GrammarKind::Red(
                        self.compact(right),
                        Reducer::new(move |tree| Tree::branch(&witness, tree)),
                    )
                } else if let Some(witness) = epsilon_singleton(right) {
                    GrammarKind::Red(
                        self.compact(left),
                        Reducer::new(move |tree| Tree::branch(tree, &witness)),
                    )
                } else {
                    GrammarKind::Seq(self.compact(left), self.compact(right))
                }
            }
            GrammarKind::Red(inner, reduce) => self.compact_reduction(inner, reduce),
            GrammarKind::Nil | GrammarKind::Eps(_) | GrammarKind::Tok(_) => unreachable!(),
        };
        compacted.define_kind(kind);
        self.log_compaction(grammar, &compacted);
        compacted
    }

    fn compact_reduction(
        &mut self,
        inner: &Rc<Grammar<TToken>>,
        reduce: &Reducer<TToken>,
    ) -> GrammarKind<TToken> {
        match inner.kind() {
            GrammarKind::Eps(trees) => {
                GrammarKind::Eps(trees.iter().map(|tree| reduce.apply(tree)).collect())
            }
            GrammarKind::Seq(first, second) => {
                if let Some(witness) = epsilon_singleton(first) {
                    let reduce = reduce.clone();
                    GrammarKind::Red(
                        self.compact(second),
                        Reducer::new(move |tree| reduce.apply(&Tree::branch(&witness, tree))),
                    )
                } else {
                    GrammarKind::Red(self.compact(inner), reduce.clone())
                }
            }
            GrammarKind::Red(deeper, first_reduce) => {
                let outer = reduce.clone();
                let first_reduce = first_reduce.clone();
                GrammarKind::Red(
                    self.compact(deeper),
                    Reducer::new(move |tree| outer.apply(&first_reduce.apply(tree))),
                )
            }
            _ => GrammarKind::Red(self.compact(inner), reduce.clone()),
        }
    }

    /// Parse trees the grammar assigns to the token sequence.
    pub fn parse(
        &mut self,
        tokens: &[TToken],
        grammar: &Rc<Grammar<TToken>>,
    ) -> Vec<Rc<Tree<TToken>>> {
        let mut current = grammar.clone();
        for token in tokens {
            current = self.derive(&current, *token);
        }
        let trees = current.parse_null();
        self.log_result(tokens, &trees);
        trees
    }

    /// Same as [parse](Derivation::parse), with the working grammar compacted after
    /// every derivative. The only practical way to keep the working grammar bounded on
    /// long inputs.
    pub fn parse_compact(
        &mut self,
        tokens: &[TToken],
        grammar: &Rc<Grammar<TToken>>,
    ) -> Vec<Rc<Tree<TToken>>> {
        let mut current = grammar.clone();
        for token in tokens {
            let derivative = self.derive(&current, *token);
            current = self.compact(&derivative);
        }
        let trees = current.parse_null();
        self.log_result(tokens, &trees);
        trees
    }

    fn log_derivative(&self, _token: &TToken, _derivative: &Rc<Grammar<TToken>>) {
        #[cfg(debug_assertions)]
        if let Some(debugger) = self.debugger.get() {
            if debugger.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Derive]: token {:?} -> {:?}",
                    debugger, _token, _derivative
                );
            }
        }
    }

    fn log_compaction(&self, _grammar: &Rc<Grammar<TToken>>, _compacted: &Rc<Grammar<TToken>>) {
        #[cfg(debug_assertions)]
        if let Some(debugger) = self.debugger.get() {
            if debugger.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Compact]: {:?} -> {:?}",
                    debugger, _grammar, _compacted
                );
            }
        }
    }

    fn log_result(&self, _tokens: &[TToken], _trees: &[Rc<Tree<TToken>>]) {
        #[cfg(debug_assertions)]
        if let Some(debugger) = self.debugger.get() {
            if debugger.order() >= Log::Result(()).order() {
                println!(
                    "[{}; Parse]: {} tokens -> {} trees",
                    debugger,
                    _tokens.len(),
                    _trees.len()
                );
            }
        }
    }
}

/// The shape a compaction placeholder takes when a rewrite collapses to the compaction
/// of a child. A target still being computed here means the alternatives reduced to a
/// pure self reference, whose least solution is the empty language.
fn aliased_kind<TToken: Clone>(target: &Rc<Grammar<TToken>>) -> GrammarKind<TToken> {
    match target.defined_kind() {
        Some(kind) => kind.clone(),
        None => GrammarKind::Nil,
    }
}

/// The witness tree of an operand that is exactly the empty string with one parse.
fn epsilon_singleton<TToken>(grammar: &Rc<Grammar<TToken>>) -> Option<Rc<Tree<TToken>>> {
    match grammar.kind() {
        GrammarKind::Eps(trees) if trees.len() == 1 => Some(trees[0].clone()),
        _ => None,
    }
}
