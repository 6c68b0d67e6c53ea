use crate::{Analysis, FixedPoint, Grammar, GrammarKind, Tree};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

/// Largest null parse forest the engine will compute before reporting that the grammar
/// assigns infinitely many trees to the empty string.
const NULL_PARSE_LIMIT: usize = 4096;

struct Emptiness;

struct Nullability;

struct NullParses;

impl<TToken: Copy + Debug + Eq + Hash> Analysis<TToken> for Emptiness {
    type Value = bool;

    fn bottom(&self) -> bool {
        false
    }

    fn converged(&self, previous: &bool, next: &bool) -> bool {
        previous == next
    }

    fn analyze(&self, fix: &FixedPoint<TToken, Self>, grammar: &Rc<Grammar<TToken>>) -> bool {
        match grammar.kind() {
            GrammarKind::Nil => true,
            GrammarKind::Eps(_) | GrammarKind::Tok(_) | GrammarKind::Rep(_) => false,
            GrammarKind::Alt(left, right) => fix.evaluate(left) && fix.evaluate(right),
            GrammarKind::Seq(left, right) => fix.evaluate(left) || fix.evaluate(right),
            GrammarKind::Red(inner, _) => fix.evaluate(inner),
        }
    }
}

impl<TToken: Copy + Debug + Eq + Hash> Analysis<TToken> for Nullability {
    type Value = bool;

    fn bottom(&self) -> bool {
        true
    }

    fn converged(&self, previous: &bool, next: &bool) -> bool {
        previous == next
    }

    fn analyze(&self, fix: &FixedPoint<TToken, Self>, grammar: &Rc<Grammar<TToken>>) -> bool {
        match grammar.kind() {
            GrammarKind::Nil | GrammarKind::Tok(_) => false,
            GrammarKind::Eps(_) => true,
            // The emptiness disjunct keeps the step monotone under the bottom of this
            // analysis; a repetition always accepts the empty string.
            GrammarKind::Rep(inner) => fix.evaluate(inner) || inner.is_empty(),
            GrammarKind::Alt(left, right) => fix.evaluate(left) || fix.evaluate(right),
            GrammarKind::Seq(left, right) => fix.evaluate(left) && fix.evaluate(right),
            GrammarKind::Red(inner, _) => fix.evaluate(inner),
        }
    }
}

impl<TToken: Copy + Debug + Eq + Hash> Analysis<TToken> for NullParses {
    type Value = Vec<Rc<Tree<TToken>>>;

    fn bottom(&self) -> Self::Value {
        Vec::with_capacity(0)
    }

    fn converged(&self, previous: &Self::Value, next: &Self::Value) -> bool {
        previous == next
    }

    fn overflowed(&self, value: &Self::Value) -> bool {
        value.len() > NULL_PARSE_LIMIT
    }

    fn analyze(
        &self,
        fix: &FixedPoint<TToken, Self>,
        grammar: &Rc<Grammar<TToken>>,
    ) -> Self::Value {
        match grammar.kind() {
            GrammarKind::Nil | GrammarKind::Tok(_) => Vec::with_capacity(0),
            GrammarKind::Eps(trees) => trees.clone(),
            GrammarKind::Rep(_) => vec![Tree::empty()],
            GrammarKind::Alt(left, right) => {
                let mut trees = fix.evaluate(left);
                trees.extend(fix.evaluate(right));
                trees
            }
            GrammarKind::Seq(left, right) => {
                let left_trees = fix.evaluate(left);
                let right_trees = fix.evaluate(right);
                let mut trees = Vec::with_capacity(left_trees.len() * right_trees.len());
                for first in &left_trees {
                    for second in &right_trees {
                        trees.push(Tree::branch(first, second));
                    }
                }
                trees
            }
            GrammarKind::Red(inner, reduce) => fix
                .evaluate(inner)
                .iter()
                .map(|tree| reduce.apply(tree))
                .collect(),
        }
    }
}

impl<TToken: Copy + Debug + Eq + Hash> Grammar<TToken> {
    /// Whether the grammar recognizes no strings at all.
    pub fn is_empty(self: &Rc<Self>) -> bool {
        FixedPoint::new(Emptiness).evaluate(self)
    }

    /// Whether the grammar recognizes the empty string.
    pub fn is_nullable(self: &Rc<Self>) -> bool {
        FixedPoint::new(Nullability).evaluate(self)
    }

    /// The parse trees the grammar assigns to the empty string.
    pub fn parse_null(self: &Rc<Self>) -> Vec<Rc<Tree<TToken>>> {
        FixedPoint::new(NullParses).evaluate(self)
    }

    /// The parse tree of the empty string, when the grammar assigns it exactly one.
    pub fn nullable_singleton(self: &Rc<Self>) -> Option<Rc<Tree<TToken>>> {
        if self.is_nullable() {
            let mut trees = self.parse_null();
            if trees.len() == 1 {
                return trees.pop();
            }
        }
        None
    }
}
