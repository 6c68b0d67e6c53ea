use crate::{Analysis, FixedPoint, Grammar, GrammarKey};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

/// Rounds after which a non converging iteration is reported as a programming error.
pub(crate) const FIXED_POINT_ROUND_LIMIT: usize = 256;

impl<TToken: Debug, TAnalysis: Analysis<TToken>> FixedPoint<TToken, TAnalysis> {
    pub fn new(analysis: TAnalysis) -> Self {
        Self {
            analysis,
            table: RefCell::new(HashMap::new()),
        }
    }

    /// Fixed point of the analysis over the subgraph rooted at `grammar`.
    ///
    /// A node already present in the visit table returns its current approximation
    /// without iterating, which is what makes cyclic re-entries terminate. Otherwise
    /// the node is seeded with the bottom value and one structural step is repeated
    /// until two successive approximations converge.
    pub fn evaluate(&self, grammar: &Rc<Grammar<TToken>>) -> TAnalysis::Value {
        let key = GrammarKey::of(grammar);
        if let Some(approximation) = self.table.borrow().get(&key) {
            return approximation.clone();
        }
        self.table
            .borrow_mut()
            .insert(key.clone(), self.analysis.bottom());
        let mut rounds = 0;
        loop {
            let next = self.analysis.analyze(self, grammar);
            {
                let mut table = self.table.borrow_mut();
                let current = table.get_mut(&key).unwrap();
                if self.analysis.converged(current, &next) {
                    return next;
                }
                *current = next.clone();
            }
            if self.analysis.overflowed(&next) {
                panic!(
                    "Fixed point values for {:?} grew past the safety bound; the grammar has no finite analysis result.",
                    grammar
                )
            }
            rounds += 1;
            if rounds >= FIXED_POINT_ROUND_LIMIT {
                panic!(
                    "Fixed point iteration for {:?} did not settle within {} rounds.",
                    grammar, FIXED_POINT_ROUND_LIMIT
                )
            }
        }
    }
}
