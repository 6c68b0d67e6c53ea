use crate::{Grammar, Tree};
use std::rc::Rc;

/// Balanced parentheses over `'('` and `')'`.
///
/// The rule is `b ::= '(' b ')' b | ε`, a node which refers to itself twice. The empty
/// alternative carries a single [Empty](Tree::Empty) witness so every complete match
/// produces exactly one tree.
pub fn balanced_grammar() -> Rc<Grammar<char>> {
    let balanced = Grammar::declare();
    let wrapped = Grammar::seq(
        &Grammar::tok('('),
        &Grammar::seq(
            &balanced,
            &Grammar::seq(&Grammar::tok(')'), &balanced),
        ),
    );
    balanced
        .define_alt(&wrapped, &Grammar::eps(vec![Tree::empty()]))
        .unwrap();
    balanced
}
