use crate::Grammar;
use std::rc::Rc;

/// The left-recursive sum grammar `e ::= e '+' 'n' | 'n'`.
///
/// Left recursion is the classic failure mode of recursive descent; here it only means
/// the derivative of `e` refers to itself, which the memo tables resolve.
pub fn sum_grammar() -> Rc<Grammar<char>> {
    let sum = Grammar::declare();
    let add = Grammar::seq(
        &sum,
        &Grammar::seq(&Grammar::tok('+'), &Grammar::tok('n')),
    );
    sum.define_alt(&add, &Grammar::tok('n')).unwrap();
    sum
}

/// The ambiguous grammar `s ::= s s | 'a'`.
///
/// A sequence of n + 1 letters parses in Catalan(n) distinct ways, which makes the
/// grammar a direct probe of how many trees the engine returns.
pub fn ambiguous_grammar() -> Rc<Grammar<char>> {
    let s = Grammar::declare();
    s.define_alt(&Grammar::seq(&s, &s), &Grammar::tok('a'))
        .unwrap();
    s
}
