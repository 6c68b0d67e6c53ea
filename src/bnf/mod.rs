//! A front-end which reads a textual grammar description and translates it onto the
//! grammar algebra.
//!
//! A description has three labelled sections. `[rules]` holds the productions:
//! a rule is a snake_case name followed by `::=` and `|` separated productions, each a
//! Capitalized production name and a sequence of parts. Parts are `'literals'`,
//! Capitalized declared-token names, snake_case rule references, `name: part` field
//! matches, and bracketed groups: `( )` plain, `[ ]` optional, `{ }` repetition,
//! `< >` nonempty repetition, with an optional `&( separator )` parameter on the
//! repetition forms. `[tokens]` declares the token matchers, `NAME = 'literal'` or
//! `NAME := /regex/`. `[start]` lists the start rules and defaults to the first rule.
//! `#` starts a line comment.
//!
//! The engine compares tokens by equality only, so translation interns every terminal
//! into a [Vocabulary] of dense [TokenId]s. The caller maps its own token texts with
//! [Vocabulary::classify] before parsing; the engine never lexes input by itself.
//!
//! # Example
//!
//! ```
//! use lang_dp::bnf::{ParsedGrammar, TranslatedGrammar};
//!
//! let description = r#"
//! # A tiny nested pair language.
//! [rules]
//! pair
//!     ::= Wrapped '(' pair ')'
//!     |   Leaf 'x'
//! "#;
//!
//! let parsed = ParsedGrammar::parse(description).unwrap();
//! let translated = TranslatedGrammar::translate(&parsed).unwrap();
//!
//! let vocabulary = translated.vocabulary();
//! let tokens: Vec<_> = ["(", "(", "x", ")", ")"]
//!     .iter()
//!     .map(|text| vocabulary.classify(text).unwrap())
//!     .collect();
//!
//! let parser = translated.parser().unwrap();
//! assert_eq!(parser.parse(&tokens).len(), 1);
//! ```

mod matcher;
mod parser;
mod tokenize;
mod translate;

#[cfg(test)]
mod __tests__;

use crate::Grammar;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A token of the grammar description language.
pub enum GrammarToken {
    /// A section header, one of `[rules]`, `[tokens]` and `[start]`.
    Section,
    /// `::=`
    Subst,
    /// `:=`
    RegexEqual,
    /// `:`
    Colon,
    /// `=`
    Equal,
    /// `|`
    Stick,
    /// `&`
    Ampersand,
    LPar,
    RPar,
    LBrk,
    RBrk,
    LBrc,
    RBrc,
    LAbr,
    RAbr,
    /// A `'...'` literal.
    Quote,
    /// A `/.../` regular expression.
    Regex,
    /// A snake_case word: a rule name or a field name.
    LowWord,
    /// A Capitalized word: a production name or a declared token name.
    CapWord,
    Whitespace,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Element of the tokenized grammar description.
pub struct Lex {
    pub token: GrammarToken,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The bracket form of a sequence group.
pub enum SequenceKind {
    Plain,
    Optional,
    Repetition,
    NonemptyRepetition,
    /// A group whose top level parts are `|` separated alternatives.
    Alternating,
}

#[derive(Debug, Clone, PartialEq)]
/// One part of a production.
pub enum Part {
    Sequence(SequenceKind, Vec<Part>),
    /// A repetition group with a separator parameter: items, then separator parts.
    SeparatedSequence(SequenceKind, Vec<Part>, Vec<Part>),
    Literal(String),
    DeclaredToken(String),
    FieldMatch(String, Box<Part>),
    RuleMatch(String),
}

#[derive(Debug, Clone, PartialEq)]
/// A production of a rule: either named with parts, or an alias to another rule.
pub enum Production {
    Named { name: String, parts: Vec<Part> },
    Alias(String),
}

#[derive(Debug, Clone, PartialEq)]
/// A named rule with its alternative productions.
pub struct Rule {
    pub name: String,
    pub productions: Vec<Production>,
}

#[derive(Debug, Clone)]
/// A token matcher declared in the `[tokens]` section.
pub enum Matcher {
    Literal {
        name: String,
        value: String,
    },
    Regex {
        name: String,
        source: String,
        pattern: regex::bytes::Regex,
    },
}

#[derive(Debug, Clone)]
/// The result of parsing a grammar description.
pub struct ParsedGrammar {
    pub rules: Vec<Rule>,
    pub token_matchers: Vec<Matcher>,
    pub start_symbols: Vec<String>,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// An interned terminal of a translated grammar.
pub struct TokenId(usize);

#[derive(Debug, Clone)]
/// One interned terminal: a literal occurrence or a declared token matcher.
pub enum VocabularyTerm {
    Literal(String),
    Token(Matcher),
}

#[derive(Debug, Clone)]
/// The terminals of a translated grammar, interned in order of first appearance.
pub struct Vocabulary {
    terms: Vec<VocabularyTerm>,
}

/// A grammar description translated onto the grammar algebra: the start nodes by name
/// together with the interned vocabulary.
pub struct TranslatedGrammar {
    vocabulary: Vocabulary,
    starts: Vec<(String, Rc<Grammar<TokenId>>)>,
}
