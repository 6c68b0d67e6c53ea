use super::{
    Matcher, ParsedGrammar, Part, Production, Rule, SequenceKind, TokenId, TranslatedGrammar,
    Vocabulary, VocabularyTerm,
};
use crate::{Grammar, GrammarError, Parser, Tree};
use std::collections::HashMap;
use std::rc::Rc;

impl Vocabulary {
    fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, id: TokenId) -> &VocabularyTerm {
        &self.terms[id.0]
    }

    /// Human readable form of a terminal, for messages and tests.
    pub fn describe(&self, id: TokenId) -> String {
        match &self.terms[id.0] {
            VocabularyTerm::Literal(text) => format!("'{}'", text),
            VocabularyTerm::Token(matcher) => matcher.name().to_string(),
        }
    }

    /// The terminal interned for a literal occurrence.
    pub fn literal(&self, text: &str) -> Option<TokenId> {
        self.terms
            .iter()
            .position(|term| matches!(term, VocabularyTerm::Literal(value) if value == text))
            .map(TokenId)
    }

    /// The terminal interned for a declared token name.
    pub fn token_of(&self, name: &str) -> Option<TokenId> {
        self.terms
            .iter()
            .position(
                |term| matches!(term, VocabularyTerm::Token(matcher) if matcher.name() == name),
            )
            .map(TokenId)
    }

    /// Map a token text onto a terminal: literal occurrences by equality first, then
    /// declared matchers in order of first appearance. Callers classify their token
    /// stream with this before parsing.
    pub fn classify(&self, text: &str) -> Option<TokenId> {
        self.terms
            .iter()
            .position(|term| match term {
                VocabularyTerm::Literal(value) => value == text,
                VocabularyTerm::Token(matcher) => matcher.matches(text),
            })
            .map(TokenId)
    }

    fn intern_literal(&mut self, text: &str) -> TokenId {
        match self.literal(text) {
            Some(id) => id,
            None => {
                self.terms.push(VocabularyTerm::Literal(text.to_string()));
                TokenId(self.terms.len() - 1)
            }
        }
    }

    fn intern_token(&mut self, matcher: &Matcher) -> TokenId {
        match self.token_of(matcher.name()) {
            Some(id) => id,
            None => {
                self.terms.push(VocabularyTerm::Token(matcher.clone()));
                TokenId(self.terms.len() - 1)
            }
        }
    }
}

impl TranslatedGrammar {
    /// Turn a parsed description into a grammar graph over interned terminals.
    ///
    /// Every rule is declared first and defined afterwards, so recursive and mutually
    /// recursive rule references become cyclic edges of the graph.
    pub fn translate(parsed: &ParsedGrammar) -> Result<Self, GrammarError> {
        let rule_nodes: HashMap<String, Rc<Grammar<TokenId>>> = parsed
            .rules
            .iter()
            .map(|rule| (rule.name.clone(), Grammar::declare()))
            .collect();
        let mut translator = Translator {
            parsed,
            vocabulary: Vocabulary::new(),
            rule_nodes,
        };
        for rule in &parsed.rules {
            translator.define_rule(rule)?;
        }
        let mut starts = Vec::with_capacity(parsed.start_symbols.len());
        for name in &parsed.start_symbols {
            starts.push((name.clone(), translator.rule_node(name)?));
        }
        Ok(TranslatedGrammar {
            vocabulary: translator.vocabulary,
            starts,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The first start symbol's grammar node.
    pub fn start(&self) -> &Rc<Grammar<TokenId>> {
        &self.starts[0].1
    }

    pub fn start_of(&self, name: &str) -> Option<&Rc<Grammar<TokenId>>> {
        self.starts
            .iter()
            .find(|(start, _)| start == name)
            .map(|(_, node)| node)
    }

    pub fn start_names(&self) -> Vec<&str> {
        self.starts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// A validated parser for the first start symbol.
    pub fn parser(&self) -> Result<Parser<TokenId>, GrammarError> {
        Parser::new(self.start())
    }
}

struct Translator<'g> {
    parsed: &'g ParsedGrammar,
    vocabulary: Vocabulary,
    rule_nodes: HashMap<String, Rc<Grammar<TokenId>>>,
}

impl<'g> Translator<'g> {
    fn rule_node(&self, name: &str) -> Result<Rc<Grammar<TokenId>>, GrammarError> {
        self.rule_nodes.get(name).cloned().ok_or_else(|| {
            GrammarError::new(
                "TranslationError".into(),
                format!("Rule {} is not defined in the [rules] section.", name),
            )
        })
    }

    fn define_rule(&mut self, rule: &Rule) -> Result<(), GrammarError> {
        let mut bodies = Vec::with_capacity(rule.productions.len());
        for production in &rule.productions {
            bodies.push(self.translate_production(production)?);
        }
        let node = self.rule_node(&rule.name)?;
        if bodies.len() == 1 {
            define_body(&node, &bodies[0], &rule.name)
        } else {
            let mut chain = bodies.pop().unwrap();
            while bodies.len() > 1 {
                chain = Grammar::alt(&bodies.pop().unwrap(), &chain);
            }
            node.define_alt(&bodies[0], &chain)
                .map_err(|err| definition_error(&rule.name, err))
        }
    }

    fn translate_production(
        &mut self,
        production: &Production,
    ) -> Result<Rc<Grammar<TokenId>>, GrammarError> {
        match production {
            Production::Alias(name) => self.rule_node(name),
            Production::Named { parts, .. } => self.translate_parts(parts),
        }
    }

    fn translate_parts(&mut self, parts: &[Part]) -> Result<Rc<Grammar<TokenId>>, GrammarError> {
        if parts.is_empty() {
            return Err(GrammarError::new(
                "TranslationError".into(),
                "A sequence of parts is empty.".into(),
            ));
        }
        let mut nodes = Vec::with_capacity(parts.len());
        for part in parts {
            nodes.push(self.translate_part(part)?);
        }
        Ok(seq_chain(nodes))
    }

    fn translate_part(&mut self, part: &Part) -> Result<Rc<Grammar<TokenId>>, GrammarError> {
        match part {
            Part::Literal(text) => Ok(Grammar::tok(self.vocabulary.intern_literal(text))),
            Part::DeclaredToken(name) => {
                let parsed = self.parsed;
                let matcher = parsed.matcher(name).ok_or_else(|| {
                    GrammarError::new(
                        "TranslationError".into(),
                        format!("Token {} is not declared in the [tokens] section.", name),
                    )
                })?;
                Ok(Grammar::tok(self.vocabulary.intern_token(matcher)))
            }
            Part::RuleMatch(name) => self.rule_node(name),
            // Field names feed code generation, which this library does not do.
            Part::FieldMatch(_, inner) => self.translate_part(inner),
            Part::Sequence(SequenceKind::Alternating, alternatives) => {
                if alternatives.is_empty() {
                    return Err(GrammarError::new(
                        "TranslationError".into(),
                        "A sequence of alternatives is empty.".into(),
                    ));
                }
                let mut nodes = Vec::with_capacity(alternatives.len());
                for alternative in alternatives {
                    nodes.push(self.translate_part(alternative)?);
                }
                Ok(alt_chain(nodes))
            }
            Part::Sequence(kind, parts) => {
                let body = self.translate_parts(parts)?;
                Ok(match kind {
                    SequenceKind::Plain => body,
                    SequenceKind::Optional => {
                        Grammar::alt(&body, &Grammar::eps(vec![Tree::empty()]))
                    }
                    SequenceKind::Repetition => Grammar::rep(&body),
                    SequenceKind::NonemptyRepetition => {
                        Grammar::seq(&body, &Grammar::rep(&body))
                    }
                    SequenceKind::Alternating => unreachable!(),
                })
            }
            Part::SeparatedSequence(kind, items, separator) => {
                let item = self.translate_parts(items)?;
                let separator = self.translate_parts(separator)?;
                let nonempty = Grammar::seq(&item, &Grammar::rep(&Grammar::seq(&separator, &item)));
                match kind {
                    SequenceKind::NonemptyRepetition => Ok(nonempty),
                    SequenceKind::Repetition => {
                        Ok(Grammar::alt(&nonempty, &Grammar::eps(vec![Tree::empty()])))
                    }
                    _ => Err(GrammarError::new(
                        "TranslationError".into(),
                        "A separator parameter requires repetition brackets.".into(),
                    )),
                }
            }
        }
    }
}

/// Define a single production rule node. A body that is itself a rule node may not be
/// defined yet, so it is referenced through a parse-tree preserving alternation with
/// the empty language instead of copying its shape.
fn define_body(
    node: &Rc<Grammar<TokenId>>,
    body: &Rc<Grammar<TokenId>>,
    rule_name: &str,
) -> Result<(), GrammarError> {
    let result = match body.defined_kind() {
        Some(kind) => node.define(kind.clone()),
        None => node.define_alt(body, &Grammar::nil()),
    };
    result.map_err(|err| definition_error(rule_name, err))
}

fn definition_error(rule_name: &str, err: String) -> GrammarError {
    GrammarError::new(
        "TranslationError".into(),
        format!("Rule {}: {}", rule_name, err),
    )
}

fn seq_chain(mut nodes: Vec<Rc<Grammar<TokenId>>>) -> Rc<Grammar<TokenId>> {
    let mut chain = nodes.pop().unwrap();
    while let Some(node) = nodes.pop() {
        chain = Grammar::seq(&node, &chain);
    }
    chain
}

fn alt_chain(mut nodes: Vec<Rc<Grammar<TokenId>>>) -> Rc<Grammar<TokenId>> {
    let mut chain = nodes.pop().unwrap();
    while let Some(node) = nodes.pop() {
        chain = Grammar::alt(&node, &chain);
    }
    chain
}
