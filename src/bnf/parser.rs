use super::tokenize::tokenize;
use super::{GrammarToken, Lex, Matcher, ParsedGrammar, Part, Production, Rule, SequenceKind};
use crate::util::Code;
use crate::ParseError;

impl ParsedGrammar {
    /// Parse a textual grammar description.
    pub fn parse(text: &str) -> Result<ParsedGrammar, ParseError> {
        let code = Code::from(text);
        let tokens = tokenize(&code)?;
        GrammarParser::new(&code, tokens)?.parse()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn matcher(&self, name: &str) -> Option<&Matcher> {
        self.token_matchers
            .iter()
            .find(|matcher| matcher.name() == name)
    }
}

/// Recursive descent parser over the filtered token stream of a description.
struct GrammarParser<'c> {
    code: &'c Code<'c>,
    tokens: Vec<Lex>,
    index: usize,
    rules: Vec<Rule>,
    token_matchers: Vec<Matcher>,
    start_symbols: Vec<String>,
}

impl<'c> GrammarParser<'c> {
    fn new(code: &'c Code<'c>, tokens: Vec<Lex>) -> Result<Self, ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::new(
                0,
                "The grammar description is empty.".into(),
            ));
        }
        Ok(Self {
            code,
            tokens,
            index: 0,
            rules: Vec::new(),
            token_matchers: Vec::new(),
            start_symbols: Vec::new(),
        })
    }

    fn current(&self) -> Option<Lex> {
        self.tokens.get(self.index).copied()
    }

    fn following(&self) -> Option<Lex> {
        self.tokens.get(self.index + 1).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn value(&self, lex: Lex) -> &'c str {
        unsafe { std::str::from_utf8_unchecked(&self.code.value[lex.start..lex.end]) }
    }

    fn error_at(&self, pointer: usize, message: String) -> ParseError {
        ParseError::new(
            pointer,
            format!(
                "{}\nFailed to parse the grammar description at {}.",
                message,
                self.code.obtain_position(pointer)
            ),
        )
    }

    fn unexpected(&self) -> ParseError {
        match self.current() {
            Some(lex) => self.error_at(
                lex.start,
                format!("Unexpected '{}'.", self.value(lex).trim_end()),
            ),
            None => self.error_at(
                self.code.value.len(),
                "Unexpected end of the grammar description.".into(),
            ),
        }
    }

    /// Whether the parser stands at the beginning of a new rule.
    fn rule_boundary(&self) -> bool {
        match (self.current(), self.following()) {
            (Some(lex), Some(next)) => {
                lex.token == GrammarToken::LowWord && next.token == GrammarToken::Subst
            }
            _ => false,
        }
    }

    fn parse(mut self) -> Result<ParsedGrammar, ParseError> {
        while let Some(lex) = self.current() {
            if lex.token != GrammarToken::Section {
                return Err(self.error_at(lex.start, "A section header is expected.".into()));
            }
            let section = self.section_name(lex);
            self.advance();
            match section.as_str() {
                "rules" => self.parse_rules()?,
                "tokens" => self.parse_token_matchers()?,
                "start" => self.parse_start()?,
                _ => {
                    return Err(
                        self.error_at(lex.start, format!("Unknown section '{}'.", section))
                    );
                }
            }
        }
        if self.rules.is_empty() {
            return Err(ParseError::new(
                self.code.value.len(),
                "The grammar description declares no rule.".into(),
            ));
        }
        // A description without a [start] section starts at the first rule.
        if self.start_symbols.is_empty() {
            self.start_symbols.push(self.rules[0].name.clone());
        }
        Ok(ParsedGrammar {
            rules: self.rules,
            token_matchers: self.token_matchers,
            start_symbols: self.start_symbols,
        })
    }

    fn section_name(&self, lex: Lex) -> String {
        let raw = self.value(lex);
        raw[1..raw.len() - 1].trim().to_lowercase()
    }

    fn parse_rules(&mut self) -> Result<(), ParseError> {
        while let Some(lex) = self.current() {
            if lex.token == GrammarToken::Section {
                break;
            }
            let rule = self.parse_rule()?;
            if self.rules.iter().any(|known| known.name == rule.name) {
                return Err(
                    self.error_at(lex.start, format!("Rule {} is already defined.", rule.name))
                );
            }
            self.rules.push(rule);
        }
        Ok(())
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let lex = self.current().ok_or_else(|| self.unexpected())?;
        if lex.token != GrammarToken::LowWord {
            return Err(self.error_at(lex.start, "A rule name is expected.".into()));
        }
        let name = self.value(lex).to_string();
        self.advance();
        let mut productions = Vec::new();
        while let Some(divider) = self.current() {
            match divider.token {
                GrammarToken::Subst | GrammarToken::Stick => {
                    self.advance();
                    productions.push(self.parse_production()?);
                }
                _ => break,
            }
        }
        if productions.is_empty() {
            return Err(self.error_at(lex.start, format!("Rule {} has no production.", name)));
        }
        Ok(Rule { name, productions })
    }

    fn parse_production(&mut self) -> Result<Production, ParseError> {
        let lex = self.current().ok_or_else(|| self.unexpected())?;
        match lex.token {
            GrammarToken::CapWord => self.parse_named_production(),
            GrammarToken::LowWord => {
                let alias = self.value(lex).to_string();
                self.advance();
                Ok(Production::Alias(alias))
            }
            _ => Err(self.error_at(lex.start, "A production is expected.".into())),
        }
    }

    fn parse_named_production(&mut self) -> Result<Production, ParseError> {
        let lex = self.current().ok_or_else(|| self.unexpected())?;
        let name = self.value(lex).to_string();
        self.advance();
        let mut parts = Vec::new();
        while let Some(part_lex) = self.current() {
            match part_lex.token {
                GrammarToken::Section
                | GrammarToken::Subst
                | GrammarToken::Stick
                | GrammarToken::Equal
                | GrammarToken::RegexEqual => break,
                _ => {}
            }
            if self.rule_boundary() {
                break;
            }
            parts.push(self.parse_part()?);
        }
        if parts.is_empty() {
            return Err(self.error_at(lex.start, format!("Production {} has no part.", name)));
        }
        Ok(Production::Named { name, parts })
    }

    fn parse_part(&mut self) -> Result<Part, ParseError> {
        let lex = self.current().ok_or_else(|| self.unexpected())?;
        match lex.token {
            GrammarToken::LPar | GrammarToken::LBrk | GrammarToken::LBrc | GrammarToken::LAbr => {
                self.parse_sequence()
            }
            GrammarToken::Quote => {
                let literal = self.quoted_value(lex);
                self.advance();
                Ok(Part::Literal(literal))
            }
            GrammarToken::LowWord => {
                let word = self.value(lex).to_string();
                if let Some(next) = self.following() {
                    if next.token == GrammarToken::Colon {
                        self.advance();
                        self.advance();
                        let inner = self.parse_part()?;
                        return Ok(Part::FieldMatch(word, Box::new(inner)));
                    }
                }
                self.advance();
                Ok(Part::RuleMatch(word))
            }
            GrammarToken::CapWord => {
                let token = self.value(lex).to_string();
                self.advance();
                Ok(Part::DeclaredToken(token))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_sequence(&mut self) -> Result<Part, ParseError> {
        let open = self.current().ok_or_else(|| self.unexpected())?;
        let (kind, closer) = match open.token {
            GrammarToken::LPar => (SequenceKind::Plain, GrammarToken::RPar),
            GrammarToken::LBrk => (SequenceKind::Optional, GrammarToken::RBrk),
            GrammarToken::LBrc => (SequenceKind::Repetition, GrammarToken::RBrc),
            GrammarToken::LAbr => (SequenceKind::NonemptyRepetition, GrammarToken::RAbr),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        let mut parts: Vec<Part> = Vec::new();
        let mut alternates: Vec<Vec<Part>> = Vec::new();
        loop {
            let lex = match self.current() {
                None => {
                    return Err(
                        self.error_at(open.start, "A sequence bracket is never closed.".into())
                    );
                }
                Some(lex) => lex,
            };
            if lex.token == closer {
                break;
            }
            if lex.token == GrammarToken::Stick {
                if parts.is_empty() {
                    return Err(
                        self.error_at(lex.start, "An alternative in a sequence is empty.".into())
                    );
                }
                alternates.push(std::mem::take(&mut parts));
                self.advance();
                continue;
            }
            if self.rule_boundary() {
                return Err(self.error_at(open.start, "A sequence bracket is never closed.".into()));
            }
            parts.push(self.parse_part()?);
        }
        self.advance();

        let sequence = if alternates.is_empty() {
            if parts.is_empty() {
                return Err(self.error_at(
                    open.start,
                    "A sequence must contain at least one part.".into(),
                ));
            }
            Part::Sequence(kind, parts)
        } else {
            if parts.is_empty() {
                return Err(
                    self.error_at(open.start, "An alternative in a sequence is empty.".into())
                );
            }
            alternates.push(parts);
            let processed = alternates
                .into_iter()
                .map(|alternate| {
                    if alternate.len() == 1 {
                        alternate.into_iter().next().unwrap()
                    } else {
                        Part::Sequence(kind, alternate)
                    }
                })
                .collect();
            Part::Sequence(SequenceKind::Alternating, processed)
        };

        if let Some(lex) = self.current() {
            if lex.token == GrammarToken::Ampersand {
                self.advance();
                let separator = self.parse_part()?;
                let separator_parts = match separator {
                    Part::Sequence(SequenceKind::Alternating, _) => {
                        return Err(self.error_at(
                            lex.start,
                            "A separator cannot contain alternatives.".into(),
                        ));
                    }
                    Part::Sequence(_, separator_parts) => separator_parts,
                    _ => {
                        return Err(self.error_at(
                            lex.start,
                            "A separator is written as a plain bracketed sequence.".into(),
                        ));
                    }
                };
                return match sequence {
                    Part::Sequence(
                        repetition @ (SequenceKind::Repetition | SequenceKind::NonemptyRepetition),
                        items,
                    ) => Ok(Part::SeparatedSequence(repetition, items, separator_parts)),
                    _ => Err(self.error_at(
                        lex.start,
                        "A separator parameter requires repetition brackets.".into(),
                    )),
                };
            }
        }
        Ok(sequence)
    }

    /// Strip the quotes of a literal and resolve backslash escapes.
    fn quoted_value(&self, lex: Lex) -> String {
        let raw = self.value(lex);
        let inner = &raw[1..raw.len() - 1];
        let mut value = String::with_capacity(inner.len());
        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                value.push(c);
            }
        }
        value
    }

    /// Strip the slashes of a regex token, keeping every escape except `\/` intact.
    fn regex_value(&self, lex: Lex) -> String {
        let raw = self.value(lex);
        let inner = &raw[1..raw.len() - 1];
        inner.replace("\\/", "/")
    }

    fn parse_token_matchers(&mut self) -> Result<(), ParseError> {
        while let Some(lex) = self.current() {
            if lex.token == GrammarToken::Section {
                break;
            }
            let matcher = self.parse_token_matcher()?;
            if self.token_matchers.iter().any(|known| known.name() == matcher.name()) {
                return Err(self.error_at(
                    lex.start,
                    format!("Token {} is already declared.", matcher.name()),
                ));
            }
            self.token_matchers.push(matcher);
        }
        Ok(())
    }

    fn parse_token_matcher(&mut self) -> Result<Matcher, ParseError> {
        let lex = self.current().ok_or_else(|| self.unexpected())?;
        if lex.token != GrammarToken::CapWord {
            return Err(self.error_at(lex.start, "A token name is expected.".into()));
        }
        let name = self.value(lex).to_string();
        self.advance();
        let divider = self.current().ok_or_else(|| self.unexpected())?;
        match divider.token {
            GrammarToken::Equal => {
                self.advance();
                let quote = self.current().ok_or_else(|| self.unexpected())?;
                if quote.token != GrammarToken::Quote {
                    return Err(self.error_at(quote.start, "A literal value is expected.".into()));
                }
                let value = self.quoted_value(quote);
                self.advance();
                Ok(Matcher::literal(name, value))
            }
            GrammarToken::RegexEqual => {
                self.advance();
                let pattern = self.current().ok_or_else(|| self.unexpected())?;
                if pattern.token != GrammarToken::Regex {
                    return Err(
                        self.error_at(pattern.start, "A regex pattern is expected.".into())
                    );
                }
                let source = self.regex_value(pattern);
                self.advance();
                Matcher::regex(name, source).map_err(|err| {
                    self.error_at(
                        pattern.start,
                        format!("A valid regular expression is expected. {}", err),
                    )
                })
            }
            _ => Err(self.error_at(
                divider.start,
                "A token is declared with = 'literal' or := /regex/.".into(),
            )),
        }
    }

    fn parse_start(&mut self) -> Result<(), ParseError> {
        while let Some(lex) = self.current() {
            if lex.token == GrammarToken::Section {
                break;
            }
            if lex.token != GrammarToken::LowWord {
                return Err(self.error_at(lex.start, "A start symbol is a rule name.".into()));
            }
            let symbol = self.value(lex).to_string();
            if self.start_symbols.contains(&symbol) {
                return Err(self.error_at(
                    lex.start,
                    format!("Start symbol {} is already declared.", symbol),
                ));
            }
            self.start_symbols.push(symbol);
            self.advance();
        }
        Ok(())
    }
}
