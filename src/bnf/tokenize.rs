use super::{GrammarToken, Lex};
use crate::util::Code;
use crate::ParseError;
use regex::bytes::Regex;

/// Anchored lexeme patterns of the description language, tried in order.
fn lex_patterns() -> Vec<(GrammarToken, Regex)> {
    vec![
        (GrammarToken::Whitespace, Regex::new(r"^\s+").unwrap()),
        (GrammarToken::Comment, Regex::new(r"^#[^\n]*").unwrap()),
        (
            GrammarToken::Section,
            Regex::new(r"^\[[ \t]*(?i:rules|tokens|start)[ \t]*\]").unwrap(),
        ),
        (GrammarToken::Subst, Regex::new(r"^::=").unwrap()),
        (GrammarToken::RegexEqual, Regex::new(r"^:=").unwrap()),
        (GrammarToken::Colon, Regex::new(r"^:").unwrap()),
        (GrammarToken::Equal, Regex::new(r"^=").unwrap()),
        (GrammarToken::Stick, Regex::new(r"^\|").unwrap()),
        (GrammarToken::Ampersand, Regex::new(r"^&").unwrap()),
        (GrammarToken::Quote, Regex::new(r"^'(\\.|[^'\\])*'").unwrap()),
        (GrammarToken::Regex, Regex::new(r"^/(\\.|[^/\\])+/").unwrap()),
        (GrammarToken::LPar, Regex::new(r"^\(").unwrap()),
        (GrammarToken::RPar, Regex::new(r"^\)").unwrap()),
        (GrammarToken::LBrk, Regex::new(r"^\[").unwrap()),
        (GrammarToken::RBrk, Regex::new(r"^\]").unwrap()),
        (GrammarToken::LBrc, Regex::new(r"^\{").unwrap()),
        (GrammarToken::RBrc, Regex::new(r"^\}").unwrap()),
        (GrammarToken::LAbr, Regex::new(r"^<").unwrap()),
        (GrammarToken::RAbr, Regex::new(r"^>").unwrap()),
        (GrammarToken::LowWord, Regex::new(r"^[a-z][a-z0-9_]*").unwrap()),
        (
            GrammarToken::CapWord,
            Regex::new(r"^[A-Z][A-Za-z0-9_]*").unwrap(),
        ),
    ]
}

/// Split a grammar description into tokens, dropping whitespace and comments.
pub(crate) fn tokenize(code: &Code) -> Result<Vec<Lex>, ParseError> {
    let patterns = lex_patterns();
    let mut lexes: Vec<Lex> = Vec::new();
    let mut pointer = 0;
    while pointer < code.value.len() {
        let rest = &code.value[pointer..];
        let mut matched: Option<Lex> = None;
        for (token, pattern) in &patterns {
            if let Some(found) = pattern.find(rest) {
                debug_assert_eq!(found.start(), 0);
                matched = Some(Lex {
                    token: *token,
                    start: pointer,
                    end: pointer + found.end(),
                });
                break;
            }
        }
        match matched {
            Some(lex) => {
                pointer = lex.end;
                match lex.token {
                    GrammarToken::Whitespace | GrammarToken::Comment => {}
                    _ => lexes.push(lex),
                }
            }
            None => {
                return Err(ParseError::new(
                    pointer,
                    format!(
                        "Unexpected character '{}'.\nFailed to tokenize the grammar description at {}.",
                        code.value[pointer] as char,
                        code.obtain_position(pointer)
                    ),
                ));
            }
        }
    }
    Ok(lexes)
}
