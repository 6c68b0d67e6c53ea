//! The grammar term algebra: smart constructors, late bound definitions for cyclic
//! references, identity based keys, validation and grammar rendering.


use crate::{Grammar, GrammarError, GrammarId, GrammarKey, GrammarKind, Reducer, Tree};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

impl<TToken> Grammar<TToken> {
    /// Allocate a grammar node without a definition.
    ///
    /// A declared node can be referenced immediately, which is how recursive and
    /// mutually recursive grammars are built, and must be given its shape exactly once
    /// with one of the `define_*` methods before parsing.
    ///
    /// # Example
    /// ```
    /// use lang_dp::Grammar;
    ///
    /// // b ::= '(' b ')' | 'x'
    /// let b = Grammar::declare();
    /// let wrapped = Grammar::seq(&Grammar::tok('('), &Grammar::seq(&b, &Grammar::tok(')')));
    /// b.define_alt(&wrapped, &Grammar::tok('x')).unwrap();
    /// ```
    pub fn declare() -> Rc<Self> {
        Rc::new(Grammar {
            kind: OnceCell::new(),
        })
    }

    fn with_kind(kind: GrammarKind<TToken>) -> Rc<Self> {
        let cell = OnceCell::new();
        if cell.set(kind).is_err() {
            panic!("Internal error.")
        }
        Rc::new(Grammar { kind: cell })
    }

    /// The empty language; recognizes no strings at all.
    pub fn nil() -> Rc<Self> {
        Self::with_kind(GrammarKind::Nil)
    }

    /// The empty string, returning the given parse trees when matched.
    pub fn eps(trees: Vec<Rc<Tree<TToken>>>) -> Rc<Self> {
        Self::with_kind(GrammarKind::Eps(trees))
    }

    /// Exactly one input token, matched by equality.
    pub fn tok(token: TToken) -> Rc<Self> {
        Self::with_kind(GrammarKind::Tok(token))
    }

    /// Zero or more repetitions of `inner`.
    pub fn rep(inner: &Rc<Self>) -> Rc<Self> {
        Self::with_kind(GrammarKind::Rep(inner.clone()))
    }

    /// Either `left` or `right`.
    pub fn alt(left: &Rc<Self>, right: &Rc<Self>) -> Rc<Self> {
        Self::with_kind(GrammarKind::Alt(left.clone(), right.clone()))
    }

    /// `left` followed by `right`.
    pub fn seq(left: &Rc<Self>, right: &Rc<Self>) -> Rc<Self> {
        Self::with_kind(GrammarKind::Seq(left.clone(), right.clone()))
    }

    /// `inner` with a tree reduction applied to each of its parse results.
    pub fn red(inner: &Rc<Self>, reduce: Reducer<TToken>) -> Rc<Self> {
        Self::with_kind(GrammarKind::Red(inner.clone(), reduce))
    }

    pub(crate) fn define(&self, kind: GrammarKind<TToken>) -> Result<(), String> {
        self.kind
            .set(kind)
            .map_err(|_| "A definition is already set for this grammar node.".to_string())
    }

    /// Define a declared node as an alternation.
    pub fn define_alt(&self, left: &Rc<Self>, right: &Rc<Self>) -> Result<(), String> {
        self.define(GrammarKind::Alt(left.clone(), right.clone()))
    }

    /// Define a declared node as a concatenation.
    pub fn define_seq(&self, left: &Rc<Self>, right: &Rc<Self>) -> Result<(), String> {
        self.define(GrammarKind::Seq(left.clone(), right.clone()))
    }

    /// Define a declared node as a repetition.
    pub fn define_rep(&self, inner: &Rc<Self>) -> Result<(), String> {
        self.define(GrammarKind::Rep(inner.clone()))
    }

    /// Define a declared node as a reduction.
    pub fn define_red(&self, inner: &Rc<Self>, reduce: Reducer<TToken>) -> Result<(), String> {
        self.define(GrammarKind::Red(inner.clone(), reduce))
    }

    pub(crate) fn define_kind(&self, kind: GrammarKind<TToken>) {
        if self.kind.set(kind).is_err() {
            panic!("Internal error.")
        }
    }

    /// The shape of the node.
    pub fn kind(&self) -> &GrammarKind<TToken> {
        self.kind.get_or_init(|| {
            if cfg!(debug_assertions) {
                panic!("Grammar node is not defined. Validate the grammar before parsing.")
            }
            GrammarKind::Nil
        })
    }

    /// The shape of the node, or [None] while the node is only declared.
    pub fn defined_kind(&self) -> Option<&GrammarKind<TToken>> {
        self.kind.get()
    }

    /// The identity of the node. Distinct allocations are distinct grammars even when
    /// they are structurally equal.
    pub fn id(self: &Rc<Self>) -> GrammarId {
        GrammarId(Rc::as_ptr(self) as usize)
    }

    /// Number of distinct nodes reachable from this one.
    pub fn node_count(self: &Rc<Self>) -> usize {
        let mut visited: HashSet<GrammarId> = HashSet::new();
        let mut stack = vec![self.clone()];
        while let Some(grammar) = stack.pop() {
            if !visited.insert(grammar.id()) {
                continue;
            }
            if let Some(kind) = grammar.defined_kind() {
                for child in kind.children() {
                    stack.push(child.clone());
                }
            }
        }
        visited.len()
    }

    /// Check that every node reachable from this one has been defined.
    pub(crate) fn validate(self: &Rc<Self>) -> Result<(), GrammarError> {
        let mut visited: HashSet<GrammarId> = HashSet::new();
        let mut stack = vec![self.clone()];
        while let Some(grammar) = stack.pop() {
            if !visited.insert(grammar.id()) {
                continue;
            }
            match grammar.defined_kind() {
                None => {
                    return Err(GrammarError::new(
                        "InitializationError".into(),
                        "A grammar node is declared but never defined.".into(),
                    ));
                }
                Some(kind) => {
                    for child in kind.children() {
                        stack.push(child.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

impl<TToken> GrammarKind<TToken> {
    /// Name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            GrammarKind::Nil => "nil",
            GrammarKind::Eps(_) => "eps",
            GrammarKind::Tok(_) => "tok",
            GrammarKind::Rep(_) => "rep",
            GrammarKind::Alt(_, _) => "alt",
            GrammarKind::Seq(_, _) => "seq",
            GrammarKind::Red(_, _) => "red",
        }
    }

    /// Child grammars of the variant, in order.
    pub fn children(&self) -> Vec<&Rc<Grammar<TToken>>> {
        match self {
            GrammarKind::Nil | GrammarKind::Eps(_) | GrammarKind::Tok(_) => Vec::with_capacity(0),
            GrammarKind::Rep(inner) | GrammarKind::Red(inner, _) => vec![inner],
            GrammarKind::Alt(left, right) | GrammarKind::Seq(left, right) => vec![left, right],
        }
    }
}

impl<TToken: Debug> Grammar<TToken> {
    /// Render the reachable graph as numbered productions, one line per node.
    pub fn build_grammar(self: &Rc<Self>) -> Result<String, std::fmt::Error> {
        let mut writer = String::new();
        self.impl_grammar(&mut writer)?;
        Ok(writer)
    }

    /// Write the reachable graph as numbered productions into `writer`.
    pub fn impl_grammar(self: &Rc<Self>, writer: &mut dyn Write) -> std::fmt::Result {
        let mut named: HashMap<GrammarId, usize> = HashMap::new();
        let mut order: Vec<Rc<Grammar<TToken>>> = vec![self.clone()];
        named.insert(self.id(), 0);
        let mut index = 0;
        while index < order.len() {
            let grammar = order[index].clone();
            write!(writer, "{:>6} : ", format!("g{}", named[&grammar.id()]))?;
            match grammar.defined_kind() {
                None => writeln!(writer, "<declared>")?,
                Some(GrammarKind::Nil) => writeln!(writer, "nil")?,
                Some(GrammarKind::Eps(trees)) => writeln!(writer, "eps[{}]", trees.len())?,
                Some(GrammarKind::Tok(token)) => writeln!(writer, "tok({:?})", token)?,
                Some(GrammarKind::Rep(inner)) => {
                    let inner = label(inner, &mut named, &mut order);
                    writeln!(writer, "rep({})", inner)?
                }
                Some(GrammarKind::Alt(left, right)) => {
                    let left = label(left, &mut named, &mut order);
                    let right = label(right, &mut named, &mut order);
                    writeln!(writer, "alt({}, {})", left, right)?
                }
                Some(GrammarKind::Seq(left, right)) => {
                    let left = label(left, &mut named, &mut order);
                    let right = label(right, &mut named, &mut order);
                    writeln!(writer, "seq({}, {})", left, right)?
                }
                Some(GrammarKind::Red(inner, _)) => {
                    let inner = label(inner, &mut named, &mut order);
                    writeln!(writer, "red({})", inner)?
                }
            }
            index += 1;
        }
        Ok(())
    }
}

fn label<TToken>(
    child: &Rc<Grammar<TToken>>,
    named: &mut HashMap<GrammarId, usize>,
    order: &mut Vec<Rc<Grammar<TToken>>>,
) -> String {
    let number = match named.get(&child.id()) {
        Some(number) => *number,
        None => {
            let number = named.len();
            named.insert(child.id(), number);
            order.push(child.clone());
            number
        }
    };
    format!("g{}", number)
}

impl<TToken: Debug> Display for Grammar<TToken> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.defined_kind() {
            None => write!(f, "<declared>"),
            Some(GrammarKind::Tok(token)) => write!(f, "tok({:?})", token),
            Some(GrammarKind::Eps(trees)) => write!(f, "eps[{}]", trees.len()),
            Some(kind) => write!(f, "{}", kind.name()),
        }
    }
}

impl<TToken: Debug> Debug for Grammar<TToken> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.defined_kind() {
            None => write!(f, "<declared>"),
            Some(GrammarKind::Nil) => write!(f, "nil"),
            Some(GrammarKind::Eps(trees)) => write!(f, "eps[{}]", trees.len()),
            Some(GrammarKind::Tok(token)) => write!(f, "tok({:?})", token),
            Some(kind) => {
                let children: Vec<&'static str> = kind
                    .children()
                    .iter()
                    .map(|child| match child.defined_kind() {
                        None => "<declared>",
                        Some(child_kind) => child_kind.name(),
                    })
                    .collect();
                write!(f, "{}({})", kind.name(), children.join(", "))
            }
        }
    }
}

impl<TToken> GrammarKey<TToken> {
    /// Key a memo table entry on the identity of `grammar`, keeping the node alive for
    /// as long as the entry exists.
    pub fn of(grammar: &Rc<Grammar<TToken>>) -> Self {
        GrammarKey(grammar.clone())
    }

    pub fn grammar(&self) -> &Rc<Grammar<TToken>> {
        &self.0
    }
}

impl<TToken> Clone for GrammarKey<TToken> {
    fn clone(&self) -> Self {
        GrammarKey(self.0.clone())
    }
}

impl<TToken> PartialEq for GrammarKey<TToken> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<TToken> Eq for GrammarKey<TToken> {}

impl<TToken> Hash for GrammarKey<TToken> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(Rc::as_ptr(&self.0) as usize);
    }
}

impl<TToken> Debug for GrammarKey<TToken> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GrammarKey").field(&self.0.id()).finish()
    }
}
