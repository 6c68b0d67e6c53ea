use crate::{Reducer, Tree};
use ptree::TreeItem;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl<TToken> Tree<TToken> {
    /// Create the zero length match witness.
    pub fn empty() -> Rc<Self> {
        Rc::new(Tree::Empty)
    }

    /// Create a leaf carrying a matched input token.
    pub fn leaf(token: TToken) -> Rc<Self> {
        Rc::new(Tree::Leaf(token))
    }

    /// Pair two subtrees.
    pub fn branch(left: &Rc<Self>, right: &Rc<Self>) -> Rc<Self> {
        Rc::new(Tree::Branch(left.clone(), right.clone()))
    }
}

impl<TToken: Copy> Tree<TToken> {
    /// All leaf tokens of the tree in left to right order.
    pub fn leaves(&self) -> Vec<TToken> {
        let mut collected = Vec::new();
        self.collect_leaves(&mut collected);
        collected
    }

    fn collect_leaves(&self, collected: &mut Vec<TToken>) {
        match self {
            Tree::Empty => {}
            Tree::Leaf(token) => collected.push(*token),
            Tree::Branch(left, right) => {
                left.collect_leaves(collected);
                right.collect_leaves(collected);
            }
        }
    }
}

impl<TToken: Eq> Tree<TToken> {
    /// Whether any leaf of the tree carries the given token.
    pub fn contains_leaf(&self, token: &TToken) -> bool {
        match self {
            Tree::Empty => false,
            Tree::Leaf(leaf) => leaf == token,
            Tree::Branch(left, right) => left.contains_leaf(token) || right.contains_leaf(token),
        }
    }
}

impl<TToken: Debug + Clone> TreeItem for Tree<TToken> {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            Tree::Empty => write!(f, "Empty"),
            Tree::Leaf(token) => write!(f, "{:?}", token),
            Tree::Branch(_, _) => write!(f, "."),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        match self {
            Tree::Branch(left, right) => {
                std::borrow::Cow::from(vec![(**left).clone(), (**right).clone()])
            }
            _ => std::borrow::Cow::from(Vec::with_capacity(0)),
        }
    }
}

impl<TToken: Debug + Clone> Tree<TToken> {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl<TToken> Reducer<TToken> {
    /// Wrap a tree rewriting function.
    pub fn new<F: Fn(&Rc<Tree<TToken>>) -> Rc<Tree<TToken>> + 'static>(reduce: F) -> Self {
        Reducer(Rc::new(reduce))
    }

    /// Apply the reduction to one parse tree.
    pub fn apply(&self, tree: &Rc<Tree<TToken>>) -> Rc<Tree<TToken>> {
        (self.0)(tree)
    }
}

impl<TToken> Clone for Reducer<TToken> {
    fn clone(&self) -> Self {
        Reducer(self.0.clone())
    }
}

impl<TToken> Debug for Reducer<TToken> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reducer")
    }
}
