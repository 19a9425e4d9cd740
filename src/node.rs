//! The dotted-rule network: a closed set of five node kinds (spec §3), built
//! once by the compiler (`network::compile_expr`) and shared by reference for
//! the rest of a recognizer's life.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use smol_str::SmolStr;

use crate::precedence::{PrecPredicate, Precedence};

/// One position-in-a-production. Closed: no sixth variant is ever added, the
/// driver (`recognizer::Recognizer`) dispatches on this tag exhaustively.
#[derive(Debug)]
pub enum Node<T> {
    /// Dot immediately before terminal `terminal`.
    Scan { terminal: T, next: NodeHandle<T> },
    /// Dot before non-terminal `name`, no precedence filter.
    Predict { name: SmolStr, next: NodeHandle<T> },
    /// Dot before non-terminal `name`; a reduction of `name` only wakes this
    /// waiter if `predicate` holds of the reducer's declared precedence.
    Constrain {
        name: SmolStr,
        predicate: PrecPredicate,
        next: NodeHandle<T>,
    },
    /// Dot at an alternation; every successor is tried.
    Branch { alternatives: Vec<NodeHandle<T>> },
    /// Dot at the end of a production: completes `name` at `precedence`.
    Reduce { name: SmolStr, precedence: Precedence },
}

/// A shared, immutable handle into the node network.
///
/// Equality and hashing are defined over the `Rc` pointer, not the pointed-to
/// structure: nodes are never cloned into diverging copies once built, so two
/// handles are "the same node" exactly when they're the same allocation. This
/// also sidesteps needing `T: Hash` / recursive structural comparison through
/// `Branch` fan-out.
pub struct NodeHandle<T>(Rc<Node<T>>);

impl<T> NodeHandle<T> {
    pub fn new(node: Node<T>) -> Self {
        Self(Rc::new(node))
    }

    pub fn as_ref(&self) -> &Node<T> {
        &self.0
    }
}

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for NodeHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for NodeHandle<T> {}

impl<T> Hash for NodeHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl<T> std::ops::Deref for NodeHandle<T> {
    type Target = Node<T>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Display> fmt::Display for NodeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_ref(), f)
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scan { terminal, .. } => write!(f, "'{terminal}' \u{2022}"),
            Node::Predict { name, .. } => write!(f, "{name} \u{2022}"),
            Node::Constrain { name, predicate, .. } => {
                write!(f, "({name} {predicate}) \u{2022}")
            }
            Node::Branch { alternatives } => {
                write!(f, "(")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                write!(f, ")")
            }
            Node::Reduce { name, precedence } => write!(f, "-> {name}[{precedence}]"),
        }
    }
}

/// A sentinel name no grammar ever predicts; used only to seed the start
/// symbol's kernel slot (spec §4.5). Represented as an ordinary `Reduce` node
/// rather than a sixth node kind, per the closed-set design note in spec §9.
pub const SENTINEL_NAME: &str = "\u{0}__sentinel__";

pub fn sentinel_node<T>() -> NodeHandle<T> {
    NodeHandle::new(Node::Reduce {
        name: SmolStr::new(SENTINEL_NAME),
        precedence: Precedence(0),
    })
}
