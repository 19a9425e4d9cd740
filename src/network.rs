//! The grammar combinator surface and the dotted-rule compiler (spec §4.1,
//! §4.6). Deliberately outside the core's hard part: a small fluent builder
//! and a tree-walk that lowers it into a `RuleNetwork`.
//!
//! The combinator shape mirrors `original_source/slayer.py`'s
//! `GrammarObject`/`GrammarAnd`/`GrammarOr`/`GrammarConstraint` operator
//! overloads (`__add__`, `__or__`, `__lt__`, ...), translated into idiomatic
//! Rust: `std::ops::Add` for concatenation, `std::ops::BitOr` for alternation,
//! and named methods for precedence constraints since Rust's comparison
//! operators must return `bool`, not a builder.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::ops::{Add, BitOr};

use itertools::Itertools;
use smol_str::SmolStr;

use crate::node::{Node, NodeHandle};
use crate::precedence::{PrecPredicate, Precedence};

/// A grammar expression under construction: a terminal, a reference to
/// another rule (possibly precedence-constrained), a sequence, or an
/// alternation.
#[derive(Clone)]
pub enum Expr<T> {
    Terminal(T),
    NonTerminal(SmolStr),
    Constrained(SmolStr, PrecPredicate),
    Seq(Vec<Expr<T>>),
    Alt(Vec<Expr<T>>),
}

/// Build a terminal-matching expression.
pub fn term<T>(value: T) -> Expr<T> {
    Expr::Terminal(value)
}

/// Build a reference to another rule by name.
pub fn nt<T>(name: &str) -> Expr<T> {
    Expr::NonTerminal(SmolStr::new(name))
}

/// The empty sequence: a rule built from this compiles straight to its
/// `Reduce` node, giving epsilon-rule support for free (spec §7.2) without
/// the core needing to special-case it.
pub fn empty<T>() -> Expr<T> {
    Expr::Seq(Vec::new())
}

impl<T> Expr<T> {
    /// Rewrite a `NonTerminal` reference into a precedence-constrained one.
    /// Called on anything else, this is a no-op: the combinator surface does
    /// not validate construction mistakes (spec §4.6), it only ever gets
    /// called on the result of `nt(...)` in practice.
    fn with_prec(self, predicate: PrecPredicate) -> Self {
        match self {
            Expr::NonTerminal(name) => Expr::Constrained(name, predicate),
            other => other,
        }
    }

    pub fn lt(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::lt(bound))
    }

    pub fn le(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::le(bound))
    }

    pub fn gt(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::gt(bound))
    }

    pub fn ge(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::ge(bound))
    }

    pub fn eq_prec(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::eq_to(bound))
    }

    pub fn ne_prec(self, bound: i32) -> Self {
        self.with_prec(PrecPredicate::ne_to(bound))
    }
}

impl<T> Add for Expr<T> {
    type Output = Expr<T>;

    fn add(self, rhs: Expr<T>) -> Expr<T> {
        match (self, rhs) {
            (Expr::Seq(mut a), Expr::Seq(b)) => {
                a.extend(b);
                Expr::Seq(a)
            }
            (Expr::Seq(mut a), rhs) => {
                a.push(rhs);
                Expr::Seq(a)
            }
            (lhs, Expr::Seq(mut b)) => {
                b.insert(0, lhs);
                Expr::Seq(b)
            }
            (lhs, rhs) => Expr::Seq(vec![lhs, rhs]),
        }
    }
}

impl<T> BitOr for Expr<T> {
    type Output = Expr<T>;

    fn bitor(self, rhs: Expr<T>) -> Expr<T> {
        match (self, rhs) {
            (Expr::Alt(mut a), Expr::Alt(b)) => {
                a.extend(b);
                Expr::Alt(a)
            }
            (Expr::Alt(mut a), rhs) => {
                a.push(rhs);
                Expr::Alt(a)
            }
            (lhs, Expr::Alt(mut b)) => {
                b.insert(0, lhs);
                Expr::Alt(b)
            }
            (lhs, rhs) => Expr::Alt(vec![lhs, rhs]),
        }
    }
}

/// Lower one grammar expression into a node chain ending in `next` (spec
/// §4.1): concatenation wraps right-to-left, alternation wraps into `Branch`.
fn compile_expr<T>(expr: Expr<T>, next: NodeHandle<T>) -> NodeHandle<T> {
    match expr {
        Expr::Terminal(terminal) => NodeHandle::new(Node::Scan { terminal, next }),
        Expr::NonTerminal(name) => NodeHandle::new(Node::Predict { name, next }),
        Expr::Constrained(name, predicate) => {
            NodeHandle::new(Node::Constrain { name, predicate, next })
        }
        Expr::Seq(parts) => parts
            .into_iter()
            .rev()
            .fold(next, |acc, part| compile_expr(part, acc)),
        Expr::Alt(parts) => NodeHandle::new(Node::Branch {
            alternatives: parts
                .into_iter()
                .map(|part| compile_expr(part, next.clone()))
                .collect(),
        }),
    }
}

/// Accumulates `(name, precedence, Expr)` triples; the same name may be
/// registered more than once, at the same or different precedences, exactly
/// as the original Python source's repeated `g.name[p] = ...` assignments.
#[derive(Default)]
pub struct GrammarBuilder<T> {
    rules: Vec<(SmolStr, Precedence, Expr<T>)>,
}

impl<T> GrammarBuilder<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule at precedence 0.
    pub fn rule(self, name: &str, expr: Expr<T>) -> Self {
        self.rule_at(name, 0, expr)
    }

    /// Register a rule at an explicit precedence.
    pub fn rule_at(mut self, name: &str, precedence: i32, expr: Expr<T>) -> Self {
        self.rules.push((SmolStr::new(name), Precedence(precedence), expr));
        self
    }

    /// Lower every registered rule into the node network (spec §4.1),
    /// erroring only if `start_name` was never registered.
    pub fn compile(self, start_name: &str) -> Result<RuleNetwork<T>, GrammarError> {
        let mut rules: HashMap<SmolStr, Vec<(Precedence, NodeHandle<T>)>> = HashMap::new();
        for (name, precedence, expr) in self.rules {
            let reduce = NodeHandle::new(Node::Reduce { name: name.clone(), precedence });
            let head = compile_expr(expr, reduce);
            rules.entry(name).or_default().push((precedence, head));
        }

        let start_name = SmolStr::new(start_name);
        if !rules.contains_key(&start_name) {
            return Err(GrammarError::NoRulesForStart(start_name));
        }
        Ok(RuleNetwork { rules, start_name })
    }
}

/// The compiled, read-only grammar: every non-terminal name maps to its rule
/// heads, each tagged with its declared precedence (spec §4.2's
/// `rules_for(name, φ?)` contract — the `φ?` filter itself lives in
/// `Chart::register_kernel`, not here).
pub struct RuleNetwork<T> {
    rules: HashMap<SmolStr, Vec<(Precedence, NodeHandle<T>)>>,
    start_name: SmolStr,
}

impl<T> RuleNetwork<T> {
    pub fn rules_for(&self, name: &str) -> &[(Precedence, NodeHandle<T>)] {
        self.rules.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start_name(&self) -> &str {
        &self.start_name
    }
}

impl<T: fmt::Display> fmt::Display for RuleNetwork<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.rules.keys().sorted() {
            for (precedence, head) in &self.rules[name] {
                writeln!(f, "{name}[{precedence}]: {head}")?;
            }
        }
        Ok(())
    }
}

/// The one grammar-construction mistake this compiler catches eagerly,
/// instead of deferring to "every parse silently fails to accept" (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    NoRulesForStart(SmolStr),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::NoRulesForStart(name) => {
                write!(f, "no rule registered for start symbol '{name}'")
            }
        }
    }
}

impl Error for GrammarError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequencing_flattens_nested_seqs() {
        let expr: Expr<char> = term('a') + term('b') + term('c');
        match expr {
            Expr::Seq(parts) => assert_eq!(parts.len(), 3),
            _ => panic!("expected a flattened Seq"),
        }
    }

    #[test]
    fn alternation_flattens_nested_alts() {
        let expr: Expr<char> = term('a') | term('b') | term('c');
        match expr {
            Expr::Alt(parts) => assert_eq!(parts.len(), 3),
            _ => panic!("expected a flattened Alt"),
        }
    }

    #[test]
    fn compiling_without_a_start_rule_errors() {
        let result = GrammarBuilder::<char>::new().rule("A", term('a')).compile("S");
        assert!(matches!(result, Err(GrammarError::NoRulesForStart(_))));
    }

    #[test]
    fn precedence_constraint_only_rewrites_nonterminals() {
        let constrained: Expr<char> = nt("expr").lt(20);
        assert!(matches!(constrained, Expr::Constrained(_, _)));

        // calling .lt on a terminal is a no-op, not a panic
        let unchanged: Expr<char> = term('a').lt(20);
        assert!(matches!(unchanged, Expr::Terminal('a')));
    }
}
