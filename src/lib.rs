//! A chart-based recognizer for context-free grammars augmented with
//! numeric precedence constraints.
//!
//! The crate is organized leaves-first, matching the dependency order of the
//! specification: [`precedence`] and [`node`] are the immutable value types
//! the rest of the crate is built from; [`chart`] is the core Earley
//! machinery (kernels, reductions, the work queue, the transient set);
//! [`recognizer`] is the top-level driver; [`network`] is the ambient
//! grammar-construction surface and compiler that feeds a [`chart::Chart`]
//! from outside the core.

pub mod chart;
pub mod network;
pub mod node;
pub mod precedence;
pub mod recognizer;

pub use network::{empty, nt, term, Expr, GrammarBuilder, GrammarError, RuleNetwork};
pub use precedence::{PrecOp, PrecPredicate, Precedence};
pub use recognizer::Recognizer;
