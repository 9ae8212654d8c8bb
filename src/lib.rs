//! Converts deterministic finite automata into right-regular grammars.
//!
//! Each state becomes a non-terminal, each transition `s -a-> t` the rule
//! `s -> a t`, and each accepting state `s` the rule `s -> ε`. Automata can be
//! read from and written to JSON, typed in as plain text, and drawn with Graphviz.

pub mod automaton;
pub mod dfa;
pub mod dot;
pub mod error;
pub mod grammar;
pub mod input;
pub mod json;

pub use crate::automaton::{State, Symbol, EPSILON};
pub use crate::dfa::{make_dfa, TransitionMap, DFA};
pub use crate::dot::{render, DotOptions};
pub use crate::error::{Error, Malformation, Result};
pub use crate::grammar::{dfa_to_regular_grammar, format_grammar, Production, RegularGrammar};
pub use crate::input::DfaForm;
