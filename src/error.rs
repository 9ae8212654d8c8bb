use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::automaton::{State, Symbol};

/// A referential-integrity problem found by `DFA::validate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Malformation {
    NoStates,
    UnknownStartState(State),
    UnknownAcceptState(State),
    UnknownSource(State),
    UnknownSymbol { from: State, symbol: Symbol },
    UnknownDestination { from: State, symbol: Symbol, to: State },
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformation::NoStates => write!(f, "the automaton has no states"),
            Malformation::UnknownStartState(s) => write!(f, "start state {} is not a state", s),
            Malformation::UnknownAcceptState(s) => write!(f, "accept state {} is not a state", s),
            Malformation::UnknownSource(s) => {
                write!(f, "transitions leave {}, which is not a state", s)
            }
            Malformation::UnknownSymbol { from, symbol } => {
                write!(f, "transition {},{} uses a symbol outside the alphabet", from, symbol)
            }
            Malformation::UnknownDestination { from, symbol, to } => {
                write!(f, "transition {},{}->{} targets an unknown state", from, symbol, to)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed automaton: {0}")]
    Malformed(Malformation),

    #[error("invalid input on line {line}: {reason}")]
    InvalidInput { line: usize, reason: String },

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid DFA record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graphviz `dot` could not be started: {0}")]
    RendererMissing(#[source] io::Error),

    #[error("graphviz `dot` exited with {status}: {stderr}")]
    RendererFailed { status: ExitStatus, stderr: String },
}

pub type Result<T> = std::result::Result<T, Error>;
