//! The five text fields a user fills in to describe an automaton.
//!
//! Lists are comma separated. Transitions are one per line, written
//! `state,symbol->state`.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::automaton::{State, Symbol};
use crate::dfa::{TransitionMap, DFA};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DfaForm {
    pub states: String,
    pub alphabet: String,
    pub start_state: String,
    pub accept_states: String,
    pub transitions: String,
}

/// Comma separated tokens, trimmed, empty ones dropped.
pub fn parse_list<T: From<String>>(text: &str) -> Vec<T> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| T::from(token.to_owned()))
        .collect()
}

fn invalid(line: usize, reason: &str) -> Error {
    Error::InvalidInput {
        line,
        reason: reason.to_owned(),
    }
}

fn parse_transition(line: &str) -> std::result::Result<(State, Symbol, State), &'static str> {
    let mut arrow = line.splitn(2, "->");
    let lhs = arrow.next().unwrap_or("");
    let to = arrow.next().ok_or("expected `state,symbol->state`")?.trim();
    let mut comma = lhs.split(',');
    let (from, symbol) = match (comma.next(), comma.next(), comma.next()) {
        (Some(from), Some(symbol), None) => (from.trim(), symbol.trim()),
        _ => return Err("expected exactly one `,` before `->`"),
    };
    if from.is_empty() || symbol.is_empty() || to.is_empty() {
        return Err("state, symbol and destination must not be empty");
    }
    Ok((State::from(from), Symbol::from(symbol), State::from(to)))
}

/// Parses `state,symbol->state` lines. Blank lines are skipped; giving the
/// same state and symbol two different destinations is an error.
pub fn parse_transitions(text: &str) -> Result<TransitionMap> {
    let mut transitions = TransitionMap::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let (from, symbol, to) = parse_transition(line).map_err(|reason| invalid(line_no, reason))?;
        let row = transitions.entry(from.clone()).or_insert_with(BTreeMap::new);
        match row.entry(symbol) {
            Entry::Vacant(slot) => {
                slot.insert(to);
            }
            Entry::Occupied(slot) => {
                if *slot.get() != to {
                    let reason = format!("{},{} already goes to {}", from, slot.key(), slot.get());
                    return Err(invalid(line_no, &reason));
                }
            }
        }
    }
    Ok(transitions)
}

impl DfaForm {
    pub fn parse(&self) -> Result<DFA> {
        Ok(DFA::new(
            parse_list(&self.states).into_iter().collect(),
            parse_list(&self.alphabet).into_iter().collect(),
            parse_transitions(&self.transitions)?,
            State::from(self.start_state.trim()),
            parse_list(&self.accept_states).into_iter().collect(),
        ))
    }

    /// The field contents that describe `dfa`.
    pub fn from_dfa(dfa: &DFA) -> Self {
        fn join<'a, T: AsRef<str> + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
            items.into_iter().map(|item| item.as_ref()).collect::<Vec<&str>>().join(",")
        }

        DfaForm {
            states: join(dfa.states()),
            alphabet: join(dfa.alphabet()),
            start_state: dfa.start_state().to_string(),
            accept_states: join(dfa.accept_states()),
            transitions: dfa
                .edges()
                .map(|(from, symbol, to)| format!("{},{}->{}", from, symbol, to))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
