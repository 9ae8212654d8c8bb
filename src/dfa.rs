use std::collections::{BTreeMap, BTreeSet};

use bit_set::BitSet;
use serde::{Deserialize, Serialize};

use crate::automaton::{State, Symbol};
use crate::error::{Error, Malformation, Result};

/// state -> (symbol -> state). A partial function: missing entries are simply absent.
pub type TransitionMap = BTreeMap<State, BTreeMap<Symbol, State>>;

/// A deterministic finite automaton given by its five components.
///
/// Nothing is checked on construction; a start state outside `states` or a
/// transition into an undeclared state is kept as-is. Call `validate` when the
/// caller needs those guarantees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DFA {
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    transitions: TransitionMap,
    start_state: State,
    accept_states: BTreeSet<State>,
}

/// Builds a `DFA` from loose parts. Transitions are `(from, symbol, to)` triples;
/// a later triple for the same `(from, symbol)` replaces an earlier one.
pub fn make_dfa<S, A, T, F>(
    states: S,
    alphabet: A,
    transitions: T,
    start_state: impl Into<State>,
    accept_states: F,
) -> DFA
where
    S: IntoIterator,
    S::Item: Into<State>,
    A: IntoIterator,
    A::Item: Into<Symbol>,
    T: IntoIterator<Item = (S::Item, A::Item, S::Item)>,
    F: IntoIterator,
    F::Item: Into<State>,
{
    let mut map = TransitionMap::new();
    for (from, symbol, to) in transitions {
        map.entry(from.into())
            .or_insert_with(BTreeMap::new)
            .insert(symbol.into(), to.into());
    }
    DFA::new(
        states.into_iter().map(Into::into).collect(),
        alphabet.into_iter().map(Into::into).collect(),
        map,
        start_state.into(),
        accept_states.into_iter().map(Into::into).collect(),
    )
}

impl DFA {
    pub fn new(
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        transitions: TransitionMap,
        start_state: State,
        accept_states: BTreeSet<State>,
    ) -> Self {
        DFA {
            states,
            alphabet,
            transitions,
            start_state,
            accept_states,
        }
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionMap {
        &self.transitions
    }

    pub fn start_state(&self) -> &State {
        &self.start_state
    }

    pub fn accept_states(&self) -> &BTreeSet<State> {
        &self.accept_states
    }

    pub fn transition(&self, from: &str, symbol: &str) -> Option<&State> {
        self.transitions.get(from)?.get(symbol)
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Every transition entry as a `(from, symbol, to)` triple.
    pub fn edges(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(symbol, to)| (from, symbol, to)))
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }

    /// Checks that every identifier the automaton mentions is declared.
    pub fn validate(&self) -> Result<()> {
        let malformed = |m| Err(Error::Malformed(m));

        if self.states.is_empty() {
            return malformed(Malformation::NoStates);
        }
        if !self.states.contains(&self.start_state) {
            return malformed(Malformation::UnknownStartState(self.start_state.clone()));
        }
        if let Some(s) = self.accept_states.difference(&self.states).next() {
            return malformed(Malformation::UnknownAcceptState(s.clone()));
        }
        for (from, row) in &self.transitions {
            if !self.states.contains(from) {
                return malformed(Malformation::UnknownSource(from.clone()));
            }
            for (symbol, to) in row {
                if !self.alphabet.contains(symbol) {
                    return malformed(Malformation::UnknownSymbol {
                        from: from.clone(),
                        symbol: symbol.clone(),
                    });
                }
                if !self.states.contains(to) {
                    return malformed(Malformation::UnknownDestination {
                        from: from.clone(),
                        symbol: symbol.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Declared states that no path from the start state reaches.
    pub fn unreachable_states(&self) -> BTreeSet<State> {
        // `states` iterates sorted, so a state's number is its position.
        let numbering: Vec<&State> = self.states.iter().collect();
        let number = |state: &State| numbering.binary_search(&state).ok();

        let mut seen = BitSet::with_capacity(numbering.len());
        let mut worklist = Vec::new();
        if let Some(start) = number(&self.start_state) {
            seen.insert(start);
            worklist.push(start);
        }
        while let Some(n) = worklist.pop() {
            let row = match self.transitions.get(numbering[n]) {
                Some(row) => row,
                None => continue,
            };
            for to in row.values() {
                if let Some(m) = number(to) {
                    if seen.insert(m) {
                        worklist.push(m);
                    }
                }
            }
        }

        numbering
            .into_iter()
            .enumerate()
            .filter(|&(n, _)| !seen.contains(n))
            .map(|(_, state)| state.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_then_bs() -> DFA {
        make_dfa(
            vec!["q0", "q1"],
            vec!["a", "b"],
            vec![("q0", "a", "q1"), ("q1", "b", "q1")],
            "q0",
            vec!["q1"],
        )
    }

    #[test]
    fn fields_are_kept_verbatim() {
        let dfa = a_then_bs();
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.alphabet().len(), 2);
        assert_eq!(dfa.start_state().as_str(), "q0");
        assert!(dfa.is_accepting("q1"));
        assert!(!dfa.is_accepting("q0"));
        assert_eq!(dfa.transition("q0", "a"), Some(&State::from("q1")));
        assert_eq!(dfa.transition("q0", "b"), None);
        assert_eq!(dfa.transition("q9", "a"), None);
        assert_eq!(dfa.transition_count(), 2);
    }

    #[test]
    fn later_triple_wins() {
        let dfa = make_dfa(
            vec!["p", "q"],
            vec!["x"],
            vec![("p", "x", "p"), ("p", "x", "q")],
            "p",
            Vec::<&str>::new(),
        );
        assert_eq!(dfa.transition("p", "x"), Some(&State::from("q")));
        assert_eq!(dfa.transition_count(), 1);
    }

    #[test]
    fn edges_cover_every_entry() {
        let dfa = a_then_bs();
        let edges: Vec<(&str, &str, &str)> = dfa
            .edges()
            .map(|(f, s, t)| (f.as_str(), s.as_str(), t.as_str()))
            .collect();
        assert_eq!(edges, vec![("q0", "a", "q1"), ("q1", "b", "q1")]);
    }

    #[test]
    fn well_formed_automaton_validates() {
        assert!(a_then_bs().validate().is_ok());
    }

    #[test]
    fn malformed_automata_are_accepted_but_fail_validation() {
        let no_states = make_dfa(
            Vec::<&str>::new(),
            Vec::<&str>::new(),
            Vec::new(),
            "q0",
            Vec::<&str>::new(),
        );
        match no_states.validate() {
            Err(Error::Malformed(Malformation::NoStates)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let bad_start = make_dfa(vec!["q0"], vec!["a"], Vec::new(), "q9", Vec::<&str>::new());
        match bad_start.validate() {
            Err(Error::Malformed(Malformation::UnknownStartState(s))) => assert_eq!(s.as_str(), "q9"),
            other => panic!("unexpected {:?}", other),
        }

        let bad_accept = make_dfa(vec!["q0"], vec!["a"], Vec::new(), "q0", vec!["q3"]);
        match bad_accept.validate() {
            Err(Error::Malformed(Malformation::UnknownAcceptState(s))) => assert_eq!(s.as_str(), "q3"),
            other => panic!("unexpected {:?}", other),
        }

        let bad_source = make_dfa(vec!["q0"], vec!["a"], vec![("zz", "a", "q0")], "q0", vec!["q0"]);
        match bad_source.validate() {
            Err(Error::Malformed(Malformation::UnknownSource(s))) => assert_eq!(s.as_str(), "zz"),
            other => panic!("unexpected {:?}", other),
        }

        let bad_symbol = make_dfa(vec!["q0"], vec!["a"], vec![("q0", "c", "q0")], "q0", vec!["q0"]);
        match bad_symbol.validate() {
            Err(Error::Malformed(Malformation::UnknownSymbol { symbol, .. })) => {
                assert_eq!(symbol.as_str(), "c")
            }
            other => panic!("unexpected {:?}", other),
        }

        let dangling = make_dfa(vec!["q0"], vec!["a"], vec![("q0", "a", "q5")], "q0", vec!["q0"]);
        match dangling.validate() {
            Err(Error::Malformed(Malformation::UnknownDestination { to, .. })) => {
                assert_eq!(to.as_str(), "q5")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unreachable_states() {
        let dfa = make_dfa(
            vec!["q0", "q1", "q2", "q3"],
            vec!["a"],
            vec![("q0", "a", "q1"), ("q1", "a", "q0"), ("q2", "a", "q3"), ("q1", "a", "q9")],
            "q0",
            vec!["q3"],
        );
        let unreachable = dfa.unreachable_states();
        let names: Vec<&str> = unreachable.iter().map(State::as_str).collect();
        assert_eq!(names, vec!["q2", "q3"]);
    }

    #[test]
    fn unknown_start_reaches_nothing() {
        let dfa = make_dfa(vec!["q0"], vec!["a"], vec![("q0", "a", "q0")], "", Vec::<&str>::new());
        assert_eq!(dfa.unreachable_states().len(), 1);
    }
}
