use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use crate::automaton::{State, Symbol, EPSILON};
use crate::dfa::DFA;

/// One right-hand side: `symbol target`, or `ε` when `target` is `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    pub symbol: Symbol,
    pub target: Option<State>,
}

impl Production {
    pub fn step(symbol: Symbol, target: State) -> Self {
        Production {
            symbol,
            target: Some(target),
        }
    }

    pub fn epsilon() -> Self {
        Production {
            symbol: EPSILON.clone(),
            target: None,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.target.is_none()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(ref target) => write!(f, "{}{}", self.symbol, target),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// A right-regular grammar. Every non-terminal has an entry in `productions`,
/// possibly with no rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegularGrammar {
    non_terminals: BTreeSet<State>,
    terminals: BTreeSet<Symbol>,
    productions: BTreeMap<State, Vec<Production>>,
    start_symbol: State,
}

impl RegularGrammar {
    pub fn non_terminals(&self) -> &BTreeSet<State> {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn productions(&self) -> &BTreeMap<State, Vec<Production>> {
        &self.productions
    }

    pub fn start_symbol(&self) -> &State {
        &self.start_symbol
    }

    /// The rules of `non_terminal`; empty for names the grammar doesn't know.
    pub fn rules(&self, non_terminal: &str) -> &[Production] {
        self.productions
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// States become non-terminals, each transition `s -a-> t` becomes `s -> a t`
/// and each accepting state `s` gets `s -> ε`.
///
/// Rules for a state come in alphabet order, the ε-rule last. Transitions on
/// symbols outside the alphabet are not visited; dangling destinations are
/// copied through unchanged.
pub fn dfa_to_regular_grammar(dfa: &DFA) -> RegularGrammar {
    let mut productions = BTreeMap::new();

    for state in dfa.states() {
        let mut rules = Vec::new();
        for symbol in dfa.alphabet() {
            if let Some(target) = dfa.transition(state.as_str(), symbol.as_str()) {
                rules.push(Production::step(symbol.clone(), target.clone()));
            }
        }
        if dfa.is_accepting(state.as_str()) {
            rules.push(Production::epsilon());
        }
        productions.insert(state.clone(), rules);
    }

    debug!(
        "built grammar with {} non-terminals from {} transitions",
        productions.len(),
        dfa.transition_count()
    );

    RegularGrammar {
        non_terminals: dfa.states().clone(),
        terminals: dfa.alphabet().clone(),
        productions,
        start_symbol: dfa.start_state().clone(),
    }
}

/// `NonTerminal -> rule1 | rule2 | ...`, one line per non-terminal.
pub fn format_grammar(grammar: &RegularGrammar) -> Vec<String> {
    grammar
        .productions
        .iter()
        .map(|(non_terminal, rules)| {
            let rhs: Vec<String> = rules.iter().map(Production::to_string).collect();
            format!("{} -> {}", non_terminal, rhs.join(" | "))
        })
        .collect()
}

fn write_set<T: fmt::Display>(f: &mut fmt::Formatter<'_>, set: &BTreeSet<T>) -> fmt::Result {
    write!(f, "{{")?;
    for (i, item) in set.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "}}")
}

impl fmt::Display for RegularGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Non-terminals: ")?;
        write_set(f, &self.non_terminals)?;
        write!(f, "\nTerminals: ")?;
        write_set(f, &self.terminals)?;
        writeln!(f, "\nStart Symbol: {}", self.start_symbol)?;
        writeln!(f, "Productions:")?;
        for line in format_grammar(self) {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}
