use std::env;

use dfagram::input::DfaForm;
use dfagram::DotOptions;

/// Usage: dot STATES ALPHABET START ACCEPT [TRANSITION...]
fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let field = |i: usize| args.get(i).cloned().unwrap_or_default();
    let form = DfaForm {
        states: field(0),
        alphabet: field(1),
        start_state: field(2),
        accept_states: field(3),
        transitions: args.iter().skip(4).cloned().collect::<Vec<_>>().join("\n"),
    };
    let dfa = match form.parse() {
        Ok(dfa) => dfa,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let options = DotOptions {
        horizontal: true,
        merge_parallel_edges: true,
    };
    println!("{}", dfa.dot(options).trim());
}
