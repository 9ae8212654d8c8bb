use dfagram::{dfa_to_regular_grammar, format_grammar, make_dfa};

fn main() {
    // Strings over {a, b} that start with `a` and then only contain `b`s.
    let dfa = make_dfa(
        vec!["q0", "q1", "q2"],
        vec!["a", "b"],
        vec![("q0", "a", "q1"), ("q1", "b", "q1"), ("q1", "a", "q2")],
        "q0",
        vec!["q1"],
    );
    let grammar = dfa_to_regular_grammar(&dfa);
    println!("grammar");
    for line in format_grammar(&grammar) {
        println!("{}", line);
    }
    println!("report");
    print!("{}", grammar);
}
