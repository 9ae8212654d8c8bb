use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use bit_vec::BitVec;
use log::{info, warn};

use crate::automaton::{State, Symbol};
use crate::dfa::DFA;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotOptions {
    /// Lay the graph out left to right instead of top to bottom.
    pub horizontal: bool,
    /// One edge per (source, destination) pair, labelled with all its symbols.
    pub merge_parallel_edges: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            horizontal: true,
            merge_parallel_edges: false,
        }
    }
}

/// Graphviz node numbering: declared states first, then any identifier the
/// start state or a transition mentions without declaring it.
struct Numbering<'a> {
    nodes: Vec<&'a State>,
    numbers: HashMap<&'a State, usize>,
    finals: BitVec,
}

impl<'a> Numbering<'a> {
    fn new(dfa: &'a DFA) -> Self {
        let mut numbering = Numbering {
            nodes: Vec::new(),
            numbers: HashMap::new(),
            finals: BitVec::new(),
        };
        for state in dfa.states() {
            numbering.number(dfa, state);
        }
        let declared = numbering.nodes.len();
        if !dfa.start_state().is_empty() {
            numbering.number(dfa, dfa.start_state());
        }
        for (from, _, to) in dfa.edges() {
            numbering.number(dfa, from);
            numbering.number(dfa, to);
        }
        for state in &numbering.nodes[declared..] {
            warn!("state {} is used but never declared", state);
        }
        numbering
    }

    fn number(&mut self, dfa: &DFA, state: &'a State) -> usize {
        if let Some(&n) = self.numbers.get(state) {
            return n;
        }
        let n = self.nodes.len();
        self.nodes.push(state);
        self.numbers.insert(state, n);
        self.finals.push(dfa.is_accepting(state.as_str()));
        n
    }

    fn get(&self, state: &State) -> usize {
        self.numbers[state]
    }
}

struct Quoted<'a>(&'a str);

impl<'a> fmt::Display for Quoted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")
    }
}

struct Dot<'a> {
    dfa: &'a DFA,
    options: DotOptions,
}

impl<'a> fmt::Display for Dot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dfa = self.dfa;
        let numbering = Numbering::new(dfa);

        writeln!(f, "digraph dfa {{")?;
        if self.options.horizontal {
            writeln!(f, "    rankdir=LR;")?;
        }
        for (n, state) in numbering.nodes.iter().enumerate() {
            let shape = if numbering.finals[n] { "doublecircle" } else { "circle" };
            writeln!(f, "    n{} [label={}, shape={}];", n, Quoted(state.as_str()), shape)?;
        }

        if !dfa.start_state().is_empty() {
            writeln!(f, "    start [label=\"\", shape=point];")?;
            writeln!(f, "    start -> n{};", numbering.get(dfa.start_state()))?;
        }

        if self.options.merge_parallel_edges {
            let mut merged: BTreeMap<(usize, usize), Vec<&Symbol>> = BTreeMap::new();
            for (from, symbol, to) in dfa.edges() {
                merged
                    .entry((numbering.get(from), numbering.get(to)))
                    .or_insert_with(Vec::new)
                    .push(symbol);
            }
            for ((from, to), symbols) in merged {
                let label: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
                writeln!(f, "    n{} -> n{} [label={}];", from, to, Quoted(&label.join(", ")))?;
            }
        } else {
            for (from, symbol, to) in dfa.edges() {
                writeln!(
                    f,
                    "    n{} -> n{} [label={}];",
                    numbering.get(from),
                    numbering.get(to),
                    Quoted(symbol.as_str())
                )?;
            }
        }

        writeln!(f, "}}")
    }
}

impl DFA {
    /// The transition graph in Graphviz DOT syntax.
    pub fn dot(&self, options: DotOptions) -> String {
        Dot { dfa: self, options }.to_string()
    }
}

/// Writes the diagram to `{output}.{format}`. `dot` output is written directly,
/// other formats go through the Graphviz `dot` program.
pub fn render<P: AsRef<Path>>(dfa: &DFA, output: P, format: &str, options: DotOptions) -> Result<PathBuf> {
    render_with(Command::new("dot"), dfa, output.as_ref(), format, options)
}

fn render_with(
    mut renderer: Command,
    dfa: &DFA,
    output: &Path,
    format: &str,
    options: DotOptions,
) -> Result<PathBuf> {
    let mut name = output.as_os_str().to_owned();
    name.push(".");
    name.push(format);
    let path = PathBuf::from(name);
    let text = dfa.dot(options);
    let io_error = |source| Error::Io {
        path: path.clone(),
        source,
    };

    if format == "dot" {
        fs::write(&path, text).map_err(io_error)?;
    } else {
        let mut child = renderer
            .arg(format!("-T{}", format))
            .arg("-o")
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Error::RendererMissing)?;
        // The renderer may quit before reading its input; its exit status
        // and stderr say why, so they take precedence over a broken pipe.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let result = child.wait_with_output().map_err(io_error)?;
        if !result.status.success() {
            return Err(Error::RendererFailed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }
        written.map_err(io_error)?;
    }

    info!("DFA diagram generated: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::make_dfa;
    use std::env;
    use std::process;

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
    fn plain_diagram() {
        assert_eq!(
            a_then_bs().dot(DotOptions::default()),
            "digraph dfa {
    rankdir=LR;
    n0 [label=\"q0\", shape=circle];
    n1 [label=\"q1\", shape=doublecircle];
    start [label=\"\", shape=point];
    start -> n0;
    n0 -> n1 [label=\"a\"];
    n1 -> n1 [label=\"b\"];
}
"
        );
    }

    #[test]
    fn vertical_layout_has_no_rankdir() {
        let options = DotOptions {
            horizontal: false,
            ..DotOptions::default()
        };
        assert!(!a_then_bs().dot(options).contains("rankdir"));
    }

    #[test]
    fn parallel_edges() {
        let dfa = make_dfa(
            vec!["p", "q"],
            vec!["0", "1", "2"],
            vec![("p", "0", "q"), ("p", "1", "q"), ("p", "2", "p")],
            "p",
            vec!["q"],
        );
        let separate = dfa.dot(DotOptions::default());
        assert_eq!(separate.matches("n0 -> n1").count(), 2);

        let merged = dfa.dot(DotOptions {
            merge_parallel_edges: true,
            ..DotOptions::default()
        });
        assert!(merged.contains("n0 -> n1 [label=\"0, 1\"];"));
        assert!(merged.contains("n0 -> n0 [label=\"2\"];"));
    }

    #[test]
    fn undeclared_states_still_get_nodes() {
        let dfa = make_dfa(vec!["q0"], vec!["a"], vec![("q0", "a", "lost")], "q0", vec!["lost"]);
        let text = dfa.dot(DotOptions::default());
        assert!(text.contains("n1 [label=\"lost\", shape=doublecircle];"));
        assert!(text.contains("n0 -> n1 [label=\"a\"];"));
    }

    #[test]
    fn empty_start_has_no_entry_arrow() {
        let dfa = make_dfa(vec!["q0"], vec!["a"], Vec::new(), "", Vec::<&str>::new());
        assert!(!dfa.dot(DotOptions::default()).contains("start"));
    }

    #[test]
    fn labels_are_escaped() {
        let dfa = make_dfa(vec!["say \"hi\""], vec!["\\"], vec![("say \"hi\"", "\\", "say \"hi\"")], "say \"hi\"", Vec::<&str>::new());
        let text = dfa.dot(DotOptions::default());
        assert!(text.contains(r#"n0 [label="say \"hi\"", shape=circle];"#));
        assert!(text.contains(r#"n0 -> n0 [label="\\"];"#));
    }

    #[test]
    fn render_dot_source_without_graphviz() {
        let stem = env::temp_dir().join(format!("dfagram-render-{}", process::id()));
        let path = render(&a_then_bs(), &stem, "dot", DotOptions::default()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("dot"));
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written, a_then_bs().dot(DotOptions::default()));
    }

    fn ring(n: usize) -> DFA {
        let states: Vec<String> = (0..n).map(|i| format!("q{}", i)).collect();
        let symbols = vec!["a".to_owned(), "b".to_owned()];
        let mut transitions = Vec::new();
        for i in 0..n {
            for (j, symbol) in symbols.iter().enumerate() {
                transitions.push((states[i].clone(), symbol.clone(), states[(i + j + 1) % n].clone()));
            }
        }
        make_dfa(states.clone(), symbols, transitions, states[0].clone(), Vec::<String>::new())
    }

    #[test]
    fn failing_renderer_reports_status_and_stderr() {
        // Exits without reading its input, as `dot` does for an unknown format.
        let mut renderer = Command::new("sh");
        renderer
            .arg("-c")
            .arg("echo 'Format: \"bogus\" not recognized' >&2; exit 1");
        let stem = env::temp_dir().join(format!("dfagram-failing-{}", process::id()));
        match render_with(renderer, &ring(2000), &stem, "bogus", DotOptions::default()) {
            Err(Error::RendererFailed { status, stderr }) => {
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr, "Format: \"bogus\" not recognized");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn absent_renderer() {
        let renderer = Command::new("dfagram-no-such-renderer");
        let stem = env::temp_dir().join(format!("dfagram-absent-{}", process::id()));
        match render_with(renderer, &a_then_bs(), &stem, "png", DotOptions::default()) {
            Err(Error::RendererMissing(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
