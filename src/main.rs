//! Command-line front end, e.g. `dfagram convert --json demos/a_then_bs.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, warn};

use dfagram::{dfa_to_regular_grammar, dot, format_grammar, json, DfaForm, DotOptions, DFA};

#[derive(Parser, Debug)]
#[command(name = "dfagram", version, about = "Turns a DFA into a right-regular grammar")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grammar generating the automaton's language
    Convert {
        #[command(flatten)]
        source: Source,
        /// Also list the non-terminals, terminals and start symbol
        #[arg(long)]
        long: bool,
    },
    /// Draw the transition graph with Graphviz
    Plot {
        #[command(flatten)]
        source: Source,
        /// Output file name, without extension
        #[arg(long, short, default_value = "dfa_diagram")]
        output: PathBuf,
        /// Graphviz output format; `dot` writes the source without running Graphviz
        #[arg(long, short, default_value = "png")]
        format: String,
        #[arg(long)]
        vertical: bool,
        /// One edge per pair of states, labelled with every symbol
        #[arg(long)]
        merge_edges: bool,
    },
    /// Save the automaton as a JSON record
    Export {
        #[command(flatten)]
        source: Source,
        #[arg(long, value_name = "FILE")]
        to: PathBuf,
    },
    /// Print the text fields describing a saved automaton
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Where the automaton comes from: a JSON file, or the five text fields.
#[derive(Args, Debug)]
struct Source {
    #[arg(long, value_name = "FILE", conflicts_with_all = ["states", "alphabet", "start", "accept", "transitions"])]
    json: Option<PathBuf>,
    /// Comma separated states
    #[arg(long)]
    states: Option<String>,
    /// Comma separated symbols
    #[arg(long)]
    alphabet: Option<String>,
    #[arg(long)]
    start: Option<String>,
    /// Comma separated accepting states
    #[arg(long)]
    accept: Option<String>,
    /// `state,symbol->state`, one per line; may be repeated
    #[arg(long, short = 't')]
    transitions: Vec<String>,
    /// Refuse automata that mention undeclared states or symbols
    #[arg(long)]
    strict: bool,
}

impl Source {
    fn load(&self) -> Result<DFA> {
        let dfa = match self.json {
            Some(ref path) => json::import_from_json(path)
                .with_context(|| format!("failed to import DFA from {}", path.display()))?,
            None => self.form().parse().context("invalid DFA input")?,
        };
        if self.strict {
            dfa.validate().context("DFA failed validation")?;
        }
        let unreachable = dfa.unreachable_states();
        if !unreachable.is_empty() {
            let names: Vec<&str> = unreachable.iter().map(|s| s.as_str()).collect();
            warn!("unreachable from the start state: {}", names.join(", "));
        }
        debug!("loaded {:?}", dfa);
        Ok(dfa)
    }

    fn form(&self) -> DfaForm {
        DfaForm {
            states: self.states.clone().unwrap_or_default(),
            alphabet: self.alphabet.clone().unwrap_or_default(),
            start_state: self.start.clone().unwrap_or_default(),
            accept_states: self.accept.clone().unwrap_or_default(),
            transitions: self.transitions.join("\n"),
        }
    }
}

fn convert(dfa: &DFA, long: bool) {
    let grammar = dfa_to_regular_grammar(dfa);
    if long {
        print!("{}", grammar);
    } else {
        for line in format_grammar(&grammar) {
            println!("{}", line);
        }
    }
}

fn plot_options(vertical: bool, merge_edges: bool) -> DotOptions {
    DotOptions {
        horizontal: !vertical,
        merge_parallel_edges: merge_edges,
    }
}

fn import(file: &Path) -> Result<()> {
    let dfa = json::import_from_json(file)
        .with_context(|| format!("failed to import DFA from {}", file.display()))?;
    let form = DfaForm::from_dfa(&dfa);
    println!("States: {}", form.states);
    println!("Alphabet: {}", form.alphabet);
    println!("Start State: {}", form.start_state);
    println!("Accept States: {}", form.accept_states);
    println!("Transitions:");
    if !form.transitions.is_empty() {
        println!("{}", form.transitions);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Convert { source, long } => convert(&source.load()?, long),
        Command::Plot {
            source,
            output,
            format,
            vertical,
            merge_edges,
        } => {
            let options = plot_options(vertical, merge_edges);
            dot::render(&source.load()?, &output, &format, options)
                .context("failed to generate DFA diagram")?;
        }
        Command::Export { source, to } => {
            json::export_to_json(&source.load()?, &to).context("failed to export DFA")?;
        }
        Command::Import { file } => import(&file)?,
    }
    Ok(())
}
