use clap::{Arg, ArgAction, Command};
use color_eyre::eyre::{eyre, Result, WrapErr};
use dfamin::{
    describe, describe_mapping, load_dfa, save_dfa, to_dot, Dfa, Minimizer, ReductionSummary,
    TracingObserver,
};
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Command::new("dfamin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Minimize a deterministic finite automaton described in a JSON file")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("JSON file describing the DFA: states, alphabet, transitions as [from, symbol, to], start and accepting")
                .value_name("DFA FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Save the minimal DFA as JSON")
                .value_name("OUTPUT FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dot")
                .short('d')
                .long("dot")
                .help("Save the minimal DFA in Graphviz dot format")
                .value_name("DOT FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("word")
                .short('w')
                .long("word")
                .help("A word to run through both the original and the minimal DFA, every character is one symbol")
                .value_name("WORD")
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log a summary of every minimization phase")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace")
                .short('t')
                .long("trace")
                .help("Log every refinement round of the partition")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if args.get_flag("trace") {
        Level::TRACE
    } else if args.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let input = args
        .get_one::<PathBuf>("input")
        .ok_or_else(|| eyre!("Error: Input DFA file not provided!"))?;

    let dfa: Dfa<String, String> = load_dfa(input)?;
    info!(states = dfa.num_states(), "loaded DFA from {}", input.display());

    let (minimal_dfa, mapping) =
        Minimizer::new().minimize_with_mapping(&dfa, &mut TracingObserver);

    println!("Original DFA:");
    println!("{}", describe(&dfa));
    println!("Minimal DFA:");
    println!("{}", describe(&minimal_dfa));
    println!("State mapping:");
    println!("{}", describe_mapping(&mapping));
    println!("{}", ReductionSummary::between(&dfa, &minimal_dfa));

    if let Some(words) = args.get_many::<String>("word") {
        for word in words {
            let symbols: Vec<String> = word.chars().map(String::from).collect();
            let original = dfa.recognize(&symbols);
            let minimal = minimal_dfa.recognize(&symbols);

            println!(
                "{:?}: original {}, minimal {}",
                word,
                verdict(original),
                verdict(minimal)
            );
        }
    }

    if let Some(output) = args.get_one::<PathBuf>("output") {
        save_dfa(&minimal_dfa, output)?;
        info!("minimal DFA saved as {}", output.display());
    }

    if let Some(dot_file) = args.get_one::<PathBuf>("dot") {
        fs::write(dot_file, to_dot(&minimal_dfa))
            .wrap_err_with(|| format!("Failed to write {}", dot_file.display()))?;
        info!("minimal DFA visualization saved as {}", dot_file.display());
    }

    Ok(())
}

fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "accepted"
    } else {
        "rejected"
    }
}
