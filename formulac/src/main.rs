mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser, Subcommand};
use cli::{
    print_error, print_evaluated, print_parsed, print_parsing, print_reading
};
use formula_core::{
    parser::prelude::DEFAULT_MAX_DEPTH,
    Bindings, Engine, Node, Postfix
};

#[derive(Parser)]
#[command(name = "formulac", version, about = "Parses and evaluates decimal formulas")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Grammar levels the parser may descend before giving up
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parses and evaluates a formula
    Eval {
        /// Formula text, e.g. "MAX({a}, 2) * 3"
        formula: String,
        /// Identifier value as name=value; repeatable
        #[arg(short = 'd', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding)]
        defines: Vec<(String, String)>,
        /// Print the parsed tree before evaluating
        #[arg(long, default_value_t = false)]
        print_ast: bool,
        /// Print the tree in postfix form before evaluating
        #[arg(long, default_value_t = false)]
        postfix: bool,
    },
    /// Reads a formula from a file and evaluates it
    File {
        /// Path of formula file
        path: PathBuf,
        /// Identifier value as name=value; repeatable
        #[arg(short = 'd', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding)]
        defines: Vec<(String, String)>,
        /// Print the parsed tree before evaluating
        #[arg(long, default_value_t = false)]
        print_ast: bool,
        /// Print the tree in postfix form before evaluating
        #[arg(long, default_value_t = false)]
        postfix: bool,
    },
    /// Parses a formula without evaluating it
    Check {
        formula: String,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Runs Read Eval Print Loop
    Repl,
}

fn parse_binding(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg.split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;

    let name = name.trim().trim_start_matches('{').trim_end_matches('}');

    if name.is_empty() {
        return Err("identifier name must not be empty".to_string());
    }

    Ok((name.to_string(), value.trim().to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    cli::init_logger(cli.verbose);

    let engine = Engine::default().with_max_depth(cli.max_depth);

    match cli.command {
        Command::Eval { formula, defines, print_ast, postfix } => {
            print_parsing(&formula);
            let start = Instant::now();

            match engine.parse(&formula) {
                Ok(node) => {
                    print_parsed(start.elapsed());
                    run(&engine, &formula, &node, defines, print_ast, postfix)
                },
                Err(err) => failure(&err),
            }
        },
        Command::File { path, defines, print_ast, postfix } => {
            print_reading(&path.display().to_string());
            let start = Instant::now();

            match engine.parse_file(&path) {
                Ok(parsed) => {
                    print_parsed(start.elapsed());
                    run(&engine, &parsed.source, &parsed.root, defines, print_ast, postfix)
                },
                Err(err) => failure(&err),
            }
        },
        Command::Check { formula } => match engine.parse(&formula) {
            Ok(node) => {
                println!("{}", node);
                println!("postfix: {}", node.postfix());

                let identifiers = node.identifiers();

                if !identifiers.is_empty() {
                    println!("identifiers: {}", identifiers.join(", "));
                }

                ExitCode::SUCCESS
            },
            Err(err) => failure(&err),
        },
        Command::Rlpl => status(rlpl::start(&engine)),
        Command::Rppl => status(rppl::start(&engine)),
        Command::Repl => status(repl::start(&engine)),
    }
}

fn run(
    engine: &Engine,
    source: &str,
    node: &Node,
    defines: Vec<(String, String)>,
    print_ast: bool,
    postfix: bool,
) -> ExitCode {
    if print_ast {
        println!("{:#?}", node);
    }

    if postfix {
        println!("{}", node.postfix());
    }

    let bindings = defines.into_iter().collect::<Bindings>();
    let start = Instant::now();

    match engine.evaluate(node, &bindings) {
        Ok(value) => {
            println!("{value}");
            print_evaluated(start.elapsed());

            ExitCode::SUCCESS
        },
        Err(err) => failure(&err.with_source(source)),
    }
}

fn failure(err: &formula_core::Error) -> ExitCode {
    print_error(err);

    ExitCode::FAILURE
}

fn status(result: std::io::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");

            ExitCode::FAILURE
        }
    }
}
