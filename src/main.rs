use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use knox::{
    ast::printer::print_program, format_error, lexer::lexer::tokenize, parser::parser::parse,
    type_checker::type_checker::analyze,
};

/// Front end for the Knox language: lexes, parses and type checks one file.
#[derive(Parser, Debug)]
#[command(name = "knox", version)]
struct Cli {
    /// The path of the file to check
    path: PathBuf,

    /// Print the checked AST
    #[arg(long)]
    ast: bool,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print how long each phase took
    #[arg(long)]
    time: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = read_to_string(&cli.path).with_context(|| format!("failed to read {}", cli.path.display()))?;
    let file_name = cli
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.path.to_string_lossy().into_owned());

    let start = Instant::now();

    let tokens = match tokenize(&source, Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprint!("{}", format_error(&error, &source));
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.time {
        println!("Tokenized in {:?}", start.elapsed());
    }
    if cli.tokens {
        for token in tokens.iter() {
            println!("{}", token);
        }
    }

    let parse_start = Instant::now();
    let mut program = match parse(tokens, Rc::new(file_name)) {
        Ok(program) => program,
        Err(error) => {
            eprint!("{}", format_error(&error, &source));
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.time {
        println!("Parsed in {:?}", parse_start.elapsed());
    }

    let check_start = Instant::now();
    if let Err(error) = analyze(&mut program) {
        eprint!("{}", format_error(&error, &source));
        return Ok(ExitCode::FAILURE);
    }

    if cli.time {
        println!("Type checked in {:?}", check_start.elapsed());
        println!("Total time: {:?}", start.elapsed());
    }
    if cli.ast {
        print!("{}", print_program(&program));
    }

    Ok(ExitCode::SUCCESS)
}
