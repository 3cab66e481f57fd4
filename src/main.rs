use std::{fs, rc::Rc};

use clap::Parser;
use env_logger::Env;
use log::debug;
use matrica::{ConsoleHost, RunError, Session};

/// matrica is an embeddable expression language for numeric mathematics
/// and matrix algebra.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the input as a file path instead of inline source.
    #[arg(short, long)]
    file: bool,

    /// Print the last value the script produced.
    #[arg(short, long)]
    pipe_mode: bool,

    contents: String,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut session = Session::new();
    session.context.set_host(Rc::new(ConsoleHost));
    debug!("running {} character(s) of source", source.len());

    match session.run(&source) {
        Ok(result) => {
            if args.pipe_mode
               && let Some(value) = result
            {
                println!("{value}");
            }
        },
        Err(RunError::Parse(errors)) => {
            for error in errors {
                eprintln!("{error}");
            }
            std::process::exit(1);
        },
        Err(RunError::Runtime(error)) => {
            eprintln!("{error}");
            std::process::exit(1);
        },
    }
}
