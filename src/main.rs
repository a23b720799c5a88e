use clap::{Arg, Command};
use std::fs;
use std::path::Path;
use tinyc::runner::{self, RunOptions};
use tinyc::repl;

fn main() {
    let matches = Command::new("tinyc")
        .about("A tree-walking interpreter for the TINY language")
        .arg(
            Arg::new("file")
                .help("The TINY program to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-ast")
                .long("dump-ast")
                .help("Print the syntax tree before running")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-symbols")
                .long("dump-symbols")
                .help("Print the symbol table before running")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Treat type violations as errors and skip execution")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let options = RunOptions {
        dump_ast: matches.get_flag("dump-ast"),
        dump_symbols: matches.get_flag("dump-symbols"),
        strict: matches.get_flag("strict"),
    };

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path, &options);
    } else if matches.get_flag("interactive") || matches.get_one::<String>("file").is_none() {
        repl::start();
    }
}

fn run_file(path: &str, options: &RunOptions) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            runner::run_with_options(&source, path.to_str(), options);
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
