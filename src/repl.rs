use crate::analyzer;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::collections::HashMap;
use std::io::{self, Write};

/// Interactive loop. Each line is parsed, analyzed, and run as a complete
/// program; variable values persist between lines by name, carried across
/// the per-run memories of successive evaluators.
pub fn start() {
    println!("TINY Interpreter v0.1.0");
    println!("Type 'exit' or press Ctrl+C to quit");
    println!();

    let mut saved_values: HashMap<String, i64> = HashMap::new();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_repl_line(line, &mut saved_values);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_line(source: &str, saved_values: &mut HashMap<String, i64>) {
    let mut parser = match Parser::new(Lexer::new(source)) {
        Ok(parser) => parser,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    let analysis = analyzer::analyze(&program);
    for diagnostic in &analysis.diagnostics {
        diagnostic.report(source, None);
    }

    let mut evaluator = Evaluator::new(&analysis.symbols);
    evaluator.preload(saved_values);
    if let Err(error) = evaluator.evaluate_program(&program) {
        error.report(source, None);
    }

    // Harvest whatever the line computed, even after a runtime error, so
    // the next line starts from the latest values.
    for record in analysis.symbols.records() {
        saved_values.insert(record.name.clone(), evaluator.memory()[record.slot]);
    }
}
