use crate::analyzer;
use crate::ast;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Switches for the debug dumps and the strict type policy.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub dump_ast: bool,
    pub dump_symbols: bool,
    pub strict: bool,
}

pub fn run(source: &str, filename: Option<&str>) {
    run_with_options(source, filename, &RunOptions::default());
}

pub fn run_with_options(source: &str, filename: Option<&str>, options: &RunOptions) {
    // Scanning and parsing; the parser pulls tokens on demand.
    let mut parser = match Parser::new(Lexer::new(source)) {
        Ok(parser) => parser,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    if options.dump_ast {
        print!("{}", ast::dump(&program));
    }

    // Symbol table and type checks; diagnostics are reported but only stop
    // the run in strict mode.
    let analysis = analyzer::analyze(&program);
    for diagnostic in &analysis.diagnostics {
        diagnostic.report(source, filename);
    }

    if options.dump_symbols {
        print!("{}", analysis.symbols.dump());
    }

    if options.strict && !analysis.diagnostics.is_empty() {
        eprintln!(
            "{} type error(s) reported, skipping execution",
            analysis.diagnostics.len()
        );
        return;
    }

    // Evaluation
    let mut evaluator = Evaluator::new(&analysis.symbols);
    if let Err(error) = evaluator.evaluate_program(&program) {
        error.report(source, filename);
    }
}
