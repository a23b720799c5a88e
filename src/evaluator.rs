use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::{Span, TinyError};
use crate::symbol_table::SymbolTable;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};

/// Tree-walking interpreter.
///
/// Program memory is a flat vector indexed by the slots the symbol table
/// assigned, zero-initialized and owned for the duration of one run. All
/// values are integers; comparisons evaluate to 0 or 1. Input and output are
/// injected handles so runs can be driven from tests; console runs default
/// to stdin and stdout with prompting enabled.
pub struct Evaluator<'a> {
    symbols: &'a SymbolTable,
    memory: Vec<i64>,
    input: Box<dyn BufRead + 'a>,
    output: Box<dyn Write + 'a>,
    pending_input: VecDeque<String>,
    prompts: bool,
}

impl<'a> Evaluator<'a> {
    /// Console evaluator: reads stdin, writes stdout, prompts before every
    /// `read`.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            memory: vec![0; symbols.len()],
            input: Box::new(io::stdin().lock()),
            output: Box::new(io::stdout()),
            pending_input: VecDeque::new(),
            prompts: true,
        }
    }

    /// Evaluator over caller-supplied input and output, without prompts.
    pub fn with_io(
        symbols: &'a SymbolTable,
        input: impl BufRead + 'a,
        output: impl Write + 'a,
    ) -> Self {
        Self {
            symbols,
            memory: vec![0; symbols.len()],
            input: Box::new(input),
            output: Box::new(output),
            pending_input: VecDeque::new(),
            prompts: false,
        }
    }

    /// Final variable values, indexed by slot.
    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    /// Seeds memory from a name to value map for names this run knows.
    pub fn preload(&mut self, values: &HashMap<String, i64>) {
        for (name, value) in values {
            if let Some(record) = self.symbols.lookup(name) {
                self.memory[record.slot] = *value;
            }
        }
    }

    pub fn evaluate_program(&mut self, program: &Program) -> Result<(), TinyError> {
        self.execute_statements(&program.statements)
    }

    fn execute_statements(&mut self, statements: &[Stmt]) -> Result<(), TinyError> {
        for statement in statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), TinyError> {
        match stmt {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_expression(condition)? != 0 {
                    self.execute_statements(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute_statements(else_branch)?;
                }
                Ok(())
            }
            Stmt::Repeat {
                body, condition, ..
            } => {
                // Do-while: the body always runs once, then repeats as long
                // as the condition stays zero.
                loop {
                    self.execute_statements(body)?;
                    if self.evaluate_expression(condition)? != 0 {
                        break;
                    }
                }
                Ok(())
            }
            Stmt::Assign { name, value, span } => {
                let result = self.evaluate_expression(value)?;
                let slot = self.slot(name, span)?;
                self.memory[slot] = result;
                Ok(())
            }
            Stmt::Read { name, span } => {
                if self.prompts {
                    write!(self.output, "Enter the value of {}: ", name)
                        .and_then(|_| self.output.flush())
                        .map_err(|error| {
                            TinyError::runtime_error(
                                span.clone(),
                                format!("Failed to write output: {}", error),
                            )
                        })?;
                }
                let value = self.read_int(name, span)?;
                let slot = self.slot(name, span)?;
                self.memory[slot] = value;
                Ok(())
            }
            Stmt::Write { value, span } => {
                let result = self.evaluate_expression(value)?;
                writeln!(self.output, "{}", result).map_err(|error| {
                    TinyError::runtime_error(
                        span.clone(),
                        format!("Failed to write output: {}", error),
                    )
                })?;
                Ok(())
            }
        }
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<i64, TinyError> {
        match expr {
            Expr::Num { value, .. } => Ok(*value),
            Expr::Variable { name, span } => {
                let slot = self.slot(name, span)?;
                Ok(self.memory[slot])
            }
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate_expression(left)?;
                let right_val = self.evaluate_expression(right)?;
                self.evaluate_binary_op(*operator, left_val, right_val, span)
            }
        }
    }

    fn evaluate_binary_op(
        &self,
        operator: BinaryOp,
        left: i64,
        right: i64,
        span: &Span,
    ) -> Result<i64, TinyError> {
        match operator {
            BinaryOp::Equal => Ok((left == right) as i64),
            BinaryOp::LessThan => Ok((left < right) as i64),
            BinaryOp::Add => Ok(left.wrapping_add(right)),
            BinaryOp::Subtract => Ok(left.wrapping_sub(right)),
            BinaryOp::Multiply => Ok(left.wrapping_mul(right)),
            BinaryOp::Divide => {
                if right == 0 {
                    Err(TinyError::runtime_error_with_help(
                        span.clone(),
                        "Division by zero".to_string(),
                        "The right operand of '/' evaluated to zero.".to_string(),
                    ))
                } else {
                    Ok(left.wrapping_div(right))
                }
            }
            // Real-valued power, truncated back to an integer. Exact for the
            // usual small operands; large magnitudes lose precision.
            BinaryOp::Power => Ok((left as f64).powf(right as f64) as i64),
        }
    }

    // Every identifier was inserted during analysis, so a miss here is a
    // fault in the pipeline, not in the program being run.
    fn slot(&self, name: &str, span: &Span) -> Result<usize, TinyError> {
        self.symbols
            .lookup(name)
            .map(|record| record.slot)
            .ok_or_else(|| {
                TinyError::runtime_error(
                    span.clone(),
                    format!("Internal error: variable '{}' has no memory slot", name),
                )
            })
    }

    // Reads one whitespace-separated integer token, fetching further lines
    // of input as needed. Several values on one line feed successive reads.
    fn read_int(&mut self, name: &str, span: &Span) -> Result<i64, TinyError> {
        loop {
            if let Some(word) = self.pending_input.pop_front() {
                return word.parse::<i64>().map_err(|_| {
                    TinyError::runtime_error_with_help(
                        span.clone(),
                        format!("Expected an integer for '{}', found '{}'", name, word),
                        "Input for 'read' must be a whole number, such as 42 or -7.".to_string(),
                    )
                });
            }
            let mut line = String::new();
            let bytes = self.input.read_line(&mut line).map_err(|error| {
                TinyError::runtime_error(
                    span.clone(),
                    format!("Failed to read input: {}", error),
                )
            })?;
            if bytes == 0 {
                return Err(TinyError::runtime_error_with_help(
                    span.clone(),
                    format!("End of input while reading a value for '{}'", name),
                    "The program expected more input than was supplied.".to_string(),
                ));
            }
            self.pending_input
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}
