use crate::ast::{Expr, ExprType, Program, Stmt};
use crate::error::TinyError;
use crate::symbol_table::SymbolTable;

/// Result of the semantic pass: the completed symbol table and every type
/// diagnostic found along the way. Diagnostics are non-fatal; the table is
/// always complete.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<TinyError>,
}

/// Walks the tree once, depth-first, building the symbol table and checking
/// types together. A node's own identifier is inserted before its children
/// are visited, children before siblings, and each node is checked after
/// its children.
pub fn analyze(program: &Program) -> Analysis {
    let mut analyzer = Analyzer {
        symbols: SymbolTable::new(),
        diagnostics: Vec::new(),
    };
    analyzer.visit_statements(&program.statements);
    Analysis {
        symbols: analyzer.symbols,
        diagnostics: analyzer.diagnostics,
    }
}

struct Analyzer {
    symbols: SymbolTable,
    diagnostics: Vec<TinyError>,
}

impl Analyzer {
    fn visit_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_expression(condition);
                self.visit_statements(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_statements(else_branch);
                }
                if condition.expr_type() != ExprType::Boolean {
                    self.diagnostics.push(TinyError::type_error_with_help(
                        condition.span().clone(),
                        "If condition must be a boolean expression".to_string(),
                        "Use a comparison such as 'x < 10' or 'x = 0'.".to_string(),
                    ));
                }
            }
            Stmt::Repeat {
                body, condition, ..
            } => {
                self.visit_statements(body);
                self.visit_expression(condition);
                if condition.expr_type() != ExprType::Boolean {
                    self.diagnostics.push(TinyError::type_error_with_help(
                        condition.span().clone(),
                        "Repeat condition must be a boolean expression".to_string(),
                        "Use a comparison such as 'x < 10' or 'x = 0'.".to_string(),
                    ));
                }
            }
            Stmt::Assign { name, value, span } => {
                self.symbols.insert(name, span.line);
                self.visit_expression(value);
                if value.expr_type() != ExprType::Integer {
                    self.diagnostics.push(TinyError::type_error(
                        value.span().clone(),
                        "Assigned value must be an integer expression".to_string(),
                    ));
                }
            }
            Stmt::Read { name, span } => {
                self.symbols.insert(name, span.line);
            }
            Stmt::Write { value, .. } => {
                self.visit_expression(value);
                if value.expr_type() != ExprType::Integer {
                    self.diagnostics.push(TinyError::type_error(
                        value.span().clone(),
                        "Write statement requires an integer expression".to_string(),
                    ));
                }
            }
        }
    }

    fn visit_expression(&mut self, expression: &Expr) {
        match expression {
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                self.visit_expression(left);
                self.visit_expression(right);
                if left.expr_type() != ExprType::Integer
                    || right.expr_type() != ExprType::Integer
                {
                    self.diagnostics.push(TinyError::type_error(
                        span.clone(),
                        format!(
                            "Operands of '{}' must be integer expressions",
                            operator.symbol()
                        ),
                    ));
                }
            }
            Expr::Variable { name, span } => {
                self.symbols.insert(name, span.line);
            }
            Expr::Num { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn analyze_source(source: &str) -> Analysis {
        let mut parser = Parser::new(Lexer::new(source)).expect("scan failed");
        let program = parser.parse().expect("parse failed");
        analyze(&program)
    }

    #[test]
    fn assigns_slots_in_traversal_order() {
        let analysis = analyze_source("read b;\na := b + c");
        let symbols = &analysis.symbols;
        assert_eq!(symbols.lookup("b").unwrap().slot, 0);
        assert_eq!(symbols.lookup("a").unwrap().slot, 1);
        assert_eq!(symbols.lookup("c").unwrap().slot, 2);
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn line_references_follow_every_mention() {
        let analysis = analyze_source("read x;\nwrite x;\nx := x + 1");
        let record = analysis.symbols.lookup("x").unwrap();
        assert_eq!(record.lines, vec![1, 2, 3, 3]);
    }

    #[test]
    fn boolean_condition_is_clean() {
        let analysis = analyze_source("if 1 < 2 then write 1 end");
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn integer_if_condition_is_reported() {
        let analysis = analyze_source("if 1 then write 1 end");
        assert_eq!(analysis.diagnostics.len(), 1);
        let diagnostic = &analysis.diagnostics[0];
        assert!(matches!(diagnostic.kind, ErrorKind::TypeError));
        assert!(diagnostic.message.contains("If condition"));
    }

    #[test]
    fn integer_repeat_condition_is_reported() {
        let analysis = analyze_source("repeat x := x + 1 until x");
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.diagnostics[0].message.contains("Repeat condition"));
    }

    #[test]
    fn boolean_assignment_is_reported() {
        let analysis = analyze_source("x := 1 < 2");
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.diagnostics[0].message.contains("Assigned value"));
    }

    #[test]
    fn boolean_write_operand_is_reported() {
        let analysis = analyze_source("write 1 = 1");
        assert_eq!(analysis.diagnostics.len(), 1);
        assert!(analysis.diagnostics[0]
            .message
            .contains("Write statement requires"));
    }

    #[test]
    fn diagnostics_do_not_stop_the_walk() {
        // Both violations are collected, and the table still covers every
        // identifier.
        let analysis = analyze_source("x := 1 < 2;\nif 3 then read y end");
        assert_eq!(analysis.diagnostics.len(), 2);
        assert_eq!(analysis.symbols.len(), 2);
        assert_eq!(analysis.symbols.lookup("y").unwrap().slot, 1);
    }
}
