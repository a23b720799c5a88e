use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::{Span, TinyError};
use crate::lexer::{Lexer, Token, TokenType};

/// Recursive-descent parser with a single token of lookahead, pulled from
/// the scanner on demand.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous_span: Option<Span>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, TinyError> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous_span: None,
        })
    }

    pub fn parse(&mut self) -> Result<Program, TinyError> {
        let statements = self.statement_sequence()?;
        if self.current.token_type != TokenType::Eof {
            return Err(TinyError::parse_error(
                self.current.span.clone(),
                format!("Expected end of program, found '{}'", self.current.lexeme),
            ));
        }
        Ok(Program { statements })
    }

    // A sequence runs until the lookahead closes the enclosing construct:
    // 'else', 'until', 'end', or end of input.
    fn statement_sequence(&mut self) -> Result<Vec<Stmt>, TinyError> {
        let mut statements = vec![self.statement()?];
        while !self.at_sequence_end() {
            self.consume_with_help(
                TokenType::SemiColon,
                "Expected ';' between statements",
                "Statements in a sequence are separated by ';'.".to_string(),
            )?;
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn at_sequence_end(&self) -> bool {
        matches!(
            self.current.token_type,
            TokenType::Else | TokenType::Until | TokenType::End | TokenType::Eof
        )
    }

    fn statement(&mut self) -> Result<Stmt, TinyError> {
        match self.current.token_type {
            TokenType::If => self.if_statement(),
            TokenType::Repeat => self.repeat_statement(),
            TokenType::Identifier => self.assign_statement(),
            TokenType::Read => self.read_statement(),
            TokenType::Write => self.write_statement(),
            TokenType::Eof => Err(TinyError::parse_error_with_help(
                self.error_span(),
                "Unexpected end of input, expected a statement".to_string(),
                "Statements begin with 'if', 'repeat', 'read', 'write', or a variable name."
                    .to_string(),
            )),
            _ => Err(TinyError::parse_error_with_help(
                self.current.span.clone(),
                format!("Expected statement, found '{}'", self.current.lexeme),
                "Statements begin with 'if', 'repeat', 'read', 'write', or a variable name."
                    .to_string(),
            )),
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, TinyError> {
        let if_token = self.advance()?;

        let condition = self.expression()?;
        self.consume_with_help(
            TokenType::Then,
            "Expected 'then' after if condition",
            "If statements have the form: if <condition> then <statements> end".to_string(),
        )?;

        let then_branch = self.statement_sequence()?;
        let else_branch = if self.check(TokenType::Else) {
            self.advance()?;
            Some(self.statement_sequence()?)
        } else {
            None
        };

        let end_token = self.consume_with_help(
            TokenType::End,
            "Expected 'end' to close if statement",
            "If statements have the form: if <condition> then <statements> end".to_string(),
        )?;

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            span: Span::new(if_token.span.start, end_token.span.end, if_token.span.line),
        })
    }

    fn repeat_statement(&mut self) -> Result<Stmt, TinyError> {
        let repeat_token = self.advance()?;

        let body = self.statement_sequence()?;
        self.consume_with_help(
            TokenType::Until,
            "Expected 'until' after repeat body",
            "Repeat loops have the form: repeat <statements> until <condition>".to_string(),
        )?;
        let condition = self.expression()?;

        let span = Span::new(
            repeat_token.span.start,
            condition.span().end,
            repeat_token.span.line,
        );
        Ok(Stmt::Repeat {
            body,
            condition,
            span,
        })
    }

    fn assign_statement(&mut self) -> Result<Stmt, TinyError> {
        let name_token = self.advance()?;

        self.consume_with_help(
            TokenType::Assign,
            "Expected ':=' after variable name",
            "Assignment uses ':='; plain '=' is the equality comparison. Example: x := 5"
                .to_string(),
        )?;
        let value = self.expression()?;

        let span = Span::new(
            name_token.span.start,
            value.span().end,
            name_token.span.line,
        );
        Ok(Stmt::Assign {
            name: name_token.lexeme,
            value,
            span,
        })
    }

    fn read_statement(&mut self) -> Result<Stmt, TinyError> {
        let read_token = self.advance()?;

        let name_token = self.consume_with_help(
            TokenType::Identifier,
            "Expected variable name after 'read'",
            "The read statement stores one input value into a variable: read x".to_string(),
        )?;

        let span = Span::new(
            read_token.span.start,
            name_token.span.end,
            read_token.span.line,
        );
        Ok(Stmt::Read {
            name: name_token.lexeme,
            span,
        })
    }

    fn write_statement(&mut self) -> Result<Stmt, TinyError> {
        let write_token = self.advance()?;

        let value = self.expression()?;

        let span = Span::new(
            write_token.span.start,
            value.span().end,
            write_token.span.line,
        );
        Ok(Stmt::Write { value, span })
    }

    // expr -> mathExpr [ ('<' | '=') mathExpr ]. One comparison at most,
    // never chained.
    fn expression(&mut self) -> Result<Expr, TinyError> {
        let expr = self.math_expr()?;

        if matches!(
            self.current.token_type,
            TokenType::LessThan | TokenType::Equal
        ) {
            let operator_token = self.advance()?;
            let operator = match operator_token.token_type {
                TokenType::LessThan => BinaryOp::LessThan,
                TokenType::Equal => BinaryOp::Equal,
                _ => unreachable!(),
            };
            let right = self.math_expr()?;
            let span = Span::new(
                expr.span().start,
                right.span().end,
                operator_token.span.line,
            );
            return Ok(Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            });
        }

        Ok(expr)
    }

    fn math_expr(&mut self) -> Result<Expr, TinyError> {
        let mut expr = self.term()?;

        while matches!(self.current.token_type, TokenType::Plus | TokenType::Minus) {
            let operator_token = self.advance()?;
            let operator = match operator_token.token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            let right = self.term()?;
            let span = Span::new(
                expr.span().start,
                right.span().end,
                operator_token.span.line,
            );
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, TinyError> {
        let mut expr = self.factor()?;

        while matches!(
            self.current.token_type,
            TokenType::Times | TokenType::Divide
        ) {
            let operator_token = self.advance()?;
            let operator = match operator_token.token_type {
                TokenType::Times => BinaryOp::Multiply,
                TokenType::Divide => BinaryOp::Divide,
                _ => unreachable!(),
            };
            let right = self.factor()?;
            let span = Span::new(
                expr.span().start,
                right.span().end,
                operator_token.span.line,
            );
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(expr)
    }

    // factor -> newExpr [ '^' factor ]. Recursing on the right side makes
    // '^' right-associative.
    fn factor(&mut self) -> Result<Expr, TinyError> {
        let expr = self.new_expr()?;

        if self.check(TokenType::Power) {
            let operator_token = self.advance()?;
            let right = self.factor()?;
            let span = Span::new(
                expr.span().start,
                right.span().end,
                operator_token.span.line,
            );
            return Ok(Expr::Binary {
                left: Box::new(expr),
                operator: BinaryOp::Power,
                right: Box::new(right),
                span,
            });
        }

        Ok(expr)
    }

    // newExpr -> '(' mathExpr ')' | NUM | ID. Parentheses wrap arithmetic
    // only, so comparisons cannot nest, and they add no node of their own.
    fn new_expr(&mut self) -> Result<Expr, TinyError> {
        match self.current.token_type {
            TokenType::LeftParen => {
                self.advance()?;
                let expr = self.math_expr()?;
                self.consume(TokenType::RightParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenType::Num => {
                let token = self.advance()?;
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    TinyError::parse_error_with_help(
                        token.span.clone(),
                        format!("Numeral '{}' is out of range", token.lexeme),
                        "Numerals must fit in a 64-bit signed integer.".to_string(),
                    )
                })?;
                Ok(Expr::Num {
                    value,
                    span: token.span,
                })
            }
            TokenType::Identifier => {
                let token = self.advance()?;
                Ok(Expr::Variable {
                    name: token.lexeme,
                    span: token.span,
                })
            }
            TokenType::Eof => Err(TinyError::parse_error(
                self.error_span(),
                "Unexpected end of input, expected an expression".to_string(),
            )),
            _ => Err(TinyError::parse_error_with_help(
                self.current.span.clone(),
                format!("Expected expression, found '{}'", self.current.lexeme),
                "Expected a numeral, a variable name, or a parenthesized expression.".to_string(),
            )),
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    /// Consumes the lookahead, refills it from the scanner, and returns the
    /// consumed token.
    fn advance(&mut self) -> Result<Token, TinyError> {
        let next = self.lexer.next_token()?;
        let consumed = std::mem::replace(&mut self.current, next);
        self.previous_span = Some(consumed.span.clone());
        Ok(consumed)
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, TinyError> {
        if self.check(token_type) {
            self.advance()
        } else {
            Err(TinyError::parse_error(
                self.error_span(),
                message.to_string(),
            ))
        }
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: String,
    ) -> Result<Token, TinyError> {
        if self.check(token_type) {
            self.advance()
        } else {
            Err(TinyError::parse_error_with_help(
                self.error_span(),
                message.to_string(),
                help,
            ))
        }
    }

    // At end of input, point just past the last consumed token; otherwise
    // point at the unexpected token itself.
    fn error_span(&self) -> Span {
        if self.current.token_type == TokenType::Eof {
            if let Some(span) = &self.previous_span {
                return Span::single(span.end, span.line);
            }
        }
        self.current.span.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, TinyError> {
        let mut parser = Parser::new(Lexer::new(source))?;
        parser.parse()
    }

    #[test]
    fn power_is_right_associative() {
        let program = parse("write 2 ^ 3 ^ 2").unwrap();
        let Stmt::Write { value, .. } = &program.statements[0] else {
            panic!("expected write statement");
        };
        let Expr::Binary {
            operator: BinaryOp::Power,
            left,
            right,
            ..
        } = value
        else {
            panic!("expected power expression");
        };
        assert!(matches!(**left, Expr::Num { value: 2, .. }));
        assert!(matches!(
            **right,
            Expr::Binary {
                operator: BinaryOp::Power,
                ..
            }
        ));
    }

    #[test]
    fn else_binds_to_the_nearest_if() {
        let program =
            parse("if x < 0 then if x < 1 then write 1 else write 2 end end").unwrap();
        let Stmt::If {
            then_branch,
            else_branch,
            ..
        } = &program.statements[0]
        else {
            panic!("expected if statement");
        };
        assert!(else_branch.is_none());
        let Stmt::If {
            else_branch: inner_else,
            ..
        } = &then_branch[0]
        else {
            panic!("expected nested if statement");
        };
        assert!(inner_else.is_some());
    }

    #[test]
    fn comparisons_do_not_chain() {
        let error = parse("write 1 < 2 < 3").unwrap_err();
        assert!(error.message.contains("Expected ';'"));
    }

    #[test]
    fn node_lines_follow_their_tokens() {
        let program = parse("x :=\n1 + 2").unwrap();
        let Stmt::Assign { value, span, .. } = &program.statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(span.line, 1);
        assert_eq!(value.span().line, 2);
    }
}
