use crate::error::Span;
use std::fmt;

/// Abstract syntax for TINY programs. Statement blocks are plain vectors,
/// and every node carries the span of the source it was built from, so its
/// line is always at hand.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        span: Span,
    },
    Repeat {
        body: Vec<Stmt>,
        condition: Expr,
        span: Span,
    },
    Assign {
        name: String,
        value: Expr,
        span: Span,
    },
    Read {
        name: String,
        span: Span,
    },
    Write {
        value: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Num {
        value: i64,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Binary { span, .. } => span,
            Expr::Num { span, .. } => span,
            Expr::Variable { span, .. } => span,
        }
    }

    /// The type an expression produces, fixed by its node kind: comparisons
    /// yield booleans, everything else yields integers.
    pub fn expr_type(&self) -> ExprType {
        match self {
            Expr::Binary { operator, .. } if operator.is_comparison() => ExprType::Boolean,
            _ => ExprType::Integer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    LessThan,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::LessThan)
    }

    /// The operator as written in source, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Equal => "=",
            BinaryOp::LessThan => "<",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Integer,
    Boolean,
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprType::Integer => write!(f, "Integer"),
            ExprType::Boolean => write!(f, "Boolean"),
        }
    }
}

/// Renders a depth-indented dump of the syntax tree for debugging.
pub fn dump(program: &Program) -> String {
    let mut out = String::new();
    dump_statements(&program.statements, 0, &mut out);
    out
}

fn dump_statements(statements: &[Stmt], depth: usize, out: &mut String) {
    for statement in statements {
        dump_statement(statement, depth, out);
    }
}

fn dump_statement(statement: &Stmt, depth: usize, out: &mut String) {
    let pad = "   ".repeat(depth);
    match statement {
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            out.push_str(&format!("{}[If]\n", pad));
            dump_expression(condition, depth + 1, out);
            dump_statements(then_branch, depth + 1, out);
            if let Some(else_branch) = else_branch {
                dump_statements(else_branch, depth + 1, out);
            }
        }
        Stmt::Repeat {
            body, condition, ..
        } => {
            out.push_str(&format!("{}[Repeat]\n", pad));
            dump_statements(body, depth + 1, out);
            dump_expression(condition, depth + 1, out);
        }
        Stmt::Assign { name, value, .. } => {
            out.push_str(&format!("{}[Assign][{}]\n", pad, name));
            dump_expression(value, depth + 1, out);
        }
        Stmt::Read { name, .. } => {
            out.push_str(&format!("{}[Read][{}]\n", pad, name));
        }
        Stmt::Write { value, .. } => {
            out.push_str(&format!("{}[Write]\n", pad));
            dump_expression(value, depth + 1, out);
        }
    }
}

fn dump_expression(expression: &Expr, depth: usize, out: &mut String) {
    let pad = "   ".repeat(depth);
    match expression {
        Expr::Binary {
            left,
            operator,
            right,
            ..
        } => {
            out.push_str(&format!(
                "{}[Oper][{:?}][{}]\n",
                pad,
                operator,
                expression.expr_type()
            ));
            dump_expression(left, depth + 1, out);
            dump_expression(right, depth + 1, out);
        }
        Expr::Num { value, .. } => {
            out.push_str(&format!("{}[Num][{}][Integer]\n", pad, value));
        }
        Expr::Variable { name, .. } => {
            out.push_str(&format!("{}[ID][{}][Integer]\n", pad, name));
        }
    }
}
