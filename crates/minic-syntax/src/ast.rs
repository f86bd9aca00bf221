//! AST (abstract syntax tree) types for the MiniC language.

use std::fmt;

/// Static types of the MiniC lattice.
///
/// `None` is the internal "no value" type: the result of `print`, of a call
/// to an unknown function, or of failed inference. It has no surface syntax
/// and is never compatible with anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Bool,
    None,
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ty::Int => "int",
            Ty::Float => "float",
            Ty::Bool => "bool",
            Ty::None => "none",
        })
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,  // ||
    And, // &&
    Eq,  // ==
    Ne,  // !=
    Lt,  // <
    Gt,  // >
    Le,  // <=
    Ge,  // >=
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -
    Not, // !
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Expressions.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal carried as its raw lexeme (`true`, `42`, `1.5`). Numeric
    /// lexemes are parsed at evaluation time, not here.
    Literal(String),
    Ident(String),
    /// Assignment in expression position; only the for-loop header produces
    /// this form.
    Assign { name: String, value: Box<Expr> },
    Call { name: String, args: Vec<Expr> },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary { op: UnOp, operand: Box<Expr> },
}

/// Statements.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        name: String,
        ty: Ty,
        init: Option<Expr>,
    },
    FunctionDecl(Function),
    Assign { name: String, value: Expr },
    If {
        cond: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    While { cond: Expr, body: Vec<Stmt> },
    /// `init` is a `var` declaration or an expression statement; absent
    /// header slots stay absent rather than holding sentinels.
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    Print(Expr),
    Expr(Expr),
}

/// Function parameter with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

/// Function definition.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Ty,
    pub body: Vec<Stmt>,
}

/// Entire program: the ordered top-level statements.
#[derive(Debug, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
