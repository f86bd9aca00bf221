//! MiniC pipeline driver and report model.
//!
//! This crate glues the pipeline together (lex → parse → collect → analyze →
//! evaluate) and owns the JSON-facing data model: plain `Serialize` structs
//! mirroring the report document, built from the domain types once the
//! pipeline has run. Struct field order here is document key order.

use indexmap::IndexMap;
use serde::Serialize;

use minic_interpreter::Interpreter;
use minic_lexer::Lexer;
use minic_parser::Parser;
use minic_sema::Analyzer;
use minic_syntax::ast::{Expr, Function, Param, Program, Stmt, Ty};
use minic_syntax::diag::Diagnostics;
use minic_syntax::symbols::FnSig;
use minic_syntax::token::Token;

/// One token row in the report.
#[derive(Debug, Serialize)]
pub struct TokenEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub line: usize,
    pub pos: usize,
}

/// Generic AST node shape: `value` and `children` are omitted when empty.
#[derive(Debug, Serialize)]
pub struct AstNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
}

impl AstNode {
    fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children: Vec::new(),
        }
    }

    fn named(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }
}

/// One function row in the report.
#[derive(Debug, Serialize)]
pub struct FnEntry {
    pub return_type: String,
    pub params: Vec<ParamEntry>,
}

#[derive(Debug, Serialize)]
pub struct ParamEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// The complete report document.
#[derive(Debug, Serialize)]
pub struct Report {
    pub tokens: Vec<TokenEntry>,
    pub ast: AstNode,
    pub symbol_table: IndexMap<String, String>,
    pub function_table: IndexMap<String, FnEntry>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub output: String,
}

fn token_entry(t: &Token) -> TokenEntry {
    TokenEntry {
        kind: t.kind.name().to_string(),
        text: t.text.clone(),
        line: t.line,
        pos: t.pos,
    }
}

fn ty_node(ty: Ty) -> AstNode {
    AstNode::new(ty.to_string())
}

fn param_node(p: &Param) -> AstNode {
    let mut n = AstNode::named("Param", p.name.as_str());
    n.children.push(ty_node(p.ty));
    n
}

fn block_node(stmts: &[Stmt]) -> AstNode {
    let mut n = AstNode::new("Block");
    n.children = stmts.iter().map(stmt_node).collect();
    n
}

fn function_node(f: &Function) -> AstNode {
    let mut params = AstNode::new("Params");
    params.children = f.params.iter().map(param_node).collect();
    let mut n = AstNode::named("FunctionDecl", f.name.as_str());
    n.children = vec![params, ty_node(f.return_type), block_node(&f.body)];
    n
}

fn stmt_node(stmt: &Stmt) -> AstNode {
    match stmt {
        Stmt::VarDecl { name, ty, init } => {
            let mut n = AstNode::named("VarDecl", name.as_str());
            n.children.push(ty_node(*ty));
            if let Some(init) = init {
                n.children.push(expr_node(init));
            }
            n
        }
        Stmt::FunctionDecl(f) => function_node(f),
        Stmt::Assign { name, value } => {
            let mut n = AstNode::named("Assign", name.as_str());
            n.children.push(expr_node(value));
            n
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            let mut n = AstNode::new("If");
            n.children.push(expr_node(cond));
            n.children.push(block_node(then_block));
            if let Some(else_block) = else_block {
                n.children.push(block_node(else_block));
            }
            n
        }
        Stmt::While { cond, body } => {
            let mut n = AstNode::new("While");
            n.children.push(expr_node(cond));
            n.children.push(block_node(body));
            n
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
        } => {
            // absent header slots are omitted; the body is always last
            let mut n = AstNode::new("For");
            if let Some(init) = init {
                n.children.push(stmt_node(init));
            }
            if let Some(cond) = cond {
                n.children.push(expr_node(cond));
            }
            if let Some(post) = post {
                n.children.push(expr_node(post));
            }
            n.children.push(block_node(body));
            n
        }
        Stmt::Return(expr) => {
            let mut n = AstNode::new("Return");
            if let Some(expr) = expr {
                n.children.push(expr_node(expr));
            }
            n
        }
        Stmt::Print(expr) => {
            let mut n = AstNode::new("Print");
            n.children.push(expr_node(expr));
            n
        }
        // an expression statement is the bare expression node
        Stmt::Expr(expr) => expr_node(expr),
    }
}

fn expr_node(expr: &Expr) -> AstNode {
    match expr {
        Expr::Literal(text) => AstNode::named("Literal", text.as_str()),
        Expr::Ident(name) => AstNode::named("Identifier", name.as_str()),
        Expr::Assign { name, value } => {
            let mut n = AstNode::named("Assign", name.as_str());
            n.children.push(expr_node(value));
            n
        }
        Expr::Call { name, args } => {
            let mut n = AstNode::named("Call", name.as_str());
            n.children = args.iter().map(expr_node).collect();
            n
        }
        Expr::Binary { op, lhs, rhs } => {
            let mut n = AstNode::named("BinaryOp", op.symbol());
            n.children = vec![expr_node(lhs), expr_node(rhs)];
            n
        }
        Expr::Unary { op, operand } => {
            let mut n = AstNode::named("UnaryOp", op.symbol());
            n.children.push(expr_node(operand));
            n
        }
    }
}

/// Render a program as the report's generic AST tree.
pub fn program_node(program: &Program) -> AstNode {
    let mut n = AstNode::new("Program");
    n.children = program.stmts.iter().map(stmt_node).collect();
    n
}

fn fn_entry(sig: &FnSig) -> FnEntry {
    FnEntry {
        return_type: sig.return_type.to_string(),
        params: sig
            .params
            .iter()
            .map(|p| ParamEntry {
                name: p.name.clone(),
                ty: p.ty.to_string(),
            })
            .collect(),
    }
}

fn strip_bom(src: &[u8]) -> &[u8] {
    src.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(src)
}

/// Run the whole pipeline over raw source bytes and assemble the report.
///
/// Diagnostics are concatenated in phase order. Evaluation runs only when
/// the earlier phases produced no errors; when it is blocked, any output
/// captured while evaluating global initializers is discarded as well.
pub fn run_pipeline(source: &[u8]) -> Report {
    let source = strip_bom(source);

    let (tokens, lex_diag) = Lexer::new(source).tokenize();
    let (program, parse_diag) = Parser::new(tokens.clone()).parse_program();

    let mut interp = Interpreter::new();
    interp.collect_decls(&program);
    let collect_diag = interp.take_diagnostics();

    let sema_diag = Analyzer::new(interp.globals(), interp.functions()).run(&program);

    let mut diag = Diagnostics::new();
    diag.extend(lex_diag);
    diag.extend(parse_diag);
    diag.extend(collect_diag);
    diag.extend(sema_diag);

    if diag.has_errors() {
        interp.clear_output();
    } else {
        interp.run(&program);
        diag.extend(interp.take_diagnostics());
    }

    Report {
        tokens: tokens.iter().map(token_entry).collect(),
        ast: program_node(&program),
        symbol_table: interp
            .globals()
            .iter()
            .map(|(name, ty)| (name.clone(), ty.to_string()))
            .collect(),
        function_table: interp
            .functions()
            .iter()
            .map(|(name, sig)| (name.clone(), fn_entry(sig)))
            .collect(),
        errors: diag.errors,
        warnings: diag.warnings,
        output: interp.output().to_string(),
    }
}
