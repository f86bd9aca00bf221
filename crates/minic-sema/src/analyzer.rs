//! The MiniC semantic analyzer.
//!
//! Runs after declaration collection, over two regions: every top-level
//! variable initializer (checked against a scope holding all declared
//! globals) and every function body. Top-level non-declaration statements
//! are not analyzed statically; their failures surface at runtime. The
//! analyzer never mutates the AST and collects every diagnostic it can find.

use std::collections::HashMap;

use minic_syntax::ast::{BinOp, Expr, Program, Stmt, Ty, UnOp};
use minic_syntax::diag::Diagnostics;
use minic_syntax::symbols::{FnSig, FnTable, SymbolTable};

/// Assignment and binding compatibility: exact match or implicit int→float
/// widening. `none` is never compatible with anything.
fn compatible(expected: Ty, actual: Ty) -> bool {
    if expected == Ty::None || actual == Ty::None {
        return false;
    }
    expected == actual || (expected == Ty::Float && actual == Ty::Int)
}

fn literal_type(text: &str) -> Ty {
    if text == "true" || text == "false" {
        Ty::Bool
    } else if text.contains('.') {
        Ty::Float
    } else {
        Ty::Int
    }
}

type Scope = HashMap<String, Ty>;

pub struct Analyzer<'a> {
    globals: &'a SymbolTable,
    functions: &'a FnTable,
    diag: Diagnostics,
}

impl<'a> Analyzer<'a> {
    pub fn new(globals: &'a SymbolTable, functions: &'a FnTable) -> Self {
        Self {
            globals,
            functions,
            diag: Diagnostics::new(),
        }
    }

    /// Analyze the whole program and return the collected diagnostics.
    pub fn run(mut self, program: &Program) -> Diagnostics {
        for stmt in &program.stmts {
            if let Stmt::VarDecl {
                name,
                ty,
                init: Some(init),
            } = stmt
            {
                // every declared global is visible to every initializer
                let scope: Scope = self
                    .globals
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect();
                let rhs = self.infer_expr(init, &scope);
                if rhs != Ty::None && !compatible(*ty, rhs) {
                    self.diag.error(format!(
                        "Type mismatch in initializer for global '{name}': expected {ty}, got {rhs}"
                    ));
                }
            }
        }
        for (name, sig) in self.functions {
            self.analyze_function(name, sig);
        }
        self.diag
    }

    fn analyze_function(&mut self, fname: &str, sig: &FnSig) {
        let mut locals = Scope::new();
        for p in &sig.params {
            if locals.contains_key(&p.name) {
                self.diag.error(format!(
                    "Duplicate parameter name '{}' in function '{fname}'",
                    p.name
                ));
            }
            locals.insert(p.name.clone(), p.ty);
        }
        // hoist the body's top-level declarations into scope up front
        for stmt in &sig.body {
            if let Stmt::VarDecl { name, ty, .. } = stmt {
                if locals.contains_key(name) {
                    self.diag.warning(format!(
                        "Shadowing/redeclaration of '{name}' in function '{fname}'"
                    ));
                }
                locals.insert(name.clone(), *ty);
            }
        }
        for stmt in &sig.body {
            // hoisted declarations only re-check their initializer; nested
            // declarations go through the full declaration path instead
            if let Stmt::VarDecl { name, ty, init } = stmt {
                self.check_initializer(name, *ty, init.as_ref(), &locals);
            } else {
                self.analyze_stmt(stmt, &mut locals, sig.return_type);
            }
        }
    }

    fn check_initializer(&mut self, name: &str, ty: Ty, init: Option<&Expr>, locals: &Scope) {
        if let Some(init) = init {
            let rhs = self.infer_expr(init, locals);
            if rhs != Ty::None && !compatible(ty, rhs) {
                self.diag.error(format!(
                    "Type mismatch in initializer for '{name}': expected {ty}, got {rhs}"
                ));
            }
        }
    }

    /// Declare a variable encountered mid-analysis (a nested block or a
    /// for-loop header). A name already in scope is an error here.
    fn declare_var(
        &mut self,
        name: &str,
        ty: Ty,
        init: Option<&Expr>,
        locals: &mut Scope,
        context: &str,
    ) {
        if locals.contains_key(name) {
            self.diag
                .error(format!("Redeclaration of variable '{name}' in {context}"));
            return;
        }
        locals.insert(name.to_string(), ty);
        self.check_initializer(name, ty, init, locals);
    }

    fn analyze_stmt(&mut self, stmt: &Stmt, locals: &mut Scope, ret_ty: Ty) {
        match stmt {
            Stmt::VarDecl { name, ty, init } => {
                self.declare_var(name, *ty, init.as_ref(), locals, "function");
            }
            Stmt::Assign { name, value } => {
                if !locals.contains_key(name) && !self.globals.contains_key(name) {
                    self.diag
                        .error(format!("Assignment to undeclared variable '{name}'"));
                }
                let rhs = self.infer_expr(value, locals);
                let dest = locals
                    .get(name)
                    .copied()
                    .or_else(|| self.globals.get(name).copied())
                    .unwrap_or(Ty::None);
                if rhs != Ty::None && dest != Ty::None && !compatible(dest, rhs) {
                    self.diag.error(format!(
                        "Type mismatch in assignment to '{name}': expected {dest}, got {rhs}"
                    ));
                }
            }
            Stmt::Print(expr) => {
                self.infer_expr(expr, locals);
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.infer_expr(cond, locals);
                for s in then_block {
                    self.analyze_stmt(s, locals, ret_ty);
                }
                if let Some(else_block) = else_block {
                    for s in else_block {
                        self.analyze_stmt(s, locals, ret_ty);
                    }
                }
            }
            Stmt::While { cond, body } => {
                self.infer_expr(cond, locals);
                for s in body {
                    self.analyze_stmt(s, locals, ret_ty);
                }
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                match init.as_deref() {
                    Some(Stmt::VarDecl { name, ty, init }) => {
                        self.declare_var(name, *ty, init.as_ref(), locals, "for-loop");
                    }
                    Some(Stmt::Expr(e)) => {
                        self.infer_expr(e, locals);
                    }
                    _ => {}
                }
                if let Some(cond) = cond {
                    self.infer_expr(cond, locals);
                }
                if let Some(post) = post {
                    self.infer_expr(post, locals);
                }
                for s in body {
                    self.analyze_stmt(s, locals, ret_ty);
                }
            }
            Stmt::Return(Some(expr)) => {
                let rv = self.infer_expr(expr, locals);
                if rv != Ty::None && ret_ty != Ty::None && !compatible(ret_ty, rv) {
                    self.diag.error(format!(
                        "Return type mismatch: function expects {ret_ty}, returned {rv}"
                    ));
                }
            }
            Stmt::Return(None) => {
                if ret_ty != Ty::None {
                    self.diag.error(format!(
                        "Missing return value in function that declares return type '{ret_ty}'"
                    ));
                }
            }
            // a nested function declaration is inert; only top-level ones
            // were collected
            Stmt::FunctionDecl(_) => {}
            Stmt::Expr(expr) => {
                self.infer_expr(expr, locals);
            }
        }
    }

    fn infer_expr(&mut self, expr: &Expr, locals: &Scope) -> Ty {
        match expr {
            Expr::Literal(text) => literal_type(text),
            Expr::Ident(name) => {
                if let Some(ty) = locals.get(name) {
                    return *ty;
                }
                if let Some(ty) = self.globals.get(name) {
                    return *ty;
                }
                self.diag.error(format!("Undefined identifier '{name}'"));
                Ty::None
            }
            // expression-position assignment only infers its right side;
            // target checks happen at statement level
            Expr::Assign { value, .. } => self.infer_expr(value, locals),
            Expr::Call { name, args } => self.infer_call(name, args, locals),
            Expr::Binary { op, lhs, rhs } => {
                let l = self.infer_expr(lhs, locals);
                let r = self.infer_expr(rhs, locals);
                if l == Ty::None || r == Ty::None {
                    return Ty::None;
                }
                match op {
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        if l == Ty::Bool || r == Ty::Bool {
                            self.diag.error(format!(
                                "Invalid operand type for arithmetic operator '{}'",
                                op.symbol()
                            ));
                            return Ty::None;
                        }
                        if l == Ty::Float || r == Ty::Float {
                            Ty::Float
                        } else {
                            Ty::Int
                        }
                    }
                    BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                        if l == Ty::Bool || r == Ty::Bool {
                            self.diag.error(format!(
                                "Invalid operand type for relational operator '{}'",
                                op.symbol()
                            ));
                            return Ty::None;
                        }
                        Ty::Bool
                    }
                    BinOp::Eq | BinOp::Ne => {
                        // the evaluator coerces the numeric side to bool, so
                        // mixing is only worth a warning
                        if (l == Ty::Bool) != (r == Ty::Bool) {
                            self.diag.warning(format!(
                                "Comparison between boolean and numeric in '{}'",
                                op.symbol()
                            ));
                        }
                        Ty::Bool
                    }
                    // every non-none operand coerces to bool
                    BinOp::And | BinOp::Or => Ty::Bool,
                }
            }
            Expr::Unary { op, operand } => {
                let v = self.infer_expr(operand, locals);
                if v == Ty::None {
                    return Ty::None;
                }
                match op {
                    UnOp::Neg => {
                        if v == Ty::Bool {
                            self.diag
                                .error("Invalid operand type for unary '-' on boolean");
                            return Ty::None;
                        }
                        if v == Ty::Float {
                            Ty::Float
                        } else {
                            Ty::Int
                        }
                    }
                    UnOp::Not => Ty::Bool,
                }
            }
        }
    }

    fn infer_call(&mut self, name: &str, args: &[Expr], locals: &Scope) -> Ty {
        // the print intrinsic accepts anything and yields none
        if name == "print" {
            return Ty::None;
        }
        let Some(sig) = self.functions.get(name) else {
            self.diag
                .error(format!("Call to undefined function '{name}'"));
            return Ty::None;
        };
        if args.len() != sig.params.len() {
            self.diag
                .error(format!("Argument count mismatch in call to '{name}'"));
        }
        for (i, (arg, param)) in args.iter().zip(&sig.params).enumerate() {
            let at = self.infer_expr(arg, locals);
            if at == Ty::None {
                continue;
            }
            if !compatible(param.ty, at) {
                self.diag.error(format!(
                    "Argument {} type mismatch in call to '{name}': expected {}, got {at}",
                    i + 1,
                    param.ty
                ));
            }
        }
        sig.return_type
    }
}
