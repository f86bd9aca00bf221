//! Declaration collection and the tree-walking evaluator.

use indexmap::IndexMap;

use crate::flow::Flow;
use crate::frame::Frame;
use crate::value::Value;
use minic_syntax::ast::{BinOp, Expr, Program, Stmt, UnOp};
use minic_syntax::diag::Diagnostics;
use minic_syntax::symbols::{FnSig, FnTable, SymbolTable};

/// Absolute tolerance for numeric `==`/`!=`.
const EQ_TOLERANCE: f64 = 1e-9;

fn eval_literal(text: &str) -> Value {
    if text == "true" || text == "false" {
        return Value::Bool(text == "true");
    }
    if text.contains('.') {
        // an unparseable lexeme such as `1.2.3` silently reads as 0.0
        Value::Float(text.parse().unwrap_or(0.0))
    } else {
        Value::Int(text.parse().unwrap_or(0))
    }
}

/// Arithmetic with int→float widening: float if either side is float,
/// wrapping i64 arithmetic otherwise.
fn arith(l: Value, r: Value, int_op: fn(i64, i64) -> i64, float_op: fn(f64, f64) -> f64) -> Value {
    if l.is_float() || r.is_float() {
        Value::Float(float_op(l.as_float(), r.as_float()))
    } else {
        Value::Int(int_op(l.as_int(), r.as_int()))
    }
}

/// `==`/`!=` semantics: a bool on either side compares coerced bools;
/// otherwise both sides widen to float and compare within [`EQ_TOLERANCE`].
fn values_equal(l: &Value, r: &Value) -> bool {
    if l.is_bool() || r.is_bool() {
        l.truthy() == r.truthy()
    } else {
        (l.as_float() - r.as_float()).abs() < EQ_TOLERANCE
    }
}

/// The evaluator. Owns the global tables built by [`collect_decls`], the
/// call stack, the captured output, and the runtime diagnostics.
///
/// [`collect_decls`]: Interpreter::collect_decls
pub struct Interpreter {
    globals: SymbolTable,
    global_values: IndexMap<String, Value>,
    functions: FnTable,
    call_stack: Vec<Frame>,
    output: String,
    diag: Diagnostics,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            globals: SymbolTable::new(),
            global_values: IndexMap::new(),
            functions: FnTable::new(),
            call_stack: Vec::new(),
            output: String::new(),
            diag: Diagnostics::new(),
        }
    }

    /// Declared global variables, in declaration order.
    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    /// Declared functions, in declaration order.
    pub fn functions(&self) -> &FnTable {
        &self.functions
    }

    /// Output captured from `print` so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Discard captured output (the driver does this when earlier phases
    /// reported errors and evaluation is blocked).
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Drain the diagnostics accumulated since the last call.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diag)
    }

    /// One linear pass over the top-level statements: record global variable
    /// declarations (installing the default value, then evaluating any
    /// initializer immediately against the globals known so far) and
    /// function signatures. Duplicate globals warn and overwrite; duplicate
    /// functions error and the later definition wins.
    pub fn collect_decls(&mut self, program: &Program) {
        for stmt in &program.stmts {
            match stmt {
                Stmt::VarDecl { name, ty, init } => {
                    if self.globals.contains_key(name) {
                        self.diag.warning(format!("Redeclaration of variable {name}"));
                    }
                    self.globals.insert(name.clone(), *ty);
                    self.global_values
                        .insert(name.clone(), Value::default_for(*ty));
                    if let Some(init) = init {
                        let v = self.eval_expr(init);
                        self.global_values.insert(name.clone(), v);
                    }
                }
                Stmt::FunctionDecl(f) => {
                    if self.functions.contains_key(&f.name) {
                        self.diag.error(format!("Redeclared function {}", f.name));
                    }
                    self.functions.insert(
                        f.name.clone(),
                        FnSig {
                            params: f.params.clone(),
                            return_type: f.return_type,
                            body: f.body.clone(),
                        },
                    );
                }
                _ => {}
            }
        }
    }

    /// Execute the top-level non-function statements in source order,
    /// halting after the first statement that records a runtime error.
    pub fn run(&mut self, program: &Program) {
        for stmt in &program.stmts {
            if matches!(stmt, Stmt::FunctionDecl(_)) {
                continue;
            }
            self.exec_stmt(stmt);
            if self.diag.has_errors() {
                break;
            }
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt]) -> Flow {
        for stmt in stmts {
            if let Flow::Return(v) = self.exec_stmt(stmt) {
                return Flow::Return(v);
            }
        }
        Flow::Normal
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Flow {
        match stmt {
            Stmt::VarDecl { name, ty, init } => {
                let v = match init {
                    Some(init) => self.eval_expr(init),
                    None => Value::default_for(*ty),
                };
                if let Some(frame) = self.call_stack.last_mut() {
                    frame.set(name.clone(), v);
                } else {
                    self.global_values.insert(name.clone(), v);
                }
                Flow::Normal
            }
            Stmt::Assign { name, value } => {
                let v = self.eval_expr(value);
                self.assign(name, v);
                Flow::Normal
            }
            Stmt::Print(expr) => {
                let v = self.eval_expr(expr);
                self.emit(&v);
                Flow::Normal
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                if self.eval_expr(cond).truthy() {
                    self.exec_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.exec_block(else_block)
                } else {
                    Flow::Normal
                }
            }
            Stmt::While { cond, body } => {
                while self.eval_expr(cond).truthy() {
                    if let Flow::Return(v) = self.exec_block(body) {
                        return Flow::Return(v);
                    }
                }
                Flow::Normal
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                if let Some(init) = init {
                    self.exec_stmt(init);
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_expr(cond).truthy() {
                            break;
                        }
                    }
                    if let Flow::Return(v) = self.exec_block(body) {
                        return Flow::Return(v);
                    }
                    if let Some(post) = post {
                        self.eval_expr(post);
                    }
                }
                Flow::Normal
            }
            Stmt::Return(expr) => {
                let v = match expr {
                    Some(e) => self.eval_expr(e),
                    None => Value::None,
                };
                Flow::Return(v)
            }
            // functions were collected up front; the declaration itself is inert
            Stmt::FunctionDecl(_) => Flow::Normal,
            Stmt::Expr(expr) => {
                self.eval_expr(expr);
                Flow::Normal
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Literal(text) => eval_literal(text),
            Expr::Ident(name) => self.lookup(name),
            Expr::Assign { name, value } => {
                let v = self.eval_expr(value);
                self.assign(name, v.clone());
                v
            }
            Expr::Call { name, args } => self.eval_call(name, args),
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expr::Unary { op, operand } => {
                let v = self.eval_expr(operand);
                match op {
                    UnOp::Neg => match v {
                        Value::Float(f) => Value::Float(-f),
                        other => Value::Int(other.as_int().wrapping_neg()),
                    },
                    UnOp::Not => Value::Bool(!v.truthy()),
                }
            }
        }
    }

    /// Innermost-frame-outward lookup, then globals.
    fn lookup(&mut self, name: &str) -> Value {
        for frame in self.call_stack.iter().rev() {
            if let Some(v) = frame.get(name) {
                return v.clone();
            }
        }
        if let Some(v) = self.global_values.get(name) {
            return v.clone();
        }
        self.diag.error(format!("Undefined variable: {name}"));
        Value::None
    }

    /// Assignment targets the innermost frame if it already binds the name,
    /// else an existing global, else creates a new global with a warning.
    fn assign(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.call_stack.last_mut() {
            if frame.contains(name) {
                frame.set(name.to_string(), value);
                return;
            }
        }
        if !self.global_values.contains_key(name) {
            self.diag
                .warning(format!("Implicit global creation of {name}"));
        }
        self.global_values.insert(name.to_string(), value);
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> Value {
        // `print` is a built-in intrinsic, not a table entry
        if name == "print" {
            return match args.first() {
                Some(arg) => {
                    let v = self.eval_expr(arg);
                    self.emit(&v);
                    v
                }
                None => {
                    self.emit(&Value::None);
                    Value::None
                }
            };
        }
        let Some(sig) = self.functions.get(name).cloned() else {
            self.diag
                .error(format!("Call to undefined function {name}"));
            return Value::None;
        };
        if args.len() != sig.params.len() {
            self.diag
                .error(format!("Argument count mismatch in call to {name}"));
        }
        // arguments evaluate left to right before the frame is pushed; on a
        // count mismatch the call still proceeds with the pairs available
        let values: Vec<Value> = args.iter().map(|a| self.eval_expr(a)).collect();
        let mut frame = Frame::new();
        for (param, value) in sig.params.iter().zip(values) {
            frame.set(param.name.clone(), value);
        }
        self.call_stack.push(frame);
        let flow = self.exec_block(&sig.body);
        self.call_stack.pop();
        match flow {
            Flow::Return(v) => v,
            Flow::Normal => Value::None,
        }
    }

    fn eval_pair(&mut self, lhs: &Expr, rhs: &Expr) -> (Value, Value) {
        let l = self.eval_expr(lhs);
        let r = self.eval_expr(rhs);
        (l, r)
    }

    fn eval_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Value {
        match op {
            // && and || evaluate their own operands so the right side can
            // short-circuit away
            BinOp::And => {
                if !self.eval_expr(lhs).truthy() {
                    return Value::Bool(false);
                }
                let r = self.eval_expr(rhs);
                Value::Bool(r.truthy())
            }
            BinOp::Or => {
                if self.eval_expr(lhs).truthy() {
                    return Value::Bool(true);
                }
                let r = self.eval_expr(rhs);
                Value::Bool(r.truthy())
            }
            BinOp::Add => {
                let (l, r) = self.eval_pair(lhs, rhs);
                arith(l, r, i64::wrapping_add, |a, b| a + b)
            }
            BinOp::Sub => {
                let (l, r) = self.eval_pair(lhs, rhs);
                arith(l, r, i64::wrapping_sub, |a, b| a - b)
            }
            BinOp::Mul => {
                let (l, r) = self.eval_pair(lhs, rhs);
                arith(l, r, i64::wrapping_mul, |a, b| a * b)
            }
            BinOp::Div => {
                let (l, r) = self.eval_pair(lhs, rhs);
                let zero = matches!(r, Value::Int(0)) || matches!(r, Value::Float(f) if f == 0.0);
                if zero {
                    self.diag.error("Division by zero");
                    return Value::None;
                }
                // division always yields float
                Value::Float(l.as_float() / r.as_float())
            }
            BinOp::Lt => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(l.as_float() < r.as_float())
            }
            BinOp::Gt => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(l.as_float() > r.as_float())
            }
            BinOp::Le => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(l.as_float() <= r.as_float())
            }
            BinOp::Ge => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(l.as_float() >= r.as_float())
            }
            BinOp::Eq => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(values_equal(&l, &r))
            }
            BinOp::Ne => {
                let (l, r) = self.eval_pair(lhs, rhs);
                Value::Bool(!values_equal(&l, &r))
            }
        }
    }

    /// Append the printed form of a value plus a newline to the captured
    /// output. Nothing is emitted once a runtime error has been recorded, so
    /// output only reflects prints that happened before the first failure.
    fn emit(&mut self, v: &Value) {
        if self.diag.has_errors() {
            return;
        }
        self.output.push_str(&v.to_string());
        self.output.push('\n');
    }
}
