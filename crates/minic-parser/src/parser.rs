//! Recursive-descent parser for MiniC.
//!
//! Statements dispatch on their leading token; expressions use one function
//! per precedence level, lowest first. Recovery is coarse: a failed
//! sub-parse records its message and aborts the enclosing construct, and the
//! top-level loop stops at the first statement that fails, keeping the
//! partial tree built so far.

use minic_syntax::ast::{BinOp, Expr, Function, Param, Program, Stmt, Ty, UnOp};
use minic_syntax::diag::Diagnostics;
use minic_syntax::token::{Token, TokenKind};

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diag: Diagnostics,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diag: Diagnostics::new(),
        }
    }

    /// Parse the whole token stream. Always yields a `Program` (possibly
    /// partial) together with the parse diagnostics.
    pub fn parse_program(mut self) -> (Program, Diagnostics) {
        let mut stmts = Vec::new();
        while self.pos < self.tokens.len() {
            match self.parse_statement() {
                Some(s) => stmts.push(s),
                None => break,
            }
        }
        (Program { stmts }, self.diag)
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek(0).map_or(false, |t| t.kind == kind)
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek(offset).map_or(false, |t| t.kind == kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Lexeme of the token just consumed.
    fn prev_text(&self) -> String {
        self.tokens[self.pos - 1].text.clone()
    }

    fn expect(&mut self, kind: TokenKind, msg: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self
            .peek(0)
            .map(|t| t.text.clone())
            .unwrap_or_else(|| "EOF".to_string());
        self.diag.error(format!("{msg}; found '{found}'"));
        false
    }

    fn parse_type(&mut self, err: &str) -> Option<Ty> {
        if self.eat(TokenKind::Int) {
            Some(Ty::Int)
        } else if self.eat(TokenKind::Float) {
            Some(Ty::Float)
        } else if self.eat(TokenKind::Bool) {
            Some(Ty::Bool)
        } else {
            self.diag.error(err);
            None
        }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        if self.eat(TokenKind::Var) {
            return self.parse_var_decl();
        }
        if self.eat(TokenKind::Func) {
            return self.parse_function_decl();
        }
        if self.eat(TokenKind::If) {
            return self.parse_if();
        }
        if self.eat(TokenKind::While) {
            return self.parse_while();
        }
        if self.eat(TokenKind::For) {
            return self.parse_for();
        }
        if self.eat(TokenKind::Return) {
            return self.parse_return();
        }
        if self.eat(TokenKind::Print) {
            return self.parse_print();
        }
        // assignment statement only on an `IDENT =` lookahead
        if self.check(TokenKind::Identifier) && self.check_at(1, TokenKind::Equal) {
            let name = self.tokens[self.pos].text.clone();
            self.pos += 2;
            let value = self.parse_expression()?;
            if !self.expect(TokenKind::Semicolon, "Expected ';' after assignment") {
                return None;
            }
            return Some(Stmt::Assign { name, value });
        }
        let expr = self.parse_expression()?;
        if !self.expect(TokenKind::Semicolon, "Expected ';' after expression") {
            return None;
        }
        Some(Stmt::Expr(expr))
    }

    fn parse_var_decl(&mut self) -> Option<Stmt> {
        if !self.expect(TokenKind::Identifier, "Expected identifier after 'var'") {
            return None;
        }
        let name = self.prev_text();
        if !self.expect(
            TokenKind::Colon,
            "Expected ':' after identifier in var declaration",
        ) {
            return None;
        }
        let ty = self.parse_type("Unknown type in var declaration")?;
        let init = if self.eat(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        if !self.expect(TokenKind::Semicolon, "Expected ';' after var declaration") {
            return None;
        }
        Some(Stmt::VarDecl { name, ty, init })
    }

    fn parse_function_decl(&mut self) -> Option<Stmt> {
        if !self.expect(TokenKind::Identifier, "Expected function name after 'func'") {
            return None;
        }
        let name = self.prev_text();
        if !self.expect(TokenKind::LParen, "Expected '(' after function name") {
            return None;
        }
        let mut params = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                if !self.expect(TokenKind::Identifier, "Expected parameter name") {
                    return None;
                }
                let pname = self.prev_text();
                if !self.expect(TokenKind::Colon, "Expected ':' after parameter name") {
                    return None;
                }
                let pty = self.parse_type("Unknown parameter type")?;
                params.push(Param {
                    name: pname,
                    ty: pty,
                });
                if self.eat(TokenKind::RParen) {
                    break;
                }
                if !self.expect(TokenKind::Comma, "Expected ',' between parameters") {
                    return None;
                }
            }
        }
        if !self.expect(TokenKind::Colon, "Expected ':' after parameter list") {
            return None;
        }
        let return_type = self.parse_type("Unknown return type")?;
        if !self.expect(TokenKind::LBrace, "Expected '{' to start function body") {
            return None;
        }
        let body = self.parse_block_body("Unterminated function body")?;
        Some(Stmt::FunctionDecl(Function {
            name,
            params,
            return_type,
            body,
        }))
    }

    /// Scan statements up to the closing brace; EOF before `}` aborts with
    /// the given message.
    fn parse_block_body(&mut self, unterminated: &str) -> Option<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.eat(TokenKind::RBrace) {
            if self.pos >= self.tokens.len() {
                self.diag.error(unterminated);
                return None;
            }
            stmts.push(self.parse_statement()?);
        }
        Some(stmts)
    }

    fn parse_if(&mut self) -> Option<Stmt> {
        if !self.expect(TokenKind::LParen, "Expected '(' after 'if'") {
            return None;
        }
        let cond = self.parse_expression()?;
        if !self.expect(TokenKind::RParen, "Expected ')' after condition") {
            return None;
        }
        if !self.expect(TokenKind::LBrace, "Expected '{' to start if block") {
            return None;
        }
        let then_block = self.parse_block_body("Unterminated if block")?;
        let else_block = if self.eat(TokenKind::Else) {
            if !self.expect(TokenKind::LBrace, "Expected '{' to start else block") {
                return None;
            }
            Some(self.parse_block_body("Unterminated else block")?)
        } else {
            None
        };
        Some(Stmt::If {
            cond,
            then_block,
            else_block,
        })
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        if !self.expect(TokenKind::LParen, "Expected '(' after 'while'") {
            return None;
        }
        let cond = self.parse_expression()?;
        if !self.expect(TokenKind::RParen, "Expected ')' after condition") {
            return None;
        }
        if !self.expect(TokenKind::LBrace, "Expected '{' to start while body") {
            return None;
        }
        let body = self.parse_block_body("Unterminated while block")?;
        Some(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> Option<Stmt> {
        if !self.expect(TokenKind::LParen, "Expected '(' after 'for'") {
            return None;
        }
        let init = if self.eat(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Var) {
            // a var-declaration init carries its own ';'
            Some(Box::new(self.parse_statement()?))
        } else {
            let e = self.parse_header_expr()?;
            if !self.expect(TokenKind::Semicolon, "Expected ';' after for init") {
                return None;
            }
            Some(Box::new(Stmt::Expr(e)))
        };
        let cond = if self.eat(TokenKind::Semicolon) {
            None
        } else {
            let e = self.parse_expression()?;
            if !self.expect(TokenKind::Semicolon, "Expected ';' after for condition") {
                return None;
            }
            Some(e)
        };
        let post = if self.eat(TokenKind::RParen) {
            None
        } else {
            let e = self.parse_header_expr()?;
            if !self.expect(TokenKind::RParen, "Expected ')' after for post") {
                return None;
            }
            Some(e)
        };
        if !self.expect(TokenKind::LBrace, "Expected '{' to start for body") {
            return None;
        }
        let body = self.parse_block_body("Unterminated for block")?;
        Some(Stmt::For {
            init,
            cond,
            post,
            body,
        })
    }

    /// For-header expression slot. `IDENT = expr` parses as an assignment
    /// here; assignment has no precedence level in the general expression
    /// grammar.
    fn parse_header_expr(&mut self) -> Option<Expr> {
        if self.check(TokenKind::Identifier) && self.check_at(1, TokenKind::Equal) {
            let name = self.tokens[self.pos].text.clone();
            self.pos += 2;
            let value = self.parse_expression()?;
            return Some(Expr::Assign {
                name,
                value: Box::new(value),
            });
        }
        self.parse_expression()
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        if self.eat(TokenKind::Semicolon) {
            return Some(Stmt::Return(None));
        }
        let expr = self.parse_expression()?;
        if !self.expect(TokenKind::Semicolon, "Expected ';' after return") {
            return None;
        }
        Some(Stmt::Return(Some(expr)))
    }

    fn parse_print(&mut self) -> Option<Stmt> {
        let expr = if self.eat(TokenKind::LParen) {
            let e = self.parse_expression()?;
            if !self.expect(TokenKind::RParen, "Expected ')' after print argument") {
                return None;
            }
            e
        } else {
            self.parse_expression()?
        };
        if !self.expect(TokenKind::Semicolon, "Expected ';' after print") {
            return None;
        }
        Some(Stmt::Print(expr))
    }

    /// Parse one expression at the lowest precedence level.
    pub fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::OrOr) {
            let rhs = self.parse_and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_eq()?;
        while self.eat(TokenKind::AndAnd) {
            let rhs = self.parse_eq()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_eq(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_rel()?;
        loop {
            let op = if self.eat(TokenKind::EqEq) {
                BinOp::Eq
            } else if self.eat(TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };
            let rhs = self.parse_rel()?;
            lhs = binary(op, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_rel(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_add()?;
        loop {
            let op = if self.eat(TokenKind::Less) {
                BinOp::Lt
            } else if self.eat(TokenKind::Greater) {
                BinOp::Gt
            } else if self.eat(TokenKind::LessEq) {
                BinOp::Le
            } else if self.eat(TokenKind::GreaterEq) {
                BinOp::Ge
            } else {
                break;
            };
            let rhs = self.parse_add()?;
            lhs = binary(op, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_add(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_mul()?;
        loop {
            let op = if self.eat(TokenKind::Plus) {
                BinOp::Add
            } else if self.eat(TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_mul()?;
            lhs = binary(op, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_mul(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.eat(TokenKind::Star) {
                BinOp::Mul
            } else if self.eat(TokenKind::Slash) {
                BinOp::Div
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if self.eat(TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Some(Expr::Unary {
                op: UnOp::Not,
                operand: Box::new(operand),
            });
        }
        if self.eat(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Some(Expr::Unary {
                op: UnOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        if self.eat(TokenKind::Number) || self.eat(TokenKind::FloatNum) {
            return Some(Expr::Literal(self.prev_text()));
        }
        if self.eat(TokenKind::True) {
            return Some(Expr::Literal("true".to_string()));
        }
        if self.eat(TokenKind::False) {
            return Some(Expr::Literal("false".to_string()));
        }
        if self.eat(TokenKind::Identifier) {
            let name = self.prev_text();
            if self.eat(TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.eat(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if self.eat(TokenKind::RParen) {
                            break;
                        }
                        if !self.expect(TokenKind::Comma, "Expected ',' between call arguments") {
                            return None;
                        }
                    }
                }
                return Some(Expr::Call { name, args });
            }
            return Some(Expr::Ident(name));
        }
        if self.eat(TokenKind::LParen) {
            let e = self.parse_expression()?;
            if !self.expect(TokenKind::RParen, "Expected ')'") {
                return None;
            }
            return Some(e);
        }
        None
    }
}
