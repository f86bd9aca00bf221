pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use minic_lexer::Lexer;
    use minic_syntax::ast::*;

    fn parse_expr_str(input: &str) -> Expr {
        let (tokens, diag) = Lexer::new(input.as_bytes()).tokenize();
        assert!(diag.errors.is_empty(), "lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expression().expect("parsing should succeed")
    }

    fn parse_program_str(input: &str) -> (Program, Vec<String>) {
        let (tokens, diag) = Lexer::new(input.as_bytes()).tokenize();
        assert!(diag.errors.is_empty(), "lexing should succeed");
        let (program, diag) = Parser::new(tokens).parse_program();
        (program, diag.errors)
    }

    fn parse_ok(input: &str) -> Program {
        let (program, errors) = parse_program_str(input);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        program
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42"), Expr::Literal(s) if s == "42"));
        assert!(matches!(parse_expr_str("3.5"), Expr::Literal(s) if s == "3.5"));
        assert!(matches!(parse_expr_str("true"), Expr::Literal(s) if s == "true"));
        assert!(matches!(parse_expr_str("false"), Expr::Literal(s) if s == "false"));
    }

    #[test]
    fn test_identifier_expressions() {
        assert!(matches!(parse_expr_str("variable"), Expr::Ident(s) if s == "variable"));
        assert!(matches!(parse_expr_str("my_var"), Expr::Ident(s) if s == "my_var"));
    }

    #[test]
    fn test_binary_operators() {
        assert!(matches!(parse_expr_str("1 + 2"), Expr::Binary { op: BinOp::Add, .. }));
        assert!(matches!(parse_expr_str("5 - 3"), Expr::Binary { op: BinOp::Sub, .. }));
        assert!(matches!(parse_expr_str("4 * 6"), Expr::Binary { op: BinOp::Mul, .. }));
        assert!(matches!(parse_expr_str("8 / 2"), Expr::Binary { op: BinOp::Div, .. }));
        assert!(matches!(parse_expr_str("1 == 2"), Expr::Binary { op: BinOp::Eq, .. }));
        assert!(matches!(parse_expr_str("1 != 2"), Expr::Binary { op: BinOp::Ne, .. }));
        assert!(matches!(parse_expr_str("1 < 2"), Expr::Binary { op: BinOp::Lt, .. }));
        assert!(matches!(parse_expr_str("1 <= 2"), Expr::Binary { op: BinOp::Le, .. }));
        assert!(matches!(parse_expr_str("1 > 2"), Expr::Binary { op: BinOp::Gt, .. }));
        assert!(matches!(parse_expr_str("1 >= 2"), Expr::Binary { op: BinOp::Ge, .. }));
        assert!(matches!(parse_expr_str("true && false"), Expr::Binary { op: BinOp::And, .. }));
        assert!(matches!(parse_expr_str("true || false"), Expr::Binary { op: BinOp::Or, .. }));
    }

    #[test]
    fn test_unary_operators() {
        assert!(matches!(parse_expr_str("!true"), Expr::Unary { op: UnOp::Not, .. }));
        assert!(matches!(parse_expr_str("-5"), Expr::Unary { op: UnOp::Neg, .. }));
        // right-associative: -(-x)
        if let Expr::Unary { op: UnOp::Neg, operand } = parse_expr_str("--x") {
            assert!(matches!(*operand, Expr::Unary { op: UnOp::Neg, .. }));
        } else {
            panic!("Expected nested Unary");
        }
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + 2 * 3 groups as 1 + (2 * 3)
        if let Expr::Binary { op: BinOp::Add, rhs, .. } = parse_expr_str("1 + 2 * 3") {
            assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
        } else {
            panic!("Expected Add at the root");
        }
        // a || b && c groups as a || (b && c)
        if let Expr::Binary { op: BinOp::Or, rhs, .. } = parse_expr_str("a || b && c") {
            assert!(matches!(*rhs, Expr::Binary { op: BinOp::And, .. }));
        } else {
            panic!("Expected Or at the root");
        }
        // 1 < 2 == true groups as (1 < 2) == true
        if let Expr::Binary { op: BinOp::Eq, lhs, .. } = parse_expr_str("1 < 2 == true") {
            assert!(matches!(*lhs, Expr::Binary { op: BinOp::Lt, .. }));
        } else {
            panic!("Expected Eq at the root");
        }
    }

    #[test]
    fn test_left_associativity() {
        // 1 - 2 - 3 groups as (1 - 2) - 3
        if let Expr::Binary { op: BinOp::Sub, lhs, .. } = parse_expr_str("1 - 2 - 3") {
            assert!(matches!(*lhs, Expr::Binary { op: BinOp::Sub, .. }));
        } else {
            panic!("Expected Sub at the root");
        }
    }

    #[test]
    fn test_parenthesized_expressions() {
        // grouping produces no extra node
        assert!(matches!(parse_expr_str("(1 + 2)"), Expr::Binary { op: BinOp::Add, .. }));
        if let Expr::Binary { op: BinOp::Mul, lhs, .. } = parse_expr_str("(1 + 2) * 3") {
            assert!(matches!(*lhs, Expr::Binary { op: BinOp::Add, .. }));
        } else {
            panic!("Expected Mul at the root");
        }
    }

    #[test]
    fn test_function_calls() {
        if let Expr::Call { name, args } = parse_expr_str("foo()") {
            assert_eq!(name, "foo");
            assert_eq!(args.len(), 0);
        } else {
            panic!("Expected Call");
        }
        if let Expr::Call { name, args } = parse_expr_str("add(1, 2)") {
            assert_eq!(name, "add");
            assert_eq!(args.len(), 2);
        } else {
            panic!("Expected Call");
        }
    }

    #[test]
    fn test_var_declaration() {
        let program = parse_ok("var x: int = 2 + 3;");
        assert_eq!(program.stmts.len(), 1);
        match &program.stmts[0] {
            Stmt::VarDecl { name, ty, init } => {
                assert_eq!(name, "x");
                assert_eq!(*ty, Ty::Int);
                assert!(init.is_some());
            }
            other => panic!("Expected VarDecl, got {other:?}"),
        }
        let program = parse_ok("var f: float;");
        assert!(matches!(
            &program.stmts[0],
            Stmt::VarDecl { ty: Ty::Float, init: None, .. }
        ));
    }

    #[test]
    fn test_function_declaration() {
        let program = parse_ok("func f(a: float, b: int): float { return a + b; }");
        match &program.stmts[0] {
            Stmt::FunctionDecl(f) => {
                assert_eq!(f.name, "f");
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.params[0].ty, Ty::Float);
                assert_eq!(f.params[1].ty, Ty::Int);
                assert_eq!(f.return_type, Ty::Float);
                assert_eq!(f.body.len(), 1);
                assert!(matches!(f.body[0], Stmt::Return(Some(_))));
            }
            other => panic!("Expected FunctionDecl, got {other:?}"),
        }
    }

    #[test]
    fn test_basic_statements() {
        parse_ok("x = 42;");
        parse_ok("print x;");
        parse_ok("print(x);");
        parse_ok("return;");
        parse_ok("return 1 + 2;");
        parse_ok("if (x < 1) { print x; }");
        parse_ok("if (x < 1) { print x; } else { print 0; }");
        parse_ok("while (x < 10) { x = x + 1; }");
        parse_ok("f(1, 2);");
    }

    #[test]
    fn test_expression_statement_is_bare() {
        let program = parse_ok("f(1);");
        assert!(matches!(&program.stmts[0], Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn test_for_statement_forms() {
        // all header slots present, var-declaration init
        let program = parse_ok("for (var i: int = 0; i < 3; i = i + 1) { print i; }");
        match &program.stmts[0] {
            Stmt::For { init, cond, post, body } => {
                assert!(matches!(init.as_deref(), Some(Stmt::VarDecl { .. })));
                assert!(cond.is_some());
                assert!(matches!(post, Some(Expr::Assign { .. })));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected For, got {other:?}"),
        }
        // expression init with its own ';'
        let program = parse_ok("for (i = 0; i < 3; i = i + 1) { }");
        match &program.stmts[0] {
            Stmt::For { init, .. } => {
                assert!(matches!(
                    init.as_deref(),
                    Some(Stmt::Expr(Expr::Assign { .. }))
                ));
            }
            other => panic!("Expected For, got {other:?}"),
        }
        // every slot may be empty
        let program = parse_ok("for (;;) { }");
        assert!(matches!(
            &program.stmts[0],
            Stmt::For { init: None, cond: None, post: None, .. }
        ));
    }

    #[test]
    fn test_expect_error_message() {
        let (_, errors) = parse_program_str("var x int;");
        assert_eq!(
            errors,
            vec!["Expected ':' after identifier in var declaration; found 'int'"]
        );
        let (_, errors) = parse_program_str("var x: string;");
        assert_eq!(errors, vec!["Unknown type in var declaration"]);
        let (_, errors) = parse_program_str("print 1");
        assert_eq!(errors, vec!["Expected ';' after print; found 'EOF'"]);
    }

    #[test]
    fn test_unterminated_block() {
        let (_, errors) = parse_program_str("func f(): int { return 1;");
        assert_eq!(errors, vec!["Unterminated function body"]);
    }

    #[test]
    fn test_partial_tree_on_error() {
        // the first statement survives; parsing stops at the broken one
        let (program, errors) = parse_program_str("var a: int = 1;\nvar b int;\nvar c: int = 3;");
        assert!(!errors.is_empty());
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(&program.stmts[0], Stmt::VarDecl { name, .. } if name == "a"));
    }
}
