pub mod analyzer;

pub use analyzer::Analyzer;

#[cfg(test)]
mod tests {
    use super::*;
    use minic_interpreter::Interpreter;
    use minic_lexer::Lexer;
    use minic_parser::Parser;

    fn analyze_src(input: &str) -> (Vec<String>, Vec<String>) {
        let (tokens, lex_diag) = Lexer::new(input.as_bytes()).tokenize();
        assert!(lex_diag.errors.is_empty(), "lex errors: {:?}", lex_diag.errors);
        let (program, parse_diag) = Parser::new(tokens).parse_program();
        assert!(
            parse_diag.errors.is_empty(),
            "parse errors: {:?}",
            parse_diag.errors
        );
        let mut interp = Interpreter::new();
        interp.collect_decls(&program);
        let diag = Analyzer::new(interp.globals(), interp.functions()).run(&program);
        (diag.errors, diag.warnings)
    }

    fn expect_clean(input: &str) {
        let (errors, warnings) = analyze_src(input);
        assert!(errors.is_empty(), "errors: {errors:?}\nInput: {input}");
        assert!(warnings.is_empty(), "warnings: {warnings:?}\nInput: {input}");
    }

    #[test]
    fn test_well_typed_programs_are_clean() {
        expect_clean("var x: int = 2 + 3 * 4;\nprint x;");
        expect_clean("var f: float = 1;"); // int widens to float
        expect_clean("func f(a: float, b: int): float { return a + b; }\nprint f(1.5, 2);");
        expect_clean(
            "func sum(n: int): int {\n  var s: int = 0;\n  for (var i: int = 1; i <= n; i = i + 1) { s = s + i; }\n  return s;\n}\nprint sum(5);",
        );
    }

    #[test]
    fn test_global_initializer_mismatch() {
        let (errors, _) = analyze_src("var x: int = true;");
        assert_eq!(
            errors,
            vec!["Type mismatch in initializer for global 'x': expected int, got bool"]
        );
        // no narrowing
        let (errors, _) = analyze_src("var n: int = 1.5;");
        assert_eq!(
            errors,
            vec!["Type mismatch in initializer for global 'n': expected int, got float"]
        );
    }

    #[test]
    fn test_global_initializers_see_all_globals() {
        // the analyzer checks initializers against the full symbol table,
        // even for names declared later
        expect_clean("var a: int = b;\nvar b: int = 1;");
    }

    #[test]
    fn test_undefined_identifier() {
        let (errors, _) = analyze_src("func f(): int { return y; }");
        assert_eq!(errors, vec!["Undefined identifier 'y'"]);
    }

    #[test]
    fn test_undefined_function() {
        let (errors, _) = analyze_src("func f(): int { return g(); }");
        assert_eq!(errors, vec!["Call to undefined function 'g'"]);
    }

    #[test]
    fn test_argument_checks() {
        let (errors, _) =
            analyze_src("func f(a: int): int { return a; }\nfunc g(): int { return f(1, 2); }");
        assert_eq!(errors, vec!["Argument count mismatch in call to 'f'"]);

        let (errors, _) =
            analyze_src("func f(a: int): int { return a; }\nfunc g(): int { return f(true); }");
        assert_eq!(
            errors,
            vec!["Argument 1 type mismatch in call to 'f': expected int, got bool"]
        );

        // int arguments widen to float parameters
        expect_clean("func f(a: float): float { return a; }\nfunc g(): float { return f(1); }");
    }

    #[test]
    fn test_operator_typing() {
        let (errors, _) = analyze_src("func f(): int { return 1 + true; }");
        assert_eq!(errors, vec!["Invalid operand type for arithmetic operator '+'"]);

        let (errors, _) = analyze_src("func f(): bool { return 1 < true; }");
        assert_eq!(errors, vec!["Invalid operand type for relational operator '<'"]);

        let (errors, _) = analyze_src("func f(): int { return -true; }");
        assert_eq!(errors, vec!["Invalid operand type for unary '-' on boolean"]);

        // logical operators accept anything coercible
        expect_clean("func f(): bool { return 1 && 2.5; }");
    }

    #[test]
    fn test_bool_numeric_comparison_warns() {
        let (errors, warnings) = analyze_src("func f(): bool { return 1 == true; }");
        assert!(errors.is_empty());
        assert_eq!(warnings, vec!["Comparison between boolean and numeric in '=='"]);

        // both sides boolean is fine
        expect_clean("func f(): bool { return true != false; }");
    }

    #[test]
    fn test_return_checks() {
        let (errors, _) = analyze_src("func f(): int { return true; }");
        assert_eq!(
            errors,
            vec!["Return type mismatch: function expects int, returned bool"]
        );

        let (errors, _) = analyze_src("func f(): int { return; }");
        assert_eq!(
            errors,
            vec!["Missing return value in function that declares return type 'int'"]
        );

        // int return widens to a float function
        expect_clean("func f(): float { return 1; }");
    }

    #[test]
    fn test_assignment_checks() {
        let (errors, _) = analyze_src("func f(): int { y = 1; return 0; }");
        assert_eq!(errors, vec!["Assignment to undeclared variable 'y'"]);

        let (errors, _) = analyze_src("func f(): int { var a: int = 0; a = true; return a; }");
        assert_eq!(
            errors,
            vec!["Type mismatch in assignment to 'a': expected int, got bool"]
        );

        // assigning to a declared global from inside a function is fine
        expect_clean("var g: float = 0.0;\nfunc f(): int { g = 1; return 0; }");
    }

    #[test]
    fn test_hoisted_declarations() {
        // a body-level declaration is visible before its textual position
        expect_clean("func f(): int { s = 1; var s: int = 0; return s; }");
    }

    #[test]
    fn test_parameter_and_shadowing_diagnostics() {
        let (errors, _) = analyze_src("func f(a: int, a: int): int { return a; }");
        assert_eq!(errors, vec!["Duplicate parameter name 'a' in function 'f'"]);

        let (errors, warnings) = analyze_src("func f(a: int): int { var a: int = 1; return a; }");
        assert!(errors.is_empty());
        assert_eq!(warnings, vec!["Shadowing/redeclaration of 'a' in function 'f'"]);
    }

    #[test]
    fn test_nested_redeclaration_is_an_error() {
        let (errors, _) = analyze_src(
            "func f(): int { var a: int = 0; if (true) { var a: int = 1; } return a; }",
        );
        assert_eq!(errors, vec!["Redeclaration of variable 'a' in function"]);

        let (errors, _) = analyze_src(
            "func f(): int { var i: int = 0; for (var i: int = 0; i < 1; i = i + 1) { } return i; }",
        );
        assert_eq!(errors, vec!["Redeclaration of variable 'i' in for-loop"]);
    }

    #[test]
    fn test_top_level_statements_are_not_analyzed() {
        // failures in top-level non-declaration statements are runtime
        // territory, not static errors
        let (errors, _) = analyze_src("print y;");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_print_call_infers_none() {
        // `print` used as a statement is the intrinsic; its argument is
        // still inferred
        let (errors, _) = analyze_src("func f(): int { print z; return 0; }");
        assert_eq!(errors, vec!["Undefined identifier 'z'"]);
    }
}
