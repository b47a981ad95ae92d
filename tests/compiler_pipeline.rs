use minicc::core::ast::{Outcome, StmtKind, VarType};
use minicc::core::compiler::compile_source;
use minicc::core::error::{CompileError, ErrorKind};
use minicc::core::parser::{Expected, MAX_NESTING, MAX_OPERATORS};
use minicc::core::render::render_tree;
use minicc::core::token::TokenKind;
use minicc::core::value::Value;

#[test]
fn pipeline_end_to_end_basic() {
    let out = compile_source("main { int x; x = 5; }").expect("compile should succeed");

    let kinds: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Main,
            TokenKind::LBrace,
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::IntegerNumber,
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ]
    );

    assert!(out.semantic_errors.is_empty());
    assert_eq!(out.symbols.len(), 1);
    let x = out.symbols.get_symbol("x").expect("x declared");
    assert_eq!(x.ty, VarType::Int);
    assert_eq!(x.value, Some(Value::Int(5)));
    assert_eq!(x.error, None);
}

#[test]
fn fractional_into_int_attaches_type_error() {
    let out = compile_source("main { int x; x = 5.5; }").unwrap();

    assert_eq!(out.semantic_errors.len(), 1);
    assert_eq!(out.semantic_errors[0].kind, ErrorKind::TypeError);

    let x = out.symbols.get_symbol("x").unwrap();
    assert_eq!(x.error, Some(ErrorKind::TypeError));
    assert_eq!(x.value, None);

    let assignment = &out.program.items[1];
    assert!(matches!(assignment.kind, StmtKind::Assignment { .. }));
    assert_eq!(assignment.errors.len(), 1);
    assert_eq!(assignment.errors[0].kind, ErrorKind::TypeError);
}

#[test]
fn undefined_right_hand_side_is_a_name_error() {
    let out = compile_source("main { int x; x = y; }").unwrap();

    assert_eq!(out.semantic_errors.len(), 1);
    assert_eq!(out.semantic_errors[0].kind, ErrorKind::NameError);
    assert!(out.semantic_errors[0].message.contains("'y'"));
    assert_eq!(out.symbols.get_symbol("x").unwrap().error, Some(ErrorKind::NameError));
    assert!(!out.symbols.is_declared("y"));
}

#[test]
fn int_only_program_keeps_types_and_values() {
    let src = "main {\n  int a, b, c;\n  a = 10;\n  b = a - 4;\n  c = a * b % 7;\n}";
    let out = compile_source(src).unwrap();
    assert!(out.is_clean(), "{:?}", out.semantic_errors);

    let got: Vec<(&str, VarType, Option<Value>)> = out
        .symbols
        .get_symbols()
        .iter()
        .map(|(name, e)| (name.as_str(), e.ty, e.value))
        .collect();
    assert_eq!(
        got,
        vec![
            ("a", VarType::Int, Some(Value::Int(10))),
            ("b", VarType::Int, Some(Value::Int(6))),
            ("c", VarType::Int, Some(Value::Int(4))),
        ]
    );
}

#[test]
fn division_by_zero_never_panics() {
    let out = compile_source("main { float f; int i; f = 1.5 / 0; i = 8 % (2 - 2); }").unwrap();
    let kinds: Vec<ErrorKind> = out.semantic_errors.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::DivisionByZero, ErrorKind::DivisionByZero]);
    if let StmtKind::Assignment { target, .. } = &out.program.items[2].kind {
        assert_eq!(target.result, Some(Outcome::Error(ErrorKind::DivisionByZero)));
    } else {
        panic!("Expected assignment");
    }
}

#[test]
fn redeclaration_priority() {
    let src = "main {\n  double d;\n  int d;\n  int n;\n  float n;\n  n = 3;\n}";
    let out = compile_source(src).unwrap();

    let d = out.symbols.get_symbol("d").unwrap();
    assert_eq!(d.ty, VarType::Double);
    let n = out.symbols.get_symbol("n").unwrap();
    assert_eq!(n.ty, VarType::Float);
    assert_eq!(n.value, Some(Value::Float(3.0)));
    assert_eq!((d.declared_at, n.declared_at), (1, 2));

    let history: Vec<(&str, bool)> = out
        .symbols
        .redeclarations()
        .iter()
        .map(|r| (r.name.as_str(), r.upgraded))
        .collect();
    assert_eq!(history, vec![("d", false), ("n", true)]);
}

#[test]
fn negative_literals_evaluate() {
    let out = compile_source("main { int a; float b; a = -3 * -2; b = -0.5 + 1; }").unwrap();
    assert!(out.is_clean());
    assert_eq!(out.symbols.get_symbol("a").unwrap().value, Some(Value::Int(6)));
    assert_eq!(out.symbols.get_symbol("b").unwrap().value, Some(Value::Float(0.5)));
}

#[test]
fn syntax_error_has_no_tree() {
    let err = compile_source("main { int x; x = ; }").unwrap_err();
    match err {
        CompileError::Syntax { error, .. } => {
            assert_eq!(error.found, TokenKind::Semicolon);
            assert_eq!((error.line, error.column), (1, 19));
        }
        other => panic!("Expected syntax error, got {other}"),
    }
}

#[test]
fn comments_are_ignored() {
    let src = "main {\n  // counter\n  int k; /* starts\n at zero */ k = 0;\n}";
    let out = compile_source(src).unwrap();
    assert_eq!(out.symbols.get_symbol("k").unwrap().value, Some(Value::Int(0)));
    assert_eq!(out.program.items[1].line, 4);
}

#[test]
fn deepest_accepted_program_evaluates_and_renders() {
    let src = format!(
        "main {{ int x; {}x = (2) * 3{}; cout x;{} }}",
        "while (1) { ".repeat(MAX_NESTING - 1),
        " + 1".repeat(MAX_OPERATORS - 1),
        "}".repeat(MAX_NESTING - 1),
    );
    let out = compile_source(&src).unwrap();
    assert!(out.is_clean(), "{:?}", out.semantic_errors);
    let expected = 6 + (MAX_OPERATORS as i64 - 1);
    assert_eq!(out.symbols.get_symbol("x").unwrap().value, Some(Value::Int(expected)));
    let tree = render_tree(&out.program, 1);
    assert_eq!(tree.matches("While (Type: Loop").count(), MAX_NESTING - 1);
    assert!(tree.contains(&format!("Result: {expected}")));
}

#[test]
fn nesting_past_the_limit_is_a_syntax_error() {
    let src = format!("main {{ int x; x = {}1{}; }}", "(".repeat(10_000), ")".repeat(10_000));
    match compile_source(&src).unwrap_err() {
        CompileError::Syntax { error, .. } => {
            assert_eq!(error.found, TokenKind::LParen);
            assert_eq!(error.expected, Expected::ShallowerNesting);
        }
        other => panic!("Expected syntax error, got {other}"),
    }
}

#[test]
fn input_values_flow_without_name_errors() {
    let out = compile_source("main { int x, y; cin x; y = x + 1; cout y * 2; }").unwrap();
    assert!(out.is_clean(), "{:?}", out.semantic_errors);
    assert!(out.symbols.get_symbol("y").unwrap().unknown);
    let StmtKind::Output { expr } = &out.program.items[4].kind else {
        panic!("Expected output");
    };
    assert_eq!(expr.result, Some(Outcome::Unknown));
}
