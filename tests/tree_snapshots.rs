//! tests/tree_snapshots.rs
//! Snapshot of the annotated tree for a small program touching every statement form.

use minicc::core::compiler::compile_source;
use minicc::core::render::render_tree;

const PROGRAM: &str = "\
main {
  int i, total;
  total = 0;
  i = 1;
  while (i <= 3) {
    total = total + i;
    i++;
  }
  if (total > 5) {
    cout total;
  } else {
    cout 0;
  }
}
";

#[test]
fn annotated_tree_is_stable() {
    let out = compile_source(PROGRAM).expect("compiles");
    assert!(out.is_clean(), "{:?}", out.semantic_errors);
    let tree = render_tree(&out.program, 4);
    insta::assert_snapshot!(tree, @r"
    Program (Line: 1)
        Declaration (Type: int, Line: 2)
            Identifier (Type: int, Value: i, Line: 2)
        Declaration (Type: int, Line: 2)
            Identifier (Type: int, Value: total, Line: 2)
        Assignment (Value: =, Line: 3)
            Identifier (Type: int, Value: total, Result: 0, Line: 3)
            Number (Value: 0, Result: 0, Line: 3)
        Assignment (Value: =, Line: 4)
            Identifier (Type: int, Value: i, Result: 1, Line: 4)
            Number (Value: 1, Result: 1, Line: 4)
        While (Type: Loop, Line: 5)
            Comparison (Value: <=, Result: 1, State: True, Line: 5)
                Identifier (Type: int, Value: i, Result: 1, Line: 5)
                Number (Value: 3, Result: 3, Line: 5)
            Assignment (Value: =, Line: 6)
                Identifier (Type: int, Value: total, Result: 1, Line: 6)
                BinaryOp (Value: +, Result: 1, Line: 6)
                    Identifier (Type: int, Value: total, Result: 0, Line: 6)
                    Identifier (Type: int, Value: i, Result: 1, Line: 6)
            Increment (Value: ++, Line: 7)
                Identifier (Type: int, Value: i, Result: 2, Line: 7)
        If (Line: 9)
            Comparison (Value: >, Result: 0, State: False, Line: 9)
                Identifier (Type: int, Value: total, Result: 1, Line: 9)
                Number (Value: 5, Result: 5, Line: 9)
            TrueBranch (Line: 9)
                Output (Line: 10)
                    Identifier (Type: int, Value: total, Result: 1, Line: 10)
            FalseBranch (Line: 12)
                Output (Line: 12)
                    Number (Value: 0, Result: 0, Line: 12)
    ");
}

#[test]
fn rendering_is_deterministic() {
    let a = compile_source(PROGRAM).unwrap();
    let b = compile_source(PROGRAM).unwrap();
    assert_eq!(render_tree(&a.program, 2), render_tree(&b.program, 2));
    assert_eq!(render_tree(&a.program, 2), render_tree(&a.program, 2));
}
