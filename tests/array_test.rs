mod common;
use common::*;

#[test]
fn test_one_dimension() {
    let s = "DIM A(3)\nFOR I = 0 TO 3\nA(I) = I * I\nNEXT\nPRINT A(3); A(0)";
    assert_eq!(exec(s), "90\n");
}

#[test]
fn test_two_dimensions() {
    assert_eq!(exec("DIM B(2, 2)\nB(1, 2) = 7\nPRINT B(1, 2); B(2, 1)"), "70\n");
}

#[test]
fn test_arrays_hold_any_value() {
    assert_eq!(exec("DIM N(1)\nN(0) = \"X\"\nPRINT N(0); N(1)"), "X0\n");
}

#[test]
fn test_subscript_out_of_range() {
    assert_eq!(exec("DIM A(3)\nA(4) = 1"), "SUBSCRIPT OUT OF RANGE IN 2 (9..10)\n");
    assert!(exec("DIM A(3)\nPRINT A(-1)").starts_with("SUBSCRIPT OUT OF RANGE IN 2"));
    assert!(exec("DIM A(2, 2)\nPRINT A(1)").ends_with("WRONG NUMBER OF SUBSCRIPTS\n"));
}

#[test]
fn test_undimensioned_array() {
    assert_eq!(exec("A(1) = 2"), "UNDEFINED ARRAY IN 1 (0..1)\n");
}

#[test]
fn test_redimension() {
    assert_eq!(exec("DIM A(1)\nDIM A(2)"), "REDIMENSIONED ARRAY IN 2 (13..14)\n");
}

#[test]
fn test_dim_needs_bounds() {
    assert!(exec("DIM A").ends_with("NOT AN ARRAY\n"));
}
