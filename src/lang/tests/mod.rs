use super::ast::*;
use super::*;

mod parse_test;
