//! expression text to symbolic tree to Rust closure
/// nom parser of expression text, `y = rhs` is accepted and reduced to `rhs`
pub mod parse_expr;
/// symbolic expression tree with minimally parenthesised Display
pub mod symbolic_engine;
/// turns a symbolic expression into a thread-safe closure over ordered variables
pub mod symbolic_lambdify;
/// compiled expression with an explicit failure value
pub mod expression;
/// bracket helpers and linspace
pub mod utils;
