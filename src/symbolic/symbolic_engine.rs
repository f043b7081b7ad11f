//! # Symbolic Engine Module
//!
//! Core symbolic expression type of the crate. A formula typed by the user is parsed
//! (see `parse_expr`) into an `Expr` tree, which is then
//! - compiled into an executable closure (`symbolic_lambdify`),
//! - printed back as human-readable text (`Display`),
//! - queried for the variables it depends on.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "t"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, etc. - mathematical functions
//!
//! Unary minus is stored as `Mul(Const(-1), expr)` so that the tree only ever has
//! binary arithmetic nodes; `Display` prints it back as `-expr`.
//!
//! ## Interesting Code Features
//!
//! 1. **Operator Overloading**: Implements std::ops traits (Add, Sub, Mul, Div, Neg) for
//!    natural mathematical syntax: `x + y * z`
//!
//! 2. **Precedence-aware printing**: `Display` only emits the parentheses required to
//!    parse the text back into an equivalent tree
//!
//! 3. **Non-standard Function Names**: Uses mathematical notation (tg, ctg, arctg) for the
//!    variants while the parser accepts both notations

#![allow(non_camel_case_types)]

use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedSculpt::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "t")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Square root
    Sqrt(Box<Expr>),
    /// Absolute value
    Abs(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    sinh(Box<Expr>),
    cosh(Box<Expr>),
    tanh(Box<Expr>),
}

// binding strength used by Display; higher binds tighter
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    /// if expression is a unary minus `(-1) * e` returns `e`
    pub fn negated_operand(&self) -> Option<&Expr> {
        match self {
            Expr::Mul(lhs, rhs) if **lhs == Expr::Const(-1.0) => Some(rhs),
            _ => None,
        }
    }

    /// name and argument of a function node, `None` for arithmetic nodes and leaves
    pub fn function_parts(&self) -> Option<(&'static str, &Expr)> {
        let parts = match self {
            Expr::Exp(e) => ("exp", e),
            Expr::Ln(e) => ("ln", e),
            Expr::Sqrt(e) => ("sqrt", e),
            Expr::Abs(e) => ("abs", e),
            Expr::sin(e) => ("sin", e),
            Expr::cos(e) => ("cos", e),
            Expr::tg(e) => ("tg", e),
            Expr::ctg(e) => ("ctg", e),
            Expr::arcsin(e) => ("arcsin", e),
            Expr::arccos(e) => ("arccos", e),
            Expr::arctg(e) => ("arctg", e),
            Expr::arcctg(e) => ("arcctg", e),
            Expr::sinh(e) => ("sinh", e),
            Expr::cosh(e) => ("cosh", e),
            Expr::tanh(e) => ("tanh", e),
            _ => return None,
        };
        Some((parts.0, parts.1.as_ref()))
    }

    fn precedence(&self) -> u8 {
        if self.negated_operand().is_some() {
            return PREC_UNARY;
        }
        match self {
            Expr::Const(val) if val.is_sign_negative() => PREC_UNARY,
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_binary(
        f: &mut fmt::Formatter,
        lhs: &Expr,
        op: &str,
        rhs: &Expr,
        lhs_prec: u8,
        rhs_prec: u8,
    ) -> fmt::Result {
        lhs.fmt_operand(f, lhs_prec)?;
        write!(f, "{}", op)?;
        rhs.fmt_operand(f, rhs_prec)
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Emits only the parentheses needed for the text to parse back into the same tree,
/// e.g. `x^2 - (y - 1)`, `-(a + b)`, `(-2)^x`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(operand) = self.negated_operand() {
            write!(f, "-")?;
            return operand.fmt_operand(f, PREC_UNARY);
        }
        if let Some((name, arg)) = self.function_parts() {
            return write!(f, "{}({})", name, arg);
        }
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => Expr::fmt_binary(f, lhs, " + ", rhs, PREC_SUM, PREC_SUM),
            Expr::Sub(lhs, rhs) => Expr::fmt_binary(f, lhs, " - ", rhs, PREC_SUM, PREC_PRODUCT),
            Expr::Mul(lhs, rhs) => {
                Expr::fmt_binary(f, lhs, "*", rhs, PREC_PRODUCT, PREC_UNARY)
            }
            Expr::Div(lhs, rhs) => {
                Expr::fmt_binary(f, lhs, "/", rhs, PREC_PRODUCT, PREC_UNARY)
            }
            // right associative: the base needs brackets if it is itself a power
            Expr::Pow(base, exp) => Expr::fmt_binary(f, base, "^", exp, PREC_ATOM, PREC_UNARY),
            _ => unreachable!("function nodes are printed above"),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, t");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// true if expression is exactly Const(0.0)
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            other => other
                .function_parts()
                .is_some_and(|(_, arg)| arg.contains_variable(var_name)),
        }
    }

    /// sorted, deduplicated list of every variable name in the expression
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            other => {
                if let Some((_, arg)) = other.function_parts() {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, t) -> creates variables x, y, t
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
