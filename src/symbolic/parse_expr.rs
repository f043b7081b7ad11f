use crate::errors::SculptError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{brackets_balanced, strip_lhs};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, cut, map, map_res, opt, recognize},
    error::{ErrorKind, FromExternalError, ParseError},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedSculpt::symbolic::parse_expr::parse_expression_func;
/// let parsed = parse_expression_func("y = x^2 - 2*sin(x)").unwrap();
/// println!("parsed expression {}", parsed);
/// ```
//  grammar, lowest binding first:
//      sum     := product (('+' | '-') product)*
//      product := unary (('*' | '/') unary)*
//      unary   := ('-' | '+') unary | power
//      power   := atom ('^' unary)?            right associative, binds tighter than unary minus
//      atom    := number | function '(' sum ')' | constant | variable | '(' sum ')'

/// parser error carrying the unparsed rest of the input and a readable message
#[derive(Debug, Clone, PartialEq)]
pub struct ExprParseError<'a> {
    pub rest: &'a str,
    pub message: String,
}

impl<'a> ExprParseError<'a> {
    fn new(rest: &'a str, message: impl Into<String>) -> Self {
        ExprParseError {
            rest,
            message: message.into(),
        }
    }
}

impl<'a> ParseError<&'a str> for ExprParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Eof => "unexpected trailing input".to_string(),
            ErrorKind::Char => "expected bracket or operator".to_string(),
            _ => "syntax error".to_string(),
        };
        ExprParseError::new(input, message)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E2> FromExternalError<&'a str, E2> for ExprParseError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, _e: E2) -> Self {
        ExprParseError::new(input, "malformed number")
    }
}

type PResult<'a, O> = IResult<&'a str, O, ExprParseError<'a>>;

fn function_builder(name: &str) -> Option<fn(Box<Expr>) -> Expr> {
    let builder: fn(Box<Expr>) -> Expr = match name {
        "exp" => Expr::Exp,
        "ln" | "log" => Expr::Ln,
        "sqrt" => Expr::Sqrt,
        "abs" => Expr::Abs,
        "sin" => Expr::sin,
        "cos" => Expr::cos,
        "tan" | "tg" => Expr::tg,
        "cot" | "ctg" => Expr::ctg,
        "asin" | "arcsin" => Expr::arcsin,
        "acos" | "arccos" => Expr::arccos,
        "atan" | "arctan" | "arctg" => Expr::arctg,
        "acot" | "arccot" | "arcctg" => Expr::arcctg,
        "sinh" => Expr::sinh,
        "cosh" => Expr::cosh,
        "tanh" => Expr::tanh,
        _ => return None,
    };
    Some(builder)
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Const(val) => Expr::Const(-val),
        other => -other,
    }
}

/// 12, 1.5, .5, 2e-3
fn number(input: &str) -> PResult<'_, f64> {
    map_res(recognize_float, |s: &str| s.parse::<f64>()).parse(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn function_or_name(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (after_ws, _) = multispace0(rest)?;
    if after_ws.starts_with('(') {
        let Some(build) = function_builder(name) else {
            return Err(nom::Err::Failure(ExprParseError::new(
                input,
                format!("unknown function '{}'", name),
            )));
        };
        let (rest, arg) =
            cut(delimited(char('('), sum, preceded(multispace0, char(')')))).parse(after_ws)?;
        return Ok((rest, build(arg.boxed())));
    }
    let expr = match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

fn atom(input: &str) -> PResult<'_, Expr> {
    preceded(
        multispace0,
        alt((
            map(number, Expr::Const),
            function_or_name,
            delimited(char('('), sum, preceded(multispace0, char(')'))),
        )),
    )
    .parse(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = atom(input)?;
    let (input, exponent) = opt(preceded((multispace0, char('^')), unary)).parse(input)?;
    match exponent {
        Some(exponent) => Ok((input, base.pow(exponent))),
        None => Ok((input, base)),
    }
}

fn unary(input: &str) -> PResult<'_, Expr> {
    preceded(
        multispace0,
        alt((
            map(preceded(char('-'), unary), negate),
            preceded(char('+'), unary),
            power,
        )),
    )
    .parse(input)
}

fn product(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(preceded(multispace0, one_of("*/")), unary)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

fn sum(input: &str) -> PResult<'_, Expr> {
    let (input, first) = product(input)?;
    let (input, rest) = many0(pair(preceded(multispace0, one_of("+-")), product)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

/// Parses expression text into `Expr`. Text of the form `lhs = rhs` is reduced to `rhs`.
pub fn parse_expression_func(input: &str) -> Result<Expr, SculptError> {
    let rhs = strip_lhs(input);
    if rhs.is_empty() {
        return Err(SculptError::parse(input, "empty expression"));
    }
    if !brackets_balanced(rhs) {
        return Err(SculptError::parse(input, "unbalanced brackets"));
    }
    match all_consuming(delimited(multispace0, sum, multispace0)).parse(rhs) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let message = if e.rest.trim().is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!(
                    "{} at position {}: '{}'",
                    e.message,
                    rhs.len() - e.rest.len(),
                    e.rest.trim()
                )
            };
            Err(SculptError::parse(input, message))
        }
        Err(nom::Err::Incomplete(_)) => Err(SculptError::parse(input, "incomplete input")),
    }
}

impl Expr {
    /// parse expression text, see `parse_expression_func`
    pub fn parse_expression(input: &str) -> Result<Expr, SculptError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_func(".5").unwrap(), Expr::Const(0.5));
        assert_eq!(parse_expression_func("2e-3").unwrap(), Expr::Const(0.002));
    }

    #[test]
    fn test_parse_trailing_decimal() {
        assert_eq!(parse_expression_func("1.5").unwrap(), Expr::Const(1.5));
        assert_eq!(parse_expression_func("0.25").unwrap(), Expr::Const(0.25));
        assert_eq!(parse_expression_func("1.").unwrap(), Expr::Const(1.0));
        assert_eq!(
            parse_expression_func("x + 0.25").unwrap(),
            var("x") + Expr::Const(0.25)
        );
        assert_eq!(
            parse_expression_func("x*0.25").unwrap(),
            var("x") * Expr::Const(0.25)
        );
        assert_eq!(
            parse_expression_func("y = x^2 - 0.75").unwrap().to_string(),
            "x^2 - 0.75"
        );
    }

    #[test]
    fn test_parse_named_constants() {
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::Const(PI));
        assert_eq!(parse_expression_func("e").unwrap(), Expr::Const(E));
        // identifiers merely starting with a constant name are variables
        assert_eq!(parse_expression_func("pix").unwrap(), var("pix"));
    }

    #[test]
    fn test_parse_left_associative_sum() {
        let x = var("x");
        let expected = x.clone().pow(Expr::Const(2.0)) - x - Expr::Const(1.0);
        assert_eq!(parse_expression_func("x^2 - x - 1").unwrap(), expected);
    }

    #[test]
    fn test_parse_precedence() {
        let (x, y, z) = symbols!(x, y, z);
        let expected = x + y * z.pow(Expr::Const(2.0));
        assert_eq!(parse_expression_func("x + y*z^2").unwrap(), expected);
    }

    #[test]
    fn test_parse_power_right_associative() {
        let expected = Expr::Const(2.0).pow(Expr::Const(3.0).pow(Expr::Const(2.0)));
        assert_eq!(parse_expression_func("2^3^2").unwrap(), expected);
    }

    #[test]
    fn test_parse_unary_minus_binds_looser_than_power() {
        let x = var("x");
        assert_eq!(
            parse_expression_func("-x^2").unwrap(),
            -(x.pow(Expr::Const(2.0)))
        );
        assert_eq!(parse_expression_func("-3").unwrap(), Expr::Const(-3.0));
    }

    #[test]
    fn test_parse_functions_and_aliases() {
        let x = var("x");
        assert_eq!(parse_expression_func("sin(x)").unwrap(), Expr::sin(x.clone().boxed()));
        assert_eq!(parse_expression_func("tan(x)").unwrap(), Expr::tg(x.clone().boxed()));
        assert_eq!(parse_expression_func("log(x)").unwrap(), Expr::Ln(x.clone().boxed()));
        assert_eq!(
            parse_expression_func("sqrt( x )").unwrap(),
            Expr::Sqrt(x.clone().boxed())
        );
        assert_eq!(
            parse_expression_func("sin(cos(x))").unwrap(),
            Expr::sin(Expr::cos(x.boxed()).boxed())
        );
    }

    #[test]
    fn test_parse_strips_lhs() {
        let expected = parse_expression_func("t^2 + 1").unwrap();
        assert_eq!(parse_expression_func("y = t^2 + 1").unwrap(), expected);
    }

    #[test]
    fn test_parse_brackets() {
        let (x, y, z) = symbols!(x, y, z);
        assert_eq!(parse_expression_func("(x + y) * z").unwrap(), (x + y) * z);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_expression_func("(x +").is_err());
        assert!(parse_expression_func("(x + y").is_err());
        assert!(parse_expression_func("x +").is_err());
        assert!(parse_expression_func("").is_err());
        assert!(parse_expression_func("y = ").is_err());
        assert!(parse_expression_func("x y").is_err());
        let err = parse_expression_func("foo(x)").unwrap_err();
        assert!(err.to_string().contains("unknown function 'foo'"));
    }

    #[test]
    fn test_display_parses_back() {
        for text in [
            "x^2 - (y - 1)",
            "-(a + b)*c",
            "(-2)^x / (1 + x)",
            "exp(-((t - 0.5)/0.1)^2)",
            "2^-x",
        ] {
            let parsed = parse_expression_func(text).unwrap();
            let reparsed = parse_expression_func(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip of {}", text);
        }
    }
}
