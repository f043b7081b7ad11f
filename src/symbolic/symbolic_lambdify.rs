use crate::errors::SculptError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

/// compiled form of an expression: arguments are passed in the order of the variable list
pub type LambdifiedFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions
    ///
    /// Converts the expression into a closure over `vars`: `f(&[x, y])` evaluates the
    /// expression with `vars[0] = x`, `vars[1] = y`. Fails if the expression uses a
    /// variable that is not listed.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2 + y").unwrap();
    /// let func = f.lambdify_borrowed_thread_safe(&["x", "y"]).unwrap();
    /// assert_eq!(func(&[3.0, 1.0]), 10.0);
    /// ```
    pub fn lambdify_borrowed_thread_safe(&self, vars: &[&str]) -> Result<LambdifiedFn, SculptError> {
        let unknown: Vec<String> = self
            .all_arguments_are_variables()
            .into_iter()
            .filter(|name| !vars.contains(&name.as_str()))
            .collect();
        if !unknown.is_empty() {
            return Err(SculptError::parse(
                &self.to_string(),
                format!(
                    "unknown variable(s) {}; expected one of {:?}",
                    unknown.join(", "),
                    vars
                ),
            ));
        }
        Ok(self.lambdify1(vars))
    }

    fn lambdify1(&self, vars: &[&str]) -> LambdifiedFn {
        match self {
            Expr::Var(name) => match vars.iter().position(|&x| x == name) {
                Some(index) => Box::new(move |args| args[index]),
                // unreachable after the check in lambdify_borrowed_thread_safe
                None => Box::new(|_| f64::NAN),
            },
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify1(vars);
                let rf = rhs.lambdify1(vars);
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify1(vars);
                let rf = rhs.lambdify1(vars);
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify1(vars);
                let rf = rhs.lambdify1(vars);
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify1(vars);
                let rf = rhs.lambdify1(vars);
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(b, e) => {
                let bf = b.lambdify1(vars);
                // integer exponents keep negative bases finite: (-2)^3 = -8
                if let Expr::Const(exp) = e.as_ref() {
                    let exp = *exp;
                    if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
                        let n = exp as i32;
                        return Box::new(move |args| bf(args).powi(n));
                    }
                }
                let ef = e.lambdify1(vars);
                Box::new(move |args| bf(args).powf(ef(args)))
            }
            Expr::Exp(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).ln())
            }
            Expr::Sqrt(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).sqrt())
            }
            Expr::Abs(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).abs())
            }
            Expr::sin(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).cos())
            }
            Expr::tg(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).tan())
            }
            Expr::ctg(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| 1.0 / f(args).tan())
            }
            Expr::arcsin(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).asin())
            }
            Expr::arccos(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).acos())
            }
            Expr::arctg(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).atan())
            }
            Expr::arcctg(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| PI / 2.0 - f(args).atan())
            }
            Expr::sinh(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).sinh())
            }
            Expr::cosh(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).cosh())
            }
            Expr::tanh(e) => {
                let f = e.lambdify1(vars);
                Box::new(move |args| f(args).tanh())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify_multivariable() {
        let expr = Expr::parse_expression("x^2 + y*sin(t)").unwrap();
        let f = expr.lambdify_borrowed_thread_safe(&["x", "y", "t"]).unwrap();
        assert_relative_eq!(f(&[3.0, 2.0, PI / 2.0]), 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_argument_order_follows_var_list() {
        let expr = Expr::parse_expression("x - y").unwrap();
        let f = expr.lambdify_borrowed_thread_safe(&["y", "x"]).unwrap();
        assert_eq!(f(&[1.0, 5.0]), 4.0);
    }

    #[test]
    fn test_lambdify_integer_power_of_negative_base() {
        let expr = Expr::parse_expression("x^3").unwrap();
        let f = expr.lambdify_borrowed_thread_safe(&["x"]).unwrap();
        assert_eq!(f(&[-2.0]), -8.0);
    }

    #[test]
    fn test_lambdify_rejects_unknown_variable() {
        let expr = Expr::parse_expression("x + q").unwrap();
        let err = expr.lambdify_borrowed_thread_safe(&["x"]).err().unwrap();
        assert!(err.to_string().contains("q"));
    }

    #[test]
    fn test_lambdify_trig_family() {
        let expr = Expr::parse_expression("ctg(x) + arcctg(x) + tanh(x)").unwrap();
        let f = expr.lambdify_borrowed_thread_safe(&["x"]).unwrap();
        let x: f64 = 0.7;
        let expected = 1.0 / x.tan() + (PI / 2.0 - x.atan()) + x.tanh();
        assert_relative_eq!(f(&[x]), expected, epsilon = 1e-12);
    }
}
