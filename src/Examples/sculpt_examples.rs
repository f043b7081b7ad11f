// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::numerical::deformation::kernel_deformer::ParametricCurve;
use crate::numerical::geometry::Point3;
use crate::numerical::optimization::poly_fitting::PolynomialFitter1D;
use crate::numerical::optimization::surface_fitting::PolynomialFitter2D;
use crate::numerical::sampling::{fitting_data_from_expression, sample_explicit, split_segments};
use crate::numerical::session::{CommitOutcome, CurveEditSession, SurfaceEditSession};
use crate::symbolic::expression::{ExpressionCompiler, FailureValue};
use crate::Utils::config::SculptConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn sculpt_examples(example: usize) {
    let config = SculptConfig::default();
    match example {
        0 => {
            // COMPILE AND SAMPLE A FORMULA
            let compiler = ExpressionCompiler::new(&["x"], FailureValue::Undefined);
            let expression = compiler.compile("y = ln(x^2 - 1)");
            println!("compiled {} -> {}", expression.source(), expression.pretty());
            let Ok(domain) = config.domain() else { return };
            match sample_explicit(&expression, &domain, config.curve_samples) {
                Ok(points) => {
                    let segments = split_segments(&points);
                    println!(
                        "{} samples form {} visible segments",
                        points.len(),
                        segments.len()
                    );
                }
                Err(e) => println!("sampling failed: {}", e),
            }
            // a broken formula still evaluates, to the failure value
            let broken = compiler.compile("sin(x");
            println!("'{}': {:?}, value {}", broken.source(), broken.error(), broken.eval(&[1.0]));
        }
        1 => {
            // FIT A POLYNOMIAL TO NOISY DATA
            let mut rng = StdRng::seed_from_u64(42);
            let x: Vec<f64> = (0..40).map(|i| -3.0 + 6.0 * i as f64 / 39.0).collect();
            let y: Vec<f64> = x
                .iter()
                .map(|x| 0.5 * x.powi(3) - 2.0 * x + rng.random_range(-0.05..0.05))
                .collect();
            for degree in [1, 3, 5] {
                match PolynomialFitter1D::new(degree).fit(&x, &y) {
                    Ok(fit) => println!("{}", fit.report("x")),
                    Err(e) => println!("degree {} failed: {}", degree, e),
                }
            }
            // refit a transcendental formula as a polynomial
            let cosine = ExpressionCompiler::new(&["x"], FailureValue::Undefined).compile("cos(x)");
            if let Ok(domain) = config.domain() {
                let (xs, ys) = fitting_data_from_expression(&cosine, &domain, 100);
                if let Ok(fit) = config.curve_fitter().fit(&xs, &ys) {
                    println!("cos(x) ~ {}", fit.to_expression_string("x"));
                }
            }
        }
        2 => {
            // FIT A SURFACE
            let mut rng = StdRng::seed_from_u64(7);
            let points: Vec<Point3> = (0..60)
                .map(|_| {
                    let x = rng.random_range(-2.0..2.0);
                    let y = rng.random_range(-2.0..2.0);
                    Point3::new(x, y, x * x - y * y + 0.5 * x * y)
                })
                .collect();
            match PolynomialFitter2D::new(2).fit(&points) {
                Ok(fit) => println!("{}", fit.report()),
                Err(e) => println!("surface fit failed: {}", e),
            }
            match PolynomialFitter2D::new(3).fit(&points[..5]) {
                Ok(_) => println!("unexpected fit from 5 points"),
                Err(e) => println!("as expected: {}", e),
            }
        }
        3 => {
            // DRAG A CURVE AND COMMIT THE RESULT AS TEXT
            let curve = ParametricCurve::new("t", "cos(t)", "sin(t)", "0.2*t");
            let mut session = match CurveEditSession::from_config(curve, &config) {
                Ok(session) => session,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let a = session.add_marker(0.0);
            session.add_marker(1.5);
            let c = session.add_marker(3.0);
            session.move_marker(a, Point3::new(1.4, 0.2, 0.0));
            session.move_marker(c, Point3::new(-1.5, 0.6, 1.5));
            println!("preview at t = 0.75: {:?}", session.preview_point(0.75));
            match session.release() {
                CommitOutcome::Committed(text) => {
                    println!("x(t) = {}\ny(t) = {}\nz(t) = {}", text.x, text.y, text.z)
                }
                CommitOutcome::Unchanged => println!("nothing to commit"),
            }
            println!("stored at t = 0.75: {:?}", session.current().eval(0.75));
        }
        4 => {
            // PULL A SURFACE AND REFIT IT
            let mut session = match SurfaceEditSession::from_config("x^2 - y^2", &config) {
                Ok(session) => session,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            let mut ids = Vec::new();
            for x in [-1.0, 0.0, 1.0] {
                for y in [-1.0, 0.0, 1.0] {
                    ids.push(session.add_marker(x, y));
                }
            }
            session.move_marker(ids[4], Point3::new(0.0, 0.0, 0.8));
            match session.release() {
                Ok(fit) => println!("{}", fit.report()),
                Err(e) => println!("refit rejected: {}", e),
            }
            println!("z = {}", session.current().source());
        }
        _ => println!("no example {}", example),
    }
}
