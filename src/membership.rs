//! Membership curves over a discretized domain.
//!
//! Each [`Shape`] maps a parameter list onto a curve with one degree per
//! domain sample. Degrees are always clipped to `[0, 1]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// `[center, width]`
    Gaussian,
    /// `[a, b, c]` with `a <= b <= c`, peak at `b`
    Triangle,
    /// `[a, b, c, d]` with `a <= b <= c <= d`, plateau over `[b, c]`
    Trapezoid,
}

impl Shape {
    pub fn arity(self) -> usize {
        match self {
            Self::Gaussian => 2,
            Self::Triangle => 3,
            Self::Trapezoid => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Triangle => "triangle",
            Self::Trapezoid => "trapezoid",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" | "gaussmf" => Ok(Self::Gaussian),
            "triangle" | "triangular" | "trimf" => Ok(Self::Triangle),
            "trapezoid" | "trapezoidal" | "trapmf" => Ok(Self::Trapezoid),
            _ => Err(Error::InvalidShape { shape: s.to_owned() }),
        }
    }
}

/// One `(term name, shape, params)` declaration for a variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembershipFunc {
    pub term: String,
    pub shape: Shape,
    pub params: Vec<f64>,
}

impl MembershipFunc {
    pub fn new(term: impl Into<String>, shape: Shape, params: impl Into<Vec<f64>>) -> Self {
        Self {
            term: term.into(),
            shape,
            params: params.into(),
        }
    }

    /// Like [`MembershipFunc::new`] but with the shape given as a keyword.
    pub fn parse(term: impl Into<String>, shape: &str, params: impl Into<Vec<f64>>) -> Result<Self> {
        Ok(Self::new(term, shape.parse()?, params))
    }

    pub fn build(&self, domain: &[f64]) -> Result<Vec<f64>> {
        build(domain, self.shape, &self.params)
    }
}

/// Computes the membership curve of `shape` over `domain`.
pub fn build(domain: &[f64], shape: Shape, params: &[f64]) -> Result<Vec<f64>> {
    validate(shape, params)?;

    let curve = domain.iter().map(|&x| {
        let y = match *params {
            [center, width] => gaussian(x, center, width),
            [a, b, c] => triangle(x, a, b, c),
            [a, b, c, d] => trapezoid(x, a, b, c, d),
            _ => unreachable!("arity checked by validate"),
        };

        y.clamp(0., 1.)
    });

    Ok(curve.collect())
}

fn validate(shape: Shape, params: &[f64]) -> Result<()> {
    let invalid = |reason: String| Error::InvalidParameter {
        shape,
        params: params.to_vec(),
        reason,
    };

    if params.len() != shape.arity() {
        return Err(invalid(format!(
            "expected {} parameters, got {}",
            shape.arity(),
            params.len()
        )));
    }
    if params.iter().any(|p| !p.is_finite()) {
        return Err(invalid("parameters must be finite".into()));
    }

    match shape {
        Shape::Gaussian if params[1] <= 0. => Err(invalid("width must be positive".into())),
        Shape::Gaussian => Ok(()),
        Shape::Triangle | Shape::Trapezoid if params.windows(2).any(|w| w[0] > w[1]) => {
            Err(invalid("parameters must be non-decreasing".into()))
        },
        Shape::Triangle | Shape::Trapezoid => Ok(()),
    }
}

fn gaussian(x: f64, center: f64, width: f64) -> f64 {
    (-(x - center).powi(2) / (2. * width.powi(2))).exp()
}

// Degenerate edges (a == b or b == c) become vertical shoulders
fn triangle(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x == b {
        1.
    } else if a < x && x < b {
        (x - a) / (b - a)
    } else if b < x && x < c {
        (c - x) / (c - b)
    } else {
        0.
    }
}

fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if x < b {
        triangle(x, a, b, b)
    } else {
        triangle(x, c, c, d)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::linspace::universe;

    #[test]
    fn test_gaussian() {
        let domain = [0., 3., 6.3];
        let curve = build(&domain, Shape::Gaussian, &[3., 3.3]).unwrap();

        assert_abs_diff_eq!(curve[1], 1.);
        assert_abs_diff_eq!(curve[0], (-9f64 / 21.78).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve[2], (-0.5f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_triangle() {
        let domain = universe(0. ..=10., 1.);
        let curve = build(&domain, Shape::Triangle, &[2., 5., 8.]).unwrap();

        assert_eq!(curve[2], 0.);
        assert_abs_diff_eq!(curve[3], 1. / 3., epsilon = 1e-12);
        assert_eq!(curve[5], 1.);
        assert_abs_diff_eq!(curve[7], 1. / 3., epsilon = 1e-12);
        assert_eq!(curve[8], 0.);
        assert_eq!(curve[10], 0.);
    }

    #[test]
    fn test_triangle_right_shoulder() {
        let domain = universe(0. ..=10., 0.5);
        let curve = build(&domain, Shape::Triangle, &[8., 15., 15.]).unwrap();

        assert_eq!(curve[16], 0.);
        assert_abs_diff_eq!(curve[20], 2. / 7., epsilon = 1e-12);
        assert_eq!(build(&[15.], Shape::Triangle, &[8., 15., 15.]).unwrap(), vec![1.]);
    }

    #[test]
    fn test_trapezoid() {
        let domain = universe(0. ..=10., 0.5);
        let no = build(&domain, Shape::Trapezoid, &[0., 0., 4., 6.]).unwrap();
        let yes = build(&domain, Shape::Trapezoid, &[4., 6., 10., 10.]).unwrap();

        assert_eq!(no[0], 1.);
        assert_eq!(no[8], 1.);
        assert_abs_diff_eq!(no[10], 0.5);
        assert_eq!(no[12], 0.);
        assert_eq!(yes[8], 0.);
        assert_abs_diff_eq!(yes[9], 0.25);
        assert_eq!(yes[12], 1.);
        assert_eq!(yes[20], 1.);
    }

    #[test]
    fn test_invalid_shape() {
        assert_eq!(
            "bell".parse::<Shape>(),
            Err(Error::InvalidShape { shape: "bell".into() })
        );
        assert_eq!("TRIMF".parse::<Shape>(), Ok(Shape::Triangle));
    }

    #[test]
    fn test_invalid_parameters() {
        let domain = [0., 1.];

        assert!(matches!(
            build(&domain, Shape::Triangle, &[1., 2.]),
            Err(Error::InvalidParameter { shape: Shape::Triangle, .. })
        ));
        assert!(matches!(
            build(&domain, Shape::Trapezoid, &[0., 3., 2., 4.]),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            build(&domain, Shape::Gaussian, &[0., 0.]),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            build(&domain, Shape::Gaussian, &[f64::NAN, 1.]),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_membership_func_parse() {
        let mf = MembershipFunc::parse("normal", "gaussian", [3., 3.3]).unwrap();

        assert_eq!(mf, MembershipFunc::new("normal", Shape::Gaussian, vec![3., 3.3]));
        assert!(MembershipFunc::parse("odd", "sigmoid", [1.]).is_err());
    }
}
