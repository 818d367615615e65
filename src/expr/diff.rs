//! Symbolic differentiation.
//!
//! The rules are applied on the shared expression graph. Every distinct node is differentiated
//! only once per call (results are memoized by node identity), so repeated sub-trees such as the
//! principal indices inside the index ellipsoid do not blow up the work.
use std::collections::HashMap;

use super::{Expr, Node};
use crate::symbol::Symbol;

impl Expr {
    /// Partial derivative with respect to `var`.
    ///
    /// Differentiating a term that does not contain `var` yields the number `0`, which is folded
    /// away by the surrounding constructors.
    #[must_use]
    pub fn diff(&self, var: Symbol) -> Self {
        self.derive(var, &mut HashMap::new())
    }
    /// `order`-th partial derivative with respect to `var`. Order `0` returns the expression
    /// itself.
    #[must_use]
    pub fn diff_n(&self, var: Symbol, order: usize) -> Self {
        (0..order).fold(self.clone(), |e, _| e.diff(var))
    }
    fn derive(&self, var: Symbol, memo: &mut HashMap<usize, Self>) -> Self {
        if let Some(d) = memo.get(&self.addr()) {
            return d.clone();
        }
        let d = match self.node() {
            Node::Number(_) => Self::number(0.0),
            Node::Symbol(s) => Self::number(if *s == var { 1.0 } else { 0.0 }),
            Node::Add(a, b) => Self::add_expr(a.derive(var, memo), b.derive(var, memo)),
            Node::Sub(a, b) => Self::sub_expr(a.derive(var, memo), b.derive(var, memo)),
            Node::Neg(a) => Self::neg_expr(a.derive(var, memo)),
            Node::Mul(a, b) => {
                let da = a.derive(var, memo);
                let db = b.derive(var, memo);
                Self::add_expr(
                    Self::mul_expr(da, b.clone()),
                    Self::mul_expr(a.clone(), db),
                )
            }
            Node::Div(a, b) => {
                // (a/b)' = a'/b - a*b'/b^2
                let da = a.derive(var, memo);
                let db = b.derive(var, memo);
                Self::sub_expr(
                    Self::div_expr(da, b.clone()),
                    Self::div_expr(
                        Self::mul_expr(a.clone(), db),
                        Self::pow_expr(b.clone(), Self::number(2.0)),
                    ),
                )
            }
            Node::Pow(base, exponent) => {
                let db = base.derive(var, memo);
                let de = exponent.derive(var, memo);
                if de.is_zero() {
                    // d(u^v) = v * u^(v-1) * u'
                    let lowered = match exponent.as_number() {
                        Some(v) => Self::pow_expr(base.clone(), Self::number(v - 1.0)),
                        None => Self::pow_expr(
                            base.clone(),
                            Self::sub_expr(exponent.clone(), Self::number(1.0)),
                        ),
                    };
                    Self::mul_expr(Self::mul_expr(exponent.clone(), lowered), db)
                } else {
                    // d(u^v) = u^v * (v' ln(u) + v u'/u)
                    Self::mul_expr(
                        self.clone(),
                        Self::add_expr(
                            Self::mul_expr(de, base.clone().ln()),
                            Self::div_expr(Self::mul_expr(exponent.clone(), db), base.clone()),
                        ),
                    )
                }
            }
            Node::Sqrt(a) => {
                let da = a.derive(var, memo);
                Self::div_expr(da, Self::mul_expr(Self::number(2.0), self.clone()))
            }
            Node::Sin(a) => {
                let da = a.derive(var, memo);
                Self::mul_expr(a.clone().cos(), da)
            }
            Node::Cos(a) => {
                let da = a.derive(var, memo);
                Self::neg_expr(Self::mul_expr(a.clone().sin(), da))
            }
            Node::Atan(a) => {
                let da = a.derive(var, memo);
                Self::div_expr(
                    da,
                    Self::add_expr(
                        Self::number(1.0),
                        Self::pow_expr(a.clone(), Self::number(2.0)),
                    ),
                )
            }
            Node::Ln(a) => {
                let da = a.derive(var, memo);
                Self::div_expr(da, a.clone())
            }
        };
        memo.insert(self.addr(), d.clone());
        d
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{phi, temperature, theta, wl};
    use approx::assert_relative_eq;

    fn central_difference(e: &Expr, var: Symbol, args: [f64; 4]) -> f64 {
        let h = 1e-6;
        let mut lo = args;
        let mut hi = args;
        lo[var.position()] -= h;
        hi[var.position()] += h;
        (e.eval(&hi) - e.eval(&lo)) / (2.0 * h)
    }
    #[test]
    fn constants_and_symbols() {
        assert!(Expr::number(3.0).diff(Symbol::Wavelength).is_zero());
        assert!(wl().diff(Symbol::Wavelength).is_one());
        assert!(theta().diff(Symbol::Wavelength).is_zero());
    }
    #[test]
    fn constant_term_vanishes() {
        let e = 1e-5 * (temperature() - 20.0) + theta().cos();
        assert!(e.diff(Symbol::Wavelength).is_zero());
        assert!(e.diff_n(Symbol::Wavelength, 3).is_zero());
    }
    #[test]
    fn polynomial() {
        let e = 3.0 * wl().powi(3) - 2.0 * wl();
        let d = e.diff(Symbol::Wavelength);
        assert_relative_eq!(d.eval(&[2.0, 0.0, 0.0, 0.0]), 34.0);
        let d3 = e.diff_n(Symbol::Wavelength, 3);
        assert_relative_eq!(d3.eval(&[5.0, 0.0, 0.0, 0.0]), 18.0);
        assert!(e.diff_n(Symbol::Wavelength, 4).is_zero());
        assert_eq!(e.diff_n(Symbol::Wavelength, 0), e);
    }
    #[test]
    fn sellmeier_against_finite_difference() {
        let e = (2.7405 + 0.0184 / (wl().powi(2) - 0.0179) - 0.0155 * wl().powi(2)).sqrt();
        let d = e.diff(Symbol::Wavelength);
        let args = [0.8, 0.0, 0.0, 20.0];
        assert_relative_eq!(
            d.eval(&args),
            central_difference(&e, Symbol::Wavelength, args),
            max_relative = 1e-6
        );
    }
    #[test]
    fn trigonometric_and_atan() {
        let e = (theta().sin().powi(2) + 2.0 * theta().cos().powi(2)).sqrt().atan() * phi().sin();
        let args = [1.0, 0.3, 0.7, 0.0];
        for var in [Symbol::Theta, Symbol::Phi] {
            assert_relative_eq!(
                e.diff(var).eval(&args),
                central_difference(&e, var, args),
                max_relative = 1e-6
            );
        }
    }
    #[test]
    fn general_power_and_log() {
        let e = wl().pow(theta()) + wl().ln() + wl().powf(-3.5);
        let args = [1.3, 0.6, 0.0, 0.0];
        for var in [Symbol::Wavelength, Symbol::Theta] {
            assert_relative_eq!(
                e.diff(var).eval(&args),
                central_difference(&e, var, args),
                max_relative = 1e-6
            );
        }
    }
    #[test]
    fn quotient_rule() {
        let e = (wl() + 1.0) / (wl().powi(2) - 0.5);
        let args = [1.1, 0.0, 0.0, 0.0];
        assert_relative_eq!(
            e.diff(Symbol::Wavelength).eval(&args),
            central_difference(&e, Symbol::Wavelength, args),
            max_relative = 1e-6
        );
    }
    #[test]
    fn shared_subtrees_stay_shared() {
        let n = (2.37 + 0.0128 / (wl().powi(2) - 0.0156)).sqrt();
        let e = n.clone() * n.clone() / (n.clone() + n);
        let d3 = e.diff_n(Symbol::Wavelength, 3);
        assert!(d3.node_count() < 10_000);
    }
}
