//! Symbolic expressions of dispersion formulas.
//!
//! An [`Expr`] is an immutable, reference counted formula tree over the [`Symbol`]s of the
//! registry and numeric constants. Sub-trees are shared between expressions (cloning an [`Expr`]
//! only bumps a reference count), so derived expressions reuse the nodes of their source instead
//! of copying them.
//!
//! The constructors fold constants and drop neutral elements (`0 + x`, `1 * x`, `x ** 1`, ...).
//! This keeps derivative trees small: differentiating a constant term yields the number `0`
//! which then vanishes from the surrounding sums and products.
mod diff;

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::symbol::Symbol;

/// A single node of the formula tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// numeric constant
    Number(f64),
    /// one of the registry variables
    Symbol(Symbol),
    /// `a + b`
    Add(Expr, Expr),
    /// `a - b`
    Sub(Expr, Expr),
    /// `a * b`
    Mul(Expr, Expr),
    /// `a / b`
    Div(Expr, Expr),
    /// `a ** b`
    Pow(Expr, Expr),
    /// `-a`
    Neg(Expr),
    /// square root
    Sqrt(Expr),
    /// sine
    Sin(Expr),
    /// cosine
    Cos(Expr),
    /// arc tangent
    Atan(Expr),
    /// natural logarithm
    Ln(Expr),
}

/// Immutable symbolic expression.
#[derive(Debug, Clone)]
pub struct Expr(Arc<Node>);

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Expr {
    fn new(node: Node) -> Self {
        Self(Arc::new(node))
    }
    /// Create a numeric constant.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::new(Node::Number(value))
    }
    /// Create an expression consisting of a single symbol.
    #[must_use]
    pub fn symbol(symbol: Symbol) -> Self {
        Self::new(Node::Symbol(symbol))
    }
    /// Returns the top node of this expression.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.0
    }
    /// Returns the value if this expression is a numeric constant.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self.node() {
            Node::Number(v) => Some(*v),
            _ => None,
        }
    }
    /// Returns `true` if this expression is the constant `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|v| v == 0.0)
    }
    /// Returns `true` if this expression is the constant `1`.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|v| v == 1.0)
    }
    /// Address of the shared node. Used as identity of a sub-tree while walking an expression.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn add_expr(a: Self, b: Self) -> Self {
        match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Self::number(x + y),
            (Some(x), _) if x == 0.0 => b,
            (_, Some(y)) if y == 0.0 => a,
            _ => Self::new(Node::Add(a, b)),
        }
    }
    pub(crate) fn sub_expr(a: Self, b: Self) -> Self {
        match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Self::number(x - y),
            (_, Some(y)) if y == 0.0 => a,
            (Some(x), _) if x == 0.0 => Self::neg_expr(b),
            _ => Self::new(Node::Sub(a, b)),
        }
    }
    pub(crate) fn mul_expr(a: Self, b: Self) -> Self {
        match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Self::number(x * y),
            (Some(x), _) | (_, Some(x)) if x == 0.0 => Self::number(0.0),
            (Some(x), _) if x == 1.0 => b,
            (_, Some(y)) if y == 1.0 => a,
            (Some(x), _) if x == -1.0 => Self::neg_expr(b),
            (_, Some(y)) if y == -1.0 => Self::neg_expr(a),
            _ => Self::new(Node::Mul(a, b)),
        }
    }
    pub(crate) fn div_expr(a: Self, b: Self) -> Self {
        match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Self::number(x / y),
            (Some(x), _) if x == 0.0 => Self::number(0.0),
            (_, Some(y)) if y == 1.0 => a,
            _ => Self::new(Node::Div(a, b)),
        }
    }
    pub(crate) fn pow_expr(base: Self, exponent: Self) -> Self {
        match (base.as_number(), exponent.as_number()) {
            (Some(x), Some(y)) => Self::number(x.powf(y)),
            (_, Some(y)) if y == 0.0 => Self::number(1.0),
            (_, Some(y)) if y == 1.0 => base,
            (Some(x), _) if x == 1.0 => Self::number(1.0),
            _ => Self::new(Node::Pow(base, exponent)),
        }
    }
    pub(crate) fn neg_expr(a: Self) -> Self {
        match a.node() {
            Node::Number(x) => Self::number(-x),
            Node::Neg(inner) => inner.clone(),
            _ => Self::new(Node::Neg(a)),
        }
    }
    fn unary(self, fold: fn(f64) -> f64, node: fn(Self) -> Node) -> Self {
        match self.as_number() {
            Some(x) => Self::number(fold(x)),
            None => Self::new(node(self)),
        }
    }

    /// Square root of this expression.
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.unary(f64::sqrt, Node::Sqrt)
    }
    /// Sine of this expression.
    #[must_use]
    pub fn sin(self) -> Self {
        self.unary(f64::sin, Node::Sin)
    }
    /// Cosine of this expression.
    #[must_use]
    pub fn cos(self) -> Self {
        self.unary(f64::cos, Node::Cos)
    }
    /// Arc tangent of this expression.
    #[must_use]
    pub fn atan(self) -> Self {
        self.unary(f64::atan, Node::Atan)
    }
    /// Natural logarithm of this expression.
    #[must_use]
    pub fn ln(self) -> Self {
        self.unary(f64::ln, Node::Ln)
    }
    /// Raise this expression to an integer power.
    #[must_use]
    pub fn powi(self, n: i32) -> Self {
        Self::pow_expr(self, Self::number(f64::from(n)))
    }
    /// Raise this expression to a constant real power.
    #[must_use]
    pub fn powf(self, n: f64) -> Self {
        Self::pow_expr(self, Self::number(n))
    }
    /// Raise this expression to a symbolic power.
    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        Self::pow_expr(self, exponent)
    }

    /// Returns the direct operands of the top node.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self.node() {
            Node::Number(_) | Node::Symbol(_) => vec![],
            Node::Add(a, b)
            | Node::Sub(a, b)
            | Node::Mul(a, b)
            | Node::Div(a, b)
            | Node::Pow(a, b) => vec![a, b],
            Node::Neg(a)
            | Node::Sqrt(a)
            | Node::Sin(a)
            | Node::Cos(a)
            | Node::Atan(a)
            | Node::Ln(a) => vec![a],
        }
    }
    /// Checks whether the given symbol occurs anywhere in this expression.
    #[must_use]
    pub fn depends_on(&self, symbol: Symbol) -> bool {
        fn walk(e: &Expr, symbol: Symbol, seen: &mut HashSet<usize>) -> bool {
            if !seen.insert(e.addr()) {
                return false;
            }
            match e.node() {
                Node::Symbol(s) => *s == symbol,
                _ => e.children().into_iter().any(|c| walk(c, symbol, seen)),
            }
        }
        walk(self, symbol, &mut HashSet::new())
    }
    /// Returns all symbols occuring in this expression (sorted in argument order).
    #[must_use]
    pub fn free_symbols(&self) -> Vec<Symbol> {
        Symbol::ALL
            .into_iter()
            .filter(|s| self.depends_on(*s))
            .collect()
    }
    /// Replace every occurence of `symbol` by the constant `value`.
    ///
    /// The result is folded, so substituting all symbols yields a plain number.
    #[must_use]
    pub fn subs(&self, symbol: Symbol, value: f64) -> Self {
        fn walk(e: &Expr, symbol: Symbol, value: f64, memo: &mut HashMap<usize, Expr>) -> Expr {
            if let Some(done) = memo.get(&e.addr()) {
                return done.clone();
            }
            let mut w = |c: &Expr| walk(c, symbol, value, memo);
            let result = match e.node() {
                Node::Number(_) => e.clone(),
                Node::Symbol(s) if *s == symbol => Expr::number(value),
                Node::Symbol(_) => e.clone(),
                Node::Add(a, b) => Expr::add_expr(w(a), w(b)),
                Node::Sub(a, b) => Expr::sub_expr(w(a), w(b)),
                Node::Mul(a, b) => Expr::mul_expr(w(a), w(b)),
                Node::Div(a, b) => Expr::div_expr(w(a), w(b)),
                Node::Pow(a, b) => Expr::pow_expr(w(a), w(b)),
                Node::Neg(a) => Expr::neg_expr(w(a)),
                Node::Sqrt(a) => w(a).sqrt(),
                Node::Sin(a) => w(a).sin(),
                Node::Cos(a) => w(a).cos(),
                Node::Atan(a) => w(a).atan(),
                Node::Ln(a) => w(a).ln(),
            };
            memo.insert(e.addr(), result.clone());
            result
        }
        walk(self, symbol, value, &mut HashMap::new())
    }
    /// Number of distinct (shared) nodes of this expression.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn walk(e: &Expr, seen: &mut HashSet<usize>) {
            if seen.insert(e.addr()) {
                for c in e.children() {
                    walk(c, seen);
                }
            }
        }
        let mut seen = HashSet::new();
        walk(self, &mut seen);
        seen.len()
    }
    /// Structural hash of the expression.
    ///
    /// Two expressions with the same printed form (same structure, same coefficients) have the
    /// same fingerprint, independent of node identity.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.to_string().hash(&mut hasher);
        hasher.finish()
    }
    /// Evaluate the expression for the given argument values `(wl, theta, phi, T)` by walking
    /// the tree.
    ///
    /// This is the slow reference path. Repeated evaluations should use a
    /// [`CompiledEvaluator`](crate::lambdify::CompiledEvaluator).
    #[must_use]
    pub fn eval(&self, args: &[f64; crate::symbol::SYMBOL_COUNT]) -> f64 {
        match self.node() {
            Node::Number(v) => *v,
            Node::Symbol(s) => args[s.position()],
            Node::Add(a, b) => a.eval(args) + b.eval(args),
            Node::Sub(a, b) => a.eval(args) - b.eval(args),
            Node::Mul(a, b) => a.eval(args) * b.eval(args),
            Node::Div(a, b) => a.eval(args) / b.eval(args),
            Node::Pow(a, b) => a.eval(args).powf(b.eval(args)),
            Node::Neg(a) => -a.eval(args),
            Node::Sqrt(a) => a.eval(args).sqrt(),
            Node::Sin(a) => a.eval(args).sin(),
            Node::Cos(a) => a.eval(args).cos(),
            Node::Atan(a) => a.eval(args).atan(),
            Node::Ln(a) => a.eval(args).ln(),
        }
    }
    fn precedence(&self) -> u8 {
        match self.node() {
            Node::Add(..) | Node::Sub(..) => 1,
            Node::Mul(..) | Node::Div(..) => 2,
            Node::Neg(_) => 3,
            Node::Number(v) if v.is_sign_negative() => 3,
            Node::Pow(..) => 4,
            _ => 5,
        }
    }
    fn fmt_prec(&self, f: &mut std::fmt::Formatter<'_>, min: u8) -> std::fmt::Result {
        let prec = self.precedence();
        if prec < min {
            write!(f, "(")?;
        }
        match self.node() {
            Node::Number(v) => write!(f, "{v}")?,
            Node::Symbol(s) => write!(f, "{s}")?,
            Node::Add(a, b) => {
                a.fmt_prec(f, 1)?;
                write!(f, " + ")?;
                b.fmt_prec(f, 1)?;
            }
            Node::Sub(a, b) => {
                a.fmt_prec(f, 1)?;
                write!(f, " - ")?;
                b.fmt_prec(f, 2)?;
            }
            Node::Mul(a, b) => {
                a.fmt_prec(f, 2)?;
                write!(f, "*")?;
                b.fmt_prec(f, 2)?;
            }
            Node::Div(a, b) => {
                a.fmt_prec(f, 2)?;
                write!(f, "/")?;
                b.fmt_prec(f, 3)?;
            }
            Node::Pow(a, b) => {
                a.fmt_prec(f, 5)?;
                write!(f, "**")?;
                b.fmt_prec(f, 4)?;
            }
            Node::Neg(a) => {
                write!(f, "-")?;
                a.fmt_prec(f, 3)?;
            }
            Node::Sqrt(a) => write!(f, "sqrt({a})")?,
            Node::Sin(a) => write!(f, "sin({a})")?,
            Node::Cos(a) => write!(f, "cos({a})")?,
            Node::Atan(a) => write!(f, "atan({a})")?,
            Node::Ln(a) => write!(f, "ln({a})")?,
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_prec(f, 0)
    }
}
impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}
impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::symbol(symbol)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$ctor(self, rhs)
            }
        }
        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::$ctor(self.clone(), rhs.clone())
            }
        }
        impl $trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::$ctor(self, Expr::number(rhs))
            }
        }
        impl $trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$ctor(Expr::number(self), rhs)
            }
        }
    };
}
impl_binary_op!(Add, add, add_expr);
impl_binary_op!(Sub, sub, sub_expr);
impl_binary_op!(Mul, mul, mul_expr);
impl_binary_op!(Div, div, div_expr);

impl Neg for Expr {
    type Output = Self;
    fn neg(self) -> Self {
        Self::neg_expr(self)
    }
}
impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg_expr(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{phi, temperature, theta, wl};
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_folding() {
        assert_eq!((Expr::number(2.0) + 3.0).as_number(), Some(5.0));
        assert_eq!((2.0 * Expr::number(3.0)).as_number(), Some(6.0));
        assert_eq!(Expr::number(9.0).sqrt().as_number(), Some(3.0));
        assert_eq!((Expr::number(1.0) / 4.0).as_number(), Some(0.25));
        assert_eq!(Expr::number(2.0).powi(3).as_number(), Some(8.0));
    }
    #[test]
    fn neutral_elements() {
        let x = wl();
        assert_eq!(x.clone() + 0.0, x);
        assert_eq!(0.0 + x.clone(), x);
        assert_eq!(x.clone() * 1.0, x);
        assert_eq!(x.clone() - 0.0, x);
        assert_eq!(x.clone() / 1.0, x);
        assert_eq!(x.clone().powi(1), x);
        assert!((x.clone() * 0.0).is_zero());
        assert!((0.0 / x.clone()).is_zero());
        assert!(x.clone().powi(0).is_one());
        assert_eq!(-(-x.clone()), x);
        assert_eq!(0.0 - x.clone(), -x);
    }
    #[test]
    fn structural_equality() {
        let a = wl().powi(2) + theta().sin();
        let b = wl().powi(2) + theta().sin();
        assert_eq!(a, b);
        assert_ne!(a, wl().powi(2) + theta().cos());
    }
    #[test]
    fn depends_on() {
        let e = (wl().powi(2) - 0.0179).sqrt() + 1e-5 * (temperature() - 20.0);
        assert!(e.depends_on(Symbol::Wavelength));
        assert!(e.depends_on(Symbol::Temperature));
        assert!(!e.depends_on(Symbol::Theta));
        assert!(!e.depends_on(Symbol::Phi));
        assert_eq!(
            e.free_symbols(),
            vec![Symbol::Wavelength, Symbol::Temperature]
        );
        assert!(Expr::number(1.0).free_symbols().is_empty());
    }
    #[test]
    fn subs() {
        let e = wl().powi(2) * theta().cos() + phi();
        let e = e.subs(Symbol::Theta, 0.0);
        assert!(!e.depends_on(Symbol::Theta));
        let v = e.subs(Symbol::Wavelength, 2.0).subs(Symbol::Phi, 1.0);
        assert_eq!(v.as_number(), Some(5.0));
    }
    #[test]
    fn eval() {
        let e = (wl().powi(2) + theta()).sqrt() * phi().cos() - temperature() / 2.0;
        assert_abs_diff_eq!(
            e.eval(&[1.5, 0.75, 0.0, 4.0]),
            (1.5f64.powi(2) + 0.75).sqrt() - 2.0
        );
        let e = wl().atan() + wl().ln() + theta().sin();
        assert_abs_diff_eq!(
            e.eval(&[2.0, 0.5, 0.0, 0.0]),
            2.0f64.atan() + 2.0f64.ln() + 0.5f64.sin()
        );
    }
    #[test]
    fn node_count_shares_subtrees() {
        let inner = (wl().powi(2) - 0.0156).sqrt();
        let e = inner.clone() * inner.clone() + inner;
        // sqrt, sub, pow, wl, 2, 0.0156, mul, add
        assert_eq!(e.node_count(), 8);
    }
    #[test]
    fn fingerprint() {
        let a = (2.3730 + 0.0128 / (wl().powi(2) - 0.0156)).sqrt();
        let b = (2.3730 + 0.0128 / (wl().powi(2) - 0.0156)).sqrt();
        assert_eq!(a.fingerprint(), b.fingerprint());
        let c = (2.3730 + 0.0128 / (wl().powi(2) - 0.0157)).sqrt();
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(theta().fingerprint(), phi().fingerprint());
    }
    #[test]
    fn display() {
        let e = (2.3730 + 0.0128 / (wl().powi(2) - 0.0156)).sqrt();
        assert_eq!(format!("{e}"), "sqrt(2.373 + 0.0128/(wl**2 - 0.0156))");
        let e = -(wl() - theta()) * phi();
        assert_eq!(format!("{e}"), "-(wl - theta)*phi");
        let e = wl() - (theta() - phi());
        assert_eq!(format!("{e}"), "wl - (theta - phi)");
        let e = Expr::number(-1e-5) * temperature();
        assert_eq!(format!("{e}"), "-0.00001*T");
    }
}
