//! Lowering of an [`Expr`] graph into a flat register program.
use std::collections::HashMap;

use crate::expr::{Expr, Node};

/// Largest integer exponent that is evaluated with [`f64::powi`].
const MAX_POWI_EXPONENT: f64 = 64.0;

/// A single instruction of a compiled program.
///
/// Operands are indices of earlier instructions. The result of instruction `i` is stored in
/// register `i`, so every register is written exactly once per evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// load a constant
    Const(f64),
    /// load the argument at the given position `(wl, theta, phi, T)`
    Load(usize),
    /// `a + b`
    Add(usize, usize),
    /// `a - b`
    Sub(usize, usize),
    /// `a * b`
    Mul(usize, usize),
    /// `a / b`
    Div(usize, usize),
    /// `-a`
    Neg(usize),
    /// `a` raised to a small integer power
    PowI(usize, i32),
    /// `a` raised to a constant real power
    PowF(usize, f64),
    /// `a ** b`
    Pow(usize, usize),
    /// square root
    Sqrt(usize),
    /// sine
    Sin(usize),
    /// cosine
    Cos(usize),
    /// arc tangent
    Atan(usize),
    /// natural logarithm
    Ln(usize),
}

impl Instruction {
    /// Hashable identity of the value an instruction computes (value numbering).
    fn value_key(self) -> ValueKey {
        match self {
            Self::Const(v) => ValueKey::Const(v.to_bits()),
            Self::Load(p) => ValueKey::Load(p),
            Self::Add(a, b) => ValueKey::Binary(0, a.min(b), a.max(b)),
            Self::Mul(a, b) => ValueKey::Binary(1, a.min(b), a.max(b)),
            Self::Sub(a, b) => ValueKey::Binary(2, a, b),
            Self::Div(a, b) => ValueKey::Binary(3, a, b),
            Self::Pow(a, b) => ValueKey::Binary(4, a, b),
            Self::PowI(a, n) => ValueKey::Scaled(0, a, f64::from(n).to_bits()),
            Self::PowF(a, v) => ValueKey::Scaled(1, a, v.to_bits()),
            Self::Neg(a) => ValueKey::Unary(0, a),
            Self::Sqrt(a) => ValueKey::Unary(1, a),
            Self::Sin(a) => ValueKey::Unary(2, a),
            Self::Cos(a) => ValueKey::Unary(3, a),
            Self::Atan(a) => ValueKey::Unary(4, a),
            Self::Ln(a) => ValueKey::Unary(5, a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKey {
    Const(u64),
    Load(usize),
    Unary(u8, usize),
    Binary(u8, usize, usize),
    Scaled(u8, usize, u64),
}

/// Builds a register program from an expression graph.
///
/// Shared nodes are lowered once (memoized by node identity) and structurally identical
/// computations are merged by value numbering, so common subexpressions of the derivative trees
/// are evaluated only once.
#[derive(Default)]
pub struct Compiler {
    program: Vec<Instruction>,
    values: HashMap<ValueKey, usize>,
    lowered: HashMap<usize, usize>,
}

impl Compiler {
    /// Lower `expr` and return the finished program together with its output register.
    #[must_use]
    pub fn compile(expr: &Expr) -> (Vec<Instruction>, usize) {
        let mut compiler = Self::default();
        let output = compiler.lower(expr);
        (compiler.program, output)
    }
    fn emit(&mut self, instruction: Instruction) -> usize {
        *self
            .values
            .entry(instruction.value_key())
            .or_insert_with(|| {
                self.program.push(instruction);
                self.program.len() - 1
            })
    }
    fn lower(&mut self, expr: &Expr) -> usize {
        if let Some(register) = self.lowered.get(&expr.addr()) {
            return *register;
        }
        let instruction = match expr.node() {
            Node::Number(v) => Instruction::Const(*v),
            Node::Symbol(s) => Instruction::Load(s.position()),
            Node::Add(a, b) => Instruction::Add(self.lower(a), self.lower(b)),
            Node::Sub(a, b) => Instruction::Sub(self.lower(a), self.lower(b)),
            Node::Mul(a, b) => Instruction::Mul(self.lower(a), self.lower(b)),
            Node::Div(a, b) => Instruction::Div(self.lower(a), self.lower(b)),
            Node::Pow(base, exponent) => {
                let base = self.lower(base);
                match exponent.as_number() {
                    Some(v) if v == 0.5 => Instruction::Sqrt(base),
                    #[allow(clippy::cast_possible_truncation)]
                    Some(v) if v.fract() == 0.0 && v.abs() <= MAX_POWI_EXPONENT => {
                        Instruction::PowI(base, v as i32)
                    }
                    Some(v) => Instruction::PowF(base, v),
                    None => Instruction::Pow(base, self.lower(exponent)),
                }
            }
            Node::Neg(a) => Instruction::Neg(self.lower(a)),
            Node::Sqrt(a) => Instruction::Sqrt(self.lower(a)),
            Node::Sin(a) => Instruction::Sin(self.lower(a)),
            Node::Cos(a) => Instruction::Cos(self.lower(a)),
            Node::Atan(a) => Instruction::Atan(self.lower(a)),
            Node::Ln(a) => Instruction::Ln(self.lower(a)),
        };
        let register = self.emit(instruction);
        self.lowered.insert(expr.addr(), register);
        register
    }
}
