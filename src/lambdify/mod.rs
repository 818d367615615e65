#![warn(missing_docs)]
//! Conversion of symbolic expressions into fast numeric evaluators.
//!
//! An expression is compiled once into a [`CompiledEvaluator`], a straight-line register
//! program. Evaluating the program is pure arithmetic without any tree walking. The evaluator
//! broadcasts over the scalar or array valued [`Inputs`].
mod compiler;
mod inputs;

pub use compiler::{Compiler, Instruction};
pub use inputs::{broadcast_shape, Inputs, IntoInput, DEFAULT_TEMPERATURE};

use log::warn;
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};
use rayon::prelude::*;

use crate::{
    error::{DispersionError, NdResult},
    expr::Expr,
    symbol::SYMBOL_COUNT,
};

/// Number of broadcast elements above which evaluation is split over the rayon thread pool.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// A compiled numeric function of `(wl, theta, phi, T)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledEvaluator {
    program: Vec<Instruction>,
    output: usize,
}

impl CompiledEvaluator {
    /// Compile the given expression.
    #[must_use]
    pub fn compile(expr: &Expr) -> Self {
        let (program, output) = Compiler::compile(expr);
        Self { program, output }
    }
    /// Number of instructions (= registers) of the program.
    #[must_use]
    pub fn len(&self) -> usize {
        self.program.len()
    }
    /// Returns `true` if the program is empty. Never the case for a compiled expression.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }
    /// Returns `true` if the compiled expression does not depend on any argument.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        !self
            .program
            .iter()
            .any(|i| matches!(i, Instruction::Load(_)))
    }
    /// The instructions of the program.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.program
    }
    fn run(&self, registers: &mut [f64], args: [f64; SYMBOL_COUNT]) -> f64 {
        for (i, instruction) in self.program.iter().enumerate() {
            registers[i] = match *instruction {
                Instruction::Const(v) => v,
                Instruction::Load(p) => args[p],
                Instruction::Add(a, b) => registers[a] + registers[b],
                Instruction::Sub(a, b) => registers[a] - registers[b],
                Instruction::Mul(a, b) => registers[a] * registers[b],
                Instruction::Div(a, b) => registers[a] / registers[b],
                Instruction::Neg(a) => -registers[a],
                Instruction::PowI(a, n) => registers[a].powi(n),
                Instruction::PowF(a, v) => registers[a].powf(v),
                Instruction::Pow(a, b) => registers[a].powf(registers[b]),
                Instruction::Sqrt(a) => registers[a].sqrt(),
                Instruction::Sin(a) => registers[a].sin(),
                Instruction::Cos(a) => registers[a].cos(),
                Instruction::Atan(a) => registers[a].atan(),
                Instruction::Ln(a) => registers[a].ln(),
            };
        }
        registers[self.output]
    }
    /// Evaluate for a single set of scalar arguments `(wl, theta, phi, T)`.
    #[must_use]
    pub fn evaluate(&self, args: &[f64; SYMBOL_COUNT]) -> f64 {
        let mut registers = vec![0.0; self.len()];
        self.run(&mut registers, *args)
    }
    /// Evaluate for (possibly array valued) inputs.
    ///
    /// The result has the broadcast shape of all inputs (0-dimensional for scalar inputs). Large
    /// inputs are evaluated in parallel.
    ///
    /// # Errors
    ///
    /// This function returns [`DispersionError::ShapeMismatch`] if the inputs cannot be broadcast
    /// to a common shape.
    pub fn evaluate_inputs(&self, inputs: &Inputs) -> NdResult<ArrayD<f64>> {
        let shape = inputs.shape()?;
        let [wl, theta, phi, t] = inputs.args();
        let (wl, theta, phi, t) = (
            broadcast_to(wl, &shape)?,
            broadcast_to(theta, &shape)?,
            broadcast_to(phi, &shape)?,
            broadcast_to(t, &shape)?,
        );
        let element_count: usize = shape.iter().product();
        let result = if element_count > PARALLEL_THRESHOLD {
            let columns: Vec<Vec<f64>> = [&wl, &theta, &phi, &t]
                .iter()
                .map(|c| c.iter().copied().collect())
                .collect();
            let values: Vec<f64> = (0..element_count)
                .into_par_iter()
                .map_init(
                    || vec![0.0; self.len()],
                    |registers, i| {
                        self.run(
                            registers,
                            [columns[0][i], columns[1][i], columns[2][i], columns[3][i]],
                        )
                    },
                )
                .collect();
            ArrayD::from_shape_vec(IxDyn(&shape), values)
                .map_err(|e| DispersionError::Other(format!("evaluation failed: {e}")))?
        } else {
            let mut registers = vec![0.0; self.len()];
            Zip::from(&wl)
                .and(&theta)
                .and(&phi)
                .and(&t)
                .map_collect(|&w, &th, &ph, &tt| self.run(&mut registers, [w, th, ph, tt]))
        };
        if result.iter().any(|v| v.is_nan()) {
            warn!("evaluation produced NaN values, inputs might be outside the validity range");
        }
        Ok(result)
    }
}

fn broadcast_to<'a>(a: &'a ArrayD<f64>, shape: &[usize]) -> NdResult<ArrayViewD<'a, f64>> {
    a.broadcast(IxDyn(shape)).ok_or_else(|| {
        DispersionError::ShapeMismatch(format!(
            "cannot broadcast shape {:?} to {shape:?}",
            a.shape()
        ))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{phi, temperature, theta, wl};
    use crate::utils::test_helper::test_helper::check_warnings;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use ndarray::array;

    fn bbo_e() -> Expr {
        let no = (2.7405 + 0.0184 / (wl().powi(2) - 0.0179) - 0.0155 * wl().powi(2)).sqrt();
        let ne = (2.3730 + 0.0128 / (wl().powi(2) - 0.0156) - 0.0044 * wl().powi(2)).sqrt();
        ne.clone()
            / (theta().sin().powi(2) + (ne / no).powi(2) * theta().cos().powi(2)).sqrt()
            + -9.3e-6 * (temperature() - 20.0)
    }
    #[test]
    fn matches_tree_evaluation() {
        let e = bbo_e() + phi().cos().atan() + wl().ln() * wl().pow(theta());
        let compiled = CompiledEvaluator::compile(&e);
        for args in [[0.532, 0.3, 0.1, 25.0], [1.064, 1.2, 0.0, 80.0]] {
            assert_relative_eq!(compiled.evaluate(&args), e.eval(&args), max_relative = 1e-13);
        }
        assert!(!compiled.is_constant());
    }
    #[test]
    fn scalar_inputs_give_0d_result() {
        let compiled = CompiledEvaluator::compile(&bbo_e());
        let inputs = Inputs::new(0.532)
            .theta(std::f64::consts::FRAC_PI_2)
            .temperature(25.0);
        let result = compiled.evaluate_inputs(&inputs).unwrap();
        assert_eq!(result.ndim(), 0);
        assert_relative_eq!(result[IxDyn(&[])], 1.555_466, epsilon = 1e-5);
    }
    #[test]
    fn constant_broadcasts() {
        let compiled = CompiledEvaluator::compile(&Expr::number(0.0));
        assert!(compiled.is_constant());
        let inputs = Inputs::new(vec![0.4, 0.6])
            .temperature(array![[20.0], [30.0], [40.0]].into_dyn());
        let result = compiled.evaluate_inputs(&inputs).unwrap();
        assert_eq!(result.shape(), &[3, 2]);
        assert!(result.iter().all(|v| *v == 0.0));
    }
    #[test]
    fn shape_mismatch() {
        let compiled = CompiledEvaluator::compile(&bbo_e());
        let inputs = Inputs::new(vec![0.4, 0.5, 0.6]).theta(vec![0.0, 0.1, 0.2, 0.3]);
        assert_matches!(
            compiled.evaluate_inputs(&inputs),
            Err(DispersionError::ShapeMismatch(_))
        );
    }
    #[test]
    fn parallel_equals_serial() {
        let compiled = CompiledEvaluator::compile(&bbo_e());
        let wavelengths: Vec<f64> = (0..2 * PARALLEL_THRESHOLD)
            .map(|i| 0.3 + 1e-4 * i as f64)
            .collect();
        let all = compiled
            .evaluate_inputs(&Inputs::new(wavelengths.clone()).theta(0.7))
            .unwrap();
        assert_eq!(all.shape(), &[2 * PARALLEL_THRESHOLD]);
        for (i, w) in wavelengths.iter().enumerate().step_by(997) {
            let single = compiled.evaluate_inputs(&Inputs::new(*w).theta(0.7)).unwrap();
            assert_eq!(all[IxDyn(&[i])], single[IxDyn(&[])]);
        }
    }
    #[test]
    fn warns_on_nan() {
        testing_logger::setup();
        let compiled = CompiledEvaluator::compile(&wl().sqrt());
        let result = compiled.evaluate_inputs(&Inputs::new(-1.0)).unwrap();
        assert!(result[IxDyn(&[])].is_nan());
        check_warnings(vec![
            "evaluation produced NaN values, inputs might be outside the validity range",
        ]);
    }
}
