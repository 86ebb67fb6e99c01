use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::eval::Function;
use crate::parser::BinaryOperator;


/// Bounds enforced by the [`crate::Evaluator`].
///
/// The tables are explicit: an operator or function without an entry is only
/// subject to the global `max_number` check, a function missing from
/// `allowed_functions` cannot be called at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Largest magnitude any literal or intermediate result may have.
    pub max_number: f64,

    /// Maximum number of arguments, positional and keyword combined, in one call.
    pub max_arguments: usize,

    /// Per-operator `(left, right)` operand magnitude bounds.
    pub operators: BTreeMap<BinaryOperator, (f64, f64)>,

    /// Per-function bound on the magnitude of every argument.
    pub functions: BTreeMap<Function, f64>,

    /// Functions that may be called.
    pub allowed_functions: BTreeSet<Function>,
}

impl Limits {
    /// Operand bounds configured for `op`, if any.
    pub fn operator_bound(&self, op: BinaryOperator) -> Option<(f64, f64)> {
        self.operators.get(&op).copied()
    }

    /// Argument bound configured for `function`, if any.
    pub fn function_bound(&self, function: Function) -> Option<f64> {
        self.functions.get(&function).copied()
    }

    /// Whether `function` may be called.
    pub fn allows(&self, function: Function) -> bool {
        self.allowed_functions.contains(&function)
    }
}

impl Default for Limits {
    fn default() -> Self {
        const QUADRILLION: f64 = 1e15;

        let operators = BTreeMap::from([
            (BinaryOperator::Power, (1000.0, 1000.0)),
            (BinaryOperator::LShift, (1e18, 59.0)),
            (BinaryOperator::Multiply, (QUADRILLION, QUADRILLION)),
            (BinaryOperator::Divide, (QUADRILLION, QUADRILLION)),
        ]);

        let functions = BTreeMap::from([
            (Function::Factorial, 19.0),
            (Function::Exp, 709.0),
            (Function::Sqrt, QUADRILLION),
        ]);

        Self {
            max_number: 1e18,
            max_arguments: 5,
            operators,
            functions,
            allowed_functions: Function::ALL.iter().copied().collect(),
        }
    }
}
