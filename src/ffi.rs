//! Python FFI bindings via PyO3.
//!
//! Exposes the fuzzy logic container to Python. Ids cross the boundary as plain
//! strings; geometry is the built-in trapezoid.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from fls_core import FuzzyLogic
//!
//! logic = FuzzyLogic()
//! logic.initialize()
//!
//! temperature = logic.fuzzification_ids()[0]
//! warm = logic.add_membership_set(temperature, (15.0, 20.0, 25.0, 30.0), name="Warm")
//! fast = logic.add_membership_set(logic.defuzzification_id(), (0.0, 0.5, 1.0, 1.0))
//!
//! rule = logic.add_inference()
//! logic.set_operator(rule, "Passthrough")
//! logic.link_input(rule, "left", warm)
//! logic.set_output(rule, fast)
//!
//! logic.evaluation_enabled = True
//! logic.set_input_value(temperature, 27.5)
//! logic.run_update()
//! print(logic.height(fast))   # 0.5
//! ```

#![allow(non_snake_case)]

use pyo3::exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::FuzzyError;
use crate::id::Id;
use crate::inference::InputSide;
use crate::membership::{TrapezoidGeometry, TrapezoidShape};
use crate::model::FuzzyLogic;
use crate::ops::Operator;
use crate::update::UpdateConfig;

// ── Error mapping ────────────────────────────────────────────────────────────

fn to_py_err(err: FuzzyError) -> PyErr {
    let message = err.to_string();
    match err {
        FuzzyError::Uninitialized => PyRuntimeError::new_err(message),
        FuzzyError::NotFound(_) | FuzzyError::UnresolvedReference(_) => {
            PyKeyError::new_err(message)
        }
        FuzzyError::IndexOutOfRange { .. } => PyIndexError::new_err(message),
        FuzzyError::CycleDetected(_) => PyValueError::new_err(message),
    }
}

fn parse_side(side: &str) -> PyResult<InputSide> {
    match side.to_ascii_lowercase().as_str() {
        "left" => Ok(InputSide::Left),
        "right" => Ok(InputSide::Right),
        _ => Err(PyValueError::new_err(format!(
            "side must be 'left' or 'right', got '{side}'"
        ))),
    }
}

// ── FuzzyLogic ───────────────────────────────────────────────────────────────

/// A fuzzy logic control graph.
///
/// Call ``initialize()`` once before anything else.
#[pyclass(name = "FuzzyLogic")]
pub struct PyFuzzyLogic {
    inner: FuzzyLogic,
}

#[pymethods]
impl PyFuzzyLogic {
    /// Create an empty, uninitialized graph.
    #[new]
    pub fn new() -> Self {
        Self {
            inner: FuzzyLogic::new(),
        }
    }

    /// One-time setup; later calls do nothing.
    pub fn initialize(&mut self) {
        self.inner.initialize();
    }

    /// Whether ``initialize()`` has run.
    #[getter]
    pub fn initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    /// Whether ``run_update()`` evaluates inferences.
    #[getter]
    pub fn evaluation_enabled(&self) -> bool {
        self.inner.evaluation_enabled()
    }

    /// Enable or disable evaluation.
    #[setter]
    pub fn set_evaluation_enabled(&mut self, enabled: bool) {
        self.inner.set_evaluation_enabled(enabled);
    }

    /// Ids of all fuzzifications, in order.
    pub fn fuzzification_ids(&self) -> PyResult<Vec<String>> {
        let all = self.inner.fuzzifications().map_err(to_py_err)?;
        Ok(all.iter().map(|v| v.id().to_string()).collect())
    }

    /// Id of the defuzzification.
    pub fn defuzzification_id(&self) -> PyResult<String> {
        let defuzz = self.inner.defuzzification().map_err(to_py_err)?;
        Ok(defuzz.id().to_string())
    }

    /// Ids of all inference nodes, in evaluation order.
    pub fn inference_ids(&self) -> PyResult<Vec<String>> {
        let all = self.inner.inferences().map_err(to_py_err)?;
        Ok(all.iter().map(|n| n.id().to_string()).collect())
    }

    /// Add a fuzzification and return its id.
    pub fn add_fuzzification(&mut self) -> PyResult<String> {
        self.inner
            .add_fuzzification()
            .map(|id| id.to_string())
            .map_err(to_py_err)
    }

    /// Remove a fuzzification by id.
    pub fn remove_fuzzification(&mut self, id: &str) -> PyResult<()> {
        self.inner
            .remove_fuzzification(&Id::from(id))
            .map(|_| ())
            .map_err(to_py_err)
    }

    /// Add a membership set to a variable and return its id.
    ///
    /// Args:
    ///     variable: id of a fuzzification or the defuzzification
    ///     shape:    (foot_left, shoulder_left, shoulder_right, foot_right)
    ///     name:     optional display name
    #[pyo3(signature = (variable, shape, name=None))]
    pub fn add_membership_set(
        &mut self,
        variable: &str,
        shape: (f32, f32, f32, f32),
        name: Option<String>,
    ) -> PyResult<String> {
        let id = self
            .inner
            .add_membership_set(&Id::from(variable))
            .map_err(to_py_err)?;
        let set = self.inner.membership_set_mut(&id).map_err(to_py_err)?;
        set.shape = TrapezoidShape::new(shape.0, shape.1, shape.2, shape.3);
        set.name = name;
        Ok(id.to_string())
    }

    /// Add an inference node and return its id.
    pub fn add_inference(&mut self) -> PyResult<String> {
        self.inner
            .add_inference()
            .map(|id| id.to_string())
            .map_err(to_py_err)
    }

    /// Remove an inference node by id.
    pub fn remove_inference(&mut self, id: &str) -> PyResult<()> {
        self.inner
            .remove_inference(&Id::from(id))
            .map(|_| ())
            .map_err(to_py_err)
    }

    /// Set a node's operator: "And", "Or", "Not" or "Passthrough".
    pub fn set_operator(&mut self, node: &str, operator: &str) -> PyResult<()> {
        let operator: Operator = operator
            .parse()
            .map_err(|e| PyValueError::new_err(format!("{e}")))?;
        self.inner
            .set_operator(&Id::from(node), operator)
            .map(|_| ())
            .map_err(to_py_err)
    }

    /// Link a node input ("left" or "right") to a fuzzification, a set or a node.
    ///
    /// Raises ValueError if the link would create a cycle.
    pub fn link_input(&mut self, node: &str, side: &str, target: &str) -> PyResult<()> {
        let side = parse_side(side)?;
        self.inner
            .link_input(&Id::from(node), side, &Id::from(target))
            .map_err(to_py_err)
    }

    /// Point a node's output at a defuzzification set; None unassigns it.
    ///
    /// Returns True if the output ended up assigned.
    #[pyo3(signature = (node, output=None))]
    pub fn set_output(&mut self, node: &str, output: Option<String>) -> PyResult<bool> {
        self.inner
            .set_output(&Id::from(node), output.map(Id::from_token))
            .map_err(to_py_err)
    }

    /// Move a variable's baseline to a crisp value.
    pub fn set_input_value(&mut self, variable: &str, crisp: f32) -> PyResult<()> {
        self.inner
            .set_input_value(&Id::from(variable), crisp)
            .map_err(to_py_err)
    }

    /// Run one update pass. Returns the number of heights written.
    #[pyo3(signature = (memoize=false))]
    pub fn run_update(&mut self, memoize: bool) -> PyResult<usize> {
        let config = UpdateConfig { memoize };
        self.inner
            .run_update_with(&TrapezoidGeometry, &config)
            .map(|report| report.written)
            .map_err(to_py_err)
    }

    /// Evaluate one node.
    pub fn evaluate(&self, node: &str) -> PyResult<f32> {
        self.inner.evaluate(&Id::from(node)).map_err(to_py_err)
    }

    /// Whether a node sits on a cycle.
    pub fn has_cycle(&self, node: &str) -> PyResult<bool> {
        self.inner.has_cycle(&Id::from(node)).map_err(to_py_err)
    }

    /// Current height of a membership set.
    pub fn height(&self, set: &str) -> PyResult<f32> {
        self.inner.height(&Id::from(set)).map_err(to_py_err)
    }

    /// [(set id, height)] for every defuzzification set.
    pub fn output_heights(&self) -> PyResult<Vec<(String, f32)>> {
        let heights = self.inner.output_heights().map_err(to_py_err)?;
        Ok(heights
            .into_iter()
            .map(|(id, h)| (id.to_string(), h))
            .collect())
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        match (
            self.inner.fuzzification_count(),
            self.inner.inference_count(),
        ) {
            (Ok(f), Ok(n)) => format!("FuzzyLogic(fuzzifications={f}, inferences={n})"),
            _ => String::from("FuzzyLogic(uninitialized)"),
        }
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// fls-core Python bindings.
#[pymodule]
pub fn fls_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFuzzyLogic>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
