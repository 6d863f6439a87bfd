/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Inference evaluation and cycle detection.
//!
//! [`Evaluator`] resolves a node's inputs against the container and applies its
//! operator:
//!
//! - fuzzification set → `geometry.membership_at(set, variable.input_value)`
//! - inference node → that node's evaluation, recursively
//! - anything else → [`FuzzyError::UnresolvedReference`]
//!
//! Every call re-derives its inputs unless the evaluator was built with
//! [`Evaluator::memoized`], in which case results are cached for the evaluator's
//! lifetime (one update pass).
//!
//! # Invariants
//!
//! - **FLS-EVAL-001** — Evaluation terminates on any graph: re-entering a node that is
//!   still being evaluated yields [`FuzzyError::CycleDetected`].
//! - **FLS-EVAL-002** — [`FuzzyLogic::has_cycle`] walks with an explicit stack and a
//!   visited set, so long acyclic chains neither loop nor overflow.
//! - **FLS-EVAL-003** — Evaluation resolves only the inputs the operator uses;
//!   `has_cycle` follows both stored inputs of every node.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use tracing::trace;

use crate::error::{FuzzyError, FuzzyResult};
use crate::id::Id;
use crate::inference::InferenceNode;
use crate::membership::{MembershipGeometry, TrapezoidGeometry};
use crate::model::{FuzzyLogic, Reference};

// ─── Evaluator ──────────────────────────────────────────────────────────────

/// Evaluates inference nodes of one container against one geometry.
pub struct Evaluator<'a, G: MembershipGeometry + ?Sized> {
    logic: &'a FuzzyLogic,
    geometry: &'a G,
    memo: Option<HashMap<&'a Id, FuzzyResult<f32>>>,
    in_progress: HashSet<&'a Id>,
}

impl<'a, G: MembershipGeometry + ?Sized> Evaluator<'a, G> {
    /// An evaluator without memoization.
    pub fn new(logic: &'a FuzzyLogic, geometry: &'a G) -> FuzzyResult<Self> {
        logic.check_initialized()?;
        Ok(Self {
            logic,
            geometry,
            memo: None,
            in_progress: HashSet::new(),
        })
    }

    /// Cache each node's result for the rest of this evaluator's life.
    pub fn memoized(mut self) -> Self {
        self.memo = Some(HashMap::new());
        self
    }

    /// Evaluate the node named by `node`.
    ///
    /// Fails with [`FuzzyError::NotFound`] if `node` is not an inference node,
    /// [`FuzzyError::UnresolvedReference`] if an input does not resolve, and
    /// [`FuzzyError::CycleDetected`] if evaluation revisits a node in progress.
    pub fn evaluate(&mut self, node: &Id) -> FuzzyResult<f32> {
        let logic = self.logic;
        match logic.resolve(node) {
            Reference::Inference(node) => self.evaluate_node(node),
            _ => Err(FuzzyError::NotFound(node.clone())),
        }
    }

    fn evaluate_node(&mut self, node: &'a InferenceNode) -> FuzzyResult<f32> {
        let id = node.id();
        if self.in_progress.contains(id) {
            return Err(FuzzyError::CycleDetected(id.clone()));
        }
        if let Some(cached) = self.memo.as_ref().and_then(|memo| memo.get(id)) {
            return cached.clone();
        }

        self.in_progress.insert(id);
        let result = self.combine(node);
        self.in_progress.remove(id);

        trace!(node = %id, operator = %node.operator, ?result, "inference evaluated");
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(id, result.clone());
        }
        result
    }

    fn combine(&mut self, node: &'a InferenceNode) -> FuzzyResult<f32> {
        let left = self.resolve_input(node, node.left_input())?;
        let right = if node.operator.uses_right() {
            self.resolve_input(node, node.right_input())?
        } else {
            0.0
        };
        Ok(node.operator.call(left, right))
    }

    fn resolve_input(&mut self, node: &'a InferenceNode, input: Option<&'a Id>) -> FuzzyResult<f32> {
        let Some(input) = input else {
            return Err(FuzzyError::UnresolvedReference(node.id().clone()));
        };
        let logic = self.logic;
        match logic.resolve(input) {
            Reference::FuzzificationSet { variable, set } => {
                Ok(self.geometry.membership_at(set, variable.input_value))
            }
            Reference::Inference(upstream) => self.evaluate_node(upstream),
            _ => Err(FuzzyError::UnresolvedReference(input.clone())),
        }
    }
}

// ─── Container entry points ─────────────────────────────────────────────────

impl FuzzyLogic {
    /// Evaluate `node` with the default [`TrapezoidGeometry`].
    pub fn evaluate(&self, node: &Id) -> FuzzyResult<f32> {
        self.evaluate_with(node, &TrapezoidGeometry)
    }

    /// Evaluate `node` against `geometry`, without memoization.
    pub fn evaluate_with<G: MembershipGeometry + ?Sized>(
        &self,
        node: &Id,
        geometry: &G,
    ) -> FuzzyResult<f32> {
        Evaluator::new(self, geometry)?.evaluate(node)
    }

    /// Whether following the left and right inputs of `node` (transitively,
    /// through inference nodes only) ever returns to `node`. Stored right inputs
    /// count even while the operator ignores them.
    pub fn has_cycle(&self, node: &Id) -> FuzzyResult<bool> {
        self.check_initialized()?;
        let start = match self.resolve(node) {
            Reference::Inference(start) => start,
            _ => return Err(FuzzyError::NotFound(node.clone())),
        };

        let mut visited: HashSet<&Id> = HashSet::new();
        let mut stack: Vec<&Id> = start.inputs().collect();
        while let Some(id) = stack.pop() {
            if id == start.id() {
                return Ok(true);
            }
            if !visited.insert(id) {
                continue;
            }
            if let Reference::Inference(upstream) = self.resolve(id) {
                stack.extend(upstream.inputs());
            }
        }
        Ok(false)
    }

    /// Degree of the fuzzification set named by `set` at its variable's current
    /// baseline.
    pub fn membership_degree_with<G: MembershipGeometry + ?Sized>(
        &self,
        set_id: &Id,
        geometry: &G,
    ) -> FuzzyResult<f32> {
        match self.classify(set_id)? {
            Reference::FuzzificationSet { variable, set } => {
                Ok(geometry.membership_at(set, variable.input_value))
            }
            _ => Err(FuzzyError::NotFound(set_id.clone())),
        }
    }

    /// Sets of `variable` its baseline intersects, with their degrees.
    pub fn intersections(&self, variable: &Id) -> FuzzyResult<Vec<(Id, f32)>> {
        self.intersections_with(variable, &TrapezoidGeometry)
    }

    /// [`intersections`](Self::intersections) against `geometry`.
    pub fn intersections_with<G: MembershipGeometry + ?Sized>(
        &self,
        variable: &Id,
        geometry: &G,
    ) -> FuzzyResult<Vec<(Id, f32)>> {
        match self.classify(variable)? {
            Reference::Fuzzification(v) | Reference::Defuzzification(v) => {
                Ok(geometry.intersection_with_baseline(v, v.input_value))
            }
            _ => Err(FuzzyError::NotFound(variable.clone())),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
