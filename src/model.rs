/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The model container: owns every variable and inference node, resolves ids.
//!
//! [`FuzzyLogic`] holds the forward collections (fuzzifications, the single
//! defuzzification, inference nodes) by value. Everything derived from them, the
//! `initialized` flag and the id index, is runtime state rebuilt by
//! [`FuzzyLogic::initialize`] and never persisted.
//!
//! # Invariants
//!
//! - **FLS-MOD-001** — Every operation except `initialize()`, the flag accessors and
//!   the `is_*_id` predicates fails with [`FuzzyError::Uninitialized`] until
//!   `initialize()` has run.
//! - **FLS-MOD-002** — After `initialize()` there is at least one fuzzification and
//!   exactly one defuzzification.
//! - **FLS-MOD-003** — The id index always mirrors the forward collections; every
//!   structural mutation updates or rebuilds it.
//! - **FLS-MOD-004** — Removal never cascades. References into removed entities
//!   become unresolved.

use alloc::vec::Vec;

use hashbrown::HashMap;
use tracing::debug;

use crate::error::{FuzzyError, FuzzyResult};
use crate::id::Id;
use crate::inference::{InferenceNode, InputSide};
use crate::membership::MembershipSet;
use crate::ops::Operator;
use crate::variable::{Defuzzification, Fuzzification, Variable};

// ─── Id classification ──────────────────────────────────────────────────────

/// Where an id lives in the forward collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    Fuzzification(usize),
    FuzzificationSet(usize, usize),
    Defuzzification,
    DefuzzificationSet(usize),
    Inference(usize),
}

/// What an identifier names, resolved once per lookup.
#[derive(Clone, Copy, Debug)]
pub enum Reference<'a> {
    /// An input variable.
    Fuzzification(&'a Fuzzification),
    /// A membership set of an input variable, with its owner.
    FuzzificationSet {
        /// The owning input variable.
        variable: &'a Fuzzification,
        /// The set itself.
        set: &'a MembershipSet,
    },
    /// The output variable.
    Defuzzification(&'a Defuzzification),
    /// A membership set of the output variable.
    DefuzzificationSet(&'a MembershipSet),
    /// An inference node.
    Inference(&'a InferenceNode),
    /// Nothing in this container.
    Unresolved,
}

impl Reference<'_> {
    /// Whether the id resolved to anything.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

// ─── Container ──────────────────────────────────────────────────────────────

/// A fuzzy logic control graph.
///
/// ```rust
/// use fls_core::FuzzyLogic;
///
/// let mut logic = FuzzyLogic::new();
/// logic.initialize();
/// assert_eq!(logic.fuzzification_count().unwrap(), 1);
/// assert!(logic.defuzzification().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyLogic {
    pub(crate) fuzzifications: Vec<Fuzzification>,
    pub(crate) defuzzification: Option<Defuzzification>,
    pub(crate) inferences: Vec<InferenceNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    evaluation_enabled: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    initialized: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<Id, Location>,
}

impl FuzzyLogic {
    /// An empty, uninitialized container.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// One-time setup. Later calls are no-ops.
    ///
    /// Creates a default fuzzification and the defuzzification when missing,
    /// rebuilds the id index, reopens every membership set (height 1, clamping on)
    /// and unassigns outputs that no longer name a defuzzification set.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.fuzzifications.is_empty() {
            self.fuzzifications.push(Variable::new(Id::mint()));
        }
        if self.defuzzification.is_none() {
            self.defuzzification = Some(Variable::new(Id::mint()));
        }
        for variable in self
            .fuzzifications
            .iter_mut()
            .chain(self.defuzzification.iter_mut())
        {
            variable.reset_sets();
        }
        self.rebuild_index();
        self.normalize_outputs();

        debug!(
            fuzzifications = self.fuzzifications.len(),
            inferences = self.inferences.len(),
            ids = self.index.len(),
            "fuzzy logic initialized"
        );
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the update pass evaluates inferences (otherwise it reopens every
    /// output set).
    pub fn evaluation_enabled(&self) -> bool {
        self.evaluation_enabled
    }

    /// Toggle evaluation. No transition restrictions.
    pub fn set_evaluation_enabled(&mut self, enabled: bool) {
        self.evaluation_enabled = enabled;
    }

    pub(crate) fn check_initialized(&self) -> FuzzyResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(FuzzyError::Uninitialized)
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (vi, variable) in self.fuzzifications.iter().enumerate() {
            self.index.insert(variable.id().clone(), Location::Fuzzification(vi));
            for (si, set) in variable.sets().iter().enumerate() {
                self.index
                    .insert(set.id().clone(), Location::FuzzificationSet(vi, si));
            }
        }
        if let Some(defuzz) = &self.defuzzification {
            self.index.insert(defuzz.id().clone(), Location::Defuzzification);
            for (si, set) in defuzz.sets().iter().enumerate() {
                self.index
                    .insert(set.id().clone(), Location::DefuzzificationSet(si));
            }
        }
        for (ni, node) in self.inferences.iter().enumerate() {
            self.index.insert(node.id().clone(), Location::Inference(ni));
        }
    }

    fn normalize_outputs(&mut self) {
        let index = &self.index;
        for node in &mut self.inferences {
            let assigned = matches!(
                index.get(node.output()),
                Some(Location::DefuzzificationSet(_))
            );
            if !assigned {
                node.unassign_output();
            }
        }
    }

    // ── Classification ─────────────────────────────────────────────────────

    pub(crate) fn locate(&self, id: &Id) -> Option<Location> {
        self.index.get(id).copied()
    }

    /// Resolve without the initialization check. The index is empty before
    /// `initialize()`, so everything is unresolved then.
    pub(crate) fn resolve(&self, id: &Id) -> Reference<'_> {
        let Some(location) = self.locate(id) else {
            return Reference::Unresolved;
        };
        let found = match location {
            Location::Fuzzification(vi) => self.fuzzifications.get(vi).map(Reference::Fuzzification),
            Location::FuzzificationSet(vi, si) => self.fuzzifications.get(vi).and_then(|variable| {
                variable
                    .set(si)
                    .map(|set| Reference::FuzzificationSet { variable, set })
            }),
            Location::Defuzzification => self.defuzzification.as_ref().map(Reference::Defuzzification),
            Location::DefuzzificationSet(si) => self
                .defuzzification
                .as_ref()
                .and_then(|d| d.set(si))
                .map(Reference::DefuzzificationSet),
            Location::Inference(ni) => self.inferences.get(ni).map(Reference::Inference),
        };
        found.unwrap_or(Reference::Unresolved)
    }

    /// Classify `id` against every collection in the container.
    pub fn classify(&self, id: &Id) -> FuzzyResult<Reference<'_>> {
        self.check_initialized()?;
        Ok(self.resolve(id))
    }

    /// `id` names a fuzzification.
    pub fn is_fuzzification_id(&self, id: &Id) -> bool {
        matches!(self.locate(id), Some(Location::Fuzzification(_)))
    }

    /// `id` names a membership set of some fuzzification.
    pub fn is_fuzzification_set_id(&self, id: &Id) -> bool {
        matches!(self.locate(id), Some(Location::FuzzificationSet(..)))
    }

    /// `id` names the defuzzification.
    pub fn is_defuzzification_id(&self, id: &Id) -> bool {
        matches!(self.locate(id), Some(Location::Defuzzification))
    }

    /// `id` names a membership set of the defuzzification.
    pub fn is_defuzzification_set_id(&self, id: &Id) -> bool {
        matches!(self.locate(id), Some(Location::DefuzzificationSet(_)))
    }

    /// `id` names an inference node.
    pub fn is_inference_id(&self, id: &Id) -> bool {
        matches!(self.locate(id), Some(Location::Inference(_)))
    }

    // ── Fuzzifications ─────────────────────────────────────────────────────

    /// Append an empty fuzzification and return its id.
    pub fn add_fuzzification(&mut self) -> FuzzyResult<Id> {
        self.check_initialized()?;
        let id = Id::mint();
        let vi = self.fuzzifications.len();
        self.fuzzifications.push(Variable::new(id.clone()));
        self.index.insert(id.clone(), Location::Fuzzification(vi));
        debug!(%id, "fuzzification added");
        Ok(id)
    }

    /// Remove the fuzzification named by `id`. Nodes referencing its sets are
    /// left as they are.
    pub fn remove_fuzzification(&mut self, id: &Id) -> FuzzyResult<Fuzzification> {
        let vi = self.fuzzification_index(id)?;
        let removed = self.fuzzifications.remove(vi);
        self.rebuild_index();
        debug!(%id, sets = removed.set_count(), "fuzzification removed");
        Ok(removed)
    }

    /// Number of fuzzifications.
    pub fn fuzzification_count(&self) -> FuzzyResult<usize> {
        self.check_initialized()?;
        Ok(self.fuzzifications.len())
    }

    /// All fuzzifications in container order.
    pub fn fuzzifications(&self) -> FuzzyResult<&[Fuzzification]> {
        self.check_initialized()?;
        Ok(&self.fuzzifications)
    }

    /// Fuzzification at `index`.
    pub fn fuzzification(&self, index: usize) -> FuzzyResult<&Fuzzification> {
        self.check_initialized()?;
        self.fuzzifications
            .get(index)
            .ok_or(FuzzyError::IndexOutOfRange {
                index,
                len: self.fuzzifications.len(),
            })
    }

    /// Fuzzification named by `id`.
    pub fn fuzzification_by_id(&self, id: &Id) -> FuzzyResult<&Fuzzification> {
        let vi = self.fuzzification_index(id)?;
        Ok(&self.fuzzifications[vi])
    }

    /// Mutable fuzzification named by `id`.
    pub fn fuzzification_mut(&mut self, id: &Id) -> FuzzyResult<&mut Fuzzification> {
        let vi = self.fuzzification_index(id)?;
        Ok(&mut self.fuzzifications[vi])
    }

    /// Position of the fuzzification named by `id`.
    pub fn fuzzification_index(&self, id: &Id) -> FuzzyResult<usize> {
        self.check_initialized()?;
        match self.locate(id) {
            Some(Location::Fuzzification(vi)) => Ok(vi),
            _ => Err(FuzzyError::NotFound(id.clone())),
        }
    }

    // ── Defuzzification ────────────────────────────────────────────────────

    /// The output variable.
    ///
    /// `initialize()` always creates it, so the `None` branch only exists for a
    /// container that was never initialized.
    pub fn defuzzification(&self) -> FuzzyResult<&Defuzzification> {
        self.check_initialized()?;
        self.defuzzification.as_ref().ok_or(FuzzyError::Uninitialized)
    }

    /// Mutable output variable.
    pub fn defuzzification_mut(&mut self) -> FuzzyResult<&mut Defuzzification> {
        self.check_initialized()?;
        self.defuzzification.as_mut().ok_or(FuzzyError::Uninitialized)
    }

    // ── Membership sets ────────────────────────────────────────────────────

    /// Append a fresh set to the fuzzification or defuzzification named by
    /// `variable` and return the set's id.
    pub fn add_membership_set(&mut self, variable: &Id) -> FuzzyResult<Id> {
        self.check_initialized()?;
        let id = Id::mint();
        let location = match self.locate(variable) {
            Some(Location::Fuzzification(vi)) => {
                let owner = &mut self.fuzzifications[vi];
                owner.push_set(MembershipSet::new(id.clone()));
                Location::FuzzificationSet(vi, owner.set_count() - 1)
            }
            Some(Location::Defuzzification) => {
                let owner = self.defuzzification_mut()?;
                owner.push_set(MembershipSet::new(id.clone()));
                Location::DefuzzificationSet(owner.set_count() - 1)
            }
            _ => return Err(FuzzyError::NotFound(variable.clone())),
        };
        self.index.insert(id.clone(), location);
        debug!(%id, %variable, "membership set added");
        Ok(id)
    }

    /// Remove the membership set named by `id` from whichever variable owns it.
    ///
    /// Nodes whose output named a removed defuzzification set become unassigned.
    pub fn remove_membership_set(&mut self, id: &Id) -> FuzzyResult<MembershipSet> {
        self.check_initialized()?;
        let removed = match self.locate(id) {
            Some(Location::FuzzificationSet(vi, _)) => self.fuzzifications[vi].remove_set(id),
            Some(Location::DefuzzificationSet(_)) => {
                self.defuzzification.as_mut().and_then(|d| d.remove_set(id))
            }
            _ => None,
        };
        let removed = removed.ok_or_else(|| FuzzyError::NotFound(id.clone()))?;
        self.rebuild_index();
        self.normalize_outputs();
        debug!(%id, "membership set removed");
        Ok(removed)
    }

    /// Membership set named by `id`, on any variable.
    pub fn membership_set(&self, id: &Id) -> FuzzyResult<&MembershipSet> {
        match self.classify(id)? {
            Reference::FuzzificationSet { set, .. } | Reference::DefuzzificationSet(set) => Ok(set),
            _ => Err(FuzzyError::NotFound(id.clone())),
        }
    }

    /// Mutable membership set named by `id`, on any variable.
    pub fn membership_set_mut(&mut self, id: &Id) -> FuzzyResult<&mut MembershipSet> {
        self.check_initialized()?;
        let set = match self.locate(id) {
            Some(Location::FuzzificationSet(vi, si)) => self.fuzzifications[vi].sets_mut().get_mut(si),
            Some(Location::DefuzzificationSet(si)) => self
                .defuzzification
                .as_mut()
                .and_then(|d| d.sets_mut().get_mut(si)),
            _ => None,
        };
        set.ok_or_else(|| FuzzyError::NotFound(id.clone()))
    }

    /// Current height of the set named by `id`.
    pub fn height(&self, id: &Id) -> FuzzyResult<f32> {
        self.membership_set(id).map(|set| set.height)
    }

    /// `(set id, height)` for every defuzzification set, in set order.
    pub fn output_heights(&self) -> FuzzyResult<Vec<(Id, f32)>> {
        Ok(self
            .defuzzification()?
            .sets()
            .iter()
            .map(|set| (set.id().clone(), set.height))
            .collect())
    }

    /// Move the baseline of the fuzzification or defuzzification named by
    /// `variable` to `crisp`.
    pub fn set_input_value(&mut self, variable: &Id, crisp: f32) -> FuzzyResult<()> {
        self.check_initialized()?;
        let target = match self.locate(variable) {
            Some(Location::Fuzzification(vi)) => self.fuzzifications.get_mut(vi),
            Some(Location::Defuzzification) => self.defuzzification.as_mut(),
            _ => None,
        };
        let target = target.ok_or_else(|| FuzzyError::NotFound(variable.clone()))?;
        target.input_value = crisp;
        Ok(())
    }

    // ── Inferences ─────────────────────────────────────────────────────────

    /// Append a node with no inputs and an unassigned output; return its id.
    pub fn add_inference(&mut self) -> FuzzyResult<Id> {
        self.check_initialized()?;
        let id = Id::mint();
        let ni = self.inferences.len();
        self.inferences.push(InferenceNode::new(id.clone()));
        self.index.insert(id.clone(), Location::Inference(ni));
        debug!(%id, "inference added");
        Ok(id)
    }

    /// Remove the node named by `id`. Nodes that used it as input are left as
    /// they are.
    pub fn remove_inference(&mut self, id: &Id) -> FuzzyResult<InferenceNode> {
        let ni = self.inference_index(id)?;
        let removed = self.inferences.remove(ni);
        self.rebuild_index();
        debug!(%id, "inference removed");
        Ok(removed)
    }

    /// Number of inference nodes.
    pub fn inference_count(&self) -> FuzzyResult<usize> {
        self.check_initialized()?;
        Ok(self.inferences.len())
    }

    /// All inference nodes in container (evaluation) order.
    pub fn inferences(&self) -> FuzzyResult<&[InferenceNode]> {
        self.check_initialized()?;
        Ok(&self.inferences)
    }

    /// Node at `index`.
    pub fn inference(&self, index: usize) -> FuzzyResult<&InferenceNode> {
        self.check_initialized()?;
        self.inferences.get(index).ok_or(FuzzyError::IndexOutOfRange {
            index,
            len: self.inferences.len(),
        })
    }

    /// Node named by `id`.
    pub fn inference_by_id(&self, id: &Id) -> FuzzyResult<&InferenceNode> {
        let ni = self.inference_index(id)?;
        Ok(&self.inferences[ni])
    }

    /// Mutable node named by `id`. References are changed through the
    /// container setters.
    pub fn inference_mut(&mut self, id: &Id) -> FuzzyResult<&mut InferenceNode> {
        let ni = self.inference_index(id)?;
        Ok(&mut self.inferences[ni])
    }

    /// Position of the node named by `id`.
    pub fn inference_index(&self, id: &Id) -> FuzzyResult<usize> {
        self.check_initialized()?;
        match self.locate(id) {
            Some(Location::Inference(ni)) => Ok(ni),
            _ => Err(FuzzyError::NotFound(id.clone())),
        }
    }

    /// Set the operator of `node`, returning the previous one.
    pub fn set_operator(&mut self, node: &Id, operator: Operator) -> FuzzyResult<Operator> {
        let node = self.inference_mut(node)?;
        Ok(core::mem::replace(&mut node.operator, operator))
    }

    /// Set the input on `side` of `node` without a cycle check, returning the
    /// previous reference. Any id is accepted; unresolvable ones evaluate as
    /// unresolved.
    ///
    /// See [`link_input`](Self::link_input).
    pub fn set_input(
        &mut self,
        node: &Id,
        side: InputSide,
        input: Option<Id>,
    ) -> FuzzyResult<Option<Id>> {
        let node = self.inference_mut(node)?;
        Ok(node.replace_input(side, input))
    }

    /// Shorthand for [`set_input`](Self::set_input) on the left side.
    pub fn set_left_input(&mut self, node: &Id, input: Option<Id>) -> FuzzyResult<Option<Id>> {
        self.set_input(node, InputSide::Left, input)
    }

    /// Shorthand for [`set_input`](Self::set_input) on the right side.
    pub fn set_right_input(&mut self, node: &Id, input: Option<Id>) -> FuzzyResult<Option<Id>> {
        self.set_input(node, InputSide::Right, input)
    }

    /// Point the output of `node` at a defuzzification set.
    ///
    /// Anything that is not a defuzzification set (including `None`) unassigns
    /// the output. Returns whether the output ended up assigned.
    pub fn set_output(&mut self, node: &Id, output: Option<Id>) -> FuzzyResult<bool> {
        let ni = self.inference_index(node)?;
        let output = output.filter(|id| self.is_defuzzification_set_id(id));
        let node = &mut self.inferences[ni];
        match output {
            Some(id) => {
                node.assign_output(id);
                Ok(true)
            }
            None => {
                node.unassign_output();
                Ok(false)
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
