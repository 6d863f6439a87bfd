/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Cycle-safe linking and the choices an editor offers for each slot.
//!
//! [`FuzzyLogic::link_input`] is the checked way to wire a node: the link is
//! committed tentatively, both ends are checked for cycles, and the previous
//! reference is restored if either end became cyclic.
//!
//! The candidate lists mirror what a node editor shows in its drop-downs, with the
//! labels it displays:
//!
//! | Slot | Candidates, in order |
//! |------|----------------------|
//! | input | fuzzifications; named other nodes; unnamed other nodes |
//! | set of a fuzzification | its membership sets |
//! | output | `_` (unassigned); named free output sets; unnamed free output sets |

use alloc::string::String;
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::error::{FuzzyError, FuzzyResult};
use crate::id::Id;
use crate::inference::InputSide;
use crate::model::{FuzzyLogic, Reference};

/// Label shown for an unassigned output.
pub const UNASSIGNED_LABEL: &str = "_";

/// One choice in an editor drop-down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The id stored if this choice is picked.
    pub id: Id,
    /// What the editor displays.
    pub label: String,
}

impl Candidate {
    fn new(id: &Id, label: String) -> Self {
        Self {
            id: id.clone(),
            label,
        }
    }
}

impl FuzzyLogic {
    // ── Checked mutation ───────────────────────────────────────────────────

    /// Link the input on `side` of `node` to `target`.
    ///
    /// - A fuzzification links to its first membership set.
    /// - A fuzzification set links directly.
    /// - An inference node links if neither `node` nor `target` ends up on a cycle;
    ///   otherwise the previous link is restored and
    ///   [`FuzzyError::CycleDetected`] is returned.
    /// - Anything else (including a fuzzification with no sets) is
    ///   [`FuzzyError::NotFound`].
    pub fn link_input(&mut self, node: &Id, side: InputSide, target: &Id) -> FuzzyResult<()> {
        self.inference_index(node)?;
        let (resolved, is_inference) = match self.resolve(target) {
            Reference::Fuzzification(variable) => match variable.set(0) {
                Some(first) => (first.id().clone(), false),
                None => return Err(FuzzyError::NotFound(target.clone())),
            },
            Reference::FuzzificationSet { set, .. } => (set.id().clone(), false),
            Reference::Inference(other) => (other.id().clone(), true),
            _ => return Err(FuzzyError::NotFound(target.clone())),
        };

        let previous = self.set_input(node, side, Some(resolved.clone()))?;
        if is_inference && (self.has_cycle(node)? || self.has_cycle(&resolved)?) {
            self.set_input(node, side, previous)?;
            warn!(%node, target = %resolved, "cycle reference is not allowed, link rolled back");
            return Err(FuzzyError::CycleDetected(node.clone()));
        }
        debug!(%node, ?side, input = %resolved, "input linked");
        Ok(())
    }

    // ── Candidates ─────────────────────────────────────────────────────────

    /// Choices for an input of `node`: every fuzzification, then the other nodes
    /// with a name, then the other nodes without one.
    pub fn input_candidates(&self, node: &Id) -> FuzzyResult<Vec<Candidate>> {
        self.inference_index(node)?;
        let mut out: Vec<Candidate> = self
            .fuzzifications
            .iter()
            .enumerate()
            .map(|(i, v)| Candidate::new(v.id(), v.label("Fuzzification", i)))
            .collect();

        let others = || {
            self.inferences
                .iter()
                .enumerate()
                .filter(|(_, other)| other.id() != node)
        };
        out.extend(
            others()
                .filter(|(_, other)| has_name(other.name.as_deref()))
                .map(|(i, other)| Candidate::new(other.id(), other.label(i))),
        );
        out.extend(
            others()
                .filter(|(_, other)| !has_name(other.name.as_deref()))
                .map(|(i, other)| Candidate::new(other.id(), other.label(i))),
        );
        Ok(out)
    }

    /// Choices among the membership sets of the fuzzification `variable`.
    pub fn set_candidates(&self, variable: &Id) -> FuzzyResult<Vec<Candidate>> {
        let variable = self.fuzzification_by_id(variable)?;
        Ok(variable
            .sets()
            .iter()
            .enumerate()
            .map(|(i, set)| Candidate::new(set.id(), set.label(i)))
            .collect())
    }

    /// Choices for the output of `node`: unassigned, then free named output sets,
    /// then free unnamed ones. A set is free when no other node targets it.
    pub fn output_candidates(&self, node: &Id) -> FuzzyResult<Vec<Candidate>> {
        self.inference_index(node)?;
        let defuzzification = self.defuzzification()?;
        let taken_by_other = |set: &Id| {
            self.inferences
                .iter()
                .any(|other| other.id() != node && other.output() == set)
        };
        let free = || {
            defuzzification
                .sets()
                .iter()
                .enumerate()
                .filter(|(_, set)| !taken_by_other(set.id()))
        };

        let mut out = alloc::vec![Candidate::new(node, String::from(UNASSIGNED_LABEL))];
        out.extend(
            free()
                .filter(|(_, set)| has_name(set.name.as_deref()))
                .map(|(i, set)| Candidate::new(set.id(), set.label(i))),
        );
        out.extend(
            free()
                .filter(|(_, set)| !has_name(set.name.as_deref()))
                .map(|(i, set)| Candidate::new(set.id(), set.label(i))),
        );
        Ok(out)
    }
}

fn has_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| !n.trim().is_empty())
}
