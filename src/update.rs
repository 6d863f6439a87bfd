/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The update pass: write inference results into defuzzification heights.
//!
//! One call is a full, independent recomputation from the current baselines.
//!
//! ```text
//! evaluation disabled:  every output set height := 1
//! evaluation enabled:   for each output set s:
//!                           s.height := 1
//!                           for each node n in container order with n.output == s:
//!                               d := evaluate(n)
//!                               if d resolved and !has_cycle(n): s.height := d
//! ```
//!
//! # Invariants
//!
//! - **FLS-UPD-001** — Several nodes targeting one set: the last in container order wins.
//! - **FLS-UPD-002** — Unresolved and cyclic results are discarded, never written.
//! - **FLS-UPD-003** — No state survives a pass except the heights themselves.

use alloc::vec::Vec;

use tracing::{debug, trace, warn};

use crate::error::{FuzzyError, FuzzyResult};
use crate::evaluate::Evaluator;
use crate::membership::{MembershipGeometry, TrapezoidGeometry};
use crate::model::FuzzyLogic;

/// Tuning for [`FuzzyLogic::run_update_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateConfig {
    /// Cache each node's result for the duration of one pass. Node results are
    /// pure within a pass, so this changes cost, not heights. Default `false`.
    pub memoize: bool,
}

impl UpdateConfig {
    /// Config with per-pass memoization on.
    pub fn memoized() -> Self {
        Self { memoize: true }
    }
}

/// What one update pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Whether evaluation ran (`false`: all heights were reopened).
    pub evaluated: bool,
    /// Results written into a height, counting overwritten ones.
    pub written: usize,
    /// Results discarded because an input did not resolve.
    pub unresolved: usize,
    /// Results discarded because the node is on or behind a cycle.
    pub cyclic: usize,
}

impl FuzzyLogic {
    /// Run one update pass with [`TrapezoidGeometry`] and the default config.
    pub fn run_update(&mut self) -> FuzzyResult<UpdateReport> {
        self.run_update_with(&TrapezoidGeometry, &UpdateConfig::default())
    }

    /// Run one update pass.
    pub fn run_update_with<G: MembershipGeometry + ?Sized>(
        &mut self,
        geometry: &G,
        config: &UpdateConfig,
    ) -> FuzzyResult<UpdateReport> {
        self.check_initialized()?;
        let mut report = UpdateReport::default();

        if !self.evaluation_enabled() {
            for set in self.defuzzification_mut()?.sets_mut() {
                set.height = 1.0;
            }
            trace!("evaluation disabled, output heights reopened");
            return Ok(report);
        }
        report.evaluated = true;

        let heights = self.plan_heights(geometry, config, &mut report)?;
        for (set, height) in self.defuzzification_mut()?.sets_mut().iter_mut().zip(heights) {
            set.height = height;
        }

        debug!(
            written = report.written,
            unresolved = report.unresolved,
            cyclic = report.cyclic,
            "update pass complete"
        );
        Ok(report)
    }

    /// New height for every output set, in set order. Reads only; nothing an
    /// evaluation resolves is an output height.
    fn plan_heights<G: MembershipGeometry + ?Sized>(
        &self,
        geometry: &G,
        config: &UpdateConfig,
        report: &mut UpdateReport,
    ) -> FuzzyResult<Vec<f32>> {
        let mut evaluator = Evaluator::new(self, geometry)?;
        if config.memoize {
            evaluator = evaluator.memoized();
        }

        let defuzzification = self.defuzzification()?;
        let mut heights = Vec::with_capacity(defuzzification.set_count());
        for set in defuzzification.sets() {
            let mut height = 1.0;
            for node in self.inferences.iter().filter(|n| n.output() == set.id()) {
                match evaluator.evaluate(node.id()) {
                    Ok(_) if self.has_cycle(node.id())? => {
                        report.cyclic += 1;
                        warn!(node = %node.id(), "cycle reference, result discarded");
                    }
                    Ok(degree) => {
                        height = degree;
                        report.written += 1;
                    }
                    Err(FuzzyError::UnresolvedReference(input)) => {
                        report.unresolved += 1;
                        trace!(node = %node.id(), %input, "unresolved input, result discarded");
                    }
                    Err(FuzzyError::CycleDetected(via)) => {
                        report.cyclic += 1;
                        warn!(node = %node.id(), %via, "cycle reference, result discarded");
                    }
                    Err(structural) => return Err(structural),
                }
            }
            heights.push(height);
        }
        Ok(heights)
    }
}
