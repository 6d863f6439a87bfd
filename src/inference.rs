/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Inference nodes: the rule units of the control graph.
//!
//! A node holds an [`Operator`], up to two input references and one output
//! reference, all as [`Id`]s. What an input id names (a fuzzification set or
//! another node) is decided at evaluation time by the container's classification.
//!
//! # Invariants
//!
//! - **FLS-INF-001** — An unassigned output is the node's own id, which never names a
//!   defuzzification set, so the node writes nothing.
//! - **FLS-INF-002** — The right input only takes part in evaluation when the operator
//!   is binary. Cycle checks follow it regardless.

use alloc::string::String;

use crate::id::Id;
use crate::ops::Operator;

/// Which input slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSide {
    /// The left (or only) input.
    Left,
    /// The right input of a binary operator.
    Right,
}

/// A rule unit combining one or two resolved degrees.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceNode {
    id: Id,
    /// Display name. `None` displays as `Inference<index>`.
    pub name: Option<String>,
    /// Operator applied to the inputs.
    pub operator: Operator,
    left_input: Option<Id>,
    right_input: Option<Id>,
    output: Id,
}

impl InferenceNode {
    /// A node with no inputs and an unassigned output.
    pub fn new(id: Id) -> Self {
        let output = id.clone();
        Self {
            id,
            name: None,
            operator: Operator::default(),
            left_input: None,
            right_input: None,
            output,
        }
    }

    /// This node's identifier.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Display label: the name when set and non-blank, otherwise `Inference<index>`.
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => String::from(name),
            _ => alloc::format!("Inference{}", index),
        }
    }

    /// Left input reference.
    pub fn left_input(&self) -> Option<&Id> {
        self.left_input.as_ref()
    }

    /// Right input reference. Stored even while the operator is unary.
    pub fn right_input(&self) -> Option<&Id> {
        self.right_input.as_ref()
    }

    /// Input reference on `side`.
    pub fn input(&self, side: InputSide) -> Option<&Id> {
        match side {
            InputSide::Left => self.left_input(),
            InputSide::Right => self.right_input(),
        }
    }

    /// Every stored input, left first, whether or not the operator evaluates it.
    pub fn inputs(&self) -> impl Iterator<Item = &Id> {
        self.left_input.iter().chain(self.right_input.iter())
    }

    /// Inputs the current operator evaluates, left first.
    pub fn active_inputs(&self) -> impl Iterator<Item = &Id> {
        let right = if self.operator.uses_right() {
            self.right_input.as_ref()
        } else {
            None
        };
        self.left_input.as_ref().into_iter().chain(right)
    }

    /// Output reference. Equal to [`id`](Self::id) while unassigned.
    pub fn output(&self) -> &Id {
        &self.output
    }

    /// Whether the output is unassigned.
    pub fn output_is_unassigned(&self) -> bool {
        self.output == self.id
    }

    /// Replace the input on `side`, returning the previous reference.
    pub(crate) fn replace_input(&mut self, side: InputSide, input: Option<Id>) -> Option<Id> {
        let slot = match side {
            InputSide::Left => &mut self.left_input,
            InputSide::Right => &mut self.right_input,
        };
        core::mem::replace(slot, input)
    }

    pub(crate) fn assign_output(&mut self, output: Id) {
        self.output = output;
    }

    pub(crate) fn unassign_output(&mut self) {
        self.output = self.id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_new_node_is_unassigned() {
        let node = InferenceNode::new(Id::from("n"));
        assert!(node.output_is_unassigned());
        assert_eq!(node.output(), node.id());
        assert_eq!(node.left_input(), None);
        assert_eq!(node.operator, Operator::And);
    }

    #[test]
    fn test_active_inputs_follow_operator_arity() {
        let mut node = InferenceNode::new(Id::from("n"));
        node.replace_input(InputSide::Left, Some(Id::from("l")));
        node.replace_input(InputSide::Right, Some(Id::from("r")));

        let active: Vec<&str> = node.active_inputs().map(Id::as_str).collect();
        assert_eq!(active, ["l", "r"]);

        node.operator = Operator::Not;
        let active: Vec<&str> = node.active_inputs().map(Id::as_str).collect();
        assert_eq!(active, ["l"]);
        assert_eq!(node.right_input().map(Id::as_str), Some("r"));

        let stored: Vec<&str> = node.inputs().map(Id::as_str).collect();
        assert_eq!(stored, ["l", "r"]);
    }

    #[test]
    fn test_replace_input_returns_previous() {
        let mut node = InferenceNode::new(Id::from("n"));
        assert_eq!(node.replace_input(InputSide::Left, Some(Id::from("a"))), None);
        assert_eq!(
            node.replace_input(InputSide::Left, Some(Id::from("b"))),
            Some(Id::from("a"))
        );
    }

    #[test]
    fn test_label() {
        let mut node = InferenceNode::new(Id::from("n"));
        assert_eq!(node.label(4), "Inference4");
        node.name = Some(String::from("hot_and_humid"));
        assert_eq!(node.label(4), "hot_and_humid");
    }
}
