//! Linguistic variables: ordered collections of membership sets over one axis.
//!
//! A [`Fuzzification`] is an input axis; the single [`Defuzzification`] is the
//! output axis whose set heights inference nodes write. Both have the same shape,
//! so they share [`Variable`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::Id;
use crate::membership::MembershipSet;

/// An ordered collection of [`MembershipSet`]s plus the crisp value currently set
/// on its baseline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    id: Id,
    /// Display name. `None` displays as `Fuzzification<index>`.
    pub name: Option<String>,
    sets: Vec<MembershipSet>,
    /// Crisp value on the baseline, fed to the geometry when a set is resolved.
    pub input_value: f32,
}

/// An input linguistic variable.
pub type Fuzzification = Variable;

/// The output linguistic variable.
pub type Defuzzification = Variable;

impl Variable {
    /// An empty variable with its baseline at zero.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            name: None,
            sets: Vec::new(),
            input_value: 0.0,
        }
    }

    /// This variable's identifier.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Display label: the name when set and non-blank, otherwise `<prefix><index>`.
    pub fn label(&self, prefix: &str, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => String::from(name),
            _ => alloc::format!("{}{}", prefix, index),
        }
    }

    /// Membership sets in display order.
    pub fn sets(&self) -> &[MembershipSet] {
        &self.sets
    }

    /// Mutable view of the sets. Ids cannot be changed through it.
    pub fn sets_mut(&mut self) -> &mut [MembershipSet] {
        &mut self.sets
    }

    /// Number of membership sets.
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Set at `index`, if any.
    pub fn set(&self, index: usize) -> Option<&MembershipSet> {
        self.sets.get(index)
    }

    /// Position of the set named by `id`.
    pub fn set_position(&self, id: &Id) -> Option<usize> {
        self.sets.iter().position(|s| s.id() == id)
    }

    /// Set named by `id`.
    pub fn set_by_id(&self, id: &Id) -> Option<&MembershipSet> {
        self.sets.iter().find(|s| s.id() == id)
    }

    /// Mutable set named by `id`.
    pub fn set_by_id_mut(&mut self, id: &Id) -> Option<&mut MembershipSet> {
        self.sets.iter_mut().find(|s| s.id() == id)
    }

    pub(crate) fn push_set(&mut self, set: MembershipSet) {
        self.sets.push(set);
    }

    pub(crate) fn remove_set(&mut self, id: &Id) -> Option<MembershipSet> {
        let pos = self.set_position(id)?;
        Some(self.sets.remove(pos))
    }

    pub(crate) fn reset_sets(&mut self) {
        for set in &mut self.sets {
            set.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_lookup_and_removal() {
        let mut v = Variable::new(Id::from("v"));
        v.push_set(MembershipSet::new(Id::from("a")));
        v.push_set(MembershipSet::new(Id::from("b")));

        assert_eq!(v.set_count(), 2);
        assert_eq!(v.set_position(&Id::from("b")), Some(1));
        assert!(v.remove_set(&Id::from("a")).is_some());
        assert!(v.remove_set(&Id::from("a")).is_none());
        assert_eq!(v.set(0).map(|s| s.id().as_str()), Some("b"));
    }

    #[test]
    fn test_reset_sets_reopens_heights() {
        let mut v = Variable::new(Id::from("v"));
        let mut s = MembershipSet::new(Id::from("a"));
        s.height = 0.2;
        s.clamp_to_unit_interval = false;
        v.push_set(s);

        v.reset_sets();
        assert_eq!(v.sets()[0].height, 1.0);
        assert!(v.sets()[0].clamp_to_unit_interval);
    }

    #[test]
    fn test_label() {
        let mut v = Variable::new(Id::from("v"));
        assert_eq!(v.label("Fuzzification", 2), "Fuzzification2");
        v.name = Some(String::from("Temperature"));
        assert_eq!(v.label("Fuzzification", 2), "Temperature");
    }
}
