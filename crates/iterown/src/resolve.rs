//! Ownership-mode resolution for iteration
//!
//! The resolver maps a validated [`Query`] to an [`Outcome`] using a fixed
//! decision table:
//!
//! | form                                      | container    | element    | mode           |
//! |-------------------------------------------|--------------|------------|----------------|
//! | `ByValue` / `OwningIterator`              | fixed length | duplicable | copy           |
//! | `ByValue` / `OwningIterator`              | fixed length | unique     | move           |
//! | `ByValue` / `OwningIterator`              | growable     | any        | move           |
//! | `BySharedReference` / `ReferenceIterator` | any          | any        | borrow         |
//! | `ByMutableReference` / `MutableReferenceIterator` | any  | any        | mutable borrow |
//!
//! A growable container owns its backing storage separately from its
//! binding, so owning iteration always consumes it even when the elements
//! are duplicable. A fixed-length container is only consumed when elements
//! have to be moved out of it.

use crate::fact::{Access, ContainerKind, ElementCapability, IterationForm, Query};
use crate::outcome::{Outcome, OwnershipMode};
use log::trace;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Which generation of iteration rules to apply
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Arrays iterate by value through `into_iter()` (2021 edition onwards)
    #[default]
    Modern,
    /// `array.into_iter()` resolves to the by-reference iterator
    #[strum(serialize = "legacy2018")]
    #[serde(rename = "legacy2018")]
    Legacy2018,
}

/// Stateless resolver bound to a rule set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolver {
    rule_set: RuleSet,
}

impl Resolver {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rule_set
    }

    /// Resolve a validated query
    pub fn resolve(&self, query: &Query) -> Outcome {
        let mode = match self.rule_set {
            RuleSet::Modern => modern_mode(query.form(), query.container(), query.element()),
            RuleSet::Legacy2018 => legacy_mode(query.form(), query.container(), query.element()),
        };
        trace!(
            "resolved {} over {} of {} elements as {} ({})",
            query.form(),
            query.container(),
            query.element(),
            mode,
            self.rule_set
        );
        Outcome::of(mode)
    }
}

/// Resolve with the default (modern) rule set
pub fn resolve(query: &Query) -> Outcome {
    Resolver::default().resolve(query)
}

fn modern_mode(
    form: IterationForm,
    container: ContainerKind,
    element: ElementCapability,
) -> OwnershipMode {
    use ContainerKind::*;
    use ElementCapability::*;

    match (form.access(), container, element) {
        (Access::Consume, FixedLength, Duplicable) => OwnershipMode::Copy,
        (Access::Consume, FixedLength, Unique) => OwnershipMode::Move,
        (Access::Consume, Growable, Duplicable) => OwnershipMode::Move,
        (Access::Consume, Growable, Unique) => OwnershipMode::Move,
        (Access::Shared, _, _) => OwnershipMode::Borrow,
        (Access::Exclusive, _, _) => OwnershipMode::MutableBorrow,
    }
}

fn legacy_mode(
    form: IterationForm,
    container: ContainerKind,
    element: ElementCapability,
) -> OwnershipMode {
    match (form, container) {
        (IterationForm::OwningIterator, ContainerKind::FixedLength) => OwnershipMode::Borrow,
        _ => modern_mode(form, container, element),
    }
}

/// One row of an exported decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub form: IterationForm,
    pub container: ContainerKind,
    pub element: ElementCapability,
    pub outcome: Outcome,
}

/// Every (form, container, element) combination and its outcome
///
/// Rows are produced in declaration order, form-major. Queries use a
/// mutable binding so every form is admissible.
pub fn decision_table(rule_set: RuleSet) -> Vec<TableRow> {
    let resolver = Resolver::new(rule_set);
    let mut rows = Vec::new();
    for form in IterationForm::iter() {
        for container in ContainerKind::iter() {
            for element in ElementCapability::iter() {
                let query = Query::through_mutable_binding(container, element, form);
                rows.push(TableRow {
                    form,
                    container,
                    element,
                    outcome: resolver.resolve(&query),
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::make_query;
    use pretty_assertions::assert_eq;

    fn query(
        container: ContainerKind,
        element: ElementCapability,
        form: IterationForm,
    ) -> Query {
        make_query(container, element, form, true).unwrap()
    }

    #[test]
    fn test_growable_duplicable_still_moves() {
        for form in [IterationForm::ByValue, IterationForm::OwningIterator] {
            let outcome = resolve(&query(
                ContainerKind::Growable,
                ElementCapability::Duplicable,
                form,
            ));
            assert_eq!(outcome.ownership_mode, OwnershipMode::Move);
            assert!(!outcome.container_usable_after);
        }
    }

    #[test]
    fn test_fixed_duplicable_copies() {
        let outcome = resolve(&query(
            ContainerKind::FixedLength,
            ElementCapability::Duplicable,
            IterationForm::OwningIterator,
        ));
        assert_eq!(outcome, Outcome::of(OwnershipMode::Copy));
    }

    #[test]
    fn test_legacy_array_into_iter_borrows() {
        let resolver = Resolver::new(RuleSet::Legacy2018);
        for element in ElementCapability::iter() {
            let outcome = resolver.resolve(&query(
                ContainerKind::FixedLength,
                element,
                IterationForm::OwningIterator,
            ));
            assert_eq!(outcome, Outcome::of(OwnershipMode::Borrow));
        }
    }

    #[test]
    fn test_legacy_keeps_by_value_loops() {
        let resolver = Resolver::new(RuleSet::Legacy2018);
        let outcome = resolver.resolve(&query(
            ContainerKind::FixedLength,
            ElementCapability::Unique,
            IterationForm::ByValue,
        ));
        assert_eq!(outcome.ownership_mode, OwnershipMode::Move);

        let vec_outcome = resolver.resolve(&query(
            ContainerKind::Growable,
            ElementCapability::Duplicable,
            IterationForm::OwningIterator,
        ));
        assert_eq!(vec_outcome.ownership_mode, OwnershipMode::Move);
    }

    #[test]
    fn test_rule_sets_differ_only_on_array_into_iter() {
        let modern = decision_table(RuleSet::Modern);
        let legacy = decision_table(RuleSet::Legacy2018);
        let differing: Vec<_> = modern
            .iter()
            .zip(&legacy)
            .filter(|(m, l)| m.outcome != l.outcome)
            .map(|(m, _)| (m.form, m.container))
            .collect();
        assert_eq!(
            differing,
            vec![
                (IterationForm::OwningIterator, ContainerKind::FixedLength),
                (IterationForm::OwningIterator, ContainerKind::FixedLength),
            ]
        );
    }

    #[test]
    fn test_decision_table_is_complete() {
        let rows = decision_table(RuleSet::Modern);
        assert_eq!(rows.len(), 6 * 2 * 2);
        assert_eq!(rows[0].form, IterationForm::ByValue);
        assert_eq!(rows[0].container, ContainerKind::FixedLength);
        assert_eq!(rows[0].element, ElementCapability::Duplicable);
        assert!(rows.iter().all(|row| row.outcome.valid));
    }

    #[test]
    fn test_rule_set_names() {
        assert_eq!(RuleSet::Legacy2018.to_string(), "legacy2018");
        assert_eq!("modern".parse::<RuleSet>().unwrap(), RuleSet::Modern);
        assert_eq!(RuleSet::default(), RuleSet::Modern);
    }
}
