//! Human-readable explanations of resolved outcomes

use crate::fact::{ContainerKind, ElementCapability, Query};
use crate::outcome::{Outcome, OwnershipMode};
use serde::Serialize;
use std::fmt;

/// Two-line explanation of one resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    /// What happens to each element, e.g. "`v.iter()` borrows each element"
    pub summary: String,
    /// Why the container is or is not usable afterwards
    pub rationale: String,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        write!(f, "  {}", self.rationale)
    }
}

pub fn explain(query: &Query, outcome: &Outcome) -> Explanation {
    let spelling = query.form().surface();
    let noun = container_noun(query.container());
    let action = match outcome.ownership_mode {
        OwnershipMode::Copy => "copies each element out of",
        OwnershipMode::Move => "moves each element out of",
        OwnershipMode::Borrow => "borrows each element of",
        OwnershipMode::MutableBorrow => "mutably borrows each element of",
    };
    let summary = format!("`{spelling}` {action} the {noun}");

    let rationale = match (outcome.ownership_mode, query.container(), query.element()) {
        (OwnershipMode::Copy, _, _) => format!(
            "{} elements are duplicated, so nothing is moved and the {noun} stays usable",
            element_adjective(query.element())
        ),
        (OwnershipMode::Move, ContainerKind::Growable, ElementCapability::Duplicable) => format!(
            "the {noun} owns its backing storage, which is consumed by the loop even though \
             the elements are duplicable; the {noun} cannot be used afterwards"
        ),
        (OwnershipMode::Move, ContainerKind::Growable, ElementCapability::Unique) => format!(
            "the {noun}'s backing storage and its elements are consumed; the {noun} cannot \
             be used afterwards"
        ),
        (OwnershipMode::Move, ContainerKind::FixedLength, _) => format!(
            "unique elements cannot be duplicated, so they are moved out and the {noun} \
             cannot be used afterwards"
        ),
        (OwnershipMode::Borrow, _, _) => format!(
            "read-only references do not transfer ownership; the {noun} stays usable"
        ),
        (OwnershipMode::MutableBorrow, _, _) => format!(
            "elements may be modified in place through exclusive references; the {noun} \
             stays usable once the loop ends"
        ),
    };

    Explanation { summary, rationale }
}

fn container_noun(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::FixedLength => "array",
        ContainerKind::Growable => "vector",
    }
}

fn element_adjective(capability: ElementCapability) -> &'static str {
    match capability {
        ElementCapability::Duplicable => "Duplicable",
        ElementCapability::Unique => "Unique",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::{make_query, IterationForm};
    use crate::resolve::resolve;

    fn explain_for(
        container: ContainerKind,
        element: ElementCapability,
        form: IterationForm,
    ) -> Explanation {
        let query = make_query(container, element, form, true).unwrap();
        explain(&query, &resolve(&query))
    }

    #[test]
    fn test_copy_summary() {
        let explanation = explain_for(
            ContainerKind::FixedLength,
            ElementCapability::Duplicable,
            IterationForm::ByValue,
        );
        assert_eq!(
            explanation.summary,
            "`for x in c` copies each element out of the array"
        );
        assert!(explanation.rationale.contains("stays usable"));
    }

    #[test]
    fn test_growable_duplicable_mentions_storage() {
        let explanation = explain_for(
            ContainerKind::Growable,
            ElementCapability::Duplicable,
            IterationForm::OwningIterator,
        );
        assert!(explanation.rationale.contains("backing storage"));
        assert!(explanation.rationale.contains("cannot be used afterwards"));
    }

    #[test]
    fn test_display_is_two_lines() {
        let explanation = explain_for(
            ContainerKind::Growable,
            ElementCapability::Unique,
            IterationForm::MutableReferenceIterator,
        );
        let text = explanation.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("`c.iter_mut()` mutably borrows each element of the vector"));
    }
}
