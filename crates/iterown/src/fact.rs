//! Fact model for iteration queries
//!
//! A [`Query`] describes a single call site: what kind of container is being
//! iterated, whether its elements can be implicitly duplicated, which
//! iteration form is used, and whether the container is reachable through a
//! mutable binding.
//!
//! # Example
//! ```
//! use iterown::fact::{make_query, ContainerKind, ElementCapability, IterationForm};
//!
//! let query = make_query(
//!     ContainerKind::Growable,
//!     ElementCapability::Unique,
//!     IterationForm::ReferenceIterator,
//!     false,
//! )
//! .unwrap();
//! assert!(!query.mutable_binding());
//! ```

use crate::error::InvalidQuery;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Storage shape of the iterated container
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Length fixed at construction, contiguous, no growth (like `[T; N]`)
    #[strum(to_string = "fixed_length", serialize = "fixed", serialize = "array")]
    FixedLength,
    /// Contiguous and may grow or shrink (like `Vec<T>`)
    #[strum(to_string = "growable", serialize = "vec")]
    Growable,
}

/// Whether an element value can be implicitly duplicated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ElementCapability {
    /// Duplicated without consuming the original (like a `Copy` type)
    #[strum(to_string = "duplicable", serialize = "copy")]
    Duplicable,
    /// Moving the value invalidates the source binding
    #[strum(to_string = "unique", serialize = "move")]
    Unique,
}

/// The way a loop or adapter walks the container
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IterationForm {
    /// `for x in c`
    ByValue,
    /// `for x in &c`
    BySharedReference,
    /// `for x in &mut c`
    ByMutableReference,
    /// `c.into_iter()`
    OwningIterator,
    /// `c.iter()`
    ReferenceIterator,
    /// `c.iter_mut()`
    MutableReferenceIterator,
}

/// Semantic access class of an iteration form
///
/// Two surface spellings exist for each class; the resolver only looks at
/// the class when deciding between borrow kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Access {
    Consume,
    Shared,
    Exclusive,
}

impl IterationForm {
    /// Collapse the surface spelling into its access class
    pub fn access(self) -> Access {
        match self {
            IterationForm::ByValue | IterationForm::OwningIterator => Access::Consume,
            IterationForm::BySharedReference | IterationForm::ReferenceIterator => Access::Shared,
            IterationForm::ByMutableReference | IterationForm::MutableReferenceIterator => {
                Access::Exclusive
            }
        }
    }

    /// True for the two forms that need exclusive access to the container
    pub fn requires_mutable_binding(self) -> bool {
        self.access() == Access::Exclusive
    }

    /// Canonical source spelling, with `c` standing for the container
    pub fn surface(self) -> &'static str {
        match self {
            IterationForm::ByValue => "for x in c",
            IterationForm::BySharedReference => "for x in &c",
            IterationForm::ByMutableReference => "for x in &mut c",
            IterationForm::OwningIterator => "c.into_iter()",
            IterationForm::ReferenceIterator => "c.iter()",
            IterationForm::MutableReferenceIterator => "c.iter_mut()",
        }
    }

    /// Recognize a surface spelling
    ///
    /// Whitespace is normalized and any identifier may stand for the
    /// container, so `for item in &mut items` is recognized as
    /// [`IterationForm::ByMutableReference`].
    pub fn from_surface(text: &str) -> Option<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();
        match words.as_slice() {
            ["for", _, "in", "&mut", _] => Some(IterationForm::ByMutableReference),
            ["for", _, "in", target] => match target.strip_prefix('&') {
                Some("") | Some("mut") => None,
                Some(_) => Some(IterationForm::BySharedReference),
                None if target.contains('.') => Self::from_method_call(target),
                None => Some(IterationForm::ByValue),
            },
            [call] => Self::from_method_call(call),
            _ => None,
        }
    }

    fn from_method_call(call: &str) -> Option<Self> {
        let (_, method) = call.rsplit_once('.')?;
        match method {
            "into_iter()" => Some(IterationForm::OwningIterator),
            "iter()" => Some(IterationForm::ReferenceIterator),
            "iter_mut()" => Some(IterationForm::MutableReferenceIterator),
            _ => None,
        }
    }
}

/// A validated iteration query
///
/// Only [`make_query`] builds one, including when deserializing, so an
/// exclusive form never pairs with an immutable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "QueryFields")]
pub struct Query {
    container: ContainerKind,
    element: ElementCapability,
    form: IterationForm,
    mutable_binding: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryFields {
    container: ContainerKind,
    element: ElementCapability,
    form: IterationForm,
    mutable_binding: bool,
}

impl TryFrom<QueryFields> for Query {
    type Error = InvalidQuery;

    fn try_from(fields: QueryFields) -> Result<Self, Self::Error> {
        make_query(
            fields.container,
            fields.element,
            fields.form,
            fields.mutable_binding,
        )
    }
}

/// Build a query, rejecting exclusive access through an immutable binding
pub fn make_query(
    container: ContainerKind,
    element: ElementCapability,
    form: IterationForm,
    mutable_binding: bool,
) -> Result<Query, InvalidQuery> {
    if form.requires_mutable_binding() && !mutable_binding {
        return Err(InvalidQuery::ImmutableBinding { form, container });
    }
    Ok(Query {
        container,
        element,
        form,
        mutable_binding,
    })
}

impl Query {
    /// Same as [`make_query`]
    pub fn new(
        container: ContainerKind,
        element: ElementCapability,
        form: IterationForm,
        mutable_binding: bool,
    ) -> Result<Self, InvalidQuery> {
        make_query(container, element, form, mutable_binding)
    }

    /// Query through a mutable binding, which admits every form
    pub(crate) fn through_mutable_binding(
        container: ContainerKind,
        element: ElementCapability,
        form: IterationForm,
    ) -> Self {
        Self {
            container,
            element,
            form,
            mutable_binding: true,
        }
    }

    pub fn container(&self) -> ContainerKind {
        self.container
    }

    pub fn element(&self) -> ElementCapability {
        self.element
    }

    pub fn form(&self) -> IterationForm {
        self.form
    }

    pub fn mutable_binding(&self) -> bool {
        self.mutable_binding
    }
}
