//! Declarative record schema.
//!
//! Every record type exposes a static table of [`FieldSpec`]s describing
//! where each field lives on the wire, whether it must be present, and which
//! scalar codec (or nested record) reads and writes it. The generic routines
//! in [`crate::codec`] are the only code that walks XML; records only hand
//! out typed accessors.

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::scalar::TimeSpan;
use crate::xml::{Element, Node};

/// Where a field is found inside its record's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// An attribute on the record element.
    Attribute(&'static str),
    /// A single child element.
    Element(&'static str),
    /// Repeated `item` children nested inside one `wrapper` child.
    Wrapped {
        wrapper: &'static str,
        item: &'static str,
    },
    /// The record element's own text content. Whitespace-only text counts
    /// as missing.
    Text,
    /// Every child node not claimed by another field, kept verbatim.
    Remainder,
}

/// What happens when a field is missing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Binding fails with a schema error.
    Required,
    /// The field stays empty.
    Optional,
    /// The record's default value is kept and the field is tagged
    /// [`Origin::Defaulted`].
    Defaulted,
}

/// How a field received its current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Never set: missing from the input and not defaulted.
    #[default]
    Absent,
    /// Missing from the input; holds the declared default.
    Defaulted,
    /// Read from the input or assigned by a builder.
    Explicit,
}

/// Emission policy for [`crate::codec::unbind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Emit {
    /// Only fields tagged [`Origin::Explicit`]. Reproduces the input.
    #[default]
    ExcludeUnset,
    /// Every field that holds a value, defaults included.
    ExcludeNone,
    /// Every declared field; element fields without a value are written as
    /// empty elements.
    IncludeAll,
}

/// Typed getter/setter pair for a scalar field.
pub struct Accessor<R, T> {
    pub get: fn(&R) -> Option<T>,
    pub set: fn(&mut R, T),
}

/// The codec applied to a field, carrying the record's accessors for it.
pub enum Codec<R> {
    Text(Accessor<R, String>),
    Count(Accessor<R, u32>),
    /// Duration written with a seven-digit tick fraction.
    Time(Accessor<R, TimeSpan>),
    /// Duration whose tick fraction is only written when non-zero.
    Offset(Accessor<R, TimeSpan>),
    DateTime(Accessor<R, NaiveDateTime>),
    Flag(Accessor<R, bool>),
    /// Child nodes passed through untouched.
    Raw(Accessor<R, Vec<Node>>),
    /// A single nested record.
    Record {
        bind: fn(&mut R, Nested<'_>) -> Result<()>,
        unbind: fn(&R, Emit) -> Option<Element>,
    },
    /// A list of nested records.
    Records {
        bind: fn(&mut R, Vec<Nested<'_>>) -> Result<()>,
        unbind: fn(&R, Emit) -> Option<Vec<Element>>,
    },
}

/// One row of a record's field table.
pub struct FieldSpec<R> {
    pub name: &'static str,
    pub location: Location,
    pub presence: Presence,
    pub codec: Codec<R>,
}

/// An element located for a nested record field, with its path for errors.
#[derive(Debug, Clone, Copy)]
pub struct Nested<'a> {
    pub element: &'a Element,
    pub(crate) path: &'a str,
}

impl Nested<'_> {
    /// Bind the located element as record type `T`.
    pub fn bind<T: Record>(self) -> Result<T> {
        crate::codec::bind_at(self.element, self.path)
    }
}

/// Bind every located element as record type `T`, keeping order.
pub fn bind_all<T: Record>(items: Vec<Nested<'_>>) -> Result<Vec<T>> {
    items.into_iter().map(Nested::bind).collect()
}

/// Unbind every record in order.
pub fn unbind_all<T: Record>(records: &[T], emit: Emit) -> Vec<Element> {
    records
        .iter()
        .map(|record| crate::codec::unbind(record, emit))
        .collect()
}

/// Per-field origin tags of one record instance, indexed like its table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origins(Vec<Origin>);

impl Origins {
    #[must_use]
    pub fn get(&self, index: usize) -> Origin {
        self.0.get(index).copied().unwrap_or_default()
    }

    pub fn set(&mut self, index: usize, origin: Origin) {
        if self.0.len() <= index {
            self.0.resize(index + 1, Origin::Absent);
        }
        self.0[index] = origin;
    }
}

/// A record type bound from and unbound to one XML element.
pub trait Record: Default + Sized + 'static {
    /// Tag used when the record is the document root.
    const TAG: &'static str;

    /// The record's field table, in canonical emission order.
    fn fields() -> &'static [FieldSpec<Self>];

    fn origins(&self) -> &Origins;

    fn origins_mut(&mut self) -> &mut Origins;

    /// Record-level invariants checked after every field is bound.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Origin of the field named `name` (as declared in the table).
    fn origin(&self, name: &str) -> Origin {
        Self::fields()
            .iter()
            .position(|field| field.name == name)
            .map_or(Origin::Absent, |index| self.origins().get(index))
    }

    /// Tag a field as explicitly set; used by builders.
    fn mark_explicit(&mut self, name: &str) {
        if let Some(index) = Self::fields().iter().position(|field| field.name == name) {
            self.origins_mut().set(index, Origin::Explicit);
        }
    }
}

impl<R> FieldSpec<R> {
    pub const fn text(
        name: &'static str,
        location: Location,
        presence: Presence,
        get: fn(&R) -> Option<String>,
        set: fn(&mut R, String),
    ) -> Self {
        Self {
            name,
            location,
            presence,
            codec: Codec::Text(Accessor { get, set }),
        }
    }

    pub const fn time(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<TimeSpan>,
        set: fn(&mut R, TimeSpan),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Optional,
            codec: Codec::Time(Accessor { get, set }),
        }
    }

    /// A defaulted duration written with the offset rule.
    pub const fn offset(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<TimeSpan>,
        set: fn(&mut R, TimeSpan),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Defaulted,
            codec: Codec::Offset(Accessor { get, set }),
        }
    }

    /// A defaulted non-negative integer.
    pub const fn count(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<u32>,
        set: fn(&mut R, u32),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Defaulted,
            codec: Codec::Count(Accessor { get, set }),
        }
    }

    pub const fn raw(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<Vec<Node>>,
        set: fn(&mut R, Vec<Node>),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Optional,
            codec: Codec::Raw(Accessor { get, set }),
        }
    }

    pub const fn datetime(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<NaiveDateTime>,
        set: fn(&mut R, NaiveDateTime),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Optional,
            codec: Codec::DateTime(Accessor { get, set }),
        }
    }

    pub const fn flag(
        name: &'static str,
        location: Location,
        get: fn(&R) -> Option<bool>,
        set: fn(&mut R, bool),
    ) -> Self {
        Self {
            name,
            location,
            presence: Presence::Optional,
            codec: Codec::Flag(Accessor { get, set }),
        }
    }

    pub const fn record(
        name: &'static str,
        location: Location,
        presence: Presence,
        bind: fn(&mut R, Nested<'_>) -> Result<()>,
        unbind: fn(&R, Emit) -> Option<Element>,
    ) -> Self {
        Self {
            name,
            location,
            presence,
            codec: Codec::Record { bind, unbind },
        }
    }

    pub const fn records(
        name: &'static str,
        location: Location,
        presence: Presence,
        bind: fn(&mut R, Vec<Nested<'_>>) -> Result<()>,
        unbind: fn(&R, Emit) -> Option<Vec<Element>>,
    ) -> Self {
        Self {
            name,
            location,
            presence,
            codec: Codec::Records { bind, unbind },
        }
    }
}
