//! Generic binding between element trees and records.
//!
//! [`bind`] and [`unbind`] walk a record's field table; they are the only
//! place where wire locations, presence rules and origin bookkeeping are
//! handled, for every record type alike.

use std::collections::HashSet;

use crate::error::{Error, FormatError, Result};
use crate::scalar::{
    decode_count, decode_datetime, decode_flag, decode_time_span, encode_count, encode_datetime,
    encode_flag, encode_offset, encode_time,
};
use crate::schema::{Codec, Emit, FieldSpec, Location, Nested, Origin, Presence, Record};
use crate::xml::{Element, Node};

/// Bind a document root as record type `R`.
///
/// The root tag must equal [`Record::TAG`].
pub fn bind<R: Record>(root: &Element) -> Result<R> {
    if root.tag != R::TAG {
        return Err(Error::schema(
            &root.tag,
            format!("expected root element <{}>", R::TAG),
        ));
    }
    bind_at(root, R::TAG)
}

/// Unbind a record into an element tagged [`Record::TAG`].
///
/// Nested records are re-tagged by their parent's field location.
pub fn unbind<R: Record>(record: &R, emit: Emit) -> Element {
    let mut element = Element::new(R::TAG);
    for (index, field) in R::fields().iter().enumerate() {
        if emit == Emit::ExcludeUnset && record.origins().get(index) != Origin::Explicit {
            continue;
        }
        match encode_field(record, field, emit) {
            Some(encoded) => place(&mut element, field, encoded),
            None if emit == Emit::IncludeAll => place_empty(&mut element, field),
            None => {}
        }
    }
    element
}

/// What was found on the wire for one field.
enum Found<'a> {
    Value(String),
    Element(&'a Element),
    Items(Vec<&'a Element>),
    Nodes(Vec<Node>),
}

/// A field's value ready to be placed on an element.
enum Encoded {
    Value(String),
    Element(Element),
    Items(Vec<Element>),
    Nodes(Vec<Node>),
}

pub(crate) fn bind_at<R: Record>(element: &Element, path: &str) -> Result<R> {
    let fields = R::fields();
    let mut record = R::default();

    for (index, field) in fields.iter().enumerate() {
        let origin = match locate(element, field, fields, path)? {
            Some(found) => {
                decode_field(&mut record, field, found, path)?;
                Origin::Explicit
            }
            None => match field.presence {
                Presence::Required => {
                    return Err(Error::schema(
                        path,
                        format!("missing required {}", describe(field.location, field.name)),
                    ));
                }
                Presence::Optional => Origin::Absent,
                Presence::Defaulted => Origin::Defaulted,
            },
        };
        record.origins_mut().set(index, origin);
    }

    record
        .validate()
        .map_err(|message| Error::schema(path, message))?;
    trace_unknown(element, fields, path);
    Ok(record)
}

fn locate<'a, R>(
    element: &'a Element,
    field: &FieldSpec<R>,
    fields: &[FieldSpec<R>],
    path: &str,
) -> Result<Option<Found<'a>>> {
    let found = match field.location {
        Location::Attribute(name) => element
            .attribute(name)
            .map(|value| Found::Value(value.to_string())),
        Location::Element(tag) => single_child(element, tag, path)?.map(|child| {
            if matches!(field.codec, Codec::Record { .. } | Codec::Raw(_)) {
                Found::Element(child)
            } else {
                Found::Value(child.text().unwrap_or_default())
            }
        }),
        Location::Wrapped { wrapper, item } => single_child(element, wrapper, path)?
            .map(|wrapper| Found::Items(wrapper.children_named(item).collect())),
        Location::Text => element
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(Found::Value),
        Location::Remainder => {
            let claimed = claimed_tags(fields);
            let nodes: Vec<Node> = element
                .children
                .iter()
                .filter(|node| match node {
                    Node::Element(child) => !claimed.contains(child.tag.as_str()),
                    Node::Text(_) => !has_text_field(fields),
                })
                .cloned()
                .collect();
            (!nodes.is_empty()).then_some(Found::Nodes(nodes))
        }
    };
    Ok(found)
}

fn single_child<'a>(
    element: &'a Element,
    tag: &'a str,
    path: &str,
) -> Result<Option<&'a Element>> {
    let mut matches = element.children_named(tag);
    let first = matches.next();
    if matches.next().is_some() {
        return Err(Error::schema(
            path,
            format!("expected at most one <{tag}>, found several"),
        ));
    }
    Ok(first)
}

fn decode_field<R: Record>(
    record: &mut R,
    field: &FieldSpec<R>,
    found: Found<'_>,
    path: &str,
) -> Result<()> {
    let format_error = |source: FormatError| Error::Format {
        path: path.to_string(),
        field: field.name,
        source,
    };

    match (&field.codec, found) {
        (Codec::Text(access), Found::Value(text)) => (access.set)(record, text),
        (Codec::Count(access), Found::Value(text)) => {
            (access.set)(record, decode_count(&text).map_err(format_error)?);
        }
        (Codec::Time(access) | Codec::Offset(access), Found::Value(text)) => {
            (access.set)(record, decode_time_span(&text).map_err(format_error)?);
        }
        (Codec::DateTime(access), Found::Value(text)) => {
            (access.set)(record, decode_datetime(&text).map_err(format_error)?);
        }
        (Codec::Flag(access), Found::Value(text)) => {
            (access.set)(record, decode_flag(&text).map_err(format_error)?);
        }
        (Codec::Raw(access), Found::Nodes(nodes)) => (access.set)(record, nodes),
        (Codec::Raw(access), Found::Element(child)) => (access.set)(record, child.children.clone()),
        (Codec::Record { bind, .. }, Found::Element(child)) => {
            let child_path = format!("{path}/{}", child.tag);
            bind(
                record,
                Nested {
                    element: child,
                    path: &child_path,
                },
            )?;
        }
        (Codec::Records { bind, .. }, Found::Items(items)) => {
            let paths: Vec<String> = match field.location {
                Location::Wrapped { wrapper, item } => (1..=items.len())
                    .map(|position| format!("{path}/{wrapper}/{item}[{position}]"))
                    .collect(),
                _ => vec![path.to_string(); items.len()],
            };
            let nested: Vec<Nested<'_>> = items
                .into_iter()
                .zip(&paths)
                .map(|(element, path)| Nested { element, path })
                .collect();
            bind(record, nested)?;
        }
        _ => {
            return Err(Error::schema(
                path,
                format!("field `{}` has no codec for its location", field.name),
            ));
        }
    }
    Ok(())
}

fn encode_field<R: Record>(record: &R, field: &FieldSpec<R>, emit: Emit) -> Option<Encoded> {
    let encoded = match &field.codec {
        Codec::Text(access) => Encoded::Value((access.get)(record)?),
        Codec::Count(access) => Encoded::Value(encode_count((access.get)(record)?)),
        Codec::Time(access) => Encoded::Value(encode_time((access.get)(record)?, true)),
        Codec::Offset(access) => Encoded::Value(encode_offset((access.get)(record)?)),
        Codec::DateTime(access) => Encoded::Value(encode_datetime((access.get)(record)?)),
        Codec::Flag(access) => Encoded::Value(encode_flag((access.get)(record)?).to_string()),
        Codec::Raw(access) => Encoded::Nodes((access.get)(record)?),
        Codec::Record { unbind, .. } => Encoded::Element(unbind(record, emit)?),
        Codec::Records { unbind, .. } => Encoded::Items(unbind(record, emit)?),
    };
    Some(encoded)
}

fn place<R>(element: &mut Element, field: &FieldSpec<R>, encoded: Encoded) {
    match (field.location, encoded) {
        (Location::Attribute(name), Encoded::Value(value)) => element.push_attribute(name, value),
        (Location::Element(tag), Encoded::Value(text)) => {
            element.push_child(Element::with_text(tag, text));
        }
        (Location::Element(tag), Encoded::Element(mut child)) => {
            child.tag = tag.to_string();
            element.push_child(child);
        }
        (Location::Element(tag), Encoded::Nodes(nodes)) => {
            let mut child = Element::new(tag);
            child.children = nodes;
            element.push_child(child);
        }
        (Location::Wrapped { wrapper, item }, Encoded::Items(items)) => {
            let mut container = Element::new(wrapper);
            for mut child in items {
                child.tag = item.to_string();
                container.push_child(child);
            }
            element.push_child(container);
        }
        (Location::Text, Encoded::Value(text)) => element.push_text(text),
        (Location::Remainder, Encoded::Nodes(nodes)) => element.children.extend(nodes),
        (location, _) => {
            tracing::warn!(
                "Field `{}` cannot be written to {:?}; skipped",
                field.name,
                location
            );
        }
    }
}

fn place_empty<R>(element: &mut Element, field: &FieldSpec<R>) {
    match field.location {
        Location::Element(tag) => element.push_child(Element::new(tag)),
        Location::Wrapped { wrapper, .. } => element.push_child(Element::new(wrapper)),
        Location::Attribute(_) | Location::Text | Location::Remainder => {}
    }
}

fn claimed_tags<R>(fields: &[FieldSpec<R>]) -> HashSet<&'static str> {
    fields
        .iter()
        .filter_map(|field| match field.location {
            Location::Element(tag) => Some(tag),
            Location::Wrapped { wrapper, .. } => Some(wrapper),
            Location::Attribute(_) | Location::Text | Location::Remainder => None,
        })
        .collect()
}

fn has_text_field<R>(fields: &[FieldSpec<R>]) -> bool {
    fields
        .iter()
        .any(|field| field.location == Location::Text)
}

fn trace_unknown<R>(element: &Element, fields: &[FieldSpec<R>], path: &str) {
    if fields
        .iter()
        .any(|field| field.location == Location::Remainder)
    {
        return;
    }

    let claimed = claimed_tags(fields);
    for child in element.child_elements() {
        if !claimed.contains(child.tag.as_str()) {
            tracing::trace!("Skipping unknown element <{}> at {}", child.tag, path);
        }
    }
    for (name, _) in &element.attributes {
        let declared = fields
            .iter()
            .any(|field| matches!(field.location, Location::Attribute(attribute) if attribute == name));
        if !declared {
            tracing::trace!("Skipping unknown attribute `{}` at {}", name, path);
        }
    }
}

fn describe(location: Location, name: &str) -> String {
    match location {
        Location::Attribute(attribute) => format!("attribute `{attribute}`"),
        Location::Element(tag) => format!("element <{tag}>"),
        Location::Wrapped { wrapper, .. } => format!("element <{wrapper}>"),
        Location::Text | Location::Remainder => format!("content for `{name}`"),
    }
}
