//! The type grammar: ground types carrying a [`Width`] and aggregate types.

use crate::port::Direction;
use crate::width::Width;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Whether a bundle field keeps or inverts the direction of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Same direction as the enclosing value.
    #[default]
    Default,
    /// Opposite direction to the enclosing value.
    Flip,
}

impl Orientation {
    /// The direction of a field with this orientation inside a value flowing in `parent`.
    pub fn apply(self, parent: Direction) -> Direction {
        match self {
            Orientation::Default => parent,
            Orientation::Flip => parent.flip(),
        }
    }

    /// Composes two orientations, as for a field nested inside a field.
    pub fn compose(self, other: Orientation) -> Orientation {
        if self == other {
            Orientation::Default
        } else {
            Orientation::Flip
        }
    }
}

/// A named, oriented member of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// The field name, unique within its bundle. An identifier or a run of
    /// decimal digits such as `0`.
    pub name: String,
    /// The field orientation.
    pub flip: Orientation,
    /// The field type.
    pub tpe: Type,
}

impl Field {
    /// Creates a field with default orientation.
    pub fn new(name: impl Into<String>, tpe: Type) -> Self {
        Self {
            name: name.into(),
            flip: Orientation::Default,
            tpe,
        }
    }

    /// Creates a flipped field.
    pub fn flipped(name: impl Into<String>, tpe: Type) -> Self {
        Self {
            name: name.into(),
            flip: Orientation::Flip,
            tpe,
        }
    }
}

/// A hardware type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Unsigned integer.
    UInt(Width),
    /// Signed integer.
    SInt(Width),
    /// Clock signal.
    Clock,
    /// Ordered collection of named, oriented fields.
    Bundle(Vec<Field>),
    /// Fixed-size homogeneous array.
    Vector {
        /// The element type.
        tpe: Box<Type>,
        /// The number of elements.
        size: usize,
    },
    /// Placeholder for a type not yet inferred.
    Unknown,
}

impl Type {
    /// An unsigned type of known width.
    pub fn uint(width: i64) -> Type {
        Type::UInt(Width::known(width))
    }

    /// A signed type of known width.
    pub fn sint(width: i64) -> Type {
        Type::SInt(Width::known(width))
    }

    /// A vector of `size` elements of `tpe`.
    pub fn vector(tpe: Type, size: usize) -> Type {
        Type::Vector {
            tpe: Box::new(tpe),
            size,
        }
    }

    /// Returns `true` for `UInt`, `SInt` and `Clock`.
    pub fn is_ground(&self) -> bool {
        matches!(self, Type::UInt(_) | Type::SInt(_) | Type::Clock)
    }

    /// Returns `true` for bundles and vectors.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Type::Bundle(_) | Type::Vector { .. })
    }

    /// The width of a ground type. `Clock` is one bit wide.
    pub fn width(&self) -> Option<Width> {
        match self {
            Type::UInt(w) | Type::SInt(w) => Some(w.clone()),
            Type::Clock => Some(Width::known(1)),
            _ => None,
        }
    }

    /// The total number of bits in the type, summed over every leaf.
    ///
    /// Unknown if any leaf width, or the type itself, is unknown.
    pub fn bit_width(&self) -> Width {
        match self {
            Type::UInt(w) | Type::SInt(w) => w.clone(),
            Type::Clock => Width::known(1),
            Type::Bundle(fields) => fields
                .iter()
                .fold(Width::known(0), |acc, f| &acc + &f.tpe.bit_width()),
            Type::Vector { tpe, size } => {
                let elem = tpe.bit_width();
                match elem.value() {
                    Some(v) => Width::known(v * *size),
                    None => Width::Unknown,
                }
            }
            Type::Unknown => Width::Unknown,
        }
    }

    /// Looks up a bundle field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Type::Bundle(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// The element type of a vector.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Vector { tpe, .. } => Some(tpe),
            _ => None,
        }
    }

    /// Returns `true` if an `Unknown` placeholder occurs anywhere in the type.
    pub fn contains_unknown(&self) -> bool {
        match self {
            Type::Unknown => true,
            Type::UInt(_) | Type::SInt(_) | Type::Clock => false,
            Type::Bundle(fields) => fields.iter().any(|f| f.tpe.contains_unknown()),
            Type::Vector { tpe, .. } => tpe.contains_unknown(),
        }
    }

    /// Every known negative width occurring in the type.
    pub fn negative_widths(&self) -> Vec<Width> {
        let mut out = Vec::new();
        self.collect_negative_widths(&mut out);
        out
    }

    fn collect_negative_widths(&self, out: &mut Vec<Width>) {
        match self {
            Type::UInt(w) | Type::SInt(w) if w.is_negative() => out.push(w.clone()),
            Type::Bundle(fields) => {
                for f in fields {
                    f.tpe.collect_negative_widths(out);
                }
            }
            Type::Vector { tpe, .. } => tpe.collect_negative_widths(out),
            _ => {}
        }
    }

    /// Field names repeated within some bundle of this type, at any depth.
    ///
    /// Each repeated name is reported once per bundle in which it repeats.
    pub fn duplicate_field_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_duplicate_fields(&mut out);
        out
    }

    fn collect_duplicate_fields(&self, out: &mut Vec<String>) {
        match self {
            Type::Bundle(fields) => {
                let mut seen = HashSet::new();
                let mut reported = HashSet::new();
                for f in fields {
                    if !seen.insert(f.name.as_str()) && reported.insert(f.name.as_str()) {
                        out.push(f.name.clone());
                    }
                }
                for f in fields {
                    f.tpe.collect_duplicate_fields(out);
                }
            }
            Type::Vector { tpe, .. } => tpe.collect_duplicate_fields(out),
            _ => {}
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_type(self))
    }
}
