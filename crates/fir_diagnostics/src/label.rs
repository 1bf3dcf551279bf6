//! Secondary locations attached to a diagnostic.

use fir_source::Info;
use serde::{Deserialize, Serialize};

/// Whether a label marks the main location or supporting context.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The location the diagnostic is about.
    Primary,
    /// A related location, e.g. the first of two clashing declarations.
    Secondary,
}

/// A located message within a diagnostic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Where the label points.
    pub info: Info,
    /// The message shown next to the location.
    pub message: String,
    /// Primary or secondary.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(info: Info, message: impl Into<String>) -> Self {
        Self {
            info,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(info: Info, message: impl Into<String>) -> Self {
        Self {
            info,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
