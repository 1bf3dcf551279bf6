//! Source-location metadata attached to IR nodes.
//!
//! Every declaration, connection, port, module, and circuit may carry an
//! [`Info`] naming where it came from. Info is advisory: it is printed in
//! diagnostics and preserved by the serializer, but no pass may change its
//! behaviour because of it. [`FileLocation`] is the structured reading of the
//! conventional `file line:col` info string.

#![warn(missing_docs)]

pub mod info;
pub mod location;

pub use info::Info;
pub use location::FileLocation;
