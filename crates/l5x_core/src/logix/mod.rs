mod atomic;
mod data;
mod doc;
mod error;
mod name;
mod options;
mod predefined;
mod radix;
mod tag;
mod value;

/// Atomic kinds and values.
pub use atomic::{AtomicKind, AtomicValue};
/// Data node serialization entry points and shape selection.
pub use data::{SerializationShape, read_data, write_data};
/// Arena document tree.
pub use doc::{Document, Node, NodeId, NodeText};
/// Error and result aliases.
pub use error::{ErrorKind, LogixError, Result};
/// Tag name parser types.
pub use name::{ArrayIndex, Segment, TagName, ToTagName};
/// Runtime limits and string type declarations for reading and writing data nodes.
pub use options::{DataOptions, StringTypes};
/// Predefined structure catalog.
pub use predefined::{ParamKind, PredefinedMember, PredefinedType};
/// Radix codec.
pub use radix::{Radix, format_ldt_with_offset};
/// Tag handles bound to a document.
pub use tag::Tag;
/// Logix value variants.
pub use value::{ArrayValue, Dimensions, LogixValue, StringValue, StructureValue};
