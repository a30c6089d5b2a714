use thiserror::Error;

use crate::logix::{AtomicKind, Radix};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, LogixError>;

/// Coarse classification shared by every [`LogixError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Text does not match the expected shape, or a value does not support a radix.
	FormatMismatch,
	/// A number, byte count, length or index falls outside its permitted range.
	RangeViolation,
	/// A member name or index is absent from the addressed value.
	UnknownMember,
	/// A value has the wrong variant or type for the requested operation.
	TypeMismatch,
	/// The operation has no meaning for the receiver.
	UnsupportedOperation,
}

/// Errors produced while formatting, parsing, addressing and serializing Logix values.
#[derive(Debug, Error)]
pub enum LogixError {
	/// Text does not match the radix recognizer.
	#[error("text {text:?} is not valid {radix} text")]
	FormatMismatch {
		/// Radix the text was checked against.
		radix: Radix,
		/// Offending input text.
		text: String,
	},
	/// No radix recognizer accepted the text.
	#[error("unable to infer radix for {text:?}")]
	RadixNotInferred {
		/// Offending input text.
		text: String,
	},
	/// Atomic kind does not support the requested radix.
	#[error("radix {radix} is not supported for {kind}")]
	RadixNotSupported {
		/// Requested radix.
		radix: Radix,
		/// Atomic kind of the value.
		kind: AtomicKind,
	},
	/// Tag name text is syntactically invalid.
	#[error("invalid tag name: {name:?}")]
	InvalidTagName {
		/// Original tag name text.
		name: String,
	},
	/// Document data node does not have the expected structure.
	#[error("malformed {element} data: {reason}")]
	MalformedData {
		/// Element name being read.
		element: String,
		/// Short description of the problem.
		reason: String,
	},
	/// Required attribute is missing on a document node.
	#[error("element {element} is missing attribute {attribute}")]
	MissingAttribute {
		/// Element name being read.
		element: String,
		/// Missing attribute name.
		attribute: &'static str,
	},
	/// Parsed number does not fit in the target atomic kind.
	#[error("{text:?} is out of range for {kind}")]
	IntegerOutOfRange {
		/// Offending input text.
		text: String,
		/// Target atomic kind.
		kind: AtomicKind,
	},
	/// Parsed number does not fit any atomic kind.
	#[error("{text:?} does not fit any atomic type")]
	NumberTooLarge {
		/// Offending input text.
		text: String,
	},
	/// Encoded byte count exceeds the 8 byte ceiling.
	#[error("{count} bytes exceed the 8 byte atomic limit")]
	ByteCountOutOfRange {
		/// Number of encoded bytes.
		count: usize,
	},
	/// Date-time value falls outside the representable calendar.
	#[error("{value} is outside the representable date range")]
	DateOutOfRange {
		/// Raw tick count.
		value: i64,
	},
	/// String data is longer than its declared capacity.
	#[error("string length {len} exceeds capacity {capacity}")]
	StringCapacityExceeded {
		/// Requested length.
		len: usize,
		/// Declared capacity.
		capacity: usize,
	},
	/// Array index falls outside the array dimensions.
	#[error("index {index} is out of range for dimensions {dimensions}")]
	IndexOutOfRange {
		/// Rendered index.
		index: String,
		/// Rendered dimensions.
		dimensions: String,
	},
	/// Nesting exceeded the configured depth limit.
	#[error("data depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Array is larger than the configured element limit.
	#[error("array too large: count={count}, max={max}")]
	ArrayTooLarge {
		/// Requested element count.
		count: usize,
		/// Configured element ceiling.
		max: usize,
	},
	/// Named member or index is absent.
	#[error("{type_name} has no member {member}")]
	UnknownMember {
		/// Type name of the addressed value.
		type_name: String,
		/// Requested member text.
		member: String,
	},
	/// A tag with the same name already exists.
	#[error("tag already exists: {name}")]
	DuplicateTag {
		/// Conflicting tag name.
		name: String,
	},
	/// Tag name does not match any tag in the document.
	#[error("tag not found: {name}")]
	TagNotFound {
		/// Requested root tag name.
		name: String,
	},
	/// Operation needs a structure but got another variant.
	#[error("expected structure, got {got}")]
	NotAStructure {
		/// Type name of the actual value.
		got: String,
	},
	/// Value type differs from the type already declared at that position.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Declared type name.
		expected: String,
		/// Offered type name.
		got: String,
	},
	/// Value shape is internally inconsistent.
	#[error("inconsistent {type_name} shape: {reason}")]
	InconsistentShape {
		/// Type name being constructed.
		type_name: String,
		/// Short description of the inconsistency.
		reason: String,
	},
	/// Node id does not refer to a live node of the document.
	#[error("node {id} does not exist")]
	MissingNode {
		/// Arena slot index.
		id: usize,
	},
	/// Node already has a parent.
	#[error("node {id} is already attached")]
	NodeAttached {
		/// Arena slot index.
		id: usize,
	},
	/// Data type name is not an atomic or predefined type.
	#[error("unknown data type: {name}")]
	UnknownDataType {
		/// Offending type name.
		name: String,
	},
	/// Requested operation is not available for the receiver.
	#[error("unsupported operation: {operation}")]
	UnsupportedOperation {
		/// Short operation label.
		operation: &'static str,
	},
}

impl LogixError {
	/// Classify this error into one of the five coarse kinds.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::FormatMismatch { .. }
			| Self::RadixNotInferred { .. }
			| Self::RadixNotSupported { .. }
			| Self::InvalidTagName { .. }
			| Self::MalformedData { .. }
			| Self::MissingAttribute { .. } => ErrorKind::FormatMismatch,
			Self::IntegerOutOfRange { .. }
			| Self::NumberTooLarge { .. }
			| Self::ByteCountOutOfRange { .. }
			| Self::DateOutOfRange { .. }
			| Self::StringCapacityExceeded { .. }
			| Self::IndexOutOfRange { .. }
			| Self::DepthExceeded { .. }
			| Self::ArrayTooLarge { .. } => ErrorKind::RangeViolation,
			Self::UnknownMember { .. } | Self::TagNotFound { .. } | Self::MissingNode { .. } => ErrorKind::UnknownMember,
			Self::NodeAttached { .. } | Self::DuplicateTag { .. } => ErrorKind::UnsupportedOperation,
			Self::NotAStructure { .. } | Self::TypeMismatch { .. } | Self::InconsistentShape { .. } | Self::UnknownDataType { .. } => {
				ErrorKind::TypeMismatch
			}
			Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
		}
	}

	pub(crate) fn format(radix: Radix, text: &str) -> Self {
		Self::FormatMismatch {
			radix,
			text: text.to_owned(),
		}
	}

	pub(crate) fn malformed(element: &str, reason: impl Into<String>) -> Self {
		Self::MalformedData {
			element: element.to_owned(),
			reason: reason.into(),
		}
	}
}
