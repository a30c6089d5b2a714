//! Conversion between [`LogixValue`]s and `<Data>` nodes.
//!
//! Four shapes exist on disk. `Decorated` carries atomics, arrays and ordinary structures as
//! nested elements; `String` is a length plus a quoted literal; alarm and message types are a
//! single parameter element whose attributes are the members.

mod decorated;
mod params;

use crate::logix::radix::{quote_bytes, unquote_bytes};
use crate::logix::{DataOptions, Document, LogixError, LogixValue, NodeId, NodeText, Radix, Result, StringTypes, StringValue};

/// On-disk shape of a root value, fixed when the value is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationShape {
	/// Nested `DataValue`/`Array`/`Structure` elements.
	Decorated,
	/// `Length` attribute plus a quoted `CDATA` literal.
	String,
	/// `AlarmAnalogParameters` attribute list.
	AlarmAnalog,
	/// `AlarmDigitalParameters` attribute list.
	AlarmDigital,
	/// `MessageParameters` attribute list.
	Message,
}

impl SerializationShape {
	/// Value of the `Format` attribute.
	pub fn format_name(self) -> &'static str {
		match self {
			Self::Decorated => "Decorated",
			Self::String => "String",
			Self::AlarmAnalog | Self::AlarmDigital => "Alarm",
			Self::Message => "Message",
		}
	}

	/// Parameter element name for attribute-list shapes.
	pub fn parameter_element(self) -> Option<&'static str> {
		match self {
			Self::AlarmAnalog => Some("AlarmAnalogParameters"),
			Self::AlarmDigital => Some("AlarmDigitalParameters"),
			Self::Message => Some("MessageParameters"),
			Self::Decorated | Self::String => None,
		}
	}
}

/// Serialize `value` into a new detached `<Data>` node.
///
/// Every string type held by `value` is declared on the document with its capacity, so the
/// data reads back with the same capacity. A capacity that contradicts an earlier declaration
/// is a type mismatch. Nothing is left behind when serialization fails.
pub fn write_data(doc: &mut Document, value: &LogixValue) -> Result<NodeId> {
	let options = doc.options().clone();
	let string_types = declare_strings(&options.string_types, value)?;

	let data = doc.create_element("Data");
	match write_into(doc, data, value, &options) {
		Ok(()) => {
			doc.options_mut().string_types = string_types;
			Ok(data)
		}
		Err(err) => {
			doc.remove(data)?;
			Err(err)
		}
	}
}

fn declare_strings(declared: &StringTypes, value: &LogixValue) -> Result<StringTypes> {
	let mut staged = declared.clone();
	for string in value.members().into_iter().filter_map(|(_, member)| member.as_string()) {
		staged.declare(string.type_name(), string.capacity())?;
	}
	Ok(staged)
}

fn write_into(doc: &mut Document, data: NodeId, value: &LogixValue, options: &DataOptions) -> Result<()> {
	let shape = value.shape();
	doc.set_attribute(data, "Format", shape.format_name())?;

	match (shape, value) {
		(SerializationShape::String, LogixValue::String(string)) => {
			doc.set_attribute(data, "Length", string.len().to_string())?;
			doc.set_text(data, Some(NodeText::CData(quote_bytes(string.data()))))
		}
		(SerializationShape::Decorated, _) => decorated::write_root(doc, data, value, options),
		(_, LogixValue::Structure(structure)) => params::write(doc, data, shape, structure),
		_ => Err(LogixError::UnsupportedOperation {
			operation: "serialize value in its declared shape",
		}),
	}
}

/// Deserialize a `<Data>` node. `data_type` is the `DataType` of the owning tag.
pub fn read_data(doc: &Document, data: NodeId, data_type: &str) -> Result<LogixValue> {
	let options = doc.options();
	let format = doc.attribute(data, "Format").ok_or(LogixError::MissingAttribute {
		element: "Data".to_owned(),
		attribute: "Format",
	})?;

	let value = match format {
		"Decorated" => decorated::read_root(doc, data, options)?,
		"String" => LogixValue::String(read_string_root(doc, data, data_type, options)?),
		"Alarm" | "Message" => params::read(doc, data, data_type)?,
		"L5K" => {
			return Err(LogixError::UnsupportedOperation {
				operation: "read L5K formatted data",
			});
		}
		other => return Err(LogixError::malformed("Data", format!("unknown format {other:?}"))),
	};

	if !value.type_name().eq_ignore_ascii_case(data_type) {
		return Err(LogixError::TypeMismatch {
			expected: data_type.to_owned(),
			got: value.type_name().to_owned(),
		});
	}
	Ok(value)
}

fn read_string_root(doc: &Document, data: NodeId, data_type: &str, options: &DataOptions) -> Result<StringValue> {
	let literal = doc.text(data).map(NodeText::as_str).unwrap_or("''");
	let length = match doc.attribute(data, "Length") {
		Some(text) => Some(
			text.parse::<usize>()
				.map_err(|_| LogixError::malformed("Data", format!("invalid Length {text:?}")))?,
		),
		None => None,
	};
	string_from_literal(data_type, literal, length, options)
}

/// Build a string of a declared type from its quoted literal and optional stored length.
fn string_from_literal(type_name: &str, literal: &str, length: Option<usize>, options: &DataOptions) -> Result<StringValue> {
	let capacity = options
		.string_types
		.capacity(type_name)
		.ok_or_else(|| LogixError::UnknownDataType { name: type_name.to_owned() })?;
	let bytes = unquote_bytes(literal).ok_or_else(|| LogixError::format(Radix::Ascii, literal))?;
	let len = length.unwrap_or(bytes.len());

	let mut value = StringValue::new(type_name, capacity)?.with_data(&bytes)?;
	value.set_length(len)?;
	Ok(value)
}

/// Rewrite `DataType`, `Dimensions` and `Radix` on a tag container, in that order, right
/// after `TagType` (or `Name`).
pub(crate) fn apply_companions(doc: &mut Document, tag: NodeId, value: &LogixValue) -> Result<()> {
	for key in ["DataType", "Dimensions", "Radix"] {
		doc.remove_attribute(tag, key)?;
	}

	let mut position = ["TagType", "Name"]
		.into_iter()
		.find_map(|key| doc.attribute_position(tag, key))
		.map_or(0, |idx| idx + 1);

	doc.insert_attribute(tag, position, "DataType", value.type_name())?;
	position += 1;
	if let Some(dimensions) = value.dimensions() {
		doc.insert_attribute(tag, position, "Dimensions", dimensions.to_spaced())?;
		position += 1;
	}
	let radix = value.radix();
	if radix != Radix::Null {
		doc.insert_attribute(tag, position, "Radix", radix.name())?;
	}
	Ok(())
}
