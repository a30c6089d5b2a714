use crate::logix::{
	ArrayIndex, ArrayValue, AtomicKind, AtomicValue, DataOptions, Dimensions, Document, LogixError, LogixValue, NodeId, NodeText, Radix, Result,
	StringValue, StructureValue,
};

use super::string_from_literal;

pub(super) fn write_root(doc: &mut Document, data: NodeId, value: &LogixValue, options: &DataOptions) -> Result<()> {
	match value {
		LogixValue::Atomic(atomic) => {
			let node = append(doc, data, "DataValue")?;
			write_atomic_attributes(doc, node, atomic)
		}
		LogixValue::Array(array) => write_array(doc, data, "Array", None, array, options, 0),
		LogixValue::Structure(structure) => write_structure(doc, data, "Structure", None, structure, options, 0),
		LogixValue::String(string) => write_string(doc, data, "Structure", None, string),
	}
}

fn append(doc: &mut Document, parent: NodeId, name: &str) -> Result<NodeId> {
	let node = doc.create_element(name);
	doc.append_child(parent, node)?;
	Ok(node)
}

fn check_depth(depth: u32, options: &DataOptions) -> Result<()> {
	if depth > options.max_depth {
		return Err(LogixError::DepthExceeded { max_depth: options.max_depth });
	}
	Ok(())
}

fn check_len(count: usize, options: &DataOptions) -> Result<()> {
	if count > options.max_array_elements {
		return Err(LogixError::ArrayTooLarge {
			count,
			max: options.max_array_elements,
		});
	}
	Ok(())
}

fn write_atomic_attributes(doc: &mut Document, node: NodeId, atomic: &AtomicValue) -> Result<()> {
	doc.set_attribute(node, "DataType", atomic.kind().name())?;
	doc.set_attribute(node, "Radix", atomic.radix().name())?;
	doc.set_attribute(node, "Value", atomic.to_text()?)
}

fn write_member(doc: &mut Document, parent: NodeId, name: &str, value: &LogixValue, options: &DataOptions, depth: u32) -> Result<()> {
	match value {
		LogixValue::Atomic(atomic) => {
			let node = append(doc, parent, "DataValueMember")?;
			doc.set_attribute(node, "Name", name)?;
			write_atomic_attributes(doc, node, atomic)
		}
		LogixValue::Array(array) => write_array(doc, parent, "ArrayMember", Some(name), array, options, depth),
		LogixValue::Structure(structure) => write_structure(doc, parent, "StructureMember", Some(name), structure, options, depth),
		LogixValue::String(string) => write_string(doc, parent, "StructureMember", Some(name), string),
	}
}

fn write_array(
	doc: &mut Document,
	parent: NodeId,
	element: &str,
	name: Option<&str>,
	array: &ArrayValue,
	options: &DataOptions,
	depth: u32,
) -> Result<()> {
	check_depth(depth, options)?;
	check_len(array.len(), options)?;

	let node = append(doc, parent, element)?;
	if let Some(name) = name {
		doc.set_attribute(node, "Name", name)?;
	}
	doc.set_attribute(node, "DataType", array.element_type())?;
	doc.set_attribute(node, "Dimensions", array.dimensions().to_string())?;
	if array.radix() != Radix::Null {
		doc.set_attribute(node, "Radix", array.radix().name())?;
	}

	for (index, value) in array.indexed() {
		let item = append(doc, node, "Element")?;
		doc.set_attribute(item, "Index", index.to_string())?;
		match value {
			LogixValue::Atomic(atomic) => doc.set_attribute(item, "Value", atomic.to_text()?)?,
			LogixValue::Structure(structure) => write_structure(doc, item, "Structure", None, structure, options, depth + 1)?,
			LogixValue::String(string) => write_string(doc, item, "Structure", None, string)?,
			LogixValue::Array(_) => {
				return Err(LogixError::UnsupportedOperation {
					operation: "serialize nested arrays",
				});
			}
		}
	}
	Ok(())
}

fn write_structure(
	doc: &mut Document,
	parent: NodeId,
	element: &str,
	name: Option<&str>,
	structure: &StructureValue,
	options: &DataOptions,
	depth: u32,
) -> Result<()> {
	check_depth(depth, options)?;

	let node = append(doc, parent, element)?;
	if let Some(name) = name {
		doc.set_attribute(node, "Name", name)?;
	}
	doc.set_attribute(node, "DataType", structure.type_name())?;
	for (member, value) in structure.members() {
		write_member(doc, node, member, value, options, depth + 1)?;
	}
	Ok(())
}

fn write_string(doc: &mut Document, parent: NodeId, element: &str, name: Option<&str>, string: &StringValue) -> Result<()> {
	let node = append(doc, parent, element)?;
	if let Some(name) = name {
		doc.set_attribute(node, "Name", name)?;
	}
	doc.set_attribute(node, "DataType", string.type_name())?;

	let len = append(doc, node, "DataValueMember")?;
	doc.set_attribute(len, "Name", "LEN")?;
	doc.set_attribute(len, "DataType", AtomicKind::Dint.name())?;
	doc.set_attribute(len, "Radix", Radix::Decimal.name())?;
	doc.set_attribute(len, "Value", string.len().to_string())?;

	let data = append(doc, node, "DataValueMember")?;
	doc.set_attribute(data, "Name", "DATA")?;
	doc.set_attribute(data, "DataType", string.type_name())?;
	doc.set_attribute(data, "Radix", Radix::Ascii.name())?;
	doc.set_text(data, Some(NodeText::CData(string.quoted())))
}

pub(super) fn read_root(doc: &Document, data: NodeId, options: &DataOptions) -> Result<LogixValue> {
	let node = doc
		.children(data)
		.first()
		.copied()
		.ok_or_else(|| LogixError::malformed("Data", "decorated data has no value element"))?;

	match doc.name(node) {
		Some("DataValue") => Ok(LogixValue::Atomic(read_atomic(doc, node)?)),
		Some("Array") => read_array(doc, node, options, 0).map(LogixValue::Array),
		Some("Structure") => read_structure(doc, node, options, 0),
		other => Err(LogixError::malformed("Data", format!("unexpected element {other:?}"))),
	}
}

fn element_name(doc: &Document, node: NodeId) -> String {
	doc.name(node).unwrap_or_default().to_owned()
}

fn required<'a>(doc: &'a Document, node: NodeId, attribute: &'static str) -> Result<&'a str> {
	doc.attribute(node, attribute).ok_or_else(|| LogixError::MissingAttribute {
		element: element_name(doc, node),
		attribute,
	})
}

fn radix_attribute(doc: &Document, node: NodeId) -> Result<Option<Radix>> {
	doc.attribute(node, "Radix").map(str::parse::<Radix>).transpose()
}

fn parse_atomic(text: &str, kind: AtomicKind, radix: Option<Radix>) -> Result<AtomicValue> {
	match radix {
		Some(radix) => radix.parse_as(text, kind),
		None => Radix::parse_any_as(text, kind),
	}
}

fn read_atomic(doc: &Document, node: NodeId) -> Result<AtomicValue> {
	let data_type = required(doc, node, "DataType")?;
	let kind = data_type.parse::<AtomicKind>()?;
	let radix = radix_attribute(doc, node)?;
	parse_atomic(required(doc, node, "Value")?, kind, radix)
}

fn read_member(doc: &Document, node: NodeId, options: &DataOptions, depth: u32) -> Result<(String, LogixValue)> {
	let name = required(doc, node, "Name")?.to_owned();
	let value = match doc.name(node) {
		Some("DataValueMember") => LogixValue::Atomic(read_atomic(doc, node)?),
		Some("ArrayMember") => LogixValue::Array(read_array(doc, node, options, depth)?),
		Some("StructureMember") => read_structure(doc, node, options, depth)?,
		other => return Err(LogixError::malformed("Structure", format!("unexpected member element {other:?}"))),
	};
	Ok((name, value))
}

fn read_array(doc: &Document, node: NodeId, options: &DataOptions, depth: u32) -> Result<ArrayValue> {
	check_depth(depth, options)?;

	let data_type = required(doc, node, "DataType")?;
	let dimensions = Dimensions::parse(required(doc, node, "Dimensions")?)?;
	check_len(dimensions.len(), options)?;
	let radix = radix_attribute(doc, node)?;
	let atomic_kind = AtomicKind::from_name(data_type);

	let items: Vec<NodeId> = doc.children_named(node, "Element").collect();
	if items.len() != dimensions.len() {
		return Err(LogixError::malformed(
			&element_name(doc, node),
			format!("{} elements for dimensions {dimensions}", items.len()),
		));
	}

	let mut elements = Vec::with_capacity(items.len());
	for (offset, item) in items.into_iter().enumerate() {
		check_index(doc, item, &dimensions, offset)?;
		let value = match (doc.attribute(item, "Value"), atomic_kind) {
			(Some(text), Some(kind)) => LogixValue::Atomic(parse_atomic(text, kind, radix)?),
			(Some(_), None) => return Err(LogixError::UnknownDataType { name: data_type.to_owned() }),
			(None, _) => {
				let inner = doc
					.child_named(item, "Structure")
					.ok_or_else(|| LogixError::malformed("Element", "element has neither a value nor a structure"))?;
				read_structure(doc, inner, options, depth + 1)?
			}
		};
		elements.push(value);
	}

	ArrayValue::from_elements(data_type, dimensions, elements)
}

fn check_index(doc: &Document, item: NodeId, dimensions: &Dimensions, offset: usize) -> Result<()> {
	let Some(text) = doc.attribute(item, "Index") else {
		return Ok(());
	};
	let expected = dimensions.index_at(offset).map(|index| index.to_string()).unwrap_or_default();
	let parsed = parse_index(text).map(|index| index.to_string());
	if parsed.as_deref() != Some(expected.as_str()) {
		return Err(LogixError::malformed("Element", format!("index {text} where {expected} was expected")));
	}
	Ok(())
}

fn parse_index(text: &str) -> Option<ArrayIndex> {
	let body = text.trim().strip_prefix('[')?.strip_suffix(']')?;
	let coords = body.split(',').map(|part| part.trim().parse::<usize>().ok()).collect::<Option<Vec<_>>>()?;
	ArrayIndex::new(&coords).ok()
}

fn read_structure(doc: &Document, node: NodeId, options: &DataOptions, depth: u32) -> Result<LogixValue> {
	check_depth(depth, options)?;

	let data_type = required(doc, node, "DataType")?;
	if let Some(string) = read_string(doc, node, data_type, options)? {
		return Ok(LogixValue::String(string));
	}

	let members = doc
		.children(node)
		.iter()
		.map(|child| read_member(doc, *child, options, depth + 1))
		.collect::<Result<Vec<_>>>()?;
	Ok(LogixValue::Structure(StructureValue::new(data_type, members)?))
}

/// A structure made of exactly a `LEN` member and an ASCII `DATA` member is a string.
fn read_string(doc: &Document, node: NodeId, data_type: &str, options: &DataOptions) -> Result<Option<StringValue>> {
	let [len, data] = doc.children(node) else {
		return Ok(None);
	};
	let is_member = |id: NodeId, name: &str| doc.name(id) == Some("DataValueMember") && doc.attribute(id, "Name").is_some_and(|found| found.eq_ignore_ascii_case(name));
	if !is_member(*len, "LEN") || !is_member(*data, "DATA") || doc.attribute(*data, "Radix") != Some(Radix::Ascii.name()) {
		return Ok(None);
	}

	let length = read_atomic(doc, *len)?
		.as_i64()
		.and_then(|len| usize::try_from(len).ok())
		.ok_or_else(|| LogixError::malformed("LEN", "negative string length"))?;
	let literal = doc.text(*data).map(NodeText::as_str).unwrap_or("''");
	string_from_literal(data_type, literal, Some(length), options).map(Some)
}
