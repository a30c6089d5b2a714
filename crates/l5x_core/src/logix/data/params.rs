use crate::logix::value::STANDARD_STRING_CAPACITY;
use crate::logix::{
	AtomicKind, AtomicValue, Document, LogixError, LogixValue, NodeId, ParamKind, PredefinedMember, PredefinedType, Radix, Result, SerializationShape,
	StringValue, StructureValue,
};

pub(super) fn write(doc: &mut Document, data: NodeId, shape: SerializationShape, structure: &StructureValue) -> Result<()> {
	let element = shape.parameter_element().ok_or(LogixError::UnsupportedOperation {
		operation: "write a non-parameter shape as attributes",
	})?;
	let predefined = predefined_for(structure.type_name())?;

	let mut attributes = Vec::with_capacity(structure.len());
	for (name, value) in structure.members() {
		let layout = layout(predefined, name)?;
		attributes.push((layout.name, render(layout, value)?));
	}

	let node = doc.create_element(element);
	doc.append_child(data, node)?;
	for (name, text) in attributes {
		doc.set_attribute(node, name, text)?;
	}
	Ok(())
}

pub(super) fn read(doc: &Document, data: NodeId, data_type: &str) -> Result<LogixValue> {
	let predefined = predefined_for(data_type)?;
	let element = predefined.shape().parameter_element().ok_or_else(|| LogixError::TypeMismatch {
		expected: "alarm or message type".to_owned(),
		got: data_type.to_owned(),
	})?;
	let node = doc
		.child_named(data, element)
		.ok_or_else(|| LogixError::malformed("Data", format!("missing {element} element")))?;

	let members = doc
		.attributes(node)
		.iter()
		.map(|(name, text)| {
			let layout = layout(predefined, name)?;
			Ok((layout.name.to_owned(), parse(layout, text)?))
		})
		.collect::<Result<Vec<_>>>()?;
	Ok(LogixValue::Structure(StructureValue::new(predefined.name(), members)?))
}

fn predefined_for(type_name: &str) -> Result<PredefinedType> {
	PredefinedType::from_name(type_name)
		.filter(|predefined| predefined.is_parameter_list())
		.ok_or_else(|| LogixError::TypeMismatch {
			expected: "alarm or message type".to_owned(),
			got: type_name.to_owned(),
		})
}

fn layout(predefined: PredefinedType, name: &str) -> Result<&'static PredefinedMember> {
	predefined.member(name).ok_or_else(|| LogixError::UnknownMember {
		type_name: predefined.name().to_owned(),
		member: name.to_owned(),
	})
}

fn render(layout: &PredefinedMember, value: &LogixValue) -> Result<String> {
	match (layout.param, value) {
		(ParamKind::Bool, LogixValue::Atomic(atomic)) => Ok(if atomic.as_bool() { "true" } else { "false" }.to_owned()),
		(ParamKind::Numeric | ParamKind::DateTime, LogixValue::Atomic(atomic)) => {
			atomic.with_radix(param_radix(layout, atomic.kind()))?.to_text()
		}
		(ParamKind::Text, LogixValue::String(string)) => Ok(string.text().into_owned()),
		_ => Err(LogixError::TypeMismatch {
			expected: layout.data_type.to_owned(),
			got: value.type_label(),
		}),
	}
}

/// Attribute text is always in the layout radix, whatever radix the member value carries.
fn param_radix(layout: &PredefinedMember, kind: AtomicKind) -> Radix {
	layout.radix.unwrap_or(Radix::default_for(kind))
}

/// Booleans accept `true`/`false`, `1`/`0` and `Yes`/`No`, ignoring case.
fn parse_bool(text: &str) -> Option<bool> {
	let spelled = |words: [&str; 3]| words.iter().any(|word| text.eq_ignore_ascii_case(word));
	if spelled(["true", "1", "yes"]) {
		Some(true)
	} else if spelled(["false", "0", "no"]) {
		Some(false)
	} else {
		None
	}
}

fn parse(layout: &PredefinedMember, text: &str) -> Result<LogixValue> {
	match layout.param {
		ParamKind::Bool => {
			let flag = parse_bool(text).ok_or_else(|| LogixError::malformed(layout.name, format!("invalid boolean {text:?}")))?;
			Ok(LogixValue::Atomic(AtomicValue::bool(flag)))
		}
		ParamKind::Numeric | ParamKind::DateTime => {
			let kind = layout.data_type.parse::<AtomicKind>()?;
			let radix = param_radix(layout, kind);
			let value = match Radix::parse_any_as(text, kind) {
				Ok(value) => value,
				// Float parameters are sometimes written as bare integers.
				Err(err) if kind.is_float() => match (kind, text.parse::<f64>()) {
					(AtomicKind::Real, Ok(number)) => AtomicValue::real(number as f32),
					(_, Ok(number)) => AtomicValue::lreal(number),
					(_, Err(_)) => return Err(err),
				},
				Err(err) => return Err(err),
			};
			Ok(LogixValue::Atomic(value.with_radix(radix)?))
		}
		ParamKind::Text => Ok(LogixValue::String(
			StringValue::new(layout.data_type, STANDARD_STRING_CAPACITY)?.with_data(text.as_bytes())?,
		)),
		ParamKind::None => Err(LogixError::UnsupportedOperation {
			operation: "read a structure member as an attribute",
		}),
	}
}
