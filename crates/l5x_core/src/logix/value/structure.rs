use crate::logix::{LogixError, LogixValue, PredefinedType, Result, SerializationShape};

/// Named, ordered members of a user-defined or predefined structure type.
///
/// Member names are unique ignoring case. Order is the declaration order and drives
/// serialization; lookup ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureValue {
	type_name: String,
	members: Vec<(String, LogixValue)>,
	shape: SerializationShape,
}

impl StructureValue {
	/// Build a structure.
	///
	/// A predefined type name starts from the catalog default and overlays `members` onto it;
	/// each given member must exist in the layout and keep its type. Any other name is a
	/// user-defined type holding exactly `members`.
	pub fn new(type_name: &str, members: Vec<(String, LogixValue)>) -> Result<Self> {
		if type_name.is_empty() {
			return Err(LogixError::InconsistentShape {
				type_name: String::new(),
				reason: "empty type name".to_owned(),
			});
		}
		check_unique(type_name, &members)?;

		let Some(predefined) = PredefinedType::from_name(type_name) else {
			for (name, _) in &members {
				check_member_name(name)?;
			}
			return Ok(Self::from_parts(type_name, members, SerializationShape::Decorated));
		};

		let LogixValue::Structure(mut base) = predefined.default_value()? else {
			return Err(LogixError::InconsistentShape {
				type_name: predefined.name().to_owned(),
				reason: "string types are not structures".to_owned(),
			});
		};
		for (name, value) in members {
			base.set_member(&name, value)?;
		}
		Ok(base)
	}

	pub(crate) fn from_parts(type_name: &str, members: Vec<(String, LogixValue)>, shape: SerializationShape) -> Self {
		Self {
			type_name: type_name.to_owned(),
			members,
			shape,
		}
	}

	/// Type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// On-disk shape chosen at construction.
	pub fn shape(&self) -> SerializationShape {
		self.shape
	}

	/// Catalog entry for predefined types.
	pub fn predefined(&self) -> Option<PredefinedType> {
		PredefinedType::from_name(&self.type_name)
	}

	/// Member count.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Whether the structure has no members.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Member names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.members.iter().map(|(name, _)| name.as_str())
	}

	/// Members in declaration order.
	pub fn members(&self) -> impl Iterator<Item = (&str, &LogixValue)> {
		self.members.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Member by name, ignoring case.
	pub fn member(&self, name: &str) -> Option<&LogixValue> {
		self.position(name).map(|idx| &self.members[idx].1)
	}

	pub(super) fn member_mut(&mut self, name: &str) -> Option<&mut LogixValue> {
		let idx = self.position(name)?;
		Some(&mut self.members[idx].1)
	}

	/// Replace a member, returning the previous value. The member must exist and the new value
	/// must have the same type.
	pub fn set_member(&mut self, name: &str, value: LogixValue) -> Result<LogixValue> {
		let type_name = self.type_name.clone();
		let slot = self.member_mut(name).ok_or_else(|| LogixError::UnknownMember {
			type_name,
			member: name.to_owned(),
		})?;
		if !slot.same_type(&value) {
			return Err(LogixError::TypeMismatch {
				expected: slot.type_label(),
				got: value.type_label(),
			});
		}
		Ok(std::mem::replace(slot, value))
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.members.iter().position(|(member, _)| member.eq_ignore_ascii_case(name))
	}
}

fn check_unique(type_name: &str, members: &[(String, LogixValue)]) -> Result<()> {
	for (idx, (name, _)) in members.iter().enumerate() {
		if members[..idx].iter().any(|(earlier, _)| earlier.eq_ignore_ascii_case(name)) {
			return Err(LogixError::InconsistentShape {
				type_name: type_name.to_owned(),
				reason: format!("duplicate member {name}"),
			});
		}
	}
	Ok(())
}

fn check_member_name(name: &str) -> Result<()> {
	let mut bytes = name.bytes();
	let valid = bytes.next().is_some_and(|first| first.is_ascii_alphabetic() || first == b'_') && bytes.all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
	if valid { Ok(()) } else { Err(LogixError::InvalidTagName { name: name.to_owned() }) }
}
