use std::collections::BTreeMap;

use crate::logix::value::STANDARD_STRING_CAPACITY;
use crate::logix::{LogixError, PredefinedType, Result};

/// Limits applied while reading values from, and writing values to, data nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataOptions {
	/// Deepest structure/array nesting accepted.
	pub max_depth: u32,
	/// Largest array element count accepted.
	pub max_array_elements: usize,
	/// Capacities of the string types data may hold.
	pub string_types: StringTypes,
}

impl Default for DataOptions {
	fn default() -> Self {
		Self {
			max_depth: 16,
			max_array_elements: 65_536,
			string_types: StringTypes::default(),
		}
	}
}

impl DataOptions {
	/// Tighter limits for untrusted documents.
	pub fn strict() -> Self {
		Self {
			max_depth: 8,
			max_array_elements: 4096,
			..Self::default()
		}
	}

	/// Copy that also declares `type_name` with `capacity`.
	pub fn with_string_type(mut self, type_name: &str, capacity: usize) -> Result<Self> {
		self.string_types.declare(type_name, capacity)?;
		Ok(self)
	}
}

/// Declared string types and their capacities, keyed by type name ignoring case.
///
/// Capacity is not stored with string data, so a string is only readable once its type is
/// declared here. `STRING` is always declared with capacity 82.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTypes {
	capacities: BTreeMap<String, usize>,
}

impl StringTypes {
	/// Declared capacity of `type_name`.
	pub fn capacity(&self, type_name: &str) -> Option<usize> {
		if PredefinedType::from_name(type_name) == Some(PredefinedType::String) {
			return Some(STANDARD_STRING_CAPACITY);
		}
		self.capacities.get(&type_name.to_ascii_uppercase()).copied()
	}

	/// Declare `type_name`. Repeating a declaration is fine; changing a capacity is not.
	pub fn declare(&mut self, type_name: &str, capacity: usize) -> Result<()> {
		match self.capacity(type_name) {
			Some(declared) if declared == capacity => Ok(()),
			Some(declared) => Err(LogixError::TypeMismatch {
				expected: format!("{type_name} with capacity {declared}"),
				got: format!("{type_name} with capacity {capacity}"),
			}),
			None if type_name.is_empty() || capacity == 0 => Err(LogixError::InconsistentShape {
				type_name: type_name.to_owned(),
				reason: format!("string capacity {capacity}"),
			}),
			None => {
				self.capacities.insert(type_name.to_ascii_uppercase(), capacity);
				Ok(())
			}
		}
	}

	/// Declared names (upper case) and capacities, excluding `STRING`.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.capacities.iter().map(|(name, capacity)| (name.as_str(), *capacity))
	}
}

#[cfg(test)]
mod tests {
	use super::{DataOptions, StringTypes};
	use crate::logix::ErrorKind;

	#[test]
	fn declarations_ignore_case_and_keep_their_capacity() {
		let mut types = StringTypes::default();
		assert_eq!(types.capacity("string"), Some(82));
		assert_eq!(types.capacity("STRING_20"), None);

		types.declare("String_20", 20).expect("first declaration");
		types.declare("STRING_20", 20).expect("same capacity again");
		assert_eq!(types.capacity("string_20"), Some(20));

		let err = types.declare("STRING_20", 30).expect_err("capacity change");
		assert_eq!(err.kind(), ErrorKind::TypeMismatch);
		let err = types.declare("STRING", 40).expect_err("standard capacity is fixed");
		assert_eq!(err.kind(), ErrorKind::TypeMismatch);
		assert_eq!(types.iter().collect::<Vec<_>>(), [("STRING_20", 20)]);
	}

	#[test]
	fn presets_share_declarations() {
		let options = DataOptions::strict().with_string_type("NAME_8", 8).expect("declare");
		assert_eq!(options.max_depth, 8);
		assert_eq!(options.string_types.capacity("name_8"), Some(8));
	}
}
