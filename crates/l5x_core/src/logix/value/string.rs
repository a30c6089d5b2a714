use std::borrow::Cow;

use crate::logix::radix::{quote_bytes, unquote_bytes};
use crate::logix::{ArrayValue, AtomicValue, Dimensions, LogixError, LogixValue, Radix, Result};

pub(crate) const STANDARD_STRING_CAPACITY: usize = 82;

/// Fixed-capacity character buffer.
///
/// Structurally a string is a `LEN` (`DINT`) plus a `DATA` (`SINT[capacity]`, ASCII radix)
/// pair; both are computed from the held bytes on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
	type_name: String,
	capacity: usize,
	data: Vec<u8>,
}

impl StringValue {
	/// Empty string of `type_name` holding at most `capacity` bytes.
	pub fn new(type_name: &str, capacity: usize) -> Result<Self> {
		if type_name.is_empty() || capacity == 0 {
			return Err(LogixError::InconsistentShape {
				type_name: type_name.to_owned(),
				reason: format!("string capacity {capacity}"),
			});
		}
		Ok(Self {
			type_name: type_name.to_owned(),
			capacity,
			data: Vec::new(),
		})
	}

	/// `STRING` holding `text`.
	pub fn standard(text: &str) -> Result<Self> {
		let mut value = Self::new("STRING", STANDARD_STRING_CAPACITY)?;
		value.set_data(text.as_bytes())?;
		Ok(value)
	}

	/// Copy holding `data`.
	pub fn with_data(mut self, data: &[u8]) -> Result<Self> {
		self.set_data(data)?;
		Ok(self)
	}

	/// Type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Declared capacity in bytes.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Current length in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the string holds no bytes.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Held bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Held bytes as text, replacing invalid UTF-8.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.data)
	}

	/// Replace the held bytes.
	pub fn set_data(&mut self, data: &[u8]) -> Result<()> {
		if data.len() > self.capacity {
			return Err(LogixError::StringCapacityExceeded {
				len: data.len(),
				capacity: self.capacity,
			});
		}
		self.data = data.to_vec();
		Ok(())
	}

	/// Truncate, or pad with zero bytes, to `len`.
	pub fn set_length(&mut self, len: usize) -> Result<()> {
		if len > self.capacity {
			return Err(LogixError::StringCapacityExceeded { len, capacity: self.capacity });
		}
		self.data.resize(len, 0);
		Ok(())
	}

	/// Single-quoted ASCII literal of the held bytes.
	pub fn quoted(&self) -> String {
		quote_bytes(&self.data)
	}

	/// Replace the held bytes from a single-quoted ASCII literal.
	pub fn set_quoted(&mut self, text: &str) -> Result<()> {
		let bytes = unquote_bytes(text).ok_or_else(|| LogixError::format(Radix::Ascii, text))?;
		self.set_data(&bytes)
	}

	/// Computed structural member: `LEN` or `DATA`, ignoring case.
	pub fn member(&self, name: &str) -> Option<LogixValue> {
		if name.eq_ignore_ascii_case("LEN") {
			let len = i32::try_from(self.data.len()).ok()?;
			return Some(LogixValue::Atomic(AtomicValue::dint(len)));
		}
		if name.eq_ignore_ascii_case("DATA") {
			return self.data_array().ok().map(LogixValue::Array);
		}
		None
	}

	fn data_array(&self) -> Result<ArrayValue> {
		let mut bytes = self.data.clone();
		bytes.resize(self.capacity, 0);
		let elements = bytes
			.iter()
			.map(|byte| AtomicValue::sint(*byte as i8).with_radix(Radix::Ascii).map(LogixValue::Atomic))
			.collect::<Result<Vec<_>>>()?;
		ArrayValue::from_elements("SINT", Dimensions::new(&[self.capacity])?, elements)
	}
}
