use std::fmt::Write as _;

use crate::logix::{AtomicKind, AtomicValue, LogixError, Radix, Result};

/// Digit layout for the power-of-two radixes.
#[derive(Debug, Clone, Copy)]
pub(super) struct Base {
	radix: Radix,
	base: u32,
	digits_per_byte: usize,
	group: usize,
}

pub(super) const BINARY: Base = Base {
	radix: Radix::Binary,
	base: 2,
	digits_per_byte: 8,
	group: 4,
};

pub(super) const OCTAL: Base = Base {
	radix: Radix::Octal,
	base: 8,
	digits_per_byte: 3,
	group: 3,
};

pub(super) const HEX: Base = Base {
	radix: Radix::Hex,
	base: 16,
	digits_per_byte: 2,
	group: 4,
};

impl Base {
	pub(super) fn recognizes(self, text: &str) -> bool {
		self.digits(text).is_some()
	}

	/// Render each big-endian byte as fixed-width digits, grouped from the least significant end.
	pub(super) fn format(self, value: &AtomicValue) -> String {
		let specifier = self.radix.specifier();
		if value.kind() == AtomicKind::Bool {
			return format!("{specifier}{}", u8::from(value.as_bool()));
		}

		let mut digits = String::with_capacity(value.kind().byte_width() * self.digits_per_byte);
		for byte in value.to_be_bytes() {
			let _ = match self.base {
				2 => write!(digits, "{byte:08b}"),
				8 => write!(digits, "{byte:03o}"),
				_ => write!(digits, "{byte:02x}"),
			};
		}

		format!("{specifier}{}", group_digits(&digits, self.group))
	}

	pub(super) fn parse(self, text: &str) -> Result<AtomicValue> {
		let (digit_count, bytes) = self.bytes(text)?;

		// A lone partial digit of 0 or 1 is how BOOL values render.
		if digit_count < self.digits_per_byte && bytes.len() == 1 && bytes[0] <= 1 {
			return AtomicValue::bool(bytes[0] == 1).with_radix(self.radix);
		}

		let kind = AtomicKind::signed_for_bytes(bytes.len()).ok_or(LogixError::ByteCountOutOfRange { count: bytes.len() })?;
		AtomicValue::from_be_bytes(kind, &bytes)?.with_radix(self.radix)
	}

	pub(super) fn parse_as(self, text: &str, kind: AtomicKind) -> Result<AtomicValue> {
		let (_, bytes) = self.bytes(text)?;
		AtomicValue::from_be_bytes(kind, &bytes)?.with_radix(self.radix)
	}

	fn digits(self, text: &str) -> Option<String> {
		let body = text.strip_prefix(self.radix.specifier())?;
		let digits: String = body.chars().filter(|ch| *ch != '_').collect();
		if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(self.base)) {
			return None;
		}
		Some(digits)
	}

	/// Split digits into per-byte chunks from the right and decode each chunk.
	fn bytes(self, text: &str) -> Result<(usize, Vec<u8>)> {
		let digits = self.digits(text).ok_or_else(|| LogixError::format(self.radix, text))?;

		let mut bytes = Vec::with_capacity(digits.len().div_ceil(self.digits_per_byte));
		let mut end = digits.len();
		while end > 0 {
			let start = end.saturating_sub(self.digits_per_byte);
			let chunk = &digits[start..end];
			let byte = u32::from_str_radix(chunk, self.base).map_err(|_| LogixError::format(self.radix, text))?;
			let byte = u8::try_from(byte).map_err(|_| LogixError::format(self.radix, text))?;
			bytes.push(byte);
			end = start;
		}
		bytes.reverse();

		if bytes.len() > 8 {
			let significant = bytes.iter().skip_while(|byte| **byte == 0).count();
			if significant > 8 {
				return Err(LogixError::ByteCountOutOfRange { count: bytes.len() });
			}
			bytes.drain(..bytes.len() - 8);
		}

		Ok((digits.len(), bytes))
	}
}

fn group_digits(digits: &str, group: usize) -> String {
	let len = digits.len();
	let mut out = String::with_capacity(len + len / group);
	for (idx, ch) in digits.chars().enumerate() {
		if idx > 0 && (len - idx) % group == 0 {
			out.push('_');
		}
		out.push(ch);
	}
	out
}
