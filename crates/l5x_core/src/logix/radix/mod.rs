mod ascii;
mod base;
mod number;
mod time;

use std::fmt;
use std::str::FromStr;

use crate::logix::{AtomicKind, AtomicValue, LogixError, Result};

pub(crate) use ascii::{quote_bytes, unquote_bytes};
pub use time::format_ldt_with_offset;

/// Textual encodings an atomic value may be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Radix {
	/// Placeholder for values without a radix (structures, strings).
	#[default]
	Null,
	/// `2#` base-2 digits.
	Binary,
	/// `8#` base-8 digits, three per byte.
	Octal,
	/// Plain signed/unsigned integer text.
	Decimal,
	/// `16#` base-16 digits.
	Hex,
	/// Fixed-point float text.
	Float,
	/// Exponential float text.
	Exponential,
	/// Quoted characters with `$` escapes.
	Ascii,
	/// `DT#` microseconds since the Unix epoch, UTC.
	DateTime,
	/// `LDT#` nanoseconds since the Unix epoch, local time with offset.
	DateTimeNs,
}

impl Radix {
	/// Every radix, including [`Radix::Null`].
	pub const ALL: [Radix; 10] = [
		Radix::Null,
		Radix::Binary,
		Radix::Octal,
		Radix::Decimal,
		Radix::Hex,
		Radix::Float,
		Radix::Exponential,
		Radix::Ascii,
		Radix::DateTime,
		Radix::DateTimeNs,
	];

	// Specifier-bearing radixes first so bare digits fall through to decimal.
	const INFER_ORDER: [Radix; 9] = [
		Radix::Binary,
		Radix::Octal,
		Radix::Hex,
		Radix::Ascii,
		Radix::DateTimeNs,
		Radix::DateTime,
		Radix::Exponential,
		Radix::Float,
		Radix::Decimal,
	];

	/// File-format radix name.
	pub fn name(self) -> &'static str {
		match self {
			Self::Null => "NullType",
			Self::Binary => "Binary",
			Self::Octal => "Octal",
			Self::Decimal => "Decimal",
			Self::Hex => "Hex",
			Self::Float => "Float",
			Self::Exponential => "Exponential",
			Self::Ascii => "ASCII",
			Self::DateTime => "Date/Time",
			Self::DateTimeNs => "Date/Time (ns)",
		}
	}

	/// Look up a radix by file-format name, ignoring case.
	pub fn from_name(name: &str) -> Option<Self> {
		if name.eq_ignore_ascii_case("Null") {
			return Some(Self::Null);
		}
		Self::ALL.into_iter().find(|radix| radix.name().eq_ignore_ascii_case(name))
	}

	/// Leading text that marks the radix. Empty for decimal and float forms.
	pub fn specifier(self) -> &'static str {
		match self {
			Self::Binary => "2#",
			Self::Octal => "8#",
			Self::Hex => "16#",
			Self::Ascii => "'",
			Self::DateTime => "DT#",
			Self::DateTimeNs => "LDT#",
			Self::Null | Self::Decimal | Self::Float | Self::Exponential => "",
		}
	}

	/// Default radix for an atomic kind.
	pub fn default_for(kind: AtomicKind) -> Self {
		if kind.is_float() { Self::Float } else { Self::Decimal }
	}

	/// Whether values of `kind` may be rendered in this radix.
	pub fn supports(self, kind: AtomicKind) -> bool {
		match self {
			Self::Null => false,
			Self::Binary | Self::Octal | Self::Decimal | Self::Hex => kind.is_integer(),
			Self::Float | Self::Exponential => kind.is_float(),
			Self::Ascii => kind.is_integer() && kind != AtomicKind::Bool,
			Self::DateTime | Self::DateTimeNs => kind == AtomicKind::Lint,
		}
	}

	/// Whether `value` may be rendered in this radix: the kind is supported and, for `DT#`, the
	/// count falls inside the calendar years the text form can carry.
	pub fn supports_value(self, value: &AtomicValue) -> bool {
		self.check_value(value).is_ok()
	}

	pub(crate) fn check_value(self, value: &AtomicValue) -> Result<()> {
		if !self.supports(value.kind()) {
			return Err(LogixError::RadixNotSupported { radix: self, kind: value.kind() });
		}
		match self {
			Self::DateTime => time::check_dt(value.bits() as i64),
			_ => Ok(()),
		}
	}

	/// Whether `text` is well-formed text of this radix.
	pub fn recognizes(self, text: &str) -> bool {
		match self {
			Self::Null => false,
			Self::Binary => base::BINARY.recognizes(text),
			Self::Octal => base::OCTAL.recognizes(text),
			Self::Hex => base::HEX.recognizes(text),
			Self::Decimal => number::recognizes_decimal(text),
			Self::Float => number::recognizes_float(text),
			Self::Exponential => number::recognizes_exponential(text),
			Self::Ascii => ascii::recognizes(text),
			Self::DateTime => time::parse_dt(text).is_ok(),
			Self::DateTimeNs => time::parse_ldt(text).is_ok(),
		}
	}

	/// Render `value` as text of this radix.
	pub fn format(self, value: &AtomicValue) -> Result<String> {
		if self == Self::Null {
			return Err(LogixError::UnsupportedOperation { operation: "format with NullType radix" });
		}
		if !self.supports(value.kind()) {
			return Err(LogixError::RadixNotSupported {
				radix: self,
				kind: value.kind(),
			});
		}

		match self {
			Self::Binary => Ok(base::BINARY.format(value)),
			Self::Octal => Ok(base::OCTAL.format(value)),
			Self::Hex => Ok(base::HEX.format(value)),
			Self::Decimal => Ok(number::format_decimal(value)),
			Self::Float => Ok(number::format_float(value)),
			Self::Exponential => Ok(number::format_exponential(value)),
			Self::Ascii => Ok(ascii::format(value)),
			Self::DateTime => time::format_dt(value),
			Self::DateTimeNs => time::format_ldt(value),
			Self::Null => Err(LogixError::UnsupportedOperation { operation: "format with NullType radix" }),
		}
	}

	/// Parse text of this radix, selecting the narrowest fitting kind.
	pub fn parse(self, text: &str) -> Result<AtomicValue> {
		match self {
			Self::Null => Err(LogixError::UnsupportedOperation { operation: "parse with NullType radix" }),
			Self::Binary => base::BINARY.parse(text),
			Self::Octal => base::OCTAL.parse(text),
			Self::Hex => base::HEX.parse(text),
			Self::Decimal => number::parse_decimal(text),
			Self::Float => number::parse_float(text),
			Self::Exponential => number::parse_exponential(text),
			Self::Ascii => ascii::parse(text),
			Self::DateTime => Ok(AtomicValue::lint(time::parse_dt(text)?).with_radix(self)?),
			Self::DateTimeNs => Ok(AtomicValue::lint(time::parse_ldt(text)?).with_radix(self)?),
		}
	}

	/// Parse text of this radix into a declared atomic kind.
	pub fn parse_as(self, text: &str, kind: AtomicKind) -> Result<AtomicValue> {
		if self == Self::Null {
			return Err(LogixError::UnsupportedOperation { operation: "parse with NullType radix" });
		}
		if !self.supports(kind) {
			return Err(LogixError::RadixNotSupported { radix: self, kind });
		}

		match self {
			Self::Binary => base::BINARY.parse_as(text, kind),
			Self::Octal => base::OCTAL.parse_as(text, kind),
			Self::Hex => base::HEX.parse_as(text, kind),
			Self::Decimal => number::parse_decimal_as(text, kind),
			Self::Float => number::parse_float_as(text, kind, Self::Float),
			Self::Exponential => number::parse_float_as(text, kind, Self::Exponential),
			Self::Ascii => ascii::parse_as(text, kind),
			Self::DateTime | Self::DateTimeNs => self.parse(text),
			Self::Null => Err(LogixError::UnsupportedOperation { operation: "parse with NullType radix" }),
		}
	}

	/// Like [`Radix::parse`], returning `None` instead of an error.
	pub fn try_parse(self, text: &str) -> Option<AtomicValue> {
		self.parse(text).ok()
	}

	/// Determine the radix of `text`.
	pub fn infer(text: &str) -> Result<Radix> {
		Self::try_infer(text).ok_or_else(|| {
			tracing::trace!(text, "no radix recognizer matched");
			LogixError::RadixNotInferred { text: text.to_owned() }
		})
	}

	/// Like [`Radix::infer`], returning `None` instead of an error.
	pub fn try_infer(text: &str) -> Option<Radix> {
		Self::INFER_ORDER.into_iter().find(|radix| radix.recognizes(text))
	}

	/// Infer the radix of `text` and parse it.
	pub fn parse_any(text: &str) -> Result<AtomicValue> {
		Self::infer(text)?.parse(text)
	}

	/// Infer the radix of `text` and parse it into `kind`.
	pub fn parse_any_as(text: &str, kind: AtomicKind) -> Result<AtomicValue> {
		Self::infer(text)?.parse_as(text, kind)
	}
}

impl fmt::Display for Radix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Radix {
	type Err = LogixError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_name(s).ok_or_else(|| LogixError::MalformedData {
			element: "Radix".to_owned(),
			reason: format!("unknown radix name {s:?}"),
		})
	}
}

#[cfg(test)]
mod tests;
