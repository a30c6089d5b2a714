use std::fmt;
use std::str::FromStr;

use crate::logix::{LogixError, Radix, Result};

/// Closed set of atomic Logix kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicKind {
	/// `BOOL`
	Bool,
	/// `SINT`, 8-bit signed.
	Sint,
	/// `INT`, 16-bit signed.
	Int,
	/// `DINT`, 32-bit signed.
	Dint,
	/// `LINT`, 64-bit signed.
	Lint,
	/// `USINT`, 8-bit unsigned.
	Usint,
	/// `UINT`, 16-bit unsigned.
	Uint,
	/// `UDINT`, 32-bit unsigned.
	Udint,
	/// `ULINT`, 64-bit unsigned.
	Ulint,
	/// `REAL`, 32-bit float.
	Real,
	/// `LREAL`, 64-bit float.
	Lreal,
}

#[derive(Debug, Clone, Copy)]
struct KindInfo {
	name: &'static str,
	width: usize,
	signed: bool,
	float: bool,
}

const fn info(name: &'static str, width: usize, signed: bool, float: bool) -> KindInfo {
	KindInfo { name, width, signed, float }
}

impl AtomicKind {
	/// Every atomic kind, narrowest integers first.
	pub const ALL: [AtomicKind; 11] = [
		AtomicKind::Bool,
		AtomicKind::Sint,
		AtomicKind::Int,
		AtomicKind::Dint,
		AtomicKind::Lint,
		AtomicKind::Usint,
		AtomicKind::Uint,
		AtomicKind::Udint,
		AtomicKind::Ulint,
		AtomicKind::Real,
		AtomicKind::Lreal,
	];

	fn info(self) -> KindInfo {
		match self {
			Self::Bool => info("BOOL", 1, false, false),
			Self::Sint => info("SINT", 1, true, false),
			Self::Int => info("INT", 2, true, false),
			Self::Dint => info("DINT", 4, true, false),
			Self::Lint => info("LINT", 8, true, false),
			Self::Usint => info("USINT", 1, false, false),
			Self::Uint => info("UINT", 2, false, false),
			Self::Udint => info("UDINT", 4, false, false),
			Self::Ulint => info("ULINT", 8, false, false),
			Self::Real => info("REAL", 4, true, true),
			Self::Lreal => info("LREAL", 8, true, true),
		}
	}

	/// File-format type name.
	pub fn name(self) -> &'static str {
		self.info().name
	}

	/// Look up a kind by type name, ignoring case.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
	}

	/// Storage width in bytes. `BOOL` occupies one byte.
	pub fn byte_width(self) -> usize {
		self.info().width
	}

	/// Whether the kind is a two's complement signed integer.
	pub fn is_signed_integer(self) -> bool {
		let info = self.info();
		info.signed && !info.float
	}

	/// Whether the kind is `REAL` or `LREAL`.
	pub fn is_float(self) -> bool {
		self.info().float
	}

	/// Whether the kind is an integer (including `BOOL`).
	pub fn is_integer(self) -> bool {
		!self.is_float()
	}

	/// Narrowest signed integer kind able to hold `bytes` bytes.
	pub fn signed_for_bytes(bytes: usize) -> Option<Self> {
		match bytes {
			0 | 1 => Some(Self::Sint),
			2 => Some(Self::Int),
			3 | 4 => Some(Self::Dint),
			5..=8 => Some(Self::Lint),
			_ => None,
		}
	}

	fn mask(self) -> u64 {
		match self {
			Self::Bool => 1,
			_ => match self.byte_width() {
				8 => u64::MAX,
				width => (1_u64 << (width * 8)) - 1,
			},
		}
	}

	/// Inclusive integer range of the kind, `None` for floats.
	pub fn integer_range(self) -> Option<(i128, i128)> {
		if self.is_float() {
			return None;
		}
		if self == Self::Bool {
			return Some((0, 1));
		}
		let bits = self.byte_width() as u32 * 8;
		if self.is_signed_integer() {
			Some((-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1))
		} else {
			Some((0, (1_i128 << bits) - 1))
		}
	}
}

impl fmt::Display for AtomicKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for AtomicKind {
	type Err = LogixError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_name(s).ok_or_else(|| LogixError::UnknownDataType { name: s.to_owned() })
	}
}

/// One atomic value: a kind, its zero-extended bit pattern and a display radix.
///
/// The kind never changes after construction. Bits are masked to the kind width, so a
/// `SINT` holding `-1` stores `0xFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomicValue {
	kind: AtomicKind,
	bits: u64,
	radix: Radix,
}

impl AtomicValue {
	/// Build a value from a raw bit pattern using the default radix of `kind`.
	pub fn from_bits(kind: AtomicKind, bits: u64) -> Self {
		Self {
			kind,
			bits: bits & kind.mask(),
			radix: Radix::default_for(kind),
		}
	}

	/// Zero value of `kind`.
	pub fn zero(kind: AtomicKind) -> Self {
		Self::from_bits(kind, 0)
	}

	/// Build a value from big-endian bytes, left-padding short input.
	///
	/// Leading bytes beyond the kind width must be zero.
	pub fn from_be_bytes(kind: AtomicKind, bytes: &[u8]) -> Result<Self> {
		let width = kind.byte_width();
		let excess = bytes.len().saturating_sub(width);
		if bytes[..excess].iter().any(|byte| *byte != 0) {
			if bytes.len() > 8 {
				return Err(LogixError::ByteCountOutOfRange { count: bytes.len() });
			}
			return Err(LogixError::IntegerOutOfRange {
				text: render_hex(bytes),
				kind,
			});
		}

		let bits = bytes[excess..].iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
		if kind == AtomicKind::Bool && bits > 1 {
			return Err(LogixError::IntegerOutOfRange {
				text: render_hex(bytes),
				kind,
			});
		}
		Ok(Self::from_bits(kind, bits))
	}

	/// Build a value from an integer, checking the range of `kind`.
	pub fn from_integer(kind: AtomicKind, value: i128, text: &str) -> Result<Self> {
		let Some((min, max)) = kind.integer_range() else {
			return Err(LogixError::RadixNotSupported {
				radix: Radix::Decimal,
				kind,
			});
		};
		if value < min || value > max {
			return Err(LogixError::IntegerOutOfRange {
				text: text.to_owned(),
				kind,
			});
		}
		Ok(Self::from_bits(kind, value as u64))
	}

	/// `BOOL` value.
	pub fn bool(value: bool) -> Self {
		Self::from_bits(AtomicKind::Bool, u64::from(value))
	}

	/// `SINT` value.
	pub fn sint(value: i8) -> Self {
		Self::from_bits(AtomicKind::Sint, value as u64)
	}

	/// `INT` value.
	pub fn int(value: i16) -> Self {
		Self::from_bits(AtomicKind::Int, value as u64)
	}

	/// `DINT` value.
	pub fn dint(value: i32) -> Self {
		Self::from_bits(AtomicKind::Dint, value as u64)
	}

	/// `LINT` value.
	pub fn lint(value: i64) -> Self {
		Self::from_bits(AtomicKind::Lint, value as u64)
	}

	/// `USINT` value.
	pub fn usint(value: u8) -> Self {
		Self::from_bits(AtomicKind::Usint, u64::from(value))
	}

	/// `UINT` value.
	pub fn uint(value: u16) -> Self {
		Self::from_bits(AtomicKind::Uint, u64::from(value))
	}

	/// `UDINT` value.
	pub fn udint(value: u32) -> Self {
		Self::from_bits(AtomicKind::Udint, u64::from(value))
	}

	/// `ULINT` value.
	pub fn ulint(value: u64) -> Self {
		Self::from_bits(AtomicKind::Ulint, value)
	}

	/// `REAL` value.
	pub fn real(value: f32) -> Self {
		Self::from_bits(AtomicKind::Real, u64::from(value.to_bits()))
	}

	/// `LREAL` value.
	pub fn lreal(value: f64) -> Self {
		Self::from_bits(AtomicKind::Lreal, value.to_bits())
	}

	/// Return a copy displayed through `radix`.
	pub fn with_radix(mut self, radix: Radix) -> Result<Self> {
		self.set_radix(radix)?;
		Ok(self)
	}

	/// Replace the display radix.
	pub fn set_radix(&mut self, radix: Radix) -> Result<()> {
		radix.check_value(self)?;
		self.radix = radix;
		Ok(())
	}

	/// Atomic kind.
	pub fn kind(&self) -> AtomicKind {
		self.kind
	}

	/// Zero-extended bit pattern.
	pub fn bits(&self) -> u64 {
		self.bits
	}

	/// Display radix.
	pub fn radix(&self) -> Radix {
		self.radix
	}

	/// Big-endian bytes, exactly [`AtomicKind::byte_width`] long.
	pub fn to_be_bytes(&self) -> Vec<u8> {
		let width = self.kind.byte_width();
		self.bits.to_be_bytes()[8 - width..].to_vec()
	}

	/// Whether the value is non-zero.
	pub fn as_bool(&self) -> bool {
		self.bits != 0
	}

	/// Integer value, sign-extended for signed kinds. `None` for floats.
	pub fn as_i128(&self) -> Option<i128> {
		if self.kind.is_float() {
			return None;
		}
		if self.kind.is_signed_integer() {
			let shift = 64 - self.kind.byte_width() as u32 * 8;
			Some(i128::from(((self.bits << shift) as i64) >> shift))
		} else {
			Some(i128::from(self.bits))
		}
	}

	/// Integer value as `i64`, `None` for floats or `ULINT` values above `i64::MAX`.
	pub fn as_i64(&self) -> Option<i64> {
		self.as_i128().and_then(|value| i64::try_from(value).ok())
	}

	/// Numeric value widened to `f64`.
	pub fn as_f64(&self) -> f64 {
		match self.kind {
			AtomicKind::Real => f64::from(f32::from_bits(self.bits as u32)),
			AtomicKind::Lreal => f64::from_bits(self.bits),
			_ => self.as_i128().unwrap_or_default() as f64,
		}
	}

	/// Render through the value's own radix.
	pub fn to_text(&self) -> Result<String> {
		self.radix.format(self)
	}
}

impl fmt::Display for AtomicValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.to_text() {
			Ok(text) => f.write_str(&text),
			// Date radixes can hold tick counts beyond the calendar.
			Err(_) => match self.as_i128() {
				Some(value) => write!(f, "{value}"),
				None => write!(f, "{}", self.as_f64()),
			},
		}
	}
}

macro_rules! atomic_from {
	($($ty:ty => $ctor:ident),* $(,)?) => {
		$(
			impl From<$ty> for AtomicValue {
				fn from(value: $ty) -> Self {
					Self::$ctor(value)
				}
			}
		)*
	};
}

atomic_from! {
	bool => bool,
	i8 => sint,
	i16 => int,
	i32 => dint,
	i64 => lint,
	u8 => usint,
	u16 => uint,
	u32 => udint,
	u64 => ulint,
	f32 => real,
	f64 => lreal,
}

fn render_hex(bytes: &[u8]) -> String {
	let digits: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
	format!("16#{digits}")
}
