use crate::logix::{AtomicKind, AtomicValue, LogixError, Radix, Result};

const QNAN: &str = "1.#QNAN";
const INF: &str = "1.#INF";
const NEG_INF: &str = "-1.#INF";

// Narrowest first, signed before unsigned at each width.
const DECIMAL_ORDER: [AtomicKind; 8] = [
	AtomicKind::Sint,
	AtomicKind::Usint,
	AtomicKind::Int,
	AtomicKind::Uint,
	AtomicKind::Dint,
	AtomicKind::Udint,
	AtomicKind::Lint,
	AtomicKind::Ulint,
];

// Digits of shortest round-trip REAL text never exceed this.
const REAL_SIGNIFICANT_DIGITS: usize = 9;

pub(super) fn recognizes_decimal(text: &str) -> bool {
	let body = text.strip_prefix(['-', '+']).unwrap_or(text);
	!body.is_empty() && body.bytes().all(|byte| byte.is_ascii_digit())
}

pub(super) fn format_decimal(value: &AtomicValue) -> String {
	value.as_i128().unwrap_or_default().to_string()
}

pub(super) fn parse_decimal(text: &str) -> Result<AtomicValue> {
	let number = parse_integer(text)?;
	let kind = DECIMAL_ORDER
		.into_iter()
		.find(|kind| kind.integer_range().is_some_and(|(min, max)| number >= min && number <= max))
		.ok_or_else(|| LogixError::NumberTooLarge { text: text.to_owned() })?;
	AtomicValue::from_integer(kind, number, text)?.with_radix(Radix::Decimal)
}

pub(super) fn parse_decimal_as(text: &str, kind: AtomicKind) -> Result<AtomicValue> {
	let number = parse_integer(text)?;
	AtomicValue::from_integer(kind, number, text)?.with_radix(Radix::Decimal)
}

fn parse_integer(text: &str) -> Result<i128> {
	if !recognizes_decimal(text) {
		return Err(LogixError::format(Radix::Decimal, text));
	}
	text.parse::<i128>().map_err(|_| LogixError::NumberTooLarge { text: text.to_owned() })
}

pub(super) fn recognizes_float(text: &str) -> bool {
	special(text).is_some() || (is_plain_float(text) && text.parse::<f64>().is_ok())
}

pub(super) fn recognizes_exponential(text: &str) -> bool {
	let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
		return false;
	};
	let exponent = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
	is_plain_float(mantissa) && !exponent.is_empty() && exponent.bytes().all(|byte| byte.is_ascii_digit()) && text.parse::<f64>().is_ok()
}

/// Optional sign, digits, a decimal point, digits. No exponent.
fn is_plain_float(text: &str) -> bool {
	let body = text.strip_prefix(['-', '+']).unwrap_or(text);
	let Some((whole, fraction)) = body.split_once('.') else {
		return false;
	};
	(!whole.is_empty() || !fraction.is_empty())
		&& whole.bytes().all(|byte| byte.is_ascii_digit())
		&& fraction.bytes().all(|byte| byte.is_ascii_digit())
}

fn special(text: &str) -> Option<f64> {
	match text {
		QNAN => Some(f64::NAN),
		INF => Some(f64::INFINITY),
		NEG_INF => Some(f64::NEG_INFINITY),
		_ => None,
	}
}

fn special_text(value: f64) -> Option<&'static str> {
	if value.is_nan() {
		Some(QNAN)
	} else if value == f64::INFINITY {
		Some(INF)
	} else if value == f64::NEG_INFINITY {
		Some(NEG_INF)
	} else {
		None
	}
}

/// Shortest round-trip text with at least one fractional digit.
pub(super) fn format_float(value: &AtomicValue) -> String {
	if let Some(text) = special_text(value.as_f64()) {
		return text.to_owned();
	}

	let mut text = match value.kind() {
		AtomicKind::Real => f32::from_bits(value.bits() as u32).to_string(),
		_ => f64::from_bits(value.bits()).to_string(),
	};
	if !text.contains('.') {
		text.push_str(".0");
	}
	text
}

/// Mantissa with 8 (`REAL`) or 16 (`LREAL`) fractional digits and a signed three digit exponent.
pub(super) fn format_exponential(value: &AtomicValue) -> String {
	if let Some(text) = special_text(value.as_f64()) {
		return text.to_owned();
	}

	let raw = match value.kind() {
		AtomicKind::Real => format!("{:.8e}", f32::from_bits(value.bits() as u32)),
		_ => format!("{:.16e}", f64::from_bits(value.bits())),
	};
	let Some((mantissa, exponent)) = raw.split_once('e') else {
		return raw;
	};
	let exponent: i32 = exponent.parse().unwrap_or_default();
	let sign = if exponent < 0 { '-' } else { '+' };
	format!("{mantissa}e{sign}{:03}", exponent.unsigned_abs())
}

pub(super) fn parse_float(text: &str) -> Result<AtomicValue> {
	if !recognizes_float(text) {
		return Err(LogixError::format(Radix::Float, text));
	}
	parse_float_untyped(text, Radix::Float)
}

pub(super) fn parse_exponential(text: &str) -> Result<AtomicValue> {
	if special(text).is_none() && !recognizes_exponential(text) {
		return Err(LogixError::format(Radix::Exponential, text));
	}
	parse_float_untyped(text, Radix::Exponential)
}

fn parse_float_untyped(text: &str, radix: Radix) -> Result<AtomicValue> {
	let value = match special(text) {
		Some(value) => value,
		None => text.parse::<f64>().map_err(|_| LogixError::format(radix, text))?,
	};

	let kind = if value.is_finite() && (value.abs() > f64::from(f32::MAX) || significant_digits(text) > REAL_SIGNIFICANT_DIGITS) {
		AtomicKind::Lreal
	} else {
		AtomicKind::Real
	};
	parse_float_as(text, kind, radix)
}

pub(super) fn parse_float_as(text: &str, kind: AtomicKind, radix: Radix) -> Result<AtomicValue> {
	let accepted = match radix {
		Radix::Exponential => special(text).is_some() || recognizes_exponential(text),
		_ => recognizes_float(text),
	};
	if !accepted {
		return Err(LogixError::format(radix, text));
	}

	let value = match (kind, special(text)) {
		(AtomicKind::Real, Some(value)) => AtomicValue::real(value as f32),
		(AtomicKind::Lreal, Some(value)) => AtomicValue::lreal(value),
		(AtomicKind::Real, None) => {
			let parsed = text.parse::<f32>().map_err(|_| LogixError::format(radix, text))?;
			if parsed.is_infinite() {
				return Err(LogixError::NumberTooLarge { text: text.to_owned() });
			}
			AtomicValue::real(parsed)
		}
		(AtomicKind::Lreal, None) => {
			let parsed = text.parse::<f64>().map_err(|_| LogixError::format(radix, text))?;
			if parsed.is_infinite() {
				return Err(LogixError::NumberTooLarge { text: text.to_owned() });
			}
			AtomicValue::lreal(parsed)
		}
		_ => return Err(LogixError::RadixNotSupported { radix, kind }),
	};
	value.with_radix(radix)
}

fn significant_digits(text: &str) -> usize {
	let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
	let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
	digits.trim_start_matches('0').trim_end_matches('0').len()
}

#[cfg(test)]
mod tests {
	use super::significant_digits;

	#[test]
	fn significant_digits_ignore_padding_zeros() {
		assert_eq!(significant_digits("0.0"), 0);
		assert_eq!(significant_digits("1.50000000e+000"), 2);
		assert_eq!(significant_digits("-0.1000000000000000055"), 19);
		assert_eq!(significant_digits("3.1415927"), 8);
	}
}
