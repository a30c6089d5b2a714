use std::fmt::Write as _;

use crate::logix::{AtomicKind, AtomicValue, LogixError, Radix, Result};

pub(super) fn recognizes(text: &str) -> bool {
	unquote_bytes(text).is_some_and(|bytes| !bytes.is_empty())
}

pub(super) fn format(value: &AtomicValue) -> String {
	quote_bytes(&value.to_be_bytes())
}

pub(super) fn parse(text: &str) -> Result<AtomicValue> {
	let bytes = unquote_bytes(text).ok_or_else(|| LogixError::format(Radix::Ascii, text))?;
	if bytes.is_empty() {
		return Err(LogixError::format(Radix::Ascii, text));
	}
	let kind = AtomicKind::signed_for_bytes(bytes.len()).ok_or(LogixError::ByteCountOutOfRange { count: bytes.len() })?;
	AtomicValue::from_be_bytes(kind, &bytes)?.with_radix(Radix::Ascii)
}

pub(super) fn parse_as(text: &str, kind: AtomicKind) -> Result<AtomicValue> {
	let bytes = unquote_bytes(text).ok_or_else(|| LogixError::format(Radix::Ascii, text))?;
	if bytes.is_empty() {
		return Err(LogixError::format(Radix::Ascii, text));
	}
	AtomicValue::from_be_bytes(kind, &bytes)?.with_radix(Radix::Ascii)
}

/// Render bytes as a single-quoted literal, escaping everything outside printable ASCII.
pub(crate) fn quote_bytes(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() + 2);
	out.push('\'');
	for byte in bytes {
		match byte {
			b'$' => out.push_str("$$"),
			b'\'' => out.push_str("$'"),
			0x20..=0x7E => out.push(char::from(*byte)),
			_ => {
				let _ = write!(out, "${byte:02X}");
			}
		}
	}
	out.push('\'');
	out
}

/// Decode a single-quoted literal. `None` when quoting or an escape is malformed.
pub(crate) fn unquote_bytes(text: &str) -> Option<Vec<u8>> {
	let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
	let mut out = Vec::with_capacity(body.len());
	let mut chars = body.chars();

	while let Some(ch) = chars.next() {
		match ch {
			'$' => {
				let code = chars.next()?;
				let byte = match code {
					't' | 'T' => 0x09,
					'l' | 'L' | 'n' | 'N' => 0x0A,
					'p' | 'P' => 0x0C,
					'r' | 'R' => 0x0D,
					'$' => 0x24,
					'\'' => 0x27,
					high if high.is_ascii_hexdigit() => {
						let low = chars.next().filter(char::is_ascii_hexdigit)?;
						let high = high.to_digit(16)?;
						let low = low.to_digit(16)?;
						(high * 16 + low) as u8
					}
					_ => return None,
				};
				out.push(byte);
			}
			'\'' => return None,
			ch if ch.is_ascii() => out.push(ch as u8),
			_ => return None,
		}
	}

	Some(out)
}

#[cfg(test)]
mod tests {
	use super::{quote_bytes, unquote_bytes};

	#[test]
	fn named_escapes_decode_to_control_bytes() {
		let bytes = unquote_bytes("'$t$l$p$r$$$''").expect("escapes decode");
		assert_eq!(bytes, vec![0x09, 0x0A, 0x0C, 0x0D, 0x24, 0x27]);
	}

	#[test]
	fn quoting_escapes_markers_and_control_bytes() {
		assert_eq!(quote_bytes(b"a$b'c"), "'a$$b$'c'");
		assert_eq!(quote_bytes(&[0x00, 0x7F, b' ']), "'$00$7F '");
	}

	#[test]
	fn malformed_literals_are_rejected() {
		assert!(unquote_bytes("abc").is_none());
		assert!(unquote_bytes("'abc").is_none());
		assert!(unquote_bytes("'a'b'").is_none());
		assert!(unquote_bytes("'$G1'").is_none());
		assert!(unquote_bytes("'$0'").is_none());
	}
}
