use l5x::logix::{AtomicKind, AtomicValue, LogixError, Radix, Result};

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

pub(crate) fn parse_kind(name: &str) -> Result<AtomicKind> {
	name.parse()
}

pub(crate) fn parse_radix(name: &str) -> Result<Radix> {
	name.parse()
}

/// Zero-padded hex of the raw bit pattern, sized to the kind.
pub(crate) fn bits_hex(value: &AtomicValue) -> String {
	let width = value.kind().byte_width() * 2;
	format!("0x{:0width$x}", value.bits())
}

/// Split a `PATH=TEXT` assignment at the first `=`.
pub(crate) fn parse_assignment(input: &str) -> Result<(&str, &str)> {
	match input.split_once('=') {
		Some((path, text)) if !path.trim().is_empty() => Ok((path.trim(), text)),
		_ => Err(LogixError::InvalidTagName { name: input.to_owned() }),
	}
}

/// Parse `a,b` array extents.
pub(crate) fn parse_dims(input: &str) -> Result<Vec<usize>> {
	input
		.split(',')
		.map(|part| {
			part.trim().parse::<usize>().map_err(|_| LogixError::MalformedData {
				element: "--dims".to_owned(),
				reason: format!("invalid extent {part:?}"),
			})
		})
		.collect()
}
