use l5x::logix::{AtomicValue, Radix, Result};

use crate::cmd::util::{bits_hex, emit_json, parse_kind, parse_radix};

#[derive(clap::Args)]
pub struct Args {
	pub text: String,
	/// Radix to parse in; inferred from the text when omitted.
	#[arg(long)]
	pub radix: Option<String>,
	/// Atomic kind to parse into; the narrowest fitting kind when omitted.
	#[arg(long = "type")]
	pub kind: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Parse a literal and print what it decodes to.
pub fn run(args: Args) -> Result<()> {
	let radix = args.radix.as_deref().map(parse_radix).transpose()?;
	let kind = args.kind.as_deref().map(parse_kind).transpose()?;

	let value = match (radix, kind) {
		(Some(radix), Some(kind)) => radix.parse_as(&args.text, kind)?,
		(Some(radix), None) => radix.parse(&args.text)?,
		(None, Some(kind)) => Radix::parse_any_as(&args.text, kind)?,
		(None, None) => Radix::parse_any(&args.text)?,
	};

	if args.json {
		emit_json(&ParseJson::new(&args.text, &value)?);
		return Ok(());
	}

	println!("kind: {}", value.kind().name());
	println!("radix: {}", value.radix().name());
	println!("text: {}", value.to_text()?);
	println!("bits: {}", bits_hex(&value));
	Ok(())
}

#[derive(serde::Serialize)]
struct ParseJson {
	input: String,
	kind: &'static str,
	radix: &'static str,
	text: String,
	bits: String,
}

impl ParseJson {
	fn new(input: &str, value: &AtomicValue) -> Result<Self> {
		Ok(Self {
			input: input.to_owned(),
			kind: value.kind().name(),
			radix: value.radix().name(),
			text: value.to_text()?,
			bits: bits_hex(value),
		})
	}
}
