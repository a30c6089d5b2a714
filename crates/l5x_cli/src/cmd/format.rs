use l5x::logix::{Radix, Result};

use crate::cmd::util::{emit_json, parse_kind, parse_radix};

#[derive(clap::Args)]
pub struct Args {
	pub value: String,
	#[arg(long = "type")]
	pub kind: String,
	#[arg(long)]
	pub radix: String,
	#[arg(long)]
	pub json: bool,
}

/// Parse `value` in whatever radix it is written in and re-render it.
pub fn run(args: Args) -> Result<()> {
	let kind = parse_kind(&args.kind)?;
	let target = parse_radix(&args.radix)?;

	let parsed = Radix::parse_any_as(&args.value, kind)?;
	let source = parsed.radix();
	let text = parsed.with_radix(target)?.to_text()?;

	if args.json {
		emit_json(&FormatJson {
			input: args.value,
			kind: kind.name(),
			from: source.name(),
			to: target.name(),
			text,
		});
		return Ok(());
	}

	println!("{text}");
	Ok(())
}

#[derive(serde::Serialize)]
struct FormatJson {
	input: String,
	kind: &'static str,
	from: &'static str,
	to: &'static str,
	text: String,
}
