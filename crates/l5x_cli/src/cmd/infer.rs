use l5x::logix::{Radix, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub text: String,
	#[arg(long)]
	pub json: bool,
}

/// Print the radix `text` is written in.
pub fn run(args: Args) -> Result<()> {
	let radix = Radix::infer(&args.text)?;

	if args.json {
		emit_json(&InferJson {
			text: args.text,
			radix: radix.name(),
			specifier: radix.specifier(),
		});
		return Ok(());
	}

	println!("{}", radix.name());
	Ok(())
}

#[derive(serde::Serialize)]
struct InferJson {
	text: String,
	radix: &'static str,
	specifier: &'static str,
}
