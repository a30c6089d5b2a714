use l5x::logix::{DataOptions, Document, LogixValue, Result};

use crate::cmd::util::{emit_json, parse_assignment, parse_dims};

#[derive(clap::Args)]
pub struct Args {
	pub name: String,
	#[arg(long = "type")]
	pub data_type: String,
	/// Initial text for an atomic or string tag.
	#[arg(long)]
	pub value: Option<String>,
	/// Array extents, e.g. `2,3`.
	#[arg(long)]
	pub dims: Option<String>,
	#[arg(long = "set", value_name = "PATH=TEXT")]
	pub assignments: Vec<String>,
	/// Apply the tighter depth and array limits.
	#[arg(long)]
	pub strict: bool,
	#[arg(long)]
	pub json: bool,
}

/// Build a tag in an empty document, apply assignments and print the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		name,
		data_type,
		value,
		dims,
		assignments,
		strict,
		json,
	} = args;

	let initial = match dims.as_deref() {
		Some(dims) => LogixValue::array(&data_type, &parse_dims(dims)?)?,
		None => LogixValue::default_for_type(&data_type)?,
	};

	let mut doc = if strict { Document::with_options(DataOptions::strict()) } else { Document::new() };
	let tag = doc.add_tag(&name, initial)?;
	if let Some(text) = value.as_deref() {
		tag.set_text(&mut doc, text)?;
	}
	for assignment in &assignments {
		let (path, text) = parse_assignment(assignment)?;
		tag.resolve(&doc, path)?.set_text(&mut doc, text)?;
	}

	if json {
		let root = tag.value(&doc)?;
		let members = root
			.members()
			.into_iter()
			.map(|(relative, member)| MemberJson::new(tag.name().join(&relative).to_string(), member))
			.collect::<Result<Vec<_>>>()?;
		emit_json(&TagJson {
			name: tag.name().to_string(),
			data_type: root.type_label(),
			xml: doc.render(tag.node())?,
			members,
		});
		return Ok(());
	}

	println!("{}", doc.render(tag.node())?);
	Ok(())
}

#[derive(serde::Serialize)]
struct TagJson {
	name: String,
	data_type: String,
	xml: String,
	members: Vec<MemberJson>,
}

#[derive(serde::Serialize)]
struct MemberJson {
	name: String,
	#[serde(rename = "type")]
	type_label: String,
	radix: &'static str,
	value: Option<String>,
}

impl MemberJson {
	fn new(name: String, value: &LogixValue) -> Result<Self> {
		let text = match value {
			LogixValue::Atomic(atomic) => Some(atomic.to_text()?),
			LogixValue::String(string) => Some(string.quoted()),
			LogixValue::Array(_) | LogixValue::Structure(_) => None,
		};
		Ok(Self {
			name,
			type_label: value.type_label(),
			radix: value.radix().name(),
			value: text,
		})
	}
}
