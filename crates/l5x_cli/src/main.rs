#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

mod cmd;

#[derive(Parser)]
#[command(name = "l5x", about = "Logix radix codec and tag data tools")]
struct Cli {
	/// Log to stderr; repeat for more detail.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the radix a literal is written in.
	Infer(cmd::infer::Args),
	/// Parse a literal and print its kind, radix and bits.
	Parse(cmd::parse::Args),
	/// Re-render a literal in another radix.
	Format(cmd::format::Args),
	/// Build a tag, assign members and print its serialized form.
	Tag(cmd::tag::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => Level::WARN,
		1 => Level::DEBUG,
		_ => Level::TRACE,
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();
}

fn run(command: Commands) -> l5x::logix::Result<()> {
	match command {
		Commands::Infer(args) => cmd::infer::run(args),
		Commands::Parse(args) => cmd::parse::run(args),
		Commands::Format(args) => cmd::format::run(args),
		Commands::Tag(args) => cmd::tag::run(args),
	}
}
