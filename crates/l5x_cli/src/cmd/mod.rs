/// Radix re-rendering command.
pub mod format;
/// Radix inference command.
pub mod infer;
/// Literal parse command.
pub mod parse;
/// Tag build and write-back command.
pub mod tag;

mod util;
