use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::logix::{LogixError, Result};

/// Bracketed array subscript with 1 to 3 coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayIndex {
	coords: Vec<usize>,
}

impl ArrayIndex {
	/// Build an index, rejecting an empty or more than three-dimensional subscript.
	pub fn new(coords: &[usize]) -> Result<Self> {
		if coords.is_empty() || coords.len() > 3 {
			return Err(LogixError::InvalidTagName { name: render_coords(coords) });
		}
		Ok(Self { coords: coords.to_vec() })
	}

	/// Coordinates, outermost first.
	pub fn coords(&self) -> &[usize] {
		&self.coords
	}
}

impl fmt::Display for ArrayIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&render_coords(&self.coords))
	}
}

fn render_coords(coords: &[usize]) -> String {
	let joined: Vec<String> = coords.iter().map(usize::to_string).collect();
	format!("[{}]", joined.join(","))
}

/// One parsed step in a tag name.
#[derive(Debug, Clone)]
pub enum Segment {
	/// Structure member selected by name.
	Member(String),
	/// Array element selected by subscript.
	Index(ArrayIndex),
}

impl PartialEq for Segment {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Member(left), Self::Member(right)) => left.eq_ignore_ascii_case(right),
			(Self::Index(left), Self::Index(right)) => left == right,
			_ => false,
		}
	}
}

impl Eq for Segment {}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Member(name) => f.write_str(name),
			Self::Index(index) => write!(f, "{index}"),
		}
	}
}

impl Hash for Segment {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match self {
			Self::Member(name) => {
				0_u8.hash(state);
				for byte in name.bytes() {
					byte.to_ascii_lowercase().hash(state);
				}
			}
			Self::Index(index) => {
				1_u8.hash(state);
				index.hash(state);
			}
		}
	}
}

/// Dotted and bracketed address of a value, e.g. `Motor.Speed[2].ACC`.
///
/// Comparison and hashing ignore ASCII case in member names. A name may start with a
/// subscript (`[1].PRE`) when it is relative to an array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagName {
	segments: Vec<Segment>,
}

impl TagName {
	/// Parse dotted member syntax with optional `[i]`, `[i,j]` or `[i,j,k]` subscripts.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || LogixError::InvalidTagName { name: input.to_owned() };
		if input.is_empty() {
			return Err(invalid());
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut segments = Vec::new();

		while idx < bytes.len() {
			if bytes[idx] == b'[' {
				let close = input[idx..].find(']').map(|offset| idx + offset).ok_or_else(invalid)?;
				let mut coords = Vec::with_capacity(3);
				for part in input[idx + 1..close].split(',') {
					let part = part.trim();
					if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
						return Err(invalid());
					}
					coords.push(part.parse::<usize>().map_err(|_| invalid())?);
				}
				let index = ArrayIndex::new(&coords).map_err(|_| invalid())?;
				segments.push(Segment::Index(index));
				idx = close + 1;
			} else {
				let start = idx;
				while idx < bytes.len() && is_name_byte(bytes[idx]) {
					idx += 1;
				}
				if idx == start || bytes[start].is_ascii_digit() {
					return Err(invalid());
				}
				segments.push(Segment::Member(input[start..idx].to_owned()));
			}

			if idx < bytes.len() {
				match bytes[idx] {
					b'[' => {}
					b'.' => {
						idx += 1;
						if idx >= bytes.len() || bytes[idx] == b'[' {
							return Err(invalid());
						}
					}
					_ => return Err(invalid()),
				}
			}
		}

		Ok(Self { segments })
	}

	/// Build a name from already validated segments.
	pub fn from_segments(segments: Vec<Segment>) -> Self {
		Self { segments }
	}

	/// Single-member name.
	pub fn member(name: &str) -> Self {
		Self {
			segments: vec![Segment::Member(name.to_owned())],
		}
	}

	/// Parsed segments, outermost first.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Whether the name has no segments. The empty name addresses the value itself.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Number of segments.
	pub fn depth(&self) -> usize {
		self.segments.len()
	}

	/// Leading member name, if the name starts with one.
	pub fn root(&self) -> Option<&str> {
		match self.segments.first() {
			Some(Segment::Member(name)) => Some(name),
			_ => None,
		}
	}

	/// Everything after the leading segment.
	pub fn members(&self) -> TagName {
		Self {
			segments: self.segments.iter().skip(1).cloned().collect(),
		}
	}

	/// Name with the final segment removed. `None` for an empty name.
	pub fn parent(&self) -> Option<TagName> {
		let (_, rest) = self.segments.split_last()?;
		Some(Self { segments: rest.to_vec() })
	}

	/// Final segment.
	pub fn last(&self) -> Option<&Segment> {
		self.segments.last()
	}

	/// Append `other` after this name.
	pub fn join(&self, other: &TagName) -> TagName {
		let mut segments = self.segments.clone();
		segments.extend(other.segments.iter().cloned());
		Self { segments }
	}

	/// Append one segment.
	pub fn push(&mut self, segment: Segment) {
		self.segments.push(segment);
	}

	/// Copy of this name with one extra segment.
	pub fn with(&self, segment: Segment) -> TagName {
		let mut name = self.clone();
		name.push(segment);
		name
	}

	/// Whether `prefix` matches the leading segments of this name.
	pub fn starts_with(&self, prefix: &TagName) -> bool {
		self.segments.len() >= prefix.segments.len() && self.segments.iter().zip(&prefix.segments).all(|(left, right)| left == right)
	}
}

fn is_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b':'
}

impl fmt::Display for TagName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, segment) in self.segments.iter().enumerate() {
			match segment {
				Segment::Member(name) => {
					if idx > 0 {
						f.write_str(".")?;
					}
					f.write_str(name)?;
				}
				Segment::Index(index) => write!(f, "{index}")?,
			}
		}
		Ok(())
	}
}

impl FromStr for TagName {
	type Err = LogixError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

/// Anything that can address a member: text or an already parsed [`TagName`].
pub trait ToTagName {
	/// Convert into a parsed tag name.
	fn to_tag_name(&self) -> Result<TagName>;
}

impl ToTagName for TagName {
	fn to_tag_name(&self) -> Result<TagName> {
		Ok(self.clone())
	}
}

impl ToTagName for str {
	fn to_tag_name(&self) -> Result<TagName> {
		TagName::parse(self)
	}
}

impl ToTagName for String {
	fn to_tag_name(&self) -> Result<TagName> {
		TagName::parse(self)
	}
}

impl<T: ToTagName + ?Sized> ToTagName for &T {
	fn to_tag_name(&self) -> Result<TagName> {
		(**self).to_tag_name()
	}
}
