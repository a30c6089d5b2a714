mod array;
mod string;
mod structure;

use std::borrow::Cow;

pub use array::{ArrayValue, Dimensions};
pub use string::StringValue;
pub(crate) use string::STANDARD_STRING_CAPACITY;
pub use structure::StructureValue;

use crate::logix::{
	ArrayIndex, AtomicKind, AtomicValue, ErrorKind, LogixError, PredefinedType, Radix, Result, Segment, SerializationShape, TagName, ToTagName,
};

/// A Logix data value: atomic, array, structure or string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogixValue {
	/// Boolean, integer or float primitive.
	Atomic(AtomicValue),
	/// Fixed-dimension homogeneous collection.
	Array(ArrayValue),
	/// Named, ordered members.
	Structure(StructureValue),
	/// Fixed-capacity character buffer.
	String(StringValue),
}

impl LogixValue {
	/// Zero-valued default for an atomic or predefined type name.
	pub fn default_for_type(type_name: &str) -> Result<Self> {
		if let Some(kind) = AtomicKind::from_name(type_name) {
			return Ok(Self::Atomic(AtomicValue::zero(kind)));
		}
		if let Some(predefined) = PredefinedType::from_name(type_name) {
			return predefined.default_value();
		}
		Err(LogixError::UnknownDataType { name: type_name.to_owned() })
	}

	/// Zero-valued array of `element_type` with the given extents.
	pub fn array(element_type: &str, extents: &[usize]) -> Result<Self> {
		Ok(Self::Array(ArrayValue::new(element_type, Dimensions::new(extents)?)?))
	}

	/// Type name as written in `DataType`.
	pub fn type_name(&self) -> &str {
		match self {
			Self::Atomic(value) => value.kind().name(),
			Self::Array(array) => array.element_type(),
			Self::Structure(structure) => structure.type_name(),
			Self::String(string) => string.type_name(),
		}
	}

	/// Type name with array extents, e.g. `DINT[2,3]`.
	pub fn type_label(&self) -> String {
		match self {
			Self::Array(array) => format!("{}[{}]", array.element_type(), array.dimensions()),
			_ => self.type_name().to_owned(),
		}
	}

	/// Display radix. [`Radix::Null`] for structures and strings.
	pub fn radix(&self) -> Radix {
		match self {
			Self::Atomic(value) => value.radix(),
			Self::Array(array) => array.radix(),
			Self::Structure(_) | Self::String(_) => Radix::Null,
		}
	}

	/// Change the display radix of an atomic value or of every element of an atomic array.
	pub fn set_radix(&mut self, radix: Radix) -> Result<()> {
		match self {
			Self::Atomic(value) => value.set_radix(radix),
			Self::Array(array) => array.set_radix(radix),
			Self::Structure(_) | Self::String(_) if radix == Radix::Null => Ok(()),
			Self::Structure(_) | Self::String(_) => Err(LogixError::UnsupportedOperation {
				operation: "set radix on a structure or string",
			}),
		}
	}

	/// Array extents, `None` for non-array values.
	pub fn dimensions(&self) -> Option<&Dimensions> {
		match self {
			Self::Array(array) => Some(array.dimensions()),
			_ => None,
		}
	}

	/// On-disk shape this value takes as the root of a tag.
	pub fn shape(&self) -> SerializationShape {
		match self {
			Self::Atomic(_) | Self::Array(_) => SerializationShape::Decorated,
			Self::Structure(structure) => structure.shape(),
			Self::String(_) => SerializationShape::String,
		}
	}

	/// Atomic payload.
	pub fn as_atomic(&self) -> Option<&AtomicValue> {
		match self {
			Self::Atomic(value) => Some(value),
			_ => None,
		}
	}

	/// Array payload.
	pub fn as_array(&self) -> Option<&ArrayValue> {
		match self {
			Self::Array(array) => Some(array),
			_ => None,
		}
	}

	/// Structure payload.
	pub fn as_structure(&self) -> Option<&StructureValue> {
		match self {
			Self::Structure(structure) => Some(structure),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_string(&self) -> Option<&StringValue> {
		match self {
			Self::String(string) => Some(string),
			_ => None,
		}
	}

	/// Whether `other` can take this value's place: same type name, extents and capacity, and
	/// for structures the same member names, order and member types.
	pub fn same_type(&self, other: &LogixValue) -> bool {
		match (self, other) {
			(Self::Atomic(left), Self::Atomic(right)) => left.kind() == right.kind(),
			(Self::Array(left), Self::Array(right)) => {
				left.element_type().eq_ignore_ascii_case(right.element_type())
					&& left.dimensions() == right.dimensions()
					&& left
						.elements()
						.first()
						.zip(right.elements().first())
						.is_none_or(|(left, right)| left.same_type(right))
			}
			(Self::Structure(left), Self::Structure(right)) => {
				left.type_name().eq_ignore_ascii_case(right.type_name())
					&& left.len() == right.len()
					&& left
						.members()
						.zip(right.members())
						.all(|((left_name, left), (right_name, right))| left_name.eq_ignore_ascii_case(right_name) && left.same_type(right))
			}
			(Self::String(left), Self::String(right)) => {
				left.type_name().eq_ignore_ascii_case(right.type_name()) && left.capacity() == right.capacity()
			}
			_ => false,
		}
	}

	/// Borrow a descendant. String members are computed and therefore not reachable here; use
	/// [`LogixValue::resolve`].
	pub fn get(&self, name: &TagName) -> Option<&LogixValue> {
		name.segments().iter().try_fold(self, |current, segment| current.child(segment))
	}

	fn child(&self, segment: &Segment) -> Option<&LogixValue> {
		match (self, segment) {
			(Self::Structure(structure), Segment::Member(name)) => structure.member(name),
			(Self::Array(array), Segment::Index(index)) => array.element(index).ok(),
			_ => None,
		}
	}

	pub(crate) fn get_mut(&mut self, name: &TagName) -> Option<&mut LogixValue> {
		let mut current = self;
		for segment in name.segments() {
			current = match (current, segment) {
				(Self::Structure(structure), Segment::Member(name)) => structure.member_mut(name)?,
				(Self::Array(array), Segment::Index(index)) => array.element_mut(index).ok()?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// Resolve a descendant, reporting the first segment that does not match.
	pub fn resolve(&self, name: &TagName) -> Result<Cow<'_, LogixValue>> {
		let mut current = Cow::Borrowed(self);
		for segment in name.segments() {
			current = match current {
				Cow::Borrowed(value) => value.resolve_child(segment)?,
				Cow::Owned(value) => Cow::Owned(value.resolve_child(segment)?.into_owned()),
			};
		}
		Ok(current)
	}

	fn resolve_child(&self, segment: &Segment) -> Result<Cow<'_, LogixValue>> {
		let unknown = || LogixError::UnknownMember {
			type_name: self.type_label(),
			member: segment.to_string(),
		};
		match (self, segment) {
			(Self::Structure(structure), Segment::Member(name)) => structure.member(name).map(Cow::Borrowed).ok_or_else(unknown),
			(Self::Array(array), Segment::Index(index)) => array.element(index).map(Cow::Borrowed),
			(Self::String(string), Segment::Member(name)) => string.member(name).map(Cow::Owned).ok_or_else(unknown),
			_ => Err(unknown()),
		}
	}

	/// Look up a descendant by name or index. `Ok(None)` when any segment does not match.
	pub fn member<N: ToTagName>(&self, name: N) -> Result<Option<Cow<'_, LogixValue>>> {
		let name = name.to_tag_name()?;
		match self.resolve(&name) {
			Ok(value) => Ok(Some(value)),
			Err(err) if is_miss(&err) => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Like [`LogixValue::member`], returning `None` for malformed names too.
	pub fn try_member<N: ToTagName>(&self, name: N) -> Option<Cow<'_, LogixValue>> {
		self.member(name).ok().flatten()
	}

	/// This value and every descendant, depth-first in declaration order, paired with their
	/// names relative to this value.
	pub fn members(&self) -> Vec<(TagName, &LogixValue)> {
		self.members_where(|_, _| true)
	}

	/// Filtered [`LogixValue::members`], keeping traversal order.
	pub fn members_where<F>(&self, mut predicate: F) -> Vec<(TagName, &LogixValue)>
	where
		F: FnMut(&TagName, &LogixValue) -> bool,
	{
		let mut out = Vec::new();
		collect_members(self, TagName::default(), &mut predicate, &mut out);
		out
	}

	/// Replace the descendant at `name`, returning the previous value.
	///
	/// The empty name replaces the whole value. Otherwise the parent must be a structure (or an
	/// array for a subscript) and the new value must have the same type as the old one.
	pub fn replace(&mut self, name: &TagName, value: LogixValue) -> Result<LogixValue> {
		let Some(parent_name) = name.parent() else {
			return Ok(std::mem::replace(self, value));
		};
		self.resolve(name)?;

		let parent = self.get_mut(&parent_name).ok_or_else(|| LogixError::NotAStructure {
			got: parent_name.to_string(),
		})?;
		match (parent, name.last()) {
			(Self::Structure(structure), Some(Segment::Member(member))) => structure.set_member(member, value),
			(Self::Array(array), Some(Segment::Index(index))) => array.set_element(index, value),
			(parent, _) => Err(LogixError::NotAStructure { got: parent.type_label() }),
		}
	}

	/// Subscript helper for arrays.
	pub fn element(&self, coords: &[usize]) -> Result<&LogixValue> {
		match self {
			Self::Array(array) => array.element(&ArrayIndex::new(coords)?),
			other => Err(LogixError::TypeMismatch {
				expected: "array".to_owned(),
				got: other.type_label(),
			}),
		}
	}
}

fn is_miss(err: &LogixError) -> bool {
	err.kind() == ErrorKind::UnknownMember || matches!(err, LogixError::IndexOutOfRange { .. })
}

fn collect_members<'a, F>(value: &'a LogixValue, name: TagName, predicate: &mut F, out: &mut Vec<(TagName, &'a LogixValue)>)
where
	F: FnMut(&TagName, &LogixValue) -> bool,
{
	if predicate(&name, value) {
		out.push((name.clone(), value));
	}

	match value {
		LogixValue::Structure(structure) => {
			for (member, child) in structure.members() {
				collect_members(child, name.with(Segment::Member(member.to_owned())), predicate, out);
			}
		}
		LogixValue::Array(array) => {
			for (index, child) in array.indexed() {
				collect_members(child, name.with(Segment::Index(index)), predicate, out);
			}
		}
		LogixValue::Atomic(_) | LogixValue::String(_) => {}
	}
}

impl From<AtomicValue> for LogixValue {
	fn from(value: AtomicValue) -> Self {
		Self::Atomic(value)
	}
}

impl From<ArrayValue> for LogixValue {
	fn from(value: ArrayValue) -> Self {
		Self::Array(value)
	}
}

impl From<StructureValue> for LogixValue {
	fn from(value: StructureValue) -> Self {
		Self::Structure(value)
	}
}

impl From<StringValue> for LogixValue {
	fn from(value: StringValue) -> Self {
		Self::String(value)
	}
}
