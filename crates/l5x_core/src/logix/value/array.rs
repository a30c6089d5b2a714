use std::fmt;

use crate::logix::{ArrayIndex, LogixError, LogixValue, Radix, Result};

/// Array extents: 1 to 3 positive lengths, outermost first, laid out row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimensions {
	extents: Vec<usize>,
}

impl Dimensions {
	/// Validate and build extents.
	pub fn new(extents: &[usize]) -> Result<Self> {
		let inconsistent = |reason: String| LogixError::InconsistentShape {
			type_name: "array".to_owned(),
			reason,
		};
		if extents.is_empty() || extents.len() > 3 {
			return Err(inconsistent(format!("{} dimensions, expected 1 to 3", extents.len())));
		}
		if extents.contains(&0) {
			return Err(inconsistent(format!("zero extent in {extents:?}")));
		}
		extents
			.iter()
			.try_fold(1_usize, |total, extent| total.checked_mul(*extent))
			.ok_or_else(|| inconsistent(format!("element count of {extents:?} overflows")))?;

		Ok(Self { extents: extents.to_vec() })
	}

	/// Parse comma or space separated extents (`"2,3"` or `"2 3"`).
	pub fn parse(text: &str) -> Result<Self> {
		let extents = text
			.split(|ch: char| ch == ',' || ch.is_whitespace())
			.filter(|part| !part.is_empty())
			.map(|part| part.parse::<usize>().map_err(|_| LogixError::malformed("Dimensions", format!("invalid extent {part:?}"))))
			.collect::<Result<Vec<_>>>()?;
		Self::new(&extents)
	}

	/// Extents, outermost first.
	pub fn extents(&self) -> &[usize] {
		&self.extents
	}

	/// Number of dimensions.
	pub fn rank(&self) -> usize {
		self.extents.len()
	}

	/// Total element count.
	pub fn len(&self) -> usize {
		self.extents.iter().product()
	}

	/// Always `false`; extents are positive.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Row-major offset of `index`.
	pub fn offset(&self, index: &ArrayIndex) -> Result<usize> {
		let coords = index.coords();
		if coords.len() != self.extents.len() || coords.iter().zip(&self.extents).any(|(coord, extent)| coord >= extent) {
			return Err(LogixError::IndexOutOfRange {
				index: index.to_string(),
				dimensions: self.to_string(),
			});
		}
		Ok(coords.iter().zip(&self.extents).fold(0, |offset, (coord, extent)| offset * extent + coord))
	}

	/// Subscript of the element at row-major `offset`.
	pub fn index_at(&self, offset: usize) -> Option<ArrayIndex> {
		if offset >= self.len() {
			return None;
		}
		let mut coords = vec![0; self.extents.len()];
		let mut rest = offset;
		for (slot, extent) in coords.iter_mut().zip(&self.extents).rev() {
			*slot = rest % extent;
			rest /= extent;
		}
		ArrayIndex::new(&coords).ok()
	}

	/// Space separated form used on tag containers.
	pub fn to_spaced(&self) -> String {
		let parts: Vec<String> = self.extents.iter().map(usize::to_string).collect();
		parts.join(" ")
	}
}

impl fmt::Display for Dimensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.extents.iter().map(usize::to_string).collect();
		f.write_str(&parts.join(","))
	}
}

/// Homogeneous, fixed-dimension array. Nested arrays are not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue {
	element_type: String,
	dimensions: Dimensions,
	elements: Vec<LogixValue>,
	radix: Radix,
}

impl ArrayValue {
	/// Array of zero-valued defaults of `element_type`.
	pub fn new(element_type: &str, dimensions: Dimensions) -> Result<Self> {
		let template = LogixValue::default_for_type(element_type)?;
		if let LogixValue::Array(_) = template {
			return Err(LogixError::TypeMismatch {
				expected: "non-array element".to_owned(),
				got: template.type_label(),
			});
		}

		let radix = template.radix();
		Ok(Self {
			element_type: template.type_name().to_owned(),
			elements: vec![template; dimensions.len()],
			dimensions,
			radix,
		})
	}

	/// Array over existing elements. All elements must share `element_type` and the layout of
	/// the first element, and the count must match `dimensions`. Atomic elements take the radix
	/// of the first element.
	pub fn from_elements(element_type: &str, dimensions: Dimensions, mut elements: Vec<LogixValue>) -> Result<Self> {
		if elements.len() != dimensions.len() {
			return Err(LogixError::InconsistentShape {
				type_name: element_type.to_owned(),
				reason: format!("{} elements for dimensions {dimensions}", elements.len()),
			});
		}
		let first = elements.first();
		for element in &elements {
			if matches!(element, LogixValue::Array(_))
				|| !element.type_name().eq_ignore_ascii_case(element_type)
				|| first.is_some_and(|first| !first.same_type(element))
			{
				return Err(LogixError::TypeMismatch {
					expected: element_type.to_owned(),
					got: element.type_label(),
				});
			}
		}

		let radix = elements.first().map(LogixValue::radix).unwrap_or_default();
		if radix != Radix::Null {
			for element in &mut elements {
				element.set_radix(radix)?;
			}
		}
		let element_type = elements.first().map_or(element_type, LogixValue::type_name).to_owned();

		Ok(Self {
			element_type,
			dimensions,
			elements,
			radix,
		})
	}

	/// Element type name.
	pub fn element_type(&self) -> &str {
		&self.element_type
	}

	/// Extents.
	pub fn dimensions(&self) -> &Dimensions {
		&self.dimensions
	}

	/// Radix shared by atomic elements; [`Radix::Null`] otherwise.
	pub fn radix(&self) -> Radix {
		self.radix
	}

	/// Change the radix of every atomic element.
	pub fn set_radix(&mut self, radix: Radix) -> Result<()> {
		if self.radix == Radix::Null {
			if radix == Radix::Null {
				return Ok(());
			}
			return Err(LogixError::UnsupportedOperation {
				operation: "set radix on an array of structures",
			});
		}

		let mut updated = self.elements.clone();
		for element in &mut updated {
			element.set_radix(radix)?;
		}
		self.elements = updated;
		self.radix = radix;
		Ok(())
	}

	/// Copy with a different radix.
	pub fn with_radix(mut self, radix: Radix) -> Result<Self> {
		self.set_radix(radix)?;
		Ok(self)
	}

	/// Element count.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Always `false`; extents are positive.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Elements in row-major order.
	pub fn elements(&self) -> &[LogixValue] {
		&self.elements
	}

	/// Element at `index`.
	pub fn element(&self, index: &ArrayIndex) -> Result<&LogixValue> {
		let offset = self.dimensions.offset(index)?;
		self.elements.get(offset).ok_or_else(|| self.out_of_range(index))
	}

	pub(super) fn element_mut(&mut self, index: &ArrayIndex) -> Result<&mut LogixValue> {
		let offset = self.dimensions.offset(index)?;
		let dimensions = self.dimensions.to_string();
		self.elements.get_mut(offset).ok_or_else(|| LogixError::IndexOutOfRange {
			index: index.to_string(),
			dimensions,
		})
	}

	/// Replace the element at `index`, returning the previous one. Atomic elements adopt the
	/// array radix.
	pub fn set_element(&mut self, index: &ArrayIndex, mut value: LogixValue) -> Result<LogixValue> {
		let radix = self.radix;
		let slot = self.element_mut(index)?;
		if !slot.same_type(&value) {
			return Err(LogixError::TypeMismatch {
				expected: slot.type_label(),
				got: value.type_label(),
			});
		}
		if radix != Radix::Null {
			value.set_radix(radix)?;
		}
		Ok(std::mem::replace(slot, value))
	}

	/// Elements paired with their subscripts, in row-major order.
	pub fn indexed(&self) -> impl Iterator<Item = (ArrayIndex, &LogixValue)> {
		self.elements
			.iter()
			.enumerate()
			.filter_map(|(offset, element)| self.dimensions.index_at(offset).map(|index| (index, element)))
	}

	fn out_of_range(&self, index: &ArrayIndex) -> LogixError {
		LogixError::IndexOutOfRange {
			index: index.to_string(),
			dimensions: self.dimensions.to_string(),
		}
	}
}
