use std::fmt;

use tracing::debug;

use crate::logix::data::apply_companions;
use crate::logix::{
	Dimensions, Document, LogixError, LogixValue, NodeId, NodeText, Radix, Result, TagName, ToTagName, read_data, write_data,
};

/// Handle addressing a tag, or a member of one, inside a [`Document`].
///
/// A handle is only a tag container id plus a full name; it holds no data. Every read
/// deserializes the root value and every write re-serializes it, so handles stay valid across
/// writes made through other handles to the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
	node: NodeId,
	name: TagName,
}

impl Tag {
	/// Full name, root tag first.
	pub fn name(&self) -> &TagName {
		&self.name
	}

	/// Tag container element.
	pub fn node(&self) -> NodeId {
		self.node
	}

	/// Name relative to the root tag; empty for the root itself.
	pub fn path(&self) -> TagName {
		self.name.members()
	}

	/// Whether this handle addresses a whole tag.
	pub fn is_root(&self) -> bool {
		self.name.depth() == 1
	}

	/// Handle for the owning root tag.
	pub fn root(&self) -> Tag {
		Tag {
			node: self.node,
			name: TagName::from_segments(self.name.segments()[..1].to_vec()),
		}
	}

	/// Handle for the enclosing member, `None` for a root tag.
	pub fn parent(&self) -> Option<Tag> {
		if self.is_root() {
			return None;
		}
		self.name.parent().map(|name| Tag { node: self.node, name })
	}

	fn root_value(&self, doc: &Document) -> Result<LogixValue> {
		let data_type = doc.attribute(self.node, "DataType").ok_or(LogixError::MissingAttribute {
			element: "Tag".to_owned(),
			attribute: "DataType",
		})?;
		let data = data_node(doc, self.node).ok_or_else(|| LogixError::malformed("Tag", format!("{} has no readable Data element", self.name)))?;
		read_data(doc, data, data_type)
	}

	/// Current value.
	pub fn value(&self, doc: &Document) -> Result<LogixValue> {
		let root = self.root_value(doc)?;
		Ok(root.resolve(&self.path())?.into_owned())
	}

	/// Type name of the current value.
	pub fn data_type(&self, doc: &Document) -> Result<String> {
		Ok(self.value(doc)?.type_name().to_owned())
	}

	/// Radix of the current value.
	pub fn radix(&self, doc: &Document) -> Result<Radix> {
		Ok(self.value(doc)?.radix())
	}

	/// Extents of the current value when it is an array.
	pub fn dimensions(&self, doc: &Document) -> Result<Option<Dimensions>> {
		Ok(self.value(doc)?.dimensions().cloned())
	}

	/// Handle for a descendant, `Ok(None)` when it does not exist.
	pub fn member<N: ToTagName>(&self, doc: &Document, name: N) -> Result<Option<Tag>> {
		let relative = name.to_tag_name()?;
		let root = self.root_value(doc)?;
		let full = self.path().join(&relative);
		Ok(root.member(&full)?.map(|_| Tag {
			node: self.node,
			name: self.name.join(&relative),
		}))
	}

	/// Handle for a descendant that must exist.
	pub fn resolve<N: ToTagName>(&self, doc: &Document, name: N) -> Result<Tag> {
		let relative = name.to_tag_name()?;
		let root = self.root_value(doc)?;
		root.resolve(&self.path().join(&relative))?;
		Ok(Tag {
			node: self.node,
			name: self.name.join(&relative),
		})
	}

	/// This handle and every descendant, depth-first in declaration order.
	pub fn members(&self, doc: &Document) -> Result<Vec<Tag>> {
		self.members_where(doc, |_, _| true)
	}

	/// Filtered [`Tag::members`].
	pub fn members_where<F>(&self, doc: &Document, mut predicate: F) -> Result<Vec<Tag>>
	where
		F: FnMut(&Tag, &LogixValue) -> bool,
	{
		let root = self.root_value(doc)?;
		let value = root.resolve(&self.path())?;
		Ok(value
			.members()
			.into_iter()
			.filter_map(|(relative, member)| {
				let tag = Tag {
					node: self.node,
					name: self.name.join(&relative),
				};
				predicate(&tag, member).then_some(tag)
			})
			.collect())
	}

	/// Replace the addressed value and re-serialize the root tag.
	///
	/// A root tag accepts any value and its `DataType`/`Dimensions`/`Radix` follow it. A
	/// member must keep its type, including the member layout of a structure. The parent of
	/// the addressed value must be a structure, except that an array element (a name ending in
	/// a subscript such as `Hist[1]`) may be replaced through its array. On error the document
	/// is left untouched.
	pub fn set_value(&self, doc: &mut Document, value: LogixValue) -> Result<()> {
		let mut root = self.root_value(doc)?;
		root.replace(&self.path(), value)?;
		write_root(doc, self.node, &root)?;
		debug!(tag = %self.name, data_type = root.type_name(), "rewrote tag data");
		Ok(())
	}

	/// Replace a descendant and re-serialize the root tag.
	pub fn set_member<N: ToTagName>(&self, doc: &mut Document, name: N, value: LogixValue) -> Result<()> {
		self.resolve(doc, name)?.set_value(doc, value)
	}

	/// Assign from text: any radix for atomics (the current radix is kept), a quoted literal or
	/// plain text for strings.
	pub fn set_text(&self, doc: &mut Document, text: &str) -> Result<()> {
		let value = match self.value(doc)? {
			LogixValue::Atomic(atomic) => LogixValue::Atomic(Radix::parse_any_as(text, atomic.kind())?.with_radix(atomic.radix())?),
			LogixValue::String(mut string) => {
				if text.starts_with('\'') {
					string.set_quoted(text)?;
				} else {
					string.set_data(text.as_bytes())?;
				}
				LogixValue::String(string)
			}
			other => {
				return Err(LogixError::TypeMismatch {
					expected: "atomic or string".to_owned(),
					got: other.type_label(),
				});
			}
		};
		self.set_value(doc, value)
	}

	/// Text of the `Description` child of the tag container.
	pub fn description(&self, doc: &Document) -> Option<String> {
		let node = doc.child_named(self.node, "Description")?;
		doc.text(node).map(|text| text.as_str().to_owned())
	}

	/// Set or replace the `Description` child, kept ahead of `Data`.
	pub fn set_description(&self, doc: &mut Document, text: &str) -> Result<()> {
		let node = match doc.child_named(self.node, "Description") {
			Some(node) => node,
			None => {
				let node = doc.create_element("Description");
				doc.insert_child(self.node, 0, node)?;
				node
			}
		};
		doc.set_text(node, Some(NodeText::CData(text.to_owned())))
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name)
	}
}

fn data_node(doc: &Document, tag: NodeId) -> Option<NodeId> {
	doc.children_named(tag, "Data").find(|data| doc.attribute(*data, "Format") != Some("L5K"))
}

/// Serialize `value` into a fresh `<Data>` node and splice it over the current one. Alternate
/// `L5K` data is dropped since it would no longer agree.
fn write_root(doc: &mut Document, tag: NodeId, value: &LogixValue) -> Result<()> {
	let data = write_data(doc, value)?;
	let spliced = match data_node(doc, tag) {
		Some(old) => doc.replace_child(tag, old, data),
		None => doc.append_child(tag, data),
	};
	if let Err(err) = spliced {
		doc.remove(data)?;
		return Err(err);
	}

	let stale: Vec<NodeId> = doc.children_named(tag, "Data").filter(|id| *id != data).collect();
	for node in stale {
		doc.remove(node)?;
	}
	apply_companions(doc, tag, value)
}

impl Document {
	/// Create a `<Tag>` container for `value` under the root.
	pub fn add_tag(&mut self, name: &str, value: LogixValue) -> Result<Tag> {
		let tag_name = TagName::parse(name)?;
		if tag_name.depth() != 1 || tag_name.root().is_none() {
			return Err(LogixError::InvalidTagName { name: name.to_owned() });
		}
		if self.find_tag(name).is_some() {
			return Err(LogixError::DuplicateTag { name: name.to_owned() });
		}

		let node = self.create_element("Tag");
		self.set_attribute(node, "Name", name)?;
		self.set_attribute(node, "TagType", "Base")?;
		if let Err(err) = write_root(self, node, &value) {
			self.remove(node)?;
			return Err(err);
		}
		self.append_child(self.root(), node)?;

		debug!(tag = name, data_type = value.type_name(), "created tag");
		Ok(Tag { node, name: tag_name })
	}

	/// Root tag by name, ignoring case.
	pub fn find_tag(&self, name: &str) -> Option<Tag> {
		self.tags().into_iter().find(|tag| tag.name.root().is_some_and(|root| root.eq_ignore_ascii_case(name)))
	}

	/// Root tag by name, ignoring case; an error when absent.
	pub fn tag(&self, name: &str) -> Result<Tag> {
		self.find_tag(name).ok_or_else(|| LogixError::TagNotFound { name: name.to_owned() })
	}

	/// Root tags in document order. Containers with an unparsable name are skipped.
	pub fn tags(&self) -> Vec<Tag> {
		self.children_named(self.root(), "Tag")
			.filter_map(|node| {
				let name = TagName::parse(self.attribute(node, "Name")?).ok()?;
				Some(Tag { node, name })
			})
			.collect()
	}

	/// Handle for a full path such as `Timer1.PRE`.
	pub fn resolve_tag<N: ToTagName>(&self, path: N) -> Result<Tag> {
		let path = path.to_tag_name()?;
		let root = path.root().ok_or_else(|| LogixError::InvalidTagName { name: path.to_string() })?;
		let tag = self.tag(root)?;
		if path.depth() == 1 {
			return Ok(tag);
		}
		tag.resolve(self, path.members())
	}

	/// Remove a root tag container.
	pub fn remove_tag(&mut self, name: &str) -> Result<()> {
		let tag = self.tag(name)?;
		self.remove(tag.node)
	}
}

#[cfg(test)]
mod tests;
