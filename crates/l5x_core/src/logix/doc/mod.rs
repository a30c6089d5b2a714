mod render;

use crate::logix::{DataOptions, LogixError, Result};

/// Index of a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// Arena slot index.
	pub fn index(self) -> usize {
		self.0
	}
}

/// Character content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeText {
	/// Escaped character data.
	Plain(String),
	/// Verbatim `CDATA` section.
	CData(String),
}

impl NodeText {
	/// Unescaped content.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Plain(text) | Self::CData(text) => text,
		}
	}
}

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	name: String,
	attributes: Vec<(String, String)>,
	children: Vec<NodeId>,
	text: Option<NodeText>,
	parent: Option<NodeId>,
}

impl Node {
	fn element(name: &str) -> Self {
		Self {
			name: name.to_owned(),
			attributes: Vec::new(),
			children: Vec::new(),
			text: None,
			parent: None,
		}
	}

	/// Element name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Attributes in insertion order.
	pub fn attributes(&self) -> &[(String, String)] {
		&self.attributes
	}

	/// Child elements in order.
	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	/// Character content.
	pub fn text(&self) -> Option<&NodeText> {
		self.text.as_ref()
	}

	/// Enclosing element, `None` for the root and detached nodes.
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}
}

/// Arena-backed element tree holding tag containers under a `Tags` root.
///
/// Nodes are addressed by copyable [`NodeId`]s. Removed subtrees free their slots for reuse,
/// so an id must not be used after the node it names was removed.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<Option<Node>>,
	free: Vec<usize>,
	root: NodeId,
	options: DataOptions,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Empty document with default [`DataOptions`].
	pub fn new() -> Self {
		Self::with_options(DataOptions::default())
	}

	/// Empty document using `options` for every data read and write.
	pub fn with_options(options: DataOptions) -> Self {
		Self {
			nodes: vec![Some(Node::element("Tags"))],
			free: Vec::new(),
			root: NodeId(0),
			options,
		}
	}

	/// Limits applied to data nodes.
	pub fn options(&self) -> &DataOptions {
		&self.options
	}

	/// Declare a string type so its data can be read back with the right capacity.
	///
	/// Writing a value declares every string type it holds, so this is only needed for data
	/// that was not written through this document.
	pub fn declare_string_type(&mut self, type_name: &str, capacity: usize) -> Result<()> {
		self.options.string_types.declare(type_name, capacity)
	}

	pub(crate) fn options_mut(&mut self) -> &mut DataOptions {
		&mut self.options
	}

	/// The `Tags` root element.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of live nodes, attached or not.
	pub fn node_count(&self) -> usize {
		self.nodes.len() - self.free.len()
	}

	/// Node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0).and_then(Option::as_ref)
	}

	fn get(&self, id: NodeId) -> Result<&Node> {
		self.node(id).ok_or(LogixError::MissingNode { id: id.0 })
	}

	fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		self.nodes.get_mut(id.0).and_then(Option::as_mut).ok_or(LogixError::MissingNode { id: id.0 })
	}

	/// Create a detached element.
	pub fn create_element(&mut self, name: &str) -> NodeId {
		let node = Some(Node::element(name));
		match self.free.pop() {
			Some(slot) => {
				self.nodes[slot] = node;
				NodeId(slot)
			}
			None => {
				self.nodes.push(node);
				NodeId(self.nodes.len() - 1)
			}
		}
	}

	/// Append a detached `child` as the last child of `parent`.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		let position = self.get(parent)?.children.len();
		self.insert_child(parent, position, child)
	}

	/// Insert a detached `child` at `position` among the children of `parent`.
	pub fn insert_child(&mut self, parent: NodeId, position: usize, child: NodeId) -> Result<()> {
		self.check_detached(child)?;
		if self.is_ancestor(child, parent) {
			return Err(LogixError::UnsupportedOperation {
				operation: "attach a node beneath itself",
			});
		}

		let node = self.get_mut(parent)?;
		let position = position.min(node.children.len());
		node.children.insert(position, child);
		self.get_mut(child)?.parent = Some(parent);
		Ok(())
	}

	fn check_detached(&self, id: NodeId) -> Result<()> {
		let node = self.get(id)?;
		if node.parent.is_some() || id == self.root {
			return Err(LogixError::NodeAttached { id: id.0 });
		}
		Ok(())
	}

	fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
		loop {
			if id == ancestor {
				return true;
			}
			match self.node(id).and_then(Node::parent) {
				Some(parent) => id = parent,
				None => return false,
			}
		}
	}

	/// Element name.
	pub fn name(&self, id: NodeId) -> Option<&str> {
		self.node(id).map(Node::name)
	}

	/// Enclosing element.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.node(id).and_then(Node::parent)
	}

	/// Child elements, empty for unknown ids.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.node(id).map(Node::children).unwrap_or_default()
	}

	/// First child element named `name`.
	pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
		self.children_named(id, name).next()
	}

	/// Child elements named `name`, in order.
	pub fn children_named<'a>(&'a self, id: NodeId, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
		self.children(id).iter().copied().filter(move |child| self.name(*child) == Some(name))
	}

	/// Attribute value.
	pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		self.node(id)?
			.attributes
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Attributes in order, empty for unknown ids.
	pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
		self.node(id).map(Node::attributes).unwrap_or_default()
	}

	/// Position of an attribute among the attributes of `id`.
	pub fn attribute_position(&self, id: NodeId, name: &str) -> Option<usize> {
		self.node(id)?.attributes.iter().position(|(key, _)| key == name)
	}

	/// Set an attribute, keeping its position when it already exists.
	pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
		let value = value.into();
		let node = self.get_mut(id)?;
		match node.attributes.iter_mut().find(|(key, _)| key == name) {
			Some((_, slot)) => *slot = value,
			None => node.attributes.push((name.to_owned(), value)),
		}
		Ok(())
	}

	/// Set an attribute at `position`, moving it there when it already exists.
	pub fn insert_attribute(&mut self, id: NodeId, position: usize, name: &str, value: impl Into<String>) -> Result<()> {
		let value = value.into();
		let node = self.get_mut(id)?;
		node.attributes.retain(|(key, _)| key != name);
		let position = position.min(node.attributes.len());
		node.attributes.insert(position, (name.to_owned(), value));
		Ok(())
	}

	/// Remove an attribute, returning its value.
	pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>> {
		let node = self.get_mut(id)?;
		let Some(position) = node.attributes.iter().position(|(key, _)| key == name) else {
			return Ok(None);
		};
		Ok(Some(node.attributes.remove(position).1))
	}

	/// Character content.
	pub fn text(&self, id: NodeId) -> Option<&NodeText> {
		self.node(id).and_then(Node::text)
	}

	/// Replace the character content.
	pub fn set_text(&mut self, id: NodeId, text: Option<NodeText>) -> Result<()> {
		self.get_mut(id)?.text = text;
		Ok(())
	}

	/// Splice detached `new` into the position of `old` under `parent`, then remove `old` and
	/// its subtree.
	pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
		self.check_detached(new)?;
		let position = self
			.get(parent)?
			.children
			.iter()
			.position(|child| *child == old)
			.ok_or(LogixError::MissingNode { id: old.0 })?;
		if self.is_ancestor(new, parent) {
			return Err(LogixError::UnsupportedOperation {
				operation: "attach a node beneath itself",
			});
		}

		self.get_mut(parent)?.children[position] = new;
		self.get_mut(new)?.parent = Some(parent);
		self.get_mut(old)?.parent = None;
		self.remove(old)
	}

	/// Detach `id` from its parent, keeping the subtree alive.
	pub fn detach(&mut self, id: NodeId) -> Result<()> {
		let Some(parent) = self.get(id)?.parent else {
			return Ok(());
		};
		self.get_mut(parent)?.children.retain(|child| *child != id);
		self.get_mut(id)?.parent = None;
		Ok(())
	}

	/// Detach `id` and free it together with its descendants.
	pub fn remove(&mut self, id: NodeId) -> Result<()> {
		if id == self.root {
			return Err(LogixError::UnsupportedOperation {
				operation: "remove the document root",
			});
		}
		self.detach(id)?;

		let mut pending = vec![id];
		while let Some(next) = pending.pop() {
			if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
				pending.extend(node.children);
				self.free.push(next.0);
			}
		}
		Ok(())
	}

	/// Render `id` and its subtree as compact XML.
	pub fn render(&self, id: NodeId) -> Result<String> {
		self.get(id)?;
		let mut out = String::new();
		render::render_node(self, id, &mut out);
		Ok(out)
	}
}

#[cfg(test)]
mod tests;
