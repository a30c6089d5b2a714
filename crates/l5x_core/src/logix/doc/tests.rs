use super::{Document, NodeText};
use crate::logix::ErrorKind;

#[test]
fn renders_attributes_in_order_with_escaping() {
	let mut doc = Document::new();
	let node = doc.create_element("Tag");
	doc.set_attribute(node, "Name", "A&B").expect("set name");
	doc.set_attribute(node, "Note", "say \"hi\" <now>").expect("set note");
	doc.append_child(doc.root(), node).expect("append");

	assert_eq!(
		doc.render(doc.root()).expect("render"),
		r#"<Tags><Tag Name="A&amp;B" Note="say &quot;hi&quot; &lt;now&gt;"/></Tags>"#
	);
}

#[test]
fn cdata_is_written_verbatim() {
	let mut doc = Document::new();
	let node = doc.create_element("Data");
	doc.set_text(node, Some(NodeText::CData("'a<b'".to_owned()))).expect("set text");
	assert_eq!(doc.render(node).expect("render"), "<Data><![CDATA['a<b']]></Data>");

	doc.set_text(node, Some(NodeText::Plain("a<b".to_owned()))).expect("set text");
	assert_eq!(doc.render(node).expect("render"), "<Data>a&lt;b</Data>");
}

#[test]
fn set_attribute_keeps_position_and_insert_moves_it() {
	let mut doc = Document::new();
	let node = doc.create_element("Tag");
	for key in ["A", "B", "C"] {
		doc.set_attribute(node, key, "1").expect("set");
	}
	doc.set_attribute(node, "A", "2").expect("overwrite");
	assert_eq!(doc.attribute_position(node, "A"), Some(0));
	assert_eq!(doc.attribute(node, "A"), Some("2"));

	doc.insert_attribute(node, 2, "A", "3").expect("move");
	let keys: Vec<&str> = doc.attributes(node).iter().map(|(key, _)| key.as_str()).collect();
	assert_eq!(keys, vec!["B", "C", "A"]);

	assert_eq!(doc.remove_attribute(node, "B").expect("remove"), Some("1".to_owned()));
	assert_eq!(doc.remove_attribute(node, "B").expect("remove again"), None);
}

#[test]
fn replace_child_splices_in_place_and_frees_the_old_subtree() {
	let mut doc = Document::new();
	let parent = doc.create_element("Tag");
	doc.append_child(doc.root(), parent).expect("append parent");
	let first = doc.create_element("Description");
	let old = doc.create_element("Data");
	let last = doc.create_element("Comments");
	for child in [first, old, last] {
		doc.append_child(parent, child).expect("append child");
	}
	let grandchild = doc.create_element("DataValue");
	doc.append_child(old, grandchild).expect("append grandchild");

	let before = doc.node_count();
	let new = doc.create_element("Data");
	doc.replace_child(parent, old, new).expect("splice");

	assert_eq!(doc.children(parent), [first, new, last]);
	assert_eq!(doc.parent(new), Some(parent));
	assert!(doc.node(old).is_none());
	assert!(doc.node(grandchild).is_none());
	assert_eq!(doc.node_count(), before - 1);

	let reused = doc.create_element("Reused");
	assert!(reused == old || reused == grandchild);
}

#[test]
fn attaching_twice_or_under_itself_fails() {
	let mut doc = Document::new();
	let parent = doc.create_element("A");
	let child = doc.create_element("B");
	doc.append_child(parent, child).expect("first append");

	let err = doc.append_child(parent, child).expect_err("already attached");
	assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

	let err = doc.append_child(child, parent).expect_err("cycle");
	assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

	assert!(doc.remove(doc.root()).is_err());
}

#[test]
fn detach_keeps_the_subtree() {
	let mut doc = Document::new();
	let parent = doc.create_element("A");
	let child = doc.create_element("B");
	doc.append_child(parent, child).expect("append");
	doc.detach(child).expect("detach");
	assert!(doc.children(parent).is_empty());
	assert_eq!(doc.name(child), Some("B"));
	assert_eq!(doc.child_named(parent, "B"), None);
}
