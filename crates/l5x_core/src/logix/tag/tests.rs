use std::sync::Once;

use crate::logix::{
	AtomicValue, Document, ErrorKind, LogixValue, NodeId, PredefinedType, Radix, StringValue, StructureValue, TagName, write_data,
};

static TRACING: Once = Once::new();

fn init_tracing() {
	TRACING.call_once(|| {
		let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
	});
}

fn motor() -> LogixValue {
	let speed = StructureValue::new(
		"SPEED",
		vec![
			("Member".to_owned(), AtomicValue::dint(7).into()),
			("Limit".to_owned(), AtomicValue::real(1.5).into()),
		],
	)
	.expect("inner structure builds");

	StructureValue::new(
		"MOTOR",
		vec![
			("M".to_owned(), speed.into()),
			("Run".to_owned(), AtomicValue::bool(true).into()),
			("Hist".to_owned(), LogixValue::array("INT", &[3]).expect("array builds")),
			("Label".to_owned(), StringValue::standard("pump").expect("string builds").into()),
		],
	)
	.expect("outer structure builds")
	.into()
}

fn fixture() -> Document {
	init_tracing();
	let mut doc = Document::new();
	doc.add_tag("Counter1", AtomicValue::dint(10).into()).expect("add Counter1");
	doc.add_tag("Motor", motor()).expect("add Motor");
	doc.add_tag("Timer1", PredefinedType::Timer.default_value().expect("timer")).expect("add Timer1");
	doc
}

fn structure_node(doc: &Document, tag: NodeId) -> NodeId {
	let data = doc.child_named(tag, "Data").expect("data node");
	doc.child_named(data, "Structure").expect("structure node")
}

fn member_renders(doc: &Document, tag: NodeId) -> Vec<String> {
	let structure = structure_node(doc, tag);
	doc.children(structure).iter().map(|node| doc.render(*node).expect("render")).collect()
}

#[test]
fn add_tag_writes_container_and_companions() {
	let doc = fixture();
	let tag = doc.tag("motor").expect("lookup ignores case");
	let keys: Vec<&str> = doc.attributes(tag.node()).iter().map(|(key, _)| key.as_str()).collect();
	assert_eq!(keys, ["Name", "TagType", "DataType"]);
	assert_eq!(doc.attribute(tag.node(), "DataType"), Some("MOTOR"));

	let counter = doc.tag("Counter1").expect("counter");
	assert_eq!(doc.attribute(counter.node(), "Radix"), Some("Decimal"));
	assert_eq!(
		doc.render(counter.node()).expect("render"),
		concat!(
			r#"<Tag Name="Counter1" TagType="Base" DataType="DINT" Radix="Decimal">"#,
			r#"<Data Format="Decorated"><DataValue DataType="DINT" Radix="Decimal" Value="10"/></Data>"#,
			"</Tag>"
		)
	);

	let names: Vec<String> = doc.tags().iter().map(|tag| tag.name().to_string()).collect();
	assert_eq!(names, ["Counter1", "Motor", "Timer1"]);
}

#[test]
fn duplicate_and_invalid_names_are_rejected() {
	let mut doc = fixture();
	let before = doc.render(doc.root()).expect("render");

	let err = doc.add_tag("COUNTER1", AtomicValue::dint(1).into()).expect_err("duplicate");
	assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
	let err = doc.add_tag("Motor.M", AtomicValue::dint(1).into()).expect_err("member path");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);

	assert_eq!(doc.render(doc.root()).expect("render"), before);
}

#[test]
fn handles_address_members() {
	let doc = fixture();
	let limit = doc.resolve_tag("Motor.M.Limit").expect("resolve");
	assert_eq!(limit.name().to_string(), "Motor.M.Limit");
	assert_eq!(limit.path().to_string(), "M.Limit");
	assert!(!limit.is_root());
	assert_eq!(limit.data_type(&doc).expect("type"), "REAL");
	assert_eq!(limit.radix(&doc).expect("radix"), Radix::Float);

	let parent = limit.parent().expect("member has a parent");
	assert_eq!(parent.name().to_string(), "Motor.M");
	assert_eq!(parent.parent().expect("grandparent"), limit.root());
	assert!(limit.root().parent().is_none());

	let motor = doc.tag("Motor").expect("motor");
	assert!(motor.member(&doc, "Missing").expect("lookup").is_none());
	let hist = motor.member(&doc, "Hist").expect("lookup").expect("present");
	assert_eq!(hist.dimensions(&doc).expect("dims").expect("array").extents(), [3]);
	assert_eq!(
		hist.resolve(&doc, "[2]").expect("element").value(&doc).expect("value"),
		LogixValue::Atomic(AtomicValue::int(0))
	);

	let err = doc.resolve_tag("Motor.Hist[3]").expect_err("out of range");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);
	let err = doc.resolve_tag("Nope.A").expect_err("unknown tag");
	assert_eq!(err.kind(), ErrorKind::UnknownMember);
}

#[test]
fn members_walk_depth_first() {
	let doc = fixture();
	let motor = doc.tag("Motor").expect("motor");
	let names: Vec<String> = motor.members(&doc).expect("members").iter().map(|tag| tag.name().to_string()).collect();
	assert_eq!(
		names,
		[
			"Motor",
			"Motor.M",
			"Motor.M.Member",
			"Motor.M.Limit",
			"Motor.Run",
			"Motor.Hist",
			"Motor.Hist[0]",
			"Motor.Hist[1]",
			"Motor.Hist[2]",
			"Motor.Label",
		]
	);

	let atomics = motor
		.members_where(&doc, |_, value| value.as_atomic().is_some())
		.expect("filter");
	assert_eq!(atomics.len(), 6);
}

#[test]
fn member_write_leaves_siblings_byte_identical() {
	let mut doc = fixture();
	let motor = doc.tag("Motor").expect("motor");
	let before = member_renders(&doc, motor.node());
	let counter_before = doc.render(doc.tag("Counter1").expect("counter").node()).expect("render");

	let element = doc.resolve_tag("Motor.Hist[1]").expect("element");
	element.set_value(&mut doc, AtomicValue::int(5).into()).expect("write element");

	let after = member_renders(&doc, motor.node());
	assert_eq!(after.len(), before.len());
	for (position, (old, new)) in before.iter().zip(&after).enumerate() {
		if position == 2 {
			assert_ne!(old, new);
		} else {
			assert_eq!(old, new, "member {position} changed");
		}
	}
	assert_eq!(doc.render(doc.tag("Counter1").expect("counter").node()).expect("render"), counter_before);
	assert_eq!(element.value(&doc).expect("read back"), LogixValue::Atomic(AtomicValue::int(5)));
}

#[test]
fn nested_member_write_leaves_the_rest_byte_identical() {
	let mut doc = fixture();
	let motor = doc.tag("Motor").expect("motor");
	let members_before = member_renders(&doc, motor.node());
	let inner = doc.children(structure_node(&doc, motor.node()))[0];
	let inner_before: Vec<String> = doc.children(inner).iter().map(|node| doc.render(*node).expect("render")).collect();
	let timer_before = doc.render(doc.tag("Timer1").expect("timer").node()).expect("render");

	doc.resolve_tag("Motor.M.Member")
		.expect("member")
		.set_value(&mut doc, AtomicValue::dint(99).into())
		.expect("write nested member");

	let members_after = member_renders(&doc, motor.node());
	assert_ne!(members_after[0], members_before[0]);
	assert_eq!(members_after[1..], members_before[1..]);

	let inner = doc.children(structure_node(&doc, motor.node()))[0];
	let inner_after: Vec<String> = doc.children(inner).iter().map(|node| doc.render(*node).expect("render")).collect();
	assert_ne!(inner_after[0], inner_before[0]);
	assert_eq!(inner_after[1], inner_before[1]);
	assert_eq!(doc.render(doc.tag("Timer1").expect("timer").node()).expect("render"), timer_before);

	let member = doc.resolve_tag("Motor.M.Member").expect("member").value(&doc).expect("value");
	assert_eq!(member.as_atomic().and_then(|atomic| atomic.as_i64()), Some(99));
}

#[test]
fn nested_write_must_keep_the_structure_layout() {
	let mut doc = fixture();
	let before = doc.render(doc.root()).expect("render");
	let other_speed = StructureValue::new("SPEED", vec![("Member".to_owned(), AtomicValue::dint(1).into())]).expect("structure builds");

	let err = doc
		.resolve_tag("Motor.M")
		.expect("member")
		.set_value(&mut doc, other_speed.into())
		.expect_err("layout differs");
	assert_eq!(err.kind(), ErrorKind::TypeMismatch);
	assert_eq!(doc.render(doc.root()).expect("render"), before);
}

#[test]
fn declared_string_capacity_survives_write_back() {
	let mut doc = fixture();
	let name = StringValue::new("STRING_20", 20).expect("string builds").with_data(b"valve").expect("fits");
	let udt = StructureValue::new("UDT", vec![("Name".to_owned(), name.into())]).expect("structure builds");
	doc.add_tag("U", udt.into()).expect("add U");

	let member = doc.resolve_tag("U.Name").expect("member");
	let err = member.set_text(&mut doc, &"x".repeat(21)).expect_err("over declared capacity");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	member.set_text(&mut doc, &"x".repeat(20)).expect("exactly at capacity");
	let value = member.value(&doc).expect("value");
	assert_eq!(value.as_string().expect("string").capacity(), 20);
	assert_eq!(doc.options().string_types.capacity("string_20"), Some(20));

	let before = doc.render(doc.root()).expect("render");
	let wider = StringValue::new("STRING_20", 30).expect("string builds");
	let err = doc.add_tag("W", wider.into()).expect_err("capacity contradicts the declaration");
	assert_eq!(err.kind(), ErrorKind::TypeMismatch);
	assert_eq!(doc.render(doc.root()).expect("render"), before);
}

#[test]
fn undeclared_string_types_are_not_read() {
	let mut source = Document::new();
	let name = StringValue::new("STRING_20", 20).expect("string builds").with_data(b"valve").expect("fits");
	let data = write_data(&mut source, &name.into()).expect("write");

	let mut doc = Document::new();
	let tag = doc.create_element("Tag");
	doc.set_attribute(tag, "Name", "Loose").expect("name");
	doc.set_attribute(tag, "DataType", "STRING_20").expect("type");
	let copy = doc.create_element("Data");
	doc.set_attribute(copy, "Format", "String").expect("format");
	doc.set_attribute(copy, "Length", "5").expect("length");
	let text = source.text(data).cloned();
	doc.set_text(copy, text).expect("text");
	doc.append_child(tag, copy).expect("data");
	let root = doc.root();
	doc.append_child(root, tag).expect("tag");

	let loose = doc.tag("Loose").expect("tag");
	let err = loose.value(&doc).expect_err("type not declared");
	assert_eq!(err.kind(), ErrorKind::TypeMismatch);

	doc.declare_string_type("STRING_20", 20).expect("declare");
	let value = loose.value(&doc).expect("declared type reads");
	assert_eq!(value.as_string().expect("string").text(), "valve");
	assert_eq!(value.as_string().expect("string").capacity(), 20);
}

#[test]
fn failed_writes_leave_the_document_untouched() {
	let mut doc = fixture();
	let before = doc.render(doc.root()).expect("render");
	let nodes = doc.node_count();

	let limit = doc.resolve_tag("Motor.M.Limit").expect("limit");
	let err = limit.set_value(&mut doc, AtomicValue::dint(1).into()).expect_err("wrong type");
	assert_eq!(err.kind(), ErrorKind::TypeMismatch);

	let run = doc.resolve_tag("Motor.Run").expect("run");
	let err = run.set_text(&mut doc, "banana").expect_err("unparsable");
	assert_eq!(err.kind(), ErrorKind::FormatMismatch);

	let label = doc.resolve_tag("Motor.Label").expect("label");
	let err = label.set_text(&mut doc, &"x".repeat(83)).expect_err("over capacity");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	assert_eq!(doc.render(doc.root()).expect("render"), before);
	assert_eq!(doc.node_count(), nodes);
}

#[test]
fn set_text_keeps_the_current_radix() {
	let mut doc = fixture();
	let counter = doc.tag("Counter1").expect("counter");
	counter.set_text(&mut doc, "16#ff").expect("hex text");
	let value = counter.value(&doc).expect("value");
	let atomic = value.as_atomic().expect("atomic");
	assert_eq!(atomic.as_i64(), Some(255));
	assert_eq!(atomic.radix(), Radix::Decimal);

	let label = doc.resolve_tag("Motor.Label").expect("label");
	label.set_text(&mut doc, "'a$'b'").expect("quoted");
	assert_eq!(label.value(&doc).expect("value").as_string().expect("string").text(), "a'b");
	label.set_text(&mut doc, "plain").expect("plain");
	assert_eq!(label.value(&doc).expect("value").as_string().expect("string").text(), "plain");

	let motor = doc.tag("Motor").expect("motor");
	let err = motor.set_text(&mut doc, "1").expect_err("structures take no text");
	assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn root_write_refreshes_companions_and_keeps_description() {
	let mut doc = fixture();
	let counter = doc.tag("Counter1").expect("counter");
	counter.set_description(&mut doc, "line count").expect("description");

	let grid = LogixValue::array("DINT", &[2, 3]).expect("array");
	counter.set_value(&mut doc, grid.clone()).expect("retype root");

	let keys: Vec<&str> = doc.attributes(counter.node()).iter().map(|(key, _)| key.as_str()).collect();
	assert_eq!(keys, ["Name", "TagType", "DataType", "Dimensions", "Radix"]);
	assert_eq!(doc.attribute(counter.node(), "Dimensions"), Some("2 3"));
	assert_eq!(counter.description(&doc).as_deref(), Some("line count"));
	assert_eq!(doc.name(doc.children(counter.node())[0]), Some("Description"));
	assert_eq!(counter.value(&doc).expect("value"), grid);

	counter.set_value(&mut doc, motor()).expect("retype again");
	assert_eq!(doc.attribute(counter.node(), "Dimensions"), None);
	assert_eq!(doc.attribute(counter.node(), "Radix"), None);
}

#[test]
fn rewrite_drops_stale_l5k_data() {
	let mut doc = fixture();
	let timer = doc.tag("Timer1").expect("timer");
	let l5k = doc.create_element("Data");
	doc.set_attribute(l5k, "Format", "L5K").expect("format");
	doc.insert_child(timer.node(), 0, l5k).expect("insert");

	assert_eq!(timer.value(&doc).expect("decorated data is read"), PredefinedType::Timer.default_value().expect("timer"));
	timer.set_member(&mut doc, "PRE", AtomicValue::dint(500).into()).expect("write PRE");

	let formats: Vec<Option<&str>> = doc
		.children_named(timer.node(), "Data")
		.map(|data| doc.attribute(data, "Format"))
		.collect();
	assert_eq!(formats, [Some("Decorated")]);
	let pre = timer.resolve(&doc, "PRE").expect("PRE").value(&doc).expect("value");
	assert_eq!(pre.as_atomic().and_then(|atomic| atomic.as_i64()), Some(500));
}

#[test]
fn remove_tag_frees_the_container() {
	let mut doc = fixture();
	let nodes = doc.node_count();
	doc.remove_tag("Counter1").expect("remove");
	assert!(doc.find_tag("Counter1").is_none());
	assert!(doc.node_count() < nodes);
	let err = doc.remove_tag("Counter1").expect_err("already gone");
	assert_eq!(err.kind(), ErrorKind::UnknownMember);
}

#[test]
fn handle_names_compare_case_insensitively() {
	let doc = fixture();
	let lower = doc.resolve_tag("motor.m.limit").expect("lower");
	let upper = doc.resolve_tag(TagName::parse("MOTOR.M.LIMIT").expect("name")).expect("upper");
	assert_eq!(lower.name(), upper.name());
}
