use super::{Document, NodeId, NodeText};

pub(super) fn render_node(doc: &Document, id: NodeId, out: &mut String) {
	let Some(node) = doc.node(id) else {
		return;
	};

	out.push('<');
	out.push_str(node.name());
	for (key, value) in node.attributes() {
		out.push(' ');
		out.push_str(key);
		out.push_str("=\"");
		escape_into(value, true, out);
		out.push('"');
	}

	if node.children().is_empty() && node.text().is_none() {
		out.push_str("/>");
		return;
	}
	out.push('>');

	match node.text() {
		Some(NodeText::Plain(text)) => escape_into(text, false, out),
		Some(NodeText::CData(text)) => {
			out.push_str("<![CDATA[");
			out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
			out.push_str("]]>");
		}
		None => {}
	}
	for child in node.children() {
		render_node(doc, *child, out);
	}

	out.push_str("</");
	out.push_str(node.name());
	out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' if attribute => out.push_str("&quot;"),
			'\'' if attribute => out.push_str("&apos;"),
			_ => out.push(ch),
		}
	}
}
