use filament_dom::{create_element, Element, Props, Renderer};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::window;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> web_sys::Element {
	let document = window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&container).unwrap();
	container
}

#[wasm_bindgen_test]
fn hello_world() {
	let container = container();
	let mut renderer = Renderer::new();
	renderer.render(create_element("div", Props::new(), ["hello"]), &container);
	renderer.flush();

	assert_eq!(container.child_element_count(), 1);
	let div = container.first_element_child().unwrap();
	assert_eq!(div.tag_name(), "DIV");
	let text = div.first_child().unwrap();
	assert_eq!(text.node_type(), web_sys::Node::TEXT_NODE);
	assert_eq!(text.text_content().unwrap(), "hello");
}

#[wasm_bindgen_test]
fn props_are_copied() {
	let container = container();
	let mut renderer = Renderer::new();
	renderer.render(
		create_element(
			"a",
			Props::new().with("href", "https://example.com/").with("title", "Example"),
			["link"],
		),
		&container,
	);
	renderer.flush();

	let anchor = container.first_element_child().unwrap();
	assert_eq!(anchor.get_attribute("href").unwrap(), "https://example.com/");
	assert_eq!(anchor.get_attribute("title").unwrap(), "Example");
	assert_eq!(anchor.text_content().unwrap(), "link");
}

#[wasm_bindgen_test]
fn sibling_order_is_preserved() {
	let container = container();
	let mut renderer = Renderer::new();
	renderer.render(
		create_element(
			"div",
			Props::new(),
			[
				create_element("span", Props::new().with("id", "first"), ["one"]),
				create_element("span", Props::new().with("id", "second"), ["two"]),
			],
		),
		&container,
	);
	renderer.flush();

	let div = container.first_element_child().unwrap();
	let spans = div.children();
	assert_eq!(spans.length(), 2);
	assert_eq!(spans.item(0).unwrap().id(), "first");
	assert_eq!(spans.item(0).unwrap().text_content().unwrap(), "one");
	assert_eq!(spans.item(1).unwrap().id(), "second");
	assert_eq!(spans.item(1).unwrap().text_content().unwrap(), "two");
}

#[wasm_bindgen_test]
fn rerender_appends_a_second_subtree() {
	// There is no diffing, so a second render on the same container adds to it.
	let container = container();
	let mut renderer = Renderer::new();
	renderer.render(create_element("p", Props::new(), ["first"]), &container);
	renderer.flush();
	renderer.render(create_element("p", Props::new(), ["second"]), &container);
	renderer.flush();

	let paragraphs = container.children();
	assert_eq!(paragraphs.length(), 2);
	assert_eq!(paragraphs.item(0).unwrap().text_content().unwrap(), "first");
	assert_eq!(paragraphs.item(1).unwrap().text_content().unwrap(), "second");
}

#[wasm_bindgen_test]
fn childless_elements_render_as_leaves() {
	let container = container();
	let mut renderer = Renderer::new();
	renderer.render(
		create_element(
			"div",
			Props::new(),
			[
				create_element("ul", Props::new(), [create_element("li", Props::new(), core::iter::empty::<Element>())]),
				create_element("footer", Props::new(), ["after"]),
			],
		),
		&container,
	);
	renderer.flush();

	let div = container.first_element_child().unwrap();
	assert_eq!(div.children().length(), 2);
	let ul = div.children().item(0).unwrap();
	assert_eq!(ul.tag_name(), "UL");
	let li = ul.first_element_child().unwrap();
	assert_eq!(li.tag_name(), "LI");
	assert!(li.first_child().is_none());
	let footer = div.children().item(1).unwrap();
	assert_eq!(footer.tag_name(), "FOOTER");
	assert_eq!(footer.text_content().unwrap(), "after");
}

#[wasm_bindgen_test]
fn renderers_are_independent() {
	let container_a = container();
	let container_b = container();
	let mut renderer_a = Renderer::new();
	let mut renderer_b = Renderer::new();

	renderer_a.render(create_element("p", Props::new(), ["a"]), &container_a);
	renderer_b.render(create_element("p", Props::new(), ["b"]), &container_b);
	renderer_a.flush();
	renderer_b.flush();

	assert_eq!(container_a.text_content().unwrap(), "a");
	assert_eq!(container_b.text_content().unwrap(), "b");
}
