//! Realizing single DOM nodes from fiber descriptions.

use crate::fiber::FiberContent;
use tracing::{error, trace_span};
use wasm_bindgen::throw_val;
use web_sys::{Document, Node};

/// Creates the one real DOM node described by `content` and copies its props onto it.
///
/// The node is returned detached; attaching is the commit phase's job. Tree links
/// are deliberately out of reach here. Platform failures (an invalid tag or
/// attribute name) are logged and re-thrown, abandoning the current tick.
pub(crate) fn create_dom(document: &Document, content: &FiberContent) -> Node {
	match content {
		FiberContent::Text(data) => {
			let span = trace_span!("Creating text node", data = %data);
			let _enter = span.enter();
			document.create_text_node(data).into()
		}
		FiberContent::Tag { name, props } => {
			let span = trace_span!("Creating element", name = %name);
			let _enter = span.enter();
			let dom_element = match document.create_element(name) {
				Ok(element) => element,
				Err(error) => {
					error!("Failed to create element {:?}: {:?}", name, error);
					throw_val(error);
				}
			};
			for (key, value) in props.iter() {
				if let Err(error) = dom_element.set_attribute(key, value) {
					error!("Failed to set attribute {:?}={:?} on {:?}: {:?}", key, value, name, error);
					throw_val(error);
				}
			}
			dom_element.into()
		}
		FiberContent::Root => unreachable!("filament-dom: The root fiber is created with its container node."),
	}
}
