//! Element descriptions: the plain data a [`Renderer`](`crate::Renderer`) turns into real DOM nodes.

use hashbrown::HashMap;

/// A description of a desired DOM node, analogous to a constructor call record.
///
/// Instances are plain data and are not connected to any document. They are produced
/// fresh for every render and consumed by it; reuse requires a [`Clone`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
	/// A named element like `"div"`, with [`Props`] and ordered children.
	Tag(TagElement),
	/// A [***Text***](https://developer.mozilla.org/en-US/docs/Web/API/Text) node carrying its character data.
	Text(String),
}

/// The named-element payload of [`Element::Tag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagElement {
	/// Tag name, as accepted by [***Document.createElement()***](https://developer.mozilla.org/en-US/docs/Web/API/Document/createElement).
	pub name: String,
	pub props: Props,
	pub children: Vec<Element>,
}

impl Element {
	/// Creates a text element directly, without going through child normalisation.
	#[must_use]
	pub fn text(data: impl Into<String>) -> Self {
		Element::Text(data.into())
	}
}

/// Describes an element named `name` with the given [`Props`] and children.
///
/// Children are normalised on the way in: anything convertible [`Into<Element>`]
/// is accepted, so raw strings and numbers become text elements. An absent child
/// is unrepresentable here; conditional children are the caller's concern
/// (e.g. `filter_map` before the call).
#[must_use]
pub fn create_element<C, I>(name: &str, props: Props, children: I) -> Element
where
	I: IntoIterator<Item = C>,
	C: Into<Element>,
{
	Element::Tag(TagElement {
		name: name.to_owned(),
		props,
		children: children.into_iter().map(Into::into).collect(),
	})
}

impl From<&str> for Element {
	fn from(data: &str) -> Self {
		Element::Text(data.to_owned())
	}
}

impl From<String> for Element {
	fn from(data: String) -> Self {
		Element::Text(data)
	}
}

macro_rules! text_from_primitive {
	($($type:ty),*$(,)?) => {$(
		impl From<$type> for Element {
			fn from(value: $type) -> Self {
				Element::Text(value.to_string())
			}
		}
	)*};
}
text_from_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// A bag of element properties, copied verbatim onto the realized DOM node.
///
/// Keys are attribute names. The last write to a key wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props(HashMap<String, String>);

impl Props {
	#[must_use]
	pub fn new() -> Self {
		Self(HashMap::new())
	}

	/// Builder-style [`set`](`Props::set`).
	#[must_use]
	pub fn with(mut self, name: &str, value: &str) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: &str, value: &str) {
		self.0.insert(name.to_owned(), value.to_owned());
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}
}

#[cfg(test)]
mod tests {
	use super::{create_element, Element, Props, TagElement};

	#[test]
	fn primitive_children_become_text_elements() {
		let element = create_element("div", Props::new(), ["hello"]);
		match element {
			Element::Tag(TagElement { name, children, .. }) => {
				assert_eq!(name, "div");
				assert_eq!(children, vec![Element::Text("hello".to_owned())]);
			}
			Element::Text(_) => panic!("expected a tag element"),
		}
	}

	#[test]
	fn numbers_become_text_elements() {
		assert_eq!(Element::from(42), Element::Text("42".to_owned()));
		assert_eq!(Element::from(2.5), Element::Text("2.5".to_owned()));
	}

	#[test]
	fn the_last_write_to_a_prop_wins() {
		let props = Props::new().with("id", "first").with("id", "second");
		assert_eq!(props.get("id"), Some("second"));
		assert_eq!(props.len(), 1);
	}

	#[test]
	fn nested_factories_compose() {
		let list = create_element(
			"ul",
			Props::new(),
			[
				create_element("li", Props::new(), ["one"]),
				create_element("li", Props::new(), ["two"]),
			],
		);
		match list {
			Element::Tag(TagElement { children, .. }) => assert_eq!(children.len(), 2),
			Element::Text(_) => panic!("expected a tag element"),
		}
	}
}
