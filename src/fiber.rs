//! The fiber tree: traversal state stored in the data structure instead of on a call stack.
//!
//! Fibers live in a flat arena and refer to each other by [`FiberId`], so parent
//! back-references are plain `Copy` indices. The tree is expanded lazily, one
//! fiber per unit of work, which is what makes the walk interruptible.

use crate::dom::create_dom;
use crate::element::{Element, Props, TagElement};
use core::mem;
use core::ops::{Index, IndexMut};
use tracing::trace_span;
use web_sys::{Document, Node};

/// Index of a [`Fiber`] inside its [`FiberTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FiberId(usize);

/// The description part of a fiber, i.e. what its realized node should be.
#[derive(Debug)]
pub(crate) enum FiberContent {
	Tag { name: String, props: Props },
	Text(String),
	/// The work-in-progress root. Wraps the render container, so it is born
	/// with its `dom` set and never reaches the materializer.
	Root,
}

#[derive(Debug)]
pub(crate) struct Fiber {
	pub content: FiberContent,
	/// Realized platform node. `None` until this fiber's unit of work ran.
	pub dom: Option<Node>,
	pub parent: Option<FiberId>,
	pub child: Option<FiberId>,
	pub sibling: Option<FiberId>,
	/// Child descriptions not yet expanded into fibers of their own.
	pub pending: Vec<Element>,
}

impl Fiber {
	pub fn from_element(element: Element, parent: FiberId) -> Self {
		let (content, pending) = match element {
			Element::Tag(TagElement { name, props, children }) => (FiberContent::Tag { name, props }, children),
			Element::Text(data) => (FiberContent::Text(data), Vec::new()),
		};
		Self {
			content,
			dom: None,
			parent: Some(parent),
			child: None,
			sibling: None,
			pending,
		}
	}

	pub fn root(container: Node, element: Element) -> Self {
		Self {
			content: FiberContent::Root,
			dom: Some(container),
			parent: None,
			child: None,
			sibling: None,
			pending: vec![element],
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct FiberTree {
	fibers: Vec<Fiber>,
}

impl FiberTree {
	pub fn new() -> Self {
		Self { fibers: Vec::new() }
	}

	pub fn insert(&mut self, fiber: Fiber) -> FiberId {
		let id = FiberId(self.fibers.len());
		self.fibers.push(fiber);
		id
	}

	pub fn len(&self) -> usize {
		self.fibers.len()
	}

	/// Releases every fiber. Realized but uncommitted nodes are dropped with them.
	pub fn clear(&mut self) {
		self.fibers.clear();
	}

	/// Processes exactly one fiber and names the next one to process.
	///
	/// Materializes `fiber` if necessary, expands its pending child descriptions
	/// into linked child fibers, and returns the fiber to visit next: the first
	/// child if one exists, otherwise the nearest ancestor-or-self sibling.
	/// `None` signals that the walk is complete.
	pub fn perform_unit_of_work(&mut self, document: &Document, fiber: FiberId) -> Option<FiberId> {
		let span = trace_span!("Performing unit of work", ?fiber);
		let _enter = span.enter();

		if self[fiber].dom.is_none() {
			let node = create_dom(document, &self[fiber].content);
			self[fiber].dom = Some(node);
		}

		self.expand(fiber);
		self.next_after(fiber)
	}

	/// Turns `fiber`'s pending child descriptions into fibers, linking the first
	/// as its `child` and each later one as the previous one's `sibling`.
	///
	/// Every position is linked the same way; order is the description order.
	fn expand(&mut self, fiber: FiberId) {
		let pending = mem::take(&mut self[fiber].pending);
		let mut previous: Option<FiberId> = None;
		for element in pending {
			let new = self.insert(Fiber::from_element(element, fiber));
			match previous {
				None => self[fiber].child = Some(new),
				Some(previous) => self[previous].sibling = Some(new),
			}
			previous = Some(new);
		}
	}

	/// The pre-order successor of an already-expanded `fiber`: its first child,
	/// else the first sibling found walking up through its ancestors.
	fn next_after(&self, fiber: FiberId) -> Option<FiberId> {
		if let Some(child) = self[fiber].child {
			return Some(child);
		}
		let mut current = Some(fiber);
		while let Some(fiber) = current {
			if let Some(sibling) = self[fiber].sibling {
				return Some(sibling);
			}
			current = self[fiber].parent;
		}
		None
	}
}

impl Index<FiberId> for FiberTree {
	type Output = Fiber;

	fn index(&self, id: FiberId) -> &Fiber {
		&self.fibers[id.0]
	}
}

impl IndexMut<FiberId> for FiberTree {
	fn index_mut(&mut self, id: FiberId) -> &mut Fiber {
		&mut self.fibers[id.0]
	}
}
