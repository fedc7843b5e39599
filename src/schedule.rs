//! The cooperative work loop: idle-time scheduling, manual driving and the commit phase.

use crate::element::Element;
use crate::fiber::{Fiber, FiberId, FiberTree};
use core::cell::RefCell;
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, info, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, throw_val, JsCast, UnwrapThrowExt};
use web_sys::{Document, IdleDeadline, Window};

/// Yield the current idle slice once less than this many milliseconds remain.
const MIN_SLICE_BUDGET_MS: f64 = 1.0;

/// An incremental renderer: expands element trees into fibers during browser idle
/// time and attaches the finished tree to its container in one synchronous commit.
///
/// Each `Renderer` owns its complete scheduling state, so independent renderers
/// (and containers) can coexist. A renderer is born running: calling
/// [`render`](`Renderer::render`) arms a self-rescheduling
/// [***requestIdleCallback***](https://developer.mozilla.org/en-US/docs/Web/API/Window/requestIdleCallback)
/// chain that goes quiet again once the tree is committed.
/// [`stop`](`Renderer::stop`) pauses an in-flight render and [`start`](`Renderer::start`)
/// resumes it; [`step`](`Renderer::step`) and [`flush`](`Renderer::flush`) drive the
/// same walk manually, without the idle scheduler.
///
/// The document never observes a partially built subtree: nothing is attached
/// before the commit phase runs.
///
/// Dropping a `Renderer` cancels any in-flight render; already-committed output
/// is unaffected.
#[derive(Debug)]
pub struct Renderer {
	state: Rc<RefCell<RendererState>>,
}

#[derive(Debug)]
struct RendererState {
	window: Window,
	/// Owner document of the current render's container. `None` while idle.
	document: Option<Document>,
	tree: FiberTree,
	/// The work-in-progress root, pending commit. At most one at a time.
	wip_root: Option<FiberId>,
	/// Scheduler cursor. `Some` only between a render call and its commit.
	next_unit_of_work: Option<FiberId>,
	running: bool,
	idle_handle: Option<u32>,
	tick: Option<Closure<dyn FnMut(IdleDeadline)>>,
}

impl Renderer {
	/// Creates a renderer scheduling on the current page's [`Window`].
	///
	/// # Panics
	///
	/// Throws if no `Window` is available (e.g. in a worker).
	#[must_use]
	pub fn new() -> Self {
		Self::new_for_window(web_sys::window().expect_throw("filament-dom: No `Window` available."))
	}

	#[must_use]
	#[instrument]
	pub fn new_for_window(window: Window) -> Self {
		Self {
			state: Rc::new(RefCell::new(RendererState {
				window,
				document: None,
				tree: FiberTree::new(),
				wip_root: None,
				next_unit_of_work: None,
				running: true,
				idle_handle: None,
				tick: None,
			})),
		}
	}

	/// Schedules `element` to be expanded into a fiber tree during idle time and
	/// eventually attached under `container`.
	///
	/// Returns immediately; completion is not observable from here. There is no
	/// diffing against earlier renders, so rendering into the same container
	/// twice appends a second subtree.
	///
	/// A render issued while another one is still in flight abandons the
	/// unfinished tree and starts over.
	#[instrument(skip(self, element))]
	pub fn render(&mut self, element: Element, container: &web_sys::Element) {
		{
			let mut state = self.state.borrow_mut();
			let document = container
				.owner_document()
				.expect_throw("filament-dom: No owner document found for the render container.");
			if state.wip_root.is_some() {
				warn!("Render scheduled while another one was in flight. The unfinished tree is abandoned.");
			}
			state.document = Some(document);
			state.tree.clear();
			let root = state.tree.insert(Fiber::root(container.clone().into(), element));
			state.wip_root = Some(root);
			state.next_unit_of_work = Some(root);
		}
		Self::ensure_scheduled(&self.state);
	}

	/// Resumes idle-time processing after [`stop`](`Renderer::stop`).
	pub fn start(&mut self) {
		self.state.borrow_mut().running = true;
		Self::ensure_scheduled(&self.state);
	}

	/// Pauses idle-time processing, cancelling the scheduled idle callback.
	///
	/// In-flight work is kept, not discarded; [`start`](`Renderer::start`) picks it
	/// back up, and manual driving via [`step`](`Renderer::step`) and
	/// [`flush`](`Renderer::flush`) keeps working while stopped.
	#[instrument(skip(self))]
	pub fn stop(&mut self) {
		let mut state = self.state.borrow_mut();
		state.running = false;
		if let Some(handle) = state.idle_handle.take() {
			state.window.cancel_idle_callback(handle);
		}
		state.tick = None;
	}

	/// Whether a render is still waiting to be walked or committed.
	#[must_use]
	pub fn has_pending_work(&self) -> bool {
		let state = self.state.borrow();
		state.next_unit_of_work.is_some() || state.wip_root.is_some()
	}

	/// Performs exactly one unit of work, committing if that drained the walk.
	///
	/// Returns whether a unit was performed, i.e. `false` once no work is left.
	/// This drives the same walk as the idle scheduler, just synchronously.
	pub fn step(&mut self) -> bool {
		let mut state = self.state.borrow_mut();
		let unit = match state.next_unit_of_work {
			Some(unit) => unit,
			None => return false,
		};
		let document = state
			.document
			.clone()
			.expect_throw("filament-dom: Pending work without a document.");
		let next = state.tree.perform_unit_of_work(&document, unit);
		state.next_unit_of_work = next;
		if next.is_none() {
			state.commit();
		}
		true
	}

	/// Drains all pending work and commits, synchronously, bypassing idle scheduling.
	#[instrument(skip(self))]
	pub fn flush(&mut self) {
		while self.step() {}
		let mut state = self.state.borrow_mut();
		if let Some(handle) = state.idle_handle.take() {
			state.window.cancel_idle_callback(handle);
		}
	}

	/// Schedules the next idle callback if the renderer is running, none is
	/// scheduled yet, and there is work left to do.
	fn ensure_scheduled(state: &Rc<RefCell<RendererState>>) {
		let mut borrowed = state.borrow_mut();
		if !borrowed.running || borrowed.idle_handle.is_some() {
			return;
		}
		if borrowed.next_unit_of_work.is_none() && borrowed.wip_root.is_none() {
			return;
		}
		if borrowed.tick.is_none() {
			let shared = Rc::clone(state);
			borrowed.tick = Some(Closure::wrap(Box::new(move |deadline: IdleDeadline| {
				Self::tick(&shared, &deadline);
			}) as Box<dyn FnMut(IdleDeadline)>));
		}
		let tick = borrowed.tick.as_ref().unwrap_throw();
		let handle = borrowed
			.window
			.request_idle_callback(tick.as_ref().unchecked_ref::<Function>())
			.expect_throw("filament-dom: Failed to schedule an idle callback.");
		borrowed.idle_handle = Some(handle);
	}

	fn tick(state: &Rc<RefCell<RendererState>>, deadline: &IdleDeadline) {
		{
			let mut borrowed = state.borrow_mut();
			borrowed.idle_handle = None;
			borrowed.work_loop(deadline);
		}
		Self::ensure_scheduled(state);
	}
}

impl Default for Renderer {
	fn default() -> Self {
		Self::new()
	}
}

impl Drop for Renderer {
	fn drop(&mut self) {
		self.stop();
	}
}

impl RendererState {
	/// One idle-slice tick: always at least one unit, then as many more as the
	/// deadline allows. Commits when the walk drains within the slice.
	fn work_loop(&mut self, deadline: &IdleDeadline) {
		let span = trace_span!("Work loop tick", time_remaining = deadline.time_remaining());
		let _enter = span.enter();

		while let Some(unit) = self.next_unit_of_work {
			let document = self
				.document
				.clone()
				.expect_throw("filament-dom: Pending work without a document.");
			self.next_unit_of_work = self.tree.perform_unit_of_work(&document, unit);
			if deadline.time_remaining() < MIN_SLICE_BUDGET_MS {
				trace!("Idle slice exhausted. Yielding with work pending.");
				break;
			}
		}

		if self.next_unit_of_work.is_none() {
			self.commit();
		}
	}

	/// Commit phase: attaches the completed fiber tree to the container in one
	/// uninterrupted pass, then releases the tree.
	fn commit(&mut self) {
		let root = match self.wip_root.take() {
			Some(root) => root,
			None => return,
		};
		debug_assert!(self.next_unit_of_work.is_none(), "filament-dom: Commit started while work was pending.");

		let span = trace_span!("Committing fiber tree");
		let _enter = span.enter();

		commit_work(&self.tree, self.tree[root].child);
		info!("Committed {} node(s).", self.tree.len() - 1);

		self.tree.clear();
		self.document = None;
	}
}

/// Appends `fiber`'s realized node to its parent fiber's realized node, then
/// recurses into its child and its sibling. Terminal fibers end the recursion.
fn commit_work(tree: &FiberTree, fiber: Option<FiberId>) {
	let fiber = match fiber {
		Some(fiber) => fiber,
		None => return,
	};

	let parent = tree[fiber].parent.expect_throw("filament-dom: Committed fiber without a parent.");
	let parent_dom = tree[parent]
		.dom
		.as_ref()
		.expect_throw("filament-dom: Parent fiber without a realized node.");
	let dom = tree[fiber]
		.dom
		.as_ref()
		.expect_throw("filament-dom: Committed fiber without a realized node.");
	if let Err(error) = parent_dom.append_child(dom) {
		error!("Failed to append node: {:?}", error);
		throw_val(error);
	}
	trace!(?fiber, "Attached.");

	commit_work(tree, tree[fiber].child);
	commit_work(tree, tree[fiber].sibling);
}
