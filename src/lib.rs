#![doc(html_root_url = "https://docs.rs/filament-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod element;
pub mod schedule;

mod dom;
mod fiber;

pub use element::{create_element, Element, Props, TagElement};
pub use schedule::Renderer;
