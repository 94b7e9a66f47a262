#![forbid(unsafe_code)]

//! Browser binding for the folio portfolio page.
//!
//! This crate exports [`boot`] to JavaScript. It implements the
//! `folio-core` host traits over the DOM (`localStorage` flags, `setTimeout`
//! timers, class-based highlight, a fixed-position tooltip) and wires the
//! page collaborators to their elements.
//!
//! Markup, hover tables, timeout bookkeeping and the console logging layer are
//! plain Rust and are tested natively; the DOM glue only builds for `wasm32`.

pub mod console;
pub mod hover;
pub mod markup;
pub mod timeouts;

#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::boot;
