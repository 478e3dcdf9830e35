//! Quadlet `.container` unit files.
//!
//! [`render_definition`] turns a service definition into a structured
//! [`QuadletFile`]; [`QuadletFile::render`] serializes it. Rendering is
//! deterministic, so regenerating an unchanged definition rewrites the file
//! with identical bytes.

mod file;
mod render;

#[cfg(test)]
mod tests;

pub use file::{QuadletFile, Section};
pub use render::{RenderContext, render_definition, render_to_string};
