//! Image-set resolution and discovery.
//!
//! A set is identified by a 4-digit numeric key and consists of four files
//! spread across three directory roots, one per display quadrant. This module
//! maps keys to paths and discovers which keys form complete sets.

pub mod discovery;
pub mod resolver;

pub use discovery::SetRegistry;
pub use resolver::{PathResolver, Quadrant, QuadrantPaths};
