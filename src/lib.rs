//! Random-walk maze carving.
//!
//! [`carver::WalkingCarver`] fills a [`grid::Grid`] with a maze connecting two
//! endpoints; [`maze::Maze`] wraps a grid for shared reading and
//! [`render`] turns a finished grid into text, SVG or PNG.

pub mod candidates;
pub mod carver;
pub mod config;
pub mod geometry;
pub mod grid;
pub mod maze;
pub mod path;
pub mod render;
pub mod request;
pub mod settings;
