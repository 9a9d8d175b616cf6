//! Core types shared by the tag parser, the pipe and the backends.

pub mod image;
pub mod message;
pub mod status;

pub use image::*;
pub use message::*;
pub use status::*;
