//! fal-pipe: fal.ai image generation for chat hosts, driven by inline
//! prompt tags.
//!
//! A user writes `a lighthouse at dusk --ar 16:9 --steps 30`; the tags are
//! parsed against the selected model's tag rules, stripped from the prompt
//! and merged over the configured request defaults.
//!
//! # Quick Start
//!
//! ```no_run
//! use fal_pipe::prelude::*;
//! use futures::StreamExt;
//!
//! # async fn example() -> fal_pipe::error::Result<()> {
//! let pipe = Pipe::from_config(PipeConfig::from_env()?)?;
//! let request = PipeRequest::new(
//!     "fal.falai-flux-2",
//!     vec![ChatMessage::user("a lighthouse at dusk --ar 16:9")],
//! );
//! let mut replies = pipe.handle(request, None);
//! while let Some(chunk) = replies.next().await {
//!     print!("{chunk}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod pipe;
pub mod prelude;
pub mod provider;
pub mod tags;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
