//! Render-pass bookkeeping: sessions and named blocks.

pub mod block;
mod session;

pub use block::{Block, BlockMethod, Blocks};
pub use session::RenderSession;
