// Content writes flow through ringed observers: validation before the store
// write, projection right after it, audit and notification fan-out last.

pub mod context;
pub mod error;
pub mod implementations;
pub mod pipeline;
pub mod traits;

pub use context::*;
pub use error::*;
pub use pipeline::*;
pub use traits::*;
