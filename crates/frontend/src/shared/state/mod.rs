pub mod draft_buffer;

pub use draft_buffer::{DraftBuffer, DraftError, DraftMode};
