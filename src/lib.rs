pub mod board;
pub mod epd_4in01f;
mod error;
mod frame;

pub use error::{EpdError as Error, Result};
pub use frame::{Frame, HALF_FRAME_BYTES};
