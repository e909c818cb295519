//! Various utility types and functions.

pub mod bmp;
pub mod buf;
pub mod palette;
pub mod pnm;
