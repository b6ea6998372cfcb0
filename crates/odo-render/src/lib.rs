#![forbid(unsafe_code)]

//! Render kernel: cells, colours, and the buffer widgets draw into.

pub mod buffer;
pub mod cell;
