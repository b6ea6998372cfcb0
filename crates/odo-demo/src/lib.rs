#![forbid(unsafe_code)]

//! Interactive terminal demo for the rolling number field.

pub mod app;
pub mod cli;
pub mod logging;
pub mod presenter;
pub mod session;
