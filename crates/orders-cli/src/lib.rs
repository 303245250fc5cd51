//! Library side of the orders grid CLI: view state configuration, logging
//! setup and grid rendering.

pub mod config;
pub mod logging;
pub mod render;
