//! UI module for the Money Mayhem TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
