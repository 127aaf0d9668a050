//! UI components.

pub mod celebration;
