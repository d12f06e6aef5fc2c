//! CLI module for dense-cg

pub mod commands;
pub mod format;
