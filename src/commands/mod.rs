// src/commands/mod.rs
// Declares the command modules.

pub mod help;
pub mod raid;
