// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod check;
pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod gui;
pub mod harvest;
pub mod progress;
pub mod sheet;
