// src/gui/components/mod.rs
pub mod action_panel;
pub mod data_table;
