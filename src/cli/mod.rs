//! CLI command handlers

pub mod commands;

pub use commands::{
    analyze_depleted, analyze_economics, analyze_saline, depleted, economics, saline, sheets,
    show_config, validate, Analysis,
};
