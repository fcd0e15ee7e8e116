//! flavortree: hierarchical tag selection over taxonomy trees
//!
//! Selecting a node implies its ancestors, deselecting drops its subtree,
//! and the selected names keep a user-arrangeable badge order.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
