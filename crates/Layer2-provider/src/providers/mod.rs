//! Chat-completion client implementations

pub mod pc_node;
