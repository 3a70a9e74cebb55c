//! Core library: recognizing federated RBAC subjects and rewriting bindings
//! for Workforce Identity Federation.

pub mod binding;
pub mod classifier;
pub mod config;
pub mod filter;
pub mod manifest;
pub mod pipeline;
pub mod rewriter;
pub mod rules;
pub mod transformer;
