//! Email Polisher: abbreviation expansion plus LLM rewrite.

pub mod abbreviations;
pub mod cli;
pub mod config;
pub mod error;
pub mod expander;
pub mod llm;
pub mod pipeline;
pub mod tools;
