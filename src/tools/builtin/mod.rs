//! Built-in tools.

pub mod rewrite_email;

pub use rewrite_email::{RewriteEmailTool, rewrite_email};
