//! CLI command implementations

pub mod check;
pub mod import;

pub use check::CheckArgs;
pub use import::ImportArgs;
