//! File selection: pattern matching, ignore policy and filtered tree building

pub mod builder;
pub mod core_ignores;
pub mod ignore_file;
pub mod pattern;
pub mod policy;
pub mod probe;

pub use builder::TreeBuilder;
pub use core_ignores::{write_core_ignores, CORE_IGNORES, CORE_SOURCE_IGNORES};
pub use ignore_file::{load_user_patterns, parse_ignore_patterns};
pub use pattern::{matches, Pattern};
pub use policy::{Policy, Rejection};
pub use probe::Prober;
