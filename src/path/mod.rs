//! Path composer: name paths, scope contexts, and value lookup.
//!
//! - [`NamePath`] / [`PathSegment`] are the identifier a field registers under.
//! - [`ScopeContext`] holds the root prefix plus the stack of enclosing list entries.
//! - [`get_in`] / [`set_in`] / [`pick`] read and write values by path.

pub mod name;
pub mod parse;
pub mod scope;
pub mod value;

pub use name::{NamePath, PathSegment};
pub use parse::parse_name_path;
pub use scope::{ScopeContext, ScopeFrame};
pub use value::{get_in, pick, set_in};
