mod kind;
mod lookups;

pub use kind::LookupKind;
pub use lookups::{Lookup, Lookups, normalize_code};
