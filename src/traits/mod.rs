//! Core traits for looking up managed instances.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
