//! Centralized limits for hierarchy resolution.
//!
//! Resolver recursion limits are expressed through
//! `modelgen_resolver::recursion::RecursionProfile`, which reads its fixed
//! values from the constants below. Supertype chains are not capped here:
//! a chain can never be longer than the number of types in the graph, so the
//! hierarchy walker sizes its guard from the graph instead.

/// Maximum number of `subset_of` hops followed when deciding whether an
/// association narrows a derived union through chained unions.
pub const MAX_SUBSET_CHAIN: u32 = 64;

/// Initial capacity of the builder cache slot table.
pub const BUILDER_CACHE_CAPACITY: usize = 256;
