/// Number of donations retained in memory
pub const MAX_RETAINED_DONATIONS: usize = 100;

/// Name used when the provider omits the donator's name
pub const ANONYMOUS_DONATOR: &str = "Anonymous";
