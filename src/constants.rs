pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_SEED: u64 = 0;
pub const ROOT_NODE: usize = 0;
pub const GROWTH_LOG_INTERVAL: usize = 10_000;
