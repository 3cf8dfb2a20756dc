/// Collection holding named scenario definitions
pub const SCENARIOS_COLLECTION: &str = "scenarios";

/// Collection holding one versioned status document per run
pub const RUN_STATUS_COLLECTION: &str = "run_status";
