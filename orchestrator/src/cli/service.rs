use clap::Args;

fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(value)
}

#[derive(Debug, Clone, Args)]
pub struct ServiceCliArgs {
    /// Capacity of the queue between step runners and the status writer. Must be greater than 0.
    #[arg(env = "CHAOS_ORCHESTRATOR_STATUS_QUEUE_CAPACITY", long, default_value = "100", value_parser = parse_positive_usize)]
    pub status_queue_capacity: usize,

    /// How many times a status write is retried after losing a version race.
    #[arg(env = "CHAOS_ORCHESTRATOR_MAX_STATUS_WRITE_RETRIES", long, default_value = "5")]
    pub max_status_write_retries: u32,
}
