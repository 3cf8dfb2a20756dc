pub mod coordinator;
pub mod event_handler;
pub mod reconcile;
pub mod spec;
pub mod status;
pub mod target;
pub mod watch;
