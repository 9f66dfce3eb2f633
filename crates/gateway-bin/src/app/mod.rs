//! Application wiring and lifecycle management.

mod init;
mod lifecycle;
mod state;

pub use init::run_gateway;
pub use lifecycle::check_status;
pub use state::GatewayState;
