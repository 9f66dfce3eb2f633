//! Gateway state definition.

use std::sync::Arc;
use vehicle_cli_ops::{CommandRouter, GatewayProfile, ProcessInvoker};

/// Shared gateway state handed to every HTTP handler.
///
/// Holds no mutable data: each request runs its own login and command.
#[derive(Clone)]
pub struct GatewayState {
    pub router: CommandRouter,
}

impl GatewayState {
    pub fn new(profile: GatewayProfile, invoker: Arc<dyn ProcessInvoker>) -> Self {
        Self {
            router: CommandRouter::new(profile, invoker),
        }
    }
}
