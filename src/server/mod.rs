pub mod api;

use crate::cli::Args;
use crate::relay::Relay;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    relay: Arc<dyn Relay>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, relay: Arc<dyn Relay>, args: Args) -> Self {
        Self { addr, relay, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = api::AppState {
            relay: self.relay.clone(),
        };
        api::start_http_server(&self.addr, state, &self.args).await
    }
}
