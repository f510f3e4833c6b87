pub mod cli;
pub mod console;
pub mod conversation;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Upstream Base URL: {}", args.upstream_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Max Output Tokens: {}", args.max_tokens);
    info!(
        "Upstream API Key Present: {}",
        args.upstream_api_key.as_deref().is_some_and(|k| !k.is_empty())
    );
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    if args.console {
        return console::run_console(&args).await;
    }

    let relay = relay::new_client(&args)?;
    let addr = args.server_addr.clone();
    info!("Starting relay server on: {}", addr);
    let server = Server::new(addr, relay, args.clone());
    server.run().await
}
