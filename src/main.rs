mod config;
mod gateway;
mod http;

use api::{Bot, Discord};
use config::Config;
use std::sync::Arc;
use store::MemoryStore;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Config { token, staff, endpoint } = Config::from_env()?;

    let runtime = Runtime::new()?;
    let bot = Arc::new(Bot::new(Discord::new(token.clone()), MemoryStore::default(), staff));

    runtime.block_on(async move {
        // Interactions arrive over the gateway unless the HTTP endpoint takes them.
        let gateway = tokio::spawn(gateway::run(token, bot.clone(), endpoint.is_none()));
        let server = async {
            match endpoint {
                Some(endpoint) => http::serve(endpoint.addr, endpoint.public, bot).await,
                None => core::future::pending().await,
            }
        };

        tokio::select! {
            result = server => result?,
            result = gateway => result?,
            result = tokio::signal::ctrl_c() => result?,
        }

        log::info!("Shutting down.");
        anyhow::Ok(())
    })
}
