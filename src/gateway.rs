use api::{Bot, Discord, Inbound};
use std::sync::Arc;
use store::MemoryStore;
use twilight_gateway::{Event, Intents, Shard, ShardId};

pub type SharedBot = Arc<Bot<Discord, MemoryStore>>;

/// Receives messages (and interactions, unless `interactions` is false) until
/// the shard hits a fatal error.
pub async fn run(token: String, bot: SharedBot, interactions: bool) {
    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::DIRECT_MESSAGES | Intents::MESSAGE_CONTENT;
    let mut shard = Shard::new(ShardId::ONE, token, intents);

    loop {
        let event = match shard.next_event().await {
            Ok(event) => event,
            Err(err) if err.is_fatal() => {
                log::error!("Gateway connection lost: {err}");
                break;
            }
            Err(err) => {
                log::warn!("Skipping gateway event: {err}");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => log::info!("Connected to the gateway as {}.", ready.user.name),
            Event::MessageCreate(msg) => {
                let bot = bot.clone();
                tokio::spawn(async move { bot.on_message(Inbound::from(msg.0)).await });
            }
            Event::InteractionCreate(interaction) if interactions => {
                let bot = bot.clone();
                tokio::spawn(async move {
                    let interaction = interaction.0;
                    let (app, id, token) = (interaction.application_id, interaction.id, interaction.token.clone());
                    let reply = bot.on_interaction(interaction);
                    if let Err(err) = bot.platform().create_response(app, id, &token, &reply.response).await {
                        log::error!("Cannot respond to interaction {id}: {err}");
                        return;
                    }
                    if let Some(followup) = reply.followup {
                        bot.follow_up(followup).await;
                    }
                });
            }
            _ => continue,
        }
    }
}
