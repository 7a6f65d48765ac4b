//! `/play <query>`: answers with a link to YouTube search results for the query.

use anyhow::Result;
use log::info;

use crate::respond::{Ack, Respond};
use crate::search::search_results_message;
use crate::slack::SlashCommand;

pub const NAME: &str = "/play";

pub async fn run(ack: Ack, respond: Respond, command: SlashCommand) -> Result<()> {
    ack.ack();

    info!(
        "🎵 /play from user {} in channel {} | Query: {:?}",
        command.user_id, command.channel_id, command.text
    );

    let message = search_results_message(&command.text);
    respond.send(&message).await?;

    Ok(())
}
