//! The interactive role-play loop.
//!
//! Strictly sequential: each line is fully handled (reply received, printed
//! and spoken) before the next one is read.

use crate::commands::ReplCommand;
use crate::playback::Speaker;
use anyhow::Result;
use roleplay_core::{ConversationSession, Persist, RoomConfig, llm_client::ChatClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, instrument};

pub const ASSISTANT_LABEL: &str = "[assistant]";
pub const USER_PROMPT: &str = "[user] ";
pub const RECOMMEND_LABEL: &str = "Recommended message:";

pub struct Repl<'a> {
    room: &'a RoomConfig,
    client: &'a dyn ChatClient,
    speaker: Option<&'a Speaker>,
}

impl<'a> Repl<'a> {
    /// `speaker` is `None` when speech output is turned off.
    pub fn new(
        room: &'a RoomConfig,
        client: &'a dyn ChatClient,
        speaker: Option<&'a Speaker>,
    ) -> Self {
        Self {
            room,
            client,
            speaker,
        }
    }

    /// Opens the role-play and serves learner input until an empty line or EOF.
    ///
    /// Any failure from the chat, speech or playback services ends the loop.
    #[instrument(name = "repl", skip_all, fields(language = %self.room.language))]
    pub async fn run<R, W>(
        &self,
        session: &mut ConversationSession,
        input: R,
        output: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let opening = session.open(self.client, self.room).await?;
        write_line(output, &format!("{ASSISTANT_LABEL} {opening}")).await?;
        self.speak(&opening).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(USER_PROMPT.as_bytes()).await?;
            output.flush().await?;

            // EOF ends the conversation like an empty line.
            let line = lines.next_line().await?.unwrap_or_default();
            match ReplCommand::parse(&line) {
                ReplCommand::Quit => break,
                ReplCommand::Recommend => {
                    let example = session.request_example(self.client, self.room).await?;
                    write_line(output, &format!("{RECOMMEND_LABEL} {example}")).await?;
                }
                ReplCommand::Say => {
                    let last = session.last_message()?.to_string();
                    self.speak(&last).await?;
                }
                ReplCommand::Turn(text) => {
                    let reply = session.send_turn(self.client, &text, Persist::Yes).await?;
                    write_line(output, &format!("{ASSISTANT_LABEL} {reply}")).await?;
                    self.speak(&reply).await?;
                }
            }
        }

        info!(messages = session.len(), "Conversation ended");
        Ok(())
    }

    async fn speak(&self, text: &str) -> Result<()> {
        match self.speaker {
            Some(speaker) => speaker.say(text, self.room.language.speech_code()).await,
            None => {
                info!("Speech output is disabled; not speaking");
                Ok(())
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
