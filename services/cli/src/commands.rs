/// One line of learner input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// An empty line ends the conversation.
    Quit,
    /// `!recommend`: ask for an example reply without recording it.
    Recommend,
    /// `!say`: speak the most recent message again.
    Say,
    /// Anything else is the learner's next line.
    Turn(String),
}

impl ReplCommand {
    pub const RECOMMEND: &'static str = "!recommend";
    pub const SAY: &'static str = "!say";

    /// Parses a raw input line. Control tokens must match the trimmed line exactly.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => ReplCommand::Quit,
            Self::RECOMMEND => ReplCommand::Recommend,
            Self::SAY => ReplCommand::Say,
            text => ReplCommand::Turn(text.to_string()),
        }
    }
}
