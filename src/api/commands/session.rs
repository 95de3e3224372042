//! Interactive session
//!
//! Line-oriented loop that owns the conversion history and the last request.
//! `handle_line` does the work and returns the lines to print, so the loop
//! itself is only I/O.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::{assistant, convert, units};
use crate::core::features::assistant::{Assistant, AssistantError};
use crate::core::features::unit_converter;
use crate::core::history::ConversionHistory;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;
use crate::shared::types::{ConversionRequest, ConvertUnitsResponse};

const PROMPT: &str = "> ";
const UNSUPPORTED: &str = "⚠️ Conversion not supported between selected units";

const HELP: &[&str] = &[
    "Commands:",
    "  <value> <from> to <to>   convert, e.g. '5 feet to meters'",
    "  swap                     swap the last units and convert again",
    "  history                  last 5 conversions, newest first",
    "  clear                    forget the history",
    "  last                     most recent conversion and when it ran",
    "  units [category|unit]    list unit categories",
    "  units all                every unit name the converter knows",
    "  ask <question>           explain a conversion with the AI assistant",
    "  help                     show this help",
    "  quit | exit              leave the session",
];

#[derive(Debug, Clone, PartialEq)]
pub enum SessionReply {
    Lines(Vec<String>),
    Quit,
}

pub struct Session {
    history: ConversionHistory,
    last_request: Option<ConversionRequest>,
    assistant: Result<Assistant, AssistantError>,
    decimals: usize,
}

impl Session {
    /// `assistant` may be an error (e.g. no API key); conversions still work.
    pub fn new(assistant: Result<Assistant, AssistantError>, decimals: usize) -> Self {
        Self {
            history: ConversionHistory::new(),
            last_request: None,
            assistant,
            decimals,
        }
    }

    pub fn history(&self) -> &ConversionHistory {
        &self.history
    }

    pub async fn handle_line(&mut self, line: &str) -> SessionReply {
        let line = line.trim();
        if line.is_empty() {
            return SessionReply::Lines(Vec::new());
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let lines = match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => return SessionReply::Quit,
            "help" => HELP.iter().map(|s| s.to_string()).collect(),
            "history" => self.history_lines(),
            "last" => match self.history.latest() {
                Some(entry) => vec![format!(
                    "Last: {} at {}",
                    entry,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
                )],
                None => vec!["No conversions yet".to_string()],
            },
            "clear" => {
                self.history.clear();
                vec!["History cleared".to_string()]
            }
            "swap" => match self.last_request.as_ref().map(ConversionRequest::swapped) {
                Some(request) => self.convert(request),
                None => vec!["Nothing to swap yet".to_string()],
            },
            "units" if rest.eq_ignore_ascii_case("all") => units::render(&units::all_units()),
            "units" => {
                let category = Some(rest).filter(|r| !r.is_empty());
                match units::get_units(category) {
                    Ok(response) => units::render(&response),
                    Err(e) => vec![format!("⚠️ {}", e)],
                }
            }
            "ask" => self.ask(rest).await,
            _ => self.convert_text(line),
        };

        SessionReply::Lines(lines)
    }

    fn convert_text(&mut self, line: &str) -> Vec<String> {
        match convert::request_from_text(line) {
            Ok(request) => self.convert(request),
            Err(e @ AppError::Parse(_)) => {
                debug!(error = %e, "unparsed session input");
                vec![format!("⚠️ {}", e), "Type 'help' for commands".to_string()]
            }
            Err(e) => vec![format!("⚠️ {}", e)],
        }
    }

    fn convert(&mut self, request: ConversionRequest) -> Vec<String> {
        let lines = match unit_converter::convert(request.value, &request.from_unit, &request.to_unit) {
            Ok(result) => {
                self.history.record_conversion(&request, &result);
                let response = ConvertUnitsResponse::new(&request, &result, self.decimals);
                vec![convert::success_line(&response)]
            }
            Err(e) => {
                debug!(error = %e, "conversion rejected");
                vec![UNSUPPORTED.to_string(), format!("   {}", e)]
            }
        };
        self.last_request = Some(request);
        lines
    }

    fn history_lines(&self) -> Vec<String> {
        if self.history.is_empty() {
            return vec!["No conversions yet".to_string()];
        }
        self.history.entries().map(|e| format!("- {}", e)).collect()
    }

    async fn ask(&self, question: &str) -> Vec<String> {
        let assistant = match &self.assistant {
            Ok(assistant) => assistant,
            Err(e) => return vec![format!("⚠️ {}", e)],
        };

        match assistant::ask(assistant, question).await {
            Ok(response) => response.answer.lines().map(str::to_string).collect(),
            Err(e) => {
                warn!(error = %e, "assistant request failed");
                vec![format!("⚠️ AI assistant error: {}", e)]
            }
        }
    }

    /// Read commands until EOF or `quit`.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match self.handle_line(&line).await {
                SessionReply::Quit => break,
                SessionReply::Lines(reply) => {
                    for text in reply {
                        output.write_all(text.as_bytes()).await?;
                        output.write_all(b"\n").await?;
                    }
                }
            }
        }
        output.flush().await?;
        Ok(())
    }
}

/// Interactive session over stdin/stdout.
pub async fn run(settings: &AppSettings) -> AppResult<()> {
    let assistant = Assistant::from_config(&settings.assistant_config());
    if let Err(e) = &assistant {
        warn!(error = %e, "assistant disabled for this session");
    }

    let mut session = Session::new(assistant, settings.preferences.result_decimals);
    println!("Unit converter. Type 'help' for commands.");
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::assistant::LlmClient;
    use async_trait::async_trait;
    use std::time::Duration;

    struct EchoClient;

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
            Ok("**Conversion Result**\n5 feet = 1.524 meters".to_string())
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn session() -> Session {
        Session::new(Err(AssistantError::MissingApiKey), 4)
    }

    fn lines(reply: SessionReply) -> Vec<String> {
        match reply {
            SessionReply::Lines(lines) => lines,
            SessionReply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_convert_and_history() {
        let mut session = session();
        assert_eq!(
            lines(session.handle_line("100 celsius to fahrenheit").await),
            vec!["✅ 100 celsius = 212.0000 fahrenheit"]
        );
        assert_eq!(
            lines(session.handle_line("history").await),
            vec!["- 100 celsius → 212.00 fahrenheit"]
        );
    }

    #[tokio::test]
    async fn test_history_keeps_last_five() {
        let mut session = session();
        for i in 1..=7 {
            session.handle_line(&format!("{} meter to foot", i)).await;
        }
        let history = lines(session.handle_line("history").await);
        assert_eq!(history.len(), 5);
        assert!(history[0].starts_with("- 7 meter"));
        assert!(history[4].starts_with("- 3 meter"));
    }

    #[tokio::test]
    async fn test_failures_leave_history_untouched() {
        let mut session = session();
        let reply = lines(session.handle_line("1 meter to gram").await);
        assert_eq!(reply[0], UNSUPPORTED);
        assert!(reply[1].contains("length"));

        let reply = lines(session.handle_line("1 meter to parsec-ish").await);
        assert_eq!(reply[0], UNSUPPORTED);
        assert!(reply[1].contains("Unknown unit"));

        let reply = lines(session.handle_line("hello there").await);
        assert!(reply[0].starts_with("⚠️"));
        assert_eq!(reply[1], "Type 'help' for commands");

        let reply = lines(session.handle_line("1,2,3 meter to foot").await);
        assert!(reply[0].contains("Invalid number"));

        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_last_conversion() {
        let mut session = session();
        assert_eq!(lines(session.handle_line("last").await), vec!["No conversions yet"]);

        session.handle_line("1 meter to foot").await;
        session.handle_line("2 kilogram to pound").await;
        let reply = lines(session.handle_line("last").await);
        assert_eq!(reply.len(), 1);
        assert!(reply[0].starts_with("Last: 2 kilogram → 4.41 pound at "));
        assert!(reply[0].ends_with(" UTC"));
    }

    #[tokio::test]
    async fn test_swap() {
        let mut session = session();
        assert_eq!(lines(session.handle_line("swap").await), vec!["Nothing to swap yet"]);

        session.handle_line("1 mile to kilometer").await;
        assert_eq!(
            lines(session.handle_line("swap").await),
            vec!["✅ 1 kilometer = 0.6214 mile"]
        );
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_units_and_help() {
        let mut session = session();
        assert_eq!(lines(session.handle_line("units").await).len(), 6);
        assert_eq!(
            lines(session.handle_line("units speed").await),
            vec!["Speed: miles per hour, kilometers per hour, meters per second"]
        );
        assert_eq!(
            lines(session.handle_line("units knot").await),
            vec!["Speed: miles per hour, kilometers per hour, meters per second"]
        );
        let all = lines(session.handle_line("units all").await);
        assert_eq!(all.len(), 1);
        assert!(all[0].starts_with("All units: "));
        assert!(all[0].contains("hectare") && all[0].contains("knot"));
        assert!(lines(session.handle_line("HELP").await)[0].starts_with("Commands"));
        assert_eq!(session.handle_line("exit").await, SessionReply::Quit);
    }

    #[tokio::test]
    async fn test_ask_without_and_with_assistant() {
        let mut session = session();
        let reply = lines(session.handle_line("ask 5 feet to meters").await);
        assert!(reply[0].contains("GEMINI_API_KEY"));

        let assistant = Assistant::new(Box::new(EchoClient), Duration::from_secs(5));
        let mut session = Session::new(Ok(assistant), 4);
        assert_eq!(
            lines(session.handle_line("ask 5 feet to meters").await),
            vec!["**Conversion Result**", "5 feet = 1.524 meters"]
        );

        let reply = lines(session.handle_line("ask").await);
        assert!(reply[0].contains("Please enter a conversion query"));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_run_loop() {
        let input: &[u8] = b"1 foot to inch\n\nhistory\nquit\n1 foot to inch\n";
        let mut output = Vec::new();
        let mut session = session();

        session.run(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("✅ 1 foot = 12.0000 inch\n"));
        assert!(text.contains("- 1 foot → 12.00 inch\n"));
        // Input after quit is not processed
        assert_eq!(session.history().len(), 1);
    }
}
