//! Line-driven live input for `settle live`
//!
//! Each line is the full new value of the field. Lines starting with `:` are
//! commands:
//! - `:enter` / `:blur` force a pending notification
//! - `:key <name>` presses a named key
//! - `:set <value>` pushes an owner value
//! - `:quit` tears the input down
//!
//! Use `::text` to type a value that starts with a colon.

use anyhow::Result;
use settle_core::{InputOptions, Key};
use settle_driver::OnChange;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveCommand {
    Edit(String),
    Key(Key),
    Blur,
    External(String),
    Quit,
}

impl LiveCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        let Some(command) = line.strip_prefix(':') else {
            return LiveCommand::Edit(line.to_string());
        };

        if let Some(escaped) = command.strip_prefix(':') {
            return LiveCommand::Edit(format!(":{}", escaped));
        }

        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (command, ""),
        };

        match name {
            "enter" => LiveCommand::Key(Key::Enter),
            "key" => LiveCommand::Key(Key::from_name(arg)),
            "blur" => LiveCommand::Blur,
            "set" => LiveCommand::External(arg.to_string()),
            "quit" | "q" => LiveCommand::Quit,
            _ => LiveCommand::Edit(line.to_string()),
        }
    }
}

/// Feed lines from `reader` into a driven input until EOF or `:quit`
///
/// The input is torn down at the end, flushing any pending edit to `sink`.
pub async fn run<R, S>(options: InputOptions, initial: &str, reader: R, sink: S) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: OnChange,
{
    let input = settle_driver::spawn(options, initial, sink);
    let mut lines = reader.lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = LiveCommand::parse(&line);
                debug!(?command, "live command");

                match command {
                    LiveCommand::Edit(value) => input.edit(value)?,
                    LiveCommand::Key(key) => input.key_down(key)?,
                    LiveCommand::Blur => input.blur()?,
                    LiveCommand::External(value) => input.external_value(value)?,
                    LiveCommand::Quit => break,
                }
            }
            _ = &mut ctrl_c => {
                debug!("interrupted, tearing down");
                break;
            }
        }
    }

    input.teardown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_core::{Notification, Trigger};
    use settle_driver::ChannelSink;

    #[test]
    fn test_parse_commands() {
        assert_eq!(LiveCommand::parse("hello"), LiveCommand::Edit("hello".to_string()));
        assert_eq!(LiveCommand::parse(""), LiveCommand::Edit(String::new()));
        assert_eq!(LiveCommand::parse(":enter"), LiveCommand::Key(Key::Enter));
        assert_eq!(LiveCommand::parse(":key Tab"), LiveCommand::Key(Key::Other("Tab".to_string())));
        assert_eq!(LiveCommand::parse(":blur"), LiveCommand::Blur);
        assert_eq!(
            LiveCommand::parse(":set from owner"),
            LiveCommand::External("from owner".to_string())
        );
        assert_eq!(LiveCommand::parse(":quit"), LiveCommand::Quit);
        assert_eq!(LiveCommand::parse("::enter"), LiveCommand::Edit(":enter".to_string()));
        assert_eq!(LiveCommand::parse(":unknown"), LiveCommand::Edit(":unknown".to_string()));
    }

    #[tokio::test]
    async fn test_run_flushes_on_eof() {
        let (sink, mut rx) = ChannelSink::channel();
        let options = InputOptions {
            delay_timeout_ms: 60_000,
            ..Default::default()
        };

        run(options, "", &b"r\nru\nrust\n"[..], sink).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Notification::new("rust", Trigger::Teardown));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_run_enter_then_quit() {
        let (sink, mut rx) = ChannelSink::channel();
        let options = InputOptions {
            delay_timeout_ms: 60_000,
            ..Default::default()
        };

        run(options, "", &b"abc\n:enter\n:quit\nignored\n"[..], sink)
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap(), Notification::new("abc", Trigger::Enter));
        assert!(rx.recv().await.is_none());
    }
}
