//! Interactive relay session.

use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::ClientError;

/// What the user asked for with one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send the line as a text frame
    Send(String),
    /// Leave the session
    Quit,
}

enum Input {
    Line(String),
    Eof,
    Failed(ReadlineError),
}

/// Interpret one line typed by the user. Blank lines are ignored.
pub fn parse_line(line: &str) -> Option<Command> {
    if line.trim() == "/quit" {
        return Some(Command::Quit);
    }
    if line.trim().is_empty() {
        return None;
    }
    Some(Command::Send(line.to_string()))
}

/// Text to print for an incoming frame, `None` for control frames.
pub fn render_incoming(msg: &Message) -> Option<String> {
    match msg {
        Message::Text(text) => Some(text.as_str().to_owned()),
        Message::Binary(bytes) => Some(format!("<binary: {} bytes>", bytes.len())),
        Message::Close(Some(frame)) => Some(format!(
            "*** connection closed by relay ({}: {})",
            u16::from(frame.code),
            frame.reason.as_str()
        )),
        Message::Close(None) => Some("*** connection closed by relay".to_string()),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
    }
}

/// Read stdin lines on a dedicated thread; rustyline blocks.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = tx.send(Input::Failed(e));
                return;
            }
        };

        loop {
            match editor.readline("") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.send(Input::Eof);
                    break;
                }
                Err(e) => {
                    let _ = tx.send(Input::Failed(e));
                    break;
                }
            }
        }
    });

    rx
}

/// Connect to `url` and run the interactive session until the user quits
/// or the relay closes the connection.
pub async fn run_client(url: &str) -> Result<(), ClientError> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|source| ClientError::Connect {
            url: url.to_string(),
            source,
        })?;
    tracing::info!("Connected to {}", url);
    println!("*** connected to {url} (type /quit to leave)");

    let (mut write, mut read) = ws.split();
    let mut input = spawn_input_reader();

    loop {
        tokio::select! {
            event = input.recv() => match event {
                Some(Input::Line(line)) => match parse_line(&line) {
                    Some(Command::Send(text)) => write.send(Message::text(text)).await?,
                    Some(Command::Quit) => break,
                    None => {}
                },
                Some(Input::Failed(e)) => {
                    let _ = write.close().await;
                    return Err(e.into());
                }
                Some(Input::Eof) | None => break,
            },
            incoming = read.next() => match incoming {
                Some(Ok(msg)) => {
                    if let Some(line) = render_incoming(&msg) {
                        println!("{line}");
                    }
                    if msg.is_close() {
                        return Ok(());
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    println!("*** connection closed");
                    return Ok(());
                }
            }
        }
    }

    if let Err(e) = write.close().await {
        tracing::debug!("Failed to close connection cleanly: {}", e);
    }
    println!("*** leaving");
    Ok(())
}
