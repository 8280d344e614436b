//! Panel session: the message contract between a control panel and the core.
//!
//! Messages are JSON objects tagged by `type`. The panel pings, receives a
//! [`HostMessage::Bootstrap`] with the collection snapshot, and then sends
//! export requests. The core handles one message at a time and answers each
//! with zero or more host messages.
//!
//! ```text
//! panel                         core
//!   | --- UI_PING ---------------> |
//!   | <-------------- BOOTSTRAP -- |
//!   | --- EXPORT_REQUEST --------> |
//!   | <------------ EXPORT_DONE -- |   (or EXPORT_ERROR / NOTICE)
//! ```
//!
//! With the `serve` feature, [`serve`] runs the session as JSON lines over
//! any async reader/writer pair (stdin/stdout in the CLI).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::{build_export_model, exporter_for, ExportError, ExportOptions, ExportRequest, OutputFormat};
use crate::registry::VariableSource;
use crate::snapshot::{build_snapshot, CollectionInfo};

/// Session transport error
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the message stream failed
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A line was not a valid panel message
    #[error("invalid panel message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Messages sent by the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelMessage {
    /// Panel is ready; answered with a bootstrap
    UiPing {},
    /// Run an export. The request fields sit next to `type` or inside `data`.
    ExportRequest(#[serde(deserialize_with = "export_request_envelope")] ExportRequest),
    /// Diagnostic line from the panel, relayed to the log
    UiLog {
        #[serde(default)]
        level: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

fn export_request_envelope<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ExportRequest, D::Error> {
    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Data {
        data: ExportRequest,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Envelope {
        Wrapped(Data),
        Flat(ExportRequest),
    }

    Ok(match Envelope::deserialize(deserializer)? {
        Envelope::Wrapped(Data { data }) => data,
        Envelope::Flat(request) => request,
    })
}

/// Messages sent to the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    Bootstrap { collections: Vec<CollectionInfo> },
    ExportDone {},
    ExportError { error: String },
    Notice { message: String },
}

/// Decode one panel message from a JSON line.
pub fn decode_message(line: &str) -> Result<PanelMessage, SessionError> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Encode one host message as a single JSON line (no trailing newline).
pub fn encode_message(message: &HostMessage) -> Result<String, SessionError> {
    Ok(serde_json::to_string(message)?)
}

/// Session state: the document, and where exports are written.
pub struct Session<S: VariableSource> {
    source: S,
    format: OutputFormat,
    options: ExportOptions,
    output: PathBuf,
}

impl<S: VariableSource> Session<S> {
    /// Create a session writing exports to `output` in `format`.
    pub fn new(source: S, format: OutputFormat, output: impl Into<PathBuf>) -> Self {
        Self { source, format, options: ExportOptions::default(), output: output.into() }
    }

    /// Builder-style helper to set writer options
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Where exports are written
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Collection snapshot message, sent on open and on ping.
    pub fn bootstrap(&self) -> HostMessage {
        HostMessage::Bootstrap {
            collections: build_snapshot(self.source.list_variables(), self.source.list_collections()),
        }
    }

    /// Handle one panel message.
    ///
    /// Export failures never escape: nothing to export becomes a notice
    /// followed by `EXPORT_DONE`, anything else becomes `EXPORT_ERROR`.
    pub fn handle(&mut self, message: PanelMessage) -> Vec<HostMessage> {
        match message {
            PanelMessage::UiPing {} => vec![self.bootstrap()],
            PanelMessage::ExportRequest(request) => match self.run_export(&request) {
                Ok(()) => vec![HostMessage::ExportDone {}],
                Err(ExportError::NothingToExport) => vec![
                    HostMessage::Notice { message: ExportError::NothingToExport.to_string() },
                    HostMessage::ExportDone {},
                ],
                Err(e) => {
                    log::error!("export failed: {}", e);
                    vec![HostMessage::ExportError { error: e.to_string() }]
                }
            },
            PanelMessage::UiLog { level, args } => {
                relay_log(&level, &args);
                Vec::new()
            }
        }
    }

    fn run_export(&self, request: &ExportRequest) -> Result<(), ExportError> {
        let model = build_export_model(&self.source, request)?;
        exporter_for(self.format).export(&model, &self.output, &self.options)
    }
}

/// Forward a panel log line to the `log` facade under the `panel` target.
fn relay_log(level: &str, args: &[Value]) {
    let text = args
        .iter()
        .map(|a| match a {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let level = match level.to_ascii_lowercase().as_str() {
        "error" => log::Level::Error,
        "warn" | "warning" => log::Level::Warn,
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        _ => log::Level::Info,
    };
    log::log!(target: "panel", level, "{}", text);
}

/// Run a session as JSON lines until the reader closes.
///
/// A reader task feeds lines into a channel; this loop takes them one at a
/// time and writes every response before reading the next. A bootstrap is
/// written before any input is read. Undecodable lines are logged and skipped.
#[cfg(feature = "serve")]
pub async fn serve<S, R, W>(mut session: Session<S>, reader: R, mut writer: W) -> Result<(), SessionError>
where
    S: VariableSource,
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::sync::mpsc;

    let (tx, mut rx) = mpsc::channel::<std::io::Result<String>>(32);
    let reader_task = tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    // Invalid UTF-8 becomes replacement characters and fails to decode below
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(Ok(line)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tx.send(Err(e)).await.ok();
                    break;
                }
            }
        }
    });

    write_message(&mut writer, &session.bootstrap()).await?;

    while let Some(line) = rx.recv().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let message = match decode_message(&line) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        log::debug!("panel message: {:?}", message);
        for response in session.handle(message) {
            write_message(&mut writer, &response).await?;
        }
    }

    writer.shutdown().await?;
    reader_task.await.ok();
    Ok(())
}

#[cfg(feature = "serve")]
async fn write_message<W>(writer: &mut W, message: &HostMessage) -> Result<(), SessionError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::AsyncWriteExt;

    let mut line = encode_message(message)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Collection, Mode, Variable, VariableValue};
    use crate::registry::Document;
    use tempfile::TempDir;

    fn sample_document() -> Document {
        Document::new(
            vec![
                Collection::new("c1", "Colors", vec![Mode::new("m1", "Light")]),
                Collection::new("c2", "Empty", vec![Mode::new("m2", "Default")]),
            ],
            vec![
                Variable::new("v1", "Brand/Primary", "c1").with_value("m1", true),
                Variable::new("v2", "Brand/Alias", "c1").with_value("m1", VariableValue::alias("v1")),
            ],
        )
    }

    #[test]
    fn test_decode_panel_messages() {
        assert_eq!(decode_message(r#"{"type":"UI_PING"}"#).unwrap(), PanelMessage::UiPing {});

        let msg = decode_message(r#"{"type":"EXPORT_REQUEST","includeByCollection":{"c2":false},"skipEmpty":true}"#)
            .unwrap();
        match msg {
            PanelMessage::ExportRequest(request) => {
                assert!(!request.includes("c2"));
                assert!(request.skip_empty);
            }
            other => panic!("unexpected message {:?}", other),
        }

        let msg = decode_message(r#"{"type":"UI_LOG","level":"warn","args":["x",1]}"#).unwrap();
        assert!(matches!(msg, PanelMessage::UiLog { ref level, .. } if level == "warn"));

        assert!(decode_message(r#"{"type":"NOPE"}"#).is_err());
    }

    #[test]
    fn test_export_request_in_data_envelope() {
        let msg = decode_message(
            r#"{"type":"EXPORT_REQUEST","data":{"includeByCollection":{"c1":false,"c2":true},"skipEmpty":true}}"#,
        )
        .unwrap();
        let mut expected = ExportRequest::default().exclude("c1").with_skip_empty(true);
        expected.include_by_collection.insert("c2".to_string(), true);
        assert_eq!(msg, PanelMessage::ExportRequest(expected));

        assert_eq!(
            decode_message(r#"{"type":"EXPORT_REQUEST","data":{}}"#).unwrap(),
            PanelMessage::ExportRequest(ExportRequest::default())
        );
    }

    #[test]
    fn test_export_request_rejects_unknown_fields() {
        assert!(decode_message(r#"{"type":"EXPORT_REQUEST","skipEmpty":true,"includes":{}}"#).is_err());
        assert!(decode_message(r#"{"type":"EXPORT_REQUEST","payload":{"skipEmpty":true}}"#).is_err());
        assert!(decode_message(r#"{"type":"EXPORT_REQUEST","data":{"skip":true}}"#).is_err());
    }

    #[test]
    fn test_encode_host_messages() {
        assert_eq!(encode_message(&HostMessage::ExportDone {}).unwrap(), r#"{"type":"EXPORT_DONE"}"#);
        let json = encode_message(&HostMessage::ExportError { error: "boom".to_string() }).unwrap();
        assert_eq!(json, r#"{"type":"EXPORT_ERROR","error":"boom"}"#);
    }

    #[test]
    fn test_ping_answers_bootstrap() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::new(sample_document(), OutputFormat::Json, temp.path().join("out.json"));

        let responses = session.handle(PanelMessage::UiPing {});
        assert_eq!(responses.len(), 1);
        match &responses[0] {
            HostMessage::Bootstrap { collections } => {
                assert_eq!(collections.len(), 2);
                assert_eq!(collections[0].variable_count, 2);
                assert_eq!(collections[1].variable_count, 0);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_export_request_writes_output() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.json");
        let mut session = Session::new(sample_document(), OutputFormat::Json, &out);

        let responses = session.handle(PanelMessage::ExportRequest(ExportRequest::default().with_skip_empty(true)));
        assert_eq!(responses, vec![HostMessage::ExportDone {}]);

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["cards"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_nothing_to_export_is_notice_then_done() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.md");
        let mut session = Session::new(Document::default(), OutputFormat::Markdown, &out);

        let responses = session.handle(PanelMessage::ExportRequest(ExportRequest::default()));
        assert_eq!(responses.len(), 2);
        assert!(matches!(responses[0], HostMessage::Notice { .. }));
        assert_eq!(responses[1], HostMessage::ExportDone {});
        assert!(!out.exists());
    }

    #[test]
    fn test_unwritable_output_is_export_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut session = Session::new(sample_document(), OutputFormat::Markdown, blocker.join("out.md"));

        let responses = session.handle(PanelMessage::ExportRequest(ExportRequest::default()));
        assert_eq!(responses.len(), 1);
        assert!(matches!(responses[0], HostMessage::ExportError { .. }));
    }

    #[test]
    fn test_ui_log_has_no_response() {
        let temp = TempDir::new().unwrap();
        let mut session = Session::new(sample_document(), OutputFormat::Markdown, temp.path().join("o.md"));
        let responses = session.handle(PanelMessage::UiLog {
            level: "info".to_string(),
            args: vec![Value::from("hello")],
        });
        assert!(responses.is_empty());
    }

    #[cfg(feature = "serve")]
    #[tokio::test]
    async fn test_serve_processes_lines_in_order() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.md");
        let session = Session::new(sample_document(), OutputFormat::Markdown, &out);

        let input = concat!(
            "{\"type\":\"UI_PING\"}\n",
            "not json\n",
            "\n",
            "{\"type\":\"EXPORT_REQUEST\",\"includeByCollection\":{},\"skipEmpty\":false}\n",
        );
        let reader = std::io::Cursor::new(input.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        serve(session, reader, &mut output).await.unwrap();

        let lines: Vec<HostMessage> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(matches!(lines[0], HostMessage::Bootstrap { .. }));
        assert!(matches!(lines[1], HostMessage::Bootstrap { .. }));
        assert_eq!(lines[2], HostMessage::ExportDone {});
        assert!(std::fs::read_to_string(&out).unwrap().contains("## Colors"));
    }

    #[cfg(feature = "serve")]
    #[tokio::test]
    async fn test_serve_skips_invalid_utf8_lines() {
        let temp = TempDir::new().unwrap();
        let session = Session::new(sample_document(), OutputFormat::Markdown, temp.path().join("out.md"));

        let mut input: Vec<u8> = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(b"{\"type\":\"UI_PING\"}\n");
        input.extend_from_slice(b"{\"type\":\"UI_PING\"}");
        let mut output: Vec<u8> = Vec::new();
        serve(session, std::io::Cursor::new(input), &mut output).await.unwrap();

        let lines: Vec<HostMessage> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|m| matches!(m, HostMessage::Bootstrap { .. })));
    }

    #[test]
    fn test_session_output_path() {
        let session = Session::new(sample_document(), OutputFormat::Json, "build/vars.json");
        assert_eq!(session.output(), Path::new("build/vars.json"));
    }
}
