//! Line-delimited JSON host protocol
//!
//! The host writes one [`HostEvent`] JSON object per line; the tracker
//! answers with one [`HostCommand`] JSON object per line. Malformed input
//! lines are logged and skipped so a single bad message never stops the
//! stream.

use async_trait::async_trait;
use backsearch_core::*;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::events::{HostEvent, HostEventSender};
use crate::traits::TabController;

/// Message delimiter for framing
const MESSAGE_DELIMITER: u8 = b'\n';

/// Commands sent from the tracker back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    /// Set a tab's url
    Navigate(NavigateRequest),
}

/// Decode one protocol line into an event
pub fn decode_event(line: &str) -> Result<HostEvent> {
    serde_json::from_str(line.trim()).map_err(|e| {
        HostError::Protocol {
            details: e.to_string(),
        }
        .into()
    })
}

/// Encode a command as a newline-terminated protocol line
pub fn encode_command(command: &HostCommand) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(command)?;
    bytes.push(MESSAGE_DELIMITER);
    Ok(bytes)
}

/// Statistics for one run of [`forward_events`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub forwarded: usize,
    pub skipped: usize,
}

/// Read events from `reader` until EOF and push them onto the event queue
///
/// Returns once the input ends. Lines that are not UTF-8 or not a known
/// event are skipped. Fails if the reader errors or the queue's consumer has
/// gone away.
pub async fn forward_events<R>(mut reader: R, sender: &HostEventSender) -> Result<ForwardStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ForwardStats::default();
    let mut frame = Vec::new();

    loop {
        frame.clear();
        if reader.read_until(MESSAGE_DELIMITER, &mut frame).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&frame) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping host message that is not UTF-8: {}", e);
                stats.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match decode_event(line) {
            Ok(event) => {
                debug!(kind = event.kind(), tab_id = ?event.tab_id(), "Received host event");
                sender.send(event).await?;
                stats.forwarded += 1;
            }
            Err(e) => {
                warn!("Skipping malformed host message: {}", e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Tab controller that writes navigation commands to a line-oriented sink
pub struct LineTabController<W> {
    writer: Mutex<W>,
}

impl<W> LineTabController<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the controller and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> TabController for LineTabController<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn navigate_tab(&self, request: &NavigateRequest) -> Result<()> {
        let bytes = encode_command(&HostCommand::Navigate(request.clone()))?;
        let rejected = |e: std::io::Error| -> BackSearchError {
            HostError::NavigationRejected {
                tab_id: request.tab_id,
                reason: e.to_string(),
            }
            .into()
        };

        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await.map_err(rejected)?;
        writer.flush().await.map_err(rejected)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;

    #[test]
    fn test_encode_navigate_command() {
        let bytes = encode_command(&HostCommand::Navigate(NavigateRequest {
            tab_id: TabId(4),
            url: "https://google.com/search?q=x".to_string(),
        }))
        .unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"type\":\"navigate\",\"tabId\":4,\"url\":\"https://google.com/search?q=x\"}\n"
        );
    }

    #[test]
    fn test_decode_malformed_line() {
        let err = decode_event("{\"type\":").unwrap_err();
        assert!(matches!(
            err,
            BackSearchError::Host {
                source: HostError::Protocol { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_forward_events_skips_bad_lines() {
        let input = concat!(
            "{\"type\":\"tabRemoved\",\"tabId\":1}\n",
            "\n",
            "not json\n",
            "{\"type\":\"settingsChanged\",\"keys\":[\"excludeDomains\"]}\n",
        );
        let (sender, mut receiver) = event_channel(8);

        let stats = forward_events(input.as_bytes(), &sender).await.unwrap();

        assert_eq!(stats, ForwardStats { forwarded: 2, skipped: 1 });
        assert_eq!(receiver.recv().await.unwrap(), HostEvent::TabRemoved { tab_id: TabId(1) });
        assert_eq!(receiver.recv().await.unwrap().kind(), "settings_changed");
    }

    #[tokio::test]
    async fn test_forward_events_skips_invalid_utf8() {
        let mut input = b"{\"type\":\"tabRemoved\",\"tabId\":1}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"type\":\"tabRemoved\",\"tabId\":2}");
        let (sender, mut receiver) = event_channel(8);

        let stats = forward_events(input.as_slice(), &sender).await.unwrap();

        assert_eq!(stats, ForwardStats { forwarded: 2, skipped: 1 });
        assert_eq!(receiver.recv().await.unwrap(), HostEvent::TabRemoved { tab_id: TabId(1) });
        assert_eq!(receiver.recv().await.unwrap(), HostEvent::TabRemoved { tab_id: TabId(2) });
    }

    #[tokio::test]
    async fn test_forward_events_fails_without_consumer() {
        let (sender, receiver) = event_channel(1);
        drop(receiver);

        let result = forward_events("{\"type\":\"tabRemoved\",\"tabId\":1}\n".as_bytes(), &sender).await;

        assert!(matches!(
            result,
            Err(BackSearchError::Host {
                source: HostError::ChannelClosed
            })
        ));
    }

    #[tokio::test]
    async fn test_line_tab_controller_writes_commands() {
        let controller = LineTabController::new(Vec::new());
        let request = NavigateRequest {
            tab_id: TabId(2),
            url: "https://bing.com/search?q=a".to_string(),
        };

        controller.navigate_tab(&request).await.unwrap();
        controller.navigate_tab(&request).await.unwrap();

        let output = String::from_utf8(controller.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let command: HostCommand = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(command, HostCommand::Navigate(request));
    }
}
