use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::{trace, warn};

use crate::{HostMessage, UiMessage};

/// Creates a connected pair of endpoints. Delivery is in order per direction.
pub fn bridge() -> (HostEndpoint, UiEndpoint) {
    let (to_ui, from_host) = mpsc::channel();
    let (to_host, from_ui) = mpsc::channel();
    (
        HostEndpoint {
            outbox: to_ui,
            inbox: from_ui,
        },
        UiEndpoint {
            outbox: to_host,
            inbox: from_host,
        },
    )
}

/// The privileged side: owns files, dialogs and the window.
#[derive(Debug)]
pub struct HostEndpoint {
    outbox: Sender<HostMessage>,
    inbox: Receiver<UiMessage>,
}

impl HostEndpoint {
    pub fn send(&self, message: HostMessage) {
        let channel = message.channel();
        trace!("host -> ui: {channel}");
        if self.outbox.send(message).is_err() {
            warn!("UI endpoint closed, dropping {channel}");
        }
    }

    /// Messages from the UI received so far, without blocking.
    pub fn drain(&self) -> Vec<UiMessage> {
        drain(&self.inbox)
    }
}

/// The isolated side: only sees what the host forwards.
#[derive(Debug)]
pub struct UiEndpoint {
    outbox: Sender<UiMessage>,
    inbox: Receiver<HostMessage>,
}

impl UiEndpoint {
    pub fn send(&self, message: UiMessage) {
        let channel = message.channel();
        trace!("ui -> host: {channel}");
        if self.outbox.send(message).is_err() {
            warn!("Host endpoint closed, dropping {channel}");
        }
    }

    pub fn drain(&self) -> Vec<HostMessage> {
        drain(&self.inbox)
    }
}

fn drain<T>(inbox: &Receiver<T>) -> Vec<T> {
    let mut messages = Vec::new();
    loop {
        match inbox.try_recv() {
            Ok(message) => messages.push(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn messages_arrive_in_order() {
        let (host, ui) = bridge();
        host.send(HostMessage::ClearAll);
        host.send(HostMessage::LoadHtml("<p>x</p>".into()));
        host.send(HostMessage::SwapPanels);

        let received: Vec<_> = ui.drain().iter().map(HostMessage::channel).collect();
        assert_eq!(received, vec!["clear-all", "load-html", "swap-panels"]);
        assert!(ui.drain().is_empty());
    }

    #[test]
    fn ui_replies_reach_host() {
        let (host, ui) = bridge();
        ui.send(UiMessage::SaveMarkdownContent {
            path: PathBuf::from("out.md"),
            content: "# hi".into(),
        });
        assert_eq!(host.drain().len(), 1);
    }

    #[test]
    fn sending_to_a_closed_peer_does_not_panic() {
        let (host, ui) = bridge();
        drop(ui);
        host.send(HostMessage::ShowHistory);
        assert!(host.drain().is_empty());
    }
}
