use super::port::available_port_names;
use crate::error::Result;
use log::{error, info};
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast;

/// Asynchronous notification about the open device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// The port vanished from the port list.
    DeviceRemoved(String),
    /// The port is listed again. The link is not reopened.
    DeviceReturned(String),
    /// Listing ports failed.
    Enumeration(String),
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::DeviceRemoved(name) => write!(f, "device {name} removed"),
            LinkEvent::DeviceReturned(name) => write!(f, "device {name} is back"),
            LinkEvent::Enumeration(reason) => write!(f, "cannot list ports: {reason}"),
        }
    }
}

/// Watches `port_name` on a dedicated thread and returns the event stream.
///
/// The watcher stops once every receiver has been dropped.
pub fn spawn_watcher(port_name: String, interval: Duration) -> broadcast::Receiver<LinkEvent> {
    let (tx, rx) = broadcast::channel(16);
    let spawned = std::thread::Builder::new()
        .name("port-watcher".to_string())
        .spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => {
                    runtime.block_on(watch_port(port_name, interval, tx, available_port_names))
                }
                Err(e) => error!("[watch] Failed to start runtime: {e}"),
            }
        });
    if let Err(e) = spawned {
        error!("[watch] Failed to spawn port watcher: {e}");
    }
    rx
}

/// Polls `list_ports` every `interval` and reports presence changes of
/// `port_name`, which is assumed present at start.
pub async fn watch_port<F>(
    port_name: String,
    interval: Duration,
    tx: broadcast::Sender<LinkEvent>,
    mut list_ports: F,
) where
    F: FnMut() -> Result<Vec<String>>,
{
    info!("[watch] Watching {port_name}");
    let mut present = true;
    loop {
        tokio::time::sleep(interval).await;
        let event = match list_ports() {
            Ok(names) => {
                let listed = names.iter().any(|name| *name == port_name);
                let event = match (present, listed) {
                    (true, false) => Some(LinkEvent::DeviceRemoved(port_name.clone())),
                    (false, true) => Some(LinkEvent::DeviceReturned(port_name.clone())),
                    _ => None,
                };
                present = listed;
                event
            }
            Err(e) => Some(LinkEvent::Enumeration(e.to_string())),
        };
        let closed = match event {
            Some(event) => tx.send(event).is_err(),
            None => tx.receiver_count() == 0,
        };
        if closed {
            info!("[watch] No listeners left, stopping");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HornetError;
    use std::collections::VecDeque;

    fn scripted(
        mut script: VecDeque<Result<Vec<String>>>,
        port: &str,
    ) -> impl FnMut() -> Result<Vec<String>> {
        let port = port.to_string();
        move || script.pop_front().unwrap_or_else(|| Ok(vec![port.clone()]))
    }

    #[tokio::test]
    async fn test_reports_removal_and_return() {
        let (tx, mut rx) = broadcast::channel(16);
        let script = VecDeque::from(vec![
            Ok(vec!["COM4".to_string()]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec!["COM4".to_string(), "COM5".to_string()]),
        ]);
        let handle = tokio::spawn(watch_port(
            "COM4".to_string(),
            Duration::from_millis(1),
            tx,
            scripted(script, "COM4"),
        ));

        assert_eq!(
            rx.recv().await.unwrap(),
            LinkEvent::DeviceRemoved("COM4".to_string())
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            LinkEvent::DeviceReturned("COM4".to_string())
        );
        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reports_enumeration_failure() {
        let (tx, mut rx) = broadcast::channel(16);
        let script = VecDeque::from(vec![Err(HornetError::link_unavailable("no driver"))]);
        let handle = tokio::spawn(watch_port(
            "COM4".to_string(),
            Duration::from_millis(1),
            tx,
            scripted(script, "COM4"),
        ));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, LinkEvent::Enumeration(ref reason) if reason.contains("no driver")));
        drop(rx);
        handle.await.unwrap();
    }

    #[test]
    fn test_event_display() {
        let event = LinkEvent::DeviceRemoved("COM4".to_string());
        assert_eq!(event.to_string(), "device COM4 removed");
    }
}
