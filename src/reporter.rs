//! # Reporter Module
//!
//! Two-step transmission of click coordinates: X right away, Y after a delay.
//!
//! ```text
//! Idle --click--> SendingX --ok--> WaitY --timer--> SendingY --> Idle
//!                    |                                  |
//!                    +--closed link / write error-------+--> Idle
//! ```

use crate::link::LinkWriter;
use crate::target::Point;
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

/// Transmission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transmission {
    #[default]
    Idle,
    SendingX,
    WaitY,
    SendingY,
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transmission::Idle => write!(f, "idle"),
            Transmission::SendingX => write!(f, "sending X"),
            Transmission::WaitY => write!(f, "waiting for Y"),
            Transmission::SendingY => write!(f, "sending Y"),
        }
    }
}

/// What the caller must do with the Y timer after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    /// Arm (or re-arm) the one-shot Y timer.
    Arm(Duration),
    /// Disarm the Y timer.
    Disarm,
}

/// Encodes a coordinate for the wire: decimal ASCII and a newline.
///
/// ```
/// use hornet_blaster::reporter::encode_coordinate;
///
/// assert_eq!(encode_coordinate(230), b"230\n");
/// assert_eq!(encode_coordinate(-4), b"-4\n");
/// ```
#[must_use]
pub fn encode_coordinate(value: i32) -> Vec<u8> {
    format!("{value}\n").into_bytes()
}

/// Holds the pending click and drives the X/Y handshake.
#[derive(Debug, Clone)]
pub struct ClickReporter {
    pending: Option<Point>,
    state: Transmission,
    y_delay: Duration,
}

impl ClickReporter {
    /// Idle reporter sending Y `y_delay` after X.
    pub fn new(y_delay: Duration) -> Self {
        Self {
            pending: None,
            state: Transmission::Idle,
            y_delay,
        }
    }

    /// Last captured click.
    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    /// Current transmission state.
    pub fn state(&self) -> Transmission {
        self.state
    }

    /// Stores `point` as the pending click and sends its X coordinate.
    ///
    /// Valid in every state; a click during `WaitY` restarts the handshake.
    pub fn click<L: LinkWriter + ?Sized>(&mut self, point: Point, link: &mut L) -> TimerRequest {
        info!("[reporter] Click at {point}");
        self.pending = Some(point);
        self.state = Transmission::SendingX;
        if self.send(link, "X", point.x) {
            self.state = Transmission::WaitY;
            TimerRequest::Arm(self.y_delay)
        } else {
            self.state = Transmission::Idle;
            TimerRequest::Disarm
        }
    }

    /// Sends the pending Y coordinate. Does nothing unless waiting for Y.
    pub fn send_y<L: LinkWriter + ?Sized>(&mut self, link: &mut L) -> TimerRequest {
        if self.state != Transmission::WaitY {
            debug!("[reporter] Y timer fired while {}", self.state);
            return TimerRequest::Disarm;
        }
        let Some(point) = self.pending else {
            self.state = Transmission::Idle;
            return TimerRequest::Disarm;
        };
        self.state = Transmission::SendingY;
        self.send(link, "Y", point.y);
        self.state = Transmission::Idle;
        TimerRequest::Disarm
    }

    fn send<L: LinkWriter + ?Sized>(&self, link: &mut L, axis: &str, value: i32) -> bool {
        if !link.is_open() {
            debug!("[reporter] Serial port not open, {axis} dropped");
            return false;
        }
        match link.write_line(&encode_coordinate(value)) {
            Ok(()) => {
                info!("[reporter] Sent {axis} coordinate: {value}");
                true
            }
            Err(e) => {
                warn!("[reporter] {axis} coordinate not sent: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HornetError;
    use crate::link::MockLinkWriter;
    use mockall::Sequence;
    use mockall::predicate::eq;

    const DELAY: Duration = Duration::from_millis(200);

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_x_then_y() {
        init_logger();
        let mut link = MockLinkWriter::new();
        let mut seq = Sequence::new();
        link.expect_is_open().return_const(true);
        link.expect_write_line()
            .with(eq(b"15\n".as_slice()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        link.expect_write_line()
            .with(eq(b"230\n".as_slice()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut reporter = ClickReporter::new(DELAY);
        assert_eq!(
            reporter.click(Point::new(15, 230), &mut link),
            TimerRequest::Arm(DELAY)
        );
        assert_eq!(reporter.state(), Transmission::WaitY);
        assert_eq!(reporter.send_y(&mut link), TimerRequest::Disarm);
        assert_eq!(reporter.state(), Transmission::Idle);
        assert_eq!(reporter.pending(), Some(Point::new(15, 230)));
    }

    #[test]
    fn test_closed_link_writes_nothing() {
        init_logger();
        let mut link = MockLinkWriter::new();
        link.expect_is_open().return_const(false);
        link.expect_write_line().never();

        let mut reporter = ClickReporter::new(DELAY);
        assert_eq!(
            reporter.click(Point::new(1, 2), &mut link),
            TimerRequest::Disarm
        );
        assert_eq!(reporter.state(), Transmission::Idle);
        assert_eq!(reporter.pending(), Some(Point::new(1, 2)));
    }

    #[test]
    fn test_write_error_returns_to_idle() {
        init_logger();
        let mut link = MockLinkWriter::new();
        link.expect_is_open().return_const(true);
        link.expect_write_line()
            .times(1)
            .returning(|_| Err(HornetError::port_write("device unplugged")));

        let mut reporter = ClickReporter::new(DELAY);
        assert_eq!(
            reporter.click(Point::new(1, 2), &mut link),
            TimerRequest::Disarm
        );
        assert_eq!(reporter.state(), Transmission::Idle);
    }

    #[test]
    fn test_second_click_overwrites_pending() {
        init_logger();
        let mut link = MockLinkWriter::new();
        let mut seq = Sequence::new();
        link.expect_is_open().return_const(true);
        for line in [b"10\n".as_slice(), b"30\n", b"40\n"] {
            link.expect_write_line()
                .with(eq(line))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let mut reporter = ClickReporter::new(DELAY);
        reporter.click(Point::new(10, 20), &mut link);
        reporter.click(Point::new(30, 40), &mut link);
        assert_eq!(reporter.pending(), Some(Point::new(30, 40)));
        reporter.send_y(&mut link);
    }

    #[test]
    fn test_stray_y_timer_is_ignored() {
        init_logger();
        let mut link = MockLinkWriter::new();
        link.expect_write_line().never();
        let mut reporter = ClickReporter::new(DELAY);
        assert_eq!(reporter.send_y(&mut link), TimerRequest::Disarm);
        assert_eq!(reporter.state(), Transmission::Idle);
    }

    #[test]
    fn test_link_closed_before_y() {
        init_logger();
        let mut link = MockLinkWriter::new();
        let mut seq = Sequence::new();
        link.expect_is_open()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);
        link.expect_write_line()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        link.expect_is_open()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(false);

        let mut reporter = ClickReporter::new(DELAY);
        reporter.click(Point::new(5, 6), &mut link);
        assert_eq!(reporter.send_y(&mut link), TimerRequest::Disarm);
        assert_eq!(reporter.state(), Transmission::Idle);
    }
}
