/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};

/***************************************/
/*           Local modules             */
/***************************************/
use super::event::Event;

/***************************************/
/*             Public API              */
/***************************************/

/// Receives status events from the dispatcher and every elevator thread.
///
/// Implementations are shared between threads and must keep each event whole.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/**
 * Forwards events over a crossbeam channel.
 *
 * A single receiver consumes the events in order, so output from concurrent
 * elevators is serialized one event at a time.
 */
#[derive(Clone)]
pub struct ChannelSink {
    event_tx: cbc::Sender<Event>,
}

impl ChannelSink {
    pub fn new(event_tx: cbc::Sender<Event>) -> ChannelSink {
        ChannelSink { event_tx }
    }

    /// Creates a sink together with the receiving end of its channel
    pub fn unbounded() -> (ChannelSink, cbc::Receiver<Event>) {
        let (event_tx, event_rx) = cbc::unbounded::<Event>();
        (ChannelSink::new(event_tx), event_rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        // Nobody listening anymore, the event is dropped
        if let Err(e) = self.event_tx.send(event) {
            debug!("Event receiver gone, dropping: {}", e.into_inner());
        }
    }
}

/// Writes every event as one `info` log record.
#[derive(Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        info!(target: "elevator_bank::events", "{}", event);
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
