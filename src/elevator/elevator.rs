/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use super::queue::RequestQueue;
use crate::events::{Event, EventSink};
use crate::shared::{Direction, ElevatorStatus, Floor, Request};

/// Every elevator of the bank, in ascending id order. Fixed after start-up.
pub type Fleet = Arc<[Arc<Elevator>]>;

/**
 * One elevator car and its request queue.
 *
 * The `Elevator` is shared between the dispatcher, which calls `enqueue`, and the
 * elevator's own worker thread running `run`. Both go through the same mutex.
 *
 * # Fields
 * - `id`:              Stable 1-based id.
 * - `travel_time`:     Time spent moving one floor.
 * - `sink`:            Receives the elevator's status events.
 * - `state`:           Floor, direction, queue and busy flag.
 * - `wake_tx/wake_rx`: Signals the parked worker that a request was queued.
 */
pub struct Elevator {
    id: usize,
    travel_time: Duration,
    sink: Arc<dyn EventSink>,
    state: Mutex<ElevatorState>,
    wake_tx: cbc::Sender<()>,
    wake_rx: cbc::Receiver<()>,
}

struct ElevatorState {
    floor: Floor,
    direction: Direction,
    queue: RequestQueue,
    busy: bool,
    leg: Leg,
}

/// The worker was told to stop while paused between floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Pickup,
    Dropoff,
}

impl Elevator {
    pub fn new(id: usize, travel_time: Duration, sink: Arc<dyn EventSink>) -> Elevator {
        let (wake_tx, wake_rx) = cbc::bounded::<()>(1);
        Elevator {
            id,
            travel_time,
            sink,
            state: Mutex::new(ElevatorState {
                floor: 1,
                direction: Direction::Stop,
                queue: RequestQueue::new(),
                busy: false,
                leg: Leg::Pickup,
            }),
            wake_tx,
            wake_rx,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> Floor {
        self.state().floor
    }

    pub fn is_idle(&self) -> bool {
        let state = self.state();
        state.queue.is_empty() && !state.busy
    }

    pub fn is_request_on_the_way(&self, request: &Request) -> bool {
        self.state().queue.contains(request)
    }

    pub fn pending_requests_count(&self) -> usize {
        self.state().queue.len()
    }

    /// Queue order, head first
    pub fn queued_requests(&self) -> Vec<Request> {
        self.state().queue.iter().copied().collect()
    }

    pub fn status(&self) -> ElevatorStatus {
        let state = self.state();
        ElevatorStatus {
            id: self.id,
            floor: state.floor,
            direction: state.direction,
            pending: state.queue.len(),
            busy: state.busy,
        }
    }

    /// Adds `request` to the queue, ordered by distance to its pickup floor.
    ///
    /// Returns false and emits `DuplicateRequest` if an equal request is already queued.
    pub fn enqueue(&self, request: Request) -> bool {
        let inserted = {
            let mut state = self.state();
            let floor = state.floor;
            state.queue.insert(request, floor)
        };

        if !inserted {
            self.sink.emit(Event::DuplicateRequest {
                elevator: self.id,
                request,
            });
            return false;
        }

        // A full channel already holds a pending wake-up
        let _ = self.wake_tx.try_send(());
        true
    }

    /**
     * Worker loop. Drains the queue, then parks until `enqueue` wakes it.
     *
     * Returns when `terminate_rx` fires or its sender is dropped. A request that
     * was being serviced stays at the head of the queue, and a later call to
     * `run` continues it from the current floor.
     */
    pub fn run(self: Arc<Self>, fleet: Fleet, terminate_rx: cbc::Receiver<()>) {
        debug!("Elevator {} worker started", self.id);
        loop {
            if self.pending_requests_count() > 0 {
                if self.process_requests(&fleet, &terminate_rx).is_err() {
                    info!("Elevator {} interrupted at floor {}", self.id, self.current_floor());
                    return;
                }
            } else {
                cbc::select! {
                    recv(self.wake_rx) -> _ => {}
                    recv(terminate_rx) -> _ => {
                        debug!("Elevator {} worker stopped", self.id);
                        return;
                    }
                }
            }
        }
    }

    fn process_requests(
        &self,
        fleet: &[Arc<Elevator>],
        terminate_rx: &cbc::Receiver<()>,
    ) -> Result<(), Interrupted> {
        while let Some((request, leg)) = self.begin_service() {
            if leg == Leg::Pickup {
                self.travel(request.start_floor(), terminate_rx)?;
                self.arrive(request.start_floor(), Leg::Pickup);
                self.state().leg = Leg::Dropoff;
            }

            self.travel(request.end_floor(), terminate_rx)?;
            self.arrive(request.end_floor(), Leg::Dropoff);

            let drained = {
                let mut state = self.state();
                state.queue.finish_service();
                state.direction = Direction::Stop;
                let drained = state.queue.is_empty();
                if !drained {
                    state.busy = false;
                }
                drained
            };

            if drained {
                self.sink.emit(Event::QueueDrained { elevator: self.id });
                self.sink.emit(Event::FleetSnapshot {
                    elevators: fleet.iter().map(|e| e.status()).collect(),
                });
                self.state().busy = false;
            }
        }
        Ok(())
    }

    /// Returns the request to service and the leg to continue with
    fn begin_service(&self) -> Option<(Request, Leg)> {
        let mut state = self.state();
        if let Some(request) = state.queue.in_service().copied() {
            // Resuming after an interruption
            return Some((request, state.leg));
        }

        let request = state.queue.begin_service();
        state.busy = request.is_some();
        state.leg = Leg::Pickup;
        request.map(|r| (r, Leg::Pickup))
    }

    /// Moves one floor per tick until `target` is reached
    fn travel(&self, target: Floor, terminate_rx: &cbc::Receiver<()>) -> Result<(), Interrupted> {
        loop {
            let direction = {
                let mut state = self.state();
                let floor = state.floor;
                state.direction = Direction::towards(floor, target);
                state.direction
            };
            if direction == Direction::Stop {
                return Ok(());
            }

            self.pace(terminate_rx)?;

            let floor = {
                let mut state = self.state();
                state.floor += direction.step();
                state.floor
            };
            self.sink.emit(Event::FloorReached {
                elevator: self.id,
                floor,
            });
        }
    }

    fn arrive(&self, floor: Floor, leg: Leg) {
        self.sink.emit(Event::Stopped {
            elevator: self.id,
            floor,
        });
        let event = match leg {
            Leg::Pickup => Event::PickedUp {
                elevator: self.id,
                floor,
            },
            Leg::Dropoff => Event::DroppedOff {
                elevator: self.id,
                floor,
            },
        };
        self.sink.emit(event);
    }

    fn pace(&self, terminate_rx: &cbc::Receiver<()>) -> Result<(), Interrupted> {
        cbc::select! {
            recv(terminate_rx) -> _ => Err(Interrupted),
            default(self.travel_time) => Ok(()),
        }
    }

    // Recovers the state from a poisoned lock
    fn state(&self) -> MutexGuard<'_, ElevatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
