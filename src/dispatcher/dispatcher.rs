/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::{Elevator, Fleet};
use crate::events::{Event, EventSink};
use crate::shared::{DispatchError, ElevatorStatus, Floor, Request};

/**
 * Owns the bank of elevators and routes every request to exactly one of them.
 *
 * # Fields
 * - `fleet`:       Elevators in ascending id order, fixed once initialized.
 * - `sink`:        Receives dispatch events, shared with every elevator.
 * - `travel_time`: Floor travel time handed to each elevator.
 * - `started`:     Set by the first call to `start`.
 * - `workers`:     Worker threads with their terminate channels.
 */
pub struct ElevatorSystem {
    fleet: Fleet,
    sink: Arc<dyn EventSink>,
    travel_time: Duration,
    started: AtomicBool,
    workers: Mutex<Vec<Worker>>,
}

struct Worker {
    id: usize,
    handle: JoinHandle<()>,
    terminate_tx: cbc::Sender<()>,
}

impl ElevatorSystem {
    pub fn new(config: &ElevatorConfig, sink: Arc<dyn EventSink>) -> ElevatorSystem {
        ElevatorSystem {
            fleet: Arc::from(Vec::new()),
            sink,
            travel_time: Duration::from_millis(config.floor_travel_time),
            started: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Creates `n_elevators` elevators with ids `1..=n_elevators`, all at floor 1.
    pub fn initialize(&mut self, n_elevators: usize) {
        if !self.fleet.is_empty() {
            warn!("Elevator system already initialized, ignoring");
            return;
        }

        self.fleet = (1..=n_elevators)
            .map(|id| Arc::new(Elevator::new(id, self.travel_time, self.sink.clone())))
            .collect::<Vec<_>>()
            .into();
        info!("Initialized {} elevators", n_elevators);
    }

    pub fn elevators(&self) -> &[Arc<Elevator>] {
        &self.fleet
    }

    /// Picks the elevator for `request`, or `None` if there are no elevators.
    pub fn select_elevator(&self, request: &Request) -> Option<&Arc<Elevator>> {
        // Idle or already heading for the same trip, nearest wins
        let eligible = self
            .fleet
            .iter()
            .filter(|e| e.is_idle() || e.is_request_on_the_way(request))
            .min_by_key(|e| e.current_floor().abs_diff(request.start_floor()));
        if eligible.is_some() {
            return eligible;
        }

        // Everyone is busy, balance on queue length
        self.fleet.iter().min_by_key(|e| e.pending_requests_count())
    }

    /// Routes `request` to the best elevator and returns that elevator's id.
    pub fn submit(&self, request: Request) -> Result<usize, DispatchError> {
        let elevator = match self.select_elevator(&request) {
            Some(elevator) => elevator,
            None => {
                let e = DispatchError::NoEligibleElevator(request);
                self.sink.emit(Event::DispatchFailed {
                    request,
                    reason: "no elevators available".to_string(),
                });
                warn!("{}", e);
                return Err(e);
            }
        };

        elevator.enqueue(request);
        self.sink.emit(Event::RequestAccepted { request });
        self.sink.emit(Event::RequestAssigned {
            request,
            elevator: elevator.id(),
        });
        debug!("Request {} assigned to elevator {}", request, elevator.id());
        Ok(elevator.id())
    }

    /// Boundary for raw floor numbers; invalid trips never reach an elevator.
    pub fn submit_floors(
        &self,
        start_floor: Floor,
        end_floor: Floor,
    ) -> Result<usize, DispatchError> {
        let request = Request::new(start_floor, end_floor).map_err(|e| {
            warn!("Rejected request {} -> {}: {}", start_floor, end_floor, e);
            DispatchError::Rejected(e)
        })?;
        self.submit(request)
    }

    /// Spawns one worker thread per elevator. Later calls do nothing.
    pub fn start(&self) -> std::io::Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Elevator system already started");
            return Ok(());
        }

        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        for elevator in self.fleet.iter() {
            let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
            let fleet = self.fleet.clone();
            let worker = elevator.clone();
            let handle = Builder::new()
                .name(format!("elevator_{}", elevator.id()))
                .spawn(move || worker.run(fleet, terminate_rx))?;

            workers.push(Worker {
                id: elevator.id(),
                handle,
                terminate_tx,
            });
        }
        info!("Started {} elevator workers", workers.len());
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<ElevatorStatus> {
        self.fleet.iter().map(|e| e.status()).collect()
    }

    /// True when every elevator is idle
    pub fn is_idle(&self) -> bool {
        self.fleet.iter().all(|e| e.is_idle())
    }

    /// Stops every worker and waits for it to exit.
    pub fn shutdown(&self) {
        let workers: Vec<Worker> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for worker in workers.iter() {
            let _ = worker.terminate_tx.send(());
        }
        for worker in workers {
            match worker.handle.join() {
                Ok(()) => debug!("Elevator {} worker joined", worker.id),
                Err(_) => error!("Elevator {} worker panicked", worker.id),
            }
        }
        info!("Elevator system shut down");
    }
}
