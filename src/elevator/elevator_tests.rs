/*
 * Unit tests for the elevator module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_elevator_init
 * - test_enqueue_resorts_queue
 * - test_enqueue_duplicate
 * - test_service_moves_one_floor_per_step
 * - test_pickup_at_current_floor
 * - test_busy_spans_both_legs
 * - test_drain_emits_single_snapshot
 * - test_interrupted_worker_resumes
 */

/***************************************/
/*             Unit tests              */
/***************************************/
use std::sync::Arc;
use std::thread::{sleep, spawn, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::elevator::{Elevator, Fleet};
use crate::events::{ChannelSink, Event};
use crate::shared::{Direction, Request};

fn request(start: i32, end: i32) -> Request {
    Request::new(start, end).unwrap()
}

fn setup_elevator(travel_time: Duration) -> (Arc<Elevator>, Fleet, Receiver<Event>) {
    let (sink, event_rx) = ChannelSink::unbounded();
    let elevator = Arc::new(Elevator::new(1, travel_time, Arc::new(sink)));
    let fleet: Fleet = Arc::from(vec![elevator.clone()]);
    (elevator, fleet, event_rx)
}

fn start_worker(elevator: &Arc<Elevator>, fleet: &Fleet) -> (JoinHandle<()>, Sender<()>) {
    let (terminate_tx, terminate_rx) = unbounded::<()>();
    let elevator = elevator.clone();
    let fleet = fleet.clone();
    (spawn(move || elevator.run(fleet, terminate_rx)), terminate_tx)
}

/// Collects events up to and including the first one matching `last`
fn recv_until(event_rx: &Receiver<Event>, last: impl Fn(&Event) -> bool) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match event_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(event) => {
                let done = last(&event);
                events.push(event);
                if done {
                    return events;
                }
            }
            Err(e) => panic!("Timed out waiting for event, got {:?}: {:?}", events, e),
        }
    }
}

fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "Timed out waiting for condition");
        sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_elevator_init() {
    // Arrange
    let (elevator, _fleet, _event_rx) = setup_elevator(Duration::ZERO);

    // Assert
    assert_eq!(elevator.id(), 1);
    assert_eq!(elevator.current_floor(), 1);
    assert!(elevator.is_idle());
    assert_eq!(elevator.pending_requests_count(), 0);
    assert_eq!(elevator.status().direction, Direction::Stop);
}

#[test]
fn test_enqueue_resorts_queue() {
    // Arrange
    let (elevator, _fleet, _event_rx) = setup_elevator(Duration::ZERO);

    // Act
    assert!(elevator.enqueue(request(3, 7)));
    assert!(elevator.enqueue(request(2, 5)));

    // Assert
    assert_eq!(elevator.queued_requests(), vec![request(2, 5), request(3, 7)]);
    assert!(!elevator.is_idle());
    assert!(elevator.is_request_on_the_way(&request(3, 7)));
    assert!(!elevator.is_request_on_the_way(&request(7, 3)));
}

#[test]
fn test_enqueue_duplicate() {
    // Arrange
    let (elevator, _fleet, event_rx) = setup_elevator(Duration::ZERO);
    elevator.enqueue(request(4, 2));

    // Act
    let inserted = elevator.enqueue(request(4, 2));

    // Assert
    assert!(!inserted);
    assert_eq!(elevator.pending_requests_count(), 1);
    assert_eq!(
        event_rx.try_recv().unwrap(),
        Event::DuplicateRequest {
            elevator: 1,
            request: request(4, 2)
        }
    );
    assert!(event_rx.try_recv().is_err());
}

#[test]
fn test_service_moves_one_floor_per_step() {
    // Arrange
    let (elevator, fleet, event_rx) = setup_elevator(Duration::ZERO);
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);

    // Act
    elevator.enqueue(request(3, 1));
    let events = recv_until(&event_rx, |e| matches!(e, Event::FleetSnapshot { .. }));

    // Assert
    assert_eq!(
        events[..9],
        [
            Event::FloorReached { elevator: 1, floor: 2 },
            Event::FloorReached { elevator: 1, floor: 3 },
            Event::Stopped { elevator: 1, floor: 3 },
            Event::PickedUp { elevator: 1, floor: 3 },
            Event::FloorReached { elevator: 1, floor: 2 },
            Event::FloorReached { elevator: 1, floor: 1 },
            Event::Stopped { elevator: 1, floor: 1 },
            Event::DroppedOff { elevator: 1, floor: 1 },
            Event::QueueDrained { elevator: 1 },
        ]
    );
    assert_eq!(events.len(), 10);

    // Cleanup
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();
}

#[test]
fn test_pickup_at_current_floor() {
    // Arrange
    let (elevator, fleet, event_rx) = setup_elevator(Duration::ZERO);
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);

    // Act
    elevator.enqueue(request(1, 2));
    let events = recv_until(&event_rx, |e| matches!(e, Event::DroppedOff { .. }));

    // Assert
    assert_eq!(events[0], Event::Stopped { elevator: 1, floor: 1 });
    assert_eq!(events[1], Event::PickedUp { elevator: 1, floor: 1 });
    assert_eq!(events[2], Event::FloorReached { elevator: 1, floor: 2 });

    // Cleanup
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();
}

#[test]
fn test_busy_spans_both_legs() {
    // Arrange
    let (elevator, fleet, event_rx) = setup_elevator(Duration::from_millis(100));
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);

    // Act
    elevator.enqueue(request(2, 5));
    recv_until(&event_rx, |e| matches!(e, Event::PickedUp { .. }));

    // Assert
    let status = elevator.status();
    assert!(status.busy);
    assert_eq!(status.floor, 2);
    assert!(!elevator.is_idle());

    // Cleanup
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();
}

#[test]
fn test_drain_emits_single_snapshot() {
    // Arrange
    let (elevator, fleet, event_rx) = setup_elevator(Duration::ZERO);
    elevator.enqueue(request(2, 4));
    elevator.enqueue(request(6, 3));

    // Act
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);
    let events = recv_until(&event_rx, |e| matches!(e, Event::FleetSnapshot { .. }));
    wait_until(|| elevator.is_idle());

    // Assert
    let dropoffs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::DroppedOff { .. }))
        .collect();
    assert_eq!(dropoffs.len(), 2);
    assert_eq!(
        events.iter().filter(|e| matches!(e, Event::QueueDrained { .. })).count(),
        1
    );
    match events.last() {
        Some(Event::FleetSnapshot { elevators }) => {
            assert_eq!(elevators.len(), 1);
            assert_eq!(elevators[0].id, 1);
            assert_eq!(elevators[0].floor, 3);
        }
        other => panic!("Expected a fleet snapshot, got {:?}", other),
    }
    assert!(event_rx.recv_timeout(Duration::from_millis(100)).is_err());

    // Cleanup
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();
}

#[test]
fn test_interrupted_worker_resumes() {
    // Arrange
    let (elevator, fleet, event_rx) = setup_elevator(Duration::from_millis(50));
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);
    elevator.enqueue(request(3, 6));

    // Act
    recv_until(&event_rx, |e| matches!(e, Event::PickedUp { .. }));
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();

    // Assert
    assert_eq!(elevator.queued_requests(), vec![request(3, 6)]);
    assert!(elevator.status().busy);
    let floor = elevator.current_floor();
    assert!((3..6).contains(&floor));

    // Act
    let (worker, terminate_tx) = start_worker(&elevator, &fleet);
    let events = recv_until(&event_rx, |e| matches!(e, Event::DroppedOff { .. }));

    // Assert
    assert!(!events.iter().any(|e| matches!(e, Event::PickedUp { .. })));
    assert_eq!(events.last(), Some(&Event::DroppedOff { elevator: 1, floor: 6 }));
    wait_until(|| elevator.is_idle());

    // Cleanup
    terminate_tx.send(()).unwrap();
    worker.join().unwrap();
}
