use std::collections::VecDeque;

use crate::shared::{Floor, Request};

/**
 * Ordered request queue of one elevator.
 *
 * Requests are kept sorted by distance from the elevator's floor to their pickup
 * floor, measured when a request is inserted. The sort is stable, so ties keep
 * insertion order. Only the head is ever removed.
 *
 * While the head is in service it is pinned: later insertions re-sort the rest
 * of the queue behind it.
 */
#[derive(Debug, Default, Clone)]
pub struct RequestQueue {
    requests: VecDeque<Request>,
    in_service: bool,
}

impl RequestQueue {
    pub fn new() -> RequestQueue {
        RequestQueue::default()
    }

    pub fn contains(&self, request: &Request) -> bool {
        self.requests.iter().any(|r| r == request)
    }

    /// Inserts `request` and re-sorts around `current_floor`.
    /// Returns false, leaving the queue untouched, if an equal request is queued.
    pub fn insert(&mut self, request: Request, current_floor: Floor) -> bool {
        if self.contains(&request) {
            return false;
        }

        self.requests.push_back(request);
        let pinned = if self.in_service { 1 } else { 0 };
        self.requests.make_contiguous()[pinned..]
            .sort_by_key(|r| r.pickup_distance(current_floor));
        true
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<&Request> {
        self.requests.front()
    }

    /// Pins the head and returns it as the request now being serviced
    pub fn begin_service(&mut self) -> Option<Request> {
        let head = self.requests.front().copied();
        self.in_service = head.is_some();
        head
    }

    pub fn in_service(&self) -> Option<&Request> {
        if self.in_service {
            self.requests.front()
        } else {
            None
        }
    }

    /// Removes the serviced head
    pub fn finish_service(&mut self) -> Option<Request> {
        if !self.in_service {
            return None;
        }
        self.in_service = false;
        self.requests.pop_front()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
