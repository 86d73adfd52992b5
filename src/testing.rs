//! Scripted bus and journaling delay shared by the driver and poller tests.

use crate::error::TransportError;
use crate::transport::{Operation, Transport};
use embedded_hal::blocking::delay::DelayMs;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Write(Vec<u8>),
    Read(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Transaction { address: u8, segments: Vec<Segment> },
    Delay(u32),
}

#[derive(Default)]
struct State {
    journal: Vec<Event>,
    responses: HashMap<u8, VecDeque<Vec<u8>>>,
    failing: HashSet<u8>,
    fail_at: Option<usize>,
    transactions: usize,
    closes: usize,
}

/// Cloning yields another handle onto the same bus so tests can keep one after
/// moving the bus into a poller
#[derive(Clone, Default)]
pub struct FakeBus {
    state: Rc<RefCell<State>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay provider that records into this bus' journal
    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            state: self.state.clone(),
        }
    }

    /// Queues the bytes returned by the next read segment sent to `address`
    pub fn respond(&self, address: u8, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .responses
            .entry(address)
            .or_default()
            .push_back(bytes.to_vec());
    }

    /// Every transaction to `address` fails from now on
    pub fn fail_address(&self, address: u8) {
        self.state.borrow_mut().failing.insert(address);
    }

    pub fn heal_address(&self, address: u8) {
        self.state.borrow_mut().failing.remove(&address);
    }

    /// Fails the transaction with this zero based index, counted across all devices
    pub fn fail_at(&self, index: usize) {
        self.state.borrow_mut().fail_at = Some(index);
    }

    pub fn journal(&self) -> Vec<Event> {
        self.state.borrow().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.state.borrow_mut().journal.clear();
    }

    pub fn transactions_to(&self, address: u8) -> Vec<Vec<Segment>> {
        self.state
            .borrow()
            .journal
            .iter()
            .filter_map(|event| match event {
                Event::Transaction {
                    address: a,
                    segments,
                } if *a == address => Some(segments.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }
}

impl Transport for FakeBus {
    fn transact<'a>(
        &mut self,
        address: u8,
        operations: &mut [Operation<'a>],
    ) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        if state.closes > 0 {
            return Err(TransportError::ClosedError);
        }

        let index = state.transactions;
        state.transactions += 1;

        let segments = operations
            .iter()
            .map(|op| match op {
                Operation::Write(bytes) => Segment::Write(bytes.to_vec()),
                Operation::Read(buffer) => Segment::Read(buffer.len()),
            })
            .collect();
        state.journal.push(Event::Transaction { address, segments });

        if state.failing.contains(&address) || state.fail_at == Some(index) {
            return Err(TransportError::TransactionError {
                address,
                reason: "nack".to_string(),
            });
        }

        for op in operations.iter_mut() {
            if let Operation::Read(buffer) = op {
                let response = state
                    .responses
                    .get_mut(&address)
                    .and_then(|queue| queue.pop_front())
                    .unwrap_or_default();
                let padded = response.into_iter().chain(std::iter::repeat(0));
                for (byte, value) in buffer.iter_mut().zip(padded) {
                    *byte = value;
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        self.state.borrow_mut().closes += 1;
    }
}

pub struct FakeDelay {
    state: Rc<RefCell<State>>,
}

impl DelayMs<u32> for FakeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.state.borrow_mut().journal.push(Event::Delay(ms));
    }
}

pub fn write(bytes: &[u8]) -> Segment {
    Segment::Write(bytes.to_vec())
}
