use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dicelog_channel::EventSource;

use crate::error::{DiceError, Result};

/// Name the library reports itself under.
pub const LIBRARY_NAME: &str = "DiceThrowLibrary";

/// Number of throws between throw-count events.
pub const BATCH_SIZE: u32 = 99;

/// Outcome of throwing two dice. Both faces are always in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThrow")]
pub struct Throw {
    first: u8,
    second: u8,
}

#[derive(Deserialize)]
struct RawThrow {
    first: u8,
    second: u8,
}

impl TryFrom<RawThrow> for Throw {
    type Error = DiceError;

    fn try_from(raw: RawThrow) -> Result<Self> {
        Self::new(raw.first, raw.second)
    }
}

impl Throw {
    pub fn new(first: u8, second: u8) -> Result<Self> {
        for face in [first, second] {
            if !(1..=6).contains(&face) {
                return Err(DiceError::InvalidFace { face });
            }
        }
        Ok(Self { first, second })
    }

    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Sum of both dice, between 2 and 12.
    pub fn total(&self) -> u8 {
        self.first + self.second
    }
}

#[derive(Default)]
struct Counters {
    /// Throws since the last throw-count event.
    batch: u32,
    /// Running total announced by the last throw-count event.
    reported: u64,
    /// Every throw made, regardless of batching.
    throws: u64,
}

/// Two-dice thrower that reports its progress on an event source.
///
/// Every [`BATCH_SIZE`]th throw resets the batch counter, adds
/// `BATCH_SIZE + 1` to the reported total, and publishes an Informational
/// event `"DiceThrowLibrary has generated {total} total throws this run."`.
/// The reported total runs ahead of the real throw count by one per batch.
/// Throw-count events are published in increasing order even under
/// concurrent throws, so listeners on the source must not throw on the
/// same `DiceThrow` from `on_event`.
pub struct DiceThrow {
    source: EventSource,
    rng: Mutex<StdRng>,
    counters: Mutex<Counters>,
}

impl DiceThrow {
    /// A thrower seeded from OS entropy.
    pub fn new(source: EventSource) -> Self {
        Self::with_rng(source, StdRng::from_entropy())
    }

    /// A deterministic thrower for reproducible runs.
    pub fn with_seed(source: EventSource, seed: u64) -> Self {
        Self::with_rng(source, StdRng::seed_from_u64(seed))
    }

    fn with_rng(source: EventSource, rng: StdRng) -> Self {
        Self {
            source,
            rng: Mutex::new(rng),
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// Throw two dice.
    pub fn throw(&self) -> Throw {
        let throw = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            Throw {
                first: roll_a_die(&mut *rng),
                second: roll_a_die(&mut *rng),
            }
        };

        let mut c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        c.throws += 1;
        c.batch += 1;
        if c.batch == BATCH_SIZE {
            c.reported += u64::from(c.batch) + 1;
            c.batch = 0;
            // Published under the counter lock to keep totals in order.
            self.source.info(format!(
                "{LIBRARY_NAME} has generated {} total throws this run.",
                c.reported
            ));
        }
        throw
    }

    /// Throw `count` times, returning every outcome in order.
    pub fn throw_many(&self, count: usize) -> Vec<Throw> {
        (0..count).map(|_| self.throw()).collect()
    }

    /// Total throws made by this thrower.
    pub fn throw_count(&self) -> u64 {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .throws
    }

    /// Running total announced by the most recent throw-count event.
    pub fn total_reported(&self) -> u64 {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reported
    }

    /// Publish an exception-flagged event describing `err`.
    ///
    /// The error itself is left with the caller.
    pub fn report_fault(&self, err: &DiceError) {
        debug!(error = %err, "reporting fault");
        self.source
            .exception(format!("Unhandled exception: {err}"), format!("{err:?}"));
    }

    /// Run [`divide_by_zero`], reporting the fault before handing it back.
    pub fn divide_and_report(&self) -> Result<i32> {
        divide_by_zero().inspect_err(|err| self.report_fault(err))
    }
}

/// Divide ten by zero. Always fails with [`DiceError::DivideByZero`].
pub fn divide_by_zero() -> Result<i32> {
    let dividend: i32 = 10;
    let divisor: i32 = 0;
    dividend
        .checked_div(divisor)
        .ok_or(DiceError::DivideByZero { dividend })
}

fn roll_a_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicelog_channel::{EventChannel, EventLevel, Keywords, LevelThreshold, MemorySink};
    use std::sync::Arc;
    use std::thread;

    fn wired(seed: u64) -> (Arc<MemorySink>, DiceThrow) {
        let channel = EventChannel::new();
        let sink = Arc::new(MemorySink::new());
        channel.register_listener(LIBRARY_NAME, sink.clone(), LevelThreshold::LogAlways);
        let dice = DiceThrow::with_seed(channel.create_source(LIBRARY_NAME), seed);
        (sink, dice)
    }

    #[test]
    fn dice_stay_in_range() {
        let (_, dice) = wired(7);
        for throw in dice.throw_many(1000) {
            assert!((1..=6).contains(&throw.first()));
            assert!((1..=6).contains(&throw.second()));
            assert!((2..=12).contains(&throw.total()));
        }
    }

    #[test]
    fn seeded_throws_are_reproducible() {
        let (_, a) = wired(42);
        let (_, b) = wired(42);
        assert_eq!(a.throw_many(50), b.throw_many(50));
    }

    #[test]
    fn no_event_before_batch_completes() {
        let (sink, dice) = wired(1);
        dice.throw_many(98);
        assert!(sink.is_empty());
        assert_eq!(dice.total_reported(), 0);
        assert_eq!(dice.throw_count(), 98);
    }

    #[test]
    fn ninety_ninth_throw_reports_one_hundred() {
        let (sink, dice) = wired(1);
        dice.throw_many(99);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].message(),
            "DiceThrowLibrary has generated 100 total throws this run."
        );
        assert_eq!(records[0].level(), EventLevel::Informational);
        assert_eq!(records[0].source_name(), LIBRARY_NAME);
        assert_eq!(dice.total_reported(), 100);
    }

    #[test]
    fn batches_accumulate() {
        let (sink, dice) = wired(1);
        dice.throw_many(99 * 3 + 10);

        let messages: Vec<String> = sink.records().iter().map(|r| r.message().to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "DiceThrowLibrary has generated 100 total throws this run.",
                "DiceThrowLibrary has generated 200 total throws this run.",
                "DiceThrowLibrary has generated 300 total throws this run.",
            ]
        );
        assert_eq!(dice.throw_count(), 307);
    }

    #[test]
    fn throws_without_listeners_still_count() {
        let channel = EventChannel::new();
        let dice = DiceThrow::new(channel.create_source(LIBRARY_NAME));
        dice.throw_many(99);
        assert_eq!(dice.total_reported(), 100);
    }

    #[test]
    fn concurrent_throws_report_every_batch() {
        let (sink, dice) = wired(3);
        let dice = Arc::new(dice);

        let mut handles = Vec::new();
        for _ in 0..9 {
            let dice = Arc::clone(&dice);
            handles.push(thread::spawn(move || {
                dice.throw_many(110);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(dice.throw_count(), 990);
        assert_eq!(sink.len(), 10);
        assert_eq!(dice.total_reported(), 1000);
    }

    #[test]
    fn divide_by_zero_fails() {
        assert_eq!(divide_by_zero(), Err(DiceError::DivideByZero { dividend: 10 }));
    }

    #[test]
    fn divide_and_report_logs_and_returns_error() {
        let (sink, dice) = wired(1);
        let err = dice.divide_and_report().unwrap_err();
        assert_eq!(err, DiceError::DivideByZero { dividend: 10 });

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level(), EventLevel::Error);
        assert!(record.keywords().contains(Keywords::EXCEPTION));
        assert_eq!(record.message(), "Unhandled exception: attempted to divide 10 by zero");
        assert_eq!(record.exception_detail(), Some("DivideByZero { dividend: 10 }"));
    }

    #[test]
    fn throw_serializes() {
        let json = serde_json::to_string(&Throw::new(3, 4).unwrap()).unwrap();
        assert_eq!(json, r#"{"first":3,"second":4}"#);
        let back: Throw = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total(), 7);
    }

    #[test]
    fn faces_outside_range_are_rejected() {
        assert_eq!(Throw::new(0, 3), Err(DiceError::InvalidFace { face: 0 }));
        assert_eq!(Throw::new(2, 7), Err(DiceError::InvalidFace { face: 7 }));
        assert_eq!(Throw::new(200, 200), Err(DiceError::InvalidFace { face: 200 }));
        assert!(serde_json::from_str::<Throw>(r#"{"first":0,"second":3}"#).is_err());
    }

    #[test]
    fn concurrent_batch_totals_arrive_in_order() {
        let (sink, dice) = wired(5);
        let dice = Arc::new(dice);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dice = Arc::clone(&dice);
                thread::spawn(move || {
                    dice.throw_many(99 * 5);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let expected: Vec<String> = (1..=40)
            .map(|n| format!("DiceThrowLibrary has generated {} total throws this run.", n * 100))
            .collect();
        let messages: Vec<String> = sink.records().iter().map(|r| r.message().to_string()).collect();
        assert_eq!(messages, expected);
    }
}
