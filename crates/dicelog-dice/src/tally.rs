use serde::{Deserialize, Serialize};

use crate::dice::Throw;

/// Histogram of individual die faces and two-dice totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollTally {
    /// Count per face, index 0 is face 1.
    faces: [u64; 6],
    /// Count per total, index 0 is total 2.
    totals: [u64; 11],
    throws: u64,
}

impl RollTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, throw: Throw) {
        self.faces[usize::from(throw.first()) - 1] += 1;
        self.faces[usize::from(throw.second()) - 1] += 1;
        self.totals[usize::from(throw.total()) - 2] += 1;
        self.throws += 1;
    }

    /// Reset every count to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn throws(&self) -> u64 {
        self.throws
    }

    /// `(face, count)` pairs for faces 1 through 6.
    pub fn faces(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (1u8..).zip(self.faces.iter().copied())
    }

    /// `(total, count)` pairs for totals 2 through 12.
    pub fn totals(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (2u8..).zip(self.totals.iter().copied())
    }

    /// Most frequent total, lowest total wins ties. `None` when empty.
    pub fn mode_total(&self) -> Option<u8> {
        if self.throws == 0 {
            return None;
        }
        self.totals()
            .fold(None, |best: Option<(u8, u64)>, (total, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((total, count)),
            })
            .map(|(total, _)| total)
    }
}

impl Extend<Throw> for RollTally {
    fn extend<I: IntoIterator<Item = Throw>>(&mut self, iter: I) {
        for throw in iter {
            self.record(throw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(first: u8, second: u8) -> Throw {
        Throw::new(first, second).unwrap()
    }

    #[test]
    fn records_faces_and_totals() {
        let mut tally = RollTally::new();
        tally.extend([t(1, 6), t(6, 6), t(3, 4)]);

        assert_eq!(tally.throws(), 3);
        let faces: Vec<u64> = tally.faces().map(|(_, c)| c).collect();
        assert_eq!(faces, vec![1, 0, 1, 1, 0, 3]);

        let sevens = tally.totals().find(|(total, _)| *total == 7).unwrap().1;
        assert_eq!(sevens, 2);
        let twelves = tally.totals().find(|(total, _)| *total == 12).unwrap().1;
        assert_eq!(twelves, 1);
    }

    #[test]
    fn face_sum_is_twice_throws() {
        let mut tally = RollTally::new();
        tally.extend([t(2, 2), t(5, 1), t(4, 3), t(6, 1)]);
        let faces: u64 = tally.faces().map(|(_, c)| c).sum();
        assert_eq!(faces, 2 * tally.throws());
    }

    #[test]
    fn mode_prefers_lowest_on_tie() {
        let mut tally = RollTally::new();
        assert_eq!(tally.mode_total(), None);
        tally.extend([t(1, 1), t(6, 6)]);
        assert_eq!(tally.mode_total(), Some(2));
        tally.record(t(6, 6));
        assert_eq!(tally.mode_total(), Some(12));
    }

    #[test]
    fn clear_resets() {
        let mut tally = RollTally::new();
        tally.record(t(3, 3));
        tally.clear();
        assert_eq!(tally, RollTally::new());
    }
}
