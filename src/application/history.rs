use crate::domain::round::Round;
use std::collections::VecDeque;

/// Capped, id-ordered log of observed rounds.
///
/// Rounds are kept oldest-first with strictly increasing ids. Duplicate ids
/// are ignored, out-of-order ids are inserted in place, and the oldest round
/// is evicted once the cap is exceeded.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    rounds: VecDeque<Round>,
    cap: usize,
}

impl HistoryStore {
    /// A cap of 0 is treated as 1.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            rounds: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    /// Inserts `round` unless its id is already present.
    ///
    /// Returns whether the round is retained after the call. A round older
    /// than everything in a full store is inserted and evicted immediately.
    pub fn append(&mut self, round: Round) -> bool {
        let idx = match self.rounds.back() {
            Some(last) if last.id() < round.id() => self.rounds.len(),
            None => 0,
            _ => match self.rounds.binary_search_by_key(&round.id(), Round::id) {
                Ok(_) => return false,
                Err(idx) => idx,
            },
        };
        self.rounds.insert(idx, round);

        if self.rounds.len() > self.cap {
            self.rounds.pop_front();
            return idx > 0;
        }
        true
    }

    /// Appends every round, returning the ones that were retained.
    pub fn extend<I>(&mut self, rounds: I) -> Vec<Round>
    where
        I: IntoIterator<Item = Round>,
    {
        let mut sorted: Vec<Round> = rounds.into_iter().collect();
        sorted.sort_by_key(Round::id);
        let inserted: Vec<Round> = sorted
            .into_iter()
            .filter(|round| self.append(*round))
            .collect();
        // Later inserts in the same batch may have evicted earlier ones
        inserted
            .into_iter()
            .filter(|round| self.contains(round.id()))
            .collect()
    }

    /// The newest `limit` rounds, oldest first, as an owned snapshot.
    pub fn view(&self, limit: usize) -> Vec<Round> {
        let skip = self.rounds.len().saturating_sub(limit);
        self.rounds.iter().skip(skip).copied().collect()
    }

    /// Every retained round, oldest first.
    pub fn snapshot(&self) -> Vec<Round> {
        self.rounds.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&Round> {
        self.rounds.back()
    }

    pub fn get(&self, id: u64) -> Option<&Round> {
        self.rounds
            .binary_search_by_key(&id, Round::id)
            .ok()
            .and_then(|idx| self.rounds.get(idx))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
