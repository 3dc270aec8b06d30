use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};

use crate::codec::Wire;
use crate::schemes::IdentificationScheme;

pub const DEFAULT_CAPACITY: usize = 4096;

/// SHA-256 fingerprint of an encoded commitment.
pub type Fingerprint = [u8; 32];

/// Shared, bounded record of commitments already seen.
///
/// Two identical commitments from one prover mean one nonce answered two challenges, which
/// leaks the user key. Provers consult the ledger before sending a commitment and resample on
/// a hit; verifiers consult it to refuse replayed first messages. When full, the oldest
/// fingerprint is evicted.
///
/// Cloning is cheap and every clone shares the same record.
#[derive(Clone, Debug)]
pub struct NonceLedger {
    inner: Arc<Mutex<LedgerState>>,
}

#[derive(Debug)]
struct LedgerState {
    capacity: usize,
    seen: HashSet<Fingerprint>,
    order: VecDeque<Fingerprint>,
}

impl Default for NonceLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NonceLedger {
    /// A `capacity` of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(LedgerState {
                capacity,
                seen: HashSet::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            })),
        }
    }

    /// `None` for schemes whose commitment carries no nonce: every session would share one
    /// fingerprint, so there is nothing to track.
    pub fn fingerprint<S: IdentificationScheme>(
        scheme: &S,
        commitment: &S::Commitment,
    ) -> Option<Fingerprint> {
        if !S::FRESH_COMMITMENTS {
            return None;
        }
        let mut hasher = Sha256::new();
        hasher.update(S::KIND.as_str().as_bytes());
        hasher.update(commitment.to_bytes(scheme));
        Some(hasher.finalize().into())
    }

    /// Records `fingerprint`. Returns `false` if it was already present.
    pub fn record(&self, fingerprint: Fingerprint) -> bool {
        let mut state = self.lock();
        if !state.seen.insert(fingerprint) {
            return false;
        }
        state.order.push_back(fingerprint);
        while state.order.len() > state.capacity {
            if let Some(evicted) = state.order.pop_front() {
                state.seen.remove(&evicted);
            }
        }
        true
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().seen.contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    // Updates never leave the state half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
