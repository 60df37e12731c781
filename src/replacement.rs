//! Replacement bookkeeper (C4): LFU / LRU / RR victim selection and counter
//! maintenance, operating on a *scope* — the whole entry array for fully
//! associative levels, or one set of `assoc` contiguous entries for N-way.

use crate::tlb::TlbEntry;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Lfu,
    Lru,
    Rr,
}

impl ReplacementPolicy {
    /// Maps the `--tlb-rep-pol` CLI values (0/1/2). Out-of-range values are a
    /// recoverable condition: warn and fall back to LRU.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ReplacementPolicy::Lfu,
            1 => ReplacementPolicy::Lru,
            2 => ReplacementPolicy::Rr,
            other => {
                log::warn!(
                    "replacement policy code {} is out of range (0-2); using LRU",
                    other
                );
                ReplacementPolicy::Lru
            }
        }
    }

    /// Applies the on-hit bookkeeping rule to the entry at `hit_index` within
    /// `scope`.
    pub fn on_hit(&self, scope: &mut [TlbEntry], hit_index: usize) {
        match self {
            ReplacementPolicy::Lfu => scope[hit_index].counter += 1,
            ReplacementPolicy::Lru => Self::refresh(scope, hit_index),
            ReplacementPolicy::Rr => {}
        }
    }

    /// Chooses the victim index (within `scope`) to evict on a miss. Does
    /// not install anything — lookup never installs by itself (see
    /// `crate::tlb`).
    pub fn select_victim(&self, scope: &[TlbEntry], rng: &mut impl Rng) -> usize {
        match self {
            ReplacementPolicy::Lfu => {
                let mut best = 0;
                for i in 1..scope.len() {
                    if scope[i].counter < scope[best].counter {
                        best = i;
                    }
                }
                best
            }
            ReplacementPolicy::Lru => {
                let mut best = 0;
                for i in 1..scope.len() {
                    if scope[i].counter > scope[best].counter {
                        best = i;
                    }
                }
                best
            }
            ReplacementPolicy::Rr => rng.gen_range(0..scope.len()),
        }
    }

    /// Writes `tag` into `scope[index]` and applies the post-install
    /// counter rule for the policy.
    pub fn install(&self, scope: &mut [TlbEntry], index: usize, tag: u64) {
        scope[index].valid = true;
        scope[index].tag = tag;
        match self {
            ReplacementPolicy::Lfu => scope[index].counter = 1,
            ReplacementPolicy::Lru => {
                scope[index].counter = 0;
                Self::refresh(scope, index);
            }
            ReplacementPolicy::Rr => {}
        }
    }

    /// LRU freshness rule: `scope[fresh]` becomes 0, every other entry in
    /// the scope is incremented by one.
    fn refresh(scope: &mut [TlbEntry], fresh: usize) {
        for (i, e) in scope.iter_mut().enumerate() {
            if i == fresh {
                e.counter = 0;
            } else {
                e.counter += 1;
            }
        }
    }
}
