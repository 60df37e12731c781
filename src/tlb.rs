//! TLB level (C5): one indexed array of entries with geometry metadata and
//! hit/miss counters.

use rand::Rng;

use crate::addr::{decode, DecodedAddr, TlbGeometry};
use crate::cache::{CacheDescriptor, DIRECT_MAPPED, FULLY_ASSOCIATIVE};
use crate::error::SimError;
use crate::pagelog::PageLog;
use crate::replacement::ReplacementPolicy;

/// `(tag, counter)` plus an explicit validity bit so that a never-written
/// entry (tag `0`, counter `0`) cannot spuriously hit against an incoming
/// VPN of `0` — see `spec.md` §9.
#[derive(Debug, Clone, Copy)]
pub struct TlbEntry {
    pub valid: bool,
    pub tag: u64,
    pub counter: u64,
}

impl TlbEntry {
    pub fn empty() -> Self {
        TlbEntry {
            valid: false,
            tag: 0,
            counter: 0,
        }
    }
}

/// Identifies the contiguous slice of entries a miss is allowed to evict
/// from: the whole array (fully associative), a single slot (direct
/// mapped), or one `assoc`-wide set (N-way).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionScope {
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Hit,
    Miss(EvictionScope),
}

pub struct TlbLevel {
    pub name: &'static str,
    pub geometry: TlbGeometry,
    pub policy: ReplacementPolicy,
    entries: Vec<TlbEntry>,
    pub hit: u64,
    pub miss: u64,
    pub page_log: PageLog,
}

impl TlbLevel {
    pub fn new(
        name: &'static str,
        descriptor: CacheDescriptor,
        policy: ReplacementPolicy,
    ) -> Result<Self, SimError> {
        let geometry = TlbGeometry::from_descriptor(&descriptor)?;
        let entries = vec![TlbEntry::empty(); geometry.entries as usize];
        Ok(TlbLevel {
            name,
            geometry,
            policy,
            entries,
            hit: 0,
            miss: 0,
            page_log: PageLog::new(),
        })
    }

    pub fn total_accesses(&self) -> u64 {
        self.hit + self.miss
    }

    fn eviction_scope(&self, decoded: &DecodedAddr) -> EvictionScope {
        match self.geometry.assoc {
            FULLY_ASSOCIATIVE => EvictionScope {
                start: 0,
                len: self.entries.len(),
            },
            DIRECT_MAPPED => EvictionScope {
                start: decoded.set_index.expect("DM decode always yields an index") as usize,
                len: 1,
            },
            n => {
                let assoc = n as usize;
                let set = decoded.set_index.expect("N-way decode always yields an index") as usize;
                EvictionScope {
                    start: set * assoc,
                    len: assoc,
                }
            }
        }
    }

    /// Performs the lookup half of the protocol (C5): decodes the address,
    /// scans the scope for a tag match, and updates `hit`/`miss` plus the
    /// on-hit replacement bookkeeping. Critically, this never installs on a
    /// miss — that decision belongs to the hierarchy controller (C6), since
    /// whether to install in L1 depends on the L2 outcome.
    pub fn lookup(&mut self, addr: u64) -> (DecodedAddr, LookupResult) {
        let decoded = decode(addr, &self.geometry);
        let scope = self.eviction_scope(&decoded);
        let window = &mut self.entries[scope.start..scope.start + scope.len];

        if let Some(pos) = window
            .iter()
            .position(|e| e.valid && e.tag == decoded.tag)
        {
            self.hit += 1;
            self.policy.on_hit(window, pos);
            (decoded, LookupResult::Hit)
        } else {
            self.miss += 1;
            (decoded, LookupResult::Miss(scope))
        }
    }

    /// Installs `tag` into the scope identified by a prior miss, selecting
    /// the victim per the level's replacement policy (C4).
    pub fn install(&mut self, tag: u64, scope: EvictionScope, rng: &mut impl Rng) {
        let window = &mut self.entries[scope.start..scope.start + scope.len];
        let victim = self.policy.select_victim(window, rng);
        self.policy.install(window, victim, tag);
    }

    pub fn record_page(&mut self, vpn: u64) {
        self.page_log.record(vpn);
    }

    /// Associativity label for reporting: "Fully Associative", "Direct
    /// Mapped", or "N-way Associative".
    pub fn assoc_label(&self) -> String {
        match self.geometry.assoc {
            FULLY_ASSOCIATIVE => "Fully Associative".to_string(),
            DIRECT_MAPPED => "Direct Mapped".to_string(),
            n => format!("{}-way Associative", n),
        }
    }
}
