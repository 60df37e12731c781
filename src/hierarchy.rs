//! Hierarchy controller (C6): orchestrates the L1 → L2 lookup cascade,
//! routes references by kind, and updates the page-access log.

use rand::rngs::ThreadRng;

use crate::tlb::{LookupResult, TlbLevel};

/// A reference is tagged as either an instruction fetch (routed to iTLB) or
/// a data access (routed to dTLB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Instruction,
    Data,
}

/// Exactly three levels are reserved: iTLB, dTLB, and a unified L2TLB. Each
/// is independently optional — `None` means that level is disabled and
/// references routed to it are a silent no-op.
pub struct Hierarchy {
    pub itlb: Option<TlbLevel>,
    pub dtlb: Option<TlbLevel>,
    pub l2tlb: Option<TlbLevel>,
    pub page_log_enabled: bool,
    /// Combined L1 miss count (iTLB + dTLB).
    pub t1: u64,
    /// L2TLB miss count.
    pub t2: u64,
    rng: ThreadRng,
}

impl Hierarchy {
    pub fn new(
        itlb: Option<TlbLevel>,
        dtlb: Option<TlbLevel>,
        l2tlb: Option<TlbLevel>,
        page_log_enabled: bool,
    ) -> Self {
        Hierarchy {
            itlb,
            dtlb,
            l2tlb,
            page_log_enabled,
            t1: 0,
            t2: 0,
            rng: rand::thread_rng(),
        }
    }

    /// Public entry point: routes `(addr, kind)` to the appropriate L1 TLB,
    /// cascading into L2TLB on miss.
    pub fn reference(&mut self, addr: u64, kind: ReferenceKind) {
        match kind {
            ReferenceKind::Instruction => {
                if self.itlb.is_some() {
                    self.reference_l1(addr, true);
                }
            }
            ReferenceKind::Data => {
                if self.dtlb.is_some() {
                    self.reference_l1(addr, false);
                }
            }
        }
    }

    fn reference_l1(&mut self, addr: u64, is_instruction: bool) {
        let (decoded, outcome) = {
            let level = if is_instruction {
                self.itlb.as_mut().unwrap()
            } else {
                self.dtlb.as_mut().unwrap()
            };
            let (decoded, outcome) = level.lookup(addr);
            if self.page_log_enabled {
                level.record_page(decoded.vpn);
            }
            (decoded, outcome)
        };

        let scope = match outcome {
            LookupResult::Hit => return,
            LookupResult::Miss(scope) => scope,
        };
        self.t1 += 1;

        // Cascade into L2TLB. The distinctive policy — install in L1 only
        // when both L1 and L2 miss — depends on this outcome, so the L2
        // hit/miss decision must be resolved before any install happens.
        let mut l2_hit = false;
        if let Some(l2) = self.l2tlb.as_mut() {
            let (l2_decoded, l2_outcome) = l2.lookup(addr);
            if self.page_log_enabled {
                l2.record_page(l2_decoded.vpn);
            }
            match l2_outcome {
                LookupResult::Hit => l2_hit = true,
                LookupResult::Miss(l2_scope) => {
                    self.t2 += 1;
                    l2.install(l2_decoded.tag, l2_scope, &mut self.rng);
                }
            }
        }

        if !l2_hit {
            let level = if is_instruction {
                self.itlb.as_mut().unwrap()
            } else {
                self.dtlb.as_mut().unwrap()
            };
            level.install(decoded.tag, scope, &mut self.rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDescriptor, FULLY_ASSOCIATIVE};
    use crate::replacement::ReplacementPolicy;

    fn fa_level(entries: i64, policy: ReplacementPolicy) -> TlbLevel {
        TlbLevel::new(
            "test",
            CacheDescriptor::new(4096, FULLY_ASSOCIATIVE, entries),
            policy,
        )
        .unwrap()
    }

    #[test]
    fn two_level_install_rule_does_not_reinsert_on_l2_hit() {
        // Scenario 3: iTLB FA 4 entries, L2TLB FA 8 entries.
        let itlb = fa_level(4, ReplacementPolicy::Lru);
        let l2tlb = fa_level(8, ReplacementPolicy::Lru);
        let mut h = Hierarchy::new(Some(itlb), None, Some(l2tlb), false);

        // VPN 1 has been evicted from the 4-entry iTLB by VPNs 2..5 by the
        // time all five references have gone through.
        for vpn in 1..=5u64 {
            h.reference(vpn << 12, ReferenceKind::Instruction);
        }
        let miss_before = h.itlb.as_ref().unwrap().miss;

        // 6th reference: VPN 1 again. Misses iTLB, hits L2TLB.
        h.reference(1u64 << 12, ReferenceKind::Instruction);
        assert_eq!(h.itlb.as_ref().unwrap().miss, miss_before + 1);

        // Because the L2 hit, iTLB must not have installed VPN 1: touching
        // it yet again still misses iTLB.
        let miss_before2 = h.itlb.as_ref().unwrap().miss;
        h.reference(1u64 << 12, ReferenceKind::Instruction);
        assert_eq!(
            h.itlb.as_ref().unwrap().miss,
            miss_before2 + 1,
            "L2 hit must not cause L1 to install the line"
        );
    }

    #[test]
    fn t1_and_t2_accounting() {
        let itlb = fa_level(2, ReplacementPolicy::Lru);
        let l2tlb = fa_level(2, ReplacementPolicy::Lru);
        let mut h = Hierarchy::new(Some(itlb), None, Some(l2tlb), false);

        // 3 distinct VPNs against a 2-entry iTLB and 2-entry L2TLB: every
        // reference misses iTLB; L2TLB absorbs the first two then also
        // starts missing.
        for vpn in 0..3u64 {
            h.reference(vpn << 12, ReferenceKind::Instruction);
        }
        assert_eq!(h.t1, 3);
        assert_eq!(
            h.itlb.as_ref().unwrap().miss,
            h.t1,
            "t1 must equal iTLB miss count when dTLB is disabled"
        );
        assert_eq!(h.t2, h.l2tlb.as_ref().unwrap().miss);
    }

    #[test]
    fn disabled_level_is_a_silent_no_op() {
        let mut h = Hierarchy::new(None, None, None, false);
        h.reference(0x1000, ReferenceKind::Instruction);
        h.reference(0x1000, ReferenceKind::Data);
        assert_eq!(h.t1, 0);
        assert_eq!(h.t2, 0);
    }
}
