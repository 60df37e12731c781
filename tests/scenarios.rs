//! End-to-end scenarios against the public `Hierarchy` API, one per numbered
//! case in the option-binder/TLB-hierarchy specification.

use tlbsim::cache::{CacheDescriptor, DIRECT_MAPPED, FULLY_ASSOCIATIVE};
use tlbsim::config::{Binder, Slot};
use tlbsim::detect::NullDetector;
use tlbsim::hierarchy::{Hierarchy, ReferenceKind};
use tlbsim::replacement::ReplacementPolicy;
use tlbsim::tlb::TlbLevel;

fn cpu_descriptor() -> CacheDescriptor {
    CacheDescriptor::new(65536, 2, 64)
}

#[test]
fn scenario_1_direct_mapped_fifo_overwrite() {
    let itlb = TlbLevel::new(
        "iTLB",
        CacheDescriptor::new(4096, DIRECT_MAPPED, 4),
        ReplacementPolicy::Lru,
    )
    .unwrap();
    let mut h = Hierarchy::new(Some(itlb), None, None, false);

    for addr in [0x0000u64, 0x4000, 0x8000, 0xC000, 0x10000] {
        h.reference(addr, ReferenceKind::Instruction);
    }
    assert_eq!(h.t1, 5);

    // 0x10000 (VPN 4) aliases the same DM slot as 0x0000 (VPN 0) and evicted
    // it, so touching 0x0000 again misses.
    h.reference(0x0000, ReferenceKind::Instruction);
    assert_eq!(h.t1, 6);
}

#[test]
fn scenario_2_lru_two_set_hierarchy() {
    let dtlb = TlbLevel::new(
        "dTLB",
        CacheDescriptor::new(4096, 2, 4),
        ReplacementPolicy::Lru,
    )
    .unwrap();
    let mut h = Hierarchy::new(None, Some(dtlb), None, false);

    for addr in [0x0000u64, 0x2000, 0x1000, 0x0000] {
        h.reference(addr, ReferenceKind::Data);
    }
    // 3 misses (first three distinct VPNs), 1 hit (final repeat of 0x0000).
    assert_eq!(h.t1, 3);
}

#[test]
fn scenario_3_l2_hit_does_not_reinstall_l1() {
    let itlb = TlbLevel::new(
        "iTLB",
        CacheDescriptor::new(4096, FULLY_ASSOCIATIVE, 4),
        ReplacementPolicy::Lru,
    )
    .unwrap();
    let l2tlb = TlbLevel::new(
        "L2TLB",
        CacheDescriptor::new(4096, FULLY_ASSOCIATIVE, 8),
        ReplacementPolicy::Lru,
    )
    .unwrap();
    let mut h = Hierarchy::new(Some(itlb), None, Some(l2tlb), false);

    for vpn in 1..=5u64 {
        h.reference(vpn << 12, ReferenceKind::Instruction);
    }
    let t1_before = h.t1;

    // VPN 1 was evicted from the 4-entry iTLB; it is still resident in the
    // 8-entry L2TLB, so this reference misses L1 but hits L2.
    h.reference(1u64 << 12, ReferenceKind::Instruction);
    assert_eq!(h.t1, t1_before + 1);
    assert_eq!(h.t2, 0);

    // Because the L2 hit, iTLB never installed VPN 1: it misses again.
    h.reference(1u64 << 12, ReferenceKind::Instruction);
    assert_eq!(h.t1, t1_before + 2);
}

#[test]
fn scenario_4_random_policy_distinct_vpns_all_miss() {
    let itlb = TlbLevel::new(
        "iTLB",
        CacheDescriptor::new(4096, FULLY_ASSOCIATIVE, 4),
        ReplacementPolicy::Rr,
    )
    .unwrap();
    let mut h = Hierarchy::new(Some(itlb), None, None, false);

    for vpn in 0..5u64 {
        h.reference(vpn << 12, ReferenceKind::Instruction);
    }
    assert_eq!(h.t1, 5);
}

#[test]
fn scenario_5_page_log_tracks_distinct_pages_and_counts() {
    let itlb = TlbLevel::new(
        "iTLB",
        CacheDescriptor::new(4096, FULLY_ASSOCIATIVE, 8),
        ReplacementPolicy::Lru,
    )
    .unwrap();
    let mut h = Hierarchy::new(Some(itlb), None, None, true);

    for vpn in [7u64, 7, 3, 7, 3, 11] {
        h.reference(vpn << 12, ReferenceKind::Instruction);
    }

    let itlb = h.itlb.as_ref().unwrap();
    assert_eq!(itlb.page_log.total_pages(), 3);
}

#[test]
fn scenario_6_invalid_user_descriptor_rejected_at_bind_time() {
    let mut binder = Binder::new();
    // 1000 / (64 * 2) is not an integer, let alone a power of two.
    let err = binder.parse_and_set(Slot::D1, "1000,2,64").unwrap_err();
    assert!(err.to_string().contains("D1"));

    // A well-formed descriptor on every CPU slot resolves cleanly even with
    // no auto-detector backing it.
    let mut binder = Binder::new();
    for &slot in &Slot::CPU_SLOTS {
        binder.set(slot, cpu_descriptor()).unwrap();
    }
    let resolved = binder.resolve(&NullDetector).unwrap();
    assert_eq!(resolved.cpu(Slot::I1), cpu_descriptor());
}
