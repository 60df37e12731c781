//! Option binder (C2): parses `size,assoc,lines` triples, applies them to a
//! set of named cache/TLB slots, and tracks which were user-overridden.

use std::collections::HashMap;

use crate::cache::{validate_cpu_cache, CacheDescriptor};
use crate::detect::Detector;
use crate::error::SimError;

/// The seven named descriptor slots the simulator configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    I1,
    D1,
    L2,
    LL,
    ITlb,
    DTlb,
    L2Tlb,
}

impl Slot {
    pub const CPU_SLOTS: [Slot; 4] = [Slot::I1, Slot::D1, Slot::L2, Slot::LL];
    pub const TLB_SLOTS: [Slot; 3] = [Slot::ITlb, Slot::DTlb, Slot::L2Tlb];
    pub const ALL: [Slot; 7] = [
        Slot::I1,
        Slot::D1,
        Slot::L2,
        Slot::LL,
        Slot::ITlb,
        Slot::DTlb,
        Slot::L2Tlb,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::I1 => "I1",
            Slot::D1 => "D1",
            Slot::L2 => "L2",
            Slot::LL => "LL",
            Slot::ITlb => "iTLB",
            Slot::DTlb => "dTLB",
            Slot::L2Tlb => "L2TLB",
        }
    }

    pub fn option_name(&self) -> &'static str {
        match self {
            Slot::I1 => "--I1",
            Slot::D1 => "--D1",
            Slot::L2 => "--L2",
            Slot::LL => "--LL",
            Slot::ITlb => "--iTLB",
            Slot::DTlb => "--dTLB",
            Slot::L2Tlb => "--L2TLB",
        }
    }

    pub fn is_cpu_cache(&self) -> bool {
        matches!(self, Slot::I1 | Slot::D1 | Slot::L2 | Slot::LL)
    }
}

/// Parses a `"size,assoc,line_size"` (or `"page_size,assoc,entries"`) triple,
/// per the grammar in `spec.md` §6: three decimal integers separated by
/// commas, nothing trailing, each fitting into a 32-bit field.
pub fn parse_triple(option: &'static str, value: &str) -> Result<CacheDescriptor, SimError> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 3 {
        return Err(SimError::MalformedOption {
            option,
            detail: format!(
                "expected 3 comma-separated integers (got {} field(s))",
                parts.len()
            ),
        });
    }

    let mut fields = [0i64; 3];
    for (i, part) in parts.iter().enumerate() {
        fields[i] = part.parse::<i64>().map_err(|_| SimError::MalformedOption {
            option,
            detail: format!("{:?} is not a valid integer", part),
        })?;
        if i32::try_from(fields[i]).is_err() {
            return Err(SimError::MalformedOption {
                option,
                detail: format!("{} does not fit in a 32-bit field", fields[i]),
            });
        }
    }

    Ok(CacheDescriptor::new(fields[0], fields[1], fields[2]))
}

/// Accumulates user-supplied slot values and reconciles them against an
/// auto-detector into a final, validated configuration (C2 post-parse
/// phase).
#[derive(Default)]
pub struct Binder {
    user: HashMap<Slot, CacheDescriptor>,
}

/// The outcome of `Binder::resolve`: every CPU-cache slot is always present
/// (validation is fatal otherwise); TLB slots are `Some` only when the user
/// supplied them, which is also what enables that TLB level.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    cpu: HashMap<Slot, CacheDescriptor>,
    tlb: HashMap<Slot, CacheDescriptor>,
}

impl ResolvedConfig {
    pub fn cpu(&self, slot: Slot) -> CacheDescriptor {
        self.cpu[&slot]
    }

    pub fn tlb(&self, slot: Slot) -> Option<CacheDescriptor> {
        self.tlb.get(&slot).copied()
    }
}

impl Binder {
    pub fn new() -> Self {
        Binder::default()
    }

    /// Records a user-supplied value for `slot`. CPU-cache slots are
    /// validated immediately (C1) — a user-supplied invalid descriptor is
    /// fatal right away, per `spec.md` §4.1(i). TLB slots are intentionally
    /// not validated here; their geometry is checked lazily when the level
    /// is constructed (`crate::addr::TlbGeometry::from_descriptor`).
    pub fn set(&mut self, slot: Slot, desc: CacheDescriptor) -> Result<(), SimError> {
        if slot.is_cpu_cache() {
            if let Err(kind) = validate_cpu_cache(&desc) {
                return Err(SimError::InvalidCacheDescriptor {
                    slot: slot.name(),
                    kind,
                    overridden: false,
                });
            }
        }
        self.user.insert(slot, desc);
        Ok(())
    }

    pub fn parse_and_set(&mut self, slot: Slot, value: &str) -> Result<(), SimError> {
        let desc = parse_triple(slot.option_name(), value)?;
        self.set(slot, desc)
    }

    pub fn is_user_supplied(&self, slot: Slot) -> bool {
        self.user.contains_key(&slot)
    }

    /// Reconciles user-supplied values against auto-detection (C2 steps
    /// 1-4):
    /// 1. fill any CPU slot the user didn't supply via the detector;
    /// 2. re-validate that slot, tolerating failure only if overridden;
    /// 3. let the user override win;
    /// 4. enable a TLB level only if the user supplied it.
    pub fn resolve(&self, detector: &dyn Detector) -> Result<ResolvedConfig, SimError> {
        let mut cpu = HashMap::new();
        for &slot in &Slot::CPU_SLOTS {
            let overridden = self.user.get(&slot).copied();
            let auto = detector.detect(slot);
            if let Err(kind) = validate_cpu_cache(&auto) {
                if overridden.is_none() {
                    log::error!(
                        "auto-detected {} cache configuration not supported: {}",
                        slot.name(),
                        kind
                    );
                    return Err(SimError::InvalidCacheDescriptor {
                        slot: slot.name(),
                        kind,
                        overridden: false,
                    });
                }
                log::debug!(
                    "auto-detected {} cache configuration failed validation ({}); using user override",
                    slot.name(),
                    kind
                );
            }
            cpu.insert(slot, overridden.unwrap_or(auto));
        }

        let mut tlb = HashMap::new();
        for &slot in &Slot::TLB_SLOTS {
            if let Some(desc) = self.user.get(&slot) {
                tlb.insert(slot, *desc);
            }
        }

        Ok(ResolvedConfig { cpu, tlb })
    }
}

/// Validates `--tlb-vas-size`: must be greater than zero.
pub fn validate_vas_size(vas_size: u32) -> Result<u32, SimError> {
    if vas_size == 0 {
        return Err(SimError::MalformedOption {
            option: "--tlb-vas-size",
            detail: "virtual address space size must be greater than 0".to_string(),
        });
    }
    Ok(vas_size)
}
