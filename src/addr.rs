//! Address decoder (C3): splits a virtual address into offset/VPN and,
//! per TLB geometry, further into tag/set-index.

use crate::cache::{Assoc, CacheDescriptor, DIRECT_MAPPED, FULLY_ASSOCIATIVE};
use crate::error::SimError;

/// Derived geometry for one TLB level, computed once from a validated
/// [`CacheDescriptor`] at level construction time.
#[derive(Debug, Clone, Copy)]
pub struct TlbGeometry {
    pub page_size: u64,
    pub assoc: Assoc,
    pub entries: u64,
    /// Number of sets: `entries` for direct-mapped, `entries / assoc` for
    /// N-way, unused (conceptually 1) for fully associative.
    pub sets: u64,
    pub offset_bits: u32,
}

impl TlbGeometry {
    pub fn from_descriptor(desc: &CacheDescriptor) -> Result<Self, SimError> {
        let page_size = desc.size_or_page_size as u64;
        let assoc = desc.assoc;

        if !page_size.is_power_of_two() {
            return Err(SimError::InvalidTlbDescriptor {
                slot: "tlb",
                detail: "page size is not a power of two".to_string(),
            });
        }
        // Range-check on the signed field before casting to u64: a negative
        // raw value (e.g. a typo'd `-4` entry count) would otherwise wrap to
        // a huge unsigned length and blow past this guard.
        if desc.line_size_or_entries < 1 {
            return Err(SimError::InvalidTlbDescriptor {
                slot: "tlb",
                detail: "entries must be at least 1".to_string(),
            });
        }
        let entries = desc.line_size_or_entries as u64;

        let sets = match assoc {
            FULLY_ASSOCIATIVE => 1,
            DIRECT_MAPPED => entries,
            n if n > 0 => {
                let n = n as u64;
                if n % 2 != 0 {
                    return Err(SimError::InvalidTlbDescriptor {
                        slot: "tlb",
                        detail: "associativity must be even for N-way TLBs".to_string(),
                    });
                }
                if entries % n != 0 {
                    return Err(SimError::InvalidTlbDescriptor {
                        slot: "tlb",
                        detail: "entries is not a multiple of associativity".to_string(),
                    });
                }
                entries / n
            }
            _ => {
                return Err(SimError::InvalidTlbDescriptor {
                    slot: "tlb",
                    detail: "associativity must be -1, 0, or a positive even integer".to_string(),
                })
            }
        };
        if assoc != FULLY_ASSOCIATIVE && !sets.is_power_of_two() {
            return Err(SimError::InvalidTlbDescriptor {
                slot: "tlb",
                detail: "implied set count is not a power of two".to_string(),
            });
        }

        Ok(TlbGeometry {
            page_size,
            assoc,
            entries,
            sets,
            offset_bits: page_size.trailing_zeros(),
        })
    }
}

/// Result of decoding a virtual address against one level's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddr {
    pub vpn: u64,
    pub tag: u64,
    /// `None` for fully-associative levels, where the whole array is the
    /// lookup scope and no index is consumed.
    pub set_index: Option<u64>,
}

/// Decodes `addr` against `geom` (C3).
pub fn decode(addr: u64, geom: &TlbGeometry) -> DecodedAddr {
    let vpn = addr >> geom.offset_bits;
    match geom.assoc {
        FULLY_ASSOCIATIVE => DecodedAddr {
            vpn,
            tag: vpn,
            set_index: None,
        },
        DIRECT_MAPPED => DecodedAddr {
            vpn,
            tag: vpn / geom.entries,
            set_index: Some(vpn % geom.entries),
        },
        _ => DecodedAddr {
            vpn,
            tag: vpn / geom.sets,
            set_index: Some(vpn % geom.sets),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheDescriptor;

    fn geom(page_size: i64, assoc: Assoc, entries: i64) -> TlbGeometry {
        TlbGeometry::from_descriptor(&CacheDescriptor::new(page_size, assoc, entries)).unwrap()
    }

    #[test]
    fn direct_mapped_round_trip() {
        let g = geom(4096, DIRECT_MAPPED, 4);
        for vpn in 0..16u64 {
            let addr = vpn << g.offset_bits;
            let d = decode(addr, &g);
            assert_eq!(d.vpn, vpn);
            let index = d.set_index.unwrap();
            let reconstructed = d.tag * g.entries + index;
            assert_eq!(reconstructed, vpn);
        }
    }

    #[test]
    fn n_way_round_trip() {
        let g = geom(4096, 2, 4); // 2 sets
        for vpn in 0..16u64 {
            let addr = vpn << g.offset_bits;
            let d = decode(addr, &g);
            let index = d.set_index.unwrap();
            assert_eq!(d.tag * g.sets + index, vpn);
        }
    }

    #[test]
    fn fully_associative_tag_is_vpn() {
        let g = geom(4096, FULLY_ASSOCIATIVE, 4);
        let d = decode(0x4000, &g);
        assert_eq!(d.tag, d.vpn);
        assert_eq!(d.set_index, None);
    }

    #[test]
    fn rejects_odd_associativity() {
        assert!(TlbGeometry::from_descriptor(&CacheDescriptor::new(4096, 3, 12)).is_err());
    }

    #[test]
    fn rejects_non_power_of_two_page_size() {
        assert!(TlbGeometry::from_descriptor(&CacheDescriptor::new(4000, -1, 4)).is_err());
    }
}
