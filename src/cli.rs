//! Command-line grammar (`spec.md` §6): clap-derive `Args` mirroring the
//! seven descriptor options plus the four TLB behavior switches.

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, Debug)]
#[clap(rename_all = "verbatim")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// L1 instruction cache: "size,assoc,line_size".
    #[arg(long = "I1")]
    pub i1: Option<String>,

    /// L1 data cache: "size,assoc,line_size".
    #[arg(long = "D1")]
    pub d1: Option<String>,

    /// Unified L2 cache: "size,assoc,line_size".
    #[arg(long = "L2")]
    pub l2: Option<String>,

    /// Last-level cache: "size,assoc,line_size".
    #[arg(long = "LL")]
    pub ll: Option<String>,

    /// Instruction TLB: "page_size,assoc,entries".
    #[arg(long = "iTLB")]
    pub itlb: Option<String>,

    /// Data TLB: "page_size,assoc,entries".
    #[arg(long = "dTLB")]
    pub dtlb: Option<String>,

    /// Unified L2 TLB: "page_size,assoc,entries".
    #[arg(long = "L2TLB")]
    pub l2tlb: Option<String>,

    /// Master switch for TLB simulation.
    #[arg(long = "tlb-sim", value_enum, default_value_t = YesNo::Yes)]
    pub tlb_sim: YesNo,

    /// Enables per-level page-access logging.
    #[arg(long = "tlb-page-sim", value_enum, default_value_t = YesNo::No)]
    pub tlb_page_sim: YesNo,

    /// Virtual address space size, in bits.
    #[arg(long = "tlb-vas-size", default_value_t = 32)]
    pub tlb_vas_size: u32,

    /// Replacement policy: 0 = LFU, 1 = LRU, 2 = Random.
    #[arg(long = "tlb-rep-pol", default_value_t = 1)]
    pub tlb_rep_pol: u8,
}
