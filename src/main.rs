#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use clap::Parser;

use tlbsim::config::{Binder, Slot};
use tlbsim::detect::NullDetector;
use tlbsim::error::SimError;
use tlbsim::hierarchy::Hierarchy;
use tlbsim::replacement::ReplacementPolicy;
use tlbsim::report::{render_text, Report};
use tlbsim::tlb::TlbLevel;
use tlbsim::Args;

/// Distinguished exit code for an auto-detected descriptor that fails
/// validation with no user override — mirrors the original's `tl_assert(0)`
/// abort, which a library caller should not be forced to crash on, but a
/// standalone binary reasonably can.
const EXIT_BUG: i32 = 2;

fn run(args: Args) -> Result<()> {
    let mut binder = Binder::new();
    for (slot, value) in [
        (Slot::I1, &args.i1),
        (Slot::D1, &args.d1),
        (Slot::L2, &args.l2),
        (Slot::LL, &args.ll),
        (Slot::ITlb, &args.itlb),
        (Slot::DTlb, &args.dtlb),
        (Slot::L2Tlb, &args.l2tlb),
    ] {
        if let Some(value) = value {
            binder
                .parse_and_set(slot, value)
                .with_context(|| format!("parsing {}", slot.option_name()))?;
        }
    }

    let vas_size = tlbsim::config::validate_vas_size(args.tlb_vas_size)
        .context("parsing --tlb-vas-size")?;
    let policy = ReplacementPolicy::from_code(args.tlb_rep_pol);

    let resolved = match binder.resolve(&NullDetector) {
        Ok(resolved) => resolved,
        Err(err @ SimError::InvalidCacheDescriptor { overridden: false, .. }) => {
            error!("{} — please report a bug", err);
            std::process::exit(EXIT_BUG);
        }
        Err(err) => return Err(err.into()),
    };

    for slot in Slot::CPU_SLOTS {
        info!("{} cache configuration: {:?}", slot.name(), resolved.cpu(slot));
    }

    let tlb_sim_enabled = args.tlb_sim.is_yes();
    let page_sim_enabled = args.tlb_page_sim.is_yes();

    let build_level = |slot: Slot, name: &'static str| -> Result<Option<TlbLevel>> {
        if !tlb_sim_enabled {
            return Ok(None);
        }
        match resolved.tlb(slot) {
            Some(desc) => Ok(Some(
                TlbLevel::new(name, desc, policy)
                    .with_context(|| format!("building {}", name))?,
            )),
            None => Ok(None),
        }
    };

    let itlb = build_level(Slot::ITlb, "iTLB")?;
    let dtlb = build_level(Slot::DTlb, "dTLB")?;
    let l2tlb = build_level(Slot::L2Tlb, "L2TLB")?;

    info!(
        "TLB simulation {}, page logging {}, replacement policy {:?}",
        if tlb_sim_enabled { "enabled" } else { "disabled" },
        if page_sim_enabled { "enabled" } else { "disabled" },
        policy
    );

    let hierarchy = Hierarchy::new(itlb, dtlb, l2tlb, page_sim_enabled);
    let report = Report::from_hierarchy(hierarchy, vas_size, page_sim_enabled, policy);
    print!("{}", render_text(&report));

    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(args)
}
