//! Reporter (external collaborator in `spec.md`, but a minimal concrete
//! renderer is part of the ambient stack every binary needs): assembles and
//! renders the report content described in `spec.md` §6.

use std::fmt::Write as _;

use crate::hierarchy::Hierarchy;
use crate::pagelog::PageLogEntry;
use crate::replacement::ReplacementPolicy;

#[derive(Debug, Clone)]
pub struct LevelReport {
    pub name: &'static str,
    pub page_size: u64,
    pub assoc_label: String,
    pub entries: u64,
    pub hit: u64,
    pub miss: u64,
    pub pages: Option<Vec<PageLogEntry>>,
}

impl LevelReport {
    pub fn total_accesses(&self) -> u64 {
        self.hit + self.miss
    }

    pub fn hit_ratio(&self) -> f64 {
        ratio(self.hit, self.total_accesses())
    }

    pub fn miss_ratio(&self) -> f64 {
        ratio(self.miss, self.total_accesses())
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub vas_size: u32,
    pub policy: ReplacementPolicy,
    pub levels: Vec<LevelReport>,
    pub t1: u64,
    pub t2: u64,
}

impl Report {
    /// Consumes the hierarchy, extracting the final report content. Matches
    /// `spec.md` §5's lifecycle note: page-log nodes are released once the
    /// report has been assembled (dropped along with the consumed levels).
    ///
    /// `policy` is the single `--tlb-rep-pol` configuration value, not
    /// inferred from whichever level happens to be enabled — per `spec.md`
    /// §6 the report must state the chosen policy even when no TLB level is
    /// built (e.g. `--tlb-sim=no`).
    pub fn from_hierarchy(
        h: Hierarchy,
        vas_size: u32,
        page_log_enabled: bool,
        policy: ReplacementPolicy,
    ) -> Self {
        let mut levels = Vec::new();

        let order = [("iTLB", h.itlb), ("dTLB", h.dtlb), ("L2TLB", h.l2tlb)];
        for (name, level) in order {
            if let Some(level) = level {
                let pages = if page_log_enabled {
                    Some(
                        level
                            .page_log
                            .iter_most_recent_first()
                            .copied()
                            .collect(),
                    )
                } else {
                    None
                };
                levels.push(LevelReport {
                    name,
                    page_size: level.geometry.page_size,
                    assoc_label: level.assoc_label(),
                    entries: level.geometry.entries,
                    hit: level.hit,
                    miss: level.miss,
                    pages,
                });
            }
        }

        Report {
            vas_size,
            policy,
            levels,
            t1: h.t1,
            t2: h.t2,
        }
    }
}

fn policy_name(policy: ReplacementPolicy) -> &'static str {
    match policy {
        ReplacementPolicy::Lfu => "Least Frequently Used",
        ReplacementPolicy::Lru => "Least Recently Used",
        ReplacementPolicy::Rr => "Random",
    }
}

/// Renders the report content as text, mirroring the original tool's
/// `tlb_chars`/`print_stats`/`print_pages` output shape. Layout beyond this
/// is explicitly out of scope (`spec.md` §1); this exists only so the binary
/// has something to print.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Virtual Address Size: {} bits", report.vas_size);
    let _ = writeln!(out, "Replacement Policy:    {}", policy_name(report.policy));
    for level in &report.levels {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- {} ---", level.name);
        let _ = writeln!(out, "Page Size:    {} bytes", level.page_size);
        let _ = writeln!(out, "Associativity: {}", level.assoc_label);
        let _ = writeln!(out, "Entries:      {}", level.entries);
        let _ = writeln!(out, "Total Accesses: {}", level.total_accesses());
        let _ = writeln!(out, "Hits:           {}", level.hit);
        let _ = writeln!(out, "Misses:         {}", level.miss);
        let _ = writeln!(out, "Hit ratio:      {:.2}%", level.hit_ratio() * 100.0);
        let _ = writeln!(out, "Miss ratio:     {:.2}%", level.miss_ratio() * 100.0);
        if let Some(pages) = &level.pages {
            let _ = writeln!(out, "Pages accessed in total: {}", pages.len());
            for (i, p) in pages.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}) Page {:#010x}, accessed {} times",
                    i + 1,
                    p.tag,
                    p.count
                );
            }
        }
    }
    out
}
