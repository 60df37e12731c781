#[macro_use]
extern crate log;

pub mod addr;
pub mod cache;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod hierarchy;
pub mod pagelog;
pub mod replacement;
pub mod report;
pub mod tlb;

pub use crate::cache::CacheDescriptor;
pub use crate::cli::Args;
pub use crate::config::{Binder, ResolvedConfig, Slot};
pub use crate::detect::{Detector, NullDetector};
pub use crate::error::{CacheError, SimError};
pub use crate::hierarchy::{Hierarchy, ReferenceKind};
pub use crate::replacement::ReplacementPolicy;
pub use crate::report::{render_text, Report};
pub use crate::tlb::TlbLevel;
