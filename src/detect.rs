//! Auto-detector collaborator (external, out of scope per `spec.md` §1). This
//! module only defines the seam a real host-topology prober would plug into.

use crate::cache::{CacheDescriptor, UNDEFINED};
use crate::config::Slot;

/// Fills in descriptors for slots the user did not supply on the command
/// line. A real implementation would probe `/sys/devices/system/cpu` or
/// similar; this crate ships only the trait boundary plus a detector that
/// always reports "undefined", matching the contract `spec.md` describes for
/// "absence of auto-detection".
pub trait Detector {
    fn detect(&self, slot: Slot) -> CacheDescriptor;
}

/// Default detector used when no host-topology prober is wired in: every
/// slot comes back undefined, `(-1, -1, -1)`.
pub struct NullDetector;

impl Detector for NullDetector {
    fn detect(&self, _slot: Slot) -> CacheDescriptor {
        UNDEFINED
    }
}
