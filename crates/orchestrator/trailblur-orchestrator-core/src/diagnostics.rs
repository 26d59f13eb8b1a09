//! Human-readable per-call summary, emitted when `print_info` is set.

use crate::context::CallContext;

/// Summary for one call. `required_samples` is reported one-based, counting
/// the undisplaced copy as a sample.
pub fn info_text(ctx: &CallContext, required_samples: u32) -> String {
    format!(
        "Object ID       : {}\nIndex           : {}\nRequired Samples: {}",
        ctx.family.0,
        ctx.slot,
        u64::from(required_samples) + 1
    )
}
