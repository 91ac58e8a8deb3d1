//! Identifier types for scheduling objects.

use crate::define_id;

// =============================================================================
// Workload
// =============================================================================

define_id!(
    /// A job submitted to the scheduler.
    JobId,
    "job"
);
define_id!(
    /// A single task of a job, the unit being placed.
    TaskId,
    "task"
);

// =============================================================================
// Capacity
// =============================================================================

define_id!(
    /// A host (agent) offering capacity for task placement.
    HostId,
    "host"
);

// =============================================================================
// Placement rules
// =============================================================================

define_id!(
    /// A system selector: a named group of placement rules.
    SelectorId,
    "sel"
);
