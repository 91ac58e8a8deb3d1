//! Ready-made scheduling inputs.

use std::collections::BTreeMap;

use gantry_id::{HostId, JobId, TaskId};
use gantry_selector::{ClusterFacts, HostState, InstanceGroupFacts, TaskRequest};

/// A one-CPU batch task with no attributes.
pub fn task(application: &str) -> TaskRequest {
    TaskRequest {
        id: TaskId::new(),
        job_id: JobId::new(),
        application: application.to_string(),
        capacity_group: "default".to_string(),
        cpu: 1.0,
        memory_mb: 1_024,
        attributes: BTreeMap::new(),
    }
}

/// An idle host in `instance_group`.
pub fn host(instance_group: &str) -> HostState {
    HostState {
        id: HostId::new(),
        instance_group: instance_group.to_string(),
        available_cpu: 16.0,
        available_memory_mb: 65_536,
        attributes: BTreeMap::new(),
    }
}

/// A cluster with one `critical` and one `flex` instance group.
pub fn two_tier_cluster() -> ClusterFacts {
    let mut cluster = ClusterFacts::default();
    cluster.instance_groups.insert(
        "critical-1".to_string(),
        InstanceGroupFacts {
            tier: "critical".to_string(),
            instance_type: "r5.8xlarge".to_string(),
            attributes: BTreeMap::new(),
        },
    );
    cluster.instance_groups.insert(
        "flex-1".to_string(),
        InstanceGroupFacts {
            tier: "flex".to_string(),
            instance_type: "m5.4xlarge".to_string(),
            attributes: BTreeMap::from([("gpu".to_string(), "false".to_string())]),
        },
    );
    cluster
}
