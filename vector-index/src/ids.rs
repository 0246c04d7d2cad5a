//! Point id assignment.

use uuid::Uuid;

/// Deterministic UUIDv5 derived from an episode id.
///
/// Re-syncing the same episode overwrites its point instead of piling up
/// duplicates.
pub fn stable_point_id(episode_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, episode_id.as_bytes())
}

/// Fresh random point id; every upsert lands as a new point.
pub fn random_point_id() -> Uuid {
    Uuid::new_v4()
}
