//! CLI subcommand implementations.

pub mod grid;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use ra_core::Snapshot;

/// Reads and parses a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A small campus: two sections allocate, one conflicts on its
    /// professor, and one needs a laboratory larger than any on offer.
    pub const CAMPUS: &str = r#"{
        "rooms": [
            {"id": "A-101", "name": "Room 101", "building": "Block A", "capacity": 40, "kind": "standard"},
            {"id": "Lab-201", "name": "Computer Lab", "building": "Block B", "capacity": 20, "kind": "laboratory"}
        ],
        "professors": [
            {"id": "silva", "name": "Dr. Silva", "specialties": ["Math"], "availability": ["Mon 08:00"]},
            {"id": "santos", "name": "Dr. Santos", "specialties": ["Programming", "Physics"], "availability": ["Mon 14:00"]}
        ],
        "courses": [
            {"id": "mat001", "code": "MAT001", "name": "Calculus I", "subject_area": "Math", "weekly_hours": 4},
            {"id": "inf102", "code": "INF102", "name": "Programming II", "subject_area": "Programming", "weekly_hours": 4, "room_kind": "laboratory"},
            {"id": "fis201", "code": "FIS201", "name": "Physics II", "subject_area": "Physics", "weekly_hours": 4, "room_kind": "laboratory"}
        ],
        "sections": [
            {"id": "MAT001-A", "course": "mat001", "professor": "silva", "students": 30, "period": "morning"},
            {"id": "MAT001-B", "course": "mat001", "professor": "silva", "students": 30, "period": "morning"},
            {"id": "INF102-B", "course": "inf102", "professor": "santos", "students": 20, "period": "afternoon"},
            {"id": "FIS201-A", "course": "fis201", "professor": "santos", "students": 40, "period": "morning"}
        ]
    }"#;
}
