//! Hazard alerts and evacuation shelters
//!
//! Read-only reference data loaded from the `[advisories]` config section and
//! shown to citizens next to the reporting form.

use serde::{Deserialize, Serialize};
use sosnet_core::{AdvisoryConfig, HazardEntry, ShelterEntry, ShelterStatus};

/// Hazard alert for an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: String,
    /// e.g. "Flood", "Landslide"
    pub kind: String,
    pub area: String,
    pub active: bool,
}

impl From<&HazardEntry> for Hazard {
    fn from(entry: &HazardEntry) -> Self {
        Self {
            id: entry.id.clone(),
            kind: entry.kind.clone(),
            area: entry.area.clone(),
            active: entry.active,
        }
    }
}

/// Evacuation shelter and its current load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub distance: String,
    pub status: ShelterStatus,
    pub occupancy: u32,
    pub capacity: u32,
}

impl Shelter {
    /// Free places; a closed shelter has none.
    pub fn available(&self) -> u32 {
        match self.status {
            ShelterStatus::Closed => 0,
            ShelterStatus::Open | ShelterStatus::Limited => {
                self.capacity.saturating_sub(self.occupancy)
            }
        }
    }

    /// Occupancy as a whole percentage of capacity.
    pub fn occupancy_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 100;
        }
        (u64::from(self.occupancy) * 100 / u64::from(self.capacity)) as u32
    }
}

impl From<&ShelterEntry> for Shelter {
    fn from(entry: &ShelterEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            distance: entry.distance.clone(),
            status: entry.status,
            occupancy: entry.occupancy,
            capacity: entry.capacity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdvisoryBoard {
    hazards: Vec<Hazard>,
    shelters: Vec<Shelter>,
}

impl AdvisoryBoard {
    pub fn new(hazards: Vec<Hazard>, shelters: Vec<Shelter>) -> Self {
        Self { hazards, shelters }
    }

    pub fn from_config(config: &AdvisoryConfig) -> Self {
        Self::new(
            config.hazards.iter().map(Hazard::from).collect(),
            config.shelters.iter().map(Shelter::from).collect(),
        )
    }

    /// Hazards currently in effect, in configured order.
    pub fn active_hazards(&self) -> Vec<Hazard> {
        self.hazards.iter().filter(|h| h.active).cloned().collect()
    }

    /// Shelters with the most free places first. Ties keep configured order.
    pub fn shelters(&self) -> Vec<Shelter> {
        let mut shelters = self.shelters.clone();
        shelters.sort_by(|a, b| b.available().cmp(&a.available()));
        shelters
    }
}
