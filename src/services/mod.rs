//! Business logic services

pub mod circulation;
pub mod scan;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub circulation: circulation::CirculationService,
    pub scan: scan::ScanService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            circulation: circulation::CirculationService::new(repository.clone()),
            scan: scan::ScanService::new(repository),
        }
    }
}
