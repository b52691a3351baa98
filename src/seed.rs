//! JSON seeding of berths and reservations.
//!
//! Seeds go through the same services as the API, so a seeded store obeys
//! the same invariants: duplicate berths and overlapping stays are skipped
//! and counted, never written.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::application::{BerthScope, BerthService, CreateReservation, ReservationService};
use crate::domain::{BerthKind, DomainError};
use crate::shared::errors::AppError;
use crate::shared::time::parse_instant;

/// One berth as found in a seed file. The camelCase names are those of
/// the historical catway exports.
#[derive(Debug, Deserialize)]
pub struct BerthSeed {
    #[serde(alias = "catwayNumber")]
    pub number: i64,
    #[serde(alias = "catwayType", alias = "type")]
    pub kind: String,
    #[serde(alias = "catwayState")]
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct ReservationSeed {
    #[serde(alias = "catwayNumber")]
    pub berth_number: i64,
    #[serde(alias = "clientName")]
    pub client_name: String,
    #[serde(alias = "boatName")]
    pub boat_name: String,
    #[serde(alias = "startDate")]
    pub start_date: String,
    #[serde(alias = "endDate")]
    pub end_date: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub berths_created: usize,
    pub berths_skipped: usize,
    pub reservations_created: usize,
    pub reservations_skipped: usize,
}

pub fn read_seed_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub struct Seeder<'a> {
    berths: &'a BerthService,
    reservations: &'a ReservationService,
}

impl<'a> Seeder<'a> {
    pub fn new(berths: &'a BerthService, reservations: &'a ReservationService) -> Self {
        Self {
            berths,
            reservations,
        }
    }

    /// Insert berths first so reservations can reference them.
    /// Storage failures abort; rejected records are skipped.
    pub async fn run(
        &self,
        berths: Vec<BerthSeed>,
        reservations: Vec<ReservationSeed>,
    ) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();

        for seed in berths {
            let number = seed.number;
            match self.seed_berth(seed).await {
                Ok(()) => report.berths_created += 1,
                Err(e @ DomainError::Storage(_)) => return Err(e.into()),
                Err(e) => {
                    warn!(berth = number, error = %e, "Berth seed skipped");
                    report.berths_skipped += 1;
                }
            }
        }

        for seed in reservations {
            let berth = seed.berth_number;
            match self.seed_reservation(seed).await {
                Ok(()) => report.reservations_created += 1,
                Err(e @ DomainError::Storage(_)) => return Err(e.into()),
                Err(e) => {
                    warn!(berth, error = %e, "Reservation seed skipped");
                    report.reservations_skipped += 1;
                }
            }
        }

        info!(?report, "🌱 Seeding finished");
        Ok(report)
    }

    async fn seed_berth(&self, seed: BerthSeed) -> Result<(), DomainError> {
        let kind: BerthKind = seed.kind.parse()?;
        self.berths.create(seed.number, kind, &seed.state).await?;
        Ok(())
    }

    async fn seed_reservation(&self, seed: ReservationSeed) -> Result<(), DomainError> {
        let input = CreateReservation {
            berth_number: Some(seed.berth_number),
            client_name: seed.client_name,
            boat_name: seed.boat_name,
            start: parse_instant("startDate", &seed.start_date)?,
            end: parse_instant("endDate", &seed.end_date)?,
        };
        self.reservations.create(BerthScope::Any, input).await?;
        Ok(())
    }
}
