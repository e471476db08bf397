use crate::model::{Organist, OrganistId, WeekdaySet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::stats::Statistics;

/// Options de génération
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOptions {
    pub per_service: u32,
    /// Repart de zéro au lieu de reporter `play_count`.
    pub reset_counts: bool,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            per_service: 1,
            reset_counts: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum RotationError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("no service day in the selected period")]
    NoServicesInRange,
    #[error("at least one organist is required")]
    InsufficientWorkers,
    #[error("church has no service day")]
    EmptyServiceDays,
    #[error("per_service must be at least 1")]
    InvalidPerService,
    #[error("invalid weekday index: {0} (expected 0..=6, Sunday = 0)")]
    InvalidWeekday(u8),
    #[error("duplicate organist id: {0}")]
    DuplicateOrganist(String),
    #[error("play_count of {name} cannot absorb {services} more service(s)")]
    CountOverflow { name: String, services: usize },
}

/// Date de culte issue du balayage de la période.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub date: NaiveDate,
    pub weekday: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenOrganist {
    pub id: OrganistId,
    pub name: String,
    /// Le jour faisait partie de ses préférences.
    pub was_available: bool,
    /// Déjà choisi pour le culte précédent.
    pub was_consecutive: bool,
}

/// Organistes retenus pour un culte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub date: NaiveDate,
    pub weekday: u8,
    pub chosen: Vec<ChosenOrganist>,
}

impl Assignment {
    pub fn contains(&self, id: &OrganistId) -> bool {
        self.chosen.iter().any(|c| &c.id == id)
    }
}

/// Total à reporter dans le registre après une génération.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedCount {
    pub id: OrganistId,
    pub name: String,
    pub play_count: u32,
}

/// Résultat complet d'une génération.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rotation {
    pub assignments: Vec<Assignment>,
    pub updated_counts: Vec<UpdatedCount>,
    pub statistics: Statistics,
}

/// Copie de travail d'un organiste, avec les compteurs propres au run.
#[derive(Debug, Clone)]
pub(super) struct WorkingOrganist {
    pub organist: Organist,
    pub monthly_count: u32,
    pub weekday_count: BTreeMap<u8, u32>,
}

impl WorkingOrganist {
    pub fn new(source: &Organist, service_days: &WeekdaySet, reset_counts: bool) -> Self {
        let mut organist = source.clone();
        if reset_counts {
            organist.play_count = 0;
        }
        Self {
            organist,
            monthly_count: 0,
            weekday_count: service_days.iter().map(|d| (d, 0)).collect(),
        }
    }

    pub fn weekday_count(&self, day: u8) -> u32 {
        self.weekday_count.get(&day).copied().unwrap_or(0)
    }

    pub fn record(&mut self, day: u8) {
        self.organist.play_count += 1;
        self.monthly_count += 1;
        *self.weekday_count.entry(day).or_insert(0) += 1;
    }
}
