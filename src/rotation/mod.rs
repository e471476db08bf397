mod assignment;
mod calendar;
mod ranking;
mod stats;
mod types;

pub use stats::{OrganistLoad, Statistics};
pub use types::{
    Assignment, ChosenOrganist, Rotation, RotationError, RotationOptions, Service, UpdatedCount,
};

use crate::model::{Church, Organist};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Génère un rodízio équitable sur `[start, end]`.
///
/// `organists` n'est jamais modifié : les nouveaux totaux sont dans
/// `Rotation::updated_counts`, à reporter par l'appelant. Toute erreur est
/// levée avant la première assignation.
pub fn generate<R: Rng + ?Sized>(
    church: &Church,
    organists: &[Organist],
    start: NaiveDate,
    end: NaiveDate,
    opts: RotationOptions,
    rng: &mut R,
) -> Result<Rotation, RotationError> {
    if start > end {
        return Err(RotationError::InvalidPeriod(format!(
            "start {start} is after end {end}"
        )));
    }
    if church.service_days.is_empty() {
        return Err(RotationError::EmptyServiceDays);
    }
    if opts.per_service == 0 {
        return Err(RotationError::InvalidPerService);
    }
    if organists.is_empty() {
        return Err(RotationError::InsufficientWorkers);
    }
    let mut ids = HashSet::with_capacity(organists.len());
    if let Some(dup) = organists.iter().find(|o| !ids.insert(&o.id)) {
        return Err(RotationError::DuplicateOrganist(dup.id.as_str().to_string()));
    }

    let months = calendar::services_by_month(&church.service_days, start, end);
    if months.is_empty() {
        return Err(RotationError::NoServicesInRange);
    }

    // un organiste joue au plus une fois par culte
    let services: usize = months.iter().map(Vec::len).sum();
    if !opts.reset_counts {
        let headroom = |o: &Organist| (u32::MAX - o.play_count) as usize;
        if let Some(full) = organists.iter().find(|o| headroom(o) < services) {
            return Err(RotationError::CountOverflow {
                name: full.name.clone(),
                services,
            });
        }
    }

    Ok(assignment::assign_months(
        church,
        organists,
        &months,
        opts.per_service,
        opts.reset_counts,
        rng,
    ))
}

/// Variante reproductible : même graine, même rodízio.
pub fn generate_seeded(
    church: &Church,
    organists: &[Organist],
    start: NaiveDate,
    end: NaiveDate,
    opts: RotationOptions,
    seed: u64,
) -> Result<Rotation, RotationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(church, organists, start, end, opts, &mut rng)
}

/// Comme [`generate`], avec des dates `YYYY-MM-DD`.
pub fn generate_from_str<R: Rng + ?Sized>(
    church: &Church,
    organists: &[Organist],
    start: &str,
    end: &str,
    opts: RotationOptions,
    rng: &mut R,
) -> Result<Rotation, RotationError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    generate(church, organists, start, end, opts, rng)
}

/// Parse une date `YYYY-MM-DD` ; `InvalidPeriod` sinon.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RotationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RotationError::InvalidPeriod(format!("invalid date: {raw:?}")))
}
