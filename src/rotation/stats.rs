use super::types::WorkingOrganist;
use crate::model::WeekdaySet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Charge finale d'un organiste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganistLoad {
    pub name: String,
    pub total: u32,
    pub by_weekday: BTreeMap<u8, u32>,
}

/// Indicateurs d'équité d'une génération.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_services: usize,
    pub organist_count: usize,
    /// `total_services × per_service / organist_count`
    pub mean_per_organist: f64,
    /// Écart-type de population des totaux finaux autour de la moyenne.
    pub std_deviation: f64,
    pub service_days: WeekdaySet,
    pub distribution: Vec<OrganistLoad>,
}

impl Statistics {
    /// `pool` n'est jamais vide : `generate` rejette un pool vide.
    pub(super) fn compute(
        total_services: usize,
        per_service: u32,
        pool: &[WorkingOrganist],
        service_days: &WeekdaySet,
    ) -> Self {
        let organist_count = pool.len();
        let n = organist_count as f64;
        let mean = (total_services as f64 * f64::from(per_service)) / n;
        let variance = pool
            .iter()
            .map(|w| (f64::from(w.organist.play_count) - mean).powi(2))
            .sum::<f64>()
            / n;

        Self {
            total_services,
            organist_count,
            mean_per_organist: mean,
            std_deviation: variance.sqrt(),
            service_days: service_days.clone(),
            distribution: pool
                .iter()
                .map(|w| OrganistLoad {
                    name: w.organist.name.clone(),
                    total: w.organist.play_count,
                    by_weekday: w.weekday_count.clone(),
                })
                .collect(),
        }
    }

    pub fn min_total(&self) -> Option<u32> {
        self.distribution.iter().map(|d| d.total).min()
    }

    pub fn max_total(&self) -> Option<u32> {
        self.distribution.iter().map(|d| d.total).max()
    }

    /// Écart entre le plus et le moins chargé.
    pub fn spread(&self) -> u32 {
        match (self.min_total(), self.max_total()) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Organist, WeekdaySet};

    fn pool(totals: &[u32]) -> Vec<WorkingOrganist> {
        let days = WeekdaySet::new([0]).unwrap();
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut o = Organist::new(format!("o{i}"), WeekdaySet::default());
                o.play_count = *t;
                WorkingOrganist::new(&o, &days, false)
            })
            .collect()
    }

    #[test]
    fn population_std_deviation() {
        // moyenne 2, totaux 1/2/3 -> variance 2/3
        let stats = Statistics::compute(6, 1, &pool(&[1, 2, 3]), &WeekdaySet::new([0]).unwrap());
        assert_eq!(stats.mean_per_organist, 2.0);
        assert!((stats.std_deviation - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.spread(), 2);
    }

    #[test]
    fn even_load_has_zero_deviation() {
        let stats = Statistics::compute(4, 2, &pool(&[4, 4]), &WeekdaySet::new([0]).unwrap());
        assert_eq!(stats.mean_per_organist, 4.0);
        assert_eq!(stats.std_deviation, 0.0);
        assert_eq!(stats.distribution[0].by_weekday.get(&0), Some(&0));
    }
}
