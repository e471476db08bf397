use super::ranking::{self, RankContext};
use super::stats::Statistics;
use super::types::{Assignment, ChosenOrganist, Rotation, Service, UpdatedCount, WorkingOrganist};
use crate::model::{Church, Organist, OrganistId};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info};

/// Boucle principale : mois par mois, culte par culte.
///
/// Les entrées sont déjà validées ; `months` n'est pas vide.
pub(super) fn assign_months<R: Rng + ?Sized>(
    church: &Church,
    organists: &[Organist],
    months: &[Vec<Service>],
    per_service: u32,
    reset_counts: bool,
    rng: &mut R,
) -> Rotation {
    let mut pool: Vec<WorkingOrganist> = organists
        .iter()
        .map(|o| WorkingOrganist::new(o, &church.service_days, reset_counts))
        .collect();
    let take = usize::try_from(per_service)
        .unwrap_or(usize::MAX)
        .min(pool.len());
    let mut assignments: Vec<Assignment> = Vec::new();

    for month in months {
        for w in pool.iter_mut() {
            w.monthly_count = 0;
        }
        if let Some(first) = month.first() {
            debug!(month = %first.date.format("%Y-%m"), services = month.len(), "new month");
        }

        for (index, service) in month.iter().enumerate() {
            let previous: HashSet<OrganistId> = assignments
                .last()
                .map(|a| a.chosen.iter().map(|c| c.id.clone()).collect())
                .unwrap_or_default();
            let ctx = RankContext {
                weekday: service.weekday,
                previous: &previous,
                saturation: ranking::saturation_active(&pool, month.len() - index),
            };
            let order = ranking::rank(&pool, &ctx, rng);

            let mut chosen = Vec::with_capacity(take);
            for &idx in order.iter().take(take) {
                let w = &mut pool[idx];
                chosen.push(ChosenOrganist {
                    id: w.organist.id.clone(),
                    name: w.organist.name.clone(),
                    was_available: w.organist.prefers(service.weekday),
                    was_consecutive: previous.contains(&w.organist.id),
                });
                w.record(service.weekday);
            }

            debug!(
                date = %service.date,
                saturation = ctx.saturation,
                chosen = ?chosen.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "service assigned"
            );
            assignments.push(Assignment {
                date: service.date,
                weekday: service.weekday,
                chosen,
            });
        }
    }

    let statistics = Statistics::compute(assignments.len(), per_service, &pool, &church.service_days);
    info!(
        services = statistics.total_services,
        organists = statistics.organist_count,
        std_deviation = statistics.std_deviation,
        "rotation generated"
    );

    let updated_counts = pool
        .into_iter()
        .map(|w| UpdatedCount {
            id: w.organist.id,
            name: w.organist.name,
            play_count: w.organist.play_count,
        })
        .collect();

    Rotation {
        assignments,
        updated_counts,
        statistics,
    }
}
