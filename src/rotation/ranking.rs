use super::types::WorkingOrganist;
use crate::model::OrganistId;
use rand::Rng;
use std::collections::HashSet;

/// Contexte d'un culte à pourvoir.
pub(super) struct RankContext<'a> {
    pub weekday: u8,
    /// Organistes du culte précédent (tous mois confondus).
    pub previous: &'a HashSet<OrganistId>,
    /// Tant qu'il reste assez de cultes dans le mois pour que chacun joue,
    /// ceux qui ont déjà joué passent derrière les autres.
    pub saturation: bool,
}

/// Vrai si la règle de saturation mensuelle s'applique.
pub(super) fn saturation_active(pool: &[WorkingOrganist], remaining_in_month: usize) -> bool {
    let not_yet = pool.iter().filter(|w| w.monthly_count == 0).count();
    not_yet > 0 && remaining_in_month >= not_yet
}

/// Indices de `pool` du plus prioritaire au moins prioritaire.
///
/// Chaîne de départage, chaque critère ne joue qu'en cas d'égalité du précédent :
/// saturation mensuelle, `monthly_count` croissant, hors culte précédent d'abord,
/// `play_count` croissant, compteur du jour croissant, préférence du jour, puis
/// clé aléatoire tirée de `rng`.
pub(super) fn rank<R: Rng + ?Sized>(
    pool: &[WorkingOrganist],
    ctx: &RankContext<'_>,
    rng: &mut R,
) -> Vec<usize> {
    let mut keyed: Vec<(RankKey, usize)> = pool
        .iter()
        .enumerate()
        .map(|(idx, w)| (RankKey::new(w, ctx, rng.gen()), idx))
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, idx)| idx).collect()
}

/// Clé lexicographique ; l'ordre des champs est l'ordre des critères.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    saturated: bool,
    monthly_count: u32,
    was_previous: bool,
    play_count: u32,
    weekday_count: u32,
    not_preferred: bool,
    tie: u64,
}

impl RankKey {
    fn new(w: &WorkingOrganist, ctx: &RankContext<'_>, tie: u64) -> Self {
        Self {
            saturated: ctx.saturation && w.monthly_count > 0,
            monthly_count: w.monthly_count,
            was_previous: ctx.previous.contains(&w.organist.id),
            play_count: w.organist.play_count,
            weekday_count: w.weekday_count(ctx.weekday),
            not_preferred: !w.organist.prefers(ctx.weekday),
            tie,
        }
    }
}
