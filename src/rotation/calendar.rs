use super::Service;
use crate::model::{weekday_index, WeekdaySet};
use chrono::{Datelike, NaiveDate};

/// Dates de culte de `[start, end]`, groupées par mois calendaire.
///
/// Les mois sont en ordre chronologique, les dates aussi à l'intérieur d'un mois.
/// Aucun groupe vide n'est produit.
pub(super) fn services_by_month(
    days: &WeekdaySet,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Vec<Service>> {
    let mut months: Vec<Vec<Service>> = Vec::new();
    let mut current_key: Option<(i32, u32)> = None;
    let mut current = start;

    while current <= end {
        let weekday = weekday_index(current);
        if days.contains(weekday) {
            let key = (current.year(), current.month());
            if current_key != Some(key) {
                months.push(Vec::new());
                current_key = Some(key);
            }
            if let Some(month) = months.last_mut() {
                month.push(Service {
                    date: current,
                    weekday,
                });
            }
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    months
}
