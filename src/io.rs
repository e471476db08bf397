use crate::model::{weekday_name, Organist, OrganistId, WeekdaySet, WEEKDAY_NAMES};
use crate::rotation::{Assignment, Rotation, Statistics};
use anyhow::{bail, Context};
use chrono::Datelike;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Lettre de grille par jour, dimanche = 0.
const DAY_LETTERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

const GRID_LEGEND: &str =
    "Legend: S=Sunday M=Monday T=Tuesday W=Wednesday T=Thursday F=Friday S=Saturday";

/// Import d'organistes depuis CSV: header `name,preferred_days[,play_count][,id]`
pub fn import_organists_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Organist>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid organist row (empty name)");
        }
        let days = rec.get(1).unwrap_or("").trim();
        let preferred = parse_weekdays(days)
            .with_context(|| format!("invalid preferred_days for {name}"))?;
        let id = match rec.get(3).map(str::trim) {
            Some(raw) if !raw.is_empty() => OrganistId::new(raw),
            _ => OrganistId::random(),
        };
        let mut organist = Organist::with_id(id, name, preferred);
        if let Some(count) = rec.get(2) {
            let count = count.trim();
            if !count.is_empty() {
                organist.play_count = count
                    .parse()
                    .with_context(|| format!("invalid play_count for {name}"))?;
            }
        }
        out.push(organist);
    }
    Ok(out)
}

/// Parse `0;3`, `sun,wed` ou un mélange ; une chaîne vide donne un ensemble vide.
pub fn parse_weekdays(raw: &str) -> anyhow::Result<WeekdaySet> {
    let mut days = Vec::new();
    for chunk in raw.split([';', ',']).map(str::trim).filter(|c| !c.is_empty()) {
        let day = match chunk.parse::<u8>() {
            Ok(n) => n,
            Err(_) => WEEKDAY_NAMES
                .iter()
                .position(|name| name.eq_ignore_ascii_case(chunk))
                .map(|pos| pos as u8)
                .with_context(|| format!("unknown weekday: {chunk}"))?,
        };
        days.push(day);
    }
    Ok(WeekdaySet::new(days)?)
}

/// Export CSV du rodízio: header `date,weekday,organists,unavailable`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, assignments: &[Assignment]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "weekday", "organists", "unavailable"])?;
    for a in assignments {
        let names: Vec<&str> = a.chosen.iter().map(|c| c.name.as_str()).collect();
        let unavailable: Vec<&str> = a
            .chosen
            .iter()
            .filter(|c| !c.was_available)
            .map(|c| c.name.as_str())
            .collect();
        let date = a.date.to_string();
        w.write_record([
            date.as_str(),
            weekday_name(a.weekday),
            names.join("; ").as_str(),
            unavailable.join("; ").as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Grille mensuelle : organistes en lignes, jours du mois en colonnes.
///
/// Un bloc par mois (titre, en-tête, une ligne par organiste (id) ayant joué ce mois,
/// légende). Une case vaut `jour.lettre`, p. ex. `4.S` pour un dimanche 4.
pub fn write_month_grid<W: Write>(writer: W, church_name: &str, assignments: &[Assignment]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut months: Vec<Vec<&Assignment>> = Vec::new();
    for a in assignments {
        let same_month = months
            .last()
            .and_then(|m| m.first())
            .map(|f| (f.date.year(), f.date.month()) == (a.date.year(), a.date.month()))
            .unwrap_or(false);
        if same_month {
            if let Some(month) = months.last_mut() {
                month.push(a);
            }
        } else {
            months.push(vec![a]);
        }
    }

    for month in &months {
        let Some(first) = month.first() else { continue };
        let month_name = MONTH_NAMES[first.date.month0() as usize];
        w.write_record([format!(
            "{} - {} {}",
            church_name.to_uppercase(),
            month_name.to_uppercase(),
            first.date.year()
        )])?;

        let max_day = month.iter().map(|a| a.date.day()).max().unwrap_or(0);
        let mut header = vec!["ORGANIST".to_string()];
        header.extend((1..=max_day).map(|d| d.to_string()));
        w.write_record(&header)?;

        // une ligne par id, triée par nom
        let rows: BTreeSet<(&str, &OrganistId)> = month
            .iter()
            .flat_map(|a| a.chosen.iter().map(|c| (c.name.as_str(), &c.id)))
            .collect();
        for (name, id) in rows {
            let mut row = vec![name.to_string()];
            for day in 1..=max_day {
                let cell = month
                    .iter()
                    .find(|a| a.date.day() == day && a.contains(id))
                    .map(|a| format!("{day}.{}", DAY_LETTERS[usize::from(a.weekday % 7)]))
                    .unwrap_or_default();
                row.push(cell);
            }
            w.write_record(&row)?;
        }
        w.write_record([GRID_LEGEND])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_month_grid_csv<P: AsRef<Path>>(path: P, church_name: &str, assignments: &[Assignment]) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_month_grid(file, church_name, assignments)
}

/// Export CSV des statistiques: header `name,total,<jour>...`
pub fn export_statistics_csv<P: AsRef<Path>>(path: P, stats: &Statistics) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut header = vec!["name".to_string(), "total".to_string()];
    header.extend(stats.service_days.iter().map(|d| weekday_name(d).to_string()));
    w.write_record(&header)?;
    for load in &stats.distribution {
        let mut row = vec![load.name.clone(), load.total.to_string()];
        row.extend(
            stats
                .service_days
                .iter()
                .map(|d| load.by_weekday.get(&d).copied().unwrap_or(0).to_string()),
        );
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du rodízio complet (jolie mise en forme)
pub fn export_rotation_json<P: AsRef<Path>>(path: P, rotation: &Rotation) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(rotation)?;
    fs::write(path, s)?;
    Ok(())
}
