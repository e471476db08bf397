use crate::rotation::RotationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Abréviations des jours, dimanche = 0.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Index 0..=6 du jour de la semaine (dimanche = 0).
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Nom court d'un index de jour ; `?` hors bornes.
pub fn weekday_name(day: u8) -> &'static str {
    WEEKDAY_NAMES.get(usize::from(day)).copied().unwrap_or("?")
}

/// Ensemble ordonné de jours de la semaine (0..=6, dimanche = 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(BTreeSet<u8>);

impl WeekdaySet {
    pub fn new<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, RotationError> {
        let mut set = BTreeSet::new();
        for day in days {
            if day > 6 {
                return Err(RotationError::InvalidWeekday(day));
            }
            set.insert(day);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, day: u8) -> bool {
        self.0.contains(&day)
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = RotationError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.0.into_iter().collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(weekday_name).collect();
        f.write_str(&names.join(", "))
    }
}

/// Identifiant fort pour Organist
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganistId(String);

impl OrganistId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Église : nom et jours de culte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Church {
    pub name: String,
    pub service_days: WeekdaySet,
}

impl Church {
    pub fn new<N: Into<String>>(name: N, service_days: WeekdaySet) -> Result<Self, RotationError> {
        if service_days.is_empty() {
            return Err(RotationError::EmptyServiceDays);
        }
        Ok(Self {
            name: name.into(),
            service_days,
        })
    }
}

/// Organiste du pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organist {
    pub id: OrganistId,
    pub name: String,
    #[serde(default)]
    pub preferred_days: WeekdaySet,
    /// Total cumulé des cultes joués, reporté d'une génération à l'autre.
    #[serde(default)]
    pub play_count: u32,
}

impl Organist {
    pub fn new<N: Into<String>>(name: N, preferred_days: WeekdaySet) -> Self {
        Self {
            id: OrganistId::random(),
            name: name.into(),
            preferred_days,
            play_count: 0,
        }
    }

    pub fn with_id<N: Into<String>>(id: OrganistId, name: N, preferred_days: WeekdaySet) -> Self {
        Self {
            id,
            name: name.into(),
            preferred_days,
            play_count: 0,
        }
    }

    pub fn prefers(&self, day: u8) -> bool {
        self.preferred_days.contains(day)
    }
}
