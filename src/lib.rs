#![forbid(unsafe_code)]
//! Organ Rota — génération de rodízios d'organistes pour les cultes (sans BD).
//!
//! - Moteur pur : aucune E/S, aléa injecté (graine reproductible).
//! - Équité mensuelle, anti-consécutif, équilibre des totaux et des jours.
//! - Registre JSON et exports CSV en dehors du moteur.

pub mod io;
pub mod model;
pub mod rotation;
pub mod storage;

pub use model::{Church, Organist, OrganistId, WeekdaySet};
pub use rotation::{
    generate, generate_from_str, generate_seeded, Assignment, ChosenOrganist, OrganistLoad,
    Rotation, RotationError, RotationOptions, Statistics, UpdatedCount,
};
pub use storage::{JsonStorage, Registry, Storage};
