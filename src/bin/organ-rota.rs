#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use organ_rota::{
    io,
    model::{weekday_name, Church, Organist},
    rotation::{self, RotationOptions},
    storage::{JsonStorage, Storage},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de rodízio d'organistes (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du registre
    #[arg(long, global = true, default_value = "rota.json")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Définir l'église et ses jours de culte
    SetChurch {
        #[arg(long)]
        name: String,
        /// liste "0,3" ou "sun,wed" (dimanche = 0)
        #[arg(long)]
        days: String,
    },

    /// Ajouter une organiste
    AddOrganist {
        #[arg(long)]
        name: String,
        /// jours préférés, même format que `--days`
        #[arg(long, default_value = "")]
        days: String,
        #[arg(long, default_value_t = 0)]
        play_count: u32,
    },

    /// Retirer une organiste par nom
    RemoveOrganist {
        #[arg(long)]
        name: String,
    },

    /// Importer des organistes depuis un CSV
    ImportOrganists {
        #[arg(long)]
        csv: String,
    },

    /// Afficher l'église et le pool
    List,

    /// Générer le rodízio et reporter les totaux
    Generate {
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 1)]
        per_service: u32,
        /// Graine pour un résultat reproductible
        #[arg(long)]
        seed: Option<u64>,
        /// Ignore les totaux existants
        #[arg(long)]
        reset_counts: bool,
        /// N'écrit pas les totaux dans le registre
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_grid: Option<String>,
        #[arg(long)]
        out_stats: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Remettre tous les totaux à zéro
    ResetCounts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.store)?;
    let mut registry = storage.load()?;

    match cli.cmd {
        Commands::SetChurch { name, days } => {
            let days = io::parse_weekdays(&days)?;
            registry.church = Some(Church::new(name, days)?);
            storage.save(&registry)?;
        }
        Commands::AddOrganist {
            name,
            days,
            play_count,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("organist name cannot be empty");
            }
            let mut organist = Organist::new(name, io::parse_weekdays(&days)?);
            organist.play_count = play_count;
            registry.add_organists(vec![organist])?;
            storage.save(&registry)?;
        }
        Commands::RemoveOrganist { name } => {
            if registry.remove_organist(&name).is_none() {
                bail!("unknown organist: {name}");
            }
            storage.save(&registry)?;
        }
        Commands::ImportOrganists { csv } => {
            let organists = io::import_organists_csv(&csv)?;
            let added = registry.add_organists(organists)?;
            println!("Imported {added} organist(s)");
            storage.save(&registry)?;
        }
        Commands::List => {
            match &registry.church {
                Some(c) => println!("{} | {}", c.name, c.service_days),
                None => println!("(no church)"),
            }
            for o in &registry.organists {
                println!("{} | {} | {}", o.name, o.preferred_days, o.play_count);
            }
        }
        Commands::Generate {
            start,
            end,
            per_service,
            seed,
            reset_counts,
            dry_run,
            out_csv,
            out_grid,
            out_stats,
            out_json,
        } => {
            let church = registry
                .church
                .clone()
                .context("no church configured (run set-church first)")?;
            let opts = RotationOptions {
                per_service,
                reset_counts,
            };
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            let result = rotation::generate_from_str(
                &church,
                &registry.organists,
                &start,
                &end,
                opts,
                &mut rng,
            )?;

            for a in &result.assignments {
                let names: Vec<String> = a
                    .chosen
                    .iter()
                    .map(|c| {
                        if c.was_available {
                            c.name.clone()
                        } else {
                            format!("{} (unavailable)", c.name)
                        }
                    })
                    .collect();
                println!("{} | {} | {}", a.date, weekday_name(a.weekday), names.join(", "));
            }
            let stats = &result.statistics;
            println!(
                "services: {} | organists: {} | mean: {:.2} | std dev: {:.2} | spread: {}",
                stats.total_services,
                stats.organist_count,
                stats.mean_per_organist,
                stats.std_deviation,
                stats.spread()
            );

            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &result.assignments)?;
            }
            if let Some(path) = out_grid {
                io::export_month_grid_csv(path, &church.name, &result.assignments)?;
            }
            if let Some(path) = out_stats {
                io::export_statistics_csv(path, stats)?;
            }
            if let Some(path) = out_json {
                io::export_rotation_json(path, &result)?;
            }

            if !dry_run {
                registry.apply_counts(&result.updated_counts);
                storage.save(&registry)?;
            }
        }
        Commands::ResetCounts => {
            registry.reset_counts();
            storage.save(&registry)?;
        }
    }

    Ok(())
}
