use crate::model::{Church, Organist, OrganistId};
use crate::rotation::UpdatedCount;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Registre persistant : l'église et son pool d'organistes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub church: Option<Church>,
    #[serde(default)]
    pub organists: Vec<Organist>,
}

impl Registry {
    pub fn find_organist_by_name<'a>(&'a self, name: &str) -> Option<&'a Organist> {
        self.organists.iter().find(|o| o.name == name)
    }
    pub fn find_organist_by_id<'a>(&'a self, id: &OrganistId) -> Option<&'a Organist> {
        self.organists.iter().find(|o| &o.id == id)
    }

    /// Ajoute des organistes ; refuse tout lot dont un id ou un nom est déjà
    /// pris, dans le registre ou dans le lot lui-même. Rien n'est ajouté en cas d'erreur.
    pub fn add_organists(&mut self, batch: Vec<Organist>) -> anyhow::Result<usize> {
        for (idx, o) in batch.iter().enumerate() {
            let earlier = &batch[..idx];
            if self.find_organist_by_id(&o.id).is_some() || earlier.iter().any(|e| e.id == o.id) {
                bail!("organist id already exists: {}", o.id.as_str());
            }
            if self.find_organist_by_name(&o.name).is_some() || earlier.iter().any(|e| e.name == o.name) {
                bail!("organist already exists: {}", o.name);
            }
        }
        let added = batch.len();
        self.organists.extend(batch);
        Ok(added)
    }

    /// Retire l'organiste par nom ; renvoie l'enregistrement supprimé.
    pub fn remove_organist(&mut self, name: &str) -> Option<Organist> {
        let pos = self.organists.iter().position(|o| o.name == name)?;
        Some(self.organists.remove(pos))
    }

    /// Reporte les totaux d'une génération ; les ids inconnus sont ignorés.
    pub fn apply_counts(&mut self, counts: &[UpdatedCount]) -> usize {
        let mut applied = 0;
        for count in counts {
            if let Some(o) = self.organists.iter_mut().find(|o| o.id == count.id) {
                o.play_count = count.play_count;
                applied += 1;
            }
        }
        applied
    }

    pub fn reset_counts(&mut self) {
        for o in self.organists.iter_mut() {
            o.play_count = 0;
        }
    }
}

pub trait Storage {
    /// Charge le registre ; un fichier absent donne un registre vide.
    fn load(&self) -> anyhow::Result<Registry>;
    /// Sauvegarde de manière atomique.
    fn save(&self, registry: &Registry) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Registry> {
        if !self.path.exists() {
            return Ok(Registry::default());
        }
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let registry: Registry = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(registry)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
