//! Domain objects for metabolic models.
//!
//! The shapes follow the COBRA JSON model format so a downloaded model can be
//! parsed, inspected and written back out. Keys this crate does not know about
//! are kept in each object's `extra` map.

use crate::utils::error::{BiggError, Result};
use crate::utils::tabular;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

pub type Annotation = Map<String, Value>;

pub const DEFAULT_LOWER_BOUND: f64 = 0.0;
pub const DEFAULT_UPPER_BOUND: f64 = 1000.0;

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_lower_bound() -> f64 {
    DEFAULT_LOWER_BOUND
}

fn default_upper_bound() -> f64 {
    DEFAULT_UPPER_BOUND
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolite {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<i64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub annotation: Annotation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metabolite {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            compartment: None,
            formula: None,
            charge: None,
            annotation: Annotation::new(),
            extra: Map::new(),
        }
    }

    /// Copy of this metabolite placed in `compartment` under a new id.
    pub fn with_compartment(&self, id: impl Into<String>, compartment: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.id = id.into();
        copy.compartment = Some(compartment.into());
        copy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub annotation: Annotation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Gene {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            annotation: Annotation::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Species id to stoichiometric coefficient.
    #[serde(default)]
    pub metabolites: BTreeMap<String, f64>,
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub gene_reaction_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsystem: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub annotation: Annotation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Participating metabolites keyed by species id. Not part of the file format.
    #[serde(skip)]
    pub species: BTreeMap<String, Metabolite>,
    #[serde(skip)]
    pub genes: BTreeMap<String, Gene>,
}

impl Reaction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metabolites: BTreeMap::new(),
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            gene_reaction_rule: String::new(),
            subsystem: None,
            annotation: Annotation::new(),
            extra: Map::new(),
            species: BTreeMap::new(),
            genes: BTreeMap::new(),
        }
    }

    /// Replaces the coefficient of `metabolite` rather than adding to it.
    pub fn set_stoichiometry(&mut self, metabolite: Metabolite, coefficient: f64) {
        self.metabolites.insert(metabolite.id.clone(), coefficient);
        self.species.insert(metabolite.id.clone(), metabolite);
    }

    pub fn coefficient(&self, species_id: &str) -> Option<f64> {
        self.metabolites.get(species_id).copied()
    }

    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.0 && self.upper_bound > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compartments: BTreeMap<String, String>,
    #[serde(default)]
    pub metabolites: Vec<Metabolite>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub genes: Vec<Gene>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn metabolite(&self, id: &str) -> Option<&Metabolite> {
        self.metabolites.iter().find(|m| m.id == id)
    }

    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.id == id)
    }

    pub fn gene(&self, id: &str) -> Option<&Gene> {
        self.genes.iter().find(|g| g.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    pub api_version: String,
    pub last_updated: String,
}

impl Version {
    pub fn last_updated_at(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(&self.last_updated, "%Y-%m-%d %H:%M:%S%.f").ok()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BiGG Database v{} (API {}). Last update: {}",
            self.version, self.api_version, self.last_updated
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "xml")]
    Xml,
    #[serde(rename = "xml.gz")]
    XmlGz,
    #[serde(rename = "mat")]
    Mat,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 4] = [
        ModelFormat::Json,
        ModelFormat::Xml,
        ModelFormat::XmlGz,
        ModelFormat::Mat,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Xml => "xml",
            ModelFormat::XmlGz => "xml.gz",
            ModelFormat::Mat => "mat",
        }
    }

    pub fn file_name(&self, model_id: &str) -> String {
        format!("{}.{}", model_id, self.extension())
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ModelFormat {
    type Err = BiggError;

    fn from_str(s: &str) -> Result<Self> {
        ModelFormat::ALL
            .into_iter()
            .find(|format| format.extension() == s)
            .ok_or_else(|| BiggError::InvalidConfigValueError {
                field: "format".to_string(),
                value: s.to_string(),
                reason: "Valid formats: json, xml, xml.gz, mat".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListing {
    pub bigg_id: String,
    pub metabolites: u64,
    pub reactions: u64,
    pub genes: u64,
    pub organism: String,
}

/// Model list in column order `bigg_id, metabolites, reactions, genes, organism`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelTable {
    pub rows: Vec<ModelListing>,
}

impl ModelTable {
    pub const COLUMNS: [&'static str; 5] = ["bigg_id", "metabolites", "reactions", "genes", "organism"];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, bigg_id: &str) -> Option<&ModelListing> {
        self.rows.iter().find(|row| row.bigg_id == bigg_id)
    }

    pub fn to_csv(&self) -> Result<String> {
        self.to_delimited(b',')
    }

    pub fn to_tsv(&self) -> Result<String> {
        self.to_delimited(b'\t')
    }

    fn to_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = tabular::writer(delimiter, false);
        writer.write_record(Self::COLUMNS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        tabular::into_string(writer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub organism: String,
    pub genes: u64,
    pub reactions: u64,
    pub metabolites: u64,
    pub escher_maps: BTreeSet<String>,
    /// Size text as reported by the server (e.g. "9.9 MB").
    pub file_sizes: BTreeMap<ModelFormat, String>,
    pub genome: String,
    pub last_updated: String,
}

/// Metabolites and genes already known to the caller, reused when building reactions.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    pub metabolites: HashMap<String, Metabolite>,
    pub genes: HashMap<String, Gene>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        self.metabolites.insert(metabolite.id.clone(), metabolite);
    }

    pub fn add_gene(&mut self, gene: Gene) {
        self.genes.insert(gene.id.clone(), gene);
    }

    pub fn is_empty(&self) -> bool {
        self.metabolites.is_empty() && self.genes.is_empty()
    }
}
