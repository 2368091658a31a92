//! Payload shapes of the BiGG v2 API.
//!
//! Only the fields the mapper reads are declared; everything else in a payload
//! is ignored. Lists the server may omit default to empty.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseVersionResponse {
    pub bigg_models_version: String,
    pub api_version: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub results_count: u64,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelListEntry {
    pub bigg_id: String,
    pub metabolite_count: u64,
    pub reaction_count: u64,
    pub gene_count: u64,
    #[serde(default)]
    pub organism: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EscherMapEntry {
    pub map_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDetailsResponse {
    #[serde(default)]
    pub organism: Option<String>,
    pub gene_count: u64,
    pub reaction_count: u64,
    pub metabolite_count: u64,
    #[serde(default)]
    pub escher_maps: Vec<EscherMapEntry>,
    #[serde(default)]
    pub json_size: Value,
    #[serde(default)]
    pub xml_size: Value,
    #[serde(default)]
    pub xml_gz_size: Value,
    #[serde(default)]
    pub mat_size: Value,
    #[serde(default)]
    pub genome_name: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// A named entry in a list endpoint (reactions, universal metabolites).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntry {
    pub bigg_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetaboliteEntry {
    pub bigg_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub compartment_bigg_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneEntry {
    pub bigg_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organism: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoichiometryEntry {
    pub bigg_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub compartment_bigg_id: String,
    pub stoichiometry: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelReference {
    pub bigg_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniversalReactionResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pseudoreaction: Option<bool>,
    #[serde(default)]
    pub database_links: Map<String, Value>,
    #[serde(default)]
    pub metabolites: Vec<StoichiometryEntry>,
    #[serde(default)]
    pub models_containing_reaction: Vec<ModelReference>,
}

/// One occurrence of a reaction inside a model.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionCopy {
    pub copy_number: u32,
    #[serde(default)]
    pub gene_reaction_rule: Option<String>,
    #[serde(default)]
    pub genes: Option<Vec<GeneEntry>>,
    #[serde(default)]
    pub lower_bound: Option<f64>,
    #[serde(default)]
    pub upper_bound: Option<f64>,
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub metabolites: Option<Vec<StoichiometryEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelReactionResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub count: u32,
    #[serde(default)]
    pub pseudoreaction: Option<bool>,
    #[serde(default)]
    pub escher_maps: Vec<Value>,
    #[serde(default)]
    pub database_links: Map<String, Value>,
    #[serde(default)]
    pub metabolites: Vec<StoichiometryEntry>,
    pub results: Vec<ReactionCopy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompartmentInModel {
    pub bigg_id: String,
    pub model_bigg_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniversalMetaboliteResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formulae: Vec<Value>,
    #[serde(default)]
    pub charges: Vec<Value>,
    #[serde(default)]
    pub database_links: Map<String, Value>,
    #[serde(default)]
    pub compartments_in_models: Vec<CompartmentInModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetaboliteResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub charge: Option<i64>,
    #[serde(default)]
    pub formula: Option<String>,
    pub compartment_bigg_id: String,
    #[serde(default)]
    pub database_links: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelGeneResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub database_links: Map<String, Value>,
    #[serde(default)]
    pub protein_sequence: Option<String>,
}
