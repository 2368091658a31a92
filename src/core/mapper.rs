//! Conversion of API payloads into domain objects.

use crate::core::identifiers::{copy_id, species_id};
use crate::core::responses::{
    DatabaseVersionResponse, GeneEntry, ListResponse, ModelDetailsResponse, ModelGeneResponse,
    ModelListEntry, ModelMetaboliteEntry, ModelMetaboliteResponse, ModelReactionResponse,
    NamedEntry, ReactionCopy, StoichiometryEntry, UniversalMetaboliteResponse,
    UniversalReactionResponse,
};
use crate::domain::model::{
    EntityRegistry, Gene, Metabolite, ModelFormat, ModelListing, ModelSummary, ModelTable,
    Reaction, Version,
};
use crate::utils::error::{BiggError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const CHARGES: &str = "charges";
pub const DATABASE_LINKS: &str = "database_links";
pub const ESCHER_MAPS: &str = "escher_maps";
pub const FORMULAE: &str = "formulae";
pub const MODELS: &str = "models";
pub const MODELS_CONTAINING_REACTION: &str = "models_containing_reaction";
pub const ORGANISM: &str = "organism";
pub const PROTEIN_SEQUENCE: &str = "protein_sequence";
pub const PSEUDOREACTION: &str = "pseudoreaction";

pub fn version(data: DatabaseVersionResponse) -> Version {
    Version {
        version: data.bigg_models_version,
        api_version: data.api_version,
        last_updated: data.last_updated,
    }
}

pub fn model_table(data: ListResponse<ModelListEntry>) -> ModelTable {
    let rows = data
        .results
        .into_iter()
        .map(|entry| ModelListing {
            bigg_id: entry.bigg_id,
            metabolites: entry.metabolite_count,
            reactions: entry.reaction_count,
            genes: entry.gene_count,
            organism: entry.organism.unwrap_or_default(),
        })
        .collect();
    ModelTable { rows }
}

fn size_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn model_summary(model_id: &str, data: ModelDetailsResponse) -> ModelSummary {
    let mut file_sizes = BTreeMap::new();
    for (format, size) in [
        (ModelFormat::Xml, &data.xml_size),
        (ModelFormat::Json, &data.json_size),
        (ModelFormat::Mat, &data.mat_size),
        (ModelFormat::XmlGz, &data.xml_gz_size),
    ] {
        if let Some(text) = size_text(size) {
            file_sizes.insert(format, text);
        }
    }

    let escher_maps: BTreeSet<String> = data.escher_maps.into_iter().map(|m| m.map_name).collect();

    ModelSummary {
        id: model_id.to_string(),
        organism: data.organism.unwrap_or_default(),
        genes: data.gene_count,
        reactions: data.reaction_count,
        metabolites: data.metabolite_count,
        escher_maps,
        file_sizes,
        genome: data.genome_name.unwrap_or_default(),
        last_updated: data.last_updated.unwrap_or_default(),
    }
}

/// Reactions without stoichiometry, first occurrence of each id wins.
pub fn named_reactions(entries: Vec<NamedEntry>) -> Vec<Reaction> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.bigg_id.clone()))
        .map(|entry| Reaction::new(entry.bigg_id, entry.name.unwrap_or_default()))
        .collect()
}

pub fn universal_metabolites(entries: Vec<NamedEntry>) -> Vec<Metabolite> {
    entries
        .into_iter()
        .map(|entry| Metabolite::new(entry.bigg_id, entry.name.unwrap_or_default()))
        .collect()
}

/// Model metabolites keyed by species id (`{bigg_id}_{compartment}`).
pub fn model_metabolites(entries: Vec<ModelMetaboliteEntry>) -> Vec<Metabolite> {
    let mut seen = HashSet::new();
    let mut metabolites = Vec::new();
    for entry in entries {
        let id = species_id(&entry.bigg_id, &entry.compartment_bigg_id);
        if !seen.insert(id.clone()) {
            continue;
        }
        let mut metabolite = Metabolite::new(id, entry.name.unwrap_or_default());
        metabolite.compartment = Some(entry.compartment_bigg_id);
        metabolites.push(metabolite);
    }
    metabolites
}

pub fn genes(entries: Vec<GeneEntry>) -> Vec<Gene> {
    entries
        .into_iter()
        .map(|entry| {
            let mut gene = Gene::new(entry.bigg_id, entry.name.unwrap_or_default());
            if let Some(organism) = entry.organism {
                gene.annotation.insert(ORGANISM.to_string(), Value::String(organism));
            }
            gene
        })
        .collect()
}

/// Resolves participants while building reactions.
///
/// `shared` is what the caller already knows (universal metabolite ids, gene
/// ids); `local` collects what was created during this call so that copies of
/// one reaction share their metabolite and gene objects.
struct ReactionBuilder<'a> {
    shared: &'a EntityRegistry,
    local: EntityRegistry,
}

impl<'a> ReactionBuilder<'a> {
    fn new(shared: &'a EntityRegistry) -> Self {
        Self {
            shared,
            local: EntityRegistry::new(),
        }
    }

    fn metabolite(&mut self, entry: &StoichiometryEntry) -> Metabolite {
        let id = species_id(&entry.bigg_id, &entry.compartment_bigg_id);
        if let Some(existing) = self.local.metabolites.get(&id) {
            return existing.clone();
        }

        let metabolite = match self.shared.metabolites.get(&entry.bigg_id) {
            Some(universal) => universal.with_compartment(id, entry.compartment_bigg_id.clone()),
            None => {
                let mut metabolite = Metabolite::new(id, entry.name.clone().unwrap_or_default());
                metabolite.compartment = Some(entry.compartment_bigg_id.clone());
                metabolite
            }
        };
        self.local.add_metabolite(metabolite.clone());
        metabolite
    }

    fn gene(&mut self, entry: &GeneEntry) -> Gene {
        if let Some(gene) = self.shared.genes.get(&entry.bigg_id) {
            return gene.clone();
        }
        if let Some(gene) = self.local.genes.get(&entry.bigg_id) {
            return gene.clone();
        }
        let gene = Gene::new(entry.bigg_id.clone(), entry.name.clone().unwrap_or_default());
        self.local.add_gene(gene.clone());
        gene
    }

    fn add_stoichiometry(&mut self, reaction: &mut Reaction, entries: &[StoichiometryEntry]) {
        for entry in entries {
            let metabolite = self.metabolite(entry);
            reaction.set_stoichiometry(metabolite, entry.stoichiometry);
        }
    }

    fn apply_copy(
        &mut self,
        reaction: &mut Reaction,
        copy: &ReactionCopy,
        fallback_metabolites: &[StoichiometryEntry],
    ) {
        if let Some(gene_entries) = &copy.genes {
            for entry in gene_entries {
                let gene = self.gene(entry);
                reaction.genes.insert(gene.id.clone(), gene);
            }
        }
        if let Some(rule) = &copy.gene_reaction_rule {
            reaction.gene_reaction_rule = rule.clone();
        }
        if let Some(lower_bound) = copy.lower_bound {
            reaction.lower_bound = lower_bound;
        }
        if let Some(upper_bound) = copy.upper_bound {
            reaction.upper_bound = upper_bound;
        }
        if copy.subsystem.is_some() {
            reaction.subsystem = copy.subsystem.clone();
        }

        let metabolites = copy.metabolites.as_deref().unwrap_or(fallback_metabolites);
        self.add_stoichiometry(reaction, metabolites);
    }
}

pub fn universal_reaction(
    reaction_id: &str,
    data: UniversalReactionResponse,
    registry: &EntityRegistry,
) -> Reaction {
    let reaction = Reaction::new(reaction_id, data.name.clone().unwrap_or_default());
    enrich_universal_reaction(reaction, data, registry)
}

/// Adds annotation and stoichiometry from `data` to a reaction the caller
/// already holds. Its id and name are kept.
pub fn enrich_universal_reaction(
    mut reaction: Reaction,
    data: UniversalReactionResponse,
    registry: &EntityRegistry,
) -> Reaction {
    if let Some(pseudoreaction) = data.pseudoreaction {
        reaction
            .annotation
            .insert(PSEUDOREACTION.to_string(), Value::Bool(pseudoreaction));
    }
    reaction.annotation.insert(
        DATABASE_LINKS.to_string(),
        Value::Object(data.database_links),
    );
    reaction.annotation.insert(
        MODELS_CONTAINING_REACTION.to_string(),
        Value::Array(
            data.models_containing_reaction
                .into_iter()
                .map(|model| Value::String(model.bigg_id))
                .collect(),
        ),
    );

    let mut builder = ReactionBuilder::new(registry);
    builder.add_stoichiometry(&mut reaction, &data.metabolites);
    reaction
}

/// Builds a model reaction.
///
/// With a single copy the returned reaction is complete and the copy list is
/// empty. With several copies the returned reaction carries only the shared
/// annotation and each copy (`{id}_{copy_number}`) carries its own
/// stoichiometry, bounds and gene rule.
pub fn model_reaction(
    reaction_id: &str,
    data: ModelReactionResponse,
    registry: &EntityRegistry,
    source: &str,
) -> Result<(Reaction, Vec<Reaction>)> {
    let reaction = Reaction::new(reaction_id, data.name.clone().unwrap_or_default());
    enrich_model_reaction(reaction, data, registry, source)
}

/// Same as [`model_reaction`] for a reaction the caller already holds.
/// Escher maps are appended to the ones it carries; other annotation is replaced.
pub fn enrich_model_reaction(
    mut reaction: Reaction,
    data: ModelReactionResponse,
    registry: &EntityRegistry,
    source: &str,
) -> Result<(Reaction, Vec<Reaction>)> {
    if data.results.is_empty() || data.count as usize != data.results.len() {
        return Err(BiggError::MalformedResponse {
            url: source.to_string(),
            message: format!(
                "reaction count {} does not match {} result(s)",
                data.count,
                data.results.len()
            ),
        });
    }

    if let Some(pseudoreaction) = data.pseudoreaction {
        reaction
            .annotation
            .insert(PSEUDOREACTION.to_string(), Value::Bool(pseudoreaction));
    }
    match reaction.annotation.get_mut(ESCHER_MAPS) {
        Some(Value::Array(maps)) => maps.extend(data.escher_maps),
        _ => {
            reaction
                .annotation
                .insert(ESCHER_MAPS.to_string(), Value::Array(data.escher_maps));
        }
    }
    reaction.annotation.insert(
        DATABASE_LINKS.to_string(),
        Value::Object(data.database_links),
    );

    let mut builder = ReactionBuilder::new(registry);

    if let [single] = data.results.as_slice() {
        builder.apply_copy(&mut reaction, single, &data.metabolites);
        return Ok((reaction, Vec::new()));
    }

    let copies = data
        .results
        .iter()
        .map(|copy_data| {
            let mut copy = reaction.clone();
            copy.id = copy_id(&reaction.id, copy_data.copy_number);
            builder.apply_copy(&mut copy, copy_data, &data.metabolites);
            copy
        })
        .collect();

    Ok((reaction, copies))
}

/// Universal metabolite plus one species per compartment it occurs in.
pub fn universal_metabolite(
    universal_id: &str,
    data: UniversalMetaboliteResponse,
) -> (Metabolite, BTreeMap<String, Metabolite>) {
    let mut metabolite = Metabolite::new(universal_id, data.name.unwrap_or_default());
    metabolite.charge = data.charges.first().and_then(Value::as_i64);
    metabolite.formula = data
        .formulae
        .first()
        .and_then(Value::as_str)
        .map(str::to_string);

    metabolite
        .annotation
        .insert(CHARGES.to_string(), Value::Array(data.charges));
    metabolite
        .annotation
        .insert(FORMULAE.to_string(), Value::Array(data.formulae));
    metabolite.annotation.insert(
        DATABASE_LINKS.to_string(),
        Value::Object(data.database_links),
    );
    metabolite
        .annotation
        .insert(MODELS.to_string(), Value::Array(Vec::new()));

    let mut species: BTreeMap<String, Metabolite> = BTreeMap::new();
    for compartment in data.compartments_in_models {
        let entry = species.entry(compartment.bigg_id.clone()).or_insert_with(|| {
            metabolite.with_compartment(
                species_id(universal_id, &compartment.bigg_id),
                compartment.bigg_id.clone(),
            )
        });

        let model = Value::String(compartment.model_bigg_id);
        if let Some(Value::Array(models)) = entry.annotation.get_mut(MODELS) {
            if !models.contains(&model) {
                models.push(model);
            }
        }
    }

    (metabolite, species)
}

pub fn model_metabolite(metabolite_id: &str, data: ModelMetaboliteResponse) -> Metabolite {
    let mut metabolite = Metabolite::new(metabolite_id, data.name.unwrap_or_default());
    metabolite.charge = data.charge;
    metabolite.formula = data.formula;
    metabolite.compartment = Some(data.compartment_bigg_id);
    metabolite.annotation.insert(
        DATABASE_LINKS.to_string(),
        Value::Object(data.database_links),
    );
    metabolite
}

pub fn model_gene(gene_id: &str, data: ModelGeneResponse) -> Gene {
    let mut gene = Gene::new(gene_id, data.name.unwrap_or_default());
    gene.annotation.insert(
        DATABASE_LINKS.to_string(),
        Value::Object(data.database_links),
    );
    if let Some(sequence) = data.protein_sequence {
        gene.annotation
            .insert(PROTEIN_SEQUENCE.to_string(), Value::String(sequence));
    }
    gene
}
