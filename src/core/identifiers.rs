//! Identifier helpers.
//!
//! BiGG metabolite ids come in two flavours: universal (`glc__D`) and species
//! ids carrying a one-letter compartment tag (`glc__D_e`). Model reactions that
//! appear several times in a model are suffixed with a copy number (`PFK_2`).

use regex::Regex;
use std::sync::OnceLock;

fn compartment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)_([a-z])$").expect("compartment pattern is valid"))
}

fn copy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)_([0-9]+)$").expect("copy pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaboliteRef {
    Universal(String),
    Species { base: String, compartment: String },
}

impl MetaboliteRef {
    pub fn universal_id(&self) -> &str {
        match self {
            MetaboliteRef::Universal(id) => id,
            MetaboliteRef::Species { base, .. } => base,
        }
    }

    pub fn compartment(&self) -> Option<&str> {
        match self {
            MetaboliteRef::Universal(_) => None,
            MetaboliteRef::Species { compartment, .. } => Some(compartment),
        }
    }

    pub fn is_species(&self) -> bool {
        matches!(self, MetaboliteRef::Species { .. })
    }
}

/// Splits a trailing `_x` compartment tag off `id`.
///
/// Only the last tag is stripped. An id whose universal part itself ends in
/// `_x` is therefore ambiguous; callers that talk to the server try the base
/// first and fall back to the id as given.
pub fn split_compartment(id: &str) -> MetaboliteRef {
    match compartment_regex().captures(id) {
        Some(caps) => MetaboliteRef::Species {
            base: caps[1].to_string(),
            compartment: caps[2].to_string(),
        },
        None => MetaboliteRef::Universal(id.to_string()),
    }
}

pub fn species_id(base: &str, compartment: &str) -> String {
    format!("{}_{}", base, compartment)
}

/// `PFK_2` becomes (`PFK`, Some(2)); ids without a numeric suffix are returned whole.
pub fn split_copy_number(id: &str) -> (&str, Option<u32>) {
    if let Some(caps) = copy_regex().captures(id) {
        if let (Some(base), Ok(number)) = (caps.get(1), caps[2].parse::<u32>()) {
            return (base.as_str(), Some(number));
        }
    }
    (id, None)
}

pub fn copy_id(reaction_id: &str, copy_number: u32) -> String {
    format!("{}_{}", reaction_id, copy_number)
}
