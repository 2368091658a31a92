use crate::utils::error::{BiggError, Result};
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Reactions,
    Metabolites,
    Genes,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Reactions => "reactions",
            EntryType::Metabolites => "metabolites",
            EntryType::Genes => "genes",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four BiGG entry paths:
/// `universal/{entry}`, `models/{model}/{entry}`,
/// `universal/{entry}/{id}` and `models/{model}/{entry}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    entry: EntryType,
    entry_id: Option<String>,
    model_id: Option<String>,
}

impl Endpoint {
    pub fn list(entry: EntryType) -> Self {
        Self {
            entry,
            entry_id: None,
            model_id: None,
        }
    }

    pub fn get(entry: EntryType, entry_id: impl Into<String>) -> Self {
        Self {
            entry,
            entry_id: Some(entry_id.into()),
            model_id: None,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn segments(&self) -> Vec<&str> {
        let mut segments = Vec::with_capacity(4);
        match &self.model_id {
            Some(model_id) => {
                segments.push("models");
                segments.push(model_id.as_str());
            }
            None => segments.push("universal"),
        }
        segments.push(self.entry.as_str());
        if let Some(entry_id) = &self.entry_id {
            segments.push(entry_id.as_str());
        }
        segments
    }

    pub fn url(&self, base: &Url) -> Result<Url> {
        join_segments(base, &self.segments())
    }
}

/// Appends percent-encoded path segments to `base`, which may or may not end in `/`.
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| BiggError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
