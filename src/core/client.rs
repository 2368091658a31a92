use crate::core::endpoint::{join_segments, Endpoint, EntryType};
use crate::core::identifiers::split_compartment;
use crate::core::mapper;
use crate::core::responses::{
    DatabaseVersionResponse, GeneEntry, ListResponse, ModelDetailsResponse, ModelGeneResponse,
    ModelListEntry, ModelMetaboliteEntry, ModelMetaboliteResponse, ModelReactionResponse,
    NamedEntry, UniversalMetaboliteResponse, UniversalReactionResponse,
};
use crate::domain::model::{
    EntityRegistry, Gene, Metabolite, Model, ModelFormat, ModelSummary, ModelTable, Reaction,
    Version,
};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{BiggError, Result};
use crate::utils::validation::{validate_identifier, validate_url};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://bigg.ucsd.edu/api/v2/";
pub const DEFAULT_STATIC_URL: &str = "http://bigg.ucsd.edu/static/models/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("bigg-client/", env!("CARGO_PKG_VERSION"));

/// Async client for the BiGG Models API.
///
/// Every operation validates its identifiers, issues one GET and maps the
/// payload. Non-2xx answers surface as [`BiggError::NotFound`] (404) or
/// [`BiggError::HttpStatus`]; payloads of the wrong shape as
/// [`BiggError::MalformedResponse`].
#[derive(Debug, Clone)]
pub struct BiggClient {
    http: Client,
    api_url: Url,
    static_url: Url,
}

fn parse_base(field: &str, value: &str) -> Result<Url> {
    validate_url(field, value)?;
    Url::parse(value).map_err(|e| BiggError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

impl BiggClient {
    /// Client against the public BiGG server.
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_API_URL, DEFAULT_STATIC_URL)
    }

    pub fn with_urls(api_url: &str, static_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_url: parse_base("api.base_url", api_url)?,
            static_url: parse_base("api.static_url", static_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;
        Ok(Self {
            http,
            api_url: parse_base("api.base_url", config.api_url())?,
            static_url: parse_base("api.static_url", config.static_url())?,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn static_url(&self) -> &Url {
        &self.static_url
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(BiggError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(BiggError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let source = url.to_string();
        let body = self.send(url).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| BiggError::MalformedResponse {
            url: source,
            message: e.to_string(),
        })
    }

    async fn get_api<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = join_segments(&self.api_url, segments)?;
        self.get_json(url).await
    }

    async fn get_entry<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = endpoint.url(&self.api_url)?;
        self.get_json(url).await
    }

    async fn get_static(&self, file_name: &str) -> Result<Vec<u8>> {
        let url = join_segments(&self.static_url, &[file_name])?;
        let data = self.send(url).await?.bytes().await?;
        Ok(data.to_vec())
    }

    pub async fn database_version(&self) -> Result<Version> {
        let data: DatabaseVersionResponse = self.get_api(&["database_version"]).await?;
        Ok(mapper::version(data))
    }

    pub async fn list_models(&self) -> Result<ModelTable> {
        let data: ListResponse<ModelListEntry> = self.get_api(&["models"]).await?;
        tracing::info!("Found {} models", data.results_count);
        Ok(mapper::model_table(data))
    }

    pub async fn model_details(&self, model_id: &str) -> Result<ModelSummary> {
        validate_identifier("model_id", model_id)?;
        let data: ModelDetailsResponse = self.get_api(&["models", model_id]).await?;
        Ok(mapper::model_summary(model_id, data))
    }

    /// Downloads the model file in `format` and writes it as `{model_id}.{ext}`.
    pub async fn download_model<S: Storage>(
        &self,
        model_id: &str,
        format: ModelFormat,
        storage: &S,
    ) -> Result<PathBuf> {
        validate_identifier("model_id", model_id)?;
        let file_name = format.file_name(model_id);
        let data = self.get_static(&file_name).await?;
        tracing::debug!("Writing {} ({} bytes)", file_name, data.len());

        let path = storage.write_file(&file_name, &data).await?;
        tracing::info!("Saved model {} to {}", model_id, path.display());
        Ok(path)
    }

    /// Downloads the JSON form of a model and parses it.
    pub async fn load_model(&self, model_id: &str) -> Result<Model> {
        validate_identifier("model_id", model_id)?;
        let file_name = ModelFormat::Json.file_name(model_id);
        let data = self.get_static(&file_name).await?;
        let model = Model::from_json_slice(&data).map_err(|e| BiggError::MalformedResponse {
            url: file_name,
            message: e.to_string(),
        })?;
        tracing::info!(
            "Loaded model {} ({} reactions, {} metabolites, {} genes)",
            model.id,
            model.reactions.len(),
            model.metabolites.len(),
            model.genes.len()
        );
        Ok(model)
    }

    /// All universal reactions, without stoichiometry.
    pub async fn list_reactions(&self) -> Result<Vec<Reaction>> {
        let data: ListResponse<NamedEntry> = self
            .get_entry(&Endpoint::list(EntryType::Reactions))
            .await?;
        tracing::info!("Found {} reactions", data.results_count);
        Ok(mapper::named_reactions(data.results))
    }

    pub async fn list_model_reactions(&self, model_id: &str) -> Result<Vec<Reaction>> {
        validate_identifier("model_id", model_id)?;
        let data: ListResponse<NamedEntry> = self
            .get_entry(&Endpoint::list(EntryType::Reactions).with_model(model_id))
            .await?;
        tracing::info!("Found {} reactions in {}", data.results_count, model_id);
        Ok(mapper::named_reactions(data.results))
    }

    async fn fetch_reaction(&self, reaction_id: &str) -> Result<UniversalReactionResponse> {
        validate_identifier("reaction_id", reaction_id)?;
        let data: UniversalReactionResponse = self
            .get_entry(&Endpoint::get(EntryType::Reactions, reaction_id))
            .await?;
        tracing::info!(
            "Found reaction {}",
            data.name.as_deref().unwrap_or(reaction_id)
        );
        Ok(data)
    }

    pub async fn get_reaction(
        &self,
        reaction_id: &str,
        registry: &EntityRegistry,
    ) -> Result<Reaction> {
        let data = self.fetch_reaction(reaction_id).await?;
        Ok(mapper::universal_reaction(reaction_id, data, registry))
    }

    /// Like [`get_reaction`](Self::get_reaction), filling in a reaction the
    /// caller already holds instead of creating one.
    pub async fn enrich_reaction(
        &self,
        reaction: Reaction,
        registry: &EntityRegistry,
    ) -> Result<Reaction> {
        let data = self.fetch_reaction(&reaction.id).await?;
        Ok(mapper::enrich_universal_reaction(reaction, data, registry))
    }

    async fn fetch_model_reaction(
        &self,
        model_id: &str,
        reaction_id: &str,
    ) -> Result<(ModelReactionResponse, String)> {
        validate_identifier("model_id", model_id)?;
        validate_identifier("reaction_id", reaction_id)?;
        let endpoint = Endpoint::get(EntryType::Reactions, reaction_id).with_model(model_id);
        let url = endpoint.url(&self.api_url)?;
        let source = url.to_string();
        let data: ModelReactionResponse = self.get_json(url).await?;
        tracing::info!(
            "Found reaction {} ({} copies)",
            data.name.as_deref().unwrap_or(reaction_id),
            data.count
        );
        Ok((data, source))
    }

    /// Reaction in the context of a model, plus its copies when the model
    /// contains it more than once.
    pub async fn get_model_reaction(
        &self,
        model_id: &str,
        reaction_id: &str,
        registry: &EntityRegistry,
    ) -> Result<(Reaction, Vec<Reaction>)> {
        let (data, source) = self.fetch_model_reaction(model_id, reaction_id).await?;
        mapper::model_reaction(reaction_id, data, registry, &source)
    }

    /// Model context for a reaction the caller already holds. Escher maps
    /// are added to the ones it carries.
    pub async fn enrich_model_reaction(
        &self,
        model_id: &str,
        reaction: Reaction,
        registry: &EntityRegistry,
    ) -> Result<(Reaction, Vec<Reaction>)> {
        let (data, source) = self.fetch_model_reaction(model_id, &reaction.id).await?;
        mapper::enrich_model_reaction(reaction, data, registry, &source)
    }

    pub async fn list_metabolites(&self) -> Result<Vec<Metabolite>> {
        let data: ListResponse<NamedEntry> = self
            .get_entry(&Endpoint::list(EntryType::Metabolites))
            .await?;
        tracing::info!("Found {} metabolites", data.results_count);
        Ok(mapper::universal_metabolites(data.results))
    }

    pub async fn list_model_metabolites(&self, model_id: &str) -> Result<Vec<Metabolite>> {
        validate_identifier("model_id", model_id)?;
        let data: ListResponse<ModelMetaboliteEntry> = self
            .get_entry(&Endpoint::list(EntryType::Metabolites).with_model(model_id))
            .await?;
        tracing::info!("Found {} metabolites in {}", data.results_count, model_id);
        Ok(mapper::model_metabolites(data.results))
    }

    /// Universal metabolite and its species per compartment.
    ///
    /// A species id (`glc__D_e`) is first looked up by its universal part;
    /// only when that is not found is the id queried as given.
    pub async fn get_metabolite(
        &self,
        metabolite_id: &str,
    ) -> Result<(Metabolite, BTreeMap<String, Metabolite>)> {
        validate_identifier("metabolite_id", metabolite_id)?;
        let reference = split_compartment(metabolite_id);
        let universal_id = reference.universal_id();

        let lookup = self
            .get_entry::<UniversalMetaboliteResponse>(&Endpoint::get(
                EntryType::Metabolites,
                universal_id,
            ))
            .await;

        let (resolved_id, data) = match lookup {
            Ok(data) => (universal_id.to_string(), data),
            Err(e) if e.is_not_found() && reference.is_species() => {
                tracing::debug!(
                    "{} not found, retrying with {}",
                    universal_id,
                    metabolite_id
                );
                let data: UniversalMetaboliteResponse = self
                    .get_entry(&Endpoint::get(EntryType::Metabolites, metabolite_id))
                    .await?;
                (metabolite_id.to_string(), data)
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Found metabolite {}", resolved_id);
        Ok(mapper::universal_metabolite(&resolved_id, data))
    }

    pub async fn get_model_metabolite(
        &self,
        model_id: &str,
        metabolite_id: &str,
    ) -> Result<Metabolite> {
        validate_identifier("model_id", model_id)?;
        validate_identifier("metabolite_id", metabolite_id)?;
        let data: ModelMetaboliteResponse = self
            .get_entry(&Endpoint::get(EntryType::Metabolites, metabolite_id).with_model(model_id))
            .await?;
        tracing::info!("Found metabolite {}", metabolite_id);
        Ok(mapper::model_metabolite(metabolite_id, data))
    }

    pub async fn list_model_genes(&self, model_id: &str) -> Result<Vec<Gene>> {
        validate_identifier("model_id", model_id)?;
        let data: ListResponse<GeneEntry> = self
            .get_entry(&Endpoint::list(EntryType::Genes).with_model(model_id))
            .await?;
        tracing::info!("Found {} genes", data.results_count);
        Ok(mapper::genes(data.results))
    }

    pub async fn get_model_gene(&self, model_id: &str, gene_id: &str) -> Result<Gene> {
        validate_identifier("model_id", model_id)?;
        validate_identifier("gene_id", gene_id)?;
        let data: ModelGeneResponse = self
            .get_entry(&Endpoint::get(EntryType::Genes, gene_id).with_model(model_id))
            .await?;
        tracing::info!("Found gene {}", gene_id);
        Ok(mapper::model_gene(gene_id, data))
    }
}

impl ModelSummary {
    /// Downloads and parses the model this summary describes.
    pub async fn fetch_model(&self, client: &BiggClient) -> Result<Model> {
        client.load_model(&self.id).await
    }
}
