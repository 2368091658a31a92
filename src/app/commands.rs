use crate::adapters::LocalStorage;
use crate::config::{Command, OutputFormat, TomlConfig};
use crate::core::client::BiggClient;
use crate::core::ConfigProvider;
use crate::domain::model::{EntityRegistry, Gene, Metabolite, ModelTable, Reaction};
use crate::utils::error::Result;
use crate::utils::tabular;
use serde::Serialize;
use serde_json::json;

/// Runs one CLI command and returns what should be printed.
pub async fn execute(
    command: &Command,
    config: &TomlConfig,
    output: OutputFormat,
) -> Result<String> {
    let client = BiggClient::from_config(config)?;
    tracing::debug!("Using API at {}", client.api_url());

    match command {
        Command::Version => {
            let version = client.database_version().await?;
            match output {
                OutputFormat::Json => to_json(&version),
                OutputFormat::Csv | OutputFormat::Tsv => Ok(format!("{}\n", version)),
            }
        }
        Command::Models => {
            let table = client.list_models().await?;
            render_table(&table, output)
        }
        Command::Model { model_id } => {
            let summary = client.model_details(model_id).await?;
            to_json(&summary)
        }
        Command::Download { model_id, .. } => {
            let storage = LocalStorage::new(config.output_path());
            let path = client
                .download_model(model_id, config.download.format, &storage)
                .await?;
            Ok(format!("{}\n", path.display()))
        }
        Command::Reactions { model } => {
            let reactions = match model {
                Some(model_id) => client.list_model_reactions(model_id).await?,
                None => client.list_reactions().await?,
            };
            render_reactions(&reactions, output)
        }
        Command::Reaction { reaction_id, model } => {
            let registry = EntityRegistry::new();
            match model {
                Some(model_id) => {
                    let (reaction, copies) = client
                        .get_model_reaction(model_id, reaction_id, &registry)
                        .await?;
                    let copies: Vec<_> = copies.iter().map(reaction_json).collect();
                    to_json(&json!({
                        "reaction": reaction_json(&reaction),
                        "copies": copies,
                    }))
                }
                None => {
                    let reaction = client.get_reaction(reaction_id, &registry).await?;
                    to_json(&reaction_json(&reaction))
                }
            }
        }
        Command::Metabolites { model } => {
            let metabolites = match model {
                Some(model_id) => client.list_model_metabolites(model_id).await?,
                None => client.list_metabolites().await?,
            };
            render_metabolites(&metabolites, output)
        }
        Command::Metabolite {
            metabolite_id,
            model,
        } => match model {
            Some(model_id) => {
                let metabolite = client.get_model_metabolite(model_id, metabolite_id).await?;
                to_json(&metabolite)
            }
            None => {
                let (metabolite, species) = client.get_metabolite(metabolite_id).await?;
                to_json(&json!({
                    "metabolite": metabolite,
                    "species": species,
                }))
            }
        },
        Command::Genes { model } => {
            let genes = client.list_model_genes(model).await?;
            render_genes(&genes, output)
        }
        Command::Gene { gene_id, model } => {
            let gene = client.get_model_gene(model, gene_id).await?;
            to_json(&gene)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Reaction with its participants inlined, which the file format leaves out.
fn reaction_json(reaction: &Reaction) -> serde_json::Value {
    json!({
        "reaction": reaction,
        "species": reaction.species.values().collect::<Vec<_>>(),
        "genes": reaction.genes.values().collect::<Vec<_>>(),
    })
}

fn render_table(table: &ModelTable, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => to_json(&table.rows),
        OutputFormat::Csv => table.to_csv(),
        OutputFormat::Tsv => table.to_tsv(),
    }
}

fn render_rows(headers: &[&str], rows: Vec<Vec<String>>, output: OutputFormat) -> Result<String> {
    let delimiter = match output {
        OutputFormat::Tsv => b'\t',
        _ => b',',
    };
    let mut writer = tabular::writer(delimiter, true);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    tabular::into_string(writer)
}

fn render_reactions(reactions: &[Reaction], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        let rows: Vec<_> = reactions
            .iter()
            .map(|r| json!({"id": r.id, "name": r.name}))
            .collect();
        return to_json(&rows);
    }
    let rows = reactions
        .iter()
        .map(|r| vec![r.id.clone(), r.name.clone()])
        .collect();
    render_rows(&["id", "name"], rows, output)
}

fn render_metabolites(metabolites: &[Metabolite], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return to_json(metabolites);
    }
    let rows = metabolites
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.name.clone(),
                m.compartment.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_rows(&["id", "name", "compartment"], rows, output)
}

fn render_genes(genes: &[Gene], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return to_json(genes);
    }
    let rows = genes
        .iter()
        .map(|g| vec![g.id.clone(), g.name.clone()])
        .collect();
    render_rows(&["id", "name"], rows, output)
}
