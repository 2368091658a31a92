pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::TomlConfig;
    use crate::domain::model::ModelFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::{Parser, Subcommand, ValueEnum};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
    pub enum OutputFormat {
        #[default]
        Json,
        Csv,
        Tsv,
    }

    #[derive(Debug, Clone, Parser)]
    #[command(name = "bigg")]
    #[command(about = "Query the BiGG Models database")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Override the API base URL
        #[arg(long, global = true)]
        pub api_url: Option<String>,

        /// Override the static model file URL
        #[arg(long, global = true)]
        pub static_url: Option<String>,

        /// Output format for listings
        #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
        pub output: OutputFormat,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Show the database version
        Version,
        /// List all models
        Models,
        /// Summarize one model
        Model { model_id: String },
        /// Download a model file
        Download {
            model_id: String,
            /// json, xml, xml.gz or mat
            #[arg(short, long)]
            format: Option<ModelFormat>,
            /// Directory to write into
            #[arg(long)]
            output_path: Option<PathBuf>,
        },
        /// List reactions, universal or of one model
        Reactions {
            #[arg(short, long)]
            model: Option<String>,
        },
        /// Show one reaction
        Reaction {
            reaction_id: String,
            #[arg(short, long)]
            model: Option<String>,
        },
        /// List metabolites, universal or of one model
        Metabolites {
            #[arg(short, long)]
            model: Option<String>,
        },
        /// Show one metabolite
        Metabolite {
            metabolite_id: String,
            #[arg(short, long)]
            model: Option<String>,
        },
        /// List the genes of a model
        Genes {
            #[arg(short, long)]
            model: String,
        },
        /// Show one gene of a model
        Gene {
            gene_id: String,
            #[arg(short, long)]
            model: String,
        },
    }

    impl CliConfig {
        /// File configuration (or defaults) with command line overrides applied.
        pub fn resolve(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(api_url) = &self.api_url {
                config.api.base_url = api_url.clone();
            }
            if let Some(static_url) = &self.static_url {
                config.api.static_url = static_url.clone();
            }
            if let Command::Download {
                format, output_path, ..
            } = &self.command
            {
                if let Some(format) = format {
                    config.download.format = *format;
                }
                if let Some(output_path) = output_path {
                    config.download.output_path = output_path.to_string_lossy().into_owned();
                }
            }

            config.validate()?;
            Ok(config)
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OutputFormat};
