use crate::domain::model::PackRequest;
use crate::utils::error::{PackingError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "box-packer")]
#[command(about = "Select the smallest shipping box for a set of products")]
pub struct CliConfig {
    #[arg(long, short = 'c', default_value = "box-packer.toml")]
    pub config: String,

    /// Inline request body, e.g. '{"products":[{"id":1,"width":10,...}]}'
    #[arg(long, conflicts_with = "products_file")]
    pub products: Option<String>,

    #[arg(long)]
    pub products_file: Option<String>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn read_request(&self) -> Result<PackRequest> {
        let raw = match (&self.products, &self.products_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(PackingError::ConfigError {
                    message: "either --products or --products-file is required".to_string(),
                })
            }
        };
        PackRequest::from_json(&raw)
    }
}
