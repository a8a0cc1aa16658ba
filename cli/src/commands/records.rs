//! Records API commands

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use gradebook_core::model::RecordFilter;
use gradebook_core::{HttpTransport, QueryParams, RecordsApi};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::CliConfigLoader;

/// Operations on the records resource
#[derive(Subcommand)]
pub enum RecordsAction {
    /// List records matching the given query parameters
    List {
        /// Query parameter, repeatable
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Show a single record
    Get { id: String },

    /// Create a record
    Create {
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Replace a record
    Update {
        id: String,
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Delete a record
    Delete { id: String },

    /// List grade levels that have records
    Grades {
        /// Query parameter, repeatable
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// List classes that have records
    Classes {
        /// Query parameter, repeatable
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// List batch labels
    Batches,

    /// Per-student score summary for a filter
    Summary {
        #[command(flatten)]
        filter: PayloadArgs,
    },

    /// Scores for one subject grouped by date
    SubjectSummary {
        #[command(flatten)]
        filter: PayloadArgs,
    },
}

/// Record payload given inline or from a file
#[derive(Args)]
pub struct PayloadArgs {
    /// JSON payload
    #[arg(long, conflicts_with = "file")]
    data: Option<String>,

    /// Path to a JSON payload file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl PayloadArgs {
    async fn read(&self) -> Result<Value> {
        let text = match (&self.data, &self.file) {
            (Some(data), _) => data.clone(),
            (None, Some(file)) => tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read payload file: {}", file.display()))?,
            (None, None) => return Err(anyhow!("A payload is required: use --data or --file")),
        };

        serde_json::from_str(&text).context("Payload is not valid JSON")
    }

    async fn read_filter(&self) -> Result<RecordFilter> {
        serde_json::from_value(self.read().await?).context("Payload is not a valid record filter")
    }
}

/// Parse repeated `KEY=VALUE` arguments into query parameters
///
/// Values are kept as text so they reach the server exactly as typed.
pub fn parse_params(raw: &[String]) -> Result<QueryParams> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", pair))
        })
        .collect()
}

/// Run a records subcommand and print the server's answer
pub async fn records_command(action: RecordsAction, config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    info!("Using records server at {}", config.base_url);

    let transport = HttpTransport::new(&config)?;
    let api = RecordsApi::new(Arc::new(transport));

    let body: Value = match action {
        RecordsAction::List { params } => api.get_records(&parse_params(&params)?).await?,
        RecordsAction::Get { id } => api.get_record(&id).await?,
        RecordsAction::Create { payload } => api.create_record(&payload.read().await?).await?,
        RecordsAction::Update { id, payload } => {
            api.update_record(&id, &payload.read().await?).await?
        }
        RecordsAction::Delete { id } => api.delete_record(&id).await?,
        RecordsAction::Grades { params } => api.get_grades(&parse_params(&params)?).await?,
        RecordsAction::Classes { params } => api.get_classes(&parse_params(&params)?).await?,
        RecordsAction::Batches => api.get_batches().await?,
        RecordsAction::Summary { filter } => api.get_summary(&filter.read_filter().await?).await?,
        RecordsAction::SubjectSummary { filter } => {
            api.get_subject_summary(&filter.read_filter().await?).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::QueryValue;

    #[test]
    fn test_parse_params_keeps_text() {
        let params = parse_params(&[
            "grade=高一".to_string(),
            "score=8.50".to_string(),
            "note=a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(params.get("grade"), Some(&QueryValue::from("高一")));
        assert_eq!(params.get("score"), Some(&QueryValue::from("8.50")));
        assert_eq!(params.get("note"), Some(&QueryValue::from("a=b")));
    }

    #[test]
    fn test_parse_params_rejects_bad_pairs() {
        assert!(parse_params(&["grade".to_string()]).is_err());
        assert!(parse_params(&["=x".to_string()]).is_err());
        assert!(parse_params(&[]).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payload_sources() {
        let inline = PayloadArgs {
            data: Some(r#"{ "score": 9 }"#.to_string()),
            file: None,
        };
        assert_eq!(inline.read().await.unwrap()["score"], 9);

        let missing = PayloadArgs {
            data: None,
            file: None,
        };
        assert!(missing.read().await.is_err());

        let broken = PayloadArgs {
            data: Some("{ nope".to_string()),
            file: None,
        };
        assert!(broken.read().await.is_err());
    }

    #[tokio::test]
    async fn test_filter_payload() {
        let filter = PayloadArgs {
            data: Some(r#"{ "subject": "数学", "start_date": "2024-09-01" }"#.to_string()),
            file: None,
        };
        let filter = filter.read_filter().await.unwrap();
        assert_eq!(filter.subject.as_deref(), Some("数学"));
        assert_eq!(filter.grade, None);

        let bad_date = PayloadArgs {
            data: Some(r#"{ "start_date": "yesterday" }"#.to_string()),
            file: None,
        };
        assert!(bad_date.read_filter().await.is_err());
    }
}
