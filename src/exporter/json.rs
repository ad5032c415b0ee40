// file: src/exporter/json.rs
// description: json export of a classified batch and its summary

use crate::error::Result;
use crate::models::Message;
use crate::query::TriageSummary;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const MESSAGES_FILE: &str = "messages.json";
const SUMMARY_FILE: &str = "summary.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_messages: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn export_batch<'a, I>(
        &self,
        messages: I,
        summary: &TriageSummary,
        pretty: bool,
    ) -> Result<ExportManifest>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        info!("Starting JSON export to {:?}", self.output_dir);

        let messages: Vec<&Message> = messages.into_iter().collect();
        self.write(MESSAGES_FILE, &messages, pretty)?;
        self.write(SUMMARY_FILE, summary, pretty)?;

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_messages: messages.len(),
            files: vec![MESSAGES_FILE.to_string(), SUMMARY_FILE.to_string()],
        };
        self.write(MANIFEST_FILE, &manifest, pretty)?;

        info!(
            "Export complete: {} messages exported",
            manifest.total_messages
        );
        Ok(manifest)
    }

    fn write<T: Serialize + ?Sized>(&self, file_name: &str, value: &T, pretty: bool) -> Result<()> {
        let body = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(self.output_dir.join(file_name), body)?;
        Ok(())
    }
}
