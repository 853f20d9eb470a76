use crate::adapters::http::PokeApiClient;
use crate::core::batch_fetcher::{BatchFetcher, RetryPolicy, TokioSleeper};
use crate::core::catalog::CatalogService;
use crate::core::{Catalog, CatalogExport, ConfigProvider, Pipeline, Storage};
use crate::utils::error::{CatalogError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

type PokeApiService = CatalogService<PokeApiClient, PokeApiClient, TokioSleeper>;

/// Fetches one generation from PokeAPI and exports it as JSON and/or CSV.
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    service: PokeApiService,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = PokeApiClient::new(config.api_base_url(), config.request_timeout())?;
        let policy = RetryPolicy {
            max_retries: config.retry_attempts(),
            delay: config.retry_delay(),
        };
        let fetcher = BatchFetcher::new(client.clone(), config.batch_size(), policy)?;

        Ok(Self {
            storage,
            config,
            service: CatalogService::new(client, fetcher),
        })
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

pub fn render_csv(catalog: &Catalog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "name", "sprite", "abilities"])?;

    for record in &catalog.records {
        let id = record.id().map(|id| id.to_string()).unwrap_or_default();
        writer.write_record([
            id.as_str(),
            record.name().unwrap_or_default(),
            record.sprite_url().unwrap_or_default(),
            record.ability_names().join("|").as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })?;

    String::from_utf8(bytes).map_err(|e| CatalogError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CatalogPipeline<S, C> {
    async fn extract(&self) -> Result<Catalog> {
        let generation = self.config.generation();
        tracing::info!(
            "Loading generation {} from {}",
            generation,
            self.config.api_base_url()
        );

        self.service.load(generation).await
    }

    async fn transform(&self, catalog: Catalog) -> Result<CatalogExport> {
        let json_output = if self.wants("json") {
            Some(serde_json::to_string_pretty(&catalog)?)
        } else {
            None
        };

        let csv_output = if self.wants("csv") {
            Some(render_csv(&catalog)?)
        } else {
            None
        };

        Ok(CatalogExport {
            generation: catalog.generation,
            json_output,
            csv_output,
        })
    }

    async fn load(&self, export: CatalogExport) -> Result<String> {
        let stem = format!("generation_{}", export.generation);
        let mut files: Vec<(String, String)> = Vec::new();
        if let Some(json) = export.json_output {
            files.push((format!("{}.json", stem), json));
        }
        if let Some(csv) = export.csv_output {
            files.push((format!("{}.csv", stem), csv));
        }

        if files.is_empty() {
            return Err(CatalogError::ProcessingError {
                message: "No output format selected".to_string(),
            });
        }

        if self.config.compress_output() {
            let archive_name = format!("{}.zip", stem);
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive_name));
        }

        for (name, content) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, content.len());
            self.storage.write_file(name, content.as_bytes()).await?;
        }

        let written: Vec<String> = files
            .iter()
            .map(|(name, _)| format!("{}/{}", self.config.output_path(), name))
            .collect();
        Ok(written.join(", "))
    }
}
