use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct CatalogEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CatalogEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting catalog run...");

        // Extract
        let catalog = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} of {} species for generation {}",
            catalog.records.len(),
            catalog.requested,
            catalog.generation
        );

        // Transform
        let export = self.pipeline.transform(catalog).await?;

        // Load
        let output_path = self.pipeline.load(export).await?;
        tracing::info!("Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
