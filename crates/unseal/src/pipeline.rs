//! Invocation pipeline
//!
//! `resolve key -> list objects -> process each -> aggregate`. Objects are
//! processed one at a time in listing order and a failing object never stops
//! its siblings. Only key resolution and listing errors abort the run.

use std::sync::Arc;

use futures::{future, stream, StreamExt};
use tracing::{debug, error, info};
use unseal_core::{
    aggregate, InvocationResponse, InvocationSummary, ObjectDescriptor, Result, Settings,
};
use unseal_pgp::PgpDecryptor;
use unseal_secrets::KeyResolver;
use unseal_storage::ObjectStore;

use crate::worker::DecryptWorker;

/// One configured invocation
pub struct Pipeline {
    settings: Settings,
    resolver: KeyResolver,
    store: Arc<dyn ObjectStore>,
    decryptor: Arc<dyn PgpDecryptor>,
}

impl Pipeline {
    pub fn new(
        settings: Settings,
        resolver: KeyResolver,
        store: Arc<dyn ObjectStore>,
        decryptor: Arc<dyn PgpDecryptor>,
    ) -> Self {
        Self {
            settings,
            resolver,
            store,
            decryptor,
        }
    }

    /// Run the pipeline and return the summary
    pub async fn run(&self) -> Result<InvocationSummary> {
        let key = self.resolver.resolve().await?;

        let descriptors = self.list_sources().await?;
        if descriptors.is_empty() {
            info!(
                bucket = %self.settings.bucket,
                prefix = %self.settings.source_prefix,
                "No files found to process"
            );
            return Ok(aggregate(Vec::new()));
        }

        let worker = DecryptWorker::new(
            &self.settings,
            Arc::clone(&self.store),
            Arc::clone(&self.decryptor),
        );
        let worker = &worker;
        let key = &key;

        let results = stream::iter(descriptors)
            .then(|descriptor| async move { worker.process(&descriptor, key).await })
            .filter_map(future::ready)
            .collect::<Vec<_>>()
            .await;

        let summary = aggregate(results);
        info!("{}", summary.message());
        Ok(summary)
    }

    /// Run the pipeline and render the response envelope
    ///
    /// Never fails: aborted runs become a 500 response.
    pub async fn respond(&self) -> InvocationResponse {
        match self.run().await {
            Ok(summary) => InvocationResponse::from_summary(summary),
            Err(e) => {
                error!(kind = %e.kind(), "Invocation aborted: {}", e);
                InvocationResponse::from_error(&e)
            }
        }
    }

    async fn list_sources(&self) -> Result<Vec<ObjectDescriptor>> {
        let listed = self
            .store
            .list(&self.settings.bucket, &self.settings.source_prefix)
            .await?;
        let total = listed.len();

        let descriptors: Vec<ObjectDescriptor> = match nested_destination(&self.settings) {
            Some(dest) => listed
                .into_iter()
                .filter(|d| !d.key.starts_with(dest))
                .collect(),
            None => listed,
        };

        debug!(
            listed = total,
            excluded = total - descriptors.len(),
            "Listed source objects"
        );
        Ok(descriptors)
    }
}

/// The destination prefix when it lies inside the source prefix
fn nested_destination(settings: &Settings) -> Option<&str> {
    let dest = settings.dest_prefix.as_str();
    let nested = !dest.is_empty()
        && dest != settings.source_prefix
        && dest.starts_with(settings.source_prefix.as_str());
    nested.then_some(dest)
}
