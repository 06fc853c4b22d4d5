use std::collections::VecDeque;
use std::io::BufRead;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::arena::RecordArena;
use crate::config::{HttpConfig, RegistryConfig};
use crate::error::Result;
use crate::jobs::search::SearchJob;
use crate::jobs::{FetchResponse, JobDescriptor, Priority, ScrapeJob};

/// Result of a complete run over one batch of seed queries.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub jobs_processed: usize,
    pub errors: Vec<String>,
}

/// Builds one search seed job per input line. Blank lines are skipped; a
/// line may carry a correlation id after a `#!#` marker, as in
/// `kwiaciarnia warszawa #!# batch-7`.
pub fn seed_jobs(
    input: impl BufRead,
    lang: &str,
    mine_contacts: bool,
    registry: &RegistryConfig,
) -> Result<Vec<Box<dyn ScrapeJob>>> {
    let mut seeds: Vec<Box<dyn ScrapeJob>> = Vec::new();
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        let (query, input_id) = match query.split_once("#!#") {
            Some((query, id)) => (query.trim(), id.trim()),
            None => (query, ""),
        };
        let job = SearchJob::new(input_id, query, lang, mine_contacts, registry.clone())?;
        seeds.push(Box::new(job));
    }
    info!("created {} seed jobs", seeds.len());
    Ok(seeds)
}

/// Runs the job chain to completion with at most `concurrency` fetches in
/// flight. Fetching happens on spawned tasks; each job's own processing runs
/// on this loop once its response lands, so the arena needs no sharing across
/// tasks. High-priority children (a record's enrichment follow-ups) jump the
/// queue ahead of remaining seeds. Per-job errors are collected and logged,
/// never fatal to the run.
#[instrument(skip_all, fields(seeds = seeds.len()))]
pub async fn run_jobs(
    seeds: Vec<Box<dyn ScrapeJob>>,
    arena: &RecordArena,
    http: &HttpConfig,
    concurrency: usize,
) -> Result<RunSummary> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(http.timeout_seconds))
        .user_agent(&http.user_agent)
        .build()?;

    let mut queue: VecDeque<Box<dyn ScrapeJob>> = seeds.into();
    let mut in_flight: JoinSet<(Box<dyn ScrapeJob>, FetchResponse)> = JoinSet::new();
    let mut summary = RunSummary::default();

    loop {
        while in_flight.len() < concurrency.max(1) {
            let Some(job) = queue.pop_front() else {
                break;
            };
            let client = client.clone();
            in_flight.spawn(async move {
                let response = fetch(&client, job.descriptor()).await;
                (job, response)
            });
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        let (job, response) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!("job task panicked: {e}");
                summary.errors.push(format!("job task panicked: {e}"));
                continue;
            }
        };

        summary.jobs_processed += 1;
        let url = job.descriptor().url.clone();

        if response.is_err() && !job.process_on_fetch_error() {
            let error = response.error.unwrap_or_default();
            warn!(%url, "fetch failed: {error}");
            summary.errors.push(format!("{url}: fetch failed: {error}"));
            continue;
        }

        match job.process(arena, response).await {
            Ok(children) => {
                for child in children.into_iter().rev() {
                    match child.descriptor().priority {
                        Priority::High => queue.push_front(child),
                        Priority::Normal => queue.push_back(child),
                    }
                }
            }
            Err(e) => {
                warn!(%url, "job failed: {e}");
                summary.errors.push(format!("{url}: {e}"));
            }
        }
    }

    info!(
        jobs = summary.jobs_processed,
        records = arena.len(),
        errors = summary.errors.len(),
        "run finished"
    );
    Ok(summary)
}

async fn fetch(client: &reqwest::Client, descriptor: &JobDescriptor) -> FetchResponse {
    let method = Method::from_bytes(descriptor.method.as_bytes()).unwrap_or(Method::GET);
    let mut request = client.request(method, &descriptor.url);
    for (name, value) in &descriptor.headers {
        request = request.header(name, value);
    }

    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            match response.bytes().await {
                Ok(body) => FetchResponse::ok(status, body.to_vec()),
                Err(e) => FetchResponse::failed(e.to_string()),
            }
        }
        Err(e) => FetchResponse::failed(e.to_string()),
    }
}
