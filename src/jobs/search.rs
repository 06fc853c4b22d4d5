use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::arena::RecordArena;
use crate::config::RegistryConfig;
use crate::decoder::decode_payload;
use crate::error::{Result, ScraperError};
use crate::jobs::contact::ContactMineJob;
use crate::jobs::{FetchResponse, JobDescriptor, Priority, ScrapeJob};
use crate::payload::RawPayload;

const SEARCH_BASE_URL: &str = "https://www.google.com/maps/search/";

/// Seed job: one provider search per input query. Decodes the response into a
/// business record and, when the record has a website worth mining, chains a
/// contact-mining job for it.
pub struct SearchJob {
    job: JobDescriptor,
    input_id: String,
    mine_contacts: bool,
    registry: RegistryConfig,
}

impl SearchJob {
    pub fn new(
        input_id: impl Into<String>,
        query: &str,
        lang: &str,
        mine_contacts: bool,
        registry: RegistryConfig,
    ) -> Result<Self> {
        let input_id = input_id.into();
        let url = search_url(query, lang)?;
        Ok(Self {
            job: JobDescriptor::get(input_id.clone(), url, Priority::Normal),
            input_id,
            mine_contacts,
            registry,
        })
    }
}

fn search_url(query: &str, lang: &str) -> Result<String> {
    let mut url = Url::parse(SEARCH_BASE_URL)?;
    url.path_segments_mut()
        .map_err(|_| ScraperError::Config("search base URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(query);
    url.query_pairs_mut().append_pair("hl", lang);
    Ok(url.to_string())
}

#[async_trait]
impl ScrapeJob for SearchJob {
    fn descriptor(&self) -> &JobDescriptor {
        &self.job
    }

    async fn process(
        &self,
        arena: &RecordArena,
        response: FetchResponse,
    ) -> Result<Vec<Box<dyn ScrapeJob>>> {
        let payload: RawPayload = serde_json::from_slice(&response.body).map_err(|e| {
            ScraperError::MalformedPayload(format!("search response is not valid JSON: {e}"))
        })?;
        let record = decode_payload(&self.input_id, &payload)?;

        let mine = self.mine_contacts && record.has_minable_website();
        let website = record.website.clone();
        let title = record.title.clone();
        let handle = arena.insert(record);
        info!(%title, "decoded place record");

        if mine {
            debug!(%website, "queueing contact mining");
            let child = ContactMineJob::new(
                self.job.id.to_string(),
                &website,
                handle,
                self.registry.clone(),
            );
            Ok(vec![Box::new(child)])
        } else {
            Ok(Vec::new())
        }
    }
}
