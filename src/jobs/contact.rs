use std::collections::HashSet;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::arena::{RecordArena, RecordHandle};
use crate::config::RegistryConfig;
use crate::error::Result;
use crate::identifier;
use crate::jobs::registry::RegistryLookupJob;
use crate::jobs::{FetchResponse, JobDescriptor, Priority, ScrapeJob};
use crate::record::SocialPlatform;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern")
});
static EMAIL_EXACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

/// Mines the record's website for contact emails, social profile links and
/// the tax identifier, chaining a registry lookup when an identifier turns
/// up.
pub struct ContactMineJob {
    job: JobDescriptor,
    record: RecordHandle,
    registry: RegistryConfig,
}

impl ContactMineJob {
    pub fn new(
        parent_id: String,
        website: &str,
        record: RecordHandle,
        registry: RegistryConfig,
    ) -> Self {
        Self {
            job: JobDescriptor::get(parent_id, website, Priority::High),
            record,
            registry,
        }
    }
}

#[async_trait]
impl ScrapeJob for ContactMineJob {
    fn descriptor(&self) -> &JobDescriptor {
        &self.job
    }

    // A dead website just leaves the record with its decoded fields.
    fn process_on_fetch_error(&self) -> bool {
        true
    }

    async fn process(
        &self,
        arena: &RecordArena,
        response: FetchResponse,
    ) -> Result<Vec<Box<dyn ScrapeJob>>> {
        if response.is_err() {
            debug!(url = %self.job.url, "website fetch failed, keeping record as decoded");
            return Ok(Vec::new());
        }

        let body = response.body_text();
        let document = Html::parse_document(&body);

        let mut emails = mailto_emails(&document);
        if emails.is_empty() {
            emails = body_emails(&body);
        }
        let social_links = anchor_social_links(&document);
        let tax_id = identifier::extract_tax_id(&body);

        info!(
            url = %self.job.url,
            emails = emails.len(),
            social = social_links.len(),
            tax_id = %tax_id,
            "mined website contacts"
        );

        let chain_registry = arena
            .with_record(self.record, |record| {
                record.set_emails(emails);
                for (platform, url) in social_links {
                    record.social_links.set(platform, url);
                }
                record.tax_id = tax_id.clone();
                !record.tax_id.is_empty()
            })
            .unwrap_or(false);

        if chain_registry {
            let lookup = RegistryLookupJob::new(
                self.job.id.to_string(),
                &tax_id,
                self.record,
                &self.registry,
            )?;
            return Ok(vec![Box::new(lookup)]);
        }
        Ok(Vec::new())
    }
}

/// Phase one: anchors with a `mailto:` target, validated and deduplicated in
/// first-seen order. Trusted over free-text matches.
fn mailto_emails(document: &Html) -> Vec<String> {
    let selector = Selector::parse("a[href^='mailto:']").unwrap();
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let candidate = href.trim_start_matches("mailto:");
        if let Some(email) = valid_email(candidate) {
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }
    }
    emails
}

/// Phase two: email-shaped substrings anywhere in the body. Only consulted
/// when phase one found nothing.
fn body_emails(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for m in EMAIL_RE.find_iter(body) {
        let email = m.as_str().to_string();
        if seen.insert(email.clone()) {
            emails.push(email);
        }
    }
    emails
}

fn valid_email(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    EMAIL_EXACT_RE
        .is_match(candidate)
        .then(|| candidate.to_string())
}

/// Every anchor is scanned; a later anchor for the same platform replaces the
/// earlier one. Kept that way on purpose to match the established output.
fn anchor_social_links(document: &Html) -> Vec<(SocialPlatform, String)> {
    let selector = Selector::parse("a").unwrap();
    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        for platform in SocialPlatform::ALL {
            if href.contains(platform.needle()) {
                links.push((platform, href.to_string()));
            }
        }
    }
    links
}
