use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::arena::{RecordArena, RecordHandle};
use crate::config::{RegistryConfig, RegistryProvider};
use crate::error::{Result, ScraperError};
use crate::jobs::{FetchResponse, JobDescriptor, Priority, ScrapeJob};

const TOKEN_ENV: &str = "REGISTRY_API_TOKEN";

/// Looks the mined tax identifier up in the configured business registry and
/// merges the normalized result into the record. A lookup that finds nothing
/// is still a successful job; only transport and parse problems surface as
/// per-job errors.
pub struct RegistryLookupJob {
    job: JobDescriptor,
    record: RecordHandle,
    tax_id: String,
    provider: RegistryProvider,
}

impl RegistryLookupJob {
    pub fn new(
        parent_id: String,
        tax_id: &str,
        record: RecordHandle,
        config: &RegistryConfig,
    ) -> Result<Self> {
        let job = match config.provider {
            RegistryProvider::WhiteList => {
                JobDescriptor::get(parent_id, white_list_url(config, tax_id)?, Priority::High)
            }
            RegistryProvider::CompanyIndex => {
                let token = config
                    .api_token
                    .as_deref()
                    .ok_or(ScraperError::MissingCredential(TOKEN_ENV))?;
                JobDescriptor::get(parent_id, company_index_url(config, tax_id)?, Priority::High)
                    .with_header("Authorization", format!("Bearer {token}"))
            }
        };
        Ok(Self {
            job,
            record,
            tax_id: tax_id.to_string(),
            provider: config.provider,
        })
    }
}

/// VAT white-list lookup: the identifier is a path segment and the lookup is
/// valid for the current date only.
fn white_list_url(config: &RegistryConfig, tax_id: &str) -> Result<String> {
    let mut url = Url::parse(&format!(
        "{}/{tax_id}",
        config.white_list_url.trim_end_matches('/')
    ))?;
    url.query_pairs_mut()
        .append_pair("date", &Local::now().format("%Y-%m-%d").to_string());
    Ok(url.to_string())
}

fn company_index_url(config: &RegistryConfig, tax_id: &str) -> Result<String> {
    let mut url = Url::parse(&config.company_index_url)?;
    url.query_pairs_mut().append_pair("nip", tax_id);
    Ok(url.to_string())
}

#[async_trait]
impl ScrapeJob for RegistryLookupJob {
    fn descriptor(&self) -> &JobDescriptor {
        &self.job
    }

    async fn process(
        &self,
        arena: &RecordArena,
        response: FetchResponse,
    ) -> Result<Vec<Box<dyn ScrapeJob>>> {
        if response.is_err() {
            return Err(ScraperError::Fetch(
                response.error.unwrap_or_else(|| "registry fetch failed".to_string()),
            ));
        }

        let body: Value = serde_json::from_slice(&response.body)?;
        let normalized = match self.provider {
            RegistryProvider::WhiteList => white_list_entry(&body),
            RegistryProvider::CompanyIndex => company_index_entry(&body, &self.tax_id),
        };

        match normalized {
            Some(payload) => {
                info!(url = %self.job.url, tax_id = %self.tax_id, "registry record found");
                arena.with_record(self.record, |record| {
                    record.registry_data = Some(payload);
                });
            }
            None => debug!(url = %self.job.url, tax_id = %self.tax_id, "registry record not found"),
        }
        Ok(Vec::new())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WhiteListEntry {
    name: Option<String>,
    nip: Option<String>,
    status_vat: Option<String>,
    regon: Option<String>,
    residence_address: Option<String>,
    registration_legal_date: Option<String>,
}

/// Normalizes the white-list `result` object. A missing result, or one with
/// none of the expected fields, reads as "not found".
fn white_list_entry(body: &Value) -> Option<Value> {
    let entry: WhiteListEntry = serde_json::from_value(body.get("result")?.clone()).ok()?;
    if entry.name.is_none() && entry.nip.is_none() {
        return None;
    }
    Some(json!({
        "name": entry.name.unwrap_or_default(),
        "nip": entry.nip.unwrap_or_default(),
        "statusVat": entry.status_vat.unwrap_or_default(),
        "regon": entry.regon.unwrap_or_default(),
        "residenceAddress": entry.residence_address.unwrap_or_default(),
        "registrationLegalDate": entry.registration_legal_date.unwrap_or_default(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyIndexResponse {
    firmy: Vec<CompanyEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyEntry {
    nip: String,
    nazwa: String,
    wlasciciel: Option<CompanyOwner>,
    adres: Option<CompanyAddress>,
    data_rejestracji: String,
    status: String,
    link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyOwner {
    imie: String,
    nazwisko: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyAddress {
    ulica: String,
    nr_domu: String,
    miasto: String,
    kod_pocztowy: String,
}

/// Normalizes the first company matching the queried identifier, falling
/// back to the first entry; an empty list reads as "not found".
fn company_index_entry(body: &Value, tax_id: &str) -> Option<Value> {
    let response: CompanyIndexResponse = serde_json::from_value(body.clone()).ok()?;
    let entry = response
        .firmy
        .iter()
        .find(|company| company.nip == tax_id)
        .or_else(|| response.firmy.first())?;

    let owner = entry
        .wlasciciel
        .as_ref()
        .map(|owner| format!("{} {}", owner.imie, owner.nazwisko).trim().to_string())
        .unwrap_or_default();
    let address = entry
        .adres
        .as_ref()
        .map(|adres| {
            format!(
                "{} {}, {} {}",
                adres.ulica, adres.nr_domu, adres.kod_pocztowy, adres.miasto
            )
            .trim()
            .to_string()
        })
        .unwrap_or_default();

    Some(json!({
        "nip": entry.nip,
        "name": entry.nazwa,
        "owner": owner,
        "address": address,
        "registrationDate": entry.data_rejestracji,
        "status": entry.status,
        "link": entry.link,
    }))
}
