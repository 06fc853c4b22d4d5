use anyhow::Result;
use serde_json::{json, Value};

use place_scraper::arena::RecordArena;
use place_scraper::config::RegistryConfig;
use place_scraper::jobs::contact::ContactMineJob;
use place_scraper::jobs::search::SearchJob;
use place_scraper::jobs::{FetchResponse, ScrapeJob};
use place_scraper::record::SocialPlatform;

/// Provider payload whose business sub-sequence carries the given website.
fn search_body(website: &str) -> Vec<u8> {
    let mut seq = vec![Value::Null; 184];
    seq[1] = json!("https://maps.example.com/place/acme");
    seq[5] = json!(["listed@acme.pl"]);
    seq[7] = json!([website]);
    seq[11] = json!("Acme");
    seq[18] = json!("Acme Sp. z o.o., Długa 12, 00-123, Polska");
    seq[178] = json!([["123 456 789"]]);
    seq[183] = json!([null, [null, null, null, "Warszawa"]]);

    let mut top = vec![Value::Null; 6];
    top.push(Value::Array(seq));
    serde_json::to_vec(&Value::Array(top)).unwrap()
}

#[tokio::test]
async fn chain_runs_from_decode_through_registry_enrichment() -> Result<()> {
    let arena = RecordArena::new();
    let registry = RegistryConfig::default();
    let search = SearchJob::new("batch-1", "acme warszawa", "pl", true, registry)?;

    let children = search
        .process(&arena, FetchResponse::ok(200, search_body("https://acme.pl")))
        .await?;
    assert_eq!(children.len(), 1);
    assert_eq!(arena.len(), 1);

    let mine = &children[0];
    assert_eq!(mine.descriptor().url, "https://acme.pl");
    assert!(mine.process_on_fetch_error());

    let website_html = r#"
        <html><body>
            <a href="mailto:info@acme.pl">contact us</a>
            <a href="https://facebook.com/acme">fb</a>
            <footer>NIP: 123-456-78-90</footer>
        </body></html>
    "#;
    let children = mine
        .process(&arena, FetchResponse::ok(200, website_html.as_bytes()))
        .await?;
    assert_eq!(children.len(), 1);

    let lookup = &children[0];
    assert!(lookup.descriptor().url.contains("1234567890"));

    let registry_body = r#"{
        "result": {
            "name": "ACME SP Z O O",
            "nip": "1234567890",
            "statusVat": "Czynny",
            "regon": "123456789",
            "residenceAddress": "ul. Długa 12, 00-123 Warszawa",
            "registrationLegalDate": "2015-03-01"
        }
    }"#;
    let children = lookup
        .process(&arena, FetchResponse::ok(200, registry_body.as_bytes()))
        .await?;
    assert!(children.is_empty());

    let record = arena.into_records().remove(0);
    assert_eq!(record.id, "batch-1");
    assert_eq!(record.title, "Acme");
    assert_eq!(record.city, "Warszawa");
    assert_eq!(record.address.street, "Długa");
    assert_eq!(record.address.number, "12");
    assert_eq!(record.emails, vec!["info@acme.pl"]);
    assert_eq!(
        record.social_links.get(SocialPlatform::Facebook),
        Some("https://facebook.com/acme")
    );
    assert_eq!(record.tax_id, "1234567890");
    let data = record.registry_data.expect("registry payload");
    assert_eq!(data["name"], "ACME SP Z O O");
    assert_eq!(data["statusVat"], "Czynny");
    Ok(())
}

#[tokio::test]
async fn social_website_keeps_its_provisional_link_and_spawns_no_lookup() -> Result<()> {
    let arena = RecordArena::new();
    let registry = RegistryConfig::default();
    let search = SearchJob::new("", "shop", "en", true, registry.clone())?;

    // A social-profile website is not worth fetching, so the search stage
    // spawns nothing on its own.
    let children = search
        .process(
            &arena,
            FetchResponse::ok(200, search_body("https://instagram.com/shop")),
        )
        .await?;
    assert!(children.is_empty());

    // Driven directly, the miner falls back to body text for emails and
    // leaves the decoder-seeded instagram link in place.
    let handle_record = arena.snapshot().remove(0);
    assert_eq!(
        handle_record.social_links.get(SocialPlatform::Instagram),
        Some("https://instagram.com/shop")
    );

    let arena = RecordArena::new();
    let handle = arena.insert(handle_record);
    let mine = ContactMineJob::new(String::new(), "https://instagram.com/shop", handle, registry);
    let body = r#"<html><body><p>write to contact@shop.com</p></body></html>"#;
    let children = mine
        .process(&arena, FetchResponse::ok(200, body.as_bytes()))
        .await?;
    assert!(children.is_empty());

    let record = arena.get(handle).unwrap();
    assert_eq!(record.emails, vec!["contact@shop.com"]);
    assert_eq!(
        record.social_links.get(SocialPlatform::Instagram),
        Some("https://instagram.com/shop")
    );
    assert_eq!(record.tax_id, "");
    Ok(())
}

#[tokio::test]
async fn website_fetch_failure_keeps_the_decoded_record() -> Result<()> {
    let arena = RecordArena::new();
    let registry = RegistryConfig::default();
    let search = SearchJob::new("", "acme", "pl", true, registry)?;

    let children = search
        .process(&arena, FetchResponse::ok(200, search_body("https://acme.pl")))
        .await?;
    let mine = &children[0];

    let children = mine
        .process(&arena, FetchResponse::failed("connection refused"))
        .await?;
    assert!(children.is_empty());

    let record = arena.into_records().remove(0);
    assert_eq!(record.title, "Acme");
    assert_eq!(record.emails, vec!["listed@acme.pl"]);
    assert_eq!(record.tax_id, "");
    assert!(record.registry_data.is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_search_payload_creates_no_record() -> Result<()> {
    let arena = RecordArena::new();
    let search = SearchJob::new("", "acme", "pl", true, RegistryConfig::default())?;

    let short = serde_json::to_vec(&json!([null, null]))?;
    let outcome = search.process(&arena, FetchResponse::ok(200, short)).await;
    assert!(outcome.is_err());
    assert!(arena.is_empty());
    Ok(())
}
