use tracing::debug;

use crate::address;
use crate::error::{Result, ScraperError};
use crate::payload::{element_at, RawPayload};
use crate::record::{Address, BusinessRecord};

/// Index of the business-record sub-sequence within the top-level payload.
const RECORD_SEQ_INDEX: usize = 6;
/// Minimum number of top-level elements for a payload to be decodable.
const MIN_TOP_LEVEL_LEN: usize = 7;

/// Decodes one raw provider payload into a business record. Only the payload
/// shape is a hard failure; every field is read positionally and falls back
/// to its zero value on its own, so a single broken path never blocks the
/// other fields.
pub fn decode_payload(input_id: &str, payload: &RawPayload) -> Result<BusinessRecord> {
    let top = payload.as_array().ok_or_else(|| {
        ScraperError::MalformedPayload("top-level value is not a sequence".to_string())
    })?;
    if top.len() < MIN_TOP_LEVEL_LEN {
        return Err(ScraperError::MalformedPayload(format!(
            "expected at least {MIN_TOP_LEVEL_LEN} top-level elements, got {}",
            top.len()
        )));
    }
    let seq = top[RECORD_SEQ_INDEX].as_array().ok_or_else(|| {
        ScraperError::MalformedPayload(format!(
            "business sub-sequence missing at index {RECORD_SEQ_INDEX}"
        ))
    })?;

    let mut record = BusinessRecord {
        id: input_id.to_string(),
        link: element_at(seq, &[1]),
        title: element_at(seq, &[11]),
        city: element_at(seq, &[183, 1, 3]),
        website: element_at(seq, &[7, 0]),
        phone: element_at(seq, &[178, 0, 0]),
        ..BusinessRecord::default()
    };
    record.set_emails(element_at::<Vec<String>>(seq, &[5]));

    let full_address: String = element_at(seq, &[18]);
    let (street, number) = address::split_street_and_number(&full_address);
    record.address = Address { street, number };

    record.social_links.seed_from_website(&record.website);

    debug!(title = %record.title, website = %record.website, "decoded place record");
    Ok(record)
}
