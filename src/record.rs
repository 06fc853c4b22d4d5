use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The social platforms we keep profile links for. A record holds at most one
/// URL per platform; later writes replace earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Twitter,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
        SocialPlatform::Twitter,
    ];

    /// Substring that marks a URL as belonging to this platform.
    pub fn needle(self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Twitter => "twitter",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl SocialLinks {
    pub fn set(&mut self, platform: SocialPlatform, url: String) {
        match platform {
            SocialPlatform::Facebook => self.facebook = Some(url),
            SocialPlatform::Instagram => self.instagram = Some(url),
            SocialPlatform::Twitter => self.twitter = Some(url),
        }
    }

    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Facebook => self.facebook.as_deref(),
            SocialPlatform::Instagram => self.instagram.as_deref(),
            SocialPlatform::Twitter => self.twitter.as_deref(),
        }
    }

    /// Seeds provisional entries from the record's own website URL. These are
    /// weak signals; any in-document anchor match later replaces them.
    pub fn seed_from_website(&mut self, website: &str) {
        for platform in SocialPlatform::ALL {
            if website.contains(platform.needle()) {
                self.set(platform, website.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
}

/// One normalized place listing, progressively enriched by the job chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRecord {
    pub id: String,
    pub link: String,
    pub title: String,
    pub address: Address,
    pub city: String,
    pub website: String,
    pub phone: String,
    pub emails: Vec<String>,
    pub social_links: SocialLinks,
    pub tax_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_data: Option<serde_json::Value>,
}

impl BusinessRecord {
    /// Replaces the email list, dropping empties and duplicates while keeping
    /// first-seen order.
    pub fn set_emails<I>(&mut self, emails: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        self.emails = emails
            .into_iter()
            .filter(|email| !email.is_empty())
            .filter(|email| seen.insert(email.clone()))
            .collect();
    }

    /// A website is worth mining when it exists and is not itself a social
    /// profile URL.
    pub fn has_minable_website(&self) -> bool {
        !self.website.is_empty()
            && SocialPlatform::ALL
                .iter()
                .all(|platform| !self.website.contains(platform.needle()))
    }

    pub fn csv_headers() -> [&'static str; 11] {
        [
            "title", "address", "city", "website", "phone", "emails", "facebook", "instagram",
            "twitter", "tax_id", "registry",
        ]
    }

    pub fn csv_row(&self) -> [String; 11] {
        let address = format!("{} {}", self.address.street, self.address.number);
        let social = |platform| {
            self.social_links
                .get(platform)
                .unwrap_or_default()
                .to_string()
        };

        [
            self.title.clone(),
            address,
            self.city.clone(),
            self.website.clone(),
            self.phone.clone(),
            self.emails.join(", "),
            social(SocialPlatform::Facebook),
            social(SocialPlatform::Instagram),
            social(SocialPlatform::Twitter),
            self.tax_id.clone(),
            self.registry_data
                .as_ref()
                .map(|data| data.to_string())
                .unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_emails_drops_duplicates_and_empties() {
        let mut record = BusinessRecord::default();
        record.set_emails(vec![
            "a@x.com".to_string(),
            String::new(),
            "b@x.com".to_string(),
            "a@x.com".to_string(),
        ]);
        assert_eq!(record.emails, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn social_links_last_write_wins() {
        let mut links = SocialLinks::default();
        links.set(SocialPlatform::Facebook, "https://facebook.com/a".to_string());
        links.set(SocialPlatform::Facebook, "https://facebook.com/b".to_string());
        assert_eq!(links.get(SocialPlatform::Facebook), Some("https://facebook.com/b"));
        assert_eq!(links.get(SocialPlatform::Twitter), None);
    }

    #[test]
    fn seed_from_website_only_matches_platforms_in_url() {
        let mut links = SocialLinks::default();
        links.seed_from_website("https://instagram.com/shop");
        assert_eq!(links.get(SocialPlatform::Instagram), Some("https://instagram.com/shop"));
        assert_eq!(links.get(SocialPlatform::Facebook), None);
    }

    #[test]
    fn social_profile_websites_are_not_minable() {
        let mut record = BusinessRecord {
            website: "https://www.facebook.com/acme".to_string(),
            ..BusinessRecord::default()
        };
        assert!(!record.has_minable_website());

        record.website = "https://acme.pl".to_string();
        assert!(record.has_minable_website());

        record.website.clear();
        assert!(!record.has_minable_website());
    }

    #[test]
    fn csv_row_matches_header_layout() {
        let mut record = BusinessRecord {
            title: "Acme".to_string(),
            city: "Warszawa".to_string(),
            website: "https://acme.pl".to_string(),
            phone: "123 456 789".to_string(),
            tax_id: "1234567890".to_string(),
            address: Address {
                street: "Długa".to_string(),
                number: "12".to_string(),
            },
            ..BusinessRecord::default()
        };
        record.set_emails(vec!["info@acme.pl".to_string(), "sales@acme.pl".to_string()]);
        record
            .social_links
            .set(SocialPlatform::Facebook, "https://facebook.com/acme".to_string());

        let row = record.csv_row();
        assert_eq!(row.len(), BusinessRecord::csv_headers().len());
        assert_eq!(row[0], "Acme");
        assert_eq!(row[1], "Długa 12");
        assert_eq!(row[5], "info@acme.pl, sales@acme.pl");
        assert_eq!(row[6], "https://facebook.com/acme");
        assert_eq!(row[7], "");
        assert_eq!(row[9], "1234567890");
        assert_eq!(row[10], "");
    }
}
