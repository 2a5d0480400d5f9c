use std::time::Duration;

use extractor_core::{CompanyRecord, RunConfiguration, SocialLinks};
use rand::seq::SliceRandom;
use rand::Rng;
use url::Url;

use crate::{ExtractionError, ExtractionProvider, FailureKind, SearchError, SearchProvider};

pub const MOCK_FAILURE_MESSAGE: &str =
    "Failed to extract data: Connection timeout or blocked by anti-bot measures";

static SEARCH_CANDIDATES: [&str; 5] = [
    "https://example-company1.com",
    "https://example-company2.com",
    "https://example-company3.com",
    "https://startup-demo.com",
    "https://tech-solutions.com",
];

struct CatalogEntry {
    company_name: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
    description: &'static str,
    linkedin: Option<&'static str>,
    twitter: Option<&'static str>,
    facebook: Option<&'static str>,
    industry: &'static str,
    employee_count: &'static str,
    founded: &'static str,
}

static CATALOG: [CatalogEntry; 3] = [
    CatalogEntry {
        company_name: "TechCorp Solutions",
        email: "contact@techcorp.com",
        phone: "+1 (555) 123-4567",
        address: "123 Tech Street, San Francisco, CA 94105",
        description: "Leading provider of enterprise software solutions and cloud computing services.",
        linkedin: Some("https://linkedin.com/company/techcorp"),
        twitter: Some("https://twitter.com/techcorp"),
        facebook: None,
        industry: "Software Development",
        employee_count: "500-1000",
        founded: "2010",
    },
    CatalogEntry {
        company_name: "Innovation Labs",
        email: "hello@innovationlabs.io",
        phone: "+1 (555) 987-6543",
        address: "456 Innovation Blvd, Austin, TX 78701",
        description: "R&D company focused on emerging technologies and startup incubation.",
        linkedin: Some("https://linkedin.com/company/innovationlabs"),
        twitter: None,
        facebook: Some("https://facebook.com/innovationlabs"),
        industry: "Research & Development",
        employee_count: "50-100",
        founded: "2018",
    },
    CatalogEntry {
        company_name: "Global Dynamics",
        email: "info@globaldynamics.com",
        phone: "+1 (555) 456-7890",
        address: "789 Business Park, New York, NY 10001",
        description: "Multinational corporation providing consulting and business solutions worldwide.",
        linkedin: Some("https://linkedin.com/company/globaldynamics"),
        twitter: Some("https://twitter.com/globaldynamics"),
        facebook: Some("https://facebook.com/globaldynamics"),
        industry: "Consulting",
        employee_count: "10000+",
        founded: "1995",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct MockSettings {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Probability in `0.0..=1.0` that an extraction fails.
    pub failure_rate: f64,
    pub search_delay: Duration,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            failure_rate: 0.2,
            search_delay: Duration::from_millis(1500),
        }
    }
}

impl MockSettings {
    /// No delays and no random failures.
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            failure_rate: 0.0,
            search_delay: Duration::ZERO,
        }
    }
}

/// Random-data stand-in for a scraping backend.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    settings: MockSettings,
}

impl MockProvider {
    pub fn new(settings: MockSettings) -> Self {
        Self { settings }
    }

    fn random_delay(&self) -> Duration {
        let MockSettings {
            min_delay,
            max_delay,
            ..
        } = self.settings;
        if max_delay <= min_delay {
            return min_delay;
        }
        rand::thread_rng().gen_range(min_delay..=max_delay)
    }

    fn generate(&self, url: &str, config: &RunConfiguration) -> Result<CompanyRecord, ExtractionError> {
        let mut rng = rand::thread_rng();
        if rng.gen_bool(failure_probability(self.settings.failure_rate)) {
            return Err(ExtractionError::new(FailureKind::Blocked, MOCK_FAILURE_MESSAGE));
        }
        let entry = CATALOG
            .choose(&mut rng)
            .ok_or_else(|| ExtractionError::new(FailureKind::Provider, "empty mock catalog"))?;
        Ok(build_record(entry, url, config))
    }
}

// `gen_bool` panics outside `0.0..=1.0`, and NaN survives `clamp`.
fn failure_probability(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn build_record(entry: &CatalogEntry, url: &str, config: &RunConfiguration) -> CompanyRecord {
    let mut record = CompanyRecord {
        company_name: entry.company_name.to_string(),
        website_url: url.to_string(),
        email: Some(entry.email.to_string()),
        phone: Some(entry.phone.to_string()),
        industry: Some(entry.industry.to_string()),
        employee_count: Some(entry.employee_count.to_string()),
        founded: Some(entry.founded.to_string()),
        ..CompanyRecord::default()
    };
    if config.extract_social_media {
        record.social_media = Some(SocialLinks {
            linkedin: entry.linkedin.map(str::to_string),
            twitter: entry.twitter.map(str::to_string),
            facebook: entry.facebook.map(str::to_string),
        });
    }
    if config.extract_address {
        record.address = Some(entry.address.to_string());
    }
    if config.extract_description {
        record.description = Some(entry.description.to_string());
    }
    record
}

#[async_trait::async_trait]
impl ExtractionProvider for MockProvider {
    async fn extract(
        &self,
        url: &str,
        config: &RunConfiguration,
    ) -> Result<CompanyRecord, ExtractionError> {
        let delay = self.random_delay();
        tokio::time::sleep(delay).await;
        Url::parse(url).map_err(|err| ExtractionError::new(FailureKind::InvalidUrl, err.to_string()))?;
        self.generate(url, config)
    }
}

#[async_trait::async_trait]
impl SearchProvider for MockProvider {
    async fn search_companies(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        tokio::time::sleep(self.settings.search_delay).await;

        let count = rand::thread_rng().gen_range(3..=SEARCH_CANDIDATES.len());
        SEARCH_CANDIDATES
            .iter()
            .take(count)
            .map(|base| {
                let mut url =
                    Url::parse(base).map_err(|err| SearchError::Provider(err.to_string()))?;
                url.query_pairs_mut().append_pair("q", query);
                Ok(url.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(social: bool, address: bool, description: bool) -> RunConfiguration {
        RunConfiguration {
            extract_social_media: social,
            extract_address: address,
            extract_description: description,
            ..RunConfiguration::default()
        }
    }

    #[tokio::test]
    async fn extract_honors_feature_flags() {
        let provider = MockProvider::new(MockSettings::instant());

        let full = provider
            .extract("https://acme.test/", &flags(true, true, true))
            .await
            .unwrap();
        assert_eq!(full.website_url, "https://acme.test/");
        assert!(full.social_media.is_some());
        assert!(full.address.is_some());
        assert!(full.description.is_some());
        assert!(full.email.is_some());

        let bare = provider
            .extract("https://acme.test/", &flags(false, false, false))
            .await
            .unwrap();
        assert!(bare.social_media.is_none());
        assert!(bare.address.is_none());
        assert!(bare.description.is_none());
        assert!(!bare.company_name.is_empty());
    }

    #[tokio::test]
    async fn certain_failure_uses_blocked_message() {
        let provider = MockProvider::new(MockSettings {
            failure_rate: 1.0,
            ..MockSettings::instant()
        });
        let err = provider
            .extract("https://acme.test/", &RunConfiguration::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Blocked);
        assert_eq!(err.message, MOCK_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn non_finite_failure_rate_never_fails() {
        let provider = MockProvider::new(MockSettings {
            failure_rate: f64::NAN,
            ..MockSettings::instant()
        });
        assert!(provider
            .extract("https://acme.test/", &RunConfiguration::default())
            .await
            .is_ok());
        assert_eq!(failure_probability(f64::INFINITY), 0.0);
        assert_eq!(failure_probability(-0.5), 0.0);
        assert_eq!(failure_probability(2.0), 1.0);
    }

    #[tokio::test]
    async fn unparseable_url_fails_asynchronously() {
        let provider = MockProvider::new(MockSettings::instant());
        let err = provider
            .extract("not a url", &RunConfiguration::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[tokio::test]
    async fn search_returns_three_to_five_candidates_with_query() {
        let provider = MockProvider::new(MockSettings::instant());
        for _ in 0..20 {
            let urls = provider.search_companies("tech startups").await.unwrap();
            assert!((3..=5).contains(&urls.len()));
            assert!(urls.iter().all(|url| url.ends_with("?q=tech+startups")));
            assert!(urls[0].starts_with("https://example-company1.com"));
        }
    }

    #[tokio::test]
    async fn blank_search_is_rejected() {
        let provider = MockProvider::new(MockSettings::instant());
        assert_eq!(
            provider.search_companies("  ").await,
            Err(SearchError::EmptyQuery)
        );
    }

    #[test]
    fn delay_stays_within_bounds() {
        let provider = MockProvider::default();
        for _ in 0..50 {
            let delay = provider.random_delay();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay <= Duration::from_secs(4));
        }
    }
}
