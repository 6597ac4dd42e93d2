//! Catalog items and the queries used to match payments against them.

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::ids::CatalogId;
use crate::normalize::{deserialize_price, deserialize_text, fold_eq};
use crate::payment::PaymentRecord;

/// A purchasable subject with its downloadable resource.
///
/// The catalog is maintained outside this service; documents are read with
/// lenient field parsing (see [`crate::normalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Store key. Seed files usually omit it.
    #[serde(default = "CatalogId::generate")]
    pub id: CatalogId,

    /// Subject name.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub subject: Option<String>,

    /// Language edition.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub language: Option<String>,

    /// Month the material covers.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub month: Option<String>,

    /// Price in major currency units.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<i64>,

    /// Download link handed out after payment.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub pdf_link: Option<String>,

    /// Marketing description.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,

    /// Product page link.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub link: Option<String>,
}

impl CatalogItem {
    /// True when both items describe the same listing (subject, language,
    /// month and price, compared case-insensitively).
    #[must_use]
    pub fn same_listing(&self, other: &Self) -> bool {
        fn text_eq(a: Option<&str>, b: Option<&str>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => fold_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        self.price == other.price
            && text_eq(self.subject.as_deref(), other.subject.as_deref())
            && text_eq(self.language.as_deref(), other.language.as_deref())
            && text_eq(self.month.as_deref(), other.month.as_deref())
    }
}

/// Parse a catalog seed document: a JSON array of catalog items.
///
/// # Errors
///
/// Returns [`DeskError::InvalidCatalog`] if the document is not an array of
/// objects.
pub fn parse_catalog_seed(json: &str) -> Result<Vec<CatalogItem>> {
    serde_json::from_str(json).map_err(|e| DeskError::InvalidCatalog(e.to_string()))
}

/// A conjunctive catalog filter. `None` fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Required subject (case-insensitive).
    pub subject: Option<String>,
    /// Required language (case-insensitive).
    pub language: Option<String>,
    /// Required month (case-insensitive).
    pub month: Option<String>,
    /// Required price.
    pub price: Option<i64>,
}

impl CatalogQuery {
    /// Filter on subject name only.
    #[must_use]
    pub fn by_subject(subject: &str) -> Self {
        Self {
            subject: Some(subject.to_string()),
            ..Self::default()
        }
    }

    /// Whether an item satisfies every constraint of this query.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        fn field_ok(wanted: Option<&str>, actual: Option<&str>) -> bool {
            wanted.map_or(true, |w| actual.is_some_and(|a| fold_eq(w, a)))
        }

        self.price.map_or(true, |p| item.price == Some(p))
            && field_ok(self.subject.as_deref(), item.subject.as_deref())
            && field_ok(self.language.as_deref(), item.language.as_deref())
            && field_ok(self.month.as_deref(), item.month.as_deref())
    }

    /// The ordered lookups used to resolve a payment to a catalog item.
    ///
    /// 1. subject, language, month and price (absent fields unconstrained)
    /// 2. subject and price
    /// 3. price and language
    ///
    /// Stages that need a field the payment lacks, or that repeat an
    /// earlier stage, are left out. A payment without a price yields no
    /// stages at all.
    #[must_use]
    pub fn resolution_stages(payment: &PaymentRecord) -> Vec<Self> {
        let Some(price) = payment.price else {
            return Vec::new();
        };

        let exact = Self {
            subject: payment.subject.clone(),
            language: payment.language.clone(),
            month: payment.month.clone(),
            price: Some(price),
        };
        let subject_and_price = payment.subject.as_ref().map(|subject| Self {
            subject: Some(subject.clone()),
            price: Some(price),
            ..Self::default()
        });
        let price_and_language = payment.language.as_ref().map(|language| Self {
            language: Some(language.clone()),
            price: Some(price),
            ..Self::default()
        });

        let mut stages = vec![exact];
        for stage in [subject_and_price, price_and_language].into_iter().flatten() {
            if !stages.contains(&stage) {
                stages.push(stage);
            }
        }
        stages
    }
}
