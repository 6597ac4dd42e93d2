//! "Subject Details" intent.

use paydesk_core::{
    fold_eq, format_price, CatalogItem, CatalogQuery, PaymentLookup, DEFAULT_CURRENCY,
    NOT_AVAILABLE,
};
use paydesk_store::Store;

use crate::dialogflow::{FulfillmentResponse, Parameters};
use crate::error::FulfillmentError;

/// Reply when no subject was named.
pub const MISSING_SUBJECT_TEXT: &str = "Please specify a subject name.";

/// Shown in place of the download link until the customer has paid.
pub const DEMO_PDF_TEXT: &str = "Demo PDF link";

/// Describe a catalog subject.
///
/// Reads `subject_name` and, optionally, `email`. The download link is only
/// revealed when that email has paid for the subject.
///
/// # Errors
///
/// Returns [`FulfillmentError::SubjectLookup`] if the catalog cannot be read.
pub fn respond(
    store: &dyn Store,
    parameters: &Parameters,
) -> Result<FulfillmentResponse, FulfillmentError> {
    let Some(subject) = parameters.text("subject_name") else {
        return Ok(FulfillmentResponse::text(MISSING_SUBJECT_TEXT));
    };

    let Some(item) = store.find_catalog_item(&CatalogQuery::by_subject(&subject))? else {
        tracing::info!(subject = %subject, "Subject not in catalog");
        return Ok(FulfillmentResponse::text(format!(
            "Sorry, subject '{subject}' not found."
        )));
    };

    let purchased = parameters
        .text("email")
        .is_some_and(|email| has_paid_for(store, &email, &subject));

    Ok(FulfillmentResponse::text(describe(&item, &subject, purchased)))
}

/// Whether any payment under `email` was for `subject`. Lookup failures
/// count as not paid.
fn has_paid_for(store: &dyn Store, email: &str, subject: &str) -> bool {
    let lookup = PaymentLookup::new(Some(email), None, None, None);
    match store.find_payments(&lookup) {
        Ok(payments) => payments
            .iter()
            .any(|p| p.subject.as_deref().is_some_and(|s| fold_eq(s, subject))),
        Err(e) => {
            tracing::warn!(error = %e, "Payment lookup for subject details failed");
            false
        }
    }
}

fn describe(item: &CatalogItem, requested: &str, purchased: bool) -> String {
    let pdf_link = if purchased {
        item.pdf_link.as_deref().unwrap_or(NOT_AVAILABLE)
    } else {
        DEMO_PDF_TEXT
    };

    format!(
        "Subject: {}\nDescription: {}\nPrice: {}\nLink: {}\nPDF Link: {pdf_link}",
        item.subject.as_deref().unwrap_or(requested),
        item.description.as_deref().unwrap_or(NOT_AVAILABLE),
        format_price(item.price, DEFAULT_CURRENCY),
        item.link.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

#[cfg(test)]
mod tests {
    use paydesk_core::{CatalogId, PaymentRecord, RecordId, UNKNOWN_DATE};
    use paydesk_store::RocksStore;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn store_with_catalog() -> (TempDir, RocksStore) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        store
            .put_catalog_item(&CatalogItem {
                id: CatalogId::generate(),
                subject: Some("Maths".into()),
                language: Some("English".into()),
                month: Some("January".into()),
                price: Some(500),
                pdf_link: Some("https://cdn/maths.pdf".into()),
                description: Some("Monthly maths notes".into()),
                link: Some("https://shop/maths".into()),
            })
            .unwrap();
        (dir, store)
    }

    fn params(value: serde_json::Value) -> Parameters {
        serde_json::from_value(value).unwrap()
    }

    fn paid(store: &RocksStore, email: &str, subject: &str) {
        store
            .put_payment(&PaymentRecord {
                id: RecordId::generate(),
                email: email.into(),
                mobile_no: "not_provided".into(),
                payment_id: "pay_1".into(),
                transaction_id: "N/A".into(),
                rrn: None,
                date: UNKNOWN_DATE.into(),
                language: None,
                subject: Some(subject.into()),
                month: None,
                price: Some(500),
                currency: "INR".into(),
                status: "captured".into(),
            })
            .unwrap();
    }

    #[test]
    fn missing_subject() {
        let (_dir, store) = store_with_catalog();
        let response = respond(&store, &params(json!({"subject_name": ""}))).unwrap();
        assert_eq!(response.reply(), MISSING_SUBJECT_TEXT);
    }

    #[test]
    fn unknown_subject() {
        let (_dir, store) = store_with_catalog();
        let response = respond(&store, &params(json!({"subject_name": "Latin"}))).unwrap();
        assert_eq!(response.reply(), "Sorry, subject 'Latin' not found.");
    }

    #[test]
    fn unpaid_subject_shows_demo_link() {
        let (_dir, store) = store_with_catalog();
        let response = respond(&store, &params(json!({"subject_name": "maths"}))).unwrap();
        assert_eq!(
            response.reply(),
            "Subject: Maths\n\
             Description: Monthly maths notes\n\
             Price: ₹500\n\
             Link: https://shop/maths\n\
             PDF Link: Demo PDF link"
        );
    }

    #[test]
    fn paid_subject_reveals_pdf_link() {
        let (_dir, store) = store_with_catalog();
        paid(&store, "asha@example.com", "MATHS");

        let response = respond(
            &store,
            &params(json!({"subject_name": "Maths", "email": "Asha@example.com"})),
        )
        .unwrap();
        assert!(response.reply().ends_with("PDF Link: https://cdn/maths.pdf"));
    }

    #[test]
    fn payment_for_another_subject_does_not_count() {
        let (_dir, store) = store_with_catalog();
        paid(&store, "asha@example.com", "Physics");

        let response = respond(
            &store,
            &params(json!({"subject_name": "Maths", "email": "asha@example.com"})),
        )
        .unwrap();
        assert!(response.reply().ends_with(DEMO_PDF_TEXT));
    }
}
