//! "Payment Verification" intent.
//!
//! Finds the customer's payments by any identifying field they gave, drops
//! the ones whose access window has closed, resolves each remaining payment
//! to a catalog item and replies with one block per payment.

use chrono::{DateTime, Duration, Utc};

use paydesk_core::{
    format_price, CatalogItem, CatalogQuery, PaymentLookup, PaymentRecord, NOT_AVAILABLE,
};
use paydesk_store::Store;

use crate::dialogflow::{FulfillmentResponse, Parameters};

/// Reply when no identifying field was supplied.
pub const MISSING_DETAILS_TEXT: &str = "Please provide your email, payment ID, or transaction ID.";

/// Reply when nothing matches the supplied fields.
pub const NO_PAYMENT_TEXT: &str = "I'm sorry, no payment found with the given details.";

/// Reply when every matching payment is past its access window.
pub const EXPIRED_TEXT: &str =
    "Sorry, your payment details are no longer available. The access period has expired.";

const NO_PDF_TEXT: &str = "No PDF link found for this subject.";

/// Answer a verification request from its intent parameters.
///
/// Reads `email`, `payment_id`, `transaction_id` and `rrn`.
pub fn respond(
    store: &dyn Store,
    parameters: &Parameters,
    now: DateTime<Utc>,
    window: Duration,
) -> FulfillmentResponse {
    let lookup = PaymentLookup::new(
        parameters.text("email").as_deref(),
        parameters.text("payment_id").as_deref(),
        parameters.text("transaction_id").as_deref(),
        parameters.text("rrn").as_deref(),
    );
    verify_payment(store, &lookup, now, window)
}

/// Look up payments and build the verification reply.
///
/// An empty lookup never reaches the store. Store failures are logged and
/// answered like an unknown payment.
pub fn verify_payment(
    store: &dyn Store,
    lookup: &PaymentLookup,
    now: DateTime<Utc>,
    window: Duration,
) -> FulfillmentResponse {
    if lookup.is_empty() {
        return FulfillmentResponse::text(MISSING_DETAILS_TEXT);
    }

    let payments = match store.find_payments(lookup) {
        Ok(payments) => payments,
        Err(e) => {
            tracing::error!(error = %e, "Payment lookup failed");
            Vec::new()
        }
    };
    if payments.is_empty() {
        tracing::info!("No payment matched the lookup");
        return FulfillmentResponse::text(NO_PAYMENT_TEXT);
    }

    let matched = payments.len();
    let active: Vec<PaymentRecord> = payments
        .into_iter()
        .filter(|payment| !payment.is_expired(now, window))
        .collect();
    if active.is_empty() {
        tracing::info!(matched, "All matched payments are past the access window");
        return FulfillmentResponse::text(EXPIRED_TEXT);
    }

    tracing::info!(matched, active = active.len(), "Payments verified");

    let blocks = active
        .iter()
        .enumerate()
        .map(|(index, payment)| {
            let item = resolve_catalog(store, payment);
            render_block(index + 1, payment, item.as_ref())
        })
        .collect();
    FulfillmentResponse::messages(blocks)
}

/// Resolve a payment to a catalog item, trying each fallback stage in turn.
///
/// A store failure stops resolution and leaves the payment unresolved.
pub fn resolve_catalog(store: &dyn Store, payment: &PaymentRecord) -> Option<CatalogItem> {
    for (stage, query) in CatalogQuery::resolution_stages(payment).iter().enumerate() {
        match store.find_catalog_item(query) {
            Ok(Some(item)) => {
                tracing::debug!(payment_id = %payment.payment_id, stage, "Catalog item resolved");
                return Some(item);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(payment_id = %payment.payment_id, error = %e, "Catalog lookup failed");
                return None;
            }
        }
    }

    tracing::debug!(payment_id = %payment.payment_id, "No catalog item for payment");
    None
}

fn render_block(number: usize, payment: &PaymentRecord, item: Option<&CatalogItem>) -> String {
    // Payment fields win; the catalog only fills gaps.
    fn describe<'a>(own: Option<&'a str>, listed: Option<&'a str>) -> &'a str {
        own.or(listed).unwrap_or(NOT_AVAILABLE)
    }

    let subject = describe(
        payment.subject.as_deref(),
        item.and_then(|i| i.subject.as_deref()),
    );
    let month = describe(payment.month.as_deref(), item.and_then(|i| i.month.as_deref()));
    let language = describe(
        payment.language.as_deref(),
        item.and_then(|i| i.language.as_deref()),
    );
    let pdf_link = match item.and_then(|i| i.pdf_link.as_deref()) {
        Some(link) => format!("PDF Link: {link}"),
        None => format!("PDF Link: {NOT_AVAILABLE}\n{NO_PDF_TEXT}"),
    };

    format!(
        "Payment Verified!\n\
         Payment ID: {payment_id}\n\
         Date: {date}\n\
         Price: {price}\n\
         \n\
         Product {number}:\n\
         Subject: {subject}\n\
         Month: {month}\n\
         Language: {language}\n\
         \n\
         {pdf_link}\n\
         \n\
         Thank you for your support!",
        payment_id = payment.payment_id,
        date = payment.date,
        price = format_price(payment.price, &payment.currency),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use paydesk_core::{CatalogId, RecordId, UNKNOWN_DATE};
    use paydesk_store::RocksStore;
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, RocksStore) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn window() -> Duration {
        Duration::days(7)
    }

    fn payment(payment_id: &str, date: &str) -> PaymentRecord {
        PaymentRecord {
            id: RecordId::generate(),
            email: "asha@example.com".into(),
            mobile_no: "+919900000000".into(),
            payment_id: payment_id.into(),
            transaction_id: format!("txn_{payment_id}"),
            rrn: None,
            date: date.into(),
            language: Some("English".into()),
            subject: Some("Maths".into()),
            month: Some("January".into()),
            price: Some(500),
            currency: "INR".into(),
            status: "captured".into(),
        }
    }

    fn item(subject: &str, language: &str, month: &str, price: i64, pdf: &str) -> CatalogItem {
        CatalogItem {
            id: CatalogId::generate(),
            subject: Some(subject.into()),
            language: Some(language.into()),
            month: Some(month.into()),
            price: Some(price),
            pdf_link: Some(pdf.into()),
            description: None,
            link: None,
        }
    }

    fn by_email(email: &str) -> PaymentLookup {
        PaymentLookup::new(Some(email), None, None, None)
    }

    #[test]
    fn empty_lookup_prompts_for_details() {
        let (_dir, store) = store();
        let response = verify_payment(&store, &PaymentLookup::default(), now(), window());
        assert_eq!(response.reply(), MISSING_DETAILS_TEXT);
    }

    #[test]
    fn unknown_payment() {
        let (_dir, store) = store();
        let response = verify_payment(&store, &by_email("nobody@example.com"), now(), window());
        assert_eq!(response.reply(), NO_PAYMENT_TEXT);
    }

    #[test]
    fn exact_catalog_match_gives_pdf_link() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_1", "2024-03-08 09:30:00")).unwrap();
        store
            .put_catalog_item(&item("maths", "ENGLISH", "january", 500, "https://cdn/maths.pdf"))
            .unwrap();

        let response = verify_payment(&store, &by_email("Asha@Example.com"), now(), window());
        let expected = "Payment Verified!\n\
                        Payment ID: pay_1\n\
                        Date: 2024-03-08 09:30:00\n\
                        Price: ₹500\n\
                        \n\
                        Product 1:\n\
                        Subject: Maths\n\
                        Month: January\n\
                        Language: English\n\
                        \n\
                        PDF Link: https://cdn/maths.pdf\n\
                        \n\
                        Thank you for your support!";
        assert_eq!(response.reply(), expected);
        assert_eq!(response.fulfillment_messages.len(), 1);
    }

    #[test]
    fn unresolved_payment_says_so() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_1", UNKNOWN_DATE)).unwrap();

        let response = verify_payment(&store, &by_email("asha@example.com"), now(), window());
        assert!(response.reply().contains("PDF Link: N/A\nNo PDF link found for this subject."));
    }

    #[test]
    fn fallback_stages_are_tried_in_order() {
        let (_dir, store) = store();
        let mut rec = payment("pay_1", UNKNOWN_DATE);
        rec.month = None;
        rec.subject = Some("Physics".into());
        store.put_payment(&rec).unwrap();

        // Only the price + language stage can match; month comes from the item.
        store
            .put_catalog_item(&item("Chemistry", "english", "March", 500, "https://cdn/chem.pdf"))
            .unwrap();

        let resolved = resolve_catalog(&store, &rec).unwrap();
        assert_eq!(resolved.pdf_link.as_deref(), Some("https://cdn/chem.pdf"));

        let response = verify_payment(&store, &by_email("asha@example.com"), now(), window());
        assert!(response.reply().contains("Subject: Physics\nMonth: March\n"));
    }

    #[test]
    fn subject_and_price_beats_price_and_language() {
        let (_dir, store) = store();
        let rec = payment("pay_1", UNKNOWN_DATE);
        store
            .put_catalog_item(&item("Biology", "English", "May", 500, "https://cdn/bio.pdf"))
            .unwrap();
        store
            .put_catalog_item(&item("Maths", "Hindi", "May", 500, "https://cdn/maths-hi.pdf"))
            .unwrap();

        let resolved = resolve_catalog(&store, &rec).unwrap();
        assert_eq!(resolved.pdf_link.as_deref(), Some("https://cdn/maths-hi.pdf"));
    }

    #[test]
    fn payment_without_price_never_resolves() {
        let (_dir, store) = store();
        let mut rec = payment("pay_1", UNKNOWN_DATE);
        rec.price = None;
        store
            .put_catalog_item(&item("Maths", "English", "January", 500, "https://cdn/maths.pdf"))
            .unwrap();

        assert!(resolve_catalog(&store, &rec).is_none());
    }

    #[test]
    fn expired_payments_are_filtered() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_old", "2024-02-01 10:00:00")).unwrap();
        store.put_payment(&payment("pay_new", "2024-03-09 10:00:00")).unwrap();

        let response = verify_payment(&store, &by_email("asha@example.com"), now(), window());
        assert_eq!(response.fulfillment_messages.len(), 1);
        assert!(response.reply().contains("Payment ID: pay_new"));
        assert!(!response.reply().contains("pay_old"));
        assert!(response.reply().contains("Product 1:"));
    }

    #[test]
    fn all_expired_gives_the_expired_message() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_old", "2024-02-01 10:00:00")).unwrap();

        let response = verify_payment(&store, &by_email("asha@example.com"), now(), window());
        assert_eq!(response.reply(), EXPIRED_TEXT);
        assert!(response.fulfillment_messages.is_empty());
    }

    #[test]
    fn several_payments_are_numbered() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_1", UNKNOWN_DATE)).unwrap();
        store.put_payment(&payment("pay_2", UNKNOWN_DATE)).unwrap();

        let response = verify_payment(&store, &by_email("asha@example.com"), now(), window());
        assert_eq!(response.fulfillment_messages.len(), 2);
        let reply = response.reply();
        assert!(reply.find("pay_1").unwrap() < reply.find("pay_2").unwrap());
        assert!(reply.contains("Product 2:"));
    }

    #[test]
    fn respond_reads_parameters() {
        let (_dir, store) = store();
        store.put_payment(&payment("pay_1", UNKNOWN_DATE)).unwrap();

        let params: Parameters = serde_json::from_value(serde_json::json!({
            "email": "",
            "payment_id": ["pay_1"]
        }))
        .unwrap();
        let response = respond(&store, &params, now(), window());
        assert!(response.reply().starts_with("Payment Verified!\nPayment ID: pay_1\n"));
    }
}
