use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::error::CarouselError;
use crate::model::{CardReference, PrintingRecord, PrintingSet};

/// Source of alternate printings for a card.
pub trait PrintingLookup {
    /// Fetch every printing for `search_key`, with `current_index` pointing at
    /// the printing that shows `sample_face_url`.
    fn lookup_printings(
        &self,
        search_key: &str,
        sample_face_url: &str,
        card_name: &str,
    ) -> impl Future<Output = Result<PrintingSet, CarouselError>> + Send;
}

/// Index of the first printing showing `current_face`
pub fn resolve_current_index(printings: &[PrintingRecord], current_face: &str) -> Option<usize> {
    printings
        .iter()
        .position(|printing| printing.shows_face(current_face))
}

/// Printings per search key, as a JSON document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PrintingCatalog {
    pub printings: BTreeMap<String, Vec<PrintingRecord>>,
}

impl PrintingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CarouselError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn insert(&mut self, search_key: impl Into<String>, printings: Vec<PrintingRecord>) {
        self.printings.insert(search_key.into(), printings);
    }

    pub fn printing_set(
        &self,
        search_key: &str,
        sample_face_url: &str,
        card_name: &str,
    ) -> Result<PrintingSet, CarouselError> {
        info!("Looking up all printings of {}", card_name);

        let Some(printings) = self.printings.get(search_key) else {
            return Err(CarouselError::LookupFailed(format!(
                "No printings known for {} ({})",
                card_name, search_key
            )));
        };

        if printings.is_empty() {
            return Ok(PrintingSet::empty());
        }

        let Some(current_index) = resolve_current_index(printings, sample_face_url) else {
            return Err(CarouselError::LookupFailed(
                "Could not find current printing in list of card printings".to_string(),
            ));
        };

        PrintingSet::new(printings.clone(), current_index)
    }
}

/// [`PrintingLookup`] over an in-memory catalog. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    catalog: Arc<PrintingCatalog>,
    latency: Option<Duration>,
}

impl CatalogLookup {
    pub fn new(catalog: PrintingCatalog) -> Self {
        CatalogLookup {
            catalog: Arc::new(catalog),
            latency: None,
        }
    }

    /// Delay every answer, like a remote source would
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn catalog(&self) -> &PrintingCatalog {
        &self.catalog
    }
}

impl PrintingLookup for CatalogLookup {
    fn lookup_printings(
        &self,
        search_key: &str,
        sample_face_url: &str,
        card_name: &str,
    ) -> impl Future<Output = Result<PrintingSet, CarouselError>> + Send {
        let result = self
            .catalog
            .printing_set(search_key, sample_face_url, card_name);
        let latency = self.latency;

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}

/// A lookup the overlay wants performed for one session
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub session: u64,
    pub card: CardReference,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
pub struct LookupResponse {
    pub session: u64,
    pub result: Result<PrintingSet, CarouselError>,
}

/// Run `request` against `lookup`, resolving to `Cancelled` as soon as the
/// session that issued it is closed or replaced.
pub async fn fetch_printings<L: PrintingLookup>(lookup: &L, request: LookupRequest) -> LookupResponse {
    let sample_face = request.card.front_face().unwrap_or_default();

    let result = tokio::select! {
        _ = request.cancel.cancelled() => Err(CarouselError::Cancelled),
        result = lookup.lookup_printings(&request.card.search_key, sample_face, &request.card.name) => result,
    };

    // Failures are reported by the overlay that receives the response
    if let Err(CarouselError::Cancelled) = &result {
        debug!("Printing lookup for session {} cancelled", request.session);
    }

    LookupResponse {
        session: request.session,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt_printings() -> Vec<PrintingRecord> {
        ["lea", "m10", "2x2"]
            .iter()
            .map(|set| {
                PrintingRecord::new(
                    vec![format!("https://img.example/{}/bolt.jpg", set)],
                    *set,
                    "161",
                    format!("https://cards.example/{}/161", set),
                )
            })
            .collect()
    }

    fn catalog() -> PrintingCatalog {
        let mut catalog = PrintingCatalog::new();
        catalog.insert("prints:bolt", bolt_printings());
        catalog.insert("prints:nothing", Vec::new());
        catalog
    }

    fn request(session: u64, front: &str, search_key: &str) -> LookupRequest {
        LookupRequest {
            session,
            card: CardReference::new(vec![front.to_string()], search_key, "Lightning Bolt"),
            cancel: CancellationToken::new(),
        }
    }

    #[test]
    fn test_resolve_current_index() {
        let printings = bolt_printings();
        assert_eq!(
            resolve_current_index(&printings, "https://img.example/m10/bolt.jpg"),
            Some(1)
        );
        assert_eq!(resolve_current_index(&printings, "missing"), None);
    }

    #[test]
    fn test_catalog_assigns_current_index_and_ranks() {
        let set = catalog()
            .printing_set("prints:bolt", "https://img.example/2x2/bolt.jpg", "Lightning Bolt")
            .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.current_index(), 2);
        assert_eq!(set.get(2).unwrap().rank, 3);
    }

    #[test]
    fn test_catalog_unknown_current_printing() {
        let result = catalog().printing_set("prints:bolt", "https://img.example/other.jpg", "Lightning Bolt");
        match result {
            Err(CarouselError::LookupFailed(msg)) => {
                assert_eq!(msg, "Could not find current printing in list of card printings");
            }
            other => panic!("Expected LookupFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_empty_printings() {
        let set = catalog()
            .printing_set("prints:nothing", "any", "Nothing")
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"{"printings":{"prints:bolt":[{"faces":["f"],"set":"lea","collector_number":"161","reference_url":"https://cards.example/lea/161"}]}}"#;
        let catalog: PrintingCatalog = serde_json::from_str(json).unwrap();
        let set = catalog.printing_set("prints:bolt", "f", "Lightning Bolt").unwrap();
        assert_eq!(set.get(0).unwrap().rank, 1);
    }

    #[tokio::test]
    async fn test_fetch_printings_success() {
        let lookup = CatalogLookup::new(catalog());
        let response = fetch_printings(
            &lookup,
            request(4, "https://img.example/lea/bolt.jpg", "prints:bolt"),
        )
        .await;

        assert_eq!(response.session, 4);
        assert_eq!(response.result.unwrap().current_index(), 0);
    }

    #[tokio::test]
    async fn test_fetch_printings_unknown_key() {
        let lookup = CatalogLookup::new(catalog());
        let response = fetch_printings(&lookup, request(1, "x", "prints:unknown")).await;
        assert!(matches!(response.result, Err(CarouselError::LookupFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_printings_cancelled() {
        let lookup = CatalogLookup::new(catalog()).with_latency(Duration::from_secs(30));
        let request = request(2, "https://img.example/lea/bolt.jpg", "prints:bolt");
        request.cancel.cancel();

        let response = fetch_printings(&lookup, request).await;
        assert!(matches!(response.result, Err(CarouselError::Cancelled)));
    }
}
