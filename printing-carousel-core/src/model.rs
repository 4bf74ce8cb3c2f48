use serde::{Deserialize, Serialize};
use crate::error::CarouselError;

/// A clicked card instance in the proxy sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CardReference {
    /// Face image URLs, front first
    pub faces: Vec<String>,
    /// Opaque key used to query alternate printings
    pub search_key: String,
    pub name: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl CardReference {
    pub fn new(faces: Vec<String>, search_key: impl Into<String>, name: impl Into<String>) -> Self {
        CardReference {
            faces,
            search_key: search_key.into(),
            name: name.into(),
            is_custom: false,
        }
    }

    /// A user-supplied image: one face, no printings to browse
    pub fn custom(image_url: impl Into<String>) -> Self {
        CardReference {
            faces: vec![image_url.into()],
            search_key: String::new(),
            name: String::new(),
            is_custom: true,
        }
    }

    /// Same card identity pointing at another printing's faces
    pub fn with_faces(&self, faces: Vec<String>) -> Self {
        CardReference {
            faces,
            search_key: self.search_key.clone(),
            name: self.name.clone(),
            is_custom: self.is_custom,
        }
    }

    pub fn front_face(&self) -> Option<&str> {
        self.faces.first().map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrintingRecord {
    pub faces: Vec<String>,
    pub set: String,
    pub collector_number: String,
    pub reference_url: String,
    /// 1-based position in lookup order, assigned by [`PrintingSet::new`]
    #[serde(default)]
    pub rank: usize,
}

impl PrintingRecord {
    pub fn new(
        faces: Vec<String>,
        set: impl Into<String>,
        collector_number: impl Into<String>,
        reference_url: impl Into<String>,
    ) -> Self {
        PrintingRecord {
            faces,
            set: set.into(),
            collector_number: collector_number.into(),
            reference_url: reference_url.into(),
            rank: 0,
        }
    }

    pub fn shows_face(&self, url: &str) -> bool {
        self.faces.iter().any(|face| face == url)
    }
}

/// Printings in lookup order, treated as a circular sequence.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PrintingSet {
    printings: Vec<PrintingRecord>,
    current_index: usize,
}

impl PrintingSet {
    pub fn new(
        mut printings: Vec<PrintingRecord>,
        current_index: usize,
    ) -> Result<Self, CarouselError> {
        if !printings.is_empty() && current_index >= printings.len() {
            return Err(CarouselError::InvalidCard(format!(
                "Current printing index {} out of range for {} printings",
                current_index,
                printings.len()
            )));
        }

        for (index, printing) in printings.iter_mut().enumerate() {
            printing.rank = index + 1;
        }

        Ok(PrintingSet {
            printings,
            current_index,
        })
    }

    pub fn empty() -> Self {
        PrintingSet {
            printings: Vec::new(),
            current_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.printings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printings.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn get(&self, index: usize) -> Option<&PrintingRecord> {
        self.printings.get(index)
    }

    pub fn printings(&self) -> &[PrintingRecord] {
        &self.printings
    }

    pub fn into_printings(self) -> Vec<PrintingRecord> {
        self.printings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(set: &str) -> PrintingRecord {
        PrintingRecord::new(
            vec![format!("https://img.example/{}.jpg", set)],
            set,
            "1",
            format!("https://cards.example/{}/1", set),
        )
    }

    #[test]
    fn test_ranks_follow_lookup_order() {
        let set = PrintingSet::new(vec![record("lea"), record("m10"), record("2x2")], 1).unwrap();

        let ranks: Vec<usize> = set.printings().iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(set.current_index(), 1);
        assert_eq!(set.get(2).unwrap().set, "2x2");
    }

    #[test]
    fn test_current_index_out_of_range() {
        let result = PrintingSet::new(vec![record("lea")], 1);
        assert!(matches!(result, Err(CarouselError::InvalidCard(_))));
    }

    #[test]
    fn test_empty_set_accepts_any_index() {
        let set = PrintingSet::new(Vec::new(), 0).unwrap();
        assert!(set.is_empty());
        assert_eq!(set, PrintingSet::empty());
    }

    #[test]
    fn test_custom_card_reference() {
        let card = CardReference::custom("blob:custom-1");
        assert!(card.is_custom);
        assert_eq!(card.front_face(), Some("blob:custom-1"));
        assert!(card.search_key.is_empty());
    }

    #[test]
    fn test_with_faces_keeps_identity() {
        let card = CardReference::new(
            vec!["front-a".to_string(), "back-a".to_string()],
            "prints:delver",
            "Delver of Secrets",
        );
        let rebound = card.with_faces(vec!["front-b".to_string(), "back-b".to_string()]);

        assert_eq!(rebound.search_key, card.search_key);
        assert_eq!(rebound.name, card.name);
        assert_eq!(rebound.faces, vec!["front-b", "back-b"]);
    }

    #[test]
    fn test_card_reference_json_defaults_custom_flag() {
        let json = r#"{"faces":["a.jpg"],"search_key":"prints:bolt","name":"Lightning Bolt"}"#;
        let card: CardReference = serde_json::from_str(json).unwrap();
        assert!(!card.is_custom);
        assert_eq!(card.faces, vec!["a.jpg"]);
    }
}
