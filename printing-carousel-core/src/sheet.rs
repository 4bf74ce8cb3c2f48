use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::CarouselError;
use crate::model::CardReference;

const CUSTOM_CARD_ALT: &str = "Custom card";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageKind {
    #[default]
    CardFace,
    Decoration,
}

/// One rendered image in the proxy sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SheetImage {
    pub source: String,
    pub alt: String,
    #[serde(default)]
    pub kind: ImageKind,
    /// Card that clicking this image opens
    pub binding: Option<CardReference>,
}

impl SheetImage {
    pub fn card_face(source: impl Into<String>, alt: impl Into<String>, binding: CardReference) -> Self {
        SheetImage {
            source: source.into(),
            alt: alt.into(),
            kind: ImageKind::CardFace,
            binding: Some(binding),
        }
    }

    pub fn is_card_face(&self) -> bool {
        self.kind == ImageKind::CardFace
    }
}

/// The generated proxy sheet, in print order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxySheet {
    pub images: Vec<SheetImage>,
}

impl ProxySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out custom images first, then every face of every card, each face
    /// bound to its card's full face list.
    pub fn from_cards(custom_images: Vec<String>, cards: Vec<CardReference>) -> Self {
        let mut images = Vec::new();

        for custom_image in custom_images {
            let binding = CardReference::custom(custom_image.clone());
            images.push(SheetImage::card_face(custom_image, CUSTOM_CARD_ALT, binding));
        }

        for card in cards {
            for face in &card.faces {
                images.push(SheetImage::card_face(face.clone(), card.name.clone(), card.clone()));
            }
        }

        ProxySheet { images }
    }

    pub fn load(path: &Path) -> Result<Self, CarouselError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CarouselError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Card bound to the image at `index`, if it is clickable
    pub fn click(&self, index: usize) -> Option<CardReference> {
        self.images
            .get(index)
            .filter(|image| image.is_card_face())
            .and_then(|image| image.binding.clone())
    }

    pub fn card_faces(&self) -> impl Iterator<Item = &SheetImage> {
        self.images.iter().filter(|image| image.is_card_face())
    }

    /// Rewrite every card face showing `old_faces[k]` to `new_faces[k]` and
    /// rebind it to `card` with the new faces. Returns how many images changed.
    pub fn substitute(
        &mut self,
        old_faces: &[String],
        new_faces: &[String],
        card: &CardReference,
    ) -> Result<usize, CarouselError> {
        if old_faces.len() != new_faces.len() {
            return Err(CarouselError::FaceCountMismatch {
                old: old_faces.len(),
                new: new_faces.len(),
            });
        }

        let binding = card.with_faces(new_faces.to_vec());
        let mut rewritten = 0;

        // One pass so a face moved into a slot is never rewritten again
        for image in self.images.iter_mut().filter(|image| image.is_card_face()) {
            if let Some(position) = old_faces.iter().position(|face| *face == image.source) {
                debug!("Changing {} to {}", image.source, new_faces[position]);
                image.source = new_faces[position].clone();
                image.binding = Some(binding.clone());
                rewritten += 1;
            }
        }

        if rewritten == 0 {
            return Err(CarouselError::NoMatchingElement {
                faces: old_faces.to_vec(),
            });
        }

        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|url| url.to_string()).collect()
    }

    fn double_faced_card() -> CardReference {
        CardReference::new(faces(&["a", "b"]), "prints:delver", "Delver of Secrets")
    }

    #[test]
    fn test_from_cards_layout() {
        let bolt = CardReference::new(faces(&["bolt"]), "prints:bolt", "Lightning Bolt");
        let sheet = ProxySheet::from_cards(
            vec!["blob:1".to_string()],
            vec![bolt.clone(), double_faced_card()],
        );

        let sources: Vec<&str> = sheet.images.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["blob:1", "bolt", "a", "b"]);
        assert_eq!(sheet.images[0].alt, "Custom card");
        assert!(sheet.click(0).unwrap().is_custom);
        assert_eq!(sheet.click(1), Some(bolt));
        // Both faces open the whole card
        assert_eq!(sheet.click(3).unwrap().faces, faces(&["a", "b"]));
    }

    #[test]
    fn test_substitute_is_face_position_exact() {
        let card = double_faced_card();
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone()]);

        let rewritten = sheet
            .substitute(&faces(&["a", "b"]), &faces(&["x", "y"]), &card)
            .unwrap();

        assert_eq!(rewritten, 2);
        assert_eq!(sheet.images[0].source, "x");
        assert_eq!(sheet.images[1].source, "y");
    }

    #[test]
    fn test_substitute_rebinds_to_new_printing() {
        let card = double_faced_card();
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone(), card.clone()]);

        sheet
            .substitute(&faces(&["a", "b"]), &faces(&["x", "y"]), &card)
            .unwrap();

        for index in 0..sheet.len() {
            let binding = sheet.click(index).unwrap();
            assert_eq!(binding.faces, faces(&["x", "y"]));
            assert_eq!(binding.search_key, "prints:delver");
        }
    }

    #[test]
    fn test_substitute_twice_is_idempotent() {
        let card = double_faced_card();
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone()]);

        sheet
            .substitute(&faces(&["a", "b"]), &faces(&["x", "y"]), &card)
            .unwrap();
        let after_once = sheet.clone();

        let second = sheet.substitute(&faces(&["a", "b"]), &faces(&["x", "y"]), &card);
        assert!(matches!(second, Err(CarouselError::NoMatchingElement { .. })));
        assert_eq!(sheet, after_once);
    }

    #[test]
    fn test_substitute_does_not_chain_overlapping_faces() {
        let card = double_faced_card();
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone()]);

        sheet
            .substitute(&faces(&["a", "b"]), &faces(&["b", "c"]), &card)
            .unwrap();

        assert_eq!(sheet.images[0].source, "b");
        assert_eq!(sheet.images[1].source, "c");
    }

    #[test]
    fn test_substitute_skips_decorations() {
        let card = CardReference::new(faces(&["a"]), "prints:a", "A");
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone()]);
        sheet.images.push(SheetImage {
            source: "a".to_string(),
            alt: "cut line".to_string(),
            kind: ImageKind::Decoration,
            binding: None,
        });

        let rewritten = sheet.substitute(&faces(&["a"]), &faces(&["z"]), &card).unwrap();

        assert_eq!(rewritten, 1);
        assert_eq!(sheet.images[1].source, "a");
        assert_eq!(sheet.click(1), None);
    }

    #[test]
    fn test_substitute_rejects_face_count_mismatch() {
        let card = double_faced_card();
        let mut sheet = ProxySheet::from_cards(Vec::new(), vec![card.clone()]);

        let result = sheet.substitute(&faces(&["a", "b"]), &faces(&["x"]), &card);

        assert!(matches!(
            result,
            Err(CarouselError::FaceCountMismatch { old: 2, new: 1 })
        ));
        assert_eq!(sheet.images[0].source, "a");
    }

    #[test]
    fn test_sheet_json_roundtrip_through_file() {
        let card = double_faced_card();
        let sheet = ProxySheet::from_cards(vec!["blob:9".to_string()], vec![card]);
        let path = std::env::temp_dir().join("printing_carousel_sheet_test.json");

        sheet.save(&path).unwrap();
        let loaded = ProxySheet::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, sheet);
    }
}
