use std::fmt;

#[derive(Debug)]
pub enum CarouselError {
    LookupFailed(String),
    NoMatchingElement { faces: Vec<String> },
    EmptyPrintingSet,
    FaceCountMismatch { old: usize, new: usize },
    Cancelled,
    InvalidCard(String),
    Json(serde_json::Error),
    Io(std::io::Error),
    Config(String),
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarouselError::LookupFailed(e) => write!(f, "Printing lookup failed: {}", e),
            CarouselError::NoMatchingElement { faces } => {
                write!(f, "No sheet image shows {}", faces.join(", "))
            }
            CarouselError::EmptyPrintingSet => write!(f, "No printings found"),
            CarouselError::FaceCountMismatch { old, new } => write!(
                f,
                "Face count mismatch: replacing {} face(s) with {} face(s)",
                old, new
            ),
            CarouselError::Cancelled => write!(f, "Lookup cancelled"),
            CarouselError::InvalidCard(e) => write!(f, "Invalid card: {}", e),
            CarouselError::Json(e) => write!(f, "JSON parsing error: {}", e),
            CarouselError::Io(e) => write!(f, "IO error: {}", e),
            CarouselError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for CarouselError {}

impl From<serde_json::Error> for CarouselError {
    fn from(err: serde_json::Error) -> Self {
        CarouselError::Json(err)
    }
}

impl From<std::io::Error> for CarouselError {
    fn from(err: std::io::Error) -> Self {
        CarouselError::Io(err)
    }
}
