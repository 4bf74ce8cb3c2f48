pub mod carousel;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod overlay;
pub mod sheet;

pub use carousel::{Carousel, Direction, FaceSwap, ImageLoading, OverlayEntry, left, right, step};
pub use config::{OverlayOptions, get_options_path};
pub use error::CarouselError;
pub use lookup::{
    CatalogLookup, LookupRequest, LookupResponse, PrintingCatalog, PrintingLookup,
    fetch_printings, resolve_current_index,
};
pub use model::{CardReference, PrintingRecord, PrintingSet};
pub use overlay::{Controls, Overlay, OverlayContent, Placeholder};
pub use sheet::{ImageKind, ProxySheet, SheetImage};
