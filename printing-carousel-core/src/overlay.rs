//! The printing overlay: one browsing session per clicked card.
//!
//! Opening is split in two so any runtime can drive it: [`Overlay::open`]
//! renders the placeholder and hands back a [`LookupRequest`], the front end
//! runs [`fetch_printings`](crate::lookup::fetch_printings) however it runs
//! async work, and [`Overlay::apply_lookup`] installs the result. Responses
//! for a session that has since been replaced or dismissed are dropped.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::carousel::{Carousel, Direction, FaceSwap};
use crate::config::OverlayOptions;
use crate::error::CarouselError;
use crate::lookup::{LookupRequest, LookupResponse};
use crate::model::CardReference;
use crate::sheet::ProxySheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Shown greyed out while printings load
    Disabled,
    Absent,
}

/// Stand-in entry showing the clicked card's own faces
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub faces: Vec<String>,
    pub status: String,
    pub controls: Controls,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayContent {
    Empty,
    Placeholder(Placeholder),
    Carousel(Carousel),
}

#[derive(Debug)]
pub struct Overlay {
    options: OverlayOptions,
    visible: bool,
    content: OverlayContent,
    session: u64,
    card: Option<CardReference>,
    cancel: Option<CancellationToken>,
    alert: Option<String>,
}

impl Overlay {
    pub fn new(options: OverlayOptions) -> Self {
        Overlay {
            options,
            visible: false,
            content: OverlayContent::Empty,
            session: 0,
            card: None,
            cancel: None,
            alert: None,
        }
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        match &self.content {
            OverlayContent::Carousel(carousel) => Some(carousel),
            _ => None,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn card(&self) -> Option<&CardReference> {
        self.card.as_ref()
    }

    /// Message to show the user, set when a lookup fails
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Start a session for `card`: clear whatever was shown, render the
    /// placeholder and return the lookup to run. Custom cards have nothing
    /// to look up.
    pub fn open(&mut self, card: CardReference) -> Option<LookupRequest> {
        self.end_session();
        self.alert = None;

        let placeholder = if card.is_custom {
            Placeholder {
                faces: card.faces.clone(),
                status: self.options.custom_card_message.clone(),
                controls: Controls::Absent,
            }
        } else {
            Placeholder {
                faces: card.faces.clone(),
                status: format!("?/?\n{}", self.options.loading_message),
                controls: Controls::Disabled,
            }
        };

        self.content = OverlayContent::Placeholder(placeholder);
        self.visible = true;
        self.card = Some(card.clone());

        if card.is_custom {
            info!(session = self.session, "Opened overlay for custom card");
            return None;
        }

        info!(session = self.session, card = %card.name, "Opened printing overlay");

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        Some(LookupRequest {
            session: self.session,
            card,
            cancel,
        })
    }

    /// Install a lookup result. Returns false when the response belongs to
    /// a session that is no longer live.
    pub fn apply_lookup(&mut self, response: LookupResponse) -> bool {
        if response.session != self.session || !self.visible {
            debug!(
                response_session = response.session,
                live_session = self.session,
                "Dropping stale printing lookup"
            );
            return false;
        }

        self.cancel = None;

        match response.result {
            Ok(printing_set) => match Carousel::build(printing_set) {
                Ok(carousel) => {
                    info!(
                        session = self.session,
                        printings = carousel.len(),
                        current = carousel.focus(),
                        "Printings loaded"
                    );
                    self.content = OverlayContent::Carousel(carousel);
                }
                Err(CarouselError::EmptyPrintingSet) => {
                    info!(session = self.session, "Lookup returned no printings");
                    let empty_status = format!("?/?\n{}", self.options.empty_message);
                    if let OverlayContent::Placeholder(placeholder) = &mut self.content {
                        placeholder.status = empty_status;
                        placeholder.controls = Controls::Absent;
                    }
                }
                Err(e) => self.report(e),
            },
            Err(CarouselError::Cancelled) => {
                debug!(session = self.session, "Lookup cancelled");
            }
            Err(e) => self.report(e),
        }

        true
    }

    /// Step the carousel and, unless disabled, swap the sheet over to the
    /// newly shown printing. Returns the new focus.
    pub fn navigate(&mut self, direction: Direction, sheet: &mut ProxySheet) -> Option<usize> {
        let Overlay {
            options,
            content,
            card,
            session,
            ..
        } = self;

        let (OverlayContent::Carousel(carousel), Some(card)) = (content, card.as_mut()) else {
            return None;
        };

        let swap = carousel.navigate(direction);
        if options.substitute_on_navigate && apply_swap(sheet, &swap, card, *session) > 0 {
            // Later swaps start from what the sheet now shows
            *card = card.with_faces(swap.new_faces);
        }

        Some(carousel.focus())
    }

    /// Put the shown printing into the sheet in place of the faces the sheet
    /// currently shows for this card, then close the overlay if so
    /// configured. Returns how many sheet images changed.
    pub fn use_printing(&mut self, sheet: &mut ProxySheet) -> usize {
        let (Some(carousel), Some(card)) = (self.carousel(), self.card.as_ref()) else {
            return 0;
        };

        let swap = FaceSwap {
            old_faces: card.faces.clone(),
            new_faces: carousel.visible_entry().faces().to_vec(),
        };
        let rewritten = apply_swap(sheet, &swap, card, self.session);
        if rewritten > 0 {
            self.card = Some(card.with_faces(swap.new_faces));
        }

        if self.options.close_after_select {
            self.dismiss();
        }

        rewritten
    }

    /// Close the overlay. Any lookup still running for it is cancelled and
    /// its eventual response ignored.
    pub fn dismiss(&mut self) {
        if self.visible {
            debug!(session = self.session, "Overlay dismissed");
        }
        self.end_session();
        self.content = OverlayContent::Empty;
        self.visible = false;
        self.card = None;
    }

    fn end_session(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.session += 1;
    }

    fn report(&mut self, error: CarouselError) {
        warn!(session = self.session, error = %error, "Printing lookup failed");
        self.alert = Some(error.to_string());
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(OverlayOptions::default())
    }
}

fn apply_swap(sheet: &mut ProxySheet, swap: &FaceSwap, card: &CardReference, session: u64) -> usize {
    if swap.is_identity() {
        return 0;
    }

    match sheet.substitute(&swap.old_faces, &swap.new_faces, card) {
        Ok(rewritten) => {
            debug!(session, rewritten, "Substituted printing in sheet");
            rewritten
        }
        Err(CarouselError::NoMatchingElement { faces }) => {
            // Sheet regenerated or card removed since the overlay opened
            debug!(session, faces = ?faces, "No sheet image to substitute");
            0
        }
        Err(e) => {
            warn!(session, error = %e, "Substitution skipped");
            0
        }
    }
}
