use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, keyboard};
use printing_carousel_core::{
    CatalogLookup, Controls, Direction, LookupResponse, Overlay, OverlayContent, OverlayOptions,
    PrintingCatalog, ProxySheet, fetch_printings,
};
use rfd::AsyncFileDialog;
use std::path::PathBuf;
use std::sync::Arc;

// Card slots keep the Magic card aspect ratio (480:680 = ~0.706)
const CARD_WIDTH: f32 = 200.0;
const CARD_HEIGHT: f32 = 283.3;
const SHEET_COLUMNS: usize = 3;

#[derive(Debug, Clone)]
pub enum Message {
    OpenSheet,
    SheetPicked(Option<PathBuf>),
    OpenCatalog,
    CatalogPicked(Option<PathBuf>),
    SaveSheet,
    SaveTargetPicked(Option<PathBuf>),

    // Overlay lifecycle
    CardClicked(usize),
    PrintingsLoaded(Arc<LookupResponse>),
    Navigate(Direction),
    UsePrinting,
    CloseOverlay,
}

pub struct AppState {
    sheet: ProxySheet,
    sheet_path: Option<PathBuf>,
    lookup: CatalogLookup,
    overlay: Overlay,
    display_text: String,
    error_message: Option<String>,
}

impl AppState {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            sheet: ProxySheet::new(),
            sheet_path: None,
            lookup: CatalogLookup::default(),
            overlay: Overlay::new(options),
            display_text: "Open a proxy sheet and a printing catalog, then click a card to browse its printings.".to_string(),
            error_message: None,
        }
    }

    fn load_sheet(&mut self, path: PathBuf) {
        match ProxySheet::load(&path) {
            Ok(sheet) => {
                // The old sheet is gone, so is anything the overlay was showing for it
                self.overlay.dismiss();
                self.display_text = format!("Loaded {} images from {}", sheet.len(), path.display());
                self.sheet = sheet;
                self.sheet_path = Some(path);
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load sheet: {}", e));
            }
        }
    }

    fn load_catalog(&mut self, path: PathBuf) {
        match PrintingCatalog::load(&path) {
            Ok(catalog) => {
                self.display_text = format!(
                    "Loaded printings for {} cards from {}",
                    catalog.printings.len(),
                    path.display()
                );
                self.lookup = CatalogLookup::new(catalog);
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load catalog: {}", e));
            }
        }
    }
}

/// Optional arguments: sheet path, then catalog path
pub fn initialize() -> (AppState, Task<Message>) {
    let (options, options_error) = match OverlayOptions::load_or_default() {
        Ok(options) => (options, None),
        Err(e) => (OverlayOptions::default(), Some(e.to_string())),
    };

    let mut state = AppState::new(options);
    let mut args = std::env::args().skip(1);
    if let Some(sheet_path) = args.next() {
        state.load_sheet(PathBuf::from(sheet_path));
    }
    if let Some(catalog_path) = args.next() {
        state.load_catalog(PathBuf::from(catalog_path));
    }
    if options_error.is_some() {
        state.error_message = options_error;
    }

    (state, Task::none())
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::OpenSheet => {
            return Task::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("Proxy sheet", &["json"])
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::SheetPicked,
            );
        }
        Message::SheetPicked(path) => {
            if let Some(path) = path {
                state.load_sheet(path);
            }
        }
        Message::OpenCatalog => {
            return Task::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("Printing catalog", &["json"])
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::CatalogPicked,
            );
        }
        Message::CatalogPicked(path) => {
            if let Some(path) = path {
                state.load_catalog(path);
            }
        }
        Message::SaveSheet => {
            let file_name = state
                .sheet_path
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "proxy_sheet.json".to_string());
            return Task::perform(
                async move {
                    AsyncFileDialog::new()
                        .set_file_name(file_name)
                        .add_filter("Proxy sheet", &["json"])
                        .save_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::SaveTargetPicked,
            );
        }
        Message::SaveTargetPicked(path) => match path {
            Some(path) => match state.sheet.save(&path) {
                Ok(()) => {
                    state.display_text = format!("Sheet saved to: {}", path.display());
                    state.sheet_path = Some(path);
                    state.error_message = None;
                }
                Err(e) => {
                    state.error_message = Some(format!("Failed to save sheet: {}", e));
                }
            },
            None => {
                state.display_text = "Save cancelled.".to_string();
            }
        },
        Message::CardClicked(index) => {
            let Some(card) = state.sheet.click(index) else {
                return Task::none();
            };
            log::debug!("Card clicked at sheet position {}: '{}'", index, card.name);

            if let Some(request) = state.overlay.open(card) {
                let lookup = state.lookup.clone();
                return Task::perform(
                    async move { Arc::new(fetch_printings(&lookup, request).await) },
                    Message::PrintingsLoaded,
                );
            }
        }
        Message::PrintingsLoaded(response) => match Arc::try_unwrap(response) {
            Ok(response) => {
                if !state.overlay.apply_lookup(response) {
                    log::debug!("Ignored printings for a closed overlay");
                }
            }
            Err(_) => log::warn!("Printing lookup response still shared, dropping it"),
        },
        Message::Navigate(direction) => {
            state.overlay.navigate(direction, &mut state.sheet);
        }
        Message::UsePrinting => {
            let Some(label) = state
                .overlay
                .carousel()
                .map(|carousel| carousel.visible_entry().printing_label())
            else {
                return Task::none();
            };
            let rewritten = state.overlay.use_printing(&mut state.sheet);
            log::debug!("Used {}, {} sheet image(s) rewritten", label, rewritten);
            state.display_text = format!("Using {}", label);
        }
        Message::CloseOverlay => {
            state.overlay.dismiss();
        }
    }
    Task::none()
}

pub fn subscription(_state: &AppState) -> Subscription<Message> {
    keyboard::on_key_press(|key, _modifiers| match key {
        keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::CloseOverlay),
        keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
            Some(Message::Navigate(Direction::Left))
        }
        keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
            Some(Message::Navigate(Direction::Right))
        }
        _ => None,
    })
}

/// Image slot; images are shown by URL since this front end does not decode them
fn face_slot<'a>(label: &'a str, url: &'a str) -> Element<'a, Message> {
    container(text(format!("{}\n{}", label, url)).size(10))
        .style(|_theme| container::Style {
            background: Some(iced::Color::from_rgb(0.98, 0.98, 0.98).into()),
            border: iced::Border {
                color: iced::Color::from_rgb(0.5, 0.5, 0.5),
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        })
        .padding(8)
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(CARD_HEIGHT))
        .into()
}

fn faces_row<'a>(faces: &'a [String], label: &'a str) -> Element<'a, Message> {
    row(faces.iter().map(|face| face_slot(label, face)))
        .spacing(5)
        .into()
}

fn overlay_view(overlay: &Overlay) -> Element<'_, Message> {
    let body: Element<Message> = match overlay.content() {
        OverlayContent::Empty => column![].into(),
        OverlayContent::Placeholder(placeholder) => {
            let faces = faces_row(&placeholder.faces, "Current");
            let card_row: Element<Message> = match placeholder.controls {
                // Buttons without on_press render disabled
                Controls::Disabled => row![button("←").padding(10), faces, button("→").padding(10)]
                    .spacing(10)
                    .into(),
                Controls::Absent => faces,
            };

            let mut body = column![card_row, text(&placeholder.status).size(14)].spacing(10);
            if placeholder.controls == Controls::Disabled {
                body = body.push(button("Use this printing").padding(10));
            }
            body.into()
        }
        OverlayContent::Carousel(carousel) => {
            let entry = carousel.visible_entry();
            column![
                row![
                    button("←")
                        .on_press(Message::Navigate(Direction::Left))
                        .padding(10),
                    faces_row(entry.faces(), &entry.printing.set),
                    button("→")
                        .on_press(Message::Navigate(Direction::Right))
                        .padding(10),
                ]
                .spacing(10),
                text(entry.status_text(carousel.len())).size(14),
                text(&entry.printing.reference_url).size(12),
                button("Use this printing")
                    .on_press(Message::UsePrinting)
                    .padding(10),
            ]
            .spacing(10)
            .into()
        }
    };

    let title = overlay
        .card()
        .map(|card| {
            if card.is_custom {
                "Custom card".to_string()
            } else {
                format!("Printings of {}", card.name)
            }
        })
        .unwrap_or_default();

    let alert: Element<Message> = match overlay.alert() {
        Some(alert) => column![text("Error:").size(16), text(alert).size(14)]
            .spacing(5)
            .into(),
        None => column![].into(),
    };

    column![
        text(title).size(16),
        button("Close").on_press(Message::CloseOverlay).padding(5),
        body,
        alert,
    ]
    .spacing(10)
    .into()
}

fn sheet_grid(sheet: &ProxySheet) -> Element<'_, Message> {
    if sheet.is_empty() {
        return text("No proxy sheet loaded.").size(14).into();
    }

    let mut grid_rows: Vec<Element<Message>> = Vec::new();
    let mut current_row: Vec<Element<Message>> = Vec::new();

    for (index, image) in sheet.images.iter().enumerate() {
        let slot = button(text(format!("{}\n{}", image.alt, image.source)).size(10))
            .on_press_maybe(sheet.click(index).map(|_| Message::CardClicked(index)))
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .padding(4);
        current_row.push(slot.into());

        if current_row.len() == SHEET_COLUMNS || index == sheet.len() - 1 {
            grid_rows.push(row(std::mem::take(&mut current_row)).spacing(0).into());
        }
    }

    column(grid_rows).spacing(0).into()
}

pub fn view(state: &AppState) -> Element<Message> {
    let toolbar = row![
        button("Open Sheet...").on_press(Message::OpenSheet).padding(10),
        button("Open Catalog...").on_press(Message::OpenCatalog).padding(10),
        button("Save Sheet...")
            .on_press_maybe(if state.sheet.is_empty() {
                None
            } else {
                Some(Message::SaveSheet)
            })
            .padding(10),
    ]
    .spacing(10);

    let main_section = if state.overlay.is_visible() {
        overlay_view(&state.overlay)
    } else {
        sheet_grid(&state.sheet)
    };

    let error_section = if let Some(error) = &state.error_message {
        column![text("Error:").size(16), text(error).size(14),].spacing(5)
    } else {
        column![]
    };

    let content = column![
        toolbar,
        main_section,
        error_section,
        text(&state.display_text).size(16),
    ]
    .spacing(20)
    .padding(20);

    scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
