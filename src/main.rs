use clap::Parser;
use iced::keyboard;
use iced::widget::{
    button, center, column, container, mouse_area, opaque, row, scrollable, stack, text,
    text_input, Space,
};
use iced::{Alignment, Element, Length, Size, Subscription, Task, Theme};
use std::collections::HashMap;

mod catalog;
mod state;
mod thumbs;
mod ui;

use catalog::loader::{self, CatalogSource, LoadError};
use catalog::record::Record;
use state::filter::filter_records;
use state::grid::{self, column_count_for_width, Masonry, Paginator, SENTINEL_MARGIN};
use state::tags::TagIndex;
use state::view::{History, ViewState};
use thumbs::{FetchedImage, ThumbState};

/// How many chips the tag strip shows, curated entries included
const CHIP_LIMIT: usize = 24;

/// Hand-picked chips that always lead the strip, in this order
const CURATED_CHIPS: &[&str] = &["delhi", "mumbai", "kolkata", "varanasi", "temple", "palace"];

/// Horizontal distance one chip-strip arrow press scrolls
const CHIP_SCROLL_STEP: f32 = 240.0;

const DEFAULT_WINDOW: Size = Size::new(1280.0, 860.0);

/// A native masonry viewer for JSON photo catalogs
#[derive(Debug, Parser)]
#[command(name = "photowall", version, about)]
struct Args {
    /// Catalog to open: a filesystem path or an http(s) URL
    catalog: Option<String>,

    /// Initial view state as a query string, e.g. "tags=delhi&p=2"
    #[arg(long)]
    state: Option<String>,
}

/// Main application state
struct Photowall {
    /// Where the catalog (and relative image references) come from
    source: Option<CatalogSource>,
    /// Normalized records in catalog order
    records: Vec<Record>,
    /// The chip strip, curated tags first
    chips: Vec<String>,
    /// The shareable view: selection, query, page count, open record
    view: ViewState,
    /// Session history of serialized view states
    history: History,
    /// Masonry columns of revealed card indices
    grid: Masonry,
    /// Page counter and visible-card list
    pages: Paginator,
    /// Per-card thumbnail fetch state
    thumbs: HashMap<usize, ThumbState>,
    /// Record index shown in the detail modal
    open_index: Option<usize>,
    /// Full-size image fetch state for the modal
    modal_image: Option<ThumbState>,
    /// Deep-linked record id to open once the catalog has loaded
    pending_open: Option<String>,
    window_width: f32,
    chip_offset: f32,
    /// Status message to display to the user
    status: String,
    loading: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Startup (or re-open) catalog fetch finished
    CatalogLoaded(Result<Vec<Record>, LoadError>),
    /// User clicked "Open Catalog"
    OpenCatalogDialog,
    /// User clicked a tag chip
    TagToggled(String),
    /// User edited the search box
    QueryChanged(String),
    /// The grid scrollable moved
    GridScrolled(scrollable::Viewport),
    /// The window was resized
    WindowResized(Size),
    /// User clicked a card
    CardPressed(usize),
    /// User dismissed the detail modal
    CloseDetail,
    EscapePressed,
    NavigateBack,
    NavigateForward,
    ChipsPrev,
    ChipsNext,
    /// User copied the share link
    CopyShareLink,
    /// A card's thumbnail fetch finished
    ThumbLoaded(usize, Result<FetchedImage, String>),
    /// The modal's full-size fetch finished
    ModalImageLoaded(usize, Result<FetchedImage, String>),
}

impl Photowall {
    /// Create the application, optionally kicking off the catalog fetch.
    fn new(args: Args) -> (Self, Task<Message>) {
        let view = args
            .state
            .as_deref()
            .map(ViewState::from_query_string)
            .unwrap_or_default();
        let pending_open = view.open_id.clone();
        let history = History::new(view.to_query_string());

        let mut app = Photowall {
            source: None,
            records: Vec::new(),
            chips: Vec::new(),
            view,
            history,
            grid: Masonry::new(column_count_for_width(DEFAULT_WINDOW.width)),
            pages: Paginator::default(),
            thumbs: HashMap::new(),
            open_index: None,
            modal_image: None,
            pending_open,
            window_width: DEFAULT_WINDOW.width,
            chip_offset: 0.0,
            status: String::from("No catalog loaded."),
            loading: false,
        };

        let task = match args.catalog {
            Some(input) => {
                let source = CatalogSource::parse(&input);
                app.begin_load(source)
            }
            None => Task::none(),
        };

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(Ok(records)) => {
                self.loading = false;
                self.records = records;
                self.thumbs.clear();

                let index = TagIndex::build(&self.records);
                self.chips = index.top_tags(CHIP_LIMIT, CURATED_CHIPS);
                tracing::info!(
                    records = self.records.len(),
                    chips = self.chips.len(),
                    "gallery ready"
                );

                // Restore the deep-linked view: reveal as many pages as the
                // state asks for, then reopen the detail record if it still
                // exists (stale ids are silently ignored)
                let mut tasks = vec![self.rebuild_pages(self.view.page)];
                if let Some(id) = self.pending_open.take() {
                    if let Some(record) = self.record_index_for_id(&id) {
                        tasks.push(self.open_modal_for(record));
                    }
                }
                self.history.replace(self.view.to_query_string());
                Task::batch(tasks)
            }
            Message::CatalogLoaded(Err(error)) => {
                // Fatal: without a catalog there is nothing to render, and
                // the load is not retried
                self.loading = false;
                self.status = format!("Failed to load catalog: {error}");
                tracing::error!(%error, "catalog load failed");
                Task::none()
            }
            Message::OpenCatalogDialog => {
                // Show the native file picker dialog
                let file = rfd::FileDialog::new()
                    .set_title("Open Catalog")
                    .add_filter("JSON catalog", &["json"])
                    .pick_file();

                match file {
                    Some(path) => {
                        self.view = ViewState::default();
                        self.history = History::new(String::new());
                        self.open_index = None;
                        self.modal_image = None;
                        self.records.clear();
                        self.chips.clear();
                        self.thumbs.clear();
                        self.pages
                            .reset(&mut self.grid, column_count_for_width(self.window_width));
                        self.begin_load(CatalogSource::File(path))
                    }
                    None => Task::none(),
                }
            }
            Message::TagToggled(tag) => {
                if !self.view.selected_tags.remove(&tag) {
                    self.view.selected_tags.insert(tag);
                }
                let task = self.reset_grid();
                self.history.replace(self.view.to_query_string());
                task
            }
            Message::QueryChanged(query) => {
                self.view.query = query;
                let task = self.reset_grid();
                self.history.replace(self.view.to_query_string());
                task
            }
            Message::GridScrolled(viewport) => {
                let offset = viewport.absolute_offset().y;
                let visible_height = viewport.bounds().height;
                let content_height = viewport.content_bounds().height;
                let remaining = content_height - (offset + visible_height);

                if remaining < SENTINEL_MARGIN {
                    let filtered =
                        filter_records(&self.records, &self.view.selected_tags, &self.view.query);
                    if self.pages.has_more(filtered.len()) {
                        let (_, task) = self.reveal_next_page();
                        self.view.page = self.pages.page();
                        self.history.replace(self.view.to_query_string());
                        return task;
                    }
                }
                Task::none()
            }
            Message::WindowResized(size) => {
                self.window_width = size.width;
                let columns = column_count_for_width(size.width);
                // Only a breakpoint change rebuilds the columns; plain
                // resizes leave every card where it is
                if columns != self.grid.column_count() {
                    self.grid.rebuild(columns);
                }
                Task::none()
            }
            Message::CardPressed(record) => {
                let task = self.open_modal_for(record);
                self.history.push(self.view.to_query_string());
                task
            }
            Message::CloseDetail | Message::EscapePressed => {
                if self.open_index.is_none() {
                    return Task::none();
                }
                self.close_modal();
                self.history.push(self.view.to_query_string());
                Task::none()
            }
            Message::NavigateBack => match self.history.back() {
                Some(entry) => self.apply_history_state(&entry),
                None => Task::none(),
            },
            Message::NavigateForward => match self.history.forward() {
                Some(entry) => self.apply_history_state(&entry),
                None => Task::none(),
            },
            Message::ChipsPrev => {
                self.chip_offset = (self.chip_offset - CHIP_SCROLL_STEP).max(0.0);
                scrollable::scroll_to(
                    ui::chips::chips_id(),
                    scrollable::AbsoluteOffset {
                        x: self.chip_offset,
                        y: 0.0,
                    },
                )
            }
            Message::ChipsNext => {
                self.chip_offset += CHIP_SCROLL_STEP;
                scrollable::scroll_to(
                    ui::chips::chips_id(),
                    scrollable::AbsoluteOffset {
                        x: self.chip_offset,
                        y: 0.0,
                    },
                )
            }
            Message::CopyShareLink => {
                let link = self.view.to_query_string();
                self.status = String::from("Share link copied to clipboard.");
                iced::clipboard::write(if link.is_empty() {
                    String::from("?")
                } else {
                    format!("?{link}")
                })
            }
            Message::ThumbLoaded(card, result) => {
                match result {
                    Ok(fetched) => {
                        // The real aspect ratio refines the card's extent so
                        // later appends balance against true column heights
                        if let Some((width, height)) = fetched.dimensions {
                            self.grid.set_extent(card, grid::card_extent(width, height));
                        }
                        self.thumbs.insert(card, ThumbState::Ready(fetched));
                    }
                    Err(detail) => {
                        tracing::warn!(card, %detail, "thumbnail fetch failed");
                        self.thumbs.insert(card, ThumbState::Failed);
                    }
                }
                Task::none()
            }
            Message::ModalImageLoaded(record, result) => {
                if self.open_index == Some(record) {
                    self.modal_image = Some(match result {
                        Ok(fetched) => ThumbState::Ready(fetched),
                        Err(detail) => {
                            tracing::warn!(record, %detail, "full image fetch failed");
                            ThumbState::Failed
                        }
                    });
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let base: Element<Message> = column![
            self.header(),
            ui::chips::view(&self.chips, &self.view.selected_tags),
            self.grid_view(),
            text(&self.status).size(14),
        ]
        .spacing(12)
        .padding(16)
        .into();

        match self.open_index {
            Some(record) => {
                let modal = ui::modal::view(
                    &self.records[record],
                    self.modal_image.as_ref(),
                    self.thumbs.get(&record),
                );
                stack![
                    base,
                    opaque(mouse_area(center(opaque(modal))).on_press(Message::CloseDetail))
                ]
                .into()
            }
            None => base,
        }
    }

    fn header(&self) -> Element<Message> {
        let share = self.view.to_query_string();
        let share_label = if share.is_empty() {
            String::from("?")
        } else {
            format!("?{share}")
        };

        row![
            button("Open Catalog")
                .on_press_maybe((!self.loading).then_some(Message::OpenCatalogDialog))
                .padding(8),
            button(text("←").size(16))
                .style(button::secondary)
                .on_press_maybe(self.history.can_go_back().then_some(Message::NavigateBack)),
            button(text("→").size(16))
                .style(button::secondary)
                .on_press_maybe(
                    self.history
                        .can_go_forward()
                        .then_some(Message::NavigateForward)
                ),
            container(text(share_label).size(13))
                .padding([6.0, 10.0])
                .width(Length::Fill)
                .style(container::rounded_box),
            button("Copy Link")
                .style(button::secondary)
                .on_press(Message::CopyShareLink),
            text_input("Search title or tags…", &self.view.query)
                .on_input(Message::QueryChanged)
                .padding(8)
                .width(Length::Fixed(260.0)),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }

    fn grid_view(&self) -> Element<Message> {
        let mut columns = row![].spacing(14);
        for cards in self.grid.columns() {
            let mut column_widget = column![].spacing(14).width(Length::FillPortion(1));
            for &card in cards {
                column_widget = column_widget.push(ui::card::view(
                    card,
                    &self.records[card],
                    self.thumbs.get(&card),
                ));
            }
            columns = columns.push(column_widget);
        }

        let filtered_len =
            filter_records(&self.records, &self.view.selected_tags, &self.view.query).len();
        let footer: Element<Message> = if self.pages.has_more(filtered_len) {
            text("Loading more…").size(13).into()
        } else {
            Space::with_height(Length::Fixed(4.0)).into()
        };

        scrollable(
            column![columns, footer]
                .spacing(20)
                .width(Length::Fill)
                .align_x(Alignment::Center),
        )
        .on_scroll(Message::GridScrolled)
        .height(Length::Fill)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
            keyboard::on_key_press(|key, modifiers| match key {
                keyboard::Key::Named(keyboard::key::Named::Escape) => {
                    Some(Message::EscapePressed)
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowLeft) if modifiers.alt() => {
                    Some(Message::NavigateBack)
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowRight) if modifiers.alt() => {
                    Some(Message::NavigateForward)
                }
                _ => None,
            }),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn begin_load(&mut self, source: CatalogSource) -> Task<Message> {
        self.loading = true;
        self.status = format!("Loading {source}…");
        self.source = Some(source.clone());
        Task::perform(loader::load_catalog(source), Message::CatalogLoaded)
    }

    /// Reveal the next page of the filtered set and start thumbnail
    /// fetches for what it brought in. Returns the number of newly
    /// revealed cards alongside the fetch task.
    fn reveal_next_page(&mut self) -> (usize, Task<Message>) {
        let filtered = filter_records(&self.records, &self.view.selected_tags, &self.view.query);

        let known = &self.thumbs;
        let revealed = self
            .pages
            .render_next_page(&filtered, &mut self.grid, |card| match known.get(&card) {
                Some(ThumbState::Ready(fetched)) => match fetched.dimensions {
                    Some((width, height)) => grid::card_extent(width, height),
                    None => grid::PLACEHOLDER_EXTENT + grid::CAPTION_EXTENT,
                },
                _ => grid::PLACEHOLDER_EXTENT + grid::CAPTION_EXTENT,
            });

        let Some(source) = self.source.clone() else {
            return (revealed.len(), Task::none());
        };

        let mut tasks = Vec::new();
        for &card in &revealed {
            if self.thumbs.contains_key(&card) {
                continue;
            }
            let reference = self.records[card]
                .thumb
                .clone()
                .or_else(|| self.records[card].image.clone());
            match reference {
                Some(reference) => {
                    let target = source.resolve(&reference);
                    self.thumbs.insert(card, ThumbState::Loading);
                    tasks.push(Task::perform(thumbs::fetch_image(target), move |result| {
                        Message::ThumbLoaded(card, result)
                    }));
                }
                None => {
                    // Nothing to fetch; the card renders as a placeholder
                    self.thumbs.insert(card, ThumbState::Failed);
                }
            }
        }

        (revealed.len(), Task::batch(tasks))
    }

    /// Throw away the rendered grid and start over from page zero with
    /// the current filter criteria. Invoked on every criteria change.
    fn reset_grid(&mut self) -> Task<Message> {
        self.pages
            .reset(&mut self.grid, column_count_for_width(self.window_width));
        let (_, task) = self.reveal_next_page();
        self.view.page = self.pages.page();
        self.refresh_status();
        task
    }

    /// Start over and reveal up to `target` pages (at least one). Used
    /// when restoring a deep link or a history entry.
    fn rebuild_pages(&mut self, target: usize) -> Task<Message> {
        self.pages
            .reset(&mut self.grid, column_count_for_width(self.window_width));

        let target = target.max(1);
        let mut tasks = Vec::new();
        while self.pages.page() < target {
            let (revealed, task) = self.reveal_next_page();
            tasks.push(task);
            if revealed == 0 {
                break;
            }
        }

        self.view.page = self.pages.page();
        self.refresh_status();
        Task::batch(tasks)
    }

    /// Restore a history entry: re-render the grid for its criteria and
    /// reconcile the modal. This is the one place navigation feeds back
    /// into UI state instead of the other way around.
    fn apply_history_state(&mut self, entry: &str) -> Task<Message> {
        let restored = ViewState::from_query_string(entry);
        let reopen = restored.open_id.clone();
        let target = restored.page;
        self.view = restored;

        let mut tasks = vec![self.rebuild_pages(target)];

        match reopen {
            None => {
                if self.open_index.is_some() {
                    self.close_modal();
                }
            }
            Some(id) => {
                let already_open = self
                    .open_index
                    .and_then(|record| self.records[record].id.clone())
                    .is_some_and(|open| open == id);
                if !already_open {
                    match self.record_index_for_id(&id) {
                        Some(record) => tasks.push(self.open_modal_for(record)),
                        // The id no longer matches anything; leave the
                        // modal closed
                        None => self.close_modal(),
                    }
                }
            }
        }

        Task::batch(tasks)
    }

    /// Open the detail modal for a record and start its full-size fetch.
    fn open_modal_for(&mut self, record: usize) -> Task<Message> {
        self.open_index = Some(record);
        self.view.open_id = self.records[record].id.clone();
        self.modal_image = Some(ThumbState::Loading);

        let reference = self.records[record]
            .image
            .clone()
            .or_else(|| self.records[record].thumb.clone());
        let Some(source) = self.source.clone() else {
            self.modal_image = Some(ThumbState::Failed);
            return Task::none();
        };
        match reference {
            Some(reference) => {
                let target = source.resolve(&reference);
                Task::perform(thumbs::fetch_image(target), move |result| {
                    Message::ModalImageLoaded(record, result)
                })
            }
            None => {
                self.modal_image = Some(ThumbState::Failed);
                Task::none()
            }
        }
    }

    fn close_modal(&mut self) {
        self.open_index = None;
        self.modal_image = None;
        self.view.open_id = None;
    }

    fn record_index_for_id(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id.as_deref() == Some(id))
    }

    fn refresh_status(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let filtered =
            filter_records(&self.records, &self.view.selected_tags, &self.view.query).len();
        self.status = if filtered == self.records.len() {
            format!("Ready. {} photographs.", self.records.len())
        } else {
            format!("{} of {} photographs match.", filtered, self.records.len())
        };
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("photowall=info")),
        )
        .init();

    let args = Args::parse();

    iced::application("Photowall", Photowall::update, Photowall::view)
        .subscription(Photowall::subscription)
        .theme(Photowall::theme)
        .window_size(DEFAULT_WINDOW)
        .centered()
        .run_with(move || Photowall::new(args))
}
