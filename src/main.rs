use iced::widget::scrollable::{RelativeOffset, Viewport};
use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{
    keyboard, window, Alignment, Element, Length, Pixels, Size, Subscription, Task, Theme,
};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::{CatalogKind, Settings};
use media::loader::{self, Decoded, LIGHTBOX_MAX_SIZE};
use state::context::{GalleryContext, HEADER_HEIGHT, TILE_SPACING};
use state::data::{ImageEntry, TileId};
use state::gallery::{Gallery, LoadRequest, ViewMore};
use state::lightbox::Lightbox;
use state::viewport::ViewportState;

/// Horizontal padding around the tile grid
const GRID_PADDING: f32 = 24.0;

/// Frame interval while tiles are animating
const FRAME: Duration = Duration::from_millis(16);

/// Main application state
struct PhotoGallery {
    settings: Settings,
    /// Paths, catalog source and pagination policy
    ctx: GalleryContext,
    /// Full catalog as of the last render
    catalog: Vec<ImageEntry>,
    gallery: Gallery,
    lightbox: Lightbox,
    /// Last known visible region of the grid
    viewport: ViewportState,
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User pressed "View more"
    ViewMore,
    /// The loading indicator delay after the given batch elapsed
    BatchSettled(u64),
    /// A tile source finished decoding (or failed to)
    TileLoaded {
        id: TileId,
        attempt: usize,
        result: Result<Decoded, String>,
    },
    TileClicked(TileId),
    /// Full-size lightbox image finished decoding
    FullSizeLoaded {
        tile: TileId,
        result: Result<Decoded, String>,
    },
    CloseLightbox,
    Scrolled(Viewport),
    WindowResized(Size),
    /// Animation frame
    Tick(Instant),
    /// User clicked "Open Folder"
    OpenFolder,
}

impl PhotoGallery {
    /// Create a new instance of the application and render the first page
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let ctx = GalleryContext::from_settings(&settings);
        let viewport = ViewportState {
            offset_y: 0.0,
            width: settings.window_width - 2.0 * GRID_PADDING,
            height: settings.window_height,
        };

        let mut app = PhotoGallery {
            settings,
            ctx,
            catalog: Vec::new(),
            gallery: Gallery::new(),
            lightbox: Lightbox::default(),
            viewport,
            status: String::new(),
        };

        let task = app.reload();
        (app, task)
    }

    /// Re-list the catalog and render its first page from scratch
    fn reload(&mut self) -> Task<Message> {
        self.catalog = self.ctx.catalog();
        let initial = self.ctx.initial_entries(&self.catalog);
        self.gallery.render_initial(&self.ctx, initial);
        self.gallery.settle_batch(&self.catalog);

        if !self.ctx.has_asset_root() {
            // Nothing could load from a missing directory, keep the page static
            self.gallery.hide_view_more();
        }

        self.lightbox.close();
        self.update_status();
        info!(
            images = self.catalog.len(),
            shown = self.gallery.displayed().len(),
            "Gallery loaded"
        );

        self.refresh_visible()
    }

    fn update_status(&mut self) {
        self.status = format!(
            "{} of {} images in {}",
            self.gallery.displayed().len(),
            self.catalog.len(),
            self.ctx.asset_root.display()
        );
    }

    /// Reveal tiles in the viewport and start loading their images
    fn refresh_visible(&mut self) -> Task<Message> {
        let range = self
            .ctx
            .grid
            .visible_range(&self.viewport, self.gallery.tiles().len());
        let requests = self.gallery.mark_visible(range, Instant::now());
        if requests.is_empty() {
            return Task::none();
        }

        debug!(count = requests.len(), "Loading visible tiles");
        let size = self.ctx.thumbnail_size;
        Task::batch(requests.into_iter().map(|request| load_tile(request, size)))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ViewMore => {
                if self.gallery.view_more() != ViewMore::Visible {
                    return Task::none();
                }

                let appended = self.gallery.render_more(
                    &self.ctx,
                    &self.catalog,
                    self.ctx.batch_size,
                    Instant::now(),
                );
                if appended == 0 {
                    return Task::none();
                }

                self.update_status();
                let delay = self.ctx.loader_delay;
                let batch = self.gallery.batch();
                Task::batch([
                    self.refresh_visible(),
                    Task::perform(tokio::time::sleep(delay), move |_| {
                        Message::BatchSettled(batch)
                    }),
                ])
            }
            Message::BatchSettled(batch) => {
                if !self.gallery.finish_batch(batch, &self.catalog) {
                    debug!(batch, "Ignoring settle for a replaced batch");
                }
                Task::none()
            }
            Message::TileLoaded { id, attempt, result } => match result {
                Ok(decoded) => {
                    if !self.gallery.apply_loaded(id, attempt, decoded) {
                        return Task::none();
                    }
                    // An open lightbox may be waiting on this tile
                    match self.gallery.tile(id).and_then(|tile| self.lightbox.follow_tile(tile)) {
                        Some(source) => load_full_size(id, source),
                        None => Task::none(),
                    }
                }
                Err(e) => match self.gallery.apply_failed(id, attempt, &e) {
                    Some(next) => load_tile(next, self.ctx.thumbnail_size),
                    None => Task::none(),
                },
            },
            Message::TileClicked(id) => {
                let Some(tile) = self.gallery.tile(id) else {
                    return Task::none();
                };
                match self.lightbox.open(tile) {
                    Some(source) => load_full_size(id, source),
                    None => Task::none(),
                }
            }
            Message::FullSizeLoaded { tile, result } => {
                match result {
                    Ok(decoded) => {
                        let source = decoded.source.clone();
                        if !self.lightbox.apply_full_size(tile, &source, decoded.into_handle()) {
                            debug!(path = %source.display(), "Dropping stale full-size image");
                        }
                    }
                    Err(e) => warn!(error = %e, "Full-size image failed, keeping thumbnail"),
                }
                Task::none()
            }
            Message::CloseLightbox => {
                self.lightbox.close();
                Task::none()
            }
            Message::Scrolled(viewport) => {
                let bounds = viewport.bounds();
                self.viewport = ViewportState {
                    offset_y: viewport.absolute_offset().y,
                    width: bounds.width - 2.0 * GRID_PADDING,
                    height: bounds.height,
                };
                self.refresh_visible()
            }
            Message::WindowResized(size) => {
                self.viewport.width = size.width - 2.0 * GRID_PADDING;
                self.viewport.height = size.height;
                self.refresh_visible()
            }
            Message::Tick(now) => {
                self.gallery.tick(now);
                Task::none()
            }
            Message::OpenFolder => {
                let Some(folder) = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder()
                else {
                    return Task::none();
                };

                info!(path = %folder.display(), "Opening folder");
                self.ctx.use_directory(&folder, &self.settings.fallbacks);
                self.settings.asset_root = folder;
                self.settings.catalog = CatalogKind::Directory;
                if let Err(e) = self.settings.save(&Settings::config_dir()) {
                    warn!(error = %e, "Failed to save settings");
                }

                self.viewport.offset_y = 0.0;
                Task::batch([
                    scrollable::snap_to(gallery_scroll_id(), RelativeOffset::START),
                    self.reload(),
                ])
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let now = Instant::now();

        let header = container(
            row![
                column![
                    text("Photo Gallery").size(32),
                    text(&self.status).size(14),
                ]
                .spacing(4),
                Space::with_width(Length::Fill),
                button("Open Folder")
                    .on_press(Message::OpenFolder)
                    .padding(10),
            ]
            .align_y(Alignment::Center),
        )
        .padding([0.0, GRID_PADDING])
        .center_y(Length::Fixed(HEADER_HEIGHT));

        let tile_size = self.ctx.grid.tile_size;
        let grid: Element<Message> = if self.gallery.displayed().is_empty() {
            text("No images to show").size(18).into()
        } else {
            Wrap::with_elements(
                self.gallery
                    .tiles()
                    .iter()
                    .map(|tile| ui::tile::view(tile, tile_size, now))
                    .collect(),
            )
            .spacing(Pixels(TILE_SPACING))
            .line_spacing(Pixels(TILE_SPACING))
            .into()
        };

        let footer: Element<Message> = match self.gallery.view_more() {
            ViewMore::Visible => button("View more")
                .on_press(Message::ViewMore)
                .padding(12)
                .into(),
            ViewMore::Loading => text("Loading…").size(16).into(),
            ViewMore::Hidden => Space::with_height(Length::Fixed(0.0)).into(),
        };

        let content: Column<Message> = column![
            header,
            container(grid).padding([0.0, GRID_PADDING]).width(Length::Fill),
            container(footer).padding(24).center_x(Length::Fill),
        ];

        let page = scrollable(content)
            .id(gallery_scroll_id())
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill);

        ui::lightbox::view(page.into(), &self.lightbox)
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![
            iced::event::listen_with(|event, _status, _window| match event {
                iced::Event::Window(window::Event::Resized(size)) => {
                    Some(Message::WindowResized(size))
                }
                _ => None,
            }),
        ];

        if self.lightbox.is_open() {
            subs.push(keyboard::on_key_press(|key, _modifiers| match key {
                keyboard::Key::Named(keyboard::key::Named::Escape) => {
                    Some(Message::CloseLightbox)
                }
                _ => None,
            }));
        }

        if self.gallery.is_animating() {
            subs.push(iced::time::every(FRAME).map(Message::Tick));
        }

        Subscription::batch(subs)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn gallery_scroll_id() -> scrollable::Id {
    scrollable::Id::new("gallery")
}

/// Decode one tile source in the background
fn load_tile(request: LoadRequest, max_size: u32) -> Task<Message> {
    let LoadRequest { id, attempt, path } = request;
    Task::perform(loader::load_image(path, max_size), move |result| {
        Message::TileLoaded { id, attempt, result }
    })
}

/// Decode the lightbox image for a tile at full size
fn load_full_size(tile: TileId, source: PathBuf) -> Task<Message> {
    Task::perform(loader::load_image(source, LIGHTBOX_MAX_SIZE), move |result| {
        Message::FullSizeLoaded { tile, result }
    })
}

/// Console logging, filtered by RUST_LOG when set
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,photo_gallery=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> iced::Result {
    init_logging();

    let config_dir: PathBuf = Settings::config_dir();
    let settings = Settings::load(&config_dir);
    info!(config = %config_dir.display(), "Photo gallery starting");

    let window_size = Size::new(settings.window_width, settings.window_height);

    iced::application("Photo Gallery", PhotoGallery::update, PhotoGallery::view)
        .theme(PhotoGallery::theme)
        .subscription(PhotoGallery::subscription)
        .window_size(window_size)
        .centered()
        .run_with(move || PhotoGallery::new(settings))
}
