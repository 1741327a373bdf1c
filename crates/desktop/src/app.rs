use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use facespot_core::detection::domain::endpoint::DetectionEndpoint;
use facespot_core::overlay::domain::overlay_path::EyeConnector;
use facespot_core::shared::geometry::Offset;
use facespot_core::shared::image_descriptor::load_manifest;
use facespot_core::viewer::gallery::{render_gallery, Gallery};
use facespot_core::viewer::overlay_controller::{
    select_image, ImageLayout, OverlayController, PendingDetection,
};
use facespot_core::viewer::view_state::{Activation, ViewState};

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;
use crate::widgets::thumbnail_card::CardImage;
use crate::workers::detection_worker::{self, DetectionReply};
use crate::workers::image_worker::{self, ImageJob, ImageMessage};

const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Gallery,
    Settings,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Gallery, Tab::Settings, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Gallery => "Gallery",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    OpenManifest,
    ManifestPicked(Option<PathBuf>),
    ThumbnailPressed(usize),
    ThumbnailHover(usize, bool),
    DetectPressed,
    PollWorkers,
    OriginChanged(String),
    EyeConnectorToggled(bool),
    AppearanceChanged(Appearance),
    RestoreDefaults,
    PollSystemTheme,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// The overlay canvas shares a stack with the image, so both start at the
/// stack's top-left corner.
struct StackLayout;

impl ImageLayout for StackLayout {
    fn image_offset(&self) -> Offset {
        Offset::default()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub gallery: Gallery,
    pub view_state: ViewState,
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
    /// Manifest load failures, shown above the gallery.
    pub status: Option<String>,
    pub in_flight: usize,
    controller: OverlayController,
    cards: HashMap<usize, CardImage>,
    /// Bumped per manifest so downloads for a replaced gallery are ignored.
    batch: u64,
    pending_images: usize,
    image_jobs: Sender<ImageJob>,
    image_rx: Receiver<ImageMessage>,
    detection_requests: Sender<PendingDetection>,
    detection_rx: Receiver<DetectionReply>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();

        // HTTP clients live on the worker threads, away from the async runtime.
        let (image_jobs, job_rx) = crossbeam_channel::unbounded();
        let (image_tx, image_rx) = crossbeam_channel::unbounded();
        image_worker::spawn(job_rx, image_tx);
        let (detection_requests, request_rx) = crossbeam_channel::unbounded();
        let (detection_tx, detection_rx) = crossbeam_channel::unbounded();
        detection_worker::spawn(request_rx, detection_tx);

        let startup = match settings.last_manifest.clone() {
            Some(path) => Task::done(Message::ManifestPicked(Some(path))),
            None => Task::none(),
        };

        (
            Self {
                active_tab: Tab::Gallery,
                controller: controller_for(&settings),
                settings,
                gallery: Gallery::new(),
                view_state: ViewState::new(),
                selected: None,
                hovered: None,
                status: None,
                in_flight: 0,
                cards: HashMap::new(),
                batch: 0,
                pending_images: 0,
                image_jobs,
                image_rx,
                detection_requests,
                detection_rx,
            },
            startup,
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::OpenManifest => {
                let start_dir = self
                    .settings
                    .last_manifest
                    .as_ref()
                    .and_then(|p| p.parent().map(|d| d.to_path_buf()));
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Open gallery manifest")
                            .add_filter("Gallery manifest", &["json"]);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        dialog.pick_file().await.map(|h| h.path().to_path_buf())
                    },
                    Message::ManifestPicked,
                );
            }
            Message::ManifestPicked(Some(path)) => self.open_manifest(path),
            Message::ManifestPicked(None) => {}
            Message::ThumbnailPressed(index) => {
                let mut activation = Activation::new();
                if let Some(picked) = self.gallery.activate(index, &mut activation).cloned() {
                    select_image(&mut self.view_state, &picked, &mut activation);
                    self.selected = Some(index);
                }
            }
            Message::ThumbnailHover(index, true) => {
                self.hovered = Some(index);
            }
            Message::ThumbnailHover(index, false) => {
                if self.hovered == Some(index) {
                    self.hovered = None;
                }
            }
            Message::DetectPressed => {
                let mut activation = Activation::new();
                if let Some(pending) = self.controller.begin_detection(
                    &mut self.view_state,
                    &StackLayout,
                    &mut activation,
                ) {
                    if self.detection_requests.send(pending).is_ok() {
                        self.in_flight += 1;
                    } else {
                        self.view_state.error_message =
                            Some("detection worker stopped".to_string());
                    }
                }
            }
            Message::PollWorkers => self.drain_workers(),
            Message::OriginChanged(origin) => {
                self.settings.origin = origin;
                self.controller = controller_for(&self.settings);
                self.settings.save();
            }
            Message::EyeConnectorToggled(joined) => {
                self.settings.eye_connector = if joined {
                    EyeConnector::Preserve
                } else {
                    EyeConnector::Suppress
                };
                self.controller = controller_for(&self.settings);
                self.settings.save();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::RestoreDefaults => {
                let defaults = Settings::default();
                self.settings.origin = defaults.origin;
                self.settings.eye_connector = defaults.eye_connector;
                self.settings.appearance = defaults.appearance;
                self.controller = controller_for(&self.settings);
                self.settings.save();
            }
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let btn = button(text(tab.label()).size(13))
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let theme = self.theme();
        let content: Element<'_, Message> = match self.active_tab {
            Tab::Gallery => tabs::gallery_tab::view(self, &theme),
            Tab::Settings => tabs::settings_tab::view(&self.settings),
            Tab::About => tabs::about_tab::view(),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();
        if self.settings.appearance == Appearance::System {
            subscriptions
                .push(iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme));
        }
        if self.in_flight > 0 || self.pending_images > 0 {
            subscriptions.push(iced::time::every(WORKER_POLL_INTERVAL).map(|_| Message::PollWorkers));
        }
        Subscription::batch(subscriptions)
    }

    /// What the card for gallery entry `index` currently shows.
    pub fn card_image(&self, index: usize) -> CardImage {
        self.cards.get(&index).cloned().unwrap_or(CardImage::Loading)
    }

    /// Replaces the gallery with the manifest at `path` and starts
    /// downloading its images.
    fn open_manifest(&mut self, path: PathBuf) {
        let images = match load_manifest(&path) {
            Ok(images) => images,
            Err(e) => {
                log::warn!("{e}");
                self.status = Some(e.to_string());
                return;
            }
        };
        log::info!("Loaded {} image(s) from {}", images.len(), path.display());

        self.status = None;
        self.batch += 1;
        self.cards.clear();
        self.selected = None;
        self.hovered = None;
        self.gallery.clear();
        render_gallery(Some(images.as_slice()), &mut self.gallery);

        self.settings.last_manifest = Some(path);
        self.settings.save();

        let endpoint = self.controller.endpoint();
        let jobs: Vec<ImageJob> = self
            .gallery
            .thumbnails()
            .iter()
            .map(|thumb| ImageJob {
                batch: self.batch,
                index: thumb.index(),
                url: endpoint.absolute_image_url(thumb.image()),
            })
            .collect();
        self.pending_images = 0;
        for job in jobs {
            if self.image_jobs.send(job).is_err() {
                self.status = Some("Images cannot be downloaded".to_string());
                return;
            }
            self.pending_images += 1;
        }
    }

    fn drain_workers(&mut self) {
        while let Ok(message) = self.image_rx.try_recv() {
            let (batch, index, card) = card_from(message);
            if batch == self.batch {
                self.cards.insert(index, card);
                self.pending_images = self.pending_images.saturating_sub(1);
            }
        }

        while let Ok(reply) = self.detection_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            let applied =
                self.controller
                    .finish_detection(&mut self.view_state, &reply.pending, reply.result);
            log::debug!("Detection for {} applied: {applied:?}", reply.pending.image.url);
        }
    }
}

/// Gallery batch, entry index and card contents for one download result.
fn card_from(message: ImageMessage) -> (u64, usize, CardImage) {
    match message {
        ImageMessage::Loaded { batch, index, bytes } => {
            (batch, index, CardImage::Ready(image::Handle::from_bytes(bytes)))
        }
        ImageMessage::Failed { batch, index, error } => (batch, index, CardImage::Failed(error)),
    }
}

fn controller_for(settings: &Settings) -> OverlayController {
    OverlayController::new(
        DetectionEndpoint::new(settings.origin.clone()),
        settings.eye_connector,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_download_keeps_its_error_on_the_card() {
        let (batch, index, card) = card_from(ImageMessage::Failed {
            batch: 2,
            index: 5,
            error: "image type not supported".into(),
        });

        assert_eq!((batch, index), (2, 5));
        assert!(matches!(card, CardImage::Failed(e) if e == "image type not supported"));
    }

    #[test]
    fn test_loaded_download_becomes_ready_card() {
        let (batch, index, card) = card_from(ImageMessage::Loaded {
            batch: 1,
            index: 0,
            bytes: vec![1, 2, 3],
        });

        assert_eq!((batch, index), (1, 0));
        assert!(matches!(card, CardImage::Ready(_)));
    }
}
