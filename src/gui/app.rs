//! Main GUI application

use crate::downloader::{DownloadProgress, DownloadReport, Downloader};
use crate::extractor::{Extractor, RecuMeExtractor, VideoRecord};
use crate::gui::clipboard;
use crate::gui::components::progress_bar;
use crate::gui::theme;
use crate::session::Session;
use crate::utils::config::AppSettings;
use crate::utils::persistence::{default_output_path, save_record, to_pretty_json};
use chrono::Local;
use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{Alignment, Application, Color, Command, Element, Length, Subscription, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Main application state
pub struct ScraperApp {
    // Core components
    session: Option<Session>,
    downloader: Option<Downloader>,

    // UI State
    url_input: String,
    status: Status,
    results_text: String,
    progress: f32, // 0.0 to 100.0
    progress_caption: String,

    current_record: Option<VideoRecord>,
    downloaded_file: Option<PathBuf>,
    progress_rx: Option<mpsc::UnboundedReceiver<DownloadProgress>>,

    // Flags
    is_scraping: bool,
    is_downloading: bool,
}

/// Whether the status line reports progress or a failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Info,
    Error,
}

/// Status line shown under the results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn color(&self) -> Color {
        match self.kind {
            StatusKind::Info => theme::SUCCESS,
            StatusKind::Error => theme::DANGER,
        }
    }
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlInputChanged(String),
    PasteFromClipboard,

    // Scrape events
    ScrapeButtonPressed,
    ScrapeCompleted(Result<VideoRecord, String>),
    RecordSaved(PathBuf, bool),

    // Download events
    DownloadButtonPressed,
    DownloadCompleted(DownloadReport),
    OpenFile,

    // System
    Tick, // Drains queued progress while a download runs
}

impl ScraperApp {
    fn can_download(&self) -> bool {
        !self.is_scraping
            && !self.is_downloading
            && self.downloader.is_some()
            && self
                .current_record
                .as_ref()
                .is_some_and(VideoRecord::has_video_url)
    }

    fn drain_progress(&mut self) {
        let Some(rx) = self.progress_rx.as_mut() else {
            return;
        };

        let mut latest = None;
        while let Ok(progress) = rx.try_recv() {
            latest = Some(progress);
        }

        if let Some(progress) = latest {
            if let Some(pct) = progress.percentage() {
                self.progress = pct as f32;
            }
            self.progress_caption = progress.to_string();
        }
    }
}

impl Application for ScraperApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = AppSettings;

    fn new(settings: Self::Flags) -> (Self, Command<Message>) {
        let mut status = Status::default();

        let session = match Session::new(&settings) {
            Ok(session) => Some(session),
            Err(e) => {
                error!("Failed to create HTTP session: {}", e);
                status = Status::error(format!("Error: {}", e));
                None
            }
        };

        let downloader = session.as_ref().and_then(|session| {
            match Downloader::new(Arc::new(session.clone()), &settings) {
                Ok(downloader) => Some(downloader),
                Err(e) => {
                    error!("Failed to prepare download directory: {}", e);
                    status = Status::error(format!("Error: {}", e));
                    None
                }
            }
        });

        let app = Self {
            session,
            downloader,
            url_input: String::new(),
            status,
            results_text: String::new(),
            progress: 0.0,
            progress_caption: String::new(),
            current_record: None,
            downloaded_file: None,
            progress_rx: None,
            is_scraping: false,
            is_downloading: false,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("Recu.me Scraper")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::get_clipboard_content() {
                    Ok(content) => self.url_input = content,
                    Err(e) => {
                        warn!("{}", e);
                        self.status = Status::error(e);
                    }
                }
                Command::none()
            }

            Message::ScrapeButtonPressed => {
                let url = self.url_input.trim().to_string();
                if url.is_empty() {
                    self.status = Status::error("Please enter a URL");
                    return Command::none();
                }
                let Some(session) = self.session.clone() else {
                    return Command::none();
                };
                if self.is_scraping || self.is_downloading {
                    return Command::none();
                }

                self.is_scraping = true;
                self.status = Status::info("Scraping in progress...");

                Command::perform(
                    async move {
                        RecuMeExtractor::new()
                            .extract_info(&session, &url)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::ScrapeCompleted,
                )
            }

            Message::ScrapeCompleted(result) => {
                self.is_scraping = false;
                self.downloaded_file = None;

                match result {
                    Ok(record) => {
                        self.results_text = to_pretty_json(&record).unwrap_or_default();
                        self.current_record = Some(record.clone());

                        Command::perform(
                            async move {
                                let path = default_output_path(Local::now());
                                let saved = save_record(&record, &path).await;
                                (path, saved)
                            },
                            |(path, saved)| Message::RecordSaved(path, saved),
                        )
                    }
                    Err(e) => {
                        self.current_record = None;
                        self.status = Status::error(format!("Error: {}", e));
                        Command::none()
                    }
                }
            }

            Message::RecordSaved(path, saved) => {
                self.status = if saved {
                    Status::info(format!("Data saved to {}", path.display()))
                } else {
                    Status::error("Error saving data")
                };
                Command::none()
            }

            Message::DownloadButtonPressed => {
                if !self.can_download() {
                    return Command::none();
                }
                let (Some(downloader), Some(record)) =
                    (self.downloader.clone(), self.current_record.clone())
                else {
                    return Command::none();
                };

                self.is_downloading = true;
                self.downloaded_file = None;
                self.progress = 0.0;
                self.progress_caption = "Starting download...".to_string();

                let (tx, rx) = mpsc::unbounded_channel();
                self.progress_rx = Some(rx);

                Command::perform(
                    async move {
                        let result = downloader
                            .download(&record, move |progress| {
                                let _ = tx.send(progress);
                            })
                            .await;
                        DownloadReport::from(result)
                    },
                    Message::DownloadCompleted,
                )
            }

            Message::DownloadCompleted(report) => {
                self.drain_progress();
                self.progress_rx = None;
                self.is_downloading = false;

                match report {
                    DownloadReport::Success {
                        filepath, filename, ..
                    } => {
                        info!("Download complete: {}", filename);
                        self.status = Status::info(format!("Download complete: {}", filename));
                        self.progress_caption = "Download complete!".to_string();
                        self.downloaded_file = Some(filepath);
                    }
                    DownloadReport::Failed { error } => {
                        self.status = Status::error(format!("Download error: {}", error));
                    }
                }
                Command::none()
            }

            Message::OpenFile => {
                if let Some(path) = &self.downloaded_file {
                    if let Err(e) = open::that(path) {
                        self.status = Status::error(format!("Could not open file: {}", e));
                    }
                }
                Command::none()
            }

            Message::Tick => {
                self.drain_progress();
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let url_row = row![
            text_input("Enter URL to scrape", &self.url_input)
                .on_input(Message::UrlInputChanged)
                .on_submit(Message::ScrapeButtonPressed)
                .padding(10)
                .width(Length::Fill),
            button(text("Paste").size(14))
                .on_press(Message::PasteFromClipboard)
                .padding([8, 12]),
        ]
        .spacing(10)
        .align_items(Alignment::Center);

        let mut scrape_button = button(text("Scrape Data")).padding([8, 16]);
        if !self.is_scraping && !self.is_downloading {
            scrape_button = scrape_button.on_press(Message::ScrapeButtonPressed);
        }

        let mut download_button = button(text("Download Video")).padding([8, 16]);
        if self.can_download() {
            download_button = download_button.on_press(Message::DownloadButtonPressed);
        }

        let mut buttons = row![scrape_button, download_button].spacing(10);
        if self.downloaded_file.is_some() {
            buttons = buttons.push(
                button(text("Open File"))
                    .on_press(Message::OpenFile)
                    .padding([8, 16]),
            );
        }

        let content = column![
            text("Enter URL to scrape:").size(16),
            url_row,
            buttons,
            progress_bar(self.progress, &self.progress_caption),
            scrollable(text(&self.results_text).size(13)).height(Length::Fill),
            text(&self.status.message).size(14).style(self.status.color()),
        ]
        .spacing(12)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.is_downloading {
            iced::time::every(Duration::from_millis(100)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn theme(&self) -> Self::Theme {
        Theme::Dark
    }
}

/// Launch the GUI window
pub fn run(settings: AppSettings) -> iced::Result {
    ScraperApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(800.0, 600.0),
            min_size: Some(iced::Size::new(600.0, 400.0)),
            ..Default::default()
        },
        ..iced::Settings::with_flags(settings)
    })
}
