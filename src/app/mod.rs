mod state;
pub mod theme;
mod toast;
mod ui;

use crate::api::ConverterClient;
use crate::error::{ApiError, SessionError};
use crate::i18n::Translator;
use crate::session::{
    apply_batch_format, batch_formats, BatchProgress, ConversionJob, ConversionQueue, EntryId,
    SessionState,
};
use crate::settings::{AppConfig, Preferences};
use crate::upload::{expand_paths, FileSource};
use crate::utils::file_size::format_size;
use anyhow::{Context, Result};
use eframe::{egui, App};
pub use state::{BackendEvent, UiState};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
pub use toast::{Toast, ToastLevel, ToastQueue, TOAST_TTL};

pub struct ConverterApp {
    config: AppConfig,
    preferences: Preferences,
    preferences_path: PathBuf,
    translator: Translator,
    languages: Vec<String>,
    client: ConverterClient,
    runtime: Runtime,
    session: SessionState,
    state: UiState,
    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,
}

impl ConverterApp {
    pub fn new(config: AppConfig, preferences_path: PathBuf) -> Result<Self> {
        let preferences = Preferences::load(&preferences_path);
        let client = ConverterClient::new(&config.server_url, config.request_timeout())
            .context("Invalid server url")?;
        let runtime = Runtime::new().context("Failed to start async runtime")?;
        let (events_tx, events_rx) = mpsc::channel();

        tracing::info!(
            "Initializing Universal Converter against {}",
            client.base_url()
        );
        Ok(Self {
            translator: Translator::new(&preferences.language),
            languages: Translator::builtin_languages()
                .into_iter()
                .map(String::from)
                .collect(),
            config,
            preferences,
            preferences_path,
            client,
            runtime,
            session: SessionState::new(),
            state: UiState::default(),
            events_tx,
            events_rx,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ui_state(&self) -> &UiState {
        &self.state
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn batch_progress(&self) -> BatchProgress {
        self.state.progress()
    }

    pub fn available_batch_formats(&self) -> Vec<&'static str> {
        batch_formats(&self.session)
    }

    /// Background checks run once at start-up.
    pub fn startup(&mut self) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(BackendEvent::FfmpegChecked(client.check_ffmpeg().await));
            let _ = tx.send(BackendEvent::LanguagesLoaded(client.languages().await));
        });
        self.fetch_locale();
    }

    fn fetch_locale(&self) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let language = self.translator.language().to_string();
        self.runtime.spawn(async move {
            let result = client.locale(&language).await;
            let _ = tx.send(BackendEvent::LocaleLoaded { language, result });
        });
    }

    pub fn add_sources(&mut self, sources: Vec<FileSource>) {
        for source in sources {
            let name = source.name();
            let size = source.size();

            match self.session.add_file(&name, size) {
                Ok(id) => {
                    if size > self.config.large_file_warning_bytes {
                        let size_text = format_size(size);
                        let message = self.translator.format(
                            "toasts.tooLarge",
                            &[("name", name.as_str()), ("size", size_text.as_str())],
                        );
                        self.state.toasts.warn(message);
                    }
                    self.spawn_upload(id, source);
                }
                Err(SessionError::DuplicateFile(name)) => {
                    let message = self
                        .translator
                        .format("toasts.duplicate", &[("name", name.as_str())]);
                    self.state.toasts.warn(message);
                }
                Err(e) => {
                    let message = format!("{}: {}", self.translator.get("toasts.error"), e);
                    self.state.toasts.error(message);
                }
            }
        }
    }

    /// Adds every line of pasted text that names an existing file or folder.
    /// Returns how many files were queued.
    pub fn paste_text(&mut self, text: &str) -> usize {
        let paths: Vec<PathBuf> = text
            .lines()
            .map(str::trim)
            .map(|line| line.strip_prefix("file://").unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .filter(|path| path.exists())
            .collect();
        let sources = expand_paths(&paths);
        if sources.is_empty() {
            return 0;
        }

        let count = sources.len();
        let count_text = count.to_string();
        let message = self
            .translator
            .format("toasts.pasting", &[("count", count_text.as_str())]);
        self.state.toasts.info(message);
        self.add_sources(sources);
        count
    }

    fn spawn_upload(&self, id: EntryId, source: FileSource) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = client.upload(&source).await;
            let _ = tx.send(BackendEvent::Uploaded { id, result });
        });
    }

    fn spawn_conversion(&self, job: ConversionJob) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = client
                .convert(&job.server_filename, &job.target_format)
                .await;
            let _ = tx.send(BackendEvent::Converted { id: job.id, result });
        });
    }

    pub fn set_format(&mut self, id: EntryId, format: &str) {
        if let Err(e) = self.session.set_selected_format(id, format) {
            tracing::error!("Format selector offered an invalid choice: {}", e);
        }
    }

    /// Also used for retry after a failed conversion.
    pub fn convert(&mut self, id: EntryId) {
        match self.session.start_conversion(id) {
            Ok(job) => self.spawn_conversion(job),
            Err(e) => tracing::warn!("Cannot convert {}: {}", id, e),
        }
    }

    pub fn reconvert(&mut self, id: EntryId) {
        if let Err(e) = self.session.reconvert(id) {
            tracing::warn!("Cannot reset {}: {}", id, e);
        }
    }

    pub fn convert_all(&mut self) {
        if self.state.queue.is_some() {
            return;
        }
        let ids = self.session.convertible_ids();
        if ids.is_empty() {
            let message = self.translator.get("toasts.noFiles").to_string();
            self.state.toasts.info(message);
            return;
        }

        let count = ids.len().to_string();
        let message = self.translator.format("toasts.converting", &[("count", count.as_str())]);
        self.state.toasts.info(message);
        self.state.queue = Some(ConversionQueue::new(
            ids,
            self.config.max_concurrent_conversions,
        ));
        self.pump_queue();
    }

    fn pump_queue(&mut self) {
        let Some(queue) = self.state.queue.as_mut() else {
            return;
        };

        let mut jobs = Vec::new();
        while let Some(id) = queue.next_dispatch() {
            match self.session.start_conversion(id) {
                Ok(job) => jobs.push(job),
                Err(e) => {
                    tracing::warn!("Skipping {} in convert all: {}", id, e);
                    queue.forget(id);
                }
            }
        }

        if queue.is_done() {
            let progress = queue.progress();
            self.state.queue = None;
            self.state.last_progress = progress;
            if let BatchProgress::Completed {
                total, succeeded, ..
            } = progress
            {
                if total > 0 {
                    let (success, total) = (succeeded.to_string(), total.to_string());
                    let message = self.translator.format(
                        "toasts.completed",
                        &[("success", success.as_str()), ("total", total.as_str())],
                    );
                    self.state.toasts.info(message);
                }
            }
        }

        for job in jobs {
            self.spawn_conversion(job);
        }
    }

    pub fn apply_batch(&mut self, format: &str) {
        let label = format.to_uppercase();
        match apply_batch_format(&mut self.session, format) {
            Ok(count) => {
                let count = count.to_string();
                let message = self.translator.format(
                    "toasts.batchSuccess",
                    &[("format", label.as_str()), ("count", count.as_str())],
                );
                self.state.toasts.info(message);
            }
            Err(_) => {
                let message = self
                    .translator
                    .format("toasts.batchError", &[("format", label.as_str())]);
                self.state.toasts.warn(message);
            }
        }
    }

    pub fn remove(&mut self, id: EntryId) {
        let Some(entry) = self.session.remove(id) else {
            return;
        };
        if let Some(queue) = self.state.queue.as_mut() {
            queue.forget(id);
        }
        let message = self
            .translator
            .format("toasts.fileRemoved", &[("name", entry.original_name.as_str())]);
        self.state.toasts.info(message);

        if self.session.is_empty() {
            self.state.clear_session();
        } else {
            self.pump_queue();
        }
    }

    pub fn go_back(&mut self) {
        self.session.reset();
        self.state.clear_session();
    }

    pub fn download(&mut self, id: EntryId) {
        let Some(filename) = self.session.get(id).and_then(|e| e.result_filename.clone()) else {
            return;
        };
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let dest = self.config.resolved_download_dir();
        self.state.pending_downloads += 1;
        self.runtime.spawn(async move {
            let result = client.download(&filename, &dest).await;
            let _ = tx.send(BackendEvent::Downloaded(result));
        });
    }

    pub fn download_all(&mut self) {
        let filenames = self.session.converted_filenames();
        if filenames.is_empty() {
            let message = self.translator.get("toasts.noConverted").to_string();
            self.state.toasts.info(message);
            return;
        }

        let count = filenames.len().to_string();
        let message = self.translator.format("toasts.zipping", &[("count", count.as_str())]);
        self.state.toasts.info(message);
        self.state.is_zipping = true;

        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let dest = self.config.resolved_download_dir();
        self.runtime.spawn(async move {
            let result = client.download_all(&filenames, &dest).await;
            let _ = tx.send(BackendEvent::ZipDownloaded(result));
        });
    }

    pub fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
        self.save_preferences();
    }

    pub fn set_language(&mut self, language: &str) {
        if language == self.translator.language() {
            return;
        }
        self.translator = Translator::new(language);
        self.preferences.language = language.to_string();
        self.save_preferences();
        self.fetch_locale();
    }

    fn save_preferences(&self) {
        if let Err(e) = self.preferences.save(&self.preferences_path) {
            tracing::warn!("Could not save preferences: {}", e);
        }
    }

    /// Applies every pending background result. Returns how many were handled.
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Blocks until at least one event arrives or `timeout` passes.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(_) => false,
        }
    }

    pub fn has_pending_work(&self) -> bool {
        let counts = self.session.status_counts();
        counts.uploading > 0
            || counts.converting > 0
            || self.state.is_zipping
            || self.state.pending_downloads > 0
            || self.state.queue.is_some()
    }

    fn handle_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Uploaded { id, result } => match result {
                Ok(response) => {
                    self.session.complete_upload(id, response.into());
                }
                Err(e) => {
                    let key = match e {
                        ApiError::Status(_) => "toasts.uploadFailed",
                        _ => "toasts.serverError",
                    };
                    tracing::warn!("Upload of {} failed: {}", id, e);
                    let message = self.translator.get(key).to_string();
                    self.session.fail_upload(id, &message);
                }
            },
            BackendEvent::Converted { id, result } => {
                let succeeded = match result {
                    Ok(filename) => self.session.complete_conversion(id, &filename),
                    Err(e) => {
                        let message = match e {
                            ApiError::Backend(message) => message,
                            other => {
                                tracing::warn!("Conversion of {} failed: {}", id, other);
                                self.translator.get("toasts.connError").to_string()
                            }
                        };
                        self.session.fail_conversion(id, &message);
                        false
                    }
                };
                if let Some(queue) = self.state.queue.as_mut() {
                    queue.finish(id, succeeded);
                }
                self.pump_queue();
            }
            BackendEvent::Downloaded(result) => {
                self.state.pending_downloads = self.state.pending_downloads.saturating_sub(1);
                self.report_download(result, "toasts.connError");
            }
            BackendEvent::ZipDownloaded(result) => {
                self.state.is_zipping = false;
                let failure_key = match result {
                    Err(ApiError::ZipCreation(_)) => "toasts.zipError",
                    _ => "toasts.connError",
                };
                self.report_download(result, failure_key);
            }
            BackendEvent::FfmpegChecked(Ok(installed)) => {
                self.state.ffmpeg_missing = !installed;
                if !installed {
                    let message = self.translator.get("toasts.ffmpegMissing").to_string();
                    self.state.toasts.warn(message);
                }
            }
            BackendEvent::FfmpegChecked(Err(e)) => {
                tracing::info!("FFmpeg check failed: {}", e);
            }
            BackendEvent::LanguagesLoaded(Ok(languages)) => {
                for language in languages {
                    if !self.languages.contains(&language) {
                        self.languages.push(language);
                    }
                }
            }
            BackendEvent::LanguagesLoaded(Err(e)) => {
                tracing::debug!("Using built-in languages: {}", e);
            }
            BackendEvent::LocaleLoaded { language, result } => match result {
                Ok(locale) if language == self.translator.language() => {
                    self.translator.merge_locale(&locale);
                }
                Ok(_) => tracing::debug!("Ignoring stale locale for {}", language),
                Err(e) => tracing::debug!("No server locale for {}: {}", language, e),
            },
        }
    }

    fn report_download(&mut self, result: Result<PathBuf, ApiError>, failure_key: &str) {
        match result {
            Ok(path) => {
                let shown = path.display().to_string();
                let message = self
                    .translator
                    .format("toasts.downloadStarted", &[("path", shown.as_str())]);
                self.state.toasts.info(message);
                self.state.last_download = Some(path);
            }
            Err(e) => {
                tracing::warn!("Download failed: {}", e);
                let message = self.translator.get(failure_key).to_string();
                self.state.toasts.error(message);
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (dropped, hovering) = ctx.input(|i| {
            (
                i.raw.dropped_files.clone(),
                !i.raw.hovered_files.is_empty(),
            )
        });
        self.state.drag_hover = hovering;
        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        let mut sources = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(data) = file.bytes {
                sources.push(FileSource::Bytes {
                    name: file.name,
                    data,
                });
            }
        }
        sources.extend(expand_paths(&paths));
        self.add_sources(sources);
    }

    fn handle_pasted_text(&mut self, ctx: &egui::Context) {
        let pasted: Vec<String> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Paste(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        });
        for text in pasted {
            self.paste_text(&text);
        }
    }
}

impl App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.handle_dropped_files(ctx);
        self.handle_pasted_text(ctx);
        self.state.toasts.prune(Instant::now());

        theme::apply(ctx, self.preferences.theme);
        self.render(ctx);

        if self.has_pending_work() || !self.state.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
