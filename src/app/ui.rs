use super::theme;
use super::toast::ToastLevel;
use super::ConverterApp;
use crate::session::{EntryId, EntryStatus, FailureStage, FileEntry};
use crate::upload::expand_paths;
use crate::utils::file_size::format_megabytes;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

/// What a card asked for during this frame.
enum CardAction {
    SetFormat(EntryId, &'static str),
    Convert(EntryId),
    Reconvert(EntryId),
    Download(EntryId),
    Remove(EntryId),
}

impl ConverterApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("toasts")
            .show_separator_line(false)
            .show(ctx, |ui| self.render_toasts(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.session().is_empty() {
                    self.render_drop_zone(ui);
                } else {
                    self.render_toolbar(ui);
                    ui.add_space(10.0);
                    self.render_cards(ui);
                }
            });
        });
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(self.translator().get("title"));
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                let theme_label = match self.preferences().theme {
                    crate::settings::Theme::Dark => self.translator().get("settings.light"),
                    crate::settings::Theme::Light => self.translator().get("settings.dark"),
                };
                let toggle = ui
                    .button(theme_label)
                    .on_hover_text(self.translator().get("settings.theme"))
                    .clicked();

                let mut chosen = None;
                let current = self.translator().language().to_string();
                egui::ComboBox::from_id_source("language")
                    .selected_text(current.to_uppercase())
                    .show_ui(ui, |ui| {
                        ui.label(RichText::new(self.translator().get("settings.language")).small());
                        for language in self.languages() {
                            if ui
                                .selectable_label(*language == current, language.to_uppercase())
                                .clicked()
                            {
                                chosen = Some(language.clone());
                            }
                        }
                    });

                if toggle {
                    self.toggle_theme();
                }
                if let Some(language) = chosen {
                    self.set_language(&language);
                }
            });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(self.translator().get("heroTitle")).size(28.0).strong());
            ui.add_space(5.0);
            ui.label(
                RichText::new(self.translator().get("heroSubtitle"))
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            ui.add_space(30.0);

            let stroke_color = if self.ui_state().drag_hover {
                theme::accent()
            } else {
                ui.visuals().widgets.noninteractive.bg_stroke.color
            };
            let response = egui::Frame::none()
                .stroke(egui::Stroke::new(2.0, stroke_color))
                .rounding(16.0)
                .inner_margin(40.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width().min(480.0));
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("📂").size(40.0));
                        ui.label(RichText::new(self.translator().get("dropText")).size(18.0));
                        ui.label(
                            RichText::new(self.translator().get("browseText"))
                                .color(theme::accent()),
                        );
                    });
                })
                .response
                .interact(egui::Sense::click());

            if response.clicked() {
                self.browse_files();
            }
        });
    }

    fn browse_files(&mut self) {
        if let Some(paths) = FileDialog::new().pick_files() {
            self.add_sources(expand_paths(&paths));
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let formats = self.available_batch_formats();
        let converted = self.session().converted_count();
        let busy = self.ui_state().is_converting_all();
        let zipping = self.ui_state().is_zipping;

        ui.horizontal_wrapped(|ui| {
            if ui.button(self.translator().get("buttons.back")).clicked() {
                self.go_back();
                return;
            }
            if ui.button(self.translator().get("buttons.addFile")).clicked() {
                self.browse_files();
            }

            ui.separator();

            // Only offered when every typed file shares at least one format.
            if !formats.is_empty() {
                let mut picked = None;
                egui::ComboBox::from_id_source("batch-format")
                    .selected_text(self.translator().get("applyAll"))
                    .show_ui(ui, |ui| {
                        for format in &formats {
                            if ui.selectable_label(false, format.to_uppercase()).clicked() {
                                picked = Some(*format);
                            }
                        }
                    });
                if let Some(format) = picked {
                    self.apply_batch(format);
                }
            }

            ui.add_enabled_ui(!busy, |ui| {
                if ui.button(self.translator().get("convertAll")).clicked() {
                    self.convert_all();
                }
            });

            ui.add_enabled_ui(converted > 0 && !zipping, |ui| {
                if ui.button(self.translator().get("downloadAll")).clicked() {
                    self.download_all();
                }
            });

            if let Some(path) = &self.ui_state().last_download {
                if ui.button(self.translator().get("buttons.openFolder")).clicked() {
                    let folder = path.parent().unwrap_or(path);
                    if let Err(e) = open::that(folder) {
                        tracing::warn!("Could not open {}: {}", folder.display(), e);
                    }
                }
            }
        });

        let progress = self.batch_progress();
        if !matches!(progress, crate::session::BatchProgress::NotStarted) {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.add(
                    egui::ProgressBar::new(progress.percentage())
                        .desired_width(200.0)
                        .fill(theme::accent()),
                );
                ui.label(progress.counter_text());
            });
        }
    }

    fn render_cards(&mut self, ui: &mut egui::Ui) {
        let mut actions = Vec::new();
        for entry in self.session().entries() {
            self.render_card(ui, entry, &mut actions);
            ui.add_space(6.0);
        }

        for action in actions {
            match action {
                CardAction::SetFormat(id, format) => self.set_format(id, format),
                CardAction::Convert(id) => self.convert(id),
                CardAction::Reconvert(id) => self.reconvert(id),
                CardAction::Download(id) => self.download(id),
                CardAction::Remove(id) => self.remove(id),
            }
        }
    }

    fn render_card(&self, ui: &mut egui::Ui, entry: &FileEntry, actions: &mut Vec<CardAction>) {
        let t = self.translator();
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .rounding(12.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let icon = match (&entry.status, entry.file_type) {
                        (EntryStatus::Uploading, _) => "⏳",
                        (
                            EntryStatus::Failed {
                                stage: FailureStage::Upload,
                                ..
                            },
                            _,
                        ) => "⚠",
                        (_, Some(file_type)) => file_type.icon(),
                        (_, None) => "📄",
                    };
                    ui.label(RichText::new(icon).size(24.0));

                    ui.vertical(|ui| {
                        ui.label(RichText::new(&entry.original_name).strong());
                        match &entry.status {
                            EntryStatus::Uploading => {
                                ui.label(RichText::new(t.get("status.uploading")).color(theme::muted()));
                            }
                            _ => {
                                let extension = entry.extension.as_deref().unwrap_or("").to_uppercase();
                                ui.label(
                                    RichText::new(format!(
                                        "{}  {}",
                                        extension,
                                        format_megabytes(entry.size_bytes)
                                    ))
                                    .small()
                                    .color(theme::muted()),
                                );
                            }
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .small_button("🗑")
                            .on_hover_text(t.get("buttons.remove"))
                            .clicked()
                        {
                            actions.push(CardAction::Remove(entry.id));
                        }
                        self.render_card_actions(ui, entry, actions);
                    });
                });
            });
    }

    fn render_card_actions(
        &self,
        ui: &mut egui::Ui,
        entry: &FileEntry,
        actions: &mut Vec<CardAction>,
    ) {
        let t = self.translator();
        match &entry.status {
            EntryStatus::Uploading => {}
            EntryStatus::Converting => {
                ui.label(RichText::new(t.get("status.converting")).color(theme::accent()));
                ui.spinner();
            }
            EntryStatus::Converted => {
                ui.label(RichText::new(t.get("status.success")).color(theme::success()));
                if ui
                    .add(egui::Button::new(
                        RichText::new(t.get("buttons.download")).color(Color32::WHITE),
                    )
                    .fill(theme::success()))
                    .clicked()
                {
                    actions.push(CardAction::Download(entry.id));
                }
                if ui
                    .small_button("🔄")
                    .on_hover_text(t.get("buttons.convertAgain"))
                    .clicked()
                {
                    actions.push(CardAction::Reconvert(entry.id));
                }
            }
            EntryStatus::Failed {
                stage: FailureStage::Upload,
                message,
            } => {
                ui.label(RichText::new(message).color(theme::danger()))
                    .on_hover_text(t.get("status.error"));
            }
            EntryStatus::Ready
            | EntryStatus::Failed {
                stage: FailureStage::Conversion,
                ..
            } => {
                let failed = matches!(entry.status, EntryStatus::Failed { .. });
                let label = if failed {
                    t.get("buttons.retry")
                } else {
                    t.get("buttons.convert")
                };
                if ui
                    .add(egui::Button::new(RichText::new(label).color(Color32::WHITE)).fill(theme::accent()))
                    .clicked()
                {
                    actions.push(CardAction::Convert(entry.id));
                }

                let mut selected = entry.selected_format.unwrap_or_default();
                egui::ComboBox::from_id_source(("format", entry.id))
                    .selected_text(selected.to_uppercase())
                    .width(80.0)
                    .show_ui(ui, |ui| {
                        for format in entry.output_formats() {
                            ui.selectable_value(&mut selected, *format, format.to_uppercase());
                        }
                    });
                if entry.selected_format != Some(selected) && !selected.is_empty() {
                    actions.push(CardAction::SetFormat(entry.id, selected));
                }

                if let EntryStatus::Failed { message, .. } = &entry.status {
                    ui.label(RichText::new(message).small().color(theme::danger()))
                        .on_hover_text(t.get("status.error"));
                }
            }
        }
    }

    fn render_toasts(&self, ui: &mut egui::Ui) {
        if self.ui_state().toasts.is_empty() {
            return;
        }
        ui.add_space(4.0);
        ui.vertical_centered(|ui| {
            for toast in self.ui_state().toasts.visible() {
                let color = match toast.level {
                    ToastLevel::Info => ui.visuals().text_color(),
                    ToastLevel::Warning => Color32::from_rgb(255, 159, 10),
                    ToastLevel::Error => theme::danger(),
                };
                ui.colored_label(color, &toast.message);
            }
        });
        ui.add_space(4.0);
    }
}
