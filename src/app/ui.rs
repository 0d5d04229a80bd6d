use super::IntakeUploader;
use crate::notify::NotificationKind;
use crate::sequencer::StepPhase;
use crate::upload::UploadStatus;
use crate::voice::AgentStatus;
use eframe::egui::{self, Align, Align2, Color32, RichText};

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl IntakeUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Upload Documents");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Send your medical documents before your visit")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);

                    if self.finished.get() {
                        self.render_completed(ui);
                    } else {
                        self.render_appointment_notice(ui);
                        ui.add_space(20.0);
                        self.render_steps(ui);
                        ui.add_space(20.0);
                        self.render_actions(ui);

                        if !self.state.file_statuses.is_empty() {
                            ui.add_space(10.0);
                            self.render_details(ui);
                        }
                    }

                    ui.add_space(20.0);
                    self.render_voice_agent(ui);
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });

        self.render_toasts(ctx);
    }

    fn render_appointment_notice(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("📅 Upcoming Appointment").strong());
            ui.label(
                "You have an appointment scheduled soon! To help your doctor prepare, \
                 please upload your relevant medical documents.",
            );
        });
    }

    fn render_steps(&self, ui: &mut egui::Ui) {
        let session = self.sequencer.session();
        let total = self.sequencer.total_steps();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Progress").color(MUTED));
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{}/{}", session.current_step, total)).color(MUTED),
                    );
                });
            });

            let progress_bar = egui::ProgressBar::new(self.sequencer.progress())
                .animate(session.is_uploading)
                .fill(ACCENT);
            ui.add(progress_bar);

            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                for category in self.sequencer.catalog().iter() {
                    let text = RichText::new(format!("{}. {}", category.position, category.label));
                    let text = if category.position == session.current_step {
                        text.color(ACCENT).strong()
                    } else if category.position < session.current_step {
                        text.color(ACCENT)
                    } else {
                        text.color(MUTED)
                    };
                    ui.label(text);
                }
            });
        });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let upload_text = match self.sequencer.phase() {
                StepPhase::Uploading => format!("⏳ {}", self.sequencer.upload_button_label()),
                _ => format!("📤 {}", self.sequencer.upload_button_label()),
            };
            let mut upload_button =
                egui::Button::new(upload_text).min_size(egui::vec2(260.0, 40.0));
            if matches!(self.sequencer.phase(), StepPhase::Error(_)) {
                upload_button = upload_button.fill(FAILURE);
            }

            if ui
                .add_enabled(self.sequencer.can_upload(), upload_button)
                .clicked()
            {
                self.pick_files();
            }

            if let Some(summary) = &self.state.selection_summary {
                ui.label(RichText::new(summary).color(MUTED));
            } else if self.sequencer.can_upload() {
                let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
                let hint = if hovering {
                    RichText::new("Release to upload").color(ACCENT)
                } else {
                    RichText::new("or drop files onto this window").color(MUTED)
                };
                ui.label(hint);
            }

            ui.add_space(10.0);

            let advance_button = egui::Button::new(self.sequencer.advance_button_label())
                .min_size(egui::vec2(160.0, 32.0));
            if ui
                .add_enabled(self.sequencer.can_advance(), advance_button)
                .clicked()
            {
                self.advance();
            }

            if let StepPhase::Error(reason) = self.sequencer.phase() {
                ui.add_space(5.0);
                ui.colored_label(FAILURE, reason);
            }
        });
    }

    fn render_completed(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.colored_label(SUCCESS, RichText::new("✅ All Done!").heading());
            ui.add_space(5.0);
            ui.label("Thank you. Your documents have been sent to your doctor.");
            ui.add_space(15.0);
            if ui.button("🔄 Start Over").clicked() {
                self.restart();
            }
        });
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .button(if self.state.show_details {
                    "Hide Details"
                } else {
                    "Show Details"
                })
                .clicked()
            {
                self.state.show_details = !self.state.show_details;
            }
            ui.label(self.state.get_status_text());
        });

        if self.state.show_details {
            egui::ScrollArea::vertical()
                .id_source("upload_details")
                .max_height(200.0)
                .show(ui, |ui| {
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .show(ui, |ui| {
                            ui.add_space(8.0);
                            for status in &self.state.file_statuses {
                                ui.horizontal(|ui| match &status.status {
                                    UploadStatus::Processing => {
                                        ui.label("⏳");
                                        ui.colored_label(
                                            MUTED,
                                            format!("{} - Uploading...", status.name),
                                        );
                                    }
                                    UploadStatus::Accepted(message) => {
                                        ui.label("✅");
                                        ui.colored_label(
                                            SUCCESS,
                                            format!("{} - {}", status.name, message),
                                        );
                                    }
                                    UploadStatus::Rejected(reason) => {
                                        ui.label("❌");
                                        ui.colored_label(
                                            FAILURE,
                                            format!("{} - {}", status.name, reason),
                                        );
                                    }
                                });
                                ui.add_space(4.0);
                            }
                            ui.add_space(8.0);
                        });
                });
        }
    }

    fn render_voice_agent(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("🎙 Voice Assistant").strong());
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if self.voice.is_connected() {
                        if ui.button("⏹ Stop Agent").clicked() {
                            self.voice.stop();
                        }
                    } else if ui.button("▶ Start Agent").clicked() {
                        self.voice.start();
                    }
                });
            });

            match self.voice.status() {
                AgentStatus::Connected(context) => {
                    ui.label(
                        RichText::new(format!("Context: {}", context.to_json()))
                            .monospace()
                            .color(MUTED),
                    );
                }
                AgentStatus::Disconnected => {
                    ui.label(
                        RichText::new("Ask the assistant about your documents").color(MUTED),
                    );
                }
            }
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.toasts.iter() {
                    let color = match toast.notification.kind {
                        NotificationKind::Success => SUCCESS,
                        NotificationKind::Error => FAILURE,
                        NotificationKind::Info => ACCENT,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.colored_label(color, RichText::new(&toast.notification.title).strong());
                        ui.label(&toast.notification.description);
                    });
                    ui.add_space(6.0);
                }
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format!(
                    "Accepted files: {}",
                    self.filter.describe()
                ))
                .color(MUTED),
            );
        });
    }
}
