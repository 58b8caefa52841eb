//! Interactive card window. Thin glue between egui input and the festoon engine.

use std::time::Duration;

use egui::{Align2, Color32, CornerRadius, FontId, Key, LayerId, Order, Sense, Vec2 as EguiVec2};
use festoon_core::Engine;
use festoon_platform::{restart_quietly, AudioOutput, Result};
use glam::Vec2;
use tracing::info;

mod surface;
pub use surface::{to_color32, EguiSurface};

const CARD_SIZE: EguiVec2 = EguiVec2::new(420.0, 260.0);
const CARD_COLOR: Color32 = Color32::from_rgb(178, 34, 52);
const CARD_OPEN_COLOR: Color32 = Color32::from_rgb(250, 244, 232);

#[derive(Debug, Clone)]
pub struct CardText {
    pub title: String,
    pub message: String,
    pub prompt: String,
}

impl Default for CardText {
    fn default() -> Self {
        Self {
            title: "Happy Holidays!".into(),
            message: "Wishing you a bright and cheerful season.".into(),
            prompt: "Click or press Enter to open".into(),
        }
    }
}

/// Opens the card window and blocks until it is closed.
pub fn run_card_window(engine: Engine, audio: Box<dyn AudioOutput>, text: CardText) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Festoon")
            .with_inner_size([960.0, 680.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Festoon",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(CardApp::new(engine, audio, text)))),
    )
    .map_err(|err| err.to_string().into())
}

pub struct CardApp {
    engine: Engine,
    audio: Box<dyn AudioOutput>,
    text: CardText,
}

impl CardApp {
    pub fn new(engine: Engine, audio: Box<dyn AudioOutput>, text: CardText) -> Self {
        Self { engine, audio, text }
    }

    fn open_card(&mut self, anchor: Vec2, now: Duration) {
        if self.engine.is_opened() {
            return;
        }
        restart_quietly(self.audio.as_mut());
        self.engine.open(anchor, now);
    }

    fn replay(&mut self, anchor: Vec2, now: Duration) {
        self.engine.replay(anchor, now);
    }

    fn toggle_mute(&mut self) {
        let muted = !self.audio.is_muted();
        self.audio.set_muted(muted);
        info!("UI: music {}", if muted { "muted" } else { "unmuted" });
    }

    fn mute_label(&self) -> &'static str {
        if self.audio.is_muted() {
            "🔇 Music"
        } else {
            "🔊 Music"
        }
    }
}

impl eframe::App for CardApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(context.input(|i| i.time));
        let mut card_anchor = None;
        let mut open_requested = false;
        let mut replay_requested = false;
        let mut mute_requested = false;

        egui::CentralPanel::default().show(context, |ui| {
            ui.horizontal(|ui| {
                if ui.button(self.mute_label()).clicked() {
                    mute_requested = true;
                }
                if ui.button("Replay").clicked() {
                    replay_requested = true;
                }
            });

            let available = ui.available_rect_before_wrap();
            let card_rect = egui::Rect::from_center_size(available.center(), CARD_SIZE);
            let response = ui.allocate_rect(card_rect, Sense::click());
            let activated = response.has_focus()
                && ui.input(|i| i.key_pressed(Key::Enter) || i.key_pressed(Key::Space));
            if response.clicked() || activated {
                open_requested = true;
            }

            let painter = ui.painter();
            let opened = self.engine.is_opened();
            let (fill, ink) = if opened {
                (CARD_OPEN_COLOR, Color32::from_rgb(120, 20, 30))
            } else {
                (CARD_COLOR, Color32::WHITE)
            };
            painter.rect_filled(card_rect, CornerRadius::same(16), fill);
            if opened {
                painter.text(
                    card_rect.center() - EguiVec2::new(0.0, 30.0),
                    Align2::CENTER_CENTER,
                    &self.text.title,
                    FontId::proportional(34.0),
                    ink,
                );
                painter.text(
                    card_rect.center() + EguiVec2::new(0.0, 30.0),
                    Align2::CENTER_CENTER,
                    &self.text.message,
                    FontId::proportional(18.0),
                    ink,
                );
            } else {
                painter.text(
                    card_rect.center(),
                    Align2::CENTER_CENTER,
                    &self.text.prompt,
                    FontId::proportional(20.0),
                    ink,
                );
            }
            let center = card_rect.center();
            card_anchor = Some(Vec2::new(center.x, center.y));
        });

        if mute_requested {
            self.toggle_mute();
        }
        if let Some(anchor) = card_anchor {
            if open_requested {
                info!("UI: card activated");
                self.open_card(anchor, now);
            }
            if replay_requested {
                info!("UI: replay clicked");
                self.replay(anchor, now);
            }
        }

        let painter = context.layer_painter(LayerId::new(Order::Foreground, egui::Id::new("festoon-particles")));
        let mut surface = EguiSurface::new(painter);
        self.engine.frame(now, &mut surface);
        if self.engine.needs_frames() {
            context.request_repaint();
        }
    }
}
