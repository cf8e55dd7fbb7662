use std::cell::Cell;
use std::rc::Rc;

use egui::{Color32, RichText, Slider};
use egui_extras::{Column, TableBuilder};
use input_timeout::{EventQueue, Timeout, TimeoutBuilder, TimeoutSettings};
use log::{debug, error, trace};

use crate::widget::TimeoutEdit;

#[cfg(not(target_arch = "wasm32"))]
type Clock = input_timeout::ManualClock;
#[cfg(target_arch = "wasm32")]
type Clock = input_timeout::GlooTimers;

const DEFAULT_PRESETS: &str = r#"{
    "search": { "delay_ms": 500 },
    "comment": {
        "delay_ms": 800,
        "blur": true,
        "enter": true,
        "key_press_is_activity": true
    }
}"#;

/// Settings of the two demo fields.
#[derive(serde::Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub(crate) struct Presets {
    pub(crate) search: TimeoutSettings,
    pub(crate) comment: TimeoutSettings,
}

impl Presets {
    pub(crate) const OVERRIDE: Option<&'static str> = option_env!("TIMEOUT_SETTINGS");

    fn load() -> Self {
        let json = Self::OVERRIDE.unwrap_or(DEFAULT_PRESETS);
        match serde_json::from_str(json) {
            Ok(presets) => presets,
            Err(err) => {
                error!("invalid timeout presets, using defaults: {err}");
                Self::default()
            }
        }
    }
}

/// A text field with its own binding and delay.
struct Field {
    name: &'static str,
    hint: &'static str,
    settings: TimeoutSettings,
    text: String,
    typing: Rc<Cell<bool>>,
    binding: Option<Timeout<Clock>>,
}

impl Field {
    fn new(name: &'static str, hint: &'static str, settings: TimeoutSettings) -> Self {
        Self {
            name,
            hint,
            settings,
            text: String::new(),
            typing: Rc::new(Cell::new(false)),
            binding: None,
        }
    }

    /// (Re)binds the field, which drops and so cancels the previous binding.
    fn bind(&mut self, clock: &Clock, events: &EventQueue) {
        let (started, done) = (self.typing.clone(), self.typing.clone());
        let binding = TimeoutBuilder::new(self.settings.clone())
            .on_start(move || started.set(true))
            .on_timeout(move || done.set(false))
            .emit_to(events.clone(), self.name)
            .build(clock.clone());

        self.typing.set(false);
        self.binding = match binding {
            Ok(binding) => {
                debug!("bound field {} with {:?}", self.name, self.settings);
                Some(binding)
            }
            Err(err) => {
                error!("could not bind field {}: {err}", self.name);
                None
            }
        };
    }

    fn ui(&mut self, ui: &mut egui::Ui, clock: &Clock, events: &EventQueue) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(self.name).strong());
            let Some(binding) = &self.binding else {
                ui.colored_label(Color32::LIGHT_RED, "not bound, see the log");
                return;
            };

            ui.add(TimeoutEdit::new(&mut self.text, binding).hint_text(self.hint));
            ui.label(status(&self.typing, binding));
            if ui.button("Fire now").clicked() {
                binding.trigger_now();
            }
            if ui.button("Cancel").clicked() {
                binding.cancel();
                self.typing.set(false);
            }
        });

        ui.horizontal(|ui| {
            let mut delay_ms = self.settings.delay_ms;
            let slider = ui.add(
                Slider::new(&mut delay_ms, 100..=3_000)
                    .suffix(" ms")
                    .text("delay"),
            );
            if slider.changed() {
                self.settings.delay_ms = delay_ms;
                self.bind(clock, events);
            }
            ui.label(format!(
                "blur: {:?}, enter: {:?}, keys count: {}",
                self.settings.blur, self.settings.enter, self.settings.key_press_is_activity
            ));
        });
    }
}

/// The start hook marks the field as typing even when an edit empties it and
/// nothing gets armed, so the flag only counts while a countdown runs.
fn status(typing: &Cell<bool>, binding: &Timeout<Clock>) -> &'static str {
    if !binding.is_armed() {
        typing.set(false);
        return "idle";
    }
    if typing.get() {
        "typing…"
    } else {
        "waiting"
    }
}

/// One received timeout.
struct LogRow {
    seq: u64,
    name: String,
    text: String,
    at: f64,
}

pub struct TimeoutDemoApp {
    clock: Clock,
    events: EventQueue,
    fields: [Field; 2],
    log: Vec<LogRow>,
}

impl TimeoutDemoApp {
    const DEFAULT_ROW_HEIGHT: f32 = 18.0;
    const MAX_LOG_ROWS: usize = 200;

    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let presets = Presets::load();

        // A browser timer fires between frames, so each event asks for one.
        let events = {
            let egui_ctx = cc.egui_ctx.clone();
            EventQueue::with_wakeup(move || egui_ctx.request_repaint())
        };
        let clock = Clock::default();

        let mut fields = [
            Field::new("search", "Type to search…", presets.search),
            Field::new("comment", "Enter or click away to send", presets.comment),
        ];
        for field in &mut fields {
            field.bind(&clock, &events);
        }

        TimeoutDemoApp {
            clock,
            events,
            fields,
            log: Vec::new(),
        }
    }

    /// Runs the timers that came due since the last frame and schedules a
    /// repaint for the next one.
    #[cfg(not(target_arch = "wasm32"))]
    fn pump_clock(&self, ctx: &egui::Context) {
        let now = std::time::Duration::from_secs_f64(ctx.input(|i| i.time).max(0.0));
        self.clock.advance_to(now);
        if let Some(deadline) = self.clock.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_sub(now));
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn pump_clock(&self, _ctx: &egui::Context) {}

    fn drain_events(&mut self, now: f64) {
        while let Some(event) = self.events.try_recv() {
            trace!("timeout event: {:?}", event);
            let text = self
                .fields
                .iter()
                .find(|field| field.name == event.name)
                .map(|field| field.text.clone())
                .unwrap_or_default();
            self.log.push(LogRow {
                seq: event.seq,
                name: event.name,
                text,
                at: now,
            });
        }
        if self.log.len() > Self::MAX_LOG_ROWS {
            let excess = self.log.len() - Self::MAX_LOG_ROWS;
            self.log.drain(..excess);
        }
    }
}

impl eframe::App for TimeoutDemoApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_clock(ctx);
        self.drain_events(ctx.input(|i| i.time));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    egui::widgets::global_theme_preference_buttons(ui);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new("Input Timeout").strong());
            ui.label("Each field reports once you stop typing for its delay.");
            ui.add_space(20.0);

            for field in &mut self.fields {
                field.ui(ui, &self.clock, &self.events);
                ui.add_space(10.0);
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label(RichText::new("Timeouts").strong());
                if ui.button("Clear").clicked() {
                    self.log.clear();
                }
            });

            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(30.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::remainder())
                .header(Self::DEFAULT_ROW_HEIGHT + 3.0, |mut header| {
                    for title in ["#", "field", "at", "text"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for row in self.log.iter().rev() {
                        body.row(Self::DEFAULT_ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui| {
                                ui.label(row.seq.to_string());
                            });
                            table_row.col(|ui| {
                                ui.label(row.name.as_str());
                            });
                            table_row.col(|ui| {
                                ui.label(format!("{:.2}s", row.at));
                            });
                            table_row.col(|ui| {
                                ui.monospace(row.text.as_str());
                            });
                        });
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use input_timeout::{EarlyTrigger, EventQueue, InputSignal, ManualClock, TimeoutSettings};

    use super::{status, Field, Presets, DEFAULT_PRESETS};

    #[test]
    fn default_presets_are_valid() {
        let presets: Presets = serde_json::from_str(DEFAULT_PRESETS).unwrap();
        assert_eq!(presets.search.delay_ms, 500);
        assert_eq!(presets.search.blur, EarlyTrigger::Off);
        assert_eq!(presets.comment.blur, EarlyTrigger::Fire);
        assert_eq!(presets.comment.enter, EarlyTrigger::Fire);
        assert!(presets.comment.key_press_is_activity);
        assert!(presets.search.validate().is_ok());
        assert!(presets.comment.validate().is_ok());
    }

    #[test]
    fn missing_field_falls_back_to_defaults() {
        let presets: Presets = serde_json::from_str(r#"{"comment": {"delay_ms": 50}}"#).unwrap();
        assert_eq!(presets.search, Default::default());
        assert_eq!(presets.comment.delay_ms, 50);
    }

    #[test]
    fn emptied_field_is_not_shown_as_typing() {
        let clock = ManualClock::new();
        let events = EventQueue::new();
        let mut field = Field::new("search", "", TimeoutSettings::default());
        field.bind(&clock, &events);
        let binding = field.binding.as_ref().unwrap();

        binding.handle(InputSignal::Edited, "");
        assert!(field.typing.get(), "start hook ran");
        assert_eq!(status(&field.typing, binding), "idle");
        assert!(!field.typing.get());

        binding.handle(InputSignal::Edited, "rust");
        assert_eq!(status(&field.typing, binding), "typing…");
        clock.advance(std::time::Duration::from_millis(500));
        assert_eq!(status(&field.typing, binding), "idle");
        assert_eq!(events.try_recv().unwrap().name, "search");
    }
}
