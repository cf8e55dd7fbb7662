use egui::{Event, Key, Response, TextEdit, Ui, Widget};
use input_timeout::{FieldObservation, Timeout, TimerFacility};

/// A single-line text field that drives a [`Timeout`] binding.
pub struct TimeoutEdit<'a, F: TimerFacility> {
    text: &'a mut String,
    binding: &'a Timeout<F>,
    hint: &'a str,
}

impl<'a, F: TimerFacility> TimeoutEdit<'a, F> {
    pub fn new(text: &'a mut String, binding: &'a Timeout<F>) -> Self {
        Self {
            text,
            binding,
            hint: "",
        }
    }

    pub fn hint_text(mut self, hint: &'a str) -> Self {
        self.hint = hint;
        self
    }
}

impl<F: TimerFacility> Widget for TimeoutEdit<'_, F> {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            text,
            binding,
            hint,
        } = self;

        let response = ui.add(TextEdit::singleline(&mut *text).hint_text(hint));
        let observation = observe(ui, &response);
        if observation != FieldObservation::default() {
            binding.observe(observation, text.as_str());
        }
        response
    }
}

/// Reads this frame's key presses and focus changes of the text field.
fn observe(ui: &Ui, response: &Response) -> FieldObservation {
    // A single-line TextEdit gives up focus on Enter, the key press happens
    // in the same frame as the focus loss.
    let focused = response.has_focus() || response.lost_focus();
    let (key_pressed, confirm_key) = if focused {
        ui.input(|i| {
            let any_key = i
                .events
                .iter()
                .any(|event| matches!(event, Event::Key { pressed: true, .. }));
            (any_key, i.key_pressed(Key::Enter))
        })
    } else {
        (false, false)
    };

    FieldObservation {
        key_pressed,
        edited: response.changed(),
        focus_lost: response.lost_focus(),
        confirm_key,
    }
}
