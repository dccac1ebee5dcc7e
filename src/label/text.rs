use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use std::fmt;

pub const MIN_LABEL_CHARS: usize = 3;
pub const MAX_LABEL_CHARS: usize = 12;

/// The text printed on the bottle, as typed
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LabelText {
    input: String,
}

impl Default for LabelText {
    fn default() -> Self {
        LabelText::new("RENAIS")
    }
}

impl LabelText {
    pub fn new(input: impl Into<String>) -> Self {
        LabelText { input: input.into() }
    }

    /// Raw input, including surrounding whitespace
    pub fn input(&self) -> &str {
        &self.input
    }

    /// What gets rendered
    pub fn text(&self) -> &str {
        self.input.trim()
    }

    pub fn apply(&mut self, edit: LabelEdit) {
        match edit {
            LabelEdit::Insert(s) => self.input.push_str(&s),
            LabelEdit::Delete => {
                self.input.pop();
            }
        }
    }
}

/// A single keyboard edit to the label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelEdit {
    Insert(String),
    Delete,
}

impl LabelEdit {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(s) if !s.chars().any(char::is_control) => {
                Some(LabelEdit::Insert(s.to_string()))
            }
            Key::Space => Some(LabelEdit::Insert(" ".to_string())),
            Key::Backspace => Some(LabelEdit::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelError {
    TooShort(usize),
    TooLong(usize),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Text must be between {} and {} characters!",
            MIN_LABEL_CHARS, MAX_LABEL_CHARS
        )
    }
}

impl std::error::Error for LabelError {}

/// Check the trimmed length of a label
pub fn validate_label(text: &str) -> Result<(), LabelError> {
    let count = text.trim().chars().count();
    if count < MIN_LABEL_CHARS {
        Err(LabelError::TooShort(count))
    } else if count > MAX_LABEL_CHARS {
        Err(LabelError::TooLong(count))
    } else {
        Ok(())
    }
}

/// On-screen validation message
#[derive(Component)]
pub struct LabelErrorText;

pub fn spawn_error_text(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.75, 0.1, 0.1)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        LabelErrorText,
    ));
}

/// System: Typed characters append to the label, Backspace deletes
pub fn edit_label(mut keys: MessageReader<KeyboardInput>, mut label: ResMut<LabelText>) {
    for key in keys.read() {
        if key.state != ButtonState::Pressed {
            continue;
        }
        if let Some(edit) = LabelEdit::from_key(&key.logical_key) {
            label.apply(edit);
        }
    }
}

/// System: Show or clear the validation message after the label changes
pub fn report_label(
    label: Res<LabelText>,
    mut messages: Query<&mut Text, With<LabelErrorText>>,
    mut was_invalid: Local<bool>,
) {
    let result = validate_label(label.text());

    for mut message in &mut messages {
        message.0 = match &result {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        };
    }

    match result {
        Err(e) if !*was_invalid => {
            warn!("Label {:?} rejected: {:?}", label.text(), e);
            *was_invalid = true;
        }
        Err(_) => {}
        Ok(()) => *was_invalid = false,
    }
}
