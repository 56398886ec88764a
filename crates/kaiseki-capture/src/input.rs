use std::fmt;

use device_query::{DeviceQuery, DeviceState, Keycode};
use kaiseki_types::Control;

use crate::error::InputError;

/// Non-blocking view of the controls the loop reacts to
pub trait InputSource {
    /// Whether `control` is held right now
    fn is_active(&self, control: Control) -> bool;
}

/// Alternatives of key chords, e.g. `NumpadAdd,LShift+Equal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    chords: Vec<Vec<Keycode>>,
}

impl KeyBinding {
    pub fn parse(binding: &str) -> Result<Self, InputError> {
        let mut chords = Vec::new();

        for alternative in binding.split(',').map(str::trim) {
            if alternative.is_empty() {
                continue;
            }

            let chord = alternative
                .split('+')
                .map(str::trim)
                .map(|name| {
                    name.parse::<Keycode>()
                        .map_err(|_| InputError::UnknownKey {
                            key: name.to_string(),
                            binding: binding.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            chords.push(chord);
        }

        if chords.is_empty() {
            return Err(InputError::EmptyBinding(binding.to_string()));
        }

        Ok(Self { chords })
    }

    /// True when every key of at least one chord is held
    pub fn matches(&self, held: &[Keycode]) -> bool {
        self.chords
            .iter()
            .any(|chord| chord.iter().all(|key| held.contains(key)))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            for (j, key) in chord.iter().enumerate() {
                if j > 0 {
                    write!(f, "+")?;
                }
                write!(f, "{key:?}")?;
            }
        }
        Ok(())
    }
}

/// Polls the real keyboard state
pub struct KeyboardInput {
    device: DeviceState,
    capture: KeyBinding,
    exit: KeyBinding,
}

impl KeyboardInput {
    /// Fails when the keyboard cannot be read (no X display, no accessibility permission)
    pub fn new(capture: KeyBinding, exit: KeyBinding) -> Result<Self, InputError> {
        Self::with_device(DeviceState::checked_new(), capture, exit)
    }

    fn with_device(
        device: Option<DeviceState>,
        capture: KeyBinding,
        exit: KeyBinding,
    ) -> Result<Self, InputError> {
        let device = device.ok_or(InputError::Unavailable)?;
        Ok(Self {
            device,
            capture,
            exit,
        })
    }

    pub fn binding(&self, control: Control) -> &KeyBinding {
        match control {
            Control::Capture => &self.capture,
            Control::Exit => &self.exit,
        }
    }
}

impl InputSource for KeyboardInput {
    fn is_active(&self, control: Control) -> bool {
        let held = self.device.get_keys();
        self.binding(control).matches(&held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert!(binding.matches(&[Keycode::Escape]));
        assert!(binding.matches(&[Keycode::A, Keycode::Escape]));
        assert!(!binding.matches(&[Keycode::A]));
        assert!(!binding.matches(&[]));
    }

    #[test]
    fn chord_needs_every_key() {
        let binding = KeyBinding::parse("LShift+Equal").unwrap();
        assert!(binding.matches(&[Keycode::Equal, Keycode::LShift]));
        assert!(!binding.matches(&[Keycode::Equal]));
        assert!(!binding.matches(&[Keycode::LShift]));
    }

    #[test]
    fn any_alternative_matches() {
        let binding = KeyBinding::parse("NumpadAdd, LShift+Equal ,RShift+Equal").unwrap();
        assert!(binding.matches(&[Keycode::NumpadAdd]));
        assert!(binding.matches(&[Keycode::RShift, Keycode::Equal]));
        assert!(!binding.matches(&[Keycode::Equal]));
    }

    #[test]
    fn display_lists_alternatives() {
        let binding = KeyBinding::parse("NumpadAdd,LShift+Equal").unwrap();
        assert_eq!(binding.to_string(), "NumpadAdd or LShift+Equal");
    }

    #[test]
    fn unknown_key_is_reported() {
        let err = KeyBinding::parse("NumpadAdd,Hyper").unwrap_err();
        match err {
            InputError::UnknownKey { key, .. } => assert_eq!(key, "Hyper"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_keyboard_backend_is_an_error() {
        let capture = KeyBinding::parse("NumpadAdd").unwrap();
        let exit = KeyBinding::parse("Escape").unwrap();

        let err = KeyboardInput::with_device(None, capture, exit).err().unwrap();
        assert!(matches!(err, InputError::Unavailable));
        assert_eq!(err.to_string(), "Keyboard state is unavailable");
    }

    #[test]
    fn blank_binding_is_rejected() {
        assert!(matches!(
            KeyBinding::parse(" , "),
            Err(InputError::EmptyBinding(_))
        ));
    }
}
