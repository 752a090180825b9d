// xkb2ifcfg XKB Keyboard
// libxkbcommon keymap, state and compose table behind the Keyboard trait

use std::ffi::OsStr;
use std::fmt;

use xkbcommon::xkb;
use xkbcommon::xkb::compose;

use crate::command::LayoutSpec;
use crate::error::{Error, Result};
use crate::keyboard::{ComposeStatus, KeyDirection, KeyState, Keyboard, Keysym};
use crate::keycode::XkbKeycode;
use crate::settings::XkbSettings;

/// Keyboard compiled by libxkbcommon from RMLVO names and a locale
pub struct XkbKeyboard {
    keymap: xkb::Keymap,
    state: xkb::State,
    compose_state: compose::State,
    // dropped after the objects created from it
    _context: xkb::Context,
}

// the xkbcommon handles do not implement Debug
impl fmt::Debug for XkbKeyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XkbKeyboard")
            .field("keymap", &self.keymap.get_raw_ptr())
            .field("state", &self.state.get_raw_ptr())
            .finish()
    }
}

impl XkbKeyboard {
    /// Compile the keymap for `spec` and load the compose table of its locale
    pub fn compile(spec: &LayoutSpec, settings: &XkbSettings) -> Result<Self> {
        log::debug!(
            "compiling keymap rules={} model={} layout={} variant={} options={:?}",
            settings.rules,
            settings.model,
            spec.layout,
            spec.variant,
            settings.options
        );

        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb::Keymap::new_from_names(
            &context,
            settings.rules.as_str(),
            settings.model.as_str(),
            spec.layout.as_str(),
            spec.variant.as_str(),
            settings.options.clone(),
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or_else(|| Error::KeymapCompile {
            layout: spec.layout.clone(),
            variant: spec.variant.clone(),
            locale: spec.locale.clone(),
        })?;
        let state = xkb::State::new(&keymap);

        let table = compose::Table::new_from_locale(
            &context,
            OsStr::new(&spec.locale),
            compose::COMPILE_NO_FLAGS,
        )
        .map_err(|()| Error::ComposeTable {
            locale: spec.locale.clone(),
        })?;
        let compose_state = compose::State::new(&table, compose::STATE_NO_FLAGS);

        Ok(Self {
            keymap,
            state,
            compose_state,
            _context: context,
        })
    }
}

fn keycode(keycode: XkbKeycode) -> xkb::Keycode {
    xkb::Keycode::new(keycode.raw())
}

fn keysym(keysym: Keysym) -> xkb::Keysym {
    xkb::Keysym::new(keysym.raw())
}

impl KeyState for XkbKeyboard {
    fn update_key(&mut self, code: XkbKeycode, direction: KeyDirection) {
        let direction = match direction {
            KeyDirection::Down => xkb::KeyDirection::Down,
            KeyDirection::Up => xkb::KeyDirection::Up,
        };
        self.state.update_key(keycode(code), direction);
    }
}

impl Keyboard for XkbKeyboard {
    fn key_one_sym(&self, code: XkbKeycode) -> Keysym {
        Keysym(self.state.key_get_one_sym(keycode(code)).raw())
    }

    fn key_utf8(&self, code: XkbKeycode) -> String {
        self.state.key_get_utf8(keycode(code))
    }

    fn query_compose(&mut self, sym: Keysym) -> ComposeStatus {
        self.compose_state.reset();
        self.compose_state.feed(keysym(sym));
        match self.compose_state.status() {
            compose::Status::Nothing => ComposeStatus::Nothing,
            compose::Status::Composing => ComposeStatus::Composing,
            compose::Status::Composed => ComposeStatus::Composed,
            compose::Status::Cancelled => ComposeStatus::Cancelled,
        }
    }

    fn keysym_name(&self, sym: Keysym) -> String {
        xkb::keysym_get_name(keysym(sym))
    }

    fn keysym_utf8(&self, sym: Keysym) -> String {
        xkb::keysym_to_utf8(keysym(sym))
            .trim_end_matches('\0')
            .to_string()
    }

    fn num_levels(&self, code: XkbKeycode) -> u32 {
        self.keymap.num_levels_for_key(keycode(code), 0)
    }

    fn level_syms(&self, code: XkbKeycode, level: u32) -> Vec<Keysym> {
        self.keymap
            .key_get_syms_by_level(keycode(code), 0, level)
            .iter()
            .map(|sym| Keysym(sym.raw()))
            .collect()
    }

    fn keymap_text(&self) -> String {
        self.keymap.get_as_string(xkb::KEYMAP_FORMAT_TEXT_V1)
    }
}
