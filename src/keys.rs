use std::collections::HashSet;

use strum_macros::{EnumIter, FromRepr};

/// The keys the renderer reacts to, by legacy `keyCode` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u32)]
pub(crate) enum Key {
    Left = 37,
    Up = 38,
    Right = 39,
    Down = 40,
    A = 65,
    D = 68,
    J = 74,
    N = 78,
    P = 80,
    Q = 81,
    S = 83,
    W = 87,
    Z = 90,
    /// `<` on a US layout.
    Comma = 188,
    /// `>` on a US layout.
    Period = 190,
}

/// Pressed-key tracking with one frame of history, so held keys and
/// just-pressed edges can be told apart.
///
/// `update` rolls the current set into the previous one; the frame loop
/// calls it once per frame, after the renderer has consumed the state.
#[derive(Debug, Default)]
pub(crate) struct KeyState {
    down: HashSet<Key>,
    previous: HashSet<Key>,
}

impl KeyState {
    /// Records a keydown by raw `keyCode`. Unknown codes are ignored.
    pub(crate) fn press(&mut self, code: u32) {
        if let Some(key) = Key::from_repr(code) {
            self.down.insert(key);
        }
    }

    /// Records a keyup by raw `keyCode`.
    pub(crate) fn release(&mut self, code: u32) {
        if let Some(key) = Key::from_repr(code) {
            self.down.remove(&key);
        }
    }

    pub(crate) fn is_pressed(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Pressed this frame, up last frame.
    pub(crate) fn just_pressed(&self, key: Key) -> bool {
        self.is_pressed(key) && !self.previous.contains(&key)
    }

    /// Released this frame, down last frame.
    pub(crate) fn just_released(&self, key: Key) -> bool {
        !self.is_pressed(key) && self.previous.contains(&key)
    }

    /// Down both this frame and the last.
    pub(crate) fn is_held(&self, key: Key) -> bool {
        self.is_pressed(key) && self.previous.contains(&key)
    }

    /// Rolls the frame over.
    pub(crate) fn update(&mut self) {
        self.previous = self.down.clone();
    }
}

#[cfg(target_family = "wasm")]
pub(crate) use dom::Keys;

#[cfg(target_family = "wasm")]
mod dom {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::JsValue;
    use web_sys::{Document, KeyboardEvent};

    use super::KeyState;

    /// DOM wiring for [`KeyState`]: `keydown`/`keyup` listeners on the
    /// document, removable again on uninstall.
    pub(crate) struct Keys {
        document: Document,
        state: Rc<RefCell<KeyState>>,
        on_key_down: Option<Closure<dyn FnMut(KeyboardEvent)>>,
        on_key_up: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    }

    impl Keys {
        pub(crate) fn new(document: Document, state: Rc<RefCell<KeyState>>) -> Self {
            Self {
                document,
                state,
                on_key_down: None,
                on_key_up: None,
            }
        }

        pub(crate) fn install(&mut self) -> Result<(), JsValue> {
            let state = Rc::clone(&self.state);
            let on_key_down = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                state.borrow_mut().press(event.key_code());
            }) as Box<dyn FnMut(KeyboardEvent)>);
            self.document.add_event_listener_with_callback(
                "keydown",
                on_key_down.as_ref().unchecked_ref(),
            )?;
            self.on_key_down = Some(on_key_down);

            let state = Rc::clone(&self.state);
            let on_key_up = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                state.borrow_mut().release(event.key_code());
            }) as Box<dyn FnMut(KeyboardEvent)>);
            self.document
                .add_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref())?;
            self.on_key_up = Some(on_key_up);
            Ok(())
        }

        pub(crate) fn uninstall(&mut self) {
            if let Some(closure) = self.on_key_down.take() {
                let _ = self
                    .document
                    .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            if let Some(closure) = self.on_key_up.take() {
                let _ = self
                    .document
                    .remove_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            }
        }

        /// Frame rollover; see [`KeyState::update`].
        pub(crate) fn update(&self) {
            self.state.borrow_mut().update();
        }
    }

    impl Drop for Keys {
        fn drop(&mut self) {
            self.uninstall();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map_to_keys() {
        assert_eq!(Key::from_repr(87), Some(Key::W));
        assert_eq!(Key::from_repr(37), Some(Key::Left));
        assert_eq!(Key::from_repr(188), Some(Key::Comma));
        assert_eq!(Key::from_repr(13), None, "Enter is not bound");
    }

    #[test]
    fn every_key_round_trips_through_its_code() {
        use strum::IntoEnumIterator;

        for key in Key::iter() {
            assert_eq!(Key::from_repr(key as u32), Some(key));
        }
    }

    #[test]
    fn press_release_edges() {
        let mut state = KeyState::default();

        state.press(74); // J
        assert!(state.is_pressed(Key::J));
        assert!(state.just_pressed(Key::J));
        assert!(!state.is_held(Key::J));

        state.update();
        assert!(state.is_pressed(Key::J));
        assert!(!state.just_pressed(Key::J));
        assert!(state.is_held(Key::J));

        state.release(74);
        assert!(!state.is_pressed(Key::J));
        assert!(state.just_released(Key::J));

        state.update();
        assert!(!state.just_released(Key::J));
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let mut state = KeyState::default();
        state.press(13);
        state.press(999);
        for key in [Key::W, Key::A, Key::S, Key::D] {
            assert!(!state.is_pressed(key));
        }
    }

    #[test]
    fn keys_are_tracked_independently() {
        let mut state = KeyState::default();
        state.press(87); // W
        state.press(65); // A
        state.update();
        state.release(87);
        assert!(!state.is_pressed(Key::W));
        assert!(state.is_held(Key::A));
        assert!(state.just_released(Key::W));
    }
}
