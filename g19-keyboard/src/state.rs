//! Pressed-key state and edge detection.

use tracing::debug;

use crate::decoder::{self, Decoded};
use crate::error::DecodeError;
use crate::keymap::KeyMap;
use crate::keys::{Key, KeyDomain, KeySet};

use g19_transport::Channel;

/// Snapshot of which special keys are currently down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    keys_down: KeySet,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn keys_down(&self) -> &KeySet {
        &self.keys_down
    }

    /// Bring every key in `possible_keys` in line with `keys`.
    ///
    /// Keys outside `possible_keys` are left alone whatever their state.
    /// Returns `(newly_down, newly_up)`.
    ///
    /// Example: down = {A, B}, possible = {B, C, D}, keys = {C}
    /// leaves down = {A, C} and returns ({C}, {B}).
    fn update_keys_down(&mut self, possible_keys: &[Key], keys: &KeySet) -> (KeySet, KeySet) {
        let mut keys_down = KeySet::new();
        let mut keys_up = KeySet::new();
        for &key in possible_keys {
            if keys.contains(&key) {
                if self.keys_down.insert(key) {
                    keys_down.insert(key);
                }
            } else if self.keys_down.remove(&key) {
                keys_up.insert(key);
            }
        }
        (keys_down, keys_up)
    }
}

/// Edge-triggered change produced by one decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// State before the packet
    pub old_state: KeyboardState,
    /// State after the packet
    pub new_state: KeyboardState,
    /// Keys newly pressed
    pub keys_down: KeySet,
    /// Keys released by this packet
    pub keys_up: KeySet,
}

impl InputEvent {
    /// No key changed state
    pub fn is_empty(&self) -> bool {
        self.keys_down.is_empty() && self.keys_up.is_empty()
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn released(&self, key: Key) -> bool {
        self.keys_up.contains(&key)
    }
}

/// Owns the keyboard state and turns packets into [`InputEvent`]s.
///
/// Not shared: exactly one poller feeds a tracker.
pub struct KeyTracker {
    map: KeyMap,
    state: KeyboardState,
}

impl KeyTracker {
    pub fn new(map: KeyMap) -> Self {
        Self {
            map,
            state: KeyboardState::new(),
        }
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.map
    }

    /// Apply a decoded key set over its domain and describe the change
    pub fn update(&mut self, domain: KeyDomain, keys: &KeySet) -> InputEvent {
        let old_state = self.state.clone();
        let (keys_down, keys_up) = self.state.update_keys_down(domain.keys(), keys);
        InputEvent {
            old_state,
            new_state: self.state.clone(),
            keys_down,
            keys_up,
        }
    }

    fn apply(&mut self, decoded: Decoded) -> InputEvent {
        self.update(decoded.domain, &decoded.keys)
    }

    /// G/M key packet; `Ok(None)` if the packet is not 4 bytes long
    pub fn packet_received_g_and_m(
        &mut self,
        data: &[u8],
    ) -> Result<Option<InputEvent>, DecodeError> {
        debug!("G key packet of {}", data.len());
        if data.len() != 4 {
            return Ok(None);
        }
        let decoded = decoder::decode_g_and_m(&self.map, data)?;
        Ok(Some(self.apply(decoded)))
    }

    /// Menu key packet; `Ok(None)` if the packet is not 2 bytes long
    pub fn packet_received_menu(&mut self, data: &[u8]) -> Result<Option<InputEvent>, DecodeError> {
        debug!("D key packet of {}", data.len());
        if data.len() != 2 {
            return Ok(None);
        }
        let decoded = decoder::decode_menu(&self.map, data)?;
        Ok(Some(self.apply(decoded)))
    }

    /// Multimedia or Win-key switch packet. Never ignored: a bad length is an error.
    pub fn packet_received_multimedia(&mut self, data: &[u8]) -> Result<InputEvent, DecodeError> {
        debug!("MM or Win key packet of {}", data.len());
        let decoded = decoder::decode_multimedia(&self.map, data)?;
        Ok(self.apply(decoded))
    }

    /// Route a packet by the channel it arrived on
    pub fn packet_received(
        &mut self,
        channel: Channel,
        data: &[u8],
    ) -> Result<Option<InputEvent>, DecodeError> {
        match channel {
            Channel::Multimedia => self.packet_received_multimedia(data).map(Some),
            Channel::GAndM => self.packet_received_g_and_m(data),
            Channel::DisplayMenu => self.packet_received_menu(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::G19;

    fn keys(list: &[Key]) -> KeySet {
        list.iter().copied().collect()
    }

    const GM_IDLE: [u8; 4] = [0x02, 0x00, 0x00, 0x40];
    const GM_G1: [u8; 4] = [0x02, 0x01, 0x00, 0x40];

    #[test]
    fn test_diff_within_domain() {
        let mut tracker = KeyTracker::new(G19);
        tracker.update(KeyDomain::GAndM, &keys(&[Key::G1, Key::G2]));

        let evt = tracker.update(KeyDomain::GAndM, &keys(&[Key::G2, Key::G3]));
        assert_eq!(evt.keys_down, keys(&[Key::G3]));
        assert_eq!(evt.keys_up, keys(&[Key::G1]));
        assert_eq!(evt.old_state.keys_down(), &keys(&[Key::G1, Key::G2]));
        assert_eq!(evt.new_state.keys_down(), &keys(&[Key::G2, Key::G3]));
    }

    #[test]
    fn test_other_domains_untouched() {
        let mut tracker = KeyTracker::new(G19);
        tracker.update(KeyDomain::Menu, &keys(&[Key::Ok]));
        tracker.update(KeyDomain::GAndM, &keys(&[Key::G5]));

        let evt = tracker.update(KeyDomain::GAndM, &KeySet::new());
        assert_eq!(evt.keys_up, keys(&[Key::G5]));
        assert!(evt.new_state.is_down(Key::Ok));
    }

    #[test]
    fn test_repeated_packet_is_empty() {
        let mut tracker = KeyTracker::new(G19);
        let first = tracker.packet_received_g_and_m(&GM_G1).unwrap().unwrap();
        assert!(first.pressed(Key::G1));
        let second = tracker.packet_received_g_and_m(&GM_G1).unwrap().unwrap();
        assert!(second.is_empty());
        assert_eq!(second.old_state, second.new_state);
    }

    #[test]
    fn test_every_g_and_m_packet_repeats_empty() {
        let table = G19.g_and_m;
        assert!(table.len() < 32);
        let mut tracker = KeyTracker::new(G19);

        for subset in 0u32..(1 << table.len()) {
            let mut field = G19.g_and_m_empty;
            let mut expected = KeySet::new();
            for (bit, &(mask, key)) in table.iter().enumerate() {
                if subset & (1 << bit) != 0 {
                    field |= mask;
                    expected.insert(key);
                }
            }
            let [b1, b2, b3, _] = field.to_le_bytes();
            let packet = [G19.g_and_m_marker, b1, b2, b3];

            let first = tracker.packet_received_g_and_m(&packet).unwrap().unwrap();
            assert_eq!(first.new_state.keys_down(), &expected, "{packet:02X?}");
            let again = tracker.packet_received_g_and_m(&packet).unwrap().unwrap();
            assert!(again.is_empty(), "{packet:02X?} repeated changed state");
            assert_eq!(again.old_state, again.new_state);
        }
    }

    #[test]
    fn test_press_and_release() {
        let mut tracker = KeyTracker::new(G19);
        tracker.packet_received_g_and_m(&GM_G1).unwrap();
        let evt = tracker.packet_received_g_and_m(&GM_IDLE).unwrap().unwrap();
        assert!(evt.released(Key::G1));
        assert!(tracker.state().keys_down().is_empty());
    }

    #[test]
    fn test_wrong_length_is_ignored() {
        let mut tracker = KeyTracker::new(G19);
        tracker.packet_received_g_and_m(&GM_G1).unwrap();
        let before = tracker.state().clone();

        assert_eq!(tracker.packet_received_g_and_m(&[0x02, 0x00]).unwrap(), None);
        assert_eq!(tracker.packet_received_menu(&[0x00, 0x80, 0x00]).unwrap(), None);
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_multimedia_wrong_length_is_error() {
        let mut tracker = KeyTracker::new(G19);
        assert!(tracker.packet_received_multimedia(&[0x01]).is_err());
    }

    #[test]
    fn test_decode_error_leaves_state() {
        let mut tracker = KeyTracker::new(G19);
        tracker.packet_received_g_and_m(&GM_G1).unwrap();
        assert!(tracker
            .packet_received_g_and_m(&[0x02, 0x00, 0x00, 0x50])
            .is_err());
        assert!(tracker.state().is_down(Key::G1));
    }

    #[test]
    fn test_multimedia_does_not_release_macro_keys() {
        let mut tracker = KeyTracker::new(G19);
        tracker.packet_received_g_and_m(&GM_G1).unwrap();
        let evt = tracker.packet_received_multimedia(&[0x01, 0x00]).unwrap();
        assert!(evt.is_empty());
        assert!(tracker.state().is_down(Key::G1));
    }

    #[test]
    fn test_mode_switch_separate_from_media_keys() {
        let mut tracker = KeyTracker::new(G19);
        let evt = tracker.packet_received_multimedia(&[0x03, 0x01]).unwrap();
        assert_eq!(evt.keys_down, keys(&[Key::WinkeySwitch]));

        // A media bit-field report does not cover the switch
        let evt = tracker.packet_received_multimedia(&[0x01, 0x08]).unwrap();
        assert_eq!(evt.keys_down, keys(&[Key::Play]));
        assert!(evt.keys_up.is_empty());

        let evt = tracker.packet_received_multimedia(&[0x03, 0x00]).unwrap();
        assert_eq!(evt.keys_up, keys(&[Key::WinkeySwitch]));
        assert!(tracker.state().is_down(Key::Play));

        // Releasing an already released switch is an empty event
        let evt = tracker.packet_received_multimedia(&[0x03, 0x00]).unwrap();
        assert!(evt.is_empty());
    }
}
