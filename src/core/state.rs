use crate::domain::message::{ProtocolMessage, ResultsPhase};
use crate::domain::model::{DisplayMode, Frame, ResultEntry};
use std::collections::VecDeque;

/// Most recent finishers kept for rotation.
pub const RESULTS_CAPACITY: usize = 16;
pub const DEFAULT_CLOCK: &str = "0:00";

/// What the sign should currently show. Owned and mutated by the scheduler only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    event: String,
    heat: String,
    clock: String,
    mode: DisplayMode,
    results: VecDeque<ResultEntry>,
    rotation_index: usize,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            event: String::new(),
            heat: String::new(),
            clock: DEFAULT_CLOCK.to_string(),
            mode: DisplayMode::Header,
            results: VecDeque::with_capacity(RESULTS_CAPACITY + 1),
            rotation_index: 0,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn heat(&self) -> &str {
        &self.heat
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn results(&self) -> impl ExactSizeIterator<Item = &ResultEntry> {
        self.results.iter()
    }

    pub fn results_len(&self) -> usize {
        self.results.len()
    }

    pub fn rotation_index(&self) -> usize {
        if self.results.is_empty() {
            0
        } else {
            self.rotation_index % self.results.len()
        }
    }

    /// Applies one message. Returns `true` if anything changed.
    pub fn apply(&mut self, message: &ProtocolMessage) -> bool {
        match message {
            ProtocolMessage::Clear => {
                let cleared = Self::new();
                let changed = *self != cleared;
                *self = cleared;
                changed
            }
            ProtocolMessage::Header { title, heat } => {
                let mut changed = replace(&mut self.event, title);
                changed |= replace(&mut self.heat, heat);
                changed |= replace(&mut self.clock, DEFAULT_CLOCK);
                changed | self.set_mode(DisplayMode::Header)
            }
            ProtocolMessage::Clock { text } => {
                // 計時中一律回到 header 畫面，即使正在輪播成績
                replace(&mut self.clock, text) | self.set_mode(DisplayMode::Header)
            }
            ProtocolMessage::ResultsMode(ResultsPhase::Begin) => {
                let changed = self.rotation_index != 0;
                self.rotation_index = 0;
                changed | self.set_mode(DisplayMode::Results)
            }
            ProtocolMessage::ResultsMode(ResultsPhase::End) => self.set_mode(DisplayMode::Header),
            ProtocolMessage::Result { place, name, mark } => {
                self.results
                    .push_back(ResultEntry::new(place.as_str(), name.as_str(), mark.as_str()));
                while self.results.len() > RESULTS_CAPACITY {
                    self.results.pop_front();
                }
                self.rotation_index %= self.results.len();
                self.mode = DisplayMode::Results;
                true
            }
            ProtocolMessage::Text { title } => {
                let changed = replace(&mut self.event, title) | !self.heat.is_empty();
                self.heat.clear();
                changed | self.set_mode(DisplayMode::Header)
            }
            ProtocolMessage::Unknown => false,
        }
    }

    fn set_mode(&mut self, mode: DisplayMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Moves to the next result, wrapping around. No-op without results.
    pub fn rotate(&mut self) {
        if !self.results.is_empty() {
            self.rotation_index = (self.rotation_index + 1) % self.results.len();
        }
    }

    /// True when a result rotation is actually on screen.
    pub fn is_rotating(&self) -> bool {
        self.mode == DisplayMode::Results && !self.results.is_empty()
    }

    pub fn frame(&self) -> Frame {
        if self.mode == DisplayMode::Results {
            if let Some(entry) = self.results.get(self.rotation_index()) {
                return Frame::Result(entry.clone());
            }
        }
        Frame::Header {
            event: self.event.clone(),
            heat: self.heat.clone(),
            clock: self.clock.clone(),
        }
    }
}

fn replace(field: &mut String, value: &str) -> bool {
    if field.as_str() == value {
        return false;
    }
    field.clear();
    field.push_str(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::decode;

    fn feed(state: &mut DisplayState, lines: &[&str]) {
        for line in lines {
            state.apply(&decode(line));
        }
    }

    fn result_msg(i: usize) -> ProtocolMessage {
        ProtocolMessage::Result {
            place: i.to_string(),
            name: format!("Runner{}", i),
            mark: format!("4:{:02}.0", i),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DisplayState::new();
        assert_eq!(state.event(), "");
        assert_eq!(state.heat(), "");
        assert_eq!(state.clock(), "0:00");
        assert_eq!(state.mode(), DisplayMode::Header);
        assert_eq!(state.results_len(), 0);
        assert_eq!(state.rotation_index(), 0);
    }

    #[test]
    fn test_header_then_clock_scenario() {
        let mut state = DisplayState::new();
        feed(
            &mut state,
            &[
                "CL",
                r#"RH,"Boys 1600m","Event 12","Round Final","Heat 1""#,
                "TM,2:03.7",
            ],
        );

        assert_eq!(state.event(), "Boys 1600m");
        assert_eq!(state.heat(), "Heat 1");
        assert_eq!(state.clock(), "2:03.7");
        assert_eq!(state.mode(), DisplayMode::Header);
    }

    #[test]
    fn test_results_scenario_and_rotation() {
        let mut state = DisplayState::new();
        feed(
            &mut state,
            &[
                "CL",
                r#"RH,"Boys 1600m","Event 12","Round Final","Heat 1""#,
                "TM,2:03.7",
                "SRMODE,BEGIN",
                r#"SR,1,"Riley","4:23.6""#,
                r#"SR,2,"Chen","4:24.1""#,
            ],
        );

        assert_eq!(state.mode(), DisplayMode::Results);
        let results: Vec<_> = state.results().cloned().collect();
        assert_eq!(
            results,
            vec![
                ResultEntry::new("1", "Riley", "4:23.6"),
                ResultEntry::new("2", "Chen", "4:24.1"),
            ]
        );
        assert_eq!(state.rotation_index(), 0);

        state.rotate();
        assert_eq!(state.rotation_index(), 1);
        state.rotate();
        assert_eq!(state.rotation_index(), 0);
    }

    #[test]
    fn test_rotation_index_is_k_mod_len() {
        let mut state = DisplayState::new();
        for i in 1..=5 {
            state.apply(&result_msg(i));
        }
        for k in 1..=23 {
            state.rotate();
            assert_eq!(state.rotation_index(), k % 5);
        }
    }

    #[test]
    fn test_results_window_keeps_last_sixteen() {
        let mut state = DisplayState::new();
        for i in 1..=17 {
            state.apply(&result_msg(i));
            assert!(state.results_len() <= RESULTS_CAPACITY);
        }

        let places: Vec<_> = state.results().map(|r| r.place.clone()).collect();
        let expected: Vec<_> = (2..=17).map(|i| i.to_string()).collect();
        assert_eq!(places, expected);
    }

    #[test]
    fn test_results_end_keeps_list_and_sr_resumes() {
        let mut state = DisplayState::new();
        feed(
            &mut state,
            &["SRMODE,BEGIN", r#"SR,1,"Riley","4:23.6""#, r#"SR,2,"Chen","4:24.1""#],
        );
        state.apply(&decode("SRMODE,END"));
        assert_eq!(state.mode(), DisplayMode::Header);
        assert_eq!(state.results_len(), 2);

        state.apply(&decode(r#"SR,3,"Okafor","4:25.0""#));
        assert_eq!(state.mode(), DisplayMode::Results);
        assert_eq!(state.results_len(), 3);
    }

    #[test]
    fn test_clock_interrupts_results() {
        let mut state = DisplayState::new();
        feed(&mut state, &["SRMODE,BEGIN", r#"SR,1,"Riley","4:23.6""#]);
        state.apply(&decode("TM,0:12.4"));
        assert_eq!(state.mode(), DisplayMode::Header);
        assert_eq!(state.results_len(), 1);
    }

    #[test]
    fn test_text_replaces_event_and_clears_heat() {
        let mut state = DisplayState::new();
        feed(
            &mut state,
            &[r#"RH,"Boys 1600m","Event 12","Round Final","Heat 1""#, r#"TX,"Awards at 3pm""#],
        );
        assert_eq!(state.event(), "Awards at 3pm");
        assert_eq!(state.heat(), "");
        assert_eq!(state.mode(), DisplayMode::Header);
    }

    #[test]
    fn test_clear_restores_initial_state() {
        let mut state = DisplayState::new();
        feed(
            &mut state,
            &[
                r#"RH,"Boys 1600m","Event 12","Round Final","Heat 1""#,
                "TM,1:00.0",
                r#"SR,1,"Riley","4:23.6""#,
                r#"SR,2,"Chen","4:24.1""#,
            ],
        );
        state.rotate();

        assert!(state.apply(&ProtocolMessage::Clear));
        assert_eq!(state, DisplayState::new());
    }

    #[test]
    fn test_apply_reports_only_real_changes() {
        let mut state = DisplayState::new();

        assert!(state.apply(&decode("TM,0:10.0")));
        assert!(!state.apply(&decode("TM,0:10.0")));
        assert!(!state.apply(&decode("SRMODE,END")));
        assert!(state.apply(&decode("SRMODE,BEGIN")));
        assert!(!state.apply(&decode("SRMODE,BEGIN")));
        assert!(state.apply(&decode(r#"TX,"Hurdles next""#)));
        assert!(!state.apply(&decode(r#"TX,"Hurdles next""#)));
        assert!(state.apply(&decode(r#"SR,1,"Riley","4:23.6""#)));
        assert!(state.apply(&ProtocolMessage::Clear));
        assert!(!state.apply(&ProtocolMessage::Clear));
    }

    #[test]
    fn test_unknown_never_changes_state() {
        let mut state = DisplayState::new();
        feed(&mut state, &[r#"SR,1,"Riley","4:23.6""#]);
        let before = state.clone();

        assert!(!state.apply(&ProtocolMessage::Unknown));
        assert!(!state.apply(&decode("NOPE,1,2,3")));
        assert_eq!(state, before);
    }

    #[test]
    fn test_frame_falls_back_to_header_without_results() {
        let mut state = DisplayState::new();
        state.apply(&decode("SRMODE,BEGIN"));
        assert_eq!(state.mode(), DisplayMode::Results);
        assert!(!state.is_rotating());
        assert_eq!(
            state.frame(),
            Frame::Header {
                event: String::new(),
                heat: String::new(),
                clock: "0:00".to_string(),
            }
        );

        state.apply(&decode(r#"SR,1,"Riley","4:23.6""#));
        assert_eq!(
            state.frame(),
            Frame::Result(ResultEntry::new("1", "Riley", "4:23.6"))
        );
    }
}
