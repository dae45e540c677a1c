use serde::{Deserialize, Serialize};

/// One finisher as sent by the timing console. All fields are display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub place: String,
    pub name: String,
    pub mark: String,
}

impl ResultEntry {
    pub fn new(
        place: impl Into<String>,
        name: impl Into<String>,
        mark: impl Into<String>,
    ) -> Self {
        Self {
            place: place.into(),
            name: name.into(),
            mark: mark.into(),
        }
    }

    /// Top line as laid out on the sign, e.g. `1 - Riley`.
    pub fn title_line(&self) -> String {
        format!("{} - {}", self.place, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayMode {
    #[default]
    Header,
    Results,
}

/// Read-only snapshot handed to a renderer on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Frame {
    Header {
        event: String,
        heat: String,
        clock: String,
    },
    Result(ResultEntry),
}

impl Frame {
    pub fn summary(&self) -> String {
        match self {
            Frame::Header { event, heat, clock } if heat.is_empty() => {
                format!("{} | {}", event, clock)
            }
            Frame::Header { event, heat, clock } => format!("{} | {} | {}", event, heat, clock),
            Frame::Result(entry) => format!("{}  {}", entry.title_line(), entry.mark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_summary_layouts() {
        let header = Frame::Header {
            event: "Boys 1600m".to_string(),
            heat: "Heat 1".to_string(),
            clock: "2:03.7".to_string(),
        };
        assert_eq!(header.summary(), "Boys 1600m | Heat 1 | 2:03.7");

        let no_heat = Frame::Header {
            event: "Girls 400m".to_string(),
            heat: String::new(),
            clock: "0:00".to_string(),
        };
        assert_eq!(no_heat.summary(), "Girls 400m | 0:00");

        let result = Frame::Result(ResultEntry::new("1", "Riley", "4:23.6"));
        assert_eq!(result.summary(), "1 - Riley  4:23.6");
    }

    #[test]
    fn test_frame_serializes_with_view_tag() {
        let frame = Frame::Result(ResultEntry::new("2", "Chen", "4:24.1"));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["view"], "result");
        assert_eq!(json["name"], "Chen");
    }
}
