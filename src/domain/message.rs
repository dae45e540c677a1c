/// Switch carried by `SRMODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsPhase {
    Begin,
    End,
}

/// One decoded protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolMessage {
    /// `CL`
    Clear,
    /// `RH,title,event,round,heat`; the event code and round are not shown.
    Header { title: String, heat: String },
    /// `TM,text`
    Clock { text: String },
    /// `SRMODE,BEGIN|END`
    ResultsMode(ResultsPhase),
    /// `SR,place,name,mark`
    Result {
        place: String,
        name: String,
        mark: String,
    },
    /// `TX,text`
    Text { title: String },
    Unknown,
}

impl ProtocolMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            ProtocolMessage::Clear => "CL",
            ProtocolMessage::Header { .. } => "RH",
            ProtocolMessage::Clock { .. } => "TM",
            ProtocolMessage::ResultsMode(_) => "SRMODE",
            ProtocolMessage::Result { .. } => "SR",
            ProtocolMessage::Text { .. } => "TX",
            ProtocolMessage::Unknown => "?",
        }
    }
}
