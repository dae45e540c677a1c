use crate::domain::model::Frame;
use crate::domain::ports::Renderer;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    #[default]
    Log,
    Json,
    None,
}

impl RenderTarget {
    pub const NAMES: [&'static str; 3] = ["log", "json", "none"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderTarget::Log => "log",
            RenderTarget::Json => "json",
            RenderTarget::None => "none",
        }
    }
}

impl std::str::FromStr for RenderTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "log" => Ok(RenderTarget::Log),
            "json" => Ok(RenderTarget::Json),
            "none" => Ok(RenderTarget::None),
            other => Err(format!("unknown renderer '{}'", other)),
        }
    }
}

/// Logs the sign contents whenever they change.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Option<Frame>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame) {
        if self.last.as_ref() != Some(frame) {
            tracing::info!("🏁 {}", frame.summary());
            self.last = Some(frame.clone());
        }
    }
}

/// Writes each changed frame as one JSON line, for a separate panel driver
/// reading from a pipe.
pub struct JsonRenderer<W: Write + Send> {
    out: W,
    last: Option<Frame>,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &Frame) -> crate::utils::error::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Renderer for JsonRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        if self.last.as_ref() == Some(frame) {
            return;
        }
        match self.write_frame(frame) {
            Ok(()) => self.last = Some(frame.clone()),
            Err(e) => tracing::warn!("Failed to write frame: {}", e),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ResultEntry;

    #[test]
    fn test_json_renderer_writes_only_changes() {
        let mut renderer = JsonRenderer::new(Vec::new());
        let header = Frame::Header {
            event: "Boys 1600m".to_string(),
            heat: "Heat 1".to_string(),
            clock: "0:00".to_string(),
        };
        let result = Frame::Result(ResultEntry::new("1", "Riley", "4:23.6"));

        renderer.render(&header);
        renderer.render(&header);
        renderer.render(&result);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["view"], "header");
        assert_eq!(first["clock"], "0:00");
        let second: Frame = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, result);
    }

    #[test]
    fn test_render_target_from_str() {
        assert_eq!("JSON".parse::<RenderTarget>(), Ok(RenderTarget::Json));
        assert_eq!("none".parse::<RenderTarget>(), Ok(RenderTarget::None));
        assert!("led".parse::<RenderTarget>().is_err());
    }
}
