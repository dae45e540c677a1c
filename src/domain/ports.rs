use crate::domain::model::Frame;
use std::time::Duration;

/// Lower bound on the render rate; slower requests are clamped up.
pub const MIN_FPS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Udp,
    Tcp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
        }
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Transport::Udp),
            "tcp" => Ok(Transport::Tcp),
            other => Err(format!("unknown transport '{}'", other)),
        }
    }
}

/// Runtime options the receiver core consumes.
pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn transport(&self) -> Transport;
    fn fps(&self) -> f64;
    fn result_rotate_secs(&self) -> f64;

    fn frame_interval(&self) -> Duration {
        let fps = if self.fps().is_finite() {
            self.fps().max(MIN_FPS)
        } else {
            MIN_FPS
        };
        Duration::from_secs_f64(1.0 / fps)
    }

    fn rotate_interval(&self) -> Duration {
        Duration::from_secs_f64(self.result_rotate_secs().max(0.0))
    }

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

/// The draw-current-state callback. Called once per scheduler tick.
pub trait Renderer: Send {
    fn render(&mut self, frame: &Frame);
}

impl<F> Renderer for F
where
    F: FnMut(&Frame) + Send,
{
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl ConfigProvider for Fixed {
        fn host(&self) -> &str {
            "127.0.0.1"
        }
        fn port(&self) -> u16 {
            5010
        }
        fn transport(&self) -> Transport {
            Transport::Udp
        }
        fn fps(&self) -> f64 {
            self.0
        }
        fn result_rotate_secs(&self) -> f64 {
            2.0
        }
    }

    #[test]
    fn test_frame_interval_clamps_to_min_fps() {
        assert_eq!(Fixed(20.0).frame_interval(), Duration::from_millis(50));
        assert_eq!(Fixed(1.0).frame_interval(), Duration::from_millis(200));
        assert_eq!(Fixed(f64::NAN).frame_interval(), Duration::from_millis(200));
        assert_eq!(Fixed(100.0).frame_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_transport_from_str() {
        assert_eq!("UDP".parse::<Transport>(), Ok(Transport::Udp));
        assert_eq!("tcp".parse::<Transport>(), Ok(Transport::Tcp));
        assert!("serial".parse::<Transport>().is_err());
    }
}
