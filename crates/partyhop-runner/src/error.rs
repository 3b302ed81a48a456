use std::path::PathBuf;

use partyhop_core::flow::FlowError;

/// Failure to read or parse a runner config file.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            },
            Self::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Failures surfaced by a running frame loop.
#[derive(Debug)]
pub enum LoopError {
    /// The loop task has already exited; commands can no longer be delivered.
    Closed,
    /// The loop task panicked.
    Panicked(String),
    /// The loop task was aborted before producing a summary.
    Aborted,
}

impl std::fmt::Display for LoopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "frame loop is no longer running"),
            Self::Panicked(msg) => write!(f, "frame loop panicked: {msg}"),
            Self::Aborted => write!(f, "frame loop was aborted"),
        }
    }
}

impl std::error::Error for LoopError {}

impl From<tokio::task::JoinError> for LoopError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            Self::Panicked(err.to_string())
        } else {
            Self::Aborted
        }
    }
}

/// Top-level error for a full run through the screen sequence.
#[derive(Debug)]
pub enum AppError {
    Flow(FlowError),
    Loop(LoopError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flow(e) => write!(f, "screen flow: {e}"),
            Self::Loop(e) => write!(f, "game loop: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Flow(e) => Some(e),
            Self::Loop(e) => Some(e),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        Self::Flow(e)
    }
}

impl From<LoopError> for AppError {
    fn from(e: LoopError) -> Self {
        Self::Loop(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partyhop_core::flow::Screen;

    #[test]
    fn loop_error_messages() {
        assert_eq!(LoopError::Closed.to_string(), "frame loop is no longer running");
        assert_eq!(LoopError::Aborted.to_string(), "frame loop was aborted");
    }

    #[test]
    fn app_error_wraps_flow_error() {
        let err: AppError = FlowError::NotAdvanceable(Screen::Game).into();
        assert!(err.to_string().starts_with("screen flow:"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn parse_error_names_the_file() {
        let source = toml::from_str::<toml::Table>("not = [valid").unwrap_err();
        let err = ConfigError::Parse {
            path: PathBuf::from("partyhop.toml"),
            source,
        };
        assert!(err.to_string().contains("partyhop.toml"));
    }
}
