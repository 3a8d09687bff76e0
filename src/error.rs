use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The controller answered with a non-success status.
    #[error("{message}")]
    Application { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Form input the operator has to correct before anything is sent.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl DashboardError {
    /// Text shown in the toast. Application errors carry the server's own
    /// message, everything else its display form.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Application { message, .. } => message.clone(),
            DashboardError::Transport(e) if e.is_timeout() => "Request timed out".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, DashboardError::Transport(_))
    }
}

impl From<&str> for DashboardError {
    fn from(error: &str) -> Self {
        DashboardError::Runtime(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
