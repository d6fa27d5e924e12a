pub mod gemini;
pub mod mock;

use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    Configuration(String),
    Transport(String),
    InvalidResponse(String),
    Other(String),
}

impl GatewayError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        GatewayError::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        GatewayError::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        GatewayError::InvalidResponse(msg.into())
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Configuration(msg)
            | GatewayError::Transport(msg)
            | GatewayError::InvalidResponse(msg)
            | GatewayError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}
