use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactsheetError {
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),
    #[error("Missing required argument '{argument}' for directive '{directive}'")]
    MissingArgument { directive: String, argument: String },
    #[error("Malformed directive span: {message}")]
    MalformedSpan { message: String, offset: usize },
    #[error("Actor not found: {0}")]
    ActorNotFound(String),
}

pub type Result<T> = std::result::Result<T, FactsheetError>;
