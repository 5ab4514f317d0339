use html::Id;
use thiserror::Error;

/// Construction-time failures of a single widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error("invalid embed source {src:?}: expected https://www.youtube.com/embed/<id>")]
    InvalidSource { src: String },
    #[error("invalid fallback markup: {0}")]
    InvalidMarkup(MarkupProblem),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupProblem {
    #[error("no src attribute and no <template> or <noscript> fallback block")]
    MissingFallback,
    #[error("fallback block has {0} children, expected exactly one")]
    ChildCount(usize),
    #[error("fallback child is {0}, expected <iframe>")]
    UnexpectedChild(String),
}

impl From<MarkupProblem> for EmbedError {
    fn from(problem: MarkupProblem) -> Self {
        EmbedError::InvalidMarkup(problem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no element with id {0:?} in the document")]
    UnknownElement(Id),
    #[error("element {0:?} is not detached")]
    NotDetached(Id),
    #[error("former parent of {0:?} is no longer in the document")]
    NoParent(Id),
    #[error("the document root cannot be detached")]
    RootDetach,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid widget config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0:?} is not a valid custom element name")]
    InvalidTagName(String),
}
