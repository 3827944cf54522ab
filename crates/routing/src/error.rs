#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no enabled deployment is configured")]
    NoDeployment,

    #[error("requested deployment \"{0}\" is not configured or not enabled")]
    UnknownDeployment(String),

    #[error("agent references endpoint \"{0}\" which is not configured")]
    UnknownEndpoint(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;
