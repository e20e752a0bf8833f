use std::fmt;

use storefront_cart::CartError;

#[derive(Debug)]
pub enum CliError {
    /// The server could not be reached or answered with something unreadable.
    Http(reqwest::Error),
    /// The server answered with an error body.
    Api { status: u16, message: String },
    Cart(CartError),
    Input(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Http(e) => write!(f, "request failed: {e}"),
            CliError::Api { status, message } => write!(f, "{message} (HTTP {status})"),
            CliError::Cart(e) => write!(f, "{e}"),
            CliError::Input(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Http(e) => Some(e),
            CliError::Cart(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        CliError::Http(err)
    }
}

impl From<CartError> for CliError {
    fn from(err: CartError) -> Self {
        CliError::Cart(err)
    }
}
