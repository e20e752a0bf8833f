use std::fmt;

#[derive(Debug)]
pub enum CartError {
    /// The backing store could not be read or written.
    Storage(String),
    /// The stored cart is not a valid cart document.
    Corrupt(String),
    /// A line total or the subtotal does not fit a decimal. Carries the product id.
    Overflow(String),
}

impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartError::Storage(msg) => write!(f, "cart storage error: {msg}"),
            CartError::Corrupt(msg) => write!(f, "stored cart is unreadable: {msg}"),
            CartError::Overflow(id) => write!(f, "cart total is too large (line {id})"),
        }
    }
}

impl std::error::Error for CartError {}

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::Storage(err.to_string())
    }
}
