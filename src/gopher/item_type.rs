use std::fmt;

/// The type tag of an item in a gopher menu
///
/// The protocol permits arbitrary type bytes. Only the ones the crawler acts
/// upon get their own variant; everything else is carried as `Other` so it
/// can still be handed to item actions unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// `1`: a menu that can be crawled
    Directory,
    /// `i`: informational text, not a reference
    InformationalMessage,
    /// `3`: error message, not a reference
    ErrorMessage,
    /// Any other type byte
    Other(u8),
}

impl ItemType {
    pub const DIRECTORY: u8 = b'1';
    pub const INFORMATIONAL_MESSAGE: u8 = b'i';
    pub const ERROR_MESSAGE: u8 = b'3';

    /// Maps a raw type byte to an item type
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::DIRECTORY => Self::Directory,
            Self::INFORMATIONAL_MESSAGE => Self::InformationalMessage,
            Self::ERROR_MESSAGE => Self::ErrorMessage,
            other => Self::Other(other),
        }
    }

    /// Returns the raw type byte
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Directory => Self::DIRECTORY,
            Self::InformationalMessage => Self::INFORMATIONAL_MESSAGE,
            Self::ErrorMessage => Self::ERROR_MESSAGE,
            Self::Other(byte) => *byte,
        }
    }

    /// Returns true for items that carry a reference to a resource, i.e.
    /// neither informational text nor error messages
    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::InformationalMessage | Self::ErrorMessage)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}
