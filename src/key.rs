/// Key codes recognized by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Backspace,
    Cancel,
    Newline,
    Space,
    /// Printable ASCII other than space
    Char(u8),
    /// Any other control or non-ASCII byte
    Other,
}

pub const BACKSPACE: u8 = 0x08;
pub const DELETE: u8 = 0x7F;
pub const CTRL_C: u8 = 0x03;

impl Key {
    /// Classify a single input byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'\r' | b'\n' => Key::Newline,
            BACKSPACE | DELETE => Key::Backspace,
            CTRL_C => Key::Cancel,
            b' ' => Key::Space,
            0x21..=0x7E => Key::Char(byte),
            _ => Key::Other,
        }
    }

    /// The byte this key was decoded from, if it can be stored in a text buffer
    pub fn printable(self) -> Option<u8> {
        match self {
            Key::Space => Some(b' '),
            Key::Char(byte) => Some(byte),
            _ => None,
        }
    }
}
