//! Static content revealed once the boot completes.

use unicode_width::UnicodeWidthStr;

pub const LOGO: &[&str] = &[
    r" _   _ _____ ___  _   _    ____ ___  ____  _____ ",
    r"| \ | | ____/ _ \| \ | |  / ___/ _ \|  _ \| ____|",
    r"|  \| |  _|| | | |  \| | | |  | | | | |_) |  _|  ",
    r"| |\  | |__| |_| | |\  | | |__| |_| |  _ <| |___ ",
    r"|_| \_|_____\___/|_| \_|  \____\___/|_| \_\_____|",
];

pub const MAIN_CONTENT: &[&str] = &[
    "SESSION ESTABLISHED // NEON_CORE v0.9.5",
    "",
    "Welcome back, runner. The grid is yours.",
];

/// Display width of the widest logo row.
#[must_use]
pub fn logo_width() -> u16 {
    LOGO.iter()
        .map(|row| UnicodeWidthStr::width(*row))
        .max()
        .unwrap_or(0) as u16
}
