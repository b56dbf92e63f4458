pub mod backend;

pub use backend::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseKind, Terminal, TerminalEvent,
    TerminalSize,
};
