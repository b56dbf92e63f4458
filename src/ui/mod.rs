pub mod frame;
pub mod glyph;
pub mod highlight;
pub mod span;
pub mod spinner;
pub mod style;
