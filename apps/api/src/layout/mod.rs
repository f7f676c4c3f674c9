// Customization resolver and preview renderer. Both are pure functions of the
// document and the options; nothing here touches I/O.

pub mod preview;
pub mod style;
