// Presentation layer - console front end for the preview binary
pub mod console;
