pub mod ascii;
pub mod cli;
pub mod error;
pub mod glyphs;
pub mod packager;
pub mod pipeline;
pub mod player;
pub mod script;
pub mod template;
pub mod video;
