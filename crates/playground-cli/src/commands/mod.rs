pub mod cdn;
pub mod inspect;
pub mod preview;
pub mod reset;
pub mod share;
pub mod versions;

mod host;
