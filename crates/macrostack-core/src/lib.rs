pub mod align;
pub mod consts;
pub mod error;
pub mod frame;
pub mod io;
pub mod parallel;
pub mod pipeline;
pub mod quality;
pub mod stack;
