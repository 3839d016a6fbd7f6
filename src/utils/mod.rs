//! Utility modules shared by the correction loop, the generator and the binary

pub mod logging;
