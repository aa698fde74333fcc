#![no_std]

#[cfg(test)]
extern crate std;

mod error;

pub mod burst;
pub mod config;
pub mod decode;
pub mod device;
pub mod frame;
pub mod interface;
pub mod params;
pub mod profile;
pub mod regio;
pub mod registers;

#[cfg(test)]
mod testutil;

pub use crate::burst::MotionSample;
pub use crate::device::Adns;
pub use crate::error::{Error, Result};
pub use crate::frame::PixelFrame;
