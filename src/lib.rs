#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use wireform_serial as serial;
pub use wireform_utils as utils;
