//! **Edit**or for Windows icon, cursor and version information **res**ources.
//!
//! Supports:
//! * Parsing and building `.ico`/`.cur` files
//! * Converting between icon files and `RT_GROUP_ICON`/`RT_GROUP_CURSOR` resources
//! * Parsing, editing and building `VS_VERSION_INFO` resources
//!
//! The codec works on byte buffers only. Reading and writing the resources of an executable
//! is left to a resource editor such as `editpe`, which supplies and stores the raw data.
//!
//! # Examples
//!
//! ### Icon to group conversion
//! ```
//! use editres::{IconGroup, IconImages};
//!
//! let data = std::fs::read(ICON_PATH)?;
//!
//! // parse the icon file
//! let mut images = IconImages::parse(&data)?;
//!
//! // assign the RT_ICON resource ids the images will be stored under
//! for (n, entry) in images.entries_mut().iter_mut().enumerate() {
//!     entry.set_id(Some(n as u16 + 1));
//! }
//!
//! // build the RT_GROUP_ICON resource referencing the images
//! let mut group = IconGroup::default();
//! group.build(&images)?;
//! let group_data = group.save()?;
//! ```
//!
//! ### Version information editing
//! ```
//! use editres::{constants::*, VersionInfo};
//!
//! // start from fresh version information
//! let mut info = VersionInfo::new(DEFAULT_LANGUAGE);
//!
//! // set the version and a string in the default string table
//! info.change_file_info("FileVersion", 0x0001_0002_0003_0004)?;
//! info.change_string(VS_PRODUCT_NAME, "Example", DEFAULT_LANGUAGE)?;
//!
//! // add a string table for another language
//! info.copy_language(DEFAULT_LANGUAGE, 0x041104b0)?;
//!
//! // build the RT_VERSION resource
//! let data = info.save()?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]

extern crate alloc;

pub(crate) mod blob;
pub(crate) mod errors;
pub(crate) mod icon;
pub(crate) mod util;
pub(crate) mod version;

pub mod constants;
pub mod types;

pub use crate::{errors::*, icon::*, version::*};
