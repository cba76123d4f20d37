//! Icon, bitmap and version resource data types.
//!
//! These types are a one-to-one mapping of the on-disk structures described in
//! <https://learn.microsoft.com/en-us/previous-versions/ms997538(v=msdn.10)> and
//! <https://learn.microsoft.com/en-us/windows/win32/menurc/version-information>.

use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::constants::*;

#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct IconDirectory {
    pub reserved: u16,
    pub type_:    u16,
    pub count:    u16,
}

/// Per-image icon header.
///
/// The last two words are the color planes and bits per pixel for icons,
/// and the hotspot coordinates for cursors. See [`IconHeader::fields`].
#[repr(C, packed(1))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct IconHeader {
    pub width:       u8,
    pub height:      u8,
    pub color_count: u8,
    pub reserved:    u8,
    pub planes_or_hotspot_x:    u16,
    pub bit_count_or_hotspot_y: u16,
}

/// Interpretation of the kind-dependent words of an [`IconHeader`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum IconHeaderFields {
    Icon { planes: u16, bit_count: u16 },
    Cursor { hotspot_x: u16, hotspot_y: u16 },
}

impl IconHeader {
    /// Returns the kind-dependent words interpreted for an icon or a cursor.
    pub fn fields(&self, cursor: bool) -> IconHeaderFields {
        if cursor {
            IconHeaderFields::Cursor {
                hotspot_x: self.planes_or_hotspot_x,
                hotspot_y: self.bit_count_or_hotspot_y,
            }
        } else {
            IconHeaderFields::Icon {
                planes:    self.planes_or_hotspot_x,
                bit_count: self.bit_count_or_hotspot_y,
            }
        }
    }

    pub fn set_fields(&mut self, fields: IconHeaderFields) {
        let (a, b) = match fields {
            IconHeaderFields::Icon { planes, bit_count } => (planes, bit_count),
            IconHeaderFields::Cursor {
                hotspot_x,
                hotspot_y,
            } => (hotspot_x, hotspot_y),
        };
        self.planes_or_hotspot_x = a;
        self.bit_count_or_hotspot_y = b;
    }

    /// Returns the width in pixels, resolving the stored 0 to 256.
    pub fn pixel_width(&self) -> u32 { if self.width == 0 { 256 } else { self.width as u32 } }

    /// Returns the height in pixels, resolving the stored 0 to 256.
    pub fn pixel_height(&self) -> u32 { if self.height == 0 { 256 } else { self.height as u32 } }
}

/// Icon directory entry of a standalone `.ico` or `.cur` file.
#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct IconDirectoryEntry {
    pub header: IconHeader,
    pub bytes:  u32,
    pub offset: u32,
}

/// Icon directory entry of a group icon resource.
#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct GroupIconDirectoryEntry {
    pub header: IconHeader,
    pub bytes:  u32,
    pub id:     u16,
}

#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct BitmapCoreHeader {
    pub size:      u32,
    pub width:     u16,
    pub height:    u16,
    pub planes:    u16,
    pub bit_count: u16,
}

#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct BitmapInfoHeader {
    pub size:             u32,
    pub width:            i32,
    pub height:           i32,
    pub planes:           u16,
    pub bit_count:        u16,
    pub compression:      u32,
    pub size_image:       u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used:         u32,
    pub clr_important:    u32,
}

#[repr(C, packed(4))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct FixedFileInfo {
    pub signature:          u32,
    pub struct_version:     u32,
    pub file_version_ms:    u32,
    pub file_version_ls:    u32,
    pub product_version_ms: u32,
    pub product_version_ls: u32,
    pub file_flags_mask:    u32,
    pub file_flags:         u32,
    pub file_os:            u32,
    pub file_type:          u32,
    pub file_subtype:       u32,
    pub file_date_ms:       u32,
    pub file_date_ls:       u32,
}
impl FixedFileInfo {
    /// Fixed file info of a freshly created version resource.
    pub fn inferred() -> Self {
        Self {
            signature: VS_FIXEDFILEINFO_SIGNATURE,
            file_flags_mask: VS_FFI_FILEFLAGSMASK,
            file_flags: VS_FF_INFOINFERRED,
            file_os: VOS_NT_WINDOWS32,
            ..Default::default()
        }
    }
}

#[repr(C, packed(2))]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, FromBytes, IntoBytes, Immutable, Default,
)]
pub struct VersionHeader {
    pub length:       u16,
    pub value_length: u16,
    pub type_:        u16,
}
