//! Icon and cursor resources.
//!
//! [`IconImages`] is the standalone `.ico`/`.cur` file form, carrying every image inline.
//! [`IconGroup`] is the `RT_GROUP_ICON`/`RT_GROUP_CURSOR` form embedded in executables,
//! where each entry references a separately stored `RT_ICON`/`RT_CURSOR` resource by id.
//! See <https://learn.microsoft.com/en-us/previous-versions/ms997538(v=msdn.10)> for more information.

use alloc::{format, vec::Vec};
use core::mem::size_of;

use debug_ignore::DebugIgnore;
use log::{debug, error, trace, warn};
use zerocopy::IntoBytes;

use crate::{constants::*, errors::*, types::*, util::*};


/// Kind of images stored in an icon directory.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum IconKind {
    #[default]
    Icon,
    Cursor,
}
impl From<IconKind> for u16 {
    fn from(kind: IconKind) -> Self {
        match kind {
            IconKind::Icon => ICON_DIRECTORY_TYPE_ICON,
            IconKind::Cursor => ICON_DIRECTORY_TYPE_CURSOR,
        }
    }
}

fn entry_count(count: usize) -> Result<u16, IconError> {
    u16::try_from(count).map_err(|_| IconError::TooLarge("entry count".into(), count))
}

fn image_size(index: usize, size: usize) -> Result<u32, IconError> {
    u32::try_from(size).map_err(|_| IconError::TooLarge(format!("image {} size", index), size))
}

/// Reads and validates the directory and its entry table.
fn parse_directory<T: zerocopy::FromBytes + Copy>(
    data: &[u8],
) -> Result<(IconDirectory, Vec<T>), IconError> {
    let directory = read::<IconDirectory>(data)?;
    debug!("{:#x?}", directory);

    let (reserved, type_, count) = (directory.reserved, directory.type_, directory.count);
    if reserved != 0 {
        return Err(IconError::InvalidDirectory(format!("reserved field is {}", reserved)));
    }
    if type_ != ICON_DIRECTORY_TYPE_ICON && type_ != ICON_DIRECTORY_TYPE_CURSOR {
        return Err(IconError::InvalidDirectory(format!("unknown type {}", type_)));
    }
    if count == 0 {
        return Err(IconError::InvalidDirectory("no entries".into()));
    }
    let table_offset = size_of::<IconDirectory>();
    let table_size = count as usize * size_of::<T>();
    if data.len() - table_offset < table_size {
        return Err(IconError::InvalidDirectory(format!(
            "{} entries do not fit in {} bytes",
            count,
            data.len()
        )));
    }

    let entries = (0..count as usize)
        .map(|n| read::<T>(&data[table_offset + n * size_of::<T>()..]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((directory, entries))
}


/// Image data in an icon image container.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct IconEntry {
    pub(crate) entry: IconDirectoryEntry,
    pub(crate) image: DebugIgnore<Vec<u8>>,
    pub(crate) id:    Option<u16>,
}
impl IconEntry {
    /// Create an entry from a header, the raw image data and an optional resource id.
    pub fn new(header: IconHeader, image: Vec<u8>, id: Option<u16>) -> Self {
        Self {
            entry: IconDirectoryEntry {
                header,
                bytes: u32::try_from(image.len()).unwrap_or(u32::MAX),
                offset: 0,
            },
            image: image.into(),
            id,
        }
    }

    /// Returns the stored header, without inspecting the image data.
    pub fn header(&self) -> IconHeader { self.entry.header }

    /// Set the stored header.
    pub fn set_header(&mut self, header: IconHeader) { self.entry.header = header; }

    /// Returns the stored directory entry as read from the source.
    pub fn directory_entry(&self) -> IconDirectoryEntry { self.entry }

    /// Returns the raw image data, either PNG or a headerless DIB.
    pub fn image(&self) -> &[u8] { &self.image }

    /// Set the raw image data.
    pub fn set_image(&mut self, image: Vec<u8>) {
        self.entry.bytes = u32::try_from(image.len()).unwrap_or(u32::MAX);
        self.image = image.into();
    }

    /// Returns the resource id used to correlate the image with a group entry.
    pub fn id(&self) -> Option<u16> { self.id }

    /// Set the resource id used to correlate the image with a group entry.
    pub fn set_id(&mut self, id: Option<u16>) { self.id = id; }

    /// Returns the directory entry with size and format fields taken from the image data where possible.
    fn sniffed(&self, cursor: bool) -> IconDirectoryEntry {
        let mut entry = self.entry;
        let mut header = entry.header;
        if let Some(info) = ImageInfo::png(&self.image) {
            trace!("png image {:?}", info);
            if info.width < 256 && info.height < 256 {
                header.width = info.width as u8;
                header.height = info.height as u8;
            } else {
                header.width = 0;
                header.height = 0;
            }
            header.color_count = 0;
            header.reserved = 0;
            if !cursor {
                header.set_fields(IconHeaderFields::Icon {
                    planes:    info.planes,
                    bit_count: info.bit_count,
                });
            }
        } else if let Some(info) = ImageInfo::bmp(&self.image) {
            trace!("bmp image {:?}", info);
            // out of range sizes keep the stored values
            if info.width < 256 && info.height < 256 {
                header.width = info.width as u8;
                header.height = info.height as u8;
            }
            if !cursor {
                header.set_fields(IconHeaderFields::Icon {
                    planes:    info.planes,
                    bit_count: info.bit_count,
                });
            }
        }
        entry.header = header;
        entry
    }
}

/// Size and format information read from image data.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct ImageInfo {
    width:     u32,
    height:    u32,
    planes:    u16,
    bit_count: u16,
}
impl ImageInfo {
    fn png(image: &[u8]) -> Option<Self> {
        // signature, IHDR chunk length and type, IHDR data
        if image.len() < 8 + 8 + PNG_IHDR_LENGTH as usize
            || image[0..8] != PNG_SIGNATURE
            || read_u32_be(&image[8..]).ok()? != PNG_IHDR_LENGTH
            || image[12..16] != PNG_IHDR_TYPE
        {
            return None;
        }
        let color_type = image[25];
        let bit_count = if color_type & PNG_COLOR_TYPE_ALPHA != 0 {
            32
        } else if color_type & PNG_COLOR_TYPE_COLOR != 0 {
            24
        } else {
            image[24] as u16
        };
        Some(Self {
            width: read_u32_be(&image[16..]).ok()?,
            height: read_u32_be(&image[20..]).ok()?,
            planes: 1,
            bit_count,
        })
    }

    fn bmp(image: &[u8]) -> Option<Self> {
        let size = read::<u32>(image).ok()?;
        if size == BITMAP_CORE_HEADER_SIZE {
            let core = read::<BitmapCoreHeader>(image).ok()?;
            Some(Self {
                width:     core.width as u32,
                height:    core.height as u32,
                planes:    core.planes,
                bit_count: core.bit_count,
            })
        } else if size >= BITMAP_INFO_HEADER_SIZE {
            let info = read::<BitmapInfoHeader>(image).ok()?;
            Some(Self {
                width:     info.width as u32,
                height:    info.height as u32,
                planes:    info.planes,
                bit_count: info.bit_count,
            })
        } else {
            None
        }
    }
}


/// Icon or cursor image container in the standalone `.ico`/`.cur` file format.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct IconImages {
    pub(crate) directory: IconDirectory,
    pub(crate) entries:   Vec<IconEntry>,
}
impl IconImages {
    /// Create an empty container of the given kind.
    pub fn new(kind: IconKind) -> Self {
        Self {
            directory: IconDirectory {
                reserved: 0,
                type_:    kind.into(),
                count:    0,
            },
            entries:   Vec::new(),
        }
    }

    /// Parse an icon or cursor file.
    ///
    /// # Returns
    /// Returns an error if the directory is invalid or an image points outside the data.
    pub fn parse(data: &[u8]) -> Result<Self, IconError> {
        let (directory, table) = parse_directory::<IconDirectoryEntry>(data)?;
        let mut entries = Vec::with_capacity(table.len());
        for (n, entry) in table.into_iter().enumerate() {
            trace!("{:#x?}", entry);
            let (offset, bytes) = (entry.offset as u64, entry.bytes as u64);
            if offset + bytes > data.len() as u64 {
                error!(
                    "image {} at {:#x?} with size {:#x?} outside valid range ({:#x?})",
                    n,
                    offset,
                    bytes,
                    data.len()
                );
                return Err(IconError::InvalidRange(n, offset + bytes, data.len() as u64));
            }
            entries.push(IconEntry {
                entry,
                image: data[offset as usize..(offset + bytes) as usize].to_vec().into(),
                id: None,
            });
        }
        Ok(Self { directory, entries })
    }

    /// Replace the contents with the parsed icon or cursor file.
    /// The container is left empty if parsing fails.
    pub fn load(&mut self, data: &[u8]) -> Result<(), IconError> {
        match Self::parse(data) {
            Ok(images) => {
                *self = images;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Build the container into the raw bytes of an icon or cursor file.
    /// Images are laid out contiguously after the entry table, in entry order.
    ///
    /// # Returns
    /// Returns an error if the entry count, an image size or an image offset does not fit the format.
    pub fn save(&self) -> Result<Vec<u8>, IconError> {
        let table_size =
            size_of::<IconDirectory>() + size_of::<IconDirectoryEntry>() * self.entries.len();
        let images_size = self.entries.iter().map(|entry| entry.image.len()).sum::<usize>();

        let directory = IconDirectory {
            count: entry_count(self.entries.len())?,
            ..self.directory
        };
        let mut data = Vec::with_capacity(table_size + images_size);
        data.extend_from_slice(directory.as_bytes());

        let mut offset = table_size;
        for (n, entry) in self.entries.iter().enumerate() {
            let entry = IconDirectoryEntry {
                header: entry.entry.header,
                bytes:  image_size(n, entry.image.len())?,
                offset: u32::try_from(offset)
                    .map_err(|_| IconError::TooLarge(format!("image {} offset", n), offset))?,
            };
            data.extend_from_slice(entry.as_bytes());
            offset += entry.bytes as usize;
        }
        for entry in &self.entries {
            data.extend_from_slice(&entry.image);
        }
        Ok(data)
    }

    /// Replace the contents with entries produced by the given producers.
    /// If any producer fails, the container is left empty and the error is returned.
    pub fn build<I>(&mut self, kind: IconKind, producers: I) -> Result<(), IconError>
    where
        I: IntoIterator<Item = Result<IconEntry, IconError>>,
    {
        self.clear();
        let entries = producers
            .into_iter()
            .enumerate()
            .map(|(n, entry)| -> Result<IconEntry, IconError> {
                let mut entry = entry.map_err(|err| {
                    warn!("failed to produce image {}: {:?}", n, err);
                    err
                })?;
                entry.entry.bytes = image_size(n, entry.image.len())?;
                entry.entry.offset = 0;
                Ok(entry)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.directory = IconDirectory {
            reserved: 0,
            type_:    kind.into(),
            count:    entry_count(entries.len())?,
        };
        self.entries = entries;
        Ok(())
    }

    /// Build an icon from an image, with one PNG encoded entry per requested size.
    /// Entries are assigned resource ids starting at 1.
    #[cfg(feature = "images")]
    pub fn from_image(image: &image::DynamicImage, sizes: &[u32]) -> Result<Self, IconError> {
        use image::{codecs::png::PngEncoder, imageops::FilterType};

        // ids start at 1, so the last id has to fit as well
        entry_count(sizes.len())?;
        let mut images = Self::default();
        images.build(
            IconKind::Icon,
            sizes.iter().enumerate().map(|(n, &size)| -> Result<IconEntry, IconError> {
                let id = u16::try_from(n + 1)
                    .map_err(|_| IconError::TooLarge("resource id".into(), n + 1))?;
                let resized = image.resize_exact(size, size, FilterType::Lanczos3);
                let mut data = Vec::new();
                resized.write_with_encoder(PngEncoder::new(&mut data))?;
                let mut entry = IconEntry::new(IconHeader::default(), data, Some(id));
                entry.set_header(entry.sniffed(false).header);
                Ok(entry)
            }),
        )?;
        Ok(images)
    }

    /// Remove all entries and reset the directory.
    pub fn clear(&mut self) {
        self.directory = IconDirectory::default();
        self.entries.clear();
    }

    /// Returns the directory header.
    pub fn directory(&self) -> IconDirectory { self.directory }

    /// Returns the kind of images in the container.
    pub fn kind(&self) -> IconKind {
        if self.is_cursor() {
            IconKind::Cursor
        } else {
            IconKind::Icon
        }
    }

    pub fn is_cursor(&self) -> bool { self.directory.type_ == ICON_DIRECTORY_TYPE_CURSOR }

    /// Convert the container to a cursor or an icon.
    /// Converting resets the hotspot (or planes and bit count) of every entry to 0.
    pub fn set_cursor(&mut self, cursor: bool) {
        if cursor != self.is_cursor() {
            self.reset_hot_spots(if cursor { IconKind::Cursor } else { IconKind::Icon });
        }
    }

    fn reset_hot_spots(&mut self, kind: IconKind) {
        self.directory.type_ = kind.into();
        for entry in &mut self.entries {
            let mut header = entry.entry.header;
            header.set_fields(IconHeaderFields::Cursor {
                hotspot_x: 0,
                hotspot_y: 0,
            });
            entry.entry.header = header;
        }
    }

    /// Returns the number of images.
    pub fn count(&self) -> usize { self.entries.len() }

    pub fn entries(&self) -> &[IconEntry] { &self.entries }

    pub fn entries_mut(&mut self) -> &mut [IconEntry] { &mut self.entries }

    pub fn entry(&self, index: usize) -> Option<&IconEntry> { self.entries.get(index) }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut IconEntry> {
        self.entries.get_mut(index)
    }

    /// Returns the directory entry of an image to be written to disk or into a group.
    /// Size, planes and bit count are taken from the PNG or bitmap header of the image data
    /// where it can be read, and from the stored header otherwise.
    pub fn icon(&self, index: usize) -> Option<IconDirectoryEntry> {
        self.entries.get(index).map(|entry| entry.sniffed(self.is_cursor()))
    }

    /// Returns the hotspot of a cursor image, or `None` for icons.
    pub fn hot_spot(&self, index: usize) -> Option<(u16, u16)> {
        if !self.is_cursor() {
            return None;
        }
        let header = self.entries.get(index)?.entry.header;
        match header.fields(true) {
            IconHeaderFields::Cursor {
                hotspot_x,
                hotspot_y,
            } => Some((hotspot_x, hotspot_y)),
            IconHeaderFields::Icon { .. } => None,
        }
    }

    /// Set the hotspot of an image.
    /// An icon container is converted to a cursor container first.
    pub fn set_hot_spot(&mut self, index: usize, x: u16, y: u16) -> Result<(), IconError> {
        if !self.is_cursor() {
            self.reset_hot_spots(IconKind::Cursor);
        }
        let entry = self.entries.get_mut(index).ok_or(IconError::InvalidIndex(index))?;
        let mut header = entry.entry.header;
        header.set_fields(IconHeaderFields::Cursor {
            hotspot_x: x,
            hotspot_y: y,
        });
        entry.entry.header = header;
        Ok(())
    }
}


/// Icon or cursor group container in the `RT_GROUP_ICON`/`RT_GROUP_CURSOR` resource format.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct IconGroup {
    pub(crate) directory: IconDirectory,
    pub(crate) entries:   Vec<GroupIconDirectoryEntry>,
}
impl IconGroup {
    /// Parse a group icon or group cursor resource.
    pub fn parse(data: &[u8]) -> Result<Self, IconError> {
        let (directory, entries) = parse_directory::<GroupIconDirectoryEntry>(data)?;
        trace!("{:#x?}", entries);
        Ok(Self { directory, entries })
    }

    /// Replace the contents with the parsed group resource.
    /// The container is left empty if parsing fails.
    pub fn load(&mut self, data: &[u8]) -> Result<(), IconError> {
        match Self::parse(data) {
            Ok(group) => {
                *self = group;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Build the container into the raw bytes of a group resource.
    ///
    /// # Returns
    /// Returns an error if the entry count does not fit the format.
    pub fn save(&self) -> Result<Vec<u8>, IconError> {
        let directory = IconDirectory {
            count: entry_count(self.entries.len())?,
            ..self.directory
        };
        let mut data = Vec::with_capacity(
            size_of::<IconDirectory>() + size_of::<GroupIconDirectoryEntry>() * self.entries.len(),
        );
        data.extend_from_slice(directory.as_bytes());
        for entry in &self.entries {
            data.extend_from_slice(entry.as_bytes());
        }
        Ok(data)
    }

    /// Replace the contents with the entries of an image container.
    /// Every image needs a resource id; the container is left empty otherwise.
    pub fn build(&mut self, images: &IconImages) -> Result<(), IconError> {
        self.clear();
        let entries = (0..images.count())
            .map(|n| -> Result<GroupIconDirectoryEntry, IconError> {
                let icon = images.icon(n).ok_or(IconError::InvalidIndex(n))?;
                let id = images.entries[n].id.ok_or_else(|| {
                    warn!("image {} has no resource id", n);
                    IconError::MissingId(n)
                })?;
                Ok(GroupIconDirectoryEntry {
                    header: icon.header,
                    bytes: image_size(n, images.entries[n].image.len())?,
                    id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.directory = IconDirectory {
            count: entry_count(entries.len())?,
            ..images.directory
        };
        self.entries = entries;
        Ok(())
    }

    /// Create an image container from the group, fetching each image through `lookup`,
    /// which is called with the entry index and its resource id.
    ///
    /// # Returns
    /// Returns an error if `lookup` does not return an image for an entry.
    pub fn extract<F>(&self, mut lookup: F) -> Result<IconImages, IconError>
    where
        F: FnMut(usize, u16) -> Option<Vec<u8>>,
    {
        let mut images = IconImages::default();
        images.build(
            self.kind(),
            self.entries.iter().enumerate().map(|(n, entry)| -> Result<IconEntry, IconError> {
                let id = entry.id;
                let image = lookup(n, id).ok_or(IconError::MissingImage(n, id))?;
                Ok(IconEntry::new(entry.header, image, Some(id)))
            }),
        )?;
        Ok(images)
    }

    /// Create an image container with the headers and ids of the group and empty images.
    pub fn extract_headers(&self) -> IconImages {
        IconImages {
            directory: self.directory,
            entries:   self
                .entries
                .iter()
                .map(|entry| IconEntry::new(entry.header, Vec::new(), Some(entry.id)))
                .collect(),
        }
    }

    /// Remove all entries and reset the directory.
    pub fn clear(&mut self) {
        self.directory = IconDirectory::default();
        self.entries.clear();
    }

    /// Returns the directory header.
    pub fn directory(&self) -> IconDirectory { self.directory }

    pub fn kind(&self) -> IconKind {
        if self.is_cursor() {
            IconKind::Cursor
        } else {
            IconKind::Icon
        }
    }

    pub fn is_cursor(&self) -> bool { self.directory.type_ == ICON_DIRECTORY_TYPE_CURSOR }

    /// Returns the number of entries.
    pub fn count(&self) -> usize { self.entries.len() }

    pub fn entries(&self) -> &[GroupIconDirectoryEntry] { &self.entries }

    /// Returns the resource id of an entry.
    pub fn id(&self, index: usize) -> Option<u16> { self.entries.get(index).map(|entry| entry.id) }

    /// Set the resource id of an entry.
    pub fn set_id(&mut self, index: usize, id: u16) -> Result<(), IconError> {
        let entry = self.entries.get_mut(index).ok_or(IconError::InvalidIndex(index))?;
        entry.id = id;
        Ok(())
    }
}
