//! Version information resource.
//!
//! A `VS_VERSION_INFO` resource is a tree of nodes sharing one layout: a length, a value length,
//! a type, a zero-terminated UTF-16 key padded to 4 bytes, then either a value or child nodes,
//! each child starting on a 4-byte boundary.
//! See <https://learn.microsoft.com/en-us/windows/win32/menurc/version-information> for more information.
//!
//! Saving runs the same traversal twice: first against a [`BlobSizer`] with `update` set,
//! which stores the measured length of every node in its header, then against a
//! [`BlobWriter`], which emits the headers as they are. The output never has to be patched.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::mem::size_of;

use debug_ignore::DebugIgnore;
use log::{debug, trace, warn};
use zerocopy::IntoBytes;

use crate::{blob::*, constants::*, errors::*, types::*};


/// Language and code page pair identifying a string table and a translation entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Translation {
    pub language: u16,
    pub codepage: u16,
}
impl Translation {
    pub const fn new(language: u16, codepage: u16) -> Self { Self { language, codepage } }

    /// Returns the string table key, the pair as 8 lowercase hex digits.
    pub fn tag(&self) -> String { format!("{:08x}", u32::from(*self)) }

    /// Parse a string table key. Hex digits are accepted in either case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.len() != 8 || !tag.bytes().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(tag, 16).ok().map(Self::from)
    }
}
impl From<u32> for Translation {
    fn from(value: u32) -> Self { Self::new((value >> 16) as u16, value as u16) }
}
impl From<Translation> for u32 {
    fn from(value: Translation) -> Self { ((value.language as u32) << 16) | value.codepage as u32 }
}


/// Fields shared by every node.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub(crate) struct NodeHead {
    pub(crate) header: VersionHeader,
    pub(crate) key:    String,
}
impl NodeHead {
    fn new<S: Into<String>>(type_: u16, key: S) -> Self {
        Self {
            header: VersionHeader {
                length: 0,
                value_length: 0,
                type_,
            },
            key:    key.into(),
        }
    }

    /// Read the header and key.
    ///
    /// # Returns
    /// The head and the number of bytes consumed up to the 4-byte aligned end of the key.
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let header = reader.read::<VersionHeader>(range.begin, range)?;
        let mut pos = Range::new(range.begin + size_of::<VersionHeader>(), range.end);
        let (key, step) = reader.string(pos)?;
        pos.begin += step;
        reader.align(&mut pos)?;
        trace!("{:#x?}: {:?} {:#x?}", range.begin, key, header);
        Ok((Self { header, key }, pos.begin - range.begin))
    }

    /// Returns the range from `begin` to the declared end of the node.
    fn value_range(&self, begin: usize, range: Range) -> Result<Range, VersionError> {
        let length = self.header.length as usize;
        let end = range.begin + length;
        if end > range.end {
            return Err(VersionError::InvalidLength(
                self.key.clone(),
                length,
                range.end - range.begin,
            ));
        }
        Ok(Range::new(begin, end))
    }

    /// Check that the node consumed exactly its declared length.
    fn finish(&self, pos: Range, range: Range) -> Result<usize, VersionError> {
        let step = pos.begin - range.begin;
        let length = self.header.length as usize;
        if step != length {
            return Err(VersionError::InvalidLength(self.key.clone(), length, step));
        }
        Ok(step)
    }

    fn set_value_length(&mut self, value_length: usize) -> Result<(), VersionError> {
        self.header.value_length = u16::try_from(value_length)
            .map_err(|_| VersionError::TooLarge(self.key.clone(), value_length))?;
        Ok(())
    }

    /// Write the head followed by the node body.
    /// With `update`, the length of head and body is stored in the header afterwards.
    fn save<S, F>(&mut self, sink: &mut S, update: bool, body: F) -> Result<(), VersionError>
    where
        S: BlobSink,
        F: FnOnce(&mut S) -> Result<(), VersionError>,
    {
        let start = sink.position();
        sink.append(self.header.as_bytes());
        sink.append_string(&self.key);
        sink.padding();
        body(sink)?;
        if update {
            let length = sink.position() - start;
            self.header.length = u16::try_from(length)
                .map_err(|_| VersionError::TooLarge(self.key.clone(), length))?;
        }
        Ok(())
    }
}

/// Node of the version information tree.
pub(crate) trait VersionNode: Sized {
    /// Parse the node at the start of `range`.
    ///
    /// # Returns
    /// The node and the number of bytes it spans.
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError>;

    /// Write the node, storing the written length in the node when `update` is set.
    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError>;
}

fn load_children<V: VersionNode>(
    reader: &BlobReader, pos: &mut Range,
) -> Result<Vec<V>, VersionError> {
    let mut children = Vec::new();
    while pos.begin < pos.end {
        reader.align(pos)?;
        // trailing padding of the last child
        if pos.begin == pos.end {
            break;
        }
        let (child, step) = V::load(reader, *pos)?;
        children.push(child);
        pos.begin += step;
    }
    Ok(children)
}

fn save_children<V: VersionNode, S: BlobSink>(
    children: &mut [V], sink: &mut S, update: bool,
) -> Result<(), VersionError> {
    for child in children {
        sink.padding();
        child.save(sink, update)?;
    }
    Ok(())
}


/// String in a string table.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct StringEntry {
    pub(crate) head:  NodeHead,
    pub(crate) value: String,
}
impl StringEntry {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            head:  NodeHead::new(VS_TYPE_TEXT, key),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str { &self.head.key }

    pub fn value(&self) -> &str { &self.value }

    pub fn header(&self) -> VersionHeader { self.head.header }
}
impl VersionNode for StringEntry {
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let (head, step) = NodeHead::load(reader, range)?;
        let mut pos = head.value_range(range.begin + step, range)?;
        let value = if head.header.value_length > 0 {
            let (value, step) = reader.string(pos)?;
            pos.begin += step;
            value
        } else {
            String::new()
        };
        let step = head.finish(pos, range)?;
        Ok((Self { head, value }, step))
    }

    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError> {
        if update {
            // counted in characters including the terminator
            self.head.set_value_length(self.value.encode_utf16().count() + 1)?;
        }
        let value = &self.value;
        self.head.save(sink, update, |sink| {
            sink.append_string(value);
            Ok(())
        })
    }
}


/// Table of strings for one language and code page, keyed by [`Translation::tag`].
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct StringTable {
    pub(crate) head:     NodeHead,
    pub(crate) children: Vec<StringEntry>,
}
impl StringTable {
    pub fn new(translation: Translation) -> Self {
        Self {
            head:     NodeHead::new(VS_TYPE_TEXT, translation.tag()),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str { &self.head.key }

    /// Returns the language and code page of the table, if the key is a valid tag.
    pub fn translation(&self) -> Option<Translation> { Translation::from_tag(&self.head.key) }

    pub fn header(&self) -> VersionHeader { self.head.header }

    pub fn entries(&self) -> &[StringEntry] { &self.children }

    /// Returns the value of the string with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.children.iter().find(|entry| entry.key() == key).map(|entry| entry.value())
    }

    /// Set the value of the string with the given key, appending it if it does not exist.
    pub fn set<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.as_ref();
        match self.children.iter_mut().find(|entry| entry.key() == key) {
            Some(entry) => entry.value = value.into(),
            None => self.children.push(StringEntry::new(key, value)),
        }
    }

    fn matches(&self, tag: &str) -> bool { self.head.key.eq_ignore_ascii_case(tag) }
}
impl VersionNode for StringTable {
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let (head, step) = NodeHead::load(reader, range)?;
        let mut pos = head.value_range(range.begin + step, range)?;
        let children = load_children(reader, &mut pos)?;
        let step = head.finish(pos, range)?;
        Ok((Self { head, children }, step))
    }

    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError> {
        if update {
            self.head.header.value_length = 0;
        }
        let children = &mut self.children;
        self.head.save(sink, update, |sink| save_children(children, sink, update))
    }
}


/// Variable of a `VarFileInfo` section, the `Translation` list of supported languages and code pages.
///
/// Loaded pairs are kept as stored, including repeats. Edits never add a pair that is already listed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TranslationList {
    pub(crate) head:  NodeHead,
    pub(crate) value: Vec<Translation>,
}
impl TranslationList {
    pub fn new(translation: Translation) -> Self {
        Self {
            head:  NodeHead::new(VS_TYPE_BINARY, VS_TRANSLATION),
            value: Vec::from([translation]),
        }
    }

    pub fn key(&self) -> &str { &self.head.key }

    pub fn header(&self) -> VersionHeader { self.head.header }

    /// Returns the translations in order.
    pub fn translations(&self) -> &[Translation] { &self.value }

    pub fn contains(&self, translation: Translation) -> bool { self.value.contains(&translation) }

    /// Append a translation.
    ///
    /// # Returns
    /// Returns false if the translation already exists.
    pub fn insert(&mut self, translation: Translation) -> bool {
        if self.contains(translation) {
            return false;
        }
        self.value.push(translation);
        true
    }

    /// Remove every occurrence of a translation, keeping the order of the remaining ones.
    ///
    /// # Returns
    /// Returns false if the translation does not exist.
    pub fn remove(&mut self, translation: Translation) -> bool {
        let count = self.value.len();
        self.value.retain(|&value| value != translation);
        self.value.len() != count
    }
}
impl VersionNode for TranslationList {
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let (head, step) = NodeHead::load(reader, range)?;
        let mut pos = head.value_range(range.begin + step, range)?;
        let count = head.header.value_length as usize / 4;
        let mut value = Vec::with_capacity(count);
        if count > 0 {
            let data = reader.copy(Range::new(pos.begin, pos.begin + count * 4), pos)?;
            for pair in data.chunks_exact(4) {
                let translation = Translation::new(
                    u16::from_le_bytes([pair[0], pair[1]]),
                    u16::from_le_bytes([pair[2], pair[3]]),
                );
                if value.contains(&translation) {
                    debug!("repeated translation {}", translation.tag());
                }
                value.push(translation);
            }
            pos.begin += count * 4;
        }
        let step = head.finish(pos, range)?;
        Ok((Self { head, value }, step))
    }

    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError> {
        if update {
            self.head.set_value_length(self.value.len() * 4)?;
        }
        let value = &self.value;
        self.head.save(sink, update, |sink| {
            for translation in value {
                sink.append(&translation.language.to_le_bytes());
                sink.append(&translation.codepage.to_le_bytes());
            }
            Ok(())
        })
    }
}


/// Children of a file info section, selected by the section key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FileInfoChildren {
    /// `StringFileInfo`
    Strings(Vec<StringTable>),
    /// `VarFileInfo`
    Vars(Vec<TranslationList>),
    /// Section with an unknown key, holding its value and children as raw bytes.
    Unknown(DebugIgnore<Vec<u8>>),
}

/// `StringFileInfo` or `VarFileInfo` section.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileInfo {
    pub(crate) head:     NodeHead,
    pub(crate) children: FileInfoChildren,
}
impl FileInfo {
    /// Create a `StringFileInfo` section with an empty string table for the given language.
    pub fn strings(translation: Translation) -> Self {
        Self {
            head:     NodeHead::new(VS_TYPE_TEXT, VS_STRING_FILE_INFO),
            children: FileInfoChildren::Strings(Vec::from([StringTable::new(translation)])),
        }
    }

    /// Create a `VarFileInfo` section with a translation list holding the given language.
    pub fn vars(translation: Translation) -> Self {
        Self {
            head:     NodeHead::new(VS_TYPE_TEXT, VS_VAR_FILE_INFO),
            children: FileInfoChildren::Vars(Vec::from([TranslationList::new(translation)])),
        }
    }

    pub fn key(&self) -> &str { &self.head.key }

    pub fn header(&self) -> VersionHeader { self.head.header }

    pub fn children(&self) -> &FileInfoChildren { &self.children }

    /// Returns the string tables of a `StringFileInfo` section.
    pub fn string_tables(&self) -> Option<&[StringTable]> {
        match &self.children {
            FileInfoChildren::Strings(tables) => Some(tables),
            _ => None,
        }
    }

    fn string_tables_mut(&mut self) -> Option<&mut Vec<StringTable>> {
        match &mut self.children {
            FileInfoChildren::Strings(tables) => Some(tables),
            _ => None,
        }
    }

    /// Returns the `Translation` variable of a `VarFileInfo` section.
    pub fn translation_list(&self) -> Option<&TranslationList> {
        match &self.children {
            FileInfoChildren::Vars(vars) => vars.iter().find(|var| var.key() == VS_TRANSLATION),
            _ => None,
        }
    }

    fn translation_list_mut(&mut self) -> Option<&mut TranslationList> {
        match &mut self.children {
            FileInfoChildren::Vars(vars) => vars.iter_mut().find(|var| var.key() == VS_TRANSLATION),
            _ => None,
        }
    }
}
impl VersionNode for FileInfo {
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let (head, step) = NodeHead::load(reader, range)?;
        let mut pos = head.value_range(range.begin + step, range)?;
        let children = match head.key.as_str() {
            VS_STRING_FILE_INFO => FileInfoChildren::Strings(load_children(reader, &mut pos)?),
            VS_VAR_FILE_INFO => FileInfoChildren::Vars(load_children(reader, &mut pos)?),
            _ => {
                warn!("keeping unknown file info section {:?} unparsed", head.key);
                let data = if pos.begin < pos.end {
                    reader.copy(pos, pos)?.to_vec()
                } else {
                    Vec::new()
                };
                pos.begin = pos.end.max(pos.begin);
                FileInfoChildren::Unknown(data.into())
            }
        };
        let step = head.finish(pos, range)?;
        Ok((Self { head, children }, step))
    }

    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError> {
        if update && !matches!(self.children, FileInfoChildren::Unknown(_)) {
            self.head.header.value_length = 0;
        }
        let children = &mut self.children;
        self.head.save(sink, update, |sink| match children {
            FileInfoChildren::Strings(tables) => save_children(tables, sink, update),
            FileInfoChildren::Vars(vars) => save_children(vars, sink, update),
            FileInfoChildren::Unknown(data) => {
                sink.append(data.as_slice());
                Ok(())
            }
        })
    }
}


/// `VS_VERSION_INFO` root node.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct VersionRoot {
    pub(crate) head:     NodeHead,
    pub(crate) value:    FixedFileInfo,
    pub(crate) children: Vec<FileInfo>,
}
impl VersionRoot {
    fn new(translation: Translation) -> Self {
        Self {
            head:     NodeHead::new(VS_TYPE_BINARY, VS_VERSION_INFO),
            value:    FixedFileInfo::inferred(),
            children: Vec::from([FileInfo::strings(translation), FileInfo::vars(translation)]),
        }
    }

    pub fn key(&self) -> &str { &self.head.key }

    pub fn header(&self) -> VersionHeader { self.head.header }

    pub fn fixed_file_info(&self) -> &FixedFileInfo { &self.value }

    pub fn children(&self) -> &[FileInfo] { &self.children }

    fn section(&self, key: &str) -> Option<&FileInfo> {
        self.children.iter().find(|child| child.key() == key)
    }

    fn section_mut(&mut self, key: &str) -> Option<&mut FileInfo> {
        self.children.iter_mut().find(|child| child.key() == key)
    }
}
impl VersionNode for VersionRoot {
    fn load(reader: &BlobReader, range: Range) -> Result<(Self, usize), VersionError> {
        let (head, step) = NodeHead::load(reader, range)?;
        let begin = range.begin + step;
        let value = reader.read::<FixedFileInfo>(begin, range)?;
        debug!("{:#x?}", value);
        let signature = value.signature;
        if signature != VS_FIXEDFILEINFO_SIGNATURE {
            return Err(VersionError::InvalidSignature(signature));
        }
        let mut pos = head.value_range(begin + size_of::<FixedFileInfo>(), range)?;
        let children = load_children(reader, &mut pos)?;
        let step = head.finish(pos, range)?;
        Ok((
            Self {
                head,
                value,
                children,
            },
            step,
        ))
    }

    fn save<S: BlobSink>(&mut self, sink: &mut S, update: bool) -> Result<(), VersionError> {
        if update {
            self.head.header.value_length = size_of::<FixedFileInfo>() as u16;
        }
        let value = &self.value;
        let children = &mut self.children;
        self.head.save(sink, update, |sink| {
            sink.append(value.as_bytes());
            save_children(children, sink, update)
        })
    }
}


fn find_table(tables: &[StringTable], translation: Translation) -> Option<usize> {
    let tag = translation.tag();
    tables.iter().position(|table| table.matches(&tag))
}

/// Which half of a language edit to undo.
enum TableUndo {
    Remove(usize),
    Restore(usize, StringTable),
}

/// Version information resource container.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct VersionInfo {
    pub(crate) root: VersionRoot,
}
impl VersionInfo {
    /// Create version information with one empty string table and one translation for the given language.
    pub fn new<T: Into<Translation>>(translation: T) -> Self {
        Self {
            root: VersionRoot::new(translation.into()),
        }
    }

    /// Replace the contents with fresh version information for the given language.
    pub fn reset<T: Into<Translation>>(&mut self, translation: T) { *self = Self::new(translation); }

    /// Reset to the empty state.
    pub fn clear(&mut self) { *self = Self::default(); }

    /// Parse a version information resource.
    ///
    /// # Returns
    /// Returns an error if the resource is malformed or does not span the whole data.
    pub fn parse(data: &[u8]) -> Result<Self, VersionError> {
        let reader = BlobReader::new(data);
        let (root, step) = VersionRoot::load(&reader, Range::new(0, data.len()))?;
        if step != data.len() {
            return Err(VersionError::LengthMismatch(step, data.len()));
        }
        Ok(Self { root })
    }

    /// Replace the contents with the parsed version information resource.
    /// The container is reset to the empty state if parsing fails.
    pub fn load(&mut self, data: &[u8]) -> Result<(), VersionError> {
        match Self::parse(data) {
            Ok(info) => {
                *self = info;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Build the version information into raw resource bytes.
    /// The lengths of all nodes are recomputed.
    pub fn save(&mut self) -> Result<Vec<u8>, VersionError> {
        let mut sizer = BlobSizer::default();
        self.root.save(&mut sizer, true)?;

        let mut writer = BlobWriter::with_capacity(sizer.position());
        self.root.save(&mut writer, false)?;
        let data = writer.into_inner();
        debug!("built version info of {} bytes", data.len());
        Ok(data)
    }

    pub fn root(&self) -> &VersionRoot { &self.root }

    pub fn fixed_file_info(&self) -> &FixedFileInfo { &self.root.value }

    /// Returns the string table for the given language.
    pub fn string_table<T: Into<Translation>>(&self, translation: T) -> Option<&StringTable> {
        let translation: Translation = translation.into();
        let tag = translation.tag();
        self.root
            .section(VS_STRING_FILE_INFO)?
            .string_tables()?
            .iter()
            .find(|table| table.matches(&tag))
    }

    /// Returns the value of a string for the given language.
    pub fn string<T: Into<Translation>>(&self, key: &str, translation: T) -> Option<&str> {
        self.string_table(translation)?.get(key)
    }

    /// Set a string in the string table for the given language, appending it if it does not exist.
    ///
    /// # Returns
    /// Returns an error if there is no string table for the language.
    pub fn change_string<K, V, T>(&mut self, key: K, value: V, translation: T) -> Result<(), VersionError>
    where
        K: AsRef<str>,
        V: Into<String>,
        T: Into<Translation>,
    {
        let translation: Translation = translation.into();
        let tag = translation.tag();
        let tables = self
            .root
            .section_mut(VS_STRING_FILE_INFO)
            .and_then(FileInfo::string_tables_mut)
            .ok_or_else(|| VersionError::MissingSection(VS_STRING_FILE_INFO.to_string()))?;
        let table = tables
            .iter_mut()
            .find(|table| table.matches(&tag))
            .ok_or(VersionError::MissingTable(tag))?;
        table.set(key, value);
        Ok(())
    }

    /// Returns the languages and code pages of the `Translation` list.
    pub fn translations(&self) -> Vec<Translation> {
        self.root
            .section(VS_VAR_FILE_INFO)
            .and_then(FileInfo::translation_list)
            .map(|list| list.translations().to_vec())
            .unwrap_or_default()
    }

    /// Add, remove or copy a language in both the string tables and the `Translation` list.
    ///
    /// * Without `source`, an empty string table and a translation for `target` are added.
    /// * Without `target`, the string table and translation for `source` are removed.
    /// * With both, the string table of `source` is copied to `target` and a translation for `target` is added.
    ///
    /// Both halves are applied or neither is.
    ///
    /// # Returns
    /// Returns an error if a source does not exist or a target already exists.
    pub fn change_translation(
        &mut self, source: Option<Translation>, target: Option<Translation>,
    ) -> Result<(), VersionError> {
        if source.is_none() && target.is_none() {
            return Err(VersionError::InvalidArguments);
        }
        if self.root.section(VS_STRING_FILE_INFO).is_none() {
            return Err(VersionError::MissingSection(VS_STRING_FILE_INFO.to_string()));
        }
        if self.root.section(VS_VAR_FILE_INFO).is_none() {
            return Err(VersionError::MissingSection(VS_VAR_FILE_INFO.to_string()));
        }

        let undo = self.change_string_tables(source, target)?;
        if let Err(err) = self.change_translation_list(source, target) {
            debug!("reverting string table change: {:?}", err);
            if let Some(tables) =
                self.root.section_mut(VS_STRING_FILE_INFO).and_then(FileInfo::string_tables_mut)
            {
                match undo {
                    TableUndo::Remove(index) => {
                        tables.remove(index);
                    }
                    TableUndo::Restore(index, table) => tables.insert(index, table),
                }
            }
            return Err(err);
        }

        if source.is_none() {
            let info = &mut self.root.value;
            info.file_flags_mask = info.file_flags_mask | VS_FF_INFOINFERRED;
            info.file_flags = info.file_flags | VS_FF_INFOINFERRED;
        }
        Ok(())
    }

    fn change_string_tables(
        &mut self, source: Option<Translation>, target: Option<Translation>,
    ) -> Result<TableUndo, VersionError> {
        let tables = self
            .root
            .section_mut(VS_STRING_FILE_INFO)
            .and_then(FileInfo::string_tables_mut)
            .ok_or_else(|| VersionError::MissingSection(VS_STRING_FILE_INFO.to_string()))?;
        match (source, target) {
            (None, Some(target)) => {
                if find_table(tables, target).is_some() {
                    return Err(VersionError::TableExists(target.tag()));
                }
                tables.push(StringTable::new(target));
                Ok(TableUndo::Remove(tables.len() - 1))
            }
            (Some(source), None) => {
                let index =
                    find_table(tables, source).ok_or_else(|| VersionError::MissingTable(source.tag()))?;
                let table = tables.remove(index);
                Ok(TableUndo::Restore(index, table))
            }
            (Some(source), Some(target)) => {
                let index =
                    find_table(tables, source).ok_or_else(|| VersionError::MissingTable(source.tag()))?;
                if find_table(tables, target).is_some() {
                    return Err(VersionError::TableExists(target.tag()));
                }
                let mut table = tables[index].clone();
                table.head.key = target.tag();
                tables.push(table);
                Ok(TableUndo::Remove(tables.len() - 1))
            }
            (None, None) => Err(VersionError::InvalidArguments),
        }
    }

    fn change_translation_list(
        &mut self, source: Option<Translation>, target: Option<Translation>,
    ) -> Result<(), VersionError> {
        let list = self
            .root
            .section_mut(VS_VAR_FILE_INFO)
            .and_then(FileInfo::translation_list_mut)
            .ok_or_else(|| {
                VersionError::MissingSection(format!("{}\\{}", VS_VAR_FILE_INFO, VS_TRANSLATION))
            })?;
        match (source, target) {
            (Some(source), None) => {
                if !list.remove(source) {
                    return Err(VersionError::MissingTranslation(source.tag()));
                }
            }
            (_, Some(target)) => {
                if !list.insert(target) {
                    return Err(VersionError::TranslationExists(target.tag()));
                }
            }
            (None, None) => return Err(VersionError::InvalidArguments),
        }
        Ok(())
    }

    /// Add an empty string table and a translation for a language.
    pub fn add_language<T: Into<Translation>>(&mut self, translation: T) -> Result<(), VersionError> {
        self.change_translation(None, Some(translation.into()))
    }

    /// Remove the string table and translation of a language.
    pub fn remove_language<T: Into<Translation>>(
        &mut self, translation: T,
    ) -> Result<(), VersionError> {
        self.change_translation(Some(translation.into()), None)
    }

    /// Copy the string table of a language to a new language and add its translation.
    pub fn copy_language<S: Into<Translation>, T: Into<Translation>>(
        &mut self, source: S, target: T,
    ) -> Result<(), VersionError> {
        self.change_translation(Some(source.into()), Some(target.into()))
    }

    /// Set a field of the fixed file info.
    ///
    /// `FileVersion`, `ProductVersion` and `FileDate` take the full 64-bit value,
    /// the remaining fields take the lower 32 bits.
    pub fn change_file_info(&mut self, key: &str, value: u64) -> Result<(), VersionError> {
        let info = &mut self.root.value;
        let (ms, ls) = ((value >> 32) as u32, value as u32);
        match key {
            "Signature" => info.signature = ls,
            "StrucVersion" => info.struct_version = ls,
            "FileFlagsMask" => info.file_flags_mask = ls,
            "FileFlags" => info.file_flags = ls,
            "FileOS" => info.file_os = ls,
            "FileType" => info.file_type = ls,
            "FileSubtype" => info.file_subtype = ls,
            "FileVersion" => {
                info.file_version_ms = ms;
                info.file_version_ls = ls;
            }
            "ProductVersion" => {
                info.product_version_ms = ms;
                info.product_version_ls = ls;
            }
            "FileDate" => {
                info.file_date_ms = ms;
                info.file_date_ls = ls;
            }
            _ => return Err(VersionError::UnknownField(key.to_string())),
        }
        Ok(())
    }

    /// Returns a field of the fixed file info by the key accepted by [`VersionInfo::change_file_info`].
    pub fn file_info(&self, key: &str) -> Result<u64, VersionError> {
        let info = &self.root.value;
        let split = |ms: u32, ls: u32| ((ms as u64) << 32) | ls as u64;
        Ok(match key {
            "Signature" => info.signature as u64,
            "StrucVersion" => info.struct_version as u64,
            "FileFlagsMask" => info.file_flags_mask as u64,
            "FileFlags" => info.file_flags as u64,
            "FileOS" => info.file_os as u64,
            "FileType" => info.file_type as u64,
            "FileSubtype" => info.file_subtype as u64,
            "FileVersion" => split(info.file_version_ms, info.file_version_ls),
            "ProductVersion" => split(info.product_version_ms, info.product_version_ls),
            "FileDate" => split(info.file_date_ms, info.file_date_ls),
            _ => return Err(VersionError::UnknownField(key.to_string())),
        })
    }
}
