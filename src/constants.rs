//! Windows API and binary constants.

#![allow(non_upper_case_globals)]

pub type DWORD = u32;
pub type WORD = u16;
pub type LANGID = WORD;


pub const VS_VERSION_INFO: &str = "VS_VERSION_INFO";
pub const VS_STRING_FILE_INFO: &str = "StringFileInfo";
pub const VS_VAR_FILE_INFO: &str = "VarFileInfo";
pub const VS_TRANSLATION: &str = "Translation";

pub const VS_COMMENTS: &str = "Comments";
pub const VS_COMPANY_NAME: &str = "CompanyName";
pub const VS_FILE_DESCRIPTION: &str = "FileDescription";
pub const VS_FILE_VERSION: &str = "FileVersion";
pub const VS_INTERNAL_NAME: &str = "InternalName";
pub const VS_LEGAL_COPYRIGHT: &str = "LegalCopyright";
pub const VS_LEGAL_TRADEMARKS: &str = "LegalTrademarks";
pub const VS_ORIGINAL_FILENAME: &str = "OriginalFilename";
pub const VS_PRIVATE_BUILD: &str = "PrivateBuild";
pub const VS_PRODUCT_NAME: &str = "ProductName";
pub const VS_PRODUCT_VERSION: &str = "ProductVersion";
pub const VS_SPECIAL_BUILD: &str = "SpecialBuild";

// version node wType values
pub const VS_TYPE_BINARY: WORD = 0;
pub const VS_TYPE_TEXT: WORD = 1;


// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-lcid/a9eac961-e77d-41a6-90a5-ce1a8b0cdb9c
pub const LANGUAGE_ID_EN_US: LANGID = 1033; // 0x0409, en-US
pub const LANGUAGE_ID_JA_JP: LANGID = 1041; // 0x0411, ja-JP
// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-ucoderef/28fefe92-d66c-4b03-90a9-97b473223d43
pub const CODE_PAGE_ID_EN_US: LANGID = 1200; // 0x04B0, UTF-16LE

/// Language and code page used by [`VersionInfo::new`](crate::VersionInfo::new).
pub const DEFAULT_LANGUAGE: DWORD = ((LANGUAGE_ID_EN_US as DWORD) << 16) | CODE_PAGE_ID_EN_US as DWORD;


// https://docs.microsoft.com/en-us/windows/win32/api/verrsrc/ns-verrsrc-vs_fixedfileinfo

pub const VS_FF_DEBUG: DWORD = 0x00000001;
pub const VS_FF_PRERELEASE: DWORD = 0x00000002;
pub const VS_FF_PATCHED: DWORD = 0x00000004;
pub const VS_FF_PRIVATEBUILD: DWORD = 0x00000008;
pub const VS_FF_INFOINFERRED: DWORD = 0x00000010;
pub const VS_FF_SPECIALBUILD: DWORD = 0x00000020;
pub const VS_FFI_FILEFLAGSMASK: DWORD = 0x0000003F;

pub const VOS_UNKNOWN: DWORD = 0x00000000;
pub const VOS_DOS: DWORD = 0x00010000;
pub const VOS_NT: DWORD = 0x00040000;
pub const VOS__WINDOWS16: DWORD = 0x00000001;
pub const VOS__WINDOWS32: DWORD = 0x00000004;
pub const VOS_NT_WINDOWS32: DWORD = 0x00040004;

pub const VFT_UNKNOWN: DWORD = 0x00000000;
pub const VFT_APP: DWORD = 0x00000001;
pub const VFT_DLL: DWORD = 0x00000002;
pub const VFT_DRV: DWORD = 0x00000003;
pub const VFT_FONT: DWORD = 0x00000004;
pub const VFT_STATIC_LIB: DWORD = 0x00000007;
pub const VFT_VXD: DWORD = 0x00000005;

pub const VS_FIXEDFILEINFO_SIGNATURE: DWORD = 0xFEEF04BD;
pub const VS_FIXEDFILEINFO_VERSION: DWORD = 0x00010000;


// https://docs.microsoft.com/en-us/windows/win32/menurc/resource-types
// the resource types the codec output is stored under

pub const RT_CURSOR: WORD = 0x01;
pub const RT_ICON: WORD = 0x03;
pub const RT_GROUP_CURSOR: WORD = 0x0C;
pub const RT_GROUP_ICON: WORD = 0x0E;
pub const RT_VERSION: WORD = 0x10;


// https://learn.microsoft.com/en-us/previous-versions/ms997538(v=msdn.10)

pub const ICON_DIRECTORY_TYPE_ICON: WORD = 1;
pub const ICON_DIRECTORY_TYPE_CURSOR: WORD = 2;


// https://www.w3.org/TR/png/#5PNG-file-signature

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
pub const PNG_IHDR_LENGTH: DWORD = 13;
pub const PNG_IHDR_TYPE: [u8; 4] = *b"IHDR";
pub const PNG_COLOR_TYPE_COLOR: u8 = 0x02;
pub const PNG_COLOR_TYPE_ALPHA: u8 = 0x04;


// https://learn.microsoft.com/en-us/windows/win32/api/wingdi/ns-wingdi-bitmapcoreheader

pub const BITMAP_CORE_HEADER_SIZE: DWORD = 12;
pub const BITMAP_INFO_HEADER_SIZE: DWORD = 40;
