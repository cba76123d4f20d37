use editres::{types::*, *};
use std::{io::Cursor, sync::Once};

static INIT_LOGGER: Once = Once::new();
fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::builder()
            .is_test(false)
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_module_path(false)
            .format_level(true)
            .format_target(false)
            .write_style(env_logger::WriteStyle::Auto)
            .init();
    });
}

/// PNG signature and IHDR chunk, without image data.
fn png_header(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut data = Vec::from([0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    data.extend(13u32.to_be_bytes());
    data.extend(b"IHDR");
    data.extend(width.to_be_bytes());
    data.extend(height.to_be_bytes());
    data.extend([bit_depth, color_type, 0, 0, 0]);
    data.extend([0; 4]);
    data
}

fn bmp_info_header(width: i32, height: i32, planes: u16, bit_count: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(40u32.to_le_bytes());
    data.extend(width.to_le_bytes());
    data.extend(height.to_le_bytes());
    data.extend(planes.to_le_bytes());
    data.extend(bit_count.to_le_bytes());
    data.extend([0; 24]);
    data
}

fn bmp_core_header(width: u16, height: u16, planes: u16, bit_count: u16) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(12u32.to_le_bytes());
    data.extend(width.to_le_bytes());
    data.extend(height.to_le_bytes());
    data.extend(planes.to_le_bytes());
    data.extend(bit_count.to_le_bytes());
    data
}

fn header(width: u8, height: u8, a: u16, b: u16) -> IconHeader {
    IconHeader {
        width,
        height,
        color_count: 0,
        reserved: 0,
        planes_or_hotspot_x: a,
        bit_count_or_hotspot_y: b,
    }
}

/// Icon file with the images stored contiguously after the entry table.
fn icon_file(type_: u16, images: &[(IconHeader, Vec<u8>)]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(0u16.to_le_bytes());
    data.extend(type_.to_le_bytes());
    data.extend((images.len() as u16).to_le_bytes());
    let mut offset = 6 + 16 * images.len();
    for (header, image) in images {
        data.extend([header.width, header.height, header.color_count, header.reserved]);
        data.extend({ header.planes_or_hotspot_x }.to_le_bytes());
        data.extend({ header.bit_count_or_hotspot_y }.to_le_bytes());
        data.extend((image.len() as u32).to_le_bytes());
        data.extend((offset as u32).to_le_bytes());
        offset += image.len();
    }
    for (_, image) in images {
        data.extend(image);
    }
    data
}

fn sample_icon() -> Vec<u8> {
    icon_file(1, &[
        (header(16, 16, 1, 32), png_header(16, 16, 8, 6)),
        (header(32, 32, 1, 8), bmp_info_header(32, 64, 1, 8)),
    ])
}

#[test]
fn parse_icon_file() {
    init_logger();

    let data = sample_icon();
    let images = IconImages::parse(&data).unwrap();

    assert_eq!(images.count(), 2);
    assert_eq!(images.kind(), IconKind::Icon);
    assert!(!images.is_cursor());
    assert_eq!(images.entry(0).unwrap().image(), &png_header(16, 16, 8, 6)[..]);
    assert_eq!(images.entry(1).unwrap().image(), &bmp_info_header(32, 64, 1, 8)[..]);
    assert_eq!(images.entry(1).unwrap().header(), header(32, 32, 1, 8));
    assert!(images.entries().iter().all(|entry| entry.id().is_none()), "ids are unset after parsing");
}

#[test]
fn save_icon_file() {
    init_logger();

    let data = sample_icon();
    let images = IconImages::parse(&data).unwrap();
    let saved = images.save().unwrap();
    assert_eq!(saved, data, "saved icon file equals source");

    let reparsed = IconImages::parse(&saved).unwrap();
    assert_eq!(images, reparsed, "reparsed icon file equals parsed icon file");
}

#[test]
fn save_recomputes_layout() {
    init_logger();

    let mut images = IconImages::parse(&sample_icon()).unwrap();
    images.entry_mut(0).unwrap().set_image(vec![1, 2, 3]);
    let saved = images.save().unwrap();

    assert_eq!(saved.len(), 6 + 16 * 2 + 3 + 40);
    let reparsed = IconImages::parse(&saved).unwrap();
    let first = reparsed.entry(0).unwrap().directory_entry();
    let second = reparsed.entry(1).unwrap().directory_entry();
    assert_eq!({ first.bytes }, 3);
    assert_eq!({ first.offset }, 38);
    assert_eq!({ second.offset }, 41);
    assert_eq!(reparsed.entry(0).unwrap().image(), &[1, 2, 3]);
}

#[test]
fn reject_invalid_directory() {
    init_logger();

    let valid = sample_icon();

    let mut reserved = valid.clone();
    reserved[0] = 1;
    let mut kind = valid.clone();
    kind[2] = 3;
    let mut count = valid.clone();
    count[4] = 0;
    let table = valid[..6 + 16 + 8].to_vec();
    let mut range = valid.clone();
    // size of the second image
    range[6 + 16 + 8] = 41;

    for (name, data) in [
        ("reserved", reserved),
        ("kind", kind),
        ("count", count),
        ("table", table),
        ("range", range),
    ] {
        let mut images = IconImages::parse(&valid).unwrap();
        let result = images.load(&data);
        assert!(result.is_err(), "invalid {} is rejected", name);
        assert_eq!(images.count(), 0, "container is empty after invalid {}", name);
        assert_eq!(images.directory(), IconDirectory::default());
    }

    assert!(matches!(IconImages::parse(&[0, 0, 1]), Err(IconError::InvalidBytes(_))));
    let mut range = valid.clone();
    range[6 + 16 + 8] = 41;
    assert!(matches!(IconImages::parse(&range), Err(IconError::InvalidRange(1, _, _))));
}

#[test]
fn sniff_png_header() {
    init_logger();

    let mut images = IconImages::new(IconKind::Icon);
    images
        .build(IconKind::Icon, [
            Ok(IconEntry::new(IconHeader::default(), png_header(64, 32, 8, 6), Some(1))),
            Ok(IconEntry::new(IconHeader::default(), png_header(256, 256, 8, 6), Some(2))),
            Ok(IconEntry::new(IconHeader::default(), png_header(300, 16, 8, 2), Some(3))),
            Ok(IconEntry::new(IconHeader::default(), png_header(48, 48, 4, 0), Some(4))),
        ])
        .unwrap();

    let icon = images.icon(0).unwrap().header;
    assert_eq!((icon.width, icon.height), (64, 32));
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 32,
    });

    let icon = images.icon(1).unwrap().header;
    assert_eq!((icon.width, icon.height), (0, 0), "256 pixels are stored as 0");
    assert_eq!(icon.pixel_width(), 256);

    let icon = images.icon(2).unwrap().header;
    assert_eq!((icon.width, icon.height), (0, 0), "out of range png sizes are stored as 0");
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 24,
    });

    let icon = images.icon(3).unwrap().header;
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 4,
    });
}

#[test]
fn sniff_encoded_png() {
    init_logger();

    let mut data = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(20, 10))
        .write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
        .unwrap();

    let mut images = IconImages::default();
    images
        .build(IconKind::Icon, [Ok(IconEntry::new(header(1, 1, 0, 0), data, Some(1)))])
        .unwrap();
    let icon = images.icon(0).unwrap().header;
    assert_eq!((icon.width, icon.height), (20, 10));
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 24,
    });
}

#[test]
fn sniff_bmp_header() {
    init_logger();

    let data = icon_file(1, &[
        (header(0, 0, 0, 0), bmp_info_header(48, 96, 1, 8)),
        (header(0, 0, 0, 0), bmp_core_header(16, 16, 1, 4)),
        (header(7, 7, 0, 0), bmp_info_header(300, 600, 1, 32)),
        (header(9, 9, 3, 3), vec![20, 0, 0, 0, 1, 2, 3, 4]),
        (header(5, 5, 1, 1), vec![1, 2]),
    ]);
    let images = IconImages::parse(&data).unwrap();

    let icon = images.icon(0).unwrap().header;
    assert_eq!((icon.width, icon.height), (48, 96));
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 8,
    });

    let icon = images.icon(1).unwrap().header;
    assert_eq!((icon.width, icon.height), (16, 16));
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 4,
    });

    let icon = images.icon(2).unwrap().header;
    assert_eq!((icon.width, icon.height), (7, 7), "out of range bmp sizes keep the stored values");
    assert_eq!(icon.fields(false), IconHeaderFields::Icon {
        planes:    1,
        bit_count: 32,
    });

    assert_eq!(images.icon(3).unwrap().header, header(9, 9, 3, 3), "unknown bmp header is ignored");
    assert_eq!(images.icon(4).unwrap().header, header(5, 5, 1, 1), "short image is ignored");
    assert!(images.icon(5).is_none());
}

#[test]
fn cursor_hot_spots() {
    init_logger();

    let data = icon_file(2, &[
        (header(32, 32, 5, 7), png_header(32, 32, 8, 6)),
        (header(16, 16, 1, 2), bmp_info_header(16, 32, 1, 1)),
    ]);
    let mut images = IconImages::parse(&data).unwrap();
    assert!(images.is_cursor());
    assert_eq!(images.hot_spot(0), Some((5, 7)));

    let icon = images.icon(0).unwrap().header;
    assert_eq!(icon.fields(true), IconHeaderFields::Cursor {
        hotspot_x: 5,
        hotspot_y: 7,
    });
    let icon = images.icon(1).unwrap().header;
    assert_eq!((icon.width, icon.height), (16, 32));
    assert_eq!(icon.fields(true), IconHeaderFields::Cursor {
        hotspot_x: 1,
        hotspot_y: 2,
    });

    images.set_hot_spot(1, 8, 9).unwrap();
    assert_eq!(images.hot_spot(1), Some((8, 9)));
    assert!(matches!(images.set_hot_spot(2, 0, 0), Err(IconError::InvalidIndex(2))));

    let reparsed = IconImages::parse(&images.save().unwrap()).unwrap();
    assert_eq!(reparsed.hot_spot(1), Some((8, 9)));
}

#[test]
fn convert_icon_to_cursor() {
    init_logger();

    let mut images = IconImages::parse(&sample_icon()).unwrap();
    assert_eq!(images.hot_spot(0), None, "icons have no hotspot");

    images.set_hot_spot(0, 3, 4).unwrap();
    assert!(images.is_cursor());
    assert_eq!(images.hot_spot(0), Some((3, 4)));
    assert_eq!(images.hot_spot(1), Some((0, 0)), "other hotspots are reset");

    images.set_cursor(false);
    assert_eq!(images.kind(), IconKind::Icon);
    assert_eq!(images.entry(0).unwrap().header().fields(false), IconHeaderFields::Icon {
        planes:    0,
        bit_count: 0,
    });
}

#[test]
fn build_is_all_or_nothing() {
    init_logger();

    let mut images = IconImages::parse(&sample_icon()).unwrap();
    let result = images.build(IconKind::Icon, [
        Ok(IconEntry::new(IconHeader::default(), png_header(16, 16, 8, 6), Some(1))),
        Err(IconError::InvalidIndex(1)),
        Ok(IconEntry::new(IconHeader::default(), png_header(32, 32, 8, 6), Some(3))),
    ]);
    assert!(result.is_err(), "failing producer fails the build");
    assert_eq!(images.count(), 0, "container is empty after a failed build");

    images
        .build(IconKind::Cursor, [Ok(IconEntry::new(header(16, 16, 2, 3), vec![0; 10], Some(7)))])
        .unwrap();
    assert!(images.is_cursor());
    assert_eq!(images.entry(0).unwrap().id(), Some(7));
    assert_eq!({ images.entry(0).unwrap().directory_entry().bytes }, 10);
}

#[test]
fn build_and_extract_group() {
    init_logger();

    let mut images = IconImages::parse(&sample_icon()).unwrap();
    images.entry_mut(0).unwrap().set_id(Some(10));
    images.entry_mut(1).unwrap().set_id(Some(11));

    let mut group = IconGroup::default();
    group.build(&images).unwrap();
    assert_eq!(group.count(), 2);
    assert_eq!(group.id(0), Some(10));
    assert_eq!(group.id(1), Some(11));
    assert_eq!(group.entries()[1].header, images.icon(1).unwrap().header, "group uses sniffed headers");
    assert_eq!({ group.entries()[1].bytes }, 40);

    let data = group.save().unwrap();
    assert_eq!(data.len(), 6 + 14 * 2);
    let group = IconGroup::parse(&data).unwrap();
    assert_eq!(group.kind(), IconKind::Icon);

    let extracted = group
        .extract(|n, id| {
            assert_eq!(id, 10 + n as u16);
            images.entry(n).map(|entry| entry.image().to_vec())
        })
        .unwrap();
    assert_eq!(extracted.count(), 2);
    for n in 0..2 {
        let entry = extracted.entry(n).unwrap();
        assert_eq!(entry.id(), Some(10 + n as u16));
        assert_eq!(entry.image(), images.entry(n).unwrap().image());
        assert_eq!(entry.header(), images.icon(n).unwrap().header);
    }

    let result = group.extract(|n, _| if n == 0 { Some(vec![1]) } else { None });
    assert!(matches!(result, Err(IconError::MissingImage(1, 11))));

    let headers = group.extract_headers();
    assert_eq!(headers.count(), 2);
    assert!(headers.entries().iter().all(|entry| entry.image().is_empty()));
    assert_eq!(headers.entry(1).unwrap().id(), Some(11));
}

#[test]
fn build_group_without_ids() {
    init_logger();

    let images = IconImages::parse(&sample_icon()).unwrap();
    let mut group = IconGroup::parse(&{
        let mut data = Vec::from([0, 0, 1, 0, 1, 0]);
        data.extend([16, 16, 0, 0, 1, 0, 32, 0, 4, 0, 0, 0, 1, 0]);
        data
    })
    .unwrap();
    assert_eq!(group.count(), 1);

    assert!(matches!(group.build(&images), Err(IconError::MissingId(0))));
    assert_eq!(group.count(), 0, "group is empty after a failed build");
}

#[test]
fn group_ids() {
    init_logger();

    let mut data = Vec::from([0, 0, 2, 0, 1, 0]);
    data.extend([32, 32, 0, 0, 4, 0, 5, 0, 8, 0, 0, 0, 3, 0]);
    let mut group = IconGroup::parse(&data).unwrap();
    assert!(group.is_cursor());
    assert_eq!(group.id(0), Some(3));

    group.set_id(0, 9).unwrap();
    assert!(matches!(group.set_id(1, 9), Err(IconError::InvalidIndex(1))));
    let saved = group.save().unwrap();
    assert_eq!(saved[18..20], [9, 0]);

    assert!(IconGroup::parse(&data[..19]).is_err(), "truncated entry table is rejected");
}

#[test]
fn reject_invalid_group_directory() {
    init_logger();

    let mut valid = Vec::from([0, 0, 1, 0, 1, 0]);
    valid.extend([16, 16, 0, 0, 1, 0, 32, 0, 4, 0, 0, 0, 1, 0]);

    let mut reserved = valid.clone();
    reserved[0] = 1;
    let mut kind = valid.clone();
    kind[2] = 3;
    let mut unknown_kind = valid.clone();
    unknown_kind[2] = 0;
    let mut count = valid.clone();
    count[4] = 0;

    for (name, data) in [
        ("reserved", reserved),
        ("kind", kind),
        ("unknown kind", unknown_kind),
        ("count", count),
    ] {
        let mut group = IconGroup::parse(&valid).unwrap();
        let result = group.load(&data);
        assert!(
            matches!(result, Err(IconError::InvalidDirectory(_))),
            "invalid {} is rejected",
            name
        );
        assert_eq!(group.count(), 0, "group is empty after invalid {}", name);
        assert_eq!(group.directory(), IconDirectory::default());
    }
}

#[test]
fn reject_too_many_entries() {
    init_logger();

    let mut images = IconImages::parse(&sample_icon()).unwrap();
    let result = images.build(
        IconKind::Icon,
        (0..=u16::MAX as usize).map(|_| Ok(IconEntry::new(IconHeader::default(), Vec::new(), None))),
    );
    assert!(
        matches!(result, Err(IconError::TooLarge(_, 65536))),
        "entry count past the directory limit is rejected"
    );
    assert_eq!(images.count(), 0, "container is empty after a failed build");

    let image = image::DynamicImage::new_rgba8(1, 1);
    let sizes = vec![1; u16::MAX as usize + 1];
    assert!(
        matches!(IconImages::from_image(&image, &sizes), Err(IconError::TooLarge(_, 65536))),
        "sizes past the resource id range are rejected"
    );
}

#[test]
fn icon_from_image() {
    init_logger();

    let image = image::DynamicImage::new_rgba8(300, 300);
    let images = IconImages::from_image(&image, &[16, 48, 256]).unwrap();

    assert_eq!(images.count(), 3);
    let widths = (0..3).map(|n| images.icon(n).unwrap().header.width).collect::<Vec<_>>();
    assert_eq!(widths, [16, 48, 0]);
    for (n, entry) in images.entries().iter().enumerate() {
        assert_eq!(entry.id(), Some(n as u16 + 1));
        assert_eq!(&entry.image()[1..4], b"PNG");
        assert_eq!(entry.header().fields(false), IconHeaderFields::Icon {
            planes:    1,
            bit_count: 32,
        });
    }

    let mut group = IconGroup::default();
    group.build(&images).unwrap();
    assert_eq!(group.count(), 3);
}
