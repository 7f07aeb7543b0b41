//! Bitmap decoding tests: zlib blocks, palettes, transparency masks, and
//! PNG round trips.

mod common;

use common::builders::{self, BmiBitmap};
use common::{Event, RecordingSink};
use zonerust::{MemoryStream, PropertyValue, ZmfDocument};

fn parse(data: Vec<u8>) -> (bool, RecordingSink) {
    let mut stream = MemoryStream::new(data);
    let mut sink = RecordingSink::new();
    let ok = ZmfDocument::parse(&mut stream, &mut sink);
    (ok, sink)
}

/// Extract and decode the PNG delivered by the graphic-object callback.
fn decoded_pixels(sink: &RecordingSink) -> (u32, u32, Vec<u8>) {
    let Some(Event::DrawGraphicObject(props)) = sink.find("drawGraphicObject") else {
        panic!("no drawGraphicObject event");
    };

    assert_eq!(props.get_str("librevenge:mime-type"), Some("image/png"));

    let Some(PropertyValue::Binary(png_data)) = props.get("office:binary-data") else {
        panic!("no binary data");
    };

    let decoder = png::Decoder::new(png_data.as_slice());
    let mut reader = decoder.read_info().expect("invalid PNG");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("invalid PNG frame");
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

#[test]
fn solid_red_bitmap_round_trips() {
    let data = builders::bmi_file(
        4,
        4,
        24,
        &[BmiBitmap {
            width: 4,
            height: 4,
            depth: 24,
            payload: builders::solid_rgb_payload(4, 4, (255, 0, 0)),
            palette: Vec::new(),
        }],
    );

    let (ok, sink) = parse(data);
    assert!(ok);

    assert_eq!(
        sink.names(),
        vec![
            "startDocument",
            "startPage",
            "startLayer",
            "setStyle",
            "drawGraphicObject",
            "endLayer",
            "endPage",
            "endDocument",
        ]
    );

    let (width, height, pixels) = decoded_pixels(&sink);
    assert_eq!((width, height), (4, 4));
    for pixel in pixels.chunks(4) {
        assert_eq!(pixel, &[255, 0, 0, 255]);
    }

    // The image is placed at the origin, sized at 72 dpi.
    let Some(Event::DrawGraphicObject(props)) = sink.find("drawGraphicObject") else {
        panic!("no drawGraphicObject event");
    };
    assert_eq!(props.get_double("svg:x"), Some(0.0));
    assert!((props.get_double("svg:width").unwrap() - 4.0 / 72.0).abs() < 1e-12);
}

#[test]
fn transparency_mask_zeroes_alpha() {
    // The second bitmap's red channel is nonzero everywhere: every output
    // pixel becomes fully transparent.
    let data = builders::bmi_file(
        4,
        4,
        24,
        &[
            BmiBitmap {
                width: 4,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(4, 4, (10, 20, 30)),
                palette: Vec::new(),
            },
            BmiBitmap {
                width: 4,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(4, 4, (255, 0, 0)),
                palette: Vec::new(),
            },
        ],
    );

    let (ok, sink) = parse(data);
    assert!(ok);

    let (_, _, pixels) = decoded_pixels(&sink);
    for pixel in pixels.chunks(4) {
        assert_eq!(pixel[3], 0);
    }
}

#[test]
fn dimension_majority_overrides_outlier() {
    // Header and color bitmap agree on 4; the mask claims 5 and is
    // overridden, so its 4-wide payload decodes fine.
    let data = builders::bmi_file(
        4,
        4,
        24,
        &[
            BmiBitmap {
                width: 4,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(4, 4, (1, 2, 3)),
                palette: Vec::new(),
            },
            BmiBitmap {
                width: 5,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(4, 4, (0, 0, 0)),
                palette: Vec::new(),
            },
        ],
    );

    let (ok, sink) = parse(data);
    assert!(ok);

    let (width, height, pixels) = decoded_pixels(&sink);
    assert_eq!((width, height), (4, 4));
    // Mask red channel is zero everywhere: fully opaque.
    for pixel in pixels.chunks(4) {
        assert_eq!(pixel[3], 255);
    }
}

#[test]
fn irreconcilable_dimensions_discard_image() {
    // Header 4, color 5, mask 6: no majority.
    let data = builders::bmi_file(
        4,
        4,
        24,
        &[
            BmiBitmap {
                width: 5,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(5, 4, (1, 2, 3)),
                palette: Vec::new(),
            },
            BmiBitmap {
                width: 6,
                height: 4,
                depth: 24,
                payload: builders::solid_rgb_payload(6, 4, (0, 0, 0)),
                palette: Vec::new(),
            },
        ],
    );

    let (ok, sink) = parse(data);
    assert!(!ok);
    assert_eq!(sink.count("drawGraphicObject"), 0);
}

#[test]
fn palette_bitmap_resolves_indexes() {
    // Depth 8: each payload byte indexes a 256-entry BGR0 palette.
    let mut palette = vec![0u8; 256 * 4];
    // Index 0: red, index 1: blue.
    palette[0..4].copy_from_slice(&[0, 0, 255, 0]);
    palette[4..8].copy_from_slice(&[255, 0, 0, 0]);

    // 2x2 pixels, stride padded to 4 bytes.
    let payload = vec![0, 1, 0, 0, 1, 0, 0, 0];

    let data = builders::bmi_file(
        2,
        2,
        8,
        &[BmiBitmap {
            width: 2,
            height: 2,
            depth: 8,
            payload,
            palette,
        }],
    );

    let (ok, sink) = parse(data);
    assert!(ok);

    let (width, height, pixels) = decoded_pixels(&sink);
    assert_eq!((width, height), (2, 2));
    assert_eq!(&pixels[0..4], &[255, 0, 0, 255]); // index 0: red
    assert_eq!(&pixels[4..8], &[0, 0, 255, 255]); // index 1: blue
    assert_eq!(&pixels[8..12], &[0, 0, 255, 255]);
    assert_eq!(&pixels[12..16], &[255, 0, 0, 255]);
}

#[test]
fn corrupt_block_discards_image() {
    let mut data = builders::bmi_file(
        4,
        4,
        24,
        &[BmiBitmap {
            width: 4,
            height: 4,
            depth: 24,
            payload: builders::solid_rgb_payload(4, 4, (255, 0, 0)),
            palette: Vec::new(),
        }],
    );

    // Corrupt the zlib stream of the single block.  The block data starts
    // after the header (21 bytes), the offset table (12 bytes), the
    // sub-header (16 bytes), and the block prelude (3 bytes).
    let block_data_start = 21 + 12 + 16 + 3;
    data[block_data_start] ^= 0xff;
    data[block_data_start + 1] ^= 0xff;

    let (ok, sink) = parse(data);
    assert!(!ok);
    assert_eq!(sink.count("drawGraphicObject"), 0);
}

#[test]
fn truncated_payload_discards_image() {
    // Payload shorter than height x stride: the decoder yields no image.
    let data = builders::bmi_file(
        4,
        4,
        24,
        &[BmiBitmap {
            width: 4,
            height: 4,
            depth: 24,
            payload: builders::solid_rgb_payload(4, 2, (255, 0, 0)),
            palette: Vec::new(),
        }],
    );

    let (ok, _sink) = parse(data);
    assert!(!ok);
}
