use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width(), 1);
    assert_eq!(decoded.height(), 1);
    assert_eq!(
        decoded.pixels().unwrap(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn rasterize_svg_fills_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
        <rect x="0" y="0" width="4" height="4" fill="#ff0000"/>
    </svg>"##;
    let out = rasterize_svg(svg, Some((8, 6))).unwrap();
    assert_eq!((out.width(), out.height()), (8, 6));
    let px = out.pixels().unwrap();
    assert_eq!(&px[0..4], &[255, 0, 0, 255]);
}

#[test]
fn rasterize_svg_intrinsic_size_and_errors() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="2"></svg>"#;
    let out = rasterize_svg(svg, None).unwrap();
    assert_eq!((out.width(), out.height()), (3, 2));

    let degenerate = rasterize_svg(svg, Some((0, 5))).unwrap();
    assert_eq!((degenerate.width(), degenerate.height()), (1, 1));

    assert!(rasterize_svg(br#"<svg"#, None).is_err());
}
