use super::*;

#[test]
fn premul_of_opaque_is_identity() {
    let c = Rgba8::new(12, 200, 99, 255);
    assert_eq!(c.to_premul(), [12, 200, 99, 255]);
}

#[test]
fn premul_scales_channels_by_alpha() {
    let c = Rgba8::new(100, 50, 200, 128);
    assert_eq!(
        c.to_premul(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8::TRANSPARENT.to_premul(), [0, 0, 0, 0]);
}

#[test]
fn rgba8_json_shape() {
    let c: Rgba8 = serde_json::from_str(r#"{"r":1,"g":2,"b":3,"a":4}"#).unwrap();
    assert_eq!(c, Rgba8::new(1, 2, 3, 4));
}
