use super::*;

#[test]
fn rejects_mismatched_length_and_empty_dimensions() {
    assert!(PixelBuffer::from_rgba8_premul(2, 2, vec![0; 15]).is_err());
    assert!(PixelBuffer::from_rgba8_premul(0, 2, vec![]).is_err());
    let ok = PixelBuffer::from_rgba8_premul(2, 1, vec![0; 8]).unwrap();
    assert_eq!(ok.format(), PixelFormat::Rgba8Premul);
    assert_eq!(ok.bounds(), Rect::new(0.0, 0.0, 2.0, 1.0));
}

#[test]
fn recycle_hides_pixels_and_is_idempotent() {
    let mut buf = PixelBuffer::filled(3, 2, [1, 2, 3, 255]).unwrap();
    assert!(!buf.is_recycled());
    assert_eq!(buf.pixels().unwrap().len(), 24);

    buf.recycle();
    assert!(buf.is_recycled());
    assert!(buf.pixels().is_none());
    assert!(buf.view().is_none());

    buf.recycle();
    assert!(buf.is_recycled());
}

#[test]
fn view_outlives_recycle_of_its_buffer() {
    let mut buf = PixelBuffer::filled(1, 1, [9, 9, 9, 255]).unwrap();
    let view = buf.view().unwrap();
    buf.recycle();
    assert_eq!(view.pixels(), &[9, 9, 9, 255]);
}

#[test]
fn pixel_clamped_reads_edges() {
    let buf = PixelBuffer::from_rgba8_premul(2, 1, vec![1, 1, 1, 255, 2, 2, 2, 255]).unwrap();
    let view = buf.view().unwrap();
    assert_eq!(view.pixel_clamped(-5, 0), [1, 1, 1, 255]);
    assert_eq!(view.pixel_clamped(7, 3), [2, 2, 2, 255]);
}

#[test]
fn shared_image_identity() {
    let a = SharedImage::new(PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap()).unwrap();
    let b = a.clone();
    let c = SharedImage::new(PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap()).unwrap();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));

    let mut recycled = PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap();
    recycled.recycle();
    assert!(SharedImage::new(recycled).is_err());
}
