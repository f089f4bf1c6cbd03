use super::*;

#[test]
fn pass_coverage_decides_ink_regardless_of_color() {
    // fill pass: dark red opaque, nothing, faint, opaque white
    let fill = [
        128, 0, 0, 255, //
        0, 0, 0, 0, //
        40, 40, 40, 40, //
        255, 255, 255, 255,
    ];
    // outline pass: opaque white, opaque black, faint, opaque
    let outline = [
        255, 255, 255, 255, //
        0, 0, 0, 255, //
        40, 40, 40, 40, //
        0, 0, 0, 255,
    ];
    let ov = CaptionOverlay::from_pass_coverage(4, 2, &fill, &outline);
    assert_eq!(ov.get(0, 0), Some(Ink::Fill));
    assert_eq!(ov.get(1, 0), Some(Ink::Outline));
    assert_eq!(ov.get(2, 0), None);
    assert_eq!(ov.get(3, 0), Some(Ink::Fill));
    assert_eq!(ov.get(0, 1), None);
    assert_eq!(ov.ink_rows(), Some((0, 0)));
}

#[test]
fn set_tracks_ink_rows_and_ignores_out_of_bounds() {
    let mut ov = CaptionOverlay::empty(3, 10);
    assert!(ov.is_empty());
    ov.set(1, 7, Ink::Fill);
    ov.set(0, 2, Ink::Outline);
    ov.set(5, 5, Ink::Fill);
    assert_eq!(ov.ink_rows(), Some((2, 7)));
    assert_eq!(ov.get(5, 5), None);
}

#[test]
fn touches_checks_row_overlap() {
    let mut ov = CaptionOverlay::empty(10, 10);
    ov.set(4, 2, Ink::Fill);
    assert!(ov.touches(0, 0, 10, 3));
    assert!(!ov.touches(0, 3, 10, 7));
    assert!(!ov.touches(10, 0, 5, 5));
    assert!(!CaptionOverlay::empty(10, 10).touches(0, 0, 10, 10));
}
