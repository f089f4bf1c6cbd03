use super::*;

#[test]
fn exact_match_is_reused() {
    let mut pal = vec![10, 10, 10, 255, 255, 255];
    assert_eq!(resolve_ink(&mut pal, None, [255, 255, 255]), 1);
    assert_eq!(color_count(&pal), 2);
}

#[test]
fn missing_color_is_appended() {
    let mut pal = vec![10, 10, 10];
    assert_eq!(resolve_ink(&mut pal, None, [0, 0, 0]), 1);
    assert_eq!(pal, vec![10, 10, 10, 0, 0, 0]);
    assert_eq!(color_at(&pal, 1), Some([0, 0, 0]));
}

#[test]
fn transparent_entry_is_never_used_as_ink() {
    let mut pal = vec![255, 255, 255, 1, 2, 3];
    assert_eq!(resolve_ink(&mut pal, Some(0), [255, 255, 255]), 2);
    assert_eq!(color_count(&pal), 3);
}

#[test]
fn full_palette_falls_back_to_nearest() {
    let mut pal = Vec::with_capacity(MAX_PALETTE_COLORS * 3);
    for i in 0..MAX_PALETTE_COLORS {
        let v = (i as u8) & 0xfe;
        pal.extend_from_slice(&[v, v, 100]);
    }
    let before = pal.clone();

    let idx = resolve_ink(&mut pal, None, [255, 255, 255]);
    assert_eq!(pal, before);
    assert_eq!(color_at(&pal, idx), Some([254, 254, 100]));
}

#[test]
fn full_palette_nearest_skips_transparent() {
    let mut pal = vec![0u8; MAX_PALETTE_COLORS * 3];
    pal[3..6].copy_from_slice(&[250, 250, 250]);
    pal[6..9].copy_from_slice(&[200, 200, 200]);

    assert_eq!(resolve_ink(&mut pal, Some(1), [255, 255, 255]), 2);
}

#[test]
fn ragged_palette_is_trimmed_to_whole_entries() {
    let mut pal = vec![1, 2, 3, 4];
    assert_eq!(resolve_ink(&mut pal, None, [9, 9, 9]), 1);
    assert_eq!(pal, vec![1, 2, 3, 9, 9, 9]);
}
