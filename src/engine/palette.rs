/// Largest number of entries a GIF color table can hold.
pub const MAX_PALETTE_COLORS: usize = 256;

/// Number of RGB entries in a packed palette.
pub fn color_count(palette: &[u8]) -> usize {
    palette.len() / 3
}

/// RGB color at `index`, if present.
pub fn color_at(palette: &[u8], index: u8) -> Option<[u8; 3]> {
    let i = usize::from(index) * 3;
    palette.get(i..i + 3).map(|c| [c[0], c[1], c[2]])
}

/// Return a palette index that draws `color`.
///
/// Reuses an exact match, else appends `color` while the table has room, else falls back to
/// the nearest existing entry by squared RGB distance. `transparent` is never returned.
pub fn resolve_ink(palette: &mut Vec<u8>, transparent: Option<u8>, color: [u8; 3]) -> u8 {
    palette.truncate(color_count(palette) * 3);

    if let Some(idx) = find_exact(palette, transparent, color) {
        return idx;
    }

    let count = color_count(palette);
    let reserved = transparent.map(usize::from);
    if count < MAX_PALETTE_COLORS {
        palette.extend_from_slice(&color);
        return count as u8;
    }

    let mut best = None::<(u32, u8)>;
    for idx in 0..count {
        if Some(idx) == reserved {
            continue;
        }
        let c = &palette[idx * 3..idx * 3 + 3];
        let d = distance_sq([c[0], c[1], c[2]], color);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, idx as u8));
        }
    }
    best.map(|(_, idx)| idx).unwrap_or(0)
}

fn find_exact(palette: &[u8], transparent: Option<u8>, color: [u8; 3]) -> Option<u8> {
    palette
        .chunks_exact(3)
        .enumerate()
        .find(|(idx, c)| Some(*idx) != transparent.map(usize::from) && *c == color)
        .map(|(idx, _)| idx as u8)
}

fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/palette.rs"]
mod tests;
