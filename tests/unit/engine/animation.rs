use super::*;

fn two_frame_animation() -> Animation {
    Animation {
        width: 4,
        height: 2,
        global_palette: Some(vec![0, 0, 0, 255, 0, 0]),
        background: Some(0),
        loop_count: LoopCount::Infinite,
        frames: vec![
            AnimationFrame {
                left: 0,
                top: 0,
                width: 4,
                height: 2,
                delay: 7,
                dispose: Disposal::Keep,
                transparent: None,
                palette: None,
                indices: vec![0, 1, 0, 1, 1, 0, 1, 0],
            },
            AnimationFrame {
                left: 1,
                top: 1,
                width: 2,
                height: 1,
                delay: 12,
                dispose: Disposal::Background,
                transparent: Some(3),
                palette: Some(vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 1, 2, 3]),
                indices: vec![2, 3],
            },
        ],
    }
}

#[test]
fn encode_then_decode_keeps_structure() {
    let anim = two_frame_animation();
    let bytes = anim.encode().unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");

    let decoded = decode_animation(&bytes).unwrap();
    assert_eq!((decoded.width, decoded.height), (4, 2));
    assert_eq!(decoded.global_palette, anim.global_palette);
    assert_eq!(decoded.loop_count, LoopCount::Infinite);
    assert_eq!(decoded.frames, anim.frames);
    assert_eq!(decoded.delays(), vec![7, 12]);
}

#[test]
fn decode_first_frame_stops_early() {
    let bytes = two_frame_animation().encode().unwrap();
    let first = decode_first_frame(&bytes).unwrap();
    assert_eq!(first.frame_count(), 1);
    assert_eq!(first.frames[0].delay, 7);
}

#[test]
fn effective_palette_prefers_local() {
    let anim = two_frame_animation();
    let global = anim.global_palette.as_deref();
    assert_eq!(anim.frames[0].effective_palette(global), global);
    assert_eq!(
        anim.frames[1].effective_palette(global),
        anim.frames[1].palette.as_deref()
    );
}

#[test]
fn garbage_is_decode_error() {
    assert!(matches!(
        decode_animation(b"definitely not a gif"),
        Err(MemeError::Decode(_))
    ));
    assert!(matches!(decode_animation(&[]), Err(MemeError::Decode(_))));
}

#[test]
fn gif_without_frames_is_decode_error() {
    let anim = Animation {
        frames: Vec::new(),
        ..two_frame_animation()
    };
    let bytes = anim.encode().unwrap();
    assert!(matches!(decode_animation(&bytes), Err(MemeError::Decode(_))));
}

#[test]
fn oversized_logical_screen_is_decode_error() {
    let anim = Animation {
        width: u16::MAX,
        height: u16::MAX,
        frames: vec![AnimationFrame {
            left: 0,
            top: 0,
            width: 1,
            height: 1,
            delay: 1,
            dispose: Disposal::Keep,
            transparent: None,
            palette: None,
            indices: vec![1],
        }],
        ..two_frame_animation()
    };
    let bytes = anim.encode().unwrap();
    assert!(matches!(decode_animation(&bytes), Err(MemeError::Decode(_))));
    assert!(matches!(decode_first_frame(&bytes), Err(MemeError::Decode(_))));
}

#[test]
fn frame_without_any_palette_is_encode_error() {
    let mut anim = two_frame_animation();
    anim.global_palette = None;
    assert!(matches!(anim.encode(), Err(MemeError::Encode(_))));
}

#[test]
fn play_once_and_finite_loops_survive() {
    for count in [0u16, 3] {
        let anim = Animation {
            loop_count: LoopCount::Finite(count),
            ..two_frame_animation()
        };
        let decoded = decode_animation(&anim.encode().unwrap()).unwrap();
        assert_eq!(decoded.loop_count, LoopCount::Finite(count));
    }
}
