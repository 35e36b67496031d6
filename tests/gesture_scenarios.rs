// End-to-end: landmarks in, finger states / modes / painter actions /
// volume levels out. Only the public API is used.

use approx::assert_abs_diff_eq;

use gesture_cam::canvas::Canvas;
use gesture_cam::draw::Command;
use gesture_cam::gesture::{FingersUp, fingers_up};
use gesture_cam::landmark::{Detection, DetectionKind, Detections, Landmark, hand};
use gesture_cam::menu::{GREEN, Menu, MenuEffect};
use gesture_cam::mode::Mode;
use gesture_cam::painter::{Action, Painter};
use gesture_cam::provider::pointer::posed_hand;
use gesture_cam::provider::{LandmarkProvider, ReplayProvider, parse_frame};
use gesture_cam::types::{FrameBuffer, PixelPoint};
use gesture_cam::volume::{VolumeMapping, pinch_distance};

const W: usize = 640;
const H: usize = 480;

fn detections(marks: Vec<Landmark>) -> Detections {
    let det = Detection::new(DetectionKind::Hand, 0.95, None, marks, None, (W, H));
    Detections { frame_size: (W, H), entities: vec![det] }
}

fn mode_of(marks: Vec<Landmark>) -> (Mode, PixelPoint) {
    let dets = detections(marks);
    let hand = dets.first_hand().expect("full hand");
    (Mode::from_fingers(fingers_up(&hand)), hand.pointer())
}

#[test]
fn thumb_and_index_select() {
    let marks = posed_hand(Landmark::new(0.3, 0.4), FingersUp([true, true, false, false, false]));
    let dets = detections(marks);
    let hand = dets.first_hand().unwrap();
    let up = fingers_up(&hand);
    assert_eq!(up.as_bits(), [1, 1, 0, 0, 0]);
    assert_eq!(Mode::from_fingers(up), Mode::Selection);
}

#[test]
fn every_finger_vector_dispatches() {
    for bits in 0..32u8 {
        let up = FingersUp::from_bits(bits);
        let (mode, _) = mode_of(posed_hand(Landmark::new(0.5, 0.4), up));
        let expected = if up.count() == 1 && up.0[1] {
            Mode::Drawing
        } else if up.count() >= 2 {
            Mode::Selection
        } else {
            Mode::Idle
        };
        assert_eq!(mode, expected, "{:?}", up.as_bits());
    }
}

#[test]
fn draw_then_pick_color_then_draw() {
    let mut painter = Painter::new(Canvas::new(W, H), Menu::standard(W), 4, 20);
    let index = FingersUp([false, true, false, false, false]);
    let two = FingersUp([false, true, true, false, false]);

    let a = mode_of(posed_hand(Landmark::new(0.5, 0.6), index));
    let b = mode_of(posed_hand(Landmark::new(0.6, 0.6), index));
    assert!(matches!(painter.step(Some(a)), Action::PenDown(_)));
    assert!(matches!(painter.step(Some(b)), Action::Stroke { .. }));
    assert_eq!(painter.canvas().pixels().get(b.1.x, b.1.y), Some(GREEN));

    // two fingers over the Blue section (x 384..512, y <= 80)
    let pick = mode_of(posed_hand(Landmark::new(0.7, 0.1), two));
    assert_eq!(pick.0, Mode::Selection);
    assert!(matches!(painter.step(Some(pick)), Action::Selected(MenuEffect::Color(_))));
    assert_ne!(painter.ink().0, GREEN);

    // returning to draw starts a fresh stroke
    assert!(matches!(painter.step(Some(a)), Action::PenDown(_)));

    painter.command(Command::Clear);
    assert_eq!(painter.canvas().pixels().get(b.1.x, b.1.y), Some(0));
}

#[test]
fn menu_hits_at_known_points() {
    let menu = Menu::standard(W);
    assert_eq!(menu.hit(PixelPoint::new(200, 40)), Some(MenuEffect::Color(GREEN)));
    assert_eq!(menu.hit(PixelPoint::new(256, 81)), None);
}

#[test]
fn pinch_maps_to_volume() {
    let mut marks = vec![Landmark::new(0.2, 0.2); hand::COUNT];
    marks[hand::THUMB_TIP] = Landmark::new(0.25, 0.5);
    // 70 px to the right of the thumb
    marks[hand::INDEX_TIP] = Landmark::new(0.25 + 70.0 / W as f32, 0.5);
    let dets = detections(marks);
    let hand = dets.first_hand().unwrap();
    let d = pinch_distance(&hand);
    assert_abs_diff_eq!(d, 70.0, epsilon = 1.0);
    let v = VolumeMapping::default().percent(d);
    assert!((48.0..=51.0).contains(&v), "{v}");
}

#[test]
fn replayed_frames_feed_the_classifier() {
    let frame = FrameBuffer::filled(W, H, 0);
    let dets = detections(posed_hand(Landmark::new(0.5, 0.4), FingersUp([false, true, false, false, false])));
    let det = &dets.entities[0];
    let line = format!(
        r#"{{"detections":[{{"kind":"hand","score":0.9,"landmarks":{}}}]}}"#,
        serde_json::to_string(&det.landmarks).unwrap()
    );
    // the parser and the replay provider agree
    let parsed = parse_frame(&line, (W, H), 0.5).unwrap();
    assert_eq!(parsed.entities[0].positions, det.positions);

    let mut replay = ReplayProvider::from_reader(std::io::Cursor::new(line), DetectionKind::Hand, 0.5);
    let got = replay.detect(&frame).unwrap();
    let hand = got.first_hand().unwrap();
    assert_eq!(Mode::from_fingers(fingers_up(&hand)), Mode::Drawing);
    assert!(replay.detect(&frame).unwrap().is_empty());
}
