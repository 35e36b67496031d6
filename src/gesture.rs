// Finger-up classification.
//
// A digit counts as "up" when its tip lies beyond a reference joint along the
// direction the finger points. Which axis and which direction that is depends
// on how the hand is held, so the hand's `Orientation` is classified first
// and selects the `FingerRule` used for every digit.

use crate::landmark::{Hand, hand};

/// Fingers in the order used by [`FingersUp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Digit {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl Digit {
    pub const ALL: [Digit; 5] = [Digit::Thumb, Digit::Index, Digit::Middle, Digit::Ring, Digit::Pinky];
}

/// Which digits are extended: `[thumb, index, middle, ring, pinky]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingersUp(pub [bool; 5]);

impl FingersUp {
    pub const NONE: FingersUp = FingersUp([false; 5]);

    pub fn is_up(self, digit: Digit) -> bool {
        self.0[digit as usize]
    }

    pub fn count(self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    /// Builds a vector from the low five bits of `bits`, bit 0 = thumb.
    pub fn from_bits(bits: u8) -> Self {
        let mut out = [false; 5];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = bits & (1 << i) != 0;
        }
        FingersUp(out)
    }

    /// `[1, 1, 0, 0, 0]` style rendering.
    pub fn as_bits(self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

/// Which way the thumb side of the hand faces in the (mirrored) image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Thumb left of the pinky.
    Right,
    /// Thumb right of the pinky.
    Left,
}

/// Coarse hand pose, enough to decide which axis fingers extend along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Fingers point up, palm roughly toward the camera.
    Vertical(Side),
    /// Fingers point sideways.
    Horizontal(Side),
}

/// Wrist-to-middle-knuckle height (normalized) above which a hand is upright.
pub const VERTICAL_THRESHOLD: f32 = 0.1;

impl Orientation {
    pub fn classify(hand: &Hand<'_>) -> Self {
        let wrist = hand.landmark(hand::WRIST);
        let middle_mcp = hand.landmark(hand::MIDDLE_MCP);
        let side = if hand.landmark(hand::THUMB_TIP).x < hand.landmark(hand::PINKY_TIP).x {
            Side::Right
        } else {
            Side::Left
        };

        if (middle_mcp.y - wrist.y).abs() > VERTICAL_THRESHOLD {
            Orientation::Vertical(side)
        } else {
            Orientation::Horizontal(side)
        }
    }

    pub fn rule(self) -> FingerRule {
        match self {
            Orientation::Vertical(side) => FingerRule {
                thumb: Compare {
                    axis: Axis::X,
                    toward: match side {
                        Side::Right => Toward::Negative,
                        Side::Left => Toward::Positive,
                    },
                },
                thumb_joint: hand::THUMB_IP,
                fingers: Compare { axis: Axis::Y, toward: Toward::Negative },
            },
            Orientation::Horizontal(side) => FingerRule {
                thumb: Compare { axis: Axis::Y, toward: Toward::Negative },
                thumb_joint: hand::THUMB_MCP,
                fingers: Compare {
                    axis: Axis::X,
                    toward: match side {
                        Side::Right => Toward::Positive,
                        Side::Left => Toward::Negative,
                    },
                },
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Direction in image coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toward {
    Negative,
    Positive,
}

/// "Tip lies beyond the joint along `axis` in direction `toward`".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compare {
    pub axis: Axis,
    pub toward: Toward,
}

impl Compare {
    fn holds(self, hand: &Hand<'_>, tip: usize, joint: usize) -> bool {
        let (t, j) = (hand.landmark(tip), hand.landmark(joint));
        let (t, j) = match self.axis {
            Axis::X => (t.x, j.x),
            Axis::Y => (t.y, j.y),
        };
        match self.toward {
            Toward::Negative => t < j,
            Toward::Positive => t > j,
        }
    }
}

/// The comparisons applied to one hand. The thumb's reference joint depends
/// on the orientation; the other four always use their PIP joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerRule {
    pub thumb: Compare,
    pub thumb_joint: usize,
    pub fingers: Compare,
}

impl FingerRule {
    pub fn apply(self, hand: &Hand<'_>) -> FingersUp {
        let mut up = [false; 5];
        up[0] = self.thumb.holds(hand, hand::THUMB_TIP, self.thumb_joint);
        for (slot, (&tip, &pip)) in up[1..].iter_mut().zip(hand::TIPS[1..].iter().zip(&hand::FINGER_PIPS)) {
            *slot = self.fingers.holds(hand, tip, pip);
        }
        FingersUp(up)
    }
}

/// Classify every digit of `hand`.
pub fn fingers_up(hand: &Hand<'_>) -> FingersUp {
    let orientation = Orientation::classify(hand);
    let up = orientation.rule().apply(hand);
    log::trace!("{orientation:?} -> {:?}", up.as_bits());
    up
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::landmark::Landmark;
    use crate::provider::pointer::posed_hand;
    use crate::types::PixelPoint;

    /// An upright right hand with the index tip at `(0.5, 0.4)`.
    pub(crate) fn upright_hand(up: FingersUp) -> Vec<Landmark> {
        posed_hand(Landmark::new(0.5, 0.4), up)
    }

    fn classify(marks: &[Landmark]) -> FingersUp {
        let px = vec![PixelPoint::new(0, 0); marks.len()];
        fingers_up(&Hand::new(marks, &px).unwrap())
    }

    /// Rotate an upright hand 90 degrees so fingers point toward +x.
    fn lay_down(marks: &[Landmark]) -> Vec<Landmark> {
        marks.iter().map(|m| Landmark::new(1.0 - m.y, m.x)).collect()
    }

    #[test]
    fn every_upright_combination_round_trips() {
        for bits in 0..32u8 {
            let want = FingersUp::from_bits(bits);
            assert_eq!(classify(&upright_hand(want)), want, "bits {bits:05b}");
        }
    }

    #[test]
    fn upright_right_hand_is_vertical() {
        let marks = upright_hand(FingersUp::NONE);
        let px = vec![PixelPoint::new(0, 0); marks.len()];
        let hand = Hand::new(&marks, &px).unwrap();
        assert_eq!(Orientation::classify(&hand), Orientation::Vertical(Side::Right));
    }

    /// Flip left to right, turning a right-facing hand into a left-facing one.
    fn mirror(marks: &[Landmark]) -> Vec<Landmark> {
        marks.iter().map(|m| Landmark::new(1.0 - m.x, m.y)).collect()
    }

    fn orientation(marks: &[Landmark]) -> Orientation {
        let px = vec![PixelPoint::new(0, 0); marks.len()];
        Orientation::classify(&Hand::new(marks, &px).unwrap())
    }

    #[test]
    fn sideways_right_hand_round_trips() {
        for bits in 0..32u8 {
            let want = FingersUp::from_bits(bits);
            let marks = lay_down(&upright_hand(want));
            assert_eq!(orientation(&marks), Orientation::Horizontal(Side::Right));
            assert_eq!(classify(&marks), want, "bits {bits:05b}");
        }
    }

    #[test]
    fn sideways_left_hand_round_trips() {
        // fingers now point toward -x, so a finger is up when its tip is left of the PIP
        for bits in 0..32u8 {
            let want = FingersUp::from_bits(bits);
            let marks = mirror(&lay_down(&upright_hand(want)));
            assert_eq!(orientation(&marks), Orientation::Horizontal(Side::Left));
            assert_eq!(classify(&marks), want, "bits {bits:05b}");
        }
    }

    #[test]
    fn sideways_thumb_compares_height_with_its_mcp() {
        let mut marks = lay_down(&upright_hand(FingersUp::NONE));
        let mcp = marks[hand::THUMB_MCP];

        marks[hand::THUMB_TIP].y = mcp.y - 0.02;
        assert_eq!(classify(&marks).as_bits(), [1, 0, 0, 0, 0]);
        marks[hand::THUMB_TIP].y = mcp.y + 0.02;
        assert_eq!(classify(&marks).as_bits(), [0, 0, 0, 0, 0]);

        // same on a left-facing hand
        let mut left = mirror(&marks);
        assert_eq!(orientation(&left), Orientation::Horizontal(Side::Left));
        assert!(!classify(&left).is_up(Digit::Thumb));
        left[hand::THUMB_TIP].y = mcp.y - 0.02;
        assert!(classify(&left).is_up(Digit::Thumb));
    }

    #[test]
    fn left_facing_vertical_thumb_points_right() {
        let mut marks = upright_hand(FingersUp::NONE);
        // mirror horizontally: thumb now on the right of the pinky
        for m in &mut marks {
            m.x = 1.0 - m.x;
        }
        let px = vec![PixelPoint::new(0, 0); marks.len()];
        let hand = Hand::new(&marks, &px).unwrap();
        assert_eq!(Orientation::classify(&hand), Orientation::Vertical(Side::Left));
        assert!(!fingers_up(&hand).is_up(Digit::Thumb));

        marks[hand::THUMB_TIP].x = marks[hand::THUMB_IP].x + 0.02;
        let hand = Hand::new(&marks, &px).unwrap();
        assert!(fingers_up(&hand).is_up(Digit::Thumb));
    }

    #[test]
    fn count_and_bits() {
        let up = FingersUp::from_bits(0b00011);
        assert_eq!(up.as_bits(), [1, 1, 0, 0, 0]);
        assert_eq!(up.count(), 2);
    }
}
