//! Named facial landmarks over a MediaPipe Face Mesh point set
//!
//! The detector produces 478 points (468 face mesh + 10 iris). Measurement
//! code never indexes that sequence directly; it asks for a semantic
//! [`LandmarkName`] through [`LandmarkLookup`], which yields `None` when the
//! index lies beyond the points actually supplied. Short or empty sets are
//! therefore valid input and simply degrade the measurements that need the
//! missing points.
//!
//! # Index layout
//!
//! ```text
//! eyes       133/33 (left inner/outer), 362/263 (right inner/outer)
//! iris       468, 473 (pupil centres, refined model only)
//! jaw        172/397 (gonion), 132/361, 58/288
//! cheekbones 93/323 (zygion), 116/345
//! midline    10 forehead, 9 glabella, 168 nasion, 4 nose tip, 94 subnasale,
//!            0 upper lip, 17 lower lip, 152 menton, 199 pogonion
//! ```

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single landmark: x, y normalised to [0, 1] in the image plane, z relative depth
pub type LandmarkPoint = Point3<f64>;

pub const FACE_MESH_POINTS: usize = 468;
pub const IRIS_POINTS: usize = 10;
/// Full refined face mesh size
pub const EXPECTED_LANDMARKS: usize = FACE_MESH_POINTS + IRIS_POINTS;

/// Semantic landmark names understood by the measurement code.
///
/// Variant order must match [`LANDMARK_INDEX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    LeftInnerCanthus,
    LeftOuterCanthus,
    RightInnerCanthus,
    RightOuterCanthus,
    LeftPupil,
    RightPupil,
    LeftGonion,
    RightGonion,
    LeftJaw1,
    RightJaw1,
    LeftJaw2,
    RightJaw2,
    LeftZygion,
    RightZygion,
    LeftCheekbone,
    RightCheekbone,
    ForeheadTop,
    Glabella,
    Nasion,
    NoseTip,
    Subnasale,
    UpperLip,
    LowerLip,
    ChinMenton,
    ChinPogonion,
    NoseBridge1,
    NoseBridge2,
    NoseBridge3,
    LeftEyebrowInner,
    LeftEyebrowOuter,
    RightEyebrowInner,
    RightEyebrowOuter,
    LipLeftCorner,
    LipRightCorner,
    UpperLipCenter,
    LowerLipCenter,
    FaceLeft1,
    FaceRight1,
}

/// Name -> face mesh position. This table is the contract the upstream
/// detector has to satisfy.
pub static LANDMARK_INDEX: [(LandmarkName, &str, usize); 38] = [
    (LandmarkName::LeftInnerCanthus, "left_inner_canthus", 133),
    (LandmarkName::LeftOuterCanthus, "left_outer_canthus", 33),
    (LandmarkName::RightInnerCanthus, "right_inner_canthus", 362),
    (LandmarkName::RightOuterCanthus, "right_outer_canthus", 263),
    (LandmarkName::LeftPupil, "left_pupil", 468),
    (LandmarkName::RightPupil, "right_pupil", 473),
    (LandmarkName::LeftGonion, "left_gonion", 172),
    (LandmarkName::RightGonion, "right_gonion", 397),
    (LandmarkName::LeftJaw1, "left_jaw_1", 132),
    (LandmarkName::RightJaw1, "right_jaw_1", 361),
    (LandmarkName::LeftJaw2, "left_jaw_2", 58),
    (LandmarkName::RightJaw2, "right_jaw_2", 288),
    (LandmarkName::LeftZygion, "left_zygion", 93),
    (LandmarkName::RightZygion, "right_zygion", 323),
    (LandmarkName::LeftCheekbone, "left_cheekbone", 116),
    (LandmarkName::RightCheekbone, "right_cheekbone", 345),
    (LandmarkName::ForeheadTop, "forehead_top", 10),
    (LandmarkName::Glabella, "glabella", 9),
    (LandmarkName::Nasion, "nasion", 168),
    (LandmarkName::NoseTip, "nose_tip", 4),
    (LandmarkName::Subnasale, "subnasale", 94),
    (LandmarkName::UpperLip, "upper_lip", 0),
    (LandmarkName::LowerLip, "lower_lip", 17),
    (LandmarkName::ChinMenton, "chin_menton", 152),
    (LandmarkName::ChinPogonion, "chin_pogonion", 199),
    (LandmarkName::NoseBridge1, "nose_bridge_1", 6),
    (LandmarkName::NoseBridge2, "nose_bridge_2", 197),
    (LandmarkName::NoseBridge3, "nose_bridge_3", 195),
    (LandmarkName::LeftEyebrowInner, "left_eyebrow_inner", 107),
    (LandmarkName::LeftEyebrowOuter, "left_eyebrow_outer", 70),
    (LandmarkName::RightEyebrowInner, "right_eyebrow_inner", 336),
    (LandmarkName::RightEyebrowOuter, "right_eyebrow_outer", 300),
    (LandmarkName::LipLeftCorner, "lip_left_corner", 61),
    (LandmarkName::LipRightCorner, "lip_right_corner", 291),
    (LandmarkName::UpperLipCenter, "upper_lip_center", 13),
    (LandmarkName::LowerLipCenter, "lower_lip_center", 14),
    (LandmarkName::FaceLeft1, "face_left_1", 234),
    (LandmarkName::FaceRight1, "face_right_1", 454),
];

impl LandmarkName {
    /// Every name, in index-table order
    pub fn all() -> impl Iterator<Item = LandmarkName> {
        LANDMARK_INDEX.iter().map(|(name, _, _)| *name)
    }

    /// Position of this landmark in the face mesh
    pub fn index(self) -> usize {
        LANDMARK_INDEX[self as usize].2
    }

    pub fn as_str(self) -> &'static str {
        LANDMARK_INDEX[self as usize].1
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LANDMARK_INDEX
            .iter()
            .find(|(_, key, _)| *key == wanted)
            .map(|(name, _, _)| *name)
            .ok_or_else(|| format!("Unknown landmark '{}'", s))
    }
}

/// Positional access to a landmark point cloud.
///
/// Implementors only provide raw positional access; the named lookup is
/// shared so every representation gets the same out-of-range handling.
pub trait LandmarkLookup {
    fn point_at(&self, position: usize) -> Option<LandmarkPoint>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a named landmark, `None` if the set is too short to contain it
    fn landmark(&self, name: LandmarkName) -> Option<LandmarkPoint> {
        self.point_at(name.index())
    }
}

impl LandmarkLookup for [LandmarkPoint] {
    fn point_at(&self, position: usize) -> Option<LandmarkPoint> {
        self.get(position).copied()
    }

    fn len(&self) -> usize {
        <[LandmarkPoint]>::len(self)
    }
}

/// String-keyed lookup; unknown names resolve to `None` like missing points.
pub fn lookup<L>(set: &L, name: &str) -> Option<LandmarkPoint>
where
    L: LandmarkLookup + ?Sized,
{
    name.parse::<LandmarkName>()
        .ok()
        .and_then(|name| set.landmark(name))
}

/// Ordered landmark set as produced by the detector for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RawPoint>", into = "Vec<[f64; 3]>")]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Parse a JSON array of `[x, y, z]`, `[x, y]` or `{"x", "y", "z"}` points
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    /// Whether the set carries the full refined mesh (face + iris)
    pub fn is_complete(&self) -> bool {
        self.points.len() >= EXPECTED_LANDMARKS
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkSet {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}

impl LandmarkLookup for LandmarkSet {
    fn point_at(&self, position: usize) -> Option<LandmarkPoint> {
        self.points.point_at(position)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Accepted on-disk point shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Coords(Vec<f64>),
    Named {
        x: f64,
        y: f64,
        #[serde(default)]
        z: f64,
    },
}

impl TryFrom<Vec<RawPoint>> for LandmarkSet {
    type Error = String;

    fn try_from(raw: Vec<RawPoint>) -> Result<Self, Self::Error> {
        let points = raw
            .into_iter()
            .enumerate()
            .map(|(i, point)| match point {
                RawPoint::Coords(c) if c.len() == 3 => Ok(Point3::new(c[0], c[1], c[2])),
                RawPoint::Coords(c) if c.len() == 2 => Ok(Point3::new(c[0], c[1], 0.0)),
                RawPoint::Coords(c) => Err(format!(
                    "landmark {} has {} coordinates, expected 2 or 3",
                    i,
                    c.len()
                )),
                RawPoint::Named { x, y, z } => Ok(Point3::new(x, y, z)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }
}

impl From<LandmarkSet> for Vec<[f64; 3]> {
    fn from(set: LandmarkSet) -> Self {
        set.points.iter().map(|p| [p.x, p.y, p.z]).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A full-size synthetic frontal face. Unnamed points sit on the midline
    /// at (0.5, 0.5) so they never influence symmetry.
    pub(crate) fn synthetic_face() -> LandmarkSet {
        let mut points = vec![Point3::new(0.5, 0.5, 0.0); EXPECTED_LANDMARKS];
        for (name, (x, y)) in [
            (LandmarkName::ForeheadTop, (0.50, 0.10)),
            (LandmarkName::Glabella, (0.50, 0.30)),
            (LandmarkName::Nasion, (0.50, 0.34)),
            (LandmarkName::NoseBridge1, (0.50, 0.38)),
            (LandmarkName::NoseTip, (0.50, 0.55)),
            (LandmarkName::Subnasale, (0.50, 0.60)),
            (LandmarkName::UpperLip, (0.50, 0.65)),
            (LandmarkName::ChinMenton, (0.50, 0.90)),
            (LandmarkName::LeftOuterCanthus, (0.30, 0.39)),
            (LandmarkName::LeftInnerCanthus, (0.42, 0.40)),
            (LandmarkName::RightInnerCanthus, (0.58, 0.40)),
            (LandmarkName::RightOuterCanthus, (0.70, 0.39)),
            (LandmarkName::LeftZygion, (0.20, 0.45)),
            (LandmarkName::RightZygion, (0.80, 0.45)),
            (LandmarkName::LeftGonion, (0.27, 0.75)),
            (LandmarkName::RightGonion, (0.73, 0.75)),
            (LandmarkName::LeftJaw1, (0.22, 0.62)),
            (LandmarkName::RightJaw1, (0.78, 0.62)),
            (LandmarkName::LeftEyebrowInner, (0.44, 0.33)),
            (LandmarkName::LeftEyebrowOuter, (0.28, 0.32)),
            (LandmarkName::RightEyebrowInner, (0.56, 0.33)),
            (LandmarkName::RightEyebrowOuter, (0.72, 0.32)),
        ] {
            points[name.index()] = Point3::new(x, y, 0.0);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_index_table_matches_variant_order() {
        for (position, (name, _, _)) in LANDMARK_INDEX.iter().enumerate() {
            assert_eq!(*name as usize, position, "{} out of order", name);
        }
        assert_eq!(LandmarkName::all().count(), LANDMARK_INDEX.len());
    }

    #[test]
    fn test_known_positions() {
        assert_eq!(LandmarkName::LeftInnerCanthus.index(), 133);
        assert_eq!(LandmarkName::ChinMenton.index(), 152);
        assert_eq!(LandmarkName::RightPupil.index(), 473);
        assert_eq!(LandmarkName::UpperLip.as_str(), "upper_lip");
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(
            "nose_bridge_1".parse::<LandmarkName>(),
            Ok(LandmarkName::NoseBridge1)
        );
        assert_eq!(" Glabella ".parse::<LandmarkName>(), Ok(LandmarkName::Glabella));
        assert!("third_eye".parse::<LandmarkName>().is_err());
    }

    #[test]
    fn test_lookup_out_of_range_is_absent() {
        let short = LandmarkSet::new(vec![Point3::new(0.1, 0.2, 0.3); 200]);
        assert!(short.landmark(LandmarkName::ChinMenton).is_some());
        assert!(short.landmark(LandmarkName::RightInnerCanthus).is_none());
        assert!(short.landmark(LandmarkName::LeftPupil).is_none());
        assert!(lookup(&short, "not_a_landmark").is_none());
        assert!(LandmarkSet::default()
            .landmark(LandmarkName::UpperLip)
            .is_none());
    }

    #[test]
    fn test_slice_lookup() {
        let points = vec![Point3::new(0.25, 0.75, -0.01)];
        let found = points.as_slice().landmark(LandmarkName::UpperLip);
        assert_eq!(found, Some(Point3::new(0.25, 0.75, -0.01)));
        assert!(!points.as_slice().is_empty());
    }

    #[test]
    fn test_parse_mixed_point_shapes() {
        let set = LandmarkSet::from_json(r#"[[0.1, 0.2, 0.3], [0.4, 0.5], {"x": 0.6, "y": 0.7}]"#)
            .expect("parse landmark json");
        assert_eq!(set.len(), 3);
        assert_eq!(set.points()[1], Point3::new(0.4, 0.5, 0.0));
        assert_eq!(set.points()[2], Point3::new(0.6, 0.7, 0.0));
    }

    #[test]
    fn test_parse_rejects_bad_arity() {
        assert!(LandmarkSet::from_json("[[0.1]]").is_err());
        assert!(LandmarkSet::from_json(r#"[{"x": 0.1}]"#).is_err());
    }

    #[test]
    fn test_empty_set_parses() {
        let set = LandmarkSet::from_json("[]").expect("parse empty set");
        assert!(set.is_empty());
        assert!(!set.is_complete());
    }

    #[test]
    fn test_serialize_as_triples() {
        let set = LandmarkSet::new(vec![Point3::new(0.5, 0.25, 0.0)]);
        let json = serde_json::to_string(&set).expect("serialize set");
        assert_eq!(json, "[[0.5,0.25,0.0]]");
    }

    #[test]
    fn test_synthetic_face_is_complete() {
        assert!(synthetic_face().is_complete());
    }
}
