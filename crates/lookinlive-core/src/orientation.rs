//! Device and interface orientation, and the transforms derived from them.
//!
//! Two independent lookups live here:
//!
//! - [`resolve_transform`] turns the physical device orientation and the
//!   active camera into the affine transform applied to the preview view.
//! - [`resolve_sensor_code`] turns the UI interface orientation into the
//!   buffer-orientation token that feature detectors expect.
//!
//! The two take different inputs on purpose: with rotation lock on, the UI
//! orientation and the physical orientation disagree.

use crate::geometry::AffineTransform2D;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Physical orientation of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    /// Home button at the bottom.
    Portrait,
    /// Home button at the top.
    PortraitUpsideDown,
    /// Home button on the right.
    LandscapeLeft,
    /// Home button on the left.
    LandscapeRight,
    /// Screen facing the sky.
    FaceUp,
    /// Screen facing the ground.
    FaceDown,
}

impl From<i64> for DeviceOrientation {
    /// Map a platform device-orientation code (0-6).
    fn from(value: i64) -> Self {
        match value {
            1 => DeviceOrientation::Portrait,
            2 => DeviceOrientation::PortraitUpsideDown,
            3 => DeviceOrientation::LandscapeLeft,
            4 => DeviceOrientation::LandscapeRight,
            5 => DeviceOrientation::FaceUp,
            6 => DeviceOrientation::FaceDown,
            _ => DeviceOrientation::Unknown,
        }
    }
}

/// Which physical camera is delivering frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    /// The other camera.
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }

    /// Front cameras are shown mirrored.
    pub fn is_mirrored(self) -> bool {
        self == CameraFacing::Front
    }
}

/// Orientation of the user interface, which can differ from the device's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterfaceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl From<i64> for InterfaceOrientation {
    /// Map a platform interface-orientation code. Landscape codes are swapped
    /// relative to the device codes.
    fn from(value: i64) -> Self {
        match value {
            1 => InterfaceOrientation::Portrait,
            2 => InterfaceOrientation::PortraitUpsideDown,
            3 => InterfaceOrientation::LandscapeRight,
            4 => InterfaceOrientation::LandscapeLeft,
            _ => InterfaceOrientation::Unknown,
        }
    }
}

/// Buffer-orientation token consumed by feature detectors.
///
/// Values follow the EXIF orientation numbering (1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorCode(pub u8);

impl SensorCode {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for SensorCode {
    fn default() -> Self {
        SensorCode(1)
    }
}

/// Transform that makes the preview upright for the given device orientation
/// and camera.
///
/// The back camera sensor is mounted in landscape-left, so that orientation
/// needs no rotation. Front camera transforms add a horizontal mirror after
/// the rotation. Face-up, face-down and unknown fall back to the portrait
/// rotation without a mirror.
pub fn resolve_transform(device: DeviceOrientation, facing: CameraFacing) -> AffineTransform2D {
    use CameraFacing::{Back, Front};
    use DeviceOrientation::*;

    let (angle, mirror) = match (device, facing) {
        (LandscapeRight, Back) => (Some(PI), false),
        (LandscapeRight, Front) => (None, true),
        (LandscapeLeft, Back) => (None, false),
        (LandscapeLeft, Front) => (Some(PI), true),
        (PortraitUpsideDown, Back) => (Some(3.0 * FRAC_PI_2), false),
        (PortraitUpsideDown, Front) => (Some(3.0 * FRAC_PI_2), true),
        (Portrait, Back) => (Some(FRAC_PI_2), false),
        (Portrait, Front) => (Some(FRAC_PI_2), true),
        (Unknown | FaceUp | FaceDown, _) => (Some(FRAC_PI_2), false),
    };

    let rotation = angle.map_or(AffineTransform2D::IDENTITY, AffineTransform2D::rotation);
    if mirror {
        rotation.concat(&AffineTransform2D::flip_x())
    } else {
        rotation
    }
}

/// Sensor code for the given interface orientation.
pub fn resolve_sensor_code(interface: InterfaceOrientation) -> SensorCode {
    match interface {
        InterfaceOrientation::Portrait => SensorCode(5),
        InterfaceOrientation::PortraitUpsideDown => SensorCode(7),
        InterfaceOrientation::LandscapeLeft => SensorCode(1),
        InterfaceOrientation::LandscapeRight => SensorCode(3),
        InterfaceOrientation::Unknown => SensorCode::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::QuarterTurn;

    const EPS: f64 = 1e-12;

    fn rotated(angle: f64) -> AffineTransform2D {
        AffineTransform2D::rotation(angle)
    }

    fn mirrored(angle: f64) -> AffineTransform2D {
        AffineTransform2D::rotation(angle).concat(&AffineTransform2D::flip_x())
    }

    #[test]
    fn test_landscape_left_back_is_identity() {
        let t = resolve_transform(DeviceOrientation::LandscapeLeft, CameraFacing::Back);
        assert!(t.is_identity());
    }

    #[test]
    fn test_landscape_left_front_is_half_turn_mirrored() {
        let t = resolve_transform(DeviceOrientation::LandscapeLeft, CameraFacing::Front);
        assert!(t.approx_eq(&mirrored(PI), EPS));
        assert_eq!(t.quarter_turn(), Some(QuarterTurn { turns: 2, mirror: true }));
    }

    #[test]
    fn test_full_table() {
        use CameraFacing::{Back, Front};
        use DeviceOrientation::*;

        let expected = [
            (LandscapeRight, Back, rotated(PI)),
            (LandscapeRight, Front, AffineTransform2D::flip_x()),
            (LandscapeLeft, Back, AffineTransform2D::IDENTITY),
            (LandscapeLeft, Front, mirrored(PI)),
            (PortraitUpsideDown, Back, rotated(3.0 * FRAC_PI_2)),
            (PortraitUpsideDown, Front, mirrored(3.0 * FRAC_PI_2)),
            (Portrait, Back, rotated(FRAC_PI_2)),
            (Portrait, Front, mirrored(FRAC_PI_2)),
            (FaceUp, Back, rotated(FRAC_PI_2)),
            (FaceUp, Front, rotated(FRAC_PI_2)),
            (FaceDown, Back, rotated(FRAC_PI_2)),
            (FaceDown, Front, rotated(FRAC_PI_2)),
            (Unknown, Back, rotated(FRAC_PI_2)),
            (Unknown, Front, rotated(FRAC_PI_2)),
        ];

        for (device, facing, want) in expected {
            let got = resolve_transform(device, facing);
            assert!(
                got.approx_eq(&want, EPS),
                "{device:?}/{facing:?}: got {got:?}, want {want:?}"
            );
        }
    }

    #[test]
    fn test_front_camera_always_mirrors_when_mapped() {
        use DeviceOrientation::*;
        for device in [Portrait, PortraitUpsideDown, LandscapeLeft, LandscapeRight] {
            let t = resolve_transform(device, CameraFacing::Front);
            assert!(t.determinant() < 0.0, "{device:?} front should mirror");
            let t = resolve_transform(device, CameraFacing::Back);
            assert!(t.determinant() > 0.0, "{device:?} back should not mirror");
        }
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let a = resolve_transform(DeviceOrientation::Portrait, CameraFacing::Front);
        let b = resolve_transform(DeviceOrientation::Portrait, CameraFacing::Front);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sensor_codes() {
        assert_eq!(resolve_sensor_code(InterfaceOrientation::Portrait).value(), 5);
        assert_eq!(resolve_sensor_code(InterfaceOrientation::PortraitUpsideDown).value(), 7);
        assert_eq!(resolve_sensor_code(InterfaceOrientation::LandscapeLeft).value(), 1);
        assert_eq!(resolve_sensor_code(InterfaceOrientation::LandscapeRight).value(), 3);
        assert_eq!(resolve_sensor_code(InterfaceOrientation::Unknown).value(), 1);
    }

    #[test]
    fn test_device_orientation_from_code() {
        assert_eq!(DeviceOrientation::from(1), DeviceOrientation::Portrait);
        assert_eq!(DeviceOrientation::from(3), DeviceOrientation::LandscapeLeft);
        assert_eq!(DeviceOrientation::from(6), DeviceOrientation::FaceDown);
        assert_eq!(DeviceOrientation::from(42), DeviceOrientation::Unknown); // Invalid defaults to Unknown
    }

    #[test]
    fn test_interface_orientation_from_code() {
        assert_eq!(InterfaceOrientation::from(1), InterfaceOrientation::Portrait);
        assert_eq!(InterfaceOrientation::from(3), InterfaceOrientation::LandscapeRight);
        assert_eq!(InterfaceOrientation::from(4), InterfaceOrientation::LandscapeLeft);
        assert_eq!(InterfaceOrientation::from(-1), InterfaceOrientation::Unknown);
    }

    #[test]
    fn test_facing_toggle() {
        assert_eq!(CameraFacing::Back.toggled(), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.toggled(), CameraFacing::Back);
        assert!(CameraFacing::Front.is_mirrored());
        assert!(!CameraFacing::Back.is_mirrored());
    }
}
