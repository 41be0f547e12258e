//! Pose sources sampled once per recorded frame.

use glam::{Quat, Vec3};

/// Something with a world-space translation and orientation.
///
/// The host implements this for the actor being recorded. Only these two
/// accessors are used; animation state is not read.
pub trait PoseSource {
    /// World-space translation.
    fn translation(&self) -> Vec3;

    /// World-space orientation.
    fn orientation(&self) -> Quat;
}

/// A fixed pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticPose {
    /// Translation returned by [`PoseSource::translation`].
    pub translation: Vec3,
    /// Orientation returned by [`PoseSource::orientation`].
    pub orientation: Quat,
}

impl StaticPose {
    /// Creates a pose at `translation` with the given orientation.
    #[must_use]
    pub const fn new(translation: Vec3, orientation: Quat) -> Self {
        Self {
            translation,
            orientation,
        }
    }

    /// Creates an unrotated pose at `translation`.
    #[must_use]
    pub const fn at(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }
}

impl PoseSource for StaticPose {
    fn translation(&self) -> Vec3 {
        self.translation
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}
