use glam::{Mat4, Vec3};
use insanity::camera::{Camera, MovementKey, PITCH_LIMIT};

const EPSILON: f32 = 1e-5;

fn camera_at(yaw: f32, pitch: f32) -> Camera {
    Camera::new(Vec3::ZERO, Vec3::Y, yaw, pitch, 5.0, 0.5)
}

#[cfg(test)]
mod camera_basis_tests {
    use super::*;

    #[test]
    fn test_basis_is_orthonormal_over_yaw_and_pitch() {
        let mut yaw = -360.0;
        while yaw <= 360.0 {
            let mut pitch = -PITCH_LIMIT;
            while pitch <= PITCH_LIMIT {
                let camera = camera_at(yaw, pitch);
                let (f, r, u) = (camera.front(), camera.right(), camera.up());

                for v in [f, r, u] {
                    assert!(
                        (v.length() - 1.0).abs() < EPSILON,
                        "not unit length at yaw {} pitch {}: {:?}",
                        yaw,
                        pitch,
                        v
                    );
                }
                assert!(f.dot(r).abs() < EPSILON, "front·right at {} {}", yaw, pitch);
                assert!(f.dot(u).abs() < EPSILON, "front·up at {} {}", yaw, pitch);
                assert!(r.dot(u).abs() < EPSILON, "right·up at {} {}", yaw, pitch);

                pitch += 8.9;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn test_yaw_minus_ninety_looks_down_negative_z() {
        let camera = camera_at(-90.0, 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(camera.right().abs_diff_eq(Vec3::X, EPSILON));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn test_default_camera_matches_default_config() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::ZERO);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPSILON));
    }

    #[test]
    fn test_initial_pitch_is_clamped() {
        assert_eq!(camera_at(0.0, 120.0).pitch(), PITCH_LIMIT);
        assert_eq!(camera_at(0.0, -120.0).pitch(), -PITCH_LIMIT);
    }
}

#[cfg(test)]
mod camera_mouse_tests {
    use super::*;

    #[test]
    fn test_pitch_clamps_exactly_at_upper_limit() {
        let mut camera = camera_at(-90.0, 0.0);
        camera.apply_mouse_delta(0.0, 1000.0);
        assert_eq!(camera.pitch(), 89.0);

        camera.apply_mouse_delta(0.0, 50.0);
        assert_eq!(camera.pitch(), 89.0, "repeated clamping must not drift");
    }

    #[test]
    fn test_pitch_clamps_exactly_at_lower_limit() {
        let mut camera = camera_at(-90.0, 0.0);
        camera.apply_mouse_delta(0.0, -1000.0);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_mouse_delta_is_scaled_by_turn_speed() {
        let mut camera = camera_at(-90.0, 0.0);
        camera.apply_mouse_delta(10.0, 4.0);
        assert!((camera.yaw() - -85.0).abs() < EPSILON);
        assert!((camera.pitch() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_yaw_is_unbounded_and_wraps_through_trigonometry() {
        let mut camera = camera_at(-90.0, 0.0);
        // 720 px at 0.5 deg/px is a full turn
        camera.apply_mouse_delta(720.0, 0.0);
        assert!((camera.yaw() - 270.0).abs() < EPSILON);
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn test_mouse_does_not_move_position() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, -90.0, 0.0, 5.0, 0.5);
        camera.apply_mouse_delta(33.0, -12.0);
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}

#[cfg(test)]
mod camera_movement_tests {
    use super::*;

    #[test]
    fn test_no_keys_is_a_no_op() {
        let mut camera = camera_at(-90.0, 0.0);
        let before = camera.clone();
        camera.apply_keys(std::iter::empty::<MovementKey>(), 0.5);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_keys_never_change_orientation() {
        let mut camera = camera_at(30.0, 20.0);
        let (front, yaw, pitch) = (camera.front(), camera.yaw(), camera.pitch());
        camera.apply_keys(
            [
                MovementKey::Forward,
                MovementKey::Left,
                MovementKey::Right,
                MovementKey::Backward,
            ],
            0.25,
        );
        assert_eq!(camera.front(), front);
        assert_eq!(camera.yaw(), yaw);
        assert_eq!(camera.pitch(), pitch);
    }

    #[test]
    fn test_each_key_moves_along_its_axis() {
        let cases = [
            (MovementKey::Forward, Vec3::NEG_Z),
            (MovementKey::Backward, Vec3::Z),
            (MovementKey::Right, Vec3::X),
            (MovementKey::Left, Vec3::NEG_X),
        ];
        for (key, direction) in cases {
            let mut camera = camera_at(-90.0, 0.0);
            camera.apply_keys([key], 0.5);
            assert!(
                camera.position().abs_diff_eq(direction * 2.5, EPSILON),
                "{:?} moved to {:?}",
                key,
                camera.position()
            );
        }
    }

    #[test]
    fn test_movement_is_frame_rate_independent() {
        let mut one_step = camera_at(-90.0, 0.0);
        one_step.apply_keys([MovementKey::Forward], 1.0);

        let mut many_steps = camera_at(-90.0, 0.0);
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            let before = many_steps.position();
            many_steps.apply_keys([MovementKey::Forward], dt);
            let step = many_steps.position() - before;
            assert!((step.length() - 5.0 / 60.0).abs() < EPSILON);
            assert!(step.normalize().abs_diff_eq(many_steps.front(), EPSILON));
        }

        assert!(one_step.position().abs_diff_eq(many_steps.position(), 1e-4));
        assert!((one_step.position().length() - 5.0).abs() < 1e-4);
    }
}

#[cfg(test)]
mod camera_view_tests {
    use super::*;

    #[test]
    fn test_view_matrix_is_pure() {
        let camera = Camera::new(Vec3::new(0.3, -1.0, 2.0), Vec3::Y, 12.0, -33.0, 5.0, 0.5);
        assert_eq!(camera.view_matrix(), camera.view_matrix());
    }

    #[test]
    fn test_view_matrix_after_idle_frame() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.5, -3.5), Vec3::Y, -90.0, 0.0, 5.0, 0.5);
        camera.apply_mouse_delta(0.0, 0.0);
        camera.apply_keys(std::iter::empty::<MovementKey>(), 1.0 / 60.0);

        let expected = Mat4::look_at_rh(
            Vec3::new(0.0, 0.5, -3.5),
            Vec3::new(0.0, 0.5, -4.5),
            Vec3::Y,
        );
        assert!(
            camera.view_matrix().abs_diff_eq(expected, EPSILON),
            "got {:?}, expected {:?}",
            camera.view_matrix(),
            expected
        );
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::new(Vec3::new(4.0, -2.0, 7.0), Vec3::Y, 45.0, 10.0, 5.0, 0.5);
        let eye = camera.view_matrix().transform_point3(camera.position());
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));

        let ahead = camera
            .view_matrix()
            .transform_point3(camera.position() + camera.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }
}
