#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::DVec3;

    use crate::components::Controls;
    use crate::config::{ConfigError, FlightTuning};
    use crate::enums::{GuidanceState, WeaponKind};
    use crate::types::{
        angle_between, delta_angle_deg, forward, lerp, look_rotation, rotate_towards, up, SimTime,
    };

    #[test]
    fn test_guidance_state_serde() {
        let variants = vec![
            GuidanceState::Boosting,
            GuidanceState::Seeking,
            GuidanceState::Unguided,
            GuidanceState::Detonated,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: GuidanceState = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_weapon_kind_cycles_through_all() {
        let mut kind = WeaponKind::Cannon;
        kind = kind.next();
        assert_eq!(kind, WeaponKind::Missile);
        kind = kind.next();
        assert_eq!(kind, WeaponKind::Bomb);
        kind = kind.next();
        assert_eq!(kind, WeaponKind::Cannon);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..crate::constants::TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, crate::constants::TICK_RATE as u64);
        assert_relative_eq!(time.elapsed_secs, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_controls_clamped() {
        let controls = Controls {
            pitch: 2.0,
            yaw: -3.0,
            roll: 0.5,
            throttle: 1.5,
            fire: -1.0,
            weapon_switch: false,
        }
        .clamped();
        assert_eq!(controls.pitch, 1.0);
        assert_eq!(controls.yaw, -1.0);
        assert_eq!(controls.roll, 0.5);
        assert_eq!(controls.throttle, 1.0);
        assert_eq!(controls.fire, 0.0);
    }

    #[test]
    fn test_lerp_clamps_parameter() {
        assert_relative_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_relative_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_relative_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn test_delta_angle_wraps() {
        assert_relative_eq!(delta_angle_deg(350.0, 10.0), 20.0);
        assert_relative_eq!(delta_angle_deg(10.0, 350.0), -20.0);
        assert_relative_eq!(delta_angle_deg(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_look_rotation_faces_direction() {
        let rot = look_rotation(DVec3::new(1.0, 0.0, 0.0));
        let fwd = forward(rot);
        assert_relative_eq!(fwd.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(fwd.y, 0.0, epsilon = 1e-9);
        // Up stays world-up for a horizontal look direction.
        let u = up(rot);
        assert_relative_eq!(u.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_towards_respects_max_angle() {
        let from = DVec3::new(0.0, 10.0, 0.0);
        let to = DVec3::new(10.0, 0.0, 0.0);
        let step = 0.1;
        let rotated = rotate_towards(from, to, step);
        // Magnitude preserved, angle moved by exactly the step.
        assert_relative_eq!(rotated.length(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between(from, rotated), step, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_towards_snaps_when_close() {
        let from = DVec3::new(0.0, 5.0, 0.0);
        let to = DVec3::new(0.05, 5.0, 0.0);
        let rotated = rotate_towards(from, to, 1.0);
        assert_relative_eq!(angle_between(rotated, to), 0.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.length(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flight_tuning_profiles_validate() {
        assert!(FlightTuning::arcade().validate().is_ok());
        assert!(FlightTuning::heavy().validate().is_ok());
    }

    #[test]
    fn test_flight_tuning_round_trips_through_json() {
        let tuning = FlightTuning::arcade();
        let json = serde_json::to_string(&tuning).unwrap();
        let back = FlightTuning::from_json_str(&json).unwrap();
        assert_relative_eq!(back.max_velocity, tuning.max_velocity);
        assert_eq!(back.align_velocity, tuning.align_velocity);
    }

    #[test]
    fn test_flight_tuning_rejects_positive_dive_angle() {
        let mut tuning = FlightTuning::arcade();
        tuning.dive_angle = 0.2;
        match tuning.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "dive_angle"),
            other => panic!("expected Invalid error, got {other:?}"),
        }
    }

    #[test]
    fn test_flight_tuning_rejects_critical_below_stall() {
        let mut tuning = FlightTuning::arcade();
        tuning.critical_stall_angle = tuning.stall_angle - 0.1;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_mass_and_drag_bounds_ordered() {
        let tuning = FlightTuning::arcade();
        let (min_mass, max_mass) = tuning.mass_bounds();
        assert!(min_mass <= max_mass);
        let (min_drag, max_drag) = tuning.drag_bounds();
        assert!(min_drag <= max_drag);
    }
}
