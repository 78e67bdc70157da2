mod common;

use std::cell::Cell;
use std::rc::Rc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use common::{movable_box, movable_cylinder, new_space, static_box};
use phys_dynamics2d::{
    entity::EntityComponent,
    math::Aabb,
    BoxEntity, BoxModel, ModelConfig, PhysicsModel, PhysicsSpace, Quaternion, Ray3, Vector2,
    Vector3,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn assert_aabb_eq(actual: &Aabb, min: Vector3, max: Vector3) {
    assert_abs_diff_eq!(actual.min, min, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.max, max, epsilon = 1e-4);
}

#[test]
fn test_movable_box_binding() {
    let (space, handle) = new_space();
    let model = movable_box(&handle, "box0", Vector3::new(1.0, 2.0, 0.0));

    assert!(model.is_movable());
    assert!(!model.is_destroyed());
    assert!(model.attachment().is_some());

    let space = space.borrow();
    assert_eq!(space.body_count(), 2);
    assert_eq!(space.shape_count(), 1);
    assert_eq!(space.constraint_count(), 2);

    let body = space.body(model.body_handle().unwrap()).unwrap();
    assert_abs_diff_eq!(body.get_position(), Vector2::new(1.0, 2.0), epsilon = 1e-6);
    assert_relative_eq!(body.get_mass(), 1.0);
    assert_relative_eq!(body.get_moment(), 1.0 / 6.0, epsilon = 1e-6);

    let (linear, angular) = model.friction_joints().unwrap();
    let linear = space.constraint(linear).unwrap();
    assert_relative_eq!(linear.get_max_force(), 1.49);
    assert_eq!(linear.get_max_bias(), 0.0);
    let angular = space.constraint(angular).unwrap();
    assert_relative_eq!(angular.get_max_force(), 1.49);

    let shape = space.shape(model.shape_handle()).unwrap();
    assert_relative_eq!(shape.get_friction(), 0.7);
    assert_eq!(shape.get_elasticity(), 0.0);

    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(0.5, 1.5, 0.0),
        Vector3::new(1.5, 2.5, 1.0),
    );
}

#[test]
fn test_static_box_binding() {
    let (space, handle) = new_space();
    let model = static_box(&handle, "wall", Vector3::new(3.0, 0.0, 0.5));

    assert!(!model.is_movable());
    assert!(model.body_handle().is_none());
    assert!(model.friction_joints().is_none());
    assert!(model.attachment().is_none());

    let space = space.borrow();
    assert_eq!(space.body_count(), 1);
    assert_eq!(space.static_shape_count(), 1);
    assert_eq!(space.constraint_count(), 0);
    assert!(space.is_static_shape(model.shape_handle()));
    assert_relative_eq!(space.shape(model.shape_handle()).unwrap().get_friction(), 0.1);

    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(2.5, -0.5, 0.5),
        Vector3::new(3.5, 0.5, 1.5),
    );
}

#[test]
fn test_custom_model_config() {
    let (space, handle) = new_space();
    let config = ModelConfig {
        linear_friction_max_force: 3.0,
        ..ModelConfig::default()
    };
    let ground = handle.borrow().ground();
    let entity = BoxEntity::new(
        "heavy",
        Vector3::ZERO,
        Quaternion::identity(),
        true,
        Vector3::new(1.0, 1.0, 1.0),
        2.0,
    );
    let model = BoxModel::with_config(handle, ground, entity, &config).unwrap();

    let (linear, _) = model.friction_joints().unwrap();
    assert_relative_eq!(space.borrow().constraint(linear).unwrap().get_max_force(), 3.0);
}

#[test]
fn test_invalid_entities_are_rejected() {
    let (space, handle) = new_space();
    let flat = BoxEntity::new(
        "flat",
        Vector3::ZERO,
        Quaternion::identity(),
        true,
        Vector3::new(0.0, 1.0, 1.0),
        1.0,
    );
    assert!(BoxModel::new(handle.clone(), flat).is_err());

    let weightless = BoxEntity::new(
        "weightless",
        Vector3::ZERO,
        Quaternion::identity(),
        true,
        Vector3::new(1.0, 1.0, 1.0),
        0.0,
    );
    assert!(BoxModel::new(handle, weightless).is_err());

    // Nothing leaks from a failed binding
    let space = space.borrow();
    assert_eq!(space.body_count(), 1);
    assert_eq!(space.shape_count(), 0);
    assert_eq!(space.constraint_count(), 0);
}

#[test]
fn test_move_to_free_spot() {
    let (space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);

    assert!(model.move_to(Vector3::new(5.0, 5.0, 0.0), Quaternion::identity(), false));

    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(4.5, 4.5, 0.0),
        Vector3::new(5.5, 5.5, 1.0),
    );
    let space = space.borrow();
    let body = space.body(model.body_handle().unwrap()).unwrap();
    assert_abs_diff_eq!(body.get_position(), Vector2::new(5.0, 5.0), epsilon = 1e-6);
    assert_eq!(
        space.indexed_bounds(model.shape_handle()),
        Some(space.shape_bounds(model.shape_handle()).unwrap())
    );
}

#[test]
fn test_static_box_never_moves() {
    let (space, handle) = new_space();
    let mut model = static_box(&handle, "wall", Vector3::ZERO);
    let before = *model.bounding_box();
    let bounds = space.borrow().shape_bounds(model.shape_handle()).unwrap();

    assert!(!model.move_to(Vector3::new(5.0, 5.0, 0.0), Quaternion::identity(), false));
    assert!(!model.move_to(Vector3::new(5.0, 5.0, 0.0), Quaternion::identity(), true));

    assert_eq!(*model.bounding_box(), before);
    assert_eq!(space.borrow().shape_bounds(model.shape_handle()).unwrap(), bounds);

    // Reset is a no-op too
    model.reset();
    assert_eq!(*model.bounding_box(), before);
}

#[test]
fn test_overlapping_boxes_collide() {
    let (space, handle) = new_space();
    let a = movable_box(&handle, "a", Vector3::ZERO);
    let mut b = movable_box(&handle, "b", Vector3::new(0.5, 0.0, 0.0));

    assert!(a.is_colliding_with_something());
    assert!(b.is_colliding_with_something());

    let saved = space.borrow().body(b.body_handle().unwrap()).unwrap().pose();
    assert!(!b.move_to(Vector3::new(0.2, 0.0, 0.0), Quaternion::identity(), false));
    assert_eq!(space.borrow().body(b.body_handle().unwrap()).unwrap().pose(), saved);

    assert!(b.move_to(Vector3::new(3.0, 0.0, 0.0), Quaternion::identity(), false));
    assert!(!a.is_colliding_with_something());
    assert!(!b.is_colliding_with_something());
}

#[test]
fn test_adjacent_boxes_do_not_collide() {
    let (_space, handle) = new_space();
    let a = movable_box(&handle, "a", Vector3::ZERO);
    let mut b = movable_box(&handle, "b", Vector3::new(2.0, 0.0, 0.0));

    // Flush contact is allowed
    assert!(b.move_to(Vector3::new(1.0, 0.0, 0.0), Quaternion::identity(), false));
    assert!(!a.is_colliding_with_something());
}

#[test]
fn test_overlapping_static_boxes_do_not_collide() {
    let (_space, handle) = new_space();
    let left = static_box(&handle, "left", Vector3::ZERO);
    let right = static_box(&handle, "right", Vector3::new(0.5, 0.0, 0.0));

    assert!(!left.is_colliding_with_something());
    assert!(!right.is_colliding_with_something());

    let _intruder = movable_box(&handle, "intruder", Vector3::new(0.25, 0.75, 0.0));
    assert!(left.is_colliding_with_something());
    assert!(right.is_colliding_with_something());
}

#[test]
fn test_move_blocked_by_static_box() {
    let (_space, handle) = new_space();
    let _wall = static_box(&handle, "wall", Vector3::new(2.0, 0.0, 0.0));
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);

    assert!(!model.move_to(Vector3::new(1.5, 0.0, 0.0), Quaternion::identity(), false));
    assert!(model.move_to(Vector3::new(0.5, 0.0, 0.0), Quaternion::identity(), false));
}

#[test]
fn test_check_only_never_mutates() {
    let mut rng = StdRng::seed_from_u64(7);
    let (space, handle) = new_space();
    let _obstacle = movable_box(&handle, "obstacle", Vector3::new(2.0, 2.0, 0.0));
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    let body = model.body_handle().unwrap();
    let shape = model.shape_handle();

    for _ in 0..100 {
        let target = Vector3::new(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0), 0.0);
        let yaw = rng.gen_range(-3.0..3.0);

        let pose = space.borrow().body(body).unwrap().pose();
        let cached = space.borrow().shape_bounds(shape).unwrap();
        let indexed = space.borrow().indexed_bounds(shape);
        let bbox = *model.bounding_box();

        let free = model.move_to(target, Quaternion::from_yaw(yaw), true);

        assert_eq!(space.borrow().body(body).unwrap().pose(), pose);
        assert_eq!(space.borrow().shape_bounds(shape).unwrap(), cached);
        assert_eq!(space.borrow().indexed_bounds(shape), indexed);
        assert_eq!(*model.bounding_box(), bbox);

        // A real move agrees with the check
        assert_eq!(model.move_to(target, Quaternion::from_yaw(yaw), false), free);
    }
}

#[test]
fn test_rejected_moves_restore_pose_exactly() {
    let mut rng = StdRng::seed_from_u64(42);
    let (space, handle) = new_space();
    let _blocker = static_box(&handle, "blocker", Vector3::new(1.5, 0.0, 0.0));
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    let body = model.body_handle().unwrap();
    let start = space.borrow().body(body).unwrap().pose();

    for _ in 0..50 {
        // Always inside the blocker
        let target = Vector3::new(rng.gen_range(1.2..1.8), rng.gen_range(-0.3..0.3), 0.0);
        let yaw = rng.gen_range(-3.0..3.0);
        assert!(!model.move_to(target, Quaternion::from_yaw(yaw), false));
        assert_eq!(space.borrow().body(body).unwrap().pose(), start);
    }
}

#[test]
fn test_bounding_box_follows_rotation() {
    let mut rng = StdRng::seed_from_u64(1234);
    let (_space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);

    for _ in 0..50 {
        let center = Vector2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let yaw: f32 = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        assert!(model.move_to(
            Vector3::from_xy(center, 0.0),
            Quaternion::from_yaw(yaw),
            false
        ));

        let half = 0.5 * (yaw.cos().abs() + yaw.sin().abs());
        assert_aabb_eq(
            model.bounding_box(),
            Vector3::new(center.x - half, center.y - half, 0.0),
            Vector3::new(center.x + half, center.y + half, 1.0),
        );
    }
}

#[test]
fn test_ray_through_box() {
    let (_space, handle) = new_space();
    let model = movable_box(&handle, "box0", Vector3::ZERO);

    let vertical = Ray3::new(Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 2.0));
    let t = model.check_intersection_with_ray(&vertical).unwrap();
    assert_relative_eq!(t, 1.0 / 3.0, epsilon = 1e-5);

    let horizontal = Ray3::new(Vector3::new(-2.0, 0.0, 0.5), Vector3::new(2.0, 0.0, 0.5));
    let t = model.check_intersection_with_ray(&horizontal).unwrap();
    assert_relative_eq!(t, 0.375, epsilon = 1e-5);

    let above = Ray3::new(Vector3::new(-2.0, 0.0, 1.5), Vector3::new(2.0, 0.0, 1.5));
    assert!(model.check_intersection_with_ray(&above).is_none());

    let beside = Ray3::new(Vector3::new(-2.0, 3.0, 0.5), Vector3::new(2.0, 3.0, 0.5));
    assert!(model.check_intersection_with_ray(&beside).is_none());
}

#[test]
fn test_long_rays_still_hit() {
    let (_space, handle) = new_space();
    let model = movable_box(&handle, "box0", Vector3::ZERO);

    // The box spans a tiny fraction of these rays
    let vertical = Ray3::new(Vector3::new(0.0, 0.0, -1.0e6), Vector3::new(0.0, 0.0, 1.0e6));
    let t = model.check_intersection_with_ray(&vertical).unwrap();
    assert_abs_diff_eq!(t, 0.5, epsilon = 1e-5);

    let slanted = Ray3::new(Vector3::new(-1.0e4, 0.0, -1.0e4), Vector3::new(1.0e4, 0.0, 1.0e4));
    let t = model.check_intersection_with_ray(&slanted).unwrap();
    assert_abs_diff_eq!(t, 0.5, epsilon = 1e-4);
}

#[test]
fn test_ray_respects_vertical_extent() {
    let (space, handle) = new_space();
    let model = movable_box(&handle, "raised", Vector3::new(0.0, 0.0, 2.0));

    let ray = Ray3::new(Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 2.0));
    assert!(model.check_intersection_with_ray(&ray).is_none());

    // The planar query alone would report a hit
    let (start, end) = ray.to_segment_2d();
    assert!(space
        .borrow()
        .segment_query(model.shape_handle(), start, end)
        .unwrap()
        .is_some());
}

#[test]
fn test_ray_slanted_into_box() {
    let (_space, handle) = new_space();
    let model = movable_box(&handle, "box0", Vector3::ZERO);

    // Descends into the top face at x = 0
    let ray = Ray3::new(Vector3::new(-2.0, 0.0, 3.0), Vector3::new(2.0, 0.0, -1.0));
    let t = model.check_intersection_with_ray(&ray).unwrap();
    assert_relative_eq!(t, 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(ray.point_at(t), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-5);

    // Crosses the footprint edge below the box, then rises into its bottom face
    let rising = Ray3::new(Vector3::new(-1.0, 0.0, -2.0), Vector3::new(1.0, 0.0, 2.0));
    let t = model.check_intersection_with_ray(&rising).unwrap();
    assert_relative_eq!(t, 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(rising.point_at(t), Vector3::ZERO, epsilon = 1e-5);
}

#[test]
fn test_update_entity_status_pulls_pose() {
    struct Probe(Rc<Cell<u32>>);

    impl EntityComponent for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn update(&mut self, _position: &Vector3, _orientation: &Quaternion) {
            self.0.set(self.0.get() + 1);
        }
    }

    let (space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::new(0.0, 0.0, 0.25));
    let calls = Rc::new(Cell::new(0));
    model
        .entity_mut()
        .embodied_mut()
        .add_component(Box::new(Probe(calls.clone())));

    {
        let mut space = space.borrow_mut();
        let body = space.body_mut(model.body_handle().unwrap()).unwrap();
        body.set_position(Vector2::new(1.0, -1.0));
        body.set_angle(0.5);
    }
    model.update_entity_status();

    let embodied = model.entity().embodied();
    assert_abs_diff_eq!(embodied.get_position(), Vector3::new(1.0, -1.0, 0.25), epsilon = 1e-6);
    assert_relative_eq!(embodied.get_orientation().yaw(), 0.5, epsilon = 1e-5);
    assert_eq!(calls.get(), 1);
    assert_eq!(embodied.update_count(), 1);
}

#[test]
fn test_update_entity_status_on_static_box_refreshes_components() {
    let (_space, handle) = new_space();
    let mut model = static_box(&handle, "wall", Vector3::new(1.0, 1.0, 0.0));
    model.update_entity_status();

    let embodied = model.entity().embodied();
    assert_abs_diff_eq!(embodied.get_position(), Vector3::new(1.0, 1.0, 0.0));
    assert_eq!(embodied.update_count(), 1);
}

#[test]
fn test_friction_brings_pushed_box_to_rest() {
    let (space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    let body = model.body_handle().unwrap();
    space.borrow_mut().body_mut(body).unwrap().set_velocity(Vector2::new(1.0, 0.0));

    for _ in 0..120 {
        space.borrow_mut().tick().unwrap();
    }
    model.update_entity_status();

    let velocity = space.borrow().body(body).unwrap().get_velocity();
    assert_abs_diff_eq!(velocity, Vector2::ZERO, epsilon = 1e-5);
    // Sliding distance under constant deceleration
    let travelled = model.entity().embodied().get_position().x;
    assert_relative_eq!(travelled, 1.0 / (2.0 * 1.49), epsilon = 0.02);
}

#[test]
fn test_reset_restores_initial_pose() {
    let (space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::new(1.0, 1.0, 0.0));
    let body = model.body_handle().unwrap();

    assert!(model.move_to(Vector3::new(4.0, 4.0, 0.0), Quaternion::from_yaw(1.0), false));
    {
        let mut space = space.borrow_mut();
        let body = space.body_mut(body).unwrap();
        body.set_velocity(Vector2::new(2.0, 0.0));
        body.set_angular_velocity(1.0);
        body.apply_force(Vector2::new(5.0, 5.0));
    }
    model.update_entity_status();

    model.reset();

    let space = space.borrow();
    let body = space.body(body).unwrap();
    assert_abs_diff_eq!(body.get_position(), Vector2::new(1.0, 1.0), epsilon = 1e-6);
    assert_abs_diff_eq!(body.get_angle(), 0.0, epsilon = 1e-6);
    assert_eq!(body.get_velocity(), Vector2::ZERO);
    assert_eq!(body.get_angular_velocity(), 0.0);
    assert_eq!(body.get_force(), Vector2::ZERO);

    assert_abs_diff_eq!(
        model.entity().embodied().get_position(),
        Vector3::new(1.0, 1.0, 0.0)
    );
    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(0.5, 0.5, 0.0),
        Vector3::new(1.5, 1.5, 1.0),
    );
    assert_eq!(
        space.indexed_bounds(model.shape_handle()),
        Some(space.shape_bounds(model.shape_handle()).unwrap())
    );
}

#[test]
fn test_cylinder_model() {
    let (space, handle) = new_space();
    let mut model = movable_cylinder(&handle, "cyl", Vector3::ZERO, 0.5);

    assert_relative_eq!(
        space.borrow().body(model.body_handle().unwrap()).unwrap().get_moment(),
        0.125,
        epsilon = 1e-6
    );
    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(-0.5, -0.5, 0.0),
        Vector3::new(0.5, 0.5, 0.5),
    );

    // Rotation leaves a circle's bounds unchanged
    assert!(model.move_to(Vector3::new(2.0, 0.0, 0.0), Quaternion::from_yaw(1.2), false));
    assert_aabb_eq(
        model.bounding_box(),
        Vector3::new(1.5, -0.5, 0.0),
        Vector3::new(2.5, 0.5, 0.5),
    );

    let ray = Ray3::new(Vector3::new(-1.0, 0.0, 0.25), Vector3::new(5.0, 0.0, 0.25));
    let t = model.check_intersection_with_ray(&ray).unwrap();
    assert_relative_eq!(t, 2.5 / 6.0, epsilon = 1e-5);

    let other = movable_box(&handle, "box0", Vector3::new(2.8, 0.0, 0.0));
    assert!(model.is_colliding_with_something());
    assert!(other.is_colliding_with_something());
}

#[test]
fn test_destroy_frees_resources() {
    let (space, handle) = new_space();
    let mut movable = movable_box(&handle, "box0", Vector3::ZERO);
    let mut fixed = static_box(&handle, "wall", Vector3::new(3.0, 0.0, 0.0));
    let wall_shape = fixed.shape_handle();

    movable.destroy();
    fixed.destroy();
    assert!(movable.is_destroyed());
    assert!(fixed.is_destroyed());

    let space = space.borrow();
    assert_eq!(space.body_count(), 1);
    assert_eq!(space.shape_count(), 0);
    assert_eq!(space.static_shape_count(), 0);
    assert_eq!(space.constraint_count(), 0);
    assert!(space.indexed_bounds(wall_shape).is_none());
}

#[test]
fn test_drop_frees_resources() {
    let (space, handle) = new_space();
    {
        let _movable = movable_box(&handle, "box0", Vector3::ZERO);
        let _fixed = static_box(&handle, "wall", Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(space.borrow().shape_count(), 2);
    }

    let space = space.borrow();
    assert_eq!(space.body_count(), 1);
    assert_eq!(space.shape_count(), 0);
    assert_eq!(space.constraint_count(), 0);
}

#[test]
fn test_destroyed_model_frees_its_spot() {
    let (_space, handle) = new_space();
    let mut first = movable_box(&handle, "first", Vector3::ZERO);
    let mut second = movable_box(&handle, "second", Vector3::new(3.0, 0.0, 0.0));

    assert!(!second.move_to(Vector3::new(0.1, 0.0, 0.0), Quaternion::identity(), true));
    first.destroy();
    assert!(second.move_to(Vector3::new(0.1, 0.0, 0.0), Quaternion::identity(), false));
}

#[test]
#[should_panic(expected = "destroyed")]
fn test_move_after_destroy_panics() {
    let (_space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    model.destroy();
    model.move_to(Vector3::new(1.0, 0.0, 0.0), Quaternion::identity(), false);
}

#[test]
#[should_panic(expected = "destroyed")]
fn test_ray_after_destroy_panics() {
    let (_space, handle) = new_space();
    let mut model = static_box(&handle, "wall", Vector3::ZERO);
    model.destroy();
    let ray = Ray3::new(Vector3::new(-1.0, 0.0, 0.5), Vector3::new(1.0, 0.0, 0.5));
    model.check_intersection_with_ray(&ray);
}

#[test]
#[should_panic(expected = "destroyed")]
fn test_bounding_box_after_destroy_panics() {
    let (_space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    model.destroy();
    model.bounding_box();
}

#[test]
#[should_panic(expected = "destroyed")]
fn test_update_after_destroy_panics() {
    let (_space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    model.destroy();
    model.update_entity_status();
}

#[test]
#[should_panic(expected = "destroy called twice")]
fn test_double_destroy_panics() {
    let (_space, handle) = new_space();
    let mut model = movable_box(&handle, "box0", Vector3::ZERO);
    model.destroy();
    model.destroy();
}
